pub mod customer;
pub mod fields;
pub mod lead;
pub mod memo;
pub mod package;
pub mod session;
pub mod status;

pub use customer::CustomerRecord;
pub use lead::{LeadRecord, LeadSource, LeadUpdate};
pub use memo::{Memo, NewMemo};
pub use package::{ActivationMethod, PackagePolicy};
pub use session::{CallSession, CustomerSnapshot};
pub use status::{
    BookingCheck, BookingState, DepositState, DepositStatus, OverallState, RecommendedAction,
    StatusReport, TravelRepState, TravelRepStatus,
};
