use crate::config::AppConfig;
use crate::services::calls::SessionTracker;
use crate::services::knowledge_base::KnowledgeBase;
use crate::services::messaging::MessagingProvider;
use crate::services::store::RecordStore;

pub struct AppState {
    pub config: AppConfig,
    pub store: Box<dyn RecordStore>,
    pub kb: KnowledgeBase,
    pub sessions: SessionTracker,
    pub messaging: Box<dyn MessagingProvider>,
}
