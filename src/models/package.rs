use serde::{Deserialize, Serialize};

/// How a certificate is activated to start the deposit process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivationMethod {
    Online,
    Mail,
}

/// Policy parameters for one package family, resolved from a certificate
/// or package code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackagePolicy {
    pub expected_deposit: f64,
    pub activation: ActivationMethod,
}
