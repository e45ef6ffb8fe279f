// Client settings data model
use crate::models::request::{TargetArch, TargetMetric};
use crate::service::DEFAULT_SERVER_URL;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub server_url: String,
    pub default_beam_size: u32,
    pub default_target_metric: TargetMetric,
    pub default_target_arch: TargetArch,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: String::from(DEFAULT_SERVER_URL),
            default_beam_size: 5,
            default_target_metric: TargetMetric::ExecutionTime,
            default_target_arch: TargetArch::Riscv64,
        }
    }
}
