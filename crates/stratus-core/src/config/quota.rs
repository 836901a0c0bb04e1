//! Per-user storage quota configuration.

use serde::{Deserialize, Serialize};

/// Storage quota configuration.
///
/// Quotas are advisory: uploads are never rejected for exceeding the
/// limit. The limit only drives the usage percentage reported to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Default per-user storage limit in bytes (1 TiB).
    #[serde(default = "default_limit_bytes")]
    pub default_limit_bytes: i64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            default_limit_bytes: default_limit_bytes(),
        }
    }
}

fn default_limit_bytes() -> i64 {
    1024 * 1024 * 1024 * 1024
}
