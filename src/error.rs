//! Configuration errors
//!
//! The simulation itself never fails; only the boundary where the pet layer
//! hands over a run configuration or tuning document can be rejected.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tuning document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("area difficulty must be between 1 and 10, got {0}")]
    Difficulty(u32),

    #[error("tuning value `{field}` is out of range: {reason}")]
    Tuning {
        field: &'static str,
        reason: &'static str,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;
