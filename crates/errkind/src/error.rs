//! Error types for errkind configuration
//!
//! Building, wrapping and inspecting errors never fails: misses and type
//! mismatches surface as `None`/`false`. Only the configuration calls
//! (throttle activation, capture settings) can be rejected.

use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors returned by throttle and capture configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Throttle period of zero would refill continuously
    #[error("throttle period must be non-zero")]
    ZeroPeriod,

    /// Requested capture depth is above the supported maximum
    #[error("capture depth {depth} exceeds maximum of {max}")]
    DepthTooLarge { depth: usize, max: usize },

    /// The budget reset thread could not be started
    #[error("failed to spawn throttle reset thread")]
    Spawn(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_messages() {
        assert_eq!(ConfigError::ZeroPeriod.to_string(), "throttle period must be non-zero");
        let err = ConfigError::DepthTooLarge { depth: 500, max: 128 };
        assert_eq!(err.to_string(), "capture depth 500 exceeds maximum of 128");
    }

    #[test]
    fn spawn_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "no threads left");
        let err = ConfigError::Spawn(io);
        assert!(err.source().is_some());
        assert_eq!(err.source().map(|e| e.to_string()).as_deref(), Some("no threads left"));
    }
}
