//! Stack capture settings
//!
//! Process-wide, stored in atomics so the instantiation path reads them
//! without locking.
//!
//! ```
//! use errkind::{configure, CaptureConfig};
//!
//! configure(CaptureConfig::default().depth(4)).unwrap();
//! assert_eq!(errkind::config::current().depth, 4);
//! # configure(CaptureConfig::default()).unwrap();
//! ```

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::{ConfigError, ConfigResult};

/// Frames captured per occurrence unless configured otherwise.
pub const DEFAULT_DEPTH: usize = 10;

/// Upper bound accepted by [`CaptureConfig::validate`].
pub const MAX_DEPTH: usize = 128;

static ENABLED: AtomicBool = AtomicBool::new(true);
static DEPTH: AtomicUsize = AtomicUsize::new(DEFAULT_DEPTH);

/// Configuration for frame capture on instantiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Capture frames at all. When false, occurrences carry no frames and
    /// no throttle budget is consumed.
    /// Default: true
    pub enabled: bool,

    /// Maximum number of frames recorded per occurrence
    /// Default: 10
    pub depth: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: DEFAULT_DEPTH,
        }
    }
}

impl CaptureConfig {
    /// Configuration that records no frames
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Set capture depth
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Enable or disable capture
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.depth > MAX_DEPTH {
            return Err(ConfigError::DepthTooLarge {
                depth: self.depth,
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }
}

/// Install a capture configuration for the whole process.
pub fn configure(config: CaptureConfig) -> ConfigResult<()> {
    config.validate()?;
    DEPTH.store(config.depth, Ordering::Relaxed);
    ENABLED.store(config.enabled, Ordering::Relaxed);
    tracing::debug!(enabled = config.enabled, depth = config.depth, "frame capture configured");
    Ok(())
}

/// The configuration currently in effect.
#[inline]
pub fn current() -> CaptureConfig {
    CaptureConfig {
        enabled: ENABLED.load(Ordering::Relaxed),
        depth: DEPTH.load(Ordering::Relaxed),
    }
}
