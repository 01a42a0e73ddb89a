//! Capture settings shared by every [`ExtError`](crate::ExtError) created in the process.
//!
//! The settings are read from the environment once, the first time an error is
//! created, and never change afterwards.
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `EXTERROR_STACK` | `0`, `false` or `off` disables stack capture |
//! | `EXTERROR_STACK_LIMIT` | maximum size of the captured stack text, in bytes |

use std::sync::OnceLock;

/// Default size of the stack capture buffer, in bytes.
pub const DEFAULT_STACK_LIMIT: usize = 1 << 12;

static GLOBAL: OnceLock<CaptureConfig> = OnceLock::new();

/// Controls what an error captures at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureConfig {
    pub capture_stack: bool,
    pub stack_limit: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { capture_stack: true, stack_limit: DEFAULT_STACK_LIMIT }
    }
}

impl CaptureConfig {
    /// Location only, no stack text.
    #[inline]
    pub fn location_only() -> Self {
        Self { capture_stack: false, ..Default::default() }
    }

    /// Stack capture bounded to `limit` bytes.
    #[inline]
    pub fn with_stack_limit(limit: usize) -> Self {
        Self { stack_limit: limit, ..Default::default() }
    }

    /// Builds a config from `EXTERROR_STACK` and `EXTERROR_STACK_LIMIT`.
    ///
    /// Unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("EXTERROR_STACK") {
            config.capture_stack =
                !matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off");
        }

        if let Some(limit) = std::env::var("EXTERROR_STACK_LIMIT")
            .ok()
            .and_then(|value| value.trim().parse::<usize>().ok())
        {
            config.stack_limit = limit;
        }

        config
    }

    /// Process-wide configuration, initialized from the environment on first use.
    pub fn global() -> &'static CaptureConfig {
        GLOBAL.get_or_init(Self::from_env)
    }
}
