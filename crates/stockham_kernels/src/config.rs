//! Runtime knobs for the dispatcher and the CUDA launcher.

use std::env;

/// Reject invalid launch shapes before they reach the driver.
pub const ENV_VALIDATE_GRID: &str = "STOCKHAM_VALIDATE_GRID";
/// Upper bound on threads per block used by grid validation.
pub const ENV_MAX_THREADS_PER_BLOCK: &str = "STOCKHAM_MAX_THREADS_PER_BLOCK";
/// Synchronize the stream after each launch.
pub const ENV_SYNC_LAUNCH: &str = "STOCKHAM_SYNC_LAUNCH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    pub validate_grid: bool,
    pub max_threads_per_block: u32,
    /// Debug aid: surfaces asynchronous execution faults in the call that caused them.
    pub sync_after_launch: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            validate_grid: true,
            max_threads_per_block: 1024,
            sync_after_launch: false,
        }
    }
}

impl DispatchConfig {
    /// Defaults overlaid with `STOCKHAM_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_flag(ENV_VALIDATE_GRID) {
            config.validate_grid = v;
        }
        if let Some(v) = env::var(ENV_MAX_THREADS_PER_BLOCK)
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&v| v > 0)
        {
            config.max_threads_per_block = v;
        }
        if let Some(v) = env_flag(ENV_SYNC_LAUNCH) {
            config.sync_after_launch = v;
        }
        config
    }

    pub fn with_validate_grid(mut self, validate_grid: bool) -> Self {
        self.validate_grid = validate_grid;
        self
    }

    pub fn with_max_threads_per_block(mut self, max_threads_per_block: u32) -> Self {
        self.max_threads_per_block = max_threads_per_block;
        self
    }

    pub fn with_sync_after_launch(mut self, sync_after_launch: bool) -> Self {
        self.sync_after_launch = sync_after_launch;
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let v = env::var(name).ok()?;
    let v = v.trim();
    let off = ["0", "false", "off", "no"].iter().any(|f| v.eq_ignore_ascii_case(f));
    Some(!off)
}
