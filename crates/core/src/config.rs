use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    ASSET_POLL_INTERVAL, ASSET_POLL_MAX_ATTEMPTS, FALLBACK_CHAIN, MODEL_FALLBACK_BACKOFF,
};

/// Bound on the remote-asset readiness wait.
///
/// Injected into the poller so tests can run with millisecond intervals
/// instead of real time.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self { interval: ASSET_POLL_INTERVAL, max_attempts: ASSET_POLL_MAX_ATTEMPTS }
    }
}

/// Immutable process configuration, assembled once in the binary and
/// injected into the orchestrators. Core logic never reads ambient
/// environment state.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub data_dir: PathBuf,
    pub allowed_origins: Vec<String>,
    pub fallback_chain: Vec<String>,
    pub poll: PollPolicy,
    pub fallback_backoff: Duration,
}

impl Config {
    /// Configuration with production defaults for everything except the
    /// API key, base URL and data directory.
    #[must_use]
    pub fn new(api_key: String, base_url: String, data_dir: PathBuf) -> Self {
        Self {
            api_key,
            base_url,
            data_dir,
            allowed_origins: vec![
                "http://localhost:3000".to_owned(),
                "http://localhost:5173".to_owned(),
                "http://127.0.0.1:3000".to_owned(),
            ],
            fallback_chain: FALLBACK_CHAIN.iter().map(|m| (*m).to_owned()).collect(),
            poll: PollPolicy::default(),
            fallback_backoff: MODEL_FALLBACK_BACKOFF,
        }
    }
}
