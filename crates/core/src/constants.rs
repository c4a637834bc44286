//! Shared constants for vidocs.
//!
//! Centralizes values used across the provider, service and HTTP crates.

use std::time::Duration;

/// Priority-ordered chain of model identifiers tried until one succeeds.
///
/// Different remote models have independent quota/availability failure
/// modes; a static chain gives graceful degradation at the cost of up to
/// `chain.len() * MODEL_FALLBACK_BACKOFF` added latency on a full outage.
pub const FALLBACK_CHAIN: [&str; 5] = [
    "gemini-3-flash-preview",
    "gemini-2.0-flash-lite-preview-02-05",
    "gemini-2.0-flash-exp",
    "gemini-1.5-flash",
    "gemini-1.5-pro",
];

/// System instruction sent with every generation and chat call.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant analyzing technical videos.";

/// `resolved_model` value written by pre-release builds that never called a
/// real model. Substituted with the head of the fallback chain at load time.
pub const LEGACY_MODEL_SENTINEL: &str = "simulation-model";

/// Synthetic first user turn emitted when reconstructing a conversation.
pub const GENERATION_INSTRUCTION: &str = "Generate documentation.";

/// Title used when title derivation fails (non-fatal degrade).
pub const DEFAULT_TITLE: &str = "New Documentation";

/// Target language when the caller does not specify one.
pub const DEFAULT_LANGUAGE: &str = "English (US)";

/// Wait between fallback candidates after a failed invocation.
pub const MODEL_FALLBACK_BACKOFF: Duration = Duration::from_secs(2);

/// Wait between remote-asset status polls.
pub const ASSET_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Maximum status polls before the readiness wait fails with a timeout.
/// 150 polls at 2s bounds the wait at five minutes.
pub const ASSET_POLL_MAX_ATTEMPTS: u32 = 150;

/// Detail message surfaced when every fallback candidate failed.
pub const ALL_MODELS_FAILED_DETAIL: &str = "All AI models failed to respond.";
