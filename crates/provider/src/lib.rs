//! Remote LLM provider integration for vidocs.
//!
//! Covers the four provider surfaces the orchestrators depend on: binary
//! asset upload with readiness polling, streaming generation behind a model
//! fallback chain, non-streaming generation, and history-replaying chat.

mod client;
mod error;
mod fallback;
mod poller;
#[cfg(test)]
mod tests;
mod wire;

pub use client::{HistoryTurn, PromptPart, ProviderClient, TextStream};
pub use error::ProviderError;
pub use fallback::generate_with_fallback;
pub use poller::await_ready;
pub use wire::{AssetState, VIDEO_MIME};
