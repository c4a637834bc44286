//! Orchestration layer for vidocs.
//!
//! Two top-level flows compose the provider and storage crates:
//! documentation generation (`DocumentationService`) and session chat
//! (`ChatService`). Each inbound request runs its orchestration to
//! completion independently; the on-disk session store is the only shared
//! mutable resource.

mod chat_service;
mod documentation_service;
mod error;
pub mod reconstruct;

pub use chat_service::ChatService;
pub use documentation_service::{AnalyzeOutcome, DocumentationService};
pub use error::ServiceError;
