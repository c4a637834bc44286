//! Core types and constants for vidocs
//!
//! This crate contains domain types shared across all other crates.

mod config;
mod constants;
mod session;

pub use config::*;
pub use constants::*;
pub use session::*;
