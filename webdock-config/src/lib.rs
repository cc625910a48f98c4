//! Configuration system for the webdock workspace shell.
//!
//! This crate provides configuration loading, saving, and default values
//! for the shell engine. It includes:
//!
//! - Shell configuration types and settings
//! - Shared layout and readiness constants
//! - Shared id aliases and item discriminants
//! - The bit-exact embed policy strings applied to embedded documents

pub mod config;
pub mod defaults;
pub mod error;
pub mod layout_constants;
mod types;

// Re-export main types for convenience
pub use config::Config;
pub use error::ConfigError;
pub use types::{ALLOW_POLICY, GroupId, ItemId, ItemKind, PairId, SANDBOX_POLICY, SpaceId, TabId};
