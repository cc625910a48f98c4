//! Workspace data model and mutation engine.
//!
//! `types` defines the persisted aggregate (spaces, tab groups, tabs,
//! pairs); `manager` implements every mutating operation over it together
//! with the per-window navigation fallout of each mutation.

pub mod manager;
pub mod types;

pub use manager::WorkspaceManager;
pub use types::{Space, Tab, TabGroup, TabPair, WorkspaceState, default_workspace};
