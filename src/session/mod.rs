//! Per-window session state: navigation and persistence.
//!
//! The workspace itself is shared between windows; everything in this
//! module is scoped to one window: which space/group/item it is looking
//! at, and how that view (plus the shared workspace) round-trips through
//! a [`storage::KvStore`].

pub mod nav;
pub mod storage;

pub use nav::SessionNav;
pub use storage::{
    FileStore, KvStore, MemoryStore, SESSION_NAV_KEY, StorageError, WORKSPACE_KEY, load_nav,
    load_workspace, save_nav, save_workspace,
};
