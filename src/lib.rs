// Engine library for embedding a web-tool workspace shell.
//
// # Mutex Usage Policy
//
// webdock keeps all shared state behind `parking_lot::Mutex`: the locks
// are sync-only, held briefly, and never awaited across. Readiness
// callbacks are always invoked with no registry lock held, so they may
// call back into the registry freely. Async work is limited to the
// readiness poll tasks, which own no locks while sleeping.

/// Engine version (root crate version, for use by sub-crates).
/// Sub-crates should receive this via parameter rather than using
/// `env!("CARGO_PKG_VERSION")` which resolves to the sub-crate's version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod compositor;
pub mod document;
pub mod session;
pub mod shell;
pub mod split_layout;
pub mod tab_strip;
pub mod workspace;

pub use compositor::{Composition, Compositor};
pub use document::{
    ContainerHandle, ContainerId, DocumentEntry, DocumentHost, DocumentRegistry, HostSlot,
    ProbeError, ProbeSample, ReadinessProbe, ReadinessSettings, SubscriptionId,
};
pub use session::{FileStore, KvStore, MemoryStore, SessionNav, StorageError};
pub use shell::Shell;
pub use split_layout::SplitLayout;
pub use tab_strip::{TabDescriptor, TabStripAction, TabStripItem};
pub use workspace::{
    Space, Tab, TabGroup, TabPair, WorkspaceManager, WorkspaceState, default_workspace,
};

// Re-export the config crate under its conventional local name.
pub use webdock_config as config;
