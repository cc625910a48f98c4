//! Host-side integration traits for embedded documents.
//!
//! The engine never touches a real iframe or webview. It talks to the
//! embedding shell through [`DocumentHost`] (mount, move, unmount) and
//! [`ReadinessProbe`] (best-effort content inspection), keyed by stable
//! [`ContainerId`]s.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Where the host should place a mounted container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostSlot {
    /// Kept alive off-screen.
    Hidden,
    /// The single visible content area.
    Main,
    /// Pane `0..n` of the visible split.
    SplitSlot(usize),
}

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one mounted container, unique for the process lifetime.
///
/// IDs are minted monotonically and never reused, so two mounts of the
/// same tab (e.g. across an explicit navigation) are distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

impl ContainerId {
    /// Mint the next container identity.
    pub fn next() -> Self {
        Self(NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "container_{}", self.0)
    }
}

/// A mounted document container plus the probe used to watch its content.
#[derive(Clone)]
pub struct ContainerHandle {
    id: ContainerId,
    probe: Arc<dyn ReadinessProbe>,
}

impl ContainerHandle {
    /// Wrap a freshly mounted container, minting its identity.
    pub fn new(probe: Arc<dyn ReadinessProbe>) -> Self {
        Self {
            id: ContainerId::next(),
            probe,
        }
    }

    pub fn id(&self) -> ContainerId {
        self.id
    }

    pub fn probe(&self) -> Arc<dyn ReadinessProbe> {
        Arc::clone(&self.probe)
    }
}

impl std::fmt::Debug for ContainerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// One observation of a document's rendered content.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSample {
    /// Computed background of the document body, as a CSS color string.
    pub background: String,
    /// Rendered height of the body in pixels.
    pub content_height: f32,
    /// Number of element children under the body.
    pub child_count: u32,
}

/// Why a probe could not observe the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("document is cross-origin")]
    CrossOrigin,
    #[error("container is detached")]
    Detached,
}

/// Best-effort inspection of a mounted document's content.
///
/// Probes may fail at any time (cross-origin documents, containers torn
/// down by the host); callers treat failure as "stop watching".
pub trait ReadinessProbe: Send + Sync {
    fn sample(&self) -> Result<ProbeSample, ProbeError>;
}

/// The embedding shell's container surface.
///
/// `open` mounts a document for a tab and hands back its container and
/// probe; `place` moves an existing container between slots without
/// recreating it; `unmount` tears the container down for good.
pub trait DocumentHost: Send + Sync {
    fn open(&self, tab_id: &str, url: &str) -> ContainerHandle;
    fn place(&self, container: ContainerId, slot: HostSlot);
    fn unmount(&self, container: ContainerId);
}
