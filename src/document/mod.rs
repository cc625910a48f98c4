//! Embedded-document lifecycle: mounting, readiness, host integration.
//!
//! Documents live strictly longer than any view of them. The registry
//! owns one entry per mounted tab; the host traits in [`host`] are the
//! only way the engine reaches the real containers; [`readiness`] decides
//! when a loading document has painted something worth showing.

pub mod host;
pub mod readiness;
pub mod registry;

pub use host::{
    ContainerHandle, ContainerId, DocumentHost, HostSlot, ProbeError, ProbeSample, ReadinessProbe,
};
pub use readiness::{ReadinessSettings, sample_is_ready};
pub use registry::{DocumentEntry, DocumentRegistry, SubscriptionId};
