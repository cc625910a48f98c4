//! Shared integration test helpers for webdock.
//!
//! Provides a recording [`DocumentHost`] whose per-tab probes can be
//! driven from the test body, plus factories for shells backed by
//! in-memory stores.
//!
//! Note: Rust integration tests use `mod common;` (not `use`) to bring in
//! helpers from `tests/common/mod.rs`. The `#[allow(dead_code)]` attribute
//! suppresses warnings when only a subset of helpers are used per file.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use webdock::document::{
    ContainerHandle, ContainerId, DocumentHost, HostSlot, ProbeError, ProbeSample, ReadinessProbe,
};
use webdock::session::{KvStore, MemoryStore};
use webdock::shell::Shell;
use webdock_config::Config;

/// Everything a host was asked to do, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Open(String),
    Place(ContainerId, HostSlot),
    Unmount(ContainerId),
}

/// Test-controlled probe result for one tab's document.
pub struct ProbeState {
    sample: Mutex<Result<ProbeSample, ProbeError>>,
}

impl ProbeState {
    /// Fresh documents look blank until the test says otherwise.
    fn blank() -> Arc<Self> {
        Arc::new(Self {
            sample: Mutex::new(Ok(ProbeSample {
                background: "rgba(0, 0, 0, 0)".to_string(),
                content_height: 0.0,
                child_count: 0,
            })),
        })
    }

    /// Make the document look like painted content.
    pub fn set_ready(&self) {
        *self.sample.lock() = Ok(ProbeSample {
            background: "rgb(30, 30, 46)".to_string(),
            content_height: 600.0,
            child_count: 3,
        });
    }

    pub fn set(&self, sample: Result<ProbeSample, ProbeError>) {
        *self.sample.lock() = sample;
    }
}

struct SharedProbe(Arc<ProbeState>);

impl ReadinessProbe for SharedProbe {
    fn sample(&self) -> Result<ProbeSample, ProbeError> {
        self.0.sample.lock().clone()
    }
}

/// A [`DocumentHost`] that records every call and hands out controllable
/// probes, one per tab.
#[derive(Default)]
pub struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
    probes: Mutex<HashMap<String, Arc<ProbeState>>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().clone()
    }

    pub fn opens(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Open(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn unmounts(&self) -> Vec<ContainerId> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                HostEvent::Unmount(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// The probe controlling the readiness of `tab_id`'s document.
    pub fn probe(&self, tab_id: &str) -> Arc<ProbeState> {
        Arc::clone(
            self.probes
                .lock()
                .entry(tab_id.to_string())
                .or_insert_with(ProbeState::blank),
        )
    }
}

impl DocumentHost for RecordingHost {
    fn open(&self, tab_id: &str, _url: &str) -> ContainerHandle {
        self.events.lock().push(HostEvent::Open(tab_id.to_string()));
        let probe = self.probe(tab_id);
        ContainerHandle::new(Arc::new(SharedProbe(probe)))
    }

    fn place(&self, container: ContainerId, slot: HostSlot) {
        self.events.lock().push(HostEvent::Place(container, slot));
    }

    fn unmount(&self, container: ContainerId) {
        self.events.lock().push(HostEvent::Unmount(container));
    }
}

/// A shell over fresh in-memory stores. Must run inside a tokio runtime.
pub fn memory_shell() -> Shell {
    Shell::new(
        Config::default(),
        Handle::current(),
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryStore::new()),
    )
}

/// A shell over caller-provided stores, for restart and multi-window
/// scenarios.
pub fn shell_with_stores(workspace_store: Arc<dyn KvStore>, nav_store: Arc<dyn KvStore>) -> Shell {
    Shell::new(Config::default(), Handle::current(), workspace_store, nav_store)
}
