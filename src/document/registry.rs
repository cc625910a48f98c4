//! Registry of mounted embedded documents.
//!
//! One registry per window, created at startup and shared by handle; the
//! entries in it outlive any re-render of the view layer, which is what
//! keeps a tab's document alive while the tab is hidden. `ensure` is
//! idempotent and never touches an existing document's URL; explicit
//! navigation goes through `navigate`, which tears the container down and
//! mounts a fresh one.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use webdock_config::TabId;

use super::host::{ContainerHandle, ContainerId, DocumentHost};
use super::readiness::{ReadinessSettings, await_ready};
use crate::workspace::Tab;

type ReadyCallback = Box<dyn Fn() + Send + Sync>;

/// Token returned by [`DocumentRegistry::subscribe_ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Snapshot of one mounted document's state.
#[derive(Debug, Clone)]
pub struct DocumentEntry {
    pub container_id: ContainerId,
    pub url: String,
    pub loaded: bool,
    pub content_ready: bool,
}

struct EntryState {
    container: ContainerHandle,
    url: String,
    loaded: bool,
    content_ready: bool,
    poll_task: Option<JoinHandle<()>>,
    subscribers: HashMap<u64, ReadyCallback>,
}

impl EntryState {
    fn snapshot(&self) -> DocumentEntry {
        DocumentEntry {
            container_id: self.container.id(),
            url: self.url.clone(),
            loaded: self.loaded,
            content_ready: self.content_ready,
        }
    }
}

struct Inner {
    entries: Mutex<HashMap<TabId, EntryState>>,
    runtime: Handle,
    settings: ReadinessSettings,
    next_subscription: AtomicU64,
}

impl Drop for Inner {
    fn drop(&mut self) {
        // No registry left to observe readiness; stop every poller.
        for entry in self.entries.lock().values_mut() {
            if let Some(task) = entry.poll_task.take() {
                task.abort();
            }
        }
    }
}

/// Shared handle to the window's document registry.
#[derive(Clone)]
pub struct DocumentRegistry {
    inner: Arc<Inner>,
}

impl DocumentRegistry {
    pub fn new(runtime: Handle, settings: ReadinessSettings) -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                runtime,
                settings,
                next_subscription: AtomicU64::new(1),
            }),
        }
    }

    /// Mount a document for `tab` if none exists yet.
    ///
    /// An existing entry is returned untouched, whatever URL the tab
    /// carries now; URL changes only take effect through [`navigate`].
    ///
    /// [`navigate`]: DocumentRegistry::navigate
    pub fn ensure(&self, tab: &Tab, host: &dyn DocumentHost) -> DocumentEntry {
        let mut entries = self.inner.entries.lock();
        if let Some(entry) = entries.get(&tab.id) {
            log::debug!("Document for tab {} already mounted", tab.id);
            return entry.snapshot();
        }

        let container = host.open(&tab.id, &tab.url);
        let entry = EntryState {
            container,
            url: tab.url.clone(),
            loaded: false,
            content_ready: false,
            poll_task: None,
            subscribers: HashMap::new(),
        };
        let snapshot = entry.snapshot();
        entries.insert(tab.id.clone(), entry);
        log::info!(
            "Mounted document for tab {} at {} ({} mounted)",
            tab.id,
            tab.url,
            entries.len()
        );
        snapshot
    }

    /// Tear down the document for `tab_id`. No-op on unknown ids.
    pub fn release(&self, tab_id: &str, host: &dyn DocumentHost) {
        let removed = self.inner.entries.lock().remove(tab_id);
        let Some(mut entry) = removed else {
            log::debug!("release: no document mounted for tab {}", tab_id);
            return;
        };
        if let Some(task) = entry.poll_task.take() {
            task.abort();
        }
        host.unmount(entry.container.id());
        log::info!("Unmounted document for tab {}", tab_id);
    }

    /// Release every entry whose tab is not in `current_tab_ids`.
    ///
    /// Callers run this after placement, so nothing visible still refers
    /// to the entries being collected.
    pub fn reconcile(&self, current_tab_ids: &HashSet<TabId>, host: &dyn DocumentHost) {
        let stale: Vec<TabId> = self
            .inner
            .entries
            .lock()
            .keys()
            .filter(|id| !current_tab_ids.contains(*id))
            .cloned()
            .collect();
        if stale.is_empty() {
            return;
        }
        log::debug!("Reconciling documents, releasing {} stale", stale.len());
        for tab_id in stale {
            self.release(&tab_id, host);
        }
    }

    /// Replace the document for `tab_id` with a fresh mount at `url`.
    ///
    /// This is the only path that changes a mounted document's URL. The
    /// old container is unmounted and a new one opened, so the entry
    /// starts over unloaded. No-op if the tab has no document yet; the
    /// next `ensure` will mount it with the workspace's URL.
    pub fn navigate(&self, tab_id: &str, url: &str, host: &dyn DocumentHost) {
        if !self.inner.entries.lock().contains_key(tab_id) {
            log::warn!("navigate: no document mounted for tab {}", tab_id);
            return;
        }
        self.release(tab_id, host);

        let mut entries = self.inner.entries.lock();
        let container = host.open(tab_id, url);
        entries.insert(
            tab_id.to_string(),
            EntryState {
                container,
                url: url.to_string(),
                loaded: false,
                content_ready: false,
                poll_task: None,
                subscribers: HashMap::new(),
            },
        );
        log::info!("Reloading tab {} at {}", tab_id, url);
    }

    /// Record the document's load event and begin readiness polling.
    pub fn mark_loaded(&self, tab_id: &str) {
        let mut entries = self.inner.entries.lock();
        let Some(entry) = entries.get_mut(tab_id) else {
            log::warn!("mark_loaded: no document mounted for tab {}", tab_id);
            return;
        };
        if entry.loaded {
            return;
        }
        entry.loaded = true;
        log::debug!("Tab {} finished loading, watching for content", tab_id);

        let probe = entry.container.probe();
        let settings = self.inner.settings.clone();
        let weak = Arc::downgrade(&self.inner);
        let tab_id = tab_id.to_string();
        entry.poll_task = Some(self.inner.runtime.spawn(async move {
            await_ready(probe, settings).await;
            if let Some(inner) = weak.upgrade() {
                mark_ready(&inner, &tab_id);
            }
        }));
    }

    /// Register a callback fired when the tab's content becomes ready.
    ///
    /// An already-ready entry fires the callback immediately. Returns
    /// `None` when no document is mounted for the tab.
    pub fn subscribe_ready(
        &self,
        tab_id: &str,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Option<SubscriptionId> {
        let id = self.inner.next_subscription.fetch_add(1, Ordering::Relaxed);
        {
            let mut entries = self.inner.entries.lock();
            let entry = entries.get_mut(tab_id)?;
            if !entry.content_ready {
                entry.subscribers.insert(id, Box::new(callback));
                return Some(SubscriptionId(id));
            }
        }
        callback();
        Some(SubscriptionId(id))
    }

    /// Drop a previously registered readiness callback.
    pub fn unsubscribe_ready(&self, tab_id: &str, subscription: SubscriptionId) {
        if let Some(entry) = self.inner.entries.lock().get_mut(tab_id) {
            entry.subscribers.remove(&subscription.0);
        }
    }

    /// Snapshot of the entry for `tab_id`, if mounted.
    pub fn entry(&self, tab_id: &str) -> Option<DocumentEntry> {
        self.inner.entries.lock().get(tab_id).map(EntryState::snapshot)
    }

    pub fn is_mounted(&self, tab_id: &str) -> bool {
        self.inner.entries.lock().contains_key(tab_id)
    }

    pub fn mounted_count(&self) -> usize {
        self.inner.entries.lock().len()
    }
}

fn mark_ready(inner: &Arc<Inner>, tab_id: &str) {
    let subscribers = {
        let mut entries = inner.entries.lock();
        let Some(entry) = entries.get_mut(tab_id) else {
            return;
        };
        if entry.content_ready {
            return;
        }
        entry.content_ready = true;
        entry.poll_task = None;
        std::mem::take(&mut entry.subscribers)
    };
    log::debug!("Tab {} content ready ({} subscribers)", tab_id, subscribers.len());
    // Callbacks run outside the lock; they may call back into the registry.
    for callback in subscribers.values() {
        callback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::host::{HostSlot, ProbeError, ProbeSample, ReadinessProbe};
    use std::sync::atomic::AtomicBool;
    use std::time::Duration;

    struct StyledProbe;

    impl ReadinessProbe for StyledProbe {
        fn sample(&self) -> Result<ProbeSample, ProbeError> {
            Ok(ProbeSample {
                background: "rgb(30, 30, 46)".to_string(),
                content_height: 600.0,
                child_count: 3,
            })
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        opens: Mutex<Vec<(String, String)>>,
        places: Mutex<Vec<(ContainerId, HostSlot)>>,
        unmounts: Mutex<Vec<ContainerId>>,
    }

    impl DocumentHost for RecordingHost {
        fn open(&self, tab_id: &str, url: &str) -> ContainerHandle {
            self.opens
                .lock()
                .push((tab_id.to_string(), url.to_string()));
            ContainerHandle::new(Arc::new(StyledProbe))
        }

        fn place(&self, container: ContainerId, slot: HostSlot) {
            self.places.lock().push((container, slot));
        }

        fn unmount(&self, container: ContainerId) {
            self.unmounts.lock().push(container);
        }
    }

    fn registry() -> DocumentRegistry {
        DocumentRegistry::new(Handle::current(), ReadinessSettings::default())
    }

    fn tab(id: &str, url: &str) -> Tab {
        Tab::new(id, "Tab", url)
    }

    #[tokio::test]
    async fn ensure_mounts_once() {
        let host = RecordingHost::default();
        let registry = registry();
        let first = registry.ensure(&tab("tab_1", "/editor/"), &host);
        let second = registry.ensure(&tab("tab_1", "/editor/"), &host);
        assert_eq!(host.opens.lock().len(), 1);
        assert_eq!(first.container_id, second.container_id);
    }

    #[tokio::test]
    async fn ensure_never_updates_url() {
        let host = RecordingHost::default();
        let registry = registry();
        registry.ensure(&tab("tab_1", "/editor/"), &host);
        let entry = registry.ensure(&tab("tab_1", "/somewhere-else/"), &host);
        assert_eq!(entry.url, "/editor/");
        assert_eq!(host.opens.lock().len(), 1);
    }

    #[tokio::test]
    async fn release_unmounts_and_forgets() {
        let host = RecordingHost::default();
        let registry = registry();
        let entry = registry.ensure(&tab("tab_1", "/editor/"), &host);
        registry.release("tab_1", &host);

        assert_eq!(host.unmounts.lock().as_slice(), &[entry.container_id]);
        assert!(!registry.is_mounted("tab_1"));

        // A re-opened tab gets a brand new container, never the old one.
        let remounted = registry.ensure(&tab("tab_1", "/editor/"), &host);
        assert_ne!(remounted.container_id, entry.container_id);
    }

    #[tokio::test]
    async fn reconcile_releases_stale_entries() {
        let host = RecordingHost::default();
        let registry = registry();
        registry.ensure(&tab("tab_1", "/a/"), &host);
        registry.ensure(&tab("tab_2", "/b/"), &host);
        registry.ensure(&tab("tab_3", "/c/"), &host);

        let keep: HashSet<TabId> = ["tab_1".to_string(), "tab_3".to_string()].into();
        registry.reconcile(&keep, &host);

        assert!(registry.is_mounted("tab_1"));
        assert!(!registry.is_mounted("tab_2"));
        assert!(registry.is_mounted("tab_3"));
        assert_eq!(host.unmounts.lock().len(), 1);
    }

    #[tokio::test]
    async fn navigate_remounts_with_new_url() {
        let host = RecordingHost::default();
        let registry = registry();
        let before = registry.ensure(&tab("tab_1", "/editor/"), &host);
        registry.mark_loaded("tab_1");

        registry.navigate("tab_1", "/board/", &host);
        let after = registry.entry("tab_1").unwrap();

        assert_ne!(after.container_id, before.container_id);
        assert_eq!(after.url, "/board/");
        assert!(!after.loaded);
        assert!(!after.content_ready);
        assert_eq!(host.opens.lock().len(), 2);
        assert_eq!(host.unmounts.lock().len(), 1);
    }

    #[tokio::test]
    async fn navigate_unknown_tab_is_noop() {
        let host = RecordingHost::default();
        let registry = registry();
        registry.navigate("tab_9", "/board/", &host);
        assert!(host.opens.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn ready_fires_subscribers_once() {
        let host = RecordingHost::default();
        let registry = registry();
        registry.ensure(&tab("tab_1", "/editor/"), &host);

        let fired = Arc::new(AtomicU64::new(0));
        let fired_clone = Arc::clone(&fired);
        registry
            .subscribe_ready("tab_1", move || {
                fired_clone.fetch_add(1, Ordering::Relaxed);
            })
            .unwrap();

        registry.mark_loaded("tab_1");
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(fired.load(Ordering::Relaxed), 1);
        assert!(registry.entry("tab_1").unwrap().content_ready);

        // A second load event must not re-run the poll.
        registry.mark_loaded("tab_1");
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(fired.load(Ordering::Relaxed), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribe_after_ready_fires_immediately() {
        let host = RecordingHost::default();
        let registry = registry();
        registry.ensure(&tab("tab_1", "/editor/"), &host);
        registry.mark_loaded("tab_1");
        tokio::time::sleep(Duration::from_millis(1)).await;

        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = Arc::clone(&fired);
        registry
            .subscribe_ready("tab_1", move || {
                fired_clone.store(true, Ordering::Relaxed);
            })
            .unwrap();
        assert!(fired.load(Ordering::Relaxed));
    }

    #[tokio::test(start_paused = true)]
    async fn unsubscribed_callback_never_fires() {
        let host = RecordingHost::default();
        let registry = registry();
        registry.ensure(&tab("tab_1", "/editor/"), &host);

        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = Arc::clone(&fired);
        let sub = registry
            .subscribe_ready("tab_1", move || {
                fired_clone.store(true, Ordering::Relaxed);
            })
            .unwrap();
        registry.unsubscribe_ready("tab_1", sub);

        registry.mark_loaded("tab_1");
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(!fired.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn subscribe_unknown_tab_is_none() {
        let registry = registry();
        assert!(registry.subscribe_ready("tab_9", || {}).is_none());
    }
}
