//! Visibility compositor: decides where every mounted container sits.
//!
//! The compositor is the only code that calls [`DocumentHost::place`]. It
//! keeps a cache of each tab's current slot and issues a placement only
//! when the slot changes, so showing or hiding a tab is always a move of
//! the existing container. Registry garbage collection runs strictly
//! after placement, once nothing visible refers to removed tabs.

use std::collections::{HashMap, HashSet};

use webdock_config::{PairId, TabId};

use crate::document::{ContainerId, DocumentHost, DocumentRegistry, HostSlot};
use crate::session::SessionNav;
use crate::workspace::WorkspaceState;

/// What the host should render after a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    /// Tabs currently on screen, in pane order.
    pub visible: Vec<TabId>,
    /// The active pair, when the visible tabs form a split.
    pub split: Option<PairId>,
    /// Visible tabs whose content is not ready yet; the host draws a
    /// loading overlay on top of (not instead of) their containers.
    pub overlay: Vec<TabId>,
    /// True when the active group has nothing to show.
    pub empty: bool,
}

/// Placement cache and sync entry point for one window.
#[derive(Default)]
pub struct Compositor {
    placements: HashMap<TabId, HostSlot>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring the host's containers in line with the current view.
    ///
    /// Mounts every tab of the active group, places visible tabs into
    /// `Main` or `SplitSlot(i)`, hides the rest (including tabs of other
    /// groups, which stay alive off-screen), then reconciles the registry
    /// against the full workspace.
    pub fn sync(
        &mut self,
        ws: &WorkspaceState,
        nav: &SessionNav,
        registry: &DocumentRegistry,
        host: &dyn DocumentHost,
    ) -> Composition {
        let group = ws.group(&nav.active_tab_group_id);
        let active_item = group.and_then(|g| nav.active_item(&g.id));

        let mut visible: Vec<TabId> = Vec::new();
        let mut split: Option<PairId> = None;
        if let (Some(group), Some(item)) = (group, active_item) {
            if let Some(pair) = group.pair(item) {
                split = Some(pair.id.clone());
                visible = pair.tab_ids.clone();
            } else if group.tab(item).is_some() {
                visible.push(item.to_string());
            }
        }

        let mut group_tab_ids: HashSet<TabId> = HashSet::new();
        if let Some(group) = group {
            for tab in &group.tabs {
                group_tab_ids.insert(tab.id.clone());
                let entry = registry.ensure(tab, host);
                let slot = match visible.iter().position(|id| *id == tab.id) {
                    Some(i) if split.is_some() => HostSlot::SplitSlot(i),
                    Some(_) => HostSlot::Main,
                    None => HostSlot::Hidden,
                };
                self.place(&tab.id, entry.container_id, slot, host);
            }
        }

        // Tabs of other groups keep their containers, parked off-screen.
        let parked: Vec<TabId> = self
            .placements
            .keys()
            .filter(|id| !group_tab_ids.contains(*id))
            .cloned()
            .collect();
        for tab_id in parked {
            match registry.entry(&tab_id) {
                Some(entry) => self.place(&tab_id, entry.container_id, HostSlot::Hidden, host),
                None => {
                    self.placements.remove(&tab_id);
                }
            }
        }

        // GC only after every surviving container has been placed.
        registry.reconcile(&ws.all_tab_ids(), host);
        self.placements
            .retain(|tab_id, _| registry.is_mounted(tab_id));

        let overlay: Vec<TabId> = visible
            .iter()
            .filter(|id| registry.entry(id).is_some_and(|e| !e.content_ready))
            .cloned()
            .collect();
        let empty = visible.is_empty();
        log::debug!(
            "Composited {} visible, {} overlaid, {} mounted",
            visible.len(),
            overlay.len(),
            registry.mounted_count()
        );

        Composition {
            visible,
            split,
            overlay,
            empty,
        }
    }

    fn place(
        &mut self,
        tab_id: &str,
        container: ContainerId,
        slot: HostSlot,
        host: &dyn DocumentHost,
    ) {
        if self.placements.get(tab_id) == Some(&slot) {
            return;
        }
        host.place(container, slot);
        self.placements.insert(tab_id.to_string(), slot);
    }

    /// The cached slot of a tab, if it has been placed.
    pub fn slot_of(&self, tab_id: &str) -> Option<HostSlot> {
        self.placements.get(tab_id).copied()
    }
}
