//! Window-level orchestration of the whole engine.
//!
//! A [`Shell`] owns one window's view of the world: the shared workspace
//! state, this window's navigation, the document registry, and the
//! compositor. Every mutation goes through here so that persistence,
//! navigation repair, and container placement stay in lockstep; the host
//! only ever renders what [`Shell::sync`] hands back.

use std::sync::Arc;

use tokio::runtime::Handle;
use webdock_config::{Config, PairId, SpaceId, TabId};

use crate::compositor::{Composition, Compositor};
use crate::document::{DocumentHost, DocumentRegistry, ReadinessSettings};
use crate::session::{KvStore, SessionNav, load_nav, load_workspace, save_nav, save_workspace};
use crate::split_layout::SplitLayout;
use crate::tab_strip::{self, TabDescriptor, TabStripAction};
use crate::workspace::{WorkspaceManager, WorkspaceState, default_workspace};

pub struct Shell {
    config: Config,
    manager: WorkspaceManager,
    nav: SessionNav,
    registry: DocumentRegistry,
    compositor: Compositor,
    workspace_store: Arc<dyn KvStore>,
    nav_store: Arc<dyn KvStore>,
}

impl Shell {
    /// Bring up a shell from persisted state.
    ///
    /// A missing or unusable stored workspace falls back to the default
    /// one; navigation is validated against whatever workspace loaded.
    pub fn new(
        config: Config,
        runtime: Handle,
        workspace_store: Arc<dyn KvStore>,
        nav_store: Arc<dyn KvStore>,
    ) -> Self {
        let workspace = load_workspace(&*workspace_store).unwrap_or_else(|| {
            log::info!("No stored workspace, starting from defaults");
            default_workspace()
        });
        let nav = load_nav(&*nav_store, &workspace);
        let registry = DocumentRegistry::new(runtime, ReadinessSettings::from_config(&config));
        log::info!(
            "Shell ready: {} spaces, {} groups, viewer {}",
            workspace.spaces.len(),
            workspace.tab_groups.len(),
            nav.viewer_id
        );
        Self {
            config,
            manager: WorkspaceManager::new(workspace),
            nav,
            registry,
            compositor: Compositor::new(),
            workspace_store,
            nav_store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn workspace(&self) -> &WorkspaceState {
        self.manager.state()
    }

    pub fn nav(&self) -> &SessionNav {
        &self.nav
    }

    pub fn registry(&self) -> &DocumentRegistry {
        &self.registry
    }

    /// Bring containers in line with the current state and describe what
    /// the host should render. Safe to call at any time.
    pub fn sync(&mut self, host: &dyn DocumentHost) -> Composition {
        self.compositor
            .sync(self.manager.state(), &self.nav, &self.registry, host)
    }

    /// The flattened tab-strip model for the active space.
    pub fn tab_strip(&self) -> Vec<TabDescriptor> {
        tab_strip::flatten(&tab_strip::build_items(self.manager.state(), &self.nav))
    }

    /// Route an action reported by the host's strip widget.
    pub fn handle_action(&mut self, action: &TabStripAction, host: &dyn DocumentHost) -> Composition {
        if tab_strip::dispatch(action, &mut self.manager, &mut self.nav) {
            self.after_mutation();
        }
        self.sync(host)
    }

    /// Record a document's load event, starting readiness detection.
    pub fn mark_loaded(&self, tab_id: &str) {
        self.registry.mark_loaded(tab_id);
    }

    // ---- navigation ----

    pub fn select_space(&mut self, host: &dyn DocumentHost, space_id: &str) {
        self.nav.select_space(self.manager.state(), space_id);
        self.after_mutation();
        self.sync(host);
    }

    pub fn select_tab(&mut self, host: &dyn DocumentHost, group_id: &str, tab_id: &str) {
        self.nav.select_tab(self.manager.state(), group_id, tab_id);
        self.after_mutation();
        self.sync(host);
    }

    pub fn select_pair(&mut self, host: &dyn DocumentHost, group_id: &str, pair_id: &str) {
        self.nav.select_pair(self.manager.state(), group_id, pair_id);
        self.after_mutation();
        self.sync(host);
    }

    pub fn set_active_group(&mut self, host: &dyn DocumentHost, group_id: &str) {
        self.nav.set_active_group(self.manager.state(), group_id);
        self.after_mutation();
        self.sync(host);
    }

    // ---- workspace mutations ----

    /// Create a tab, falling back to the configured title and URL when
    /// the caller leaves them blank.
    pub fn add_tab(
        &mut self,
        host: &dyn DocumentHost,
        group_id: &str,
        title: &str,
        url: &str,
    ) -> Option<TabId> {
        let title = if title.trim().is_empty() {
            &self.config.default_tab_title
        } else {
            title
        };
        let url = if url.trim().is_empty() {
            &self.config.default_tab_url
        } else {
            url
        };
        let id = self.manager.add_tab(&mut self.nav, group_id, title, url)?;
        self.after_mutation();
        self.sync(host);
        Some(id)
    }

    pub fn close_tab(&mut self, host: &dyn DocumentHost, group_id: &str, tab_id: &str) -> bool {
        let closed = self.manager.close_tab(&mut self.nav, group_id, tab_id);
        if closed {
            self.after_mutation();
        }
        self.sync(host);
        closed
    }

    pub fn close_active_tab(&mut self, host: &dyn DocumentHost) -> bool {
        let closed = self.manager.close_active_tab(&mut self.nav);
        if closed {
            self.after_mutation();
        }
        self.sync(host);
        closed
    }

    pub fn create_pair(
        &mut self,
        host: &dyn DocumentHost,
        group_id: &str,
        tab_ids: &[TabId],
    ) -> Option<PairId> {
        let id = self.manager.create_pair(&mut self.nav, group_id, tab_ids)?;
        self.after_mutation();
        self.sync(host);
        Some(id)
    }

    pub fn split_pair(&mut self, host: &dyn DocumentHost, group_id: &str, pair_id: &str) -> bool {
        let split = self.manager.split_pair(&mut self.nav, group_id, pair_id);
        if split {
            self.after_mutation();
        }
        self.sync(host);
        split
    }

    pub fn rename_tab(&mut self, group_id: &str, tab_id: &str, title: &str) {
        self.manager.rename_tab(group_id, tab_id, title);
        self.after_mutation();
    }

    /// Point a tab at a new URL and reload its document.
    ///
    /// This is the only path that changes what a mounted container shows;
    /// re-renders and state churn never do.
    pub fn navigate_tab(
        &mut self,
        host: &dyn DocumentHost,
        group_id: &str,
        tab_id: &str,
        url: &str,
    ) -> bool {
        if !self.manager.navigate_tab(group_id, tab_id, url) {
            return false;
        }
        let current_url = self
            .manager
            .state()
            .group(group_id)
            .and_then(|g| g.tab(tab_id))
            .map(|t| t.url.clone());
        if let Some(url) = current_url {
            self.registry.navigate(tab_id, &url, host);
        }
        self.after_mutation();
        self.sync(host);
        true
    }

    pub fn add_space(&mut self, host: &dyn DocumentHost, name: &str) -> SpaceId {
        let name = if name.trim().is_empty() {
            &self.config.default_space_name
        } else {
            name
        };
        let group_label = self.config.default_group_label.clone();
        let id = self.manager.add_space(&mut self.nav, name, &group_label);
        self.after_mutation();
        self.sync(host);
        id
    }

    pub fn delete_space(&mut self, host: &dyn DocumentHost, space_id: &str) -> bool {
        let deleted = self.manager.delete_space(&mut self.nav, space_id);
        if deleted {
            self.after_mutation();
        }
        self.sync(host);
        deleted
    }

    pub fn rename_space(&mut self, space_id: &str, name: &str) {
        self.manager.rename_space(space_id, name);
        self.after_mutation();
    }

    pub fn reorder_tab_groups(&mut self, space_id: &str, source_id: &str, target_id: &str) -> bool {
        let moved = self
            .manager
            .reorder_tab_groups(space_id, source_id, target_id);
        if moved {
            self.after_mutation();
        }
        moved
    }

    // ---- split resizing ----

    /// The layout model of the currently visible pair, if the active item
    /// is a split.
    pub fn active_pair_layout(&self) -> Option<SplitLayout> {
        let pair = self.active_pair()?;
        Some(SplitLayout::from_pair(pair).with_min_ratio(self.config.min_ratio_percent))
    }

    /// Drag a divider of the visible pair by `delta_percent` and persist
    /// the resulting ratios.
    pub fn resize_active_pair(&mut self, divider: usize, delta_percent: f32) -> bool {
        let Some(pair) = self.active_pair() else {
            log::warn!("resize_active_pair: no pair is active");
            return false;
        };
        let (group_id, pair_id) = (self.nav.active_tab_group_id.clone(), pair.id.clone());
        let mut layout =
            SplitLayout::from_pair(pair).with_min_ratio(self.config.min_ratio_percent);
        if !layout.drag_divider(divider, delta_percent) {
            return false;
        }
        self.manager
            .update_pair_ratios(&group_id, &pair_id, layout.ratios().to_vec());
        self.after_mutation();
        true
    }

    fn active_pair(&self) -> Option<&crate::workspace::TabPair> {
        let ws = self.manager.state();
        let group = ws.group(&self.nav.active_tab_group_id)?;
        let item = self.nav.active_item(&group.id)?;
        group.pair(item)
    }

    /// Revalidate navigation and write both stores; failures are logged
    /// and swallowed so a broken disk never takes the session down.
    fn after_mutation(&mut self) {
        self.nav.repair(self.manager.state());
        if let Err(e) = save_workspace(&*self.workspace_store, self.manager.state()) {
            log::warn!("Failed to persist workspace: {}", e);
        }
        if let Err(e) = save_nav(&*self.nav_store, &self.nav) {
            log::warn!("Failed to persist session nav: {}", e);
        }
    }
}
