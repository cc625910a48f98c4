//! Per-window navigation state layered over the shared workspace.
//!
//! Each browser window keeps its own `SessionNav` so two windows can view
//! the same workspace while focusing different spaces, groups, and items.
//! The dependency is strictly one-way: nav holds IDs into
//! [`WorkspaceState`] and is revalidated whenever the workspace changes
//! out from under it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use webdock_config::{GroupId, ItemId, SpaceId};

use crate::workspace::{TabGroup, WorkspaceState};

/// Which space, group, and per-group item this window is looking at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionNav {
    /// Identity of this window's viewer, minted once per session.
    #[serde(default = "Uuid::new_v4")]
    pub viewer_id: Uuid,
    pub active_space_id: SpaceId,
    pub active_tab_group_id: GroupId,
    /// Group ID -> active tab or pair ID within that group.
    #[serde(default)]
    pub active_items: HashMap<GroupId, ItemId>,
}

impl SessionNav {
    /// Build the default view of a workspace: first space, that space's
    /// first group, and per group its first tab (else first pair).
    pub fn for_workspace(ws: &WorkspaceState) -> Self {
        let first_space = ws.spaces.first();
        let first_group_id = first_space
            .and_then(|s| s.tab_group_ids.first().cloned())
            .or_else(|| ws.tab_groups.first().map(|g| g.id.clone()))
            .unwrap_or_default();

        let mut active_items = HashMap::new();
        for group in &ws.tab_groups {
            if let Some(item) = default_item(group) {
                active_items.insert(group.id.clone(), item);
            }
        }

        Self {
            viewer_id: Uuid::new_v4(),
            active_space_id: first_space.map(|s| s.id.clone()).unwrap_or_default(),
            active_tab_group_id: first_group_id,
            active_items,
        }
    }

    /// Whether the space and group references still resolve.
    pub fn is_valid_for(&self, ws: &WorkspaceState) -> bool {
        ws.space(&self.active_space_id).is_some() && ws.group(&self.active_tab_group_id).is_some()
    }

    /// Revalidate every reference after a workspace change.
    ///
    /// An invalid space or group falls back to the firsts; per-group active
    /// items that no longer resolve fall back to the group's first tab,
    /// else first pair, else are dropped. Entries for deleted groups are
    /// removed. The viewer identity is preserved.
    pub fn repair(&mut self, ws: &WorkspaceState) {
        if !self.is_valid_for(ws) {
            log::warn!(
                "Session nav references missing space {} or group {}, rebuilding",
                self.active_space_id,
                self.active_tab_group_id
            );
            let viewer_id = self.viewer_id;
            let mut rebuilt = Self::for_workspace(ws);
            rebuilt.viewer_id = viewer_id;
            // Carry over per-group selections that still resolve.
            for (group_id, item) in self.active_items.drain() {
                if item_exists(ws, &group_id, &item) {
                    rebuilt.active_items.insert(group_id, item);
                }
            }
            *self = rebuilt;
            return;
        }

        self.active_items
            .retain(|group_id, item| item_exists(ws, group_id, item));
        for group in &ws.tab_groups {
            if !self.active_items.contains_key(&group.id) {
                if let Some(item) = default_item(group) {
                    self.active_items.insert(group.id.clone(), item);
                }
            }
        }
    }

    /// Activate a space; the space's first group becomes the active group.
    /// Unknown IDs are a logged no-op.
    pub fn select_space(&mut self, ws: &WorkspaceState, space_id: &str) {
        let Some(space) = ws.space(space_id) else {
            log::warn!("select_space: unknown space {}", space_id);
            return;
        };
        self.active_space_id = space.id.clone();
        if let Some(first) = space.tab_group_ids.first() {
            self.active_tab_group_id = first.clone();
        }
        log::debug!("Switched to space {}", space_id);
    }

    /// Focus a tab; also makes its group the active group.
    pub fn select_tab(&mut self, ws: &WorkspaceState, group_id: &str, tab_id: &str) {
        let Some(group) = ws.group(group_id) else {
            log::warn!("select_tab: unknown group {}", group_id);
            return;
        };
        if group.tab(tab_id).is_none() {
            log::warn!("select_tab: tab {} not in group {}", tab_id, group_id);
            return;
        }
        self.active_tab_group_id = group_id.to_string();
        self.active_items
            .insert(group_id.to_string(), tab_id.to_string());
        log::debug!("Selected tab {} in group {}", tab_id, group_id);
    }

    /// Focus a pair; also makes its group the active group.
    pub fn select_pair(&mut self, ws: &WorkspaceState, group_id: &str, pair_id: &str) {
        let Some(group) = ws.group(group_id) else {
            log::warn!("select_pair: unknown group {}", group_id);
            return;
        };
        if group.pair(pair_id).is_none() {
            log::warn!("select_pair: pair {} not in group {}", pair_id, group_id);
            return;
        }
        self.active_tab_group_id = group_id.to_string();
        self.active_items
            .insert(group_id.to_string(), pair_id.to_string());
        log::debug!("Selected pair {} in group {}", pair_id, group_id);
    }

    /// Make a group the active group without changing its item selection.
    pub fn set_active_group(&mut self, ws: &WorkspaceState, group_id: &str) {
        if ws.group(group_id).is_none() {
            log::warn!("set_active_group: unknown group {}", group_id);
            return;
        }
        self.active_tab_group_id = group_id.to_string();
    }

    /// Directly set or clear a group's active item. Callers are expected to
    /// have validated the item; the state machine uses this for fallback
    /// repair after closes.
    pub fn set_active_item(&mut self, group_id: &str, item: Option<ItemId>) {
        match item {
            Some(item) => {
                self.active_items.insert(group_id.to_string(), item);
            }
            None => {
                self.active_items.remove(group_id);
            }
        }
    }

    /// The active tab or pair ID of a group, if any.
    pub fn active_item(&self, group_id: &str) -> Option<&str> {
        self.active_items.get(group_id).map(String::as_str)
    }
}

fn default_item(group: &TabGroup) -> Option<ItemId> {
    group
        .first_tab_id()
        .or_else(|| group.first_pair_id())
        .map(str::to_string)
}

fn item_exists(ws: &WorkspaceState, group_id: &str, item: &str) -> bool {
    ws.group(group_id)
        .is_some_and(|g| g.tab(item).is_some() || g.pair(item).is_some())
}
