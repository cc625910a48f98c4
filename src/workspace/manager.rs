//! Workspace manager: every mutating operation over the workspace state.
//!
//! Operations follow one error policy throughout: a lookup miss is a
//! logged no-op, never an error to the caller. Invariant violations
//! (closing a pinned tab, deleting the last space) are rejected with a
//! warning and no state change.

use webdock_config::{ItemId, PairId, SpaceId, TabId};

use super::types::{Space, Tab, TabGroup, TabPair, WorkspaceState};
use crate::session::SessionNav;

/// Owns the shared [`WorkspaceState`] and applies transitions to it,
/// updating the calling window's [`SessionNav`] where an operation moves
/// the viewer's focus.
pub struct WorkspaceManager {
    state: WorkspaceState,
}

impl WorkspaceManager {
    /// Wrap an already-normalized workspace state.
    pub fn new(state: WorkspaceState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    /// Append a new tab to a group; it becomes this viewer's active item.
    ///
    /// The URL is trimmed; an empty URL or unknown group is a logged no-op.
    pub fn add_tab(
        &mut self,
        nav: &mut SessionNav,
        group_id: &str,
        title: &str,
        url: &str,
    ) -> Option<TabId> {
        let url = url.trim();
        if url.is_empty() {
            log::warn!("add_tab: empty URL rejected");
            return None;
        }
        if self.state.group(group_id).is_none() {
            log::warn!("add_tab: unknown group {}", group_id);
            return None;
        }

        let id = self.state.generate_id("tab");
        let group = self.state.group_mut(group_id)?;
        group.tabs.push(Tab::new(id.clone(), title, url));
        let total = group.tabs.len();

        nav.select_tab(&self.state, group_id, &id);
        log::info!("Created tab {} in group {} (total: {})", id, group_id, total);
        Some(id)
    }

    /// Close a tab, cascading removal of any pair that references it.
    ///
    /// Pinned tabs are rejected. If the closed tab (or a cascaded pair)
    /// was this viewer's active item, focus falls back to the tab
    /// preceding the removed one, clamped to the first; else the first
    /// remaining pair; else nothing.
    pub fn close_tab(&mut self, nav: &mut SessionNav, group_id: &str, tab_id: &str) -> bool {
        let Some(group) = self.state.group_mut(group_id) else {
            log::warn!("close_tab: unknown group {}", group_id);
            return false;
        };
        let Some(idx) = group.tab_index(tab_id) else {
            log::warn!("close_tab: tab {} not in group {}", tab_id, group_id);
            return false;
        };
        if group.tabs[idx].pinned {
            log::warn!("close_tab: refusing to close pinned tab {}", tab_id);
            return false;
        }

        let cascaded = group.pairs_containing(tab_id);
        group.pairs.retain(|p| !p.tab_ids.iter().any(|t| t == tab_id));
        group.tabs.remove(idx);
        log::info!(
            "Closed tab {} (index {}) in group {}, cascaded {} pair(s)",
            tab_id,
            idx,
            group_id,
            cascaded.len()
        );

        let active = nav.active_item(group_id).map(str::to_string);
        let was_active = match active.as_deref() {
            Some(item) => item == tab_id || cascaded.iter().any(|p| p == item),
            None => false,
        };
        if was_active {
            let fallback = self
                .state
                .group(group_id)
                .and_then(|g| fallback_after_close(g, idx));
            nav.set_active_item(group_id, fallback);
        }
        true
    }

    /// Pair two existing tabs side by side with equal shares; the new pair
    /// becomes this viewer's active item.
    pub fn create_pair(
        &mut self,
        nav: &mut SessionNav,
        group_id: &str,
        tab_ids: &[TabId],
    ) -> Option<PairId> {
        let Some(group) = self.state.group(group_id) else {
            log::warn!("create_pair: unknown group {}", group_id);
            return None;
        };
        if tab_ids.len() < 2 {
            log::warn!("create_pair: need at least two tabs, got {}", tab_ids.len());
            return None;
        }
        if let Some(missing) = tab_ids.iter().find(|t| group.tab(t).is_none()) {
            log::warn!("create_pair: tab {} not in group {}", missing, group_id);
            return None;
        }
        if let Some(existing) = group.pairs.iter().find(|p| same_members(&p.tab_ids, tab_ids)) {
            log::warn!(
                "create_pair: tabs already paired together as {}",
                existing.id
            );
            return None;
        }

        let id = self.state.generate_id("pair");
        let group = self.state.group_mut(group_id)?;
        group.pairs.push(TabPair::new(id.clone(), tab_ids.to_vec()));

        nav.select_pair(&self.state, group_id, &id);
        log::info!("Created pair {} in group {} from {:?}", id, group_id, tab_ids);
        Some(id)
    }

    /// Dissolve a pair back into single-tab view. The member tabs stay;
    /// the group's first tab becomes this viewer's active item.
    pub fn split_pair(&mut self, nav: &mut SessionNav, group_id: &str, pair_id: &str) -> bool {
        let Some(group) = self.state.group_mut(group_id) else {
            log::warn!("split_pair: unknown group {}", group_id);
            return false;
        };
        let before = group.pairs.len();
        group.pairs.retain(|p| p.id != pair_id);
        if group.pairs.len() == before {
            log::warn!("split_pair: pair {} not in group {}", pair_id, group_id);
            return false;
        }

        let fallback: Option<ItemId> = group
            .first_tab_id()
            .or_else(|| group.first_pair_id())
            .map(str::to_string);
        nav.set_active_item(group_id, fallback);
        log::info!("Split pair {} in group {}", pair_id, group_id);
        true
    }

    /// Atomically replace a pair's ratios, renormalized to sum 100.
    pub fn update_pair_ratios(&mut self, group_id: &str, pair_id: &str, ratios: Vec<f32>) -> bool {
        let Some(group) = self.state.group_mut(group_id) else {
            log::warn!("update_pair_ratios: unknown group {}", group_id);
            return false;
        };
        let Some(pair) = group.pair_mut(pair_id) else {
            log::warn!("update_pair_ratios: pair {} not in group {}", pair_id, group_id);
            return false;
        };
        pair.ratios = ratios;
        pair.normalize_ratios();
        log::debug!("Pair {} ratios now {:?}", pair_id, pair.ratios);
        true
    }

    /// Retitle a tab. Empty titles are ignored.
    pub fn rename_tab(&mut self, group_id: &str, tab_id: &str, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            log::warn!("rename_tab: empty title ignored");
            return;
        }
        let Some(tab) = self
            .state
            .group_mut(group_id)
            .and_then(|g| g.tab_mut(tab_id))
        else {
            log::warn!("rename_tab: tab {} not in group {}", tab_id, group_id);
            return;
        };
        tab.title = title.to_string();
    }

    /// Point a tab at a new URL. This is the explicit navigation
    /// operation; returns whether the URL actually changed so the caller
    /// can reload the tab's embedded document.
    pub fn navigate_tab(&mut self, group_id: &str, tab_id: &str, url: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            log::warn!("navigate_tab: empty URL rejected");
            return false;
        }
        let Some(tab) = self
            .state
            .group_mut(group_id)
            .and_then(|g| g.tab_mut(tab_id))
        else {
            log::warn!("navigate_tab: tab {} not in group {}", tab_id, group_id);
            return false;
        };
        if tab.url == url {
            return false;
        }
        log::info!("Tab {} navigating to {}", tab_id, url);
        tab.url = url.to_string();
        true
    }

    /// Create a space holding one empty group; it becomes the active
    /// space for this viewer.
    pub fn add_space(&mut self, nav: &mut SessionNav, name: &str, group_label: &str) -> SpaceId {
        let space_id = self.state.generate_id("space");
        let group_id = self.state.generate_id("tg");

        self.state.tab_groups.push(TabGroup::new(group_id.clone(), group_label));
        self.state.spaces.push(Space {
            id: space_id.clone(),
            name: name.to_string(),
            icon: "folder".to_string(),
            tab_group_ids: vec![group_id.clone()],
        });

        nav.select_space(&self.state, &space_id);
        log::info!(
            "Created space {} with group {} (total spaces: {})",
            space_id,
            group_id,
            self.state.spaces.len()
        );
        space_id
    }

    /// Delete a space and everything it owns. The last remaining space
    /// cannot be deleted. If the viewer was in the deleted space it falls
    /// back to the first remaining one.
    pub fn delete_space(&mut self, nav: &mut SessionNav, space_id: &str) -> bool {
        if self.state.spaces.len() <= 1 {
            log::warn!("delete_space: refusing to delete the last space");
            return false;
        }
        let Some(space) = self.state.space(space_id) else {
            log::warn!("delete_space: unknown space {}", space_id);
            return false;
        };

        let doomed_groups = space.tab_group_ids.clone();
        self.state
            .tab_groups
            .retain(|g| !doomed_groups.iter().any(|d| *d == g.id));
        self.state.spaces.retain(|s| s.id != space_id);
        log::info!(
            "Deleted space {} with {} group(s) (remaining spaces: {})",
            space_id,
            doomed_groups.len(),
            self.state.spaces.len()
        );

        nav.repair(&self.state);
        true
    }

    /// Rename a space. Empty names are ignored.
    pub fn rename_space(&mut self, space_id: &str, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            log::warn!("rename_space: empty name ignored");
            return;
        }
        let Some(space) = self.state.space_mut(space_id) else {
            log::warn!("rename_space: unknown space {}", space_id);
            return;
        };
        space.name = name.to_string();
    }

    /// Splice-move `source_id` to `target_id`'s position within a space,
    /// keeping the relative order of every other group.
    pub fn reorder_tab_groups(&mut self, space_id: &str, source_id: &str, target_id: &str) -> bool {
        let Some(space) = self.state.space_mut(space_id) else {
            log::warn!("reorder_tab_groups: unknown space {}", space_id);
            return false;
        };
        let ids = &mut space.tab_group_ids;
        let (Some(src), Some(dst)) = (
            ids.iter().position(|id| id == source_id),
            ids.iter().position(|id| id == target_id),
        ) else {
            log::warn!(
                "reorder_tab_groups: {} or {} not in space {}",
                source_id,
                target_id,
                space_id
            );
            return false;
        };
        if src == dst {
            return false;
        }
        let moved = ids.remove(src);
        ids.insert(dst, moved);
        log::debug!("Moved group {} from index {} to {}", source_id, src, dst);
        true
    }

    /// Global close shortcut over the viewer's active item.
    ///
    /// Active pair: deactivate it (select the group's first tab) without
    /// deleting anything. Active unpinned tab: close it. Pinned tab or no
    /// active item: no-op.
    pub fn close_active_tab(&mut self, nav: &mut SessionNav) -> bool {
        let group_id = nav.active_tab_group_id.clone();
        let Some(group) = self.state.group(&group_id) else {
            log::warn!("close_active_tab: no active group");
            return false;
        };
        let Some(item) = nav.active_item(&group_id).map(str::to_string) else {
            return false;
        };

        if group.pair(&item).is_some() {
            if let Some(first_tab) = group.first_tab_id().map(str::to_string) {
                nav.select_tab(&self.state, &group_id, &first_tab);
            } else {
                nav.set_active_item(&group_id, None);
            }
            log::debug!("Deactivated pair {} in group {}", item, group_id);
            return true;
        }
        if group.tab(&item).is_some() {
            return self.close_tab(nav, &group_id, &item);
        }
        false
    }
}

/// Post-removal focus: the tab that preceded the removed index, clamped
/// to the first; with no tabs left, the first remaining pair.
fn fallback_after_close(group: &TabGroup, removed_idx: usize) -> Option<ItemId> {
    if !group.tabs.is_empty() {
        let idx = removed_idx.saturating_sub(1).min(group.tabs.len() - 1);
        return Some(group.tabs[idx].id.clone());
    }
    group.first_pair_id().map(str::to_string)
}

/// Order-insensitive membership comparison for duplicate-pair detection.
fn same_members(a: &[TabId], b: &[TabId]) -> bool {
    a.len() == b.len() && a.iter().all(|t| b.contains(t)) && b.iter().all(|t| a.contains(t))
}
