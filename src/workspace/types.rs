//! Core types for the workspace model
//!
//! This module defines the persisted data structures of the shell:
//! - Tabs, split pairs, and the groups that own them
//! - Spaces (named collections of groups)
//! - The root `WorkspaceState` aggregate with its monotonic ID counter
//!
//! Per-window navigation (which item is active where) deliberately lives
//! outside these types, in [`crate::session::SessionNav`], so several
//! windows can share one workspace while focusing different items.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use webdock_config::layout_constants::{RATIO_EPSILON, RATIO_TOTAL};
use webdock_config::{GroupId, PairId, SpaceId, TabId};

fn is_false(v: &bool) -> bool {
    !*v
}

/// One embedded-content slot with a URL and title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    pub id: TabId,
    pub title: String,
    pub url: String,
    /// Pinned tabs cannot be closed.
    #[serde(default, skip_serializing_if = "is_false")]
    pub pinned: bool,
}

impl Tab {
    pub fn new(id: impl Into<TabId>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            pinned: false,
        }
    }
}

/// Two tabs rendered side by side in a resizable split.
///
/// `ratios` are percentages summing to [`RATIO_TOTAL`]; older persisted
/// states carried raw flex weights (e.g. `[3, 1]`) and are rescaled by
/// [`TabPair::normalize_ratios`] on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabPair {
    pub id: PairId,
    /// Member tabs, left to right. Always two today; the math below stays
    /// generic over the length.
    pub tab_ids: Vec<TabId>,
    pub ratios: Vec<f32>,
}

impl TabPair {
    /// Create a pair with equal shares for every member.
    pub fn new(id: impl Into<PairId>, tab_ids: Vec<TabId>) -> Self {
        let share = RATIO_TOTAL / tab_ids.len().max(1) as f32;
        let ratios = vec![share; tab_ids.len()];
        Self {
            id: id.into(),
            tab_ids,
            ratios,
        }
    }

    /// Rescale `ratios` so they sum to [`RATIO_TOTAL`].
    ///
    /// A count mismatch or non-positive sum resets to equal shares.
    pub fn normalize_ratios(&mut self) {
        let n = self.tab_ids.len().max(1);
        let sum: f32 = self.ratios.iter().sum();
        if self.ratios.len() != self.tab_ids.len() || sum <= 0.0 {
            self.ratios = vec![RATIO_TOTAL / n as f32; self.tab_ids.len()];
            return;
        }
        if (sum - RATIO_TOTAL).abs() > RATIO_EPSILON {
            for r in &mut self.ratios {
                *r = *r / sum * RATIO_TOTAL;
            }
        }
    }
}

/// An ordered collection of tabs and pairs, owned exclusively by one space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabGroup {
    pub id: GroupId,
    pub label: String,
    pub tabs: Vec<Tab>,
    pub pairs: Vec<TabPair>,
    /// Display order within the space.
    pub order: u32,
}

impl TabGroup {
    pub fn new(id: impl Into<GroupId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            tabs: Vec::new(),
            pairs: Vec::new(),
            order: 0,
        }
    }

    pub fn tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    pub fn tab_mut(&mut self, tab_id: &str) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|t| t.id == tab_id)
    }

    pub fn tab_index(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    pub fn pair(&self, pair_id: &str) -> Option<&TabPair> {
        self.pairs.iter().find(|p| p.id == pair_id)
    }

    pub fn pair_mut(&mut self, pair_id: &str) -> Option<&mut TabPair> {
        self.pairs.iter_mut().find(|p| p.id == pair_id)
    }

    pub fn first_tab_id(&self) -> Option<&str> {
        self.tabs.first().map(|t| t.id.as_str())
    }

    pub fn first_pair_id(&self) -> Option<&str> {
        self.pairs.first().map(|p| p.id.as_str())
    }

    /// IDs of every pair that references `tab_id`.
    pub fn pairs_containing(&self, tab_id: &str) -> Vec<PairId> {
        self.pairs
            .iter()
            .filter(|p| p.tab_ids.iter().any(|t| t == tab_id))
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty() && self.pairs.is_empty()
    }
}

/// A named collection of tab groups; the top-level workspace partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: SpaceId,
    pub name: String,
    pub icon: String,
    /// Group IDs belonging to this space, in display order.
    pub tab_group_ids: Vec<GroupId>,
}

/// Root aggregate: shared, persisted, visible to every window.
///
/// `next_id` is the sole ID source; every created entity consumes and
/// increments it, so IDs are never reused within a workspace's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceState {
    pub spaces: Vec<Space>,
    pub tab_groups: Vec<TabGroup>,
    pub next_id: u64,
}

impl WorkspaceState {
    /// Consume the counter and mint an ID like `tab_7` or `pair_12`.
    pub fn generate_id(&mut self, prefix: &str) -> String {
        let id = format!("{}_{}", prefix, self.next_id);
        self.next_id += 1;
        id
    }

    pub fn space(&self, space_id: &str) -> Option<&Space> {
        self.spaces.iter().find(|s| s.id == space_id)
    }

    pub fn space_mut(&mut self, space_id: &str) -> Option<&mut Space> {
        self.spaces.iter_mut().find(|s| s.id == space_id)
    }

    pub fn group(&self, group_id: &str) -> Option<&TabGroup> {
        self.tab_groups.iter().find(|g| g.id == group_id)
    }

    pub fn group_mut(&mut self, group_id: &str) -> Option<&mut TabGroup> {
        self.tab_groups.iter_mut().find(|g| g.id == group_id)
    }

    /// Groups of `space`, in the space's display order.
    pub fn groups_in_space<'a>(&'a self, space: &Space) -> Vec<&'a TabGroup> {
        space
            .tab_group_ids
            .iter()
            .filter_map(|id| self.group(id))
            .collect()
    }

    /// Every tab ID in the workspace, across all groups.
    pub fn all_tab_ids(&self) -> HashSet<TabId> {
        self.tab_groups
            .iter()
            .flat_map(|g| g.tabs.iter().map(|t| t.id.clone()))
            .collect()
    }

    /// Repair a freshly loaded state so the invariants above hold.
    ///
    /// Tolerates whatever an older version (or a crashed save) left behind:
    /// prunes dangling group references, drops pairs whose tabs are gone,
    /// rescales legacy flex-weight ratios, and bumps `next_id` past any ID
    /// already in use. An unusable state is replaced by the default
    /// workspace rather than surfaced as an error.
    pub fn normalize(&mut self) {
        if self.spaces.is_empty() || self.tab_groups.is_empty() {
            log::warn!("Workspace state has no spaces or groups, resetting to default");
            *self = default_workspace();
            return;
        }

        let known_groups: HashSet<&str> =
            self.tab_groups.iter().map(|g| g.id.as_str()).collect();
        for space in &mut self.spaces {
            let before = space.tab_group_ids.len();
            space.tab_group_ids.retain(|id| known_groups.contains(id.as_str()));
            if space.tab_group_ids.len() != before {
                log::warn!(
                    "Space {} referenced {} missing group(s), pruned",
                    space.id,
                    before - space.tab_group_ids.len()
                );
            }
        }

        for group in &mut self.tab_groups {
            let tab_ids: HashSet<&str> = group.tabs.iter().map(|t| t.id.as_str()).collect();
            let before = group.pairs.len();
            group.pairs.retain(|p| {
                p.tab_ids.len() >= 2 && p.tab_ids.iter().all(|t| tab_ids.contains(t.as_str()))
            });
            if group.pairs.len() != before {
                log::warn!(
                    "Group {} had {} pair(s) referencing missing tabs, dropped",
                    group.id,
                    before - group.pairs.len()
                );
            }
            for pair in &mut group.pairs {
                pair.normalize_ratios();
            }
        }

        let max_used = self.max_used_ordinal();
        if self.next_id <= max_used {
            log::warn!(
                "next_id {} is not past the largest used ordinal {}, bumping",
                self.next_id,
                max_used
            );
            self.next_id = max_used + 1;
        }
    }

    /// Largest numeric suffix among all entity IDs.
    fn max_used_ordinal(&self) -> u64 {
        let spaces = self.spaces.iter().map(|s| s.id.as_str());
        let groups = self.tab_groups.iter().map(|g| g.id.as_str());
        let tabs = self
            .tab_groups
            .iter()
            .flat_map(|g| g.tabs.iter().map(|t| t.id.as_str()));
        let pairs = self
            .tab_groups
            .iter()
            .flat_map(|g| g.pairs.iter().map(|p| p.id.as_str()));
        spaces
            .chain(groups)
            .chain(tabs)
            .chain(pairs)
            .filter_map(id_ordinal)
            .max()
            .unwrap_or(0)
    }
}

fn id_ordinal(id: &str) -> Option<u64> {
    id.rsplit('_').next()?.parse().ok()
}

/// The workspace a fresh install starts with: one "Dev" space holding one
/// "Editor" group with a pinned code tab and a kanban tab.
pub fn default_workspace() -> WorkspaceState {
    WorkspaceState {
        spaces: vec![Space {
            id: "space_1".to_string(),
            name: "Dev".to_string(),
            icon: "code".to_string(),
            tab_group_ids: vec!["tg_1".to_string()],
        }],
        tab_groups: vec![TabGroup {
            id: "tg_1".to_string(),
            label: "Editor".to_string(),
            tabs: vec![
                Tab {
                    id: "tab_1".to_string(),
                    title: "Code".to_string(),
                    url: "/editor/".to_string(),
                    pinned: true,
                },
                Tab {
                    id: "tab_2".to_string(),
                    title: "Kanban".to_string(),
                    url: "/board/".to_string(),
                    pinned: false,
                },
            ],
            pairs: Vec::new(),
            order: 0,
        }],
        next_id: 10,
    }
}
