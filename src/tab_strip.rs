//! Tab-strip model: what the strip shows and what its clicks mean.
//!
//! The engine builds a typed item list (group labels, tabs, pairs) from
//! the workspace and the window's navigation, then flattens it into plain
//! descriptors for whatever widget the host renders the strip with.
//! Actions coming back from the widget are routed by looking the id up
//! in the model, never by sniffing id prefixes.

use webdock_config::{GroupId, ItemKind, PairId, TabId};

use crate::session::SessionNav;
use crate::workspace::{TabGroup, WorkspaceManager, WorkspaceState};

/// One entry of the strip, in display order.
#[derive(Debug, Clone, PartialEq)]
pub enum TabStripItem {
    /// Heading for a group, showing how many items it holds.
    GroupLabel {
        group_id: GroupId,
        label: String,
        item_count: usize,
    },
    Tab {
        id: TabId,
        title: String,
        active: bool,
        closable: bool,
    },
    /// A split pair, titled after its members.
    Pair {
        id: PairId,
        title: String,
        active: bool,
    },
}

/// Flat, widget-ready form of a [`TabStripItem`].
#[derive(Debug, Clone, PartialEq)]
pub struct TabDescriptor {
    pub id: String,
    pub title: String,
    pub active: bool,
    pub closable: bool,
    pub kind: ItemKind,
}

/// An interaction reported by the host's strip widget.
#[derive(Debug, Clone, PartialEq)]
pub enum TabStripAction {
    Activate(String),
    Close(String),
    Reorder { id: String, from: usize, to: usize },
    ContextMenu { id: String, x: f32, y: f32 },
}

/// Build the strip for the session's active space.
///
/// Each group contributes its label, then its tabs, then its pairs. An
/// item is `active` only when it is the active item of the session's
/// active group.
pub fn build_items(ws: &WorkspaceState, nav: &SessionNav) -> Vec<TabStripItem> {
    let mut items = Vec::new();
    let Some(space) = ws.space(&nav.active_space_id) else {
        return items;
    };
    for group in ws.groups_in_space(space) {
        let in_active_group = group.id == nav.active_tab_group_id;
        let active_item = nav.active_item(&group.id);

        items.push(TabStripItem::GroupLabel {
            group_id: group.id.clone(),
            label: group.label.clone(),
            item_count: group.tabs.len() + group.pairs.len(),
        });

        for tab in &group.tabs {
            items.push(TabStripItem::Tab {
                id: tab.id.clone(),
                title: tab.title.clone(),
                active: in_active_group && active_item == Some(tab.id.as_str()),
                closable: !tab.pinned,
            });
        }

        for pair in &group.pairs {
            items.push(TabStripItem::Pair {
                id: pair.id.clone(),
                title: pair_title(group, &pair.tab_ids),
                active: in_active_group && active_item == Some(pair.id.as_str()),
            });
        }
    }
    items
}

fn pair_title(group: &TabGroup, tab_ids: &[TabId]) -> String {
    let names: Vec<&str> = tab_ids
        .iter()
        .filter_map(|id| group.tab(id).map(|t| t.title.as_str()))
        .collect();
    format!("\u{229e} {}", names.join(" | "))
}

/// Flatten typed items into plain descriptors for the strip widget.
///
/// Group labels and pairs are never closable through the strip, so their
/// descriptors say so instead of offering a dead close button.
pub fn flatten(items: &[TabStripItem]) -> Vec<TabDescriptor> {
    items
        .iter()
        .map(|item| match item {
            TabStripItem::GroupLabel {
                group_id, label, ..
            } => TabDescriptor {
                id: group_id.clone(),
                title: label.clone(),
                active: false,
                closable: false,
                kind: ItemKind::GroupLabel,
            },
            TabStripItem::Tab {
                id,
                title,
                active,
                closable,
            } => TabDescriptor {
                id: id.clone(),
                title: title.clone(),
                active: *active,
                closable: *closable,
                kind: ItemKind::Tab,
            },
            TabStripItem::Pair { id, title, active } => TabDescriptor {
                id: id.clone(),
                title: title.clone(),
                active: *active,
                closable: false,
                kind: ItemKind::Pair,
            },
        })
        .collect()
}

/// Apply a strip action to the workspace and navigation.
///
/// Returns whether anything changed. Unknown ids, closes on group labels
/// or pairs, and context-menu requests change nothing.
pub fn dispatch(
    action: &TabStripAction,
    manager: &mut WorkspaceManager,
    nav: &mut SessionNav,
) -> bool {
    match action {
        TabStripAction::Activate(id) => activate(id, manager, nav),
        TabStripAction::Close(id) => close(id, manager, nav),
        TabStripAction::Reorder { id, from, to } => reorder(id, *from, *to, manager),
        TabStripAction::ContextMenu { id, x, y } => {
            log::debug!("Context menu requested for {} at ({}, {})", id, x, y);
            false
        }
    }
}

fn activate(id: &str, manager: &WorkspaceManager, nav: &mut SessionNav) -> bool {
    let ws = manager.state();
    if ws.group(id).is_some() {
        nav.set_active_group(ws, id);
        return true;
    }
    for group in &ws.tab_groups {
        if group.tab(id).is_some() {
            nav.select_tab(ws, &group.id, id);
            return true;
        }
        if group.pair(id).is_some() {
            nav.select_pair(ws, &group.id, id);
            return true;
        }
    }
    log::warn!("Tab strip activation of unknown item {}", id);
    false
}

fn close(id: &str, manager: &mut WorkspaceManager, nav: &mut SessionNav) -> bool {
    let ws = manager.state();
    if ws.group(id).is_some() {
        log::debug!("Ignoring close on group label {}", id);
        return false;
    }
    let mut owning_group: Option<GroupId> = None;
    for group in &ws.tab_groups {
        if group.tab(id).is_some() {
            owning_group = Some(group.id.clone());
            break;
        }
        if group.pair(id).is_some() {
            // Pairs are dissolved through split, not the close button.
            log::debug!("Ignoring close on pair {}", id);
            return false;
        }
    }
    match owning_group {
        Some(group_id) => manager.close_tab(nav, &group_id, id),
        None => {
            log::warn!("Tab strip close of unknown item {}", id);
            false
        }
    }
}

fn reorder(id: &str, from: usize, to: usize, manager: &mut WorkspaceManager) -> bool {
    let ws = manager.state();
    if ws.group(id).is_none() {
        log::debug!("Ignoring reorder of non-group item {}", id);
        return false;
    }
    let Some(space) = ws.spaces.iter().find(|s| s.tab_group_ids.iter().any(|g| g == id)) else {
        log::warn!("Reordered group {} belongs to no space", id);
        return false;
    };
    let Some(target_id) = space.tab_group_ids.get(to).cloned() else {
        log::warn!("Reorder target position {} out of range", to);
        return false;
    };
    if target_id == id {
        return false;
    }
    let space_id = space.id.clone();
    log::debug!("Reordering group {} from {} to {}", id, from, to);
    manager.reorder_tab_groups(&space_id, id, &target_id)
}
