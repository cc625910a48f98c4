//! Shared id aliases, item discriminants, and the embed policy strings.

use serde::{Deserialize, Serialize};

/// Identifier of a single tab (`tab_<n>`).
pub type TabId = String;
/// Identifier of a side-by-side tab pair (`pair_<n>`).
pub type PairId = String;
/// Identifier of a tab group (`tg_<n>`).
pub type GroupId = String;
/// Identifier of a space (`space_<n>`).
pub type SpaceId = String;
/// Identifier of a group's active item: either a [`TabId`] or a [`PairId`].
pub type ItemId = String;

/// Discriminant carried by flattened tab-strip descriptors so consumers can
/// tell synthetic group labels, tabs, and pairs apart without inspecting id
/// strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Synthetic row representing a collapsible group header.
    GroupLabel,
    /// A regular tab.
    Tab,
    /// A split pair.
    Pair,
}

/// Sandbox attribute applied verbatim to every embedded document.
///
/// This is a bit-exact contract with the embedded content; loosening or
/// tightening it changes what embedded applications can do.
pub const SANDBOX_POLICY: &str =
    "allow-scripts allow-same-origin allow-forms allow-popups allow-modals";

/// Permissions-policy `allow` attribute applied verbatim to every embedded
/// document. Same bit-exact contract as [`SANDBOX_POLICY`].
pub const ALLOW_POLICY: &str = "clipboard-read; clipboard-write; fullscreen";
