//! Ratio math for split pairs.
//!
//! A [`SplitLayout`] is a pure model of one pair's pane shares, expressed
//! in percent and always summing to [`RATIO_TOTAL`]. Dragging a divider
//! transfers share between exactly the two panes it separates; every pane
//! keeps at least the configured floor so nothing can be squeezed to
//! zero width.

use webdock_config::layout_constants::{MIN_RATIO_PERCENT, RATIO_EPSILON, RATIO_TOTAL};

use crate::workspace::TabPair;

/// Pane shares of one split pair, in percent.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitLayout {
    ratios: Vec<f32>,
    min_ratio: f32,
}

impl SplitLayout {
    /// Build a layout from a pair's stored ratios, normalized to sum 100.
    ///
    /// A ratio list that does not match the pair's panes, or that sums to
    /// nothing, falls back to equal shares; legacy flex weights (for
    /// example `[3, 1]`) are rescaled.
    pub fn from_pair(pair: &TabPair) -> Self {
        let count = pair.tab_ids.len().max(1);
        let mut ratios = pair.ratios.clone();
        let sum: f32 = ratios.iter().sum();
        if ratios.len() != count || sum <= 0.0 {
            ratios = vec![RATIO_TOTAL / count as f32; count];
        } else if (sum - RATIO_TOTAL).abs() > RATIO_EPSILON {
            for ratio in &mut ratios {
                *ratio = *ratio / sum * RATIO_TOTAL;
            }
        }
        Self {
            ratios,
            min_ratio: MIN_RATIO_PERCENT,
        }
    }

    /// Override the floor on a pane's share, in percent.
    pub fn with_min_ratio(mut self, percent: f32) -> Self {
        self.min_ratio = percent;
        self
    }

    pub fn ratios(&self) -> &[f32] {
        &self.ratios
    }

    /// Drag divider `index` (between panes `index` and `index + 1`) by
    /// `delta_percent`, positive toward the right pane.
    ///
    /// Only the two neighboring panes change; both are clamped to the
    /// floor and their combined share is conserved. Returns whether the
    /// layout changed.
    pub fn drag_divider(&mut self, index: usize, delta_percent: f32) -> bool {
        if index + 1 >= self.ratios.len() {
            log::warn!(
                "drag_divider: no divider {} in a {}-pane split",
                index,
                self.ratios.len()
            );
            return false;
        }
        let left = self.ratios[index];
        let right = self.ratios[index + 1];
        let combined = left + right;
        let new_left = (left + delta_percent).clamp(self.min_ratio, combined - self.min_ratio);
        if (new_left - left).abs() < RATIO_EPSILON {
            return false;
        }
        self.ratios[index] = new_left;
        // Derived from the pooled share, so the sum cannot drift.
        self.ratios[index + 1] = combined - new_left;
        true
    }

    /// Drag divider `index` to an absolute pixel `position` within a
    /// region `total_width` wide. Mouse-driven variant of
    /// [`drag_divider`](Self::drag_divider).
    pub fn drag_divider_to(&mut self, index: usize, position: f32, total_width: f32) -> bool {
        if total_width <= 0.0 {
            return false;
        }
        let target: f32 = (position / total_width) * RATIO_TOTAL;
        let current: f32 = self.ratios.iter().take(index + 1).sum();
        self.drag_divider(index, target - current)
    }

    /// Pixel width of each pane given the region width and the width of
    /// the dividers between panes.
    pub fn pane_widths(&self, total_width: f32, divider_width: f32) -> Vec<f32> {
        let dividers = self.ratios.len().saturating_sub(1) as f32;
        let available = (total_width - dividers * divider_width).max(0.0);
        self.ratios
            .iter()
            .map(|ratio| available * ratio / RATIO_TOTAL)
            .collect()
    }
}
