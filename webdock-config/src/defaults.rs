//! Default value functions for configuration.
//!
//! Free functions used as `#[serde(default = "crate::defaults::...")]`
//! attributes on `Config` fields, so that configs written by older versions
//! pick up sensible values for fields they do not mention.

use crate::layout_constants;

pub fn space_name() -> String {
    "Dev".to_string()
}

pub fn space_icon() -> String {
    "code".to_string()
}

pub fn group_label() -> String {
    "Main".to_string()
}

pub fn tab_title() -> String {
    "New Tab".to_string()
}

pub fn tab_url() -> String {
    "about:blank".to_string()
}

pub fn ready_poll_interval_ms() -> u64 {
    layout_constants::READY_POLL_INTERVAL_MS
}

pub fn ready_timeout_ms() -> u64 {
    layout_constants::READY_TIMEOUT_MS
}

pub fn min_content_height() -> f32 {
    layout_constants::MIN_CONTENT_HEIGHT_PX
}

pub fn min_ratio_percent() -> f32 {
    layout_constants::MIN_RATIO_PERCENT
}

pub fn divider_width() -> f32 {
    layout_constants::DEFAULT_DIVIDER_WIDTH
}
