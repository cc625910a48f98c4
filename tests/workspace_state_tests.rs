//! Integration tests for workspace mutations driven through the shell:
//! close fallbacks, pinned tabs, and space lifecycle.

mod common;

use common::{RecordingHost, memory_shell};

#[tokio::test]
async fn closing_the_active_tab_next_to_a_pinned_one_falls_back_to_it() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();

    // Default group: pinned "Code" (tab_1) then "Kanban" (tab_2).
    shell.select_tab(&host, "tg_1", "tab_2");
    assert!(shell.close_tab(&host, "tg_1", "tab_2"));

    let group = shell.workspace().group("tg_1").unwrap();
    assert_eq!(group.tabs.len(), 1);
    assert_eq!(group.tabs[0].id, "tab_1");
    assert_eq!(shell.nav().active_item("tg_1"), Some("tab_1"));
}

#[tokio::test]
async fn closing_a_middle_tab_focuses_the_preceding_one() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();
    let extra = shell.add_tab(&host, "tg_1", "Logs", "/logs/").unwrap();

    // Focus the middle tab and close it.
    shell.select_tab(&host, "tg_1", "tab_2");
    assert!(shell.close_tab(&host, "tg_1", "tab_2"));
    assert_eq!(shell.nav().active_item("tg_1"), Some("tab_1"));

    // The later tab is untouched.
    assert!(shell.workspace().group("tg_1").unwrap().tab(&extra).is_some());
}

#[tokio::test]
async fn pinned_tabs_cannot_be_closed() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();

    assert!(!shell.close_tab(&host, "tg_1", "tab_1"));
    assert!(shell.workspace().group("tg_1").unwrap().tab("tab_1").is_some());

    // The close-active shortcut respects the pin too.
    shell.select_tab(&host, "tg_1", "tab_1");
    assert!(!shell.close_active_tab(&host));
    assert!(shell.workspace().group("tg_1").unwrap().tab("tab_1").is_some());
}

#[tokio::test]
async fn closing_an_inactive_tab_keeps_focus() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();
    let extra = shell.add_tab(&host, "tg_1", "Logs", "/logs/").unwrap();

    assert_eq!(shell.nav().active_item("tg_1"), Some(extra.as_str()));
    assert!(shell.close_tab(&host, "tg_1", "tab_2"));
    assert_eq!(shell.nav().active_item("tg_1"), Some(extra.as_str()));
}

#[tokio::test]
async fn add_space_consumes_one_id_for_the_space_and_one_for_its_group() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();
    assert_eq!(shell.workspace().next_id, 10);

    let space_id = shell.add_space(&host, "Design");

    assert_eq!(space_id, "space_10");
    let ws = shell.workspace();
    assert_eq!(ws.next_id, 12);
    let space = ws.space("space_10").unwrap();
    assert_eq!(space.name, "Design");
    assert_eq!(space.tab_group_ids, vec!["tg_11".to_string()]);
    let group = ws.group("tg_11").unwrap();
    assert!(group.tabs.is_empty());
    assert!(group.pairs.is_empty());

    // The new, empty space is what the window now shows.
    assert_eq!(shell.nav().active_space_id, "space_10");
    let composition = shell.sync(&host);
    assert!(composition.empty);
}

#[tokio::test]
async fn the_last_space_cannot_be_deleted() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();

    assert!(!shell.delete_space(&host, "space_1"));
    assert_eq!(shell.workspace().spaces.len(), 1);
}

#[tokio::test]
async fn deleting_a_space_cascades_and_refocuses() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();
    let space_id = shell.add_space(&host, "Design");
    shell.add_tab(&host, "tg_11", "Mock", "/mock/");
    assert_eq!(shell.nav().active_space_id, space_id);

    assert!(shell.delete_space(&host, &space_id));

    let ws = shell.workspace();
    assert!(ws.space(&space_id).is_none());
    assert!(ws.group("tg_11").is_none());
    assert_eq!(shell.nav().active_space_id, "space_1");
    assert_eq!(shell.nav().active_tab_group_id, "tg_1");

    // The cascaded tab's document is gone from the registry.
    shell.sync(&host);
    assert!(!shell.registry().is_mounted("tab_12"));
}

#[tokio::test]
async fn renames_show_up_in_the_tab_strip() {
    let mut shell = memory_shell();
    shell.rename_tab("tg_1", "tab_2", "Planning");

    let strip = shell.tab_strip();
    assert!(strip.iter().any(|d| d.id == "tab_2" && d.title == "Planning"));
}
