//! Integration tests for the document registry, readiness detection, and
//! split pairs as driven by the shell: container identity, garbage
//! collection, and the loading overlay.

mod common;

use std::time::Duration;

use common::{HostEvent, RecordingHost, memory_shell};
use webdock::document::{HostSlot, ProbeError};

#[tokio::test]
async fn container_identity_survives_tab_switching() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();

    shell.sync(&host);
    let container_1 = shell.registry().entry("tab_1").unwrap().container_id;
    let container_2 = shell.registry().entry("tab_2").unwrap().container_id;

    // Bounce focus back and forth; containers move, they are never
    // reopened.
    shell.select_tab(&host, "tg_1", "tab_2");
    shell.select_tab(&host, "tg_1", "tab_1");
    shell.select_tab(&host, "tg_1", "tab_2");

    assert_eq!(shell.registry().entry("tab_1").unwrap().container_id, container_1);
    assert_eq!(shell.registry().entry("tab_2").unwrap().container_id, container_2);
    assert_eq!(host.opens().len(), 2);
    assert!(host.unmounts().is_empty());
}

#[tokio::test]
async fn a_closed_tab_is_unmounted_and_never_resurrected() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();
    let extra = shell.add_tab(&host, "tg_1", "Logs", "/logs/").unwrap();
    let container = shell.registry().entry(&extra).unwrap().container_id;

    assert!(shell.close_tab(&host, "tg_1", &extra));
    assert_eq!(host.unmounts(), vec![container]);
    assert!(!shell.registry().is_mounted(&extra));

    // Further syncs never bring it back.
    shell.sync(&host);
    shell.select_tab(&host, "tg_1", "tab_2");
    shell.sync(&host);
    assert!(!shell.registry().is_mounted(&extra));
    assert_eq!(host.unmounts(), vec![container]);
}

#[tokio::test]
async fn unmount_happens_only_after_every_placement() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();
    let extra = shell.add_tab(&host, "tg_1", "Logs", "/logs/").unwrap();
    let container = shell.registry().entry(&extra).unwrap().container_id;

    shell.close_tab(&host, "tg_1", &extra);

    let events = host.events();
    let unmount_at = events
        .iter()
        .position(|e| *e == HostEvent::Unmount(container))
        .unwrap();
    assert!(
        events[unmount_at..]
            .iter()
            .all(|e| !matches!(e, HostEvent::Place(..)))
    );
}

#[tokio::test(start_paused = true)]
async fn overlay_stays_until_the_probe_sees_content() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();

    let composition = shell.sync(&host);
    assert_eq!(composition.overlay, vec!["tab_1".to_string()]);

    shell.mark_loaded("tab_1");
    tokio::time::sleep(Duration::from_millis(250)).await;
    // Still blank: the overlay stays up.
    assert_eq!(shell.sync(&host).overlay, vec!["tab_1".to_string()]);

    host.probe("tab_1").set_ready();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(shell.sync(&host).overlay.is_empty());
}

#[tokio::test(start_paused = true)]
async fn a_document_that_never_looks_ready_is_shown_after_the_deadline() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();

    shell.sync(&host);
    shell.mark_loaded("tab_1");

    tokio::time::sleep(Duration::from_secs(9)).await;
    assert_eq!(shell.sync(&host).overlay, vec!["tab_1".to_string()]);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(shell.sync(&host).overlay.is_empty());
}

#[tokio::test(start_paused = true)]
async fn a_cross_origin_document_counts_as_ready() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();

    shell.sync(&host);
    host.probe("tab_1").set(Err(ProbeError::CrossOrigin));
    shell.mark_loaded("tab_1");
    tokio::time::sleep(Duration::from_millis(1)).await;

    assert!(shell.sync(&host).overlay.is_empty());
}

#[tokio::test]
async fn creating_then_splitting_a_pair() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();

    let pair_id = shell
        .create_pair(&host, "tg_1", &["tab_1".to_string(), "tab_2".to_string()])
        .unwrap();
    let pair = shell.workspace().group("tg_1").unwrap().pair(&pair_id).unwrap().clone();
    assert_eq!(pair.ratios, vec![50.0, 50.0]);
    assert_eq!(shell.nav().active_item("tg_1"), Some(pair_id.as_str()));

    let composition = shell.sync(&host);
    assert_eq!(composition.split, Some(pair_id.clone()));
    assert_eq!(
        composition.visible,
        vec!["tab_1".to_string(), "tab_2".to_string()]
    );
    let container_1 = shell.registry().entry("tab_1").unwrap().container_id;
    let container_2 = shell.registry().entry("tab_2").unwrap().container_id;
    let events = host.events();
    assert!(events.contains(&HostEvent::Place(container_1, HostSlot::SplitSlot(0))));
    assert!(events.contains(&HostEvent::Place(container_2, HostSlot::SplitSlot(1))));

    assert!(shell.split_pair(&host, "tg_1", &pair_id));
    assert!(shell.workspace().group("tg_1").unwrap().pairs.is_empty());
    assert_eq!(shell.nav().active_item("tg_1"), Some("tab_1"));

    let composition = shell.sync(&host);
    assert_eq!(composition.split, None);
    assert_eq!(composition.visible, vec!["tab_1".to_string()]);
    // Splitting dissolved the layout, not the documents.
    assert_eq!(shell.registry().entry("tab_1").unwrap().container_id, container_1);
}

#[tokio::test]
async fn navigation_is_an_explicit_remount() {
    let mut shell = memory_shell();
    let host = RecordingHost::new();
    shell.sync(&host);
    let before = shell.registry().entry("tab_2").unwrap().container_id;

    // Re-syncing with unchanged state is not a navigation.
    shell.sync(&host);
    shell.sync(&host);
    assert_eq!(host.opens().len(), 2);

    assert!(shell.navigate_tab(&host, "tg_1", "tab_2", "/reports/"));
    let after = shell.registry().entry("tab_2").unwrap();
    assert_ne!(after.container_id, before);
    assert_eq!(after.url, "/reports/");
    assert_eq!(host.unmounts().len(), 1);
}
