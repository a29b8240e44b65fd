use studio_core::{EntryKind, EntryUpdate, StatusLog, STATUS_LOG_CAPACITY};

#[test]
fn append_assigns_increasing_ids_in_creation_order() {
    let mut log = StatusLog::new();
    let first = log.append("AI face swap", "template: 模板 1", EntryKind::Processing);
    let second = log.append("AI face swap", "template: 模板 2", EntryKind::Processing);

    assert!(second > first);
    let ids: Vec<_> = log.entries().iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn update_merges_partial_fields_in_place() {
    let mut log = StatusLog::new();
    let id = log.append("AI face swap", "template: 模板 2", EntryKind::Processing);

    log.update(
        id,
        EntryUpdate {
            description: Some("swapping (60%)".to_string()),
            ..EntryUpdate::default()
        },
    );
    let entry = &log.entries()[0];
    assert_eq!(entry.description, "swapping (60%)");
    assert_eq!(entry.kind, EntryKind::Processing);

    log.update(
        id,
        EntryUpdate {
            kind: Some(EntryKind::Completed),
            result_url: Some("https://x/r.jpg".to_string()),
            template_name: Some("模板 2".to_string()),
            ..EntryUpdate::default()
        },
    );
    let entry = &log.entries()[0];
    assert_eq!(entry.kind, EntryKind::Completed);
    assert_eq!(entry.result_url.as_deref(), Some("https://x/r.jpg"));
    assert_eq!(entry.template_name.as_deref(), Some("模板 2"));
    // Untouched fields survive the merge.
    assert_eq!(entry.description, "swapping (60%)");
    assert_eq!(entry.title, "AI face swap");
}

#[test]
fn trim_evicts_oldest_entries_beyond_the_bound() {
    let mut log = StatusLog::new();
    for n in 1..=6 {
        log.append("AI face swap", format!("attempt {n}"), EntryKind::Processing);
    }
    assert_eq!(log.len(), 6);

    log.trim();
    assert_eq!(log.len(), STATUS_LOG_CAPACITY);
    let ids: Vec<_> = log.entries().iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![2, 3, 4, 5, 6]);
    // Survivors keep their last-known fields.
    assert_eq!(log.entries()[0].description, "attempt 2");
}

#[test]
fn trim_below_capacity_is_a_noop() {
    let mut log = StatusLog::new();
    log.append("AI face swap", "only one", EntryKind::Processing);
    log.trim();
    assert_eq!(log.len(), 1);
}

#[test]
fn update_of_an_evicted_entry_is_a_silent_noop() {
    let mut log = StatusLog::new();
    let evicted = log.append("AI face swap", "doomed", EntryKind::Processing);
    for n in 2..=6 {
        log.append("AI face swap", format!("attempt {n}"), EntryKind::Processing);
    }
    log.trim();
    assert!(log.entries().iter().all(|entry| entry.id != evicted));

    // Must not panic or resurrect the entry.
    log.update(
        evicted,
        EntryUpdate {
            kind: Some(EntryKind::Error),
            description: Some("too late".to_string()),
            ..EntryUpdate::default()
        },
    );
    assert_eq!(log.len(), STATUS_LOG_CAPACITY);
    assert!(log.entries().iter().all(|entry| entry.id != evicted));
}
