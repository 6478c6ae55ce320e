use cursus_core::campus::{decode_campus_records, is_piscine_record, RecordError};
use cursus_core::{
    default_curriculum, filter_cursus_records, summarize_records, DashboardService, DisplayStatus,
    StatusFilter, SubmissionStatus,
};
use serde_json::json;

fn campus_payload() -> String {
    json!([
        {
            "id": 101,
            "status": "finished",
            "validated?": true,
            "final_mark": 125.0,
            "marked_at": "2025-01-10T12:00:00.000Z",
            "retriable_count": 0,
            "project": { "name": "Libft", "slug": "42cursus-libft" }
        },
        {
            "id": 102,
            "status": "finished",
            "validated?": false,
            "final_mark": 42.4,
            "project": { "name": "push_swap", "slug": "42cursus-push_swap" }
        },
        {
            "id": 103,
            "status": "waiting_for_correction",
            "validated?": null,
            "final_mark": null,
            "project": { "name": "Born2beroot", "slug": "born2beroot" }
        },
        {
            "id": 104,
            "status": "finished",
            "validated?": true,
            "project": { "name": "C Piscine Shell 00", "slug": "c-piscine-shell-00" }
        },
        {
            "id": 105,
            "status": "parent",
            "project": { "name": "Python Modules", "slug": "python-module-00" }
        }
    ])
    .to_string()
}

#[test]
fn decodes_campus_fields() {
    let records = decode_campus_records(&campus_payload()).unwrap();
    assert_eq!(records.len(), 5);

    let libft = &records[0];
    assert_eq!(libft.id, 101);
    assert_eq!(libft.slug, "42cursus-libft");
    assert_eq!(libft.name, "Libft");
    assert_eq!(libft.status, SubmissionStatus::Finished);
    assert_eq!(libft.validated, Some(true));
    assert_eq!(libft.final_mark, Some(125));
    assert_eq!(libft.marked_at.as_deref(), Some("2025-01-10T12:00:00.000Z"));

    assert_eq!(records[1].final_mark, Some(42));
    assert_eq!(records[2].validated, None);
    assert_eq!(records[4].status, SubmissionStatus::Other("parent".to_string()));
}

#[test]
fn non_object_items_are_skipped_not_fatal() {
    let payload = json!([
        42,
        { "id": 1, "status": "in_progress", "project": { "slug": "libft" } },
        "libft",
        [1, "finished", true]
    ])
    .to_string();

    let records = decode_campus_records(&payload).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].slug, "libft");
    assert_eq!(records[0].name, "Unknown");
}

#[test]
fn mistyped_fields_fall_back_to_defaults() {
    let payload = json!([
        { "id": "not-a-number", "project": 7, "final_mark": "high" },
        {
            "id": 1,
            "status": "finished",
            "validated?": true,
            "retriable_count": -1,
            "marked_at": 20250110,
            "project": { "name": ["Libft"], "slug": "42cursus-libft" }
        }
    ])
    .to_string();

    let records = decode_campus_records(&payload).unwrap();
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].id, 0);
    assert_eq!(records[0].slug, "");
    assert_eq!(records[0].final_mark, None);

    let libft = &records[1];
    assert_eq!(libft.id, 1);
    assert_eq!(libft.retries_count, 0);
    assert_eq!(libft.marked_at, None);
    assert_eq!(libft.name, "Unknown");
    assert!(libft.is_passed());

    let dashboard = DashboardService::new(default_curriculum()).build(records);
    let libft = dashboard
        .projects
        .iter()
        .find(|project| project.id == "libft")
        .unwrap();
    assert_eq!(libft.status, DisplayStatus::Completed);
}

#[test]
fn non_array_payload_is_rejected() {
    assert!(matches!(
        decode_campus_records(r#"{"error":"unauthorized"}"#),
        Err(RecordError::NotAnArray("object"))
    ));
    assert!(matches!(
        decode_campus_records("not json"),
        Err(RecordError::Json(_))
    ));
}

#[test]
fn piscine_records_are_filtered_before_stats() {
    let records = decode_campus_records(&campus_payload()).unwrap();
    assert!(is_piscine_record(&records[3]));

    let cursus = filter_cursus_records(records);
    assert_eq!(cursus.len(), 4);

    let stats = summarize_records(&cursus);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.in_progress, 1);
}

#[test]
fn dashboard_combines_reconcile_counts_and_stats() {
    let service = DashboardService::new(default_curriculum());
    let dashboard = service.build_from_payload(&campus_payload()).unwrap();

    assert_eq!(dashboard.projects.len(), default_curriculum().project_count());
    assert_eq!(dashboard.stats.total, 4);
    assert_eq!(dashboard.counts.completed, 1);
    assert_eq!(dashboard.counts.failed, 1);
    assert_eq!(dashboard.counts.in_progress, 1);

    let completed = dashboard.visible(StatusFilter::Only(DisplayStatus::Completed));
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, "libft");
    assert_eq!(completed[0].final_mark, Some(125));

    let circles = dashboard.by_circle();
    assert_eq!(circles.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(circles[&1].len(), 1);
}
