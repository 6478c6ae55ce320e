use cursus_core::progress::{module_states_from_records, rounded_percentage};
use cursus_core::{compute_progress, ModuleState, RawSubmissionRecord, SubmissionStatus};
use std::collections::HashMap;

#[test]
fn zero_modules_report_zero_percent() {
    let summary = compute_progress("python-module", 0, &HashMap::new());
    assert_eq!(summary.completed, 0);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.percentage, 0);
    assert!(!summary.is_complete());
    assert!(!summary.is_started());
}

#[test]
fn six_of_eleven_rounds_to_fifty_five() {
    let states = (0..6)
        .map(|index| (format!("python-module-{index:02}"), ModuleState::Completed))
        .collect::<HashMap<_, _>>();

    let summary = compute_progress("python-module", 11, &states);
    assert_eq!(summary.completed, 6);
    assert_eq!(summary.total, 11);
    assert_eq!(summary.percentage, 55);
}

#[test]
fn states_from_records_ignore_other_projects() {
    let records = vec![
        RawSubmissionRecord::new(1, "python-module-00", SubmissionStatus::Finished, Some(true)),
        RawSubmissionRecord::new(2, "python-module-01", SubmissionStatus::InProgress, None),
        RawSubmissionRecord::new(3, "python-module-02", SubmissionStatus::CreatingGroup, None),
        RawSubmissionRecord::new(4, "python-module-11", SubmissionStatus::Finished, Some(true)),
        RawSubmissionRecord::new(5, "libft", SubmissionStatus::Finished, Some(true)),
    ];

    let states = module_states_from_records("python-module", 11, &records);
    assert_eq!(states.len(), 3);
    assert_eq!(states["python-module-00"], ModuleState::Completed);
    assert_eq!(states["python-module-01"], ModuleState::InProgress);
    assert_eq!(states["python-module-02"], ModuleState::NotStarted);

    let summary = compute_progress("python-module", 11, &states);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.in_progress, 1);
}

#[test]
fn later_record_wins_for_duplicate_submodule() {
    let records = vec![
        RawSubmissionRecord::new(1, "python-module-03", SubmissionStatus::Finished, Some(false)),
        RawSubmissionRecord::new(2, "python-module-03", SubmissionStatus::Finished, Some(true)),
    ];
    let states = module_states_from_records("python-module", 11, &records);
    assert_eq!(states["python-module-03"], ModuleState::Completed);
}

#[test]
fn percentage_is_bounded() {
    for total in 1..=20 {
        for part in 0..=total {
            let percentage = rounded_percentage(part, total);
            assert!(percentage <= 100);
        }
        assert_eq!(rounded_percentage(total, total), 100);
    }
}
