// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{SHIFT_ID, VOLUNTEER_ID, at, create_test_assignment};
use crate::{Assignment, AssignmentPatch, AssignmentState, DomainError, compute_worked_hours};

fn assert_hours(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("hours should be set");
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected} hours, got {actual}"
    );
}

#[test]
fn test_new_assignment_is_assigned() {
    let assignment = Assignment::new(SHIFT_ID, VOLUNTEER_ID, Some(4), None);
    assert_eq!(assignment.state, AssignmentState::Assigned);
    assert!(assignment.check_in_at.is_none());
    assert!(assignment.hours.is_none());
    assert!(assignment.holds_slot(SHIFT_ID, VOLUNTEER_ID, Some(4)));
    assert!(!assignment.holds_slot(SHIFT_ID, VOLUNTEER_ID, None));
}

#[test]
fn test_check_in_then_check_out_derives_hours() {
    let assignment = create_test_assignment();

    let checked_in = assignment.check_in(at(9, 0, 0)).unwrap();
    assert_eq!(checked_in.state, AssignmentState::InProgress);
    assert_eq!(checked_in.check_in_at, Some(at(9, 0, 0)));

    let checked_out = checked_in.check_out(at(13, 30, 0)).unwrap();
    assert_eq!(checked_out.state, AssignmentState::Completed);
    assert_eq!(checked_out.check_out_at, Some(at(13, 30, 0)));
    assert_hours(checked_out.hours, 4.5);
}

#[test]
fn test_second_check_in_is_rejected() {
    let checked_in = create_test_assignment().check_in(at(9, 0, 0)).unwrap();
    assert_eq!(
        checked_in.check_in(at(9, 5, 0)).unwrap_err(),
        DomainError::AlreadyCheckedIn {
            shift_id: SHIFT_ID,
            volunteer_id: VOLUNTEER_ID,
        }
    );
}

#[test]
fn test_check_out_without_check_in_is_rejected() {
    assert_eq!(
        create_test_assignment().check_out(at(13, 0, 0)).unwrap_err(),
        DomainError::NotCheckedIn {
            shift_id: SHIFT_ID,
            volunteer_id: VOLUNTEER_ID,
        }
    );
}

#[test]
fn test_second_check_out_is_rejected() {
    let completed = create_test_assignment()
        .check_in(at(9, 0, 0))
        .unwrap()
        .check_out(at(12, 0, 0))
        .unwrap();
    assert!(matches!(
        completed.check_out(at(12, 30, 0)),
        Err(DomainError::AlreadyCheckedOut { .. })
    ));
    assert!(matches!(
        completed.check_in(at(12, 30, 0)),
        Err(DomainError::AlreadyCheckedIn { .. })
    ));
}

#[test]
fn test_removal_only_before_check_in() {
    let assignment = create_test_assignment();
    assert!(assignment.ensure_removable().is_ok());

    let checked_in = assignment.check_in(at(9, 0, 0)).unwrap();
    assert_eq!(
        checked_in.ensure_removable().unwrap_err(),
        DomainError::InvalidStateTransition {
            from: AssignmentState::InProgress,
            to: AssignmentState::Removed,
        }
    );
}

#[test]
fn test_state_machine_never_skips_a_state() {
    use AssignmentState::{Assigned, Completed, InProgress, Removed};
    assert!(Assigned.can_transition_to(InProgress));
    assert!(Assigned.can_transition_to(Removed));
    assert!(InProgress.can_transition_to(Completed));
    assert!(!Assigned.can_transition_to(Completed));
    assert!(!InProgress.can_transition_to(Assigned));
    assert!(!Completed.can_transition_to(InProgress));
    assert!(!Removed.can_transition_to(Assigned));
    assert!(Assigned.blocks_scheduling());
    assert!(InProgress.blocks_scheduling());
    assert!(!Completed.blocks_scheduling());
}

#[test]
fn test_state_strings_round_trip() {
    for state in [
        AssignmentState::Assigned,
        AssignmentState::InProgress,
        AssignmentState::Completed,
        AssignmentState::Removed,
    ] {
        assert_eq!(state.as_str().parse::<AssignmentState>().unwrap(), state);
    }
    assert!(matches!(
        "checked-in".parse::<AssignmentState>(),
        Err(DomainError::InvalidAssignmentState(_))
    ));
}

#[test]
fn test_worked_hours_round_to_two_decimals() {
    // 1 hour 20 minutes = 1.333... hours
    assert_hours(Some(compute_worked_hours(at(9, 0, 0), at(10, 20, 0))), 1.33);
    // 2 hours 50 minutes = 2.8333... hours
    assert_hours(Some(compute_worked_hours(at(9, 0, 0), at(11, 50, 0))), 2.83);
}

#[test]
fn test_worked_hours_never_negative() {
    assert_hours(Some(compute_worked_hours(at(10, 0, 0), at(9, 0, 0))), 0.0);
}

#[test]
fn test_patch_merges_only_given_fields() {
    let assignment = create_test_assignment();
    let patch = AssignmentPatch {
        notes: Some(String::from("brought own gloves")),
        task_id: Some(8),
        ..AssignmentPatch::default()
    };

    let patched = assignment.apply_patch(&patch).unwrap();
    assert_eq!(patched.notes.as_deref(), Some("brought own gloves"));
    assert_eq!(patched.task_id, Some(8));
    assert_eq!(patched.assigned_by, assignment.assigned_by);
    assert_eq!(patched.state, AssignmentState::Assigned);
}

#[test]
fn test_patch_recomputes_hours_from_corrected_timestamps() {
    let completed = create_test_assignment()
        .check_in(at(9, 0, 0))
        .unwrap()
        .check_out(at(13, 30, 0))
        .unwrap();

    let patch = AssignmentPatch {
        check_in_at: Some(at(10, 0, 0)),
        ..AssignmentPatch::default()
    };
    assert_hours(completed.apply_patch(&patch).unwrap().hours, 3.5);
}

#[test]
fn test_patch_explicit_hours_win() {
    let completed = create_test_assignment()
        .check_in(at(9, 0, 0))
        .unwrap()
        .check_out(at(13, 30, 0))
        .unwrap();

    let patch = AssignmentPatch {
        check_in_at: Some(at(10, 0, 0)),
        hours: Some(2.0),
        ..AssignmentPatch::default()
    };
    assert_hours(completed.apply_patch(&patch).unwrap().hours, 2.0);
}

#[test]
fn test_patch_rejects_inconsistent_corrections() {
    let completed = create_test_assignment()
        .check_in(at(9, 0, 0))
        .unwrap()
        .check_out(at(13, 30, 0))
        .unwrap();

    let inverted = AssignmentPatch {
        check_in_at: Some(at(12, 0, 0)),
        check_out_at: Some(at(11, 0, 0)),
        ..AssignmentPatch::default()
    };
    assert!(matches!(
        completed.apply_patch(&inverted),
        Err(DomainError::InvalidCorrection { .. })
    ));

    let negative = AssignmentPatch {
        hours: Some(-1.0),
        ..AssignmentPatch::default()
    };
    assert!(matches!(
        completed.apply_patch(&negative),
        Err(DomainError::InvalidCorrection { .. })
    ));
}

#[test]
fn test_patch_cannot_set_attendance_before_it_happens() {
    let assigned = create_test_assignment();
    for patch in [
        AssignmentPatch {
            check_in_at: Some(at(9, 0, 0)),
            ..AssignmentPatch::default()
        },
        AssignmentPatch {
            check_out_at: Some(at(12, 0, 0)),
            ..AssignmentPatch::default()
        },
        AssignmentPatch {
            hours: Some(3.0),
            ..AssignmentPatch::default()
        },
    ] {
        assert!(matches!(
            assigned.apply_patch(&patch),
            Err(DomainError::InvalidCorrection { .. })
        ));
    }

    let in_progress = assigned.check_in(at(9, 0, 0)).unwrap();
    for patch in [
        AssignmentPatch {
            check_out_at: Some(at(12, 0, 0)),
            ..AssignmentPatch::default()
        },
        AssignmentPatch {
            hours: Some(3.0),
            ..AssignmentPatch::default()
        },
    ] {
        assert!(matches!(
            in_progress.apply_patch(&patch),
            Err(DomainError::InvalidCorrection { .. })
        ));
    }

    // A wrong check-in may still be fixed while the shift is running.
    let corrected = in_progress
        .apply_patch(&AssignmentPatch {
            check_in_at: Some(at(8, 45, 0)),
            ..AssignmentPatch::default()
        })
        .unwrap();
    assert_eq!(corrected.check_in_at, Some(at(8, 45, 0)));
    assert_eq!(corrected.state, AssignmentState::InProgress);
    assert!(corrected.check_out_at.is_none());
    assert!(corrected.hours.is_none());
    assert!(corrected.check_out(at(12, 45, 0)).is_ok());
}

#[test]
fn test_empty_patch_detection() {
    assert!(AssignmentPatch::default().is_empty());
    assert!(
        !AssignmentPatch {
            hours: Some(1.0),
            ..AssignmentPatch::default()
        }
        .is_empty()
    );
}
