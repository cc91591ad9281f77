// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{at, create_stored_assignment, scope_with_assignment};
use crate::{Command, CoreError, EngineConfig, Scope, TransitionKind, TransitionResult, apply};
use shiftcall_domain::{AssignmentPatch, AssignmentState, DomainError};

#[test]
fn test_update_merges_notes() {
    let scope: Scope =
        scope_with_assignment(create_stored_assignment(1, AssignmentState::Assigned));
    let command = Command::UpdateAssignment {
        assignment_id: 1,
        patch: AssignmentPatch {
            notes: Some(String::from("late arrival expected")),
            ..AssignmentPatch::default()
        },
    };

    let result: TransitionResult =
        apply(&EngineConfig::default(), &scope, command, at(10, 0)).unwrap();

    assert_eq!(result.kind, TransitionKind::Updated);
    assert_eq!(
        result.assignment.notes.as_deref(),
        Some("late arrival expected")
    );
    assert_eq!(result.assignment.state, AssignmentState::Assigned);
}

#[test]
fn test_update_unknown_assignment_fails() {
    let command = Command::UpdateAssignment {
        assignment_id: 99,
        patch: AssignmentPatch::default(),
    };

    assert_eq!(
        apply(&EngineConfig::default(), &Scope::default(), command, at(10, 0)).unwrap_err(),
        CoreError::DomainViolation(DomainError::AssignmentNotFound { assignment_id: 99 })
    );
}

#[test]
fn test_update_corrects_completed_hours() {
    let scope: Scope =
        scope_with_assignment(create_stored_assignment(1, AssignmentState::Completed));
    let command = Command::UpdateAssignment {
        assignment_id: 1,
        patch: AssignmentPatch {
            check_out_at: Some(at(11, 15)),
            ..AssignmentPatch::default()
        },
    };

    let result: TransitionResult =
        apply(&EngineConfig::default(), &scope, command, at(14, 0)).unwrap();
    assert!((result.assignment.hours.unwrap() - 2.25).abs() < f64::EPSILON);
}

#[test]
fn test_update_cannot_check_out_a_running_assignment() {
    let scope: Scope =
        scope_with_assignment(create_stored_assignment(1, AssignmentState::InProgress));
    let command = Command::UpdateAssignment {
        assignment_id: 1,
        patch: AssignmentPatch {
            check_out_at: Some(at(12, 0)),
            hours: Some(3.0),
            ..AssignmentPatch::default()
        },
    };

    assert!(matches!(
        apply(&EngineConfig::default(), &scope, command, at(12, 5)),
        Err(CoreError::DomainViolation(DomainError::InvalidCorrection { .. }))
    ));
}

#[test]
fn test_update_into_held_slot_is_duplicate() {
    let mut scope: Scope =
        scope_with_assignment(create_stored_assignment(1, AssignmentState::Assigned));
    let mut tasked = create_stored_assignment(2, AssignmentState::Assigned);
    tasked.task_id = Some(4);
    scope.assignments.push(tasked);
    scope.task_exists = true;

    let command = Command::UpdateAssignment {
        assignment_id: 1,
        patch: AssignmentPatch {
            task_id: Some(4),
            ..AssignmentPatch::default()
        },
    };

    assert!(matches!(
        apply(&EngineConfig::default(), &scope, command, at(10, 0)),
        Err(CoreError::DomainViolation(
            DomainError::DuplicateAssignment { .. }
        ))
    ));
}

#[test]
fn test_remove_assigned_succeeds() {
    let scope: Scope =
        scope_with_assignment(create_stored_assignment(1, AssignmentState::Assigned));

    let result: TransitionResult = apply(
        &EngineConfig::default(),
        &scope,
        Command::RemoveAssignment { assignment_id: 1 },
        at(8, 0),
    )
    .unwrap();

    assert_eq!(result.kind, TransitionKind::Removed);
    assert_eq!(result.assignment.assignment_id, Some(1));
}

#[test]
fn test_remove_after_check_in_fails() {
    let scope: Scope =
        scope_with_assignment(create_stored_assignment(1, AssignmentState::InProgress));

    assert_eq!(
        apply(
            &EngineConfig::default(),
            &scope,
            Command::RemoveAssignment { assignment_id: 1 },
            at(10, 0),
        )
        .unwrap_err(),
        CoreError::DomainViolation(DomainError::InvalidStateTransition {
            from: AssignmentState::InProgress,
            to: AssignmentState::Removed,
        })
    );
}
