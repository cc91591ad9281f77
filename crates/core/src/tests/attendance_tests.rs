// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    ORGANIZATION_ID, SHIFT_ID, VOLUNTEER_ID, at, create_stored_assignment, scope_with_assignment,
};
use crate::{Command, CoreError, EngineConfig, Scope, TransitionKind, TransitionResult, apply};
use shiftcall_domain::{AUTO_LOG_NOTE, AssignmentState, DomainError, HoursStatus};

const fn check_in() -> Command {
    Command::CheckIn {
        shift_id: SHIFT_ID,
        volunteer_id: VOLUNTEER_ID,
    }
}

const fn check_out() -> Command {
    Command::CheckOut {
        shift_id: SHIFT_ID,
        volunteer_id: VOLUNTEER_ID,
    }
}

#[test]
fn test_check_in_moves_to_in_progress() {
    let scope: Scope =
        scope_with_assignment(create_stored_assignment(1, AssignmentState::Assigned));

    let result: TransitionResult =
        apply(&EngineConfig::default(), &scope, check_in(), at(9, 0)).unwrap();

    assert_eq!(result.kind, TransitionKind::CheckedIn);
    assert_eq!(result.assignment.state, AssignmentState::InProgress);
    assert_eq!(result.assignment.check_in_at, Some(at(9, 0)));
    assert_eq!(result.assignment.assignment_id, Some(1));
}

#[test]
fn test_check_in_without_assignment_fails() {
    let err: CoreError =
        apply(&EngineConfig::default(), &Scope::default(), check_in(), at(9, 0)).unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::AssignmentNotFoundForVolunteer {
            shift_id: SHIFT_ID,
            volunteer_id: VOLUNTEER_ID,
        })
    );
}

#[test]
fn test_second_check_in_fails() {
    let scope: Scope =
        scope_with_assignment(create_stored_assignment(1, AssignmentState::InProgress));

    assert!(matches!(
        apply(&EngineConfig::default(), &scope, check_in(), at(9, 5)),
        Err(CoreError::DomainViolation(
            DomainError::AlreadyCheckedIn { .. }
        ))
    ));
}

#[test]
fn test_check_in_prefers_assigned_row() {
    let mut scope: Scope =
        scope_with_assignment(create_stored_assignment(1, AssignmentState::Completed));
    let mut tasked = create_stored_assignment(2, AssignmentState::Assigned);
    tasked.task_id = Some(4);
    scope.assignments.push(tasked);

    let result: TransitionResult =
        apply(&EngineConfig::default(), &scope, check_in(), at(13, 0)).unwrap();
    assert_eq!(result.assignment.assignment_id, Some(2));
}

#[test]
fn test_check_out_derives_hours_and_pending_record() {
    let mut in_progress = create_stored_assignment(1, AssignmentState::InProgress);
    in_progress.check_in_at = Some(at(9, 0));
    let scope: Scope = scope_with_assignment(in_progress);

    let result: TransitionResult =
        apply(&EngineConfig::default(), &scope, check_out(), at(13, 30)).unwrap();

    assert_eq!(result.kind, TransitionKind::CheckedOut);
    assert_eq!(result.assignment.state, AssignmentState::Completed);
    assert_eq!(result.assignment.check_out_at, Some(at(13, 30)));
    assert!((result.assignment.hours.unwrap() - 4.5).abs() < f64::EPSILON);

    let record = result.hours_record.unwrap();
    assert!((record.hours - 4.5).abs() < f64::EPSILON);
    assert_eq!(record.status, HoursStatus::Pending);
    assert_eq!(record.organization_id, ORGANIZATION_ID);
    assert_eq!(record.assignment_id, Some(1));
    assert_eq!(record.note.as_deref(), Some(AUTO_LOG_NOTE));
}

#[test]
fn test_check_out_without_check_in_fails() {
    let scope: Scope =
        scope_with_assignment(create_stored_assignment(1, AssignmentState::Assigned));

    assert_eq!(
        apply(&EngineConfig::default(), &scope, check_out(), at(12, 0)).unwrap_err(),
        CoreError::DomainViolation(DomainError::NotCheckedIn {
            shift_id: SHIFT_ID,
            volunteer_id: VOLUNTEER_ID,
        })
    );
}

#[test]
fn test_second_check_out_fails() {
    let scope: Scope =
        scope_with_assignment(create_stored_assignment(1, AssignmentState::Completed));

    assert!(matches!(
        apply(&EngineConfig::default(), &scope, check_out(), at(12, 30)),
        Err(CoreError::DomainViolation(
            DomainError::AlreadyCheckedOut { .. }
        ))
    ));
}
