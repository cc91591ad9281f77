// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::admission::admit_shift;
use crate::command::Command;
use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::state::{AdmissionNote, Scope, TransitionKind, TransitionResult};
use chrono::{DateTime, Utc};
use shiftcall_domain::{
    Assignment, AssignmentPatch, AssignmentState, DomainError, Shift, WorkedHoursRecord,
};

/// Applies a command to a scope, producing the transition to persist.
///
/// This function is pure: the caller loads `scope`, supplies the clock and
/// writes the result.
///
/// # Arguments
///
/// * `config` - Engine settings (hour cap, timezone)
/// * `scope` - Stored state relevant to the command
/// * `command` - The command to apply
/// * `now` - The instant the command takes effect
///
/// # Errors
///
/// Returns an error if the command violates a scheduling or lifecycle rule.
pub fn apply(
    config: &EngineConfig,
    scope: &Scope,
    command: Command,
    now: DateTime<Utc>,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::CreateAssignment {
            shift_id,
            volunteer_id,
            task_id,
            assigned_by,
        } => apply_create(config, scope, shift_id, volunteer_id, task_id, assigned_by),
        Command::CheckIn {
            shift_id,
            volunteer_id,
        } => {
            let current: &Assignment =
                select_for_volunteer(scope, shift_id, volunteer_id, AssignmentState::Assigned)?;
            let assignment: Assignment = current.check_in(now)?;
            Ok(TransitionResult {
                kind: TransitionKind::CheckedIn,
                assignment,
                hours_record: None,
                notes: Vec::new(),
            })
        }
        Command::CheckOut {
            shift_id,
            volunteer_id,
        } => {
            let current: &Assignment =
                select_for_volunteer(scope, shift_id, volunteer_id, AssignmentState::InProgress)?;
            let assignment: Assignment = current.check_out(now)?;
            let shift: &Shift = require_shift(scope, shift_id)?;
            let record: WorkedHoursRecord =
                WorkedHoursRecord::from_check_out(&assignment, shift, now)?;
            Ok(TransitionResult {
                kind: TransitionKind::CheckedOut,
                assignment,
                hours_record: Some(record),
                notes: Vec::new(),
            })
        }
        Command::UpdateAssignment {
            assignment_id,
            patch,
        } => apply_update(scope, assignment_id, &patch),
        Command::RemoveAssignment { assignment_id } => {
            let current: &Assignment = find_by_id(scope, assignment_id)?;
            current.ensure_removable()?;
            Ok(TransitionResult {
                kind: TransitionKind::Removed,
                assignment: current.clone(),
                hours_record: None,
                notes: Vec::new(),
            })
        }
    }
}

fn apply_create(
    config: &EngineConfig,
    scope: &Scope,
    shift_id: i64,
    volunteer_id: i64,
    task_id: Option<i64>,
    assigned_by: Option<i64>,
) -> Result<TransitionResult, CoreError> {
    let shift: &Shift = require_shift(scope, shift_id)?;

    if let Some(task_id) = task_id {
        if !scope.task_exists {
            return Err(CoreError::DomainViolation(DomainError::TaskNotFound {
                task_id,
            }));
        }
    }

    if scope
        .assignments
        .iter()
        .any(|a| a.holds_slot(shift_id, volunteer_id, task_id))
    {
        return Err(CoreError::DomainViolation(
            DomainError::DuplicateAssignment {
                shift_id,
                volunteer_id,
                task_id,
            },
        ));
    }

    let notes: Vec<AdmissionNote> =
        admit_shift(config, shift_id, volunteer_id, shift, &scope.commitments)?;

    Ok(TransitionResult {
        kind: TransitionKind::Created,
        assignment: Assignment::new(shift_id, volunteer_id, task_id, assigned_by),
        hours_record: None,
        notes,
    })
}

fn apply_update(
    scope: &Scope,
    assignment_id: i64,
    patch: &AssignmentPatch,
) -> Result<TransitionResult, CoreError> {
    let current: &Assignment = find_by_id(scope, assignment_id)?;

    if let Some(task_id) = patch.task_id {
        if !scope.task_exists {
            return Err(CoreError::DomainViolation(DomainError::TaskNotFound {
                task_id,
            }));
        }
    }

    let assignment: Assignment = current.apply_patch(patch)?;

    let slot_taken: bool = scope.assignments.iter().any(|other| {
        other.assignment_id != Some(assignment_id)
            && other.holds_slot(assignment.shift_id, assignment.volunteer_id, assignment.task_id)
    });
    if slot_taken {
        return Err(CoreError::DomainViolation(
            DomainError::DuplicateAssignment {
                shift_id: assignment.shift_id,
                volunteer_id: assignment.volunteer_id,
                task_id: assignment.task_id,
            },
        ));
    }

    Ok(TransitionResult {
        kind: TransitionKind::Updated,
        assignment,
        hours_record: None,
        notes: Vec::new(),
    })
}

fn require_shift(scope: &Scope, shift_id: i64) -> Result<&Shift, CoreError> {
    scope
        .shift
        .as_ref()
        .filter(|shift| shift.shift_id == Some(shift_id))
        .ok_or_else(|| CoreError::DomainViolation(DomainError::ShiftNotFound { shift_id }))
}

fn find_by_id(scope: &Scope, assignment_id: i64) -> Result<&Assignment, CoreError> {
    scope
        .assignments
        .iter()
        .find(|a| a.assignment_id == Some(assignment_id))
        .ok_or_else(|| {
            CoreError::DomainViolation(DomainError::AssignmentNotFound { assignment_id })
        })
}

/// Picks the volunteer's assignment on the shift that is in `preferred`
/// state, falling back to the first one so the lifecycle reports why the
/// transition is refused.
fn select_for_volunteer(
    scope: &Scope,
    shift_id: i64,
    volunteer_id: i64,
    preferred: AssignmentState,
) -> Result<&Assignment, CoreError> {
    let mut candidates = scope
        .assignments
        .iter()
        .filter(|a| a.shift_id == shift_id && a.volunteer_id == volunteer_id)
        .peekable();

    let first: &Assignment = candidates.peek().copied().ok_or_else(|| {
        CoreError::DomainViolation(DomainError::AssignmentNotFoundForVolunteer {
            shift_id,
            volunteer_id,
        })
    })?;

    Ok(candidates.find(|a| a.state == preferred).unwrap_or(first))
}
