// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loads the stored state a command is evaluated against.
//!
//! Must run inside the write transaction that persists the result.

use diesel::SqliteConnection;
use shiftcall::{Command, Scope};
use shiftcall_domain::Assignment;

use crate::error::PersistenceError;
use crate::queries::assignments::{get_assignment, list_for_volunteer_on_shift, load_commitments};
use crate::queries::shifts::{get_shift, task_exists_on_shift};

/// Builds the scope for `command`.
///
/// Missing rows are not errors here: an empty scope lets the engine report
/// the precise not-found rule.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn load_scope(
    conn: &mut SqliteConnection,
    command: &Command,
) -> Result<Scope, PersistenceError> {
    match command {
        Command::CreateAssignment {
            shift_id,
            volunteer_id,
            task_id,
            ..
        } => {
            let shift = get_shift(conn, *shift_id)?;
            if shift.is_none() {
                return Ok(Scope::default());
            }
            Ok(Scope {
                shift,
                task_exists: task_on_shift(conn, *task_id, *shift_id)?,
                assignments: list_for_volunteer_on_shift(conn, *shift_id, *volunteer_id)?,
                commitments: load_commitments(conn, *volunteer_id)?,
            })
        }
        Command::CheckIn {
            shift_id,
            volunteer_id,
        }
        | Command::CheckOut {
            shift_id,
            volunteer_id,
        } => Ok(Scope {
            shift: get_shift(conn, *shift_id)?,
            task_exists: false,
            assignments: list_for_volunteer_on_shift(conn, *shift_id, *volunteer_id)?,
            commitments: Vec::new(),
        }),
        Command::UpdateAssignment {
            assignment_id,
            patch,
        } => {
            let Some(target) = get_assignment(conn, *assignment_id)? else {
                return Ok(Scope::default());
            };
            let task_exists: bool = task_on_shift(conn, patch.task_id, target.shift_id)?;
            scope_around(conn, &target, task_exists)
        }
        Command::RemoveAssignment { assignment_id } => {
            let Some(target) = get_assignment(conn, *assignment_id)? else {
                return Ok(Scope::default());
            };
            scope_around(conn, &target, false)
        }
    }
}

fn task_on_shift(
    conn: &mut SqliteConnection,
    task_id: Option<i64>,
    shift_id: i64,
) -> Result<bool, PersistenceError> {
    match task_id {
        Some(task_id) => task_exists_on_shift(conn, task_id, shift_id),
        None => Ok(false),
    }
}

/// Scope for commands addressing an existing assignment: its shift and the
/// volunteer's assignments on that shift, the target included.
fn scope_around(
    conn: &mut SqliteConnection,
    target: &Assignment,
    task_exists: bool,
) -> Result<Scope, PersistenceError> {
    Ok(Scope {
        shift: get_shift(conn, target.shift_id)?,
        task_exists,
        assignments: list_for_volunteer_on_shift(conn, target.shift_id, target.volunteer_id)?,
        commitments: Vec::new(),
    })
}
