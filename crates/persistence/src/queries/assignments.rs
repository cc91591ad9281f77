// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment and worked-hours reads.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftcall_domain::{Assignment, AssignmentState, CommittedWindow, WorkedHoursRecord};
use tracing::debug;

use crate::data_models::{AssignmentRow, ShiftRow, WorkedHoursRow};
use crate::diesel_schema::{assignments, shifts, worked_hours};
use crate::error::PersistenceError;

/// Retrieves an assignment by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
pub fn get_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<Option<Assignment>, PersistenceError> {
    assignments::table
        .filter(assignments::assignment_id.eq(assignment_id))
        .select(AssignmentRow::as_select())
        .first(conn)
        .optional()?
        .map(AssignmentRow::into_assignment)
        .transpose()
}

/// Lists a volunteer's assignments on one shift, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn list_for_volunteer_on_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
    volunteer_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    assignments::table
        .filter(assignments::shift_id.eq(shift_id))
        .filter(assignments::volunteer_id.eq(volunteer_id))
        .order(assignments::assignment_id.asc())
        .select(AssignmentRow::as_select())
        .load(conn)?
        .into_iter()
        .map(AssignmentRow::into_assignment)
        .collect()
}

/// Lists every assignment on a shift, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn list_for_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<Vec<Assignment>, PersistenceError> {
    assignments::table
        .filter(assignments::shift_id.eq(shift_id))
        .order(assignments::assignment_id.asc())
        .select(AssignmentRow::as_select())
        .load(conn)?
        .into_iter()
        .map(AssignmentRow::into_assignment)
        .collect()
}

/// Loads the windows of every shift the volunteer is still committed to.
///
/// Only `assigned` and `in-progress` assignments count; completed history
/// never blocks scheduling.
///
/// # Errors
///
/// Returns an error if the query fails or a stored window is invalid.
pub fn load_commitments(
    conn: &mut SqliteConnection,
    volunteer_id: i64,
) -> Result<Vec<CommittedWindow>, PersistenceError> {
    let blocking: Vec<&str> = [AssignmentState::Assigned, AssignmentState::InProgress]
        .iter()
        .map(AssignmentState::as_str)
        .collect();

    let rows: Vec<ShiftRow> = assignments::table
        .inner_join(shifts::table)
        .filter(assignments::volunteer_id.eq(volunteer_id))
        .filter(assignments::state.eq_any(blocking))
        .order(shifts::starts_at.asc())
        .select(ShiftRow::as_select())
        .load(conn)?;

    debug!(volunteer_id, count = rows.len(), "Loaded committed windows");

    rows.iter()
        .map(|row| {
            row.window().map(|window| CommittedWindow {
                shift_id: row.shift_id,
                window,
            })
        })
        .collect()
}

/// Lists a volunteer's worked-hours records, most recent first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn list_hours_for_volunteer(
    conn: &mut SqliteConnection,
    volunteer_id: i64,
) -> Result<Vec<WorkedHoursRecord>, PersistenceError> {
    worked_hours::table
        .filter(worked_hours::volunteer_id.eq(volunteer_id))
        .order((worked_hours::logged_at.desc(), worked_hours::record_id.desc()))
        .select(WorkedHoursRow::as_select())
        .load(conn)?
        .into_iter()
        .map(WorkedHoursRow::into_record)
        .collect()
}

/// Retrieves the worked-hours record derived from an assignment.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
pub fn get_hours_for_assignment(
    conn: &mut SqliteConnection,
    assignment_id: i64,
) -> Result<Option<WorkedHoursRecord>, PersistenceError> {
    worked_hours::table
        .filter(worked_hours::assignment_id.eq(assignment_id))
        .select(WorkedHoursRow::as_select())
        .first(conn)
        .optional()?
        .map(WorkedHoursRow::into_record)
        .transpose()
}
