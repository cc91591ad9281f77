// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persisting assignment transitions.
//!
//! A check-out writes the completed assignment and its worked-hours record
//! in the caller's transaction; if the record cannot be written the
//! check-out rolls back with it.

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftcall::{TransitionKind, TransitionResult};
use shiftcall_domain::{Assignment, AssignmentState, WorkedHoursRecord};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::format_timestamp;
use crate::diesel_schema::{assignments, worked_hours};
use crate::error::PersistenceError;

/// Persists a transition result, filling in generated IDs.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    mut result: TransitionResult,
    now: DateTime<Utc>,
) -> Result<TransitionResult, PersistenceError> {
    match result.kind {
        TransitionKind::Created => {
            let assignment_id: i64 = insert_assignment(conn, &result.assignment, now)?;
            result.assignment.assignment_id = Some(assignment_id);
        }
        TransitionKind::CheckedIn | TransitionKind::Updated => {
            update_assignment(conn, &result.assignment, now)?;
        }
        TransitionKind::CheckedOut => {
            update_assignment(conn, &result.assignment, now)?;
            if let Some(record) = result.hours_record.as_mut() {
                let record_id: i64 = insert_worked_hours(conn, record)?;
                record.record_id = Some(record_id);
            }
        }
        TransitionKind::Removed => {
            delete_assignment(conn, &result.assignment)?;
        }
    }

    info!(
        kind = ?result.kind,
        assignment_id = result.assignment.assignment_id,
        shift_id = result.assignment.shift_id,
        volunteer_id = result.assignment.volunteer_id,
        "Persisted transition"
    );
    Ok(result)
}

fn stored_id(assignment: &Assignment) -> Result<i64, PersistenceError> {
    assignment.assignment_id.ok_or_else(|| {
        PersistenceError::Other(String::from("assignment has not been persisted"))
    })
}

fn insert_assignment(
    conn: &mut SqliteConnection,
    assignment: &Assignment,
    now: DateTime<Utc>,
) -> Result<i64, PersistenceError> {
    let timestamp: String = format_timestamp(now);

    diesel::insert_into(assignments::table)
        .values((
            assignments::shift_id.eq(assignment.shift_id),
            assignments::volunteer_id.eq(assignment.volunteer_id),
            assignments::task_id.eq(assignment.task_id),
            assignments::assigned_by.eq(assignment.assigned_by),
            assignments::state.eq(assignment.state.as_str()),
            assignments::check_in_at.eq(assignment.check_in_at.map(format_timestamp)),
            assignments::check_out_at.eq(assignment.check_out_at.map(format_timestamp)),
            assignments::hours.eq(assignment.hours),
            assignments::notes.eq(assignment.notes.as_deref()),
            assignments::created_at.eq(&timestamp),
            assignments::updated_at.eq(&timestamp),
        ))
        .execute(conn)?;

    let assignment_id: i64 = conn.get_last_insert_rowid()?;
    debug!(assignment_id, "Inserted assignment");
    Ok(assignment_id)
}

fn update_assignment(
    conn: &mut SqliteConnection,
    assignment: &Assignment,
    now: DateTime<Utc>,
) -> Result<(), PersistenceError> {
    let assignment_id: i64 = stored_id(assignment)?;

    let rows_affected: usize = diesel::update(
        assignments::table.filter(assignments::assignment_id.eq(assignment_id)),
    )
    .set((
        assignments::task_id.eq(assignment.task_id),
        assignments::assigned_by.eq(assignment.assigned_by),
        assignments::state.eq(assignment.state.as_str()),
        assignments::check_in_at.eq(assignment.check_in_at.map(format_timestamp)),
        assignments::check_out_at.eq(assignment.check_out_at.map(format_timestamp)),
        assignments::hours.eq(assignment.hours),
        assignments::notes.eq(assignment.notes.as_deref()),
        assignments::updated_at.eq(format_timestamp(now)),
    ))
    .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "assignment {assignment_id}"
        )));
    }
    debug!(assignment_id, state = %assignment.state, "Updated assignment");
    Ok(())
}

fn delete_assignment(
    conn: &mut SqliteConnection,
    assignment: &Assignment,
) -> Result<(), PersistenceError> {
    let assignment_id: i64 = stored_id(assignment)?;

    // Only unstarted assignments may be deleted.
    let rows_affected: usize = diesel::delete(
        assignments::table
            .filter(assignments::assignment_id.eq(assignment_id))
            .filter(assignments::state.eq(AssignmentState::Assigned.as_str())),
    )
    .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "assignment {assignment_id} in state 'assigned'"
        )));
    }
    debug!(assignment_id, "Deleted assignment");
    Ok(())
}

fn insert_worked_hours(
    conn: &mut SqliteConnection,
    record: &WorkedHoursRecord,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(worked_hours::table)
        .values((
            worked_hours::volunteer_id.eq(record.volunteer_id),
            worked_hours::organization_id.eq(record.organization_id),
            worked_hours::event_id.eq(record.event_id),
            worked_hours::shift_id.eq(record.shift_id),
            worked_hours::assignment_id.eq(record.assignment_id),
            worked_hours::logged_at.eq(format_timestamp(record.date)),
            worked_hours::hours.eq(record.hours),
            worked_hours::status.eq(record.status.as_str()),
            worked_hours::note.eq(record.note.as_deref()),
        ))
        .execute(conn)?;

    let record_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        record_id,
        assignment_id = record.assignment_id,
        hours = record.hours,
        "Inserted worked hours record"
    );
    Ok(record_id)
}
