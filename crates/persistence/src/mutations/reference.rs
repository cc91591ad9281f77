// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftcall_domain::{Shift, Task};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{format_timestamp, to_stored_count};
use crate::diesel_schema::{shifts, tasks};
use crate::error::PersistenceError;

/// Inserts a shift and returns its generated ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_shift(conn: &mut SqliteConnection, shift: &Shift) -> Result<i64, PersistenceError> {
    let capacity: i32 = to_stored_count(shift.capacity, "capacity")?;

    diesel::insert_into(shifts::table)
        .values((
            shifts::organization_id.eq(shift.organization_id),
            shifts::event_id.eq(shift.event_id),
            shifts::starts_at.eq(shift.window.start().map(format_timestamp)),
            shifts::ends_at.eq(shift.window.end().map(format_timestamp)),
            shifts::capacity.eq(capacity),
            shifts::default_task_id.eq(shift.task_id),
        ))
        .execute(conn)?;

    let shift_id: i64 = conn.get_last_insert_rowid()?;
    debug!(shift_id, organization_id = shift.organization_id, "Inserted shift");
    Ok(shift_id)
}

/// Inserts a task and returns its generated ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_task(conn: &mut SqliteConnection, task: &Task) -> Result<i64, PersistenceError> {
    diesel::insert_into(tasks::table)
        .values((tasks::shift_id.eq(task.shift_id), tasks::name.eq(&task.name)))
        .execute(conn)?;

    let task_id: i64 = conn.get_last_insert_rowid()?;
    debug!(task_id, shift_id = task.shift_id, "Inserted task");
    Ok(task_id)
}
