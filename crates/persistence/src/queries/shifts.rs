// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftcall_domain::Shift;

use crate::data_models::ShiftRow;
use crate::diesel_schema::{shifts, tasks};
use crate::error::PersistenceError;

/// Retrieves a shift by ID.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
pub fn get_shift(
    conn: &mut SqliteConnection,
    shift_id: i64,
) -> Result<Option<Shift>, PersistenceError> {
    shifts::table
        .filter(shifts::shift_id.eq(shift_id))
        .select(ShiftRow::as_select())
        .first(conn)
        .optional()?
        .map(ShiftRow::into_shift)
        .transpose()
}

/// Returns true if `task_id` exists and belongs to `shift_id`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn task_exists_on_shift(
    conn: &mut SqliteConnection,
    task_id: i64,
    shift_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = tasks::table
        .filter(tasks::task_id.eq(task_id))
        .filter(tasks::shift_id.eq(shift_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}
