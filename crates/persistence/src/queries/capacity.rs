// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftcall_domain::PoolKey;

use crate::data_models::{CapacityPoolRow, ReservationRecord, ReservationRow};
use crate::diesel_schema::{capacity_pools, reservations};
use crate::error::PersistenceError;

/// Retrieves the stored row for a pool.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_pool_row(
    conn: &mut SqliteConnection,
    key: PoolKey,
) -> Result<Option<CapacityPoolRow>, PersistenceError> {
    Ok(capacity_pools::table
        .filter(capacity_pools::pool_kind.eq(key.kind.as_str()))
        .filter(capacity_pools::resource_id.eq(key.resource_id))
        .select(CapacityPoolRow::as_select())
        .first(conn)
        .optional()?)
}

/// Retrieves a reservation together with the pool it was taken from.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn get_reservation(
    conn: &mut SqliteConnection,
    reservation_id: i64,
) -> Result<Option<(ReservationRecord, CapacityPoolRow)>, PersistenceError> {
    let found: Option<(ReservationRow, CapacityPoolRow)> = reservations::table
        .inner_join(capacity_pools::table)
        .filter(reservations::reservation_id.eq(reservation_id))
        .select((ReservationRow::as_select(), CapacityPoolRow::as_select()))
        .first(conn)
        .optional()?;

    found
        .map(|(reservation, pool)| -> Result<_, PersistenceError> {
            let key: PoolKey = pool.key()?;
            Ok((reservation.into_record(key)?, pool))
        })
        .transpose()
}

/// Lists the reservations on a pool that have not been released.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn list_active_reservations(
    conn: &mut SqliteConnection,
    pool: &CapacityPoolRow,
) -> Result<Vec<ReservationRecord>, PersistenceError> {
    let key: PoolKey = pool.key()?;
    reservations::table
        .filter(reservations::pool_id.eq(pool.pool_id))
        .filter(reservations::released_at.is_null())
        .order(reservations::reservation_id.asc())
        .select(ReservationRow::as_select())
        .load(conn)?
        .into_iter()
        .map(|row| row.into_record(key))
        .collect()
}
