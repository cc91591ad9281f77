// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity pool writes.
//!
//! Admission is a single conditional `UPDATE`: the row is decremented only
//! if it still has enough units, and the affected-row count decides whether
//! the reservation was admitted. Release is the mirror image, guarded by
//! the pool total.

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftcall_domain::{Capacity, CapacityLevel, DomainError, PoolKey};
use tracing::{debug, info, warn};

use crate::backend::PersistenceBackend;
use crate::data_models::{CapacityPoolRow, ReservationRecord, format_timestamp, to_stored_count};
use crate::diesel_schema::{capacity_pools, reservations};
use crate::error::TransactionError;
use crate::queries::capacity::{get_pool_row, get_reservation};

/// Registers a pool with every unit available.
///
/// # Errors
///
/// Returns `PoolTotalRequired` if an unlimited capacity is given for a kind
/// that counts real units, `DuplicatePool` if the pool exists, or a
/// persistence error.
pub fn insert_pool(
    conn: &mut SqliteConnection,
    key: PoolKey,
    capacity: Capacity,
) -> Result<CapacityLevel, TransactionError> {
    if !capacity.is_allowed_for(key.kind) {
        return Err(DomainError::PoolTotalRequired {
            pool: key.to_string(),
        }
        .into());
    }

    if get_pool_row(conn, key)?.is_some() {
        return Err(DomainError::DuplicatePool {
            pool: key.to_string(),
        }
        .into());
    }

    let level: CapacityLevel = CapacityLevel::full(key, capacity);
    let total: Option<i32> = capacity
        .total()
        .map(|total| to_stored_count(total, "total"))
        .transpose()?;

    diesel::insert_into(capacity_pools::table)
        .values((
            capacity_pools::pool_kind.eq(key.kind.as_str()),
            capacity_pools::resource_id.eq(key.resource_id),
            capacity_pools::total.eq(total),
            capacity_pools::available.eq(to_stored_count(level.available(), "available")?),
        ))
        .execute(conn)?;

    info!(pool = %key, total, "Registered capacity pool");
    Ok(level)
}

/// Reserves `quantity` units from a pool for `holder_id`.
///
/// # Errors
///
/// Returns `PoolNotFound`, `InvalidQuantity` or `CapacityExceeded` when the
/// request is refused, or a persistence error.
pub fn reserve(
    conn: &mut SqliteConnection,
    key: PoolKey,
    holder_id: i64,
    quantity: u32,
    now: DateTime<Utc>,
) -> Result<ReservationRecord, TransactionError> {
    let row: CapacityPoolRow = get_pool_row(conn, key)?.ok_or_else(|| {
        DomainError::PoolNotFound {
            pool: key.to_string(),
        }
    })?;
    let level: CapacityLevel = row.level()?;

    // Validates the quantity and reports the shortfall with current figures.
    if let Err(err) = level.admit(quantity) {
        warn!(
            pool = %key,
            holder_id,
            quantity,
            available = level.available(),
            "Reservation refused"
        );
        return Err(err.into());
    }

    let stored_quantity: i32 = to_stored_count(quantity, "quantity")?;

    if let Capacity::Limited(_) = level.capacity() {
        let rows_affected: usize = diesel::update(
            capacity_pools::table
                .filter(capacity_pools::pool_id.eq(row.pool_id))
                .filter(capacity_pools::available.ge(stored_quantity)),
        )
        .set(capacity_pools::available.eq(capacity_pools::available - stored_quantity))
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(DomainError::CapacityExceeded {
                pool: key.to_string(),
                requested: quantity,
                available: level.available(),
            }
            .into());
        }
    }

    diesel::insert_into(reservations::table)
        .values((
            reservations::pool_id.eq(row.pool_id),
            reservations::holder_id.eq(holder_id),
            reservations::quantity.eq(stored_quantity),
            reservations::reserved_at.eq(format_timestamp(now)),
        ))
        .execute(conn)?;
    let reservation_id: i64 = conn.get_last_insert_rowid()?;

    info!(reservation_id, pool = %key, holder_id, quantity, "Reserved capacity");
    Ok(ReservationRecord {
        reservation_id,
        pool: key,
        holder_id,
        quantity,
        reserved_at: now,
        released_at: None,
    })
}

/// Returns a reservation's units to its pool.
///
/// # Errors
///
/// Returns `ReservationNotFound`, `ReservationAlreadyReleased` or
/// `ReleaseExceedsTotal` when the release is refused, or a persistence error.
pub fn release(
    conn: &mut SqliteConnection,
    reservation_id: i64,
    now: DateTime<Utc>,
) -> Result<ReservationRecord, TransactionError> {
    let (mut record, row) = get_reservation(conn, reservation_id)?
        .ok_or(DomainError::ReservationNotFound { reservation_id })?;

    if record.released_at.is_some() {
        return Err(DomainError::ReservationAlreadyReleased { reservation_id }.into());
    }

    let level: CapacityLevel = row.level()?;
    level.restore(record.quantity)?;

    let stored_quantity: i32 = to_stored_count(record.quantity, "quantity")?;

    if let Capacity::Limited(total) = level.capacity() {
        let stored_total: i32 = to_stored_count(total, "total")?;
        let rows_affected: usize = diesel::update(
            capacity_pools::table
                .filter(capacity_pools::pool_id.eq(row.pool_id))
                .filter((capacity_pools::available + stored_quantity).le(stored_total)),
        )
        .set(capacity_pools::available.eq(capacity_pools::available + stored_quantity))
        .execute(conn)?;

        if rows_affected == 0 {
            return Err(DomainError::ReleaseExceedsTotal {
                pool: record.pool.to_string(),
                released: record.quantity,
                available: level.available(),
                total,
            }
            .into());
        }
    }

    diesel::update(reservations::table.filter(reservations::reservation_id.eq(reservation_id)))
        .set(reservations::released_at.eq(Some(format_timestamp(now))))
        .execute(conn)?;
    record.released_at = Some(now);

    debug!(
        reservation_id,
        pool = %record.pool,
        quantity = record.quantity,
        "Released capacity"
    );
    Ok(record)
}
