// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and conversions between stored and domain representations.
//!
//! Timestamps are stored as RFC 3339 text in UTC with microsecond precision,
//! so lexical order matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use num_traits::ToPrimitive;
use serde::Serialize;
use shiftcall_domain::{
    Assignment, AssignmentState, Capacity, CapacityLevel, HoursStatus, PoolKey, PoolKind, Shift,
    TimeWindow, WorkedHoursRecord,
};

use crate::diesel_schema::{assignments, capacity_pools, reservations, shifts, worked_hours};
use crate::error::PersistenceError;

/// A stored capacity reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReservationRecord {
    pub reservation_id: i64,
    pub pool: PoolKey,
    /// Who holds the units: an applicant, a borrower, a volunteer.
    pub holder_id: i64,
    pub quantity: u32,
    pub reserved_at: DateTime<Utc>,
    pub released_at: Option<DateTime<Utc>>,
}

/// Formats a timestamp for storage.
#[must_use]
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns `PersistenceError::ReconstructionError` if the text is not RFC 3339.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|e| PersistenceError::ReconstructionError(format!("timestamp '{value}': {e}")))
}

fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

pub fn to_stored_count(value: u32, field: &str) -> Result<i32, PersistenceError> {
    value
        .to_i32()
        .ok_or_else(|| PersistenceError::Other(format!("{field} {value} out of range")))
}

fn from_stored_count(value: i32, field: &str) -> Result<u32, PersistenceError> {
    value
        .to_u32()
        .ok_or_else(|| {
            PersistenceError::ReconstructionError(format!("{field} {value} is negative"))
        })
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = shifts)]
pub struct ShiftRow {
    pub shift_id: i64,
    pub organization_id: i64,
    pub event_id: Option<i64>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub capacity: i32,
    pub default_task_id: Option<i64>,
}

impl ShiftRow {
    pub fn window(&self) -> Result<TimeWindow, PersistenceError> {
        let start = parse_optional_timestamp(self.starts_at.as_deref())?;
        let end = parse_optional_timestamp(self.ends_at.as_deref())?;
        TimeWindow::from_parts(start, end).map_err(|e| {
            PersistenceError::ReconstructionError(format!("shift {}: {e}", self.shift_id))
        })
    }

    pub fn into_shift(self) -> Result<Shift, PersistenceError> {
        Ok(Shift {
            shift_id: Some(self.shift_id),
            organization_id: self.organization_id,
            event_id: self.event_id,
            window: self.window()?,
            capacity: from_stored_count(self.capacity, "capacity")?,
            task_id: self.default_task_id,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = assignments)]
pub struct AssignmentRow {
    pub assignment_id: i64,
    pub shift_id: i64,
    pub volunteer_id: i64,
    pub task_id: Option<i64>,
    pub assigned_by: Option<i64>,
    pub state: String,
    pub check_in_at: Option<String>,
    pub check_out_at: Option<String>,
    pub hours: Option<f64>,
    pub notes: Option<String>,
}

impl AssignmentRow {
    pub fn into_assignment(self) -> Result<Assignment, PersistenceError> {
        let state: AssignmentState = self
            .state
            .parse()
            .map_err(|e| PersistenceError::ReconstructionError(format!("{e}")))?;
        Ok(Assignment {
            assignment_id: Some(self.assignment_id),
            shift_id: self.shift_id,
            volunteer_id: self.volunteer_id,
            task_id: self.task_id,
            assigned_by: self.assigned_by,
            state,
            check_in_at: parse_optional_timestamp(self.check_in_at.as_deref())?,
            check_out_at: parse_optional_timestamp(self.check_out_at.as_deref())?,
            hours: self.hours,
            notes: self.notes,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = worked_hours)]
pub struct WorkedHoursRow {
    pub record_id: i64,
    pub volunteer_id: i64,
    pub organization_id: i64,
    pub event_id: Option<i64>,
    pub shift_id: i64,
    pub assignment_id: Option<i64>,
    pub logged_at: String,
    pub hours: f64,
    pub status: String,
    pub note: Option<String>,
}

impl WorkedHoursRow {
    pub fn into_record(self) -> Result<WorkedHoursRecord, PersistenceError> {
        let status: HoursStatus = self
            .status
            .parse()
            .map_err(|e| PersistenceError::ReconstructionError(format!("{e}")))?;
        Ok(WorkedHoursRecord {
            record_id: Some(self.record_id),
            volunteer_id: self.volunteer_id,
            organization_id: self.organization_id,
            event_id: self.event_id,
            shift_id: self.shift_id,
            assignment_id: self.assignment_id,
            date: parse_timestamp(&self.logged_at)?,
            hours: self.hours,
            status,
            note: self.note,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = capacity_pools)]
pub struct CapacityPoolRow {
    pub pool_id: i64,
    pub pool_kind: String,
    pub resource_id: i64,
    pub total: Option<i32>,
    pub available: i32,
}

impl CapacityPoolRow {
    pub fn key(&self) -> Result<PoolKey, PersistenceError> {
        let kind: PoolKind = self
            .pool_kind
            .parse()
            .map_err(|e| PersistenceError::ReconstructionError(format!("{e}")))?;
        Ok(PoolKey::new(kind, self.resource_id))
    }

    pub fn level(&self) -> Result<CapacityLevel, PersistenceError> {
        let capacity: Capacity = match self.total {
            None => Capacity::Unlimited,
            Some(total) => Capacity::Limited(from_stored_count(total, "total")?),
        };
        let available: u32 = from_stored_count(self.available, "available")?;
        CapacityLevel::new(self.key()?, capacity, available)
            .map_err(|e| PersistenceError::ReconstructionError(format!("{e}")))
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = reservations)]
pub struct ReservationRow {
    pub reservation_id: i64,
    pub pool_id: i64,
    pub holder_id: i64,
    pub quantity: i32,
    pub reserved_at: String,
    pub released_at: Option<String>,
}

impl ReservationRow {
    pub fn into_record(self, pool: PoolKey) -> Result<ReservationRecord, PersistenceError> {
        Ok(ReservationRecord {
            reservation_id: self.reservation_id,
            pool,
            holder_id: self.holder_id,
            quantity: from_stored_count(self.quantity, "quantity")?,
            reserved_at: parse_timestamp(&self.reserved_at)?,
            released_at: parse_optional_timestamp(self.released_at.as_deref())?,
        })
    }
}
