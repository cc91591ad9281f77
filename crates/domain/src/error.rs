// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::assignment::AssignmentState;
use chrono::NaiveDate;

/// Errors that can occur while evaluating scheduling and attendance rules.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A time window ends at or before its start.
    InvalidTimeWindow {
        /// The window start (RFC 3339).
        start: String,
        /// The window end (RFC 3339).
        end: String,
    },
    /// The configured daily hour cap is not a positive, finite number.
    InvalidHourCap {
        /// The rejected value.
        value: f64,
    },
    /// The configured timezone is not a known IANA name.
    InvalidTimezone(String),
    /// Local midnight could not be resolved for a calendar day.
    DayBoundaryUnresolvable {
        /// The calendar day.
        date: NaiveDate,
        /// The timezone the day was evaluated in.
        timezone: String,
    },
    /// The shift does not exist.
    ShiftNotFound {
        /// The requested shift.
        shift_id: i64,
    },
    /// The task does not exist.
    TaskNotFound {
        /// The requested task.
        task_id: i64,
    },
    /// No assignment exists with the given identifier.
    AssignmentNotFound {
        /// The requested assignment.
        assignment_id: i64,
    },
    /// The volunteer has no assignment on the shift.
    AssignmentNotFoundForVolunteer {
        /// The shift.
        shift_id: i64,
        /// The volunteer.
        volunteer_id: i64,
    },
    /// The volunteer already holds this (shift, task) slot.
    DuplicateAssignment {
        /// The shift.
        shift_id: i64,
        /// The volunteer.
        volunteer_id: i64,
        /// The task within the shift, if any.
        task_id: Option<i64>,
    },
    /// The candidate shift intersects a shift the volunteer is committed to.
    OverlapConflict {
        /// The volunteer.
        volunteer_id: i64,
        /// The candidate shift.
        shift_id: i64,
        /// The already committed shift that intersects it.
        conflicting_shift_id: i64,
    },
    /// Admitting the shift would push the volunteer past the daily cap.
    HourCapExceeded {
        /// The volunteer.
        volunteer_id: i64,
        /// The calendar day of the candidate shift start.
        date: NaiveDate,
        /// Hours already committed on that day.
        committed_hours: f64,
        /// Duration of the candidate shift in hours.
        candidate_hours: f64,
        /// The configured cap.
        cap_hours: f64,
    },
    /// The volunteer is already checked in.
    AlreadyCheckedIn {
        /// The shift.
        shift_id: i64,
        /// The volunteer.
        volunteer_id: i64,
    },
    /// Check-out was attempted without a prior check-in.
    NotCheckedIn {
        /// The shift.
        shift_id: i64,
        /// The volunteer.
        volunteer_id: i64,
    },
    /// The volunteer is already checked out.
    AlreadyCheckedOut {
        /// The shift.
        shift_id: i64,
        /// The volunteer.
        volunteer_id: i64,
    },
    /// The assignment lifecycle does not permit this transition.
    InvalidStateTransition {
        /// Current state.
        from: AssignmentState,
        /// Requested state.
        to: AssignmentState,
    },
    /// A staff correction would leave the assignment inconsistent.
    InvalidCorrection {
        /// Why the correction was refused.
        reason: String,
    },
    /// Worked hours were requested for an assignment that was never checked out.
    HoursNotDerived {
        /// The shift.
        shift_id: i64,
        /// The volunteer.
        volunteer_id: i64,
    },
    /// Unknown assignment state string.
    InvalidAssignmentState(String),
    /// Unknown hours status string.
    InvalidHoursStatus(String),
    /// Unknown capacity pool kind string.
    InvalidPoolKind(String),
    /// Reservation quantities must be positive.
    InvalidQuantity {
        /// The rejected quantity.
        quantity: u32,
    },
    /// The pool cannot admit the requested quantity.
    CapacityExceeded {
        /// The pool key.
        pool: String,
        /// Quantity requested.
        requested: u32,
        /// Quantity available at the time of the request.
        available: u32,
    },
    /// Releasing would raise the available count past the pool total.
    ReleaseExceedsTotal {
        /// The pool key.
        pool: String,
        /// Quantity being released.
        released: u32,
        /// Quantity currently available.
        available: u32,
        /// Pool total.
        total: u32,
    },
    /// Available count outside `0..=total`.
    InvalidCapacityLevel {
        /// The available count.
        available: u32,
        /// The pool total.
        total: u32,
    },
    /// A reservation was released against a pool it was not taken from.
    ReservationPoolMismatch {
        /// The pool being released into.
        expected: String,
        /// The pool named by the reservation.
        actual: String,
    },
    /// The capacity pool does not exist.
    PoolNotFound {
        /// The pool key.
        pool: String,
    },
    /// Only opportunity acceptance pools may be unlimited.
    PoolTotalRequired {
        /// The pool key.
        pool: String,
    },
    /// A capacity pool is already registered for this resource.
    DuplicatePool {
        /// The pool key.
        pool: String,
    },
    /// The reservation does not exist.
    ReservationNotFound {
        /// The requested reservation.
        reservation_id: i64,
    },
    /// The reservation has already been released.
    ReservationAlreadyReleased {
        /// The reservation.
        reservation_id: i64,
    },
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeWindow { start, end } => {
                write!(f, "Invalid time window: end {end} is not after start {start}")
            }
            Self::InvalidHourCap { value } => {
                write!(
                    f,
                    "Invalid daily hour cap: {value}. Must be a positive number of hours"
                )
            }
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::DayBoundaryUnresolvable { date, timezone } => {
                write!(f, "Could not resolve local midnight of {date} in {timezone}")
            }
            Self::ShiftNotFound { shift_id } => write!(f, "Shift {shift_id} not found"),
            Self::TaskNotFound { task_id } => write!(f, "Task {task_id} not found"),
            Self::AssignmentNotFound { assignment_id } => {
                write!(f, "Assignment {assignment_id} not found")
            }
            Self::AssignmentNotFoundForVolunteer {
                shift_id,
                volunteer_id,
            } => {
                write!(
                    f,
                    "Volunteer {volunteer_id} has no assignment on shift {shift_id}"
                )
            }
            Self::DuplicateAssignment {
                shift_id,
                volunteer_id,
                task_id,
            } => match task_id {
                Some(task_id) => write!(
                    f,
                    "Volunteer {volunteer_id} is already assigned to task {task_id} on shift {shift_id}"
                ),
                None => write!(
                    f,
                    "Volunteer {volunteer_id} is already assigned to shift {shift_id}"
                ),
            },
            Self::OverlapConflict {
                volunteer_id,
                shift_id,
                conflicting_shift_id,
            } => {
                write!(
                    f,
                    "Shift {shift_id} overlaps shift {conflicting_shift_id} already assigned to volunteer {volunteer_id}"
                )
            }
            Self::HourCapExceeded {
                volunteer_id,
                date,
                committed_hours,
                candidate_hours,
                cap_hours,
            } => {
                write!(
                    f,
                    "Volunteer {volunteer_id} would work {:.2} hours on {date} ({committed_hours:.2} committed + {candidate_hours:.2} requested), exceeding the daily limit of {cap_hours:.2}",
                    committed_hours + candidate_hours
                )
            }
            Self::AlreadyCheckedIn {
                shift_id,
                volunteer_id,
            } => {
                write!(
                    f,
                    "Volunteer {volunteer_id} is already checked in to shift {shift_id}"
                )
            }
            Self::NotCheckedIn {
                shift_id,
                volunteer_id,
            } => {
                write!(
                    f,
                    "Volunteer {volunteer_id} has not checked in to shift {shift_id}"
                )
            }
            Self::AlreadyCheckedOut {
                shift_id,
                volunteer_id,
            } => {
                write!(
                    f,
                    "Volunteer {volunteer_id} is already checked out of shift {shift_id}"
                )
            }
            Self::InvalidStateTransition { from, to } => {
                write!(f, "Assignment cannot move from '{from}' to '{to}'")
            }
            Self::InvalidCorrection { reason } => write!(f, "Invalid correction: {reason}"),
            Self::HoursNotDerived {
                shift_id,
                volunteer_id,
            } => {
                write!(
                    f,
                    "No worked hours derived for volunteer {volunteer_id} on shift {shift_id}"
                )
            }
            Self::InvalidAssignmentState(s) => write!(f, "Invalid assignment state: {s}"),
            Self::InvalidHoursStatus(s) => write!(f, "Invalid hours status: {s}"),
            Self::InvalidPoolKind(s) => write!(f, "Invalid capacity pool kind: {s}"),
            Self::InvalidQuantity { quantity } => {
                write!(f, "Invalid quantity: {quantity}. Must be greater than 0")
            }
            Self::CapacityExceeded {
                pool,
                requested,
                available,
            } => {
                write!(
                    f,
                    "Capacity exceeded for {pool}: requested {requested}, available {available}"
                )
            }
            Self::ReleaseExceedsTotal {
                pool,
                released,
                available,
                total,
            } => {
                write!(
                    f,
                    "Releasing {released} into {pool} would exceed its total of {total} (available {available})"
                )
            }
            Self::InvalidCapacityLevel { available, total } => {
                write!(
                    f,
                    "Invalid capacity level: available {available} exceeds total {total}"
                )
            }
            Self::ReservationPoolMismatch { expected, actual } => {
                write!(
                    f,
                    "Reservation belongs to {actual} and cannot be released into {expected}"
                )
            }
            Self::PoolNotFound { pool } => write!(f, "Capacity pool {pool} not found"),
            Self::PoolTotalRequired { pool } => {
                write!(f, "Capacity pool {pool} requires an explicit total")
            }
            Self::DuplicatePool { pool } => write!(f, "Capacity pool {pool} already exists"),
            Self::ReservationNotFound { reservation_id } => {
                write!(f, "Reservation {reservation_id} not found")
            }
            Self::ReservationAlreadyReleased { reservation_id } => {
                write!(f, "Reservation {reservation_id} has already been released")
            }
        }
    }
}

impl std::error::Error for DomainError {}
