// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Worked-hours records derived from attendance.
//!
//! A completed assignment produces exactly one pending record. Approval
//! happens downstream; this crate only creates records.

use crate::assignment::{Assignment, AssignmentState};
use crate::error::DomainError;
use crate::shift::Shift;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Note attached to records created by check-out.
pub const AUTO_LOG_NOTE: &str = "auto-logged via check-out";

/// Approval status of a worked-hours record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoursStatus {
    Pending,
    Approved,
    Rejected,
}

impl HoursStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for HoursStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidHoursStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for HoursStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An hours entry feeding the approval flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkedHoursRecord {
    /// Identifier assigned by the store. `None` until persisted.
    pub record_id: Option<i64>,
    pub volunteer_id: i64,
    pub organization_id: i64,
    pub event_id: Option<i64>,
    pub shift_id: i64,
    /// The assignment the hours were derived from.
    pub assignment_id: Option<i64>,
    /// When the record was logged.
    pub date: DateTime<Utc>,
    pub hours: f64,
    pub status: HoursStatus,
    pub note: Option<String>,
}

impl WorkedHoursRecord {
    /// Builds the pending record for a completed assignment.
    ///
    /// # Errors
    ///
    /// Returns `HoursNotDerived` if the assignment is not completed or carries
    /// no hours.
    pub fn from_check_out(
        assignment: &Assignment,
        shift: &Shift,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let hours: f64 = match (assignment.state, assignment.hours) {
            (AssignmentState::Completed, Some(hours)) => hours,
            _ => {
                return Err(DomainError::HoursNotDerived {
                    shift_id: assignment.shift_id,
                    volunteer_id: assignment.volunteer_id,
                });
            }
        };

        Ok(Self {
            record_id: None,
            volunteer_id: assignment.volunteer_id,
            organization_id: shift.organization_id,
            event_id: shift.event_id,
            shift_id: assignment.shift_id,
            assignment_id: assignment.assignment_id,
            date: now,
            hours,
            status: HoursStatus::Pending,
            note: Some(AUTO_LOG_NOTE.to_string()),
        })
    }
}
