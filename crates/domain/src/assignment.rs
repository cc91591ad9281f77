// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Assignment lifecycle and attendance transitions.
//!
//! An assignment binds one volunteer to one shift (and optionally one task
//! within it) and moves through:
//!
//! ```text
//! assigned ──check-in──▶ in-progress ──check-out──▶ completed
//!    │
//!    └──remove──▶ removed (hard delete)
//! ```
//!
//! No transition skips a state. Check-out without a check-in is rejected,
//! as is a second check-in.

use crate::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Lifecycle state of an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentState {
    /// Scheduled, not yet checked in.
    Assigned,
    /// Checked in, not yet checked out.
    InProgress,
    /// Checked out; worked hours derived.
    Completed,
    /// Deleted before check-in.
    Removed,
}

impl AssignmentState {
    /// Returns the string representation of the state.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Removed => "removed",
        }
    }

    /// Returns true if an assignment in this state still occupies the
    /// volunteer's time and must be considered when scheduling.
    #[must_use]
    pub const fn blocks_scheduling(&self) -> bool {
        matches!(self, Self::Assigned | Self::InProgress)
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Removed)
    }

    /// Checks whether the lifecycle permits moving to `target`.
    ///
    /// Valid transitions are:
    /// - `Assigned` → `InProgress`
    /// - `InProgress` → `Completed`
    /// - `Assigned` → `Removed`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Assigned, Self::InProgress | Self::Removed)
                | (Self::InProgress, Self::Completed)
        )
    }

    /// Validates a transition to `target`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the transition is not permitted.
    pub const fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidStateTransition {
                from: *self,
                to: target,
            })
        }
    }
}

impl FromStr for AssignmentState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "assigned" => Ok(Self::Assigned),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "removed" => Ok(Self::Removed),
            _ => Err(DomainError::InvalidAssignmentState(s.to_string())),
        }
    }
}

impl std::fmt::Display for AssignmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The binding of one volunteer to one shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Identifier assigned by the store. `None` until persisted.
    pub assignment_id: Option<i64>,
    pub shift_id: i64,
    pub volunteer_id: i64,
    /// Task within the shift, if the volunteer was assigned to one.
    pub task_id: Option<i64>,
    /// Staff member who made the assignment.
    pub assigned_by: Option<i64>,
    pub state: AssignmentState,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    /// Worked hours, rounded to two decimals. Set at check-out.
    pub hours: Option<f64>,
    /// Free-form staff notes.
    pub notes: Option<String>,
}

impl Assignment {
    /// Creates a new, unpersisted assignment in the `Assigned` state.
    #[must_use]
    pub const fn new(
        shift_id: i64,
        volunteer_id: i64,
        task_id: Option<i64>,
        assigned_by: Option<i64>,
    ) -> Self {
        Self {
            assignment_id: None,
            shift_id,
            volunteer_id,
            task_id,
            assigned_by,
            state: AssignmentState::Assigned,
            check_in_at: None,
            check_out_at: None,
            hours: None,
            notes: None,
        }
    }

    /// Returns true if this assignment holds the `(shift, volunteer, task)` slot.
    #[must_use]
    pub fn holds_slot(&self, shift_id: i64, volunteer_id: i64, task_id: Option<i64>) -> bool {
        self.shift_id == shift_id && self.volunteer_id == volunteer_id && self.task_id == task_id
    }

    /// Records a check-in at `now`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyCheckedIn` if a check-in was already recorded and
    /// `InvalidStateTransition` if the assignment is not `Assigned`.
    pub fn check_in(&self, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if self.check_in_at.is_some() {
            return Err(DomainError::AlreadyCheckedIn {
                shift_id: self.shift_id,
                volunteer_id: self.volunteer_id,
            });
        }
        self.state.validate_transition(AssignmentState::InProgress)?;

        Ok(Self {
            state: AssignmentState::InProgress,
            check_in_at: Some(now),
            ..self.clone()
        })
    }

    /// Records a check-out at `now` and derives worked hours.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyCheckedOut` if a check-out was already recorded,
    /// `NotCheckedIn` if there is no check-in, and `InvalidStateTransition`
    /// if the assignment is not `InProgress`.
    pub fn check_out(&self, now: DateTime<Utc>) -> Result<Self, DomainError> {
        if self.check_out_at.is_some() || self.state == AssignmentState::Completed {
            return Err(DomainError::AlreadyCheckedOut {
                shift_id: self.shift_id,
                volunteer_id: self.volunteer_id,
            });
        }
        let Some(check_in_at) = self.check_in_at else {
            return Err(DomainError::NotCheckedIn {
                shift_id: self.shift_id,
                volunteer_id: self.volunteer_id,
            });
        };
        self.state.validate_transition(AssignmentState::Completed)?;

        Ok(Self {
            state: AssignmentState::Completed,
            check_out_at: Some(now),
            hours: Some(compute_worked_hours(check_in_at, now)),
            ..self.clone()
        })
    }

    /// Validates that the assignment may be hard-deleted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidStateTransition` once the volunteer has checked in.
    pub const fn ensure_removable(&self) -> Result<(), DomainError> {
        self.state.validate_transition(AssignmentState::Removed)
    }

    fn ensure_correctable(&self, patch: &AssignmentPatch) -> Result<(), DomainError> {
        let checked_in: bool = matches!(
            self.state,
            AssignmentState::InProgress | AssignmentState::Completed
        );
        let checked_out: bool = self.state == AssignmentState::Completed;

        let refused: Option<&str> = if patch.check_in_at.is_some() && !checked_in {
            Some("check-in time")
        } else if patch.check_out_at.is_some() && !checked_out {
            Some("check-out time")
        } else if patch.hours.is_some() && !checked_out {
            Some("hours")
        } else {
            None
        };

        match refused {
            Some(field) => Err(DomainError::InvalidCorrection {
                reason: format!("{field} cannot be corrected on a '{}' assignment", self.state),
            }),
            None => Ok(()),
        }
    }

    /// Merges a staff correction into the assignment.
    ///
    /// When either attendance timestamp is corrected and no explicit hours are
    /// given, hours are re-derived from the corrected timestamps.
    ///
    /// Attendance fields can only be corrected once the lifecycle has
    /// reached them: check-in after check-in, check-out and hours after
    /// check-out. State itself only moves through check-in and check-out.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCorrection` if the patch touches attendance the
    /// assignment has not reached, or if the merged record would check out
    /// before checking in or carry negative or non-finite hours.
    pub fn apply_patch(&self, patch: &AssignmentPatch) -> Result<Self, DomainError> {
        self.ensure_correctable(patch)?;
        let mut next: Self = self.clone();

        if let Some(task_id) = patch.task_id {
            next.task_id = Some(task_id);
        }
        if let Some(assigned_by) = patch.assigned_by {
            next.assigned_by = Some(assigned_by);
        }
        if let Some(check_in_at) = patch.check_in_at {
            next.check_in_at = Some(check_in_at);
        }
        if let Some(check_out_at) = patch.check_out_at {
            next.check_out_at = Some(check_out_at);
        }
        if let Some(notes) = &patch.notes {
            next.notes = Some(notes.clone());
        }

        if next.check_out_at.is_some() && next.check_in_at.is_none() {
            return Err(DomainError::InvalidCorrection {
                reason: String::from("check-out time requires a check-in time"),
            });
        }
        if let (Some(check_in_at), Some(check_out_at)) = (next.check_in_at, next.check_out_at) {
            if check_out_at < check_in_at {
                return Err(DomainError::InvalidCorrection {
                    reason: format!(
                        "check-out {} is before check-in {}",
                        check_out_at.to_rfc3339(),
                        check_in_at.to_rfc3339()
                    ),
                });
            }
        }

        let timestamps_changed: bool = patch.check_in_at.is_some() || patch.check_out_at.is_some();
        match patch.hours {
            Some(hours) if !hours.is_finite() || hours < 0.0 => {
                return Err(DomainError::InvalidCorrection {
                    reason: format!("hours must be a non-negative number, got {hours}"),
                });
            }
            Some(hours) => next.hours = Some(round_hours(hours)),
            None if timestamps_changed => {
                if let (Some(check_in_at), Some(check_out_at)) =
                    (next.check_in_at, next.check_out_at)
                {
                    next.hours = Some(compute_worked_hours(check_in_at, check_out_at));
                }
            }
            None => {}
        }

        Ok(next)
    }
}

/// Staff-correctable assignment fields. `None` leaves a field unchanged.
///
/// Lifecycle state is deliberately absent: it only moves through
/// check-in, check-out and removal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentPatch {
    pub task_id: Option<i64>,
    pub assigned_by: Option<i64>,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub hours: Option<f64>,
    pub notes: Option<String>,
}

impl AssignmentPatch {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.task_id.is_none()
            && self.assigned_by.is_none()
            && self.check_in_at.is_none()
            && self.check_out_at.is_none()
            && self.hours.is_none()
            && self.notes.is_none()
    }
}

/// Hours between check-in and check-out, rounded to two decimals.
///
/// A check-out recorded before the check-in (clock skew between devices)
/// yields zero rather than a negative value.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute_worked_hours(check_in_at: DateTime<Utc>, check_out_at: DateTime<Utc>) -> f64 {
    let millis: i64 = (check_out_at - check_in_at).num_milliseconds().max(0);
    round_hours(millis as f64 / MILLIS_PER_HOUR)
}

fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}
