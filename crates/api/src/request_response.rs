// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shiftcall_domain::{Assignment, AssignmentPatch, CapacityLevel, PoolKind, WorkedHoursRecord};
use shiftcall_persistence::ReservationRecord;

use crate::error::ApiError;

// ============================================================================
// Assignments
// ============================================================================

/// API request to assign one volunteer to a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAssignmentRequest {
    pub shift_id: i64,
    pub volunteer_id: i64,
    /// Task within the shift.
    #[serde(default)]
    pub task_id: Option<i64>,
    /// Staff member making the assignment.
    #[serde(default)]
    pub assigned_by: Option<i64>,
}

/// API request to assign many volunteers to the same shift.
///
/// Each volunteer is admitted or refused independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCreateAssignmentsRequest {
    pub shift_id: i64,
    #[serde(default)]
    pub task_id: Option<i64>,
    pub volunteer_ids: Vec<i64>,
    #[serde(default)]
    pub assigned_by: Option<i64>,
}

/// API request to check a volunteer in or out of a shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRequest {
    pub shift_id: i64,
    pub volunteer_id: i64,
}

/// API request carrying a staff correction. Absent fields are unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAssignmentRequest {
    #[serde(default)]
    pub task_id: Option<i64>,
    #[serde(default)]
    pub assigned_by: Option<i64>,
    #[serde(default)]
    pub check_in_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub check_out_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<UpdateAssignmentRequest> for AssignmentPatch {
    fn from(request: UpdateAssignmentRequest) -> Self {
        Self {
            task_id: request.task_id,
            assigned_by: request.assigned_by,
            check_in_at: request.check_in_at,
            check_out_at: request.check_out_at,
            hours: request.hours,
            notes: request.notes,
        }
    }
}

/// An assignment as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentInfo {
    pub assignment_id: i64,
    pub shift_id: i64,
    pub volunteer_id: i64,
    pub task_id: Option<i64>,
    pub assigned_by: Option<i64>,
    /// `assigned`, `in-progress` or `completed`.
    pub state: String,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub hours: Option<f64>,
    pub notes: Option<String>,
}

impl TryFrom<&Assignment> for AssignmentInfo {
    type Error = ApiError;

    fn try_from(assignment: &Assignment) -> Result<Self, Self::Error> {
        let assignment_id: i64 = assignment.assignment_id.ok_or_else(|| ApiError::Internal {
            message: format!(
                "Assignment of volunteer {} to shift {} has no ID",
                assignment.volunteer_id, assignment.shift_id
            ),
        })?;

        Ok(Self {
            assignment_id,
            shift_id: assignment.shift_id,
            volunteer_id: assignment.volunteer_id,
            task_id: assignment.task_id,
            assigned_by: assignment.assigned_by,
            state: assignment.state.to_string(),
            check_in_at: assignment.check_in_at,
            check_out_at: assignment.check_out_at,
            hours: assignment.hours,
            notes: assignment.notes.clone(),
        })
    }
}

/// API response for a successful assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAssignmentResponse {
    pub assignment: AssignmentInfo,
    /// Checks that could not run, such as a shift without a complete window.
    pub admission_notes: Vec<String>,
}

/// One refused volunteer in a bulk assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkAssignmentError {
    pub volunteer_id: i64,
    /// Error category, as returned by [`ApiError::kind`].
    pub kind: String,
    /// The refusing rule, such as `no_overlap` or `daily_hour_cap`.
    pub rule: Option<String>,
    pub error: String,
}

impl BulkAssignmentError {
    #[must_use]
    pub fn new(volunteer_id: i64, err: &ApiError) -> Self {
        Self {
            volunteer_id,
            kind: String::from(err.kind()),
            rule: err.rule().map(String::from),
            error: err.to_string(),
        }
    }
}

/// API response for a bulk assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkCreateAssignmentsResponse {
    pub created: Vec<AssignmentInfo>,
    pub errors: Vec<BulkAssignmentError>,
}

/// API response for a check-out: the completed assignment and the hours
/// record derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutResponse {
    pub assignment: AssignmentInfo,
    pub hours_record: WorkedHoursInfo,
}

/// API response for a removed assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveAssignmentResponse {
    pub assignment_id: i64,
    pub message: String,
}

/// API response listing the assignments of a shift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListAssignmentsResponse {
    pub shift_id: i64,
    pub assignments: Vec<AssignmentInfo>,
}

// ============================================================================
// Worked hours
// ============================================================================

/// A worked-hours record as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkedHoursInfo {
    pub record_id: Option<i64>,
    pub volunteer_id: i64,
    pub organization_id: i64,
    pub event_id: Option<i64>,
    pub shift_id: i64,
    pub assignment_id: Option<i64>,
    pub date: DateTime<Utc>,
    pub hours: f64,
    /// `pending`, `approved` or `rejected`.
    pub status: String,
    pub note: Option<String>,
}

impl From<&WorkedHoursRecord> for WorkedHoursInfo {
    fn from(record: &WorkedHoursRecord) -> Self {
        Self {
            record_id: record.record_id,
            volunteer_id: record.volunteer_id,
            organization_id: record.organization_id,
            event_id: record.event_id,
            shift_id: record.shift_id,
            assignment_id: record.assignment_id,
            date: record.date,
            hours: record.hours,
            status: record.status.to_string(),
            note: record.note.clone(),
        }
    }
}

/// API response listing a volunteer's worked-hours records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListWorkedHoursResponse {
    pub volunteer_id: i64,
    pub records: Vec<WorkedHoursInfo>,
}

// ============================================================================
// Reference data
// ============================================================================

/// API request to register a shift supplied by the scheduling layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterShiftRequest {
    pub organization_id: i64,
    #[serde(default)]
    pub event_id: Option<i64>,
    /// Either bound may be absent for legacy shifts.
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    /// Concurrent assignee slots. Zero means unbounded.
    #[serde(default)]
    pub capacity: u32,
    /// Default task for the shift.
    #[serde(default)]
    pub task_id: Option<i64>,
}

/// API response for a registered shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterShiftResponse {
    pub shift_id: i64,
}

/// API request to register a task within a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTaskRequest {
    pub shift_id: i64,
    pub name: String,
}

/// API response for a registered task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterTaskResponse {
    pub task_id: i64,
    pub shift_id: i64,
}

// ============================================================================
// Capacity pools
// ============================================================================

/// API request to register a capacity pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPoolRequest {
    pub kind: PoolKind,
    pub resource_id: i64,
    /// Ceiling on units. Opportunity pools treat absent or zero as
    /// unlimited; other kinds require a total and `0` means no units.
    #[serde(default)]
    pub total: Option<u32>,
}

/// API request to reserve units from a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveRequest {
    pub kind: PoolKind,
    pub resource_id: i64,
    /// The applicant or borrower holding the reservation.
    pub holder_id: i64,
    pub quantity: u32,
}

/// A pool's current figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    pub kind: PoolKind,
    pub resource_id: i64,
    /// `None` for unlimited pools.
    pub total: Option<u32>,
    /// Meaningless for unlimited pools; reported as zero.
    pub available: u32,
}

impl From<&CapacityLevel> for PoolInfo {
    fn from(level: &CapacityLevel) -> Self {
        Self {
            kind: level.key().kind,
            resource_id: level.key().resource_id,
            total: level.capacity().total(),
            available: level.available(),
        }
    }
}

/// A reservation as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationInfo {
    pub reservation_id: i64,
    pub kind: PoolKind,
    pub resource_id: i64,
    pub holder_id: i64,
    pub quantity: u32,
    pub reserved_at: DateTime<Utc>,
    pub released_at: Option<DateTime<Utc>>,
}

impl From<&ReservationRecord> for ReservationInfo {
    fn from(record: &ReservationRecord) -> Self {
        Self {
            reservation_id: record.reservation_id,
            kind: record.pool.kind,
            resource_id: record.pool.resource_id,
            holder_id: record.holder_id,
            quantity: record.quantity,
            reserved_at: record.reserved_at,
            released_at: record.released_at,
        }
    }
}

/// API response describing a pool and its open reservations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetPoolResponse {
    pub pool: PoolInfo,
    pub active_reservations: Vec<ReservationInfo>,
}
