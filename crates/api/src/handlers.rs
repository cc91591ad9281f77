// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.

use chrono::{DateTime, Utc};
use shiftcall::{Command, EngineConfig, TransitionResult};
use shiftcall_domain::{
    Assignment, AssignmentPatch, Capacity, CapacityLevel, DomainError, PoolKey, PoolKind, Shift,
    Task, TimeWindow, WorkedHoursRecord,
};
use shiftcall_persistence::{Persistence, ReservationRecord};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{
    ApiError, translate_domain_error, translate_persistence_error, translate_transaction_error,
};
use crate::notify::{Notification, Notifier, Pending};
use crate::request_response::{
    AssignmentInfo, AttendanceRequest, BulkAssignmentError, BulkCreateAssignmentsRequest,
    BulkCreateAssignmentsResponse, CheckOutResponse, CreateAssignmentRequest,
    CreateAssignmentResponse, GetPoolResponse, ListAssignmentsResponse, ListWorkedHoursResponse,
    PoolInfo, RegisterPoolRequest, RegisterShiftRequest, RegisterShiftResponse,
    RegisterTaskRequest, RegisterTaskResponse, RemoveAssignmentResponse, ReservationInfo,
    ReserveRequest, UpdateAssignmentRequest, WorkedHoursInfo,
};

/// Runs assignment commands against a store.
///
/// Holds the engine configuration and the notification channel; the store
/// is passed per call so the caller controls how the connection is shared.
#[derive(Clone)]
pub struct LifecycleManager {
    config: EngineConfig,
    notifier: Arc<dyn Notifier>,
}

impl LifecycleManager {
    #[must_use]
    pub fn new(config: EngineConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self { config, notifier }
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn execute(
        &self,
        persistence: &mut Persistence,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<TransitionResult, ApiError> {
        persistence
            .execute(&self.config, command, now)
            .map_err(translate_transaction_error)
    }

    /// Assigns a volunteer to a shift.
    ///
    /// On success a `shift_assigned` notification is dispatched; its failure
    /// is logged and does not affect the result.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The shift or task does not exist
    /// - The shift overlaps another shift the volunteer is committed to
    /// - The shift would take the volunteer past the daily hour cap
    /// - The volunteer already holds this assignment
    /// - Database operations fail
    pub fn create_assignment(
        &self,
        persistence: &mut Persistence,
        request: &CreateAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<CreateAssignmentResponse, ApiError> {
        let pending = self.create_assignment_pending(persistence, request, now)?;
        Ok(self.deliver(pending))
    }

    /// Assigns a volunteer to a shift without notifying anyone yet.
    ///
    /// The returned [`Pending`] holds the committed assignment and its
    /// `shift_assigned` notification; pass it to [`Self::deliver`] once the
    /// store is no longer locked.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_assignment`].
    pub fn create_assignment_pending(
        &self,
        persistence: &mut Persistence,
        request: &CreateAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Pending<CreateAssignmentResponse>, ApiError> {
        let result: TransitionResult = self.execute(
            persistence,
            Command::CreateAssignment {
                shift_id: request.shift_id,
                volunteer_id: request.volunteer_id,
                task_id: request.task_id,
                assigned_by: request.assigned_by,
            },
            now,
        )?;

        let response = CreateAssignmentResponse {
            assignment: AssignmentInfo::try_from(&result.assignment)?,
            admission_notes: result.notes.iter().map(ToString::to_string).collect(),
        };
        Ok(Pending::new(
            response,
            vec![Notification::ShiftAssigned {
                volunteer_id: request.volunteer_id,
                shift_id: request.shift_id,
                task_id: request.task_id,
            }],
        ))
    }

    /// Assigns each listed volunteer to the same shift.
    ///
    /// Every volunteer is handled in its own transaction, so one refusal
    /// neither aborts the batch nor undoes earlier assignments.
    #[must_use]
    pub fn bulk_create_assignments(
        &self,
        persistence: &mut Persistence,
        request: &BulkCreateAssignmentsRequest,
        now: DateTime<Utc>,
    ) -> BulkCreateAssignmentsResponse {
        let pending = self.bulk_create_assignments_pending(persistence, request, now);
        self.deliver(pending)
    }

    /// Bulk assignment that defers every `shift_assigned` notification.
    pub fn bulk_create_assignments_pending(
        &self,
        persistence: &mut Persistence,
        request: &BulkCreateAssignmentsRequest,
        now: DateTime<Utc>,
    ) -> Pending<BulkCreateAssignmentsResponse> {
        let mut created: Vec<AssignmentInfo> = Vec::with_capacity(request.volunteer_ids.len());
        let mut errors: Vec<BulkAssignmentError> = Vec::new();
        let mut notifications: Vec<Notification> = Vec::new();

        for &volunteer_id in &request.volunteer_ids {
            let item = CreateAssignmentRequest {
                shift_id: request.shift_id,
                volunteer_id,
                task_id: request.task_id,
                assigned_by: request.assigned_by,
            };
            match self.create_assignment_pending(persistence, &item, now) {
                Ok(pending) => {
                    notifications.extend_from_slice(pending.notifications());
                    created.push(pending.into_response().assignment);
                }
                Err(err) => errors.push(BulkAssignmentError::new(volunteer_id, &err)),
            }
        }

        info!(
            shift_id = request.shift_id,
            requested = request.volunteer_ids.len(),
            created = created.len(),
            refused = errors.len(),
            "Bulk assignment finished"
        );
        Pending::new(BulkCreateAssignmentsResponse { created, errors }, notifications)
    }

    /// Delivers the notifications held by `pending` and returns its response.
    #[must_use]
    pub fn deliver<T>(&self, pending: Pending<T>) -> T {
        pending.deliver(self.notifier.as_ref())
    }

    /// Records a volunteer's arrival for a shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the volunteer has no assignment on the shift, is
    /// already checked in, or the database fails.
    pub fn check_in(
        &self,
        persistence: &mut Persistence,
        request: AttendanceRequest,
        now: DateTime<Utc>,
    ) -> Result<AssignmentInfo, ApiError> {
        let result: TransitionResult = self.execute(
            persistence,
            Command::CheckIn {
                shift_id: request.shift_id,
                volunteer_id: request.volunteer_id,
            },
            now,
        )?;
        AssignmentInfo::try_from(&result.assignment)
    }

    /// Records a volunteer's departure and logs the worked hours.
    ///
    /// # Errors
    ///
    /// Returns an error if the volunteer has no assignment on the shift, has
    /// not checked in, has already checked out, or the database fails. In
    /// every case neither the assignment nor the hours log changes.
    pub fn check_out(
        &self,
        persistence: &mut Persistence,
        request: AttendanceRequest,
        now: DateTime<Utc>,
    ) -> Result<CheckOutResponse, ApiError> {
        let result: TransitionResult = self.execute(
            persistence,
            Command::CheckOut {
                shift_id: request.shift_id,
                volunteer_id: request.volunteer_id,
            },
            now,
        )?;

        let record: &WorkedHoursRecord =
            result.hours_record.as_ref().ok_or_else(|| ApiError::Internal {
                message: format!(
                    "Check-out of volunteer {} from shift {} produced no hours record",
                    request.volunteer_id, request.shift_id
                ),
            })?;

        Ok(CheckOutResponse {
            assignment: AssignmentInfo::try_from(&result.assignment)?,
            hours_record: WorkedHoursInfo::from(record),
        })
    }

    /// Applies a staff correction to an assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the request changes nothing, the assignment or
    /// task does not exist, the corrected record is inconsistent, or the
    /// database fails.
    pub fn update_assignment(
        &self,
        persistence: &mut Persistence,
        assignment_id: i64,
        request: UpdateAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<AssignmentInfo, ApiError> {
        let patch: AssignmentPatch = AssignmentPatch::from(request);
        if patch.is_empty() {
            return Err(ApiError::InvalidInput {
                field: String::from("body"),
                message: String::from("At least one field must be provided"),
            });
        }

        let result: TransitionResult = self.execute(
            persistence,
            Command::UpdateAssignment {
                assignment_id,
                patch,
            },
            now,
        )?;
        AssignmentInfo::try_from(&result.assignment)
    }

    /// Deletes an assignment the volunteer has not started.
    ///
    /// # Errors
    ///
    /// Returns an error if the assignment does not exist, has been checked
    /// in, or the database fails.
    pub fn remove_assignment(
        &self,
        persistence: &mut Persistence,
        assignment_id: i64,
        now: DateTime<Utc>,
    ) -> Result<RemoveAssignmentResponse, ApiError> {
        let result: TransitionResult = self.execute(
            persistence,
            Command::RemoveAssignment { assignment_id },
            now,
        )?;

        Ok(RemoveAssignmentResponse {
            assignment_id,
            message: format!(
                "Removed volunteer {} from shift {}",
                result.assignment.volunteer_id, result.assignment.shift_id
            ),
        })
    }
}

// ============================================================================
// Reference data
// ============================================================================

/// Registers a shift supplied by the scheduling layer.
///
/// # Errors
///
/// Returns an error if both window bounds are given and the end is not after
/// the start, or the database fails.
pub fn register_shift(
    persistence: &mut Persistence,
    request: &RegisterShiftRequest,
) -> Result<RegisterShiftResponse, ApiError> {
    let window: TimeWindow =
        TimeWindow::from_parts(request.starts_at, request.ends_at).map_err(translate_domain_error)?;
    if !window.is_complete() {
        warn!(
            organization_id = request.organization_id,
            "Registering shift without a complete time window"
        );
    }

    let mut shift: Shift = Shift::new(
        request.organization_id,
        request.event_id,
        window,
        request.capacity,
    );
    shift.task_id = request.task_id;

    let shift_id: i64 = persistence
        .register_shift(&shift)
        .map_err(translate_persistence_error)?;
    Ok(RegisterShiftResponse { shift_id })
}

/// Registers a task within an existing shift.
///
/// # Errors
///
/// Returns an error if the name is blank, the shift does not exist, or the
/// database fails.
pub fn register_task(
    persistence: &mut Persistence,
    request: &RegisterTaskRequest,
) -> Result<RegisterTaskResponse, ApiError> {
    let name: &str = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("Task name must not be empty"),
        });
    }

    let task_id: i64 = persistence
        .register_task(&Task::new(request.shift_id, name.to_string()))
        .map_err(translate_transaction_error)?;
    Ok(RegisterTaskResponse {
        task_id,
        shift_id: request.shift_id,
    })
}

// ============================================================================
// Capacity pools
// ============================================================================

/// Registers a capacity pool with every unit available.
///
/// # Errors
///
/// Returns an error if the pool already exists or the database fails.
pub fn register_pool(
    persistence: &mut Persistence,
    request: &RegisterPoolRequest,
) -> Result<PoolInfo, ApiError> {
    let key: PoolKey = PoolKey::new(request.kind, request.resource_id);
    let capacity: Capacity =
        Capacity::for_pool(key, request.total).map_err(translate_domain_error)?;

    let level: CapacityLevel = persistence
        .register_pool(key, capacity)
        .map_err(translate_transaction_error)?;
    Ok(PoolInfo::from(&level))
}

/// Reserves units from a pool: accepting an application or checking out a
/// resource.
///
/// # Errors
///
/// Returns an error if the pool does not exist, the quantity is zero, the
/// pool cannot cover the request, or the database fails.
pub fn reserve(
    persistence: &mut Persistence,
    request: &ReserveRequest,
    now: DateTime<Utc>,
) -> Result<ReservationInfo, ApiError> {
    let key: PoolKey = PoolKey::new(request.kind, request.resource_id);
    let record: ReservationRecord = persistence
        .reserve(key, request.holder_id, request.quantity, now)
        .map_err(translate_transaction_error)?;
    Ok(ReservationInfo::from(&record))
}

/// Returns a reservation's units to its pool.
///
/// # Errors
///
/// Returns an error if the reservation does not exist or was already
/// released, or the database fails.
pub fn release(
    persistence: &mut Persistence,
    reservation_id: i64,
    now: DateTime<Utc>,
) -> Result<ReservationInfo, ApiError> {
    let record: ReservationRecord = persistence
        .release(reservation_id, now)
        .map_err(translate_transaction_error)?;
    Ok(ReservationInfo::from(&record))
}

/// Retrieves a pool's figures and open reservations.
///
/// # Errors
///
/// Returns an error if the pool does not exist or the database fails.
pub fn get_pool(
    persistence: &mut Persistence,
    kind: PoolKind,
    resource_id: i64,
) -> Result<GetPoolResponse, ApiError> {
    let key: PoolKey = PoolKey::new(kind, resource_id);
    let level: CapacityLevel = persistence
        .get_pool(key)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| {
            translate_domain_error(DomainError::PoolNotFound {
                pool: key.to_string(),
            })
        })?;
    let reservations: Vec<ReservationRecord> = persistence
        .list_active_reservations(key)
        .map_err(translate_persistence_error)?;

    Ok(GetPoolResponse {
        pool: PoolInfo::from(&level),
        active_reservations: reservations.iter().map(ReservationInfo::from).collect(),
    })
}

// ============================================================================
// Read models
// ============================================================================

/// Retrieves one assignment.
///
/// # Errors
///
/// Returns an error if the assignment does not exist or the database fails.
pub fn get_assignment(
    persistence: &mut Persistence,
    assignment_id: i64,
) -> Result<AssignmentInfo, ApiError> {
    let assignment: Assignment = persistence
        .get_assignment(assignment_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::AssignmentNotFound { assignment_id }))?;
    AssignmentInfo::try_from(&assignment)
}

/// Lists the assignments of a shift in creation order.
///
/// # Errors
///
/// Returns an error if the shift does not exist or the database fails.
pub fn list_assignments_for_shift(
    persistence: &mut Persistence,
    shift_id: i64,
) -> Result<ListAssignmentsResponse, ApiError> {
    if persistence
        .get_shift(shift_id)
        .map_err(translate_persistence_error)?
        .is_none()
    {
        return Err(translate_domain_error(DomainError::ShiftNotFound {
            shift_id,
        }));
    }

    let assignments: Vec<AssignmentInfo> = persistence
        .list_assignments_for_shift(shift_id)
        .map_err(translate_persistence_error)?
        .iter()
        .map(AssignmentInfo::try_from)
        .collect::<Result<_, _>>()?;

    Ok(ListAssignmentsResponse {
        shift_id,
        assignments,
    })
}

/// Lists a volunteer's worked-hours records, most recent first.
///
/// # Errors
///
/// Returns an error if the database fails.
pub fn list_worked_hours(
    persistence: &mut Persistence,
    volunteer_id: i64,
) -> Result<ListWorkedHoursResponse, ApiError> {
    let records: Vec<WorkedHoursRecord> = persistence
        .list_hours_for_volunteer(volunteer_id)
        .map_err(translate_persistence_error)?;

    Ok(ListWorkedHoursResponse {
        volunteer_id,
        records: records.iter().map(WorkedHoursInfo::from).collect(),
    })
}
