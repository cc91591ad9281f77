// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the shiftcall attendance engine.
//!
//! Translates requests into engine commands, runs them against the store and
//! translates results and errors into the API contract. HTTP concerns live
//! in the server crate.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod notify;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
    translate_transaction_error,
};
pub use handlers::{
    LifecycleManager, get_assignment, get_pool, list_assignments_for_shift, list_worked_hours,
    register_pool, register_shift, register_task, release, reserve,
};
pub use notify::{LogNotifier, Notification, Notifier, NotifyError, Pending, dispatch};
pub use request_response::{
    AssignmentInfo, AttendanceRequest, BulkAssignmentError, BulkCreateAssignmentsRequest,
    BulkCreateAssignmentsResponse, CheckOutResponse, CreateAssignmentRequest,
    CreateAssignmentResponse, GetPoolResponse, ListAssignmentsResponse, ListWorkedHoursResponse,
    PoolInfo, RegisterPoolRequest, RegisterShiftRequest, RegisterShiftResponse,
    RegisterTaskRequest, RegisterTaskResponse, RemoveAssignmentResponse, ReservationInfo,
    ReserveRequest, UpdateAssignmentRequest, WorkedHoursInfo,
};
