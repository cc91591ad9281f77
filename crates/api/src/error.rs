// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use shiftcall::CoreError;
use shiftcall_domain::DomainError;
use shiftcall_persistence::{PersistenceError, TransactionError};
use tracing::error;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A scheduling or capacity rule refused the request.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The assignment is not in a state that permits the request.
    LifecycleConflict {
        /// The lifecycle rule that was violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::LifecycleConflict { rule, message } => {
                write!(f, "Lifecycle conflict ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Stable name of the error category, used in per-item results.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DomainRuleViolation { .. } => "domain_rule_violation",
            Self::LifecycleConflict { .. } => "lifecycle_conflict",
            Self::InvalidInput { .. } => "invalid_input",
            Self::ResourceNotFound { .. } => "resource_not_found",
            Self::Internal { .. } => "internal",
        }
    }

    /// The violated rule, for rule violations and lifecycle conflicts.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        match self {
            Self::DomainRuleViolation { rule, .. } | Self::LifecycleConflict { rule, .. } => {
                Some(rule.as_str())
            }
            Self::InvalidInput { .. } | Self::ResourceNotFound { .. } | Self::Internal { .. } => {
                None
            }
        }
    }
}

fn rule_violation(rule: &str, err: &DomainError) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: String::from(rule),
        message: err.to_string(),
    }
}

fn lifecycle_conflict(rule: &str, err: &DomainError) -> ApiError {
    ApiError::LifecycleConflict {
        rule: String::from(rule),
        message: err.to_string(),
    }
}

fn not_found(resource_type: &str, err: &DomainError) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from(resource_type),
        message: err.to_string(),
    }
}

fn invalid_input(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: String::from(field),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::ShiftNotFound { .. } => not_found("Shift", &err),
        DomainError::TaskNotFound { .. } => not_found("Task", &err),
        DomainError::AssignmentNotFound { .. }
        | DomainError::AssignmentNotFoundForVolunteer { .. } => not_found("Assignment", &err),
        DomainError::PoolNotFound { .. } => not_found("Capacity pool", &err),
        DomainError::ReservationNotFound { .. } => not_found("Reservation", &err),

        DomainError::OverlapConflict { .. } => rule_violation("no_overlap", &err),
        DomainError::HourCapExceeded { .. } => rule_violation("daily_hour_cap", &err),
        DomainError::DuplicateAssignment { .. } => rule_violation("unique_assignment", &err),
        DomainError::CapacityExceeded { .. } => rule_violation("capacity", &err),
        DomainError::DuplicatePool { .. } => rule_violation("unique_pool", &err),

        DomainError::AlreadyCheckedIn { .. } => lifecycle_conflict("single_check_in", &err),
        DomainError::NotCheckedIn { .. } => lifecycle_conflict("check_in_required", &err),
        DomainError::AlreadyCheckedOut { .. } => lifecycle_conflict("single_check_out", &err),
        DomainError::InvalidStateTransition { .. } => {
            lifecycle_conflict("assignment_lifecycle", &err)
        }
        DomainError::ReservationAlreadyReleased { .. } => {
            lifecycle_conflict("single_release", &err)
        }
        DomainError::ReleaseExceedsTotal { .. } => lifecycle_conflict("release_bound", &err),

        DomainError::InvalidTimeWindow { .. } => invalid_input("window", &err),
        DomainError::InvalidHourCap { .. } => invalid_input("daily_hours_limit", &err),
        DomainError::InvalidTimezone(_) => invalid_input("timezone", &err),
        DomainError::InvalidCorrection { .. } => invalid_input("correction", &err),
        DomainError::InvalidQuantity { .. } => invalid_input("quantity", &err),
        DomainError::InvalidPoolKind(_) => invalid_input("pool_kind", &err),
        DomainError::PoolTotalRequired { .. } => invalid_input("total", &err),
        DomainError::InvalidAssignmentState(_) => invalid_input("state", &err),
        DomainError::InvalidHoursStatus(_) => invalid_input("status", &err),

        DomainError::DayBoundaryUnresolvable { .. }
        | DomainError::HoursNotDerived { .. }
        | DomainError::InvalidCapacityLevel { .. }
        | DomainError::ReservationPoolMismatch { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::InvalidConfiguration(domain_err) => ApiError::Internal {
            message: format!("Invalid engine configuration: {domain_err}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Store failures are logged here; the client only learns that the
/// operation failed.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    error!(error = %err, "Persistence error");
    ApiError::Internal {
        message: format!("Persistence error: {err}"),
    }
}

/// Translates a failed write transaction into an API error.
#[must_use]
pub fn translate_transaction_error(err: TransactionError) -> ApiError {
    match err {
        TransactionError::Rejected(core_err) => translate_core_error(core_err),
        TransactionError::Persistence(persistence_err) => {
            translate_persistence_error(persistence_err)
        }
    }
}
