// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftcall_domain::AssignmentPatch;

/// A command represents staff or volunteer intent as data only.
///
/// Commands are the only way to change assignment state.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Assign a volunteer to a shift.
    CreateAssignment {
        /// The shift to assign to.
        shift_id: i64,
        /// The volunteer being assigned.
        volunteer_id: i64,
        /// Optional task within the shift.
        task_id: Option<i64>,
        /// Staff member making the assignment.
        assigned_by: Option<i64>,
    },
    /// Record a volunteer's arrival.
    CheckIn {
        /// The shift.
        shift_id: i64,
        /// The volunteer.
        volunteer_id: i64,
    },
    /// Record a volunteer's departure and log worked hours.
    CheckOut {
        /// The shift.
        shift_id: i64,
        /// The volunteer.
        volunteer_id: i64,
    },
    /// Apply a staff correction.
    UpdateAssignment {
        /// The assignment to correct.
        assignment_id: i64,
        /// Fields to change.
        patch: AssignmentPatch,
    },
    /// Delete an assignment before check-in.
    RemoveAssignment {
        /// The assignment to delete.
        assignment_id: i64,
    },
}

impl Command {
    /// Stable operation name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateAssignment { .. } => "CreateAssignment",
            Self::CheckIn { .. } => "CheckIn",
            Self::CheckOut { .. } => "CheckOut",
            Self::UpdateAssignment { .. } => "UpdateAssignment",
            Self::RemoveAssignment { .. } => "RemoveAssignment",
        }
    }
}
