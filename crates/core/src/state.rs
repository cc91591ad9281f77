// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftcall_domain::{Assignment, CommittedWindow, Shift, WorkedHoursRecord};

/// The slice of stored state a single command is evaluated against.
///
/// The store loads a scope inside the same write transaction that will
/// persist the result, so nothing in it can change between the check and
/// the write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    /// The shift the command targets, if it exists.
    pub shift: Option<Shift>,
    /// Whether the task named by the command exists on the shift.
    /// Ignored when the command names no task.
    pub task_exists: bool,
    /// Stored assignments relevant to the command:
    /// - create: the volunteer's assignments on the shift
    /// - check-in/check-out: the volunteer's assignments on the shift
    /// - update/remove: the target assignment plus the volunteer's other
    ///   assignments on the same shift
    pub assignments: Vec<Assignment>,
    /// Windows of other shifts the volunteer is still committed to.
    pub commitments: Vec<CommittedWindow>,
}

/// Which transition a command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    Created,
    CheckedIn,
    CheckedOut,
    Updated,
    Removed,
}

/// A check that could not be performed because a window was incomplete.
///
/// Admission still succeeds; the note travels with the result so callers
/// can surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionNote {
    /// The candidate shift lacks a start or end; overlap and cap were not checked.
    CandidateWindowIncomplete {
        /// The candidate shift.
        shift_id: i64,
    },
    /// A committed shift lacks a start or end and was left out of the overlap check.
    CommittedWindowIncomplete {
        /// The committed shift.
        shift_id: i64,
    },
}

impl std::fmt::Display for AdmissionNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CandidateWindowIncomplete { shift_id } => write!(
                f,
                "Shift {shift_id} has no complete time window; overlap and hour cap were not checked"
            ),
            Self::CommittedWindowIncomplete { shift_id } => write!(
                f,
                "Committed shift {shift_id} has no complete time window and was skipped in the overlap check"
            ),
        }
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    pub kind: TransitionKind,
    /// The assignment after the transition. For removals, the deleted row.
    pub assignment: Assignment,
    /// The worked-hours record to insert. Present only on check-out.
    pub hours_record: Option<WorkedHoursRecord>,
    pub notes: Vec<AdmissionNote>,
}
