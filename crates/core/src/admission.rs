// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Scheduling admission: the checks a new assignment must pass.

use crate::config::EngineConfig;
use crate::error::CoreError;
use crate::state::AdmissionNote;
use shiftcall_domain::{
    CommittedWindow, DomainError, HourCapOutcome, OverlapOutcome, Shift, TimeWindow,
    check_overlap, evaluate_daily_cap,
};

/// Admits `shift` for `volunteer_id` against the volunteer's commitments.
///
/// Commitments on the candidate shift itself are ignored; the duplicate
/// rule covers those.
///
/// # Errors
///
/// Returns `OverlapConflict` when the shift intersects a committed shift and
/// `HourCapExceeded` when it would push the volunteer past the daily cap.
pub fn admit_shift(
    config: &EngineConfig,
    shift_id: i64,
    volunteer_id: i64,
    shift: &Shift,
    commitments: &[CommittedWindow],
) -> Result<Vec<AdmissionNote>, CoreError> {
    let others: Vec<CommittedWindow> = commitments
        .iter()
        .filter(|c| c.shift_id != shift_id)
        .copied()
        .collect();

    let mut notes: Vec<AdmissionNote> = Vec::new();

    match check_overlap(&shift.window, &others) {
        OverlapOutcome::Conflict {
            shift_id: conflicting_shift_id,
        } => {
            return Err(CoreError::DomainViolation(DomainError::OverlapConflict {
                volunteer_id,
                shift_id,
                conflicting_shift_id,
            }));
        }
        OverlapOutcome::MissingWindowData => {
            notes.push(AdmissionNote::CandidateWindowIncomplete { shift_id });
            return Ok(notes);
        }
        OverlapOutcome::Clear { skipped_shift_ids } => {
            notes.extend(
                skipped_shift_ids
                    .into_iter()
                    .map(|shift_id| AdmissionNote::CommittedWindowIncomplete { shift_id }),
            );
        }
    }

    let windows: Vec<TimeWindow> = others.iter().map(|c| c.window).collect();
    match evaluate_daily_cap(
        &shift.window,
        &windows,
        config.daily_hours_limit,
        config.timezone,
    )? {
        HourCapOutcome::Exceeded {
            day,
            committed_hours,
            candidate_hours,
            cap_hours,
        } => Err(CoreError::DomainViolation(DomainError::HourCapExceeded {
            volunteer_id,
            date: day,
            committed_hours,
            candidate_hours,
            cap_hours,
        })),
        HourCapOutcome::WithinCap { .. } => Ok(notes),
        HourCapOutcome::MissingWindowData => {
            notes.push(AdmissionNote::CandidateWindowIncomplete { shift_id });
            Ok(notes)
        }
    }
}
