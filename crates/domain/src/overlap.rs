// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Double-booking detection.
//!
//! Two half-open windows `[s1, e1)` and `[s2, e2)` overlap iff
//! `s1 < e2 && s2 < e1`. Back-to-back shifts never conflict.
//!
//! Only windows the volunteer is still committed to (assigned or in
//! progress) should be passed in; completed history never blocks new
//! scheduling.

use crate::window::TimeWindow;

/// A window the volunteer is already committed to, tagged with its shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommittedWindow {
    /// The shift the window belongs to.
    pub shift_id: i64,
    /// The shift window.
    pub window: TimeWindow,
}

/// Result of checking a candidate window against committed ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlapOutcome {
    /// No committed window intersects the candidate.
    Clear {
        /// Committed shifts skipped because their window is incomplete.
        skipped_shift_ids: Vec<i64>,
    },
    /// The candidate intersects a committed window.
    Conflict {
        /// The first committed shift found to intersect.
        shift_id: i64,
    },
    /// The candidate window is incomplete, so no conflict can be proven.
    MissingWindowData,
}

impl OverlapOutcome {
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Returns true when `candidate` intersects any of `committed`.
///
/// Incomplete windows on either side never count as an intersection.
#[must_use]
pub fn has_overlap(candidate: &TimeWindow, committed: &[TimeWindow]) -> bool {
    committed
        .iter()
        .any(|window| candidate.overlaps(window) == Some(true))
}

/// Checks a candidate window against committed windows, reporting which
/// shift conflicts and which checks could not be performed.
#[must_use]
pub fn check_overlap(candidate: &TimeWindow, committed: &[CommittedWindow]) -> OverlapOutcome {
    if !candidate.is_complete() {
        return OverlapOutcome::MissingWindowData;
    }

    let mut skipped_shift_ids: Vec<i64> = Vec::new();
    for entry in committed {
        match candidate.overlaps(&entry.window) {
            Some(true) => {
                return OverlapOutcome::Conflict {
                    shift_id: entry.shift_id,
                };
            }
            Some(false) => {}
            None => skipped_shift_ids.push(entry.shift_id),
        }
    }

    OverlapOutcome::Clear { skipped_shift_ids }
}
