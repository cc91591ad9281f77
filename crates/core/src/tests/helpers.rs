// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Scope;
use chrono::{DateTime, TimeZone, Utc};
use shiftcall_domain::{Assignment, AssignmentState, CommittedWindow, Shift, TimeWindow};

pub const SHIFT_ID: i64 = 1;
pub const OTHER_SHIFT_ID: i64 = 2;
pub const VOLUNTEER_ID: i64 = 100;
pub const ORGANIZATION_ID: i64 = 9;

/// 2026-05-09 at the given UTC time.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 9, hour, minute, 0).unwrap()
}

pub fn window(start: (u32, u32), end: (u32, u32)) -> TimeWindow {
    TimeWindow::new(at(start.0, start.1), at(end.0, end.1)).unwrap()
}

pub fn create_test_shift(shift_id: i64, window: TimeWindow) -> Shift {
    let mut shift = Shift::new(ORGANIZATION_ID, None, window, 0);
    shift.shift_id = Some(shift_id);
    shift
}

pub fn create_stored_assignment(assignment_id: i64, state: AssignmentState) -> Assignment {
    let mut assignment = Assignment::new(SHIFT_ID, VOLUNTEER_ID, None, None);
    assignment.assignment_id = Some(assignment_id);
    assignment.state = state;
    if matches!(state, AssignmentState::InProgress | AssignmentState::Completed) {
        assignment.check_in_at = Some(at(9, 0));
    }
    if state == AssignmentState::Completed {
        assignment.check_out_at = Some(at(12, 0));
        assignment.hours = Some(3.0);
    }
    assignment
}

/// Scope for creating an assignment on a 09:00-13:00 shift.
pub fn create_scope(commitments: Vec<CommittedWindow>) -> Scope {
    Scope {
        shift: Some(create_test_shift(SHIFT_ID, window((9, 0), (13, 0)))),
        task_exists: false,
        assignments: Vec::new(),
        commitments,
    }
}

pub fn scope_with_assignment(assignment: Assignment) -> Scope {
    Scope {
        shift: Some(create_test_shift(SHIFT_ID, window((9, 0), (13, 0)))),
        task_exists: false,
        assignments: vec![assignment],
        commitments: Vec::new(),
    }
}
