// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Assignment, Shift, TimeWindow};
use chrono::{DateTime, TimeZone, Utc};

pub const SHIFT_ID: i64 = 10;
pub const VOLUNTEER_ID: i64 = 500;
pub const ORGANIZATION_ID: i64 = 3;
pub const EVENT_ID: i64 = 77;

/// 2026-05-09 at the given UTC time.
pub fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 9, hour, minute, second).unwrap()
}

pub fn create_test_shift() -> Shift {
    let window = TimeWindow::new(at(9, 0, 0), at(13, 0, 0)).unwrap();
    let mut shift = Shift::new(ORGANIZATION_ID, Some(EVENT_ID), window, 4);
    shift.shift_id = Some(SHIFT_ID);
    shift
}

pub fn create_test_assignment() -> Assignment {
    let mut assignment = Assignment::new(SHIFT_ID, VOLUNTEER_ID, None, Some(1));
    assignment.assignment_id = Some(1);
    assignment
}
