// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shifts and the tasks within them.

use crate::window::TimeWindow;
use serde::{Deserialize, Serialize};

/// A scheduled, time-boxed unit of volunteer work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Identifier assigned by the store. `None` until persisted.
    pub shift_id: Option<i64>,
    pub organization_id: i64,
    pub event_id: Option<i64>,
    /// Scheduled window. Either bound may be missing in legacy data.
    pub window: TimeWindow,
    /// Concurrent assignee slots. Zero means unbounded.
    pub capacity: u32,
    /// Default task for the shift, if any.
    pub task_id: Option<i64>,
}

impl Shift {
    #[must_use]
    pub const fn new(
        organization_id: i64,
        event_id: Option<i64>,
        window: TimeWindow,
        capacity: u32,
    ) -> Self {
        Self {
            shift_id: None,
            organization_id,
            event_id,
            window,
            capacity,
            task_id: None,
        }
    }
}

/// A task volunteers can be assigned to within a shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier assigned by the store. `None` until persisted.
    pub task_id: Option<i64>,
    pub shift_id: i64,
    pub name: String,
}

impl Task {
    #[must_use]
    pub const fn new(shift_id: i64, name: String) -> Self {
        Self {
            task_id: None,
            shift_id,
            name,
        }
    }
}
