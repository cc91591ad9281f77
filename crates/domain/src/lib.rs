// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment;
mod capacity;
mod error;
mod hour_cap;
mod hours;
mod overlap;
mod shift;
mod window;

#[cfg(test)]
mod tests;

pub use assignment::{Assignment, AssignmentPatch, AssignmentState, compute_worked_hours};
pub use capacity::{Capacity, CapacityLevel, CapacityPool, PoolKey, PoolKind, Reservation};
pub use error::DomainError;
pub use hour_cap::{
    DEFAULT_DAILY_HOURS_LIMIT, DailyHourCap, HourCapOutcome, calendar_day_bounds,
    evaluate_daily_cap, would_exceed_daily_cap,
};
pub use hours::{AUTO_LOG_NOTE, HoursStatus, WorkedHoursRecord};
pub use overlap::{CommittedWindow, OverlapOutcome, check_overlap, has_overlap};
pub use shift::{Shift, Task};
pub use window::{TimeWindow, seconds_to_hours};
