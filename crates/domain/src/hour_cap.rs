// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Daily hour cap evaluation.
//!
//! The day a candidate shift belongs to is the local calendar day of its
//! **start**, in the configured timezone. Committed windows count toward
//! that day only when both their start and their end fall inside
//! `[local midnight, next local midnight]`. A committed window that
//! crosses either midnight is left out of the sum entirely rather than
//! pro-rated.
//!
//! ## Invariants
//!
//! - Admission is rejected iff `committed + candidate > cap` (strictly)
//! - Durations are summed in whole seconds before comparing
//! - The cap is a positive, finite number of hours

use crate::error::DomainError;
use crate::window::{TimeWindow, seconds_to_hours};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Default ceiling on committed hours per volunteer per calendar day.
pub const DEFAULT_DAILY_HOURS_LIMIT: f64 = 12.0;

/// A validated daily hour ceiling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyHourCap(f64);

impl DailyHourCap {
    /// Creates a cap of `hours`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidHourCap` if `hours` is not positive and finite.
    pub fn new(hours: f64) -> Result<Self, DomainError> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(DomainError::InvalidHourCap { value: hours });
        }
        Ok(Self(hours))
    }

    #[must_use]
    pub const fn hours(self) -> f64 {
        self.0
    }

    fn seconds(self) -> f64 {
        self.0 * 3600.0
    }
}

impl Default for DailyHourCap {
    fn default() -> Self {
        Self(DEFAULT_DAILY_HOURS_LIMIT)
    }
}

/// Result of evaluating a candidate shift against the daily cap.
#[derive(Debug, Clone, PartialEq)]
pub enum HourCapOutcome {
    /// The candidate fits under the cap.
    WithinCap {
        /// The calendar day evaluated.
        day: NaiveDate,
        /// Committed plus candidate hours.
        total_hours: f64,
    },
    /// The candidate would push the day past the cap.
    Exceeded {
        /// The calendar day evaluated.
        day: NaiveDate,
        /// Hours already committed on the day.
        committed_hours: f64,
        /// Candidate duration in hours.
        candidate_hours: f64,
        /// The cap.
        cap_hours: f64,
    },
    /// The candidate window is incomplete, so its day and duration are unknown.
    MissingWindowData,
}

/// Resolves the UTC instants of local midnight at the start and end of the
/// calendar day containing `instant`.
///
/// # Errors
///
/// Returns `DomainError::DayBoundaryUnresolvable` if local midnight cannot be
/// mapped back to an instant.
pub fn calendar_day_bounds(
    instant: DateTime<Utc>,
    tz: Tz,
) -> Result<(NaiveDate, DateTime<Utc>, DateTime<Utc>), DomainError> {
    let day: NaiveDate = instant.with_timezone(&tz).date_naive();
    let next_day: NaiveDate = day
        .succ_opt()
        .ok_or_else(|| DomainError::DayBoundaryUnresolvable {
            date: day,
            timezone: tz.name().to_string(),
        })?;

    let day_start: DateTime<Utc> = local_midnight(day, tz)?;
    let day_end: DateTime<Utc> = local_midnight(next_day, tz)?;
    Ok((day, day_start, day_end))
}

/// Maps local midnight of `day` to UTC.
///
/// Where a DST jump skips midnight the day begins at the first valid local
/// time, one hour later.
fn local_midnight(day: NaiveDate, tz: Tz) -> Result<DateTime<Utc>, DomainError> {
    let unresolvable = || DomainError::DayBoundaryUnresolvable {
        date: day,
        timezone: tz.name().to_string(),
    };

    let midnight = day.and_hms_opt(0, 0, 0).ok_or_else(unresolvable)?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| {
            tz.from_local_datetime(&(midnight + Duration::hours(1)))
                .earliest()
        })
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(unresolvable)
}

/// Evaluates a candidate window against the volunteer's committed windows.
///
/// `committed` may contain windows from any day; only those falling wholly
/// inside the candidate's calendar day are summed.
///
/// # Errors
///
/// Returns an error if the candidate's calendar day cannot be resolved.
pub fn evaluate_daily_cap(
    candidate: &TimeWindow,
    committed: &[TimeWindow],
    cap: DailyHourCap,
    tz: Tz,
) -> Result<HourCapOutcome, DomainError> {
    let Some((start, end)) = candidate.bounds() else {
        return Ok(HourCapOutcome::MissingWindowData);
    };

    let (day, day_start, day_end) = calendar_day_bounds(start, tz)?;

    let committed_seconds: i64 = committed
        .iter()
        .filter_map(TimeWindow::bounds)
        .filter(|(s, e)| *s >= day_start && *e <= day_end)
        .map(|(s, e)| (e - s).num_seconds())
        .sum();
    let candidate_seconds: i64 = (end - start).num_seconds();

    #[allow(clippy::cast_precision_loss)]
    let total_seconds: f64 = (committed_seconds + candidate_seconds) as f64;

    if total_seconds > cap.seconds() {
        Ok(HourCapOutcome::Exceeded {
            day,
            committed_hours: seconds_to_hours(committed_seconds),
            candidate_hours: seconds_to_hours(candidate_seconds),
            cap_hours: cap.hours(),
        })
    } else {
        Ok(HourCapOutcome::WithinCap {
            day,
            total_hours: seconds_to_hours(committed_seconds + candidate_seconds),
        })
    }
}

/// Returns true when admitting `candidate` would exceed `cap` on its day.
///
/// An incomplete candidate or an unresolvable day never counts as exceeding.
#[must_use]
pub fn would_exceed_daily_cap(
    candidate: &TimeWindow,
    committed: &[TimeWindow],
    cap: DailyHourCap,
    tz: Tz,
) -> bool {
    matches!(
        evaluate_daily_cap(candidate, committed, cap, tz),
        Ok(HourCapOutcome::Exceeded { .. })
    )
}
