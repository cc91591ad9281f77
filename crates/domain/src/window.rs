// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Half-open time windows.
//!
//! A window `[start, end)` contains `start` and excludes `end`, so a shift
//! ending at 12:00 and another starting at 12:00 do not intersect.
//!
//! Shift records imported from older data may lack either bound. Such
//! windows are representable but can never prove a conflict; callers see
//! them through the `MissingWindowData` branches of the checkers.

use crate::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// A half-open time window, possibly with missing bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// Creates a complete window.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeWindow` if `end` is not strictly after `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidTimeWindow {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            });
        }
        Ok(Self {
            start: Some(start),
            end: Some(end),
        })
    }

    /// Creates a window from optional bounds.
    ///
    /// When both bounds are present they are validated as in [`TimeWindow::new`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeWindow` if both bounds are present and inverted.
    pub fn from_parts(
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Ok(Self { start, end }),
        }
    }

    #[must_use]
    pub const fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Returns both bounds, or `None` when either is missing.
    #[must_use]
    pub fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Length of the window in whole seconds.
    #[must_use]
    pub fn duration_seconds(&self) -> Option<i64> {
        self.bounds().map(|(start, end)| (end - start).num_seconds())
    }

    /// Length of the window in fractional hours.
    #[must_use]
    pub fn duration_hours(&self) -> Option<f64> {
        self.duration_seconds().map(seconds_to_hours)
    }

    /// Decides whether two windows intersect.
    ///
    /// Returns `None` when either window is incomplete.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> Option<bool> {
        let (s1, e1) = self.bounds()?;
        let (s2, e2) = other.bounds()?;
        Some(s1 < e2 && s2 < e1)
    }
}

/// Converts whole seconds to fractional hours.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn seconds_to_hours(seconds: i64) -> f64 {
    seconds as f64 / SECONDS_PER_HOUR
}
