// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use chrono_tz::Tz;
use shiftcall_domain::{DailyHourCap, DomainError};

/// Engine settings, injected at construction.
///
/// Nothing in the engine reads the environment directly; the server binary
/// resolves `DAILY_HOURS_LIMIT` and `SHIFTCALL_TIMEZONE` and builds this value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Ceiling on committed hours per volunteer per calendar day.
    pub daily_hours_limit: DailyHourCap,
    /// Timezone whose calendar days the hour cap is evaluated in.
    pub timezone: Tz,
}

impl EngineConfig {
    #[must_use]
    pub const fn new(daily_hours_limit: DailyHourCap, timezone: Tz) -> Self {
        Self {
            daily_hours_limit,
            timezone,
        }
    }

    /// Builds a configuration from raw settings.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfiguration` if the hour limit is not a
    /// positive, finite number or the timezone is not a known IANA name.
    pub fn from_settings(daily_hours_limit: f64, timezone: &str) -> Result<Self, CoreError> {
        let cap: DailyHourCap =
            DailyHourCap::new(daily_hours_limit).map_err(CoreError::InvalidConfiguration)?;
        let tz: Tz = timezone.parse().map_err(|_| {
            CoreError::InvalidConfiguration(DomainError::InvalidTimezone(timezone.to_string()))
        })?;
        Ok(Self::new(cap, tz))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DailyHourCap::default(), Tz::UTC)
    }
}
