// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outbound volunteer notifications.
//!
//! Delivery belongs to an external service. The engine only hands a
//! notification to a [`Notifier`] after the triggering write has committed,
//! and a delivery failure never undoes that write.
//!
//! Callers that share the store behind a lock take the result as
//! [`Pending`] and deliver it once the lock is released, so a slow channel
//! never holds up other writers.

use serde::Serialize;
use tracing::{info, warn};

/// A message for one volunteer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// The volunteer was assigned to a shift.
    ShiftAssigned {
        volunteer_id: i64,
        shift_id: i64,
        task_id: Option<i64>,
    },
}

impl Notification {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ShiftAssigned { .. } => "shift_assigned",
        }
    }

    #[must_use]
    pub const fn volunteer_id(&self) -> i64 {
        match self {
            Self::ShiftAssigned { volunteer_id, .. } => *volunteer_id,
        }
    }
}

/// Errors a notification channel can report.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification channel unavailable: {0}")]
    Unavailable(String),
    #[error("notification rejected for volunteer {volunteer_id}: {reason}")]
    Rejected { volunteer_id: i64, reason: String },
}

/// A channel that delivers notifications to volunteers.
///
/// Calls are synchronous; an implementation that talks to a remote service
/// should hand the message off (a queue or a spawned task) and return.
pub trait Notifier: Send + Sync {
    /// Delivers one notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel could not accept the notification.
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            kind = notification.kind(),
            volunteer_id = notification.volunteer_id(),
            ?notification,
            "Notification"
        );
        Ok(())
    }
}

/// A committed result whose notifications have not been delivered yet.
#[derive(Debug)]
#[must_use = "pending notifications are lost unless delivered"]
pub struct Pending<T> {
    response: T,
    notifications: Vec<Notification>,
}

impl<T> Pending<T> {
    pub(crate) const fn new(response: T, notifications: Vec<Notification>) -> Self {
        Self {
            response,
            notifications,
        }
    }

    /// The notifications waiting for delivery.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    #[must_use]
    pub(crate) fn into_response(self) -> T {
        self.response
    }

    /// Dispatches every notification and returns the response.
    #[must_use]
    pub fn deliver(self, notifier: &dyn Notifier) -> T {
        for notification in &self.notifications {
            dispatch(notifier, notification);
        }
        self.response
    }
}

/// Hands a notification to `notifier`, logging and discarding any failure.
pub fn dispatch(notifier: &dyn Notifier, notification: &Notification) {
    if let Err(err) = notifier.notify(notification) {
        warn!(
            kind = notification.kind(),
            volunteer_id = notification.volunteer_id(),
            error = %err,
            "Notification failed"
        );
    }
}
