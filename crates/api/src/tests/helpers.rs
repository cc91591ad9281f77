// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CreateAssignmentRequest, LifecycleManager, Notification, Notifier, NotifyError,
    RegisterShiftRequest, register_shift,
};
use chrono::{DateTime, TimeZone, Utc};
use shiftcall::EngineConfig;
use shiftcall_persistence::Persistence;
use std::sync::{Arc, Mutex};

pub const ORGANIZATION_ID: i64 = 4;
pub const STAFF_ID: i64 = 1;

/// Records every notification it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<Notification>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Refuses every notification.
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Unavailable(String::from("mail relay offline")))
    }
}

/// 2026-05-09 at the given UTC time.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 9, hour, minute, 0).unwrap()
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

pub fn create_test_manager(notifier: Arc<dyn Notifier>) -> LifecycleManager {
    LifecycleManager::new(EngineConfig::default(), notifier)
}

/// Registers a shift on 2026-05-09 between the given hours and returns its ID.
pub fn register_test_shift(persistence: &mut Persistence, start: u32, end: u32) -> i64 {
    register_shift(
        persistence,
        &RegisterShiftRequest {
            organization_id: ORGANIZATION_ID,
            event_id: None,
            starts_at: Some(at(start, 0)),
            ends_at: Some(at(end, 0)),
            capacity: 0,
            task_id: None,
        },
    )
    .unwrap()
    .shift_id
}

pub fn create_request(shift_id: i64, volunteer_id: i64) -> CreateAssignmentRequest {
    CreateAssignmentRequest {
        shift_id,
        volunteer_id,
        task_id: None,
        assigned_by: Some(STAFF_ID),
    }
}
