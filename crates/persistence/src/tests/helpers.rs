// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Persistence, TransactionError};
use chrono::{DateTime, TimeZone, Utc};
use shiftcall::{Command, CoreError, EngineConfig, TransitionResult};
use shiftcall_domain::{DomainError, Shift, TimeWindow};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

pub const ORGANIZATION_ID: i64 = 7;
pub const EVENT_ID: i64 = 31;
pub const VOLUNTEER_ID: i64 = 400;
pub const STAFF_ID: i64 = 2;

static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// 2026-05-09 at the given UTC time.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 9, hour, minute, 0).unwrap()
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

/// Registers a shift on 2026-05-09 between the given hours and returns its ID.
pub fn register_test_shift(persistence: &mut Persistence, start: u32, end: u32) -> i64 {
    let window = TimeWindow::new(at(start, 0), at(end, 0)).unwrap();
    let shift = Shift::new(ORGANIZATION_ID, Some(EVENT_ID), window, 0);
    persistence.register_shift(&shift).unwrap()
}

pub fn create_command(shift_id: i64, volunteer_id: i64, task_id: Option<i64>) -> Command {
    Command::CreateAssignment {
        shift_id,
        volunteer_id,
        task_id,
        assigned_by: Some(STAFF_ID),
    }
}

pub fn execute(
    persistence: &mut Persistence,
    command: Command,
    now: DateTime<Utc>,
) -> Result<TransitionResult, TransactionError> {
    persistence.execute(&EngineConfig::default(), command, now)
}

/// Unwraps the domain rule behind a rejected transaction.
pub fn rejected_with(err: TransactionError) -> DomainError {
    match err {
        TransactionError::Rejected(CoreError::DomainViolation(domain)) => domain,
        other => panic!("expected a domain rejection, got {other:?}"),
    }
}

/// Splits results into successes and errors.
pub fn partition_results<T, E>(results: Vec<Result<T, E>>) -> (Vec<T>, Vec<E>) {
    let mut successes = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(value) => successes.push(value),
            Err(err) => errors.push(err),
        }
    }
    (successes, errors)
}

/// A database file under the system temp directory, removed on drop.
pub struct TempDatabase {
    pub path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> Self {
        let id = FILE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "shiftcall_test_{}_{id}.db",
            std::process::id()
        ));
        Self { path }
    }

    pub fn open(&self) -> Persistence {
        Persistence::new_with_file(&self.path).expect("Failed to open database file")
    }
}

impl Drop for TempDatabase {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut name = self.path.clone().into_os_string();
            name.push(suffix);
            let _ = std::fs::remove_file(name);
        }
    }
}
