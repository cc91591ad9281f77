// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the shiftcall attendance engine.
//!
//! This crate stores shifts, tasks, assignments, worked-hours records and
//! capacity pools in `SQLite` through Diesel, and executes engine commands
//! transactionally.
//!
//! ## Transactions
//!
//! Every command runs inside one `BEGIN IMMEDIATE` transaction:
//!
//! 1. load the command's `Scope`
//! 2. evaluate it with `shiftcall::apply`
//! 3. write the result
//!
//! `BEGIN IMMEDIATE` takes the database write lock before the first read, so
//! no other connection can commit between the check and the write. A
//! rejected command or a failed write rolls the whole transaction back.
//!
//! ## Testing Philosophy
//!
//! - Each `new_in_memory()` call receives its own shared-cache database
//! - Concurrency properties are exercised against file databases, with one
//!   connection per thread

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
#![allow(clippy::multiple_crate_versions)]

use chrono::{DateTime, Utc};
use diesel::SqliteConnection;
use diesel::connection::Connection;
use shiftcall::{Command, EngineConfig, TransitionResult};
use shiftcall_domain::{
    Assignment, Capacity, CapacityLevel, DomainError, PoolKey, Shift, Task, WorkedHoursRecord,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::ReservationRecord;
pub use error::{PersistenceError, TransactionError};

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_test_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// Several adapters may open the same file; writers queue on the
    /// database lock for up to the configured busy timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Executes an engine command atomically.
    ///
    /// The returned result carries the IDs assigned by the store.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::Rejected` if the engine refuses the command
    /// and `TransactionError::Persistence` if the store fails. Either way
    /// nothing is written.
    pub fn execute(
        &mut self,
        config: &EngineConfig,
        command: Command,
        now: DateTime<Utc>,
    ) -> Result<TransitionResult, TransactionError> {
        let operation: &'static str = command.name();
        debug!(operation, "Executing command");

        let outcome: Result<TransitionResult, TransactionError> =
            self.conn.immediate_transaction(|conn| {
                let scope = queries::scope::load_scope(conn, &command)?;
                let result: TransitionResult = shiftcall::apply(config, &scope, command, now)?;
                Ok(mutations::transition::persist_transition(conn, result, now)?)
            });

        match &outcome {
            Ok(result) => {
                for note in &result.notes {
                    warn!(operation, %note, "Admitted without a complete check");
                }
            }
            Err(TransactionError::Rejected(err)) => {
                info!(operation, error = %err, "Command rejected");
            }
            Err(TransactionError::Persistence(err)) => {
                warn!(operation, error = %err, "Command failed in the store");
            }
        }
        outcome
    }

    // ========================================================================
    // Reference data
    // ========================================================================

    /// Registers a shift and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn register_shift(&mut self, shift: &Shift) -> Result<i64, PersistenceError> {
        mutations::reference::insert_shift(&mut self.conn, shift)
    }

    /// Registers a task on an existing shift and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `ShiftNotFound` if the shift does not exist, or a persistence error.
    pub fn register_task(&mut self, task: &Task) -> Result<i64, TransactionError> {
        self.conn.immediate_transaction(|conn| {
            if queries::shifts::get_shift(conn, task.shift_id)?.is_none() {
                return Err(DomainError::ShiftNotFound {
                    shift_id: task.shift_id,
                }
                .into());
            }
            Ok(mutations::reference::insert_task(conn, task)?)
        })
    }

    /// Retrieves a shift by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_shift(&mut self, shift_id: i64) -> Result<Option<Shift>, PersistenceError> {
        queries::shifts::get_shift(&mut self.conn, shift_id)
    }

    // ========================================================================
    // Read models
    // ========================================================================

    /// Retrieves an assignment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_assignment(
        &mut self,
        assignment_id: i64,
    ) -> Result<Option<Assignment>, PersistenceError> {
        queries::assignments::get_assignment(&mut self.conn, assignment_id)
    }

    /// Lists every assignment on a shift.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_assignments_for_shift(
        &mut self,
        shift_id: i64,
    ) -> Result<Vec<Assignment>, PersistenceError> {
        queries::assignments::list_for_shift(&mut self.conn, shift_id)
    }

    /// Lists a volunteer's worked-hours records, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_hours_for_volunteer(
        &mut self,
        volunteer_id: i64,
    ) -> Result<Vec<WorkedHoursRecord>, PersistenceError> {
        queries::assignments::list_hours_for_volunteer(&mut self.conn, volunteer_id)
    }

    /// Retrieves the worked-hours record derived from an assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_hours_for_assignment(
        &mut self,
        assignment_id: i64,
    ) -> Result<Option<WorkedHoursRecord>, PersistenceError> {
        queries::assignments::get_hours_for_assignment(&mut self.conn, assignment_id)
    }

    // ========================================================================
    // Capacity pools
    // ========================================================================

    /// Registers a capacity pool with every unit available.
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePool` if the pool exists, or a persistence error.
    pub fn register_pool(
        &mut self,
        key: PoolKey,
        capacity: Capacity,
    ) -> Result<CapacityLevel, TransactionError> {
        self.conn
            .immediate_transaction(|conn| mutations::capacity::insert_pool(conn, key, capacity))
    }

    /// Reserves units from a pool, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::Rejected` when the pool is missing or
    /// cannot cover the request, or a persistence error.
    pub fn reserve(
        &mut self,
        key: PoolKey,
        holder_id: i64,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<ReservationRecord, TransactionError> {
        self.conn.immediate_transaction(|conn| {
            mutations::capacity::reserve(conn, key, holder_id, quantity, now)
        })
    }

    /// Returns a reservation's units to its pool.
    ///
    /// # Errors
    ///
    /// Returns `TransactionError::Rejected` when the reservation is missing or
    /// already released, or a persistence error.
    pub fn release(
        &mut self,
        reservation_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ReservationRecord, TransactionError> {
        self.conn
            .immediate_transaction(|conn| mutations::capacity::release(conn, reservation_id, now))
    }

    /// Retrieves a pool's current level.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is invalid.
    pub fn get_pool(&mut self, key: PoolKey) -> Result<Option<CapacityLevel>, PersistenceError> {
        queries::capacity::get_pool_row(&mut self.conn, key)?
            .map(|row| row.level())
            .transpose()
    }

    /// Lists a pool's unreleased reservations.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_reservations(
        &mut self,
        key: PoolKey,
    ) -> Result<Vec<ReservationRecord>, PersistenceError> {
        match queries::capacity::get_pool_row(&mut self.conn, key)? {
            Some(row) => queries::capacity::list_active_reservations(&mut self.conn, &row),
            None => Ok(Vec::new()),
        }
    }
}
