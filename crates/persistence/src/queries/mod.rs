// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries.
//!
//! ## Module Organization
//!
//! - `shifts`: Shift and task lookups
//! - `assignments`: Assignment, commitment and worked-hours reads
//! - `capacity`: Capacity pool and reservation reads
//! - `scope`: Assembles the `Scope` a command is evaluated against

pub mod assignments;
pub mod capacity;
pub mod scope;
pub mod shifts;
