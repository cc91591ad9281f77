// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `reference`: Shift and task registration
//! - `transition`: Persisting assignment transitions and worked hours
//! - `capacity`: Pool registration, reservation and release
//!
//! Every function here expects to run inside a transaction opened by the
//! `Persistence` adapter.

pub mod capacity;
pub mod reference;
pub mod transition;
