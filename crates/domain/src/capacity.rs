// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bounded capacity allocation.
//!
//! A capacity pool is a counter of available units for one resource:
//! accepted places on an opportunity, units of a checkout-able resource,
//! or slots on a shift. Admission is all-or-nothing and the check and the
//! decrement happen as a single atomic step.
//!
//! ## Invariants
//!
//! - `0 <= available <= total` at all times
//! - Every admitted reservation decrements `available` by its quantity
//! - Every release increments `available`, never past `total`
//! - Unlimited pools admit every request and track nothing
//! - Only opportunity acceptance pools may be unlimited; a resource or
//!   shift pool with a total of `0` admits nothing
//!
//! ## Two allocators
//!
//! [`CapacityLevel`] is the value the store reasons about: persistence
//! validates a request against it, then applies the decrement with a
//! conditional `UPDATE`. [`CapacityPool`] is the in-process allocator for
//! callers that hold counts in memory, such as a worker sharing one pool
//! across threads. Both admit and release under the same rules.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

/// The kind of resource a pool guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// Concurrent assignee slots on a shift.
    ShiftSlots,
    /// Accepted applications on a volunteer opportunity.
    OpportunityAcceptance,
    /// Units of a resource available for checkout.
    ResourceQuantity,
}

impl PoolKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ShiftSlots => "shift_slots",
            Self::OpportunityAcceptance => "opportunity_acceptance",
            Self::ResourceQuantity => "resource_quantity",
        }
    }
}

impl FromStr for PoolKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shift_slots" => Ok(Self::ShiftSlots),
            "opportunity_acceptance" => Ok(Self::OpportunityAcceptance),
            "resource_quantity" => Ok(Self::ResourceQuantity),
            _ => Err(DomainError::InvalidPoolKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifies one pool: the kind of resource plus the resource's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolKey {
    pub kind: PoolKind,
    pub resource_id: i64,
}

impl PoolKey {
    #[must_use]
    pub const fn new(kind: PoolKind, resource_id: i64) -> Self {
        Self { kind, resource_id }
    }
}

impl std::fmt::Display for PoolKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.resource_id)
    }
}

/// The ceiling of a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capacity {
    /// No ceiling.
    Unlimited,
    /// At most this many units.
    Limited(u32),
}

impl Capacity {
    /// Interprets the total supplied for a pool of `key.kind`.
    ///
    /// Opportunities treat an absent or zero acceptance capacity as
    /// unlimited. Every other kind counts real units, so `0` is an empty
    /// pool and an absent total is refused.
    ///
    /// # Errors
    ///
    /// Returns `PoolTotalRequired` when a non-opportunity pool has no total.
    pub fn for_pool(key: PoolKey, total: Option<u32>) -> Result<Self, DomainError> {
        match (key.kind, total) {
            (PoolKind::OpportunityAcceptance, None | Some(0)) => Ok(Self::Unlimited),
            (_, Some(total)) => Ok(Self::Limited(total)),
            (_, None) => Err(DomainError::PoolTotalRequired {
                pool: key.to_string(),
            }),
        }
    }

    /// Whether a pool of `kind` may carry this capacity.
    #[must_use]
    pub fn is_allowed_for(&self, kind: PoolKind) -> bool {
        matches!(self, Self::Limited(_)) || kind == PoolKind::OpportunityAcceptance
    }

    #[must_use]
    pub const fn total(&self) -> Option<u32> {
        match self {
            Self::Unlimited => None,
            Self::Limited(total) => Some(*total),
        }
    }
}

/// A point-in-time view of a pool's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityLevel {
    key: PoolKey,
    capacity: Capacity,
    available: u32,
}

impl CapacityLevel {
    /// Creates a level, validating `available <= total`.
    ///
    /// Unlimited pools always report zero available; the count is not tracked.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCapacityLevel` if `available` exceeds the total.
    pub fn new(key: PoolKey, capacity: Capacity, available: u32) -> Result<Self, DomainError> {
        match capacity {
            Capacity::Unlimited => Ok(Self {
                key,
                capacity,
                available: 0,
            }),
            Capacity::Limited(total) => {
                if available > total {
                    return Err(DomainError::InvalidCapacityLevel { available, total });
                }
                Ok(Self {
                    key,
                    capacity,
                    available,
                })
            }
        }
    }

    /// A fresh pool with every unit available.
    #[must_use]
    pub const fn full(key: PoolKey, capacity: Capacity) -> Self {
        let available: u32 = match capacity {
            Capacity::Unlimited => 0,
            Capacity::Limited(total) => total,
        };
        Self {
            key,
            capacity,
            available,
        }
    }

    #[must_use]
    pub const fn key(&self) -> PoolKey {
        self.key
    }

    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }

    #[must_use]
    pub const fn available(&self) -> u32 {
        self.available
    }

    /// The level after admitting `quantity` units.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` for zero and `CapacityExceeded` when fewer than
    /// `quantity` units are available.
    pub fn admit(&self, quantity: u32) -> Result<Self, DomainError> {
        validate_quantity(quantity)?;
        match self.capacity {
            Capacity::Unlimited => Ok(*self),
            Capacity::Limited(_) => {
                let available: u32 = self.available.checked_sub(quantity).ok_or_else(|| {
                    DomainError::CapacityExceeded {
                        pool: self.key.to_string(),
                        requested: quantity,
                        available: self.available,
                    }
                })?;
                Ok(Self { available, ..*self })
            }
        }
    }

    /// The level after returning `quantity` units.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` for zero and `ReleaseExceedsTotal` when the
    /// result would exceed the pool total.
    pub fn restore(&self, quantity: u32) -> Result<Self, DomainError> {
        validate_quantity(quantity)?;
        match self.capacity {
            Capacity::Unlimited => Ok(*self),
            Capacity::Limited(total) => {
                let available: u32 = self
                    .available
                    .checked_add(quantity)
                    .filter(|next| *next <= total)
                    .ok_or_else(|| DomainError::ReleaseExceedsTotal {
                        pool: self.key.to_string(),
                        released: quantity,
                        available: self.available,
                        total,
                    })?;
                Ok(Self { available, ..*self })
            }
        }
    }
}

fn validate_quantity(quantity: u32) -> Result<(), DomainError> {
    if quantity == 0 {
        return Err(DomainError::InvalidQuantity { quantity });
    }
    Ok(())
}

/// A held claim on pool capacity.
///
/// Not `Clone`: a reservation is consumed by [`CapacityPool::release`], so the
/// same units cannot be returned twice.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a reservation leaks the reserved capacity"]
pub struct Reservation {
    pool: PoolKey,
    quantity: u32,
}

impl Reservation {
    #[must_use]
    pub const fn pool(&self) -> PoolKey {
        self.pool
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// An in-process capacity pool safe for concurrent callers.
///
/// The available count lives in an atomic; admission is a compare-and-swap
/// loop so two callers can never both take the last unit.
#[derive(Debug)]
pub struct CapacityPool {
    key: PoolKey,
    capacity: Capacity,
    available: AtomicU32,
}

impl CapacityPool {
    /// Creates a pool with every unit available.
    #[must_use]
    pub fn new(key: PoolKey, capacity: Capacity) -> Self {
        Self::from_level(CapacityLevel::full(key, capacity))
    }

    /// Creates a pool from a stored level.
    #[must_use]
    pub const fn from_level(level: CapacityLevel) -> Self {
        Self {
            key: level.key,
            capacity: level.capacity,
            available: AtomicU32::new(level.available),
        }
    }

    #[must_use]
    pub const fn key(&self) -> PoolKey {
        self.key
    }

    /// A snapshot of the current counters.
    #[must_use]
    pub fn level(&self) -> CapacityLevel {
        CapacityLevel {
            key: self.key,
            capacity: self.capacity,
            available: self.available.load(Ordering::Acquire),
        }
    }

    /// Reserves `quantity` units, or none at all.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` for zero and `CapacityExceeded` when the pool
    /// cannot cover the request.
    pub fn try_reserve(&self, quantity: u32) -> Result<Reservation, DomainError> {
        validate_quantity(quantity)?;

        if let Capacity::Limited(_) = self.capacity {
            self.available
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                    current.checked_sub(quantity)
                })
                .map_err(|available| DomainError::CapacityExceeded {
                    pool: self.key.to_string(),
                    requested: quantity,
                    available,
                })?;
        }

        Ok(Reservation {
            pool: self.key,
            quantity,
        })
    }

    /// Returns a reservation's units to the pool.
    ///
    /// # Errors
    ///
    /// Returns `ReservationPoolMismatch` if the reservation came from another
    /// pool and `ReleaseExceedsTotal` if the pool would overflow its total.
    pub fn release(&self, reservation: Reservation) -> Result<(), DomainError> {
        if reservation.pool != self.key {
            return Err(DomainError::ReservationPoolMismatch {
                expected: self.key.to_string(),
                actual: reservation.pool.to_string(),
            });
        }

        if let Capacity::Limited(total) = self.capacity {
            self.available
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                    current
                        .checked_add(reservation.quantity)
                        .filter(|next| *next <= total)
                })
                .map_err(|available| DomainError::ReleaseExceedsTotal {
                    pool: self.key.to_string(),
                    released: reservation.quantity,
                    available,
                    total,
                })?;
        }

        Ok(())
    }
}
