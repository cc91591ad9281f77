// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity pools over the store.

use super::helpers::{at, create_test_persistence, rejected_with};
use shiftcall_domain::{Capacity, DomainError, PoolKey, PoolKind};

const OPPORTUNITY_ID: i64 = 12;
const RESOURCE_ID: i64 = 5;

#[test]
fn test_registered_pool_starts_full() {
    let mut persistence = create_test_persistence();
    let key = PoolKey::new(PoolKind::ResourceQuantity, RESOURCE_ID);

    let level = persistence.register_pool(key, Capacity::Limited(4)).unwrap();

    assert_eq!(level.available(), 4);
    assert_eq!(persistence.get_pool(key).unwrap(), Some(level));
}

#[test]
fn test_duplicate_pool_is_rejected() {
    let mut persistence = create_test_persistence();
    let key = PoolKey::new(PoolKind::ResourceQuantity, RESOURCE_ID);
    persistence.register_pool(key, Capacity::Limited(4)).unwrap();

    let err = persistence
        .register_pool(key, Capacity::Limited(8))
        .unwrap_err();

    assert_eq!(
        rejected_with(err),
        DomainError::DuplicatePool {
            pool: key.to_string()
        }
    );
}

#[test]
fn test_reserve_decrements_until_exhausted() {
    let mut persistence = create_test_persistence();
    let key = PoolKey::new(PoolKind::ResourceQuantity, RESOURCE_ID);
    persistence.register_pool(key, Capacity::Limited(3)).unwrap();

    let first = persistence.reserve(key, 100, 2, at(9, 0)).unwrap();
    assert_eq!(first.quantity, 2);
    assert_eq!(persistence.get_pool(key).unwrap().unwrap().available(), 1);

    let err = persistence.reserve(key, 101, 2, at(9, 5)).unwrap_err();
    assert_eq!(
        rejected_with(err),
        DomainError::CapacityExceeded {
            pool: key.to_string(),
            requested: 2,
            available: 1,
        }
    );
    // A refused request leaves the pool untouched.
    assert_eq!(persistence.get_pool(key).unwrap().unwrap().available(), 1);
    assert_eq!(persistence.list_active_reservations(key).unwrap().len(), 1);
}

#[test]
fn test_zero_quantity_is_invalid() {
    let mut persistence = create_test_persistence();
    let key = PoolKey::new(PoolKind::ResourceQuantity, RESOURCE_ID);
    persistence.register_pool(key, Capacity::Limited(3)).unwrap();

    let err = persistence.reserve(key, 100, 0, at(9, 0)).unwrap_err();

    assert_eq!(rejected_with(err), DomainError::InvalidQuantity { quantity: 0 });
}

#[test]
fn test_reserve_on_unknown_pool_is_rejected() {
    let mut persistence = create_test_persistence();
    let key = PoolKey::new(PoolKind::OpportunityAcceptance, OPPORTUNITY_ID);

    let err = persistence.reserve(key, 100, 1, at(9, 0)).unwrap_err();

    assert_eq!(
        rejected_with(err),
        DomainError::PoolNotFound {
            pool: key.to_string()
        }
    );
}

#[test]
fn test_empty_resource_pool_admits_nothing() {
    let mut persistence = create_test_persistence();
    let key = PoolKey::new(PoolKind::ResourceQuantity, RESOURCE_ID);

    let level = persistence.register_pool(key, Capacity::Limited(0)).unwrap();
    assert_eq!(level.capacity().total(), Some(0));

    for holder_id in 0..5 {
        let err = persistence.reserve(key, holder_id, 3, at(9, 0)).unwrap_err();
        assert!(matches!(
            rejected_with(err),
            DomainError::CapacityExceeded { available: 0, .. }
        ));
    }

    assert_eq!(persistence.get_pool(key).unwrap().unwrap().available(), 0);
    assert!(persistence.list_active_reservations(key).unwrap().is_empty());
}

#[test]
fn test_unlimited_resource_pool_is_refused() {
    let mut persistence = create_test_persistence();
    let key = PoolKey::new(PoolKind::ResourceQuantity, RESOURCE_ID);

    let err = persistence
        .register_pool(key, Capacity::Unlimited)
        .unwrap_err();

    assert_eq!(
        rejected_with(err),
        DomainError::PoolTotalRequired {
            pool: key.to_string()
        }
    );
    assert_eq!(persistence.get_pool(key).unwrap(), None);
}

#[test]
fn test_unlimited_pool_always_admits() {
    let mut persistence = create_test_persistence();
    let key = PoolKey::new(PoolKind::OpportunityAcceptance, OPPORTUNITY_ID);
    persistence
        .register_pool(key, Capacity::Unlimited)
        .unwrap();

    for holder_id in 0..25 {
        persistence.reserve(key, holder_id, 1, at(9, 0)).unwrap();
    }

    assert_eq!(persistence.list_active_reservations(key).unwrap().len(), 25);
}

#[test]
fn test_release_restores_units_once() {
    let mut persistence = create_test_persistence();
    let key = PoolKey::new(PoolKind::ResourceQuantity, RESOURCE_ID);
    persistence.register_pool(key, Capacity::Limited(2)).unwrap();
    let reservation = persistence.reserve(key, 100, 2, at(9, 0)).unwrap();

    let released = persistence
        .release(reservation.reservation_id, at(12, 0))
        .unwrap();
    assert_eq!(released.released_at, Some(at(12, 0)));
    assert_eq!(persistence.get_pool(key).unwrap().unwrap().available(), 2);
    assert!(persistence.list_active_reservations(key).unwrap().is_empty());

    let err = persistence
        .release(reservation.reservation_id, at(12, 5))
        .unwrap_err();
    assert_eq!(
        rejected_with(err),
        DomainError::ReservationAlreadyReleased {
            reservation_id: reservation.reservation_id
        }
    );
    assert_eq!(persistence.get_pool(key).unwrap().unwrap().available(), 2);
}

#[test]
fn test_release_of_unknown_reservation_is_rejected() {
    let mut persistence = create_test_persistence();

    let err = persistence.release(404, at(12, 0)).unwrap_err();

    assert_eq!(
        rejected_with(err),
        DomainError::ReservationNotFound { reservation_id: 404 }
    );
}
