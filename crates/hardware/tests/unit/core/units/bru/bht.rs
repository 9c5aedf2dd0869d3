//! Branch History Table Tests.

use pretty_assertions::assert_eq;
use rvperf_core::core::units::bru::bht::{Bht, WEAKLY_NOT_TAKEN};

#[test]
fn starts_weakly_not_taken() {
    let bht = Bht::new(64);
    assert_eq!(bht.len(), 64);
    assert_eq!(bht.counter(0x1000), WEAKLY_NOT_TAKEN);
    assert!(!bht.predict(0x1000));
}

#[test]
fn one_taken_outcome_flips_the_prediction() {
    let mut bht = Bht::new(64);
    bht.update(0x1000, true);

    assert_eq!(bht.counter(0x1000), 2);
    assert!(bht.predict(0x1000));
}

#[test]
fn counters_saturate() {
    let mut bht = Bht::new(64);
    for _ in 0..5 {
        bht.update(0x40, true);
    }
    assert_eq!(bht.counter(0x40), 3);

    for _ in 0..3 {
        bht.update(0x40, false);
    }
    assert_eq!(bht.counter(0x40), 0);

    bht.update(0x40, false);
    assert_eq!(bht.counter(0x40), 0);
    assert!(!bht.predict(0x40));
}

#[test]
fn strongly_taken_survives_one_not_taken() {
    let mut bht = Bht::new(16);
    bht.update(0x8, true);
    bht.update(0x8, true);
    bht.update(0x8, false);

    assert_eq!(bht.counter(0x8), 2);
    assert!(bht.predict(0x8));
}

#[test]
fn indexed_by_word_address() {
    let mut bht = Bht::new(16);
    bht.update(0x100, true);

    // 16 counters cover 64 bytes of code, then the index wraps.
    assert_eq!(bht.counter(0x100 + 64), 2);
    assert_eq!(bht.counter(0x104), WEAKLY_NOT_TAKEN);
}

#[test]
#[should_panic(expected = "power of two")]
fn size_must_be_a_power_of_two() {
    let _ = Bht::new(48);
}
