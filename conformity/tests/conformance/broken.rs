//! Deliberately broken generators: the suite must catch each defect and
//! name the check that failed.

use std::sync::atomic::{AtomicI64, Ordering};

use conformity::*;

/// Shrink tree whose child sequence never empties.
fn endless(value: i64) -> Shrinkable<i64> {
    Shrinkable::new(value, move || vec![endless(value)])
}

struct NeverEmpty;

impl Generator for NeverEmpty {
    type Value = i64;

    fn generate(&self, source: &mut Source, _bias: Option<BiasFactor>) -> Shrinkable<i64> {
        endless(source.next_bounded(100) as i64)
    }
}

pub fn test_never_empty_children_trip_the_walk_budget() {
    let settings = Settings::new(|_: &i64, _: &()| true)
        .with_trials(5)
        .with_walk_budget(32);
    let violation = check_generator_from(|_: &()| NeverEmpty, &settings, Seed::from_u64(1))
        .expect_err("a tree that never reaches a leaf must be rejected");
    assert_eq!(violation.check, Check::SameSeedSameShrinks);
    assert!(violation.detail.contains("32 steps"), "{}", violation.detail);
}

static DRIFT: AtomicI64 = AtomicI64::new(0);

/// Reads ambient state on every generation, so two instances built from
/// the same seed disagree.
struct Drifting;

impl Generator for Drifting {
    type Value = i64;

    fn generate(&self, source: &mut Source, _bias: Option<BiasFactor>) -> Shrinkable<i64> {
        let drift = DRIFT.fetch_add(1, Ordering::Relaxed);
        Shrinkable::singleton(source.next_bounded(10) as i64 + drift)
    }
}

pub fn test_ambient_state_breaks_generation_determinism() {
    let settings = Settings::new(|_: &i64, _: &()| true).with_trials(5);
    let violation = check_generator_from(|_: &()| Drifting, &settings, Seed::from_u64(2))
        .expect_err("a generator reading ambient state must be rejected");
    assert_eq!(violation.check, Check::SameSeedSameValues);
}

/// Generates inside [0, 100) but shrinks to -1.
struct EscapingShrink;

impl Generator for EscapingShrink {
    type Value = i64;

    fn generate(&self, source: &mut Source, _bias: Option<BiasFactor>) -> Shrinkable<i64> {
        let value = source.next_bounded(100) as i64;
        Shrinkable::new(value, || vec![Shrinkable::singleton(-1)])
    }
}

pub fn test_out_of_domain_shrinks_are_caught() {
    let settings =
        Settings::new(|value: &i64, _: &()| (0..100).contains(value)).with_trials(5);
    let violation = check_generator_from(|_: &()| EscapingShrink, &settings, Seed::from_u64(3))
        .expect_err("a shrinker escaping the domain must be rejected");
    assert_eq!(violation.check, Check::ShrinksToValidValues);
    assert_eq!(violation.value, "-1");
}

/// Offers the parent value itself as its only "simplification".
struct StuckShrink;

impl Generator for StuckShrink {
    type Value = i64;

    fn generate(&self, source: &mut Source, _bias: Option<BiasFactor>) -> Shrinkable<i64> {
        let value = source.next_bounded(100) as i64;
        Shrinkable::new(value, move || vec![Shrinkable::singleton(value)])
    }
}

pub fn test_non_decreasing_shrinks_are_caught() {
    let settings = Settings::new(|_: &i64, _: &()| true)
        .with_ordering(|a: &i64, b: &i64| a < b)
        .with_trials(5);
    let violation = check_generator_from(|_: &()| StuckShrink, &settings, Seed::from_u64(4))
        .expect_err("a shrinker that fails to simplify must be rejected");
    assert_eq!(violation.check, Check::StrictlyDecreasingShrinkPath);
}
