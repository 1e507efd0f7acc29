//! A well-behaved bounded integer generator driven through the suite.

use crate::battery_seed;
use conformity::*;

/// Generator under test: integers in [min, max], shrinking by halving
/// the distance to the lower bound.
pub struct IntRange {
    min: i64,
    max: i64,
}

impl IntRange {
    pub fn new(min: i64, max: i64) -> Self {
        IntRange { min, max }
    }
}

impl Generator for IntRange {
    type Value = i64;

    fn generate(&self, source: &mut Source, bias: Option<BiasFactor>) -> Shrinkable<i64> {
        let value = match bias {
            // Biased draw: hit one of the two bounds one time in `factor`.
            Some(factor) if factor.apply(source) => {
                if source.next_bool() {
                    self.min
                } else {
                    self.max
                }
            }
            _ => source.next_i64_in(self.min, self.max),
        };
        shrink_toward(self.min, value)
    }
}

/// Candidates between `origin` and `value`: the origin itself, then
/// halvings of the remaining distance.
fn shrink_toward(origin: i64, value: i64) -> Shrinkable<i64> {
    Shrinkable::new(value, move || {
        if value == origin {
            return Vec::new();
        }
        let mut candidates = vec![shrink_toward(origin, origin)];
        let mut delta = (value - origin) / 2;
        while delta > 0 {
            candidates.push(shrink_toward(origin, origin + delta));
            delta /= 2;
        }
        candidates
    })
}

/// Range-style configs built with the ordering helper, so `min <= max`
/// holds whichever end is drawn first.
fn bounds_config(meta: &mut Source) -> Bounds<i64> {
    min_max(IntRange::new(-1_000, 1_000))
        .generate(meta, None)
        .value()
        .clone()
}

fn suite_settings() -> Settings<Bounds<i64>, i64> {
    Settings::new(|value: &i64, bounds: &Bounds<i64>| {
        *value >= bounds.min && *value <= bounds.max
    })
    .with_config(bounds_config)
    .with_ordering(|a: &i64, b: &i64| a < b)
    .with_trials(25)
    .with_walk_budget(200)
}

pub fn test_int_range_conforms() {
    let report = match check_generator_from(
        |bounds: &Bounds<i64>| IntRange::new(bounds.min, bounds.max),
        &suite_settings(),
        battery_seed(),
    ) {
        Ok(report) => report,
        Err(violation) => panic!("int range generator failed conformance: {violation}"),
    };
    // All five checks ran: the ordering relation was supplied.
    assert_eq!(report.checks.len(), 5);
    assert!(report
        .checks
        .iter()
        .all(|entry| entry.trials == 25));
}

pub fn test_seed_42_generates_twice_the_same() {
    let generator = IntRange::new(0, 100);
    let first = generator.generate(&mut Source::from_u64(42), None);
    let second = generator.generate(&mut Source::from_u64(42), None);
    assert_eq!(first.value(), second.value());
    assert!((0..=100).contains(first.value()));
}

pub fn test_seed_7_path_zero_walk_stays_in_range_and_decreases() {
    let generator = IntRange::new(0, 100);
    let root = generator.generate(&mut Source::from_u64(7), None);
    let mut previous = *root.value();
    assert!((0..=100).contains(&previous));

    let mut walk = ShrinkWalk::new(root, &[0], 100);
    loop {
        match walk.step() {
            WalkStep::Visited(value) => {
                assert!((0..=100).contains(&value));
                assert!(value < previous, "{value} did not decrease from {previous}");
                previous = value;
            }
            WalkStep::Done => break,
            WalkStep::BudgetExhausted => panic!("walk failed to terminate"),
        }
    }
}

pub fn test_biased_draws_hit_edges_and_stay_valid() {
    let generator = IntRange::new(10, 20);
    let factor = BiasFactor::new(2);
    let mut edge_hits = 0;
    let mut interior_hits = 0;
    for seed in 0..200u64 {
        let mut source = Source::from_u64(seed);
        let root = generator.generate(&mut source, Some(factor));
        let value = *root.value();
        assert!((10..=20).contains(&value));
        if value == 10 || value == 20 {
            edge_hits += 1;
        } else {
            interior_hits += 1;
        }
    }
    assert!(edge_hits > 0, "bias factor 2 never hit an edge");
    assert!(interior_hits > 0, "bias factor 2 drowned out interior draws");
}
