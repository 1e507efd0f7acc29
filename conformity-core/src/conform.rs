//! The conformance suite: five generic invariant checks for generators.
//!
//! The suite is parameterized with a generator factory (`Fn(&C) -> G`)
//! and a [`Settings`] value. Each check runs over many independently
//! meta-generated `(bias, config, seed, path)` tuples, builds a fresh
//! generator instance per trial, and verifies one invariant against the
//! resulting shrink tree. Every invariant is exercised under both biased
//! and unbiased generation without duplicating check logic.

use std::fmt::Debug;

use crate::data::{BiasFactor, Seed, Source};
use crate::error::{Check, CheckReport, InvariantViolation, Report, Result};
use crate::gen::Generator;
use crate::walk::{ShrinkWalk, WalkStep};

type Predicate2<A, B> = Box<dyn Fn(&A, &B) -> bool>;

/// Settings for a conformance run.
///
/// `C` is the config type fed to the generator factory, `T` the value
/// type of the generator under test. The validity predicate is
/// mandatory; everything else has a documented default.
pub struct Settings<C, T> {
    config: Box<dyn Fn(&mut Source) -> C>,
    is_equal: Option<Predicate2<T, T>>,
    is_strictly_smaller: Option<Predicate2<T, T>>,
    is_valid: Predicate2<T, C>,
    trials: usize,
    walk_budget: usize,
    bias_freq: u64,
}

impl<C, T> Settings<C, T> {
    /// Settings with the mandatory validity predicate.
    ///
    /// Defaults: a trivial (`C::default()`) config for every trial,
    /// `PartialEq` equality, no ordering relation, 100 trials per check,
    /// a walk budget of 1000 steps, and a bias factor attached to one
    /// trial in three.
    pub fn new(is_valid: impl Fn(&T, &C) -> bool + 'static) -> Self
    where
        C: Default + 'static,
    {
        Settings {
            config: Box::new(|_| C::default()),
            is_equal: None,
            is_strictly_smaller: None,
            is_valid: Box::new(is_valid),
            trials: 100,
            walk_budget: 1000,
            bias_freq: 3,
        }
    }

    /// Meta-generate the config for each trial from the given closure.
    pub fn with_config(mut self, config: impl Fn(&mut Source) -> C + 'static) -> Self {
        self.config = Box::new(config);
        self
    }

    /// Compare generated values with a custom equality instead of `==`.
    pub fn with_equality(mut self, is_equal: impl Fn(&T, &T) -> bool + 'static) -> Self {
        self.is_equal = Some(Box::new(is_equal));
        self
    }

    /// Supply an ordering relation, enabling the strict-decrease check.
    ///
    /// `is_strictly_smaller(a, b)` must hold exactly when `a` is a
    /// strictly simpler candidate than `b`.
    pub fn with_ordering(mut self, is_strictly_smaller: impl Fn(&T, &T) -> bool + 'static) -> Self {
        self.is_strictly_smaller = Some(Box::new(is_strictly_smaller));
        self
    }

    /// Number of meta-generated trials per check.
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials;
        self
    }

    /// Step budget for each shrink walk. A walk still active after this
    /// many steps violates the termination invariant.
    pub fn with_walk_budget(mut self, budget: usize) -> Self {
        self.walk_budget = budget;
        self
    }

    /// A bias factor is attached to a trial with `1 / freq` odds.
    ///
    /// The default of 3 matches the inherited policy; it is a tunable,
    /// not a contract.
    pub fn with_bias_freq(mut self, freq: u64) -> Self {
        self.bias_freq = freq.max(1);
        self
    }

    /// Meta-generate one trial's worth of inputs.
    fn trial(&self, meta: &mut Source) -> Trial<C> {
        let bias = if meta.next_bounded(self.bias_freq) == 0 {
            let span = BiasFactor::MAX - BiasFactor::MIN + 1;
            Some(BiasFactor::new(BiasFactor::MIN + meta.next_bounded(span)))
        } else {
            None
        };
        let config = (self.config)(meta);
        let seed = meta.next_u64();
        let len = 1 + meta.next_bounded(8) as usize;
        let path = (0..len).map(|_| meta.next_bounded(101) as usize).collect();
        Trial {
            bias,
            config,
            seed,
            path,
        }
    }

    fn values_equal(&self, a: &T, b: &T) -> bool
    where
        T: PartialEq,
    {
        match &self.is_equal {
            Some(is_equal) => is_equal(a, b),
            None => a == b,
        }
    }
}

/// Inputs of a single trial, freshly meta-generated per check iteration.
struct Trial<C> {
    bias: Option<BiasFactor>,
    config: C,
    seed: u64,
    path: Vec<usize>,
}

impl<C: Debug> Trial<C> {
    fn violation(&self, check: Check, detail: String, value: &impl Debug) -> InvariantViolation {
        InvariantViolation {
            check,
            detail,
            value: format!("{value:?}"),
            config: format!("{:?}", self.config),
            seed: self.seed,
            path: self.path.clone(),
            bias: self.bias,
        }
    }
}

/// Run every applicable check with a run seed drawn from ambient entropy.
///
/// See [`check_generator_from`] for the deterministic variant.
pub fn check_generator<C, G, F>(factory: F, settings: &Settings<C, G::Value>) -> Result<Report>
where
    C: Debug,
    G: Generator,
    G::Value: Debug + Clone + PartialEq + 'static,
    F: Fn(&C) -> G,
{
    check_generator_from(factory, settings, Seed::random())
}

/// Run every applicable check, fully determined by `run_seed`.
///
/// Each check draws its meta inputs from an independent stream split off
/// the run seed, so enabling or disabling the ordering check does not
/// perturb the trials of the others. The first violated invariant aborts
/// the run with an [`InvariantViolation`]; otherwise a [`Report`] lists
/// every executed check with its trial count.
pub fn check_generator_from<C, G, F>(
    factory: F,
    settings: &Settings<C, G::Value>,
    run_seed: Seed,
) -> Result<Report>
where
    C: Debug,
    G: Generator,
    G::Value: Debug + Clone + PartialEq + 'static,
    F: Fn(&C) -> G,
{
    let (rest, s1) = run_seed.split();
    let (rest, s2) = rest.split();
    let (rest, s3) = rest.split();
    let (s4, s5) = rest.split();

    let mut report = Report { checks: Vec::new() };
    report.checks.push(run_check(
        Check::SameSeedSameValues,
        settings,
        s1,
        |trial| check_same_values(&factory, settings, trial),
    )?);
    report.checks.push(run_check(
        Check::SameSeedSameShrinks,
        settings,
        s2,
        |trial| check_same_shrinks(&factory, settings, trial),
    )?);
    if settings.is_strictly_smaller.is_some() {
        report.checks.push(run_check(
            Check::StrictlyDecreasingShrinkPath,
            settings,
            s3,
            |trial| check_strict_decrease(&factory, settings, trial),
        )?);
    }
    report.checks.push(run_check(
        Check::GeneratesValidValues,
        settings,
        s4,
        |trial| check_valid_root(&factory, settings, trial),
    )?);
    report.checks.push(run_check(
        Check::ShrinksToValidValues,
        settings,
        s5,
        |trial| check_valid_shrinks(&factory, settings, trial),
    )?);
    Ok(report)
}

/// Drive one named check over `settings.trials` meta-generated trials.
fn run_check<C, T>(
    check: Check,
    settings: &Settings<C, T>,
    meta_seed: Seed,
    body: impl Fn(&Trial<C>) -> Result<()>,
) -> Result<CheckReport> {
    let mut meta = Source::new(meta_seed);
    for _ in 0..settings.trials {
        let trial = settings.trial(&mut meta);
        body(&trial)?;
    }
    Ok(CheckReport {
        check,
        trials: settings.trials,
    })
}

/// Check 1: two sources built from the same seed, two instances built
/// from the same config, equal root values.
fn check_same_values<C, G, F>(
    factory: &F,
    settings: &Settings<C, G::Value>,
    trial: &Trial<C>,
) -> Result<()>
where
    C: Debug,
    G: Generator,
    G::Value: Debug + Clone + PartialEq + 'static,
    F: Fn(&C) -> G,
{
    let mut source_a = Source::from_u64(trial.seed);
    let mut source_b = Source::from_u64(trial.seed);
    let root_a = factory(&trial.config).generate(&mut source_a, trial.bias);
    let root_b = factory(&trial.config).generate(&mut source_b, trial.bias);
    if !settings.values_equal(root_a.value(), root_b.value()) {
        return Err(trial.violation(
            Check::SameSeedSameValues,
            format!(
                "two generations from the same seed produced {:?} and {:?}",
                root_a.value(),
                root_b.value()
            ),
            root_b.value(),
        ));
    }
    Ok(())
}

/// Check 2: lockstep walk of two independently generated trees; equal
/// values at every step, termination on the same step.
fn check_same_shrinks<C, G, F>(
    factory: &F,
    settings: &Settings<C, G::Value>,
    trial: &Trial<C>,
) -> Result<()>
where
    C: Debug,
    G: Generator,
    G::Value: Debug + Clone + PartialEq + 'static,
    F: Fn(&C) -> G,
{
    let mut source_a = Source::from_u64(trial.seed);
    let mut source_b = Source::from_u64(trial.seed);
    let root_a = factory(&trial.config).generate(&mut source_a, trial.bias);
    let root_b = factory(&trial.config).generate(&mut source_b, trial.bias);
    if !settings.values_equal(root_a.value(), root_b.value()) {
        return Err(trial.violation(
            Check::SameSeedSameShrinks,
            "root values disagreed before any shrinking".to_string(),
            root_b.value(),
        ));
    }

    let mut current = root_a.value().clone();
    let mut walk_a = ShrinkWalk::new(root_a, &trial.path, settings.walk_budget);
    let mut walk_b = ShrinkWalk::new(root_b, &trial.path, settings.walk_budget);
    let mut step = 0usize;
    loop {
        match (walk_a.step(), walk_b.step()) {
            (WalkStep::Done, WalkStep::Done) => return Ok(()),
            (WalkStep::Visited(a), WalkStep::Visited(b)) => {
                if !settings.values_equal(&a, &b) {
                    return Err(trial.violation(
                        Check::SameSeedSameShrinks,
                        format!("walks diverged at step {step}: {a:?} vs {b:?}"),
                        &b,
                    ));
                }
                current = a;
            }
            (WalkStep::BudgetExhausted, _) | (_, WalkStep::BudgetExhausted) => {
                return Err(trial.violation(
                    Check::SameSeedSameShrinks,
                    format!(
                        "shrink walk still active after {} steps; the tree never reached a leaf",
                        settings.walk_budget
                    ),
                    &current,
                ));
            }
            (WalkStep::Visited(v), WalkStep::Done) | (WalkStep::Done, WalkStep::Visited(v)) => {
                return Err(trial.violation(
                    Check::SameSeedSameShrinks,
                    format!("one walk terminated at step {step}, the other visited {v:?}"),
                    &v,
                ));
            }
        }
        step += 1;
    }
}

/// Check 3: every visited child is strictly smaller than its parent
/// under the supplied ordering.
fn check_strict_decrease<C, G, F>(
    factory: &F,
    settings: &Settings<C, G::Value>,
    trial: &Trial<C>,
) -> Result<()>
where
    C: Debug,
    G: Generator,
    G::Value: Debug + Clone + PartialEq + 'static,
    F: Fn(&C) -> G,
{
    let Some(is_strictly_smaller) = &settings.is_strictly_smaller else {
        return Ok(());
    };
    let mut source = Source::from_u64(trial.seed);
    let root = factory(&trial.config).generate(&mut source, trial.bias);
    let mut parent = root.value().clone();
    let mut walk = ShrinkWalk::new(root, &trial.path, settings.walk_budget);
    loop {
        match walk.step() {
            WalkStep::Visited(value) => {
                if !is_strictly_smaller(&value, &parent) {
                    return Err(trial.violation(
                        Check::StrictlyDecreasingShrinkPath,
                        format!("{value:?} is not strictly smaller than its parent {parent:?}"),
                        &value,
                    ));
                }
                parent = value;
            }
            WalkStep::Done => return Ok(()),
            WalkStep::BudgetExhausted => {
                return Err(trial.violation(
                    Check::StrictlyDecreasingShrinkPath,
                    format!(
                        "shrink walk still active after {} steps; the tree never reached a leaf",
                        settings.walk_budget
                    ),
                    &parent,
                ));
            }
        }
    }
}

/// Check 4: the root value satisfies the validity predicate.
fn check_valid_root<C, G, F>(
    factory: &F,
    settings: &Settings<C, G::Value>,
    trial: &Trial<C>,
) -> Result<()>
where
    C: Debug,
    G: Generator,
    G::Value: Debug + Clone + PartialEq + 'static,
    F: Fn(&C) -> G,
{
    let mut source = Source::from_u64(trial.seed);
    let root = factory(&trial.config).generate(&mut source, trial.bias);
    if !(settings.is_valid)(root.value(), &trial.config) {
        return Err(trial.violation(
            Check::GeneratesValidValues,
            format!("generated value {:?} is invalid for its config", root.value()),
            root.value(),
        ));
    }
    Ok(())
}

/// Check 5: the root and every value visited along the walk satisfy the
/// validity predicate.
fn check_valid_shrinks<C, G, F>(
    factory: &F,
    settings: &Settings<C, G::Value>,
    trial: &Trial<C>,
) -> Result<()>
where
    C: Debug,
    G: Generator,
    G::Value: Debug + Clone + PartialEq + 'static,
    F: Fn(&C) -> G,
{
    let mut source = Source::from_u64(trial.seed);
    let root = factory(&trial.config).generate(&mut source, trial.bias);
    if !(settings.is_valid)(root.value(), &trial.config) {
        return Err(trial.violation(
            Check::ShrinksToValidValues,
            format!("root value {:?} is invalid for its config", root.value()),
            root.value(),
        ));
    }
    let mut last = root.value().clone();
    let mut walk = ShrinkWalk::new(root, &trial.path, settings.walk_budget);
    loop {
        match walk.step() {
            WalkStep::Visited(value) => {
                if !(settings.is_valid)(&value, &trial.config) {
                    return Err(trial.violation(
                        Check::ShrinksToValidValues,
                        format!("shrunk value {value:?} is invalid for its config"),
                        &value,
                    ));
                }
                last = value;
            }
            WalkStep::Done => return Ok(()),
            WalkStep::BudgetExhausted => {
                return Err(trial.violation(
                    Check::ShrinksToValidValues,
                    format!(
                        "shrink walk still active after {} steps; the tree never reached a leaf",
                        settings.walk_budget
                    ),
                    &last,
                ));
            }
        }
    }
}
