//! Sampling primitives shared by every telemetry domain
//!
//! Three ways to produce a value: a uniform draw from a baseline range
//! (cold start), a bounded random walk from an anchor (incremental), and a
//! uniform draw from a target band (biased). All of them take the random
//! source by reference so callers decide seeding.

use aura_core::{MetricRange, TargetState};
use rand::Rng;

/// Uniform draw from a closed range. Degenerate ranges return their minimum.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, range: MetricRange) -> f64 {
    if range.width() > 0.0 {
        rng.gen_range(range.min..=range.max)
    } else {
        range.min
    }
}

/// Random walk step: `anchor + delta` with `delta` drawn from `step`, kept inside `bounds`
pub fn drift<R: Rng + ?Sized>(rng: &mut R, anchor: f64, step: MetricRange, bounds: MetricRange) -> f64 {
    bounds.clamp(bounds.clamp(anchor) + uniform(rng, step))
}

/// Bernoulli trial with probability `p`, clamped to `[0, 1]`
pub fn bernoulli<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    if p.is_nan() {
        return false;
    }
    rng.gen_bool(p.clamp(0.0, 1.0))
}

/// Target bands for a metric that participates in biased generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetBands {
    pub good: MetricRange,
    pub fair: MetricRange,
    pub poor: MetricRange,
}

impl TargetBands {
    pub fn new(good: (f64, f64), fair: (f64, f64), poor: (f64, f64)) -> Self {
        Self {
            good: MetricRange::new(good.0, good.1),
            fair: MetricRange::new(fair.0, fair.1),
            poor: MetricRange::new(poor.0, poor.1),
        }
    }

    pub fn band(&self, target: TargetState) -> MetricRange {
        match target {
            TargetState::Good => self.good,
            TargetState::Fair => self.fair,
            TargetState::Poor => self.poor,
        }
    }
}

/// How a single metric is generated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSpec {
    /// Metric name, used in logs
    pub name: &'static str,
    /// Hard bounds; every generated value lies inside them
    pub bounds: MetricRange,
    /// Range of the per-step delta in incremental mode
    pub step: MetricRange,
    /// Cold-start distribution
    pub baseline: MetricRange,
    /// Bands for biased generation; metrics without bands ignore the target
    pub targets: Option<TargetBands>,
    /// Round generated values to whole numbers
    pub integral: bool,
}

impl MetricSpec {
    /// Metric with a symmetric `±max_step` walk
    pub fn new(name: &'static str, bounds: (f64, f64), baseline: MetricRange, max_step: f64) -> Self {
        Self {
            name,
            bounds: MetricRange::new(bounds.0, bounds.1),
            step: MetricRange::new(-max_step, max_step),
            baseline,
            targets: None,
            integral: false,
        }
    }

    /// Replace the symmetric walk with an arbitrary delta range
    pub fn step(mut self, min: f64, max: f64) -> Self {
        self.step = MetricRange::new(min, max);
        self
    }

    pub fn targets(mut self, targets: TargetBands) -> Self {
        self.targets = Some(targets);
        self
    }

    pub fn integral(mut self) -> Self {
        self.integral = true;
        self
    }

    /// Largest absolute change a single incremental step may make
    pub fn max_step(&self) -> f64 {
        self.step.min.abs().max(self.step.max.abs())
    }

    /// Produce one value.
    ///
    /// A target with bands for this metric wins over the anchor; otherwise
    /// the anchor drives a random walk, and without an anchor the baseline
    /// is sampled.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, anchor: Option<f64>, target: Option<TargetState>) -> f64 {
        let band = match (self.targets, target) {
            (Some(bands), Some(target)) => Some(bands.band(target)),
            _ => None,
        };
        let raw = match (band, anchor) {
            (Some(band), _) => uniform(rng, band),
            (None, Some(anchor)) if anchor.is_finite() => drift(rng, self.anchor(anchor), self.step, self.bounds),
            (None, _) => uniform(rng, self.baseline),
        };
        let value = self.bounds.clamp(raw);
        if self.integral {
            self.bounds.clamp(value.round())
        } else {
            value
        }
    }

    /// Anchor as the walk sees it: inside the bounds and, for whole-number metrics, whole
    fn anchor(&self, anchor: f64) -> f64 {
        let anchor = self.bounds.clamp(anchor);
        if self.integral {
            anchor.round()
        } else {
            anchor
        }
    }
}
