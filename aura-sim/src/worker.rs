//! Worker vitals generation
//!
//! | metric        | bounds  | step  | cold      | good      | fair      | poor      |
//! |---------------|---------|-------|-----------|-----------|-----------|-----------|
//! | heart_rate    | 40-220  | ±3    | 60-100    | 65-85     | 101-115   | 125-160   |
//! | hrv           | 0-200   | ±3    | 30-80     | 50-80     | 25-34     | 8-18      |
//! | temperature   | 30-45   | ±0.1  | 36.1-37.3 | 36.3-37.0 | 37.6-38.2 | 38.6-39.5 |
//! | stress_norm   | 0-1     | ±0.05 | 0.1-0.5   | 0.1-0.3   | 0.51-0.65 | 0.75-0.95 |
//! | jerk_count    | 0-50    | ±1    | 0-3       |           |           |           |
//! | vibration_rms | 0-10    | ±0.2  | 0.1-1.5   |           |           |           |
//!
//! The normalized stress drives the reading's `machine_stress_index` at
//! one hundred index points per unit.

use aura_core::{MetricRange, Scorer, TargetState, WorkerAssessment, WorkerReading, WorkerScorer};
use rand::Rng;

use crate::{
    engine::{Generator, TelemetryModel},
    sampling::{MetricSpec, TargetBands},
};

const HEART_RATE: usize = 0;
const HRV: usize = 1;
const TEMPERATURE: usize = 2;
const STRESS: usize = 3;
const JERK_COUNT: usize = 4;
const VIBRATION: usize = 5;

const STRESS_INDEX_PER_NORM: f64 = 100.0;

/// Generated worker sample with everything derived from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratedWorker {
    pub reading: WorkerReading,
    pub assessment: WorkerAssessment,
    /// Normalized machine stress the reading was built from, 0-1
    pub stress_norm: f64,
    /// Fatigue estimate, 0-100
    pub fatigue_level: f64,
}

/// Worker vitals domain
#[derive(Debug, Clone)]
pub struct WorkerModel {
    metrics: [MetricSpec; 6],
}

impl Default for WorkerModel {
    fn default() -> Self {
        Self {
            metrics: [
                MetricSpec::new("heart_rate", (40.0, 220.0), MetricRange::new(60.0, 100.0), 3.0)
                    .targets(TargetBands::new((65.0, 85.0), (101.0, 115.0), (125.0, 160.0)))
                    .integral(),
                MetricSpec::new("hrv", (0.0, 200.0), MetricRange::new(30.0, 80.0), 3.0)
                    .targets(TargetBands::new((50.0, 80.0), (25.0, 34.0), (8.0, 18.0)))
                    .integral(),
                MetricSpec::new("temperature", (30.0, 45.0), MetricRange::new(36.1, 37.3), 0.1)
                    .targets(TargetBands::new((36.3, 37.0), (37.6, 38.2), (38.6, 39.5))),
                MetricSpec::new("stress_norm", (0.0, 1.0), MetricRange::new(0.1, 0.5), 0.05)
                    .targets(TargetBands::new((0.1, 0.3), (0.51, 0.65), (0.75, 0.95))),
                MetricSpec::new("jerk_count", (0.0, 50.0), MetricRange::new(0.0, 3.0), 1.0).integral(),
                MetricSpec::new("vibration_rms", (0.0, 10.0), MetricRange::new(0.1, 1.5), 0.2),
            ],
        }
    }
}

impl TelemetryModel for WorkerModel {
    type Previous = WorkerReading;
    type Output = GeneratedWorker;

    fn metrics(&self) -> &[MetricSpec] {
        &self.metrics
    }

    fn anchors(&self, previous: &WorkerReading) -> Vec<f64> {
        vec![
            f64::from(previous.heart_rate),
            f64::from(previous.hrv),
            previous.temperature,
            f64::from(previous.machine_stress_index) / STRESS_INDEX_PER_NORM,
            f64::from(previous.jerk_count),
            previous.vibration_rms,
        ]
    }

    fn assemble<R: Rng + ?Sized>(&self, values: &[f64], _target: Option<TargetState>, _rng: &mut R) -> GeneratedWorker {
        let stress_norm = values[STRESS];
        let reading = WorkerReading {
            heart_rate: values[HEART_RATE] as u16,
            hrv: values[HRV] as u16,
            temperature: values[TEMPERATURE],
            jerk_count: values[JERK_COUNT] as u32,
            machine_stress_index: (stress_norm * STRESS_INDEX_PER_NORM).round() as u8,
            vibration_rms: values[VIBRATION],
        };
        let assessment = WorkerScorer.score(&reading);
        GeneratedWorker {
            reading,
            assessment,
            stress_norm,
            fatigue_level: assessment.fatigue_level(),
        }
    }
}

/// Worker vitals generator
pub type WorkerGenerator = Generator<WorkerModel>;

impl Default for WorkerGenerator {
    fn default() -> Self {
        Generator::new(WorkerModel::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_core::RiskState;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn cold_start_is_plausible() {
        let generator = WorkerGenerator::default();
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..500 {
            let w = generator.generate(None, None, &mut rng);
            assert!((60..=100).contains(&w.reading.heart_rate));
            assert!((30..=80).contains(&w.reading.hrv));
            assert!((36.1..=37.3).contains(&w.reading.temperature));
            assert!((10..=50).contains(&w.reading.machine_stress_index));
            assert!(w.reading.jerk_count <= 3);
        }
    }

    #[test]
    fn assessment_matches_scorer() {
        let generator = WorkerGenerator::default();
        let mut rng = StdRng::seed_from_u64(22);
        let w = generator.generate(None, Some(TargetState::Fair), &mut rng);
        assert_eq!(w.assessment, WorkerScorer.score(&w.reading));
        assert_eq!(w.fatigue_level, w.assessment.fatigue_level());
    }

    #[test]
    fn poor_target_lands_high_risk() {
        let generator = WorkerGenerator::default();
        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..200 {
            // hr -30, hrv -30, temperature -30, stress -20
            let w = generator.generate(None, Some(TargetState::Poor), &mut rng);
            assert_eq!(w.assessment.risk_state, RiskState::High);
        }
    }

    #[test]
    fn good_target_never_penalizes_bands() {
        let generator = WorkerGenerator::default();
        let mut rng = StdRng::seed_from_u64(24);
        for _ in 0..200 {
            let w = generator.generate(None, Some(TargetState::Good), &mut rng);
            // only jerks can cost points, at most 6 from a cold start
            assert!(w.assessment.cis_score >= 94);
            assert_eq!(w.assessment.risk_state, RiskState::Low);
        }
    }

    #[test]
    fn stress_index_follows_norm() {
        let generator = WorkerGenerator::default();
        let mut rng = StdRng::seed_from_u64(25);
        let w = generator.generate(None, None, &mut rng);
        assert_eq!(w.reading.machine_stress_index, (w.stress_norm * 100.0).round() as u8);
    }
}
