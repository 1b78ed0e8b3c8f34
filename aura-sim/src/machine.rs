//! Machine telemetry generation
//!
//! Machines are generated in terms of normalized sensor signals and then
//! mapped to a [`MachineReading`]:
//!
//! | signal          | bounds | step   | cold              | good      | fair     | poor     |
//! |-----------------|--------|--------|-------------------|-----------|----------|----------|
//! | vibration_norm  | 0-1    | ±0.05  | profile RMS / 4   | 0.05-0.25 | 0.35-0.6 | 0.7-1.0  |
//! | rpm_instability | 0-1    | ±0.05  | profile stress/100| 0-0.2     | 0.3-0.5  | 0.6-0.9  |
//! | engine_temp     | 0-200  | ±2     | profile temp      | 50-70     | 76-90    | 95-120   |
//! | run_minutes     | 0-1440 | 0..+5  | 0-480             |           |          |          |
//! | fuel_level      | 0-100  | ±2     | profile fuel      |           |          |          |
//! | oil_pressure    | 0-100  | ±2     | profile oil       | 40-60     | 26-29    | 10-19    |
//!
//! A shock event is drawn per sample. The stress index is derived:
//!
//! ```text
//! stress = clamp(vib_norm*40 + 20*shock + rpm*30 + (engine_temp - 70)*0.5, 0, 100)
//! ```
//!
//! A shock only lifts the stress of the sample it was drawn for. The stored
//! reading keeps no rpm signal, so generated entries carry their rpm
//! instability alongside the reading and the walk continues from that
//! value. Only an ingested reading has its rpm instability recovered from
//! the stress index, under the assumption that it had no shock.

use aura_core::{
    constants::machine::{MINUTES_PER_HOUR, VIBRATION_RMS_PER_NORM},
    MachineAssessment, MachineReading, MachineScorer, MachineTelemetryEntry, MachineType,
    MetricRange, Scorer, TargetState,
};
use rand::Rng;

use crate::{
    config::{EngineConfig, ShockProbability},
    engine::{Generator, TelemetryModel},
    sampling::{bernoulli, MetricSpec, TargetBands},
};

const VIBRATION: usize = 0;
const RPM: usize = 1;
const ENGINE_TEMP: usize = 2;
const RUN_MINUTES: usize = 3;
const FUEL: usize = 4;
const OIL: usize = 5;

const STRESS_PER_VIBRATION: f64 = 40.0;
const STRESS_PER_SHOCK: f64 = 20.0;
const STRESS_PER_RPM: f64 = 30.0;
const STRESS_PER_DEGREE: f64 = 0.5;
const STRESS_NEUTRAL_TEMP_C: f64 = 70.0;

const HEALTH_PER_STRESS: f64 = 0.4;
const HEALTH_PER_SHOCK: f64 = 10.0;
const HEALTH_PER_OVERHEAT_DEGREE: f64 = 2.0;
const HEALTH_OVERHEAT_C: f64 = 95.0;

/// Normalized signals a machine sample was built from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineSignals {
    /// Vibration, 0-1
    pub vibration_norm: f64,
    /// RPM instability, 0-1
    pub rpm_instability: f64,
    /// Engine temperature (°C)
    pub engine_temp: f64,
    /// Continuous run time (minutes)
    pub run_minutes: f64,
    /// Whether a shock event occurred in this sample
    pub shock_event: bool,
}

impl MachineSignals {
    /// Best-effort signals behind a stored or ingested reading.
    ///
    /// Shock events leave no trace in a reading, so none is assumed.
    pub fn from_reading(reading: &MachineReading) -> Self {
        Self {
            vibration_norm: (reading.vibration_rms / VIBRATION_RMS_PER_NORM).clamp(0.0, 1.0),
            rpm_instability: recover_rpm_instability(reading),
            engine_temp: reading.temperature,
            run_minutes: reading.operating_hours * MINUTES_PER_HOUR,
            shock_event: false,
        }
    }

    /// Signal-level health estimate for a reading with these signals
    pub fn sensor_health(&self, stress_index: f64) -> f64 {
        sensor_health(stress_index, self.shock_event, self.engine_temp)
    }
}

/// Generated machine sample with everything derived from it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratedMachine {
    pub reading: MachineReading,
    pub assessment: MachineAssessment,
    pub signals: MachineSignals,
    /// Signal-level health estimate, 0-100. Informational only; the
    /// assessment's health score is authoritative.
    pub sensor_health: f64,
}

impl GeneratedMachine {
    /// State the next incremental step continues from
    pub fn anchor(&self) -> MachineAnchor {
        MachineAnchor {
            reading: self.reading,
            rpm_instability: Some(self.signals.rpm_instability),
        }
    }
}

/// Previous sample an incremental machine step walks from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MachineAnchor {
    pub reading: MachineReading,
    /// Exact rpm instability, known only for generated samples
    pub rpm_instability: Option<f64>,
}

impl MachineAnchor {
    pub fn from_entry(entry: &MachineTelemetryEntry) -> Self {
        Self {
            reading: entry.reading,
            rpm_instability: entry.rpm_instability,
        }
    }

    fn rpm_instability(&self) -> f64 {
        self.rpm_instability
            .unwrap_or_else(|| recover_rpm_instability(&self.reading))
    }
}

impl From<MachineReading> for MachineAnchor {
    fn from(reading: MachineReading) -> Self {
        Self { reading, rpm_instability: None }
    }
}

/// Derived stress index, 0-100
pub fn stress_index(vibration_norm: f64, shock_event: bool, rpm_instability: f64, engine_temp: f64) -> f64 {
    let shock = if shock_event { STRESS_PER_SHOCK } else { 0.0 };
    let stress = vibration_norm * STRESS_PER_VIBRATION
        + shock
        + rpm_instability * STRESS_PER_RPM
        + (engine_temp - STRESS_NEUTRAL_TEMP_C) * STRESS_PER_DEGREE;
    stress.clamp(0.0, 100.0)
}

/// Signal-level health estimate, 0-100
pub fn sensor_health(stress_index: f64, shock_event: bool, engine_temp: f64) -> f64 {
    let shock = if shock_event { HEALTH_PER_SHOCK } else { 0.0 };
    let overheat = (engine_temp - HEALTH_OVERHEAT_C).max(0.0) * HEALTH_PER_OVERHEAT_DEGREE;
    (100.0 - stress_index * HEALTH_PER_STRESS - shock - overheat).clamp(0.0, 100.0)
}

/// Recover rpm instability from a stored reading, assuming no shock
pub fn recover_rpm_instability(reading: &MachineReading) -> f64 {
    let vibration_norm = reading.vibration_rms / VIBRATION_RMS_PER_NORM;
    let residual = f64::from(reading.stress_index)
        - vibration_norm * STRESS_PER_VIBRATION
        - (reading.temperature - STRESS_NEUTRAL_TEMP_C) * STRESS_PER_DEGREE;
    let rpm = residual / STRESS_PER_RPM;
    if rpm.is_finite() {
        rpm.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Machine telemetry domain for one machine type
#[derive(Debug, Clone)]
pub struct MachineModel {
    machine_type: MachineType,
    shock: ShockProbability,
    metrics: [MetricSpec; 6],
}

impl MachineModel {
    pub fn new(machine_type: MachineType, config: &EngineConfig) -> Self {
        let profile = machine_type.profile();
        Self {
            machine_type,
            shock: config.shock_probability,
            metrics: [
                MetricSpec::new("vibration_norm", (0.0, 1.0), profile.vibration_rms.scaled(1.0 / VIBRATION_RMS_PER_NORM), 0.05)
                    .targets(TargetBands::new((0.05, 0.25), (0.35, 0.6), (0.7, 1.0))),
                MetricSpec::new("rpm_instability", (0.0, 1.0), profile.stress_index.scaled(0.01), 0.05)
                    .targets(TargetBands::new((0.0, 0.2), (0.3, 0.5), (0.6, 0.9))),
                MetricSpec::new("engine_temp", (0.0, 200.0), profile.temperature, 2.0)
                    .targets(TargetBands::new((50.0, 70.0), (76.0, 90.0), (95.0, 120.0))),
                MetricSpec::new("run_minutes", (0.0, 1440.0), MetricRange::new(0.0, 480.0), 5.0).step(0.0, 5.0),
                MetricSpec::new("fuel_level", (0.0, 100.0), profile.fuel_level, 2.0).integral(),
                MetricSpec::new("oil_pressure", (0.0, 100.0), profile.oil_pressure, 2.0)
                    .targets(TargetBands::new((40.0, 60.0), (26.0, 29.0), (10.0, 19.0)))
                    .integral(),
            ],
        }
    }

    pub fn machine_type(&self) -> MachineType {
        self.machine_type
    }
}

impl TelemetryModel for MachineModel {
    type Previous = MachineAnchor;
    type Output = GeneratedMachine;

    fn metrics(&self) -> &[MetricSpec] {
        &self.metrics
    }

    fn anchors(&self, previous: &MachineAnchor) -> Vec<f64> {
        let reading = &previous.reading;
        vec![
            reading.vibration_rms / VIBRATION_RMS_PER_NORM,
            previous.rpm_instability(),
            reading.temperature,
            reading.operating_hours * MINUTES_PER_HOUR,
            f64::from(reading.fuel_level),
            f64::from(reading.oil_pressure),
        ]
    }

    fn assemble<R: Rng + ?Sized>(&self, values: &[f64], target: Option<TargetState>, rng: &mut R) -> GeneratedMachine {
        let signals = MachineSignals {
            vibration_norm: values[VIBRATION],
            rpm_instability: values[RPM],
            engine_temp: values[ENGINE_TEMP],
            run_minutes: values[RUN_MINUTES],
            shock_event: bernoulli(rng, self.shock.for_target(target)),
        };
        let stress = stress_index(
            signals.vibration_norm,
            signals.shock_event,
            signals.rpm_instability,
            signals.engine_temp,
        );
        let reading = MachineReading {
            stress_index: stress.round() as u8,
            temperature: signals.engine_temp,
            vibration_rms: signals.vibration_norm * VIBRATION_RMS_PER_NORM,
            operating_hours: signals.run_minutes / MINUTES_PER_HOUR,
            fuel_level: values[FUEL] as u8,
            oil_pressure: values[OIL] as u8,
        };
        GeneratedMachine {
            reading,
            assessment: MachineScorer.score(&reading),
            signals,
            sensor_health: sensor_health(stress, signals.shock_event, signals.engine_temp),
        }
    }
}

/// Machine telemetry generator for one type
pub type MachineGenerator = Generator<MachineModel>;

impl MachineGenerator {
    pub fn for_type(machine_type: MachineType, config: &EngineConfig) -> Self {
        Generator::new(MachineModel::new(machine_type, config))
    }
}

/// One generator per machine type, built once from the engine configuration
#[derive(Debug, Clone)]
pub struct MachineGenerators {
    generators: Vec<MachineGenerator>,
}

impl MachineGenerators {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            generators: MachineType::ALL
                .iter()
                .map(|t| MachineGenerator::for_type(*t, config))
                .collect(),
        }
    }

    /// Generator for a machine type
    pub fn get(&self, machine_type: MachineType) -> &MachineGenerator {
        let index = MachineType::ALL
            .iter()
            .position(|t| *t == machine_type)
            .unwrap_or_default();
        &self.generators[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_core::MachineStatus;
    use rand::{rngs::StdRng, SeedableRng};

    fn generators() -> MachineGenerators {
        MachineGenerators::new(&EngineConfig::default())
    }

    #[test]
    fn stress_formula() {
        assert_eq!(stress_index(0.5, false, 0.5, 70.0), 35.0);
        assert_eq!(stress_index(0.5, true, 0.5, 80.0), 60.0);
        assert_eq!(stress_index(1.0, true, 1.0, 200.0), 100.0);
        assert_eq!(stress_index(0.0, false, 0.0, 0.0), 0.0);
    }

    #[test]
    fn sensor_health_formula() {
        assert_eq!(sensor_health(50.0, false, 80.0), 80.0);
        assert_eq!(sensor_health(50.0, true, 100.0), 60.0);
        assert_eq!(sensor_health(100.0, true, 200.0), 0.0);
    }

    #[test]
    fn rpm_recovery_inverts_stress() {
        let reading = MachineReading {
            stress_index: 35,
            temperature: 70.0,
            vibration_rms: 2.0,
            ..Default::default()
        };
        assert!((recover_rpm_instability(&reading) - 0.5).abs() < 1e-9);

        let saturated = MachineReading { stress_index: 100, temperature: 70.0, ..Default::default() };
        assert_eq!(recover_rpm_instability(&saturated), 1.0);
    }

    #[test]
    fn signals_from_ingested_reading() {
        let reading = MachineReading {
            stress_index: 35,
            temperature: 70.0,
            vibration_rms: 2.0,
            operating_hours: 1.5,
            ..Default::default()
        };
        let signals = MachineSignals::from_reading(&reading);
        assert_eq!(signals.vibration_norm, 0.5);
        assert_eq!(signals.run_minutes, 90.0);
        assert!(!signals.shock_event);
        assert_eq!(signals.sensor_health(35.0), 86.0);

        let rough = MachineReading { vibration_rms: 9.0, ..reading };
        assert_eq!(MachineSignals::from_reading(&rough).vibration_norm, 1.0);
    }

    #[test]
    fn crane_cold_start_uses_profile() {
        let generator = generators();
        let crane = generator.get(MachineType::Crane);
        assert_eq!(crane.model().machine_type(), MachineType::Crane);

        let mut rng = StdRng::seed_from_u64(31);
        for _ in 0..500 {
            let m = crane.generate(None, None, &mut rng);
            assert!((45.0..=85.0).contains(&m.reading.temperature));
            assert!((0.5..=2.5 + 1e-9).contains(&m.reading.vibration_rms));
            assert!((30..=100).contains(&m.reading.fuel_level));
            assert!((35..=65).contains(&m.reading.oil_pressure));
            assert!(m.reading.operating_hours <= 8.0);
        }
    }

    #[test]
    fn assessment_matches_scorer() {
        let mut rng = StdRng::seed_from_u64(32);
        let m = generators().get(MachineType::Drill).generate(None, None, &mut rng);
        assert_eq!(m.assessment, MachineScorer.score(&m.reading));
    }

    #[test]
    fn poor_target_always_needs_maintenance() {
        let mut rng = StdRng::seed_from_u64(33);
        let generators = generators();
        for machine_type in MachineType::ALL {
            for _ in 0..100 {
                let m = generators.get(machine_type).generate(None, Some(TargetState::Poor), &mut rng);
                assert_eq!(m.assessment.status, MachineStatus::Maintenance);
            }
        }
    }

    #[test]
    fn good_target_always_operational() {
        let mut rng = StdRng::seed_from_u64(34);
        let generators = generators();
        for machine_type in MachineType::ALL {
            for _ in 0..100 {
                let m = generators.get(machine_type).generate(None, Some(TargetState::Good), &mut rng);
                assert_eq!(m.assessment.status, MachineStatus::Operational);
                assert!(m.assessment.health_score >= 95);
            }
        }
    }

    #[test]
    fn shocks_do_not_leak_into_rpm() {
        let always = ShockProbability { baseline: 1.0, good: 1.0, poor: 1.0 };
        let compressor = MachineGenerator::for_type(
            MachineType::Compressor,
            &EngineConfig::new().shock_probability(always),
        );
        let mut rng = StdRng::seed_from_u64(36);
        let mut previous = compressor.generate(None, None, &mut rng);
        for _ in 0..200 {
            let next = compressor.generate(Some(&previous.anchor()), None, &mut rng);
            assert!(next.signals.shock_event);
            let step = (next.signals.rpm_instability - previous.signals.rpm_instability).abs();
            assert!(step <= 0.05 + 1e-9, "rpm moved {}", step);
            previous = next;
        }
    }

    #[test]
    fn ingested_anchor_recovers_rpm_from_stress() {
        let reading = MachineReading {
            stress_index: 35,
            temperature: 70.0,
            vibration_rms: 2.0,
            ..Default::default()
        };
        let model = MachineModel::new(MachineType::Crane, &EngineConfig::default());
        assert!((model.anchors(&reading.into())[RPM] - 0.5).abs() < 1e-9);

        let entry = MachineTelemetryEntry::new("CR-1", reading, MachineScorer.score(&reading), 0)
            .with_rpm_instability(0.1);
        assert_eq!(model.anchors(&MachineAnchor::from_entry(&entry))[RPM], 0.1);
    }

    #[test]
    fn shock_frequency_tracks_target() {
        let mut rng = StdRng::seed_from_u64(35);
        let loader = MachineGenerator::for_type(MachineType::Loader, &EngineConfig::default());
        let count = |target: Option<TargetState>, rng: &mut StdRng| {
            (0..2000)
                .filter(|_| loader.generate(None, target, &mut *rng).signals.shock_event)
                .count()
        };
        let good = count(Some(TargetState::Good), &mut rng);
        let poor = count(Some(TargetState::Poor), &mut rng);
        assert!(good < 80, "good shocks: {}", good);
        assert!(poor > 350, "poor shocks: {}", poor);
    }
}
