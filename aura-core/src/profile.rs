//! Per-machine-type baseline operating ranges
//!
//! Profiles describe where a healthy machine of a given type normally
//! operates. The generator draws cold-start readings from them; nothing
//! else reads them and nothing writes them after construction.
//!
//! | type       | temp °C | vibration RMS | stress | fuel % | oil psi |
//! |------------|---------|---------------|--------|--------|---------|
//! | CRANE      | 45-85   | 0.5-2.5       | 20-60  | 30-100 | 35-65   |
//! | EXCAVATOR  | 55-95   | 1.0-3.5       | 30-75  | 25-100 | 30-60   |
//! | LOADER     | 50-90   | 0.8-3.0       | 25-70  | 25-100 | 30-60   |
//! | DRILL      | 60-100  | 1.5-4.0       | 35-80  | 20-100 | 25-55   |
//! | COMPRESSOR | 40-80   | 0.3-2.0       | 15-55  | 30-100 | 40-70   |
//! | GENERATOR  | 50-90   | 0.2-1.8       | 15-50  | 20-100 | 40-70   |

use crate::readings::MachineType;

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricRange {
    pub min: f64,
    pub max: f64,
}

impl MetricRange {
    /// Create a range, swapping the ends if given backwards
    pub fn new(min: f64, max: f64) -> Self {
        if min > max {
            Self { min: max, max: min }
        } else {
            Self { min, max }
        }
    }

    /// True if `value` lies inside the closed interval
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp `value` into the interval
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Both ends multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.min * factor, self.max * factor)
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Baseline operating ranges for one machine type
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineProfile {
    /// Operating temperature (°C)
    pub temperature: MetricRange,
    /// Vibration (RMS)
    pub vibration_rms: MetricRange,
    /// Mechanical stress index (0-100)
    pub stress_index: MetricRange,
    /// Fuel level (%)
    pub fuel_level: MetricRange,
    /// Oil pressure (psi)
    pub oil_pressure: MetricRange,
}

const fn range(min: f64, max: f64) -> MetricRange {
    MetricRange { min, max }
}

const fn profile(temp: (f64, f64), vib: (f64, f64), stress: (f64, f64), fuel: (f64, f64), oil: (f64, f64)) -> MachineProfile {
    MachineProfile {
        temperature: range(temp.0, temp.1),
        vibration_rms: range(vib.0, vib.1),
        stress_index: range(stress.0, stress.1),
        fuel_level: range(fuel.0, fuel.1),
        oil_pressure: range(oil.0, oil.1),
    }
}

const CRANE: MachineProfile = profile((45.0, 85.0), (0.5, 2.5), (20.0, 60.0), (30.0, 100.0), (35.0, 65.0));
const EXCAVATOR: MachineProfile = profile((55.0, 95.0), (1.0, 3.5), (30.0, 75.0), (25.0, 100.0), (30.0, 60.0));
const LOADER: MachineProfile = profile((50.0, 90.0), (0.8, 3.0), (25.0, 70.0), (25.0, 100.0), (30.0, 60.0));
const DRILL: MachineProfile = profile((60.0, 100.0), (1.5, 4.0), (35.0, 80.0), (20.0, 100.0), (25.0, 55.0));
const COMPRESSOR: MachineProfile = profile((40.0, 80.0), (0.3, 2.0), (15.0, 55.0), (30.0, 100.0), (40.0, 70.0));
const GENERATOR: MachineProfile = profile((50.0, 90.0), (0.2, 1.8), (15.0, 50.0), (20.0, 100.0), (40.0, 70.0));

impl MachineProfile {
    /// Reference profile for a machine type
    pub const fn for_type(machine_type: MachineType) -> &'static MachineProfile {
        match machine_type {
            MachineType::Crane => &CRANE,
            MachineType::Excavator => &EXCAVATOR,
            MachineType::Loader => &LOADER,
            MachineType::Drill => &DRILL,
            MachineType::Compressor => &COMPRESSOR,
            MachineType::Generator => &GENERATOR,
        }
    }
}

impl MachineType {
    /// Baseline operating ranges for this type
    pub fn profile(&self) -> &'static MachineProfile {
        MachineProfile::for_type(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crane_reference_values() {
        let crane = MachineType::Crane.profile();
        assert_eq!(crane.temperature, MetricRange::new(45.0, 85.0));
        assert_eq!(crane.vibration_rms, MetricRange::new(0.5, 2.5));
    }

    #[test]
    fn every_type_has_sane_ranges() {
        for machine_type in MachineType::ALL {
            let p = machine_type.profile();
            for range in [p.temperature, p.vibration_rms, p.stress_index, p.fuel_level, p.oil_pressure] {
                assert!(range.min < range.max, "{} has an empty range", machine_type);
                assert!(range.min >= 0.0);
            }
            assert!(p.temperature.max <= 200.0);
            assert!(p.stress_index.max <= 100.0);
            assert!(p.fuel_level.max <= 100.0);
            assert!(p.oil_pressure.max <= 100.0);
        }
    }

    #[test]
    fn range_helpers() {
        let r = MetricRange::new(10.0, 2.0);
        assert_eq!(r.min, 2.0);
        assert!(r.contains(2.0) && r.contains(10.0) && !r.contains(10.1));
        assert_eq!(r.clamp(11.0), 10.0);
        assert_eq!(r.scaled(0.5), MetricRange::new(1.0, 5.0));
        assert_eq!(r.width(), 8.0);
    }
}
