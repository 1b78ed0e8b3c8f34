//! Service configuration
//!
//! Constructed once and passed to [`crate::SafetyService::new`]. Every field
//! has a default, so a JSON document only needs the keys it overrides:
//!
//! ```rust
//! use aura_service::ServiceConfig;
//!
//! let config: ServiceConfig = serde_json::from_str(r#"{"worker_history_hours": 12}"#).unwrap();
//! assert_eq!(config.worker_history_hours, 12);
//! assert_eq!(config.machine_history_hours, 24);
//! ```

use aura_sim::EngineConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Name reported by the health check
    pub service_name: String,
    /// Default worker history window
    pub worker_history_hours: u32,
    /// Default machine history window
    pub machine_history_hours: u32,
    /// System is DEGRADED when more workers than this are at HIGH risk
    pub degraded_high_risk_above: usize,
    /// System is DEGRADED when more machines than this need maintenance
    pub degraded_maintenance_above: usize,
    /// Synthetic generation settings
    pub engine: EngineConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            service_name: "Aura Site Safety".to_string(),
            worker_history_hours: 8,
            machine_history_hours: 24,
            degraded_high_risk_above: 2,
            degraded_maintenance_above: 1,
            engine: EngineConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn worker_history_hours(mut self, hours: u32) -> Self {
        self.worker_history_hours = hours;
        self
    }

    pub fn machine_history_hours(mut self, hours: u32) -> Self {
        self.machine_history_hours = hours;
        self
    }

    /// Fix the generator seed for reproducible runs
    pub fn seed(mut self, seed: u64) -> Self {
        self.engine = self.engine.seed(seed);
        self
    }

    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.worker_history_hours, 8);
        assert_eq!(config.machine_history_hours, 24);
        assert_eq!(config.degraded_high_risk_above, 2);
        assert_eq!(config.degraded_maintenance_above, 1);
        assert_eq!(config.engine.seed, None);
    }

    #[test]
    fn builder() {
        let config = ServiceConfig::new().seed(9).machine_history_hours(48);
        assert_eq!(config.engine.seed, Some(9));
        assert_eq!(config.machine_history_hours, 48);
    }

    #[test]
    fn nested_engine_overrides() {
        let config: ServiceConfig =
            serde_json::from_str(r#"{"engine": {"seed": 3, "shock_probability": {"baseline": 0.2}}}"#).unwrap();
        assert_eq!(config.engine.seed, Some(3));
        assert_eq!(config.engine.shock_probability.baseline, 0.2);
        assert_eq!(config.engine.shock_probability.poor, 0.25);
    }
}
