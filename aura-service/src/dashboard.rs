//! Fleet summary for the dashboard header

use aura_core::{MachineStatus, RiskState};
use serde::Serialize;

use crate::config::ServiceConfig;

/// Overall site condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemStatus {
    Online,
    Degraded,
}

/// Counts over active workers and machines, by latest state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub system_status: SystemStatus,
    /// Every active worker, including those with no vitals yet
    pub total_active_workers: usize,
    pub high_risk_count: usize,
    pub medium_risk_count: usize,
    pub low_risk_count: usize,
    /// Every active machine, including those with no telemetry yet
    pub total_machines: usize,
    pub machines_operational: usize,
    pub machines_warning: usize,
    /// MAINTENANCE and OFFLINE machines
    pub machines_maintenance: usize,
}

impl DashboardStats {
    /// Tally latest states. `None` marks an entity with no history, which is
    /// counted in the totals only.
    pub fn tally<W, M>(workers: W, machines: M, config: &ServiceConfig) -> Self
    where
        W: IntoIterator<Item = Option<RiskState>>,
        M: IntoIterator<Item = Option<MachineStatus>>,
    {
        let mut stats = Self {
            system_status: SystemStatus::Online,
            total_active_workers: 0,
            high_risk_count: 0,
            medium_risk_count: 0,
            low_risk_count: 0,
            total_machines: 0,
            machines_operational: 0,
            machines_warning: 0,
            machines_maintenance: 0,
        };

        for risk in workers {
            stats.total_active_workers += 1;
            match risk {
                Some(RiskState::High) => stats.high_risk_count += 1,
                Some(RiskState::Medium) => stats.medium_risk_count += 1,
                Some(RiskState::Low) => stats.low_risk_count += 1,
                None => {}
            }
        }

        for status in machines {
            stats.total_machines += 1;
            match status {
                Some(MachineStatus::Operational) => stats.machines_operational += 1,
                Some(MachineStatus::Warning) => stats.machines_warning += 1,
                Some(MachineStatus::Maintenance | MachineStatus::Offline) => stats.machines_maintenance += 1,
                None => {}
            }
        }

        if stats.high_risk_count > config.degraded_high_risk_above
            || stats.machines_maintenance > config.degraded_maintenance_above
        {
            stats.system_status = SystemStatus::Degraded;
        }
        stats
    }
}
