//! The site safety service
//!
//! Ties scoring, generation, persistence and notification together. Every
//! write path is "validate → score → append → notify"; generation adds a
//! "read latest" step in front and holds a per-entity lock across all of it
//! so that concurrent calls for one entity see each other's output.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use aura_connectors::{NotificationSink, NullSink};
use aura_core::{
    score_machine_payload, score_worker_payload, time::window_start, EntityKind, MachineReading,
    MachineTelemetryEntry, SystemTime, TargetState, TimeSource, WorkerReading, WorkerVitalsEntry,
};
use aura_schemas::HistoryCodec;
use aura_sim::{MachineAnchor, MachineGenerators, MachineSignals, WorkerGenerator};
use log::{debug, info};
use rand::rngs::StdRng;

use crate::{
    config::ServiceConfig,
    dashboard::DashboardStats,
    error::{ServiceError, ServiceResult},
    models::{
        BreakIssued, MachineHistory, MachineList, MachineRegistration, MachineState, MachineView,
        NewMachine, NewWorker, ServiceHealth, SimulationTick, WorkerHistory, WorkerList,
        WorkerRegistration, WorkerState, WorkerVitalsRecord, WorkerView,
    },
    payload::{machine_payload, worker_payload, Source},
    repository::{InMemoryRepository, TelemetryRepository},
};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Site safety service over a repository, a clock and a notification sink
pub struct SafetyService {
    config: ServiceConfig,
    repository: Arc<dyn TelemetryRepository>,
    clock: Arc<dyn TimeSource>,
    sink: Arc<dyn NotificationSink>,
    rng: Mutex<StdRng>,
    entity_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    worker_generator: WorkerGenerator,
    machine_generators: MachineGenerators,
    codec: HistoryCodec,
}

impl SafetyService {
    /// In-memory service on the wall clock with notifications discarded
    pub fn new(config: ServiceConfig) -> ServiceResult<Self> {
        let codec = HistoryCodec::from_global()?;
        info!(
            "starting {} (seed: {:?})",
            config.service_name, config.engine.seed
        );
        Ok(Self {
            rng: Mutex::new(config.engine.rng()),
            entity_locks: Mutex::new(HashMap::new()),
            worker_generator: WorkerGenerator::default(),
            machine_generators: MachineGenerators::new(&config.engine),
            repository: Arc::new(InMemoryRepository::new()),
            clock: Arc::new(SystemTime),
            sink: Arc::new(NullSink),
            codec,
            config,
        })
    }

    pub fn with_repository(mut self, repository: Arc<dyn TelemetryRepository>) -> Self {
        self.repository = repository;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn entity_lock(&self, kind: EntityKind, id: &str) -> Arc<Mutex<()>> {
        lock(&self.entity_locks)
            .entry(format!("{}:{}", kind, id))
            .or_default()
            .clone()
    }

    // Registration

    pub fn register_worker(&self, request: NewWorker) -> ServiceResult<WorkerRegistration> {
        let worker = WorkerRegistration::new(request, self.clock.now());
        self.repository.insert_worker(worker.clone())?;
        info!("registered worker {}", worker.worker_id);
        Ok(worker)
    }

    pub fn register_machine(&self, request: NewMachine) -> ServiceResult<MachineRegistration> {
        let machine = MachineRegistration::new(request, self.clock.now());
        self.repository.insert_machine(machine.clone())?;
        info!("registered {} {}", machine.machine_type, machine.machine_id);
        Ok(machine)
    }

    pub fn set_worker_active(&self, worker_id: &str, active: bool) -> ServiceResult<WorkerRegistration> {
        let worker = self.repository.set_worker_active(worker_id, active)?;
        info!("worker {} active={}", worker_id, active);
        Ok(worker)
    }

    pub fn set_machine_active(&self, machine_id: &str, active: bool) -> ServiceResult<MachineRegistration> {
        let machine = self.repository.set_machine_active(machine_id, active)?;
        info!("machine {} active={}", machine_id, active);
        Ok(machine)
    }

    fn require_worker(&self, worker_id: &str) -> ServiceResult<WorkerRegistration> {
        self.repository
            .get_worker(worker_id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Worker, worker_id))
    }

    fn require_machine(&self, machine_id: &str) -> ServiceResult<MachineRegistration> {
        self.repository
            .get_machine(machine_id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Machine, machine_id))
    }

    // Ingest

    /// Score and store a device reading. Unknown workers are registered on
    /// first contact.
    pub fn ingest_worker_vitals(&self, worker_id: &str, reading: WorkerReading) -> ServiceResult<WorkerVitalsRecord> {
        let assessment = score_worker_payload(&reading)?;

        let entity = self.entity_lock(EntityKind::Worker, worker_id);
        let _guard = lock(&entity);

        if self.repository.get_worker(worker_id)?.is_none() {
            match self.register_worker(NewWorker::new(worker_id)) {
                Ok(_) => {}
                Err(e) if e.is_already_exists() => {}
                Err(e) => return Err(e),
            }
        }

        let entry = WorkerVitalsEntry::new(worker_id, reading, assessment, self.clock.now());
        self.store_worker_vitals(entry, Source::Ingest)
    }

    /// Score and store a device reading for a registered machine
    pub fn ingest_machine_telemetry(
        &self,
        machine_id: &str,
        reading: MachineReading,
    ) -> ServiceResult<MachineTelemetryEntry> {
        let assessment = score_machine_payload(&reading)?;
        let machine = self.require_machine(machine_id)?;

        let entity = self.entity_lock(EntityKind::Machine, machine_id);
        let _guard = lock(&entity);

        let entry = MachineTelemetryEntry::new(machine_id, reading, assessment, self.clock.now());
        let signals = MachineSignals::from_reading(&reading);
        let sensor_health = signals.sensor_health(f64::from(reading.stress_index));
        let payload = machine_payload(&entry, machine.machine_type, &signals, sensor_health, Source::Ingest);
        self.repository.append_machine_telemetry(entry.clone())?;
        debug!(
            "machine {} ingested: health={} status={}",
            machine_id, entry.assessment.health_score, entry.assessment.status
        );
        self.sink.notify(&payload);
        Ok(entry)
    }

    // Generation

    /// Synthesize the next vitals sample for a registered worker, walking
    /// from its latest entry when one exists
    pub fn generate_worker_vitals(
        &self,
        worker_id: &str,
        target: Option<TargetState>,
    ) -> ServiceResult<WorkerVitalsRecord> {
        self.require_worker(worker_id)?;

        let entity = self.entity_lock(EntityKind::Worker, worker_id);
        let _guard = lock(&entity);

        let previous = self.repository.latest_worker_vitals(worker_id)?;
        let generated = {
            let mut rng = lock(&self.rng);
            self.worker_generator
                .generate(previous.as_ref().map(|e| &e.reading), target, &mut *rng)
        };

        let entry = WorkerVitalsEntry::new(worker_id, generated.reading, generated.assessment, self.clock.now());
        self.store_worker_vitals(entry, Source::Generated)
    }

    /// Synthesize the next telemetry sample for a registered machine from
    /// its type's profile
    pub fn generate_machine_telemetry(
        &self,
        machine_id: &str,
        target: Option<TargetState>,
    ) -> ServiceResult<MachineTelemetryEntry> {
        let machine = self.require_machine(machine_id)?;

        let entity = self.entity_lock(EntityKind::Machine, machine_id);
        let _guard = lock(&entity);

        let previous = self.repository.latest_machine_telemetry(machine_id)?;
        let generated = {
            let mut rng = lock(&self.rng);
            self.machine_generators
                .get(machine.machine_type)
                .generate(previous.as_ref().map(MachineAnchor::from_entry).as_ref(), target, &mut *rng)
        };

        let entry = MachineTelemetryEntry::new(machine_id, generated.reading, generated.assessment, self.clock.now())
            .with_rpm_instability(generated.signals.rpm_instability);
        let payload = machine_payload(
            &entry,
            machine.machine_type,
            &generated.signals,
            generated.sensor_health,
            Source::Generated,
        );
        self.repository.append_machine_telemetry(entry.clone())?;
        debug!(
            "machine {} generated ({:?}): health={} status={} shock={}",
            machine_id,
            target,
            entry.assessment.health_score,
            entry.assessment.status,
            generated.signals.shock_event
        );
        self.sink.notify(&payload);
        Ok(entry)
    }

    fn store_worker_vitals(&self, entry: WorkerVitalsEntry, source: Source) -> ServiceResult<WorkerVitalsRecord> {
        let payload = worker_payload(&entry, source);
        self.repository.append_worker_vitals(entry.clone())?;
        debug!(
            "worker {} {}: cis={} risk={}",
            entry.worker_id,
            source.as_str(),
            entry.assessment.cis_score,
            entry.assessment.risk_state
        );
        self.sink.notify(&payload);
        self.worker_record(entry)
    }

    /// Generate one sample for every active worker and machine
    pub fn simulate_tick(&self, target: Option<TargetState>) -> ServiceResult<SimulationTick> {
        let mut tick = SimulationTick::default();
        for worker in self.repository.list_workers()?.iter().filter(|w| w.is_active) {
            self.generate_worker_vitals(&worker.worker_id, target)?;
            tick.workers += 1;
        }
        for machine in self.repository.list_machines()?.iter().filter(|m| m.is_active) {
            self.generate_machine_telemetry(&machine.machine_id, target)?;
            tick.machines += 1;
        }
        debug!("simulation tick: {} workers, {} machines", tick.workers, tick.machines);
        Ok(tick)
    }

    // Views

    fn worker_record(&self, entry: WorkerVitalsEntry) -> ServiceResult<WorkerVitalsRecord> {
        let break_flag = self.repository.has_break(&entry.worker_id, entry.timestamp)?;
        Ok(WorkerVitalsRecord { entry, break_flag })
    }

    fn worker_view(&self, registration: WorkerRegistration) -> ServiceResult<WorkerView> {
        let latest = match self.repository.latest_worker_vitals(&registration.worker_id)? {
            Some(entry) => Some(WorkerState::from_record(&self.worker_record(entry)?)),
            None => None,
        };
        Ok(WorkerView { registration, latest })
    }

    fn machine_view(&self, registration: MachineRegistration) -> ServiceResult<MachineView> {
        let latest = self
            .repository
            .latest_machine_telemetry(&registration.machine_id)?
            .map(|entry| MachineState::from_entry(&entry));
        Ok(MachineView { registration, latest })
    }

    pub fn worker(&self, worker_id: &str) -> ServiceResult<WorkerView> {
        self.worker_view(self.require_worker(worker_id)?)
    }

    pub fn machine(&self, machine_id: &str) -> ServiceResult<MachineView> {
        self.machine_view(self.require_machine(machine_id)?)
    }

    pub fn list_workers(&self, active_only: bool) -> ServiceResult<WorkerList> {
        let workers = self
            .repository
            .list_workers()?
            .into_iter()
            .filter(|w| !active_only || w.is_active)
            .map(|w| self.worker_view(w))
            .collect::<ServiceResult<Vec<_>>>()?;
        Ok(WorkerList { total: workers.len(), workers })
    }

    pub fn list_machines(&self, active_only: bool) -> ServiceResult<MachineList> {
        let machines = self
            .repository
            .list_machines()?
            .into_iter()
            .filter(|m| !active_only || m.is_active)
            .map(|m| self.machine_view(m))
            .collect::<ServiceResult<Vec<_>>>()?;
        Ok(MachineList { total: machines.len(), machines })
    }

    /// Vitals from the last `hours` (default from config), oldest first
    pub fn worker_history(&self, worker_id: &str, hours: Option<u32>) -> ServiceResult<WorkerHistory> {
        self.require_worker(worker_id)?;
        let hours = hours.unwrap_or(self.config.worker_history_hours);
        let since = window_start(self.clock.now(), hours);
        let history = self
            .repository
            .worker_vitals_since(worker_id, since)?
            .into_iter()
            .map(|entry| self.worker_record(entry))
            .collect::<ServiceResult<Vec<_>>>()?;
        Ok(WorkerHistory { worker_id: worker_id.to_string(), history })
    }

    /// Telemetry from the last `hours` (default from config), oldest first
    pub fn machine_history(&self, machine_id: &str, hours: Option<u32>) -> ServiceResult<MachineHistory> {
        self.require_machine(machine_id)?;
        let hours = hours.unwrap_or(self.config.machine_history_hours);
        let since = window_start(self.clock.now(), hours);
        let history = self.repository.machine_telemetry_since(machine_id, since)?;
        Ok(MachineHistory { machine_id: machine_id.to_string(), history })
    }

    /// Flag the worker's latest vitals entry. History is not rewritten; the
    /// flag is visible until a newer entry arrives.
    pub fn issue_break(&self, worker_id: &str) -> ServiceResult<BreakIssued> {
        if self.repository.latest_worker_vitals(worker_id)?.is_none() {
            return Err(ServiceError::not_found(EntityKind::Worker, worker_id));
        }
        let entity = self.entity_lock(EntityKind::Worker, worker_id);
        let _guard = lock(&entity);

        let latest = self
            .repository
            .latest_worker_vitals(worker_id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Worker, worker_id))?;
        self.repository.record_break(worker_id, latest.timestamp)?;
        info!("break issued for {} at entry {}", worker_id, latest.timestamp);
        Ok(BreakIssued {
            worker_id: worker_id.to_string(),
            entry_timestamp: latest.timestamp,
            message: format!("Break issued for {}", worker_id),
        })
    }

    pub fn dashboard_stats(&self) -> ServiceResult<DashboardStats> {
        let mut risks = Vec::new();
        for worker in self.repository.list_workers()?.iter().filter(|w| w.is_active) {
            let latest = self.repository.latest_worker_vitals(&worker.worker_id)?;
            risks.push(latest.map(|e| e.assessment.risk_state));
        }

        let mut statuses = Vec::new();
        for machine in self.repository.list_machines()?.iter().filter(|m| m.is_active) {
            let latest = self.repository.latest_machine_telemetry(&machine.machine_id)?;
            statuses.push(latest.map(|e| e.assessment.status));
        }

        Ok(DashboardStats::tally(risks, statuses, &self.config))
    }

    pub fn health(&self) -> ServiceHealth {
        ServiceHealth {
            status: "healthy",
            name: self.config.service_name.clone(),
            version: crate::VERSION,
            notifications: self.sink.stats(),
        }
    }

    // Archival

    /// Avro object container of the worker's vitals in the window
    pub fn archive_worker_history(&self, worker_id: &str, hours: Option<u32>) -> ServiceResult<Vec<u8>> {
        let history = self.worker_history(worker_id, hours)?;
        let bytes = self.codec.archive_workers(history.history.iter().map(|r| &r.entry))?;
        debug!("archived {} vitals for {} ({} bytes)", history.history.len(), worker_id, bytes.len());
        Ok(bytes)
    }

    /// Avro object container of the machine's telemetry in the window
    pub fn archive_machine_history(&self, machine_id: &str, hours: Option<u32>) -> ServiceResult<Vec<u8>> {
        let history = self.machine_history(machine_id, hours)?;
        let bytes = self.codec.archive_machines(&history.history)?;
        debug!("archived {} telemetry for {} ({} bytes)", history.history.len(), machine_id, bytes.len());
        Ok(bytes)
    }

    pub fn codec(&self) -> &HistoryCodec {
        &self.codec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_leave_no_locks_behind() {
        let service = SafetyService::new(ServiceConfig::new().seed(1)).unwrap();
        assert!(service.issue_break("WK-404").unwrap_err().is_not_found());
        assert!(service.generate_worker_vitals("WK-404", None).is_err());
        assert!(service.generate_machine_telemetry("CR-404", None).is_err());
        assert!(service.ingest_machine_telemetry("CR-404", MachineReading::default()).is_err());
        assert!(lock(&service.entity_locks).is_empty());

        service.ingest_worker_vitals("WK-1", WorkerReading::default()).unwrap();
        service.issue_break("WK-1").unwrap();
        assert_eq!(lock(&service.entity_locks).len(), 1);
    }
}
