//! Persistence contract and the in-memory store
//!
//! The service only ever asks one-directional questions of its store:
//! "the registration for X", "the latest N entries for X", "every entry for
//! X since T". Entries are append-only; breaks are recorded beside the
//! history rather than written into it.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use aura_core::{EntityKind, MachineTelemetryEntry, Timestamp, WorkerVitalsEntry};

use crate::error::{ServiceError, ServiceResult};
use crate::models::{MachineRegistration, WorkerRegistration};

/// Storage for workers and their vitals history
pub trait WorkerStore: Send + Sync {
    /// Register a worker, failing if the id is taken
    fn insert_worker(&self, worker: WorkerRegistration) -> ServiceResult<()>;

    fn get_worker(&self, worker_id: &str) -> ServiceResult<Option<WorkerRegistration>>;

    /// All workers, ordered by id
    fn list_workers(&self) -> ServiceResult<Vec<WorkerRegistration>>;

    /// Activate or deactivate a worker, returning the updated registration
    fn set_worker_active(&self, worker_id: &str, active: bool) -> ServiceResult<WorkerRegistration>;

    fn append_worker_vitals(&self, entry: WorkerVitalsEntry) -> ServiceResult<()>;

    /// Newest entry; among equal timestamps the last appended wins
    fn latest_worker_vitals(&self, worker_id: &str) -> ServiceResult<Option<WorkerVitalsEntry>>;

    /// Entries at or after `since`, oldest first
    fn worker_vitals_since(&self, worker_id: &str, since: Timestamp) -> ServiceResult<Vec<WorkerVitalsEntry>>;

    /// Up to `limit` entries, newest first
    fn recent_worker_vitals(&self, worker_id: &str, limit: usize) -> ServiceResult<Vec<WorkerVitalsEntry>>;

    /// Record a break issued against the entry stamped `entry_timestamp`
    fn record_break(&self, worker_id: &str, entry_timestamp: Timestamp) -> ServiceResult<()>;

    fn has_break(&self, worker_id: &str, entry_timestamp: Timestamp) -> ServiceResult<bool>;
}

/// Storage for machines and their telemetry history
pub trait MachineStore: Send + Sync {
    /// Register a machine, failing if the id is taken
    fn insert_machine(&self, machine: MachineRegistration) -> ServiceResult<()>;

    fn get_machine(&self, machine_id: &str) -> ServiceResult<Option<MachineRegistration>>;

    /// All machines, ordered by id
    fn list_machines(&self) -> ServiceResult<Vec<MachineRegistration>>;

    /// Activate or deactivate a machine, returning the updated registration
    fn set_machine_active(&self, machine_id: &str, active: bool) -> ServiceResult<MachineRegistration>;

    fn append_machine_telemetry(&self, entry: MachineTelemetryEntry) -> ServiceResult<()>;

    /// Newest entry; among equal timestamps the last appended wins
    fn latest_machine_telemetry(&self, machine_id: &str) -> ServiceResult<Option<MachineTelemetryEntry>>;

    /// Entries at or after `since`, oldest first
    fn machine_telemetry_since(&self, machine_id: &str, since: Timestamp) -> ServiceResult<Vec<MachineTelemetryEntry>>;

    /// Up to `limit` entries, newest first
    fn recent_machine_telemetry(&self, machine_id: &str, limit: usize) -> ServiceResult<Vec<MachineTelemetryEntry>>;
}

/// Combined storage trait
pub trait TelemetryRepository: WorkerStore + MachineStore {}

impl<T: WorkerStore + MachineStore> TelemetryRepository for T {}

/// Everything in process memory, lost on drop
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    workers: RwLock<BTreeMap<String, WorkerRegistration>>,
    machines: RwLock<BTreeMap<String, MachineRegistration>>,
    worker_vitals: RwLock<HashMap<String, Vec<WorkerVitalsEntry>>>,
    machine_telemetry: RwLock<HashMap<String, Vec<MachineTelemetryEntry>>>,
    breaks: RwLock<HashMap<String, BTreeSet<Timestamp>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn read<T>(lock: &RwLock<T>) -> ServiceResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| ServiceError::Storage("lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> ServiceResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| ServiceError::Storage("lock poisoned".to_string()))
}

fn latest<E: Clone>(entries: Option<&Vec<E>>, timestamp: impl Fn(&E) -> Timestamp) -> Option<E> {
    entries?.iter().max_by_key(|e| timestamp(e)).cloned()
}

fn since<E: Clone>(entries: Option<&Vec<E>>, from: Timestamp, timestamp: impl Fn(&E) -> Timestamp) -> Vec<E> {
    let mut selected: Vec<E> = entries
        .map(|all| all.iter().filter(|e| timestamp(e) >= from).cloned().collect())
        .unwrap_or_default();
    selected.sort_by_key(|e| timestamp(e));
    selected
}

fn recent<E: Clone>(entries: Option<&Vec<E>>, limit: usize, timestamp: impl Fn(&E) -> Timestamp) -> Vec<E> {
    let mut all = since(entries, 0, timestamp);
    all.reverse();
    all.truncate(limit);
    all
}

impl WorkerStore for InMemoryRepository {
    fn insert_worker(&self, worker: WorkerRegistration) -> ServiceResult<()> {
        let mut workers = write(&self.workers)?;
        if workers.contains_key(&worker.worker_id) {
            return Err(ServiceError::already_exists(EntityKind::Worker, worker.worker_id));
        }
        workers.insert(worker.worker_id.clone(), worker);
        Ok(())
    }

    fn get_worker(&self, worker_id: &str) -> ServiceResult<Option<WorkerRegistration>> {
        Ok(read(&self.workers)?.get(worker_id).cloned())
    }

    fn list_workers(&self) -> ServiceResult<Vec<WorkerRegistration>> {
        Ok(read(&self.workers)?.values().cloned().collect())
    }

    fn set_worker_active(&self, worker_id: &str, active: bool) -> ServiceResult<WorkerRegistration> {
        let mut workers = write(&self.workers)?;
        let worker = workers
            .get_mut(worker_id)
            .ok_or_else(|| ServiceError::not_found(EntityKind::Worker, worker_id))?;
        worker.is_active = active;
        Ok(worker.clone())
    }

    fn append_worker_vitals(&self, entry: WorkerVitalsEntry) -> ServiceResult<()> {
        write(&self.worker_vitals)?
            .entry(entry.worker_id.clone())
            .or_default()
            .push(entry);
        Ok(())
    }

    fn latest_worker_vitals(&self, worker_id: &str) -> ServiceResult<Option<WorkerVitalsEntry>> {
        Ok(latest(read(&self.worker_vitals)?.get(worker_id), |e| e.timestamp))
    }

    fn worker_vitals_since(&self, worker_id: &str, from: Timestamp) -> ServiceResult<Vec<WorkerVitalsEntry>> {
        Ok(since(read(&self.worker_vitals)?.get(worker_id), from, |e| e.timestamp))
    }

    fn recent_worker_vitals(&self, worker_id: &str, limit: usize) -> ServiceResult<Vec<WorkerVitalsEntry>> {
        Ok(recent(read(&self.worker_vitals)?.get(worker_id), limit, |e| e.timestamp))
    }

    fn record_break(&self, worker_id: &str, entry_timestamp: Timestamp) -> ServiceResult<()> {
        write(&self.breaks)?
            .entry(worker_id.to_string())
            .or_default()
            .insert(entry_timestamp);
        Ok(())
    }

    fn has_break(&self, worker_id: &str, entry_timestamp: Timestamp) -> ServiceResult<bool> {
        Ok(read(&self.breaks)?
            .get(worker_id)
            .map_or(false, |issued| issued.contains(&entry_timestamp)))
    }
}

impl MachineStore for InMemoryRepository {
    fn insert_machine(&self, machine: MachineRegistration) -> ServiceResult<()> {
        let mut machines = write(&self.machines)?;
        if machines.contains_key(&machine.machine_id) {
            return Err(ServiceError::already_exists(EntityKind::Machine, machine.machine_id));
        }
        machines.insert(machine.machine_id.clone(), machine);
        Ok(())
    }

    fn get_machine(&self, machine_id: &str) -> ServiceResult<Option<MachineRegistration>> {
        Ok(read(&self.machines)?.get(machine_id).cloned())
    }

    fn list_machines(&self) -> ServiceResult<Vec<MachineRegistration>> {
        Ok(read(&self.machines)?.values().cloned().collect())
    }

    fn set_machine_active(&self, machine_id: &str, active: bool) -> ServiceResult<MachineRegistration> {
        let mut machines = write(&self.machines)?;
        let machine = machines
            .get_mut(machine_id)
            .ok_or_else(|| ServiceError::not_found(EntityKind::Machine, machine_id))?;
        machine.is_active = active;
        Ok(machine.clone())
    }

    fn append_machine_telemetry(&self, entry: MachineTelemetryEntry) -> ServiceResult<()> {
        write(&self.machine_telemetry)?
            .entry(entry.machine_id.clone())
            .or_default()
            .push(entry);
        Ok(())
    }

    fn latest_machine_telemetry(&self, machine_id: &str) -> ServiceResult<Option<MachineTelemetryEntry>> {
        Ok(latest(read(&self.machine_telemetry)?.get(machine_id), |e| e.timestamp))
    }

    fn machine_telemetry_since(&self, machine_id: &str, from: Timestamp) -> ServiceResult<Vec<MachineTelemetryEntry>> {
        Ok(since(read(&self.machine_telemetry)?.get(machine_id), from, |e| e.timestamp))
    }

    fn recent_machine_telemetry(&self, machine_id: &str, limit: usize) -> ServiceResult<Vec<MachineTelemetryEntry>> {
        Ok(recent(read(&self.machine_telemetry)?.get(machine_id), limit, |e| e.timestamp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewMachine, NewWorker};
    use aura_core::{MachineReading, MachineScorer, MachineType, Scorer, WorkerReading, WorkerScorer};

    fn vitals(worker_id: &str, heart_rate: u16, timestamp: Timestamp) -> WorkerVitalsEntry {
        let reading = WorkerReading { heart_rate, ..Default::default() };
        WorkerVitalsEntry::new(worker_id, reading, WorkerScorer.score(&reading), timestamp)
    }

    fn telemetry(machine_id: &str, fuel_level: u8, timestamp: Timestamp) -> MachineTelemetryEntry {
        let reading = MachineReading { fuel_level, ..Default::default() };
        MachineTelemetryEntry::new(machine_id, reading, MachineScorer.score(&reading), timestamp)
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let repo = InMemoryRepository::new();
        repo.insert_worker(WorkerRegistration::new(NewWorker::new("WK-1"), 0)).unwrap();
        let err = repo
            .insert_worker(WorkerRegistration::new(NewWorker::new("WK-1"), 1))
            .unwrap_err();
        assert!(err.is_already_exists());

        let crane = || MachineRegistration::new(NewMachine::new("CR-1", "Crane", MachineType::Crane), 0);
        repo.insert_machine(crane()).unwrap();
        assert!(repo.insert_machine(crane()).unwrap_err().is_already_exists());
    }

    #[test]
    fn lists_are_ordered_by_id() {
        let repo = InMemoryRepository::new();
        for id in ["WK-3", "WK-1", "WK-2"] {
            repo.insert_worker(WorkerRegistration::new(NewWorker::new(id), 0)).unwrap();
        }
        let ids: Vec<_> = repo.list_workers().unwrap().into_iter().map(|w| w.worker_id).collect();
        assert_eq!(ids, ["WK-1", "WK-2", "WK-3"]);
    }

    #[test]
    fn set_active_requires_registration() {
        let repo = InMemoryRepository::new();
        assert!(repo.set_machine_active("CR-9", false).unwrap_err().is_not_found());
        repo.insert_worker(WorkerRegistration::new(NewWorker::new("WK-1"), 0)).unwrap();
        assert!(!repo.set_worker_active("WK-1", false).unwrap().is_active);
        assert!(!repo.get_worker("WK-1").unwrap().unwrap().is_active);
    }

    #[test]
    fn latest_is_newest_timestamp_not_last_append() {
        let repo = InMemoryRepository::new();
        repo.append_worker_vitals(vitals("WK-1", 70, 200)).unwrap();
        repo.append_worker_vitals(vitals("WK-1", 80, 100)).unwrap();
        assert_eq!(repo.latest_worker_vitals("WK-1").unwrap().unwrap().timestamp, 200);
        assert_eq!(repo.latest_worker_vitals("WK-2").unwrap(), None);
    }

    #[test]
    fn latest_tie_goes_to_last_append() {
        let repo = InMemoryRepository::new();
        repo.append_machine_telemetry(telemetry("CR-1", 90, 100)).unwrap();
        repo.append_machine_telemetry(telemetry("CR-1", 50, 100)).unwrap();
        assert_eq!(repo.latest_machine_telemetry("CR-1").unwrap().unwrap().reading.fuel_level, 50);
    }

    #[test]
    fn since_is_inclusive_and_ascending() {
        let repo = InMemoryRepository::new();
        for ts in [300, 100, 200, 50] {
            repo.append_machine_telemetry(telemetry("CR-1", 80, ts)).unwrap();
        }
        let stamps: Vec<_> = repo
            .machine_telemetry_since("CR-1", 100)
            .unwrap()
            .iter()
            .map(|e| e.timestamp)
            .collect();
        assert_eq!(stamps, [100, 200, 300]);
        assert!(repo.machine_telemetry_since("CR-2", 0).unwrap().is_empty());
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let repo = InMemoryRepository::new();
        for ts in [1, 3, 2, 4] {
            repo.append_worker_vitals(vitals("WK-1", 70, ts)).unwrap();
        }
        let stamps: Vec<_> = repo
            .recent_worker_vitals("WK-1", 3)
            .unwrap()
            .iter()
            .map(|e| e.timestamp)
            .collect();
        assert_eq!(stamps, [4, 3, 2]);
        assert_eq!(repo.recent_machine_telemetry("CR-1", 5).unwrap().len(), 0);
    }

    #[test]
    fn breaks_are_keyed_by_entry() {
        let repo = InMemoryRepository::new();
        repo.record_break("WK-1", 100).unwrap();
        assert!(repo.has_break("WK-1", 100).unwrap());
        assert!(!repo.has_break("WK-1", 101).unwrap());
        assert!(!repo.has_break("WK-2", 100).unwrap());
    }
}
