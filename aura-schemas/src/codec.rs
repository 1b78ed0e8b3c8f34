//! Avro encoding of history entries
//!
//! Single entries encode to bare datums (the reader must know the schema);
//! batches encode to an object container that embeds the writer schema, which
//! is what archives use.

use apache_avro::{
    from_avro_datum, to_avro_datum,
    types::{Record, Value},
    Reader, Schema, Writer,
};

use aura_core::{
    MachineAssessment, MachineReading, MachineStatus, MachineTelemetryEntry, MaintenanceState,
    RiskState, WorkerAssessment, WorkerReading, WorkerVitalsEntry,
};

use crate::{
    registry::{SchemaRegistry, GLOBAL_REGISTRY},
    schemas::{
        MACHINE_STATUS_SYMBOLS, MACHINE_TELEMETRY_V1, MAINTENANCE_STATE_SYMBOLS,
        RISK_STATE_SYMBOLS, WORKER_VITALS_V1,
    },
    SchemaError,
};

const RISK_STATES: [RiskState; 3] = [RiskState::Low, RiskState::Medium, RiskState::High];

const MACHINE_STATUSES: [MachineStatus; 4] = [
    MachineStatus::Operational,
    MachineStatus::Warning,
    MachineStatus::Maintenance,
    MachineStatus::Offline,
];

const MAINTENANCE_STATES: [MaintenanceState; 4] = [
    MaintenanceState::Normal,
    MaintenanceState::Attention,
    MaintenanceState::Warning,
    MaintenanceState::Critical,
];

fn enum_value<T: PartialEq>(all: &[T], symbols: &[&str], value: &T) -> Value {
    let index = all.iter().position(|v| v == value).unwrap_or_default();
    Value::Enum(index as u32, symbols[index].to_string())
}

fn encode_err(e: apache_avro::Error) -> SchemaError {
    SchemaError::Encode(e.to_string())
}

fn decode_err(e: apache_avro::Error) -> SchemaError {
    SchemaError::Decode(e.to_string())
}

/// Fields of a decoded record, looked up by name
struct Fields(Vec<(String, Value)>);

impl Fields {
    fn from_value(value: Value) -> Result<Self, SchemaError> {
        match value {
            Value::Record(fields) => Ok(Self(fields)),
            other => Err(SchemaError::Decode(format!("expected record, got {:?}", other))),
        }
    }

    fn get(&self, name: &str) -> Result<&Value, SchemaError> {
        self.0
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
            .ok_or_else(|| SchemaError::Decode(format!("missing field {}", name)))
    }

    fn long(&self, name: &str) -> Result<i64, SchemaError> {
        match self.get(name)? {
            Value::Long(v) => Ok(*v),
            Value::Int(v) => Ok(i64::from(*v)),
            other => Err(SchemaError::Decode(format!("{} is not an integer: {:?}", name, other))),
        }
    }

    fn int<T: TryFrom<i64>>(&self, name: &str) -> Result<T, SchemaError> {
        let v = self.long(name)?;
        T::try_from(v).map_err(|_| SchemaError::Decode(format!("{} = {} out of range", name, v)))
    }

    fn double(&self, name: &str) -> Result<f64, SchemaError> {
        match self.get(name)? {
            Value::Double(v) => Ok(*v),
            Value::Float(v) => Ok(f64::from(*v)),
            other => Err(SchemaError::Decode(format!("{} is not a number: {:?}", name, other))),
        }
    }

    fn optional_double(&self, name: &str) -> Result<Option<f64>, SchemaError> {
        let value = match self.get(name)? {
            Value::Union(_, inner) => inner.as_ref(),
            other => other,
        };
        match value {
            Value::Null => Ok(None),
            Value::Double(v) => Ok(Some(*v)),
            other => Err(SchemaError::Decode(format!("{} is not a number or null: {:?}", name, other))),
        }
    }

    fn string(&self, name: &str) -> Result<String, SchemaError> {
        match self.get(name)? {
            Value::String(v) => Ok(v.clone()),
            other => Err(SchemaError::Decode(format!("{} is not a string: {:?}", name, other))),
        }
    }

    fn symbol<T: Copy>(&self, name: &str, all: &[T], symbols: &[&str]) -> Result<T, SchemaError> {
        let symbol = match self.get(name)? {
            Value::Enum(_, symbol) | Value::String(symbol) => symbol,
            other => return Err(SchemaError::Decode(format!("{} is not an enum: {:?}", name, other))),
        };
        symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| all[i])
            .ok_or_else(|| SchemaError::Decode(format!("unknown {} symbol {}", name, symbol)))
    }
}

/// Encoder/decoder for history entries
#[derive(Debug, Clone)]
pub struct HistoryCodec {
    worker: Schema,
    machine: Schema,
}

impl HistoryCodec {
    /// Codec using the v1 worker and machine schemas in `registry`. Records
    /// are built field by field against v1, so a newer version registered
    /// later is not picked up here.
    pub fn new(registry: &SchemaRegistry) -> Result<Self, SchemaError> {
        Ok(Self {
            worker: registry.get(WORKER_VITALS_V1)?,
            machine: registry.get(MACHINE_TELEMETRY_V1)?,
        })
    }

    /// Codec backed by the global registry
    pub fn from_global() -> Result<Self, SchemaError> {
        Self::new(&GLOBAL_REGISTRY)
    }

    pub fn worker_schema(&self) -> &Schema {
        &self.worker
    }

    pub fn machine_schema(&self) -> &Schema {
        &self.machine
    }

    fn worker_record(&self, entry: &WorkerVitalsEntry) -> Result<Value, SchemaError> {
        let mut record = Record::new(&self.worker)
            .ok_or_else(|| SchemaError::Encode("worker schema is not a record".to_string()))?;
        let reading = &entry.reading;
        record.put("worker_id", entry.worker_id.as_str());
        record.put("timestamp", entry.timestamp as i64);
        record.put("heart_rate", i32::from(reading.heart_rate));
        record.put("hrv", i32::from(reading.hrv));
        record.put("temperature", reading.temperature);
        record.put("jerk_count", i64::from(reading.jerk_count));
        record.put("machine_stress_index", i32::from(reading.machine_stress_index));
        record.put("vibration_rms", reading.vibration_rms);
        record.put("cis_score", i32::from(entry.assessment.cis_score));
        record.put("risk_state", enum_value(&RISK_STATES, &RISK_STATE_SYMBOLS, &entry.assessment.risk_state));
        Ok(record.into())
    }

    fn machine_record(&self, entry: &MachineTelemetryEntry) -> Result<Value, SchemaError> {
        let mut record = Record::new(&self.machine)
            .ok_or_else(|| SchemaError::Encode("machine schema is not a record".to_string()))?;
        let reading = &entry.reading;
        let assessment = &entry.assessment;
        record.put("machine_id", entry.machine_id.as_str());
        record.put("timestamp", entry.timestamp as i64);
        record.put("stress_index", i32::from(reading.stress_index));
        record.put("temperature", reading.temperature);
        record.put("vibration_rms", reading.vibration_rms);
        record.put("operating_hours", reading.operating_hours);
        record.put("fuel_level", i32::from(reading.fuel_level));
        record.put("oil_pressure", i32::from(reading.oil_pressure));
        record.put("health_score", i32::from(assessment.health_score));
        record.put("failure_probability", i32::from(assessment.failure_probability));
        record.put("status", enum_value(&MACHINE_STATUSES, &MACHINE_STATUS_SYMBOLS, &assessment.status));
        record.put("predicted_maintenance_days", i32::from(assessment.predicted_maintenance_days));
        record.put(
            "maintenance_state",
            enum_value(&MAINTENANCE_STATES, &MAINTENANCE_STATE_SYMBOLS, &assessment.maintenance_state),
        );
        let rpm = match entry.rpm_instability {
            Some(rpm) => Value::Union(1, Box::new(Value::Double(rpm))),
            None => Value::Union(0, Box::new(Value::Null)),
        };
        record.put("rpm_instability", rpm);
        Ok(record.into())
    }

    fn worker_entry(value: Value) -> Result<WorkerVitalsEntry, SchemaError> {
        let f = Fields::from_value(value)?;
        let reading = WorkerReading {
            heart_rate: f.int("heart_rate")?,
            hrv: f.int("hrv")?,
            temperature: f.double("temperature")?,
            jerk_count: f.int("jerk_count")?,
            machine_stress_index: f.int("machine_stress_index")?,
            vibration_rms: f.double("vibration_rms")?,
        };
        let assessment = WorkerAssessment {
            cis_score: f.int("cis_score")?,
            risk_state: f.symbol("risk_state", &RISK_STATES, &RISK_STATE_SYMBOLS)?,
        };
        Ok(WorkerVitalsEntry::new(f.string("worker_id")?, reading, assessment, f.int("timestamp")?))
    }

    fn machine_entry(value: Value) -> Result<MachineTelemetryEntry, SchemaError> {
        let f = Fields::from_value(value)?;
        let reading = MachineReading {
            stress_index: f.int("stress_index")?,
            temperature: f.double("temperature")?,
            vibration_rms: f.double("vibration_rms")?,
            operating_hours: f.double("operating_hours")?,
            fuel_level: f.int("fuel_level")?,
            oil_pressure: f.int("oil_pressure")?,
        };
        let assessment = MachineAssessment {
            health_score: f.int("health_score")?,
            failure_probability: f.int("failure_probability")?,
            status: f.symbol("status", &MACHINE_STATUSES, &MACHINE_STATUS_SYMBOLS)?,
            predicted_maintenance_days: f.int("predicted_maintenance_days")?,
            maintenance_state: f.symbol("maintenance_state", &MAINTENANCE_STATES, &MAINTENANCE_STATE_SYMBOLS)?,
        };
        let mut entry = MachineTelemetryEntry::new(f.string("machine_id")?, reading, assessment, f.int("timestamp")?);
        entry.rpm_instability = f.optional_double("rpm_instability")?;
        Ok(entry)
    }

    /// Encode one worker entry as a bare datum
    pub fn encode_worker(&self, entry: &WorkerVitalsEntry) -> Result<Vec<u8>, SchemaError> {
        to_avro_datum(&self.worker, self.worker_record(entry)?).map_err(encode_err)
    }

    /// Decode one worker entry from a bare datum
    pub fn decode_worker(&self, mut bytes: &[u8]) -> Result<WorkerVitalsEntry, SchemaError> {
        let value = from_avro_datum(&self.worker, &mut bytes, None).map_err(decode_err)?;
        Self::worker_entry(value)
    }

    /// Encode one machine entry as a bare datum
    pub fn encode_machine(&self, entry: &MachineTelemetryEntry) -> Result<Vec<u8>, SchemaError> {
        to_avro_datum(&self.machine, self.machine_record(entry)?).map_err(encode_err)
    }

    /// Decode one machine entry from a bare datum
    pub fn decode_machine(&self, mut bytes: &[u8]) -> Result<MachineTelemetryEntry, SchemaError> {
        let value = from_avro_datum(&self.machine, &mut bytes, None).map_err(decode_err)?;
        Self::machine_entry(value)
    }

    /// Write worker entries to an Avro object container
    pub fn archive_workers<'a, I>(&self, entries: I) -> Result<Vec<u8>, SchemaError>
    where
        I: IntoIterator<Item = &'a WorkerVitalsEntry>,
    {
        let mut writer = Writer::new(&self.worker, Vec::new());
        for entry in entries {
            writer.append(self.worker_record(entry)?).map_err(encode_err)?;
        }
        writer.into_inner().map_err(encode_err)
    }

    /// Write machine entries to an Avro object container
    pub fn archive_machines<'a, I>(&self, entries: I) -> Result<Vec<u8>, SchemaError>
    where
        I: IntoIterator<Item = &'a MachineTelemetryEntry>,
    {
        let mut writer = Writer::new(&self.machine, Vec::new());
        for entry in entries {
            writer.append(self.machine_record(entry)?).map_err(encode_err)?;
        }
        writer.into_inner().map_err(encode_err)
    }

    /// Read every worker entry from an object container
    pub fn read_worker_archive(&self, bytes: &[u8]) -> Result<Vec<WorkerVitalsEntry>, SchemaError> {
        Reader::with_schema(&self.worker, bytes)
            .map_err(decode_err)?
            .map(|value| Self::worker_entry(value.map_err(decode_err)?))
            .collect()
    }

    /// Read every machine entry from an object container
    pub fn read_machine_archive(&self, bytes: &[u8]) -> Result<Vec<MachineTelemetryEntry>, SchemaError> {
        Reader::with_schema(&self.machine, bytes)
            .map_err(decode_err)?
            .map(|value| Self::machine_entry(value.map_err(decode_err)?))
            .collect()
    }
}
