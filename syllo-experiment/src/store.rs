use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use syllo_core::{Participant, ParticipantId};
use tracing::{info, warn};

use crate::error::StoreError;
use crate::sequence::StimulusSequence;

/// One persisted row per session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub participant_id: ParticipantId,
    pub hit_rate: Option<f64>,
    pub false_alarm_rate: Option<f64>,
    pub true_positive: u32,
    pub false_negative: u32,
    pub false_positive: u32,
    pub true_negative: u32,
    pub mean_reaction_time: Option<f64>,
    pub std_reaction_time: Option<f64>,
    pub responses: Vec<u8>,
}

impl SessionRecord {
    /// Statistics come from the participant when they were computed;
    /// responses are always read off the conclusions in answer order.
    pub fn new<A>(participant: &Participant, conclusions: &StimulusSequence<A>) -> Self {
        let stats = participant.statistics.as_ref();
        let counts = stats.map(|s| s.counts).unwrap_or_default();
        Self {
            participant_id: participant.id,
            hit_rate: stats.and_then(|s| s.hit_rate),
            false_alarm_rate: stats.and_then(|s| s.false_alarm_rate),
            true_positive: counts.true_positive,
            false_negative: counts.false_negative,
            false_positive: counts.false_positive,
            true_negative: counts.true_negative,
            mean_reaction_time: stats.map(|s| s.mean_reaction_time),
            std_reaction_time: stats.map(|s| s.std_reaction_time),
            responses: conclusions
                .conclusions()
                .filter_map(|c| c.user_input())
                .map(u8::from)
                .collect(),
        }
    }

    /// Comma separated row; missing values are written as empty fields.
    pub fn to_csv_row(&self) -> Result<String, StoreError> {
        let opt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
        let fields = [
            self.participant_id.to_string(),
            opt(self.hit_rate),
            opt(self.false_alarm_rate),
            self.true_positive.to_string(),
            self.false_negative.to_string(),
            self.false_positive.to_string(),
            self.true_negative.to_string(),
            opt(self.mean_reaction_time),
            opt(self.std_reaction_time),
            serde_json::to_string(&self.responses)?,
        ];
        Ok(fields
            .iter()
            .map(|f| csv_field(f))
            .collect::<Vec<_>>()
            .join(","))
    }
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Append-only sink for session records.
pub trait RecordStore {
    /// Whether any earlier session was recorded for `id`.
    fn has_participant(&self, id: ParticipantId) -> Result<bool, StoreError>;

    fn append(&mut self, record: &SessionRecord) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RecordStore for CsvRecordStore {
    fn has_participant(&self, id: ParticipantId) -> Result<bool, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(self.io_err(e)),
        };
        let mut seen = false;
        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let first = line.split(',').next().unwrap_or_default().trim();
            match first.parse::<u32>() {
                Ok(row_id) => seen |= row_id == id.get(),
                Err(_) => warn!(
                    path = %self.path.display(),
                    line = line_no + 1,
                    "skipping record row without a participant id"
                ),
            }
        }
        Ok(seen)
    }

    fn append(&mut self, record: &SessionRecord) -> Result<(), StoreError> {
        let row = record.to_csv_row()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        writeln!(file, "{row}").map_err(|e| self.io_err(e))?;
        info!(
            participant = %record.participant_id,
            path = %self.path.display(),
            "session record appended"
        );
        Ok(())
    }
}

/// In-process store, used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub records: Vec<SessionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn has_participant(&self, id: ParticipantId) -> Result<bool, StoreError> {
        Ok(self.records.iter().any(|r| r.participant_id == id))
    }

    fn append(&mut self, record: &SessionRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        Ok(())
    }
}
