pub mod config;
pub mod error;
pub mod scoring;
pub mod sequence;
pub mod state;
pub mod store;
pub mod trial_log;

pub use config::ExperimentConfig;
pub use error::{ExperimentError, ScoringError, StimulusError, StoreError};
pub use scoring::score;
pub use sequence::StimulusSequence;
pub use state::{Session, TrialController};
pub use store::{CsvRecordStore, MemoryStore, RecordStore, SessionRecord};
