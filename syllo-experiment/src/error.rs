use std::path::PathBuf;

use syllo_core::{AssetError, PhaseKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StimulusError {
    #[error("cannot read stimulus directory {path}: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error("no {kind:?} stimuli found in {path}")]
    Empty { kind: PhaseKind, path: PathBuf },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("no answered conclusions to score")]
    NoResponses,
}

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error(transparent)]
    Stimulus(#[from] StimulusError),

    #[error(transparent)]
    Asset(#[from] AssetError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
