use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use syllo_core::Participant;

use crate::error::StoreError;
use crate::sequence::StimulusSequence;

/// Per-conclusion outcome written to the trial log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConclusionResult {
    pub index: usize,
    pub label: bool,
    pub user_input: Option<bool>,
    pub reaction_time: Option<f64>,
}

pub fn conclusion_results<A>(conclusions: &StimulusSequence<A>) -> Vec<ConclusionResult> {
    conclusions
        .conclusions()
        .enumerate()
        .map(|(index, c)| ConclusionResult {
            index,
            label: c.label,
            user_input: c.user_input(),
            reaction_time: c.reaction_time(),
        })
        .collect()
}

pub fn log_path(dir: &Path, participant: &Participant) -> PathBuf {
    dir.join(format!(
        "participant_{}_{}.json",
        participant.id,
        participant.trial_kind.as_str()
    ))
}

/// Writes the session's conclusions as a pretty-printed JSON array.
pub fn write_trial_log<A>(
    dir: &Path,
    participant: &Participant,
    conclusions: &StimulusSequence<A>,
) -> Result<PathBuf, StoreError> {
    let path = log_path(dir, participant);
    let io_err = |source| StoreError::Io {
        path: path.clone(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;
    let file = File::create(&path).map_err(io_err)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &conclusion_results(conclusions))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use syllo_core::{Conclusion, Judgment, ParticipantId, PhaseKind, StimulusItem, TrialKind};

    #[test]
    fn log_contains_every_conclusion() {
        let dir = tempfile::tempdir().unwrap();
        let mut seq = StimulusSequence::from_items(
            PhaseKind::Conclusion,
            vec![
                StimulusItem::Conclusion(Conclusion::new((), true)),
                StimulusItem::Conclusion(Conclusion::new((), false)),
            ],
        );
        seq.mark_displayed(0);
        seq.record_judgment(Judgment::Valid, 500_000_000);
        let participant = Participant::new(ParticipantId::parse("3", 20).unwrap(), TrialKind::Post);

        let path = write_trial_log(dir.path(), &participant, &seq).unwrap();
        assert_eq!(path.file_name().unwrap(), "participant_3_post.json");

        let parsed: Vec<ConclusionResult> =
            serde_json::from_reader(File::open(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].user_input, Some(true));
        assert_eq!(parsed[0].reaction_time, Some(0.5));
        assert_eq!(parsed[1].user_input, None);
        assert!(!parsed[1].label);
    }
}
