use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("participant id {0:?} is not a number")]
    NotANumber(String),
    #[error("participant id {id} is outside 1..={max}")]
    OutOfRange { id: i64, max: u32 },
}

/// Validated participant id in `1..=max_participants`.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(u32);

impl ParticipantId {
    pub fn parse(input: &str, max_participants: u32) -> Result<Self, IdError> {
        let trimmed = input.trim();
        let id: i64 = trimmed
            .parse()
            .map_err(|_| IdError::NotANumber(trimmed.to_string()))?;
        if id < 1 || id > i64::from(max_participants) {
            return Err(IdError::OutOfRange {
                id,
                max: max_participants,
            });
        }
        Ok(Self(id as u32))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn is_even(&self) -> bool {
        self.0 % 2 == 0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// First (`Pre`) or second (`Post`) measured session of a participant.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialKind {
    Pre,
    Post,
}

impl TrialKind {
    /// `Post` once the record sink already holds a row for the participant.
    pub fn from_prior_record(seen_before: bool) -> Self {
        if seen_before {
            TrialKind::Post
        } else {
            TrialKind::Pre
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrialKind::Pre => "pre",
            TrialKind::Post => "post",
        }
    }
}

/// One of the two stimulus folders a session draws premises and conclusions from.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum ImageSet {
    Folder1,
    Folder2,
}

impl ImageSet {
    /// Even ids see `Folder1` first, odd ids see it second, so every
    /// participant switches folders between their two sessions.
    pub fn for_participant(id: ParticipantId, kind: TrialKind) -> Self {
        match (id.is_even(), kind) {
            (true, TrialKind::Pre) | (false, TrialKind::Post) => ImageSet::Folder1,
            _ => ImageSet::Folder2,
        }
    }

    pub fn folder_name(&self) -> &'static str {
        match self {
            ImageSet::Folder1 => "Folder1",
            ImageSet::Folder2 => "Folder2",
        }
    }
}

#[derive(Copy, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positive: u32,
    pub false_positive: u32,
    pub true_negative: u32,
    pub false_negative: u32,
}

impl ConfusionCounts {
    pub fn correct(&self) -> u32 {
        self.true_positive + self.true_negative
    }

    pub fn answered(&self) -> u32 {
        self.correct() + self.false_positive + self.false_negative
    }

    /// `None` when there were no genuinely valid conclusions.
    pub fn hit_rate(&self) -> Option<f64> {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    /// `None` when there were no genuinely invalid conclusions.
    pub fn false_alarm_rate(&self) -> Option<f64> {
        ratio(self.false_positive, self.false_positive + self.true_negative)
    }
}

fn ratio(num: u32, den: u32) -> Option<f64> {
    (den != 0).then(|| f64::from(num) / f64::from(den))
}

/// Performance summary of one measured session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub counts: ConfusionCounts,
    pub hit_rate: Option<f64>,
    pub false_alarm_rate: Option<f64>,
    /// 1 for judged valid, 0 for judged invalid, in answer order.
    pub responses: Vec<u8>,
    pub mean_reaction_time: f64,
    pub std_reaction_time: f64,
    /// Number of conclusions presented.
    pub total: usize,
}

impl Statistics {
    pub fn summary_lines(&self) -> [String; 2] {
        [
            format!(
                "You answered {} of {} conclusions correctly",
                self.counts.correct(),
                self.total
            ),
            format!(
                "with an average reaction time of {:.2}s.",
                self.mean_reaction_time
            ),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub id: ParticipantId,
    pub trial_kind: TrialKind,
    pub image_set: ImageSet,
    /// Filled in once, when a `Post` session reaches its end.
    pub statistics: Option<Statistics>,
}

impl Participant {
    pub fn new(id: ParticipantId, trial_kind: TrialKind) -> Self {
        Self {
            id,
            trial_kind,
            image_set: ImageSet::for_participant(id, trial_kind),
            statistics: None,
        }
    }
}
