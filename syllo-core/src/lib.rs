pub mod asset;
pub mod event;
pub mod participant;
pub mod phase;
pub mod stimulus;
pub mod view;

pub use asset::{AssetError, AssetLoader, PathLoader};
pub use event::{Judgment, SessionEvent};
pub use participant::{
    ConfusionCounts, IdError, ImageSet, Participant, ParticipantId, Statistics, TrialKind,
};
pub use phase::{PhaseKind, SessionState};
pub use stimulus::{Conclusion, Response, StimulusItem};
pub use view::{Frame, Slot, TextLine};
