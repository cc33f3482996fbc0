use std::path::{Path, PathBuf};

use crate::participant::ImageSet;

/// Kind of stimulus sequence a directory is loaded as.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Premise,
    Conclusion,
    Test,
}

impl PhaseKind {
    /// Whether `tag` is an accepted naming-convention character for this kind.
    pub fn accepts_tag(&self, tag: char) -> bool {
        match self {
            PhaseKind::Premise => tag == 'P',
            PhaseKind::Conclusion => tag == 'T' || tag == 'F',
            PhaseKind::Test => tag == 'T',
        }
    }

    /// Directory holding the assets of this kind.
    ///
    /// Premises and conclusions live under the participant's image set,
    /// the practice test is shared by everyone.
    pub fn directory(&self, root: &Path, set: ImageSet) -> PathBuf {
        match self {
            PhaseKind::Premise => root.join(set.folder_name()).join("Premises"),
            PhaseKind::Conclusion => root.join(set.folder_name()).join("Conclusions"),
            PhaseKind::Test => root.join("Test"),
        }
    }
}

/// States of a session, in the order a participant moves through them.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    AwaitingParticipantId,
    Instructions,
    Test,
    Premise,
    Conclusion,
    End,
    /// The session was quit and its record persisted.
    Closed,
}

impl SessionState {
    /// Sequence driven by key presses in this state, if any.
    pub fn sequence_kind(&self) -> Option<PhaseKind> {
        match self {
            SessionState::Test => Some(PhaseKind::Test),
            SessionState::Premise => Some(PhaseKind::Premise),
            SessionState::Conclusion => Some(PhaseKind::Conclusion),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed)
    }

    pub fn accepts_text_entry(&self) -> bool {
        matches!(self, SessionState::AwaitingParticipantId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_follow_naming_convention() {
        assert!(PhaseKind::Premise.accepts_tag('P'));
        assert!(!PhaseKind::Premise.accepts_tag('T'));
        assert!(PhaseKind::Conclusion.accepts_tag('T'));
        assert!(PhaseKind::Conclusion.accepts_tag('F'));
        assert!(!PhaseKind::Conclusion.accepts_tag('P'));
        assert!(PhaseKind::Test.accepts_tag('T'));
        assert!(!PhaseKind::Test.accepts_tag('F'));
    }

    #[test]
    fn directories_follow_image_layout() {
        let root = Path::new("Images");
        assert_eq!(
            PhaseKind::Premise.directory(root, ImageSet::Folder1),
            Path::new("Images/Folder1/Premises")
        );
        assert_eq!(
            PhaseKind::Conclusion.directory(root, ImageSet::Folder2),
            Path::new("Images/Folder2/Conclusions")
        );
        assert_eq!(
            PhaseKind::Test.directory(root, ImageSet::Folder2),
            Path::new("Images/Test")
        );
    }

    #[test]
    fn only_closed_is_terminal() {
        assert!(SessionState::Closed.is_terminal());
        assert!(!SessionState::End.is_terminal());
        assert_eq!(SessionState::default(), SessionState::AwaitingParticipantId);
    }
}
