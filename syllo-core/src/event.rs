/// A participant's verdict on a conclusion.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub enum Judgment {
    Valid,
    Invalid,
}

impl Judgment {
    pub fn is_valid(&self) -> bool {
        matches!(self, Judgment::Valid)
    }
}

/// Decoded input events fed to the trial controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The participant pressed enter on the id entry field.
    SubmitId(String),
    Advance,
    Judge(Judgment),
    Quit,
}
