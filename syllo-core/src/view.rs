use crate::phase::SessionState;

/// Vertical placement of a text line; the renderer maps slots to pixels.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Slot {
    Title,
    Header,
    Center,
    BelowCenter,
    Footer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub slot: Slot,
    /// Drawn with the large font.
    pub large: bool,
}

impl TextLine {
    pub fn small(text: impl Into<String>, slot: Slot) -> Self {
        Self {
            text: text.into(),
            slot,
            large: false,
        }
    }

    pub fn large(text: impl Into<String>, slot: Slot) -> Self {
        Self {
            text: text.into(),
            slot,
            large: true,
        }
    }
}

/// Everything one render pass needs to draw.
#[derive(Debug)]
pub struct Frame<'a, A> {
    pub state: SessionState,
    /// Full-screen instruction image.
    pub backdrop: Option<&'a A>,
    /// Current stimulus image.
    pub stimulus: Option<&'a A>,
    pub lines: Vec<TextLine>,
}

impl<'a, A> Frame<'a, A> {
    pub fn new(state: SessionState) -> Self {
        Self {
            state,
            backdrop: None,
            stimulus: None,
            lines: Vec::new(),
        }
    }

    pub fn text(&self, slot: Slot) -> Option<&str> {
        self.lines
            .iter()
            .find(|l| l.slot == slot)
            .map(|l| l.text.as_str())
    }
}
