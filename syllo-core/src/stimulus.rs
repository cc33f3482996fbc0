use serde::{Deserialize, Serialize};

use crate::event::Judgment;
use crate::phase::PhaseKind;

/// A participant's recorded answer to a conclusion.
#[derive(Copy, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub user_input: bool,
    /// Seconds between first display and the judgment.
    pub reaction_time: f64,
}

/// A candidate conclusion with its ground truth and, once answered, the response.
#[derive(Debug, Clone, PartialEq)]
pub struct Conclusion<A> {
    pub image: A,
    pub label: bool,
    response: Option<Response>,
    display_time_ns: Option<u64>,
}

impl<A> Conclusion<A> {
    pub fn new(image: A, label: bool) -> Self {
        Self {
            image,
            label,
            response: None,
            display_time_ns: None,
        }
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    pub fn user_input(&self) -> Option<bool> {
        self.response.map(|r| r.user_input)
    }

    pub fn reaction_time(&self) -> Option<f64> {
        self.response.map(|r| r.reaction_time)
    }

    pub fn display_time_ns(&self) -> Option<u64> {
        self.display_time_ns
    }

    pub fn is_answered(&self) -> bool {
        self.response.is_some()
    }

    /// Stamps the first display time. Returns false if it was already set.
    pub fn mark_displayed(&mut self, now_ns: u64) -> bool {
        if self.display_time_ns.is_some() {
            return false;
        }
        self.display_time_ns = Some(now_ns);
        true
    }

    /// Records the judgment once. A conclusion answered before it was ever
    /// displayed gets a zero reaction time.
    pub fn answer(&mut self, judgment: Judgment, now_ns: u64) -> Option<&Response> {
        if self.response.is_some() {
            return None;
        }
        let shown = *self.display_time_ns.get_or_insert(now_ns);
        let reaction_ns = now_ns.saturating_sub(shown);
        self.response = Some(Response {
            user_input: judgment.is_valid(),
            reaction_time: reaction_ns as f64 / 1e9,
        });
        self.response.as_ref()
    }
}

/// One entry of a stimulus sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum StimulusItem<A> {
    Premise(A),
    TestItem(A),
    Conclusion(Conclusion<A>),
}

impl<A> StimulusItem<A> {
    /// Builds the item for `kind` from an asset whose filename carried `tag`.
    pub fn from_tagged(kind: PhaseKind, tag: char, asset: A) -> Self {
        match kind {
            PhaseKind::Premise => StimulusItem::Premise(asset),
            PhaseKind::Test => StimulusItem::TestItem(asset),
            PhaseKind::Conclusion => StimulusItem::Conclusion(Conclusion::new(asset, tag == 'T')),
        }
    }

    pub fn image(&self) -> &A {
        match self {
            StimulusItem::Premise(a) | StimulusItem::TestItem(a) => a,
            StimulusItem::Conclusion(c) => &c.image,
        }
    }

    pub fn as_conclusion(&self) -> Option<&Conclusion<A>> {
        match self {
            StimulusItem::Conclusion(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_conclusion_mut(&mut self) -> Option<&mut Conclusion<A>> {
        match self {
            StimulusItem::Conclusion(c) => Some(c),
            _ => None,
        }
    }
}
