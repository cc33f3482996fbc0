use syllo_core::{
    AssetLoader, Frame, Judgment, Participant, ParticipantId, PhaseKind, SessionEvent,
    SessionState, Slot, StimulusItem, TextLine, TrialKind,
};
use syllo_timing::Timer;
use tracing::{debug, info, warn};

use crate::config::ExperimentConfig;
use crate::error::ExperimentError;
use crate::scoring::score;
use crate::sequence::StimulusSequence;
use crate::store::{RecordStore, SessionRecord};
use crate::trial_log::write_trial_log;

const APP_TITLE: &str = "Solving Syllogisms";
const CONTINUE_PROMPT: &str = "Press space bar to continue";
const JUDGE_PROMPT: &str = "D: TRUE   K: FALSE";

/// Everything created once the participant id is accepted.
#[derive(Debug)]
pub struct Session<A> {
    pub participant: Participant,
    /// Practice script, only shown in `Pre` sessions.
    pub test: Option<StimulusSequence<A>>,
    pub premises: StimulusSequence<A>,
    pub conclusions: StimulusSequence<A>,
}

/// Phase state machine of one participant session.
///
/// Input arrives as already decoded [`SessionEvent`]s and the screen
/// contents leave as [`Frame`]s, so the controller runs without a window.
pub struct TrialController<T, L, S>
where
    T: Timer,
    L: AssetLoader,
    S: RecordStore,
{
    pub config: ExperimentConfig,
    timer: T,
    loader: L,
    store: S,
    state: SessionState,
    instructions: L::Asset,
    session: Option<Session<L::Asset>>,
}

impl<T, L, S> TrialController<T, L, S>
where
    T: Timer,
    L: AssetLoader,
    S: RecordStore,
{
    pub fn new(
        config: ExperimentConfig,
        timer: T,
        mut loader: L,
        store: S,
    ) -> Result<Self, ExperimentError> {
        let instructions = loader.load(&config.instructions_image)?;
        Ok(Self {
            config,
            timer,
            loader,
            store,
            state: SessionState::default(),
            instructions,
            session: None,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> Option<&Session<L::Asset>> {
        self.session.as_ref()
    }

    pub fn participant(&self) -> Option<&Participant> {
        self.session.as_ref().map(|s| &s.participant)
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn window_title(&self) -> String {
        match (self.state, self.participant()) {
            (
                SessionState::AwaitingParticipantId | SessionState::Instructions,
                _,
            )
            | (_, None) => APP_TITLE.to_string(),
            (_, Some(p)) => format!("{APP_TITLE} Test: Participant {}", p.id),
        }
    }

    /// Applies one input event. Returns whether it changed anything.
    ///
    /// Errors are fatal for the session: stimulus sets that cannot be
    /// loaded, or a record store that cannot be read or written.
    pub fn handle_event(&mut self, event: SessionEvent) -> Result<bool, ExperimentError> {
        if self.state.is_terminal() {
            return Ok(false);
        }

        match (self.state, event) {
            (_, SessionEvent::Quit) => {
                self.quit()?;
                Ok(true)
            }
            (SessionState::AwaitingParticipantId, SessionEvent::SubmitId(text)) => {
                self.submit_id(&text)
            }
            (SessionState::Instructions, SessionEvent::Advance) => {
                let next = match self.participant().map(|p| p.trial_kind) {
                    Some(TrialKind::Pre) => SessionState::Test,
                    _ => SessionState::Premise,
                };
                self.enter(next);
                Ok(true)
            }
            (SessionState::Test, event) => Ok(self.handle_test(event)),
            (SessionState::Premise, SessionEvent::Advance) => {
                let Some(session) = self.session.as_mut() else {
                    return Ok(false);
                };
                if !session.premises.advance() {
                    self.enter(SessionState::Conclusion);
                }
                Ok(true)
            }
            (SessionState::Conclusion, SessionEvent::Judge(judgment)) => self.judge(judgment),
            _ => Ok(false),
        }
    }

    fn enter(&mut self, next: SessionState) {
        info!(from = ?self.state, to = ?next, "session state changed");
        self.state = next;
    }

    fn submit_id(&mut self, text: &str) -> Result<bool, ExperimentError> {
        let id = match ParticipantId::parse(text, self.config.max_participants) {
            Ok(id) => id,
            Err(e) => {
                warn!(
                    "Incorrect participant ID. Please type a number between 1 and {}! ({e})",
                    self.config.max_participants
                );
                return Ok(false);
            }
        };

        let trial_kind = TrialKind::from_prior_record(self.store.has_participant(id)?);
        let participant = Participant::new(id, trial_kind);
        info!(
            participant = %id,
            ?trial_kind,
            image_set = participant.image_set.folder_name(),
            "participant registered"
        );

        let session = self.build_session(participant)?;
        self.session = Some(session);
        self.enter(SessionState::Instructions);
        Ok(true)
    }

    fn build_session(
        &mut self,
        participant: Participant,
    ) -> Result<Session<L::Asset>, ExperimentError> {
        let root = &self.config.images_root;
        let offset = self.config.tag_offset;
        let set = participant.image_set;

        let mut load = |kind: PhaseKind| {
            StimulusSequence::load(kind, &kind.directory(root, set), offset, &mut self.loader)
        };
        let premises = load(PhaseKind::Premise)?;
        let conclusions = load(PhaseKind::Conclusion)?;
        let test = match participant.trial_kind {
            TrialKind::Pre => Some(load(PhaseKind::Test)?),
            TrialKind::Post => None,
        };

        if let Some(test) = &test {
            for &position in &self.config.test_judged_items {
                if position == 0 || position > test.len() {
                    warn!(
                        position,
                        test_items = test.len(),
                        "judged practice position does not exist in the test script"
                    );
                }
            }
        }

        Ok(Session {
            participant,
            test,
            premises,
            conclusions,
        })
    }

    fn handle_test(&mut self, event: SessionEvent) -> bool {
        let Some(test) = self.session.as_mut().and_then(|s| s.test.as_mut()) else {
            return false;
        };
        let judged = self.config.is_judged_test_item(test.position());

        match event {
            SessionEvent::Advance if test.is_last() => {
                self.enter(SessionState::Premise);
                true
            }
            SessionEvent::Advance if !judged => test.advance(),
            SessionEvent::Judge(_) if judged && !test.is_last() => test.advance(),
            _ => false,
        }
    }

    fn judge(&mut self, judgment: Judgment) -> Result<bool, ExperimentError> {
        let now = self.timer.now();
        let Some(session) = self.session.as_mut() else {
            return Ok(false);
        };
        let position = session.conclusions.position();
        let Some(response) = session.conclusions.record_judgment(judgment, now) else {
            return Ok(false);
        };
        info!(
            conclusion = position,
            valid = response.user_input,
            reaction_time = response.reaction_time,
            "judgment recorded"
        );

        if session.conclusions.is_complete() {
            if session.participant.trial_kind == TrialKind::Post {
                let stats = score(session.conclusions.conclusions())?;
                info!(
                    hit_rate = ?stats.hit_rate,
                    false_alarm_rate = ?stats.false_alarm_rate,
                    mean_reaction_time = stats.mean_reaction_time,
                    std_reaction_time = stats.std_reaction_time,
                    "session scored"
                );
                session.participant.statistics = Some(stats);
            }
            self.enter(SessionState::End);
        }
        Ok(true)
    }

    /// Persists the session, if one was started, and closes the controller.
    fn quit(&mut self) -> Result<(), ExperimentError> {
        self.enter(SessionState::Closed);
        let Some(session) = &self.session else {
            info!("quit before a participant was registered, nothing to save");
            return Ok(());
        };

        let record = SessionRecord::new(&session.participant, &session.conclusions);
        self.store.append(&record)?;

        if let Some(dir) = &self.config.trial_log_dir {
            let path = write_trial_log(dir, &session.participant, &session.conclusions)?;
            info!(path = %path.display(), "trial log written");
        }
        Ok(())
    }

    fn conclusion_visible(&self, display_time: Option<u64>, now: u64) -> bool {
        display_time.is_none_or(|shown| {
            now.saturating_sub(shown) < self.config.conclusion_display.as_nanos() as u64
        })
    }

    /// Describes the current screen. Counts as a render pass: the first
    /// time a conclusion image is shown its display time is stamped.
    pub fn present(&mut self) -> Frame<'_, L::Asset> {
        let now = self.timer.now();

        if self.state == SessionState::Conclusion {
            let display_time = self
                .session
                .as_ref()
                .and_then(|s| s.conclusions.current_display_time());
            if self.conclusion_visible(display_time, now) {
                if let Some(session) = self.session.as_mut() {
                    if session.conclusions.mark_displayed(now) {
                        debug!(
                            conclusion = session.conclusions.position(),
                            at_ns = now,
                            "conclusion first displayed"
                        );
                    }
                }
            }
        }

        let mut frame = Frame::new(self.state);
        let Some(session) = self.session.as_ref() else {
            if self.state == SessionState::AwaitingParticipantId {
                frame.lines.push(TextLine::large(APP_TITLE, Slot::Title));
                frame.lines.push(TextLine::small(
                    "Please enter your participant ID",
                    Slot::Footer,
                ));
            }
            return frame;
        };

        match self.state {
            SessionState::AwaitingParticipantId | SessionState::Closed => {}
            SessionState::Instructions => frame.backdrop = Some(&self.instructions),
            SessionState::Test => {
                if let Some(test) = &session.test {
                    self.test_frame(test, &mut frame);
                }
            }
            SessionState::Premise => match session.premises.current() {
                Some(item) => {
                    frame.stimulus = Some(item.image());
                    frame.lines.push(TextLine::small(
                        format!("Premise: {}", session.premises.position()),
                        Slot::Header,
                    ));
                    frame.lines.push(TextLine::small(CONTINUE_PROMPT, Slot::Footer));
                }
                None => frame.lines.push(TextLine::small(
                    "Press space bar to continue to the conclusions",
                    Slot::Center,
                )),
            },
            SessionState::Conclusion => {
                let seq = &session.conclusions;
                if let Some(item) = seq.current() {
                    if self.conclusion_visible(seq.current_display_time(), now) {
                        frame.stimulus = Some(item.image());
                    }
                    frame.lines.push(TextLine::small(
                        format!("Conclusion: {}", seq.position()),
                        Slot::Header,
                    ));
                    frame.lines.push(TextLine::large(JUDGE_PROMPT, Slot::Footer));
                }
            }
            SessionState::End => match &session.participant.statistics {
                Some(stats) => {
                    let [correct, timing] = stats.summary_lines();
                    frame.lines.push(TextLine::large("End of Experiment", Slot::Title));
                    frame.lines.push(TextLine::small(correct, Slot::Center));
                    frame.lines.push(TextLine::small(timing, Slot::BelowCenter));
                }
                None => frame.lines.push(TextLine::small(
                    "Thank you! You can close the window.",
                    Slot::Center,
                )),
            },
        }
        frame
    }

    fn test_frame<'a>(&self, test: &'a StimulusSequence<L::Asset>, frame: &mut Frame<'a, L::Asset>) {
        let position = test.position();
        frame.stimulus = test.current().map(StimulusItem::image);

        let mut judged: Vec<usize> = self.config.test_judged_items.clone();
        judged.sort_unstable();
        let earlier = judged.iter().filter(|&&p| p < position).count();

        if judged.contains(&position) {
            frame.lines.push(TextLine::small(
                format!("Test Conclusion: {}", earlier + 1),
                Slot::Header,
            ));
            frame.lines.push(TextLine::large(JUDGE_PROMPT, Slot::Footer));
        } else {
            let header = if earlier == 0 {
                format!("Test Premise: {position}")
            } else {
                format!("Test Solution: {earlier}")
            };
            frame.lines.push(TextLine::small(header, Slot::Header));
            frame.lines.push(TextLine::small(CONTINUE_PROMPT, Slot::Footer));
        }

        if test.is_last() {
            frame.lines.retain(|l| l.slot != Slot::Footer);
            frame.lines.push(TextLine::small(
                "Press space bar to start experiment",
                Slot::Footer,
            ));
        }
    }
}
