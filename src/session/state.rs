//! Per-play-through quiz and speech state, driven by one reducer.
//!
//! [`Session::apply`] is the only way the state changes. It never performs
//! side effects itself; it returns [`Effect`]s for the controller to carry
//! out (play a cue, schedule the turn delay, start the recogniser, ...).

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;

use crate::catalog::{Catalog, Section, Target, TargetId};
use crate::engine::aliases::AliasTable;
use crate::engine::matcher;
use crate::engine::transcript::normalize_transcript;
use crate::session::deck;
use crate::speech::{SpeechError, SpeechEvent};

/// Shown in place of a transcript when the recogniser heard nothing.
pub const NO_SPEECH_PLACEHOLDER: &str = "(no sound heard)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Explore,
    Quiz,
    Speech,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Explore => "explore",
            Mode::Quiz => "quiz",
            Mode::Speech => "speech",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Wrong,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingAnswer,
    Feedback(Feedback),
    Won,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeedbackDelays {
    pub quiz: Duration,
    pub speech: Duration,
}

impl Default for FeedbackDelays {
    fn default() -> Self {
        Self {
            quiz: Duration::from_millis(2000),
            speech: Duration::from_millis(1500),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Celebration {
    Correct,
    Win { message: &'static str },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    StartQuiz,
    StartSpeech,
    SubmitChoice(TargetId),
    /// A finalised transcript, raw from the recogniser.
    SubmitSpeech(String),
    DelayElapsed(u64),
    ReplayCue,
    StartListening,
    StopListening,
    CancelListening,
    Heard(SpeechEvent),
    ToggleHint,
    DismissWin,
    /// Leave quiz/speech for free exploration. Tears the session down.
    Explore,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    PlayCue(TargetId),
    PlaySound(&'static str),
    Celebrate(Celebration),
    ScheduleDelay { token: u64, delay: Duration },
    CancelDelay,
    StartRecognizer,
    StopRecognizer,
    AbortRecognizer,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ListenWindow {
    active: bool,
    answered: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    catalog: Catalog,
    aliases: AliasTable,
    delays: FeedbackDelays,
    mode: Mode,
    phase: Phase,
    /// Remaining targets; the head is the current question.
    queue: VecDeque<TargetId>,
    current: Option<TargetId>,
    options: Vec<TargetId>,
    last_selection: Option<TargetId>,
    score: u32,
    total: usize,
    transcript: String,
    listen: ListenWindow,
    hint_shown: bool,
    win_message: Option<&'static str>,
    pending_token: Option<u64>,
    next_token: u64,
}

impl Session {
    pub fn new(catalog: Catalog, aliases: AliasTable, delays: FeedbackDelays) -> Self {
        Self {
            catalog,
            aliases,
            delays,
            mode: Mode::Explore,
            phase: Phase::Idle,
            queue: VecDeque::new(),
            current: None,
            options: Vec::new(),
            last_selection: None,
            score: 0,
            total: 0,
            transcript: String::new(),
            listen: ListenWindow::default(),
            hint_shown: false,
            win_message: None,
            pending_token: None,
            next_token: 0,
        }
    }

    pub fn apply<R: Rng + ?Sized>(&mut self, action: Action, rng: &mut R) -> Vec<Effect> {
        let mut effects = Vec::new();
        match action {
            Action::StartQuiz => self.start(Mode::Quiz, rng, &mut effects),
            Action::StartSpeech => self.start(Mode::Speech, rng, &mut effects),
            Action::SubmitChoice(choice) => self.submit_choice(choice, &mut effects),
            Action::SubmitSpeech(raw) => self.submit_speech(&raw, &mut effects),
            Action::DelayElapsed(token) => self.delay_elapsed(token, rng, &mut effects),
            Action::ReplayCue => {
                if self.mode == Mode::Quiz
                    && let Some(id) = self.current
                {
                    effects.push(Effect::PlayCue(id));
                }
            }
            Action::StartListening => self.start_listening(&mut effects),
            Action::StopListening => {
                if self.listen.active {
                    effects.push(Effect::StopRecognizer);
                }
            }
            Action::CancelListening => self.close_window(&mut effects),
            Action::Heard(event) => self.heard(event, &mut effects),
            Action::ToggleHint => {
                if self.mode == Mode::Speech
                    && matches!(
                        self.phase,
                        Phase::AwaitingAnswer | Phase::Feedback(Feedback::Wrong)
                    )
                {
                    self.hint_shown = !self.hint_shown;
                }
            }
            Action::DismissWin => {
                if self.phase == Phase::Won {
                    self.phase = Phase::Idle;
                    self.win_message = None;
                }
            }
            Action::Explore => self.teardown(&mut effects),
        }
        effects
    }

    fn start<R: Rng + ?Sized>(&mut self, mode: Mode, rng: &mut R, effects: &mut Vec<Effect>) {
        self.teardown(effects);

        self.queue = deck::shuffled_queue(&self.catalog, rng);
        self.total = self.queue.len();
        self.mode = mode;
        log::info!(
            "starting {} {} session with {} targets",
            self.catalog.section().as_str(),
            mode.as_str(),
            self.total
        );

        match self.queue.front().copied() {
            Some(first) => self.begin_turn(first, rng, effects),
            None => self.mode = Mode::Explore,
        }
    }

    fn begin_turn<R: Rng + ?Sized>(&mut self, id: TargetId, rng: &mut R, effects: &mut Vec<Effect>) {
        self.current = Some(id);
        self.phase = Phase::AwaitingAnswer;
        self.last_selection = None;
        self.hint_shown = false;
        self.transcript.clear();
        self.options = match self.mode {
            Mode::Quiz => deck::choice_options(&self.catalog, id, rng),
            _ => Vec::new(),
        };
        log::debug!("turn: {id} ({} left)", self.queue.len());

        // Target is fully assigned before its cue is requested.
        if self.mode == Mode::Quiz {
            effects.push(Effect::PlayCue(id));
        }
    }

    fn submit_choice(&mut self, choice: TargetId, effects: &mut Vec<Effect>) {
        if self.mode != Mode::Quiz || self.phase != Phase::AwaitingAnswer {
            return;
        }
        let correct = match self.current_target() {
            Some(target) => matcher::choice_matches(choice, target),
            None => return,
        };
        self.last_selection = Some(choice);
        self.resolve(correct, effects);
    }

    fn submit_speech(&mut self, raw: &str, effects: &mut Vec<Effect>) {
        if self.mode != Mode::Speech || self.phase != Phase::AwaitingAnswer {
            return;
        }
        let transcript = normalize_transcript(raw);
        if transcript.is_empty() {
            return;
        }
        let Some(target) = self.current_target() else {
            return;
        };
        let rule = matcher::speech_match_rule(&transcript, target, &self.aliases);
        log::debug!("heard {transcript:?} for {}: {rule:?}", target.id);

        self.last_selection = self.current;
        self.transcript = transcript;
        self.resolve(rule.is_some(), effects);
    }

    fn resolve(&mut self, correct: bool, effects: &mut Vec<Effect>) {
        if correct {
            self.phase = Phase::Feedback(Feedback::Correct);
            self.score += 1;
            effects.push(Effect::Celebrate(Celebration::Correct));
        } else {
            self.phase = Phase::Feedback(Feedback::Wrong);
        }

        let token = self.next_token;
        self.next_token += 1;
        self.pending_token = Some(token);
        effects.push(Effect::ScheduleDelay {
            token,
            delay: self.feedback_delay(),
        });
    }

    fn delay_elapsed<R: Rng + ?Sized>(&mut self, token: u64, rng: &mut R, effects: &mut Vec<Effect>) {
        if self.pending_token != Some(token) {
            log::debug!("discarding stale turn delay {token}");
            return;
        }
        self.pending_token = None;

        match self.phase {
            Phase::Feedback(Feedback::Correct) => {
                self.queue.pop_front();
                match self.queue.front().copied() {
                    Some(next) => self.begin_turn(next, rng, effects),
                    None => self.win(effects),
                }
            }
            Phase::Feedback(Feedback::Wrong) => {
                self.phase = Phase::AwaitingAnswer;
                self.last_selection = None;
            }
            _ => {}
        }
    }

    fn win(&mut self, effects: &mut Vec<Effect>) {
        let message = win_message(self.catalog.section(), self.mode);
        let sound = win_sound(self.mode);
        log::info!("session won: {message}");

        self.close_window(effects);
        self.mode = Mode::Explore;
        self.phase = Phase::Won;
        self.current = None;
        self.options.clear();
        self.last_selection = None;
        self.hint_shown = false;
        self.win_message = Some(message);

        effects.push(Effect::Celebrate(Celebration::Win { message }));
        effects.push(Effect::PlaySound(sound));
    }

    fn start_listening(&mut self, effects: &mut Vec<Effect>) {
        if self.mode != Mode::Speech || self.phase != Phase::AwaitingAnswer || self.listen.active {
            return;
        }
        self.listen = ListenWindow {
            active: true,
            answered: false,
        };
        self.transcript.clear();
        effects.push(Effect::StartRecognizer);
    }

    fn close_window(&mut self, effects: &mut Vec<Effect>) {
        if self.listen.active {
            self.listen.active = false;
            effects.push(Effect::AbortRecognizer);
        }
    }

    fn heard(&mut self, event: SpeechEvent, effects: &mut Vec<Effect>) {
        if !self.listen.active {
            return;
        }
        match event {
            SpeechEvent::Started => {}
            SpeechEvent::Interim(text) => {
                let text = normalize_transcript(&text);
                if !text.is_empty() {
                    self.transcript = text;
                }
            }
            SpeechEvent::Final(text) => {
                let text = normalize_transcript(&text);
                if text.is_empty() {
                    return;
                }
                self.transcript = text.clone();
                if !self.listen.answered {
                    self.listen.answered = true;
                    self.submit_speech(&text, effects);
                }
            }
            SpeechEvent::Error(SpeechError::NoSpeech) => {
                self.transcript = NO_SPEECH_PLACEHOLDER.to_string();
                self.listen.active = false;
            }
            SpeechEvent::Error(err) => {
                log::warn!("speech recognition stopped: {err}");
                self.listen.active = false;
            }
            SpeechEvent::Ended => self.listen.active = false,
        }
    }

    fn teardown(&mut self, effects: &mut Vec<Effect>) {
        self.close_window(effects);
        if self.pending_token.take().is_some() {
            effects.push(Effect::CancelDelay);
        }
        self.mode = Mode::Explore;
        self.phase = Phase::Idle;
        self.queue.clear();
        self.current = None;
        self.options.clear();
        self.last_selection = None;
        self.score = 0;
        self.total = 0;
        self.transcript.clear();
        self.hint_shown = false;
        self.win_message = None;
    }

    fn feedback_delay(&self) -> Duration {
        match self.mode {
            Mode::Speech => self.delays.speech,
            Mode::Quiz | Mode::Explore => self.delays.quiz,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn feedback(&self) -> Option<Feedback> {
        match self.phase {
            Phase::Feedback(feedback) => Some(feedback),
            _ => None,
        }
    }

    pub fn current(&self) -> Option<TargetId> {
        self.current
    }

    pub fn current_target(&self) -> Option<&Target> {
        self.current.and_then(|id| self.catalog.get(id))
    }

    pub fn options(&self) -> &[TargetId] {
        &self.options
    }

    pub fn last_selection(&self) -> Option<TargetId> {
        self.last_selection
    }

    pub fn queue(&self) -> &VecDeque<TargetId> {
        &self.queue
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// `(answered, total)` for the progress bar.
    pub fn progress(&self) -> (usize, usize) {
        (self.total.saturating_sub(self.queue.len()), self.total)
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn is_listening(&self) -> bool {
        self.listen.active
    }

    pub fn hint_shown(&self) -> bool {
        self.hint_shown
    }

    pub fn win_message(&self) -> Option<&'static str> {
        self.win_message
    }

    pub fn has_pending_delay(&self) -> bool {
        self.pending_token.is_some()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.mode, Mode::Quiz | Mode::Speech)
    }
}

fn win_message(section: Section, mode: Mode) -> &'static str {
    match (section, mode) {
        (Section::Alphabet, Mode::Speech) => "Amazing! You said all the letters!",
        (Section::Alphabet, _) => "Yay! You finished all letters!",
        (Section::Numbers, Mode::Speech) => "Incredible! You counted all the numbers!",
        (Section::Numbers, _) => "Yay! You got all numbers right!",
    }
}

fn win_sound(mode: Mode) -> &'static str {
    match mode {
        Mode::Speech => "win_speak",
        _ => "win_listen",
    }
}
