use std::sync::mpsc;
use std::time::Instant;

use rand::Rng;

use crate::audio::AudioPlayback;
use crate::catalog::{Section, TargetId};
use crate::session::state::{Action, Celebration, Effect, Session};
use crate::session::timer::TurnTimer;
use crate::speech::{SpeechEvent, SpeechRecognizer};

/// Receives correct-answer and win celebrations. Fire-and-forget.
pub trait Notifier {
    fn notify(&mut self, celebration: Celebration);
}

pub struct ChannelNotifier {
    tx: mpsc::Sender<Celebration>,
}

impl Notifier for ChannelNotifier {
    fn notify(&mut self, celebration: Celebration) {
        if self.tx.send(celebration).is_err() {
            log::warn!("celebration dropped: nobody is listening");
        }
    }
}

/// Notifier whose celebrations the UI drains on its own schedule.
pub fn channel() -> (ChannelNotifier, mpsc::Receiver<Celebration>) {
    let (tx, rx) = mpsc::channel();
    (ChannelNotifier { tx }, rx)
}

/// Runs a [`Session`] against its collaborators: applies actions, carries
/// out the resulting effects, and feeds timer expiries and recogniser
/// events back in from [`tick`](Self::tick).
pub struct SessionController<R: Rng> {
    session: Session,
    timer: TurnTimer,
    audio: Box<dyn AudioPlayback>,
    speech: Box<dyn SpeechRecognizer>,
    notifier: Box<dyn Notifier>,
    rng: R,
}

impl<R: Rng> SessionController<R> {
    pub fn new(
        session: Session,
        audio: Box<dyn AudioPlayback>,
        speech: Box<dyn SpeechRecognizer>,
        notifier: Box<dyn Notifier>,
        rng: R,
    ) -> Self {
        Self {
            session,
            timer: TurnTimer::new(),
            audio,
            speech,
            notifier,
            rng,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn section(&self) -> Section {
        self.session.catalog().section()
    }

    pub fn speech_available(&self) -> bool {
        self.speech.is_available()
    }

    pub fn start_quiz(&mut self, now: Instant) {
        self.dispatch(Action::StartQuiz, now);
    }

    pub fn start_speech_challenge(&mut self, now: Instant) {
        self.dispatch(Action::StartSpeech, now);
    }

    pub fn submit_choice(&mut self, choice: TargetId, now: Instant) {
        self.dispatch(Action::SubmitChoice(choice), now);
    }

    pub fn submit_speech_result(&mut self, transcript: &str, now: Instant) {
        self.dispatch(Action::SubmitSpeech(transcript.to_string()), now);
    }

    pub fn replay_cue(&mut self, now: Instant) {
        self.dispatch(Action::ReplayCue, now);
    }

    /// No-op when the backend cannot listen at all.
    pub fn start_listening(&mut self, now: Instant) {
        if !self.speech.is_available() {
            log::debug!("start listening ignored: recogniser unavailable");
            return;
        }
        self.dispatch(Action::StartListening, now);
    }

    pub fn stop_listening(&mut self, now: Instant) {
        self.dispatch(Action::StopListening, now);
    }

    pub fn cancel_listening(&mut self, now: Instant) {
        self.dispatch(Action::CancelListening, now);
    }

    pub fn toggle_hint(&mut self, now: Instant) {
        self.dispatch(Action::ToggleHint, now);
    }

    pub fn dismiss_win(&mut self, now: Instant) {
        self.dispatch(Action::DismissWin, now);
    }

    /// Play a target's audio from the explore grid. Does not touch the session.
    pub fn preview(&mut self, id: TargetId) {
        if let Some(target) = self.session.catalog().get(id) {
            self.audio.play_target(target);
        }
    }

    /// Drop the running session, its pending delay, and any open listening
    /// window. Nothing scheduled before this call can mutate state after it.
    pub fn teardown(&mut self, now: Instant) {
        self.dispatch(Action::Explore, now);
        self.timer.cancel();
    }

    pub fn tick(&mut self, now: Instant) {
        while let Some(event) = self.speech.poll_event() {
            self.dispatch(Action::Heard(event), now);
        }
        if let Some(token) = self.timer.poll(now) {
            self.dispatch(Action::DelayElapsed(token), now);
        }
    }

    fn dispatch(&mut self, action: Action, now: Instant) {
        let effects = self.session.apply(action, &mut self.rng);
        for effect in effects {
            self.run(effect, now);
        }
    }

    fn run(&mut self, effect: Effect, now: Instant) {
        match effect {
            Effect::PlayCue(id) => {
                if let Some(target) = self.session.catalog().get(id) {
                    self.audio.play_target(target);
                }
            }
            Effect::PlaySound(name) => self.audio.play_common(name),
            Effect::Celebrate(celebration) => self.notifier.notify(celebration),
            Effect::ScheduleDelay { token, delay } => self.timer.schedule(now, delay, token),
            Effect::CancelDelay => self.timer.cancel(),
            Effect::StartRecognizer => {
                // Leftovers from an aborted window must not reach the new one.
                while self.speech.poll_event().is_some() {}
                if let Err(e) = self.speech.start() {
                    log::warn!("failed to start listening: {e}");
                    self.dispatch(Action::Heard(SpeechEvent::Error(e)), now);
                }
            }
            Effect::StopRecognizer => self.speech.stop(),
            Effect::AbortRecognizer => self.speech.abort(),
        }
    }
}

impl<R: Rng> Drop for SessionController<R> {
    fn drop(&mut self) {
        if self.speech.is_listening() {
            self.speech.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::catalog::{Catalog, Target};
    use crate::engine::aliases::AliasTable;
    use crate::session::state::{Feedback, FeedbackDelays, Mode, Phase};
    use crate::speech::{ScriptedRecognizer, SpeechError};

    #[derive(Clone, Default)]
    struct RecordingPlayback {
        played: Rc<RefCell<Vec<String>>>,
    }

    impl AudioPlayback for RecordingPlayback {
        fn play_target(&mut self, target: &Target) {
            self.played.borrow_mut().push(target.id.to_string());
        }

        fn play_common(&mut self, name: &str) {
            self.played.borrow_mut().push(name.to_string());
        }
    }

    struct Harness {
        controller: SessionController<SmallRng>,
        played: Rc<RefCell<Vec<String>>>,
        celebrations: mpsc::Receiver<Celebration>,
        speech: ScriptedRecognizer,
        now: Instant,
    }

    fn harness(section: Section, speech: ScriptedRecognizer) -> Harness {
        let playback = RecordingPlayback::default();
        let played = playback.played.clone();
        let (notifier, celebrations) = channel();
        let session = Session::new(
            Catalog::load(section).unwrap(),
            AliasTable::bundled().unwrap(),
            FeedbackDelays::default(),
        );
        let controller = SessionController::new(
            session,
            Box::new(playback),
            Box::new(speech.clone()),
            Box::new(notifier),
            SmallRng::seed_from_u64(42),
        );
        Harness {
            controller,
            played,
            celebrations,
            speech,
            now: Instant::now(),
        }
    }

    #[test]
    fn quiz_turn_plays_cue_and_advances_after_delay() {
        let mut h = harness(Section::Alphabet, ScriptedRecognizer::new());
        h.controller.start_quiz(h.now);
        let first = h.controller.session().current().unwrap();
        assert_eq!(*h.played.borrow(), vec![first.to_string()]);

        h.controller.submit_choice(first, h.now);
        assert_eq!(h.celebrations.try_recv(), Ok(Celebration::Correct));

        h.controller.tick(h.now + Duration::from_millis(1999));
        assert_eq!(h.controller.session().current(), Some(first));

        h.controller.tick(h.now + Duration::from_millis(2000));
        let next = h.controller.session().current().unwrap();
        assert_ne!(next, first);
        assert_eq!(h.played.borrow().last(), Some(&next.to_string()));
        assert_eq!(h.controller.session().progress(), (1, 26));
    }

    #[test]
    fn teardown_before_delay_leaves_state_untouched() {
        let mut h = harness(Section::Numbers, ScriptedRecognizer::new());
        h.controller.start_quiz(h.now);
        let first = h.controller.session().current().unwrap();
        h.controller.submit_choice(first, h.now);

        h.controller.teardown(h.now);
        let after_teardown = h.controller.session().clone();
        h.controller.tick(h.now + Duration::from_secs(10));
        assert_eq!(*h.controller.session(), after_teardown);
        assert_eq!(h.controller.session().mode(), Mode::Explore);
    }

    #[test]
    fn spoken_answer_flows_through_recognizer() {
        let speech = ScriptedRecognizer::new();
        let mut h = harness(Section::Alphabet, speech);
        h.controller.start_speech_challenge(h.now);
        // Speech turns never play the cue.
        assert!(h.played.borrow().is_empty());

        let word = h.controller.session().current_target().unwrap().word.clone();
        h.speech.push_utterance(&word);
        h.controller.start_listening(h.now);
        assert_eq!(h.speech.start_calls(), 1);

        h.controller.tick(h.now);
        assert_eq!(h.controller.session().feedback(), Some(Feedback::Correct));
        assert!(!h.controller.session().is_listening());
        assert_eq!(h.celebrations.try_recv(), Ok(Celebration::Correct));

        h.controller.tick(h.now + Duration::from_millis(1500));
        assert_eq!(h.controller.session().phase(), Phase::AwaitingAnswer);
        assert_eq!(h.controller.session().progress(), (1, 26));
    }

    #[test]
    fn no_speech_is_not_an_answer() {
        let mut h = harness(Section::Alphabet, ScriptedRecognizer::new());
        h.controller.start_speech_challenge(h.now);
        h.speech.push_session(vec![
            SpeechEvent::Started,
            SpeechEvent::Error(SpeechError::NoSpeech),
        ]);
        h.controller.start_listening(h.now);
        h.controller.tick(h.now);

        let session = h.controller.session();
        assert_eq!(session.feedback(), None);
        assert_eq!(session.transcript(), "(no sound heard)");
        assert!(!session.is_listening());
    }

    #[test]
    fn unavailable_recognizer_makes_listening_a_no_op() {
        let mut h = harness(Section::Alphabet, ScriptedRecognizer::unavailable());
        h.controller.start_speech_challenge(h.now);
        h.controller.start_listening(h.now);
        assert_eq!(h.speech.start_calls(), 0);
        assert!(!h.controller.session().is_listening());
        assert_eq!(h.controller.session().mode(), Mode::Speech);
    }

    #[test]
    fn cancel_aborts_and_discards_late_events() {
        let mut h = harness(Section::Alphabet, ScriptedRecognizer::new());
        h.controller.start_speech_challenge(h.now);
        let word = h.controller.session().current_target().unwrap().word.clone();
        h.speech.push_utterance(&word);
        h.controller.start_listening(h.now);
        h.controller.cancel_listening(h.now);
        assert_eq!(h.speech.abort_calls(), 1);

        h.controller.tick(h.now);
        assert_eq!(h.controller.session().feedback(), None);
        assert_eq!(h.controller.session().score(), 0);
    }

    #[test]
    fn teardown_while_listening_aborts_recognizer() {
        let mut h = harness(Section::Alphabet, ScriptedRecognizer::new());
        h.controller.start_speech_challenge(h.now);
        h.speech.push_session(vec![SpeechEvent::Started]);
        h.controller.start_listening(h.now);

        h.controller.teardown(h.now);
        assert_eq!(h.speech.abort_calls(), 1);
        let after = h.controller.session().clone();
        h.controller.tick(h.now + Duration::from_secs(5));
        assert_eq!(*h.controller.session(), after);
    }

    #[test]
    fn win_notifies_and_plays_win_sound() {
        let mut h = harness(Section::Numbers, ScriptedRecognizer::new());
        h.controller.start_quiz(h.now);
        let mut now = h.now;
        while h.controller.session().mode() == Mode::Quiz {
            let target = h.controller.session().current().unwrap();
            h.controller.submit_choice(target, now);
            now += Duration::from_millis(2000);
            h.controller.tick(now);
        }

        let celebrations: Vec<Celebration> = h.celebrations.try_iter().collect();
        assert_eq!(
            celebrations.last(),
            Some(&Celebration::Win {
                message: "Yay! You got all numbers right!"
            })
        );
        assert_eq!(h.played.borrow().last().map(String::as_str), Some("win_listen"));
        assert_eq!(h.controller.session().phase(), Phase::Won);
    }

    #[test]
    fn preview_plays_without_starting_a_session() {
        let mut h = harness(Section::Alphabet, ScriptedRecognizer::new());
        h.controller.preview(TargetId::Letter('Q'));
        assert_eq!(*h.played.borrow(), vec!["Q".to_string()]);
        assert_eq!(h.controller.session().phase(), Phase::Idle);
    }

    #[test]
    fn dropping_controller_aborts_open_window() {
        let speech = ScriptedRecognizer::new();
        let h = harness(Section::Alphabet, speech.clone());
        let mut controller = h.controller;
        controller.start_speech_challenge(h.now);
        speech.push_session(vec![SpeechEvent::Started]);
        controller.start_listening(h.now);
        drop(controller);
        assert_eq!(speech.abort_calls(), 1);
    }
}
