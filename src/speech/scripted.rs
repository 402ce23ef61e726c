use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::speech::{SpeechError, SpeechEvent, SpeechRecognizer};

#[derive(Debug, Default)]
struct ScriptState {
    available: bool,
    listening: bool,
    scripts: VecDeque<Vec<SpeechEvent>>,
    events: VecDeque<SpeechEvent>,
    start_calls: usize,
    stop_calls: usize,
    abort_calls: usize,
}

/// Recogniser that replays prepared listening sessions, one per `start`.
///
/// Clones share state, so a test can keep one handle while the controller
/// owns another.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRecognizer {
    state: Rc<RefCell<ScriptState>>,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        let recognizer = Self::default();
        recognizer.state.borrow_mut().available = true;
        recognizer
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Queue the events the next listening session will produce.
    /// A trailing `Ended` is added when missing.
    pub fn push_session(&self, mut events: Vec<SpeechEvent>) {
        if events.last() != Some(&SpeechEvent::Ended) {
            events.push(SpeechEvent::Ended);
        }
        self.state.borrow_mut().scripts.push_back(events);
    }

    /// Say `transcript` and stop: the common happy path.
    pub fn push_utterance(&self, transcript: &str) {
        self.push_session(vec![
            SpeechEvent::Started,
            SpeechEvent::Interim(transcript.to_string()),
            SpeechEvent::Final(transcript.to_string()),
        ]);
    }

    pub fn start_calls(&self) -> usize {
        self.state.borrow().start_calls
    }

    pub fn stop_calls(&self) -> usize {
        self.state.borrow().stop_calls
    }

    pub fn abort_calls(&self) -> usize {
        self.state.borrow().abort_calls
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn is_available(&self) -> bool {
        self.state.borrow().available
    }

    fn start(&mut self) -> Result<(), SpeechError> {
        let mut state = self.state.borrow_mut();
        state.start_calls += 1;
        if !state.available {
            return Err(SpeechError::Unavailable);
        }
        if state.listening {
            return Ok(());
        }
        state.listening = true;
        let script = state.scripts.pop_front().unwrap_or_default();
        state.events.extend(script);
        Ok(())
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.stop_calls += 1;
        if state.listening && !state.events.contains(&SpeechEvent::Ended) {
            state.events.push_back(SpeechEvent::Ended);
        }
    }

    fn abort(&mut self) {
        let mut state = self.state.borrow_mut();
        state.abort_calls += 1;
        if state.listening {
            state.listening = false;
            state.events.clear();
            state.events.push_back(SpeechEvent::Error(SpeechError::Aborted));
            state.events.push_back(SpeechEvent::Ended);
        }
    }

    fn is_listening(&self) -> bool {
        self.state.borrow().listening
    }

    fn poll_event(&mut self) -> Option<SpeechEvent> {
        let mut state = self.state.borrow_mut();
        let event = state.events.pop_front()?;
        if event == SpeechEvent::Ended {
            state.listening = false;
        }
        Some(event)
    }
}
