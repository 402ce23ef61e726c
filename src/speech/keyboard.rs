use std::collections::VecDeque;
use std::sync::mpsc;

use crate::speech::{SpeechError, SpeechEvent, SpeechRecognizer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MicInput {
    Char(char),
    Backspace,
}

/// Cloneable handle the key handler "speaks" into.
///
/// Input sent while the recogniser is not listening is dropped.
#[derive(Clone)]
pub struct KeyboardMic {
    tx: mpsc::Sender<MicInput>,
}

impl KeyboardMic {
    pub fn type_char(&self, ch: char) {
        // Receiver gone means the session is over; nothing to report.
        let _ = self.tx.send(MicInput::Char(ch));
    }

    pub fn backspace(&self) {
        let _ = self.tx.send(MicInput::Backspace);
    }
}

/// Terminal stand-in for a microphone: what the learner types while the
/// listening window is open is what was "heard".
pub struct KeyboardRecognizer {
    rx: mpsc::Receiver<MicInput>,
    tx: mpsc::Sender<MicInput>,
    listening: bool,
    heard: String,
    events: VecDeque<SpeechEvent>,
}

impl KeyboardRecognizer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            rx,
            tx,
            listening: false,
            heard: String::new(),
            events: VecDeque::new(),
        }
    }

    pub fn mic(&self) -> KeyboardMic {
        KeyboardMic {
            tx: self.tx.clone(),
        }
    }

    fn pump(&mut self) {
        while let Ok(input) = self.rx.try_recv() {
            if !self.listening {
                continue;
            }
            match input {
                MicInput::Char(ch) => self.heard.push(ch),
                MicInput::Backspace => {
                    if self.heard.pop().is_none() {
                        continue;
                    }
                }
            }
            self.events.push_back(SpeechEvent::Interim(self.heard.clone()));
        }
    }
}

impl Default for KeyboardRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechRecognizer for KeyboardRecognizer {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self) -> Result<(), SpeechError> {
        if self.listening {
            return Ok(());
        }
        // Anything typed before the window opened was never "said".
        while self.rx.try_recv().is_ok() {}
        self.heard.clear();
        self.listening = true;
        self.events.push_back(SpeechEvent::Started);
        Ok(())
    }

    fn stop(&mut self) {
        if !self.listening {
            return;
        }
        self.pump();
        self.listening = false;

        if self.heard.trim().is_empty() {
            self.events
                .push_back(SpeechEvent::Error(SpeechError::NoSpeech));
        } else {
            self.events.push_back(SpeechEvent::Final(self.heard.clone()));
        }
        self.events.push_back(SpeechEvent::Ended);
    }

    fn abort(&mut self) {
        if !self.listening {
            return;
        }
        while self.rx.try_recv().is_ok() {}
        self.listening = false;
        self.heard.clear();
        self.events
            .push_back(SpeechEvent::Error(SpeechError::Aborted));
        self.events.push_back(SpeechEvent::Ended);
    }

    fn is_listening(&self) -> bool {
        self.listening
    }

    fn poll_event(&mut self) -> Option<SpeechEvent> {
        self.pump();
        self.events.pop_front()
    }
}
