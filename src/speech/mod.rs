//! Speech recognition collaborators.
//!
//! A recogniser is started and stopped by the session controller and reports
//! what it hears as a stream of [`SpeechEvent`]s, polled from the UI tick.
//! Backends are swappable: the terminal build listens to the keyboard, tests
//! replay a script, and a machine with no recogniser gets
//! [`UnavailableRecognizer`].

pub mod keyboard;
pub mod scripted;

use thiserror::Error;

pub use keyboard::{KeyboardMic, KeyboardRecognizer};
pub use scripted::ScriptedRecognizer;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SpeechEvent {
    Started,
    /// Best guess so far; may still change.
    Interim(String),
    /// The recogniser has settled on this transcript.
    Final(String),
    Error(SpeechError),
    /// The listening session is over. Always the last event of a session.
    Ended,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SpeechError {
    #[error("no speech detected")]
    NoSpeech,
    #[error("speech recognition is not available")]
    Unavailable,
    #[error("listening was cancelled")]
    Aborted,
    #[error("speech backend failed: {0}")]
    Backend(String),
}

pub trait SpeechRecognizer {
    fn is_available(&self) -> bool;

    /// Begin listening. Calling this while already listening keeps the
    /// current session going; it never opens a second one.
    fn start(&mut self) -> Result<(), SpeechError>;

    /// Stop listening and settle on whatever was heard.
    fn stop(&mut self);

    /// Stop listening and throw away whatever was heard.
    fn abort(&mut self);

    fn is_listening(&self) -> bool;

    /// Next pending event, if any. Never blocks.
    fn poll_event(&mut self) -> Option<SpeechEvent>;
}

/// Backend for machines with no recogniser. Speech mode still opens; the
/// microphone simply never hears anything.
#[derive(Debug, Default)]
pub struct UnavailableRecognizer;

impl SpeechRecognizer for UnavailableRecognizer {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&mut self) -> Result<(), SpeechError> {
        Err(SpeechError::Unavailable)
    }

    fn stop(&mut self) {}

    fn abort(&mut self) {}

    fn is_listening(&self) -> bool {
        false
    }

    fn poll_event(&mut self) -> Option<SpeechEvent> {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechBackend {
    Keyboard,
    None,
}

impl SpeechBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            SpeechBackend::Keyboard => "keyboard",
            SpeechBackend::None => "none",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "keyboard" => Some(SpeechBackend::Keyboard),
            "none" | "off" => Some(SpeechBackend::None),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_backend_refuses_to_start() {
        let mut recognizer = UnavailableRecognizer;
        assert!(!recognizer.is_available());
        assert_eq!(recognizer.start(), Err(SpeechError::Unavailable));
        assert!(!recognizer.is_listening());
        assert_eq!(recognizer.poll_event(), None);
    }

    #[test]
    fn backend_names_parse() {
        assert_eq!(SpeechBackend::from_name("Keyboard"), Some(SpeechBackend::Keyboard));
        assert_eq!(SpeechBackend::from_name("off"), Some(SpeechBackend::None));
        assert_eq!(SpeechBackend::from_name("whisper"), None);
    }
}
