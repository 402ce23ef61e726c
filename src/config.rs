use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::catalog::LetterCase;
use crate::session::state::FeedbackDelays;
use crate::speech::SpeechBackend;

pub const MIN_FEEDBACK_MS: u64 = 500;
pub const MAX_FEEDBACK_MS: u64 = 5000;

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_letter_case")]
    pub letter_case: String,
    #[serde(default = "default_quiz_feedback_ms")]
    pub quiz_feedback_ms: u64,
    #[serde(default = "default_speech_feedback_ms")]
    pub speech_feedback_ms: u64,
    #[serde(default = "default_speech_backend")]
    pub speech_backend: String,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    #[serde(default = "default_asset_dir")]
    pub asset_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_file: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "crayon".to_string()
}
fn default_letter_case() -> String {
    LetterCase::Upper.as_str().to_string()
}
fn default_quiz_feedback_ms() -> u64 {
    2000
}
fn default_speech_feedback_ms() -> u64 {
    1500
}
fn default_speech_backend() -> String {
    SpeechBackend::Keyboard.as_str().to_string()
}
fn default_sound_enabled() -> bool {
    true
}
fn default_asset_dir() -> String {
    data_dir().join("assets").to_string_lossy().to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            letter_case: default_letter_case(),
            quiz_feedback_ms: default_quiz_feedback_ms(),
            speech_feedback_ms: default_speech_feedback_ms(),
            speech_backend: default_speech_backend(),
            sound_enabled: default_sound_enabled(),
            asset_dir: default_asset_dir(),
            alias_file: None,
            log_level: default_log_level(),
        }
    }
}

/// `<data_dir>/letterpop`, home of the log file and default assets.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("letterpop")
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Config::default()
        };
        config.validate();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("letterpop")
    }

    /// Clamp delays and reset unrecognised names to their defaults.
    /// Call after deserialization; hand-edited files may hold anything.
    pub fn validate(&mut self) {
        self.quiz_feedback_ms = self.quiz_feedback_ms.clamp(MIN_FEEDBACK_MS, MAX_FEEDBACK_MS);
        self.speech_feedback_ms = self
            .speech_feedback_ms
            .clamp(MIN_FEEDBACK_MS, MAX_FEEDBACK_MS);

        match LetterCase::from_name(&self.letter_case) {
            Some(case) => self.letter_case = case.as_str().to_string(),
            None => self.letter_case = default_letter_case(),
        }
        match SpeechBackend::from_name(&self.speech_backend) {
            Some(backend) => self.speech_backend = backend.as_str().to_string(),
            None => self.speech_backend = default_speech_backend(),
        }

        let level = self.log_level.trim().to_ascii_lowercase();
        self.log_level = if LOG_LEVELS.contains(&level.as_str()) {
            level
        } else {
            default_log_level()
        };

        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
        if self.asset_dir.trim().is_empty() {
            self.asset_dir = default_asset_dir();
        }
        if self.alias_file.as_deref().is_some_and(|f| f.trim().is_empty()) {
            self.alias_file = None;
        }
    }

    pub fn letter_case(&self) -> LetterCase {
        LetterCase::from_name(&self.letter_case).unwrap_or_default()
    }

    pub fn set_letter_case(&mut self, case: LetterCase) {
        self.letter_case = case.as_str().to_string();
    }

    pub fn speech_backend(&self) -> SpeechBackend {
        SpeechBackend::from_name(&self.speech_backend).unwrap_or(SpeechBackend::Keyboard)
    }

    pub fn feedback_delays(&self) -> FeedbackDelays {
        FeedbackDelays {
            quiz: Duration::from_millis(self.quiz_feedback_ms),
            speech: Duration::from_millis(self.speech_feedback_ms),
        }
    }

    pub fn alias_path(&self) -> Option<PathBuf> {
        self.alias_file.as_ref().map(PathBuf::from)
    }

    pub fn asset_path(&self) -> PathBuf {
        PathBuf::from(&self.asset_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "crayon");
        assert_eq!(config.letter_case, "upper");
        assert_eq!(config.quiz_feedback_ms, 2000);
        assert_eq!(config.speech_feedback_ms, 1500);
        assert_eq!(config.speech_backend, "keyboard");
        assert!(config.sound_enabled);
        assert_eq!(config.alias_file, None);
        assert_eq!(config.log_level, "info");
        assert!(config.asset_dir.contains("letterpop"));
    }

    #[test]
    fn test_config_serde_partial_file() {
        let toml_str = r#"
theme = "chalkboard"
letter_case = "lower"
sound_enabled = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "chalkboard");
        assert_eq!(config.letter_case(), LetterCase::Lower);
        assert!(!config.sound_enabled);
        assert_eq!(config.quiz_feedback_ms, 2000);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut config = Config::default();
        config.alias_file = Some("/tmp/aliases.toml".to_string());
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_unset_alias_file_is_not_written() {
        let serialized = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(!serialized.contains("alias_file"));
    }

    #[test]
    fn test_save_and_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.theme = "chalkboard".to_string();
        config.set_letter_case(LetterCase::Lower);
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_load_from_validates() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "quiz_feedback_ms = 1\nspeech_backend = \"parrot\"\n").unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.quiz_feedback_ms, MIN_FEEDBACK_MS);
        assert_eq!(loaded.speech_backend(), SpeechBackend::Keyboard);
    }

    #[test]
    fn test_validate_clamps_delays() {
        let mut config = Config::default();
        config.quiz_feedback_ms = 10;
        config.speech_feedback_ms = 60_000;
        config.validate();
        assert_eq!(config.quiz_feedback_ms, MIN_FEEDBACK_MS);
        assert_eq!(config.speech_feedback_ms, MAX_FEEDBACK_MS);
        assert_eq!(
            config.feedback_delays(),
            FeedbackDelays {
                quiz: Duration::from_millis(500),
                speech: Duration::from_millis(5000),
            }
        );
    }

    #[test]
    fn test_validate_resets_unknown_names() {
        let mut config = Config::default();
        config.letter_case = "sideways".to_string();
        config.speech_backend = "whisper".to_string();
        config.log_level = "loud".to_string();
        config.alias_file = Some("  ".to_string());
        config.validate();
        assert_eq!(config.letter_case, "upper");
        assert_eq!(config.speech_backend, "keyboard");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.alias_file, None);
    }

    #[test]
    fn test_validate_canonicalises_names() {
        let mut config = Config::default();
        config.letter_case = "LOWER".to_string();
        config.speech_backend = "off".to_string();
        config.log_level = "Debug".to_string();
        config.validate();
        assert_eq!(config.letter_case, "lower");
        assert_eq!(config.speech_backend(), SpeechBackend::None);
        assert_eq!(config.speech_backend, "none");
        assert_eq!(config.log_level, "debug");
    }
}
