use std::collections::HashSet;
use std::fmt;

use rust_embed::Embed;
use serde::Deserialize;
use thiserror::Error;

#[derive(Embed)]
#[folder = "assets/catalog/"]
struct CatalogAssets;

/// Smallest catalog that still leaves three distractors for every question.
pub const MIN_TARGETS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Alphabet,
    Numbers,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Alphabet => "alphabet",
            Section::Numbers => "numbers",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Alphabet => "Alphabet",
            Section::Numbers => "Numbers",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Section::Alphabet => Section::Numbers,
            Section::Numbers => Section::Alphabet,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "alphabet" | "letters" | "abc" => Some(Section::Alphabet),
            "numbers" | "math" | "123" => Some(Section::Numbers),
            _ => None,
        }
    }

    fn file_name(self) -> &'static str {
        match self {
            Section::Alphabet => "letters.toml",
            Section::Numbers => "numbers.toml",
        }
    }
}

/// How letters are drawn on screen. Identity is always case-insensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LetterCase {
    #[default]
    Upper,
    Lower,
}

impl LetterCase {
    pub fn as_str(self) -> &'static str {
        match self {
            LetterCase::Upper => "upper",
            LetterCase::Lower => "lower",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "upper" | "uppercase" => Some(LetterCase::Upper),
            "lower" | "lowercase" => Some(LetterCase::Lower),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            LetterCase::Upper => LetterCase::Lower,
            LetterCase::Lower => LetterCase::Upper,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetId {
    /// Always stored upper-case.
    Letter(char),
    Number(u32),
}

impl TargetId {
    pub fn letter(ch: char) -> Self {
        TargetId::Letter(ch.to_ascii_uppercase())
    }

    /// The bare name a learner would say: "b" for B, "3" for 3.
    pub fn spoken_name(&self) -> String {
        match self {
            TargetId::Letter(ch) => ch.to_ascii_lowercase().to_string(),
            TargetId::Number(value) => value.to_string(),
        }
    }

    pub fn display(&self, case: LetterCase) -> String {
        match (self, case) {
            (TargetId::Letter(ch), LetterCase::Lower) => ch.to_ascii_lowercase().to_string(),
            (TargetId::Letter(ch), LetterCase::Upper) => ch.to_string(),
            (TargetId::Number(value), _) => value.to_string(),
        }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetId::Letter(ch) => write!(f, "{ch}"),
            TargetId::Number(value) => write!(f, "{value}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub id: TargetId,
    pub word: String,
    pub sentence: Option<String>,
    pub color: String,
    /// Asset key relative to the asset directory.
    pub image: String,
    /// Asset key relative to the asset directory.
    pub audio: String,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file {0} is not bundled")]
    Missing(String),
    #[error("catalog file {0} is not valid UTF-8")]
    Encoding(String),
    #[error("catalog for {section} is not valid TOML: {source}")]
    Parse {
        section: &'static str,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid letter {0:?}: expected a single ASCII letter")]
    InvalidLetter(String),
    #[error("{section} entry for {word:?} has no identifier")]
    MissingId { section: &'static str, word: String },
    #[error("duplicate target {0}")]
    Duplicate(TargetId),
    #[error("catalog has {found} targets, need at least {min}", min = MIN_TARGETS)]
    TooSmall { found: usize },
}

#[derive(Deserialize)]
struct CatalogFile {
    targets: Vec<RawTarget>,
}

#[derive(Deserialize)]
struct RawTarget {
    #[serde(rename = "char")]
    letter: Option<String>,
    value: Option<u32>,
    word: String,
    sentence: Option<String>,
    color: String,
}

/// Read-only table of everything one section teaches, in display order.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    section: Section,
    targets: Vec<Target>,
}

impl Catalog {
    /// Load the bundled table for a section.
    pub fn load(section: Section) -> Result<Self, CatalogError> {
        let name = section.file_name();
        let file = CatalogAssets::get(name).ok_or_else(|| CatalogError::Missing(name.to_string()))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .map_err(|_| CatalogError::Encoding(name.to_string()))?;
        Self::from_toml(section, content)
    }

    pub fn from_toml(section: Section, content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content).map_err(|source| CatalogError::Parse {
            section: section.as_str(),
            source,
        })?;

        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(file.targets.len());
        for raw in file.targets {
            let target = build_target(section, raw)?;
            if !seen.insert(target.id) {
                return Err(CatalogError::Duplicate(target.id));
            }
            targets.push(target);
        }

        if targets.len() < MIN_TARGETS {
            return Err(CatalogError::TooSmall {
                found: targets.len(),
            });
        }

        Ok(Self { section, targets })
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn ids(&self) -> Vec<TargetId> {
        self.targets.iter().map(|t| t.id).collect()
    }

    pub fn get(&self, id: TargetId) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

fn build_target(section: Section, raw: RawTarget) -> Result<Target, CatalogError> {
    let id = match section {
        Section::Alphabet => {
            let letter = raw.letter.ok_or_else(|| CatalogError::MissingId {
                section: section.as_str(),
                word: raw.word.clone(),
            })?;
            let mut chars = letter.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) if ch.is_ascii_alphabetic() => TargetId::letter(ch),
                _ => return Err(CatalogError::InvalidLetter(letter)),
            }
        }
        Section::Numbers => {
            let value = raw.value.ok_or_else(|| CatalogError::MissingId {
                section: section.as_str(),
                word: raw.word.clone(),
            })?;
            TargetId::Number(value)
        }
    };

    let (image, audio) = match id {
        TargetId::Letter(ch) => (format!("images/{ch}.png"), format!("audio/{ch}.pcm")),
        TargetId::Number(value) => (
            format!("numbers/images/{value}.png"),
            format!("numbers/audio/{value}.pcm"),
        ),
    };

    // Sentences only make sense for numbers; letters never carry one.
    let sentence = match section {
        Section::Alphabet => None,
        Section::Numbers => raw.sentence,
    };

    Ok(Target {
        id,
        word: raw.word,
        sentence,
        color: raw.color,
        image,
        audio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_has_all_26_letters_in_order() {
        let catalog = Catalog::load(Section::Alphabet).unwrap();
        assert_eq!(catalog.len(), 26);
        let expected: Vec<TargetId> = ('A'..='Z').map(TargetId::Letter).collect();
        assert_eq!(catalog.ids(), expected);
        assert!(catalog.targets().iter().all(|t| t.sentence.is_none()));
    }

    #[test]
    fn numbers_have_words_and_sentences() {
        let catalog = Catalog::load(Section::Numbers).unwrap();
        assert_eq!(catalog.len(), 20);
        let three = catalog.get(TargetId::Number(3)).unwrap();
        assert_eq!(three.word, "three");
        assert!(three.sentence.as_deref().unwrap_or("").contains("Three"));
        assert_eq!(three.image, "numbers/images/3.png");
        assert_eq!(three.audio, "numbers/audio/3.pcm");
    }

    #[test]
    fn letter_asset_keys_use_upper_case() {
        let catalog = Catalog::load(Section::Alphabet).unwrap();
        let b = catalog.get(TargetId::letter('b')).unwrap();
        assert_eq!(b.image, "images/B.png");
        assert_eq!(b.audio, "audio/B.pcm");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let toml_str = r##"
[[targets]]
char = "A"
word = "Apple"
color = "#fff"

[[targets]]
char = "a"
word = "Ant"
color = "#fff"
"##;
        let err = Catalog::from_toml(Section::Alphabet, toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::Duplicate(TargetId::Letter('A'))));
    }

    #[test]
    fn multi_character_letters_are_rejected() {
        let toml_str = r##"
[[targets]]
char = "AB"
word = "Apple"
color = "#fff"
"##;
        let err = Catalog::from_toml(Section::Alphabet, toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidLetter(_)));
    }

    #[test]
    fn too_small_catalog_is_rejected() {
        let toml_str = r##"
[[targets]]
value = 1
word = "one"
color = "#fff"

[[targets]]
value = 2
word = "two"
color = "#fff"
"##;
        let err = Catalog::from_toml(Section::Numbers, toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::TooSmall { found: 2 }));
    }

    #[test]
    fn number_entry_without_value_is_rejected() {
        let toml_str = r##"
[[targets]]
word = "one"
color = "#fff"
"##;
        let err = Catalog::from_toml(Section::Numbers, toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::MissingId { .. }));
    }

    #[test]
    fn display_respects_letter_case() {
        assert_eq!(TargetId::letter('q').display(LetterCase::Upper), "Q");
        assert_eq!(TargetId::letter('Q').display(LetterCase::Lower), "q");
        assert_eq!(TargetId::Number(12).display(LetterCase::Lower), "12");
        assert_eq!(TargetId::letter('Q').spoken_name(), "q");
    }

    #[test]
    fn section_names_parse() {
        assert_eq!(Section::from_name("Alphabet"), Some(Section::Alphabet));
        assert_eq!(Section::from_name("numbers"), Some(Section::Numbers));
        assert_eq!(Section::from_name("shapes"), None);
    }
}
