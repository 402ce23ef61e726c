use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::Deserialize;
use thiserror::Error;

#[derive(Embed)]
#[folder = "assets/aliases/"]
struct AliasAssets;

const BUNDLED_TABLE: &str = "en.toml";

#[derive(Debug, Error)]
pub enum AliasError {
    #[error("alias table {0} is not bundled")]
    Missing(String),
    #[error("failed to read alias file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("alias table is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("alias key {0:?} is not a single letter")]
    InvalidKey(String),
}

#[derive(Deserialize)]
struct AliasFile {
    #[serde(default)]
    aliases: BTreeMap<String, Vec<String>>,
}

/// Spoken stand-ins a recogniser tends to return for each letter name.
///
/// Pure data: the matcher only reads it, and swapping the table never
/// touches matching logic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AliasTable {
    by_letter: HashMap<char, Vec<String>>,
}

impl AliasTable {
    /// The table shipped with the binary.
    pub fn bundled() -> Result<Self, AliasError> {
        let file = AliasAssets::get(BUNDLED_TABLE)
            .ok_or_else(|| AliasError::Missing(BUNDLED_TABLE.to_string()))?;
        let content = String::from_utf8_lossy(file.data.as_ref());
        Self::from_toml(&content)
    }

    /// Bundled table, with a user file layered on top when one is given.
    pub fn load(override_path: Option<&Path>) -> Result<Self, AliasError> {
        let mut table = Self::bundled()?;
        if let Some(path) = override_path {
            let content = fs::read_to_string(path).map_err(|source| AliasError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            table.merge(Self::from_toml(&content)?);
        }
        Ok(table)
    }

    pub fn from_toml(content: &str) -> Result<Self, AliasError> {
        let file: AliasFile = toml::from_str(content)?;
        let mut by_letter = HashMap::new();
        for (key, words) in file.aliases {
            let letter = parse_key(&key)?;
            let words = words
                .into_iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect();
            by_letter.insert(letter, words);
        }
        Ok(Self { by_letter })
    }

    /// Letters present in `other` replace this table's list; the rest stay.
    pub fn merge(&mut self, other: AliasTable) {
        for (letter, words) in other.by_letter {
            self.by_letter.insert(letter, words);
        }
    }

    /// Aliases for a letter, looked up case-insensitively.
    pub fn aliases_for(&self, letter: char) -> &[String] {
        self.by_letter
            .get(&letter.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, letter: char, word: &str) -> bool {
        self.aliases_for(letter).iter().any(|alias| alias == word)
    }

    pub fn letter_count(&self) -> usize {
        self.by_letter.len()
    }
}

fn parse_key(key: &str) -> Result<char, AliasError> {
    let mut chars = key.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_alphabetic() => Ok(ch.to_ascii_lowercase()),
        _ => Err(AliasError::InvalidKey(key.to_string())),
    }
}
