//! Decides whether a learner's answer names the current target.
//!
//! Speech matching is deliberately lenient: the audience is small children
//! and the recogniser is imperfect, so almost any utterance that contains the
//! target's word, its name, or a common mishearing of its name counts.
//! Everything here is a pure function of its arguments.

use crate::catalog::{Target, TargetId};
use crate::engine::aliases::AliasTable;

/// Which rule accepted a spoken answer. Rules are tried in this order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchRule {
    /// The transcript contains the target's whole word ("ball" for B).
    Word,
    /// A transcript word is the bare name ("b", "3").
    Name,
    /// A transcript word is a phonetic alias of the letter ("bee" for B).
    Alias,
    /// The letter followed by a space appears anywhere ("b for banana").
    Loose,
}

/// Multiple choice: exact identifier equality only.
pub fn choice_matches(choice: TargetId, target: &Target) -> bool {
    choice == target.id
}

/// First rule that accepts `transcript` for `target`, if any.
///
/// `transcript` must already be normalised (see
/// [`normalize_transcript`](crate::engine::transcript::normalize_transcript)).
pub fn speech_match_rule(transcript: &str, target: &Target, aliases: &AliasTable) -> Option<MatchRule> {
    if transcript.is_empty() {
        return None;
    }

    let word = target.word.to_lowercase();
    if !word.is_empty() && transcript.contains(&word) {
        return Some(MatchRule::Word);
    }

    let name = target.id.spoken_name();
    let mut tokens = transcript.split_whitespace();

    match target.id {
        TargetId::Number(_) => {
            // Numbers have no alias table and no loose prefix rule.
            if tokens.any(|t| t == name) {
                return Some(MatchRule::Name);
            }
            None
        }
        TargetId::Letter(letter) => {
            let mut alias_hit = false;
            for token in tokens {
                if token == name {
                    return Some(MatchRule::Name);
                }
                if !alias_hit && aliases.contains(letter, token) {
                    alias_hit = true;
                }
            }
            if alias_hit {
                return Some(MatchRule::Alias);
            }

            let with_space = format!("{name} ");
            if transcript == name
                || transcript.starts_with(&with_space)
                || transcript.contains(&with_space)
            {
                return Some(MatchRule::Loose);
            }
            None
        }
    }
}

pub fn speech_matches(transcript: &str, target: &Target, aliases: &AliasTable) -> bool {
    speech_match_rule(transcript, target, aliases).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Section};

    fn letters() -> Catalog {
        Catalog::load(Section::Alphabet).unwrap()
    }

    fn numbers() -> Catalog {
        Catalog::load(Section::Numbers).unwrap()
    }

    fn aliases() -> AliasTable {
        AliasTable::bundled().unwrap()
    }

    #[test]
    fn letter_b_scenarios() {
        let catalog = letters();
        let b = catalog.get(TargetId::letter('b')).unwrap();
        let table = aliases();

        assert_eq!(speech_match_rule("bee", b, &table), Some(MatchRule::Alias));
        assert!(speech_matches("b for banana", b, &table));
        assert!(!speech_matches("seven", b, &table));
    }

    #[test]
    fn number_three_scenarios() {
        let catalog = numbers();
        let three = catalog.get(TargetId::Number(3)).unwrap();
        let table = aliases();

        assert_eq!(speech_match_rule("three", three, &table), Some(MatchRule::Word));
        assert_eq!(speech_match_rule("3", three, &table), Some(MatchRule::Name));
        assert!(!speech_matches("thirty", three, &table));
    }

    #[test]
    fn word_rule_wins_over_later_rules() {
        let catalog = letters();
        let b = catalog.get(TargetId::letter('b')).unwrap();
        assert_eq!(
            speech_match_rule("b is for ball", b, &aliases()),
            Some(MatchRule::Word)
        );
    }

    #[test]
    fn word_rule_is_a_substring_match() {
        let catalog = letters();
        let c = catalog.get(TargetId::letter('c')).unwrap();
        assert_eq!(speech_match_rule("a cats tail", c, &aliases()), Some(MatchRule::Word));
    }

    #[test]
    fn bare_name_is_a_name_match() {
        let catalog = letters();
        let z = catalog.get(TargetId::letter('z')).unwrap();
        assert_eq!(speech_match_rule("z", z, &aliases()), Some(MatchRule::Name));
        assert_eq!(speech_match_rule("it is z", z, &aliases()), Some(MatchRule::Name));
    }

    #[test]
    fn loose_rule_accepts_letter_prefix_with_noise() {
        let catalog = letters();
        let d = catalog.get(TargetId::letter('d')).unwrap();
        let table = AliasTable::default();
        // A standalone "d" is caught by the name rule first.
        assert_eq!(speech_match_rule("d for drum", d, &table), Some(MatchRule::Name));
        // "kid dance" has no "d" token, but "d " still appears.
        assert_eq!(speech_match_rule("kid dance", d, &table), Some(MatchRule::Loose));
        assert_eq!(speech_match_rule("kid", d, &table), None);
    }

    #[test]
    fn aliases_are_letter_specific() {
        let catalog = letters();
        let table = aliases();
        let c = catalog.get(TargetId::letter('c')).unwrap();
        let p = catalog.get(TargetId::letter('p')).unwrap();
        assert!(speech_matches("sea", c, &table));
        assert!(!speech_matches("sea", p, &table));
    }

    #[test]
    fn swapping_the_alias_table_changes_verdicts() {
        let catalog = letters();
        let b = catalog.get(TargetId::letter('b')).unwrap();
        let custom = AliasTable::from_toml("[aliases]\nb = [\"bumble\"]").unwrap();
        assert!(speech_matches("bumble", b, &custom));
        assert!(!speech_matches("bee", b, &custom));
    }

    #[test]
    fn numbers_ignore_aliases_and_loose_prefix() {
        let catalog = numbers();
        let one = catalog.get(TargetId::Number(1)).unwrap();
        let table = aliases();
        assert!(!speech_matches("1st place", one, &table));
        assert!(!speech_matches("won", one, &table));
        assert!(speech_matches("number 1", one, &table));
    }

    #[test]
    fn empty_transcript_never_matches() {
        let catalog = letters();
        let a = catalog.get(TargetId::letter('a')).unwrap();
        assert!(!speech_matches("", a, &aliases()));
    }

    #[test]
    fn verdict_does_not_depend_on_call_order() {
        let catalog = letters();
        let table = aliases();
        let b = catalog.get(TargetId::letter('b')).unwrap();
        let m = catalog.get(TargetId::letter('m')).unwrap();

        let first = speech_matches("me", b, &table);
        let _ = speech_matches("me", m, &table);
        let _ = speech_matches("seven", b, &table);
        assert_eq!(speech_matches("me", b, &table), first);
    }

    #[test]
    fn choice_is_exact_identity() {
        let catalog = letters();
        let b = catalog.get(TargetId::letter('b')).unwrap();
        assert!(choice_matches(TargetId::Letter('B'), b));
        assert!(!choice_matches(TargetId::Letter('D'), b));
        assert!(!choice_matches(TargetId::Number(2), b));
    }
}
