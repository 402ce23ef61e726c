use icu_normalizer::ComposingNormalizerBorrowed;

/// Characters removed from a recogniser transcript before matching.
/// Hyphens and apostrophes survive: aliases such as "bee-bee" contain them.
const STRIPPED_PUNCTUATION: &[char] = &['.', '?', '!', ',', ';', ':', '"'];

/// Turn raw recogniser output into the form the matcher compares against:
/// NFKC, lower-case, sentence punctuation removed, single spaces, trimmed.
pub fn normalize_transcript(raw: &str) -> String {
    let nfkc = ComposingNormalizerBorrowed::new_nfkc();
    let composed = nfkc.normalize(raw);

    let cleaned: String = composed
        .to_lowercase()
        .chars()
        .filter(|ch| !STRIPPED_PUNCTUATION.contains(ch))
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
