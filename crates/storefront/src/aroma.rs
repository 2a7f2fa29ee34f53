//! Scent suggestions mined from product descriptions.
//!
//! Suggestions only pre-populate the variant picker; the shopper may type any
//! label. The heuristic is deliberately loose: a token survives if it is at
//! least three characters long, is not a stop word, and is either a known
//! scent word or occurs in the description. The second condition holds for
//! almost every token, so in practice every non-stop-word of three or more
//! characters is suggested.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Suggestions offered when a description yields none.
pub const FALLBACK_AROMAS: [&str; 3] = ["Lavanda", "Vainilla", "Limón"];

const MIN_TOKEN_CHARS: usize = 3;

/// Token separators: runs of whitespace, commas and periods.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,.]+").expect("Invalid regex"));

/// Articles, prepositions and other short function words.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "el", "la", "los", "las", "un", "una", "unos", "unas", "y", "o", "de", "del", "al", "con",
        "por", "para", "en", "su", "sus", "este", "esta", "estos", "estas", "que", "más", "mas",
        "muy", "es", "son", "tiene", "tienen",
    ]
    .into_iter()
    .collect()
});

/// Known scent and scent-descriptor words.
static SCENT_VOCABULARY: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // floral
        "lavanda", "jazmin", "rosa", "flores", "floral", "gardenia", "violeta",
        // fruity
        "vainilla", "limón", "limon", "coco", "manzana", "frutal", "naranja", "citrico",
        "citrus", "frutilla", "durazno", "tropical", "frutos", "fruta", "frutas", "berry",
        // spiced
        "canela", "especias", "cardamomo", "clavo", "jengibre",
        // fresh
        "fresco", "marino", "oceano", "brisa", "menta", "eucalipto", "pino",
        // sweet
        "dulce", "caramelo", "chocolate", "miel",
        // natural
        "natural", "hierba", "hierbas", "madera", "bosque", "campo",
        // descriptors
        "suave", "intenso", "aromático", "silvestre",
    ]
    .into_iter()
    .collect()
});

/// Whether `word` is in the scent vocabulary.
#[must_use]
pub fn is_scent_word(word: &str) -> bool {
    SCENT_VOCABULARY.contains(word)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Candidate scent labels found in `description`, in order of first
/// appearance, capitalized. May be empty.
#[must_use]
pub fn extract_aromas(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    let mut seen = HashSet::new();

    SEPARATOR_RE
        .split(&lower)
        .filter(|word| word.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|word| !STOP_WORDS.contains(word))
        .filter(|word| is_scent_word(word) || lower.contains(*word))
        .filter(|word| seen.insert(*word))
        .map(capitalize)
        .collect()
}

/// Suggestions for the variant picker: the extracted labels, or
/// [`FALLBACK_AROMAS`] when there are none.
#[must_use]
pub fn suggest_aromas(description: &str) -> Vec<String> {
    let extracted = extract_aromas(description);
    if extracted.is_empty() {
        FALLBACK_AROMAS.iter().map(ToString::to_string).collect()
    } else {
        extracted
    }
}

/// Suggestions containing `typed`, case-insensitively. Empty input keeps
/// every suggestion.
#[must_use]
pub fn filter_suggestions(suggestions: &[String], typed: &str) -> Vec<String> {
    let needle = typed.to_lowercase();
    suggestions
        .iter()
        .filter(|s| s.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
