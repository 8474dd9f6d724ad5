//! Sentence and word segmentation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Word;

/// Terminal punctuation followed by whitespace; the split happens after the
/// punctuation so it stays with the preceding sentence.
static SENTENCE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?;]\s+").unwrap());

/// A bare token optionally followed by a parenthesised gloss: `word(gloss)`.
static WORD_GLOSS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^()\s]+)(?:\s*\(([^)]+)\))?").unwrap());

/// Split prose into sentences at whitespace following `.`, `!`, `?` or `;`.
///
/// Sentences are trimmed and empty ones dropped.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in SENTENCE_BREAK.find_iter(text) {
        // Terminal marks are all single-byte ASCII.
        let end = m.start() + 1;
        sentences.push(&text[start..end]);
        start = m.end();
    }
    sentences.push(&text[start..]);
    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Tokenize one sentence into glossed words.
///
/// `Λόγος(word)` becomes word `Λόγος` with gloss `word`; tokens without a
/// parenthesised annotation get an empty gloss.
#[must_use]
pub fn glossed_words(sentence: &str) -> Vec<Word> {
    WORD_GLOSS
        .captures_iter(sentence)
        .map(|caps| Word {
            word: caps.get(1).map_or("", |m| m.as_str()).trim().to_string(),
            gloss: caps
                .get(2)
                .map_or("", |m| m.as_str())
                .trim()
                .to_string(),
        })
        .collect()
}

/// Whitespace tokens with empty glosses, for verse transcriptions.
#[must_use]
pub fn plain_words(text: &str) -> Vec<Word> {
    text.split_whitespace().map(Word::bare).collect()
}
