//! Sentence cleaning against the closed corpus vocabulary.
//!
//! An empty return value means the sentence was rejected outright; callers
//! drop the utterance without reporting an error.

/// Characters that mark speaker overlap (`[ ]`) or uncertain transcription
/// (`< >`); a sentence containing any of them is rejected whole.
const REJECT_MARKERS: [char; 4] = ['[', ']', '<', '>'];

/// Punctuation replaced by a single space
const PUNCT_TO_SPACE: &str = ".,-%?!@+~_*#&\"";

/// Typographic right single quote, mapped to a plain apostrophe
const RIGHT_SINGLE_QUOTE: char = '\u{2019}';

/// Clean a raw transcript sentence into the closed vocabulary
/// (A-Z, apostrophe, space). Returns an empty string if the sentence is
/// rejected. Idempotent: normalizing an already-normalized sentence is a
/// no-op.
pub fn normalize_sentence(raw: &str) -> String {
    if raw.contains(REJECT_MARKERS) {
        return String::new();
    }

    // Parenthesized asides are transcriber annotations, not speech.
    let stripped = strip_parentheticals(raw);
    if stripped.contains(['(', ')']) {
        return String::new();
    }

    let mut cleaned = String::with_capacity(stripped.len());
    for ch in stripped.chars() {
        if ch == '=' {
            continue;
        }
        if PUNCT_TO_SPACE.contains(ch) {
            cleaned.push(' ');
        } else if ch == RIGHT_SINGLE_QUOTE {
            cleaned.push('\'');
        } else {
            cleaned.push(ch);
        }
    }

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let upper = collapsed.to_uppercase();

    // The trailing sentinel space makes ` X ` match a standalone final token.
    let padded = format!("{upper} ");
    if padded.contains("XX") || padded.contains(" X ") {
        return String::new();
    }

    if !padded
        .chars()
        .all(|c| c.is_ascii_uppercase() || c == '\'' || c == ' ')
    {
        return String::new();
    }

    upper
}

/// Remove every `(...)` span, shortest match, non-nested. A `(` with no
/// closing `)` is left in place for the caller's unmatched-paren check.
fn strip_parentheticals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find('(') {
        match rest[open..].find(')') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}
