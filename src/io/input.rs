use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::{Utterance, MAX_SEC, MIN_SEC};
use crate::stages::normalize_sentence;

/// Shape of one tab-split transcript line.
///
/// The corpus mixes three layouts; classification is kept separate from
/// extraction so each format rule stays independently testable.
#[derive(Debug, Clone, PartialEq)]
pub enum LineShape<'a> {
    /// `<t1> <t2> [speaker]\t<sentence>`
    TwoField { times: &'a str, sentence: &'a str },
    /// `<t1> <t2>\t<speaker>\t<sentence>`
    ThreeField { times: &'a str, sentence: &'a str },
    /// `<t1>\t<t2>\t<speaker>\t<sentence>`, or both times joined in field 0
    FourField {
        time_begin: &'a str,
        time_end: &'a str,
        sentence: &'a str,
    },
    /// Anything else; the line is skipped
    Unrecognized,
}

/// Classify a tab-split line into one of the known layouts.
pub fn classify_line<'a>(fields: &[&'a str]) -> LineShape<'a> {
    match fields {
        &[times, sentence] if times.split_whitespace().count() >= 2 => LineShape::TwoField {
            times,
            sentence,
        },
        &[times, _speaker, sentence] if times.split_whitespace().count() == 2 => {
            LineShape::ThreeField { times, sentence }
        }
        &[time_begin, time_end, _speaker, sentence] => LineShape::FourField {
            time_begin,
            time_end,
            sentence,
        },
        _ => LineShape::Unrecognized,
    }
}

/// Interval and raw sentence extracted from one classified line
#[derive(Debug, PartialEq)]
struct RawLine<'a> {
    t_begin: f64,
    t_end: f64,
    sentence: &'a str,
}

/// Extract the interval and sentence for a classified line. `None` means the
/// numeric tokens were malformed and the line is dropped.
fn extract(shape: LineShape<'_>) -> Option<RawLine<'_>> {
    match shape {
        LineShape::TwoField { times, sentence } | LineShape::ThreeField { times, sentence } => {
            let (t_begin, t_end) = parse_time_pair(times)?;
            Some(RawLine {
                t_begin,
                t_end,
                sentence,
            })
        }
        LineShape::FourField {
            time_begin,
            time_end,
            sentence,
        } => {
            let (t_begin, t_end) = match (time_begin.parse::<f64>(), time_end.parse::<f64>()) {
                (Ok(b), Ok(e)) => (b, e),
                // Some four-field lines carry both times joined in field 0.
                _ => parse_time_pair(time_begin)?,
            };
            Some(RawLine {
                t_begin,
                t_end,
                sentence,
            })
        }
        LineShape::Unrecognized => None,
    }
}

/// Parse the first two space-separated tokens of a field as seconds.
fn parse_time_pair(field: &str) -> Option<(f64, f64)> {
    let mut tokens = field.split_whitespace();
    let begin = tokens.next()?.parse().ok()?;
    let end = tokens.next()?.parse().ok()?;
    Some((begin, end))
}

/// Parsed transcript for one source
#[derive(Debug)]
pub struct ParsedTranscript {
    /// Kept utterances, ascending by end time
    pub utterances: Vec<Utterance>,
    /// Sum of kept durations before overlap resolution, in seconds
    pub raw_secs: f64,
    /// Lines dropped by shape, numeric, duration, or normalization checks
    pub lines_skipped: usize,
}

/// Parse a transcript file for a source id. Invalid UTF-8 bytes are replaced
/// rather than treated as errors.
pub fn parse_transcript_file(path: &Path, source_id: &str) -> Result<ParsedTranscript> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read transcript {}", path.display()))?;
    Ok(parse_transcript_lines(
        &String::from_utf8_lossy(&bytes),
        source_id,
    ))
}

/// Parse raw transcript text into filtered utterances sorted by end time.
pub fn parse_transcript_lines(text: &str, source_id: &str) -> ParsedTranscript {
    let mut utterances = Vec::new();
    let mut lines_skipped = 0usize;

    for line in text.lines() {
        let line = line.trim_matches('\t');
        let fields: Vec<&str> = line.split('\t').collect();

        let Some(raw) = extract(classify_line(&fields)) else {
            lines_skipped += 1;
            continue;
        };

        let duration = raw.t_end - raw.t_begin;
        if !(MIN_SEC..=MAX_SEC).contains(&duration) {
            lines_skipped += 1;
            continue;
        }

        let sentence = normalize_sentence(raw.sentence);
        if sentence.len() <= 1 {
            lines_skipped += 1;
            continue;
        }

        utterances.push(Utterance::new(source_id, raw.t_begin, raw.t_end, sentence));
    }

    utterances.sort_by(|a, b| a.t_end.total_cmp(&b.t_end));
    let raw_secs = utterances.iter().map(Utterance::duration).sum();

    debug!(
        "parsed {}: kept {} utterances ({:.2}s raw), skipped {} lines",
        source_id,
        utterances.len(),
        raw_secs,
        lines_skipped
    );

    ParsedTranscript {
        utterances,
        raw_secs,
        lines_skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_two_field() {
        let fields = vec!["1.0 2.0 SPK1", "hello there"];
        assert_eq!(
            classify_line(&fields),
            LineShape::TwoField {
                times: "1.0 2.0 SPK1",
                sentence: "hello there"
            }
        );
    }

    #[test]
    fn test_classify_three_field() {
        let fields = vec!["1.0 2.0", "SPK2", "yes"];
        assert_eq!(
            classify_line(&fields),
            LineShape::ThreeField {
                times: "1.0 2.0",
                sentence: "yes"
            }
        );
    }

    #[test]
    fn test_classify_four_field() {
        let fields = vec!["1.0", "2.0", "SPK1", "fine"];
        assert_eq!(
            classify_line(&fields),
            LineShape::FourField {
                time_begin: "1.0",
                time_end: "2.0",
                sentence: "fine"
            }
        );
    }

    #[test]
    fn test_classify_unrecognized() {
        assert_eq!(classify_line(&["lonely"]), LineShape::Unrecognized);
        assert_eq!(
            classify_line(&["a", "b", "c", "d", "e"]),
            LineShape::Unrecognized
        );
        // Two fields but no space-separated time pair.
        assert_eq!(classify_line(&["12.5", "hello"]), LineShape::Unrecognized);
        // Three fields with extra tokens in field 0.
        assert_eq!(
            classify_line(&["1.0 2.0 3.0", "SPK", "hi"]),
            LineShape::Unrecognized
        );
    }

    #[test]
    fn test_four_field_falls_back_to_joined_times() {
        let shape = classify_line(&["1.0 2.0", "", "SPK", "hello"]);
        let raw = extract(shape).unwrap();
        assert_eq!(raw.t_begin, 1.0);
        assert_eq!(raw.t_end, 2.0);
        assert_eq!(raw.sentence, "hello");
    }

    #[test]
    fn test_malformed_times_drop_line() {
        assert!(extract(classify_line(&["abc def", "hello"])).is_none());
        assert!(extract(classify_line(&["x", "y", "SPK", "hello"])).is_none());
    }

    #[test]
    fn test_parse_three_field_line() {
        let parsed = parse_transcript_lines("1.0 2.0\tSPK2\tYES\n", "SBC001");
        assert_eq!(parsed.utterances.len(), 1);
        let u = &parsed.utterances[0];
        assert_eq!(u.t_begin, 1.0);
        assert_eq!(u.t_end, 2.0);
        assert_eq!(u.sentence, "YES");
        assert_eq!(u.clip_name, "SBC001_000100-000200.wav");
    }

    #[test]
    fn test_parse_strips_parenthetical_and_names_clip() {
        let parsed = parse_transcript_lines(
            "12.340000 15.670000\tSPK1\tHE SAID (quietly) OK\n",
            "SBC001",
        );
        assert_eq!(parsed.utterances.len(), 1);
        let u = &parsed.utterances[0];
        assert_eq!(u.sentence, "HE SAID OK");
        assert_eq!(u.clip_name, "SBC001_001234-001567.wav");
        assert!((u.duration() - 3.33).abs() < 1e-9);
    }

    #[test]
    fn test_duration_filter() {
        let text = "0.0 0.05\tSPK\ttoo short\n\
                    0.0 0.1\tSPK\tjust long enough\n\
                    0.0 15.0\tSPK\tjust short enough\n\
                    0.0 16.0\tSPK\ttoo long\n";
        let parsed = parse_transcript_lines(text, "SBC001");
        assert_eq!(parsed.utterances.len(), 2);
        assert_eq!(parsed.lines_skipped, 2);
    }

    #[test]
    fn test_rejected_sentence_drops_utterance() {
        let text = "0.0 2.0\tSPK\tyeah [overlap] sure\n\
                    3.0 4.0\tSPK\tXX UNKNOWN WORD\n\
                    5.0 6.0\tSPK\tkept\n";
        let parsed = parse_transcript_lines(text, "SBC001");
        assert_eq!(parsed.utterances.len(), 1);
        assert_eq!(parsed.utterances[0].sentence, "KEPT");
        assert_eq!(parsed.lines_skipped, 2);
    }

    #[test]
    fn test_single_char_sentence_dropped() {
        let parsed = parse_transcript_lines("0.0 2.0\tSPK\tI\n", "SBC001");
        assert!(parsed.utterances.is_empty());
    }

    #[test]
    fn test_output_sorted_by_end_time() {
        let text = "5.0 7.0\tSPK\tlater\n\
                    0.0 2.0\tSPK\tearlier\n";
        let parsed = parse_transcript_lines(text, "SBC001");
        assert_eq!(parsed.utterances[0].sentence, "EARLIER");
        assert_eq!(parsed.utterances[1].sentence, "LATER");
        assert!((parsed.raw_secs - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_field_line_with_speaker_suffix() {
        let parsed = parse_transcript_lines("1.0 2.5 SPK1\thello there\n", "SBC001");
        assert_eq!(parsed.utterances.len(), 1);
        assert_eq!(parsed.utterances[0].sentence, "HELLO THERE");
    }

    #[test]
    fn test_surrounding_tabs_stripped() {
        let parsed = parse_transcript_lines("\t1.0 2.0\tSPK\tfine\t\n", "SBC001");
        assert_eq!(parsed.utterances.len(), 1);
        assert_eq!(parsed.utterances[0].sentence, "FINE");
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SBC001.trn");
        let mut bytes = b"1.0 2.0\tSPK\tokay then\n".to_vec();
        bytes.extend_from_slice(b"3.0 4.0\tSPK\tbad \xff\xfe bytes\n");
        std::fs::write(&path, bytes).unwrap();

        let parsed = parse_transcript_file(&path, "SBC001").unwrap();
        // The replacement character fails the vocabulary check; the clean
        // line survives.
        assert_eq!(parsed.utterances.len(), 1);
        assert_eq!(parsed.utterances[0].sentence, "OKAY THEN");
    }
}
