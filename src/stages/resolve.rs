use crate::models::Utterance;

/// Result of overlap resolution for one source
#[derive(Debug)]
pub struct ResolveResult {
    /// Non-overlapping utterances, ascending by end time
    pub utterances: Vec<Utterance>,
    /// Sum of kept durations in seconds
    pub total_secs: f64,
}

/// Remove time-overlapping utterances from a sequence sorted by ascending
/// end time.
///
/// Maintains an output stack: each incoming utterance pops every stack top
/// whose end time lies past the incoming start, then is pushed itself. An
/// utterance that overlaps a later-ending one is dropped in full, never
/// trimmed to its non-overlapping remainder — a deliberate simplification
/// that loses speech from overlapping turns in exchange for clean segment
/// boundaries.
pub fn resolve_overlaps(utterances: Vec<Utterance>) -> ResolveResult {
    let mut kept: Vec<Utterance> = Vec::with_capacity(utterances.len());
    for u in utterances {
        while kept.last().is_some_and(|top| top.t_end > u.t_begin) {
            kept.pop();
        }
        kept.push(u);
    }

    let total_secs = kept.iter().map(Utterance::duration).sum();
    ResolveResult {
        utterances: kept,
        total_secs,
    }
}
