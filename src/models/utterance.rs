use serde::{Deserialize, Serialize};

/// Shortest utterance kept in the corpus, in seconds
pub const MIN_SEC: f64 = 0.1;
/// Longest utterance kept in the corpus, in seconds
pub const MAX_SEC: f64 = 15.0;

/// A single cleaned speaker turn, uniquely addressable by its derived clip name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Utterance {
    /// Start time in seconds from the beginning of the source recording
    pub t_begin: f64,
    /// End time in seconds from the beginning of the source recording
    pub t_end: f64,
    /// Normalized sentence text (A-Z, apostrophe, space only)
    pub sentence: String,
    /// Clip file name derived from source id and times
    pub clip_name: String,
    /// Id of the source recording this utterance was cut from
    pub source_id: String,
}

impl Utterance {
    /// Create an utterance, deriving its clip name from the source id and times
    pub fn new(source_id: &str, t_begin: f64, t_end: f64, sentence: String) -> Self {
        Self {
            t_begin,
            t_end,
            sentence,
            clip_name: clip_name(source_id, t_begin, t_end),
            source_id: source_id.to_string(),
        }
    }

    /// Duration of this utterance in seconds
    pub fn duration(&self) -> f64 {
        self.t_end - self.t_begin
    }
}

/// Derive a clip file name: `{source_id}_{begin:06}-{end:06}.wav` with both
/// times truncated to whole centiseconds.
pub fn clip_name(source_id: &str, t_begin: f64, t_end: f64) -> String {
    format!(
        "{}_{:06}-{:06}.wav",
        source_id,
        centiseconds(t_begin),
        centiseconds(t_end)
    )
}

fn centiseconds(t: f64) -> u64 {
    (t * 100.0) as u64
}
