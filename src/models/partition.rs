use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::Utterance;

/// Corpus split labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionLabel {
    Train,
    Dev,
    Test,
}

impl PartitionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartitionLabel::Train => "train",
            PartitionLabel::Dev => "dev",
            PartitionLabel::Test => "test",
        }
    }
}

impl fmt::Display for PartitionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A corpus split definition: a label plus its contiguous source id range
#[derive(Debug, Clone)]
pub struct PartitionSpec {
    pub label: PartitionLabel,
    pub ids: Range<u32>,
}

/// The fixed train/dev/test split over source ids 1..61.
pub fn default_partitions() -> [PartitionSpec; 3] {
    [
        PartitionSpec {
            label: PartitionLabel::Train,
            ids: 1..47,
        },
        PartitionSpec {
            label: PartitionLabel::Dev,
            ids: 47..54,
        },
        PartitionSpec {
            label: PartitionLabel::Test,
            ids: 54..61,
        },
    ]
}

/// Transcript base name for a source id, e.g. `SBC001`
pub fn source_name(id: u32) -> String {
    format!("SBC{:03}", id)
}

/// Audio file name for a source id, e.g. `01.mp3`
pub fn audio_name(id: u32) -> String {
    format!("{:02}.mp3", id)
}

/// Accumulates one split's utterances across all source ids in its range
#[derive(Debug, Default)]
pub struct Partition {
    pub utterances: Vec<Utterance>,
    pub total_secs: f64,
}

impl Partition {
    /// Merge one source's resolved utterances and duration into the split
    pub fn absorb(&mut self, utterances: Vec<Utterance>, secs: f64) {
        self.utterances.extend(utterances);
        self.total_secs += secs;
    }

    /// Total accumulated duration in hours
    pub fn total_hours(&self) -> f64 {
        self.total_secs / 3600.0
    }

    /// Order utterances by descending duration, the manifest row order
    pub fn sort_for_manifest(&mut self) {
        self.utterances
            .sort_by(|a, b| b.duration().total_cmp(&a.duration()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partitions_are_contiguous_and_disjoint() {
        let partitions = default_partitions();
        let mut next = 1;
        for spec in &partitions {
            assert_eq!(spec.ids.start, next);
            assert!(spec.ids.end > spec.ids.start);
            next = spec.ids.end;
        }
        assert_eq!(next, 61);
    }

    #[test]
    fn test_source_and_audio_naming() {
        assert_eq!(source_name(1), "SBC001");
        assert_eq!(source_name(60), "SBC060");
        assert_eq!(audio_name(1), "01.mp3");
        assert_eq!(audio_name(47), "47.mp3");
    }

    #[test]
    fn test_sort_for_manifest_orders_by_duration_descending() {
        let mut partition = Partition::default();
        partition.absorb(
            vec![
                Utterance::new("SBC001", 0.0, 1.0, "SHORT".to_string()),
                Utterance::new("SBC001", 2.0, 5.0, "LONG".to_string()),
                Utterance::new("SBC001", 6.0, 8.0, "MIDDLE".to_string()),
            ],
            6.0,
        );
        partition.sort_for_manifest();
        let sentences: Vec<&str> = partition
            .utterances
            .iter()
            .map(|u| u.sentence.as_str())
            .collect();
        assert_eq!(sentences, vec!["LONG", "MIDDLE", "SHORT"]);
        assert!((partition.total_hours() - 6.0 / 3600.0).abs() < 1e-12);
    }
}
