use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::Utterance;

/// Write a tab-separated manifest: header `path\tsentence`, then one row per
/// utterance in the caller-supplied order. Ordering and deduplication are the
/// caller's responsibility.
pub fn write_manifest(path: &Path, utterances: &[Utterance]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create manifest {}", path.display()))?;
    let mut file = std::io::BufWriter::new(file);

    writeln!(file, "path\tsentence")?;
    for u in utterances {
        writeln!(file, "{}\t{}", u.clip_name, u.sentence)?;
    }
    file.flush()?;

    Ok(())
}

/// Per-partition slice of the run summary
#[derive(Debug, Clone, Serialize)]
pub struct PartitionSummary {
    pub label: String,
    pub utterance_count: usize,
    pub total_secs: f64,
    pub total_hours: f64,
    pub clips_written: usize,
    /// Source ids whose audio stage failed; their transcript results are kept
    pub failed_audio_ids: Vec<String>,
}

/// Machine-readable summary of one corpus build
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub partitions: Vec<PartitionSummary>,
}

impl RunSummary {
    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create summary {}", path.display()))?;
        serde_json::to_writer_pretty(file, self).context("failed to write summary JSON")?;
        Ok(())
    }
}
