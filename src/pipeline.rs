use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::audio::{decode_file, AudioError};
use crate::io::{parse_transcript_file, write_manifest, PartitionSummary, RunSummary};
use crate::models::{audio_name, default_partitions, source_name, Partition, PartitionSpec, Utterance};
use crate::stages::{resolve_overlaps, slice_clips};

/// Where to read transcripts and audio from, and which outputs to emit.
///
/// `audio_dir` + `clip_dir` together enable clip slicing; `manifest_dir`
/// enables manifest and summary emission. Omitting any of them skips that
/// stage.
#[derive(Debug, Clone)]
pub struct CorpusConfig {
    pub transcript_dir: PathBuf,
    pub audio_dir: Option<PathBuf>,
    pub clip_dir: Option<PathBuf>,
    pub manifest_dir: Option<PathBuf>,
    pub target_sample_rate: u32,
}

impl CorpusConfig {
    fn slice_audio(&self) -> bool {
        self.audio_dir.is_some() && self.clip_dir.is_some()
    }
}

/// Outcome of one per-id task: parse + resolve, plus the optional audio stage
#[derive(Debug)]
struct SourceOutcome {
    id: u32,
    source_id: String,
    utterances: Vec<Utterance>,
    total_secs: f64,
    clips_written: usize,
    audio_error: Option<String>,
}

/// Build the full corpus across the fixed train/dev/test split.
pub async fn build_corpus(config: &CorpusConfig) -> Result<RunSummary> {
    if let Some(dir) = &config.clip_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create clip dir {}", dir.display()))?;
    }
    if let Some(dir) = &config.manifest_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create manifest dir {}", dir.display()))?;
    }

    let mut partitions = Vec::new();
    for spec in default_partitions() {
        partitions.push(build_partition(config, &spec).await?);
    }

    let summary = RunSummary { partitions };
    if let Some(dir) = &config.manifest_dir {
        summary.write_json(&dir.join("summary.json"))?;
    }
    Ok(summary)
}

/// Process every source id of one split and emit its manifest.
async fn build_partition(config: &CorpusConfig, spec: &PartitionSpec) -> Result<PartitionSummary> {
    info!("processing {} partition", spec.label);

    // Fan out one blocking task per source id; results are merged only after
    // every task completes, in ascending id order, so no task touches the
    // shared accumulator.
    let mut tasks = JoinSet::new();
    for id in spec.ids.clone() {
        let config = config.clone();
        tasks.spawn_blocking(move || process_source(&config, id));
    }
    let mut outcomes = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        outcomes.push(joined.context("source task panicked")??);
    }
    outcomes.sort_by_key(|o| o.id);

    let mut partition = Partition::default();
    let mut clips_written = 0;
    let mut failed_audio_ids = Vec::new();
    for outcome in outcomes {
        info!(
            "{}: {} utterances, {:.2} hours",
            outcome.source_id,
            outcome.utterances.len(),
            outcome.total_secs / 3600.0
        );
        if let Some(reason) = outcome.audio_error {
            warn!("audio stage failed for {}: {}", outcome.source_id, reason);
            failed_audio_ids.push(outcome.source_id.clone());
        }
        clips_written += outcome.clips_written;
        partition.absorb(outcome.utterances, outcome.total_secs);
    }

    partition.sort_for_manifest();
    info!(
        "== {} utterances, {:.2} hours in split {} ==",
        partition.utterances.len(),
        partition.total_hours(),
        spec.label
    );

    if let Some(dir) = &config.manifest_dir {
        let path = dir.join(format!("{}.tsv", spec.label));
        write_manifest(&path, &partition.utterances)
            .with_context(|| format!("failed to write {} manifest", spec.label))?;
    }

    Ok(PartitionSummary {
        label: spec.label.to_string(),
        utterance_count: partition.utterances.len(),
        total_secs: partition.total_secs,
        total_hours: partition.total_hours(),
        clips_written,
        failed_audio_ids,
    })
}

/// Parse, resolve, and optionally slice one source recording.
fn process_source(config: &CorpusConfig, id: u32) -> Result<SourceOutcome> {
    let source_id = source_name(id);
    let transcript_path = config.transcript_dir.join(format!("{source_id}.trn"));
    let parsed = parse_transcript_file(&transcript_path, &source_id)?;
    let resolved = resolve_overlaps(parsed.utterances);

    let mut clips_written = 0;
    let mut audio_error = None;
    if config.slice_audio() {
        if let (Some(audio_dir), Some(clip_dir)) = (&config.audio_dir, &config.clip_dir) {
            match slice_source(
                audio_dir,
                clip_dir,
                &resolved.utterances,
                id,
                config.target_sample_rate,
            ) {
                Ok(n) => clips_written = n,
                // One bad recording must not abort the whole partition.
                Err(err) => audio_error = Some(format!("{:#}", anyhow::Error::new(err))),
            }
        }
    }

    Ok(SourceOutcome {
        id,
        source_id,
        utterances: resolved.utterances,
        total_secs: resolved.total_secs,
        clips_written,
        audio_error,
    })
}

fn slice_source(
    audio_dir: &Path,
    clip_dir: &Path,
    utterances: &[Utterance],
    id: u32,
    target_rate: u32,
) -> Result<usize, AudioError> {
    let decoded = decode_file(&audio_dir.join(audio_name(id)))?;
    let result = slice_clips(&decoded, utterances, clip_dir, target_rate)?;
    Ok(result.clips_written)
}
