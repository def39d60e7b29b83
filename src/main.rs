use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use corpusmill::{
    build_corpus, parse_transcript_file, resolve_overlaps, CorpusConfig, TARGET_SAMPLE_RATE,
};

#[derive(Parser)]
#[command(name = "corpusmill")]
#[command(author, version, about = "Speech corpus builder for time-coded conversation transcripts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build clips and manifests across the train/dev/test split
    Build {
        /// Directory containing the .trn transcript files
        #[arg(long)]
        transcripts: PathBuf,

        /// Directory containing the source recordings
        #[arg(long)]
        audio: Option<PathBuf>,

        /// Directory to write per-utterance wav clips into (requires --audio)
        #[arg(long)]
        clips: Option<PathBuf>,

        /// Directory to write per-partition tsv manifests into
        #[arg(long)]
        manifests: Option<PathBuf>,

        /// Clip sample rate in Hz
        #[arg(long, default_value_t = TARGET_SAMPLE_RATE)]
        sample_rate: u32,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse one transcript and report filtering statistics without writing
    Inspect {
        /// Transcript file to analyze
        #[arg(short, long)]
        transcript: PathBuf,

        /// Source id used for clip naming (defaults to the file stem)
        #[arg(long)]
        source_id: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            transcripts,
            audio,
            clips,
            manifests,
            sample_rate,
            verbose,
        } => {
            setup_logging(verbose);
            let config = CorpusConfig {
                transcript_dir: transcripts,
                audio_dir: audio,
                clip_dir: clips,
                manifest_dir: manifests,
                target_sample_rate: sample_rate,
            };
            let summary = build_corpus(&config).await?;
            for partition in &summary.partitions {
                info!(
                    "{}: {} utterances, {:.2} hours, {} clips written",
                    partition.label,
                    partition.utterance_count,
                    partition.total_hours,
                    partition.clips_written
                );
            }
            Ok(())
        }
        Commands::Inspect {
            transcript,
            source_id,
            verbose,
        } => {
            setup_logging(verbose);
            inspect_transcript(transcript, source_id)
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn inspect_transcript(path: PathBuf, source_id: Option<String>) -> Result<()> {
    let source_id = source_id.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "UNKNOWN".to_string())
    });

    let parsed = parse_transcript_file(&path, &source_id)?;
    let lines_skipped = parsed.lines_skipped;
    let raw_secs = parsed.raw_secs;
    let kept = parsed.utterances.len();
    let resolved = resolve_overlaps(parsed.utterances);

    println!("Transcript Analysis");
    println!("===================");
    println!("Source id: {}", source_id);
    println!("Lines skipped: {}", lines_skipped);
    println!("Utterances parsed: {} ({:.2}s)", kept, raw_secs);
    println!(
        "After overlap resolution: {} utterances, {:.2}s ({:.2} hours)",
        resolved.utterances.len(),
        resolved.total_secs,
        resolved.total_secs / 3600.0
    );

    if let Some(longest) = resolved
        .utterances
        .iter()
        .max_by(|a, b| a.duration().total_cmp(&b.duration()))
    {
        println!(
            "Longest utterance: {} ({:.2}s)",
            longest.clip_name,
            longest.duration()
        );
    }

    Ok(())
}
