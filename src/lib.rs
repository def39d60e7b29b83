pub mod audio;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use audio::{decode_file, downmix_to_mono, resample, write_wav, AudioError, DecodedAudio};
pub use io::{
    classify_line, parse_transcript_file, parse_transcript_lines, write_manifest, LineShape,
    ParsedTranscript, PartitionSummary, RunSummary,
};
pub use models::{
    audio_name, clip_name, default_partitions, source_name, Partition, PartitionLabel,
    PartitionSpec, Utterance, MAX_SEC, MIN_SEC,
};
pub use pipeline::{build_corpus, CorpusConfig};
pub use stages::{
    normalize_sentence, resolve_overlaps, slice_clips, ResolveResult, SliceResult,
    TARGET_SAMPLE_RATE,
};
