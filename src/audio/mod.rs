//! Audio decode/resample/encode primitives backing the slicing stage.

pub mod decode;
pub mod resample;
pub mod wav;

pub use decode::{decode_file, DecodedAudio};
pub use resample::resample;
pub use wav::write_wav;

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the audio layer. A typed enum so the orchestrator can report
/// which source recording failed and why, without aborting the partition.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to open audio file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported or corrupt audio stream")]
    Decode(#[from] symphonia::core::errors::Error),
    #[error("no decodable audio track found")]
    NoAudioTrack,
    #[error("decoder reported no sample rate")]
    MissingSampleRate,
    #[error("failed to construct resampler")]
    ResamplerConstruction(#[from] rubato::ResamplerConstructionError),
    #[error("resampling failed")]
    Resample(#[from] rubato::ResampleError),
    #[error("failed to write wav")]
    Wav(#[from] hound::Error),
}

/// Average all channels into one mono signal. Channels of unequal length are
/// truncated to the shortest.
pub fn downmix_to_mono(channels: &[Vec<f32>]) -> Vec<f32> {
    match channels {
        [] => Vec::new(),
        [mono] => mono.clone(),
        many => {
            let frames = many.iter().map(|c| c.len()).min().unwrap_or(0);
            let scale = 1.0 / many.len() as f32;
            (0..frames)
                .map(|i| many.iter().map(|c| c[i]).sum::<f32>() * scale)
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downmix_mono_passthrough() {
        let channels = vec![vec![0.1, 0.2, 0.3]];
        assert_eq!(downmix_to_mono(&channels), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_downmix_averages_stereo() {
        let channels = vec![vec![1.0, 0.0, -1.0], vec![0.0, 1.0, -1.0]];
        let mono = downmix_to_mono(&channels);
        assert_eq!(mono, vec![0.5, 0.5, -1.0]);
    }

    #[test]
    fn test_downmix_truncates_to_shortest_channel() {
        let channels = vec![vec![1.0, 1.0, 1.0], vec![1.0, 1.0]];
        assert_eq!(downmix_to_mono(&channels).len(), 2);
    }

    #[test]
    fn test_downmix_empty() {
        assert!(downmix_to_mono(&[]).is_empty());
    }
}
