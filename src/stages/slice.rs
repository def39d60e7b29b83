use std::path::Path;

use tracing::{debug, warn};

use crate::audio::{downmix_to_mono, resample, write_wav, AudioError, DecodedAudio};
use crate::models::Utterance;

/// Sample rate every clip is written at
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Result of slicing one source recording
#[derive(Debug)]
pub struct SliceResult {
    /// Number of clip files written
    pub clips_written: usize,
}

/// Cut one WAV clip per utterance out of a decoded recording.
///
/// The waveform is downmixed to mono and resampled to `target_rate` once;
/// slicing then happens against the resampled signal in target-rate sample
/// units. Each clip keeps one trailing sample beyond its end index. Ranges
/// reaching past the waveform are clamped, not errors.
pub fn slice_clips(
    decoded: &DecodedAudio,
    utterances: &[Utterance],
    out_dir: &Path,
    target_rate: u32,
) -> Result<SliceResult, AudioError> {
    let mono = downmix_to_mono(&decoded.channels);
    let wave = if decoded.sample_rate != target_rate {
        resample(&mono, decoded.sample_rate, target_rate)?
    } else {
        mono
    };

    let mut clips_written = 0;
    for u in utterances {
        let begin = (u.t_begin * target_rate as f64) as usize;
        let end = (u.t_end * target_rate as f64) as usize + 1;

        if begin >= wave.len() {
            warn!(
                "clip {} starts at sample {} past waveform end {}, skipping",
                u.clip_name,
                begin,
                wave.len()
            );
            continue;
        }
        let end = if end > wave.len() {
            warn!(
                "clip {} ends at sample {} past waveform end {}, clamping",
                u.clip_name,
                end,
                wave.len()
            );
            wave.len()
        } else {
            end
        };

        write_wav(&out_dir.join(&u.clip_name), &wave[begin..end], target_rate)?;
        clips_written += 1;
    }

    debug!("wrote {} clips to {}", clips_written, out_dir.display());
    Ok(SliceResult { clips_written })
}
