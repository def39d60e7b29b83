use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use super::AudioError;

const CHUNK_FRAMES: usize = 4096;

/// Resample a mono signal with a band-limited sinc interpolator.
///
/// Output length is pinned to `round(input_len * to_rate / from_rate)` and
/// the resampler's startup delay is trimmed, so sample indices computed from
/// timestamps line up with the resampled signal.
pub fn resample(input: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioError> {
    if from_rate == to_rate || input.is_empty() {
        return Ok(input.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, CHUNK_FRAMES, 1)?;

    let delay = resampler.output_delay();
    let expected = (input.len() as f64 * ratio).round() as usize;

    let mut out: Vec<f32> = Vec::with_capacity(expected + delay);
    let mut pos = 0;
    while pos + CHUNK_FRAMES <= input.len() {
        let frames = resampler.process(&[&input[pos..pos + CHUNK_FRAMES]], None)?;
        out.extend_from_slice(&frames[0]);
        pos += CHUNK_FRAMES;
    }
    if pos < input.len() {
        let frames = resampler.process_partial(Some(&[&input[pos..]]), None)?;
        out.extend_from_slice(&frames[0]);
    }
    // Drain until the delay-adjusted output covers the whole input.
    while out.len() < expected + delay {
        let frames = resampler.process_partial::<&[f32]>(None, None)?;
        if frames[0].is_empty() {
            break;
        }
        out.extend_from_slice(&frames[0]);
    }

    out.drain(..delay.min(out.len()));
    out.truncate(expected);
    Ok(out)
}
