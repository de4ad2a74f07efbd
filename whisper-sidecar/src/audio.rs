use std::path::Path;
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};

/// Sample rate whisper.cpp expects.
const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Longest audio accepted, in seconds (8 hours, ~1.8 GB of f32 samples).
const MAX_AUDIO_DURATION_SECS: f64 = 8.0 * 3600.0;

/// Decode an audio file into 16kHz mono f32 samples.
///
/// Decoding, downmixing and resampling are delegated to ffmpeg, so any
/// container/codec ffmpeg understands is accepted.
pub fn load_audio(path: &Path) -> Result<Vec<f32>> {
    info!(path = %path.display(), "loading audio");

    if !path.exists() {
        return Err(Error::AudioNotFound {
            path: path.to_path_buf(),
        });
    }

    let pcm = decode_with_ffmpeg(path)?;
    let samples = pcm_s16le_to_f32(&pcm);

    let duration = samples.len() as f64 / WHISPER_SAMPLE_RATE as f64;
    debug!(
        samples = samples.len(),
        duration_secs = format!("{duration:.1}"),
        "decoded audio"
    );

    if duration > MAX_AUDIO_DURATION_SECS {
        return Err(Error::AudioDecode(format!(
            "audio too long ({duration:.0}s) — maximum supported duration is {MAX_AUDIO_DURATION_SECS:.0}s"
        )));
    }

    Ok(samples)
}

/// Run ffmpeg and return raw signed 16-bit little-endian mono PCM.
fn decode_with_ffmpeg(path: &Path) -> Result<Vec<u8>> {
    let output = Command::new("ffmpeg")
        .args(["-nostdin", "-threads", "0", "-i"])
        .arg(path)
        .args([
            "-f",
            "s16le",
            "-ac",
            "1",
            "-acodec",
            "pcm_s16le",
            "-ar",
            &WHISPER_SAMPLE_RATE.to_string(),
            "-",
        ])
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::AudioDecode("ffmpeg not found — install with: apt install ffmpeg".into())
            } else {
                Error::AudioDecode(format!("failed to run ffmpeg: {e}"))
            }
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::AudioDecode(format!("ffmpeg failed: {stderr}")));
    }

    if output.stdout.is_empty() {
        return Err(Error::AudioDecode("ffmpeg produced no output".into()));
    }

    Ok(output.stdout)
}

/// Convert s16le bytes to f32 in [-1.0, 1.0). A trailing odd byte is dropped.
fn pcm_s16le_to_f32(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]) as f32 / 32768.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_audio(&PathBuf::from("/nonexistent/dir/audio.wav"));
        assert!(matches!(result.unwrap_err(), Error::AudioNotFound { .. }));
    }

    #[test]
    fn test_load_rejects_non_audio_file() {
        // Fails whether or not ffmpeg is installed.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_audio.wav");
        std::fs::write(&path, "this is not audio").unwrap();

        let result = load_audio(&path);
        assert!(matches!(result.unwrap_err(), Error::AudioDecode(_)));
    }

    #[test]
    fn test_pcm_conversion_range() {
        let bytes = [
            0x00, 0x00, // 0
            0xff, 0x7f, // i16::MAX
            0x00, 0x80, // i16::MIN
            0x00, 0x40, // 16384
        ];
        let samples = pcm_s16le_to_f32(&bytes);
        assert_eq!(samples.len(), 4);
        assert_eq!(samples[0], 0.0);
        assert!((samples[1] - 32767.0 / 32768.0).abs() < 1e-6);
        assert_eq!(samples[2], -1.0);
        assert_eq!(samples[3], 0.5);
    }

    #[test]
    fn test_pcm_conversion_drops_odd_byte() {
        assert_eq!(pcm_s16le_to_f32(&[0x00, 0x40, 0x12]).len(), 1);
        assert!(pcm_s16le_to_f32(&[]).is_empty());
    }
}
