use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio;
use crate::config::{Language, TranscribeOptions};
use crate::engine::SpeechEngine;
use crate::error::{Error, Result};
use crate::model;
use crate::types::Token;

/// Local whisper.cpp engine.
///
/// Resolves (and if needed downloads) the ggml model, decodes the audio with
/// ffmpeg and runs inference on tokio's blocking pool. Output is one token per
/// word segment.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhisperEngine;

impl WhisperEngine {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SpeechEngine for WhisperEngine {
    async fn transcribe(&self, audio: &Path, options: &TranscribeOptions) -> Result<Vec<Token>> {
        let cache_dir = options.resolve_cache_dir();
        let model_path = model::ensure_model(&options.model, &cache_dir).await?;

        let audio_path = audio.to_path_buf();
        let options = options.clone();

        tokio::task::spawn_blocking(move || run_blocking(&audio_path, &model_path, &options))
            .await
            .map_err(|e| Error::Transcription(format!("transcription task failed: {e}")))?
    }
}

fn run_blocking(
    audio_path: &Path,
    model_path: &Path,
    options: &TranscribeOptions,
) -> Result<Vec<Token>> {
    let samples = audio::load_audio(audio_path)?;
    transcribe_samples(&samples, model_path, options)
}

/// Transcribe 16kHz mono f32 samples into word tokens.
fn transcribe_samples(
    samples: &[f32],
    model_path: &Path,
    options: &TranscribeOptions,
) -> Result<Vec<Token>> {
    info!(model = %model_path.display(), "loading whisper model");

    let mut ctx_params = WhisperContextParameters::new();
    ctx_params.use_gpu(options.gpu);
    ctx_params.gpu_device(i32::try_from(options.gpu_device).unwrap_or(i32::MAX));

    let ctx = WhisperContext::new_with_params(
        model_path
            .to_str()
            .ok_or_else(|| Error::Model("model path contains invalid UTF-8".into()))?,
        ctx_params,
    )?;

    let mut state = ctx.create_state()?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 5 });

    match &options.language {
        Language::Auto => params.set_detect_language(true),
        Language::Code { code, .. } => params.set_language(Some(code.as_str())),
    }

    // One word per segment.
    params.set_token_timestamps(true);
    params.set_max_len(1);
    params.set_split_on_word(true);

    if let Some(n) = options.n_threads {
        params.set_n_threads(i32::try_from(n).unwrap_or(i32::MAX));
    }

    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);
    params.set_print_special(false);

    info!(samples = samples.len(), "running transcription");
    state.full(params, samples)?;

    let num_segments = state.full_n_segments();
    debug!(num_segments, "inference finished");

    let mut tokens = Vec::with_capacity(num_segments.max(0) as usize);

    for i in 0..num_segments {
        let segment = state
            .get_segment(i)
            .ok_or_else(|| Error::Transcription(format!("segment {i} not found")))?;

        let text = segment
            .to_str_lossy()
            .map_err(|e| Error::Transcription(format!("segment text error: {e}")))?;

        if let Some(token) =
            segment_token(&text, segment.start_timestamp(), segment.end_timestamp())
        {
            tokens.push(token);
        }
    }

    Ok(tokens)
}

/// Build a token from one segment. Timestamps are in centiseconds.
///
/// Blank segments and whisper markers such as `[BLANK_AUDIO]` or `<|endoftext|>`
/// yield nothing.
fn segment_token(text: &str, t0: i64, t1: i64) -> Option<Token> {
    let speech = text.trim();
    if speech.is_empty() || speech.starts_with('[') || speech.starts_with('<') {
        return None;
    }

    Some(Token {
        start: t0 as f64 / 100.0,
        end: t1 as f64 / 100.0,
        speech: speech.to_string(),
    })
}
