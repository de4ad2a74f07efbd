use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::config::TranscribeOptions;
use crate::error::Result;
use crate::types::Token;

/// A speech-to-text backend: audio file in, ordered tokens out.
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    async fn transcribe(&self, audio: &Path, options: &TranscribeOptions) -> Result<Vec<Token>>;
}

/// Run `engine` once on `audio` and hand back its result untouched.
///
/// Failures are logged with the audio path and returned as-is; there is no
/// retry and no fallback model.
pub async fn transcribe(
    engine: &dyn SpeechEngine,
    audio: &Path,
    options: &TranscribeOptions,
) -> Result<Vec<Token>> {
    info!(
        path = %audio.display(),
        model = options.model.name(),
        language = %options.language,
        "transcribing"
    );

    match engine.transcribe(audio, options).await {
        Ok(tokens) => {
            info!(tokens = tokens.len(), "transcription complete");
            debug!(?tokens, "transcript result");
            Ok(tokens)
        }
        Err(e) => {
            error!(path = %audio.display(), error = %e, "error during transcription");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::Error;

    struct Scripted {
        tokens: Option<Vec<Token>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SpeechEngine for Scripted {
        async fn transcribe(&self, _audio: &Path, _options: &TranscribeOptions) -> Result<Vec<Token>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.tokens
                .clone()
                .ok_or_else(|| Error::Transcription("model load failed".into()))
        }
    }

    #[tokio::test]
    async fn test_transcribe_passes_tokens_through() {
        let tokens = vec![Token::new("Hello"), Token::new("world"), Token::new("!")];
        let engine = Scripted {
            tokens: Some(tokens.clone()),
            calls: AtomicUsize::new(0),
        };

        let out = transcribe(&engine, Path::new("/a.wav"), &TranscribeOptions::default())
            .await
            .unwrap();

        assert_eq!(out, tokens);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transcribe_propagates_error_unchanged() {
        let engine = Scripted {
            tokens: None,
            calls: AtomicUsize::new(0),
        };

        let err = transcribe(&engine, Path::new("/a.wav"), &TranscribeOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transcription(ref m) if m == "model load failed"));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1, "no retry");
    }
}
