use std::path::PathBuf;

/// All errors that can occur in whisper-sidecar.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no audio file path given")]
    MissingInputPath,

    #[error("audio file path must be absolute: {path}")]
    RelativeInputPath { path: PathBuf },

    #[error("audio file path has no file name: {path}")]
    NoFileName { path: PathBuf },

    #[error("model error: {0}")]
    Model(String),

    #[error("model not found: {path}")]
    ModelNotFound { path: PathBuf },

    #[error("model download failed: {0}")]
    ModelDownload(String),

    #[error("audio decoding error: {0}")]
    AudioDecode(String),

    #[error("audio file not found: {path}")]
    AudioNotFound { path: PathBuf },

    #[error("unsupported language: \"{0}\" — use a whisper language code (e.g. \"en\", \"de\"), an English language name, or \"auto\"")]
    UnsupportedLanguage(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("transcription error: {0}")]
    Transcription(String),

    #[error("whisper error: {0}")]
    Whisper(#[from] whisper_rs::WhisperError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
