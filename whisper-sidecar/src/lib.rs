//! Audio file in, one line of transcript text out.
//!
//! **whisper-sidecar** runs a single audio file through a speech engine
//! (whisper.cpp by default), joins the word tokens it returns into a string
//! and writes that string, JSON-quoted, next to the audio file as
//! `<file name>.txt`.
//!
//! # Quick start
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> whisper_sidecar::Result<()> {
//! use std::path::Path;
//! use whisper_sidecar::{TranscribeOptions, WhisperEngine};
//!
//! let paths = whisper_sidecar::resolve(Some(Path::new("/recordings/standup.wav")))?;
//! let text = whisper_sidecar::run(&WhisperEngine::new(), &paths, &TranscribeOptions::default()).await?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

pub(crate) mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod paths;
pub mod text;
pub mod types;
pub mod whisper;
pub mod writer;

pub use config::{Language, Model, TranscribeOptions};
pub use engine::{transcribe, SpeechEngine};
pub use error::{Error, Result};
pub use paths::{output_path_for, resolve, PathPair};
pub use text::assemble;
pub use types::{tokens_from_json, Token};
pub use whisper::WhisperEngine;
pub use writer::write_transcript;

/// Transcribe `paths.input`, assemble the text and write it to `paths.output`.
///
/// Returns the assembled text. Nothing is written when the engine fails.
pub async fn run(
    engine: &dyn SpeechEngine,
    paths: &PathPair,
    options: &TranscribeOptions,
) -> Result<String> {
    let tokens = transcribe(engine, &paths.input, options).await?;
    let text = assemble(&tokens);
    write_transcript(&paths.output, &text)?;
    Ok(text)
}
