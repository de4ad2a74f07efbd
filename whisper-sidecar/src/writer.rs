use std::path::Path;

use tracing::info;

use crate::error::Result;

/// Write `text` to `path` as a JSON string literal, replacing any existing file.
pub fn write_transcript(path: &Path, text: &str) -> Result<()> {
    let quoted = serde_json::to_string(text)?;
    std::fs::write(path, quoted)?;
    info!(path = %path.display(), "transcription saved");
    Ok(())
}
