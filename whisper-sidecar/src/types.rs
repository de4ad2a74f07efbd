use serde::{Deserialize, Serialize};

/// One element of a transcript: a word or a punctuation mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Offset in seconds where the token starts.
    #[serde(default)]
    pub start: f64,
    /// Offset in seconds where the token ends.
    #[serde(default)]
    pub end: f64,
    pub speech: String,
}

impl Token {
    /// Token with no timing information.
    pub fn new(speech: impl Into<String>) -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            speech: speech.into(),
        }
    }
}

/// Parse a token list from JSON. `null` is accepted and yields no tokens.
pub fn tokens_from_json(json: &str) -> crate::Result<Vec<Token>> {
    let tokens: Option<Vec<Token>> = serde_json::from_str(json)?;
    Ok(tokens.unwrap_or_default())
}
