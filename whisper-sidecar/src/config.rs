use std::fmt;
use std::path::PathBuf;

use crate::error::Error;

/// A validated language for whisper transcription.
///
/// Accepts short codes ("en", "de") and full names ("english", "german"),
/// checked against whisper.cpp's language table. `Language::Auto` lets the
/// model detect the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Language {
    /// Auto-detect language from audio.
    Auto,
    /// A validated language code.
    Code {
        /// Short code as whisper expects it.
        code: String,
        /// Whisper internal language ID.
        id: i32,
    },
}

impl Language {
    /// Create a language from a code or full name, validating against whisper.cpp.
    pub fn new(lang: &str) -> Result<Self, Error> {
        let lower = lang.to_lowercase();
        if lower == "auto" {
            return Ok(Language::Auto);
        }

        match whisper_rs::get_lang_id(&lower) {
            Some(id) => {
                let code = whisper_rs::get_lang_str(id).unwrap_or(&lower).to_string();
                Ok(Language::Code { code, id })
            }
            None => Err(Error::UnsupportedLanguage(lang.to_string())),
        }
    }

    /// English, whisper language ID 0.
    pub fn english() -> Self {
        Language::Code {
            code: "en".into(),
            id: 0,
        }
    }

    /// Short language code, or None for Auto.
    pub fn code(&self) -> Option<&str> {
        match self {
            Language::Auto => None,
            Language::Code { code, .. } => Some(code),
        }
    }

    /// List all supported languages as (code, full_name) pairs.
    pub fn supported() -> Vec<(&'static str, &'static str)> {
        let max = whisper_rs::get_lang_max_id();
        (0..=max)
            .filter_map(|id| {
                let code = whisper_rs::get_lang_str(id)?;
                let name = whisper_rs::get_lang_str_full(id)?;
                Some((code, name))
            })
            .collect()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Auto => write!(f, "auto"),
            Language::Code { code, .. } => write!(f, "{code}"),
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::english()
    }
}

/// Whisper model sizes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Model {
    Tiny,
    Base,
    Small,
    #[default]
    Medium,
    MediumEn,
    LargeV3,
    /// User-provided ggml file.
    Custom(PathBuf),
}

impl Model {
    /// ggml file name as published for whisper.cpp.
    pub fn filename(&self) -> String {
        match self {
            Model::Custom(path) => path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| "custom-model".into()),
            named => format!("ggml-{}.bin", named.name()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Model::Tiny => "tiny",
            Model::Base => "base",
            Model::Small => "small",
            Model::Medium => "medium",
            Model::MediumEn => "medium.en",
            Model::LargeV3 => "large-v3",
            Model::Custom(_) => "custom",
        }
    }

    /// Parse a model name as given on the command line.
    pub fn parse_name(s: &str) -> Option<Self> {
        match s {
            "tiny" => Some(Model::Tiny),
            "base" => Some(Model::Base),
            "small" => Some(Model::Small),
            "medium" => Some(Model::Medium),
            "medium.en" => Some(Model::MediumEn),
            "large-v3" => Some(Model::LargeV3),
            _ => None,
        }
    }
}

/// Settings handed to a [`SpeechEngine`](crate::SpeechEngine).
#[derive(Debug, Clone)]
pub struct TranscribeOptions {
    pub model: Model,
    pub language: Language,
    pub gpu: bool,
    pub gpu_device: u32,
    pub n_threads: Option<u32>,
    pub cache_dir: Option<PathBuf>,
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            model: Model::Medium,
            language: Language::english(),
            gpu: true,
            gpu_device: 0,
            n_threads: None,
            cache_dir: None,
        }
    }
}

impl TranscribeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Set the language from a code or full name.
    pub fn language(mut self, lang: &str) -> Result<Self, Error> {
        self.language = Language::new(lang)?;
        Ok(self)
    }

    pub fn gpu(mut self, enabled: bool) -> Self {
        self.gpu = enabled;
        self
    }

    pub fn gpu_device(mut self, device: u32) -> Self {
        self.gpu_device = device;
        self
    }

    /// Number of inference threads, 1 to `i32::MAX`.
    pub fn n_threads(mut self, n: u32) -> Result<Self, Error> {
        if n == 0 {
            return Err(Error::InvalidOption("thread count must be at least 1".into()));
        }
        if i32::try_from(n).is_err() {
            return Err(Error::InvalidOption(format!(
                "thread count {n} is too large (max {})",
                i32::MAX
            )));
        }
        self.n_threads = Some(n);
        Ok(self)
    }

    pub fn cache_dir(mut self, dir: PathBuf) -> Self {
        self.cache_dir = Some(dir);
        self
    }

    /// Resolve the model cache directory, defaulting to ~/.cache/whisper-sidecar/models.
    pub fn resolve_cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("whisper-sidecar")
                .join("models")
        })
    }
}
