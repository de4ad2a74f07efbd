use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::error;
use whisper_sidecar::{Error, Model, TranscribeOptions, WhisperEngine};

#[derive(Parser)]
#[command(
    name = "whisper-sidecar",
    about = "Transcribe an audio file and save the text next to it as <file>.txt"
)]
struct Cli {
    /// Absolute path to the audio file.
    input: Option<OsString>,

    /// Whisper model name, or a path to a ggml .bin file.
    #[arg(short, long, default_value = "medium")]
    model: String,

    /// Language code (e.g. "en", "de") or "auto" for detection.
    #[arg(short, long, default_value = "en")]
    language: String,

    /// Model cache directory.
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Disable GPU acceleration.
    #[arg(long)]
    no_gpu: bool,

    /// GPU device ID.
    #[arg(long, default_value = "0")]
    gpu_device: u32,

    /// Number of threads (default: auto).
    #[arg(long)]
    threads: Option<u32>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("whisper_sidecar={level}").parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let paths = match whisper_sidecar::resolve(cli.input.as_deref().map(Path::new)) {
        Ok(p) => p,
        Err(Error::MissingInputPath | Error::RelativeInputPath { .. }) => {
            eprintln!("Please provide an absolute path to the audio file as an argument.");
            eprintln!("Example: whisper-sidecar /full/path/to/audio.wav");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let model = match Model::parse_name(&cli.model) {
        Some(m) => m,
        None => {
            let path = PathBuf::from(&cli.model);
            if path.exists() {
                Model::Custom(path)
            } else {
                eprintln!("Unknown model: {}", cli.model);
                eprintln!("Use one of tiny, base, small, medium, medium.en, large-v3, or a path to a .bin file");
                std::process::exit(1);
            }
        }
    };

    let mut opts = match TranscribeOptions::new()
        .model(model)
        .gpu(!cli.no_gpu)
        .gpu_device(cli.gpu_device)
        .language(&cli.language)
    {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if let Some(n) = cli.threads {
        opts = match opts.n_threads(n) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        };
    }
    if let Some(dir) = cli.cache_dir {
        opts = opts.cache_dir(dir);
    }

    if let Err(e) = whisper_sidecar::run(&WhisperEngine::new(), &paths, &opts).await {
        error!(error = %e, "transcription failed");
        std::process::exit(1);
    }
}
