use std::io::Write;
use std::path::{Path, PathBuf};

use futures_util::{Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::config::Model;
use crate::error::{Error, Result};

const HUGGINGFACE_BASE: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

/// Anything smaller is an HTML error page, not a ggml model.
const MIN_MODEL_BYTES: u64 = 1_000_000;

/// Return the local path of `model`, downloading it into `cache_dir` first if needed.
pub async fn ensure_model(model: &Model, cache_dir: &Path) -> Result<PathBuf> {
    if let Model::Custom(path) = model {
        return if path.exists() {
            Ok(path.clone())
        } else {
            Err(Error::ModelNotFound { path: path.clone() })
        };
    }

    let filename = model.filename();
    let model_path = cache_dir.join(&filename);

    if model_path.exists() {
        info!(path = %model_path.display(), "model already cached");
        return Ok(model_path);
    }

    std::fs::create_dir_all(cache_dir).map_err(|e| {
        Error::Model(format!(
            "failed to create cache dir {}: {e}",
            cache_dir.display()
        ))
    })?;

    let url = format!("{HUGGINGFACE_BASE}/{filename}");
    info!(%url, "downloading model");
    download_model(&url, &model_path).await?;

    Ok(model_path)
}

async fn download_model(url: &str, dest: &Path) -> Result<()> {
    let response = reqwest::Client::new()
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| Error::ModelDownload(format!("HTTP error: {e}")))?;

    let total_size = response.content_length().unwrap_or(0);

    let pb = ProgressBar::new(total_size);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(format!(
        "Downloading {}",
        dest.file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default()
    ));

    let tmp_path = part_path(dest);
    let file_size = match stream_to_file(response.bytes_stream(), &tmp_path, &pb).await {
        Ok(n) => n,
        Err(e) => {
            pb.abandon();
            return Err(e);
        }
    };

    if file_size < MIN_MODEL_BYTES {
        std::fs::remove_file(&tmp_path).ok();
        pb.abandon();
        return Err(Error::ModelDownload(format!(
            "downloaded file too small ({file_size} bytes) — likely an error page"
        )));
    }

    std::fs::rename(&tmp_path, dest)?;
    pb.finish_with_message("Download complete");

    if total_size > 0 && file_size != total_size {
        warn!(
            expected = total_size,
            actual = file_size,
            "file size mismatch — model may be corrupt"
        );
    }

    info!(path = %dest.display(), size = file_size, "model saved");
    Ok(())
}

/// Write every chunk of `stream` to `path`, returning the bytes written.
///
/// On a failed chunk or write the partial file is removed.
async fn stream_to_file<S, B, E>(stream: S, path: &Path, pb: &ProgressBar) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Error>,
{
    let result = write_chunks(stream, path, pb).await;
    if result.is_err() {
        std::fs::remove_file(path).ok();
    }
    result
}

async fn write_chunks<S, B, E>(stream: S, path: &Path, pb: &ProgressBar) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<Error>,
{
    let mut stream = std::pin::pin!(stream);
    let mut file = std::fs::File::create(path)?;
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(Into::<Error>::into)?;
        let bytes = chunk.as_ref();
        file.write_all(bytes)?;
        downloaded += bytes.len() as u64;
        pb.set_position(downloaded);
    }

    file.flush()?;
    Ok(downloaded)
}

/// `ggml-medium.bin` -> `ggml-medium.bin.part`
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_ensure_model_custom_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my-model.bin");
        fs::write(&path, b"fake model data").unwrap();

        let result = ensure_model(&Model::Custom(path.clone()), Path::new("/unused")).await;
        assert_eq!(result.unwrap(), path);
    }

    #[tokio::test]
    async fn test_ensure_model_custom_not_found() {
        let model = Model::Custom(PathBuf::from("/nonexistent/model.bin"));
        let result = ensure_model(&model, Path::new("/unused")).await;
        assert!(matches!(result.unwrap_err(), Error::ModelNotFound { .. }));
    }

    #[tokio::test]
    async fn test_ensure_model_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("ggml-medium.bin");
        fs::write(&model_path, b"fake cached model").unwrap();

        let result = ensure_model(&Model::Medium, dir.path()).await;
        assert_eq!(result.unwrap(), model_path);
    }

    #[tokio::test]
    async fn test_stream_to_file_writes_all_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ggml-medium.bin.part");
        let chunks = futures_util::stream::iter(vec![
            Ok::<_, std::io::Error>(b"ggml".to_vec()),
            Ok(b"-data".to_vec()),
        ]);

        let written = stream_to_file(chunks, &path, &ProgressBar::hidden())
            .await
            .unwrap();

        assert_eq!(written, 9);
        assert_eq!(fs::read(&path).unwrap(), b"ggml-data");
    }

    #[tokio::test]
    async fn test_stream_to_file_removes_partial_file_on_failed_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ggml-medium.bin.part");
        let chunks = futures_util::stream::iter(vec![
            Ok(b"partial".to_vec()),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer")),
            Ok(b"never written".to_vec()),
        ]);

        let err = stream_to_file(chunks, &path, &ProgressBar::hidden())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Io(ref e) if e.to_string() == "reset by peer"));
        assert!(!path.exists());
    }

    #[test]
    fn test_part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("/cache/ggml-medium.en.bin")),
            PathBuf::from("/cache/ggml-medium.en.bin.part")
        );
    }
}
