//! Local staging of a transfer.
//!
//! Each download gets its own uniquely named file in the temp directory. The
//! file only lives for the duration of [`stage_and_forward`]: it is removed
//! after the forward step whether that step succeeded or not, and also when
//! the transfer itself fails halfway.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::stream::StreamDescriptor;
use super::{ResolvedVideo, StreamProvider};
use crate::core::error::AppResult;

/// Fresh path in `dir` for one transfer, e.g. `ytrelay-<uuid>.mp4`
fn staging_path(dir: &Path, container: &str) -> PathBuf {
    let ext = if container.is_empty() { "bin" } else { container };
    dir.join(format!("ytrelay-{}.{}", Uuid::new_v4(), ext))
}

/// Transfers `stream` to a staging file, hands its path to `forward`, then
/// deletes the file.
///
/// The result is the transfer error if the transfer failed, otherwise
/// whatever `forward` returned. Removal failures are only logged.
pub async fn stage_and_forward<F, Fut, T>(
    provider: &dyn StreamProvider,
    video: &ResolvedVideo,
    stream: &StreamDescriptor,
    temp_dir: &Path,
    forward: F,
) -> AppResult<T>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    fs_err::tokio::create_dir_all(temp_dir).await?;
    let path = staging_path(temp_dir, &stream.container);

    log::info!(
        "Transferring {} format {} to {}",
        video.url,
        stream.format_id,
        path.display()
    );

    let result = match provider.fetch(video, stream, &path).await {
        Ok(()) => forward(path.clone()).await,
        Err(e) => Err(e.into()),
    };

    remove_staged_file(&path).await;

    result
}

async fn remove_staged_file(path: &Path) {
    match fs_err::tokio::remove_file(path).await {
        Ok(()) => log::debug!("Removed temp file {}", path.display()),
        // A transfer that failed early may never have created it
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => log::warn!("Failed to remove temp file {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::download::error::DownloadError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::tempdir;
    use url::Url;

    /// Writes a few bytes to `dest`, optionally failing afterwards
    struct WritingProvider {
        fail_after_write: bool,
        written: Mutex<Option<PathBuf>>,
    }

    impl WritingProvider {
        fn new(fail_after_write: bool) -> Self {
            Self {
                fail_after_write,
                written: Mutex::new(None),
            }
        }

        fn written_path(&self) -> PathBuf {
            self.written.lock().unwrap().clone().unwrap()
        }
    }

    #[async_trait]
    impl StreamProvider for WritingProvider {
        async fn resolve(&self, _url: &Url) -> Result<ResolvedVideo, DownloadError> {
            unreachable!("staging never resolves")
        }

        async fn fetch(&self, _: &ResolvedVideo, _: &StreamDescriptor, dest: &Path) -> Result<(), DownloadError> {
            tokio::fs::write(dest, b"fake mp4 bytes").await?;
            *self.written.lock().unwrap() = Some(dest.to_path_buf());
            if self.fail_after_write {
                return Err(DownloadError::YtDlp("connection reset mid-transfer".into()));
            }
            Ok(())
        }
    }

    fn video() -> ResolvedVideo {
        ResolvedVideo {
            url: Url::parse("https://youtu.be/abc").unwrap(),
            title: "Clip".into(),
            streams: vec![],
        }
    }

    fn stream() -> StreamDescriptor {
        StreamDescriptor {
            format_id: "18".into(),
            container: "mp4".into(),
            progressive: true,
            height: Some(360),
            size_bytes: Some(14),
        }
    }

    #[test]
    fn test_staging_paths_are_unique() {
        let dir = Path::new("/tmp");
        let a = staging_path(dir, "mp4");
        let b = staging_path(dir, "mp4");
        assert_ne!(a, b);
        assert_eq!(a.extension().unwrap(), "mp4");
        assert!(a.starts_with(dir));
        assert_eq!(staging_path(dir, "").extension().unwrap(), "bin");
    }

    #[tokio::test]
    async fn test_file_removed_after_successful_forward() {
        let dir = tempdir().unwrap();
        let provider = WritingProvider::new(false);

        let seen = stage_and_forward(&provider, &video(), &stream(), dir.path(), |path| async move {
            assert!(path.exists(), "file must exist while forwarding");
            Ok(path)
        })
        .await
        .unwrap();

        assert_eq!(seen, provider.written_path());
        assert!(!seen.exists());
    }

    #[tokio::test]
    async fn test_file_removed_after_failed_forward() {
        let dir = tempdir().unwrap();
        let provider = WritingProvider::new(false);

        let result: AppResult<()> = stage_and_forward(&provider, &video(), &stream(), dir.path(), |_path| async {
            Err(AppError::Io(std::io::Error::other("upload rejected")))
        })
        .await;

        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(!provider.written_path().exists());
    }

    #[tokio::test]
    async fn test_partial_file_removed_when_transfer_fails() {
        let dir = tempdir().unwrap();
        let provider = WritingProvider::new(true);
        let mut forwarded = false;

        let result: AppResult<()> = stage_and_forward(&provider, &video(), &stream(), dir.path(), |_path| {
            forwarded = true;
            async { Ok(()) }
        })
        .await;

        assert!(matches!(result, Err(AppError::Download(DownloadError::YtDlp(_)))));
        assert!(!forwarded);
        assert!(!provider.written_path().exists());
    }

    #[tokio::test]
    async fn test_creates_missing_temp_dir() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("staging").join("videos");
        let provider = WritingProvider::new(false);

        stage_and_forward(&provider, &video(), &stream(), &nested, |_path| async { Ok(()) })
            .await
            .unwrap();

        assert!(nested.is_dir());
        assert!(!provider.written_path().exists());
    }
}
