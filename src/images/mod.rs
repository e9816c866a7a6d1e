//! Image storage backend integration
//!
//! Lists, uploads and deletes images on the remote backend. Each operation
//! issues a single request; failures are logged and returned without retry.

pub mod client;
pub mod mock;

pub use client::ImageClient;
pub use mock::MockImageClient;

use crate::models::{DeleteResult, ImageSummary, UploadResult};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::future::Future;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[async_trait]
pub trait ImageService: Send + Sync {
    async fn list_images(&self) -> Result<Vec<ImageSummary>>;
    async fn upload_image(&self, local_uri: &str) -> Result<UploadResult>;
    async fn delete_image(&self, image_id: &str) -> Result<DeleteResult>;
}

/// Resolve a plain path or a `file://` URI to a local path.
///
/// URIs are percent-decoded; one that does not name a local file is reported as missing.
pub(crate) fn local_path(local_uri: &str) -> Result<PathBuf> {
    if !local_uri.starts_with("file://") {
        return Ok(PathBuf::from(local_uri));
    }

    Url::parse(local_uri)
        .ok()
        .and_then(|url| url.to_file_path().ok())
        .ok_or_else(|| {
            tracing::error!("Invalid file URI: {}", local_uri);
            Error::FileNotFound(local_uri.to_string())
        })
}

/// Run `operation` until it finishes or `token` is cancelled, whichever comes first.
pub async fn with_cancellation<T, F>(token: &CancellationToken, operation: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        _ = token.cancelled() => {
            tracing::warn!("Image operation cancelled");
            Err(Error::Cancelled)
        }
        result = operation => result,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn test_local_path_plain() {
        assert_eq!(local_path("/tmp/a.png").unwrap(), Path::new("/tmp/a.png"));
    }

    #[test]
    fn test_local_path_decodes_file_uri() {
        assert_eq!(
            local_path("file:///tmp/My%20Photo.png").unwrap(),
            Path::new("/tmp/My Photo.png")
        );
    }

    #[test]
    fn test_local_path_rejects_remote_file_uri() {
        let err = local_path("file://remote-host/share/a.png").unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_with_cancellation_passes_through_result() {
        let token = CancellationToken::new();
        let value = with_cancellation(&token, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_with_cancellation_stops_pending_operation() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result: Result<()> = with_cancellation(&token, async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
