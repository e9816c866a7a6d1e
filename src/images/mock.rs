use super::{local_path, ImageService};
use crate::mime::mime_for_path;
use crate::models::{DeleteResult, ImageRecord, ImageSummary, UploadResult};
use crate::urls::summarize;
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the image backend, for callers' tests.
#[derive(Clone)]
pub struct MockImageClient {
    images: Arc<Mutex<Vec<ImageRecord>>>,
    base_url: String,
    failure_status: Option<u16>,
    upload_count: Arc<Mutex<usize>>,
    delete_count: Arc<Mutex<usize>>,
}

impl MockImageClient {
    pub fn new() -> Self {
        Self {
            images: Arc::new(Mutex::new(Vec::new())),
            base_url: "https://mock-images.example.com".to_string(),
            failure_status: None,
            upload_count: Arc::new(Mutex::new(0)),
            delete_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_image(self, id: &str) -> Self {
        let variant = format!("{}/{}/public", self.base_url, id);
        self.images.lock().unwrap().push(ImageRecord {
            id: id.to_string(),
            variants: vec![variant],
        });
        self
    }

    /// Make every operation fail with an HTTP error carrying `status`.
    pub fn with_failure(mut self, status: u16) -> Self {
        self.failure_status = Some(status);
        self
    }

    pub fn get_upload_count(&self) -> usize {
        *self.upload_count.lock().unwrap()
    }

    pub fn get_delete_count(&self) -> usize {
        *self.delete_count.lock().unwrap()
    }

    pub fn get_image_ids(&self) -> Vec<String> {
        self.images
            .lock()
            .unwrap()
            .iter()
            .map(|record| record.id.clone())
            .collect()
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure_status {
            Some(status) => Err(Error::Http {
                status,
                message: "mock failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for MockImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageService for MockImageClient {
    async fn list_images(&self) -> Result<Vec<ImageSummary>> {
        self.check_failure()?;

        let images = self.images.lock().unwrap();
        Ok(images.iter().cloned().filter_map(summarize).collect())
    }

    async fn upload_image(&self, local_uri: &str) -> Result<UploadResult> {
        let path = local_path(local_uri)?;
        if !path.exists() {
            return Err(Error::FileNotFound(path.display().to_string()));
        }
        self.check_failure()?;

        let mut count = self.upload_count.lock().unwrap();
        *count += 1;

        let id = format!("mock-{}", *count);
        let variant = format!("{}/{}/public", self.base_url, id);
        self.images.lock().unwrap().push(ImageRecord {
            id: id.clone(),
            variants: vec![variant.clone()],
        });

        Ok(json!({
            "success": true,
            "result": {
                "id": id,
                "variants": [variant],
                "contentType": mime_for_path(&path),
            }
        }))
    }

    async fn delete_image(&self, image_id: &str) -> Result<DeleteResult> {
        self.check_failure()?;

        let mut count = self.delete_count.lock().unwrap();
        *count += 1;

        let mut images = self.images.lock().unwrap();
        let before = images.len();
        images.retain(|record| record.id != image_id);
        if images.len() == before {
            return Err(Error::Http {
                status: 404,
                message: "Not Found".to_string(),
            });
        }

        Ok(json!({ "success": true, "result": {} }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_upload_then_list() {
        let client = MockImageClient::new();
        let file = tempfile::Builder::new().suffix(".gif").tempfile().unwrap();

        let result = client
            .upload_image(&file.path().to_string_lossy())
            .await
            .unwrap();
        assert_eq!(result["result"]["id"], "mock-1");
        assert_eq!(result["result"]["contentType"], "image/gif");
        assert_eq!(client.get_upload_count(), 1);

        let images = client.list_images().await.unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(
            images[0].resolutions["250px"],
            "https://mock-images.example.com/mock-1/public?width=250&height=250"
        );
    }

    #[tokio::test]
    async fn test_mock_upload_missing_file() {
        let client = MockImageClient::new();
        let err = client.upload_image("/no/such/file.jpg").await.unwrap_err();
        assert!(matches!(err, Error::FileNotFound(_)));
        assert_eq!(client.get_upload_count(), 0);
    }

    #[tokio::test]
    async fn test_mock_delete() {
        let client = MockImageClient::new().with_image("a").with_image("b");

        client.delete_image("a").await.unwrap();
        assert_eq!(client.get_image_ids(), vec!["b".to_string()]);

        let err = client.delete_image("a").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(client.get_delete_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_failure_status() {
        let client = MockImageClient::new().with_image("a").with_failure(500);
        let err = client.list_images().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_mock_upload_from_file_uri() {
        let client = MockImageClient::new();
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("Holiday Pic.PNG");
        std::fs::write(&file_path, b"png").unwrap();

        let uri = reqwest::Url::from_file_path(&file_path).unwrap().to_string();
        let result = client.upload_image(&uri).await.unwrap();
        assert_eq!(result["result"]["contentType"], "image/png");
    }
}
