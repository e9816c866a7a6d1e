use super::{local_path, ImageService};
use crate::mime::{mime_for_path, upload_file_name};
use crate::models::{Config, DeleteResult, ImageRecord, ImageSummary, UploadResult};
use crate::urls::summarize;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// reqwest-backed client for the image storage backend.
pub struct ImageClient {
    client: Client,
    api_url: String,
    timeout: Option<Duration>,
}

impl ImageClient {
    pub fn new(config: Config) -> Self {
        Self::new_with_client(config, Client::new())
    }

    /// Construct a client reusing an existing connection pool.
    pub fn new_with_client(config: Config, client: Client) -> Self {
        Self {
            client,
            api_url: config.api_url,
            timeout: config.timeout,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        builder.send().await.map_err(|e| {
            tracing::error!("Failed to reach image backend: {}", e);
            Error::Network(e)
        })
    }

    async fn read_body(response: Response) -> Result<String> {
        response.text().await.map_err(|e| {
            tracing::error!("Failed to read image backend response body: {}", e);
            Error::Network(e)
        })
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = Self::read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse image backend response: {}\nBody: {}", e, body);
            Error::Parse(e)
        })
    }
}

fn status_error(status: StatusCode) -> Error {
    let message = match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => status.to_string(),
    };
    tracing::error!("Image backend error (status {}): {}", status.as_u16(), message);
    Error::Http {
        status: status.as_u16(),
        message,
    }
}

/// Unwrap `{ result: { images: [...] } }` into summaries.
///
/// Any other shape yields an empty list; entries that cannot be displayed are skipped.
pub(crate) fn summaries_from_envelope(body: &Value) -> Vec<ImageSummary> {
    let Some(images) = body
        .get("result")
        .and_then(|result| result.get("images"))
        .and_then(Value::as_array)
    else {
        tracing::warn!("Image list response has no result.images array, returning no images");
        return Vec::new();
    };

    images
        .iter()
        .filter_map(|entry| {
            let record = match ImageRecord::deserialize(entry) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Skipping malformed image entry: {}", e);
                    return None;
                }
            };

            tracing::debug!(
                "Processing image {} with variants {:?}",
                record.id,
                record.variants
            );

            let id = record.id.clone();
            let summary = summarize(record);
            if summary.is_none() {
                tracing::warn!("Skipping image {} with no variants", id);
            }
            summary
        })
        .collect()
}

#[async_trait]
impl ImageService for ImageClient {
    async fn list_images(&self) -> Result<Vec<ImageSummary>> {
        let url = format!("{}/images", self.api_url);
        tracing::debug!("Fetching images from {}", url);

        let response = self.send(self.request(Method::GET, &url)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let body: Value = Self::parse_json(response).await?;
        tracing::debug!("Image list response: {}", body);

        Ok(summaries_from_envelope(&body))
    }

    async fn upload_image(&self, local_uri: &str) -> Result<UploadResult> {
        let local = local_path(local_uri)?;
        let path = local.as_path();
        match tokio::fs::try_exists(path).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::error!("Image file does not exist: {}", path.display());
                return Err(Error::FileNotFound(path.display().to_string()));
            }
            Err(e) => {
                tracing::error!("Failed to check image file {}: {}", path.display(), e);
                return Err(Error::Io(e));
            }
        }

        let data = tokio::fs::read(path).await.map_err(|e| {
            tracing::error!("Failed to read image file {}: {}", path.display(), e);
            Error::Io(e)
        })?;

        let mime = mime_for_path(path);
        let part = Part::bytes(data)
            .file_name(upload_file_name(path))
            .mime_str(mime)?;
        let form = Form::new().part("file", part);

        let url = format!("{}/images/upload", self.api_url);
        tracing::debug!("Uploading {} ({}) to {}", path.display(), mime, url);

        let response = self
            .send(self.request(Method::POST, &url).multipart(form))
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = Self::read_body(response).await?;
            tracing::error!(
                "Image upload failed (status {}): {}",
                status.as_u16(),
                error_text
            );
            return Err(Error::Http {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let result: UploadResult = Self::parse_json(response).await?;
        tracing::info!("Uploaded image {}", path.display());
        Ok(result)
    }

    async fn delete_image(&self, image_id: &str) -> Result<DeleteResult> {
        let url = format!("{}/images/{}", self.api_url, image_id);
        tracing::debug!("Deleting image {} via {}", image_id, url);

        let response = self.send(self.request(Method::DELETE, &url)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status));
        }

        let result: DeleteResult = Self::parse_json(response).await?;
        tracing::info!("Deleted image {}", image_id);
        Ok(result)
    }
}
