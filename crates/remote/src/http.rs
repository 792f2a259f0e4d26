//! HTTP transport for blob uploads.

use std::future::Future;
use std::pin::Pin;

use blobcast_core::{LocalFile, StoredBlobDescriptor, UploadAuthorization};
use blobcast_upload::{Transport, UploadError};
use tracing::debug;

/// Uploads blobs over HTTP with a bearer authorization token.
///
/// `POST {base_url}/blobs`, raw bytes body; a 2xx response carries the
/// stored blob descriptor as JSON.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport over the given HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

/// Joins a destination base URL with the blob upload path.
fn blob_endpoint(base_url: &str) -> String {
    format!("{}/blobs", base_url.trim_end_matches('/'))
}

impl Transport for HttpTransport {
    fn upload_blob<'a>(
        &'a self,
        base_url: &'a str,
        file: &'a LocalFile,
        auth: &'a UploadAuthorization,
    ) -> Pin<Box<dyn Future<Output = Result<StoredBlobDescriptor, UploadError>> + Send + 'a>> {
        Box::pin(async move {
            let endpoint = blob_endpoint(base_url);
            let response = self
                .client
                .post(&endpoint)
                .bearer_auth(auth.token())
                .header(reqwest::header::CONTENT_TYPE, &file.content_type)
                .body(file.data.clone())
                .send()
                .await
                .map_err(|e| {
                    UploadError::Transfer(format!("upload to {endpoint} failed: {e}"))
                })?;

            let status = response.status();
            if !status.is_success() {
                return Err(UploadError::Transfer(format!(
                    "upload to {endpoint} returned status {status}"
                )));
            }

            let descriptor: StoredBlobDescriptor = response.json().await.map_err(|e| {
                UploadError::Transfer(format!(
                    "invalid stored blob descriptor from {endpoint}: {e}"
                ))
            })?;

            debug!(url = %descriptor.url, size = descriptor.size, "blob stored");
            Ok(descriptor)
        })
    }
}
