//! Private-metadata stripping for upload payloads.
//!
//! JPEG and PNG payloads are rewritten without their EXIF segment;
//! anything else passes through byte-for-byte. The strip is a pure
//! `bytes -> bytes` transform; [`ExifSanitizer`] adapts it to the
//! orchestrator's [`Sanitizer`] trait, hopping through a blocking
//! thread since re-encoding is CPU-bound.

use std::future::Future;
use std::pin::Pin;

use blobcast_core::LocalFile;
use blobcast_upload::{Sanitizer, UploadError};
use img_parts::ImageEXIF;
use img_parts::jpeg::Jpeg;
use img_parts::png::Png;
use tracing::debug;

/// Strips EXIF metadata from JPEG or PNG bytes.
///
/// Payloads that parse as neither format are returned unchanged.
pub fn strip_private_metadata(data: &[u8]) -> Vec<u8> {
    if let Ok(mut jpeg) = Jpeg::from_bytes(data.to_vec().into()) {
        jpeg.set_exif(None);
        return jpeg.encoder().bytes().to_vec();
    }

    if let Ok(mut png) = Png::from_bytes(data.to_vec().into()) {
        png.set_exif(None);
        return png.encoder().bytes().to_vec();
    }

    data.to_vec()
}

/// [`Sanitizer`] that strips EXIF on a blocking thread.
pub struct ExifSanitizer;

impl Sanitizer for ExifSanitizer {
    fn sanitize<'a>(
        &'a self,
        file: &'a LocalFile,
    ) -> Pin<Box<dyn Future<Output = Result<LocalFile, UploadError>> + Send + 'a>> {
        Box::pin(async move {
            let data = file.data.clone();
            let cleaned = tokio::task::spawn_blocking(move || strip_private_metadata(&data))
                .await
                .map_err(|e| UploadError::Sanitize(format!("blocking task failed: {e}")))?;

            if cleaned.len() != file.data.len() {
                debug!(file = %file.name, before = file.data.len(), after = cleaned.len(), "metadata stripped");
            }
            Ok(file.with_data(cleaned))
        })
    }
}
