//! Local file loading for the CLI.

use std::path::{Path, PathBuf};

use anyhow::Context;
use blobcast_core::LocalFile;

/// Reads the selected files into memory, in argument order.
pub fn read_files(paths: &[PathBuf]) -> anyhow::Result<Vec<LocalFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let data = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
            .with_context(|| format!("invalid file name: {}", path.display()))?;
        let content_type = detect_content_type(path).unwrap_or("application/octet-stream");
        files.push(LocalFile::new(name, content_type, data));
    }
    Ok(files)
}

/// Detects MIME content type from a file path extension.
fn detect_content_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("png") => Some("image/png"),
        Some("jpg" | "jpeg") => Some("image/jpeg"),
        Some("webp") => Some("image/webp"),
        Some("gif") => Some("image/gif"),
        Some("mp4") => Some("video/mp4"),
        Some("webm") => Some("video/webm"),
        Some("pdf") => Some("application/pdf"),
        Some("txt") => Some("text/plain"),
        _ => None,
    }
}
