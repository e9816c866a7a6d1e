use std::path::Path;

/// Content type sent for an uploaded file, chosen from its extension.
///
/// Only PNG and GIF are recognized; everything else is sent as JPEG.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

/// Filename reported to the backend: `photo.<ext>`, keeping the extension as written.
pub fn upload_file_name(path: &Path) -> String {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => format!("photo.{}", ext),
        None => "photo".to_string(),
    }
}
