//! Content-Type inference from file extensions.

use std::path::Path;

/// Content type used for registered-handler responses.
pub const DEFAULT_HANDLER_TYPE: &str = "application/json";

/// Fallback for extensions not in the table.
pub const FALLBACK_TYPE: &str = "application/octet-stream";

/// Get the Content-Type for a file extension (case-insensitive, without
/// the dot).
///
/// # Examples
/// ```
/// use microserve::http::mime::content_type_for_extension;
/// assert_eq!(content_type_for_extension(Some("css")), "text/css");
/// assert_eq!(content_type_for_extension(Some("JPEG")), "image/jpg");
/// assert_eq!(content_type_for_extension(None), "application/octet-stream");
/// ```
pub fn content_type_for_extension(extension: Option<&str>) -> &'static str {
    let ext = extension.map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => FALLBACK_TYPE,
    }
}

pub fn content_type_for_path(path: &Path) -> &'static str {
    content_type_for_extension(path.extension().and_then(|e| e.to_str()))
}
