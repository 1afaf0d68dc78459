//! MIME type lookup module
//!
//! Returns the Content-Type for a file path by its suffix. Static table, no
//! content sniffing.

/// Fallback for anything not in the table
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content type of the welcome page
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Suffix to Content-Type table, checked in order
const CONTENT_TYPES: &[(&str, &str)] = &[
    // Application bundles
    (".hap", "application/octet-stream"),
    (".hsp", "application/octet-stream"),
    // Manifests
    (".json5", "application/json; charset=utf-8"),
    (".json", "application/json; charset=utf-8"),
    // Images
    (".png", "image/png"),
    (".jpg", "image/jpeg"),
    (".jpeg", "image/jpeg"),
    (".webp", "image/webp"),
];

/// Get MIME Content-Type based on the path suffix (case-sensitive)
///
/// # Examples
/// ```
/// use hap_distribution::http::mime::get_content_type;
/// assert_eq!(get_content_type("hap/manifest.json5"), "application/json; charset=utf-8");
/// assert_eq!(get_content_type("asset/icon29.png"), "image/png");
/// assert_eq!(get_content_type("README"), "application/octet-stream");
/// ```
pub fn get_content_type(path: &str) -> &'static str {
    CONTENT_TYPES
        .iter()
        .find(|(suffix, _)| path.ends_with(suffix))
        .map_or(DEFAULT_CONTENT_TYPE, |(_, content_type)| content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_entries() {
        assert_eq!(get_content_type("hap/AppSigned.hap"), "application/octet-stream");
        assert_eq!(get_content_type("lib/entry.hsp"), "application/octet-stream");
        assert_eq!(get_content_type("manifest.json"), "application/json; charset=utf-8");
        assert_eq!(get_content_type("manifest.json5"), "application/json; charset=utf-8");
        assert_eq!(get_content_type("icon.png"), "image/png");
        assert_eq!(get_content_type("photo.jpg"), "image/jpeg");
        assert_eq!(get_content_type("photo.jpeg"), "image/jpeg");
        assert_eq!(get_content_type("banner.webp"), "image/webp");
    }

    #[test]
    fn test_unknown_suffix() {
        assert_eq!(get_content_type("notes.txt"), DEFAULT_CONTENT_TYPE);
        assert_eq!(get_content_type("Makefile"), DEFAULT_CONTENT_TYPE);
        assert_eq!(get_content_type("ICON.PNG"), DEFAULT_CONTENT_TYPE);
    }
}
