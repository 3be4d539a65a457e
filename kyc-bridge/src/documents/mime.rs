//! Content-type to file-extension mapping and the accepted-extension allow-list.

/// Extensions vendors accept, in normalized form.
pub const ACCEPTED_EXTENSIONS: &[&str] =
    &["jpg", "png", "pdf", "bmp", "gif", "svg", "psd", "tif", "tiff", "webp"];

/// MIME type table. Keys are lower-case, without parameters.
const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/jpg", "jpg"),
    ("image/pjpeg", "jpg"),
    ("image/png", "png"),
    ("image/x-png", "png"),
    ("application/pdf", "pdf"),
    ("application/x-pdf", "pdf"),
    ("image/bmp", "bmp"),
    ("image/x-bmp", "bmp"),
    ("image/x-ms-bmp", "bmp"),
    ("image/gif", "gif"),
    ("image/svg+xml", "svg"),
    ("image/vnd.adobe.photoshop", "psd"),
    ("application/x-photoshop", "psd"),
    ("image/tiff", "tiff"),
    ("image/tif", "tif"),
    ("image/webp", "webp"),
    ("image/heic", "heic"),
    ("image/heif", "heif"),
];

/// Returns the canonical extension for a content type.
///
/// Parameters such as `; charset=binary` are ignored and matching is
/// case-insensitive. Unknown content types yield `None`.
///
/// # Examples
///
/// ```
/// use kyc_bridge::documents::mime::extension_for;
///
/// assert_eq!(extension_for("image/jpeg"), Some("jpg"));
/// assert_eq!(extension_for("Image/PNG; q=0.9"), Some("png"));
/// assert_eq!(extension_for("application/octet-stream"), None);
/// ```
#[must_use]
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    MIME_EXTENSIONS.iter().find(|(mime, _)| *mime == essence).map(|(_, ext)| *ext)
}

/// Normalizes an extension: lower-cased, leading dot removed, `jpeg` folded into `jpg`.
#[must_use]
pub fn normalize_extension(extension: &str) -> String {
    let lowered = extension.trim().trim_start_matches('.').to_ascii_lowercase();
    if lowered == "jpeg" { "jpg".to_owned() } else { lowered }
}

/// Checks an already-normalized extension against [`ACCEPTED_EXTENSIONS`].
///
/// The comparison is case-sensitive; run [`normalize_extension`] first.
#[must_use]
pub fn is_accepted(normalized_extension: &str) -> bool {
    ACCEPTED_EXTENSIONS.contains(&normalized_extension)
}

/// Maps a content type to an accepted, normalized extension.
#[must_use]
pub fn accepted_extension(content_type: &str) -> Option<String> {
    extension_for(content_type).map(normalize_extension).filter(|ext| is_accepted(ext))
}
