//! Product image uploads.
//!
//! Validation is a pure predicate over the declared MIME type and the
//! filename extension; the multipart handler in the admin router calls it
//! before any bytes are written. Accepted files land in the uploads
//! directory under a timestamp-derived name and the product record stores
//! the `/uploads/<name>` path that the static file service resolves.

use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// File types accepted for product pictures.
const ALLOWED_IMAGE_TYPES: [&str; 3] = ["jpeg", "jpg", "png"];

/// Accept or reject an upload. Both the MIME type and the extension must
/// match the allow-list.
pub fn is_allowed_image(mime: &str, file_name: &str) -> bool {
    let mime_ok = ALLOWED_IMAGE_TYPES.iter().any(|t| mime.contains(t));
    let ext_ok = extension(file_name)
        .map(|ext| ALLOWED_IMAGE_TYPES.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false);
    mime_ok && ext_ok
}

fn extension(file_name: &str) -> Option<&str> {
    Path::new(file_name).extension().and_then(|e| e.to_str())
}

/// Stored filename: upload time in unix millis plus the original extension.
/// Two uploads in the same millisecond produce the same name.
pub fn unique_filename(original_name: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    match extension(original_name) {
        Some(ext) => format!("{}.{}", millis, ext),
        None => millis.to_string(),
    }
}

/// Write the uploaded bytes into `dir` and return the public path stored on
/// the product record.
pub async fn store_image(dir: &Path, original_name: &str, data: &[u8]) -> io::Result<String> {
    let file_name = unique_filename(original_name);
    let dest: PathBuf = dir.join(&file_name);
    tokio::fs::write(&dest, data).await?;
    Ok(format!("/uploads/{}", file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_allowed_image_types() {
        assert!(is_allowed_image("image/png", "shirt.png"));
        assert!(is_allowed_image("image/jpeg", "shirt.jpg"));
        assert!(is_allowed_image("image/jpeg", "shirt.jpeg"));
    }

    #[test]
    fn rejects_other_file_types() {
        assert!(!is_allowed_image("image/gif", "anim.gif"));
        assert!(!is_allowed_image("application/pdf", "doc.pdf"));
        assert!(!is_allowed_image("text/plain", "notes.txt"));
    }

    #[test]
    fn both_checks_must_pass() {
        // right extension, wrong declared type
        assert!(!is_allowed_image("image/gif", "shirt.png"));
        // right declared type, wrong extension
        assert!(!is_allowed_image("image/png", "anim.gif"));
        // no extension at all
        assert!(!is_allowed_image("image/png", "shirt"));
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(is_allowed_image("image/png", "SHIRT.PNG"));
    }

    #[test]
    fn unique_filename_keeps_the_extension() {
        let name = unique_filename("photo.png");
        assert!(name.ends_with(".png"), "got: {name}");
        let stem = name.trim_end_matches(".png");
        assert!(stem.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn unique_filename_without_extension_is_bare_timestamp() {
        let name = unique_filename("photo");
        assert!(name.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn store_image_writes_under_the_uploads_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = store_image(dir.path(), "shirt.png", b"not-a-real-png")
            .await
            .unwrap();
        assert!(path.starts_with("/uploads/"));
        let file_name = path.trim_start_matches("/uploads/");
        let stored = std::fs::read(dir.path().join(file_name)).unwrap();
        assert_eq!(stored, b"not-a-real-png");
    }
}
