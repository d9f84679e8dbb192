//! Filesystem image store
//!
//! Uploaded complaint photos live under `<data folder>/images/`, named
//! `<tracking_id>_<random>.<ext>`. The database stores only the opaque
//! reference; reads go through the signed-URL route, never a direct path.

use crate::error::{ApiError, ApiResult};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Supported upload formats, recognized by magic bytes
const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

#[derive(Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Store rooted at `<data_folder>/images`
    pub fn new(data_folder: &Path) -> Self {
        Self {
            root: data_folder.join("images"),
        }
    }

    /// Save uploaded bytes, returning the opaque image reference.
    ///
    /// Only PNG and JPEG are accepted; anything else is a 400, not a crash.
    pub fn save(&self, tracking_id: &str, bytes: &[u8]) -> ApiResult<String> {
        let ext = sniff_extension(bytes).ok_or_else(|| {
            ApiError::BadRequest("Unsupported image format (PNG or JPEG required)".to_string())
        })?;

        let image_ref = format!("{}_{}.{}", tracking_id, short_suffix(), ext);

        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.root.join(&image_ref), bytes)?;

        Ok(image_ref)
    }

    /// Load image bytes by reference; None for unknown refs.
    ///
    /// References containing path separators or dot-dot are rejected
    /// outright so a crafted ref cannot escape the store directory.
    pub fn load(&self, image_ref: &str) -> ApiResult<Option<Vec<u8>>> {
        if !is_safe_ref(image_ref) {
            return Err(ApiError::BadRequest("Invalid image reference".to_string()));
        }

        let path = self.root.join(image_ref);
        if !path.is_file() {
            return Ok(None);
        }
        Ok(Some(std::fs::read(path)?))
    }
}

/// Content type for a stored reference, by extension
pub fn content_type(image_ref: &str) -> &'static str {
    if image_ref.ends_with(".png") {
        "image/png"
    } else {
        "image/jpeg"
    }
}

fn sniff_extension(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(PNG_MAGIC) {
        Some("png")
    } else if bytes.starts_with(JPEG_MAGIC) {
        Some("jpg")
    } else {
        None
    }
}

fn short_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn is_safe_ref(image_ref: &str) -> bool {
    !image_ref.is_empty()
        && !image_ref.contains("..")
        && image_ref
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.extend_from_slice(b"fake image payload");
        bytes
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let image_ref = store.save("ABCD1234", &png_bytes()).unwrap();
        assert!(image_ref.starts_with("ABCD1234_"));
        assert!(image_ref.ends_with(".png"));

        let loaded = store.load(&image_ref).unwrap().unwrap();
        assert_eq!(loaded, png_bytes());
    }

    #[test]
    fn test_jpeg_detected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let mut bytes = JPEG_MAGIC.to_vec();
        bytes.extend_from_slice(b"jfif-ish");
        let image_ref = store.save("ABCD1234", &bytes).unwrap();
        assert!(image_ref.ends_with(".jpg"));
        assert_eq!(content_type(&image_ref), "image/jpeg");
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let result = store.save("ABCD1234", b"GIF89a not supported");
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_unknown_ref_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        assert!(store.load("ABCD1234_deadbeef.png").unwrap().is_none());
    }

    #[test]
    fn test_traversal_refs_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        assert!(store.load("../secrets.txt").is_err());
        assert!(store.load("a/b.png").is_err());
        assert!(store.load("").is_err());
    }
}
