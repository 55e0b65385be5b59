// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image loading.
//!
//! Previews are either `http(s)` URLs served by the backend (fetched with
//! the bearer credential) or local file paths. Either way the bytes are
//! decoded to RGBA8 for display in egui.

use super::error::ImageLoadError;
use crate::config::Credential;
use std::io::Read;
use std::path::Path;

/// Upper bound on a fetched image body.
const MAX_IMAGE_BYTES: u64 = 64 * 1024 * 1024;

/// Decoded image ready to become a texture.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

pub fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

/// Login pages and JSON error bodies come back with a 200 sometimes; they
/// are not image data.
pub fn is_rejected_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("application/json") || content_type.contains("text/html")
}

/// Fetch raw image bytes from a URL.
pub fn fetch_bytes(url: &str, credential: Option<&Credential>) -> Result<Vec<u8>, ImageLoadError> {
    let mut request = ureq::get(url);
    if let Some(credential) = credential {
        request = request.set("Authorization", &credential.header_value());
    }

    let response = request.call()?;
    let content_type = response.content_type().to_string();
    if is_rejected_content_type(&content_type) {
        return Err(ImageLoadError::UnexpectedContentType(content_type));
    }

    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(MAX_IMAGE_BYTES)
        .read_to_end(&mut bytes)?;
    Ok(bytes)
}

pub fn decode(bytes: &[u8]) -> Result<LoadedImage, ImageLoadError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    Ok(LoadedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

/// Load an image file from disk.
pub fn load_image(path: &Path) -> Result<LoadedImage, ImageLoadError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Load a session preview from wherever its locator points.
pub fn load_preview(
    locator: &str,
    credential: Option<&Credential>,
) -> Result<LoadedImage, ImageLoadError> {
    if is_remote(locator) {
        decode(&fetch_bytes(locator, credential)?)
    } else {
        load_image(Path::new(locator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_rejection() {
        assert!(is_rejected_content_type("application/json"));
        assert!(is_rejected_content_type("Application/JSON; charset=utf-8"));
        assert!(is_rejected_content_type("text/html"));
        assert!(!is_rejected_content_type("image/png"));
        assert!(!is_rejected_content_type("application/octet-stream"));
    }

    #[test]
    fn test_locator_kind() {
        assert!(is_remote("http://localhost:8080/api/datasets/assets/1/image"));
        assert!(is_remote("https://cdn.example.com/a.jpg"));
        assert!(!is_remote("/tmp/a.png"));
        assert!(!is_remote("photos/http.png"));
    }

    #[test]
    fn test_load_local_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_preview(path.to_str().unwrap(), None).unwrap();
        assert_eq!((loaded.width, loaded.height), (3, 2));
        assert_eq!(loaded.pixels.len(), 3 * 2 * 4);
    }

    #[test]
    fn test_missing_and_corrupt_files_fail() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        assert!(matches!(
            load_image(&missing),
            Err(ImageLoadError::Io(_))
        ));

        let corrupt = dir.path().join("corrupt.png");
        std::fs::write(&corrupt, b"not an image").unwrap();
        assert!(matches!(
            load_image(&corrupt),
            Err(ImageLoadError::Decode(_))
        ));
    }
}
