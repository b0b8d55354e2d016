//! Selected image file and the encodings the service contracts need

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use crate::error::OverlayError;

/// An image file picked by the user, kept as raw bytes
#[derive(Debug, Clone)]
pub struct SourceImage {
    name: String,
    bytes: Arc<[u8]>,
}

impl PartialEq for SourceImage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes) || self.bytes == other.bytes
    }
}

impl SourceImage {
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk
    pub async fn open(path: &Path) -> Result<Self, OverlayError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| OverlayError::ReadFailed(format!("{}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        tracing::debug!("Read {} ({} bytes)", name, bytes.len());
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Plain base64 of the file, no `data:` prefix
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    /// Decode off the async thread; a corrupt file surfaces as `DecodeFailed`
    pub async fn decode(&self) -> Result<DynamicImage, OverlayError> {
        let bytes = Arc::clone(&self.bytes);
        tokio::task::spawn_blocking(move || decode_bytes(&bytes))
            .await
            .map_err(|e| OverlayError::Internal(format!("Decode task failed: {}", e)))?
    }

    /// Re-encode as JPEG, the format the photo upload sends
    pub async fn to_jpeg(&self) -> Result<Vec<u8>, OverlayError> {
        let bytes = Arc::clone(&self.bytes);
        tokio::task::spawn_blocking(move || {
            let image = decode_bytes(&bytes)?;
            let mut buffer = Vec::new();
            // JPEG has no alpha channel
            DynamicImage::ImageRgb8(image.to_rgb8())
                .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
                .map_err(|e| OverlayError::EncodeFailed(e.to_string()))?;
            Ok(buffer)
        })
        .await
        .map_err(|e| OverlayError::Internal(format!("Encode task failed: {}", e)))?
    }

    /// Name and decoded dimensions, for the selection preview
    pub async fn preview(&self) -> Result<Preview, OverlayError> {
        let (width, height) = self.decode().await?.dimensions();
        Ok(Preview {
            name: self.name.clone(),
            width,
            height,
            size_bytes: self.bytes.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
}

fn decode_bytes(bytes: &[u8]) -> Result<DynamicImage, OverlayError> {
    image::load_from_memory(bytes).map_err(|e| OverlayError::DecodeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([200, 120, 40]));
        let mut buffer = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    #[test]
    fn test_base64_has_no_data_uri_prefix() {
        let source = SourceImage::from_bytes("hello.txt", b"hello".to_vec());
        assert_eq!(source.to_base64(), "aGVsbG8=");
    }

    #[tokio::test]
    async fn test_decode_reports_dimensions() {
        let source = SourceImage::from_bytes("page.png", png_bytes(30, 20));
        let preview = source.preview().await.unwrap();
        assert_eq!((preview.width, preview.height), (30, 20));
        assert_eq!(preview.name, "page.png");
    }

    #[tokio::test]
    async fn test_decode_failure_is_reported() {
        let source = SourceImage::from_bytes("broken.png", b"not an image".to_vec());
        let result = source.decode().await;
        assert!(matches!(result, Err(OverlayError::DecodeFailed(_))));
    }

    #[tokio::test]
    async fn test_jpeg_reencode() {
        let source = SourceImage::from_bytes("page.png", png_bytes(16, 16));
        let jpeg = source.to_jpeg().await.unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let result = SourceImage::open(Path::new("/nonexistent/photo.jpg")).await;
        assert!(matches!(result, Err(OverlayError::ReadFailed(_))));
    }

    #[test]
    fn test_equality_by_content() {
        let a = SourceImage::from_bytes("a.png", vec![1, 2, 3]);
        let b = SourceImage::from_bytes("b.png", vec![1, 2, 3]);
        let c = SourceImage::from_bytes("a.png", vec![4]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
