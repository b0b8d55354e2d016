//! Wire types shared with the inference service.
//!
//! Everything here is request-scoped: built when a response arrives and
//! replaced by the next successful submission.

use serde::{Deserialize, Serialize};

use crate::error::OverlayError;

/// Axis-aligned box in native image pixels, `[x1, y1, x2, y2]` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Horizontal extent, zero for inverted boxes
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }
}

impl From<[f32; 4]> for BBox {
    fn from([x1, y1, x2, y2]: [f32; 4]) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// One detected line of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub text: String,
    pub translation: String,
    pub bbox: BBox,
    /// Detection outline, carried for completeness; the renderer only uses `bbox`
    #[serde(default)]
    pub polygon: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub lines: Vec<TextLine>,
}

/// Full response of `POST /infer`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferResult {
    pub success: bool,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub translated_text: String,
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Seconds spent by the service
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InferResult {
    /// Turn an application-level failure (`success: false`) into an error
    pub fn into_success(self) -> Result<Self, OverlayError> {
        if self.success {
            Ok(self)
        } else {
            let message = self
                .error
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| "unknown error".to_string());
            Err(OverlayError::Rejected(message))
        }
    }

    /// The page the overlay renders
    pub fn first_page(&self) -> Option<&Page> {
        self.pages.first()
    }

    /// Lines of the first page, empty when there is none
    pub fn lines(&self) -> &[TextLine] {
        self.first_page().map(|p| p.lines.as_slice()).unwrap_or(&[])
    }
}

/// Body of `POST /infer`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferRequest {
    /// Base64 of the raw file, without a `data:` prefix
    pub image_b64: String,
    pub language: String,
    pub target_language: String,
}

/// Response of the legacy multipart `/ocr-translate` endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LegacyTranslation {
    pub ocr_text: String,
    pub translated_text: String,
}

/// Response of `GET /`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_response() {
        let json = r#"{
            "success": true,
            "text": "ನಮಸ್ಕಾರ",
            "translated_text": "Hello",
            "pages": [{"width": 600, "height": 800, "lines": [
                {"text": "ನಮಸ್ಕಾರ", "translation": "Hello", "bbox": [10, 10, 100, 40], "polygon": [[10, 10], [100, 10], [100, 40], [10, 40]]}
            ]}],
            "processing_time": 1.2
        }"#;
        let result: InferResult = serde_json::from_str(json).unwrap();
        assert!(result.success);
        assert_eq!(result.pages.len(), 1);
        assert_eq!(result.pages[0].width, 600.0);

        let line = &result.lines()[0];
        assert_eq!(line.bbox, BBox::new(10.0, 10.0, 100.0, 40.0));
        assert_eq!(line.polygon.len(), 4);
        assert_eq!(line.translation, "Hello");
        assert!(result.error.is_none());
    }

    #[test]
    fn test_parses_failure_without_pages() {
        let result: InferResult =
            serde_json::from_str(r#"{"success": false, "error": "decode failed"}"#).unwrap();
        assert!(result.pages.is_empty());
        assert!(result.lines().is_empty());

        match result.into_success() {
            Err(OverlayError::Rejected(message)) => assert_eq!(message, "decode failed"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_without_message() {
        let result: InferResult = serde_json::from_str(r#"{"success": false}"#).unwrap();
        let err = result.into_success().unwrap_err();
        assert_eq!(err.to_string(), "Inference failed: unknown error");
    }

    #[test]
    fn test_bbox_serializes_as_array() {
        let json = serde_json::to_string(&BBox::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json, "[1.0,2.0,3.0,4.0]");
    }

    #[test]
    fn test_bbox_extent() {
        let bbox = BBox::new(10.0, 10.0, 100.0, 40.0);
        assert_eq!((bbox.width(), bbox.height()), (90.0, 30.0));
        assert_eq!(BBox::new(5.0, 5.0, 5.0, 30.0).width(), 0.0);
        assert_eq!(BBox::new(30.0, 30.0, 5.0, 5.0).height(), 0.0);
    }

    #[test]
    fn test_request_field_names() {
        let request = InferRequest {
            image_b64: "aGVsbG8=".to_string(),
            language: "kan_Knda".to_string(),
            target_language: "eng_Latn".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["image_b64"], "aGVsbG8=");
        assert_eq!(value["language"], "kan_Knda");
        assert_eq!(value["target_language"], "eng_Latn");
    }
}
