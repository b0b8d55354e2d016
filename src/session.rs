//! Control surface state: the selected file, language choices, the active
//! result and the original/translation toggle.

use std::fmt;

use crate::client::InferenceService;
use crate::error::OverlayError;
use crate::languages::{self, Language};
use crate::model::{InferRequest, InferResult};
use crate::render::{CanvasSize, OverlayProps, TextMode};
use crate::source::SourceImage;

/// Receives the blocking notification raised when a submission fails
pub trait Notifier {
    fn notify(&self, message: &str);
}

impl<F: Fn(&str)> Notifier for F {
    fn notify(&self, message: &str) {
        self(message)
    }
}

#[derive(Debug, Clone)]
pub struct ControlState {
    selected: Option<SourceImage>,
    source_language: Language,
    target_language: Language,
    result: Option<InferResult>,
    mode: TextMode,
    loading: bool,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            selected: None,
            source_language: languages::SOURCE_LANGUAGES[0],
            target_language: languages::TARGET_LANGUAGES[0],
            result: None,
            mode: TextMode::default(),
            loading: false,
        }
    }
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the image for the next submission; the current result stays
    pub fn select(&mut self, image: SourceImage) {
        tracing::debug!("Selected {}", image.name());
        self.selected = Some(image);
    }

    pub fn set_source_language(&mut self, code: &str) -> Result<(), OverlayError> {
        self.source_language = languages::source_language(code)?;
        Ok(())
    }

    pub fn set_target_language(&mut self, code: &str) -> Result<(), OverlayError> {
        self.target_language = languages::target_language(code)?;
        Ok(())
    }

    pub fn source_language(&self) -> Language {
        self.source_language
    }

    pub fn target_language(&self) -> Language {
        self.target_language
    }

    pub fn mode(&self) -> TextMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TextMode) {
        self.mode = mode;
    }

    pub fn toggle_translation(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&InferResult> {
        self.result.as_ref()
    }

    /// Request body for the selected image
    pub fn request(&self) -> Result<InferRequest, OverlayError> {
        let image = self.selected.as_ref().ok_or(OverlayError::NoImageSelected)?;
        Ok(InferRequest {
            image_b64: image.to_base64(),
            language: self.source_language.code.to_string(),
            target_language: self.target_language.code.to_string(),
        })
    }

    /// Send the selected image to `service`.
    ///
    /// On success the response becomes the active result. On any failure the
    /// notifier is called once and the previous result is kept.
    pub async fn submit<S, N>(&mut self, service: &S, notifier: &N) -> Result<(), OverlayError>
    where
        S: InferenceService,
        N: Notifier + ?Sized,
    {
        let request = self.request()?;

        self.loading = true;
        let outcome = service
            .infer(&request)
            .await
            .and_then(InferResult::into_success);
        self.loading = false;

        match outcome {
            Ok(result) => {
                tracing::info!("Received {} line(s)", result.lines().len());
                self.result = Some(result);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Submission failed: {}", e);
                notifier.notify(&e.notification());
                Err(e)
            }
        }
    }

    pub fn summary(&self) -> Option<Summary> {
        self.result.as_ref().map(|r| Summary {
            processing_time: r.processing_time,
            lines_detected: r.lines().len(),
        })
    }

    /// Full-page text matching the toggle
    pub fn visible_text(&self) -> Option<&str> {
        self.result.as_ref().map(|r| match self.mode {
            TextMode::Original => r.text.as_str(),
            TextMode::Translation => r.translated_text.as_str(),
        })
    }

    /// Overlay inputs, present once a result with at least one line exists
    pub fn overlay_props(&self) -> Option<OverlayProps> {
        let source = self.selected.as_ref()?;
        let result = self.result.as_ref()?;
        if result.lines().is_empty() {
            return None;
        }

        Some(OverlayProps {
            source: source.clone(),
            lines: result.lines().to_vec(),
            mode: self.mode,
            size: CanvasSize::for_page(result.first_page()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Seconds
    pub processing_time: f64,
    pub lines_detected: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processing time: {:.2}s", self.processing_time)?;
        write!(f, "Lines detected: {}", self.lines_detected)
    }
}
