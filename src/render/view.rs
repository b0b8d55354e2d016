use image::RgbaImage;

use super::{render_overlay, CanvasSize, OverlayFont, TextMode};
use crate::error::OverlayError;
use crate::model::TextLine;
use crate::source::SourceImage;

/// Everything the overlay depends on; any change triggers a full redraw
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayProps {
    pub source: SourceImage,
    pub lines: Vec<TextLine>,
    pub mode: TextMode,
    pub size: CanvasSize,
}

/// Overlay surface that is redrawn from scratch whenever its props change
pub struct OverlayView {
    font: Option<OverlayFont>,
    drawn: Option<OverlayProps>,
    surface: Option<RgbaImage>,
}

impl OverlayView {
    pub fn new(font: Option<OverlayFont>) -> Self {
        Self {
            font,
            drawn: None,
            surface: None,
        }
    }

    /// Redraw if `props` differ from the last successful draw.
    /// Returns whether a redraw happened. On decode failure the previous
    /// surface is left as it was.
    pub async fn update(&mut self, props: &OverlayProps) -> Result<bool, OverlayError> {
        if self.drawn.as_ref() == Some(props) {
            return Ok(false);
        }

        let image = render_overlay(
            &props.source,
            &props.lines,
            props.mode,
            props.size,
            self.font.as_ref(),
        )
        .await?;

        self.surface = Some(image);
        self.drawn = Some(props.clone());
        Ok(true)
    }

    pub fn surface(&self) -> Option<&RgbaImage> {
        self.surface.as_ref()
    }
}
