//! Overlay rendering
//!
//! Draws the source image stretched to the canvas, then every detected line's
//! box with its text centered on a light background. Box coordinates are used
//! exactly as the service returns them, in native image pixels, even when the
//! canvas is smaller than the page.

pub mod font;
pub mod raster;
pub mod recording;
pub mod view;

pub use font::{resolve_font, OverlayFont};
pub use raster::RasterCanvas;
pub use recording::{DrawCommand, RecordingCanvas};
pub use view::{OverlayProps, OverlayView};

use image::{DynamicImage, RgbaImage};

use crate::error::OverlayError;
use crate::model::{Page, TextLine};
use crate::source::SourceImage;

/// Added to the vertical box center to place the text baseline
pub const TEXT_BASELINE_OFFSET: f32 = 6.0;
/// Horizontal padding of the text background on each side
pub const BACKGROUND_PADDING: f32 = 4.0;
/// Distance from the baseline up to the top of the text background
pub const BACKGROUND_RISE: f32 = 14.0;
pub const BACKGROUND_HEIGHT: f32 = 18.0;

/// Canvas size used before any page is known
pub const DEFAULT_CANVAS_WIDTH: f32 = 600.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 800.0;
/// Widest canvas the control surface asks for
pub const MAX_DISPLAY_WIDTH: f32 = 1000.0;

/// Rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Which text of a line is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextMode {
    Original,
    #[default]
    Translation,
}

impl TextMode {
    pub fn from_show_translation(show_translation: bool) -> Self {
        if show_translation {
            Self::Translation
        } else {
            Self::Original
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Original => Self::Translation,
            Self::Translation => Self::Original,
        }
    }

    pub fn select(self, line: &TextLine) -> &str {
        match self {
            Self::Original => &line.text,
            Self::Translation => &line.translation,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::Translation => "Translation",
        }
    }
}

/// Output surface dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Display size for a page: width capped at 1000px, height following the
    /// page aspect ratio. Falls back to 600x800 without a page.
    pub fn for_page(page: Option<&Page>) -> Self {
        let width = page
            .map(|p| p.width)
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_CANVAS_WIDTH);
        let height = page
            .map(|p| p.height)
            .filter(|h| *h > 0.0)
            .unwrap_or(DEFAULT_CANVAS_HEIGHT);

        let display_width = width.min(MAX_DISPLAY_WIDTH);
        let display_height = display_width / width * height;

        Self {
            width: (display_width as u32).max(1),
            height: (display_height as u32).max(1),
        }
    }
}

/// Drawing surface the overlay is painted on
pub trait Canvas {
    /// Draw the image stretched over the whole surface
    fn draw_image(&mut self, image: &DynamicImage);

    /// Outline a box
    fn stroke_rect(&mut self, rect: RectF);

    /// Fill the background behind a text label
    fn fill_rect(&mut self, rect: RectF);

    /// Rendered width of `text` in the active font
    fn measure_text(&self, text: &str) -> f32;

    /// Draw `text` with its left edge at `x` and its baseline at `y`
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
}

/// Paint the decoded image and every line onto `canvas`, in input order
pub fn paint<C: Canvas>(canvas: &mut C, image: &DynamicImage, lines: &[TextLine], mode: TextMode) {
    canvas.draw_image(image);

    for line in lines {
        let bbox = line.bbox;
        let box_width = bbox.width();
        let box_height = bbox.height();

        canvas.stroke_rect(RectF::new(bbox.x1, bbox.y1, box_width, box_height));

        let text = mode.select(line);
        let text_width = canvas.measure_text(text);
        let text_x = bbox.x1 + (box_width - text_width) / 2.0;
        let text_y = bbox.y1 + box_height / 2.0 + TEXT_BASELINE_OFFSET;

        canvas.fill_rect(RectF::new(
            text_x - BACKGROUND_PADDING,
            text_y - BACKGROUND_RISE,
            text_width + BACKGROUND_PADDING * 2.0,
            BACKGROUND_HEIGHT,
        ));
        canvas.fill_text(text, text_x, text_y);
    }
}

/// Decode `source` and render a fresh overlay of `size`
pub async fn render_overlay(
    source: &SourceImage,
    lines: &[TextLine],
    mode: TextMode,
    size: CanvasSize,
    font: Option<&OverlayFont>,
) -> Result<RgbaImage, OverlayError> {
    let image = source.decode().await?;

    let mut canvas = RasterCanvas::new(size.width, size.height, font.cloned());
    paint(&mut canvas, &image, lines, mode);

    tracing::debug!(
        "Rendered {} line(s) onto {}x{} canvas ({})",
        lines.len(),
        size.width,
        size.height,
        mode.label()
    );

    Ok(canvas.into_image())
}
