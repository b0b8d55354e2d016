//! Canvas that records draw calls instead of rasterizing them

use image::DynamicImage;

use super::{Canvas, RectF};

const DEFAULT_CHAR_WIDTH: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Background image stretched to the canvas size
    Image { width: u32, height: u32 },
    StrokeRect(RectF),
    FillRect(RectF),
    Text { text: String, x: f32, y: f32 },
}

/// Headless canvas; measures text with a fixed advance per character
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    char_width: f32,
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            char_width: DEFAULT_CHAR_WIDTH,
            commands: Vec::new(),
        }
    }

    pub fn with_char_width(mut self, char_width: f32) -> Self {
        self.char_width = char_width;
        self
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text of every `Text` command, in draw order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of commands drawn on top of the image
    pub fn annotation_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| !matches!(c, DrawCommand::Image { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn draw_image(&mut self, _image: &DynamicImage) {
        self.commands.push(DrawCommand::Image {
            width: self.width,
            height: self.height,
        });
    }

    fn stroke_rect(&mut self, rect: RectF) {
        self.commands.push(DrawCommand::StrokeRect(rect));
    }

    fn fill_rect(&mut self, rect: RectF) {
        self.commands.push(DrawCommand::FillRect(rect));
    }

    fn measure_text(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
        });
    }
}
