//! RGBA pixel canvas backed by `image` and `imageproc`

use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{imageops, imageops::FilterType, DynamicImage, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size, Blend,
};
use imageproc::rect::Rect;

use super::font::OverlayFont;
use super::{Canvas, RectF};

/// Nominal font size (em height) in pixels
pub const FONT_SIZE_PX: f32 = 16.0;

const BOX_COLOR: Rgba<u8> = Rgba([0, 0, 0, 128]);
const BACKGROUND_COLOR: Rgba<u8> = Rgba([255, 255, 255, 204]);
const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Canvas that paints into an `RgbaImage`, alpha-blending every draw.
/// Without a font, text measures as zero width and is not drawn.
pub struct RasterCanvas {
    surface: Blend<RgbaImage>,
    font: Option<OverlayFont>,
    scale: PxScale,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32, font: Option<OverlayFont>) -> Self {
        let scale = font
            .as_deref()
            .map(em_scale)
            .unwrap_or_else(|| PxScale::from(FONT_SIZE_PX));

        Self {
            surface: Blend(RgbaImage::new(width, height)),
            font,
            scale,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.surface.0
    }

    pub fn into_image(self) -> RgbaImage {
        self.surface.0
    }

    /// Pixel rect covering `rect`, grown by `extra` pixels to the right and
    /// bottom. Edges are clamped to one pixel outside the surface so
    /// off-canvas edges stay off-canvas. `None` when nothing would be drawn.
    fn pixel_rect(&self, rect: RectF, extra: u32) -> Option<Rect> {
        let (width, height) = self.surface.0.dimensions();
        let clamp_x = |v: f32| v.round().clamp(-1.0, width as f32 + 1.0);
        let clamp_y = |v: f32| v.round().clamp(-1.0, height as f32 + 1.0);

        let (left, right) = (clamp_x(rect.x), clamp_x(rect.x + rect.width));
        let (top, bottom) = (clamp_y(rect.y), clamp_y(rect.y + rect.height));
        // also rejects NaN
        if !(right - left >= 1.0 && bottom - top >= 1.0) {
            return None;
        }

        Some(Rect::at(left as i32, top as i32).of_size(
            (right - left) as u32 + extra,
            (bottom - top) as u32 + extra,
        ))
    }
}

impl Canvas for RasterCanvas {
    fn draw_image(&mut self, image: &DynamicImage) {
        let (width, height) = self.surface.0.dimensions();
        if width == 0 || height == 0 {
            return;
        }
        let stretched = image.resize_exact(width, height, FilterType::Triangle).to_rgba8();
        imageops::overlay(&mut self.surface.0, &stretched, 0, 0);
    }

    fn stroke_rect(&mut self, rect: RectF) {
        // Zero-area boxes are skipped; the outline passes through both corners
        let Some(outline) = self.pixel_rect(rect, 1) else {
            return;
        };
        draw_hollow_rect_mut(&mut self.surface, outline, BOX_COLOR);
    }

    fn fill_rect(&mut self, rect: RectF) {
        let Some(area) = self.pixel_rect(rect, 0) else {
            return;
        };
        draw_filled_rect_mut(&mut self.surface, area, BACKGROUND_COLOR);
    }

    fn measure_text(&self, text: &str) -> f32 {
        match &self.font {
            Some(font) => text_size(self.scale, &**font, text).0 as f32,
            None => 0.0,
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let Some(font) = self.font.as_deref() else {
            return;
        };
        let (width, height) = self.surface.0.dimensions();
        let scaled = font.as_scaled(self.scale);
        // draw_text_mut takes the top of the line, we are given the baseline
        let top = y - scaled.ascent();
        let right = x + text_size(self.scale, font, text).0 as f32;

        // nothing visible, and far-off origins would overflow glyph placement
        let visible = x < width as f32
            && right >= 0.0
            && top < height as f32
            && top + scaled.height() >= 0.0;
        if !visible {
            return;
        }

        draw_text_mut(
            &mut self.surface,
            TEXT_COLOR,
            x.round() as i32,
            top.round() as i32,
            self.scale,
            font,
            text,
        );
    }
}

/// Scale at which one em is `FONT_SIZE_PX` tall
fn em_scale(font: &FontVec) -> PxScale {
    let height = font.height_unscaled();
    let units_per_em = font.units_per_em().unwrap_or(height);
    PxScale::from(FONT_SIZE_PX * height / units_per_em)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, TextLine};
    use crate::render::font::fixture_font;
    use crate::render::{paint, TextMode};
    use image::{Rgb, RgbImage};

    fn page_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(60, 40, |x, y| {
            Rgb([(x * 4) as u8, (y * 6) as u8, 200])
        }))
    }

    fn line(bbox: [f32; 4]) -> TextLine {
        TextLine {
            text: "abc".to_string(),
            translation: "xyz".to_string(),
            bbox: BBox::from(bbox),
            polygon: vec![],
        }
    }

    #[test]
    fn test_image_is_stretched_to_canvas() {
        let mut canvas = RasterCanvas::new(120, 80, None);
        canvas.draw_image(&page_image());

        let out = canvas.image();
        assert_eq!(out.dimensions(), (120, 80));
        assert!(out.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_box_outline_touches_both_corners() {
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 100, Rgb([255, 255, 255])));
        let mut canvas = RasterCanvas::new(200, 100, None);
        canvas.draw_image(&white);
        canvas.stroke_rect(RectF::new(10.0, 10.0, 90.0, 30.0));

        let out = canvas.image();
        // half transparent black over white
        assert!(out.get_pixel(10, 10).0[0] < 255);
        assert!(out.get_pixel(100, 40).0[0] < 255);
        assert!(out.get_pixel(55, 10).0[0] < 255);
        // interior and outside untouched
        assert_eq!(out.get_pixel(55, 25).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(101, 41).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_degenerate_box_draws_nothing() {
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 50, Rgb([255, 255, 255])));
        let mut canvas = RasterCanvas::new(50, 50, None);
        canvas.draw_image(&white);
        canvas.stroke_rect(RectF::new(20.0, 5.0, 0.0, 30.0));
        canvas.stroke_rect(RectF::new(5.0, 20.0, 30.0, 0.0));

        assert!(canvas.image().pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_huge_box_is_clipped_to_the_canvas() {
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb([255, 255, 255])));
        let lines = vec![
            line([0.0, 0.0, 5e9, 10.0]),
            line([5e9, 2.0, 6e9, 12.0]),
            line([-5e9, -5e9, -4e9, 5e9]),
        ];
        let mut canvas = RasterCanvas::new(20, 20, Some(fixture_font()));
        paint(&mut canvas, &white, &lines, TextMode::Translation);

        let out = canvas.image();
        // top and left edges of the first box are still drawn
        assert!(out.get_pixel(5, 0).0[0] < 255);
        assert!(out.get_pixel(0, 5).0[0] < 255);
        // its right edge lies far off-canvas
        assert_eq!(out.get_pixel(19, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_measure_text_uses_font() {
        let canvas = RasterCanvas::new(200, 100, Some(fixture_font()));
        let hello = canvas.measure_text("Hello");
        assert!(hello > 0.0);
        assert!(canvas.measure_text("Hello, world") > hello);
        assert_eq!(canvas.measure_text(""), 0.0);
    }

    #[test]
    fn test_text_sits_inside_its_background() {
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(200, 100, Rgb([255, 255, 255])));
        let mut canvas = RasterCanvas::new(200, 100, Some(fixture_font()));
        let text_width = canvas.measure_text("Hello");
        let mut hello = line([10.0, 10.0, 100.0, 40.0]);
        hello.translation = "Hello".to_string();
        paint(&mut canvas, &white, &[hello], TextMode::Translation);

        // baseline at 10 + 15 + 6, centered in the 90px box
        let text_x = 10.0 + (90.0 - text_width) / 2.0;
        let text_y = 31.0;
        let left = text_x - 4.0;
        let top = text_y - 14.0;
        let right = left + text_width + 8.0;
        let bottom = top + 18.0;

        // skip the box outline, whose corners are blended twice
        let dark: Vec<(u32, u32)> = canvas
            .image()
            .enumerate_pixels()
            .filter(|(x, y, _)| ![10, 100].contains(x) && ![10, 40].contains(y))
            .filter(|(_, _, p)| p.0[0] < 100)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!dark.is_empty());
        for (x, y) in dark {
            let (x, y) = (x as f32, y as f32);
            assert!(x >= left && x < right, "x={} outside {}..{}", x, left, right);
            assert!(y >= top && y < bottom, "y={} outside {}..{}", y, top, bottom);
        }
    }

    #[test]
    fn test_background_is_drawn_without_font() {
        let black = DynamicImage::ImageRgb8(RgbImage::new(50, 50));
        let mut canvas = RasterCanvas::new(50, 50, None);
        canvas.draw_image(&black);
        assert_eq!(canvas.measure_text("hello"), 0.0);

        canvas.fill_rect(RectF::new(10.0, 10.0, 8.0, 18.0));
        let out = canvas.image();
        assert!(out.get_pixel(12, 15).0[0] > 150);
        assert_eq!(out.get_pixel(30, 30).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_painting_twice_is_pixel_identical() {
        let lines = vec![line([5.0, 5.0, 40.0, 20.0]), line([10.0, 22.0, 50.0, 38.0])];
        let render = || {
            let mut canvas = RasterCanvas::new(60, 40, None);
            paint(&mut canvas, &page_image(), &lines, TextMode::Translation);
            canvas.into_image()
        };

        assert_eq!(render(), render());
    }

    #[test]
    fn test_empty_lines_leave_only_the_image() {
        let mut painted = RasterCanvas::new(60, 40, None);
        paint(&mut painted, &page_image(), &[], TextMode::Original);

        let mut plain = RasterCanvas::new(60, 40, None);
        plain.draw_image(&page_image());

        assert_eq!(painted.into_image(), plain.into_image());
    }
}
