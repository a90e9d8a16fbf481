//! Preview renderer for stamp layouts
//!
//! Draws placements onto a [`PreviewCanvas`] in page millimetres. The shipped
//! canvas, [`PixmapCanvas`], rasterises with tiny-skia and exports an
//! `image::RgbImage` ready to be written as PNG.
//!
//! Every distinct symbol gets its own hue, so tool groups are easy to tell
//! apart. Placements that skip the ink pad are drawn fainter.

use crate::font_manager;
use image::{Rgb, RgbImage};
use rusttype::{point as rt_point, Font, Scale};
use serde::{Deserialize, Serialize};
use stampkit_core::units::{mm_to_px, pixels_per_mm, DEFAULT_PREVIEW_DPI};
use stampkit_core::{Error, PageSpec, Placement, Result};
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::debug;

/// Arrow size relative to the stamp
const ARROW_SCALE: f64 = 0.666;
/// Radius of the centre marker (mm)
const CENTRE_DOT_RADIUS: f64 = 0.25;
/// Alpha for placements that do not re-ink
const DRY_ALPHA: u8 = 140;

/// An 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl PreviewColor {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREY: Self = Self::rgb(153, 153, 153);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Colour from hue (degrees), saturation and lightness in `[0, 1]`
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Self::rgb(channel(r), channel(g), channel(b))
    }
}

/// Drawing surface in page millimetres
pub trait PreviewCanvas {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: PreviewColor);

    fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
        color: PreviewColor,
    );

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: PreviewColor);

    /// Fill a closed polygon
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: PreviewColor);

    /// Draw a text label centred on a point
    fn draw_glyph(&mut self, symbol: &str, cx: f64, cy: f64, size: f64, color: PreviewColor);
}

/// How each placement is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewStyle {
    /// Footprint outline, centred label and a centre dot
    #[default]
    Glyph,
    /// Filled square of the stamp size
    Block,
    /// Filled arrow rotated with the placement
    Arrow,
}

/// Preview settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreviewOptions {
    pub style: PreviewStyle,
    /// Side of the stamp footprint (mm)
    pub stamp_size: f64,
    pub dpi: f64,
    /// Face for glyph labels, a system monospace face when absent
    pub label_family: Option<String>,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            style: PreviewStyle::Glyph,
            stamp_size: 10.0,
            dpi: DEFAULT_PREVIEW_DPI,
            label_family: None,
        }
    }
}

/// Distinct symbols in first-seen order
pub fn symbol_order(placements: &[Placement]) -> Vec<&str> {
    let mut order: Vec<&str> = Vec::new();
    for placement in placements {
        if !order.contains(&placement.symbol.as_str()) {
            order.push(placement.symbol.as_str());
        }
    }
    order
}

/// One hue per symbol, evenly spread around the wheel
pub fn palette(count: usize) -> Vec<PreviewColor> {
    (0..count)
        .map(|i| PreviewColor::from_hsl(i as f64 / count as f64 * 360.0, 1.0, 0.5))
        .collect()
}

/// Corners of an up-pointing arrow centred on the origin
fn arrow_points(size: f64) -> [(f64, f64); 3] {
    let half = size * ARROW_SCALE / 2.0;
    [(0.0, -half), (-half * 0.8, half), (half * 0.8, half)]
}

/// Rotate clockwise (y down) and move to `(cx, cy)`
fn place_point((x, y): (f64, f64), degrees: f64, cx: f64, cy: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (cx + x * cos - y * sin, cy + x * sin + y * cos)
}

/// Draw a layout preview
pub fn render_preview<C: PreviewCanvas + ?Sized>(
    placements: &[Placement],
    page: &PageSpec,
    options: &PreviewOptions,
    canvas: &mut C,
) {
    canvas.fill_rect(0.0, 0.0, page.width, page.height, PreviewColor::WHITE);
    canvas.stroke_rect(
        page.border.left,
        page.border.top,
        page.usable_width(),
        page.usable_height(),
        0.2,
        PreviewColor::BLACK,
    );

    let symbols = symbol_order(placements);
    let colors = palette(symbols.len());
    let size = options.stamp_size;
    let half = size / 2.0;

    for placement in placements {
        let index = symbols
            .iter()
            .position(|s| *s == placement.symbol)
            .unwrap_or(0);
        let mut color = colors.get(index).copied().unwrap_or(PreviewColor::BLACK);
        if !placement.reink {
            color = color.with_alpha(DRY_ALPHA);
        }
        let (x, y) = (placement.x, placement.y);

        match options.style {
            PreviewStyle::Glyph => {
                canvas.stroke_rect(x - half, y - half, size, size, 0.1, PreviewColor::GREY);
                canvas.draw_glyph(&placement.symbol, x, y, size * 0.8, color);
                canvas.fill_circle(x, y, CENTRE_DOT_RADIUS, PreviewColor::RED);
            }
            PreviewStyle::Block => canvas.fill_rect(x - half, y - half, size, size, color),
            PreviewStyle::Arrow => {
                let points = arrow_points(size).map(|p| place_point(p, placement.rotation, x, y));
                canvas.fill_polygon(&points, color);
            }
        }
    }

    debug!(
        "Rendered {} placements in {} colours",
        placements.len(),
        symbols.len()
    );
}

fn skia_color(color: PreviewColor) -> Color {
    Color::from_rgba8(color.r, color.g, color.b, color.a)
}

fn paint(color: PreviewColor) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}

/// tiny-skia raster canvas at a fixed resolution
pub struct PixmapCanvas {
    pixmap: Pixmap,
    pixels_per_mm: f64,
    font: Option<&'static Font<'static>>,
}

impl PixmapCanvas {
    /// Canvas covering the whole page at `dpi`
    pub fn new(page: &PageSpec, dpi: f64) -> Result<Self> {
        let ppm = pixels_per_mm(dpi);
        let width = (page.width * ppm).round() as u32;
        let height = (page.height * ppm).round() as u32;
        let pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::other(format!("Cannot allocate a {}x{} preview", width, height))
        })?;
        Ok(Self {
            pixmap,
            pixels_per_mm: ppm,
            font: font_manager::label_font(),
        })
    }

    /// Canvas for a page using the preview options
    pub fn for_options(page: &PageSpec, options: &PreviewOptions) -> Result<Self> {
        let mut canvas = Self::new(page, options.dpi)?;
        if let Some(family) = &options.label_family {
            canvas.font = font_manager::get_font_for(family);
        }
        Ok(canvas)
    }

    /// Replace the label face; `None` disables labels
    pub fn with_font(mut self, font: Option<&'static Font<'static>>) -> Self {
        self.font = font;
        self
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn px(&self, mm: f64) -> f32 {
        mm_to_px(mm, self.pixels_per_mm)
    }

    /// Colour of one pixel, for inspection
    pub fn pixel(&self, x: u32, y: u32) -> Option<PreviewColor> {
        let pixel = self.pixmap.pixel(x, y)?.demultiply();
        Some(PreviewColor {
            r: pixel.red(),
            g: pixel.green(),
            b: pixel.blue(),
            a: pixel.alpha(),
        })
    }

    /// Flatten to RGB, ignoring alpha
    pub fn to_rgb_image(&self) -> RgbImage {
        let width = self.pixmap.width();
        let data = self.pixmap.data();
        RgbImage::from_fn(width, self.pixmap.height(), |x, y| {
            let idx = ((y * width + x) * 4) as usize;
            Rgb([data[idx], data[idx + 1], data[idx + 2]])
        })
    }

    fn blend_pixel(&mut self, px: i32, py: i32, color: PreviewColor, coverage: f32) {
        let (width, height) = (self.pixmap.width() as i32, self.pixmap.height() as i32);
        if px < 0 || py < 0 || px >= width || py >= height {
            return;
        }
        let alpha = (coverage.clamp(0.0, 1.0) * color.a as f32) as u16;
        if alpha == 0 {
            return;
        }
        let idx = ((py * width + px) * 4) as usize;
        let pixel = &mut self.pixmap.data_mut()[idx..idx + 4];
        for (dst, src) in pixel.iter_mut().zip([color.r, color.g, color.b]) {
            *dst = ((src as u16 * alpha + *dst as u16 * (255 - alpha)) / 255) as u8;
        }
        pixel[3] = 255;
    }
}

impl PreviewCanvas for PixmapCanvas {
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: PreviewColor) {
        if let Some(rect) = Rect::from_xywh(self.px(x), self.px(y), self.px(width), self.px(height))
        {
            self.pixmap
                .fill_rect(rect, &paint(color), Transform::identity(), None);
        }
    }

    fn stroke_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        line_width: f64,
        color: PreviewColor,
    ) {
        let Some(rect) = Rect::from_xywh(self.px(x), self.px(y), self.px(width), self.px(height))
        else {
            return;
        };
        let path = PathBuilder::from_rect(rect);
        let stroke = Stroke {
            width: self.px(line_width).max(1.0),
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: PreviewColor) {
        if let Some(path) = PathBuilder::from_circle(self.px(cx), self.px(cy), self.px(radius)) {
            self.pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: PreviewColor) {
        let mut pb = PathBuilder::new();
        for (i, &(x, y)) in points.iter().enumerate() {
            if i == 0 {
                pb.move_to(self.px(x), self.px(y));
            } else {
                pb.line_to(self.px(x), self.px(y));
            }
        }
        pb.close();
        if let Some(path) = pb.finish() {
            self.pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    fn draw_glyph(&mut self, symbol: &str, cx: f64, cy: f64, size: f64, color: PreviewColor) {
        let Some(font) = self.font else {
            return;
        };
        let scale = Scale::uniform(self.px(size));
        let v_metrics = font.v_metrics(scale);
        let advance: f32 = font
            .glyphs_for(symbol.chars())
            .map(|g| g.scaled(scale).h_metrics().advance_width)
            .sum();
        let start = rt_point(
            self.px(cx) - advance / 2.0,
            self.px(cy) + (v_metrics.ascent + v_metrics.descent) / 2.0,
        );

        let glyphs: Vec<_> = font.layout(symbol, scale, start).collect();
        for glyph in glyphs {
            if let Some(bounding_box) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = gx as i32 + bounding_box.min.x;
                    let py = gy as i32 + bounding_box.min.y;
                    self.blend_pixel(px, py, color, v);
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stampkit_core::Border;

    #[derive(Default)]
    struct RecordingCanvas {
        rects: Vec<(f64, f64, f64, f64, PreviewColor)>,
        glyphs: Vec<String>,
        polygons: Vec<Vec<(f64, f64)>>,
    }

    impl PreviewCanvas for RecordingCanvas {
        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: PreviewColor) {
            self.rects.push((x, y, w, h, color));
        }
        fn stroke_rect(&mut self, _: f64, _: f64, _: f64, _: f64, _: f64, _: PreviewColor) {}
        fn fill_circle(&mut self, _: f64, _: f64, _: f64, _: PreviewColor) {}
        fn fill_polygon(&mut self, points: &[(f64, f64)], _: PreviewColor) {
            self.polygons.push(points.to_vec());
        }
        fn draw_glyph(&mut self, symbol: &str, _: f64, _: f64, _: f64, _: PreviewColor) {
            self.glyphs.push(symbol.to_string());
        }
    }

    fn page() -> PageSpec {
        PageSpec::new(50.0, 40.0, Border::uniform(5.0))
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(PreviewColor::from_hsl(0.0, 1.0, 0.5), PreviewColor::rgb(255, 0, 0));
        assert_eq!(PreviewColor::from_hsl(120.0, 1.0, 0.5), PreviewColor::rgb(0, 255, 0));
        assert_eq!(PreviewColor::from_hsl(240.0, 1.0, 0.5), PreviewColor::rgb(0, 0, 255));
        assert_eq!(palette(3)[1], PreviewColor::rgb(0, 255, 0));
    }

    #[test]
    fn test_block_style_colours_by_symbol() {
        let placements = vec![
            Placement::new("A", 10.0, 10.0),
            Placement::new("B", 20.0, 10.0),
            Placement::new("A", 30.0, 10.0),
        ];
        let options = PreviewOptions {
            style: PreviewStyle::Block,
            stamp_size: 4.0,
            ..PreviewOptions::default()
        };
        let mut canvas = RecordingCanvas::default();
        render_preview(&placements, &page(), &options, &mut canvas);

        // background first, then one block per placement
        assert_eq!(canvas.rects.len(), 4);
        assert_eq!(canvas.rects[0].4, PreviewColor::WHITE);
        assert_eq!(canvas.rects[1].0, 8.0);
        assert_eq!(canvas.rects[1].4, canvas.rects[3].4);
        assert_ne!(canvas.rects[1].4, canvas.rects[2].4);
    }

    #[test]
    fn test_glyph_and_arrow_styles() {
        let placements = vec![Placement::new("7", 10.0, 10.0).with_rotation(90.0)];
        let mut canvas = RecordingCanvas::default();
        render_preview(&placements, &page(), &PreviewOptions::default(), &mut canvas);
        assert_eq!(canvas.glyphs, ["7"]);

        let options = PreviewOptions {
            style: PreviewStyle::Arrow,
            ..PreviewOptions::default()
        };
        let mut canvas = RecordingCanvas::default();
        render_preview(&placements, &page(), &options, &mut canvas);
        let tip = canvas.polygons[0][0];
        // an up arrow turned 90 degrees clockwise points right
        assert!(tip.0 > 10.0);
        assert!((tip.1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_pixmap_canvas_draws_blocks() {
        let placements = vec![Placement::new("A", 25.0, 20.0)];
        let options = PreviewOptions {
            style: PreviewStyle::Block,
            stamp_size: 10.0,
            dpi: 25.4,
            label_family: None,
        };
        let mut canvas = PixmapCanvas::new(&page(), options.dpi)
            .unwrap()
            .with_font(None);
        render_preview(&placements, &page(), &options, &mut canvas);

        assert_eq!((canvas.width(), canvas.height()), (50, 40));
        assert_eq!(canvas.pixel(25, 20), Some(PreviewColor::rgb(255, 0, 0)));
        assert_eq!(canvas.pixel(2, 2), Some(PreviewColor::WHITE));

        let image = canvas.to_rgb_image();
        assert_eq!(image.get_pixel(25, 20), &Rgb([255, 0, 0]));
    }
}
