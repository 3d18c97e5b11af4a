pub mod font;
pub mod palette;

use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{DynamicImage, ImageFormat, RgbaImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size},
    rect::Rect,
};

use crate::{
    error::Result,
    models::{BoundingBox, Detection},
    upload::UploadedImage,
};

pub use palette::{Color, color_for_class};

/// Height of the filled strip behind a label.
pub const LABEL_HEIGHT: u32 = 20;
/// Horizontal padding added to the measured text width.
pub const LABEL_PADDING: u32 = 10;
/// Text starts this far right of the box's left edge.
pub const TEXT_INSET_X: i32 = 5;
/// Text baseline sits this far above the box's top edge.
pub const TEXT_BASELINE_OFFSET: i32 = 5;
pub const FONT_SIZE: f32 = 14.0;
/// Width used per character when no font is available to measure with.
pub const FALLBACK_CHAR_WIDTH: u32 = 7;

/// Axis-aligned rectangle in surface pixels. May extend past the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Box coordinates are clamped to this many pixels either side of the origin
/// so offsets from them stay within `i32`.
pub const COORD_LIMIT: f32 = 16_777_216.0;

impl PixelRect {
    /// Round `bbox` to whole pixels.
    ///
    /// Negative extents are flipped so the box spans toward the left or upward,
    /// and anything far off the surface is pulled in to [`COORD_LIMIT`].
    pub fn from_box(bbox: &BoundingBox) -> Self {
        let bbox = bbox.normalized();
        let coord = |v: f32| v.round().clamp(-COORD_LIMIT, COORD_LIMIT) as i32;
        let extent = |v: f32| v.round().clamp(1.0, COORD_LIMIT) as u32;
        Self {
            x: coord(bbox.x),
            y: coord(bbox.y),
            width: extent(bbox.width),
            height: extent(bbox.height),
        }
    }

    fn to_rect(self) -> Rect {
        Rect::at(self.x, self.y).of_size(self.width.max(1), self.height.max(1))
    }
}

/// What was painted for a single detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub bbox: PixelRect,
    pub color: Color,
    pub label: String,
    /// Filled strip behind the label text.
    pub label_rect: PixelRect,
    /// Whether glyphs were rasterized (requires a font).
    pub text_drawn: bool,
}

/// Source image with detections painted on top.
#[derive(Debug, Clone)]
pub struct AnnotatedImage {
    surface: RgbaImage,
    annotations: Vec<Annotation>,
}

impl AnnotatedImage {
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn into_surface(self) -> RgbaImage {
        self.surface
    }

    /// Annotations in draw order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Save the surface; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.surface.save(path)?;
        Ok(())
    }

    /// Encode the surface as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut out = std::io::Cursor::new(Vec::new());
        self.surface.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}

/// Paints detection boxes and labels over an image.
#[derive(Clone, Default)]
pub struct Renderer {
    font: Option<FontArc>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl Renderer {
    /// Renderer without a font: label strips are painted, text is not.
    pub fn new() -> Self {
        Self { font: None }
    }

    pub fn with_font(font: FontArc) -> Self {
        Self { font: Some(font) }
    }

    /// Use the font at `path`, or the first system font found when `path` is `None`.
    pub fn from_font_path(path: Option<&Path>) -> Result<Self> {
        let font = match path {
            Some(path) => Some(font::load_font(path)?),
            None => font::find_system_font(),
        };
        if font.is_none() {
            tracing::warn!("no font available, labels will be drawn without text");
        }
        Ok(Self { font })
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Decode `image` and paint `detections` over it.
    pub fn render(&self, image: &UploadedImage, detections: &[Detection]) -> Result<AnnotatedImage> {
        let background = image.decode()?;
        Ok(self.render_image(&background, detections))
    }

    /// Paint `detections` over an already decoded image.
    ///
    /// The surface has the image's native size. Detections are painted in
    /// order, each as box, label strip, then text.
    pub fn render_image(&self, background: &DynamicImage, detections: &[Detection]) -> AnnotatedImage {
        let mut surface = background.to_rgba8();
        let annotations = detections
            .iter()
            .map(|detection| self.paint_detection(&mut surface, detection))
            .collect();

        AnnotatedImage {
            surface,
            annotations,
        }
    }

    fn paint_detection(&self, surface: &mut RgbaImage, detection: &Detection) -> Annotation {
        let color = color_for_class(&detection.class_name);
        let rgba = color.to_rgba();
        let bbox = PixelRect::from_box(&detection.bbox);

        // 2px stroke centered on the box edge: one pixel outside, one inside.
        let outer = PixelRect {
            x: bbox.x - 1,
            y: bbox.y - 1,
            width: bbox.width + 2,
            height: bbox.height + 2,
        };
        draw_hollow_rect_mut(surface, outer.to_rect(), rgba);
        draw_hollow_rect_mut(surface, bbox.to_rect(), rgba);

        let label = detection.label();
        let label_rect = PixelRect {
            x: bbox.x,
            y: bbox.y - LABEL_HEIGHT as i32,
            width: self.text_width(&label) + LABEL_PADDING,
            height: LABEL_HEIGHT,
        };
        draw_filled_rect_mut(surface, label_rect.to_rect(), rgba);

        let text_drawn = match &self.font {
            Some(font) => {
                let scale = PxScale::from(FONT_SIZE);
                let ascent = font.as_scaled(scale).ascent();
                let baseline = bbox.y - TEXT_BASELINE_OFFSET;
                let top = (baseline as f32 - ascent).round() as i32;
                draw_text_mut(
                    surface,
                    Color::WHITE.to_rgba(),
                    bbox.x + TEXT_INSET_X,
                    top,
                    scale,
                    font,
                    &label,
                );
                true
            }
            None => false,
        };

        Annotation {
            bbox,
            color,
            label,
            label_rect,
            text_drawn,
        }
    }

    fn text_width(&self, text: &str) -> u32 {
        match &self.font {
            Some(font) => text_size(PxScale::from(FONT_SIZE), font, text).0,
            None => text.chars().count() as u32 * FALLBACK_CHAR_WIDTH,
        }
    }
}
