//! Shape rasterization using tiny-skia (through resvg's re-export).
//!
//! Primitives are drawn onto a [`Surface`] with source-over compositing and
//! anti-aliasing. Rectangle edges come straight from integer
//! [`PixelRect`]s, so shapes that share an edge meet on the same pixel
//! boundary and leave no seam.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{
    FillRule, LineCap, LineJoin, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use crate::config::Color;
use crate::error::{IconError, Result};
use crate::geometry::PixelRect;

/// Control point distance for approximating a quarter circle with a cubic.
const KAPPA: f32 = 0.552_284_8;

// ============================================================================
// ShapePrimitive
// ============================================================================

/// A single drawable shape with its color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapePrimitive {
    /// Filled rectangle with circular corners.
    RoundedRect {
        bounds: PixelRect,
        radius: i32,
        color: Color,
    },
    /// Filled axis-aligned rectangle.
    Rect { bounds: PixelRect, color: Color },
    /// Filled ellipse inscribed in `bounds`.
    Ellipse { bounds: PixelRect, color: Color },
    /// Stroked elliptical arc inscribed in `bounds`.
    ///
    /// Angles are in degrees, measured clockwise from 3 o'clock. The sweep
    /// runs clockwise from `start` to `end`, wrapping through 360.
    Arc {
        bounds: PixelRect,
        start: f32,
        end: f32,
        width: i32,
        color: Color,
    },
}

impl ShapePrimitive {
    /// Returns the color the primitive is drawn with.
    pub fn color(&self) -> Color {
        match *self {
            Self::RoundedRect { color, .. }
            | Self::Rect { color, .. }
            | Self::Ellipse { color, .. }
            | Self::Arc { color, .. } => color,
        }
    }

    /// Returns the bounding box of the primitive.
    pub fn bounds(&self) -> PixelRect {
        match *self {
            Self::RoundedRect { bounds, .. }
            | Self::Rect { bounds, .. }
            | Self::Ellipse { bounds, .. }
            | Self::Arc { bounds, .. } => bounds,
        }
    }
}

/// Draws one primitive onto the surface.
pub fn draw(surface: &mut Surface, primitive: &ShapePrimitive) {
    match *primitive {
        ShapePrimitive::RoundedRect {
            bounds,
            radius,
            color,
        } => surface.fill_rounded_rect(bounds, radius, color),
        ShapePrimitive::Rect { bounds, color } => surface.fill_rect(bounds, color),
        ShapePrimitive::Ellipse { bounds, color } => surface.fill_ellipse(bounds, color),
        ShapePrimitive::Arc {
            bounds,
            start,
            end,
            width,
            color,
        } => surface.stroke_arc(bounds, start, end, width, color),
    }
}

// ============================================================================
// Surface
// ============================================================================

/// An RGBA drawing surface.
///
/// Shapes that fall partly or wholly outside the surface are clipped.
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    /// Allocates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(IconError::InvalidSize(width.min(height)))?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Returns the straight-alpha color at (x, y), or `None` out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        // Pixmap::pixel only bounds-checks the linear index, so x past the
        // right edge would wrap onto the next row.
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let p = self.pixmap.pixel(x, y)?;
        let (r, g, b, a) = unpremultiply(p.red(), p.green(), p.blue(), p.alpha());
        Some(Color::new(r, g, b, a))
    }

    pub fn fill_rect(&mut self, bounds: PixelRect, color: Color) {
        let Some(rect) = to_rect(bounds) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &paint(color), Transform::identity(), None);
    }

    /// Fills a rectangle whose corners are rounded by `radius`.
    ///
    /// The radius is clamped to half the shorter side; zero gives square corners.
    pub fn fill_rounded_rect(&mut self, bounds: PixelRect, radius: i32, color: Color) {
        let Some(rect) = to_rect(bounds) else {
            return;
        };
        if let Some(path) = rounded_rect_path(rect, radius as f32) {
            self.fill_path(&path, color);
        }
    }

    pub fn fill_ellipse(&mut self, bounds: PixelRect, color: Color) {
        let Some(path) = to_rect(bounds).and_then(PathBuilder::from_oval) else {
            return;
        };
        self.fill_path(&path, color);
    }

    /// Strokes an elliptical arc of `width` pixels lying inside `bounds`.
    ///
    /// The arc is flattened into short segments joined with round joins, so
    /// the stroke is continuous across the whole sweep.
    pub fn stroke_arc(
        &mut self,
        bounds: PixelRect,
        start: f32,
        end: f32,
        width: i32,
        color: Color,
    ) {
        if width <= 0 {
            return;
        }
        let Some(rect) = to_rect(bounds) else {
            return;
        };
        let Some(path) = arc_path(rect, start, end, width as f32 / 2.0) else {
            return;
        };

        let stroke = Stroke {
            width: width as f32,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.pixmap.fill_path(
            path,
            &paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    /// Converts the surface into a straight-alpha RGBA image.
    pub fn into_rgba_image(self) -> RgbaImage {
        let width = self.pixmap.width();
        let pixels = self.pixmap.pixels();

        RgbaImage::from_fn(width, self.pixmap.height(), |x, y| {
            let p = pixels[(y * width + x) as usize];
            let (r, g, b, a) = unpremultiply(p.red(), p.green(), p.blue(), p.alpha());
            Rgba([r, g, b, a])
        })
    }
}

// ============================================================================
// Path Construction
// ============================================================================

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, color.a);
    paint.anti_alias = true;
    paint
}

fn to_rect(bounds: PixelRect) -> Option<Rect> {
    if bounds.width <= 0 || bounds.height <= 0 {
        return None;
    }
    Rect::from_xywh(
        bounds.x as f32,
        bounds.y as f32,
        bounds.width as f32,
        bounds.height as f32,
    )
}

fn rounded_rect_path(rect: Rect, radius: f32) -> Option<Path> {
    let r = radius.min(rect.width() / 2.0).min(rect.height() / 2.0);
    if r <= 0.0 {
        return Some(PathBuilder::from_rect(rect));
    }

    let (l, t, rt, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let c = r * KAPPA;

    let mut pb = PathBuilder::new();
    pb.move_to(l + r, t);
    pb.line_to(rt - r, t);
    pb.cubic_to(rt - r + c, t, rt, t + r - c, rt, t + r);
    pb.line_to(rt, b - r);
    pb.cubic_to(rt, b - r + c, rt - r + c, b, rt - r, b);
    pb.line_to(l + r, b);
    pb.cubic_to(l + r - c, b, l, b - r + c, l, b - r);
    pb.line_to(l, t + r);
    pb.cubic_to(l, t + r - c, l + r - c, t, l + r, t);
    pb.close();
    pb.finish()
}

/// Flattens the arc's centre line, inset by `inset` so a stroke of twice
/// that width stays inside `rect`.
fn arc_path(rect: Rect, start: f32, end: f32, inset: f32) -> Option<Path> {
    let rx = (rect.width() / 2.0 - inset).max(0.5);
    let ry = (rect.height() / 2.0 - inset).max(0.5);
    let cx = rect.left() + rect.width() / 2.0;
    let cy = rect.top() + rect.height() / 2.0;

    let sweep = sweep_degrees(start, end);
    // Roughly one segment per two pixels of arc length
    let arc_length = sweep.to_radians() * rx.max(ry);
    let steps = ((arc_length / 2.0).ceil() as usize).max(8);

    let point = |i: usize| {
        let theta = (start + sweep * i as f32 / steps as f32).to_radians();
        (cx + rx * theta.cos(), cy + ry * theta.sin())
    };

    let mut pb = PathBuilder::new();
    let (x0, y0) = point(0);
    pb.move_to(x0, y0);
    for i in 1..=steps {
        let (x, y) = point(i);
        pb.line_to(x, y);
    }
    pb.finish()
}

/// Clockwise sweep from `start` to `end`, in (0, 360].
fn sweep_degrees(start: f32, end: f32) -> f32 {
    let sweep = (end - start).rem_euclid(360.0);
    if sweep == 0.0 { 360.0 } else { sweep }
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
