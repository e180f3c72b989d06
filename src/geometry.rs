//! Proportional layout of the server glyph.
//!
//! Everything here is a pure integer function of the target pixel size, so
//! the same size always yields the same [`LayoutParams`].

use crate::error::{IconError, Result};

/// A rectangle in pixel coordinates.
///
/// Coordinates are signed because parts of the glyph (the lock shackle at
/// larger sizes) extend past the top edge of the canvas and are clipped
/// during drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    /// X offset from the left edge of the canvas
    pub x: i32,
    /// Y offset from the top edge of the canvas
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a square of side `size` with its top-left corner at (x, y).
    pub fn square(x: i32, y: i32, size: i32) -> Self {
        Self::new(x, y, size, size)
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Returns the same rectangle moved by (dx, dy).
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Size-derived geometry for one rendering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutParams {
    /// Canvas side length.
    pub size: i32,
    pub margin: i32,

    /// Server body, horizontally inset by `margin` and vertically centred.
    pub server: PixelRect,
    pub server_radius: i32,

    pub shadow_offset: i32,
    pub divider_thickness: i32,

    pub light_diameter: i32,
    /// Distance between the left edges of neighbouring lights.
    pub light_spacing: i32,

    /// Square enclosing the whole padlock, overlapping the body's top-right corner.
    pub lock: PixelRect,
    pub lock_body: PixelRect,
    pub lock_radius: i32,
    /// Bounding box of the full shackle ellipse; only its upper half is stroked.
    pub shackle: PixelRect,
    pub shackle_thickness: i32,
    pub keyhole: PixelRect,
}

impl LayoutParams {
    /// Returns the `index`-th of `count` equal horizontal segments of the body.
    ///
    /// Segment height is truncated, so any remainder stays at the bottom of
    /// the last segment.
    pub fn segment(&self, index: u32, count: u32) -> PixelRect {
        let height = self.server.height / count.max(1) as i32;
        PixelRect::new(
            self.server.x,
            self.server.y + height * index as i32,
            self.server.width,
            height,
        )
    }
}

/// Computes the layout of the glyph for a `size` x `size` canvas.
///
/// Fails with [`IconError::InvalidSize`] when `size` is zero or too large to
/// address with signed pixel coordinates.
pub fn compute_layout(size: u32) -> Result<LayoutParams> {
    let s = i32::try_from(size)
        .ok()
        .filter(|&s| s > 0)
        .ok_or(IconError::InvalidSize(size))?;

    let margin = s / 8;
    let server_width = s - margin * 2;
    let server_height = (server_width as f64 * 1.2) as i32;
    let server = PixelRect::new(margin, (s - server_height) / 2, server_width, server_height);

    let lock_size = s / 4;
    let lock = PixelRect::square(
        server.right() - lock_size - margin / 2,
        server.y - lock_size / 2,
        lock_size,
    );

    let lock_body_height = (lock_size as f64 * 0.6) as i32;
    let lock_body = PixelRect::new(
        lock.x,
        lock.bottom() - lock_body_height,
        lock_size,
        lock_body_height,
    );

    let shackle_width = (lock_size as f64 * 0.7) as i32;
    let shackle_height = (lock_size as f64 * 0.5) as i32;
    let shackle_left = lock.x + (lock_size - shackle_width) / 2;
    let shackle = PixelRect::new(
        shackle_left,
        lock_body.y - shackle_height,
        lock.x + (lock_size + shackle_width) / 2 - shackle_left,
        shackle_height,
    );

    let keyhole_size = (lock_size / 6).max(2);
    let keyhole = PixelRect::square(
        lock.x + lock_size / 2 - keyhole_size / 2,
        lock.bottom() - lock_body_height / 2 - keyhole_size / 2,
        keyhole_size,
    );

    let light_diameter = (s / 32).max(2);

    Ok(LayoutParams {
        size: s,
        margin,
        server,
        server_radius: s / 16,
        shadow_offset: (s / 64).max(2),
        divider_thickness: (s / 64).max(1),
        light_diameter,
        light_spacing: light_diameter * 2,
        lock,
        lock_body,
        lock_radius: lock_size / 8,
        shackle,
        shackle_thickness: (s / 48).max(2),
        keyhole,
    })
}
