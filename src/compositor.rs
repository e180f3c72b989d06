//! Assembles the server glyph from primitives.
//!
//! # Draw Order
//!
//! ```text
//! 1. shadow      rounded rect, offset down-right     palette.shadow
//! 2. body        rounded rect                        palette.secondary
//! 3. dividers    segment_count - 1 rects             palette.background
//! 4. lights      lights_per_segment per segment      accent, then accent_dim
//! 5. lock body   rounded rect                        palette.accent
//! 6. shackle     upper half-arc stroke               palette.accent
//! 7. keyhole     ellipse                             palette.background
//! ```
//!
//! Later primitives overwrite earlier ones where they overlap.

use log::debug;

use crate::config::IconConfig;
use crate::error::Result;
use crate::geometry::{compute_layout, LayoutParams, PixelRect};
use crate::icon::RasterImage;
use crate::shape::{draw, ShapePrimitive, Surface};

/// Renders the glyph on a transparent `size` x `size` canvas.
pub fn render(size: u32, config: &IconConfig) -> Result<RasterImage> {
    let layout = compute_layout(size)?;
    let mut surface = Surface::new(size, size)?;

    let primitives = primitives(&layout, config);
    for primitive in &primitives {
        draw(&mut surface, primitive);
    }

    debug!("rendered {size}x{size} glyph from {} primitives", primitives.len());
    Ok(RasterImage::new(surface.into_rgba_image()))
}

/// Returns the primitives making up the glyph, in draw order.
pub fn primitives(layout: &LayoutParams, config: &IconConfig) -> Vec<ShapePrimitive> {
    let palette = &config.palette;
    let server = layout.server;
    let mut out = Vec::new();

    out.push(ShapePrimitive::RoundedRect {
        bounds: server.offset(layout.shadow_offset, layout.shadow_offset),
        radius: layout.server_radius,
        color: palette.shadow,
    });

    out.push(ShapePrimitive::RoundedRect {
        bounds: server,
        radius: layout.server_radius,
        color: palette.secondary,
    });

    let segments = config.segment_count.max(1);
    let thickness = layout.divider_thickness;
    for index in 1..segments {
        let y = layout.segment(index, segments).y;
        out.push(ShapePrimitive::Rect {
            bounds: PixelRect::new(server.x, y - thickness / 2, server.width, thickness),
            color: palette.background,
        });
    }

    let diameter = layout.light_diameter;
    for index in 0..segments {
        let segment = layout.segment(index, segments);
        let center_y = segment.y + segment.height / 2;

        for light in 0..config.lights_per_segment {
            let x = server.right() - layout.margin - light as i32 * layout.light_spacing - diameter;
            let color = if light == 0 {
                palette.accent
            } else {
                palette.accent_dim
            };
            out.push(ShapePrimitive::Ellipse {
                bounds: PixelRect::square(x, center_y - diameter / 2, diameter),
                color,
            });
        }
    }

    out.push(ShapePrimitive::RoundedRect {
        bounds: layout.lock_body,
        radius: layout.lock_radius,
        color: palette.accent,
    });

    out.push(ShapePrimitive::Arc {
        bounds: layout.shackle,
        start: 180.0,
        end: 0.0,
        width: layout.shackle_thickness,
        color: palette.accent,
    });

    out.push(ShapePrimitive::Ellipse {
        bounds: layout.keyhole,
        color: palette.background,
    });

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Color, Palette};
    use crate::error::IconError;

    fn pixel(image: &RasterImage, x: u32, y: u32) -> Color {
        let [r, g, b, a] = image.data().get_pixel(x, y).0;
        Color::new(r, g, b, a)
    }

    #[test]
    fn render_produces_requested_size() {
        let config = IconConfig::default();
        for size in [256, 48, 16, 1] {
            let image = render(size, &config).unwrap();
            assert_eq!(image.size(), size);
            assert!(image.dimensions().is_square());
        }
    }

    #[test]
    fn render_rejects_zero_size() {
        assert!(matches!(
            render(0, &IconConfig::default()),
            Err(IconError::InvalidSize(0))
        ));
    }

    #[test]
    fn primitive_order_and_counts() {
        let config = IconConfig::default();
        let layout = compute_layout(256).unwrap();
        let prims = primitives(&layout, &config);

        // shadow + body + 2 dividers + 9 lights + lock body + shackle + keyhole
        assert_eq!(prims.len(), 16);

        let palette = config.palette;
        assert_eq!(prims[0].color(), palette.shadow);
        assert_eq!(prims[0].bounds(), layout.server.offset(4, 4));
        assert_eq!(prims[1].color(), palette.secondary);
        assert_eq!(prims[1].bounds(), layout.server);
        assert!(matches!(prims[2], ShapePrimitive::Rect { .. }));
        assert!(matches!(prims[3], ShapePrimitive::Rect { .. }));
        assert!(prims[4..13].iter().all(|p| matches!(p, ShapePrimitive::Ellipse { .. })));
        assert!(matches!(prims[13], ShapePrimitive::RoundedRect { .. }));
        assert!(matches!(
            prims[14],
            ShapePrimitive::Arc { start, end, .. } if start == 180.0 && end == 0.0
        ));
        assert_eq!(prims[15].bounds(), layout.keyhole);
        assert_eq!(prims[15].color(), palette.background);
    }

    #[test]
    fn dividers_split_body_into_equal_segments() {
        let layout = compute_layout(256).unwrap();
        let prims = primitives(&layout, &IconConfig::default());

        assert_eq!(prims[2].bounds(), PixelRect::new(32, 87, 192, 4));
        assert_eq!(prims[3].bounds(), PixelRect::new(32, 163, 192, 4));
    }

    #[test]
    fn first_light_per_segment_is_active() {
        let config = IconConfig::default();
        let layout = compute_layout(256).unwrap();
        let lights: Vec<_> = primitives(&layout, &config)[4..13].to_vec();

        for (i, light) in lights.iter().enumerate() {
            let expected = if i % 3 == 0 {
                config.palette.accent
            } else {
                config.palette.accent_dim
            };
            assert_eq!(light.color(), expected, "light {i}");
        }

        // Right-aligned, one margin in from the body's right edge
        assert_eq!(lights[0].bounds(), PixelRect::square(184, 47, 8));
        assert_eq!(lights[1].bounds(), PixelRect::square(168, 47, 8));
        assert_eq!(lights[2].bounds(), PixelRect::square(152, 47, 8));
        assert_eq!(lights[3].bounds().y, 47 + 76);
    }

    #[test]
    fn segment_and_light_counts_follow_config() {
        let config = IconConfig {
            segment_count: 4,
            lights_per_segment: 2,
            ..IconConfig::default()
        };
        let layout = compute_layout(128).unwrap();
        let prims = primitives(&layout, &config);

        let rects = prims
            .iter()
            .filter(|p| matches!(p, ShapePrimitive::Rect { .. }))
            .count();
        let ellipses = prims
            .iter()
            .filter(|p| matches!(p, ShapePrimitive::Ellipse { .. }))
            .count();
        assert_eq!(rects, 3);
        assert_eq!(ellipses, 4 * 2 + 1);
    }

    #[test]
    fn rendered_pixels_at_256() {
        let config = IconConfig::default();
        let palette = config.palette;
        let image = render(256, &config).unwrap();

        // Transparent outside the glyph
        assert_eq!(pixel(&image, 0, 0).a, 0);
        assert_eq!(pixel(&image, 2, 250).a, 0);

        // Body, divider, and shadow peeking out on the right
        assert_eq!(pixel(&image, 60, 127), palette.secondary);
        assert_eq!(pixel(&image, 60, 88), palette.background);
        assert_eq!(pixel(&image, 226, 130), palette.shadow);

        // Active and idle lights in the middle segment
        assert_eq!(pixel(&image, 188, 127), palette.accent);
        assert_eq!(pixel(&image, 172, 127), palette.accent_dim);
        assert_eq!(pixel(&image, 156, 127), palette.accent_dim);

        // Lock body and keyhole
        assert_eq!(pixel(&image, 160, 30), palette.accent);
        assert_eq!(pixel(&image, 176, 26), palette.background);
    }

    #[test]
    fn rendered_pixels_at_16() {
        let config = IconConfig::default();
        let image = render(16, &config).unwrap();

        // Divider row is a single pixel thick
        assert_eq!(pixel(&image, 5, 4), config.palette.secondary);
        assert_eq!(pixel(&image, 5, 5), config.palette.background);
        assert_eq!(pixel(&image, 5, 8), config.palette.secondary);
    }

    #[test]
    fn palette_changes_only_colors() {
        let custom = IconConfig::default().with_palette(Palette::from_theme(
            Color::rgb(255, 255, 255),
            Color::rgb(255, 0, 0),
            Color::rgb(0, 0, 0),
        ));
        let layout = compute_layout(64).unwrap();
        let stock = primitives(&layout, &IconConfig::default());
        let themed = primitives(&layout, &custom);

        assert_eq!(stock.len(), themed.len());
        for (a, b) in stock.iter().zip(&themed) {
            assert_eq!(a.bounds(), b.bounds());
        }

        let image = render(64, &custom).unwrap();
        assert_eq!(pixel(&image, 15, 31), Color::rgb(0, 0, 0));
    }

    #[test]
    fn render_is_deterministic() {
        let config = IconConfig::default();
        for size in [256, 32] {
            assert_eq!(render(size, &config).unwrap(), render(size, &config).unwrap());
        }
    }
}
