//! server-glyph: procedural "secure server" application icon
//!
//! This crate renders a server-rack glyph with a padlock badge at a list of
//! pixel sizes and packages the results as a multi-resolution ICO container
//! plus a PNG preview of the largest size.
//!
//! # Example
//!
//! ```
//! use server_glyph::{package, IconConfig};
//!
//! let config = IconConfig::default();
//! let output = package(&config).unwrap();
//!
//! assert_eq!(output.sizes, vec![256, 128, 64, 48, 32, 16]);
//! assert!(output.preview.starts_with(b"\x89PNG"));
//! ```
//!
//! # Pipeline
//!
//! Each stage can also be driven on its own:
//!
//! ```
//! use server_glyph::{build_icon_set, compute_layout, encode_icon_container, IconConfig};
//!
//! let layout = compute_layout(256).unwrap();
//! assert_eq!(layout.margin, 32);
//!
//! let set = build_icon_set(&[48, 16], &IconConfig::default()).unwrap();
//! let ico = encode_icon_container(&set).unwrap();
//! assert_eq!(&ico[4..6], &[2, 0]);
//! ```

mod compositor;
mod config;
mod error;
mod geometry;
mod icon;
mod packager;
mod shape;

pub use compositor::{primitives, render};
pub use config::{
    Color, IconConfig, Palette, DEFAULT_LIGHTS_PER_SEGMENT, DEFAULT_SEGMENT_COUNT, DEFAULT_SIZES,
};
pub use error::{IconError, Result};
pub use geometry::{compute_layout, LayoutParams, PixelRect};
pub use icon::{IconSet, RasterImage, SizePx};
pub use packager::{
    build_icon_set, encode_icon_container, export_preview, package, IconPackage,
    MAX_CONTAINER_SIZE,
};
pub use shape::{draw, ShapePrimitive, Surface};
