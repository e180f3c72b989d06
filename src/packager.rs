//! Multi-resolution icon packaging.
//!
//! Renders one image per requested size, bundles them into a Windows ICO
//! container and encodes the largest one as a PNG preview. Everything is
//! returned as byte buffers; writing them out is the caller's job.

use std::io::Cursor;

use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::ImageFormat;
use log::{debug, info};

use crate::compositor::render;
use crate::config::IconConfig;
use crate::error::{IconError, Result};
use crate::icon::{IconSet, RasterImage};

/// Largest side length an ICO directory entry can describe.
pub const MAX_CONTAINER_SIZE: u32 = 256;

/// The two artifacts produced by a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPackage {
    /// ICO container bytes.
    pub container: Vec<u8>,

    /// PNG encoding of the largest image.
    pub preview: Vec<u8>,

    /// Side lengths packed into the container, in directory order.
    pub sizes: Vec<u32>,
}

/// Renders the glyph once per size, preserving the order of `sizes`.
pub fn build_icon_set(sizes: &[u32], config: &IconConfig) -> Result<IconSet> {
    if sizes.is_empty() {
        return Err(IconError::EmptyIconSet);
    }

    let images = sizes
        .iter()
        .map(|&size| render(size, config))
        .collect::<Result<Vec<_>>>()?;
    Ok(IconSet::from_images(images))
}

/// Serializes an icon set into an ICO container.
///
/// Entries follow the set's order. Images below 256 px are stored as
/// bitmaps and 256 px images as embedded PNG, which is what Windows expects.
/// The whole container is built in memory, so a failure leaves nothing
/// half-written.
pub fn encode_icon_container(set: &IconSet) -> Result<Vec<u8>> {
    if set.is_empty() {
        return Err(IconError::Encoding("icon set contains no images".into()));
    }

    let mut dir = IconDir::new(ResourceType::Icon);
    for image in set {
        let dims = image.dimensions();
        if !dims.is_square() {
            return Err(IconError::Encoding(format!(
                "{}x{} image is not square",
                dims.width, dims.height
            )));
        }
        if dims.width > MAX_CONTAINER_SIZE {
            return Err(IconError::Encoding(format!(
                "{}x{} image exceeds the {MAX_CONTAINER_SIZE}px container limit",
                dims.width, dims.height
            )));
        }

        let rgba = image.data().as_raw().clone();
        let icon = IconImage::from_rgba_data(dims.width, dims.height, rgba);
        let entry = if dims.width == MAX_CONTAINER_SIZE {
            IconDirEntry::encode_as_png(&icon)
        } else {
            IconDirEntry::encode_as_bmp(&icon)
        }
        .map_err(|e| IconError::Encoding(e.to_string()))?;

        debug!(
            "encoded {}x{} entry ({} bytes, {})",
            dims.width,
            dims.height,
            entry.data().len(),
            if entry.is_png() { "png" } else { "bmp" }
        );
        dir.add_entry(entry);
    }

    let mut bytes = Vec::new();
    dir.write(&mut bytes)
        .map_err(|e| IconError::Encoding(e.to_string()))?;
    Ok(bytes)
}

/// Encodes one image as a standalone PNG.
pub fn export_preview(image: &RasterImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .data()
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Runs the whole pipeline for a configuration.
pub fn package(config: &IconConfig) -> Result<IconPackage> {
    config.validate()?;

    let set = build_icon_set(&config.sizes, config)?;
    let container = encode_icon_container(&set)?;
    let largest = set.largest().ok_or(IconError::EmptyIconSet)?;
    let preview = export_preview(largest)?;

    info!(
        "packaged {} sizes ({} byte container, {}px preview)",
        set.len(),
        container.len(),
        largest.size()
    );

    Ok(IconPackage {
        container,
        preview,
        sizes: set.sizes(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SIZES;
    use image::RgbaImage;

    fn read_dir(bytes: &[u8]) -> IconDir {
        IconDir::read(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn empty_size_list_is_rejected() {
        let result = build_icon_set(&[], &IconConfig::default());
        assert!(matches!(result, Err(IconError::EmptyIconSet)));
    }

    #[test]
    fn icon_set_preserves_order() {
        let set = build_icon_set(&[16, 64, 32], &IconConfig::default()).unwrap();
        assert_eq!(set.sizes(), vec![16, 64, 32]);
    }

    #[test]
    fn zero_size_fails_whole_set() {
        let result = build_icon_set(&[32, 0, 16], &IconConfig::default());
        assert!(matches!(result, Err(IconError::InvalidSize(0))));
    }

    #[test]
    fn icon_sets_are_reproducible() {
        let config = IconConfig::default();
        let a = build_icon_set(&DEFAULT_SIZES, &config).unwrap();
        let b = build_icon_set(&DEFAULT_SIZES, &config).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.data().as_raw(), y.data().as_raw());
        }
    }

    #[test]
    fn container_directory_matches_sizes() {
        let set = build_icon_set(&DEFAULT_SIZES, &IconConfig::default()).unwrap();
        let bytes = encode_icon_container(&set).unwrap();

        // Header: reserved, type = icon, image count
        assert_eq!(&bytes[..6], &[0, 0, 1, 0, 6, 0]);

        let dir = read_dir(&bytes);
        assert_eq!(dir.resource_type(), ResourceType::Icon);
        let dims: Vec<_> = dir.entries().iter().map(|e| (e.width(), e.height())).collect();
        assert_eq!(
            dims,
            vec![(256, 256), (128, 128), (64, 64), (48, 48), (32, 32), (16, 16)]
        );
    }

    #[test]
    fn largest_entry_is_png_and_rest_are_bitmaps() {
        let set = build_icon_set(&[256, 32], &IconConfig::default()).unwrap();
        let dir = read_dir(&encode_icon_container(&set).unwrap());

        assert!(dir.entries()[0].is_png());
        assert!(!dir.entries()[1].is_png());
    }

    #[test]
    fn container_entries_decode_losslessly() {
        let set = build_icon_set(&[256, 48, 16], &IconConfig::default()).unwrap();
        let dir = read_dir(&encode_icon_container(&set).unwrap());

        for (entry, original) in dir.entries().iter().zip(&set) {
            let decoded = entry.decode().unwrap();
            assert_eq!(decoded.rgba_data(), original.data().as_raw().as_slice());
        }
    }

    #[test]
    fn non_square_image_is_rejected() {
        let set = IconSet::from_images(vec![RasterImage::new(RgbaImage::new(32, 16))]);
        assert!(matches!(
            encode_icon_container(&set),
            Err(IconError::Encoding(msg)) if msg.contains("32x16")
        ));
    }

    #[test]
    fn oversized_image_is_rejected() {
        let set = IconSet::from_images(vec![RasterImage::new(RgbaImage::new(512, 512))]);
        assert!(matches!(
            encode_icon_container(&set),
            Err(IconError::Encoding(_))
        ));
    }

    #[test]
    fn empty_set_cannot_be_encoded() {
        assert!(matches!(
            encode_icon_container(&IconSet::new()),
            Err(IconError::Encoding(_))
        ));
    }

    #[test]
    fn preview_is_png() {
        let image = render(64, &IconConfig::default()).unwrap();
        let bytes = export_preview(&image).unwrap();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(&decoded, image.data());
    }

    #[test]
    fn package_uses_largest_image_for_preview() {
        let config = IconConfig::default().with_sizes(&[16, 48, 32]);
        let package = package(&config).unwrap();

        assert_eq!(package.sizes, vec![16, 48, 32]);
        let preview = image::load_from_memory(&package.preview).unwrap();
        assert_eq!((preview.width(), preview.height()), (48, 48));
        assert_eq!(read_dir(&package.container).entries().len(), 3);
    }

    #[test]
    fn package_validates_config() {
        let config = IconConfig::default().with_sizes(&[]);
        assert!(matches!(package(&config), Err(IconError::EmptyIconSet)));
    }
}
