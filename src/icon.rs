//! Raster image and icon set types produced by the pipeline.

use image::RgbaImage;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// One finished rendering of the glyph.
///
/// Images are produced by the compositor and never mutated afterwards;
/// the pixel buffer is only reachable through shared references.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    data: RgbaImage,
}

impl RasterImage {
    /// Wraps a finished RGBA buffer.
    pub fn new(data: RgbaImage) -> Self {
        Self { data }
    }

    /// Returns the pixel buffer.
    pub fn data(&self) -> &RgbaImage {
        &self.data
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns the side length of a square image (the width otherwise).
    pub fn size(&self) -> u32 {
        self.data.width()
    }
}

/// Renderings of the glyph at several sizes, in the order they were requested.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IconSet {
    images: Vec<RasterImage>,
}

impl IconSet {
    /// Creates a new empty icon set.
    pub fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// Creates an icon set from a vector of images.
    pub fn from_images(images: Vec<RasterImage>) -> Self {
        Self { images }
    }

    /// Appends an image, keeping insertion order.
    pub fn add_image(&mut self, image: RasterImage) {
        self.images.push(image);
    }

    /// Returns the number of images in the set.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Returns true if the icon set contains no images.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Returns the side lengths of the images, in set order.
    pub fn sizes(&self) -> Vec<u32> {
        self.images.iter().map(RasterImage::size).collect()
    }

    /// Returns the image with the largest pixel area.
    ///
    /// On ties the earliest image wins.
    pub fn largest(&self) -> Option<&RasterImage> {
        self.images.iter().rev().max_by_key(|img| {
            let dims = img.dimensions();
            dims.width as u64 * dims.height as u64
        })
    }

    /// Returns an iterator over the images.
    pub fn iter(&self) -> impl Iterator<Item = &RasterImage> {
        self.images.iter()
    }
}

impl IntoIterator for IconSet {
    type Item = RasterImage;
    type IntoIter = std::vec::IntoIter<RasterImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.into_iter()
    }
}

impl<'a> IntoIterator for &'a IconSet {
    type Item = &'a RasterImage;
    type IntoIter = std::slice::Iter<'a, RasterImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}
