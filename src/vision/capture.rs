//! Screenshot and template images

use image::{DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// One captured frame of the device screen
#[derive(Debug, Clone)]
pub struct Screenshot {
    image: RgbImage,
}

impl Screenshot {
    /// Wrap an already decoded RGB image
    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    /// Decode a screenshot file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref())?;
        Ok(Self::from(image))
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Get the pixel at (x, y), `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

impl From<DynamicImage> for Screenshot {
    fn from(image: DynamicImage) -> Self {
        Self::new(image.to_rgb8())
    }
}

/// Reference image of the player piece
///
/// Loaded once at startup and shared read-only by every turn.
#[derive(Debug, Clone)]
pub struct Template {
    image: RgbImage,
}

impl Template {
    /// Load the template, failing with [`Error::TemplateMissing`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| Error::TemplateMissing {
            path: PathBuf::from(path),
            source,
        })?;
        log::info!(
            "Loaded piece template {:?} ({}x{})",
            path,
            image.width(),
            image.height()
        );
        Ok(Self::new(image.to_rgb8()))
    }

    pub fn new(image: RgbImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}
