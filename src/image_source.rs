//! Access to sprite sheet images
//!
//! The index builder only needs pixel dimensions; composition needs decoded pixels.
//! Both go through [`ImageSource`] so sheet probing can be driven from memory in tests.

use image::RgbaImage;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

/// Error when a sheet image cannot be opened.
#[derive(Debug, Error)]
pub enum SheetImageError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Something that can report the pixel size of a sheet image and decode it.
pub trait ImageSource {
    /// Pixel `(width, height)` of the sheet named by `file`.
    fn dimensions(&self, file: &str) -> Result<(u32, u32), SheetImageError>;

    /// Decode the sheet named by `file` as RGBA.
    fn open(&self, file: &str) -> Result<RgbaImage, SheetImageError>;
}

/// Image source reading sheet files relative to a base directory.
#[derive(Debug, Clone)]
pub struct DirImageSource {
    base_dir: PathBuf,
}

impl DirImageSource {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into() }
    }

    /// Full path of a sheet file reference.
    pub fn path_for(&self, file: &str) -> PathBuf {
        self.base_dir.join(file)
    }

    fn existing_path(&self, file: &str) -> Result<PathBuf, SheetImageError> {
        let path = self.path_for(file);
        if path.is_file() {
            Ok(path)
        } else {
            Err(SheetImageError::NotFound(path))
        }
    }
}

impl ImageSource for DirImageSource {
    fn dimensions(&self, file: &str) -> Result<(u32, u32), SheetImageError> {
        let path = self.existing_path(file)?;
        Ok(image::image_dimensions(&path)?)
    }

    fn open(&self, file: &str) -> Result<RgbaImage, SheetImageError> {
        let path = self.existing_path(file)?;
        Ok(image::open(&path)?.to_rgba8())
    }
}

/// In-memory sheets keyed by file reference.
impl ImageSource for HashMap<String, RgbaImage> {
    fn dimensions(&self, file: &str) -> Result<(u32, u32), SheetImageError> {
        self.get(file)
            .map(|img| img.dimensions())
            .ok_or_else(|| SheetImageError::NotFound(PathBuf::from(file)))
    }

    fn open(&self, file: &str) -> Result<RgbaImage, SheetImageError> {
        self.get(file).cloned().ok_or_else(|| SheetImageError::NotFound(PathBuf::from(file)))
    }
}
