//! Tile composition - crops a tile's sprites from their sheets and lays them out in a strip
//!
//! Sprites are placed left to right in layering order, separated by a fixed gap and
//! surrounded by a margin, on a transparent canvas. Decoded sheets are cached for the
//! lifetime of one [`Composer`], which is tied to a single loaded tileset.

use image::imageops;
use image::{Rgba, RgbaImage};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::image_source::ImageSource;
use crate::resolver::SpriteRef;
use crate::tileset::Tileset;

/// Transparent color used for the canvas background
const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Layout of the composed strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeOptions {
    /// Gap between consecutive sprites in pixels
    pub spacing: u32,
    /// Border around the strip in pixels
    pub margin: u32,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self { spacing: 20, margin: 10 }
    }
}

/// Error when composing a tile.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Tile '{0}' not found")]
    UnknownTile(String),
    #[error("Tile '{0}' has no sprite that could be cropped")]
    NothingToDraw(String),
    #[error("Composed image for tile '{0}' is too large (spacing {1}, margin {2})")]
    CanvasTooLarge(String, u32, u32),
}

/// A composed tile image and the problems hit while cropping.
#[derive(Debug)]
pub struct Composed {
    pub image: RgbaImage,
    /// Number of sprites drawn
    pub drawn: usize,
    pub warnings: Vec<String>,
}

/// Crops and composes tiles from one tileset's sheets.
pub struct Composer<'a, S: ImageSource> {
    tileset: &'a Tileset,
    images: S,
    options: ComposeOptions,
    /// Decoded sheets, `None` when a sheet failed to open
    cache: HashMap<String, Option<RgbaImage>>,
}

impl<'a, S: ImageSource> Composer<'a, S> {
    pub fn new(tileset: &'a Tileset, images: S, options: ComposeOptions) -> Self {
        Self { tileset, images, options, cache: HashMap::new() }
    }

    /// Compose all sprites of `id` into one image.
    pub fn compose(&mut self, id: &str) -> Result<Composed, ComposeError> {
        let tileset = self.tileset;
        let sprites = tileset
            .sprites(id)
            .ok_or_else(|| ComposeError::UnknownTile(id.to_string()))?;

        let mut warnings = Vec::new();
        let mut crops = Vec::with_capacity(sprites.len());
        for sprite in sprites {
            match self.crop(sprite) {
                Ok(crop) => crops.push(crop),
                Err(message) => {
                    warn!(tile = id, "{}", message);
                    warnings.push(message);
                }
            }
        }

        if crops.is_empty() {
            return Err(ComposeError::NothingToDraw(id.to_string()));
        }

        let ComposeOptions { spacing, margin } = self.options;
        let image = self
            .layout(&crops)
            .ok_or_else(|| ComposeError::CanvasTooLarge(id.to_string(), spacing, margin))?;
        debug!(tile = id, sprites = crops.len(), "composed tile");
        Ok(Composed { image, drawn: crops.len(), warnings })
    }

    /// Crop one sprite's cell from its sheet.
    pub fn crop(&mut self, sprite: &SpriteRef) -> Result<RgbaImage, String> {
        let sheet = self.sheet(&sprite.sheet).ok_or_else(|| {
            format!("Image file not found for display: {}", sprite.sheet)
        })?;

        let (x, y, w, h) = sprite.pixel_rect();
        if x + w > sheet.width() || y + h > sheet.height() {
            return Err(format!(
                "Calculated coordinates for global sprite index {} ({}) are out of bounds",
                sprite.global_index, sprite.sheet
            ));
        }
        Ok(imageops::crop_imm(sheet, x, y, w, h).to_image())
    }

    fn sheet(&mut self, file: &str) -> Option<&RgbaImage> {
        if !self.cache.contains_key(file) {
            let decoded = match self.images.open(file) {
                Ok(img) => Some(img),
                Err(e) => {
                    warn!(file, "could not open sheet: {}", e);
                    None
                }
            };
            self.cache.insert(file.to_string(), decoded);
        }
        self.cache.get(file).and_then(Option::as_ref)
    }

    /// Lay the crops out on a fresh canvas. `None` when the canvas size overflows.
    fn layout(&self, crops: &[RgbaImage]) -> Option<RgbaImage> {
        let ComposeOptions { spacing, margin } = self.options;
        let width = crops
            .iter()
            .try_fold(margin, |acc, c| acc.checked_add(c.width())?.checked_add(spacing))?;
        let height = crops.iter().map(RgbaImage::height).max().unwrap_or(0).checked_add(margin)?;
        let (width, height) = (width.max(1), height.max(1));
        // RGBA bytes must stay addressable
        usize::try_from(width).ok()?.checked_mul(usize::try_from(height).ok()?)?.checked_mul(4)?;
        let mut canvas = RgbaImage::from_pixel(width, height, TRANSPARENT);

        let mut x = margin;
        for crop in crops {
            imageops::overlay(&mut canvas, crop, i64::from(x), i64::from(margin));
            x += crop.width() + spacing;
        }
        Some(canvas)
    }
}
