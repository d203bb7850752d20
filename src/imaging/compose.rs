//! Print film composition.
//!
//! One artwork in, one film out. The order of steps matters:
//!
//! 1. Convert to RGBA (opaque if the source had no alpha).
//! 2. Mirror left-right; the film is applied face down.
//! 3. Scale to the device width plus compensation, keeping the aspect ratio.
//! 4. Center on a transparent sheet-sized canvas with floor division.
//! 5. Draw the order and model labels at the top-left margin.
//!
//! Width always wins over height: artwork taller than the sheet is still
//! centered and simply clipped by the canvas, and the [`Composition`]
//! reports the overflow so the caller can warn about it. Scaled artwork more
//! than [`MAX_OVERSIZE`] times the sheet in either direction is refused
//! before any pixel buffer is allocated.

use super::calculations::{
    centered_offset, overflow, px_to_cm, target_dimensions, within_limit,
};
use super::labels::{LabelFont, LabelPlacement, draw_labels};
use super::params::{FallbackLayout, FilmGeometry, LabelStyle};
use crate::catalog::DeviceModel;
use crate::config::{ConfigError, FilmConfig};
use crate::types::OrderId;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use thiserror::Error;

/// Largest scaled artwork accepted, as a multiple of the sheet size.
pub const MAX_OVERSIZE: u32 = 8;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("Source image is empty ({width}x{height})")]
    EmptySource { width: u32, height: u32 },
    #[error("Target width for {model} rounds to zero pixels")]
    ZeroWidth { model: String },
    #[error("Scaled artwork for {model} would be {width}x{height}px, too large for the sheet")]
    TooLarge {
        model: String,
        width: u32,
        height: u64,
    },
}

/// A finished film plus what happened while making it.
#[derive(Debug, Clone)]
pub struct Composition {
    pub canvas: RgbaImage,
    /// Artwork size after scaling.
    pub target: (u32, u32),
    /// Artwork top-left on the canvas; negative when it overflows.
    pub offset: (i64, i64),
    /// Pixels of artwork height that did not fit on the sheet.
    pub overflow_px: Option<u32>,
    /// Catalog width of the device.
    pub requested_width_cm: f64,
    /// Catalog width plus compensation.
    pub compensated_width_cm: f64,
    /// Width actually printed after pixel rounding.
    pub realized_width_cm: f64,
    pub labels: LabelPlacement,
}

/// Film compositor, built once per run from the configuration.
///
/// Holds no state that changes between calls: the same inputs always give
/// the same film.
#[derive(Debug)]
pub struct Compositor {
    geometry: FilmGeometry,
    style: LabelStyle,
    fallback: FallbackLayout,
    font: LabelFont,
}

impl Compositor {
    /// Build a compositor, searching for a label font.
    pub fn new(config: &FilmConfig) -> Result<Self, ConfigError> {
        let font = LabelFont::search(&config.labels.font_paths);
        Self::with_font(config, font)
    }

    /// Build a compositor with an already chosen font.
    pub fn with_font(config: &FilmConfig, font: LabelFont) -> Result<Self, ConfigError> {
        Ok(Self {
            geometry: FilmGeometry::from_config(config),
            style: LabelStyle::from_config(config)?,
            fallback: FallbackLayout::from_config(config),
            font,
        })
    }

    pub fn geometry(&self) -> &FilmGeometry {
        &self.geometry
    }

    pub fn font(&self) -> &LabelFont {
        &self.font
    }

    /// Compose one film.
    ///
    /// `device` supplies the physical width and the on-film label; `order` is
    /// drawn verbatim.
    pub fn compose(
        &self,
        source: &DynamicImage,
        device: &DeviceModel,
        order: &OrderId,
    ) -> Result<Composition, ComposeError> {
        let (src_w, src_h) = (source.width(), source.height());
        if src_w == 0 || src_h == 0 {
            return Err(ComposeError::EmptySource {
                width: src_w,
                height: src_h,
            });
        }

        let target_w = self.geometry.target_width_px(device.width_cm);
        if target_w == 0 {
            return Err(ComposeError::ZeroWidth {
                model: device.name.clone(),
            });
        }
        let (canvas_w, canvas_h) = (self.geometry.width_px, self.geometry.height_px);
        let too_large = || ComposeError::TooLarge {
            model: device.name.clone(),
            width: target_w,
            height: target_w as u64 * src_h as u64 / src_w as u64,
        };
        let (target_w, target_h) =
            target_dimensions((src_w, src_h), target_w).ok_or_else(too_large)?;
        if !within_limit(canvas_w, target_w, MAX_OVERSIZE)
            || !within_limit(canvas_h, target_h, MAX_OVERSIZE)
        {
            return Err(too_large());
        }

        let rgba = source.to_rgba8();
        let mirrored = imageops::flip_horizontal(&rgba);
        let resized = imageops::resize(&mirrored, target_w, target_h, FilterType::Lanczos3);

        let mut canvas = RgbaImage::new(canvas_w, canvas_h);
        let offset = (
            centered_offset(canvas_w, target_w),
            centered_offset(canvas_h, target_h),
        );
        imageops::overlay(&mut canvas, &resized, offset.0, offset.1);

        let labels = draw_labels(
            &mut canvas,
            &self.font,
            &self.geometry,
            &self.style,
            &self.fallback,
            order.as_str(),
            &device.display_label(),
        );

        Ok(Composition {
            canvas,
            target: (target_w, target_h),
            offset,
            overflow_px: overflow(canvas_h, target_h),
            requested_width_cm: device.width_cm,
            compensated_width_cm: self.geometry.compensated_width_cm(device.width_cm),
            realized_width_cm: px_to_cm(target_w, self.geometry.dpi),
            labels,
        })
    }
}
