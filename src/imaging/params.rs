//! Parameter types for film composition.
//!
//! These structs describe *what* to draw in pixels, derived once from the
//! physical [`FilmConfig`] so the compositor never touches centimeters after
//! construction.
//!
//! ## Types
//!
//! - [`FilmGeometry`]: sheet size, label margin and spacing in pixels, plus the
//!   width compensation still in centimeters (it is added before conversion).
//! - [`LabelStyle`]: label font sizes at the print resolution and the label color.
//! - [`FallbackLayout`]: bitmap-font magnification and model label offset.

use super::calculations::{cm_to_px, film_dimensions, scale_font_px};
use crate::config::{ConfigError, FilmConfig, parse_hex_color};
use image::Rgba;

/// Pixel geometry of one film sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilmGeometry {
    pub width_px: u32,
    pub height_px: u32,
    pub dpi: u32,
    pub margin_px: u32,
    pub spacing_px: u32,
    pub width_compensation_cm: f64,
}

impl FilmGeometry {
    pub fn from_config(config: &FilmConfig) -> Self {
        let dpi = config.film.dpi;
        let (width_px, height_px) =
            film_dimensions(config.film.width_cm, config.film.height_cm, dpi);
        Self {
            width_px,
            height_px,
            dpi,
            margin_px: cm_to_px(config.layout.margin_cm, dpi),
            spacing_px: cm_to_px(config.layout.label_spacing_cm, dpi),
            width_compensation_cm: config.layout.width_compensation_cm,
        }
    }

    /// Device width plus compensation, in centimeters.
    pub fn compensated_width_cm(&self, device_width_cm: f64) -> f64 {
        device_width_cm + self.width_compensation_cm
    }

    /// Device width plus compensation, in pixels.
    pub fn target_width_px(&self, device_width_cm: f64) -> u32 {
        cm_to_px(self.compensated_width_cm(device_width_cm), self.dpi)
    }
}

/// How the two labels look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    pub order_px: f32,
    pub model_px: f32,
    pub color: Rgba<u8>,
}

impl LabelStyle {
    pub fn from_config(config: &FilmConfig) -> Result<Self, ConfigError> {
        let [r, g, b] = parse_hex_color(&config.labels.color)?;
        Ok(Self {
            order_px: scale_font_px(config.labels.order_font_px, config.film.dpi),
            model_px: scale_font_px(config.labels.model_font_px, config.film.dpi),
            color: Rgba([r, g, b, 255]),
        })
    }
}

/// Simplified label layout used with the bitmap font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackLayout {
    pub scale: u32,
    /// Model label x position, measured from the margin.
    pub offset_px: u32,
}

impl FallbackLayout {
    pub fn from_config(config: &FilmConfig) -> Self {
        Self {
            scale: config.labels.fallback_scale.max(1),
            offset_px: config.labels.fallback_offset_px,
        }
    }
}
