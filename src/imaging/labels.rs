//! Order and model labels drawn on the film.
//!
//! Both labels sit on one line at the top-left margin: the order in the large
//! size, then the short model name in the small size, one label spacing to
//! the right. Text is drawn once in a single pass.
//!
//! A scalable font is searched for in the configured paths, then in a list
//! of common system locations (narrow and light faces first to save ink).
//! When none loads, the embedded [`bitmap_font`](super::bitmap_font) is used
//! and the model label goes to a fixed offset instead of following the order
//! label's measured width.

use super::bitmap_font;
use super::params::{FallbackLayout, FilmGeometry, LabelStyle};
use ab_glyph::{FontVec, PxScale};
use image::RgbaImage;
use imageproc::drawing::{draw_text_mut, text_size};
use std::path::{Path, PathBuf};

/// System fonts tried after the configured ones.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation/LiberationSansNarrow-Regular.ttf",
    "/usr/share/fonts/truetype/liberation2/LiberationSansNarrow-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansCondensed.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial Narrow.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arialn.ttf",
    "C:\\Windows\\Fonts\\calibril.ttf",
    "C:\\Windows\\Fonts\\segoeuil.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font used for both labels.
pub enum LabelFont {
    Scalable { font: FontVec, path: PathBuf },
    Bitmap,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalable { path, .. } => f.debug_tuple("Scalable").field(path).finish(),
            Self::Bitmap => f.write_str("Bitmap"),
        }
    }
}

impl LabelFont {
    /// Load one font file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let data = std::fs::read(path).ok()?;
        let font = FontVec::try_from_vec(data).ok()?;
        Some(Self::Scalable {
            font,
            path: path.to_path_buf(),
        })
    }

    /// First loadable font among `configured`, then [`SYSTEM_FONT_PATHS`];
    /// the bitmap font when nothing loads.
    pub fn search(configured: &[String]) -> Self {
        configured
            .iter()
            .map(String::as_str)
            .chain(SYSTEM_FONT_PATHS.iter().copied())
            .find_map(|p| Self::from_path(Path::new(p)))
            .unwrap_or(Self::Bitmap)
    }

    pub fn is_bitmap(&self) -> bool {
        matches!(self, Self::Bitmap)
    }

    /// Font file in use, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Scalable { path, .. } => Some(path),
            Self::Bitmap => None,
        }
    }
}

/// Pixel positions of the two labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPlacement {
    pub order: (i32, i32),
    pub model: (i32, i32),
}

/// Model label x for a measured order label width.
pub fn model_label_x(margin_px: u32, order_width_px: u32, spacing_px: u32) -> i32 {
    (margin_px + order_width_px + spacing_px) as i32
}

/// Draw the order and model labels, returning where they were placed.
pub fn draw_labels(
    canvas: &mut RgbaImage,
    font: &LabelFont,
    geometry: &FilmGeometry,
    style: &LabelStyle,
    fallback: &FallbackLayout,
    order: &str,
    model: &str,
) -> LabelPlacement {
    let margin = geometry.margin_px as i32;
    let placement = match font {
        LabelFont::Scalable { font, .. } => {
            let order_scale = PxScale::from(style.order_px);
            let (order_width, _) = text_size(order_scale, font, order);
            LabelPlacement {
                order: (margin, margin),
                model: (
                    model_label_x(geometry.margin_px, order_width, geometry.spacing_px),
                    margin,
                ),
            }
        }
        LabelFont::Bitmap => LabelPlacement {
            order: (margin, margin),
            model: (margin + fallback.offset_px as i32, margin),
        },
    };

    match font {
        LabelFont::Scalable { font, .. } => {
            let (x, y) = placement.order;
            draw_text_mut(canvas, style.color, x, y, PxScale::from(style.order_px), font, order);
            let (x, y) = placement.model;
            draw_text_mut(canvas, style.color, x, y, PxScale::from(style.model_px), font, model);
        }
        LabelFont::Bitmap => {
            let (x, y) = placement.order;
            bitmap_font::draw_text(canvas, style.color, x, y, fallback.scale, order);
            let (x, y) = placement.model;
            bitmap_font::draw_text(canvas, style.color, x, y, fallback.scale, model);
        }
    }
    placement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilmConfig;
    use image::Rgba;

    fn setup() -> (FilmGeometry, LabelStyle, FallbackLayout) {
        let config = FilmConfig::default();
        (
            FilmGeometry::from_config(&config),
            LabelStyle::from_config(&config).unwrap(),
            FallbackLayout::from_config(&config),
        )
    }

    #[test]
    fn model_label_follows_order_width() {
        assert_eq!(model_label_x(59, 120, 118), 297);
    }

    #[test]
    fn missing_font_paths_fall_back() {
        let font = LabelFont::search(&["/nonexistent/font.ttf".to_string()]);
        // A system font may exist on the test machine; the configured one cannot.
        assert_ne!(font.path(), Some(Path::new("/nonexistent/font.ttf")));
    }

    #[test]
    fn unreadable_font_file_is_skipped() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bogus = tmp.path().join("bogus.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();
        assert!(LabelFont::from_path(&bogus).is_none());
    }

    #[test]
    fn bitmap_layout_uses_fixed_offset() {
        let (geometry, style, fallback) = setup();
        let mut canvas = RgbaImage::new(geometry.width_px, geometry.height_px);
        let placement = draw_labels(
            &mut canvas,
            &LabelFont::Bitmap,
            &geometry,
            &style,
            &fallback,
            "3",
            "IP 15 Pro",
        );
        assert_eq!(placement.order, (59, 59));
        assert_eq!(placement.model, (259, 59));
    }

    #[test]
    fn bitmap_labels_are_gray_and_top_left() {
        let (geometry, style, fallback) = setup();
        let mut canvas = RgbaImage::new(geometry.width_px, geometry.height_px);
        draw_labels(
            &mut canvas,
            &LabelFont::Bitmap,
            &geometry,
            &style,
            &fallback,
            "12b",
            "IP 13 mini",
        );
        let mut inked = 0;
        for (x, y, p) in canvas.enumerate_pixels() {
            if p.0[3] != 0 {
                inked += 1;
                assert_eq!(*p, Rgba([128, 128, 128, 255]));
                assert!(x >= 59 && y >= 59 && y < 59 + 21, "stray ink at ({x}, {y})");
            }
        }
        assert!(inked > 0);
    }

    #[test]
    fn system_font_labels_when_available() {
        let font = LabelFont::search(&[]);
        let LabelFont::Scalable { .. } = font else {
            // Nothing to check on machines without any of the system fonts.
            return;
        };
        let (geometry, style, fallback) = setup();
        let mut canvas = RgbaImage::new(geometry.width_px, geometry.height_px);
        let placement =
            draw_labels(&mut canvas, &font, &geometry, &style, &fallback, "3", "IP 15 Pro");
        assert_eq!(placement.order, (59, 59));
        // Order width plus one spacing
        assert!(placement.model.0 > 59 + 118);
        assert!(canvas.pixels().any(|p| p.0[3] != 0));
    }
}
