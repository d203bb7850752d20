//! Pure calculation functions for print geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//! Every physical measurement goes through [`cm_to_px`] so that sheet size,
//! artwork width, margins and spacing all round the same way.

/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;

/// Resolution the configured label font sizes refer to.
pub const REFERENCE_DPI: u32 = 300;

/// Convert a physical length to pixels: `round(cm * dpi / 2.54)`.
///
/// Exact halves round to even.
///
/// # Examples
/// ```
/// # use case_film::imaging::cm_to_px;
/// assert_eq!(cm_to_px(14.8, 300), 1748);
/// assert_eq!(cm_to_px(25.5, 300), 3012);
/// ```
pub fn cm_to_px(cm: f64, dpi: u32) -> u32 {
    let px = (cm * dpi as f64 / CM_PER_INCH).round_ties_even();
    if px <= 0.0 { 0 } else { px as u32 }
}

/// Physical length of a pixel run.
pub fn px_to_cm(px: u32, dpi: u32) -> f64 {
    px as f64 * CM_PER_INCH / dpi as f64
}

/// Pixel dimensions of the film sheet.
pub fn film_dimensions(width_cm: f64, height_cm: f64, dpi: u32) -> (u32, u32) {
    (cm_to_px(width_cm, dpi), cm_to_px(height_cm, dpi))
}

/// Target size of the artwork on the film.
///
/// # Arguments
/// * `source` - Decoded artwork dimensions (width, height)
/// * `target_width_px` - Compensated device width in pixels
///
/// # Returns
/// * `Some((width, height))` - Width exactly as given, height preserving the
///   source aspect ratio (`round(width * h / w)`, at least 1)
/// * `None` - The height does not fit in a `u32`
pub fn target_dimensions(source: (u32, u32), target_width_px: u32) -> Option<(u32, u32)> {
    let (src_w, src_h) = source;
    let aspect = src_h as f64 / src_w.max(1) as f64;
    let height = (target_width_px as f64 * aspect).round_ties_even();
    if height > u32::MAX as f64 {
        return None;
    }
    Some((target_width_px, (height as u32).max(1)))
}

/// Whether a scaled artwork run is small enough to allocate, given as a
/// multiple of the canvas run.
pub fn within_limit(canvas: u32, image: u32, max_factor: u32) -> bool {
    image as u64 <= canvas as u64 * max_factor as u64
}

/// Offset that centers an image run of `image` pixels on `canvas` pixels.
///
/// Floor division, so an oversized image gets a negative offset and an odd
/// slack puts the extra pixel after the image.
pub fn centered_offset(canvas: u32, image: u32) -> i64 {
    (canvas as i64 - image as i64).div_euclid(2)
}

/// Pixels by which an image run exceeds the canvas, if it does.
pub fn overflow(canvas: u32, image: u32) -> Option<u32> {
    image.checked_sub(canvas).filter(|&excess| excess > 0)
}

/// Scale a font size given at [`REFERENCE_DPI`] to the print resolution.
pub fn scale_font_px(px_at_reference: f32, dpi: u32) -> f32 {
    px_at_reference * dpi as f32 / REFERENCE_DPI as f32
}
