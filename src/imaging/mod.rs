//! Film imaging: pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (PNG, JPEG, TIFF, WebP) |
//! | **Mirror + resize** | `imageops::flip_horizontal` + Lanczos3 `imageops::resize` |
//! | **Composite** | `imageops::overlay` on a transparent canvas |
//! | **Labels** | `imageproc::drawing::draw_text_mut` with an `ab_glyph` font, or the embedded bitmap font |
//! | **Encode** | PNG into memory, then one file write |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for print geometry (unit testable)
//! - **Parameters**: Pixel geometry and label style derived from the config
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Labels**: font search and label drawing
//! - **Compose**: [`Compositor`], combining calculations and labels

pub mod backend;
mod bitmap_font;
mod calculations;
pub mod compose;
pub mod labels;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{
    CM_PER_INCH, centered_offset, cm_to_px, film_dimensions, px_to_cm, target_dimensions,
};
pub use compose::{ComposeError, Composition, Compositor};
pub use labels::{LabelFont, LabelPlacement};
pub use params::{FallbackLayout, FilmGeometry, LabelStyle};
pub use rust_backend::RustBackend;
