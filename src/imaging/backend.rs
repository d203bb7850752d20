//! Image I/O backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two operations that touch the disk:
//! decoding artwork and writing finished films. Everything between the two
//! (flip, resize, canvas, labels) is pure pixel work in
//! [`compose`](super::compose) and needs no backend.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests swap in the
//! recording [`MockBackend`](tests::MockBackend).

use image::{DynamicImage, RgbaImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: String, reason: String },
    #[error("Failed to encode {path}: {reason}")]
    Encode { path: String, reason: String },
}

/// Trait for image I/O backends.
pub trait ImageBackend {
    /// Read and decode an artwork file.
    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode a film as PNG and write it to `path`.
    ///
    /// The file is only created once encoding succeeded, so a failure never
    /// leaves a partial film behind.
    fn save_png(&self, image: &RgbaImage, path: &Path) -> Result<(), BackendError>;
}
