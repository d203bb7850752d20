//! Shared test utilities for the case-film test suite.
//!
//! Synthetic artwork, a scripted picker that records what it was asked, and
//! event collection for the batch workflow.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let backend = MockBackend::with_images(vec![("3_iphone15pro.png", portrait(100, 200))]);
//! let mut picker = ScriptedPicker::new(vec![]);
//! let (report, events) = run_with_events(|tx| {
//!     process_batch_with(&backend, &compositor(), &Catalog::builtin(), &batch, &mut picker, Some(tx))
//! });
//! ```

use image::{DynamicImage, Rgba, RgbaImage};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};

use crate::catalog::Catalog;
use crate::config::FilmConfig;
use crate::imaging::{Compositor, LabelFont};
use crate::picker::ModelPicker;
use crate::process::ProcessEvent;
use crate::scan::{Batch, BatchMode, InputFile};
use crate::types::ManualChoice;

// =========================================================================
// Images
// =========================================================================

/// Opaque portrait artwork, darker at the top so flips are visible.
pub fn portrait(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 200, 255])
    }))
}

/// Compositor with the bitmap font, identical on every machine.
pub fn compositor() -> Compositor {
    Compositor::with_font(&FilmConfig::default(), LabelFont::Bitmap).unwrap()
}

// =========================================================================
// Batches
// =========================================================================

/// File-list batch over bare names under `/in`, writing to `/out`.
pub fn file_batch(names: &[&str]) -> Batch {
    Batch {
        mode: BatchMode::Files,
        inputs: names
            .iter()
            .map(|name| InputFile {
                path: PathBuf::from("/in").join(name),
                filename: name.to_string(),
                relative_dir: PathBuf::new(),
            })
            .collect(),
        output_dir: PathBuf::from("/out"),
    }
}

// =========================================================================
// Picker
// =========================================================================

/// Answers manual requests from a script and records each filename asked.
pub struct ScriptedPicker {
    answers: Vec<ManualChoice>,
    pub asked: Vec<String>,
}

impl ScriptedPicker {
    pub fn new(answers: Vec<ManualChoice>) -> Self {
        Self {
            answers: answers.into_iter().rev().collect(),
            asked: Vec::new(),
        }
    }
}

impl ModelPicker for ScriptedPicker {
    fn request_model(&mut self, filename: &str, _catalog: &Catalog) -> ManualChoice {
        self.asked.push(filename.to_string());
        self.answers.pop().unwrap_or(ManualChoice::Cancelled)
    }
}

// =========================================================================
// Events
// =========================================================================

/// Run `f` with an event sender and return its result plus every event sent.
pub fn run_with_events<T>(f: impl FnOnce(Sender<ProcessEvent>) -> T) -> (T, Vec<ProcessEvent>) {
    let (tx, rx) = mpsc::channel();
    let result = f(tx);
    (result, rx.try_iter().collect())
}
