//! Batch workflow: artwork files in, print films out.
//!
//! For each input, in order:
//!
//! 1. Extract the order from the filename, falling back to `1` with a warning.
//! 2. Detect the model; on failure ask the [`ModelPicker`]. A cancelled pick
//!    skips the file.
//! 3. Look the model up in the [`Catalog`]. A miss fails the file.
//! 4. Decode, compose and save the film as `{order}_{Model}.png` in the
//!    file's output folder.
//!
//! No per-file failure stops the batch. Only setup problems (config, output
//! folder creation) return an error; everything else ends up in the
//! [`BatchReport`].
//!
//! ## Output Structure
//!
//! ```text
//! orders (PRINT MODE)/
//! ├── 3_iPhone15Pro.png
//! ├── 07_iPhone16ProMax.png
//! └── monday/
//!     └── 5b_iPhoneX.png
//! ```
//!
//! Progress is reported through an optional [`ProcessEvent`] channel. Sending
//! never blocks the batch: with no channel, or once the receiver is gone,
//! events are dropped.

use crate::catalog::{Catalog, DeviceModel};
use crate::config::{ConfigError, FilmConfig};
use crate::detect;
use crate::imaging::{Compositor, ImageBackend, RustBackend};
use crate::naming;
use crate::picker::ModelPicker;
use crate::scan::{Batch, InputFile};
use crate::types::{ManualChoice, OrderId};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Cannot create output folder {path}: {source}")]
    OutputFolder {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Progress and diagnostics emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    BatchStarted {
        file_count: usize,
        output_dir: String,
    },
    /// No scalable font loaded; labels use the bitmap font.
    FontFallback,
    /// The filename has no leading order digits.
    OrderFallback { filename: String, order: String },
    DetectionFailed { filename: String },
    ManualSelected { filename: String, model: String },
    Skipped { filename: String, reason: String },
    Resolved {
        filename: String,
        order: String,
        model: String,
    },
    /// Artwork is taller than the sheet and was clipped to keep its width.
    Clipped {
        filename: String,
        height_px: u32,
        canvas_height_px: u32,
        overflow_px: u32,
        width_cm: f64,
    },
    WidthRealized {
        filename: String,
        requested_cm: f64,
        compensated_cm: f64,
        target_px: u32,
        realized_cm: f64,
    },
    Saved { filename: String, output: String },
    Failed { filename: String, reason: String },
}

/// One film written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedFile {
    pub filename: String,
    pub order: OrderId,
    pub model: String,
    pub output: PathBuf,
    /// Artwork overflowed the sheet height.
    pub clipped: bool,
}

/// A file that produced no film, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub filename: String,
    pub reason: String,
}

/// Result of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub processed: Vec<ProcessedFile>,
    /// Files deliberately left out (no model chosen).
    pub skipped: Vec<FileFailure>,
    pub failed: Vec<FileFailure>,
}

impl BatchReport {
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
enum FileOutcome {
    Saved(ProcessedFile),
    Skipped(FileFailure),
    Failed(FileFailure),
}

/// Borrowed pieces every file needs.
struct Session<'a, B: ImageBackend> {
    backend: &'a B,
    compositor: &'a Compositor,
    catalog: &'a Catalog,
    events: Option<Sender<ProcessEvent>>,
}

impl<B: ImageBackend> Session<'_, B> {
    fn emit(&self, event: ProcessEvent) {
        if let Some(tx) = &self.events {
            // A gone receiver only means nobody is listening.
            let _ = tx.send(event);
        }
    }

    fn fail(&self, filename: &str, reason: String) -> FileOutcome {
        self.emit(ProcessEvent::Failed {
            filename: filename.to_string(),
            reason: reason.clone(),
        });
        FileOutcome::Failed(FileFailure {
            filename: filename.to_string(),
            reason,
        })
    }

    /// Order from the filename, or the fallback with a warning.
    fn order_for(&self, filename: &str) -> OrderId {
        naming::extract_order(filename).unwrap_or_else(|| {
            let order = OrderId::fallback();
            self.emit(ProcessEvent::OrderFallback {
                filename: filename.to_string(),
                order: order.to_string(),
            });
            order
        })
    }

    /// Detected model name, or the picker's choice. `None` means skip.
    fn model_for(&self, filename: &str, picker: &mut dyn ModelPicker) -> Option<String> {
        if let Some(model) = detect::detect_model(filename) {
            return Some(model.to_string());
        }
        self.emit(ProcessEvent::DetectionFailed {
            filename: filename.to_string(),
        });
        match picker.request_model(filename, self.catalog) {
            ManualChoice::Selected(model) => {
                self.emit(ProcessEvent::ManualSelected {
                    filename: filename.to_string(),
                    model: model.clone(),
                });
                Some(model)
            }
            ManualChoice::Cancelled => None,
        }
    }

    fn process_file(
        &self,
        input: &InputFile,
        output_dir: &Path,
        picker: &mut dyn ModelPicker,
    ) -> FileOutcome {
        let filename = input.filename.as_str();
        let order = self.order_for(filename);

        let Some(model) = self.model_for(filename, picker) else {
            let reason = "no model selected".to_string();
            self.emit(ProcessEvent::Skipped {
                filename: filename.to_string(),
                reason: reason.clone(),
            });
            return FileOutcome::Skipped(FileFailure {
                filename: filename.to_string(),
                reason,
            });
        };

        self.emit(ProcessEvent::Resolved {
            filename: filename.to_string(),
            order: order.to_string(),
            model: model.clone(),
        });

        let Some(device) = self.catalog.get(&model) else {
            return self.fail(filename, format!("{model} is not in the catalog"));
        };

        match self.render(input, device, &order, output_dir) {
            Ok(processed) => FileOutcome::Saved(processed),
            Err(reason) => self.fail(filename, reason),
        }
    }

    fn render(
        &self,
        input: &InputFile,
        device: &DeviceModel,
        order: &OrderId,
        output_dir: &Path,
    ) -> Result<ProcessedFile, String> {
        let filename = input.filename.as_str();
        let source = self.backend.decode(&input.path).map_err(|e| e.to_string())?;
        let film = self
            .compositor
            .compose(&source, device, order)
            .map_err(|e| e.to_string())?;

        if let Some(overflow_px) = film.overflow_px {
            self.emit(ProcessEvent::Clipped {
                filename: filename.to_string(),
                height_px: film.target.1,
                canvas_height_px: self.compositor.geometry().height_px,
                overflow_px,
                width_cm: film.requested_width_cm,
            });
        }
        self.emit(ProcessEvent::WidthRealized {
            filename: filename.to_string(),
            requested_cm: film.requested_width_cm,
            compensated_cm: film.compensated_width_cm,
            target_px: film.target.0,
            realized_cm: film.realized_width_cm,
        });

        let dir = input.output_dir(output_dir);
        fs::create_dir_all(&dir)
            .map_err(|e| format!("cannot create {}: {}", dir.display(), e))?;
        let output_name = naming::output_filename(order, &device.file_safe_name());
        let output = dir.join(&output_name);
        self.backend
            .save_png(&film.canvas, &output)
            .map_err(|e| e.to_string())?;

        self.emit(ProcessEvent::Saved {
            filename: filename.to_string(),
            output: output_name,
        });
        Ok(ProcessedFile {
            filename: filename.to_string(),
            order: order.clone(),
            model: device.name.clone(),
            output,
            clipped: film.overflow_px.is_some(),
        })
    }
}

/// Run a batch with the production backend and a compositor built from
/// `config`.
pub fn process_batch(
    batch: &Batch,
    catalog: &Catalog,
    config: &FilmConfig,
    picker: &mut dyn ModelPicker,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    let compositor = Compositor::new(config)?;
    process_batch_with(&RustBackend::new(), &compositor, catalog, batch, picker, events)
}

/// Run a batch with any backend. Files are processed one at a time, in
/// batch order.
pub fn process_batch_with(
    backend: &impl ImageBackend,
    compositor: &Compositor,
    catalog: &Catalog,
    batch: &Batch,
    picker: &mut dyn ModelPicker,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    let session = Session {
        backend,
        compositor,
        catalog,
        events,
    };

    fs::create_dir_all(&batch.output_dir).map_err(|source| ProcessError::OutputFolder {
        path: batch.output_dir.clone(),
        source,
    })?;

    session.emit(ProcessEvent::BatchStarted {
        file_count: batch.inputs.len(),
        output_dir: batch.output_dir.display().to_string(),
    });
    if compositor.font().is_bitmap() {
        session.emit(ProcessEvent::FontFallback);
    }

    let mut report = BatchReport {
        output_dir: batch.output_dir.clone(),
        ..BatchReport::default()
    };
    for input in &batch.inputs {
        match session.process_file(input, &batch.output_dir, picker) {
            FileOutcome::Saved(file) => report.processed.push(file),
            FileOutcome::Skipped(file) => report.skipped.push(file),
            FileOutcome::Failed(file) => report.failed.push(file),
        }
    }
    Ok(report)
}

/// Write the report as pretty JSON.
pub fn write_report(report: &BatchReport, path: &Path) -> Result<(), ProcessError> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
