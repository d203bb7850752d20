//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Each file leads with its name and what it resolved to; measurements and
//! the saved film follow as indented context lines. Warnings and errors are
//! flush left so they stand out in a long run.
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! Processing 3 files → /jobs/orders (PRINT MODE)
//! 3_iphone15pro.png → order 3, iPhone 15 Pro
//!     Width: 9.8cm → 10.1cm (1193px) → 10.101cm
//!     Saved: 3_iPhone15Pro.png
//! Warning: no order number in xyz.png, using 1
//! Warning: could not detect model for xyz.png
//! Skipped: xyz.png (no model selected)
//!
//! Processed 1 file → /jobs/orders (PRINT MODE)
//! Skipped 1 file
//!     xyz.png (no model selected)
//! ```
//!
//! ## Detect
//!
//! ```text
//! 07-IP16PROMAX.jpg → order 07, iPhone 16 Pro Max → 07_iPhone16ProMax.png
//! xyz.png → order 1 (fallback), no model
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and, where the CLI needs it, a `print_*` wrapper that writes
//! to stdout. Format functions are pure: no I/O, no side effects.

use crate::catalog::Catalog;
use crate::detect;
use crate::naming;
use crate::process::{BatchReport, ProcessEvent};
use crate::types::{OrderId, Resolution};

// ============================================================================
// Shared helpers
// ============================================================================

/// Indentation string for a given depth (4 spaces per level).
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `"1 file"`, `"3 files"`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Centimeters with at most two decimals and no trailing zeros.
fn cm(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ============================================================================
// Process
// ============================================================================

/// Format a single process event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    let line = match event {
        ProcessEvent::BatchStarted {
            file_count,
            output_dir,
        } => format!("Processing {} → {}", count(*file_count, "file"), output_dir),
        ProcessEvent::FontFallback => {
            "Warning: no scalable font found, labels use the bitmap font".to_string()
        }
        ProcessEvent::OrderFallback { filename, order } => {
            format!("Warning: no order number in {filename}, using {order}")
        }
        ProcessEvent::DetectionFailed { filename } => {
            format!("Warning: could not detect model for {filename}")
        }
        ProcessEvent::ManualSelected { filename, model } => {
            format!("Selected: {filename} → {model}")
        }
        ProcessEvent::Skipped { filename, reason } => format!("Skipped: {filename} ({reason})"),
        ProcessEvent::Resolved {
            filename,
            order,
            model,
        } => format!("{filename} → order {order}, {model}"),
        ProcessEvent::Clipped {
            filename,
            height_px,
            canvas_height_px,
            overflow_px,
            width_cm,
        } => format!(
            "{}Warning: {} is {}px tall on a {}px sheet, {}px clipped to keep {}cm width",
            indent(1),
            filename,
            height_px,
            canvas_height_px,
            overflow_px,
            cm(*width_cm)
        ),
        ProcessEvent::WidthRealized {
            requested_cm,
            compensated_cm,
            target_px,
            realized_cm,
            ..
        } => format!(
            "{}Width: {}cm → {}cm ({}px) → {:.3}cm",
            indent(1),
            cm(*requested_cm),
            cm(*compensated_cm),
            target_px,
            realized_cm
        ),
        ProcessEvent::Saved { output, .. } => format!("{}Saved: {}", indent(1), output),
        ProcessEvent::Failed { filename, reason } => format!("Error: {filename}: {reason}"),
    };
    vec![line]
}

/// Format the end-of-run summary.
pub fn format_batch_summary(report: &BatchReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Processed {} → {}",
        count(report.processed_count(), "file"),
        report.output_dir.display()
    )];
    let clipped = report.processed.iter().filter(|f| f.clipped).count();
    if clipped > 0 {
        lines.push(format!("{}{} clipped", indent(1), count(clipped, "film")));
    }
    if !report.skipped.is_empty() {
        lines.push(format!("Skipped {}", count(report.skipped.len(), "file")));
        for file in &report.skipped {
            lines.push(format!("{}{} ({})", indent(1), file.filename, file.reason));
        }
    }
    if !report.failed.is_empty() {
        lines.push(format!("Failed {}", count(report.failed.len(), "file")));
        for file in &report.failed {
            lines.push(format!("{}{}: {}", indent(1), file.filename, file.reason));
        }
    }
    lines
}

/// Print the end-of-run summary to stdout.
pub fn print_batch_summary(report: &BatchReport) {
    for line in format_batch_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Detect
// ============================================================================

/// One line describing how a filename resolves, without touching any file.
pub fn format_resolution(resolution: &Resolution, catalog: &Catalog) -> String {
    let order = match &resolution.order {
        Some(order) => format!("order {order}"),
        None => format!("order {} (fallback)", OrderId::FALLBACK),
    };
    let Some(model) = resolution.model else {
        return format!("{} → {}, no model", resolution.filename, order);
    };
    let order_id = resolution.order.clone().unwrap_or_else(OrderId::fallback);
    let file_safe = catalog
        .get(model)
        .map(|d| d.file_safe_name())
        .unwrap_or_else(|| detect::presentation_names(model).0);
    format!(
        "{} → {}, {} → {}",
        resolution.filename,
        order,
        model,
        naming::output_filename(&order_id, &file_safe)
    )
}

// ============================================================================
// Models
// ============================================================================

/// Catalog listing: number, name, width, category and label.
pub fn format_models(catalog: &Catalog) -> Vec<String> {
    let name_width = catalog
        .devices()
        .iter()
        .map(|d| d.name.len())
        .max()
        .unwrap_or(0);
    let index_width = catalog.len().to_string().len();
    catalog
        .devices()
        .iter()
        .enumerate()
        .map(|(i, d)| {
            format!(
                "{:>iw$} {:<nw$}  {:>6}cm  {:<11}  {}",
                i + 1,
                d.name,
                cm(d.width_cm),
                d.category,
                d.display_label(),
                iw = index_width,
                nw = name_width,
            )
        })
        .collect()
}
