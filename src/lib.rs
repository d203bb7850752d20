//! # Case Film
//!
//! Batch converter from customer artwork to print-ready phone-case films.
//! Every input filename carries an order number and, loosely, the device it
//! is for; every output is a transparent sheet-sized PNG with the mirrored
//! artwork at the exact physical case width and two small gray labels.
//!
//! # Architecture: Resolve, Then Compose
//!
//! Two independent parts meet in the batch workflow:
//!
//! ```text
//! 3_iphone15pro.png ──resolve──▶ (order "3", "iPhone 15 Pro")
//!                                        │ catalog: 9.8cm
//!                                        ▼
//! artwork pixels ─────────compose──▶ 1748×3012 film ──▶ 3_iPhone15Pro.png
//! ```
//!
//! - The **resolver** ([`naming`], [`detect`]) is a pure function of the
//!   filename. It never guesses: when no rule matches it says so and the
//!   workflow asks a [`picker`].
//! - The **compositor** ([`imaging`]) is built once from the [`config`] and
//!   holds no state between files, so the same inputs always give the same
//!   film.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Shared types: `OrderId`, `Resolution`, `ManualChoice` |
//! | [`naming`] | Order prefix extraction, filename normalization, output names |
//! | [`detect`] | Ordered model detection rules and `resolve` |
//! | [`catalog`] | Device widths: builtin table or TOML file |
//! | [`config`] | `config.toml` loading and validation of the physical constants |
//! | [`imaging`] | Decode/encode backend, print geometry, labels, compositor |
//! | [`picker`] | Manual model selection when detection fails |
//! | [`scan`] | Input discovery and output folder policy |
//! | [`process`] | The batch workflow, its events and its report |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Rule Order Is the Contract
//!
//! Detection evaluates an explicit ordered list, newest generation first and
//! most specific variant first within a generation, with bare-number rules
//! last. Changing the order changes what ambiguous filenames resolve to, so
//! the table is a `Vec`, never a map, and its order is pinned by tests.
//!
//! ## Width Over Height
//!
//! A film that is too tall is clipped rather than shrunk: the printed width
//! always matches the catalog width plus compensation, and the overflow is
//! reported.
//!
//! ## One Rounding Rule
//!
//! Every centimeter value (sheet, width, margin, spacing) goes through the
//! same `round(cm × dpi / 2.54)` so layouts are reproducible to the pixel.

pub mod catalog;
pub mod config;
pub mod detect;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod picker;
pub mod process;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
