//! Device catalog: physical case widths keyed by canonical model name.
//!
//! The catalog is read once at startup and never changes afterwards. The
//! builtin table covers every model the detector can return; a replacement
//! table can be loaded from TOML:
//!
//! ```toml
//! [[device]]
//! name = "iPhone 15 Pro"
//! width_cm = 9.8
//! category = "regular"
//!
//! [[device]]
//! name = "iPhone 15 Pro Max"
//! width_cm = 10.65
//! category = "plus_max"
//! file_name = "iPhone15ProMax"   # optional, defaults to the name without spaces
//! label = "IP 15 Pro Max"        # optional, defaults to "iPhone" → "IP"
//! ```
//!
//! Entries keep file order; the manual picker lists them in that order.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::naming;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Device {name:?} has invalid width {width_cm}cm, expected a positive number")]
    InvalidWidth { name: String, width_cm: f64 },
    #[error("Device {0:?} is listed more than once")]
    Duplicate(String),
    #[error("Catalog has no devices")]
    Empty,
}

/// One device the films can be cut for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceModel {
    /// Canonical name, the key used by detection and manual selection.
    pub name: String,
    /// Physical case width the artwork must match, before compensation.
    pub width_cm: f64,
    /// Width class tag. Informational only.
    pub category: String,
    /// Override for the output filename part.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Override for the on-film label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl DeviceModel {
    pub fn new(name: &str, width_cm: f64, category: &str) -> Self {
        Self {
            name: name.to_string(),
            width_cm,
            category: category.to_string(),
            file_name: None,
            label: None,
        }
    }

    /// Name used in output filenames (`iPhone15ProMax`).
    pub fn file_safe_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| naming::file_safe_name(&self.name))
    }

    /// Short label drawn on the film (`IP 15 Pro Max`).
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| naming::display_label(&self.name))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    device: Vec<DeviceModel>,
}

/// Read-only lookup of [`DeviceModel`]s by canonical name.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    devices: Vec<DeviceModel>,
}

/// `(name, width_cm, category)` in manual-selection order, newest series first.
const BUILTIN: &[(&str, f64, &str)] = &[
    ("iPhone 16 Pro Max", 10.65, "plus_max"),
    ("iPhone 16 Plus", 10.65, "plus_max"),
    ("iPhone 16 Pro", 9.8, "regular"),
    ("iPhone 16", 9.8, "regular"),
    ("iPhone 15 Pro Max", 10.65, "plus_max"),
    ("iPhone 15 Plus", 10.65, "plus_max"),
    ("iPhone 15 Pro", 9.8, "regular"),
    ("iPhone 15", 9.8, "regular"),
    ("iPhone 14 Pro Max", 10.65, "plus_max"),
    ("iPhone 14 Plus", 10.65, "plus_max"),
    ("iPhone 14 Pro", 9.8, "regular"),
    ("iPhone 14", 9.8, "regular"),
    ("iPhone 13 Pro Max", 10.65, "plus_max"),
    ("iPhone 13 Pro", 9.8, "regular"),
    ("iPhone 13", 9.8, "regular"),
    ("iPhone 13 mini", 9.0, "mini"),
    ("iPhone 12 Pro Max", 10.65, "plus_max"),
    ("iPhone 12 Pro", 9.8, "regular"),
    ("iPhone 12", 9.8, "regular"),
    ("iPhone 12 mini", 9.0, "mini"),
    ("iPhone 11 Pro Max", 10.8, "xs_max"),
    ("iPhone 11 Pro", 10.0, "x_xs"),
    ("iPhone 11", 10.5, "xr11"),
    ("iPhone XS Max", 10.7, "xs_max"),
    ("iPhone XS", 8.3, "x_xs"),
    ("iPhone XR", 10.5, "xr11"),
    ("iPhone X", 8.3, "x_xs"),
    ("iPhone 8 Plus", 10.8, "legacy_plus"),
    ("iPhone 8", 9.5, "legacy"),
    ("iPhone 7 Plus", 10.8, "legacy_plus"),
    ("iPhone 7", 9.5, "legacy"),
];

impl Catalog {
    /// Build a catalog, rejecting empty tables, duplicate names and widths
    /// that are not positive finite numbers.
    pub fn new(devices: Vec<DeviceModel>) -> Result<Self, CatalogError> {
        if devices.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, device) in devices.iter().enumerate() {
            if !(device.width_cm.is_finite() && device.width_cm > 0.0) {
                return Err(CatalogError::InvalidWidth {
                    name: device.name.clone(),
                    width_cm: device.width_cm,
                });
            }
            if devices[..i].iter().any(|d| d.name == device.name) {
                return Err(CatalogError::Duplicate(device.name.clone()));
            }
        }
        Ok(Self { devices })
    }

    /// The production device table.
    pub fn builtin() -> Self {
        Self {
            devices: BUILTIN
                .iter()
                .map(|(name, width, category)| DeviceModel::new(name, *width, category))
                .collect(),
        }
    }

    /// Parse a catalog from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(content)?;
        Self::new(file.device)
    }

    /// Load a catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Look up a model by its exact canonical name.
    pub fn get(&self, name: &str) -> Option<&DeviceModel> {
        self.devices.iter().find(|d| d.name == name)
    }

    pub fn devices(&self) -> &[DeviceModel] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
