//! Print configuration.
//!
//! Every physical constant of the film layout lives here, loaded once and
//! handed to the compositor. Without a config file the production values
//! apply; a `config.toml` only needs the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [film]
//! width_cm = 14.8           # Film sheet width
//! height_cm = 25.5          # Film sheet height
//! dpi = 300                 # Print resolution
//!
//! [layout]
//! width_compensation_cm = 0.3   # Added to every device width before scaling
//! margin_cm = 0.5               # Label distance from the top-left corner
//! label_spacing_cm = 1.0        # Gap between order and model labels
//!
//! [labels]
//! order_font_px = 104.0     # Order label size at 300 dpi
//! model_font_px = 64.0      # Model label size at 300 dpi
//! color = "#808080"         # Mid gray, light on ink
//! font_paths = []           # Tried before the system font list
//! fallback_scale = 3        # Bitmap font pixel size when no font loads
//! fallback_offset_px = 200  # Model label x offset from the margin in bitmap mode
//!
//! [output]
//! extensions = ["png", "jpg", "jpeg"]
//! folder_suffix = " (PRINT MODE)"
//! files_folder = "PRINT_MODE_OUTPUT"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete print configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilmConfig {
    /// Physical film sheet and print resolution.
    pub film: FilmSheetConfig,
    /// Artwork sizing and label placement.
    pub layout: LayoutConfig,
    /// Label fonts and color.
    pub labels: LabelsConfig,
    /// Input filtering and output folder naming.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilmSheetConfig {
    pub width_cm: f64,
    pub height_cm: f64,
    pub dpi: u32,
}

impl Default for FilmSheetConfig {
    fn default() -> Self {
        Self {
            width_cm: 14.8,
            height_cm: 25.5,
            dpi: 300,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Corrects a systematic under-size of printed films.
    pub width_compensation_cm: f64,
    pub margin_cm: f64,
    pub label_spacing_cm: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width_compensation_cm: 0.3,
            margin_cm: 0.5,
            label_spacing_cm: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelsConfig {
    /// Order label size in pixels at 300 dpi; scaled with `film.dpi`.
    pub order_font_px: f32,
    /// Model label size in pixels at 300 dpi; scaled with `film.dpi`.
    pub model_font_px: f32,
    /// `#rrggbb` label color.
    pub color: String,
    /// Font files tried before the built-in system font list.
    pub font_paths: Vec<String>,
    /// Integer magnification of the bitmap fallback font.
    pub fallback_scale: u32,
    /// Horizontal distance from the margin to the model label in bitmap mode.
    pub fallback_offset_px: u32,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            order_font_px: 104.0,
            model_font_px: 64.0,
            color: "#808080".to_string(),
            font_paths: Vec::new(),
            fallback_scale: 3,
            fallback_offset_px: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Accepted input extensions, compared case-insensitively.
    pub extensions: Vec<String>,
    /// Appended to the input folder name in folder mode.
    pub folder_suffix: String,
    /// Output folder name in file-list mode.
    pub files_folder: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["png".into(), "jpg".into(), "jpeg".into()],
            folder_suffix: " (PRINT MODE)".to_string(),
            files_folder: "PRINT_MODE_OUTPUT".to_string(),
        }
    }
}

impl FilmConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("film.width_cm", self.film.width_cm),
            ("film.height_cm", self.film.height_cm),
        ];
        for (key, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a positive finite number"
                )));
            }
        }
        if self.film.dpi == 0 {
            return Err(ConfigError::Validation("film.dpi must be non-zero".into()));
        }
        let non_negative = [
            ("layout.width_compensation_cm", self.layout.width_compensation_cm),
            ("layout.margin_cm", self.layout.margin_cm),
            ("layout.label_spacing_cm", self.layout.label_spacing_cm),
        ];
        for (key, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a finite, non-negative number"
                )));
            }
        }
        let font_sizes = [
            ("labels.order_font_px", self.labels.order_font_px),
            ("labels.model_font_px", self.labels.model_font_px),
        ];
        for (key, value) in font_sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a positive finite number"
                )));
            }
        }
        if self.labels.fallback_scale == 0 {
            return Err(ConfigError::Validation(
                "labels.fallback_scale must be non-zero".into(),
            ));
        }
        parse_hex_color(&self.labels.color)?;
        if self.output.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "output.extensions must not be empty".into(),
            ));
        }
        if self.output.files_folder.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.files_folder must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Parse a `#rrggbb` color into RGB bytes.
pub fn parse_hex_color(value: &str) -> Result<[u8; 3], ConfigError> {
    let invalid = || ConfigError::Validation(format!("invalid color {value:?}, expected #rrggbb"));
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok([channel(0)?, channel(2)?, channel(4)?])
}

/// Parse and validate config text. Missing keys keep their defaults.
pub fn parse_config(content: &str) -> Result<FilmConfig, ConfigError> {
    let config: FilmConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load the config file if one is given, otherwise the stock defaults.
pub fn load_config(path: Option<&Path>) -> Result<FilmConfig, ConfigError> {
    match path {
        Some(path) => parse_config(&fs::read_to_string(path)?),
        None => Ok(FilmConfig::default()),
    }
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Case Film Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Film sheet
# ---------------------------------------------------------------------------
[film]
# Physical sheet size in centimeters (portrait).
width_cm = 14.8
height_cm = 25.5

# Print resolution. All centimeter values are converted with
# pixels = round(cm * dpi / 2.54).
dpi = 300

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
# Added to every device width before scaling, to correct the printer's
# systematic under-size.
width_compensation_cm = 0.3

# Distance of the labels from the top-left corner of the sheet.
margin_cm = 0.5

# Gap between the order label and the model label.
label_spacing_cm = 1.0

# ---------------------------------------------------------------------------
# Labels
# ---------------------------------------------------------------------------
[labels]
# Font sizes in pixels at 300 dpi (scaled for other resolutions).
order_font_px = 104.0
model_font_px = 64.0

# Label color. Mid gray keeps ink usage low.
color = "#808080"

# Font files to try first, e.g. ["/usr/share/fonts/truetype/liberation/LiberationSansNarrow-Regular.ttf"].
# When none of these (nor the system fonts) load, a bitmap font is used.
font_paths = []

# Bitmap fallback: pixel magnification and model label offset.
fallback_scale = 3
fallback_offset_px = 200

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# Input file extensions picked up in folder mode (case-insensitive).
extensions = ["png", "jpg", "jpeg"]

# Folder mode writes to "<parent>/<folder><folder_suffix>".
folder_suffix = " (PRINT MODE)"

# File-list mode writes to "<dir of first file>/<files_folder>".
files_folder = "PRINT_MODE_OUTPUT"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_production_constants() {
        let config = FilmConfig::default();
        assert_eq!(config.film.width_cm, 14.8);
        assert_eq!(config.film.height_cm, 25.5);
        assert_eq!(config.film.dpi, 300);
        assert_eq!(config.layout.width_compensation_cm, 0.3);
        assert_eq!(config.layout.margin_cm, 0.5);
        assert_eq!(config.layout.label_spacing_cm, 1.0);
        assert_eq!(config.labels.order_font_px, 104.0);
        assert_eq!(config.labels.model_font_px, 64.0);
        assert_eq!(config.labels.color, "#808080");
    }

    #[test]
    fn default_config_validates() {
        FilmConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config(
            r#"
[film]
dpi = 600
"#,
        )
        .unwrap();
        assert_eq!(config.film.dpi, 600);
        // Unspecified defaults preserved
        assert_eq!(config.film.width_cm, 14.8);
        assert_eq!(config.layout.width_compensation_cm, 0.3);
        assert_eq!(config.output.files_folder, "PRINT_MODE_OUTPUT");
    }

    #[test]
    fn parse_rejects_unknown_keys() {
        let result = parse_config(
            r#"
[film]
widht_cm = 10.0
"#,
        );
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn validate_rejects_zero_dpi() {
        let mut config = FilmConfig::default();
        config.film.dpi = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_non_positive_sheet() {
        let mut config = FilmConfig::default();
        config.film.height_cm = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("film.height_cm"));
    }

    #[test]
    fn parse_rejects_infinite_and_nan_sizes() {
        for toml in [
            "[film]\nheight_cm = inf",
            "[film]\nwidth_cm = nan",
            "[layout]\nmargin_cm = inf",
            "[layout]\nwidth_compensation_cm = nan",
            "[labels]\norder_font_px = nan",
            "[labels]\nmodel_font_px = inf",
        ] {
            assert!(
                matches!(parse_config(toml), Err(ConfigError::Validation(_))),
                "accepted {toml:?}"
            );
        }
    }

    #[test]
    fn validate_names_the_bad_font_size() {
        let mut config = FilmConfig::default();
        config.labels.model_font_px = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("labels.model_font_px"));
    }

    #[test]
    fn validate_rejects_negative_compensation() {
        let mut config = FilmConfig::default();
        config.layout.width_compensation_cm = -0.3;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("width_compensation_cm"));
    }

    #[test]
    fn validate_allows_zero_compensation() {
        let mut config = FilmConfig::default();
        config.layout.width_compensation_cm = 0.0;
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_color_and_empty_extensions() {
        let mut config = FilmConfig::default();
        config.labels.color = "gray".into();
        assert!(config.validate().is_err());

        let mut config = FilmConfig::default();
        config.output.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parse_hex_color_values() {
        assert_eq!(parse_hex_color("#808080").unwrap(), [128, 128, 128]);
        assert_eq!(parse_hex_color("#FF0a00").unwrap(), [255, 10, 0]);
        assert!(parse_hex_color("808080").is_err());
        assert!(parse_hex_color("#80808").is_err());
        assert!(parse_hex_color("#80808g").is_err());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let parsed = parse_config(stock_config_toml()).unwrap();
        assert_eq!(parsed, FilmConfig::default());
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_without_path() {
        assert_eq!(load_config(None).unwrap(), FilmConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r##"
[labels]
color = "#606060"

[output]
files_folder = "films"
"##,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.labels.color, "#606060");
        assert_eq!(config.output.files_folder, "films");
        assert_eq!(config.labels.order_font_px, 104.0);
    }

    #[test]
    fn load_config_invalid_values_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[film]\nwidth_cm = -1.0\n").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn load_config_missing_file_is_io_error() {
        let result = load_config(Some(Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
