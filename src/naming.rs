//! Filename conventions shared by the resolver and the batch workflow.
//!
//! Customer artwork arrives named `<order><separator><free text>.<ext>`, where
//! the order is a digit run with an optional variant letter and the free text
//! loosely names the device:
//!
//! - `3_iphone15pro.png` → order `3`, text `iphone15pro`
//! - `07-IP16PROMAX.jpg` → order `07`, text `ip16promax`
//! - `12b iPhone 13 mini.jpeg` → order `12b`, text `iphone 13 mini`
//!
//! ## Output Names
//!
//! Rendered films are written as `{order}_{FileSafeModel}.png`, e.g.
//! `3_iPhone15Pro.png`. The on-film label uses a shortened model name
//! (`IP 15 Pro`).

use regex::Regex;
use std::sync::LazyLock;

use crate::types::OrderId;

/// Leading order token: digits plus at most one letter.
static ORDER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+[a-zA-Z]?)").expect("order prefix pattern"));

/// Order token plus any separators right after it, on a lower-cased name.
static ORDER_PREFIX_WITH_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[a-z]?[-_\s.]*").expect("order strip pattern"));

static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_\s.]+").expect("separator pattern"));

/// Word replaced by [`LABEL_ABBREVIATION`] in on-film labels.
pub const LABEL_BRAND: &str = "iPhone";
pub const LABEL_ABBREVIATION: &str = "IP";

/// Drop the final extension, keeping names that only start with a dot intact.
///
/// - `"a.b.png"` → `"a.b"`
/// - `".hidden"` → `".hidden"`
/// - `"noext"` → `"noext"`
pub fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(dot) if filename[..dot].chars().any(|c| c != '.') => &filename[..dot],
        _ => filename,
    }
}

/// Extract the order identifier from the start of a filename.
///
/// Returns `None` when the name does not start with a digit; the caller then
/// falls back to [`OrderId::fallback`] and reports that it did so.
pub fn extract_order(filename: &str) -> Option<OrderId> {
    let stem = strip_extension(filename);
    ORDER_PREFIX
        .captures(stem)
        .and_then(|caps| caps.get(1))
        .map(|m| OrderId::new(m.as_str()))
}

/// Lower-case the name, strip extension and order prefix, and collapse
/// separator runs (`-`, `_`, whitespace, `.`) into single spaces.
///
/// The result is the text the model rules are evaluated against.
pub fn normalize_for_detection(filename: &str) -> String {
    let lowered = filename.to_lowercase();
    let stem = strip_extension(&lowered);
    let without_order = ORDER_PREFIX_WITH_SEPARATORS.replace(stem, "");
    SEPARATOR_RUN
        .replace_all(&without_order, " ")
        .trim()
        .to_string()
}

/// Generic filesystem-safe form of a model name: spaces removed.
pub fn file_safe_name(model: &str) -> String {
    model.split_whitespace().collect()
}

/// Generic short on-film label: the brand word abbreviated, rest unchanged.
pub fn display_label(model: &str) -> String {
    model.replace(LABEL_BRAND, LABEL_ABBREVIATION)
}

/// Name of the rendered film for an order and a filesystem-safe model name.
pub fn output_filename(order: &OrderId, file_safe_model: &str) -> String {
    format!("{}_{}.png", order, file_safe_model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(name: &str) -> Option<String> {
        extract_order(name).map(|o| o.as_str().to_string())
    }

    // =========================================================================
    // strip_extension
    // =========================================================================

    #[test]
    fn strip_extension_removes_last_suffix_only() {
        assert_eq!(strip_extension("a.b.png"), "a.b");
        assert_eq!(strip_extension("3_iphone15pro.png"), "3_iphone15pro");
    }

    #[test]
    fn strip_extension_keeps_dotfiles_and_plain_names() {
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("noext"), "noext");
    }

    // =========================================================================
    // extract_order
    // =========================================================================

    #[test]
    fn order_digits_only() {
        assert_eq!(order("3_iphone15pro.png").as_deref(), Some("3"));
        assert_eq!(order("120-x.jpg").as_deref(), Some("120"));
    }

    #[test]
    fn order_keeps_leading_zeros() {
        assert_eq!(order("07-IP16PROMAX.jpg").as_deref(), Some("07"));
    }

    #[test]
    fn order_includes_single_variant_letter() {
        assert_eq!(order("12b_abc.png").as_deref(), Some("12b"));
        assert_eq!(order("5b-x.png").as_deref(), Some("5b"));
    }

    #[test]
    fn order_preserves_letter_case() {
        assert_eq!(order("3A_iphone.png").as_deref(), Some("3A"));
    }

    #[test]
    fn order_takes_at_most_one_letter() {
        assert_eq!(order("3ab.png").as_deref(), Some("3a"));
    }

    #[test]
    fn order_letter_glued_to_model_text_is_still_taken() {
        // One letter directly after the digits is always read as a variant.
        assert_eq!(order("3iphone15.png").as_deref(), Some("3i"));
    }

    #[test]
    fn order_number_only_name() {
        assert_eq!(order("42.png").as_deref(), Some("42"));
    }

    #[test]
    fn order_missing_when_name_starts_with_letters() {
        assert_eq!(order("xyz.png"), None);
        assert_eq!(order("iphone 15 #3.png"), None);
    }

    #[test]
    fn order_missing_for_empty_name() {
        assert_eq!(order(""), None);
    }

    // =========================================================================
    // normalize_for_detection
    // =========================================================================

    #[test]
    fn normalize_strips_order_and_separators() {
        assert_eq!(normalize_for_detection("3_iphone15pro.png"), "iphone15pro");
        assert_eq!(normalize_for_detection("07-IP16PROMAX.jpg"), "ip16promax");
    }

    #[test]
    fn normalize_strips_order_letter() {
        assert_eq!(normalize_for_detection("5b-x.png"), "x");
        assert_eq!(normalize_for_detection("12B__iPhone 13 mini.jpeg"), "iphone 13 mini");
    }

    #[test]
    fn normalize_collapses_mixed_separator_runs() {
        assert_eq!(
            normalize_for_detection("4 - iPhone_._15  Pro-Max.png"),
            "iphone 15 pro max"
        );
    }

    #[test]
    fn normalize_trims_trailing_separators() {
        assert_eq!(normalize_for_detection("9-iphone 12-.png"), "iphone 12");
    }

    #[test]
    fn normalize_leaves_unnumbered_names() {
        assert_eq!(normalize_for_detection("xyz.png"), "xyz");
    }

    #[test]
    fn normalize_number_only_name_is_empty() {
        assert_eq!(normalize_for_detection("15.png"), "");
    }

    // =========================================================================
    // Presentation names
    // =========================================================================

    #[test]
    fn file_safe_name_removes_spaces() {
        assert_eq!(file_safe_name("iPhone 16 Pro Max"), "iPhone16ProMax");
        assert_eq!(file_safe_name("iPhone 13 mini"), "iPhone13mini");
        assert_eq!(file_safe_name("iPhone XS Max"), "iPhoneXSMax");
    }

    #[test]
    fn display_label_abbreviates_brand() {
        assert_eq!(display_label("iPhone 15 Pro"), "IP 15 Pro");
        assert_eq!(display_label("iPhone 12 mini"), "IP 12 mini");
        assert_eq!(display_label("Galaxy S24"), "Galaxy S24");
    }

    #[test]
    fn output_filename_joins_order_and_model() {
        let name = output_filename(&OrderId::new("3"), "iPhone15Pro");
        assert_eq!(name, "3_iPhone15Pro.png");
    }
}
