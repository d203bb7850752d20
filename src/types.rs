//! Shared types passed between the resolver, the picker and the batch workflow.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order identifier recovered from the front of a filename.
///
/// One or more digits, optionally followed by a single letter that marks an
/// artwork variant of the same order (`3`, `3a`, `07`). The token is kept
/// exactly as written: leading zeros and the letter's case are preserved and
/// two ids are equal only when their text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Order used when a filename carries no leading digits.
    pub const FALLBACK: &'static str = "1";

    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn fallback() -> Self {
        Self(Self::FALLBACK.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of resolving one filename.
///
/// Both halves are independent: a name may yield an order but no model
/// (`12_case.png`), a model but no order (`iphone15.png`), both or neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The filename exactly as given, kept for diagnostics.
    pub filename: String,
    pub order: Option<OrderId>,
    /// Canonical catalog name of the detected device.
    pub model: Option<&'static str>,
}

/// Answer from the manual-resolution collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualChoice {
    /// Canonical model name chosen by the operator.
    Selected(String),
    /// Skip this file. Never interpreted as "use a default".
    Cancelled,
}
