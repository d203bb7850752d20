//! Device model detection from free-form filenames.
//!
//! Operators type device names however they like: `iphone15pro`, `IP16PROMAX`,
//! `13 mini`, `iph 14 pl`, `x`. Detection runs an **ordered** table of rules
//! against the normalized name (see [`naming::normalize_for_detection`]) and
//! returns the first model whose rule matches.
//!
//! ## Precedence
//!
//! The table order *is* the behavior:
//!
//! 1. Numbered generations, newest first (16 → 11), then the letter-only
//!    devices (XS Max → XS → XR → X), then 8 and 7.
//! 2. Within a generation, the most specific variant first:
//!    Pro Max → Plus → Pro → base (12 and 13: Pro Max → Pro → mini → base).
//! 3. Only when no worded rule matched, the numeric fallback: the whole
//!    name is a bare generation number (`15`).
//!
//! Looser rules also refuse a match when the text right after it starts with
//! a qualifier a more specific variant owns (`max`, `plus`, ...). That guard
//! is not airtight on its own (`16 pro max` still reads as `16 pr` + `o max`
//! to the Pro rule), so moving a rule changes how ambiguous names classify.
//!
//! ## Rule Shapes
//!
//! A rule either matches its pattern anywhere in the text, or is *guarded*:
//! one of its alternatives must match at some position and the text right
//! after that match must not start with an excluded qualifier. Every start
//! position and every alternative is tried, so a guarded rule matches exactly
//! when a backtracking search with a negative lookahead would.
//!
//! The device prefix in front of a generation (`iphone`, `iph`, `ip`, `a`,
//! `apple`, ...) is optional and therefore not part of numbered rules; only
//! the prefixed `X` rule requires it.

use regex::Regex;
use std::sync::LazyLock;

use crate::naming::{self, extract_order, normalize_for_detection};
use crate::types::Resolution;

/// Device words accepted in front of a model token.
const DEVICE_PREFIX: &str = r"(?:iphone|iphon|phone|phon|iph|ip|apple|a)";

const PRO_MAX: &str = r"\s*(?:pro?\s*)?(?:max|mx|pm|prm|promax|promx)";
const PLUS: &str = r"\s*(?:plus|pl|\+|p(?:\s|$))";
const PRO_SPELLINGS: &[&str] = &["pro", "pr", "p"];
const MINI_SPELLINGS: &[&str] = &["mini", "min", "mn", "m"];

/// How a rule decides whether it applies to a normalized name.
#[derive(Debug)]
enum Matcher {
    /// Pattern found anywhere in the text.
    Anywhere(Regex),
    /// Some alternative matches at some position and the remaining text is
    /// not rejected. Alternatives are anchored with `^`.
    Guarded {
        alternatives: Vec<Regex>,
        reject_after: Regex,
    },
    /// The whole text equals the token.
    Exact(&'static str),
}

impl Matcher {
    fn anywhere(pattern: &str) -> Self {
        Self::Anywhere(compile(pattern))
    }

    fn guarded<S: AsRef<str>>(alternatives: &[S], reject_after: &str) -> Self {
        Self::Guarded {
            alternatives: alternatives
                .iter()
                .map(|alt| compile(&format!("^(?:{})", alt.as_ref())))
                .collect(),
            reject_after: compile(&format!("^(?:{})", reject_after)),
        }
    }

    fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Anywhere(re) => re.is_match(text),
            Self::Exact(token) => text == *token,
            Self::Guarded {
                alternatives,
                reject_after,
            } => text.char_indices().any(|(start, _)| {
                let rest = &text[start..];
                alternatives.iter().any(|alt| {
                    alt.find(rest)
                        .is_some_and(|m| !reject_after.is_match(&rest[m.end()..]))
                })
            }),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid detection pattern {pattern:?}: {e}"))
}

/// Which tier of the table a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Worded,
    NumericFallback,
}

/// One entry of the detection table.
#[derive(Debug)]
pub struct Rule {
    pub model: &'static str,
    pub tier: Tier,
    matcher: Matcher,
}

impl Rule {
    fn worded(model: &'static str, matcher: Matcher) -> Self {
        Self {
            model,
            tier: Tier::Worded,
            matcher,
        }
    }

    /// Whether this rule applies to an already-normalized name.
    pub fn matches(&self, normalized: &str) -> bool {
        self.matcher.is_match(normalized)
    }
}

fn spelled(generation: &str, spellings: &[&str]) -> Vec<String> {
    spellings
        .iter()
        .map(|s| format!(r"{generation}\s*{s}"))
        .collect()
}

/// 14, 15 and 16: Pro Max, Plus, Pro, base.
fn modern_generation(rules: &mut Vec<Rule>, generation: &str, names: [&'static str; 4]) {
    let [pro_max, plus, pro, base] = names;
    rules.push(Rule::worded(
        pro_max,
        Matcher::anywhere(&format!("{generation}{PRO_MAX}")),
    ));
    rules.push(Rule::worded(
        plus,
        Matcher::anywhere(&format!("{generation}{PLUS}")),
    ));
    rules.push(Rule::worded(
        pro,
        Matcher::guarded(
            &spelled(generation, PRO_SPELLINGS),
            r"\s*(?:max|mx|plus|pl|\+)",
        ),
    ));
    rules.push(Rule::worded(
        base,
        Matcher::guarded(&[generation], r"\d|\s*(?:pro?|pr|p|plus|pl|\+|max|mx)"),
    ));
}

/// 12 and 13: Pro Max, Pro, mini, base.
fn mini_generation(rules: &mut Vec<Rule>, generation: &str, names: [&'static str; 4]) {
    let [pro_max, pro, mini, base] = names;
    rules.push(Rule::worded(
        pro_max,
        Matcher::anywhere(&format!("{generation}{PRO_MAX}")),
    ));
    rules.push(Rule::worded(
        pro,
        Matcher::guarded(&spelled(generation, PRO_SPELLINGS), r"\s*(?:max|mx)"),
    ));
    rules.push(Rule::worded(
        mini,
        Matcher::guarded(&spelled(generation, MINI_SPELLINGS), r"\s*(?:ax|x)"),
    ));
    rules.push(Rule::worded(
        base,
        Matcher::guarded(
            &[generation],
            r"\d|\s*(?:pro?|pr|p|mini?|mn|m|max|mx)",
        ),
    ));
}

/// 11: Pro Max, Pro, base.
fn eleven_generation(rules: &mut Vec<Rule>) {
    rules.push(Rule::worded(
        "iPhone 11 Pro Max",
        Matcher::anywhere(&format!("11{PRO_MAX}")),
    ));
    rules.push(Rule::worded(
        "iPhone 11 Pro",
        Matcher::guarded(&spelled("11", PRO_SPELLINGS), r"\s*(?:max|mx)"),
    ));
    rules.push(Rule::worded(
        "iPhone 11",
        Matcher::guarded(&["11"], r"\d|\s*(?:pro?|pr|p|max|mx)"),
    ));
}

/// Letter-only devices, hand ordered: XS Max, XS, XR, X.
fn letter_generation(rules: &mut Vec<Rule>) {
    rules.push(Rule::worded(
        "iPhone XS Max",
        Matcher::guarded(
            &[
                r"xs\s*max",
                r"xs\s*mx",
                r"xs\s*m",
                r"x\s*max",
                r"x\s*mx",
                r"x\s*m",
            ],
            r"\s*in",
        ),
    ));
    rules.push(Rule::worded(
        "iPhone XS",
        Matcher::guarded(&["xs"], r"\s*(?:max|mx|m)"),
    ));
    rules.push(Rule::worded("iPhone XR", Matcher::anywhere("xr")));
    // A bare `x` only counts behind a device word or as the whole name.
    rules.push(Rule::worded(
        "iPhone X",
        Matcher::guarded(&[format!(r"{DEVICE_PREFIX}\s*x")], r"\w"),
    ));
    rules.push(Rule::worded("iPhone X", Matcher::anywhere("^x$")));
}

/// 7 and 8: Plus, base.
fn legacy_generation(rules: &mut Vec<Rule>, generation: &str, names: [&'static str; 2]) {
    let [plus, base] = names;
    rules.push(Rule::worded(
        plus,
        Matcher::anywhere(&format!("{generation}{PLUS}")),
    ));
    rules.push(Rule::worded(
        base,
        Matcher::guarded(&[generation], r"\d|\s*(?:plus|pl|\+|p)"),
    ));
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let mut rules = Vec::with_capacity(48);

    modern_generation(
        &mut rules,
        "16",
        ["iPhone 16 Pro Max", "iPhone 16 Plus", "iPhone 16 Pro", "iPhone 16"],
    );
    modern_generation(
        &mut rules,
        "15",
        ["iPhone 15 Pro Max", "iPhone 15 Plus", "iPhone 15 Pro", "iPhone 15"],
    );
    modern_generation(
        &mut rules,
        "14",
        ["iPhone 14 Pro Max", "iPhone 14 Plus", "iPhone 14 Pro", "iPhone 14"],
    );
    mini_generation(
        &mut rules,
        "13",
        ["iPhone 13 Pro Max", "iPhone 13 Pro", "iPhone 13 mini", "iPhone 13"],
    );
    mini_generation(
        &mut rules,
        "12",
        ["iPhone 12 Pro Max", "iPhone 12 Pro", "iPhone 12 mini", "iPhone 12"],
    );
    eleven_generation(&mut rules);
    letter_generation(&mut rules);
    legacy_generation(&mut rules, "8", ["iPhone 8 Plus", "iPhone 8"]);
    legacy_generation(&mut rules, "7", ["iPhone 7 Plus", "iPhone 7"]);

    // Bare generation numbers. No mini/XR/letter entries here.
    for (token, model) in [
        ("16", "iPhone 16"),
        ("15", "iPhone 15"),
        ("14", "iPhone 14"),
        ("13", "iPhone 13"),
        ("12", "iPhone 12"),
        ("11", "iPhone 11"),
        ("8", "iPhone 8"),
        ("7", "iPhone 7"),
    ] {
        rules.push(Rule {
            model,
            tier: Tier::NumericFallback,
            matcher: Matcher::Exact(token),
        });
    }

    rules
});

/// The full detection table in evaluation order.
pub fn rules() -> &'static [Rule] {
    &RULES
}

/// Detect the model from text already passed through
/// [`normalize_for_detection`].
///
/// All worded rules are tried before any numeric fallback rule.
pub fn detect_normalized(normalized: &str) -> Option<&'static str> {
    let table = rules();
    table
        .iter()
        .filter(|r| r.tier == Tier::Worded)
        .chain(table.iter().filter(|r| r.tier == Tier::NumericFallback))
        .find(|r| r.matches(normalized))
        .map(|r| r.model)
}

/// Detect the canonical model name from a raw filename.
pub fn detect_model(filename: &str) -> Option<&'static str> {
    detect_normalized(&normalize_for_detection(filename))
}

/// Parse a raw filename into its order identifier and device model.
///
/// Pure: no fallback is applied here. A missing order or model is reported
/// as `None` and the caller decides what to do.
pub fn resolve(filename: &str) -> Resolution {
    Resolution {
        filename: filename.to_string(),
        order: extract_order(filename),
        model: detect_model(filename),
    }
}

/// Filesystem-safe and label names for a detected model, for callers that
/// have no catalog entry at hand.
pub fn presentation_names(model: &str) -> (String, String) {
    (naming::file_safe_name(model), naming::display_label(model))
}
