//! Day label embedded in the display title of multi-day trainings.
//!
//! A training spanning N > 1 days gets the suffix `" (Jour i/N)"` appended to
//! its base title; single-day trainings keep the base title untouched. The
//! sequence metadata is stored explicitly on every `TrainingDay`, so these
//! helpers only produce and parse presentation strings.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Matches a trailing `" (Jour i/N)"` suffix, case-insensitively. The base
/// may span several lines.
static DAY_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^(?P<base>.*) \(jour (?P<seq>\d+)/(?P<total>\d+)\)$")
        .expect("valid regex")
});

/// Components recovered from an encoded title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedTitle {
    pub base_title: String,
    pub sequence_index: i32,
    pub total_days: i32,
}

/// Build the display title for day `seq` of a `total`-day training.
pub fn encode(base_title: &str, seq: i32, total: i32) -> String {
    match day_label(seq, total) {
        Some(label) => format!("{base_title} ({label})"),
        None => base_title.to_string(),
    }
}

/// Parse a title produced by [`encode`].
///
/// Returns `None` when the title carries no day suffix, which means the
/// training is single-day and the title already is the base title. A suffix
/// whose numbers cannot describe a multi-day position (`total < 2`,
/// `seq == 0`, `seq > total`) is treated as part of the base title.
pub fn decode(title: &str) -> Option<DecodedTitle> {
    let caps = DAY_SUFFIX_RE.captures(title)?;
    let sequence_index: i32 = caps["seq"].parse().ok()?;
    let total_days: i32 = caps["total"].parse().ok()?;

    if total_days < 2 || sequence_index < 1 || sequence_index > total_days {
        return None;
    }

    Some(DecodedTitle {
        base_title: caps["base"].to_string(),
        sequence_index,
        total_days,
    })
}

/// Short "Jour i/N" label, or `None` for single-day trainings.
pub fn day_label(seq: i32, total: i32) -> Option<String> {
    (total > 1).then(|| format!("Jour {seq}/{total}"))
}
