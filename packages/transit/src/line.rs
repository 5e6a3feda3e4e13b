//! Line code canonicalization.
//!
//! Feeds spell the same line as `"M8"`, `"METRO 8"`, `"LIGNE 08"` or just
//! `"8"`. Codes are reduced to the keys of the color tables in
//! [`crate::palette`].

use ips_map_source::text::strip_diacritics;
use regex::Regex;
use std::sync::LazyLock;

use crate::TransitMode;

static RER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bRER\s*([A-E])\b").expect("valid regex"));

/// `M8`, `METRO 8`, `LIGNE 08`, `M 3 BIS`.
static METRO_PREFIXED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:M|METRO|LIGNE)\s*0?(\d{1,2})(\s*BIS)?\b").expect("valid regex")
});

/// `8`, `03BIS`.
static METRO_BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b0?(\d{1,2})(\s*BIS)?\b").expect("valid regex"));

/// `T 9`, `T3A`.
static TRAM_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bT\s*(\d{1,2}\s*[AB]?)\b").expect("valid regex"));

/// `TRAM 3B`, `TRAMWAY 2`.
static TRAM_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bTRAM(?:WAY)?\s*(\d{1,2}\s*[AB]?)\b").expect("valid regex")
});

static TRANSILIEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:TRANSILIEN|LIGNE)\s+([A-Z]{1,2}\d?)\b").expect("valid regex")
});

/// Short letter codes, optionally followed by one digit.
static LETTER_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{1,2}\d?)\b").expect("valid regex"));

static NUMBER_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})\b").expect("valid regex"));

fn capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn metro_line(re: &Regex, haystack: &str) -> Option<String> {
    let caps = re.captures(haystack)?;
    let number = caps.get(1)?.as_str();
    Some(if caps.get(2).is_some() {
        format!("{number}BIS")
    } else {
        number.to_string()
    })
}

fn tram_line(re: &Regex, haystack: &str) -> Option<String> {
    let code = capture(re, haystack)?;
    let compact: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    Some(format!("T{compact}"))
}

/// Reduces a raw line label to its canonical code for `mode`.
///
/// An explicit `RER x` wins for every mode. Mode-specific patterns are
/// tried next, then generic letter and number codes. Returns `None` when
/// nothing code-like remains.
#[must_use]
pub fn normalize_line(raw: &str, mode: TransitMode) -> Option<String> {
    let upper = strip_diacritics(raw.trim()).to_uppercase();
    if upper.is_empty() {
        return None;
    }

    if let Some(letter) = capture(&RER_RE, &upper) {
        return Some(letter);
    }

    let specific = match mode {
        TransitMode::Metro => metro_line(&METRO_PREFIXED_RE, &upper)
            .or_else(|| metro_line(&METRO_BARE_RE, &upper)),
        TransitMode::Tram => {
            tram_line(&TRAM_CODE_RE, &upper).or_else(|| tram_line(&TRAM_WORD_RE, &upper))
        }
        TransitMode::Transilien => capture(&TRANSILIEN_RE, &upper),
        TransitMode::Rer | TransitMode::Ter | TransitMode::Tgv => None,
    };

    specific
        .or_else(|| capture(&LETTER_CODE_RE, &upper))
        .or_else(|| capture(&NUMBER_CODE_RE, &upper))
}
