//! Line color canonicalization.

use regex::Regex;
use std::sync::LazyLock;

/// `#RRGGBB`, `0xRRGGBB` or bare `RRGGBB`.
static HEX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:#|0[xX])?([0-9A-Fa-f]{6})$").expect("valid regex")
});

/// `rgb(r, g, b)` or `rgba(r, g, b, a)`.
static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[\d.]+\s*)?\)$")
        .expect("valid regex")
});

/// Parses a color in any of the published encodings and normalizes it to
/// uppercase `#RRGGBB`.
///
/// Returns `None` for unparseable input (or an out-of-range `rgb()`
/// channel), letting the caller fall back to a default color.
#[must_use]
pub fn parse_hex_color(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    if let Some(caps) = HEX_RE.captures(trimmed) {
        return Some(format!("#{}", caps[1].to_uppercase()));
    }

    let caps = RGB_RE.captures(trimmed)?;
    let mut channels = [0_u8; 3];
    for (slot, index) in channels.iter_mut().zip(1..=3) {
        *slot = caps[index].parse::<u8>().ok()?;
    }
    let [r, g, b] = channels;
    Some(format!("#{r:02X}{g:02X}{b:02X}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_forms() {
        assert_eq!(parse_hex_color("#ffcd00").as_deref(), Some("#FFCD00"));
        assert_eq!(parse_hex_color("0x003CA6").as_deref(), Some("#003CA6"));
        assert_eq!(parse_hex_color(" e2231a ").as_deref(), Some("#E2231A"));
    }

    #[test]
    fn rgb_forms() {
        assert_eq!(parse_hex_color("rgb(255, 205, 0)").as_deref(), Some("#FFCD00"));
        assert_eq!(
            parse_hex_color("RGBA(0,60,166,0.5)").as_deref(),
            Some("#003CA6")
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hex_color("").is_none());
        assert!(parse_hex_color("#FFF").is_none());
        assert!(parse_hex_color("rgb(300, 0, 0)").is_none());
        assert!(parse_hex_color("yellow").is_none());
    }
}
