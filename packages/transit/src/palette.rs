//! Line colors.
//!
//! Precedence: an explicit color on the record, then the line table of the
//! mode, then the mode's fallback color.

use ips_map_source::color::parse_hex_color;

use crate::TransitMode;

const METRO_COLORS: &[(&str, &str)] = &[
    ("1", "#FFCD00"),
    ("2", "#1D87C9"),
    ("3", "#9FCE66"),
    ("3BIS", "#84C28E"),
    ("4", "#A0006E"),
    ("5", "#F28E00"),
    ("6", "#76C696"),
    ("7", "#F59CB2"),
    ("7BIS", "#89C8C5"),
    ("8", "#CE64A6"),
    ("9", "#B0BD00"),
    ("10", "#D6C178"),
    ("11", "#704B1C"),
    ("12", "#007852"),
    ("13", "#99B4CB"),
    ("14", "#662483"),
];

const RER_COLORS: &[(&str, &str)] = &[
    ("A", "#E11E2B"),
    ("B", "#0072BC"),
    ("C", "#F6A800"),
    ("D", "#2E7D32"),
    ("E", "#8E44AD"),
];

const TRAM_COLORS: &[(&str, &str)] = &[
    ("T1", "#6F6F6F"),
    ("T2", "#0096D7"),
    ("T3", "#C77DB3"),
    ("T3A", "#C77DB3"),
    ("T3B", "#C77DB3"),
    ("T4", "#5BC2E7"),
    ("T5", "#A9CC51"),
    ("T6", "#00A36D"),
    ("T7", "#E98300"),
    ("T8", "#B1B3B3"),
    ("T9", "#C1002A"),
    ("T10", "#6E4C9A"),
    ("T11", "#575756"),
    ("T12", "#0077C8"),
    ("T13", "#008D36"),
];

const TRANSILIEN_COLORS: &[(&str, &str)] = &[
    ("H", "#0064B0"),
    ("J", "#9D2763"),
    ("K", "#2E3192"),
    ("L", "#5C4E9B"),
    ("N", "#00936E"),
    ("P", "#E2001A"),
    ("R", "#00A4A7"),
    ("U", "#6F2C91"),
];

/// Fallback color of each mode.
#[must_use]
pub const fn mode_color(mode: TransitMode) -> &'static str {
    match mode {
        TransitMode::Metro => "#1E90FF",
        TransitMode::Rer => "#111111",
        TransitMode::Tram | TransitMode::Transilien => "#2C8B2C",
        TransitMode::Ter => "#8AA55A",
        TransitMode::Tgv => "#B03A9B",
    }
}

const fn line_table(mode: TransitMode) -> &'static [(&'static str, &'static str)] {
    match mode {
        TransitMode::Metro => METRO_COLORS,
        TransitMode::Rer => RER_COLORS,
        TransitMode::Tram => TRAM_COLORS,
        TransitMode::Transilien => TRANSILIEN_COLORS,
        TransitMode::Ter | TransitMode::Tgv => &[],
    }
}

/// Table color of a canonical line code, if the mode has one.
#[must_use]
pub fn line_color(mode: TransitMode, line: &str) -> Option<&'static str> {
    line_table(mode)
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(line))
        .map(|(_, color)| *color)
}

/// Resolves the display color of a station.
#[must_use]
pub fn color_for(mode: TransitMode, line: Option<&str>, explicit: Option<&str>) -> String {
    if let Some(color) = explicit.and_then(parse_hex_color) {
        return color;
    }
    line.and_then(|code| line_color(mode, code))
        .unwrap_or_else(|| mode_color(mode))
        .to_string()
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn explicit_color_wins() {
        assert_eq!(color_for(TransitMode::Metro, Some("1"), Some("e2231a")), "#E2231A");
    }

    #[test]
    fn unparseable_explicit_color_falls_through() {
        assert_eq!(color_for(TransitMode::Metro, Some("1"), Some("jaune")), "#FFCD00");
    }

    #[test]
    fn line_table_then_mode_fallback() {
        assert_eq!(color_for(TransitMode::Rer, Some("B"), None), "#0072BC");
        assert_eq!(color_for(TransitMode::Metro, Some("7BIS"), None), "#89C8C5");
        assert_eq!(color_for(TransitMode::Tram, Some("t3b"), None), "#C77DB3");
        assert_eq!(color_for(TransitMode::Metro, Some("42"), None), "#1E90FF");
        assert_eq!(color_for(TransitMode::Tgv, None, None), "#B03A9B");
    }

    #[test]
    fn every_mode_has_a_fallback() {
        for mode in TransitMode::iter() {
            assert!(parse_hex_color(mode_color(mode)).is_some(), "{mode}");
        }
    }
}
