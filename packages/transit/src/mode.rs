//! Transport mode recognition from free-text labels.

use ips_map_source::text::{fold, has_token};
use regex::Regex;
use std::sync::LazyLock;

use crate::TransitMode;

/// Bare tram line codes such as `t3a`.
static TRAM_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^t\d").expect("valid regex"));

/// Maps a mode label (`"Métro"`, `"RER"`, `"Train Transilien"`,
/// `"Tramway"`, `"TGV INOUI"`, ...) to its canonical mode.
///
/// Checks run in a fixed order: metro, RER, Transilien (including plain
/// `train` that is not high-speed), tram, TGV, TER.
#[must_use]
pub fn mode_key(raw: &str) -> Option<TransitMode> {
    let folded = fold(raw.trim());
    if folded.is_empty() {
        return None;
    }

    let high_speed =
        has_token(&folded, "tgv") || has_token(&folded, "lgv") || folded.contains("grande vitesse");

    if folded.starts_with("met") {
        Some(TransitMode::Metro)
    } else if has_token(&folded, "rer") {
        Some(TransitMode::Rer)
    } else if folded.contains("transilien") || (has_token(&folded, "train") && !high_speed) {
        Some(TransitMode::Transilien)
    } else if folded.contains("tram") || TRAM_CODE_RE.is_match(&folded) {
        Some(TransitMode::Tram)
    } else if high_speed {
        Some(TransitMode::Tgv)
    } else if has_token(&folded, "ter") {
        Some(TransitMode::Ter)
    } else {
        None
    }
}
