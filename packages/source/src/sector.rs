//! Public/private sector canonicalization.
//!
//! Sector filters compare [`Sector`] values only; raw spellings never
//! leave this module.

use ips_map_school_models::Sector;

use crate::fields::{EstablishmentAliases, extract_field, extract_text, value_number};
use crate::text::fold;

/// Canonicalizes a raw sector value.
///
/// Numeric codes `1`/`2` (as numbers or strings) map to public/private.
/// Text is folded and `"priv"` is checked before `"pub"`, since labels like
/// `"Privé sous contrat public"` contain both. `"PU"`/`"PR"` short codes
/// are accepted. Anything else is [`Sector::Unknown`].
#[must_use]
pub fn canonicalize_sector(value: Option<&serde_json::Value>) -> Sector {
    let Some(value) = value else {
        return Sector::Unknown;
    };

    if let Some(code) = value_number(value) {
        return match code {
            c if (c - 1.0).abs() < f64::EPSILON => Sector::Public,
            c if (c - 2.0).abs() < f64::EPSILON => Sector::Private,
            _ => Sector::Unknown,
        };
    }

    value.as_str().map_or(Sector::Unknown, canonicalize_sector_text)
}

/// Canonicalizes a free-text sector label.
#[must_use]
pub fn canonicalize_sector_text(raw: &str) -> Sector {
    let folded = fold(raw.trim());
    if folded.contains("priv") {
        Sector::Private
    } else if folded.contains("pub") {
        Sector::Public
    } else {
        match folded.as_str() {
            "pr" => Sector::Private,
            "pu" => Sector::Public,
            _ => Sector::Unknown,
        }
    }
}

/// Resolves the sector of a raw establishment record.
///
/// Falls back to [`Sector::Private`] when the sector is missing or
/// unmatched but the record names a private-contract type.
#[must_use]
pub fn sector_from_record(record: &serde_json::Value, aliases: &EstablishmentAliases) -> Sector {
    match canonicalize_sector(extract_field(record, &aliases.sector)) {
        Sector::Unknown if extract_text(record, &aliases.contract_type).is_some() => {
            Sector::Private
        }
        sector => sector,
    }
}
