#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Establishment, sector and social-index types.
//!
//! Every dataset revision (geolocation directory, IPS exports, static
//! snapshots) is normalized into [`Establishment`] records that conform to
//! these types. Query results are always fresh [`EstablishmentHit`] values
//! joining an establishment with its social index; establishments
//! themselves are never mutated after loading.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Display name used when a record carries no usable name.
pub const DEFAULT_ESTABLISHMENT_NAME: &str = "Établissement";

/// The three establishment categories of the French school system.
///
/// Declaration order is the display order (primary first).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    /// École (maternelle, élémentaire, primaire).
    #[serde(rename = "ecole", alias = "school")]
    #[strum(to_string = "ecole", serialize = "school")]
    School,
    /// Collège.
    #[serde(rename = "college", alias = "middle-school")]
    #[strum(to_string = "college", serialize = "middle-school")]
    MiddleSchool,
    /// Lycée (général, technologique, professionnel, polyvalent).
    #[serde(rename = "lycee", alias = "high-school")]
    #[strum(to_string = "lycee", serialize = "high-school")]
    HighSchool,
}

/// A set of wanted categories. Ordered so iteration follows display order.
pub type CategorySet = BTreeSet<Category>;

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::School, Self::MiddleSchool, Self::HighSchool];

    /// Returns a set containing every category.
    #[must_use]
    pub fn all() -> CategorySet {
        Self::ALL.into_iter().collect()
    }

    /// Human-readable French label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::School => "École",
            Self::MiddleSchool => "Collège",
            Self::HighSchool => "Lycée",
        }
    }
}

/// Canonical public/private sector.
///
/// All sector filtering compares these values, never raw dataset strings.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Sector {
    /// Public sector.
    Public,
    /// Private sector (with or without contract).
    Private,
    /// Missing or unrecognized sector.
    #[default]
    Unknown,
}

impl Sector {
    /// Human-readable French label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::Private => "Privé",
            Self::Unknown => "—",
        }
    }
}

/// Sector restriction applied by queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectorFilter {
    /// No restriction.
    #[default]
    All,
    /// Only establishments of the given sector.
    Only(Sector),
}

impl SectorFilter {
    /// Whether an establishment with `sector` passes this filter.
    #[must_use]
    pub fn matches(self, sector: Sector) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == sector,
        }
    }
}

/// Error returned when a sector filter string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSectorFilterError {
    /// The rejected input.
    pub value: String,
}

impl std::fmt::Display for InvalidSectorFilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid sector filter {:?}: expected all, public or private",
            self.value
        )
    }
}

impl std::error::Error for InvalidSectorFilterError {}

impl std::str::FromStr for SectorFilter {
    type Err = InvalidSectorFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "tous" | "" => Ok(Self::All),
            "public" => Ok(Self::Only(Sector::Public)),
            "private" | "prive" | "privé" => Ok(Self::Only(Sector::Private)),
            _ => Err(InvalidSectorFilterError {
                value: s.to_string(),
            }),
        }
    }
}

/// An establishment normalized to the canonical schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Establishment {
    /// Uppercase UAI identifier. Unique key.
    pub id: String,
    /// Establishment category.
    pub category: Category,
    /// Canonical sector.
    pub sector: Sector,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Canonical département code (`"75"`, `"2A"`, `"971"`), when known.
    pub department: Option<String>,
    /// Five-digit postal code.
    pub postal_code: Option<String>,
    /// Commune display name.
    pub commune: Option<String>,
    /// Display name.
    pub name: String,
    /// Street address, when the source carries one.
    pub address: Option<String>,
    /// Raw nature label (e.g. "COLLEGE", "ECOLE ELEMENTAIRE PUBLIQUE").
    pub nature: Option<String>,
}

/// An establishment joined with its social index (and, for radius
/// queries, its distance from the query point).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstablishmentHit {
    /// The joined establishment.
    #[serde(flatten)]
    pub establishment: Establishment,
    /// Published IPS value, `None` when unpublished.
    pub social_index: Option<f64>,
    /// Great-circle distance from the query point, in meters.
    pub distance_meters: Option<f64>,
}

impl EstablishmentHit {
    /// Color band for the joined social index.
    #[must_use]
    pub fn band(&self) -> IpsBand {
        IpsBand::of(self.social_index)
    }
}

/// Mapping from establishment id to published IPS value.
///
/// Ids without a published value are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocialIndexMap(BTreeMap<String, f64>);

impl SocialIndexMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Looks up the published value for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<f64> {
        self.0.get(id).copied()
    }

    /// Whether `id` has a published value.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    /// Inserts or replaces the value for `id`.
    pub fn insert(&mut self, id: String, value: f64) {
        self.0.insert(id, value);
    }

    /// Number of ids with a published value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no value is published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(id, value)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for SocialIndexMap {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Top-N ranking of a département, per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRanking {
    /// Canonical département code that was queried.
    pub department: String,
    /// Display label (département name when known, else the code).
    pub label: String,
    /// Ranked establishments, descending by social index.
    pub by_category: BTreeMap<Category, Vec<EstablishmentHit>>,
}

impl DepartmentRanking {
    /// Ranked establishments for `category` (empty when not requested).
    #[must_use]
    pub fn get(&self, category: Category) -> &[EstablishmentHit] {
        self.by_category.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Total number of ranked establishments across categories.
    #[must_use]
    pub fn total(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    /// Whether no category has any ranked establishment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Social-index color band used for map markers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IpsBand {
    /// IPS below 90.
    Low,
    /// IPS from 90 to 110 inclusive.
    Medium,
    /// IPS above 110.
    High,
    /// No published IPS.
    Unpublished,
}

impl IpsBand {
    /// Classifies an optional IPS value.
    #[must_use]
    pub fn of(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_nan() => Self::Unpublished,
            Some(v) if v < 90.0 => Self::Low,
            Some(v) if v <= 110.0 => Self::Medium,
            Some(_) => Self::High,
            None => Self::Unpublished,
        }
    }

    /// Marker color as `#RRGGBB`.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Low => "#D32F2F",
            Self::Medium => "#F6B73C",
            Self::High => "#2E7D32",
            Self::Unpublished => "#777777",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn category_parses_wire_and_english_names() {
        assert_eq!(Category::from_str("ecole").unwrap(), Category::School);
        assert_eq!(
            Category::from_str("middle-school").unwrap(),
            Category::MiddleSchool
        );
        assert_eq!(Category::from_str("LYCEE").unwrap(), Category::HighSchool);
        assert!(Category::from_str("creche").is_err());
    }

    #[test]
    fn category_displays_wire_name() {
        assert_eq!(Category::HighSchool.to_string(), "lycee");
        assert_eq!(Category::School.as_ref(), "ecole");
    }

    #[test]
    fn category_serde_accepts_aliases() {
        let c: Category = serde_json::from_str("\"high-school\"").unwrap();
        assert_eq!(c, Category::HighSchool);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"lycee\"");
    }

    #[test]
    fn sector_filter_matches() {
        assert!(SectorFilter::All.matches(Sector::Unknown));
        assert!(SectorFilter::Only(Sector::Public).matches(Sector::Public));
        assert!(!SectorFilter::Only(Sector::Public).matches(Sector::Private));
    }

    #[test]
    fn sector_filter_parses() {
        assert_eq!(SectorFilter::from_str("all").unwrap(), SectorFilter::All);
        assert_eq!(
            SectorFilter::from_str("Privé").unwrap(),
            SectorFilter::Only(Sector::Private)
        );
        assert!(SectorFilter::from_str("hybrid").is_err());
    }

    #[test]
    fn ips_bands() {
        assert_eq!(IpsBand::of(None), IpsBand::Unpublished);
        assert_eq!(IpsBand::of(Some(85.0)), IpsBand::Low);
        assert_eq!(IpsBand::of(Some(90.0)), IpsBand::Medium);
        assert_eq!(IpsBand::of(Some(110.0)), IpsBand::Medium);
        assert_eq!(IpsBand::of(Some(110.1)), IpsBand::High);
        assert_eq!(IpsBand::High.color(), "#2E7D32");
    }

    #[test]
    fn ranking_accessors() {
        let ranking = DepartmentRanking {
            department: "75".to_string(),
            label: "Paris".to_string(),
            by_category: BTreeMap::from([(Category::HighSchool, Vec::new())]),
        };
        assert!(ranking.is_empty());
        assert!(ranking.get(Category::School).is_empty());
    }

    #[test]
    fn social_index_map_lookup() {
        let map: SocialIndexMap = [("0751234A".to_string(), 120.0)].into_iter().collect();
        assert_eq!(map.get("0751234A"), Some(120.0));
        assert_eq!(map.get("0759999Z"), None);
        assert_eq!(map.len(), 1);
    }
}
