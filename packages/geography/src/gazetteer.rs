//! Commune lookups over the gazetteer snapshot.

use ips_map_geography_models::GazetteerEntry;
use ips_map_geography_models::departments::normalize_postal_code;
use ips_map_source::text::normalize_name;

/// The commune gazetteer, with names pre-normalized for matching.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: Vec<GazetteerEntry>,
    normalized_names: Vec<String>,
}

impl Gazetteer {
    /// Wraps parsed entries, keeping their order.
    #[must_use]
    pub fn new(entries: Vec<GazetteerEntry>) -> Self {
        let normalized_names = entries.iter().map(|e| normalize_name(&e.name)).collect();
        Self {
            entries,
            normalized_names,
        }
    }

    /// All entries in snapshot order.
    #[must_use]
    pub fn entries(&self) -> &[GazetteerEntry] {
        &self.entries
    }

    /// Number of communes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the gazetteer holds no communes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds a commune by name.
    ///
    /// The query is diacritic-stripped, uppercased and whitespace-collapsed.
    /// The first exact match wins, then the first entry whose name contains
    /// the query. An empty query matches nothing.
    #[must_use]
    pub fn find_commune(&self, query: &str) -> Option<&GazetteerEntry> {
        let needle = normalize_name(query);
        if needle.is_empty() {
            return None;
        }
        self.normalized_names
            .iter()
            .position(|name| *name == needle)
            .or_else(|| {
                self.normalized_names
                    .iter()
                    .position(|name| name.contains(&needle))
            })
            .map(|i| &self.entries[i])
    }

    /// Returns the first commune serving `postal_code`.
    #[must_use]
    pub fn find_by_postal_code(&self, postal_code: &str) -> Option<&GazetteerEntry> {
        let cp = normalize_postal_code(postal_code)?;
        self.entries.iter().find(|entry| entry.serves(&cp))
    }
}

#[cfg(test)]
mod tests {
    use ips_map_source::establishment::parse_gazetteer;
    use ips_map_source::fields::aliases;

    use super::*;

    fn gazetteer() -> Gazetteer {
        let snapshot = serde_json::json!([
            {"n": "Paris", "dep": "75", "cp": ["75001", "75002", "75116"], "lat": 48.8566, "lon": 2.3522},
            {"n": "Saint-Étienne", "dep": "42", "cp": ["42000", "42100"], "lat": 45.4397, "lon": 4.3872},
            {"n": "Saint-Étienne-du-Rouvray", "dep": "76", "cp": ["76800"], "lat": 49.377, "lon": 1.105},
            {"n": "Bourg-en-Bresse", "dep": "01", "cp": ["01000"], "lat": 46.205, "lon": 5.225}
        ]);
        Gazetteer::new(parse_gazetteer(&snapshot, &aliases().gazetteer))
    }

    #[test]
    fn exact_match_beats_substring() {
        let gazetteer = gazetteer();
        assert_eq!(
            gazetteer.find_commune("paris").map(|e| e.name.as_str()),
            Some("Paris")
        );
        assert_eq!(
            gazetteer.find_commune("  SAINT-ETIENNE ").map(|e| e.name.as_str()),
            Some("Saint-Étienne")
        );
        assert_eq!(
            gazetteer.find_commune("rouvray").map(|e| e.name.as_str()),
            Some("Saint-Étienne-du-Rouvray")
        );
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(gazetteer().find_commune("   ").is_none());
    }

    #[test]
    fn postal_code_membership() {
        let gazetteer = gazetteer();
        assert_eq!(
            gazetteer.find_by_postal_code("75116").map(|e| e.name.as_str()),
            Some("Paris")
        );
        assert_eq!(
            gazetteer.find_by_postal_code("1000").map(|e| e.name.as_str()),
            Some("Bourg-en-Bresse")
        );
        assert!(gazetteer.find_by_postal_code("99999").is_none());
    }
}
