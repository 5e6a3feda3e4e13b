//! Query operations over the store.
//!
//! Every query filters by wanted categories and canonical sector, then
//! joins the social index at query time.

use std::collections::{BTreeMap, BTreeSet};

use ips_map_geography_models::departments::{
    canonical_department, department_name, supports_postal_prefix,
};
use ips_map_geography_models::{GazetteerEntry, LatLon};
use ips_map_school_models::{
    CategorySet, DepartmentRanking, Establishment, EstablishmentHit, SectorFilter,
};
use ips_map_source::text::normalize_name;

use crate::Store;

/// Maximum number of ranked establishments per category.
pub const RANKING_SIZE: usize = 10;

impl Store {
    fn hit(&self, index: usize, distance_meters: Option<f64>) -> EstablishmentHit {
        let establishment = self.establishments[index].clone();
        EstablishmentHit {
            social_index: self.social_index.get(&establishment.id),
            establishment,
            distance_meters,
        }
    }

    fn wanted(establishment: &Establishment, categories: &CategorySet, sector: SectorFilter) -> bool {
        categories.contains(&establishment.category) && sector.matches(establishment.sector)
    }

    /// Finds a commune in the gazetteer by name.
    #[must_use]
    pub fn find_commune(&self, query: &str) -> Option<&GazetteerEntry> {
        self.gazetteer.find_commune(query)
    }

    /// Establishments whose normalized name contains the normalized query,
    /// in load order. An empty query matches nothing.
    #[must_use]
    pub fn find_by_name(&self, query: &str) -> Vec<EstablishmentHit> {
        let needle = normalize_name(query);
        if needle.is_empty() {
            return Vec::new();
        }
        self.normalized_names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.contains(&needle))
            .map(|(i, _)| self.hit(i, None))
            .collect()
    }

    /// Ranks the establishments of a département by social index.
    ///
    /// Candidates come from the département index plus, for purely numeric
    /// codes, every establishment whose postal code starts with the code
    /// (deduplicated by id). Entries without a published index are
    /// dropped. Each requested category holds at most [`RANKING_SIZE`]
    /// entries, descending by index; ties keep load order.
    #[must_use]
    pub fn top10_by_dept(
        &self,
        department: &str,
        categories: &CategorySet,
        sector: SectorFilter,
    ) -> DepartmentRanking {
        let code = canonical_department(department)
            .unwrap_or_else(|| department.trim().to_uppercase());

        let mut seen = BTreeSet::new();
        let mut candidates: Vec<usize> = self
            .by_department
            .get(&code)
            .into_iter()
            .flatten()
            .copied()
            .filter(|&i| seen.insert(self.establishments[i].id.as_str()))
            .collect();

        if supports_postal_prefix(&code) {
            let primary = candidates.len();
            candidates.extend(
                self.establishments
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| {
                        e.postal_code
                            .as_deref()
                            .is_some_and(|cp| cp.starts_with(code.as_str()))
                    })
                    .filter(|(_, e)| seen.insert(e.id.as_str()))
                    .map(|(i, _)| i),
            );
            log::debug!(
                "Département {code}: {primary} indexed, {} via postal prefix",
                candidates.len() - primary
            );
        }
        candidates.sort_unstable();

        let mut by_category: BTreeMap<_, Vec<EstablishmentHit>> =
            categories.iter().map(|&c| (c, Vec::new())).collect();
        for i in candidates {
            let establishment = &self.establishments[i];
            if !Self::wanted(establishment, categories, sector) {
                continue;
            }
            let hit = self.hit(i, None);
            if hit.social_index.is_none() {
                continue;
            }
            if let Some(bucket) = by_category.get_mut(&establishment.category) {
                bucket.push(hit);
            }
        }

        for bucket in by_category.values_mut() {
            bucket.sort_by(|a, b| {
                b.social_index
                    .unwrap_or(f64::NEG_INFINITY)
                    .total_cmp(&a.social_index.unwrap_or(f64::NEG_INFINITY))
            });
            bucket.truncate(RANKING_SIZE);
        }

        DepartmentRanking {
            label: department_name(&code).map_or_else(|| code.clone(), str::to_string),
            department: code,
            by_category,
        }
    }

    /// Establishments within `radius_meters` of a point, nearest first.
    ///
    /// Invalid coordinates or a negative/non-finite radius yield nothing.
    #[must_use]
    pub fn around(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: f64,
        sector: SectorFilter,
        categories: &CategorySet,
    ) -> Vec<EstablishmentHit> {
        let Some(center) = LatLon::checked(latitude, longitude) else {
            return Vec::new();
        };
        self.points
            .within_radius(center, radius_meters)
            .into_iter()
            .filter(|&(i, _)| Self::wanted(&self.establishments[i], categories, sector))
            .map(|(i, distance)| self.hit(i, Some(distance)))
            .collect()
    }

    /// Establishments with exactly this postal code, in load order.
    #[must_use]
    pub fn by_postcode(
        &self,
        postal_code: &str,
        sector: SectorFilter,
        categories: &CategorySet,
    ) -> Vec<EstablishmentHit> {
        self.by_postal_code
            .get(postal_code.trim())
            .into_iter()
            .flatten()
            .copied()
            .filter(|&i| Self::wanted(&self.establishments[i], categories, sector))
            .map(|i| self.hit(i, None))
            .collect()
    }
}
