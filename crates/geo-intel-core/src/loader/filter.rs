//! Modular loading: restrict which countries get materialized (spec.md
//! §4.3). Filtering happens against metadata at load time; filtered-out
//! polygons and their geohash entries are dropped before the query pipeline
//! ever sees them, the same spirit as `load_via_builder`'s legacy pruning
//! (`filtered_db.countries.retain(|c| f.contains(&c.iso2...))`) in the
//! teacher repo, generalized to continents and an explicit exclude list.

use crate::model::CountryRecord;

/// `{only, continents, exclude}` — all three may be combined; `only` and
/// `continents` are independently inclusive (a record passes if it matches
/// either, when both are set), `exclude` is applied last and always wins.
#[derive(Debug, Clone, Default)]
pub struct LoaderFilter {
    pub only: Option<Vec<String>>,
    pub continents: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

impl LoaderFilter {
    pub fn is_empty(&self) -> bool {
        self.only.is_none() && self.continents.is_none() && self.exclude.is_none()
    }

    pub fn matches(&self, record: &CountryRecord) -> bool {
        if let Some(exclude) = &self.exclude {
            if record
                .iso2
                .as_deref()
                .is_some_and(|iso2| exclude.iter().any(|e| e.eq_ignore_ascii_case(iso2)))
            {
                return false;
            }
        }

        let included_by_only = self.only.as_ref().map(|only| {
            record
                .iso2
                .as_deref()
                .is_some_and(|iso2| only.iter().any(|o| o.eq_ignore_ascii_case(iso2)))
        });
        let included_by_continent = self.continents.as_ref().map(|continents| {
            continents
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&record.continent))
        });

        match (included_by_only, included_by_continent) {
            (None, None) => true,
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (Some(a), Some(b)) => a || b,
        }
    }

    pub fn apply(&self, records: Vec<CountryRecord>) -> Vec<CountryRecord> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(iso2: &str, continent: &str) -> CountryRecord {
        CountryRecord {
            id: 0,
            name: iso2.to_string(),
            iso2: Some(iso2.to_string()),
            iso3: None,
            continent: continent.to_string(),
            timezone: String::new(),
            centroid: None,
            bbox: None,
            geometry: None,
        }
    }

    #[test]
    fn only_restricts_to_listed_iso2() {
        let filter = LoaderFilter {
            only: Some(vec!["US".into(), "CA".into()]),
            ..Default::default()
        };
        assert!(filter.matches(&record("US", "North America")));
        assert!(!filter.matches(&record("MX", "North America")));
    }

    #[test]
    fn exclude_wins_over_only() {
        let filter = LoaderFilter {
            only: Some(vec!["US".into()]),
            exclude: Some(vec!["US".into()]),
            ..Default::default()
        };
        assert!(!filter.matches(&record("US", "North America")));
    }

    #[test]
    fn continent_filter_is_inclusive() {
        let filter = LoaderFilter {
            continents: Some(vec!["Europe".into()]),
            ..Default::default()
        };
        assert!(filter.matches(&record("FR", "Europe")));
        assert!(!filter.matches(&record("US", "North America")));
    }
}
