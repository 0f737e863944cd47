//! Reverse resolver: country identifier -> metadata (spec.md §4.5).
//!
//! Dispatches exclusively on query length: a 2-letter query only ever
//! consults ISO2, a 3-letter query only ever consults ISO3, and anything
//! else falls to name matching — a failed code lookup reports not-found
//! rather than falling through to the name passes below it.

use crate::error::{GeoError, Result};
use crate::loader::Loader;
use crate::model::{CountryRecord, ReverseResult};
use crate::text;

pub fn resolve_by_country(loader: &Loader, query: &str) -> Result<ReverseResult> {
    let query = query.trim();
    if query.is_empty() {
        return Err(GeoError::EmptyQuery);
    }

    if query.len() == 2 {
        return Ok(loader
            .find_by_iso2(query)
            .map(ReverseResult::from_record)
            .unwrap_or_else(ReverseResult::not_found));
    }
    if query.len() == 3 {
        return Ok(loader
            .find_by_iso3(query)
            .map(ReverseResult::from_record)
            .unwrap_or_else(ReverseResult::not_found));
    }

    let key = text::fold_key(query);

    if let Some(record) = loader.iter_records().find(|r| text::fold_key(&r.name) == key) {
        return Ok(ReverseResult::from_record(record));
    }

    Ok(best_substring_match(loader, &key)
        .map(ReverseResult::from_record)
        .unwrap_or_else(ReverseResult::not_found))
}

fn best_substring_match<'a>(loader: &'a Loader, key: &str) -> Option<&'a CountryRecord> {
    loader
        .iter_records()
        .filter(|r| text::fold_key(&r.name).contains(key))
        .min_by(|a, b| a.name.len().cmp(&b.name.len()).then(a.id.cmp(&b.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Loader;
    use std::collections::HashMap;

    fn record(id: u32, name: &str, iso2: &str, iso3: &str) -> CountryRecord {
        CountryRecord {
            id,
            name: name.to_string(),
            iso2: Some(iso2.to_string()),
            iso3: Some(iso3.to_string()),
            continent: "Testia".to_string(),
            timezone: "UTC".to_string(),
            centroid: Some((10.0, 20.0)),
            bbox: Some((0.0, 0.0, 20.0, 40.0)),
            geometry: None,
        }
    }

    fn loader(records: Vec<CountryRecord>) -> Loader {
        Loader::from_parts(records, HashMap::new())
    }

    #[test]
    fn finds_by_iso2() {
        let loader = loader(vec![record(0, "United States", "US", "USA")]);
        let result = resolve_by_country(&loader, "us").unwrap();
        assert_eq!(result.country.as_deref(), Some("United States"));
    }

    #[test]
    fn finds_by_iso3() {
        let loader = loader(vec![record(0, "United States", "US", "USA")]);
        let result = resolve_by_country(&loader, "USA").unwrap();
        assert_eq!(result.country.as_deref(), Some("United States"));
    }

    #[test]
    fn finds_by_accent_insensitive_exact_name() {
        let loader = loader(vec![record(0, "Côte d'Ivoire", "CI", "CIV")]);
        let result = resolve_by_country(&loader, "cote d'ivoire").unwrap();
        assert_eq!(result.country.as_deref(), Some("Côte d'Ivoire"));
    }

    #[test]
    fn substring_match_prefers_shortest_name() {
        let loader = loader(vec![
            record(0, "Republic of Korea", "KR", "KOR"),
            record(1, "Korea", "XK", "XKX"),
        ]);
        let result = resolve_by_country(&loader, "korea").unwrap();
        assert_eq!(result.country.as_deref(), Some("Korea"));
    }

    #[test]
    fn empty_query_is_rejected() {
        let loader = loader(vec![]);
        assert!(matches!(resolve_by_country(&loader, "   "), Err(GeoError::EmptyQuery)));
    }

    #[test]
    fn unmatched_query_returns_not_found() {
        let loader = loader(vec![record(0, "United States", "US", "USA")]);
        let result = resolve_by_country(&loader, "Atlantis").unwrap();
        assert!(result.country.is_none());
    }

    #[test]
    fn failed_code_lookup_does_not_fall_through_to_name_matching() {
        // "Xx" folds to a substring of no real name, but this pins the
        // dispatch rule itself: a 2-letter miss must not reach the name
        // passes at all, even if one of them would otherwise have matched.
        let loader = loader(vec![record(0, "Xx Land", "ZZ", "ZZZ")]);
        let result = resolve_by_country(&loader, "xx").unwrap();
        assert!(result.country.is_none());
    }
}
