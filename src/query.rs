// src/query.rs

use std::{collections::BTreeSet, sync::Arc};
use tracing::debug;

use crate::error::QueryError;
use crate::record::{DeliveryRecord, Field, RecordSet};

/// Validate an identifier received as text before it reaches the engine.
pub fn parse_id(raw: &str) -> Result<i64, QueryError> {
    raw.trim().parse().map_err(|_| {
        QueryError::InvalidArgument(format!("delivery id `{}` is not an integer", raw))
    })
}

/// First record whose `ID` parses to `id`. Records with non-numeric IDs never
/// match.
pub fn find_by_id(set: &RecordSet, id: i64) -> Option<&DeliveryRecord> {
    set.iter().find(|r| r.numeric_id() == Some(id))
}

/// Point lookup with the ID-only sentinel on a miss.
pub fn get_by_id(set: &RecordSet, id: i64) -> DeliveryRecord {
    match find_by_id(set, id) {
        Some(r) => r.clone(),
        None => {
            debug!(id, "no delivery with this id");
            DeliveryRecord::id_only(id)
        }
    }
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// Records whose `field` equals a value, ignoring case.
///
/// Nothing is evaluated until iterated, and [`Selection::iter`] can be called
/// any number of times; each pass yields the same records in dataset order.
#[derive(Debug, Clone)]
pub struct Selection {
    set: Arc<RecordSet>,
    field: Field,
    needle: String,
}

impl Selection {
    pub fn new(set: Arc<RecordSet>, field: Field, value: &str) -> Self {
        Self {
            set,
            field,
            needle: fold_case(value).collect(),
        }
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeliveryRecord> + '_ {
        self.set
            .iter()
            .filter(move |r| fold_case(r.get(self.field)).eq(self.needle.chars()))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    pub fn to_vec(&self) -> Vec<DeliveryRecord> {
        self.iter().cloned().collect()
    }
}

pub fn filter_by_country(set: Arc<RecordSet>, country: &str) -> Selection {
    Selection::new(set, Field::Country, country)
}

pub fn filter_by_vendor(set: Arc<RecordSet>, vendor: &str) -> Selection {
    Selection::new(set, Field::Vendor, vendor)
}

pub fn filter_by_shipment_mode(set: Arc<RecordSet>, mode: &str) -> Selection {
    Selection::new(set, Field::ShipmentMode, mode)
}

/// Sorted, de-duplicated, non-empty values of `field`, compared as stored.
pub fn list_distinct(set: &RecordSet, field: Field) -> Vec<String> {
    set.iter()
        .map(|r| r.get(field))
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

pub fn list_distinct_countries(set: &RecordSet) -> Vec<String> {
    list_distinct(set, Field::Country)
}

pub fn list_distinct_vendors(set: &RecordSet) -> Vec<String> {
    list_distinct(set, Field::Vendor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, country: &str, vendor: &str, mode: &str) -> DeliveryRecord {
        DeliveryRecord {
            id: id.into(),
            country: country.into(),
            vendor: vendor.into(),
            shipment_mode: mode.into(),
            ..Default::default()
        }
    }

    fn sample() -> Arc<RecordSet> {
        Arc::new(RecordSet::new(vec![
            record("1", "Côte d'Ivoire", "RANBAXY Fine Chemicals LTD.", "Air"),
            record("3", "Vietnam", "Aurobindo Pharma Limited", "Air"),
            record("7", "Nigeria", "Aurobindo Pharma Limited", "Truck"),
            record("n/a", "Vietnam", "", "Air Charter"),
            record("7", "Haiti", "SCMS from RDC", ""),
            record("12", "", "Cipla Limited", "Ocean"),
            record("15", "vietnam", "aurobindo pharma limited", "AIR"),
        ]))
    }

    #[test]
    fn parse_id_accepts_integers_only() {
        assert_eq!(parse_id("42"), Ok(42));
        assert_eq!(parse_id(" -3 "), Ok(-3));
        for bad in ["", "4.5", "abc", "12abc", "99999999999999999999"] {
            assert!(
                matches!(parse_id(bad), Err(QueryError::InvalidArgument(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn get_by_id_returns_first_match() {
        let set = sample();
        for r in set.iter() {
            if let Some(id) = r.numeric_id() {
                let found = get_by_id(&set, id);
                assert_eq!(found.numeric_id(), Some(id));
            }
        }
        // two records share id 7; the earlier one wins
        assert_eq!(get_by_id(&set, 7).country, "Nigeria");
    }

    #[test]
    fn get_by_id_miss_is_id_only_sentinel() {
        let set = sample();
        for id in [0, 2, 1000, -1] {
            assert_eq!(get_by_id(&set, id), DeliveryRecord::id_only(id));
            assert!(find_by_id(&set, id).is_none());
        }
    }

    #[test]
    fn filters_ignore_case_on_both_sides() {
        let set = sample();
        for r in set.iter() {
            for variant in [
                r.country.clone(),
                r.country.to_uppercase(),
                r.country.to_lowercase(),
            ] {
                assert!(filter_by_country(Arc::clone(&set), &variant)
                    .iter()
                    .any(|m| m == r));
            }
            for variant in [
                r.vendor.clone(),
                r.vendor.to_uppercase(),
                r.vendor.to_lowercase(),
            ] {
                assert!(filter_by_vendor(Arc::clone(&set), &variant)
                    .iter()
                    .any(|m| m == r));
            }
            for variant in [
                r.shipment_mode.clone(),
                r.shipment_mode.to_uppercase(),
                r.shipment_mode.to_lowercase(),
            ] {
                assert!(filter_by_shipment_mode(Arc::clone(&set), &variant)
                    .iter()
                    .any(|m| m == r));
            }
        }
    }

    #[test]
    fn case_folding_is_per_character() {
        let set = Arc::new(RecordSet::new(vec![
            record("1", "ÅLAND", "", ""),
            record("2", "Åland Islands", "", ""),
            record("3", "İstanbul", "", ""),
        ]));
        let ids = |country: &str| -> Vec<String> {
            filter_by_country(Arc::clone(&set), country)
                .iter()
                .map(|r| r.id.clone())
                .collect()
        };
        assert_eq!(ids("åland"), ["1"]);
        assert_eq!(ids("åland islands"), ["2"]);
        assert_eq!(ids("ÅLAN"), Vec::<String>::new());
        assert_eq!(ids("i\u{307}stanbul"), ["3"]);
    }

    #[test]
    fn filter_preserves_order_and_is_restartable() {
        let hits = filter_by_country(sample(), "VIETNAM");
        let first: Vec<_> = hits.iter().map(|r| r.id.as_str()).collect();
        let second: Vec<_> = hits.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(first, ["3", "n/a", "15"]);
        assert_eq!(first, second);
        assert_eq!(hits.count(), 3);
        assert_eq!(hits.field(), Field::Country);
    }

    #[test]
    fn filter_matches_whole_value_only() {
        let set = sample();
        assert_eq!(filter_by_shipment_mode(Arc::clone(&set), "air").count(), 3);
        assert_eq!(filter_by_shipment_mode(Arc::clone(&set), "Air Charter").count(), 1);
        assert!(filter_by_vendor(set, "Aurobindo").is_empty());
    }

    #[test]
    fn empty_argument_matches_only_empty_fields() {
        let set = sample();
        let ids: Vec<_> = filter_by_country(Arc::clone(&set), "")
            .to_vec()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["12"]);
        assert_eq!(filter_by_shipment_mode(set, "").count(), 1);
    }

    #[test]
    fn distinct_countries_sorted_unique_non_empty() {
        let set = sample();
        let countries = list_distinct_countries(&set);
        assert_eq!(
            countries,
            ["Côte d'Ivoire", "Haiti", "Nigeria", "Vietnam", "vietnam"]
        );
        assert!(countries.windows(2).all(|w| w[0] < w[1]));
        for r in set.iter().filter(|r| !r.country.is_empty()) {
            assert_eq!(countries.iter().filter(|c| **c == r.country).count(), 1);
        }
    }

    #[test]
    fn distinct_vendors_skip_empty_values() {
        let vendors = list_distinct_vendors(&sample());
        assert_eq!(
            vendors,
            [
                "Aurobindo Pharma Limited",
                "Cipla Limited",
                "RANBAXY Fine Chemicals LTD.",
                "SCMS from RDC",
                "aurobindo pharma limited",
            ]
        );
    }

    #[test]
    fn empty_set_yields_nothing() {
        let set = Arc::new(RecordSet::default());
        assert!(list_distinct_countries(&set).is_empty());
        assert!(filter_by_country(Arc::clone(&set), "").is_empty());
        assert_eq!(get_by_id(&set, 1), DeliveryRecord::id_only(1));
    }
}
