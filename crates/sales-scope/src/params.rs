//! HTTP query boundary.
//!
//! Translates raw query-string pairs into a typed [`SalesQuery`]. The
//! translation is an allow-list: recognized keys are parsed with fixed
//! fallbacks, unrecognized keys are ignored, and nothing here can fail.
//! Multi-valued keys (`regions`, `genders`, `categories`, `tags`,
//! `paymentMethods`) may repeat; single-valued keys take their last
//! occurrence.

use std::collections::BTreeSet;

use sales_scope_core::parse;
use sales_scope_core::{AgeRange, DateRange, SalesQuery, SortDirection, SortKey};

/// Build a [`SalesQuery`] from decoded query-string pairs.
///
/// Defaults: empty search, no filters, newest first, page 1 with
/// `default_page_size` rows. Empty or whitespace-only values for the range
/// keys count as absent, so `?dateStart=` does not activate a date filter.
pub fn parse_query(pairs: &[(String, String)], default_page_size: usize) -> SalesQuery {
    let mut query = SalesQuery {
        page_size: default_page_size,
        ..SalesQuery::default()
    };
    let mut age_min: Option<&str> = None;
    let mut age_max: Option<&str> = None;
    let mut date_start: Option<&str> = None;
    let mut date_end: Option<&str> = None;

    for (key, value) in pairs {
        match key.as_str() {
            "search" => query.search = value.clone(),
            "page" => query.page = value.trim().parse().unwrap_or(1),
            "pageSize" => query.page_size = value.trim().parse().unwrap_or(default_page_size),
            "sortBy" => query.sort_key = SortKey::parse(value),
            "sortOrder" => query.sort_dir = SortDirection::parse(value),
            "regions" => insert_value(&mut query.filters.regions, value),
            "genders" => insert_value(&mut query.filters.genders, value),
            "categories" => insert_value(&mut query.filters.categories, value),
            "tags" => insert_value(&mut query.filters.tags, value),
            "paymentMethods" => insert_value(&mut query.filters.payment_methods, value),
            "ageMin" => age_min = non_empty(value),
            "ageMax" => age_max = non_empty(value),
            "dateStart" => date_start = non_empty(value),
            "dateEnd" => date_end = non_empty(value),
            _ => {}
        }
    }

    if age_min.is_some() || age_max.is_some() {
        // A bound that fails to parse drops out rather than poisoning the
        // whole range.
        query.filters.age_range = Some(AgeRange {
            min: age_min.and_then(|raw| raw.parse().ok()),
            max: age_max.and_then(|raw| raw.parse().ok()),
        });
    }
    if date_start.is_some() || date_end.is_some() {
        query.filters.date_range = Some(DateRange {
            start: date_start.and_then(parse::parse_date),
            // A day-granular end bound covers its whole day.
            end: date_end.and_then(parse::parse_date).map(parse::end_of_day),
        });
    }
    query
}

fn insert_value(set: &mut BTreeSet<String>, value: &str) {
    if !value.is_empty() {
        set.insert(value.to_string());
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sales_scope_core::{apply_filters, Record};

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn no_params_yields_the_default_query() {
        let query = parse_query(&[], 25);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 25);
        assert_eq!(query.sort_key, Some(SortKey::Date));
        assert_eq!(query.sort_dir, SortDirection::Desc);
        assert!(query.search.is_empty());
        assert!(query.filters.regions.is_empty());
        assert_eq!(query.filters.age_range, None);
        assert_eq!(query.filters.date_range, None);
    }

    #[test]
    fn repeated_multi_value_keys_accumulate() {
        let query = parse_query(
            &pairs(&[("regions", "North"), ("regions", "South"), ("tags", "vip")]),
            10,
        );
        assert!(query.filters.regions.contains("North"));
        assert!(query.filters.regions.contains("South"));
        assert!(query.filters.tags.contains("vip"));
    }

    #[test]
    fn empty_multi_values_do_not_constrain_the_dimension() {
        let query = parse_query(&pairs(&[("regions", "")]), 10);
        assert!(query.filters.regions.is_empty());
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let query = parse_query(&pairs(&[("flavor", "grape"), ("page", "3")]), 10);
        assert_eq!(
            query,
            SalesQuery {
                page: 3,
                ..SalesQuery::default()
            }
        );
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let query = parse_query(&pairs(&[("page", "2.5"), ("pageSize", "lots")]), 10);
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 10);
    }

    #[test]
    fn last_single_value_occurrence_wins() {
        let query = parse_query(&pairs(&[("page", "2"), ("page", "5")]), 10);
        assert_eq!(query.page, 5);
    }

    #[test]
    fn bogus_sort_key_becomes_none() {
        let query = parse_query(&pairs(&[("sortBy", "chaos")]), 10);
        assert_eq!(query.sort_key, None);
    }

    #[test]
    fn search_and_sort_params_flow_through_untrimmed() {
        let query = parse_query(
            &pairs(&[("search", "  Alice "), ("sortBy", "quantity"), ("sortOrder", "asc")]),
            10,
        );
        assert_eq!(query.search, "  Alice ");
        assert_eq!(query.sort_key, Some(SortKey::Quantity));
        assert_eq!(query.sort_dir, SortDirection::Asc);
    }

    #[test]
    fn either_age_bound_activates_the_range() {
        let query = parse_query(&pairs(&[("ageMin", "30")]), 10);
        assert_eq!(
            query.filters.age_range,
            Some(AgeRange { min: Some(30), max: None })
        );

        let query = parse_query(&pairs(&[("ageMax", "40"), ("ageMin", "junk")]), 10);
        assert_eq!(
            query.filters.age_range,
            Some(AgeRange { min: None, max: Some(40) })
        );
    }

    #[test]
    fn empty_range_values_do_not_activate_filters() {
        let query = parse_query(&pairs(&[("dateStart", ""), ("ageMin", " ")]), 10);
        assert_eq!(query.filters.date_range, None);
        assert_eq!(query.filters.age_range, None);
    }

    #[test]
    fn date_end_covers_its_whole_day() {
        let query = parse_query(
            &pairs(&[("dateStart", "2024-01-01"), ("dateEnd", "2024-01-15")]),
            10,
        );
        let range = query.filters.date_range.unwrap();
        assert_eq!(range.start, parse::parse_date("2024-01-01"));
        assert_eq!(range.end.unwrap().date_naive().to_string(), "2024-01-15");

        // A sale late on the end day still falls inside the range.
        let late_sale = Record {
            date: "2024-01-15T23:00".to_string(),
            ..Record::default()
        };
        let kept = apply_filters(vec![&late_sale], &query.filters);
        assert_eq!(kept.len(), 1);
    }
}
