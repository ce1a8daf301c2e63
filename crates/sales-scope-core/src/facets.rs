//! Facet aggregation for filter pickers.
//!
//! [`compute_facets`] walks a dataset snapshot once and reports, per
//! dimension, the values a client can filter on. It always describes the
//! whole dataset rather than a filtered view, so pickers stay stable while
//! the user narrows a query.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parse;
use crate::record::Record;

/// Observed bounds of the `Age` column. Falls back to `0..=100` when no
/// record carries a parseable age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeBounds {
    pub min: i64,
    pub max: i64,
}

/// Observed bounds of the `Date` column as `YYYY-MM-DD` strings, or `None`
/// when no record carries a parseable date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Distinct filterable values per dimension. Lists are sorted and free of
/// empty entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacetSummary {
    pub regions: Vec<String>,
    pub genders: Vec<String>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub payment_methods: Vec<String>,
    pub age_range: AgeBounds,
    pub date_range: DateBounds,
}

/// Aggregate filter options over a dataset snapshot.
pub fn compute_facets(records: &[Record]) -> FacetSummary {
    let mut regions = BTreeSet::new();
    let mut genders = BTreeSet::new();
    let mut categories = BTreeSet::new();
    let mut tags = BTreeSet::new();
    let mut payment_methods = BTreeSet::new();
    let mut ages = Vec::new();
    let mut dates = Vec::new();

    for record in records {
        insert_non_empty(&mut regions, &record.customer_region);
        insert_non_empty(&mut genders, &record.gender);
        insert_non_empty(&mut categories, &record.product_category);
        insert_non_empty(&mut payment_methods, &record.payment_method);
        tags.extend(parse::split_tags(&record.tags));
        if let Some(age) = parse::parse_age(&record.age) {
            ages.push(age);
        }
        if let Some(date) = parse::parse_date(&record.date) {
            dates.push(date);
        }
    }

    let age_range = match (ages.iter().min(), ages.iter().max()) {
        (Some(&min), Some(&max)) => AgeBounds { min, max },
        _ => AgeBounds { min: 0, max: 100 },
    };
    let date_range = DateBounds {
        min: dates.iter().min().map(format_day),
        max: dates.iter().max().map(format_day),
    };

    FacetSummary {
        regions: regions.into_iter().collect(),
        genders: genders.into_iter().collect(),
        categories: categories.into_iter().collect(),
        tags: tags.into_iter().collect(),
        payment_methods: payment_methods.into_iter().collect(),
        age_range,
        date_range,
    }
}

fn insert_non_empty(set: &mut BTreeSet<String>, value: &str) {
    if !value.is_empty() {
        set.insert(value.to_string());
    }
}

fn format_day(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}
