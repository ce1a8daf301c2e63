//! Query pipeline: search, filter, sort, paginate.
//!
//! Every read of the dataset goes through [`run_query`], which applies four
//! stages in a fixed order:
//!
//! 1. **Search**: case-insensitive substring match on customer name or
//!    phone number. Empty search text keeps every record.
//! 2. **Filter**: one predicate per dimension, ANDed together; multiple
//!    values inside one dimension are ORed.
//! 3. **Sort**: stable ordering on one of the recognized keys. An
//!    unrecognized key leaves the filtered order untouched.
//! 4. **Paginate**: slice out one page and describe the whole result set in
//!    the page metadata.
//!
//! The stages operate on borrowed records and only the final page is
//! cloned, so a query over a large snapshot allocates in proportion to the
//! page size rather than the match count.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::parse;
use crate::record::Record;

/// Sort keys recognized by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Date,
    Quantity,
    CustomerName,
}

impl SortKey {
    /// Map a wire-level `sortBy` value to a key. Unknown values map to
    /// `None`, which [`apply_sort`] treats as "leave the order alone".
    pub fn parse(raw: &str) -> Option<SortKey> {
        match raw {
            "date" => Some(SortKey::Date),
            "quantity" => Some(SortKey::Quantity),
            "customerName" => Some(SortKey::CustomerName),
            _ => None,
        }
    }
}

/// Sort direction. Descending is the default everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    /// Only the exact value `"asc"` selects ascending; anything else is
    /// descending.
    pub fn parse(raw: &str) -> SortDirection {
        if raw == "asc" {
            SortDirection::Asc
        } else {
            SortDirection::Desc
        }
    }
}

/// Inclusive age bounds. A missing `min` means zero, a missing `max` means
/// unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AgeRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

/// Inclusive date bounds. Widening a day-granular upper bound to the end of
/// its day is the query boundary's job, not the pipeline's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Active filters, one slot per dimension. Empty sets and `None` ranges
/// mean "dimension not constrained".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub regions: BTreeSet<String>,
    pub genders: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub payment_methods: BTreeSet<String>,
    pub age_range: Option<AgeRange>,
    pub date_range: Option<DateRange>,
}

/// A complete query against the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesQuery {
    pub search: String,
    pub filters: FilterSet,
    /// `None` records an unrecognized `sortBy` and preserves the filtered
    /// order.
    pub sort_key: Option<SortKey>,
    pub sort_dir: SortDirection,
    /// 1-based. Values below 1 clamp to the first page.
    pub page: usize,
    pub page_size: usize,
}

impl Default for SalesQuery {
    /// The wire defaults: everything, newest first, first page of ten.
    fn default() -> Self {
        SalesQuery {
            search: String::new(),
            filters: FilterSet::default(),
            sort_key: Some(SortKey::Date),
            sort_dir: SortDirection::Desc,
            page: 1,
            page_size: 10,
        }
    }
}

/// Result-set description attached to every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub rows: Vec<Record>,
    pub meta: PageMeta,
}

/// Stage 1: keep records whose customer name or phone number contains the
/// search text, case-insensitively. Empty or whitespace-only text keeps
/// every record in its original order.
pub fn apply_search<'a>(rows: Vec<&'a Record>, search: &str) -> Vec<&'a Record> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return rows;
    }
    rows.into_iter()
        .filter(|record| {
            record.customer_name.to_lowercase().contains(&needle)
                || record.phone_number.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Stage 2: apply every active dimension in turn. Dimensions are ANDed;
/// values inside one dimension are ORed.
pub fn apply_filters<'a>(mut rows: Vec<&'a Record>, filters: &FilterSet) -> Vec<&'a Record> {
    if !filters.regions.is_empty() {
        rows.retain(|record| filters.regions.contains(record.customer_region.as_str()));
    }
    if !filters.genders.is_empty() {
        rows.retain(|record| filters.genders.contains(record.gender.as_str()));
    }
    if !filters.categories.is_empty() {
        rows.retain(|record| filters.categories.contains(record.product_category.as_str()));
    }
    if !filters.tags.is_empty() {
        rows.retain(|record| {
            parse::split_tags(&record.tags)
                .iter()
                .any(|tag| filters.tags.contains(tag.as_str()))
        });
    }
    if !filters.payment_methods.is_empty() {
        rows.retain(|record| filters.payment_methods.contains(record.payment_method.as_str()));
    }
    if let Some(range) = filters.age_range {
        rows.retain(|record| {
            let age = parse::age_or_zero(&record.age);
            age >= range.min.unwrap_or(0) && range.max.map_or(true, |max| age <= max)
        });
    }
    if let Some(range) = filters.date_range {
        // An active date bound excludes records whose date cannot be
        // parsed, even when the bound is open on one side.
        rows.retain(|record| match parse::parse_date(&record.date) {
            Some(date) => {
                range.start.map_or(true, |start| date >= start)
                    && range.end.map_or(true, |end| date <= end)
            }
            None => false,
        });
    }
    rows
}

/// Stage 3: stable sort on the requested key.
///
/// Ties keep their relative order from the filtered sequence in both
/// directions, because descending negates the comparator instead of
/// reversing the sorted slice. `None` is the unrecognized-key case and
/// leaves the order untouched.
pub fn apply_sort(rows: &mut [&Record], key: Option<SortKey>, dir: SortDirection) {
    let key = match key {
        Some(key) => key,
        None => return,
    };
    let compare = |a: &Record, b: &Record| -> Ordering {
        match key {
            SortKey::Date => parse::parse_date(&a.date).cmp(&parse::parse_date(&b.date)),
            SortKey::Quantity => parse::quantity_or_zero(&a.quantity)
                .partial_cmp(&parse::quantity_or_zero(&b.quantity))
                .unwrap_or(Ordering::Equal),
            SortKey::CustomerName => a
                .customer_name
                .to_lowercase()
                .cmp(&b.customer_name.to_lowercase()),
        }
    };
    match dir {
        SortDirection::Asc => rows.sort_by(|a, b| compare(a, b)),
        SortDirection::Desc => rows.sort_by(|a, b| compare(b, a)),
    }
}

/// Stage 4: clamp the page inputs, slice out the requested window, and
/// clone only the rows on it.
///
/// A page past the end yields no rows but still reports accurate totals, so
/// clients can walk back to a valid page.
pub fn paginate(rows: Vec<&Record>, page: usize, page_size: usize) -> Page {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_items = rows.len();
    let total_pages = total_items.div_ceil(page_size);
    let start = (page - 1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(total_items);
    let window: &[&Record] = if start < total_items { &rows[start..end] } else { &[] };
    Page {
        rows: window.iter().map(|record| (*record).clone()).collect(),
        meta: PageMeta {
            current_page: page,
            page_size,
            total_items,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        },
    }
}

/// Run the full pipeline over a dataset snapshot.
pub fn run_query(records: &[Record], query: &SalesQuery) -> Page {
    let rows: Vec<&Record> = records.iter().collect();
    let rows = apply_search(rows, &query.search);
    let mut rows = apply_filters(rows, &query.filters);
    apply_sort(&mut rows, query.sort_key, query.sort_dir);
    paginate(rows, query.page, query.page_size)
}
