//! # SalesScope Core
//!
//! Pure query engine for SalesScope: the record model, lenient field
//! parsing, the search/filter/sort/paginate pipeline, and facet
//! aggregation.
//!
//! This crate contains no tokio, no filesystem I/O, and no opinion about
//! where the dataset came from; given a slice of records and a query it
//! produces pages and facet summaries. The application crate layers
//! storage, HTTP, and the CLI on top.

pub mod facets;
pub mod parse;
pub mod query;
pub mod record;

pub use facets::{compute_facets, AgeBounds, DateBounds, FacetSummary};
pub use query::{
    apply_filters, apply_search, apply_sort, paginate, run_query, AgeRange, DateRange, FilterSet,
    Page, PageMeta, SalesQuery, SortDirection, SortKey,
};
pub use record::Record;
