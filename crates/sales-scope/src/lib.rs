//! SalesScope application crate.
//!
//! The workspace splits into a pure core (`sales-scope-core`: records,
//! query pipeline, facet aggregation) and this crate, which owns
//! everything with a side effect:
//!
//! | Module | Purpose |
//! |----------|---------------------------------------------------|
//! | [`config`] | TOML configuration with built-in defaults |
//! | [`store`] | Cached dataset snapshot and record sources |
//! | [`params`] | Query-string to typed query translation |
//! | [`server`] | Axum HTTP API (`/sales`, `/sales/filter-options`) |
//! | [`import`] | CSV to JSON dataset conversion |
//! | [`search`] | Terminal query command |
//! | [`stats`] | Terminal dataset overview |
//!
//! The `salescope` binary wires these together behind a clap CLI.

pub mod config;
pub mod import;
pub mod params;
pub mod search;
pub mod server;
pub mod stats;
pub mod store;
