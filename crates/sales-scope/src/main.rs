//! # SalesScope CLI (`salescope`)
//!
//! The `salescope` binary is the single entry point: it serves the HTTP
//! API, imports CSV report exports into the JSON dataset, and answers
//! queries directly in the terminal.
//!
//! ## Usage
//!
//! ```bash
//! salescope --config ./config/salescope.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `salescope serve` | Start the sales API HTTP server |
//! | `salescope import <report.csv>` | Convert a CSV export into the JSON dataset |
//! | `salescope search [text]` | Query the dataset from the terminal |
//! | `salescope stats` | Print a dataset overview |
//!
//! ## Examples
//!
//! ```bash
//! # Convert a report into the configured dataset location
//! salescope import reports/march.csv
//!
//! # Serve the API on the configured bind address
//! salescope serve
//!
//! # Paginated, filtered terminal query
//! salescope search "smith" --region North --sort-by quantity --sort-order asc
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sales_scope::{config, import, search, server, stats};
use sales_scope_core::{parse, AgeRange, DateRange, FilterSet, SalesQuery, SortDirection, SortKey};

/// SalesScope CLI.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file means built-in defaults; see
/// `config/salescope.example.toml` for the full layout.
#[derive(Parser)]
#[command(
    name = "salescope",
    about = "Search, filter, and pagination service for retail sales datasets",
    version,
    long_about = "SalesScope loads a JSON sales dataset once, then serves search, \
    filtering, sorting, and pagination over it via an HTTP API and a terminal \
    client. A CSV importer converts raw report exports into the dataset format."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/salescope.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the sales API HTTP server.
    ///
    /// Binds to `[server].bind`, loads the dataset once, and serves
    /// `/sales`, `/sales/filter-options`, and `/health` until terminated.
    Serve,

    /// Convert a sales report CSV into the JSON dataset.
    ///
    /// Handles quoted cells, both newline conventions, and ragged rows.
    /// Without an explicit output path the configured dataset path is
    /// written, so `serve` picks the import up on its next start.
    Import {
        /// Path to the CSV report to convert.
        input: PathBuf,

        /// Output path for the JSON dataset. Defaults to `[dataset].path`.
        output: Option<PathBuf>,
    },

    /// Query the dataset from the terminal.
    ///
    /// Applies the same search, filter, sort, and pagination pipeline as
    /// the HTTP API and prints one page of results.
    Search(SearchArgs),

    /// Print a dataset overview.
    ///
    /// Shows record counts and the filter options the API would serve.
    Stats,
}

/// Arguments for `salescope search`.
#[derive(Args)]
struct SearchArgs {
    /// Text matched against customer names and phone numbers.
    text: Option<String>,

    /// Keep only these regions (repeatable).
    #[arg(long = "region")]
    regions: Vec<String>,

    /// Keep only these genders (repeatable).
    #[arg(long = "gender")]
    genders: Vec<String>,

    /// Keep only these product categories (repeatable).
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Keep records carrying any of these tags (repeatable).
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Keep only these payment methods (repeatable).
    #[arg(long = "payment")]
    payment_methods: Vec<String>,

    /// Minimum age, inclusive.
    #[arg(long)]
    age_min: Option<i64>,

    /// Maximum age, inclusive.
    #[arg(long)]
    age_max: Option<i64>,

    /// Earliest sale date, e.g. `2024-01-01`.
    #[arg(long)]
    date_start: Option<String>,

    /// Latest sale date, inclusive of the whole day, e.g. `2024-01-31`.
    #[arg(long)]
    date_end: Option<String>,

    /// Sort key: `date`, `quantity`, or `customerName`.
    #[arg(long, default_value = "date")]
    sort_by: String,

    /// Sort direction: `asc` or `desc`.
    #[arg(long, default_value = "desc")]
    sort_order: String,

    /// Page to show (1-based).
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Rows per page. Defaults to `[query].default_page_size`.
    #[arg(long)]
    page_size: Option<usize>,
}

impl SearchArgs {
    /// Assemble the typed query, following the same boundary conventions
    /// as the HTTP API: unknown sort keys preserve order and a
    /// day-granular end date covers its whole day.
    fn into_query(self, default_page_size: usize) -> SalesQuery {
        let age_range = if self.age_min.is_some() || self.age_max.is_some() {
            Some(AgeRange {
                min: self.age_min,
                max: self.age_max,
            })
        } else {
            None
        };
        let date_range = if self.date_start.is_some() || self.date_end.is_some() {
            Some(DateRange {
                start: self.date_start.as_deref().and_then(parse::parse_date),
                end: self
                    .date_end
                    .as_deref()
                    .and_then(parse::parse_date)
                    .map(parse::end_of_day),
            })
        } else {
            None
        };

        SalesQuery {
            search: self.text.unwrap_or_default(),
            filters: FilterSet {
                regions: self.regions.into_iter().collect(),
                genders: self.genders.into_iter().collect(),
                categories: self.categories.into_iter().collect(),
                tags: self.tags.into_iter().collect(),
                payment_methods: self.payment_methods.into_iter().collect(),
                age_range,
                date_range,
            },
            sort_key: SortKey::parse(&self.sort_by),
            sort_dir: SortDirection::parse(&self.sort_order),
            page: self.page,
            page_size: self.page_size.unwrap_or(default_page_size),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Import { input, output } => {
            let output = output.unwrap_or_else(|| cfg.dataset.path.clone());
            import::run_import(&input, &output)?;
        }
        Commands::Search(args) => {
            let query = args.into_query(cfg.query.default_page_size);
            search::run_search(&cfg, &query).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
