use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::LazyLock;
use uuid::Uuid;

use boreal_core::{DEFAULT_CATALOG_URL, DEFAULT_QUERY, FacetQuery};

static VERSION_INFO: LazyLock<String> = LazyLock::new(|| {
    let version = env!("CARGO_PKG_VERSION");

    let commit = option_env!("VERGEN_GIT_SHA")
        .map(|s| s.chars().take(7).collect::<String>())
        .unwrap_or_else(|| "unknown".to_string());

    let built = option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown");
    let target = option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown");
    let rustc = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown");

    format!("{version}\ncommit: {commit}\nbuilt: {built}\ntarget: {target}\nrustc: {rustc}")
});

pub fn version_info() -> &'static str {
    &VERSION_INFO
}

/// CLI configuration parsed from command line arguments and environment variables
#[derive(Parser, Debug)]
#[command(name = "boreal")]
#[command(
    author,
    version = version_info(),
    about = "Harvest and browse research datasets from a Dataverse catalog"
)]
#[command(after_help = "Examples:
  boreal migrate
  boreal import fleuve-saint-laurent
  boreal datasets --catalogue grands-lacs --ordering name
  boreal datasets --date-debut 2020-01-01 --format json > datasets.json
  boreal stats")]
pub struct Config {
    /// PostgreSQL database connection URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch datasets from the remote catalog and store them
    #[command(after_help = "Examples:
  boreal import                        # Import with the default query
  boreal import arctique --per-page 50
  boreal import --catalog-url https://demo.dataverse.org/api/search")]
    Import {
        /// Search query sent to the catalog
        #[arg(value_name = "QUERY", default_value = DEFAULT_QUERY)]
        query: String,

        /// Maximum number of records requested
        #[arg(long, default_value = "300")]
        per_page: usize,

        /// Dataverse search endpoint
        #[arg(long, env = "BOREAL_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
        catalog_url: String,

        /// Output format for the import report
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
    /// List stored datasets matching facet filters
    #[command(after_help = "Examples:
  boreal datasets --catalogue fleuve-saint-laurent
  boreal datasets --thematique climat --producteur \"Fisheries and Oceans\"
  boreal datasets --search \"sea ice\" --ordering -name")]
    Datasets {
        #[command(flatten)]
        facets: FacetArgs,

        /// Custom path to facets.toml
        #[arg(long, env = "BOREAL_FACETS_CONFIG", value_name = "PATH")]
        facets_config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show one dataset with its contacts and publications
    Show {
        /// Dataset UUID
        id: Uuid,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
    /// Create a single dataset, rejecting duplicate names
    Create {
        /// Dataset name
        #[arg(long)]
        name: String,
        /// Upstream identifier (default: UNKNOWN)
        #[arg(long)]
        identifier: Option<String>,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated keywords
        #[arg(long)]
        keywords: Option<String>,
        /// Comma-separated subjects
        #[arg(long)]
        subjects: Option<String>,
        /// Comma-separated authors
        #[arg(long)]
        authors: Option<String>,
    },
    /// Delete a dataset and its contacts, publications and dates
    Delete {
        /// Dataset UUID
        id: Uuid,
    },
    /// Show row counts
    Stats,
    /// List configured harvest schedules
    Configs,
    /// Create or update the database schema
    Migrate,
}

/// Facet filters; every flag is optional and they combine with AND.
#[derive(Args, Debug, Clone, Default)]
pub struct FacetArgs {
    /// Comma-separated terms, any of which may match keywords, name or description
    #[arg(long)]
    pub mots_cles: Option<String>,
    /// Alias of --mots-cles, ignored when --mots-cles is set
    #[arg(long)]
    pub keywords: Option<String>,
    /// Comma-separated terms, any of which may match authors
    #[arg(long)]
    pub organisations: Option<String>,
    /// Comma-separated terms, any of which may match subjects
    #[arg(long)]
    pub localisations: Option<String>,
    /// Catalogue slug (e.g. fleuve-saint-laurent); synonyms match subjects, keywords or description
    #[arg(long)]
    pub catalogue: Option<String>,
    /// Theme slug (e.g. climat); synonyms match subjects, keywords or description
    #[arg(long)]
    pub thematique: Option<String>,
    /// Producer name, matched whole (not split on commas) against authors
    #[arg(long)]
    pub producteur: Option<String>,
    /// Earliest publication date, YYYY-MM-DD
    #[arg(long)]
    pub date_debut: Option<String>,
    /// Latest publication date, YYYY-MM-DD
    #[arg(long)]
    pub date_fin: Option<String>,
    /// Terms split on whitespace and commas; each must match name, authors, keywords, subjects or description
    #[arg(long)]
    pub search: Option<String>,
    /// Sort key: name, -name, identifier, -identifier
    #[arg(long)]
    pub ordering: Option<String>,
}

impl From<FacetArgs> for FacetQuery {
    fn from(a: FacetArgs) -> Self {
        Self {
            mots_cles: a.mots_cles,
            keywords: a.keywords,
            organisations: a.organisations,
            localisations: a.localisations,
            catalogue: a.catalogue,
            thematique: a.thematique,
            producteur: a.producteur,
            date_debut: a.date_debut,
            date_fin: a.date_fin,
            search: a.search,
            ordering: a.ordering,
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Text,
    /// Pretty-printed JSON
    Json,
}
