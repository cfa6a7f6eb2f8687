use anyhow::{Context, Result};
use arxiv_search::config::{find_config_file, get_config, load_config, Config};
use arxiv_search::models::{
    categories, resolve_category, FilterCriteria, FilterField, SearchOutcome, SearchResult,
    SortBy, SortOrder,
};
use arxiv_search::query::split_terms;
use arxiv_search::sources::{ArxivSource, SourceError};
use arxiv_search::ui::{self, Spinner, Status};
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// arXiv Search - find preprints by title, abstract, author, category and date
#[derive(Parser, Debug)]
#[command(name = "arxiv-search")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search arXiv by field-scoped include/exclude terms, category and date range", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (plain if TTY, JSON otherwise)
    Auto,
    /// Table format (compact overview)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format with abstracts
    Plain,
}

/// Sort field for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortField {
    /// Sort by relevance
    Relevance,
    /// Sort by last update date
    LastUpdatedDate,
    /// Sort by submission date
    SubmittedDate,
}

impl From<SortField> for SortBy {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Relevance => SortBy::Relevance,
            SortField::LastUpdatedDate => SortBy::LastUpdatedDate,
            SortField::SubmittedDate => SortBy::SubmittedDate,
        }
    }
}

/// Sort order
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Order {
    /// Ascending order
    Asc,
    /// Descending order
    Desc,
}

impl From<Order> for SortOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => SortOrder::Ascending,
            Order::Desc => SortOrder::Descending,
        }
    }
}

/// Filters shared by `search` and `query`
#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Title includes (comma-separated)
    #[arg(long, short)]
    title: Option<String>,

    /// Abstract includes (comma-separated)
    #[arg(long = "abstract")]
    abstract_terms: Option<String>,

    /// Author includes (comma-separated)
    #[arg(long, short)]
    author: Option<String>,

    /// Title excludes (comma-separated)
    #[arg(long)]
    exclude_title: Option<String>,

    /// Abstract excludes (comma-separated)
    #[arg(long)]
    exclude_abstract: Option<String>,

    /// Author excludes (comma-separated)
    #[arg(long)]
    exclude_author: Option<String>,

    /// Subject category by name or code (repeatable, e.g. "Machine Learning" or cs.AI)
    #[arg(long, short)]
    category: Vec<String>,

    /// Earliest submission date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Latest submission date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Sort by field (default from config: submittedDate)
    #[arg(long, value_enum)]
    sort_by: Option<SortField>,

    /// Sort order (default from config: descending)
    #[arg(long, value_enum)]
    order: Option<Order>,
}

impl FilterArgs {
    /// Turn the form fields into filter criteria, resolving category names
    fn to_criteria(&self, config: &Config) -> Result<FilterCriteria> {
        let terms = |value: &Option<String>| value.as_deref().map(split_terms).unwrap_or_default();

        let codes = self
            .category
            .iter()
            .map(|name| resolve_category(name))
            .collect::<Result<Vec<_>, _>>()
            .context("run `arxiv-search categories` for the list")?;

        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                tracing::warn!(%from, %to, "Start date is after end date; arXiv will match nothing");
            }
        }

        Ok(FilterCriteria::new()
            .include_terms(FilterField::Title, terms(&self.title))
            .include_terms(FilterField::Abstract, terms(&self.abstract_terms))
            .include_terms(FilterField::Author, terms(&self.author))
            .include_terms(FilterField::Category, codes)
            .exclude_terms(FilterField::Title, terms(&self.exclude_title))
            .exclude_terms(FilterField::Abstract, terms(&self.exclude_abstract))
            .exclude_terms(FilterField::Author, terms(&self.exclude_author))
            .start_date(self.from)
            .end_date(self.to)
            .sort_by(self.sort_by.map(Into::into).unwrap_or(config.arxiv.sort_by))
            .sort_order(self.order.map(Into::into).unwrap_or(config.arxiv.sort_order)))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search arXiv and show matching papers
    #[command(alias = "s")]
    Search {
        #[command(flatten)]
        filters: FilterArgs,

        /// Number of entries to fetch from arXiv (default from config: 1000)
        #[arg(long, short)]
        max_results: Option<usize>,

        /// Number of results to display
        #[arg(long, short, value_parser = clap::value_parser!(u16).range(1..=100))]
        display: Option<u16>,
    },

    /// Print the arXiv query built from the filters without searching
    #[command(alias = "q")]
    Query {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List the subject categories available as filters
    Categories,

    /// Print the effective configuration as TOML
    Config,

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing(cli: &Cli, config: &Config) {
    let log_level = match cli.verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("arxiv_search={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(path) = &cli.config {
        load_config(path).with_context(|| format!("Failed to load {}", path.display()))?
    } else if let Some(path) = find_config_file() {
        load_config(&path).with_context(|| format!("Failed to load {}", path.display()))?
    } else {
        get_config()?
    };

    if let Some(timeout) = cli.timeout {
        config.arxiv.timeout_secs = timeout;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_tracing(&cli, &config);

    match &cli.command {
        Commands::Search {
            filters,
            max_results,
            display,
        } => {
            let criteria = filters.to_criteria(&config)?;
            let query = criteria.build_query();
            let params = criteria.fetch_params(max_results.unwrap_or(config.arxiv.max_results));
            let display = display.map(usize::from).unwrap_or(config.display.results);

            tracing::info!(query = %query.decoded(), "Searching arXiv");

            let source = ArxivSource::from_config(&config.arxiv)?;
            let format = resolve_format(cli.output);
            let spinner = if format == OutputFormat::Json || cli.quiet || !ui::is_terminal() {
                Spinner::hidden()
            } else {
                Spinner::new("Searching arXiv...")
            };

            let started = Instant::now();
            let result = match source.fetch(&query, &params).await {
                Ok(result) => result,
                Err(e) => {
                    spinner.finish_with_error("Request to arXiv failed");
                    return Err(e.into());
                }
            };
            spinner.clear();

            output_result(&result, display, format, started.elapsed());
        }

        Commands::Query { filters } => {
            let query = filters.to_criteria(&config)?.build_query();

            if resolve_format(cli.output) == OutputFormat::Json {
                let value = serde_json::json!({
                    "encoded": query.as_str(),
                    "decoded": query.decoded(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else if query.is_empty() {
                ui::print_status(Status::Warning, "No filters given; the query is empty");
            } else {
                println!("{}", query.decoded());
                println!("{}", query);
            }
        }

        Commands::Categories => match resolve_format(cli.output) {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(categories())?),
            _ => {
                use comfy_table::{Attribute, Cell, Table};
                let mut table = Table::new();
                table.load_preset(comfy_table::presets::UTF8_FULL);
                table.set_header(vec!["Field", "Code"]);
                for category in categories() {
                    table.add_row(vec![
                        Cell::new(category.name),
                        Cell::new(category.code).add_attribute(Attribute::Bold),
                    ]);
                }
                println!("{table}");
            }
        },

        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }

        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(*shell, &mut command, "arxiv-search", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Auto {
        if ui::is_terminal() {
            OutputFormat::Plain
        } else {
            OutputFormat::Json
        }
    } else {
        format
    }
}

fn output_result(
    result: &SearchResult,
    display: usize,
    format: OutputFormat,
    elapsed: std::time::Duration,
) {
    if format == OutputFormat::Json {
        match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{}", json),
            Err(e) => ui::print_status(Status::Error, &format!("Failed to encode results: {}", e)),
        }
        return;
    }

    match result.outcome() {
        SearchOutcome::Malformed(diagnostic) => {
            ui::print_status(Status::Error, diagnostic);
            return;
        }
        SearchOutcome::NoResults => {
            ui::print_search_header(result.total_matches, None, elapsed);
            ui::print_status(Status::Warning, "No papers found for these filters.");
            return;
        }
        SearchOutcome::Found => {}
    }

    ui::print_search_header(result.total_matches, result.published_range(), elapsed);
    let papers = result.top(display);

    match format {
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let width = ui::terminal_width();
            let title_width = (width / 2).max(30);
            let author_width = (width / 4).max(20);

            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["#", "Title", "Authors", "Published", "Link"]);

            for (idx, paper) in papers.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(idx + 1),
                    Cell::new(ui::truncate_with_ellipsis(&paper.title, title_width))
                        .add_attribute(Attribute::Bold),
                    Cell::new(ui::truncate_with_ellipsis(&paper.authors, author_width)),
                    Cell::new(paper.published_display()),
                    Cell::new(&paper.link),
                ]);
            }
            println!("{table}");
        }
        _ => {
            ui::print_section(&format!("Showing {} of {}", papers.len(), result.papers.len()));
            for (idx, paper) in papers.iter().enumerate() {
                ui::print_paper(idx + 1, paper);
            }
        }
    }
}
