use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use configuration::{ConfigArgs, Defaults, LoggingSettings, Settings, StorageBackend, StorageSettings};
use core_types::{FieldValue, JobId, JobInput, ProfitabilityStatus};
use database::{connect, run_migrations, InMemoryRepository, JobRepository, SqliteRepository};
use export::{ExportFormat, NumberFormat, export_jobs, export_to_path, render_job_report, render_metrics};
use history::{HistoryError, JobHistory, JobQuery, SortDirection, SortKey};
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod tables;

/// The main entry point for the jobmargin application.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // A .env file is optional; configuration may come from the real environment.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = cli.config.load().context("Failed to load configuration")?;
    let _log_guard = init_tracing(&settings.logging)?;
    tracing::debug!(backend = ?settings.storage.backend, "Configuration loaded.");

    // Live previews never touch storage.
    if let Commands::Calc(args) = &cli.command {
        return Ok(handle_calc(args, &settings));
    }

    let repo = open_repository(&settings.storage).await?;
    let history = JobHistory::new(repo);

    // Execute the appropriate command
    match cli.command {
        Commands::Calc(_) => Ok(ExitCode::SUCCESS),
        Commands::Add(args) => handle_add(&history, args, &settings).await,
        Commands::List(args) => handle_list(&history, args, &settings).await,
        Commands::Show { id } => handle_show(&history, id, &settings).await,
        Commands::Delete { id } => {
            history
                .delete(id)
                .await
                .with_context(|| format!("Failed to delete job {}", id))?;
            println!("Deleted job #{}.", id);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Clear { yes } => handle_clear(&history, yes).await,
        Commands::Export(args) => handle_export(&history, args, &settings).await,
        Commands::Summary(args) => handle_summary(&history, args, &settings).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Job profitability calculator: margins, markups, required pricing and a
/// saved job history.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview the metrics for a job without saving it.
    Calc(JobArgs),
    /// Validate, calculate and save a job.
    Add(JobArgs),
    /// List saved jobs.
    List(FilterArgs),
    /// Print the full report for one saved job.
    Show {
        /// The job id shown by `list`.
        id: JobId,
    },
    /// Delete one saved job.
    Delete { id: JobId },
    /// Delete every saved job.
    Clear {
        /// Confirm the deletion.
        #[arg(long)]
        yes: bool,
    },
    /// Export saved jobs to CSV or JSON.
    Export(ExportArgs),
    /// Status breakdown, totals and the net margin trend.
    Summary(SummaryArgs),
}

/// The job form. Every numeric field is taken as typed; validation decides
/// whether it is usable.
#[derive(Args)]
struct JobArgs {
    /// Job name.
    #[arg(long, default_value = "")]
    name: String,

    /// Insurance carrier, if any.
    #[arg(long)]
    carrier: Option<String>,

    /// Retail price charged to the customer.
    #[arg(long, allow_hyphen_values = true)]
    retail: Option<String>,

    /// Direct cost of the job.
    #[arg(long, allow_hyphen_values = true)]
    cost: Option<String>,

    /// Division overhead, percent of retail.
    #[arg(long, allow_hyphen_values = true)]
    division_overhead: Option<String>,

    /// Company overhead, percent of retail.
    #[arg(long, allow_hyphen_values = true)]
    company_overhead: Option<String>,

    /// Royalty, percent of retail.
    #[arg(long, allow_hyphen_values = true)]
    royalty: Option<String>,

    /// Target net profit, percent of retail. Defaults to the configured target.
    #[arg(long, allow_hyphen_values = true)]
    target: Option<String>,
}

impl JobArgs {
    /// Builds the raw form, falling back to configured defaults for omitted flags.
    fn to_input(&self, defaults: &Defaults) -> JobInput {
        fn field(raw: &Option<String>, default: Option<Decimal>) -> FieldValue {
            match raw {
                Some(raw) => FieldValue::parse(raw),
                None => FieldValue::from(default),
            }
        }

        JobInput {
            job_name: self.name.clone(),
            carrier: self.carrier.clone(),
            retail_price: field(&self.retail, None),
            job_cost: field(&self.cost, None),
            division_overhead_pct: field(&self.division_overhead, defaults.division_overhead_pct),
            company_overhead_pct: field(&self.company_overhead, defaults.company_overhead_pct),
            royalty_pct: field(&self.royalty, defaults.royalty_pct),
            target_net_profit_pct: field(&self.target, Some(defaults.target_net_profit_pct)),
        }
    }
}

#[derive(Args)]
struct FilterArgs {
    /// Only jobs with this status (jackpot, warning, thin, no-bueno, neutral).
    #[arg(long)]
    status: Option<ProfitabilityStatus>,

    /// Only jobs whose name or carrier contains this text.
    #[arg(long)]
    search: Option<String>,

    /// Sort by: created, name, retail, cost, gross-margin, net-margin, net-profit, shortfall, status.
    #[arg(long, default_value = "created")]
    sort: SortKey,

    /// Sort ascending.
    #[arg(long, conflicts_with = "desc")]
    asc: bool,

    /// Sort descending (the default).
    #[arg(long)]
    desc: bool,
}

impl FilterArgs {
    fn to_query(&self) -> JobQuery {
        let direction = if self.asc && !self.desc {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        };
        JobQuery {
            status: self.status,
            search: self.search.clone(),
            sort: self.sort,
            direction,
        }
    }
}

#[derive(Args)]
struct ExportArgs {
    /// csv or json.
    #[arg(long, default_value = "csv")]
    format: ExportFormat,

    /// File to write. Prints to stdout when omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[command(flatten)]
    filter: FilterArgs,
}

#[derive(Args)]
struct SummaryArgs {
    /// Print the chart data as JSON instead of tables.
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    filter: FilterArgs,
}

// ==============================================================================
// Startup
// ==============================================================================

/// Installs the global subscriber: stderr always, plus a daily log file when a
/// log directory is configured. The returned guard must live until exit.
fn init_tracing(logging: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("Invalid logging.level '{}'", logging.level))?,
    };
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match &logging.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, "jobmargin.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()
                .context("Failed to initialize logging")?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .try_init()
                .context("Failed to initialize logging")?;
            Ok(None)
        }
    }
}

async fn open_repository(storage: &StorageSettings) -> Result<Box<dyn JobRepository>> {
    match storage.backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; saved jobs are discarded on exit.");
            Ok(Box::new(InMemoryRepository::new()))
        }
        StorageBackend::Sqlite => {
            let pool = connect(&storage.database_url)
                .await
                .with_context(|| format!("Failed to open database '{}'", storage.database_url))?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            Ok(Box::new(SqliteRepository::new(pool)))
        }
    }
}

fn number_format(settings: &Settings) -> NumberFormat {
    NumberFormat::new(
        settings.display.decimal_places,
        settings.display.currency_symbol.clone(),
    )
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_calc(args: &JobArgs, settings: &Settings) -> ExitCode {
    let preview = history::preview(&args.to_input(&settings.defaults));

    print!("{}", render_metrics(&preview.metrics, &number_format(settings)));
    for (field, message) in preview.errors.iter() {
        eprintln!("warning: {}: {}", field.label(), message);
    }
    ExitCode::SUCCESS
}

async fn handle_add(history: &JobHistory, args: JobArgs, settings: &Settings) -> Result<ExitCode> {
    let input = args.to_input(&settings.defaults);
    match history.submit(&input).await {
        Ok(job) => {
            println!("Saved job #{}.\n", job.id);
            print!("{}", render_job_report(&job, &number_format(settings)));
            Ok(ExitCode::SUCCESS)
        }
        Err(HistoryError::Invalid(errors)) => {
            eprintln!("The job was not saved:");
            for (field, message) in errors.iter() {
                eprintln!("  {}: {}", field.label(), message);
            }
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).context("Failed to save job"),
    }
}

async fn handle_list(history: &JobHistory, args: FilterArgs, settings: &Settings) -> Result<ExitCode> {
    let jobs = history
        .list(&args.to_query())
        .await
        .context("Failed to load jobs")?;

    if jobs.is_empty() {
        println!("No saved jobs.");
    } else {
        println!("{}", tables::jobs_table(&jobs, &number_format(settings)));
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_show(history: &JobHistory, id: JobId, settings: &Settings) -> Result<ExitCode> {
    let job = history
        .get(id)
        .await
        .with_context(|| format!("Failed to load job {}", id))?;
    print!("{}", render_job_report(&job, &number_format(settings)));
    Ok(ExitCode::SUCCESS)
}

async fn handle_clear(history: &JobHistory, yes: bool) -> Result<ExitCode> {
    if !yes {
        let count = history.list(&JobQuery::new()).await?.len();
        eprintln!(
            "This deletes all {} saved job(s). Run again with --yes to confirm.",
            count
        );
        return Ok(ExitCode::FAILURE);
    }

    let removed = history.clear().await.context("Failed to clear job history")?;
    println!("Deleted {} job(s).", removed);
    Ok(ExitCode::SUCCESS)
}

async fn handle_export(history: &JobHistory, args: ExportArgs, settings: &Settings) -> Result<ExitCode> {
    let jobs = history
        .list(&args.filter.to_query())
        .await
        .context("Failed to load jobs")?;
    let fmt = number_format(settings);

    match &args.output {
        Some(path) => {
            export_to_path(&jobs, args.format, &fmt, path)
                .with_context(|| format!("Failed to export to {}", path.display()))?;
            eprintln!("Exported {} job(s) to {}.", jobs.len(), path.display());
        }
        None => {
            export_jobs(&jobs, args.format, &fmt, std::io::stdout().lock())
                .context("Failed to write export")?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_summary(history: &JobHistory, args: SummaryArgs, settings: &Settings) -> Result<ExitCode> {
    let summary = history
        .summary(&args.filter.to_query())
        .await
        .context("Failed to load jobs")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(ExitCode::SUCCESS);
    }

    let fmt = number_format(settings);

    println!("{}", tables::status_table(&summary, &fmt));
    println!("Jobs:               {}", summary.total_jobs);
    println!("Total retail:       {}", fmt.currency(summary.total_retail_dollars));
    println!("Total gross profit: {}", fmt.currency(summary.total_gross_profit_dollars));
    println!("Total net profit:   {}", fmt.currency(summary.total_net_profit_dollars));
    println!("Total shortfall:    {}", fmt.currency(summary.total_shortfall_dollars));
    println!(
        "Overall net margin: {}",
        summary.overall_net_margin_pct.map(|pct| fmt.percent(pct)).unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Average net margin: {}",
        summary.average_net_margin_pct.map(|pct| fmt.percent(pct)).unwrap_or_else(|| "-".to_string())
    );

    if !summary.net_margin_series.is_empty() {
        println!("\nNet margin trend");
        println!("{}", tables::margin_series_table(&summary, &fmt));
    }
    Ok(ExitCode::SUCCESS)
}
