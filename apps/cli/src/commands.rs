//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use docreview_analyzer::{Analyzer, LlmHandle};
use docreview_core::pipeline::{
    AnalyzeRunConfig, BatchSummary, ExtractRunConfig, ProgressReporter,
};
use docreview_core::store;
use docreview_shared::{
    AnalysisReport, AppConfig, init_config, load_config, load_config_from, resolve_llm_settings,
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// DocReview: editorial review of help-center documentation.
#[derive(Parser)]
#[command(
    name = "docreview",
    version,
    about = "Scrape help-center articles and review them with an LLM.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.docreview/docreview.toml).
    #[arg(long, global = true, env = "DOCREVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Fetch pages and write their article text to the articles file.
    Extract {
        /// Page URLs (defaults to the configured list).
        urls: Vec<String>,

        /// Output file (defaults to the configured articles file).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Review extracted articles with the LLM and write the reports file.
    Analyze {
        /// Articles file (defaults to the configured articles file).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (defaults to the configured reports file).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "docreview=info",
        1 => "docreview=debug",
        _ => "docreview=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Extract { urls, out } => cmd_extract(config_path, urls, out).await,
        Command::Analyze { input, out } => cmd_analyze(config_path, input, out).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path).await,
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

async fn cmd_extract(
    config_path: Option<&Path>,
    urls: Vec<String>,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(config_path)?;

    let urls = if urls.is_empty() {
        config.extract.urls.clone()
    } else {
        urls
    };

    let run_config = ExtractRunConfig {
        urls,
        output: out.unwrap_or_else(|| PathBuf::from(&config.files.extracted)),
        extract: config.extract.clone(),
    };

    info!(
        urls = run_config.urls.len(),
        output = %run_config.output.display(),
        "extracting articles"
    );

    let reporter = CliProgress::new();
    let (summary, _) = docreview_core::pipeline::run_extract(&run_config, &reporter)
        .await
        .wrap_err("extraction run failed")?;

    print_summary("Extraction complete!", &summary, "Extracted:", "Failed:");
    Ok(())
}

async fn cmd_analyze(
    config_path: Option<&Path>,
    input: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(config_path)?;

    // Missing credential is fatal before any batch work.
    let settings = resolve_llm_settings(&config)?;
    let analyzer = Analyzer::new(LlmHandle::connect(settings));

    let run_config = AnalyzeRunConfig {
        input: input.unwrap_or_else(|| PathBuf::from(&config.files.extracted)),
        output: out.unwrap_or_else(|| PathBuf::from(&config.files.reports)),
        fallback_urls: config.extract.urls.clone(),
        extract: config.extract.clone(),
    };

    info!(
        input = %run_config.input.display(),
        output = %run_config.output.display(),
        "analyzing articles"
    );

    let reporter = CliProgress::new();
    let (summary, _) = docreview_core::pipeline::run_analyze(&run_config, &analyzer, &reporter)
        .await
        .wrap_err("analysis run failed")?;

    print_summary("Analysis complete!", &summary, "Analyzed:", "Skipped:");
    Ok(())
}

fn print_summary(title: &str, summary: &BatchSummary, ok_label: &str, failed_label: &str) {
    println!();
    println!("  {title}");
    println!("  {ok_label:<11} {}", summary.succeeded);
    println!("  {failed_label:<11} {}", summary.failed);
    println!("  {:<11} {}", "Output:", summary.output.display());
    println!("  {:<11} {:.1}s", "Time:", summary.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn page_extracted(&self, url: &str, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Extracting [{current}/{total}] {url}"));
    }

    fn page_analyzed(&self, report: &AnalysisReport, current: usize, total: usize) {
        self.spinner
            .set_message(format!("Analyzing [{current}/{total}] {}", report.url));
        match store::to_pretty_json(report) {
            Ok(json) => {
                self.spinner
                    .println(format!("\n--- Analysis Report for {} ---\n{json}", report.url));
            }
            Err(e) => tracing::warn!(url = %report.url, error = %e, "failed to render report"),
        }
    }

    fn done(&self, _summary: &BatchSummary) {
        self.spinner.finish_and_clear();
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
