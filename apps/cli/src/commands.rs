//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use pressmill_core::pipeline::{self, PipelineReport, ProgressReporter};
use pressmill_shared::{
    AppConfig, InputFile, OutputKind, Params, init_config, load_config,
};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pressmill — turn harvested press exports into analysis-ready corpora.
#[derive(Parser)]
#[command(
    name = "pressmill",
    version,
    about = "Normalize harvested press-export files and render analysis-ready corpus artifacts.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

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
    /// Convert export files into the requested output kinds.
    Convert {
        /// Export files to ingest.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output kind to render (repeatable). Defaults to the config value.
        #[arg(short, long = "output")]
        outputs: Vec<String>,

        /// Directory the final artifact is written to.
        #[arg(short = 'd', long)]
        out: Option<PathBuf>,

        /// Drop records with an empty keyword set before aggregating.
        #[arg(long)]
        filter_keywords: bool,

        /// Drop records without a recognized language code.
        #[arg(long)]
        filter_lang: bool,

        /// Overall minimum-support threshold.
        #[arg(long)]
        min_support: Option<u32>,

        /// Keyword-specific threshold (defaults to --min-support).
        #[arg(long)]
        min_support_keywords: Option<u32>,

        /// Journal-specific threshold (defaults to --min-support).
        #[arg(long)]
        min_support_journals: Option<u32>,

        /// Author-specific threshold (defaults to --min-support).
        #[arg(long)]
        min_support_authors: Option<u32>,

        /// Date-bucket threshold (defaults to --min-support).
        #[arg(long)]
        min_support_dates: Option<u32>,
    },

    /// List the supported output kinds.
    Outputs,

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
        0 => "pressmill=info",
        1 => "pressmill=debug",
        _ => "pressmill=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Convert {
            files,
            outputs,
            out,
            filter_keywords,
            filter_lang,
            min_support,
            min_support_keywords,
            min_support_journals,
            min_support_authors,
            min_support_dates,
        } => {
            let overrides = ParamOverrides {
                filter_keywords,
                filter_lang,
                min_support,
                min_support_keywords,
                min_support_journals,
                min_support_authors,
                min_support_dates,
            };
            cmd_convert(&files, &outputs, out.as_deref(), &overrides).await
        }
        Command::Outputs => cmd_outputs(),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Flag-level parameter overrides applied on top of the config file.
struct ParamOverrides {
    filter_keywords: bool,
    filter_lang: bool,
    min_support: Option<u32>,
    min_support_keywords: Option<u32>,
    min_support_journals: Option<u32>,
    min_support_authors: Option<u32>,
    min_support_dates: Option<u32>,
}

impl ParamOverrides {
    /// Merge: CLI flags override config values, which override defaults.
    fn apply(&self, mut params: Params) -> Params {
        if self.filter_keywords {
            params.filter_keywords = true;
        }
        if self.filter_lang {
            params.filter_lang = true;
        }
        if let Some(v) = self.min_support {
            params.minimal_support = v;
        }
        if let Some(v) = self.min_support_keywords {
            params.minimal_support_keywords = Some(v);
        }
        if let Some(v) = self.min_support_journals {
            params.minimal_support_journals = Some(v);
        }
        if let Some(v) = self.min_support_authors {
            params.minimal_support_authors = Some(v);
        }
        if let Some(v) = self.min_support_dates {
            params.minimal_support_dates = Some(v);
        }
        params
    }
}

// ---------------------------------------------------------------------------
// convert
// ---------------------------------------------------------------------------

async fn cmd_convert(
    files: &[PathBuf],
    outputs: &[String],
    out: Option<&std::path::Path>,
    overrides: &ParamOverrides,
) -> Result<()> {
    let config = load_config()?;

    // Resolve output kinds: flags win over the config defaults.
    let requested: &[String] = if outputs.is_empty() {
        &config.defaults.outputs
    } else {
        outputs
    };
    let kinds: Vec<OutputKind> = requested
        .iter()
        .map(|s| s.parse())
        .collect::<pressmill_shared::Result<_>>()?;

    let params = overrides.apply(config.params.clone());

    // Read inputs up front; a non-UTF-8 file is a request error, not a run error.
    let mut inputs = Vec::with_capacity(files.len());
    for path in files {
        let bytes = std::fs::read(path)
            .map_err(|e| eyre!("cannot read '{}': {e}", path.display()))?;
        let content = String::from_utf8(bytes)
            .map_err(|_| eyre!("'{}' is not valid UTF-8 text", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        inputs.push(InputFile { name, content });
    }

    info!(
        files = inputs.len(),
        outputs = kinds.len(),
        "starting conversion"
    );

    let reporter = CliProgress::new();
    let report = pipeline::run(inputs, &kinds, &params, &reporter).await?;

    // Write the final artifact.
    let out_dir: PathBuf = out
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.defaults.output_dir));
    std::fs::create_dir_all(&out_dir)
        .map_err(|e| eyre!("cannot create output directory '{}': {e}", out_dir.display()))?;

    let artifact_path = out_dir.join(&report.artifact.filename);
    std::fs::write(&artifact_path, &report.artifact.bytes)
        .map_err(|e| eyre!("cannot write '{}': {e}", artifact_path.display()))?;

    print_summary(&report, &artifact_path);

    // Severity policy: a run where every requested output failed is an error;
    // anything partial is delivered as-is with the failures listed.
    if !kinds.is_empty() && report.render_failures.len() == kinds.len() {
        return Err(eyre!("every requested output failed"));
    }
    if !report.parse_failures.is_empty() && report.articles_found == 0 {
        warn!("no input file could be normalized");
    }

    Ok(())
}

fn print_summary(report: &PipelineReport, artifact_path: &std::path::Path) {
    println!();
    println!("  Conversion complete!");
    println!("  Run:      {}", report.run_id);
    println!(
        "  Files:    {} ({} failed)",
        report.files_in,
        report.parse_failures.len()
    );
    println!(
        "  Articles: {} found, {} unique",
        report.articles_found, report.articles_unique
    );
    println!(
        "  Artifact: {} ({} bytes, {})",
        artifact_path.display(),
        report.artifact.bytes.len(),
        report.artifact.format.media_type()
    );
    println!("  Time:     {:.1}s", report.elapsed.as_secs_f64());

    if !report.artifact.members.is_empty() {
        println!();
        for member in &report.artifact.members {
            println!(
                "    {}  {}  {} bytes",
                &member.sha256[..12],
                member.name,
                member.size_bytes
            );
        }
    }

    if !report.parse_failures.is_empty() {
        println!();
        println!("  Failed files:");
        for failure in &report.parse_failures {
            println!("    {}: {}", failure.file, failure.error);
        }
    }

    if !report.render_failures.is_empty() {
        println!();
        println!("  Failed outputs:");
        for failure in &report.render_failures {
            println!("    {}: {}", failure.kind, failure.error);
        }
    }

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
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_normalized(&self, file: &str, articles: usize, current: usize, total: usize) {
        self.spinner.set_message(format!(
            "Normalizing [{current}/{total}] {file} ({articles} articles)"
        ));
    }

    fn done(&self, _report: &PipelineReport) {
        self.spinner.finish_and_clear();
    }
}

// ---------------------------------------------------------------------------
// outputs / config
// ---------------------------------------------------------------------------

fn cmd_outputs() -> Result<()> {
    println!();
    for kind in OutputKind::ALL {
        let family = if !kind.implemented() {
            "(unimplemented)"
        } else if kind.stats_dependent() {
            "statistics"
        } else {
            "direct"
        };
        println!("  {:<18} {family}", kind.as_str());
    }
    println!();
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
