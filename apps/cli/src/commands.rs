//! CLI command definitions, routing, and tracing setup.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use resumeforge_compiler::LatexCompiler;
use resumeforge_core::pipeline::{
    BuildConfig, BuildResult, ProgressReporter, plan_build, run_build,
};
use resumeforge_shared::{AppConfig, BuildMode, load_config};
use resumeforge_store::ProjectStore;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// ResumeForge — one tailored résumé PDF per project subset.
#[derive(Parser)]
#[command(
    name = "resumeforge",
    version,
    about = "Generate LaTeX résumé variants from project combinations or permutations.",
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
    /// Build every résumé variant in the configured size range.
    Build {
        /// Enumeration mode: combinations or permutations.
        #[arg(short, long)]
        mode: Option<BuildMode>,

        /// PDF file name inside each variant folder.
        #[arg(long, alias = "pdf_name", env = "RESUMEFORGE_PDF_NAME")]
        pdf_name: Option<String>,

        /// Minimum number of projects per variant.
        #[arg(long, alias = "min_projects")]
        min_projects: Option<usize>,

        /// Maximum number of projects per variant.
        #[arg(long, alias = "max_projects")]
        max_projects: Option<usize>,

        /// Directory holding project fragments (*.tex).
        #[arg(long)]
        projects_dir: Option<PathBuf>,

        /// Root directory for variant output folders.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Template file with the %PROJECT_CONTENT% marker.
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Show the variants a build would produce, without compiling.
    Plan {
        /// Enumeration mode: combinations or permutations.
        #[arg(short, long)]
        mode: Option<BuildMode>,

        /// Minimum number of projects per variant.
        #[arg(long, alias = "min_projects")]
        min_projects: Option<usize>,

        /// Maximum number of projects per variant.
        #[arg(long, alias = "max_projects")]
        max_projects: Option<usize>,

        /// Directory holding project fragments (*.tex).
        #[arg(long)]
        projects_dir: Option<PathBuf>,

        /// Template file with the %PROJECT_CONTENT% marker.
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// List the project fragments in the store.
    List {
        /// Directory holding project fragments (*.tex).
        #[arg(long)]
        projects_dir: Option<PathBuf>,
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
        0 => "info",
        1 => "debug",
        _ => "trace",
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
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            mode,
            pdf_name,
            min_projects,
            max_projects,
            projects_dir,
            output_dir,
            template,
        } => cmd_build(
            mode,
            pdf_name,
            min_projects,
            max_projects,
            projects_dir,
            output_dir,
            template,
        ),
        Command::Plan {
            mode,
            min_projects,
            max_projects,
            projects_dir,
            template,
        } => cmd_plan(mode, min_projects, max_projects, projects_dir, template),
        Command::List { projects_dir } => cmd_list(projects_dir),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Config merging
// ---------------------------------------------------------------------------

/// Merge CLI flags over the config file over built-in defaults.
#[allow(clippy::too_many_arguments)]
fn resolve_build_config(
    config: &AppConfig,
    mode: Option<BuildMode>,
    pdf_name: Option<String>,
    min_projects: Option<usize>,
    max_projects: Option<usize>,
    projects_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    template: Option<PathBuf>,
) -> BuildConfig {
    BuildConfig {
        mode: mode.unwrap_or(config.defaults.mode),
        pdf_name: pdf_name.unwrap_or_else(|| config.defaults.pdf_name.clone()),
        min_projects: min_projects.unwrap_or(config.defaults.min_projects),
        max_projects: max_projects.unwrap_or(config.defaults.max_projects),
        projects_dir: projects_dir
            .unwrap_or_else(|| PathBuf::from(&config.defaults.projects_dir)),
        output_root: output_dir.unwrap_or_else(|| PathBuf::from(&config.defaults.output_dir)),
        template_file: template.unwrap_or_else(|| PathBuf::from(&config.template.file)),
        placeholder: config.template.placeholder.clone(),
        separator: config.template.separator.clone(),
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_build(
    mode: Option<BuildMode>,
    pdf_name: Option<String>,
    min_projects: Option<usize>,
    max_projects: Option<usize>,
    projects_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    template: Option<PathBuf>,
) -> Result<()> {
    let config = load_config()?;
    let build_config = resolve_build_config(
        &config,
        mode,
        pdf_name,
        min_projects,
        max_projects,
        projects_dir,
        output_dir,
        template,
    );

    // Fail fast if no LaTeX engine is installed
    let compiler = LatexCompiler::new(config.compiler.clone());
    compiler.check_available()?;

    info!(
        mode = %build_config.mode,
        min = build_config.min_projects,
        max = build_config.max_projects,
        pdf_name = %build_config.pdf_name,
        "starting build"
    );

    let reporter = CliProgress::new();
    let result = run_build(&build_config, &compiler, &reporter)?;

    // Print summary
    println!();
    println!("  Résumé variants built successfully!");
    println!("  Run:      {}", result.run_id);
    println!("  Mode:     {}", result.mode);
    println!("  Projects: {}", result.project_count);
    println!("  Variants: {}", result.variant_count);
    println!("  Output:   {}", result.output_root.display());
    println!("  Time:     {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_plan(
    mode: Option<BuildMode>,
    min_projects: Option<usize>,
    max_projects: Option<usize>,
    projects_dir: Option<PathBuf>,
    template: Option<PathBuf>,
) -> Result<()> {
    let config = load_config()?;
    let build_config = resolve_build_config(
        &config,
        mode,
        None,
        min_projects,
        max_projects,
        projects_dir,
        None,
        template,
    );

    let plan = plan_build(&build_config)?;

    println!(
        "{} variant(s) from {} project(s) in {} mode:",
        plan.folders.len(),
        plan.project_count,
        build_config.mode
    );
    for folder in &plan.folders {
        println!("  {folder}");
    }

    Ok(())
}

fn cmd_list(projects_dir: Option<PathBuf>) -> Result<()> {
    let config = load_config()?;
    let dir = projects_dir.unwrap_or_else(|| PathBuf::from(&config.defaults.projects_dir));

    let store = ProjectStore::scan(&dir)?;

    if store.is_empty() {
        println!(
            "No project fragments found in '{}'. Add .tex files to get started.",
            dir.display()
        );
        return Ok(());
    }

    println!("{} project(s) in '{}':", store.len(), dir.display());
    for name in store.names() {
        println!("  {name}");
    }

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = resumeforge_shared::init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
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

    fn variant_started(&self, folder: &str, current: usize, total: usize) {
        self.spinner.set_message(format!(
            "Compiling [{current}/{total}] {folder}"
        ));
    }

    fn variant_built(&self, folder: &str, current: usize, total: usize) {
        self.spinner.set_message(format!(
            "Built [{current}/{total}] {folder}"
        ));
    }

    fn done(&self, _result: &BuildResult) {
        self.spinner.finish_and_clear();
    }
}
