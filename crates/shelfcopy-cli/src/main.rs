use anyhow::Result;
use clap::{Parser, Subcommand};
use shelfcopy::SettingsStore;
use shelfcopy_cli::cli::output::{JSON_ENV, NO_COLOR_ENV, QUIET_ENV};
use shelfcopy_cli::cli::settings_cmd::SettingsAction;
use shelfcopy_cli::cli::{copy_cmd, links_cmd, settings_cmd};
use shelfcopy_cli::config::{Config, GOODREADS_ORIGIN};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "shelfcopy",
    about = "Copy book details from catalog pages as one spreadsheet row",
    version
)]
struct Cli {
    /// Machine-readable JSON output.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress status messages.
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Debug logging on stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    /// Data directory (default: $SHELFCOPY_HOME or ~/.shelfcopy).
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a saved Goodreads book page into one row on stdout.
    Copy {
        /// Saved HTML page, or `-` for stdin.
        page: PathBuf,
        /// URL the page was saved from.
        #[arg(long)]
        url: String,
    },
    /// Manage the row layout for a site.
    Settings {
        /// Site whose settings to manage.
        #[arg(long, default_value = GOODREADS_ORIGIN)]
        site: String,
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Goodreads search URL for a saved Storygraph book page.
    Storygraph { page: PathBuf },
    /// Radarr search URL for a saved Letterboxd film page.
    Letterboxd { page: PathBuf },
    /// Show or set the Radarr base URL.
    RadarrUrl { url: Option<String> },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("shelfcopy: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.json {
        std::env::set_var(JSON_ENV, "1");
    }
    if cli.quiet {
        std::env::set_var(QUIET_ENV, "1");
    }
    if cli.no_color {
        std::env::set_var(NO_COLOR_ENV, "1");
    }
    init_tracing(cli.verbose)?;

    let config = Config::resolve(cli.home);

    match cli.command {
        Commands::Copy { page, url } => copy_cmd::run(&config, &page, &url),
        Commands::Settings { site, action } => {
            let mut store = SettingsStore::open(config.store_for_url(&site)?);
            settings_cmd::run(&mut store, action)
        }
        Commands::Storygraph { page } => links_cmd::run_storygraph(&page),
        Commands::Letterboxd { page } => links_cmd::run_letterboxd(&config, &page),
        Commands::RadarrUrl { url } => links_cmd::run_radarr_url(&config, url.as_deref()),
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::from_default_env().add_directive(format!("shelfcopy={level}").parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}
