use anyhow::{Context, Result};
use brackets_tv::app::App;
use brackets_tv::catalog::{category_by_slug, CatalogClient, CATEGORIES};
use brackets_tv::config::Config;
use brackets_tv::orchestrator::{FetchEvent, Orchestrator};
use brackets_tv::ui;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Get the config directory path (~/.config/brackets-tv/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    let config_dir = PathBuf::from(home).join(".config").join("brackets-tv");
    Ok(config_dir)
}

/// SEC-007: Restrict the config directory to the current user (Unix only).
#[cfg(unix)]
fn restrict_permissions(dir: &Path) {
    use std::os::unix::fs::PermissionsExt;
    match std::fs::metadata(dir) {
        Ok(metadata) => {
            let mut perms = metadata.permissions();
            perms.set_mode(0o700);
            if let Err(e) = std::fs::set_permissions(dir, perms) {
                tracing::warn!(
                    path = %dir.display(),
                    error = %e,
                    "Failed to set config directory permissions to 0700"
                );
            }
        }
        Err(e) => {
            tracing::warn!(
                path = %dir.display(),
                error = %e,
                "Failed to read config directory metadata"
            );
        }
    }
}

#[cfg(not(unix))]
fn restrict_permissions(_dir: &Path) {}

#[derive(Parser, Debug)]
#[command(
    name = "brackets-tv",
    about = "Browse curated interview-prep videos from the terminal"
)]
struct Args {
    /// Base URL of the catalog service (overrides config)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Category to open at startup (overrides config)
    #[arg(long, value_name = "SLUG")]
    category: Option<String>,

    /// Config file (default: ~/.config/brackets-tv/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Probe the catalog service health endpoint and exit
    #[arg(long)]
    check: bool,

    /// Write logs to this file (the TUI owns the terminal)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Route tracing output: to `log_file` when given, else stderr for
/// non-interactive runs. The TUI without a log file stays silent.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None if !interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

/// Load the config file, falling back to the per-user default location.
fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let config_dir = get_config_dir()?;
            if !config_dir.exists() {
                std::fs::create_dir_all(&config_dir)
                    .context("Failed to create config directory")?;
            }
            restrict_permissions(&config_dir);
            config_dir.join("config.toml")
        }
    };

    Config::load(&path).with_context(|| format!("Failed to load config '{}'", path.display()))
}

/// Probe `/health` and print the report. Returns whether the service is healthy.
async fn run_check(client: &CatalogClient) -> Result<bool> {
    println!("Checking {} ...", client.base_url());
    match client.health().await {
        Ok(report) => {
            println!("status:   {}", report.status);
            if !report.message.is_empty() {
                println!("message:  {}", report.message);
            }
            println!(
                "database: {}",
                if report.database_connected {
                    "connected"
                } else {
                    "disconnected"
                }
            );
            Ok(report.is_healthy())
        }
        Err(e) => {
            println!("unreachable: {}", e);
            Ok(false)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref(), !args.check)?;

    let mut config = load_config(args.config.as_deref())?;

    // CLI flags override the file
    if let Some(url) = args.api_url {
        config.api_base_url = url;
    }
    if let Some(secs) = args.timeout {
        config.request_timeout_secs = secs;
    }
    if let Some(slug) = args.category {
        if category_by_slug(&slug).is_none() {
            let known: Vec<&str> = CATEGORIES.iter().map(|c| c.slug).collect();
            anyhow::bail!("Unknown category '{}' (expected one of: {})", slug, known.join(", "));
        }
        config.default_category = slug;
    }

    let timeout: Duration = config.request_timeout();
    let client = CatalogClient::new(&config.api_base_url, timeout)
        .with_context(|| format!("Invalid catalog URL '{}'", config.api_base_url))?;

    if args.check {
        let healthy = run_check(&client).await?;
        if !healthy {
            std::process::exit(1);
        }
        return Ok(());
    }

    let start = config.start_category();
    tracing::info!(
        api = %client.base_url(),
        category = start.slug,
        timeout_secs = timeout.as_secs(),
        "Starting"
    );

    // Create event channel for fetch tasks
    let (event_tx, event_rx) = mpsc::channel::<FetchEvent>(32);

    let mut orchestrator = Orchestrator::new(client, start, event_tx);
    orchestrator.start();

    let mut app = App::new(orchestrator);
    for warning in app.apply_config(&config) {
        app.set_status(warning);
    }

    ui::run(&mut app, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
