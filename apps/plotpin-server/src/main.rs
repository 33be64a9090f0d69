use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use db::{ConnectOpts, DbHandle, RetryPolicy};
use plotpin_server::bootstrap;
use runtime::{AppConfig, CliArgs, DatabaseConfig};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// Force SQLx driver registration for Any driver (workaround for SQLx 0.8)
#[allow(unused_imports)]
use sqlx::{postgres::Postgres, sqlite::Sqlite};

#[allow(dead_code)]
fn _ensure_drivers_linked() {
    // Make sure database drivers are linked for sqlx::any
    let _ = std::any::type_name::<Sqlite>();
    let _ = std::any::type_name::<Postgres>();
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path) -> Result<String> {
    if dsn.eq_ignore_ascii_case("sqlite::memory:") || dsn.eq_ignore_ascii_case("sqlite://:memory:")
    {
        return Ok("sqlite::memory:".to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    if let Some(q) = query {
        out.push('?');
        out.push_str(q);
    }
    Ok(out)
}

/// PlotPin Server - shared map-pinned property board
#[derive(Parser)]
#[command(name = "plotpin-server")]
#[command(about = "PlotPin Server - shared map-pinned property board")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database instead of the configured one
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Link SQLx drivers (Any driver quirk in 0.8)
    _ensure_drivers_linked();

    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config
        .logging
        .clone()
        .unwrap_or_else(runtime::default_logging_config);
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("PlotPin Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config),
    }
}

/// Final DSN for this invocation: `--mock` forces in-memory sqlite, relative
/// sqlite paths are resolved under the home dir.
fn resolve_dsn(db_config: Option<&DatabaseConfig>, args: &CliArgs, base_dir: &Path) -> Result<String> {
    if args.mock {
        return Ok("sqlite::memory:".to_string());
    }

    let db_config = db_config.ok_or_else(|| anyhow!("database configuration is required"))?;
    let dsn = db_config.url.trim().to_string();
    if dsn.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    if dsn.starts_with("sqlite://") {
        absolutize_sqlite_dsn(&dsn, base_dir)
    } else {
        Ok(dsn)
    }
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    let base_dir = PathBuf::from(&config.server.home_dir);
    let dsn = resolve_dsn(config.database.as_ref(), &args, &base_dir)?;

    let connect_opts = ConnectOpts {
        max_conns: config.database.as_ref().and_then(|c| c.max_conns),
        acquire_timeout: Some(Duration::from_secs(5)),
        sqlite_busy_timeout: config
            .database
            .as_ref()
            .and_then(|c| c.busy_timeout_ms)
            .map(|ms| Duration::from_millis(ms as u64)),
        create_sqlite_dirs: true,
    };

    tracing::info!(%dsn, "connecting to database");
    // The networked backend may still be booting when we start.
    let db = DbHandle::connect_with_retry(&dsn, connect_opts, RetryPolicy::default()).await?;
    tracing::info!(backend = ?db.engine(), "database connected");

    bootstrap::serve(config, db).await
}

fn check_config(config: AppConfig) -> Result<()> {
    if config.auth.token_secret.is_empty() {
        return Err(anyhow!("auth.token_secret must be configured"));
    }
    if let Some(db_config) = &config.database {
        DbHandle::detect(&db_config.url)?;
    }

    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_dsn_is_left_alone() {
        let out = absolutize_sqlite_dsn("sqlite::memory:", Path::new("/base")).unwrap();
        assert_eq!(out, "sqlite::memory:");
    }

    #[test]
    fn relative_sqlite_path_lands_under_base_dir() {
        let out = absolutize_sqlite_dsn("sqlite://data/pins.db", Path::new("/base")).unwrap();
        assert_eq!(out, "sqlite:///base/data/pins.db");
    }

    #[test]
    fn query_string_survives_absolutizing() {
        let out =
            absolutize_sqlite_dsn("sqlite://pins.db?mode=rwc", Path::new("/base")).unwrap();
        assert_eq!(out, "sqlite:///base/pins.db?mode=rwc");
    }

    #[test]
    fn mock_overrides_any_configured_url() {
        let args = CliArgs {
            config: None,
            port: None,
            print_config: false,
            verbose: 0,
            mock: true,
        };
        let cfg = DatabaseConfig {
            url: "postgres://real/db".into(),
            max_conns: None,
            busy_timeout_ms: None,
        };
        let dsn = resolve_dsn(Some(&cfg), &args, Path::new("/base")).unwrap();
        assert_eq!(dsn, "sqlite::memory:");
    }
}
