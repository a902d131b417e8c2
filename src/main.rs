//! Attendance Engine - classify attendance records and build dashboard reports.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use attendance_engine as app;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::config::{AppConfig, ConfigLoadResult};
use app::engine::calendar::parse_month;
use app::engine::{AggregateOptions, AttendanceFilter, aggregate, classify_all};
use app::ingest;
use app::models::{ActiveShift, AttendanceStatus, EmployeeDirectory, EmptyDirectory, Roster};
use app::settings::ShiftSettings;

/// Classify attendance records and build dashboard reports.
#[derive(Parser)]
#[command(name = "attendance-engine", version)]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use config.toml from current directory (dev mode)
    #[arg(long, global = true)]
    dev: bool,

    /// Write logs to daily files in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify every record and print them as JSON
    Classify {
        /// Attendance records (JSON array or {"data": [...]})
        #[arg(long)]
        records: PathBuf,
    },
    /// Print the dashboard report as JSON
    Report {
        #[arg(long)]
        records: PathBuf,

        /// Employee roster for department filters and names
        #[arg(long)]
        roster: Option<PathBuf>,

        #[arg(long)]
        department: Option<String>,

        #[arg(long)]
        employee: Option<String>,

        /// First date of the window (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last date of the window (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(long)]
        status: Option<String>,

        /// Selected month (YYYY-MM); defaults to the month of --today
        #[arg(long)]
        month: Option<String>,

        /// Reference date for alerts; defaults to the local date
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Override the configured active shift (day or night)
        #[arg(long)]
        shift: Option<String>,
    },
    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "attendance-engine.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    if let Some(path) = &cli.config {
        path.clone()
    } else if cli.dev {
        tracing::info!("Dev mode: loading config from current directory");
        PathBuf::from("config.toml")
    } else {
        AppConfig::default_path()
    }
}

fn load_config(path: &Path) -> anyhow::Result<AppConfig> {
    match AppConfig::try_load(path) {
        ConfigLoadResult::Loaded(config) => {
            tracing::info!("Config loaded from {:?}", path);
            Ok(config)
        }
        ConfigLoadResult::Missing => {
            tracing::info!("No config at {:?}, using defaults", path);
            Ok(AppConfig::default())
        }
        ConfigLoadResult::Invalid(e) => {
            Err(e).with_context(|| format!("Invalid config at {}", path.display()))
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.log_dir.as_deref());

    let path = config_path(&cli);

    match cli.command {
        Command::InitConfig { force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            AppConfig::default()
                .save(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote default config to {:?}", path);
        }
        Command::Classify { records } => {
            let config = load_config(&path)?;
            let settings = ShiftSettings::new(config.shift.clone());
            let records = ingest::load_records(&records).context("Failed to load attendance records")?;

            let snapshot = settings.snapshot();
            print_json(&classify_all(&records, &snapshot.config, &config.work))?;
        }
        Command::Report {
            records,
            roster,
            department,
            employee,
            from,
            to,
            status,
            month,
            today,
            shift,
        } => {
            let config = load_config(&path)?;
            let settings = ShiftSettings::new(config.shift.clone());
            if let Some(shift) = shift {
                let Some(active) = ActiveShift::parse(&shift) else {
                    bail!("Unknown shift {shift:?} (expected day or night)");
                };
                settings.replace(config.shift.clone().with_active(active));
            }

            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let mut options = AggregateOptions::new(today).with_alerts(config.alerts.clone());
            if let Some(month) = month {
                let Some((year, month)) = parse_month(&month) else {
                    bail!("Invalid month {month:?} (expected YYYY-MM)");
                };
                options = options.with_month(year, month);
            }

            let filter = AttendanceFilter {
                department,
                employee_id: employee,
                start_date: from,
                end_date: to,
                status: status.as_deref().map(AttendanceStatus::parse),
            };

            let records = ingest::load_records(&records).context("Failed to load attendance records")?;
            let directory: Box<dyn EmployeeDirectory> = match roster {
                Some(path) => Box::new(Roster::new(
                    ingest::load_roster(&path).context("Failed to load employee roster")?,
                )),
                None => Box::new(EmptyDirectory),
            };

            let snapshot = settings.snapshot();
            tracing::info!("Using shift settings version {}", snapshot.version);
            let classified = classify_all(&records, &snapshot.config, &config.work);
            print_json(&aggregate(&classified, &filter, directory.as_ref(), &options))?;
        }
    }

    Ok(())
}
