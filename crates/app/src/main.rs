use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{Clock, LoadedState, TrackerService, load_curriculum};
use storage::repository::Storage;
use tracing::{info, warn};
use tracker_core::model::Curriculum;
use tracker_core::time::Countdown;
use ui::{App, UiApp, build_app_context};

const DEFAULT_TARGET: &str = "2025-11-30T23:59:59";
const TARGET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug)]
enum ArgsError {
    InvalidDbUrl { raw: String },
    InvalidTarget { raw: String },
    MissingRemote,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTarget { raw } => {
                write!(f, "invalid --target value: {raw} (expected YYYY-MM-DDTHH:MM:SS)")
            }
            ArgsError::MissingRemote => write!(f, "--store http requires --remote <base url>"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    Sqlite,
    Http,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Launch the desktop UI (default).
    Ui,
    /// Print progress, focus, PYQ count and countdown, then exit.
    Status,
}

#[derive(Debug, Parser)]
#[command(name = "app", version, about = "Study progress tracker")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Document store backend.
    #[arg(long, global = true, env = "STUDY_STORE", value_enum, default_value_t = StoreKind::Sqlite)]
    store: StoreKind,

    /// SQLite database url or path (relative paths resolve against the cwd).
    #[arg(long, global = true, env = "STUDY_DB_URL")]
    db: Option<String>,

    /// Base url of the remote document service.
    #[arg(long, global = true, env = "STUDY_REMOTE_URL")]
    remote: Option<String>,

    /// Curriculum JSON file; the built-in plan is used when absent.
    #[arg(long, global = true, env = "STUDY_CURRICULUM")]
    curriculum: Option<PathBuf>,

    /// Countdown target in local time.
    #[arg(long, global = true, env = "STUDY_TARGET", default_value = DEFAULT_TARGET)]
    target: String,
}

struct DesktopApp {
    tracker: Arc<TrackerService>,
    countdown_target: DateTime<Utc>,
}

impl UiApp for DesktopApp {
    fn tracker(&self) -> Arc<TrackerService> {
        Arc::clone(&self.tracker)
    }

    fn countdown_target(&self) -> DateTime<Utc> {
        self.countdown_target
    }
}

fn init_tracing() {
    // Logs go to stderr so `status` output stays clean on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw.to_string();
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" || db_url.contains("mode=memory") {
        return Ok(());
    }

    let invalid = || ArgsError::InvalidDbUrl {
        raw: db_url.to_string(),
    };
    let path = db_url.strip_prefix("sqlite://").ok_or_else(invalid)?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(invalid().into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Interpret `raw` as a local wall-clock time.
fn parse_target(raw: &str) -> Result<DateTime<Utc>, ArgsError> {
    let invalid = || ArgsError::InvalidTarget {
        raw: raw.to_string(),
    };
    let naive = NaiveDateTime::parse_from_str(raw.trim(), TARGET_FORMAT).map_err(|_| invalid())?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(invalid)
}

async fn open_storage(cli: &Cli) -> Result<Storage, Box<dyn std::error::Error>> {
    match cli.store {
        StoreKind::Sqlite => {
            let raw = cli.db.as_deref().unwrap_or("study.sqlite3");
            if raw.trim().is_empty() {
                return Err(ArgsError::InvalidDbUrl {
                    raw: raw.to_string(),
                }
                .into());
            }
            let db_url = normalize_sqlite_url(raw);
            // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
            prepare_sqlite_file(&db_url)?;
            info!(url = %db_url, "using sqlite document store");
            Ok(Storage::sqlite(&db_url).await?)
        }
        StoreKind::Http => {
            let base = cli.remote.as_deref().ok_or(ArgsError::MissingRemote)?;
            info!(base, "using remote document store");
            Ok(Storage::http(base)?)
        }
        StoreKind::Memory => {
            warn!("using in-memory document store; nothing will be kept after exit");
            Ok(Storage::in_memory())
        }
    }
}

fn open_curriculum(cli: &Cli) -> Result<Curriculum, Box<dyn std::error::Error>> {
    match &cli.curriculum {
        Some(path) => {
            let curriculum = load_curriculum(path)?;
            info!(path = %path.display(), subjects = curriculum.len(), "curriculum loaded");
            Ok(curriculum)
        }
        None => Ok(Curriculum::builtin()),
    }
}

fn print_status(loaded: &LoadedState, clock: Clock, target: DateTime<Utc>) {
    for failure in &loaded.failures {
        eprintln!("warning: could not load {}: {}", failure.slice, failure.source);
    }

    let state = &loaded.state;
    let overall = state.overall_progress();
    println!(
        "Overall: {}/{} tasks ({}%)",
        overall.completed, overall.total, overall.percent
    );
    for figures in state.subject_progress() {
        println!(
            "  {:<28} {:>3}/{:<3} {:>3}%",
            figures.name, figures.completed, figures.total, figures.percent
        );
    }
    println!("Current focus: {}", state.focus(clock.today()).label());
    println!("PYQs solved: {}", state.pyq_count());

    let left = Countdown::until(target, clock.now());
    if left.elapsed {
        println!("Countdown: target reached");
    } else {
        println!(
            "Countdown: {}d {:02}h {:02}m {:02}s",
            left.days, left.hours, left.minutes, left.seconds
        );
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing();

    let target = parse_target(&cli.target)?;
    let curriculum = Arc::new(open_curriculum(&cli)?);
    let storage = open_storage(&cli).await?;
    let clock = Clock::default_clock();
    let tracker = Arc::new(TrackerService::new(clock, curriculum, storage.documents));

    match cli.command.unwrap_or(Command::Ui) {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                tracker,
                countdown_target: target,
            });
            let context = build_app_context(&app);

            // Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Study Tracker")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Status => {
            let loaded = tracker.load_state().await;
            print_status(&loaded, clock, target);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
