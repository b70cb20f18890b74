//! CLI entry point for flowtask.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flowtask_app::{ProjectConfig, TaskBoard};
use flowtask_store::{LatencyProfile, MemoryStore};
use time::{Date, OffsetDateTime};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use commands::{FilterArgs, Flow, ListFormat, Session};

mod commands;
mod view;

/// Single-user task list backed by a simulated remote store.
#[derive(Parser, Debug)]
#[command(
    name = "flowtask",
    version,
    about = "flowtask: a single-user task list with a simulated remote store"
)]
struct Cli {
    /// Project directory holding `.flowtask/config.toml` (defaults to current).
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// JSON task array to start from; overrides the configured seed.
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Answer store calls immediately instead of simulating network delay.
    #[arg(long)]
    no_latency: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load, filter, and print the task list once.
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(short = 'p', long)]
        priority: Option<String>,
        #[arg(short = 's', long)]
        status: Option<String>,
        #[arg(long, value_enum, default_value_t = ListFormat::Text)]
        format: ListFormat,
    },

    /// Start an interactive session on stdin.
    Shell,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    install_tracing();
    tokio::runtime::Runtime::new()?.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let Cli {
        workdir,
        seed,
        no_latency,
        cmd,
    } = cli;
    let workdir = workdir.unwrap_or_else(|| PathBuf::from("."));
    let config = ProjectConfig::from_workdir(&workdir)?;
    let store = open_store(&config, seed.as_deref(), no_latency)?;
    let board = TaskBoard::new(store);
    let base_filter = config.view.default_filter()?;

    match cmd {
        Command::List {
            search,
            priority,
            status,
            format,
        } => {
            let filter = FilterArgs {
                search,
                priority,
                status,
            }
            .apply_to(&base_filter)?;
            let mut stdout = io::stdout().lock();
            commands::run_list(&board, &filter, format, today(), &mut stdout).await
        }
        Command::Shell => run_shell(Session::new(board, base_filter, today())).await,
    }
}

fn open_store(config: &ProjectConfig, seed: Option<&Path>, no_latency: bool) -> Result<MemoryStore> {
    let store = match seed.or(config.store.seed.as_deref()) {
        Some(path) => MemoryStore::from_seed_file(path)
            .with_context(|| format!("failed to load seed tasks from {}", path.display()))?,
        None => MemoryStore::new(),
    };
    let latency = if no_latency {
        LatencyProfile::none()
    } else {
        config.store.latency_profile()
    };
    Ok(store.with_latency(latency))
}

async fn run_shell(mut session: Session<MemoryStore>) -> Result<()> {
    let mut stdout = io::stdout();
    session.start(&mut stdout).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if session.execute(&line, &mut stdout).await? == Flow::Quit {
            break;
        }
    }
    info!("Session ended");
    Ok(())
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

fn install_tracing() {
    // RUST_LOG is honored; default level is INFO. Logs go to stderr.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
