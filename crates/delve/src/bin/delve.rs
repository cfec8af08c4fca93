use anyhow::bail;
use clap::{Parser, ValueEnum};
use delve::{Ending, Session, SessionConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "delve - plays Dungeon Crawl Stone Soup over a PTY")]
struct Args {
    /// Game executable to drive
    #[arg(default_value = "/usr/games/crawl")]
    command: String,

    /// Extra arguments passed to the game
    #[arg(trailing_var_arg = true)]
    game_args: Vec<String>,

    /// Terminal rows the game is spawned with
    #[arg(long, default_value_t = 40)]
    rows: u16,

    /// Terminal columns the game is spawned with
    #[arg(long, default_value_t = 160)]
    cols: u16,

    /// Stop after this many commands
    #[arg(long, default_value_t = 1000)]
    max_moves: u32,

    /// Rest when health falls below this fraction of maximum
    #[arg(long, default_value_t = 0.6)]
    rest_threshold: f32,

    /// Escalate after this many consecutive identical menu screens
    #[arg(long, default_value_t = 5)]
    stuck_threshold: u32,

    /// Character name for the creation flow
    #[arg(long, default_value = "delver")]
    name: String,

    /// Milliseconds of silence after which a redraw burst is settled
    #[arg(long, default_value_t = 300)]
    quiet_ms: u64,

    /// Milliseconds to wait for any output before moving on
    #[arg(long, default_value_t = 3500)]
    read_timeout_ms: u64,

    /// Directory for the session log and per-move snapshots
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str())),
        )
        .init();

    let config = SessionConfig {
        program: args.command,
        args: args.game_args,
        rows: args.rows,
        cols: args.cols,
        max_moves: args.max_moves,
        rest_threshold: args.rest_threshold,
        stuck_threshold: args.stuck_threshold,
        name: args.name,
        quiet: Duration::from_millis(args.quiet_ms),
        read_timeout: Duration::from_millis(args.read_timeout_ms),
        log_dir: args.log_dir,
    };

    let mut session = Session::launch(config).await?;
    let summary = session.run().await?;

    println!("session over after {} moves", summary.moves);
    match summary.ending {
        Ending::MoveBudget => println!("move budget reached"),
        Ending::GameOver => println!("game over screen reached"),
        Ending::Disconnected => println!("game process went away"),
        Ending::Stuck { repeats } => {
            bail!("navigation stuck: same menu context {repeats} cycles in a row")
        }
    }

    Ok(())
}
