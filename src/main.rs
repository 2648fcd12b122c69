use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use set_dealer::{Game, GameConfig, PlayerKind, TracingUi};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run a headless game of Set between computer players.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file. Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of computer players.
    #[arg(long)]
    players: Option<usize>,

    /// Turn timeout in milliseconds: negative hides the timer, zero shows
    /// elapsed time.
    #[arg(long, allow_hyphen_values = true)]
    turn_timeout_ms: Option<i64>,

    #[arg(long)]
    seed: Option<u64>,

    /// Log every legal set on the table after each deal.
    #[arg(long)]
    hints: bool,

    /// Terminate the game after this many seconds.
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_thread_names(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_path(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(players) = args.players {
        config = config.with_players(players, PlayerKind::Computer);
    }
    if let Some(timeout) = args.turn_timeout_ms {
        config = config.with_turn_timeout(timeout);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if args.hints {
        config = config.with_hints(true);
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json);

    let config = load_config(&args)?;
    info!(players = config.player_count(), timeout_ms = config.turn_timeout_millis, "starting game");

    let game = Game::new(config, Arc::new(TracingUi::new())).context("building game")?;
    let handle = game.start().context("starting dealer")?;

    if let Some(secs) = args.duration_secs {
        let deadline = Instant::now() + Duration::from_secs(secs);
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(50));
        }
        handle.terminate();
    }

    let outcome = handle.join().context("running game")?;
    for (player, score) in outcome.scores.iter() {
        info!(%player, score, "final score");
    }
    info!(winners = ?outcome.winners, "game over");
    Ok(())
}
