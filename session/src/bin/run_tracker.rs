use std::path::PathBuf;

use clap::Parser;
use rand::Rng;
use serde::Deserialize;

use database::{SqliteStore, StoreConfig};
use session::Session;
use types::MatchSetup;

#[derive(Parser, Debug)]
struct Params {
    /// Player names, repeat the flag for each participant (2-4).
    #[arg(short, long)]
    player: Vec<String>,

    #[arg(long, default_value_t = 3)]
    target_sets: u32,

    #[arg(long, default_value_t = 3)]
    legs_per_set: u32,

    /// Stored on the match as-is (e.g. 301, 501); never interpreted.
    #[arg(long, default_value = "501")]
    game_type: String,

    #[arg(long)]
    double_in: bool,

    #[arg(long)]
    double_out: bool,

    /// Sqlite database path; falls back to DATABASE_URL, then the config
    /// file, then an in-memory database.
    #[arg(long)]
    database: Option<String>,

    /// Optional YAML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Chance (0.0-1.0) of undoing the previous leg instead of recording a
    /// new one, to exercise the undo path.
    #[arg(long, default_value_t = 0.0)]
    undo_chance: f64,
}

#[derive(Debug, Default, Deserialize)]
struct TrackerConfig {
    database_url: Option<String>,
}

impl TrackerConfig {
    fn load(path: Option<&PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::error!("Ignoring unreadable config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                log::error!("Ignoring missing config {}: {e}", path.display());
                Self::default()
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    let config = TrackerConfig::load(args.config.as_ref());
    let store_config = StoreConfig::from_cli_or_env_or_yaml(args.database, config.database_url);
    let pool = store_config.create_pool().await?;
    let store = SqliteStore::new(pool);
    store.run_migrations().await?;

    let mut session = Session::load(store).await;
    for name in &args.player {
        match session.add_player(name).await {
            Ok(()) => log::info!("Added player {name:?}"),
            Err(session::SessionError::DuplicatePlayer(_)) => {
                log::info!("Player {name:?} already on the roster")
            }
            Err(e) => return Err(e.into()),
        }
    }

    let setup = MatchSetup {
        players: args.player.clone(),
        target_sets: args.target_sets,
        legs_per_set: args.legs_per_set,
        game_type: args.game_type,
        double_in: args.double_in,
        double_out: args.double_out,
        starting_index: 0,
    };
    session.create_match(setup).await?;

    let mut rng = rand::thread_rng();
    loop {
        let (finished, can_undo, num_players) = match session.active_match() {
            Some(current) => (current.is_finished(), current.can_undo(), current.players.len()),
            None => break,
        };
        if finished {
            break;
        }
        if can_undo && rng.gen_bool(args.undo_chance) {
            session.undo_leg().await?;
            continue;
        }
        let winner_index = rng.gen_range(0..num_players);
        session.record_leg_win(winner_index).await?;
        if let Some(current) = session.active_match() {
            log::info!("{current} (on turn: {})", current.players[current.turn_index()]);
        }
    }

    if let Some(finished) = session.active_match() {
        match &finished.winner {
            Some(winner) => println!("Winner: {winner} after {} legs", finished.leg_count()),
            None => println!("Match left unfinished"),
        }
        println!("{finished}");
    }

    println!("Standings:");
    for player in session.roster().standings() {
        println!(
            "  {player} ({:.0}% win rate)",
            player.win_rate() * 100.0
        );
    }
    Ok(())
}
