//! League CLI
//!
//! Creates, advances and inspects saved league games.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use tracing::Level;
use uuid::Uuid;

use league_core::competition::Standings;
use league_core::config::constants::CUP_TITLE;
use league_core::{
    ClubId, DirectoryStore, Game, GameContext, GameError, GameParams, GameRepository,
};

#[derive(Parser)]
#[command(name = "league")]
#[command(about = "Tennis club league simulator", long_about = None)]
struct Cli {
    /// Directory holding saved games
    #[arg(long, global = true, default_value = "saves")]
    save_dir: PathBuf,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create and save a new game
    New {
        /// Club managed by the player
        #[arg(long, default_value_t = 0)]
        manager: ClubId,

        /// Random seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Game parameters YAML file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Play days of a saved game
    Advance {
        game_id: String,

        /// Number of days to play
        #[arg(long, default_value_t = 1, conflicts_with = "next_competition")]
        days: usize,

        /// Play until the next competition starts
        #[arg(long)]
        next_competition: bool,
    },

    /// Print the manager's view of a saved game
    Status {
        game_id: String,

        /// Club to look at (the manager's club by default)
        #[arg(long)]
        club: Option<ClubId>,

        /// Print the context as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign every affordable player for next season, fire the rest
    SignAll { game_id: String },

    /// Simulate independent AI-only games in parallel
    Batch {
        #[arg(long, default_value_t = 4)]
        games: usize,

        #[arg(long, default_value_t = 1)]
        seasons: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).with_target(false).init();

    let mut repository = GameRepository::new(DirectoryStore::new(&cli.save_dir));

    match cli.command {
        Commands::New { manager, seed, config } => {
            let params = load_params(config.as_deref())?;
            let seed = seed.unwrap_or_else(rand_seed);
            let game_id = Uuid::new_v4().to_string();

            let game = Game::new(params, &game_id, manager, seed).context("Failed to create game")?;
            repository.save(&game).context("Failed to save game")?;

            println!("Created game {}", game_id);
            println!("   Club:   {}", game.club(manager)?.name());
            println!("   Seed:   {}", seed);
            println!("   Saved:  {}", cli.save_dir.display());
        }

        Commands::Advance { game_id, days, next_competition } => {
            let mut game = load_game(&repository, &game_id)?;

            let played = if next_competition {
                let mut played = 0;
                loop {
                    advance_one_day(&mut game)?;
                    played += 1;
                    if game.day() == 0 {
                        break played;
                    }
                }
            } else {
                for _ in 0..days {
                    advance_one_day(&mut game)?;
                }
                days
            };

            repository.save(&game).context("Failed to save game")?;
            println!(
                "Played {} day(s): season {}, {} day {}",
                played,
                game.season(),
                game.competition().title(),
                game.day()
            );
            for row in game.day_result_rows() {
                println!(
                    "   {} - {}: {} (attendance {}, income ${})",
                    row.home_club, row.away_club, row.score, row.attendance, row.income
                );
            }
        }

        Commands::Status { game_id, club, json } => {
            let game = load_game(&repository, &game_id)?;
            let context = game.context(club.unwrap_or_else(|| game.manager_club_id()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&context)?);
            } else {
                print_context(&context);
            }
        }

        Commands::SignAll { game_id } => {
            let mut game = load_game(&repository, &game_id)?;
            let (signed, fired) = sign_all(&mut game)?;
            repository.save(&game).context("Failed to save game")?;
            println!("Signed {}, fired {}", signed, fired);
        }

        Commands::Batch { games, seasons, seed } => {
            let outcomes: Vec<Result<(u64, Vec<String>)>> = (0..games as u64)
                .into_par_iter()
                .map(|index| {
                    let seed = seed.wrapping_add(index);
                    let champions = simulate_batch_game(seed, seasons)?;
                    Ok((seed, champions))
                })
                .collect();

            for outcome in outcomes {
                let (seed, champions) = outcome?;
                println!("Seed {}: {}", seed, champions.join(", "));
            }
        }
    }

    Ok(())
}

fn rand_seed() -> u64 {
    Uuid::new_v4().as_u64_pair().0
}

fn load_params(path: Option<&Path>) -> Result<GameParams> {
    match path {
        Some(path) => GameParams::load(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display())),
        None => Ok(GameParams::default()),
    }
}

fn load_game(repository: &GameRepository<DirectoryStore>, game_id: &str) -> Result<Game> {
    repository.load(game_id).with_context(|| format!("Failed to load game {}", game_id))
}

/// Plays one day, picking the best player when the manager has to decide.
fn advance_one_day(game: &mut Game) -> Result<()> {
    match game.update() {
        Ok(()) => Ok(()),
        Err(GameError::DecisionRequired) => {
            let manager = game.manager_club_id();
            let Some(best) = game.club(manager)?.best_player_index() else {
                bail!("{} has no player to send", game.club(manager)?.name());
            };
            game.select_player(manager, best)?;
            tracing::info!(player = best, "Auto-selected the best player");
            game.update().context("Day refused after selecting a player")
        }
        Err(GameError::UnresolvedContracts) => {
            bail!("{} (run `league sign-all {}`)", GameError::UnresolvedContracts, game.game_id())
        }
        Err(error) => Err(error.into()),
    }
}

/// Signs players from the strongest down while money lasts; fires everyone
/// who can't be signed.
fn sign_all(game: &mut Game) -> Result<(usize, usize)> {
    let manager = game.manager_club_id();
    let mut order: Vec<(usize, u32)> = game
        .club(manager)?
        .players()
        .iter()
        .enumerate()
        .filter(|(_, slot)| !slot.has_next_contract)
        .map(|(index, slot)| (index, slot.player.level()))
        .collect();
    order.sort_by(|a, b| b.1.cmp(&a.1));

    let mut unsigned = Vec::new();
    let mut signed = 0;
    for (index, _) in order {
        match game.sign_player(manager, index) {
            Ok(()) => signed += 1,
            Err(GameError::InsufficientFunds { .. } | GameError::TooOldForContract { .. }) => {
                unsigned.push(index)
            }
            Err(error) => return Err(error.into()),
        }
    }

    // Highest index first keeps the remaining indices valid
    unsigned.sort_unstable_by(|a, b| b.cmp(a));
    for &index in &unsigned {
        game.fire_player(manager, index)?;
    }
    Ok((signed, unsigned.len()))
}

/// Cup champions of every simulated season.
fn simulate_batch_game(seed: u64, seasons: usize) -> Result<Vec<String>> {
    let mut game = Game::new(GameParams::default(), Uuid::new_v4().to_string(), 0, seed)?;
    game.set_controlled(0, false)?;
    while game.season() <= seasons {
        game.update()?;
    }

    let champions = game.history()[..seasons]
        .iter()
        .map(|season| {
            season
                .get(CUP_TITLE)
                .and_then(Standings::leader)
                .and_then(|club| game.club(club).ok())
                .map(|club| club.name().to_string())
                .unwrap_or_else(|| "-".to_string())
        })
        .collect();
    Ok(champions)
}

fn print_context(context: &GameContext) {
    println!(
        "{} | season {} | {} day {}",
        context.club_name, context.season, context.title, context.day
    );
    println!("Balance: ${}", context.balance);
    println!(
        "Court: capacity {}, rent ${}, ticket ${} | practice ${}",
        context.court.capacity(),
        context.court.rent_cost(),
        context.court.ticket_price(),
        context.practice_cost
    );

    println!("\nPlayers:");
    for info in &context.players {
        println!(
            "  {}{} {:<20} lvl {:>2} tech {:>4.1} end {:>4.1} age {} {} coach {}{}",
            if info.is_selected { '*' } else { ' ' },
            info.index,
            info.player.initials(),
            info.level,
            info.player.actual_technique(),
            info.player.endurance(),
            info.player.age(),
            info.player.speciality(),
            info.coach_level,
            if info.has_next_contract { " (signed)" } else { "" }
        );
    }

    match &context.opponent {
        Some(opponent) => {
            print!("\nNext: {} on {}", opponent.club_name, opponent.match_surface);
            if let Some(player) = &opponent.player {
                print!(", expected {} (tech {:.1})", player.initials(), player.actual_technique());
            }
            println!();
        }
        None if context.has_matches_today => println!("\nNo match for your club today"),
        None => println!("\nRest day"),
    }

    if let Some(rows) = context.standings.table() {
        println!("\nStandings:");
        for (position, row) in rows.iter().enumerate() {
            let name = context.clubs.get(row.club_id).map(String::as_str).unwrap_or("?");
            println!(
                "  {:>2}. {:<22} W {:>2}  sets {:>3}  games {:>4}",
                position + 1,
                name,
                row.matches_won,
                row.sets_won,
                row.games_won
            );
        }
    }

    if !context.latest_transactions.is_empty() {
        println!("\nLatest transactions:");
        for transaction in &context.latest_transactions {
            println!("  {:>8}  {}", transaction.value, transaction.comment);
        }
    }
}
