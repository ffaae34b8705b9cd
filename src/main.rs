//! Little-Go: command-line player for 5x5 Go.
//!
//! ## Usage
//!
//! - `little-go` / `little-go play` - Read `input.txt`, write the move to `output.txt`
//! - `little-go selfplay` - Play a full game against a random opponent
//! - `little-go demo` - Show captures and legality on a few positions

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use little_go::agent::{MinimaxAgent, Move, Player, RandomPlayer, Turn};
use little_go::board::{Board, Color};
use little_go::constants::{DEFAULT_DEPTH, DEFAULT_TIME_BUDGET_MS, N};
use little_go::game::Game;
use little_go::io::{read_input, read_moves_remaining, write_output};
use little_go::rules::{Heuristic, History, check_move, place, place_with_captures, score};
use little_go::search::SearchConfig;

/// Little-Go: alpha-beta player for 5x5 Go
#[derive(Parser)]
#[command(name = "little-go")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose a move for the position in the input file
    Play {
        #[arg(long, default_value = "input.txt")]
        input: PathBuf,
        #[arg(long, default_value = "output.txt")]
        output: PathBuf,
        /// Move counter kept between turns
        #[arg(long, default_value = "moves.txt")]
        moves_file: PathBuf,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Play a full game as Black against a random White
    Selfplay {
        /// Seed for the random opponent
        #[arg(long, default_value_t = 1)]
        seed: u64,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Run a short demo of the rules engine
    Demo,
}

#[derive(Args, Clone, Copy)]
struct SearchArgs {
    /// Maximum search depth in plies
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,
    /// Time budget for iterative deepening, in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIME_BUDGET_MS)]
    time_ms: u64,
    /// Evaluation: material, territory or territory-liberty
    #[arg(long, default_value_t = Heuristic::default())]
    heuristic: Heuristic,
}

impl SearchArgs {
    fn config(self) -> SearchConfig {
        SearchConfig {
            max_depth: self.depth,
            time_budget: Duration::from_millis(self.time_ms),
            heuristic: self.heuristic,
            ..SearchConfig::default()
        }
    }
}

/// The command run when none is given: `play` with its defaults.
fn default_command() -> Result<Commands> {
    Cli::try_parse_from(["little-go", "play"])?
        .command
        .context("no default command")
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let command = match Cli::parse().command {
        Some(command) => command,
        None => default_command()?,
    };

    match command {
        Commands::Play {
            input,
            output,
            moves_file,
            search,
        } => run_play(&input, &output, &moves_file, search.config()),
        Commands::Selfplay { seed, search } => run_selfplay(seed, search.config()),
        Commands::Demo => run_demo(),
    }
}

fn run_play(input: &Path, output: &Path, moves_file: &Path, config: SearchConfig) -> Result<()> {
    let parsed = read_input(input, N)
        .with_context(|| format!("reading position from {}", input.display()))?;
    let moves = read_moves_remaining(moves_file, parsed.color, N)
        .with_context(|| format!("updating move counter {}", moves_file.display()))?;

    let turn = parsed.into_turn(moves);
    let mut agent = MinimaxAgent::new(config);
    let mv = agent.choose_move(&turn);

    write_output(output, mv).with_context(|| format!("writing move to {}", output.display()))?;

    println!("{mv}");
    match mv {
        Move::Place(pt) => print!("{}", place(&turn.board, pt, turn.color)),
        Move::Pass => print!("{}", turn.board),
    }
    Ok(())
}

fn run_selfplay(seed: u64, config: SearchConfig) -> Result<()> {
    let mut game = Game::new(N);
    let mut black = MinimaxAgent::new(config);
    let mut white = RandomPlayer::new(seed);

    let winner = game
        .play_out(&mut black, &mut white)
        .context("a player made an illegal move")?;

    for (i, (color, mv)) in game.record().iter().enumerate() {
        println!("{:>2}. {color:?} {mv}", i + 1);
    }
    println!("\n{}", game.board());
    println!(
        "Black {:.1} - White {:.1}: {winner:?} wins",
        score(game.board(), Color::Black),
        score(game.board(), Color::White)
    );
    Ok(())
}

fn run_demo() -> Result<()> {
    println!("Little-Go: 5x5 rules engine and alpha-beta player\n");

    println!("=== Capture ===");
    let rows: [[u8; 5]; 5] = [
        [0, 0, 0, 0, 0],
        [0, 0, 2, 0, 0],
        [0, 2, 1, 0, 0],
        [0, 0, 2, 0, 0],
        [0, 0, 0, 0, 0],
    ];
    let board = Board::from_rows(&rows)?;
    println!("{board}");
    let (after, captured) = place_with_captures(&board, (2, 3), Color::White);
    println!("White at (2,3) captures {captured:?}");
    println!("{after}");

    println!("=== Legality ===");
    let history = History::new(&board, false);
    let probes = [
        ((2, 2), Color::White),
        ((2, 3), Color::Black),
        ((0, 0), Color::Black),
    ];
    for (pt, color) in probes {
        match check_move(&board, pt, color, &history) {
            Ok(()) => println!("{color:?} at {pt:?}: legal"),
            Err(e) => println!("{color:?} at {pt:?}: {e}"),
        }
    }

    println!("\n=== Search ===");
    let mut agent = MinimaxAgent::new(SearchConfig {
        max_depth: 3,
        ..SearchConfig::default()
    });
    let turn = Turn::new(Color::Black, board.clone(), board, 20);
    let mv = agent.choose_move(&turn);
    println!("Black plays {mv}");
    Ok(())
}
