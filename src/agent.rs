//! Move selection policies.
//!
//! [`MinimaxAgent`] is the searching player: it opens on the center point,
//! clamps its depth to the moves left in the game, and runs iterative
//! deepening. [`RandomPlayer`] plays a uniformly random legal move and serves
//! as a baseline opponent.

use std::fmt;

use tracing::info;

use crate::board::{Board, Color, Point};
use crate::rules::{History, candidate_moves};
use crate::search::{SearchConfig, SearchOutcome, Searcher};

/// A player's decision for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Place(Point),
    Pass,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Place((row, col)) => write!(f, "{row},{col}"),
            Move::Pass => f.write_str("PASS"),
        }
    }
}

/// Everything a player sees when asked for a move.
#[derive(Debug, Clone)]
pub struct Turn {
    pub color: Color,
    /// Board before the opponent's last move
    pub previous: Board,
    pub board: Board,
    /// Moves left in the game, counting both players
    pub moves_remaining: usize,
    /// Whether a capture has happened in the game, which arms the ko check
    pub captures_seen: bool,
}

impl Turn {
    /// Build a turn from the raw inputs, inferring `captures_seen` from
    /// stones of `color` that vanished since `previous`.
    pub fn new(color: Color, previous: Board, board: Board, moves_remaining: usize) -> Self {
        let captures_seen = stones_lost(&previous, &board, color);
        Self {
            color,
            previous,
            board,
            moves_remaining,
            captures_seen,
        }
    }

    pub fn history(&self) -> History<'_> {
        History::new(&self.previous, self.captures_seen)
    }
}

/// Whether some stone of `color` on `previous` is missing from `board`.
pub fn stones_lost(previous: &Board, board: &Board, color: Color) -> bool {
    previous
        .points()
        .any(|pt| previous.get(pt) == Some(color) && board.get(pt) != Some(color))
}

pub trait Player {
    fn choose_move(&mut self, turn: &Turn) -> Move;
}

/// Alpha-beta player with iterative deepening.
pub struct MinimaxAgent {
    config: SearchConfig,
    last: Option<SearchOutcome>,
}

impl MinimaxAgent {
    pub fn new(config: SearchConfig) -> Self {
        Self { config, last: None }
    }

    /// Outcome of the most recent search, `None` if the last move skipped it.
    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last.as_ref()
    }
}

impl Default for MinimaxAgent {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Player for MinimaxAgent {
    fn choose_move(&mut self, turn: &Turn) -> Move {
        self.last = None;
        if turn.board.is_clear() {
            let center = turn.board.center();
            info!(?center, "empty board, playing the center");
            return Move::Place(center);
        }

        let max_depth = self.config.max_depth.min(turn.moves_remaining);
        let mut searcher = Searcher::new(SearchConfig {
            max_depth,
            ..self.config
        });
        let outcome = searcher.search(&turn.board, turn.color, &turn.history());

        let mv = match outcome.best_move {
            Some(pt) => Move::Place(pt),
            None => Move::Pass,
        };
        info!(
            color = ?turn.color,
            %mv,
            value = outcome.value,
            depth = outcome.depth,
            nodes = outcome.stats.nodes,
            "move chosen"
        );
        self.last = Some(outcome);
        mv
    }
}

/// Uniformly random legal move, passing when none exists.
pub struct RandomPlayer {
    rng: fastrand::Rng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for RandomPlayer {
    fn default() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }
}

impl Player for RandomPlayer {
    fn choose_move(&mut self, turn: &Turn) -> Move {
        let moves = candidate_moves(&turn.board, turn.color, &turn.history(), None);
        if moves.is_empty() {
            return Move::Pass;
        }
        Move::Place(moves[self.rng.usize(..moves.len())])
    }
}
