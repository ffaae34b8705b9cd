//! Game driver: alternates two players on one board.
//!
//! Tracks what the rules need between turns (the board before the last
//! move, whether any capture has happened) and the move budget. The game
//! ends after two consecutive passes or when the budget is used up.

use thiserror::Error;
use tracing::debug;

use crate::agent::{Move, Player, Turn};
use crate::board::{Board, Color, Point};
use crate::constants::MAX_MOVES;
use crate::rules::{History, MoveError, check_move, place_with_captures, winner};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{color:?} played {point:?}: {reason}")]
pub struct IllegalMove {
    pub color: Color,
    pub point: Point,
    pub reason: MoveError,
}

#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    previous: Board,
    to_move: Color,
    /// Moves played so far, passes included
    n: usize,
    passes: usize,
    captures_seen: bool,
    record: Vec<(Color, Move)>,
}

impl Game {
    pub fn new(size: usize) -> Self {
        Self {
            board: Board::new(size),
            previous: Board::new(size),
            to_move: Color::Black,
            n: 0,
            passes: 0,
            captures_seen: false,
            record: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn record(&self) -> &[(Color, Move)] {
        &self.record
    }

    pub fn moves_remaining(&self) -> usize {
        MAX_MOVES.saturating_sub(self.n)
    }

    pub fn is_over(&self) -> bool {
        self.passes >= 2 || self.moves_remaining() == 0
    }

    /// The view handed to the player whose turn it is.
    pub fn turn(&self) -> Turn {
        Turn {
            color: self.to_move,
            previous: self.previous.clone(),
            board: self.board.clone(),
            moves_remaining: self.moves_remaining(),
            captures_seen: self.captures_seen,
        }
    }

    /// Apply a move for the side to play.
    pub fn play(&mut self, mv: Move) -> Result<(), IllegalMove> {
        let color = self.to_move;
        match mv {
            Move::Pass => {
                self.previous = self.board.clone();
                self.passes += 1;
            }
            Move::Place(point) => {
                let history = History::new(&self.previous, self.captures_seen);
                check_move(&self.board, point, color, &history).map_err(|reason| IllegalMove {
                    color,
                    point,
                    reason,
                })?;
                let (next, captured) = place_with_captures(&self.board, point, color);
                if !captured.is_empty() {
                    debug!(?color, ?point, captured = captured.len(), "stones captured");
                    self.captures_seen = true;
                }
                self.previous = std::mem::replace(&mut self.board, next);
                self.passes = 0;
            }
        }
        self.record.push((color, mv));
        self.to_move = color.opponent();
        self.n += 1;
        Ok(())
    }

    /// Let `black` and `white` alternate until the game ends.
    ///
    /// Returns the winner by stone count plus komi.
    pub fn play_out(
        &mut self,
        black: &mut dyn Player,
        white: &mut dyn Player,
    ) -> Result<Color, IllegalMove> {
        while !self.is_over() {
            let turn = self.turn();
            let mv = match self.to_move {
                Color::Black => black.choose_move(&turn),
                Color::White => white.choose_move(&turn),
            };
            self.play(mv)?;
        }
        Ok(winner(&self.board))
    }
}
