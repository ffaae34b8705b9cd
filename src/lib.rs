//! Little-Go: a rules engine and alpha-beta player for 5x5 Go.
//!
//! This crate checks move legality under capture, suicide and ko rules,
//! simulates boards after captures, and picks moves with a minimax search
//! using alpha-beta pruning and iterative deepening.
//!
//! ## Modules
//!
//! - [`constants`] - Board size, search limits and evaluation weights
//! - [`board`] - Board storage, colors and coordinates
//! - [`rules`] - Groups, liberties, captures, legality and evaluation
//! - [`search`] - Minimax with alpha-beta pruning and iterative deepening
//! - [`agent`] - Move selection policies
//! - [`game`] - Game driver alternating two players
//! - [`io`] - Text-file adapters for the command-line player
//!
//! ## Example
//!
//! ```
//! use little_go::agent::{MinimaxAgent, Move, Player, Turn};
//! use little_go::board::{Board, Color};
//!
//! let previous = Board::new(5);
//! let board = Board::from_rows(&[
//!     [0u8, 0, 0, 0, 0],
//!     [0, 0, 0, 0, 0],
//!     [0, 0, 1, 0, 0],
//!     [0, 0, 0, 0, 0],
//!     [0, 0, 0, 0, 0],
//! ])
//! .unwrap();
//!
//! let mut agent = MinimaxAgent::default();
//! let turn = Turn::new(Color::White, previous, board, 3);
//! let mv = agent.choose_move(&turn);
//! assert!(matches!(mv, Move::Place(_)));
//! ```

pub mod agent;
pub mod board;
pub mod constants;
pub mod game;
pub mod io;
pub mod rules;
pub mod search;
