//! Constants for board geometry, search limits, and evaluation weights.
//!
//! Every tunable used by the rules engine and the search lives here so the
//! runtime configuration in [`crate::search::SearchConfig`] can take its
//! defaults from one place.

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN) of the Little-Go variant.
pub const N: usize = 5;

/// Komi given to White when a finished game is scored.
pub const KOMI: f64 = 2.5;

/// Maximum number of moves in a game (both players together).
pub const MAX_MOVES: usize = N * N - 1;

// =============================================================================
// Search Parameters
// =============================================================================

/// Default maximum search depth in plies.
pub const DEFAULT_DEPTH: usize = 6;

/// Default wall-clock budget for iterative deepening, in milliseconds.
///
/// Checked between depth iterations only, so one deep iteration may overrun it.
pub const DEFAULT_TIME_BUDGET_MS: u64 = 9_000;

/// Score bound used as +/- infinity for the alpha-beta window.
pub const SCORE_BOUND: f64 = 1000.0;

// =============================================================================
// Evaluation Weights
// =============================================================================

/// Bonus per empty point fully enclosed by the evaluated color.
pub const TERRITORY_WEIGHT: f64 = 0.5;

/// Bonus per liberty of each own stone, applied for White only.
///
/// Compensates the second player in the same spirit as komi. A tunable,
/// not a rule of Go.
pub const LIBERTY_BONUS: f64 = 0.1;

// =============================================================================
// Candidate Filtering
// =============================================================================

/// Below this many empty points every legal move is a search candidate.
///
/// With more empty points only moves touching an opposing stone (orthogonally
/// or diagonally) are expanded.
pub const NEIGHBOUR_FILTER_THRESHOLD: usize = 14;
