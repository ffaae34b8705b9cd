//! Go rules over a [`Board`].
//!
//! This module provides the rules engine used by the search:
//! - Neighbor enumeration and stone groups (flood fill)
//! - Liberty detection and capture resolution
//! - Move legality (bounds, occupancy, suicide, ko)
//! - Candidate move generation with a proximity filter
//! - Static evaluation and final scoring
//!
//! Every function here is pure with respect to its inputs: boards are read
//! through shared references and new boards are returned by value.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::board::{Board, Color, Point};
use crate::constants::{KOMI, LIBERTY_BONUS, TERRITORY_WEIGHT};

/// Why a move was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: point off the board")]
    OutOfBounds,
    #[error("illegal move: point not empty")]
    Occupied,
    #[error("illegal move: suicide")]
    Suicide,
    #[error("illegal move: retakes ko")]
    Ko,
}

/// What the legality check needs to know about the game so far.
///
/// `previous` is the board as it stood before the opponent's last move.
/// The ko comparison against it only applies once a capture has happened
/// in the game (`captures_seen`).
#[derive(Debug, Clone, Copy)]
pub struct History<'a> {
    pub previous: &'a Board,
    pub captures_seen: bool,
}

impl<'a> History<'a> {
    pub fn new(previous: &'a Board, captures_seen: bool) -> Self {
        Self {
            previous,
            captures_seen,
        }
    }
}

/// Static evaluation variant, selected once per search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    /// Own stones minus opposing stones.
    Material,
    /// Material plus the territory difference: each empty point enclosed by
    /// the evaluated color adds the territory weight, each one enclosed by
    /// the opponent subtracts it.
    Territory,
    /// Territory plus a per-liberty bonus for White's stones.
    #[default]
    TerritoryLiberty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown heuristic '{0}' (expected material, territory or territory-liberty)")]
pub struct ParseHeuristicError(String);

impl FromStr for Heuristic {
    type Err = ParseHeuristicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "material" => Ok(Heuristic::Material),
            "territory" => Ok(Heuristic::Territory),
            "territory-liberty" | "territory_liberty" => Ok(Heuristic::TerritoryLiberty),
            _ => Err(ParseHeuristicError(s.to_string())),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heuristic::Material => "material",
            Heuristic::Territory => "territory",
            Heuristic::TerritoryLiberty => "territory-liberty",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Neighbors and groups
// =============================================================================

/// The up-to-4 orthogonal neighbors of a point (N, S, W, E) that lie on the board.
pub fn neighbors((row, col): Point, size: usize) -> impl Iterator<Item = Point> {
    let mut v = Vec::with_capacity(4);
    if row > 0 {
        v.push((row - 1, col));
    }
    if row + 1 < size {
        v.push((row + 1, col));
    }
    if col > 0 {
        v.push((row, col - 1));
    }
    if col + 1 < size {
        v.push((row, col + 1));
    }
    v.into_iter()
}

/// The up-to-4 diagonal neighbors of a point that lie on the board.
///
/// Only the candidate filter looks at these; connectivity is orthogonal.
pub fn diagonal_neighbors((row, col): Point, size: usize) -> impl Iterator<Item = Point> {
    let mut v = Vec::with_capacity(4);
    if row > 0 && col > 0 {
        v.push((row - 1, col - 1));
    }
    if row > 0 && col + 1 < size {
        v.push((row - 1, col + 1));
    }
    if row + 1 < size && col > 0 {
        v.push((row + 1, col - 1));
    }
    if row + 1 < size && col + 1 < size {
        v.push((row + 1, col + 1));
    }
    v.into_iter()
}

/// Collect the group containing `start`.
///
/// Depth-first flood fill over orthogonally adjacent points with the same
/// cell content as `start`. The result always contains `start` (when it is
/// on the board) and has no duplicates. On an empty point this returns the
/// connected empty region, which is only meaningful to callers that want it.
pub fn group(board: &Board, start: Point) -> Vec<Point> {
    if !board.contains(start) {
        return Vec::new();
    }
    let size = board.size();
    let color = board.get(start);
    let mut stack = vec![start];
    let mut visited = vec![false; size * size];
    let mut members = Vec::new();

    while let Some(pt) = stack.pop() {
        let i = pt.0 * size + pt.1;
        if visited[i] {
            continue;
        }
        visited[i] = true;
        members.push(pt);
        for n in neighbors(pt, size) {
            if !visited[n.0 * size + n.1] && board.get(n) == color {
                stack.push(n);
            }
        }
    }
    members
}

fn touches_empty(board: &Board, members: &[Point]) -> bool {
    members
        .iter()
        .any(|&m| neighbors(m, board.size()).any(|n| board.get(n).is_none()))
}

/// Whether the group containing `pt` has at least one liberty.
pub fn has_liberty(board: &Board, pt: Point) -> bool {
    touches_empty(board, &group(board, pt))
}

/// Number of empty points orthogonally adjacent to the single stone at `pt`.
///
/// Unlike [`has_liberty`] this looks at one stone, not its whole group.
pub fn liberties(board: &Board, pt: Point) -> usize {
    neighbors(pt, board.size())
        .filter(|&n| board.get(n).is_none())
        .count()
}

// =============================================================================
// Captures
// =============================================================================

/// All stones of `color` whose group has no liberty, in row-major order.
///
/// Every group is judged against the same snapshot; nothing is removed here.
pub fn find_dead(board: &Board, color: Color) -> Vec<Point> {
    let size = board.size();
    let mut seen = vec![false; size * size];
    let mut dead = Vec::new();

    for pt in board.points() {
        if board.get(pt) != Some(color) || seen[pt.0 * size + pt.1] {
            continue;
        }
        let members = group(board, pt);
        let alive = touches_empty(board, &members);
        for m in members {
            seen[m.0 * size + m.1] = true;
            if !alive {
                dead.push(m);
            }
        }
    }
    dead.sort_unstable();
    dead
}

/// Remove all dead stones of `color` from a working board.
///
/// Returns the removed points; an empty result means nothing was captured.
pub fn remove_dead(board: &mut Board, color: Color) -> Vec<Point> {
    let dead = find_dead(board, color);
    for &pt in &dead {
        board.set(pt, None);
    }
    dead
}

/// Place a stone and resolve captures of the opposing color.
///
/// Returns the new board together with the captured points. The input board
/// is left untouched. Legality is not checked; see [`check_move`]. An
/// off-board point changes nothing.
pub fn place_with_captures(board: &Board, pt: Point, color: Color) -> (Board, Vec<Point>) {
    if !board.contains(pt) {
        return (board.clone(), Vec::new());
    }
    let mut next = board.clone();
    next.set(pt, Some(color));
    let captured = remove_dead(&mut next, color.opponent());
    (next, captured)
}

/// Place a stone and return the board after captures.
pub fn place(board: &Board, pt: Point, color: Color) -> Board {
    place_with_captures(board, pt, color).0
}

// =============================================================================
// Legality
// =============================================================================

/// Check whether `color` may play at `pt`.
///
/// The checks short-circuit in order: bounds, occupancy, immediate liberty,
/// suicide after captures, and finally ko against `history.previous`.
pub fn check_move(
    board: &Board,
    pt: Point,
    color: Color,
    history: &History<'_>,
) -> Result<(), MoveError> {
    if !board.contains(pt) {
        return Err(MoveError::OutOfBounds);
    }
    if board.get(pt).is_some() {
        return Err(MoveError::Occupied);
    }

    let mut test = board.clone();
    test.set(pt, Some(color));
    if has_liberty(&test, pt) {
        return Ok(());
    }

    remove_dead(&mut test, color.opponent());
    if !has_liberty(&test, pt) {
        return Err(MoveError::Suicide);
    }
    if history.captures_seen && test == *history.previous {
        return Err(MoveError::Ko);
    }
    Ok(())
}

pub fn is_legal(board: &Board, pt: Point, color: Color, history: &History<'_>) -> bool {
    check_move(board, pt, color, history).is_ok()
}

/// Proximity filter for search candidates.
///
/// When fewer than `threshold` points are empty, or the board is completely
/// empty, every point passes. Otherwise a point passes only if one of its
/// eight neighbors holds an opposing stone. This bounds the branching factor
/// in the opening; it is a pruning policy, not a rule of Go.
pub fn has_neighbour(board: &Board, pt: Point, color: Color, threshold: usize) -> bool {
    let empty = board.empty_count();
    if empty < threshold || empty == board.size() * board.size() {
        return true;
    }
    let opponent = Some(color.opponent());
    neighbors(pt, board.size())
        .chain(diagonal_neighbors(pt, board.size()))
        .any(|n| board.get(n) == opponent)
}

/// Legal moves for `color` in row-major order.
///
/// With `filter = Some(threshold)` the list is narrowed by [`has_neighbour`].
/// If the filter would reject every legal move, all legal moves are returned
/// so that a playable position is never mistaken for a terminal one.
pub fn candidate_moves(
    board: &Board,
    color: Color,
    history: &History<'_>,
    filter: Option<usize>,
) -> Vec<Point> {
    let legal: Vec<Point> = board
        .points()
        .filter(|&pt| is_legal(board, pt, color, history))
        .collect();
    let Some(threshold) = filter else {
        return legal;
    };
    let near: Vec<Point> = legal
        .iter()
        .copied()
        .filter(|&pt| has_neighbour(board, pt, color, threshold))
        .collect();
    if near.is_empty() { legal } else { near }
}

// =============================================================================
// Evaluation and scoring
// =============================================================================

/// Whether `pt` is an empty point owned by `color`.
///
/// Every on-board orthogonal neighbor must be a `color` stone; the board
/// edge counts as satisfied. Like an eyeish point, this may include false eyes.
pub fn is_territory(board: &Board, pt: Point, color: Color) -> bool {
    board.is_empty_at(pt) && neighbors(pt, board.size()).all(|n| board.get(n) == Some(color))
}

fn territory(board: &Board, color: Color) -> usize {
    board
        .points()
        .filter(|&pt| is_territory(board, pt, color))
        .count()
}

/// Static evaluation of `board` from `perspective`'s point of view.
///
/// Higher is better for `perspective`.
pub fn evaluate(board: &Board, perspective: Color, heuristic: Heuristic) -> f64 {
    let opponent = perspective.opponent();
    let material = board.count(perspective) as f64 - board.count(opponent) as f64;
    if heuristic == Heuristic::Material {
        return material;
    }

    let enclosed = territory(board, perspective) as f64 - territory(board, opponent) as f64;
    let mut score = material + TERRITORY_WEIGHT * enclosed;

    if heuristic == Heuristic::TerritoryLiberty && perspective == Color::White {
        let libs: usize = board
            .points()
            .filter(|&pt| board.get(pt) == Some(perspective))
            .map(|pt| liberties(board, pt))
            .sum();
        score += LIBERTY_BONUS * libs as f64;
    }
    score
}

/// Final score of `color`: stones on the board, plus komi for White.
pub fn score(board: &Board, color: Color) -> f64 {
    let stones = board.count(color) as f64;
    match color {
        Color::Black => stones,
        Color::White => stones + KOMI,
    }
}

/// Winner of a finished game. Komi is fractional, so there are no ties.
pub fn winner(board: &Board) -> Color {
    if score(board, Color::Black) > score(board, Color::White) {
        Color::Black
    } else {
        Color::White
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: [[u8; 5]; 5]) -> Board {
        Board::from_rows(&rows).unwrap()
    }

    fn sorted(mut v: Vec<Point>) -> Vec<Point> {
        v.sort_unstable();
        v
    }

    #[test]
    fn test_neighbors_edges_and_center() {
        assert_eq!(sorted(neighbors((0, 0), 5).collect()), vec![(0, 1), (1, 0)]);
        assert_eq!(
            sorted(neighbors((2, 2), 5).collect()),
            vec![(1, 2), (2, 1), (2, 3), (3, 2)]
        );
        assert_eq!(neighbors((4, 2), 5).count(), 3);
        assert_eq!(
            sorted(diagonal_neighbors((0, 4), 5).collect()),
            vec![(1, 3)]
        );
        assert_eq!(diagonal_neighbors((1, 1), 5).count(), 4);
    }

    #[test]
    fn test_group_follows_orthogonal_same_color() {
        let b = board([
            [1, 1, 0, 0, 0],
            [0, 1, 2, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        // (2,2) is only diagonally adjacent to (1,1).
        assert_eq!(sorted(group(&b, (0, 0))), vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(group(&b, (2, 2)), vec![(2, 2)]);
        assert_eq!(group(&b, (1, 2)), vec![(1, 2)]);
        assert!(group(&b, (5, 5)).is_empty());
    }

    #[test]
    fn test_has_liberty_and_liberties() {
        let b = board([
            [0, 0, 0, 0, 0],
            [0, 0, 2, 0, 0],
            [0, 2, 1, 2, 0],
            [0, 0, 2, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        assert!(!has_liberty(&b, (2, 2)));
        assert_eq!(liberties(&b, (2, 2)), 0);
        assert!(has_liberty(&b, (1, 2)));
        assert_eq!(liberties(&b, (1, 2)), 3);
        assert_eq!(liberties(&b, (0, 0)), 2);
    }

    #[test]
    fn test_final_encircling_stone_captures() {
        let b = board([
            [0, 0, 0, 0, 0],
            [0, 0, 2, 0, 0],
            [0, 2, 1, 0, 0],
            [0, 0, 2, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        assert!(has_liberty(&b, (2, 2)));
        let (after, captured) = place_with_captures(&b, (2, 3), Color::White);
        assert_eq!(captured, vec![(2, 2)]);
        assert_eq!(after.get((2, 2)), None);
        assert_eq!(after.get((2, 3)), Some(Color::White));
        // The input board is untouched.
        assert_eq!(b.get((2, 2)), Some(Color::Black));
        assert_eq!(b.get((2, 3)), None);
    }

    #[test]
    fn test_place_off_board_leaves_board_unchanged() {
        let empty = Board::new(5);
        let (after, captured) = place_with_captures(&empty, (0, 7), Color::Black);
        assert!(captured.is_empty());
        assert_eq!(after, empty);
        assert_eq!(after.get((1, 2)), None);
        assert_eq!(place(&empty, (7, 0), Color::White), empty);
    }

    #[test]
    fn test_find_dead_judges_all_groups_on_one_snapshot() {
        let b = board([
            [1, 2, 0, 2, 1],
            [2, 0, 0, 0, 2],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 1],
        ]);
        assert_eq!(find_dead(&b, Color::Black), vec![(0, 0), (0, 4)]);
        assert!(find_dead(&b, Color::White).is_empty());

        let mut work = b.clone();
        let removed = remove_dead(&mut work, Color::Black);
        assert_eq!(removed, vec![(0, 0), (0, 4)]);
        assert_eq!(work.count(Color::Black), 1);
        assert!(remove_dead(&mut work, Color::Black).is_empty());
    }

    #[test]
    fn test_corner_stone_with_one_liberty_is_legal() {
        let b = board([
            [0, 0, 0, 0, 0],
            [1, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        let history = History::new(&b, false);
        assert_eq!(check_move(&b, (0, 0), Color::White, &history), Ok(()));
        let (after, captured) = place_with_captures(&b, (0, 0), Color::White);
        assert!(captured.is_empty());
        assert_eq!(liberties(&after, (0, 0)), 1);
    }

    #[test]
    fn test_suicide_rejected() {
        let b = board([
            [0, 1, 0, 0, 0],
            [1, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        let history = History::new(&b, true);
        assert_eq!(
            check_move(&b, (0, 0), Color::White, &history),
            Err(MoveError::Suicide)
        );
        // Filling one's own eye with other liberties around is fine.
        assert!(is_legal(&b, (0, 0), Color::Black, &history));
    }

    #[test]
    fn test_capture_beats_suicide() {
        // White at (0,0) has no liberty of its own but captures (0,1).
        let b = board([
            [0, 1, 2, 0, 0],
            [1, 2, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        let history = History::new(&b, false);
        assert!(is_legal(&b, (0, 0), Color::White, &history));
        let after = place(&b, (0, 0), Color::White);
        assert_eq!(after.get((0, 1)), None);
    }

    #[test]
    fn test_bounds_and_occupancy() {
        let b = board([
            [1, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        let history = History::new(&b, false);
        assert_eq!(
            check_move(&b, (5, 0), Color::Black, &history),
            Err(MoveError::OutOfBounds)
        );
        assert_eq!(
            check_move(&b, (0, 0), Color::White, &history),
            Err(MoveError::Occupied)
        );
    }

    #[test]
    fn test_ko_only_after_a_capture() {
        // White's stone at (1,1) sits in atari; Black takes it at (1,2).
        let before = board([
            [0, 1, 2, 0, 0],
            [1, 2, 0, 2, 0],
            [0, 1, 2, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        let (after, captured) = place_with_captures(&before, (1, 2), Color::Black);
        assert_eq!(captured, vec![(1, 1)]);

        // Immediate retake would recreate `before`.
        assert_eq!(place(&after, (1, 1), Color::White), before);
        let armed = History::new(&before, true);
        assert_eq!(
            check_move(&after, (1, 1), Color::White, &armed),
            Err(MoveError::Ko)
        );
        let unarmed = History::new(&before, false);
        assert!(is_legal(&after, (1, 1), Color::White, &unarmed));
    }

    #[test]
    fn test_has_neighbour_filter() {
        let b = board([
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 2, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        assert!(has_neighbour(&b, (1, 1), Color::Black, 14));
        assert!(has_neighbour(&b, (3, 2), Color::Black, 14));
        assert!(!has_neighbour(&b, (0, 0), Color::Black, 14));
        // Nearly full boards skip the filter.
        assert!(has_neighbour(&b, (0, 0), Color::Black, 25));
        // So does the empty board.
        assert!(has_neighbour(&Board::new(5), (0, 0), Color::Black, 14));
    }

    #[test]
    fn test_candidate_moves_filtered_and_fallback() {
        let b = board([
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 2, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        let history = History::new(&b, false);
        assert_eq!(candidate_moves(&b, Color::Black, &history, None).len(), 24);
        let near = candidate_moves(&b, Color::Black, &history, Some(14));
        assert_eq!(near.len(), 8);
        assert_eq!(near[0], (1, 1));

        // White has no black stone to approach; the filter falls back to all moves.
        let all = candidate_moves(&b, Color::White, &history, Some(14));
        assert_eq!(all.len(), 24);
    }

    #[test]
    fn test_territory_counts_edges_as_walls() {
        let b = board([
            [0, 1, 0, 0, 0],
            [1, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        assert!(is_territory(&b, (0, 0), Color::Black));
        assert!(!is_territory(&b, (0, 0), Color::White));
        assert!(!is_territory(&b, (1, 1), Color::Black));
        assert!(!is_territory(&b, (0, 1), Color::Black));
    }

    #[test]
    fn test_evaluate_variants() {
        let b = board([
            [0, 1, 0, 0, 0],
            [1, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 2, 0],
            [0, 0, 0, 0, 0],
        ]);
        assert_eq!(evaluate(&b, Color::Black, Heuristic::Material), 1.0);
        assert_eq!(evaluate(&b, Color::White, Heuristic::Material), -1.0);
        assert_eq!(evaluate(&b, Color::Black, Heuristic::Territory), 1.5);
        assert_eq!(evaluate(&b, Color::White, Heuristic::Territory), -1.5);
        // Black gets no liberty bonus; White's lone stone has 4 liberties.
        assert_eq!(evaluate(&b, Color::Black, Heuristic::TerritoryLiberty), 1.5);
        let white = evaluate(&b, Color::White, Heuristic::TerritoryLiberty);
        assert!((white - (-1.5 + 0.4)).abs() < 1e-9);
    }

    #[test]
    fn test_opponent_territory_counts_against() {
        // Equal material; White encloses (0,0), Black encloses (4,4).
        let one_each = board([
            [0, 2, 0, 0, 0],
            [2, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 1],
            [0, 0, 0, 1, 0],
        ]);
        assert_eq!(evaluate(&one_each, Color::Black, Heuristic::Territory), 0.0);
        assert_eq!(evaluate(&one_each, Color::White, Heuristic::Territory), 0.0);

        // Only White encloses a point.
        let white_only = board([
            [0, 2, 0, 0, 0],
            [2, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 1],
            [0, 0, 1, 0, 0],
        ]);
        assert_eq!(evaluate(&white_only, Color::Black, Heuristic::Territory), -0.5);
        assert_eq!(
            evaluate(&white_only, Color::Black, Heuristic::TerritoryLiberty),
            -0.5
        );
    }

    #[test]
    fn test_evaluate_is_pure() {
        let b = board([
            [0, 1, 2, 0, 0],
            [1, 2, 0, 2, 0],
            [0, 1, 2, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 1],
        ]);
        let copy = b.clone();
        let first = evaluate(&b, Color::White, Heuristic::TerritoryLiberty);
        let second = evaluate(&b, Color::White, Heuristic::TerritoryLiberty);
        assert_eq!(first, second);
        assert_eq!(b, copy);
    }

    #[test]
    fn test_score_and_winner() {
        let b = board([
            [1, 1, 1, 0, 0],
            [1, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 2, 0],
            [0, 0, 0, 0, 0],
        ]);
        assert_eq!(score(&b, Color::Black), 4.0);
        assert_eq!(score(&b, Color::White), 3.5);
        assert_eq!(winner(&b), Color::Black);
        assert_eq!(winner(&Board::new(5)), Color::White);
    }

    #[test]
    fn test_heuristic_parse_roundtrip() {
        for h in [
            Heuristic::Material,
            Heuristic::Territory,
            Heuristic::TerritoryLiberty,
        ] {
            assert_eq!(h.to_string().parse::<Heuristic>(), Ok(h));
        }
        assert!("benson".parse::<Heuristic>().is_err());
    }
}
