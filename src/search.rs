//! Minimax search with alpha-beta pruning and iterative deepening.
//!
//! The searching side is MAX, its opponent is MIN. Each ply is a
//! [`GameNode`] that owns its board; children get fresh boards from
//! [`place_with_captures`], so siblings never share state.
//!
//! Iterative deepening runs full searches at depth 1, 2, ... and feeds the
//! principal path of one iteration to the next as a read-only ordering hint.
//! The wall-clock budget is checked between iterations only, so a single
//! deep iteration may overrun it.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::board::{Board, Color, Point};
use crate::constants::{
    DEFAULT_DEPTH, DEFAULT_TIME_BUDGET_MS, NEIGHBOUR_FILTER_THRESHOLD, SCORE_BOUND,
};
use crate::rules::{Heuristic, History, candidate_moves, evaluate, place_with_captures};

/// Runtime search settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Deepest iteration to run, in plies.
    pub max_depth: usize,
    /// Stop deepening once this much time has passed.
    pub time_budget: Duration,
    pub heuristic: Heuristic,
    /// Empty-point threshold for the proximity filter, `None` to disable it.
    pub neighbour_filter: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            time_budget: Duration::from_millis(DEFAULT_TIME_BUDGET_MS),
            heuristic: Heuristic::default(),
            neighbour_filter: Some(NEIGHBOUR_FILTER_THRESHOLD),
        }
    }
}

/// One ply of the search tree.
#[derive(Debug, Clone)]
pub struct GameNode {
    /// Board after `mv` was played
    pub board: Board,
    /// Color to move on `board`
    pub mover: Color,
    /// Move that produced this node (`None` at the root)
    pub mv: Option<Point>,
    /// Backed-up value from the root mover's perspective
    pub value: f64,
    /// Best child move, if any child was searched
    pub next: Option<Point>,
    /// Best line from this node's move down to the leaf
    pub path: Vec<Point>,
}

impl GameNode {
    pub fn new(board: Board, mover: Color, mv: Option<Point>) -> Self {
        Self {
            board,
            mover,
            mv,
            value: -SCORE_BOUND,
            next: None,
            path: Vec::new(),
        }
    }
}

/// Search counters, accumulated over all iterations of one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes visited
    pub nodes: u64,
    /// Nodes scored by the static evaluation
    pub leaves: u64,
    /// Alpha or beta cutoffs
    pub cutoffs: u64,
}

/// Result of a search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Move chosen at the deepest completed iteration, `None` if no move exists
    pub best_move: Option<Point>,
    pub value: f64,
    /// Deepest completed iteration
    pub depth: usize,
    /// Principal path starting with `best_move`
    pub principal_path: Vec<Point>,
    pub stats: SearchStats,
}

/// Per-call context that does not change the node itself.
#[derive(Clone, Copy)]
struct Frame<'a> {
    /// Board before the opponent's last move, for the ko check
    previous: &'a Board,
    captures_seen: bool,
    ply: usize,
    /// Whether every move so far followed the ordering hint
    on_pv: bool,
}

pub struct Searcher {
    config: SearchConfig,
    root_color: Color,
    hint: Vec<Point>,
    stats: SearchStats,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            root_color: Color::Black,
            hint: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Iterative deepening from `board` with `mover` to play.
    ///
    /// Returns the result of the deepest iteration that completed. With
    /// `max_depth == 0` no move is searched and the board is only evaluated.
    pub fn search(
        &mut self,
        board: &Board,
        mover: Color,
        history: &History<'_>,
    ) -> SearchOutcome {
        let start = Instant::now();
        self.reset(mover);

        let mut outcome = SearchOutcome {
            best_move: None,
            value: evaluate(board, mover, self.config.heuristic),
            depth: 0,
            principal_path: Vec::new(),
            stats: SearchStats::default(),
        };

        for depth in 1..=self.config.max_depth {
            let root = self.run_iteration(board, history, depth);
            debug!(
                depth,
                value = root.value,
                nodes = self.stats.nodes,
                cutoffs = self.stats.cutoffs,
                path = ?root.path,
                "iteration complete"
            );

            outcome = SearchOutcome {
                best_move: root.next,
                value: root.value,
                depth,
                principal_path: root.path.clone(),
                stats: self.stats.clone(),
            };
            self.hint = root.path;

            if root.next.is_none() {
                break;
            }
            if depth < self.config.max_depth && start.elapsed() >= self.config.time_budget {
                warn!(
                    depth,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "time budget spent, stopping iterative deepening"
                );
                break;
            }
        }
        outcome
    }

    /// A single search at exactly `depth` plies, without an ordering hint.
    pub fn search_fixed_depth(
        &mut self,
        board: &Board,
        mover: Color,
        history: &History<'_>,
        depth: usize,
    ) -> SearchOutcome {
        self.reset(mover);
        let root = self.run_iteration(board, history, depth);
        SearchOutcome {
            best_move: root.next,
            value: root.value,
            depth,
            principal_path: root.path,
            stats: self.stats.clone(),
        }
    }

    fn reset(&mut self, mover: Color) {
        self.root_color = mover;
        self.hint.clear();
        self.stats = SearchStats::default();
    }

    fn run_iteration(&mut self, board: &Board, history: &History<'_>, depth: usize) -> GameNode {
        let mut root = GameNode::new(board.clone(), self.root_color, None);
        let frame = Frame {
            previous: history.previous,
            captures_seen: history.captures_seen,
            ply: 0,
            on_pv: true,
        };
        self.alphabeta(&mut root, frame, depth, -SCORE_BOUND, SCORE_BOUND);
        root
    }

    /// Back up a value into `node`, searching `depth` more plies.
    fn alphabeta(
        &mut self,
        node: &mut GameNode,
        frame: Frame<'_>,
        depth: usize,
        mut alpha: f64,
        mut beta: f64,
    ) {
        self.stats.nodes += 1;
        let maximizing = node.mover == self.root_color;
        node.value = if maximizing { -SCORE_BOUND } else { SCORE_BOUND };
        node.next = None;
        node.path.clear();

        let mut moves = if depth == 0 {
            Vec::new()
        } else {
            let history = History::new(frame.previous, frame.captures_seen);
            candidate_moves(&node.board, node.mover, &history, self.config.neighbour_filter)
        };

        if moves.is_empty() {
            self.stats.leaves += 1;
            node.value = evaluate(&node.board, self.root_color, self.config.heuristic);
            node.path.extend(node.mv);
            return;
        }

        // Try the previous iteration's choice first while still on its line.
        let hinted = if frame.on_pv {
            self.hint.get(frame.ply).copied()
        } else {
            None
        };
        if let Some(h) = hinted {
            if let Some(i) = moves.iter().position(|&m| m == h) {
                let m = moves.remove(i);
                moves.insert(0, m);
            }
        }

        for mv in moves {
            let (board, captured) = place_with_captures(&node.board, mv, node.mover);
            let mut child = GameNode::new(board, node.mover.opponent(), Some(mv));
            let child_frame = Frame {
                previous: &node.board,
                captures_seen: frame.captures_seen || !captured.is_empty(),
                ply: frame.ply + 1,
                on_pv: hinted == Some(mv),
            };
            self.alphabeta(&mut child, child_frame, depth - 1, alpha, beta);

            let value = child.value;
            let better = if maximizing {
                value > node.value
            } else {
                value < node.value
            };
            if better {
                node.value = value;
                node.next = Some(mv);
                node.path = node.mv.into_iter().chain(child.path).collect();
            }

            if maximizing {
                if value >= beta {
                    self.stats.cutoffs += 1;
                    return;
                }
                alpha = alpha.max(value);
            } else {
                if value <= alpha {
                    self.stats.cutoffs += 1;
                    return;
                }
                beta = beta.min(value);
            }
        }
    }
}
