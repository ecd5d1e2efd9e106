//! The search driver and its options.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, trace};

use crate::location::Location;
use crate::moves::{all_possible_moves, corner_moves, is_still_legal, make_move, ColourMoves, ColourState};
use crate::prune::creates_impossible_state;
use crate::puzzle::Puzzle;
use crate::solution::{ColourId, Solution};

/// Reasons a [`Solver`] may fail.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SolverFailure {
    /// The cancel flag was raised before a solution was found.
    #[error("search interrupted before a solution was found")]
    Interrupted,
    /// Every branch was explored without success, i.e. the puzzle as stated is unsolvable.
    #[error("search exhausted without finding a solution")]
    Exhausted,
}

/// Which deductions and prunings the search may use.
///
/// The default enables everything. [`SearchOptions::exhaustive`] disables every shortcut that is not a plain
/// consequence of the rules, which is slower but never discards a solution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchOptions {
    /// Commit to a move into a walled corner even when the moving end has other choices.
    pub force_corners: bool,
    /// Reject moves that strand a one-cell pocket against a wall.
    pub prune_dead_ends: bool,
    /// Reject moves that fold a path back alongside itself.
    pub prune_u_turns: bool,
    /// Carry rejected `(colour, cell)` pairs down to the children of the node that rejected them.
    pub remember_rejections: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            force_corners: true,
            prune_dead_ends: true,
            prune_u_turns: true,
            remember_rejections: true,
        }
    }
}

impl SearchOptions {
    /// Every shortcut off: plain depth-first search over legal moves.
    pub fn exhaustive() -> Self {
        Self {
            force_corners: false,
            prune_dead_ends: false,
            prune_u_turns: false,
            remember_rejections: false,
        }
    }

    /// Set [`force_corners`](Self::force_corners).
    pub fn force_corners(mut self, enabled: bool) -> Self {
        self.force_corners = enabled;
        self
    }

    /// Set [`prune_dead_ends`](Self::prune_dead_ends).
    pub fn prune_dead_ends(mut self, enabled: bool) -> Self {
        self.prune_dead_ends = enabled;
        self
    }

    /// Set [`prune_u_turns`](Self::prune_u_turns).
    pub fn prune_u_turns(mut self, enabled: bool) -> Self {
        self.prune_u_turns = enabled;
        self
    }

    /// Set [`remember_rejections`](Self::remember_rejections).
    pub fn remember_rejections(mut self, enabled: bool) -> Self {
        self.remember_rejections = enabled;
        self
    }
}

/// Counters describing the work done by the last call to [`Solver::solve`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// Nodes taken off the stack.
    pub nodes: usize,
    /// Moves applied without branching.
    pub forced_moves: usize,
    /// Nodes abandoned because some end had nowhere to go.
    pub contradictions: usize,
    /// Child nodes pushed while branching.
    pub branches: usize,
    /// Moves discarded by the dead end and u-turn checks.
    pub pruned: usize,
    /// Moves skipped because an ancestor had already rejected them.
    pub memo_hits: usize,
}

/// One pending state on the search stack, owned outright.
struct Node {
    solution: Solution,
    colours: Vec<ColourState>,
    rejects: HashSet<(ColourId, Location)>,
}

/// Depth-first search for a [`Solution`] of one [`Puzzle`].
///
/// Each node is first pushed as far as forced moves take it; only when none remain does the search branch,
/// once per candidate move of every open end. The search runs on an explicit stack so the cancel flag can be
/// polled between nodes.
pub struct Solver<'a> {
    puzzle: &'a Puzzle,
    options: SearchOptions,
    stats: SearchStats,
}

impl<'a> From<&'a Puzzle> for Solver<'a> {
    fn from(puzzle: &'a Puzzle) -> Self {
        Self {
            puzzle,
            options: SearchOptions::default(),
            stats: SearchStats::default(),
        }
    }
}

impl Solver<'_> {
    /// Replace the [`SearchOptions`] used by [`solve`](Self::solve).
    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// The options this solver searches with.
    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Counters from the most recent [`solve`](Self::solve).
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    fn initial_node(&self) -> Node {
        let topology = self.puzzle.topology();
        let mut solution = Solution::new(self.puzzle.colours().len());
        let colours = self.puzzle.colours().iter()
            .enumerate()
            .map(|(colour, termini)| {
                solution.add(colour, termini.0);
                solution.add(colour, termini.1);
                ColourState::new(topology, colour, *termini)
            })
            .collect_vec();

        Node { solution, colours, rejects: HashSet::new() }
    }

    fn is_solved(&self, node: &Node) -> bool {
        node.colours.iter().all(|state| state.complete)
            && self.puzzle.topology().traversable_positions().all(|location| node.solution.contains(location))
    }

    /// Apply every forced move available in `node`, returning how many were made.
    fn apply_forced(&mut self, node: &mut Node, possible: &[ColourMoves]) -> usize {
        let puzzle = self.puzzle;
        let topology = puzzle.topology();
        let mut forced = possible.iter()
            .filter(|entry| entry.moves.len() == 1)
            .map(|entry| (entry.colour, entry.moves[0]))
            .collect_vec();
        if self.options.force_corners {
            forced.extend(corner_moves(topology, possible));
        }

        let mut made = 0;
        for (colour, mv) in forced {
            // an earlier move in this pass may have taken the cell or finished the colour
            if !is_still_legal(&node.solution, &node.colours, colour, &mv) {
                continue;
            }
            make_move(topology, &mut node.solution, &mut node.colours, colour, &mv);
            made += 1;
        }
        trace!(made, "forced pass");
        made
    }

    /// Push a child for every candidate move of `node` that survives pruning.
    fn branch(&mut self, node: Node, possible: Vec<ColourMoves>, stack: &mut Vec<Node>) {
        let puzzle = self.puzzle;
        let topology = puzzle.topology();
        let mut rejects = node.rejects.clone();
        let mut children = Vec::new();

        for ColourMoves { colour, moves } in possible {
            for mv in moves {
                if self.options.remember_rejections && rejects.contains(&(colour, mv.next)) {
                    self.stats.memo_hits += 1;
                    continue;
                }

                let mut solution = node.solution.clone();
                let mut colours = node.colours.clone();
                make_move(topology, &mut solution, &mut colours, colour, &mv);

                if creates_impossible_state(topology, &solution, colour, &mv, self.options.prune_u_turns, self.options.prune_dead_ends) {
                    trace!(colour, next = %mv.next, "pruned move");
                    self.stats.pruned += 1;
                    if self.options.remember_rejections {
                        rejects.insert((colour, mv.next));
                    }
                    continue;
                }
                children.push((solution, colours));
            }
        }

        self.stats.branches += children.len();
        stack.extend(children.into_iter()
            .map(|(solution, colours)| Node { solution, colours, rejects: rejects.clone() }));
    }

    /// Search for a solution, checking `cancel` before each node.
    ///
    /// Returns the first complete solution reached, [`SolverFailure::Interrupted`] once `cancel` is observed, or
    /// [`SolverFailure::Exhausted`] when no branch remains. A puzzle carrying its own solution returns it directly.
    pub fn solve(&mut self, cancel: &AtomicBool) -> Result<Solution, SolverFailure> {
        self.stats = SearchStats::default();
        if let Some(known) = self.puzzle.known_solution() {
            debug!(name = self.puzzle.name(), "using the solution supplied with the puzzle");
            return Ok(known.clone());
        }

        let puzzle = self.puzzle;
        let topology = puzzle.topology();
        debug!(name = self.puzzle.name(), colours = self.puzzle.colours().len(), options = ?self.options, "starting search");
        let mut stack = vec![self.initial_node()];

        loop {
            if cancel.load(Ordering::Relaxed) {
                debug!(stats = ?self.stats, pending = stack.len(), "search interrupted");
                return Err(SolverFailure::Interrupted);
            }
            let Some(mut node) = stack.pop() else {
                break;
            };
            self.stats.nodes += 1;
            trace!(node = self.stats.nodes, pending = stack.len(), "expanding");

            let possible = all_possible_moves(topology, &node.solution, &node.colours);
            if possible.iter().any(|entry| entry.moves.is_empty()) {
                self.stats.contradictions += 1;
                continue;
            }

            let forced = self.apply_forced(&mut node, &possible);
            self.stats.forced_moves += forced;

            if self.is_solved(&node) {
                debug!(stats = ?self.stats, "solved");
                return Ok(node.solution);
            }

            if forced > 0 {
                stack.push(node);
                continue;
            }

            self.branch(node, possible, &mut stack);
        }

        debug!(stats = ?self.stats, "search exhausted");
        Err(SolverFailure::Exhausted)
    }
}
