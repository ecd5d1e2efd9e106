#![warn(missing_docs)]

//! # `flowwalk`
//!
//! A solver for [Numberlink](https://en.wikipedia.org/wiki/Numberlink) puzzles as posited in the mobile game Flow Free and its expansions.
//! Begin by describing a board with a [`PuzzleBuilder`], convert it to a [`Puzzle`], then call [`solve()`](Puzzle::solve)
//! to get a [`Solution`] assigning every cell to a colour.
//!
//! Boards are rectangular grids of square cells. Walls may sit between any two cells, cells may be missing,
//! and edges of the board may be opened so that paths leave one side and reappear on the other.
//!
//! # Internals
//! The search grows each colour's path from both of its termini at once, one cell per move.
//! A node is first pushed as far as forced moves take it:
//! 1. An end with exactly one legal move must make it.
//! 2. An end with a move into a walled corner makes that move, since the corner could not be filled later.
//!
//! Once nothing is forced the search branches on every legal move of every end, after discarding moves that
//! leave a one-cell pocket against a wall or fold a path back alongside itself.
//! Branches are explored depth first from an explicit stack, polling a cancel flag between nodes.

pub use builder::{BuilderInvalidReason, PuzzleBuilder};
pub use location::{Dimension, Location};
pub use puzzle::Puzzle;
pub use shape::SquareStep;
pub use solution::{ColourId, Solution, SolutionDefect};
pub use solver::{SearchOptions, SearchStats, Solver, SolverFailure};
pub use topology::Topology;
pub use walls::Walls;

pub(crate) mod location;
pub(crate) mod walls;
pub mod shape;
pub(crate) mod topology;
pub(crate) mod cell;
pub(crate) mod puzzle;
pub(crate) mod solution;
pub mod builder;
pub(crate) mod moves;
pub(crate) mod prune;
pub mod solver;
