use std::fmt::{Display, Formatter};
use std::sync::atomic::AtomicBool;

use ndarray::Array2;

use crate::cell::Cell;
use crate::location::Location;
use crate::solution::{ColourId, Solution};
use crate::solver::{Solver, SolverFailure};
use crate::walls::Walls;
use crate::topology::Topology;

/// A Flow Free puzzle: a [`Topology`] and the ordered pairs of termini to connect.
/// The index of a pair is its colour.
///
/// [`Puzzle`]s are usually made with a [`PuzzleBuilder`](crate::builder::PuzzleBuilder).
/// Call [`solve()`](Self::solve) to search for a [`Solution`].
#[derive(Clone, Debug)]
pub struct Puzzle {
    pub(crate) name: String,
    pub(crate) subtitle: String,
    pub(crate) topology: Topology,
    pub(crate) colours: Vec<(Location, Location)>,
    pub(crate) colour_displays: Vec<char>,
    pub(crate) solution: Option<Solution>,
}

impl Puzzle {
    /// Assemble a puzzle from parts that have already been checked: every terminus must be a traversable cell of `topology`.
    ///
    /// Colours are drawn as `a`, `b`, `c`, ... in order.
    pub fn new(topology: Topology, colours: Vec<(Location, Location)>) -> Self {
        let colour_displays = (0..colours.len())
            .map(|colour| (b'a' + (colour % 26) as u8) as char)
            .collect();

        Self {
            name: String::new(),
            subtitle: String::new(),
            topology,
            colours,
            colour_displays,
            solution: None,
        }
    }

    /// Display name, empty unless one was given.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display subtitle, empty unless one was given.
    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    /// The cells and walls of the board.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Terminus pairs, indexed by [`ColourId`].
    pub fn colours(&self) -> &[(Location, Location)] {
        &self.colours
    }

    /// The solution shipped with the puzzle, if any. When present, solving returns it without searching.
    pub fn known_solution(&self) -> Option<&Solution> {
        self.solution.as_ref()
    }

    /// Solve with default [`SearchOptions`](crate::solver::SearchOptions), giving up once `cancel` is raised.
    ///
    /// See [`Solver::solve`] for the possible outcomes.
    pub fn solve(&self, cancel: &AtomicBool) -> Result<Solution, SolverFailure> {
        Solver::from(self).solve(cancel)
    }

    fn terminus_at(&self, location: Location) -> Option<ColourId> {
        self.colours.iter().position(|(start, end)| *start == location || *end == location)
    }

    fn to_array(&self, solution: Option<&Solution>) -> Array2<Cell> {
        let dims = self.topology.dims();
        Array2::from_shape_fn((dims.1.get(), dims.0.get()), |index| {
            let location = Location::from(index);
            match self.topology.walls_at(location) {
                None => Cell::Missing,
                Some(walls) if walls.contains(Walls::BRIDGE) => Cell::Bridge,
                Some(_) => match (self.terminus_at(location), solution.and_then(|s| s.colour_of(location))) {
                    (Some(colour), _) => Cell::Terminus { colour },
                    (None, Some(colour)) => Cell::Path { colour },
                    (None, None) => Cell::Empty,
                },
            }
        })
    }

    fn print(board: Array2<char>) -> String {
        let mut out = String::with_capacity(board.nrows() * (board.ncols() + 1));

        for row in board.rows() {
            for col in row {
                out.push(*col);
            }
            out.push('\n');
        }

        out
    }

    /// Draw the board one character per cell, with `solution` filled in if given.
    ///
    /// Termini are upper case, path cells lower case, bridge hubs `+`, empty cells `.` and holes a space.
    pub fn render(&self, solution: Option<&Solution>) -> String {
        Self::print(self.to_array(solution).map(|cell| cell.display(&self.colour_displays)))
    }
}

impl Display for Puzzle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(None))
    }
}
