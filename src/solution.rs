use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use petgraph::algo::connected_components;
use petgraph::graphmap::UnGraphMap;
use thiserror::Error;

use crate::location::Location;
use crate::puzzle::Puzzle;

/// Index of a colour pair in [`Puzzle::colours`].
pub type ColourId = usize;

/// Ways a [`Solution`] can fail to solve a [`Puzzle`].
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SolutionDefect {
    /// A traversable cell is left empty.
    #[error("cell {0} belongs to no colour")]
    Unowned(Location),
    /// A cell is claimed by two colours.
    #[error("cell {0} belongs to more than one colour")]
    Overlap(Location),
    /// A colour claims a hole or bridge hub.
    #[error("cell {0} cannot carry a path")]
    NotTraversable(Location),
    /// A colour is missing one of its own termini.
    #[error("colour {0} does not own both of its termini")]
    MissingTerminus(ColourId),
    /// A colour's cells are not one connected piece.
    #[error("colour {0} is split into several pieces")]
    Disconnected(ColourId),
    /// A colour's cells are connected but do not form a single path.
    #[error("colour {0} branches or loops at {1}")]
    NotSimple(ColourId, Location),
    /// The solution was made for a puzzle with a different number of colours.
    #[error("the solution has {found} colours but the puzzle has {expected}")]
    ColourCount { expected: usize, found: usize },
}

/// Cells owned by each colour.
///
/// During search this is the partial state of one branch; each branch owns its copy outright, so cloning is a deep copy.
/// Once the search succeeds, the same value is the answer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Solution {
    colours: Vec<HashSet<Location>>,
}

impl Solution {
    /// An empty solution for `colour_count` colours.
    pub fn new(colour_count: usize) -> Self {
        Self {
            colours: vec![HashSet::new(); colour_count],
        }
    }

    /// Assign `location` to `colour`. Colours beyond the declared count are ignored.
    pub fn add(&mut self, colour: ColourId, location: Location) {
        if let Some(cells) = self.colours.get_mut(colour) {
            cells.insert(location);
        }
    }

    /// `true` if any colour owns `location`.
    pub fn contains(&self, location: Location) -> bool {
        self.colours.iter().any(|cells| cells.contains(&location))
    }

    /// `true` if `colour` owns `location`.
    pub fn has_colour(&self, location: Location, colour: ColourId) -> bool {
        self.colours.get(colour).is_some_and(|cells| cells.contains(&location))
    }

    /// The colour owning `location`, if any.
    pub fn colour_of(&self, location: Location) -> Option<ColourId> {
        self.colours.iter().position(|cells| cells.contains(&location))
    }

    /// How many colours this solution was made for.
    pub fn colour_count(&self) -> usize {
        self.colours.len()
    }

    /// The cells owned by `colour`.
    pub fn cells_of(&self, colour: ColourId) -> Option<&HashSet<Location>> {
        self.colours.get(colour)
    }

    /// Every colour with its cells, in colour order.
    pub fn colours(&self) -> impl Iterator<Item = (ColourId, &HashSet<Location>)> {
        self.colours.iter().enumerate()
    }

    /// Flatten into a lookup from cell to owning colour.
    pub fn to_map(&self) -> HashMap<Location, ColourId> {
        self.colours()
            .flat_map(|(colour, cells)| cells.iter().map(move |location| (*location, colour)))
            .collect()
    }

    /// Check that this is a full solution of `puzzle`: every traversable cell is owned exactly once,
    /// and each colour's cells form one simple path between its termini.
    ///
    /// Adjacency follows the puzzle's topology, so cells separated by a wall are not neighbours.
    pub fn validate(&self, puzzle: &Puzzle) -> Result<(), SolutionDefect> {
        let topology = puzzle.topology();
        if self.colours.len() != puzzle.colours().len() {
            return Err(SolutionDefect::ColourCount { expected: puzzle.colours().len(), found: self.colours.len() });
        }

        let mut owners: HashMap<Location, ColourId> = HashMap::new();
        for (colour, cells) in self.colours() {
            for location in cells {
                if !topology.is_traversable(*location) {
                    return Err(SolutionDefect::NotTraversable(*location));
                }
                if owners.insert(*location, colour).is_some() {
                    return Err(SolutionDefect::Overlap(*location));
                }
            }
        }

        if let Some(location) = topology.traversable_positions().find(|location| !owners.contains_key(location)) {
            return Err(SolutionDefect::Unowned(location));
        }

        for (colour, (start, end)) in puzzle.colours().iter().enumerate() {
            let cells = &self.colours[colour];
            if !cells.contains(start) || !cells.contains(end) {
                return Err(SolutionDefect::MissingTerminus(colour));
            }

            let mut graph: UnGraphMap<Location, ()> = UnGraphMap::with_capacity(cells.len(), cells.len());
            for location in cells {
                graph.add_node(*location);
            }
            for location in cells {
                for (neighbour, _) in topology.neighbours(*location) {
                    if cells.contains(&neighbour) {
                        graph.add_edge(*location, neighbour, ());
                    }
                }
            }

            if connected_components(&graph) != 1 {
                return Err(SolutionDefect::Disconnected(colour));
            }

            // a simple path: the termini are its ends and everything else sits between exactly two cells
            let bad = cells.iter()
                .sorted()
                .find(|location| {
                    let degree = graph.neighbors(**location).count();
                    let is_terminus = *location == start || *location == end;
                    match (is_terminus, start == end) {
                        (_, true) => degree != 0,
                        (true, false) => degree != 1,
                        (false, false) => degree != 2,
                    }
                });
            if let Some(location) = bad {
                return Err(SolutionDefect::NotSimple(colour, *location));
            }
        }

        Ok(())
    }
}
