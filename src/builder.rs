//! Fluent construction of [`Puzzle`]s.

use std::collections::{HashMap, HashSet};
use std::num::NonZero;

use itertools::Itertools;
use strum::VariantArray;
use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::location::{Dimension, Location};
use crate::puzzle::Puzzle;
use crate::shape::SquareStep;
use crate::solution::Solution;
use crate::topology::Topology;
use crate::walls::Walls;

/// Why a [`PuzzleBuilder`] refused a feature.
#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub enum BuilderInvalidReason {
    /// A feature referred to a cell outside the builder's dimensions.
    #[error("feature placed outside the board")]
    FeatureOutOfBounds,
    /// A warp was placed away from the border, or at a corner without an outward direction.
    #[error("warp placed off the border or pointing inwards")]
    WarpBadDirection,
    /// A terminus was placed on a cell that already holds one.
    #[error("two termini share a cell")]
    TerminusOverlap,
    /// A terminus and a hole or bridge hub were placed on the same cell.
    #[error("terminus placed on a cell no path can occupy")]
    TerminusNotTraversable,
}

/// A builder for rectangular puzzles with square cells, as found in Flow Free and its Bridges, Warps and Walls packs.
///
/// Every outer edge is walled unless opened with [`add_warp`](Self::add_warp) or [`wrap_around`](Self::wrap_around).
/// Feature calls chain on `&mut Self`; clone a builder to branch off a variant of a puzzle.
/// Once a builder is invalid, further feature calls do nothing.
#[derive(Clone)]
pub struct PuzzleBuilder {
    // width, height
    dims: (Dimension, Dimension),
    name: String,
    subtitle: String,
    termini: Vec<(Location, Location)>,
    colour_displays: Vec<char>,
    invalid_reasons: Vec<BuilderInvalidReason>,
    // walls
    edge_blacklist: HashSet<UnorderedPair<Location>>,
    extra_walls: HashMap<Location, Walls>,
    // holes
    location_blacklist: HashSet<Location>,
    bridges: HashSet<Location>,
    // warps, as border sides left open
    open_edges: HashSet<(Location, SquareStep)>,
    solution: Option<Solution>,
}

impl Default for PuzzleBuilder {
    fn default() -> Self {
        Self::with_dims((NonZero::<usize>::MIN.saturating_add(4), NonZero::<usize>::MIN.saturating_add(4)))
    }
}

impl PuzzleBuilder {
    /// An empty `width` by `height` board with every cell present.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            name: String::new(),
            subtitle: String::new(),
            termini: Default::default(),
            colour_displays: Default::default(),
            invalid_reasons: Default::default(),
            edge_blacklist: Default::default(),
            extra_walls: Default::default(),
            location_blacklist: Default::default(),
            bridges: Default::default(),
            open_edges: Default::default(),
            solution: None,
        }
    }

    #[inline]
    fn max_loc(&self) -> Location {
        Location(self.dims.0.get() - 1, self.dims.1.get() - 1)
    }

    #[inline]
    fn in_bounds(&self, location: Location) -> bool {
        location.0 < self.dims.0.get() && location.1 < self.dims.1.get()
    }

    fn is_terminus(&self, location: Location) -> bool {
        self.termini.iter().any(|(a, b)| *a == location || *b == location)
    }

    fn is_open_cell(&self, location: Location) -> bool {
        !self.location_blacklist.contains(&location) && !self.bridges.contains(&location)
    }

    /// Record `reason` if `condition` fails; `true` if the builder is still valid afterwards.
    fn check(&mut self, condition: bool, reason: BuilderInvalidReason) -> bool {
        if !condition {
            self.invalid_reasons.push(reason);
        }
        condition
    }

    /// Set the display name.
    pub fn named(&mut self, name: &str) -> &mut Self {
        self.name = name.to_owned();
        self
    }

    /// Set the display subtitle.
    pub fn subtitled(&mut self, subtitle: &str) -> &mut Self {
        self.subtitle = subtitle.to_owned();
        self
    }

    /// Add termini or "flow endpoints" for a new colour, drawn with `display`. The order in which `locations` are specified does not matter.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds),
    /// [`TerminusOverlap`](BuilderInvalidReason::TerminusOverlap) or
    /// [`TerminusNotTraversable`](BuilderInvalidReason::TerminusNotTraversable) invalid state.
    pub fn add_termini(&mut self, display: char, locations: (Location, Location)) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        for location in [locations.0, locations.1] {
            if !self.check(self.in_bounds(location), BuilderInvalidReason::FeatureOutOfBounds)
                || !self.check(!self.is_terminus(location), BuilderInvalidReason::TerminusOverlap)
                || !self.check(self.is_open_cell(location), BuilderInvalidReason::TerminusNotTraversable) {
                return self;
            }
        }
        if !self.check(locations.0 != locations.1, BuilderInvalidReason::TerminusOverlap) {
            return self;
        }

        self.colour_displays.push(display);
        self.termini.push(locations);
        self
    }

    /// Undo the last [`add_termini`](Self::add_termini). Does nothing when there are no termini.
    pub fn pop_termini(&mut self) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.termini.pop();
        self.colour_displays.pop();
        self
    }

    /// Turn the cell at `location` into a bridge hub: it is drawn, walls off its neighbours, and no path may enter it.
    pub fn add_bridge(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if self.check(self.in_bounds(location), BuilderInvalidReason::FeatureOutOfBounds)
            && self.check(!self.is_terminus(location), BuilderInvalidReason::TerminusNotTraversable) {
            self.bridges.insert(location);
        }
        self
    }

    /// Drop a location from the board, leaving a hole. Neighbouring cells are walled off from it.
    pub fn drop_location(&mut self, location: Location) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if self.check(self.in_bounds(location), BuilderInvalidReason::FeatureOutOfBounds)
            && self.check(!self.is_terminus(location), BuilderInvalidReason::TerminusNotTraversable) {
            self.location_blacklist.insert(location);
        }
        self
    }

    /// Wall off two orthogonally adjacent cells from each other.
    ///
    /// Pairs that are not adjacent are ignored without invalidating the builder.
    pub fn disconnect(&mut self, locations: UnorderedPair<Location>) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        for location in [locations.0, locations.1] {
            if !self.check(self.in_bounds(location), BuilderInvalidReason::FeatureOutOfBounds) {
                return self;
            }
        }

        if SquareStep::direction_to(locations.0, locations.1).is_some() {
            self.edge_blacklist.insert(locations);
        }
        self
    }

    /// Wall off `location` in each of `directions`. Steps leading off the board are already walled and are skipped.
    pub fn disconnect_around(&mut self, location: Location, directions: Vec<SquareStep>) -> &mut Self {
        for direction in directions.into_iter().unique() {
            if let Some(other) = location.checked_offset(direction.offset()).filter(|other| self.in_bounds(*other)) {
                self.disconnect(UnorderedPair::from((location, other)));
            }
        }
        self
    }

    /// OR raw flags onto the cell at `location`, as puzzle files describe cells.
    ///
    /// Flags are per cell: a wall set here is not mirrored onto the neighbour.
    pub fn add_walls(&mut self, location: Location, walls: Walls) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if self.check(self.in_bounds(location), BuilderInvalidReason::FeatureOutOfBounds) {
            *self.extra_walls.entry(location).or_default() |= walls;
        }
        self
    }

    /// Open the border side of `location` so that stepping through it lands on the facing cell of the opposite border.
    ///
    /// `direction` picks the side at a corner, where two border sides meet; elsewhere the side is implied and `direction` is ignored.
    /// A location off the border, or a corner without a matching outward `direction`, is a
    /// [`WarpBadDirection`](BuilderInvalidReason::WarpBadDirection).
    pub fn add_warp(&mut self, location: Location, direction: Option<SquareStep>) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !self.check(self.in_bounds(location), BuilderInvalidReason::FeatureOutOfBounds) {
            return self;
        }

        let max = self.max_loc();
        let outward = SquareStep::VARIANTS.iter()
            .filter(|step| match step {
                SquareStep::Left => location.0 == 0,
                SquareStep::Up => location.1 == 0,
                SquareStep::Right => location.0 == max.0,
                SquareStep::Down => location.1 == max.1,
            })
            .copied()
            .collect_vec();

        let edge = match (outward.as_slice(), direction) {
            ([only], _) => Some(*only),
            // a corner, or a board one cell across
            ([_, ..], Some(direction)) if outward.contains(&direction) => Some(direction),
            _ => None,
        };
        let Some(edge) = edge else {
            self.invalid_reasons.push(BuilderInvalidReason::WarpBadDirection);
            return self;
        };

        let partner = match edge {
            SquareStep::Left => Location(max.0, location.1),
            SquareStep::Up => Location(location.0, max.1),
            SquareStep::Right => Location(0, location.1),
            SquareStep::Down => Location(location.0, 0),
        };

        self.open_edges.insert((location, edge));
        self.open_edges.insert((partner, edge.invert()));
        self
    }

    /// Open every outer edge, making the board a torus.
    pub fn wrap_around(&mut self) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        let max = self.max_loc();
        for x in 0..=max.0 {
            self.open_edges.insert((Location(x, 0), SquareStep::Up));
            self.open_edges.insert((Location(x, max.1), SquareStep::Down));
        }
        for y in 0..=max.1 {
            self.open_edges.insert((Location(0, y), SquareStep::Left));
            self.open_edges.insert((Location(max.0, y), SquareStep::Right));
        }
        self
    }

    /// Ship a known solution with the puzzle; solving it will return this without searching.
    pub fn with_solution(&mut self, solution: Solution) -> &mut Self {
        self.solution = Some(solution);
        self
    }

    /// Every reason this builder was invalidated, or `None` while it is still valid.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    fn walls_of(&self, topology: &Topology, location: Location) -> Walls {
        let mut walls = self.extra_walls.get(&location).copied().unwrap_or_default();
        if self.bridges.contains(&location) {
            walls |= Walls::BRIDGE;
        }

        for step in SquareStep::VARIANTS {
            let inside = location.checked_offset(step.offset()).filter(|other| self.in_bounds(*other));
            let blocked = match inside {
                // off the board: walled unless a warp leads on
                None => !self.open_edges.contains(&(location, *step)),
                Some(other) => self.edge_blacklist.contains(&UnorderedPair::from((location, other))),
            };
            if blocked || !self.is_open_cell(topology.step(location, *step)) {
                walls |= step.wall();
            }
        }
        walls
    }

    /// Lay out walls from the features added so far and produce the [`Puzzle`], or the reasons this builder is invalid.
    pub fn build(&self) -> Result<Puzzle, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        let mut topology = Topology::new(self.dims);
        for x in 0..self.dims.0.get() {
            for y in 0..self.dims.1.get() {
                let location = Location(x, y);
                if !self.location_blacklist.contains(&location) {
                    topology.insert(location, self.walls_of(&topology, location));
                }
            }
        }

        Ok(Puzzle {
            name: self.name.clone(),
            subtitle: self.subtitle.clone(),
            topology,
            colours: self.termini.clone(),
            colour_displays: self.colour_displays.clone(),
            solution: self.solution.clone(),
        })
    }
}
