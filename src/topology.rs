use itertools::Itertools;
use ndarray::Array2;
use strum::VariantArray;

use crate::location::{Coord, Dimension, Location};
use crate::shape::SquareStep;
use crate::walls::Walls;

/// Which cells of a board exist and which of their sides are walled.
///
/// Coordinates wrap modulo the board extents, so a board without border walls behaves as a torus.
/// Every query is total: asking about a location that is not part of the board answers "absent" or "no wall".
#[derive(Clone, Debug, PartialEq)]
pub struct Topology {
    // row major, None where there is no cell
    cells: Array2<Option<Walls>>,
    dims: (Dimension, Dimension),
}

impl Topology {
    /// An empty topology with extents `(width, height)`; no cells exist until [inserted](Self::insert).
    pub fn new(dims: (Dimension, Dimension)) -> Self {
        Self {
            cells: Array2::from_elem((dims.1.get(), dims.0.get()), None),
            dims,
        }
    }

    /// Declare the cell at `location` with the given flags, replacing any previous flags.
    /// Locations outside the extents are ignored.
    pub fn insert(&mut self, location: Location, walls: Walls) {
        if let Some(cell) = self.cells.get_mut(location.as_index()) {
            *cell = Some(walls);
        }
    }

    /// Delete the cell at `location`, leaving a hole.
    pub fn remove(&mut self, location: Location) {
        if let Some(cell) = self.cells.get_mut(location.as_index()) {
            *cell = None;
        }
    }

    /// Extents as `(width, height)`.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// The flags of the cell at `location`, if that cell exists.
    pub fn walls_at(&self, location: Location) -> Option<Walls> {
        self.cells.get(location.as_index()).copied().flatten()
    }

    /// `true` if the cell at `location` is part of the board.
    pub fn has_position(&self, location: Location) -> bool {
        self.walls_at(location).is_some()
    }

    /// `true` if the cell exists and is not a bridge hub, i.e. a path may occupy it.
    pub fn is_traversable(&self, location: Location) -> bool {
        self.walls_at(location).is_some_and(|walls| !walls.contains(Walls::BRIDGE))
    }

    /// `true` if the cell at `location` exists and carries every flag in `wall`.
    pub fn has_wall(&self, location: Location, wall: Walls) -> bool {
        self.walls_at(location).is_some_and(|walls| walls.contains(wall))
    }

    /// Reduce a signed coordinate pair into range, one axis at a time.
    pub fn normalize(&self, (x, y): (isize, isize)) -> Location {
        Location(
            x.rem_euclid(self.dims.0.get() as isize) as Coord,
            y.rem_euclid(self.dims.1.get() as isize) as Coord,
        )
    }

    /// The location one `step` away from `location`, wrapping at the extents. Walls are not consulted.
    pub fn step(&self, location: Location, step: SquareStep) -> Location {
        let (dx, dy) = step.offset();
        self.normalize((location.0 as isize + dx, location.1 as isize + dy))
    }

    /// Every traversable cell reachable from `location` in one step, with the step taken, in canonical order.
    /// A step that wraps straight back onto `location` is left out.
    pub fn neighbours(&self, location: Location) -> Vec<(Location, SquareStep)> {
        let Some(walls) = self.walls_at(location) else {
            return Vec::new();
        };

        SquareStep::VARIANTS.iter()
            .filter(|step| !walls.contains(step.wall()))
            .map(|step| (self.step(location, *step), *step))
            .filter(|(neighbour, _)| *neighbour != location && self.is_traversable(*neighbour))
            .collect_vec()
    }

    /// `true` if a path can step from `a` straight into `b`.
    pub fn is_adjacent(&self, a: Location, b: Location) -> bool {
        self.neighbours(a).iter().any(|(neighbour, _)| *neighbour == b)
    }

    /// Every declared cell, bridge hubs included, in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Location> + '_ {
        self.cells.indexed_iter()
            .filter(|(_, cell)| cell.is_some())
            .map(|(index, _)| Location::from(index))
    }

    /// Every cell a path may occupy, in row-major order.
    pub fn traversable_positions(&self) -> impl Iterator<Item = Location> + '_ {
        self.positions().filter(|location| self.is_traversable(*location))
    }

    /// The longest straight walk that can be taken in `step`'s axis before revisiting a cell.
    pub(crate) fn extent_along(&self, step: SquareStep) -> usize {
        match step {
            SquareStep::Left | SquareStep::Right => self.dims.0.get(),
            SquareStep::Up | SquareStep::Down => self.dims.1.get(),
        }
    }
}
