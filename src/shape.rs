//! Directions of travel between square cells.

use strum::VariantArray;

use crate::location::Location;
use crate::walls::Walls;

/// One step across a side of a square cell.
///
/// The declaration order (left, up, right, down) is the order in which directions are tried everywhere:
/// neighbour enumeration, move generation and the pruning probes.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum SquareStep {
    /// Towards smaller `x`.
    Left,
    /// Towards smaller `y`.
    Up,
    /// Towards larger `x`.
    Right,
    /// Towards larger `y`.
    Down,
}

impl SquareStep {
    /// The unit vector of this step, `(dx, dy)` with `y` growing downwards.
    pub fn offset(&self) -> (isize, isize) {
        match self {
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }

    /// The opposite step.
    pub fn invert(&self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
        }
    }

    /// The wall flag blocking this step out of a cell.
    pub fn wall(&self) -> Walls {
        match self {
            Self::Left => Walls::LEFT,
            Self::Up => Walls::UP,
            Self::Right => Walls::RIGHT,
            Self::Down => Walls::DOWN,
        }
    }

    /// The two directions at right angles to this one, in probing order.
    pub(crate) fn perpendicular(&self) -> [Self; 2] {
        match self {
            Self::Left | Self::Right => [Self::Down, Self::Up],
            Self::Up | Self::Down => [Self::Right, Self::Left],
        }
    }

    /// Determine the direction from `a` to `b`, ignoring any wraparound.
    ///
    /// Returns [`None`] unless the two locations are orthogonally adjacent.
    pub fn direction_to(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter()
            .find(|step| a.checked_offset(step.offset()) == Some(b))
            .copied()
    }
}
