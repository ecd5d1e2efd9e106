//! Early rejection of moves that leave the board in a shape no solution can have.
//!
//! Both checks look only at straight lines out of the cell just entered, perpendicular to the move.
//! They were tuned on bordered square boards; on small toroidal boards a probe may wrap onto its own start.

use crate::location::Location;
use crate::moves::Move;
use crate::shape::SquareStep;
use crate::solution::{ColourId, Solution};
use crate::topology::Topology;

/// Free cells between `location` and the first wall in direction `step`,
/// or [`None`] if an occupied cell comes first.
///
/// A hole or bridge hub counts as a wall.
pub(crate) fn distance_to_wall(topology: &Topology, solution: &Solution, mut location: Location, step: SquareStep) -> Option<usize> {
    let limit = topology.extent_along(step);
    let mut distance = 0;
    loop {
        if topology.has_wall(location, step.wall()) {
            return Some(distance);
        }
        location = topology.step(location, step);
        if !topology.is_traversable(location) {
            return Some(distance);
        }
        distance += 1;
        if solution.contains(location) || distance >= limit {
            return None;
        }
    }
}

/// Steps from `location` in direction `step` to the nearest cell of `colour`.
///
/// [`None`] if a wall, a hole or a cell of another colour comes first.
pub(crate) fn distance_to_same_colour(
    topology: &Topology,
    solution: &Solution,
    colour: ColourId,
    mut location: Location,
    step: SquareStep,
) -> Option<usize> {
    let limit = topology.extent_along(step);
    let mut distance = 0;
    while distance < limit {
        if topology.has_wall(location, step.wall()) {
            return None;
        }
        location = topology.step(location, step);
        if !topology.is_traversable(location) {
            return None;
        }
        distance += 1;
        if let Some(owner) = solution.colour_of(location) {
            return (owner == colour).then_some(distance);
        }
    }
    None
}

/// Probes along an axis of one or two cells reach the same cells from both sides, and prove nothing.
fn is_too_short(topology: &Topology, step: SquareStep) -> bool {
    topology.extent_along(step) <= 2
}

/// `true` if `mv` runs into a wall beside a one-cell pocket that nothing could then fill.
pub(crate) fn creates_dead_end(topology: &Topology, solution: &Solution, mv: &Move) -> bool {
    let wall = mv.step.wall();
    if !topology.has_wall(mv.next, wall) {
        return false;
    }

    for side in mv.step.perpendicular() {
        if is_too_short(topology, side) {
            continue;
        }
        match distance_to_wall(topology, solution, mv.next, side) {
            Some(0) => return false,
            Some(1) => {
                let pocket = topology.step(mv.next, side);
                if topology.has_wall(pocket, wall) {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// `true` if `mv` doubles the path of `colour` back alongside itself.
pub(crate) fn creates_u_turn(topology: &Topology, solution: &Solution, colour: ColourId, mv: &Move) -> bool {
    let back = mv.step.invert();
    for side in mv.step.perpendicular() {
        if is_too_short(topology, side) {
            continue;
        }
        // beside the cell we came from
        let diagonal = topology.step(topology.step(mv.next, back), side);
        if solution.has_colour(diagonal, colour) {
            continue;
        }

        match distance_to_same_colour(topology, solution, colour, mv.next, side) {
            Some(1) => return true,
            Some(2) => {
                let further = topology.step(diagonal, side);
                if solution.has_colour(diagonal, colour) && solution.has_colour(further, colour) {
                    return true;
                }
            }
            Some(3) => {
                let this_side = diagonal;
                let other_side = topology.step(this_side, side);
                let facing = side.wall();
                if topology.walls_at(this_side).is_some_and(|walls| !walls.contains(facing))
                    && topology.walls_at(other_side).is_some_and(|walls| !walls.contains(side.invert().wall())) {
                    return true;
                }
            }
            Some(4) => {
                let ahead = topology.step(mv.next, mv.step);
                let apex = topology.step(topology.step(ahead, side), side);
                if !solution.contains(apex) {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// `true` if `mv`, already applied to `solution`, can be discarded without losing any solution.
pub(crate) fn creates_impossible_state(
    topology: &Topology,
    solution: &Solution,
    colour: ColourId,
    mv: &Move,
    u_turns: bool,
    dead_ends: bool,
) -> bool {
    (u_turns && creates_u_turn(topology, solution, colour, mv))
        || (dead_ends && creates_dead_end(topology, solution, mv))
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use super::*;
    use crate::walls::Walls;

    fn walled_grid(width: usize, height: usize) -> Topology {
        let mut topology = Topology::new((NonZero::new(width).unwrap(), NonZero::new(height).unwrap()));
        for x in 0..width {
            for y in 0..height {
                let mut walls = Walls::NONE;
                if x == 0 { walls |= Walls::LEFT; }
                if y == 0 { walls |= Walls::UP; }
                if x == width - 1 { walls |= Walls::RIGHT; }
                if y == height - 1 { walls |= Walls::DOWN; }
                topology.insert(Location(x, y), walls);
            }
        }
        topology
    }

    fn occupied(colours: &[&[Location]]) -> Solution {
        let mut solution = Solution::new(colours.len());
        for (colour, cells) in colours.iter().enumerate() {
            for location in *cells {
                solution.add(colour, *location);
            }
        }
        solution
    }

    #[test]
    fn wall_distance_stops_at_walls_and_paths() {
        let topology = walled_grid(5, 1);
        let solution = occupied(&[&[Location(0, 0)], &[Location(4, 0)]]);
        assert_eq!(distance_to_wall(&topology, &solution, Location(0, 0), SquareStep::Left), Some(0));
        assert_eq!(distance_to_wall(&topology, &solution, Location(0, 0), SquareStep::Right), None);

        let solution = occupied(&[&[Location(0, 0)]]);
        assert_eq!(distance_to_wall(&topology, &solution, Location(0, 0), SquareStep::Right), Some(4));
    }

    #[test]
    fn wall_distance_terminates_on_a_torus() {
        let mut topology = Topology::new((NonZero::new(3).unwrap(), NonZero::new(1).unwrap()));
        for x in 0..3 {
            topology.insert(Location(x, 0), Walls::NONE);
        }
        let solution = Solution::new(1);
        assert_eq!(distance_to_wall(&topology, &solution, Location(0, 0), SquareStep::Right), None);
        assert_eq!(distance_to_same_colour(&topology, &solution, 0, Location(0, 0), SquareStep::Left), None);
    }

    #[test]
    fn same_colour_distance_is_blocked_by_other_colours() {
        let topology = walled_grid(5, 1);
        let solution = occupied(&[&[Location(0, 0), Location(3, 0)], &[Location(4, 0)]]);
        assert_eq!(distance_to_same_colour(&topology, &solution, 0, Location(0, 0), SquareStep::Right), Some(3));
        assert_eq!(distance_to_same_colour(&topology, &solution, 1, Location(0, 0), SquareStep::Right), None);
        assert_eq!(distance_to_same_colour(&topology, &solution, 0, Location(0, 0), SquareStep::Left), None);
    }

    #[test]
    fn dead_end_beside_a_pocket() {
        // moving up into the top row at (1,0); (0,0) is then a pocket walled above and to the left
        let topology = walled_grid(4, 3);
        let mv = Move { next: Location(1, 0), previous: Location(1, 1), step: SquareStep::Up };
        let solution = occupied(&[&[Location(1, 1), Location(1, 0)]]);
        assert!(creates_dead_end(&topology, &solution, &mv));

        // hugging the left wall leaves no pocket
        let mv = Move { next: Location(0, 0), previous: Location(0, 1), step: SquareStep::Up };
        let solution = occupied(&[&[Location(0, 1), Location(0, 0)]]);
        assert!(!creates_dead_end(&topology, &solution, &mv));

        // no wall ahead
        let mv = Move { next: Location(1, 1), previous: Location(1, 2), step: SquareStep::Up };
        let solution = occupied(&[&[Location(1, 2), Location(1, 1)]]);
        assert!(!creates_dead_end(&topology, &solution, &mv));
    }

    #[test]
    fn u_turn_next_to_own_path() {
        let topology = walled_grid(4, 4);
        // path runs down column 0 from (0,0) to (0,2); the other end sits at (1,3)
        // moving right from (0,2) to (1,2) would touch the end from beside a cell that is not ours
        let solution = occupied(&[&[Location(0, 0), Location(0, 1), Location(0, 2), Location(1, 2), Location(1, 3)]]);
        let mv = Move { next: Location(1, 2), previous: Location(0, 2), step: SquareStep::Right };
        assert!(creates_u_turn(&topology, &solution, 0, &mv));

        // the same touch with our own cell on the diagonal is a tight turn, not a u-turn
        let solution = occupied(&[&[Location(0, 2), Location(0, 3), Location(1, 2), Location(1, 3)]]);
        let mv = Move { next: Location(1, 2), previous: Location(0, 2), step: SquareStep::Right };
        assert!(!creates_u_turn(&topology, &solution, 0, &mv));
    }

    #[test]
    fn u_turn_across_an_open_three_cell_gap() {
        let mut topology = walled_grid(6, 6);
        // heading right along row 1, our own path three cells below in column 1
        let solution = occupied(&[&[Location(0, 1), Location(1, 1), Location(1, 4)]]);
        let mv = Move { next: Location(1, 1), previous: Location(0, 1), step: SquareStep::Right };
        assert_eq!(distance_to_same_colour(&topology, &solution, 0, Location(1, 1), SquareStep::Down), Some(3));
        assert!(creates_u_turn(&topology, &solution, 0, &mv));

        // a wall across column 0 under (0,2) can close the gap
        topology.insert(Location(0, 2), Walls::LEFT | Walls::DOWN);
        topology.insert(Location(0, 3), Walls::LEFT | Walls::UP);
        assert!(!creates_u_turn(&topology, &solution, 0, &mv));
    }

    #[test]
    fn no_probes_across_a_two_cell_torus() {
        let mut topology = Topology::new((NonZero::new(2).unwrap(), NonZero::new(3).unwrap()));
        for x in 0..2 {
            for y in 0..3 {
                topology.insert(Location(x, y), Walls::NONE);
            }
        }
        // moving down beside our own end, which both sideways probes reach
        let solution = occupied(&[&[Location(0, 0), Location(0, 1), Location(1, 1)]]);
        let mv = Move { next: Location(0, 1), previous: Location(0, 0), step: SquareStep::Down };
        assert!(!creates_u_turn(&topology, &solution, 0, &mv));
        assert!(!creates_impossible_state(&topology, &solution, 0, &mv, true, true));

        // the same move on a wider board folds back alongside the path
        let topology = walled_grid(3, 3);
        assert!(creates_u_turn(&topology, &solution, 0, &mv));
    }

    #[test]
    fn u_turn_across_an_open_four_cell_gap() {
        let topology = walled_grid(6, 6);
        // heading right along row 1, our own path four cells below in column 1
        let solution = occupied(&[&[Location(0, 1), Location(1, 1), Location(1, 5)]]);
        let mv = Move { next: Location(1, 1), previous: Location(0, 1), step: SquareStep::Right };
        assert_eq!(distance_to_same_colour(&topology, &solution, 0, Location(1, 1), SquareStep::Down), Some(4));
        assert!(creates_u_turn(&topology, &solution, 0, &mv));

        // once the far corner (2,3) is taken the gap is no longer provably a trap
        let solution = occupied(&[&[Location(0, 1), Location(1, 1), Location(1, 5)], &[Location(2, 3)]]);
        assert!(!creates_u_turn(&topology, &solution, 0, &mv));
    }

    #[test]
    fn switches_select_checks() {
        let topology = walled_grid(4, 3);
        let mv = Move { next: Location(1, 0), previous: Location(1, 1), step: SquareStep::Up };
        let solution = occupied(&[&[Location(1, 1), Location(1, 0)]]);
        assert!(creates_impossible_state(&topology, &solution, 0, &mv, true, true));
        assert!(!creates_impossible_state(&topology, &solution, 0, &mv, true, false));
    }
}
