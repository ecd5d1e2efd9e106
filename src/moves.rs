use itertools::Itertools;

use crate::location::Location;
use crate::shape::SquareStep;
use crate::solution::{ColourId, Solution};
use crate::topology::Topology;
use crate::walls::Walls;

/// A single-cell extension of one end of a colour's path.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Move {
    pub(crate) next: Location,
    pub(crate) previous: Location,
    pub(crate) step: SquareStep,
}

/// The two growing ends of one colour's path.
///
/// `head` is whichever end moved last; `end` is the one it is heading towards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ColourState {
    pub(crate) colour: ColourId,
    pub(crate) complete: bool,
    pub(crate) head: Location,
    pub(crate) end: Location,
}

impl ColourState {
    pub(crate) fn new(topology: &Topology, colour: ColourId, (start, end): (Location, Location)) -> Self {
        Self {
            colour,
            // termini placed side by side are already connected
            complete: start == end || topology.is_adjacent(start, end),
            head: start,
            end,
        }
    }

    fn is_end(&self, location: Location) -> bool {
        self.head == location || self.end == location
    }
}

/// Candidate moves out of one end of one colour.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ColourMoves {
    pub(crate) colour: ColourId,
    pub(crate) moves: Vec<Move>,
}

/// `true` if `location` touches a cell of `colour` other than `previous` and `end`.
fn has_same_colour_neighbour(
    topology: &Topology,
    solution: &Solution,
    location: Location,
    previous: Location,
    end: Location,
    colour: ColourId,
) -> bool {
    topology.neighbours(location).into_iter()
        .any(|(neighbour, _)| neighbour != previous && neighbour != end && solution.has_colour(neighbour, colour))
}

/// Legal one-step extensions from `head`, the end of `colour` that is not `end`.
///
/// A move may not enter an occupied cell, and may not enter a cell touching the colour's own path anywhere but at
/// `head` or `end`; such a cell would let the path short-circuit itself.
pub(crate) fn possible_moves(
    topology: &Topology,
    solution: &Solution,
    colour: ColourId,
    head: Location,
    end: Location,
) -> Vec<Move> {
    topology.neighbours(head).into_iter()
        .filter(|(neighbour, _)| !solution.contains(*neighbour))
        .filter(|(neighbour, _)| !has_same_colour_neighbour(topology, solution, *neighbour, head, end, colour))
        .map(|(next, step)| Move { next, previous: head, step })
        .collect_vec()
}

/// Moves out of both ends of every incomplete colour, head first.
pub(crate) fn all_possible_moves(topology: &Topology, solution: &Solution, colours: &[ColourState]) -> Vec<ColourMoves> {
    colours.iter()
        .filter(|state| !state.complete)
        .flat_map(|state| [
            ColourMoves { colour: state.colour, moves: possible_moves(topology, solution, state.colour, state.head, state.end) },
            ColourMoves { colour: state.colour, moves: possible_moves(topology, solution, state.colour, state.end, state.head) },
        ])
        .collect_vec()
}

/// `true` if `mv` steps into a cell walled straight ahead and on exactly one side: a right-angle corner with only one way on.
pub(crate) fn enters_corner(topology: &Topology, mv: &Move) -> bool {
    let Some(walls) = topology.walls_at(mv.next) else {
        return false;
    };
    if !walls.contains(mv.step.wall()) {
        return false;
    }

    let (a, b) = match mv.step {
        SquareStep::Up | SquareStep::Down => (Walls::LEFT, Walls::RIGHT),
        SquareStep::Left | SquareStep::Right => (Walls::UP, Walls::DOWN),
    };
    walls.contains(a) ^ walls.contains(b)
}

/// Among ends with a choice of moves, the first move of each that enters a corner.
pub(crate) fn corner_moves(topology: &Topology, colour_moves: &[ColourMoves]) -> Vec<(ColourId, Move)> {
    colour_moves.iter()
        .filter(|entry| entry.moves.len() > 1)
        .filter_map(|entry| entry.moves.iter()
            .find(|mv| enters_corner(topology, mv))
            .map(|mv| (entry.colour, *mv)))
        .collect_vec()
}

/// Extend `colour` by `mv`: the moved end becomes the head, the untouched end the target,
/// and the colour is complete once the new head reaches or touches the target.
pub(crate) fn make_move(
    topology: &Topology,
    solution: &mut Solution,
    colours: &mut [ColourState],
    colour: ColourId,
    mv: &Move,
) {
    solution.add(colour, mv.next);
    let state = &mut colours[colour];
    let other_end = if mv.previous == state.head { state.end } else { state.head };
    *state = ColourState {
        colour,
        complete: mv.next == other_end || topology.is_adjacent(mv.next, other_end),
        head: mv.next,
        end: other_end,
    };
}

/// `true` if `mv`, computed earlier in a propagation pass, can still be made after the moves applied since.
pub(crate) fn is_still_legal(solution: &Solution, colours: &[ColourState], colour: ColourId, mv: &Move) -> bool {
    let state = &colours[colour];
    !state.complete && state.is_end(mv.previous) && !solution.contains(mv.next)
}

#[cfg(test)]
mod tests {
    use std::num::NonZero;

    use super::*;

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

    #[test]
    fn moves_avoid_occupied_cells_and_self_contact() {
        let topology = walled_grid(3, 3);
        let mut solution = Solution::new(2);
        solution.add(0, Location(0, 0));
        solution.add(0, Location(2, 0));
        solution.add(0, Location(0, 1));
        solution.add(1, Location(1, 1));

        // head (0,1) came from (0,0); (0,2) is free and touches nothing of colour 0
        let moves = possible_moves(&topology, &solution, 0, Location(0, 1), Location(2, 0));
        assert_eq!(moves, vec![Move { next: Location(0, 2), previous: Location(0, 1), step: SquareStep::Down }]);

        // growing from (2,0) towards (0,1), (1,0) would touch (0,0), which is path but not an end
        let moves = possible_moves(&topology, &solution, 0, Location(2, 0), Location(0, 1));
        assert_eq!(moves.iter().map(|mv| mv.next).collect_vec(), vec![Location(2, 1)]);
    }

    #[test]
    fn moves_never_touch_own_body() {
        let topology = walled_grid(3, 3);
        let mut solution = Solution::new(1);
        for location in [Location(0, 0), Location(1, 0), Location(1, 1), Location(2, 2)] {
            solution.add(0, location);
        }

        // (0,1) touches (0,0), which is neither the head nor the target
        let moves = possible_moves(&topology, &solution, 0, Location(1, 1), Location(2, 2));
        assert_eq!(moves.iter().map(|mv| mv.next).collect_vec(), vec![Location(2, 1), Location(1, 2)]);
    }

    #[test]
    fn corners_need_a_wall_ahead_and_one_aside() {
        let topology = walled_grid(3, 3);
        let into_corner = Move { next: Location(2, 0), previous: Location(1, 0), step: SquareStep::Right };
        let into_edge = Move { next: Location(1, 0), previous: Location(1, 1), step: SquareStep::Up };
        let open = Move { next: Location(1, 1), previous: Location(0, 1), step: SquareStep::Right };
        assert!(enters_corner(&topology, &into_corner));
        assert!(!enters_corner(&topology, &into_edge));
        assert!(!enters_corner(&topology, &open));
    }

    #[test]
    fn make_move_swaps_ends_and_completes() {
        let topology = walled_grid(4, 1);
        let mut solution = Solution::new(1);
        solution.add(0, Location(0, 0));
        solution.add(0, Location(3, 0));
        let mut colours = vec![ColourState::new(&topology, 0, (Location(0, 0), Location(3, 0)))];
        assert!(!colours[0].complete);

        let mv = Move { next: Location(2, 0), previous: Location(3, 0), step: SquareStep::Left };
        make_move(&topology, &mut solution, &mut colours, 0, &mv);
        assert_eq!(colours[0], ColourState { colour: 0, complete: false, head: Location(2, 0), end: Location(0, 0) });

        let mv = Move { next: Location(1, 0), previous: Location(2, 0), step: SquareStep::Left };
        assert!(is_still_legal(&solution, &colours, 0, &mv));
        make_move(&topology, &mut solution, &mut colours, 0, &mv);
        assert!(colours[0].complete);
        assert!(!is_still_legal(&solution, &colours, 0, &mv));
        assert_eq!(solution.cells_of(0).map(|cells| cells.len()), Some(4));
    }

    #[test]
    fn adjacent_termini_start_complete() {
        let topology = walled_grid(2, 1);
        assert!(ColourState::new(&topology, 0, (Location(0, 0), Location(1, 0))).complete);
        let mut walled = walled_grid(2, 1);
        walled.insert(Location(0, 0), Walls::LEFT | Walls::UP | Walls::DOWN | Walls::RIGHT);
        assert!(!ColourState::new(&walled, 0, (Location(0, 0), Location(1, 0))).complete);
    }
}
