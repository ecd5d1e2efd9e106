use crate::solution::ColourId;

/// What a cell shows when a puzzle is drawn, optionally with a solution laid over it.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Cell {
    Terminus { colour: ColourId },
    Path { colour: ColourId },
    Bridge,
    #[default]
    Empty,
    /// Not part of the board at all.
    Missing,
}

impl Cell {
    pub(crate) fn display(&self, colour_displays: &[char]) -> char {
        let display_of = |colour: &ColourId| colour_displays.get(*colour).copied().unwrap_or('?');
        match self {
            Self::Terminus { colour } => display_of(colour).to_ascii_uppercase(),
            Self::Path { colour } => display_of(colour).to_ascii_lowercase(),
            Self::Bridge => '+',
            Self::Empty => '.',
            Self::Missing => ' ',
        }
    }
}
