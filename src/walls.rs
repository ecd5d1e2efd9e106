use std::fmt::{Debug, Formatter};
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// The set of flags attached to a cell: which of its four sides are blocked, and whether it is a bridge hub.
///
/// Flags combine with `|` and are tested with [`Walls::contains`].
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct Walls(u8);

impl Walls {
    /// No flags at all.
    pub const NONE: Self = Self(0);
    /// The left side is blocked.
    pub const LEFT: Self = Self(1 << 0);
    /// The upper side is blocked.
    pub const UP: Self = Self(1 << 1);
    /// The right side is blocked.
    pub const RIGHT: Self = Self(1 << 2);
    /// The lower side is blocked.
    pub const DOWN: Self = Self(1 << 3);
    /// A hub cell: drawn, but never part of a path.
    pub const BRIDGE: Self = Self(1 << 4);

    const NAMED: [(Self, &'static str); 5] = [
        (Self::LEFT, "LEFT"),
        (Self::UP, "UP"),
        (Self::RIGHT, "RIGHT"),
        (Self::DOWN, "DOWN"),
        (Self::BRIDGE, "BRIDGE"),
    ];

    /// Interpret raw flag bits as written in puzzle files; unknown bits are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b1_1111)
    }

    /// The raw flag bits, as written in puzzle files.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// `true` if every flag set in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// `true` if no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Walls {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Walls {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Walls {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl Debug for Walls {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "NONE");
        }

        let names = Self::NAMED.iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>();
        write!(f, "{}", names.join(" | "))
    }
}
