use core::{fmt::Display, str::FromStr};

/// Enum represents a single maneuver primitive the drone can be told to do.
///
/// Discriminants follow the declaration order of `Direction_t` in the firmware
/// header, so the ordinal of each variant is also its value on the C++ side.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Direction {
    /// Fly forward for one step.
    Forward = 0,

    /// Fly to the right for one step.
    Right = 1,

    /// Fly to the left for one step.
    Left = 2,

    /// Fly backward for one step.
    Back = 3,

    /// Level flight.
    /// Part of the vocabulary, but not used by any scripted sequence.
    Normal = 4,

    /// Do a flip in place.
    Flip = 5,
}

impl Direction {
    /// Every direction, in ordinal order.
    pub const ALL: [Direction; 6] = [
        Direction::Forward,
        Direction::Right,
        Direction::Left,
        Direction::Back,
        Direction::Normal,
        Direction::Flip,
    ];

    /// The symbol the firmware uses for this direction.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Forward => "FORWARD",
            Direction::Right => "RIGHT",
            Direction::Left => "LEFT",
            Direction::Back => "BACK",
            Direction::Normal => "NORMAL",
            Direction::Flip => "FLIP",
        }
    }

    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Look a direction up by its firmware symbol.
    /// Matching is exact and case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseDirectionError;

impl Display for ParseDirectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("not a direction name")
    }
}

impl core::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or(ParseDirectionError)
    }
}

/// The value does not correspond to any [Direction].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidOrdinal(pub u8);

impl Display for InvalidOrdinal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} is not a direction ordinal", self.0)
    }
}

impl core::error::Error for InvalidOrdinal {}

impl TryFrom<u8> for Direction {
    type Error = InvalidOrdinal;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(InvalidOrdinal(value))
    }
}

impl From<Direction> for u8 {
    fn from(value: Direction) -> Self {
        value.ordinal()
    }
}
