#![cfg_attr(not(test), no_std)]

pub mod direction;
pub mod sequence;

pub use direction::{Direction, InvalidOrdinal, ParseDirectionError};
pub use sequence::{BoundsError, CommandSequence};

/// The scripted maneuver the firmware plays back.
pub const DIRECTION_SEQUENCE: CommandSequence<'static> = CommandSequence::new(&[
    Direction::Right,
    Direction::Forward,
    Direction::Back,
    Direction::Left,
    Direction::Flip,
]);

/// Number of steps in [DIRECTION_SEQUENCE].
/// Used by the consumer to bound iteration over the plan.
pub const MAX_STATES_NUM: usize = DIRECTION_SEQUENCE.len();

// The firmware keeps the step count in a `uint8_t`.
const _: () = assert!(MAX_STATES_NUM <= u8::MAX as usize);
