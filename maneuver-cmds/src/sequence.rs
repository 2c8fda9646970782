use core::{fmt::Display, iter::Copied, ops::Index, slice::Iter};

use crate::Direction;

/// Tried to read a step that is not in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundsError {
    pub index: usize,
    pub len: usize,
}

impl Display for BoundsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "step {} is out of bounds for a sequence of {} steps",
            self.index, self.len
        )
    }
}

impl core::error::Error for BoundsError {}

/// An ordered, read-only plan of [Direction]s.
///
/// The length is always that of the backing slice,
/// so there is no separate count to keep in sync.
/// Which step is "current" is up to whoever plays the sequence back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandSequence<'a> {
    steps: &'a [Direction],
}

impl<'a> CommandSequence<'a> {
    pub const fn new(steps: &'a [Direction]) -> Self {
        Self { steps }
    }

    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the step at `index`,
    /// or [BoundsError] if `index` is not below [len](Self::len).
    pub fn get(&self, index: usize) -> Result<Direction, BoundsError> {
        self.steps.get(index).copied().ok_or(BoundsError {
            index,
            len: self.len(),
        })
    }

    pub fn first(&self) -> Option<Direction> {
        self.steps.first().copied()
    }

    pub fn last(&self) -> Option<Direction> {
        self.steps.last().copied()
    }

    pub fn iter(&self) -> Copied<Iter<'a, Direction>> {
        self.steps.iter().copied()
    }

    pub const fn as_slice(&self) -> &'a [Direction] {
        self.steps
    }
}

impl<'a> From<&'a [Direction]> for CommandSequence<'a> {
    fn from(steps: &'a [Direction]) -> Self {
        Self::new(steps)
    }
}

impl Index<usize> for CommandSequence<'_> {
    type Output = Direction;

    /// Panics when `index` is out of bounds, like slice indexing.
    /// Use [CommandSequence::get] for a checked read.
    fn index(&self, index: usize) -> &Self::Output {
        &self.steps[index]
    }
}

impl<'a> IntoIterator for &CommandSequence<'a> {
    type Item = Direction;
    type IntoIter = Copied<Iter<'a, Direction>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Writes the step names separated by `", "`,
/// the same way they appear inside the firmware's initializer list.
impl Display for CommandSequence<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
