use core::{fmt::Display, str::FromStr};

use itertools::Itertools;
use maneuver_cmds::Direction;

use crate::CodegenError;

/// A block from the visual flight editor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockKind {
    TakeOff,
    Land,
    Forward1s,
    Right1s,
    Left1s,
    Back1s,
    Rotate,
}

impl BlockKind {
    pub const ALL: [BlockKind; 7] = [
        BlockKind::TakeOff,
        BlockKind::Land,
        BlockKind::Forward1s,
        BlockKind::Right1s,
        BlockKind::Left1s,
        BlockKind::Back1s,
        BlockKind::Rotate,
    ];

    /// The block type identifier used by the editor.
    pub const fn type_name(self) -> &'static str {
        match self {
            BlockKind::TakeOff => "take_off",
            BlockKind::Land => "land",
            BlockKind::Forward1s => "forward_1s",
            BlockKind::Right1s => "right_1s",
            BlockKind::Left1s => "left_1s",
            BlockKind::Back1s => "back_1s",
            BlockKind::Rotate => "rotate",
        }
    }

    /// The step this block adds to the firmware sequence.
    ///
    /// Take-off and landing are done by the firmware on its own,
    /// so those blocks add nothing.
    pub const fn direction(self) -> Option<Direction> {
        match self {
            BlockKind::TakeOff | BlockKind::Land => None,
            BlockKind::Forward1s => Some(Direction::Forward),
            BlockKind::Right1s => Some(Direction::Right),
            BlockKind::Left1s => Some(Direction::Left),
            BlockKind::Back1s => Some(Direction::Back),
            BlockKind::Rotate => Some(Direction::Flip),
        }
    }

    /// The C++ call the editor shows for this block.
    pub const fn statement(self) -> &'static str {
        match self {
            BlockKind::TakeOff => "take_off();",
            BlockKind::Land => "land();",
            BlockKind::Forward1s => "forward();",
            BlockKind::Right1s => "right();",
            BlockKind::Left1s => "left();",
            BlockKind::Back1s => "back();",
            BlockKind::Rotate => "flip();",
        }
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for BlockKind {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.type_name() == s)
            .ok_or_else(|| CodegenError::UnknownBlock(s.into()))
    }
}

/// Blocks as laid out in the editor workspace:
/// several top-level chains, each read top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockProgram {
    pub chains: Vec<Vec<BlockKind>>,
}

impl BlockProgram {
    /// Parses a textual program.
    ///
    /// Chains are separated by `;` or line breaks,
    /// blocks inside a chain by whitespace or commas.
    /// Empty chains are skipped.
    pub fn parse(input: &str) -> Result<Self, CodegenError> {
        let chains = input
            .split(|c: char| c == ';' || c == '\n')
            .map(|chain| {
                chain
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|word| !word.is_empty())
                    .map(str::parse::<BlockKind>)
                    .collect::<Result<Vec<_>, _>>()
            })
            .filter_ok(|chain| !chain.is_empty())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { chains })
    }

    pub fn blocks(&self) -> impl Iterator<Item = BlockKind> + '_ {
        self.chains.iter().flatten().copied()
    }

    /// The firmware sequence for this program, chain after chain.
    pub fn directions(&self) -> Vec<Direction> {
        self.blocks().filter_map(BlockKind::direction).collect()
    }

    /// One indented statement per block, like the editor's code preview.
    pub fn listing(&self) -> String {
        self.blocks()
            .map(|b| format!("  {}\n", b.statement()))
            .join("")
    }
}
