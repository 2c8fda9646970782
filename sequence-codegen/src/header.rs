use itertools::Itertools;
use maneuver_cmds::{CommandSequence, Direction};

use crate::{
    parser::{find_declaration_span, parse_vocabulary},
    CodegenError,
};

/// Longest sequence the firmware can count in its `uint8_t MAX_STATES_NUM`.
pub const MAX_FIRMWARE_STEPS: usize = u8::MAX as usize;

/// Checks that the firmware can hold the sequence.
pub fn check_sequence(sequence: &CommandSequence<'_>) -> Result<(), CodegenError> {
    if sequence.is_empty() {
        return Err(CodegenError::EmptySequence);
    }
    if sequence.len() > MAX_FIRMWARE_STEPS {
        return Err(CodegenError::SequenceTooLong(sequence.len()));
    }
    Ok(())
}

/// `Direction_t direction_sequence[] = {RIGHT, FORWARD};`
pub fn render_declaration(sequence: &CommandSequence<'_>) -> String {
    format!("Direction_t direction_sequence[] = {{{}}};", sequence)
}

fn render_vocabulary() -> String {
    Direction::ALL
        .iter()
        .map(|d| format!("    {},\n", d.name()))
        .join("")
}

/// The whole `direction_sequence.hpp` for the given sequence.
///
/// The step count stays a `sizeof` expression so that hand edits
/// to the initializer list keep it correct.
pub fn render_header(sequence: &CommandSequence<'_>) -> String {
    format!(
        "#include <cstdint>\n\
         \n\
         typedef enum {{\n\
         {vocabulary}\
         }} Direction_t;\n\
         \n\
         {declaration}\n\
         \n\
         uint8_t MAX_STATES_NUM = sizeof(direction_sequence) / sizeof(direction_sequence[0]);\n",
        vocabulary = render_vocabulary(),
        declaration = render_declaration(sequence),
    )
}

/// Replaces the `direction_sequence[]` declaration in `header`,
/// leaving every other byte untouched.
/// Whatever the old initializer list holds is discarded.
pub fn splice_declaration(
    header: &str,
    sequence: &CommandSequence<'_>,
) -> Result<String, CodegenError> {
    check_sequence(sequence)?;
    let span = find_declaration_span(header)?;

    let mut out = String::with_capacity(header.len() + 16 * sequence.len());
    out.push_str(&header[..span.start]);
    out.push_str(&render_declaration(sequence));
    out.push_str(&header[span.end..]);
    Ok(out)
}

/// Checks that the header's `Direction_t` lists the same names
/// in the same order as [Direction], so the ordinals agree.
pub fn check_vocabulary(header: &str) -> Result<(), CodegenError> {
    let found = parse_vocabulary(header)?;
    let expected = Direction::ALL.map(Direction::name);

    if found.iter().map(String::as_str).eq(expected) {
        Ok(())
    } else {
        Err(CodegenError::VocabularyMismatch {
            expected: expected.join(", "),
            found: found.join(", "),
        })
    }
}
