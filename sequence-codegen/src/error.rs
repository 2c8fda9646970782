use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("unknown block type `{0}`")]
    UnknownBlock(String),

    #[error("unknown direction `{0}`")]
    UnknownDirection(String),

    #[error("malformed direction list near `{0}`")]
    Syntax(String),

    #[error("no `direction_sequence[]` declaration found in the header")]
    DeclarationNotFound,

    #[error("no `Direction_t` enum found in the header")]
    VocabularyNotFound,

    #[error("header declares directions [{found}], expected [{expected}]")]
    VocabularyMismatch { expected: String, found: String },

    #[error("refusing to generate an empty sequence")]
    EmptySequence,

    #[error("sequence has {0} steps, the firmware can hold at most 255")]
    SequenceTooLong(usize),

    #[error("path `{}` is outside of the firmware directory", .0.display())]
    PathOutsideBase(PathBuf),

    #[error("I/O error on `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
