//! Tools for the Stampfly firmware's `direction_sequence.hpp`:
//! turning editor block programs into direction sequences,
//! reading and rewriting the header, and keeping file access
//! inside the firmware tree.

pub mod block;
pub mod config;
mod error;
pub mod firmware;
pub mod header;
pub mod parser;

pub use error::CodegenError;
