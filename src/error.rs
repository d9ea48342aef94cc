//! Error types for huff.

use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::huffman_coding::tree::Symbol;

/// The part of a compressed stream that was being read when the input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Magic,
    Header,
    Payload,
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Section::Magic => write!(f, "magic number"),
            Section::Header => write!(f, "tree header"),
            Section::Payload => write!(f, "compressed data"),
        }
    }
}

/// Everything that can stop a compress or decompress call. None of these are retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream does not start with a known magic number.
    #[error("not a huff compressed stream (magic number {found:#010x})")]
    BadMagic { found: u32 },

    /// The input ended in the middle of a header or before the end-of-stream code.
    #[error("unexpected end of input in the {0}")]
    Truncated(Section),

    /// A byte showed up during encoding that the code table has no code for.
    #[error("no code for symbol {0} (counting and encoding passes disagree)")]
    MissingCode(Symbol),

    /// The header parsed but does not describe a usable tree.
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// The output file already exists and overwriting was not requested.
    #[error("output file {0} already exists (use --force to overwrite)")]
    OutputExists(String),

    /// An I/O error from the underlying reader or writer.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for huff operations.
pub type Result<T> = std::result::Result<T, Error>;
