//! The huffman module holds the data model and the algorithms that do not touch the payload:
//! building a tree from byte counts, deriving codes from a tree, and writing or reading the
//! header that carries the tree from the compressor to the decompressor.
//!
//! - tree: symbols, nodes and the tree builder.
//! - code_table: symbol -> code lookup used by the encoder.
//! - header: magic numbers plus the tree and count headers.
//!
//! Huffman coding is inherently sequential and does not benefit from multithreading.
//!

pub mod code_table;
pub mod header;
pub mod tree;
