//! huff: a two-pass Huffman file compressor.
//!
//! Compressing reads the input twice. The first pass counts every byte value, the counts
//! become a Huffman tree, and the tree is written to the front of the output. The second
//! pass writes the code of every byte, followed by the code of an artificial END_OF_STREAM
//! symbol that tells the decompressor where the data stops.
//!
//! The compressed stream is self describing:
//!
//! | Field      | Width    | Meaning                                              |
//! |------------|----------|------------------------------------------------------|
//! | Magic      | 32 bits  | 0xface8200 (tree header) or 0xface8202 (count header) |
//! | Header     | variable | preorder tree, or 256 64-bit byte counts             |
//! | Payload    | variable | the code of every input byte, in order               |
//! | Terminator | variable | the END_OF_STREAM code, once                         |
//!
//! All fields are written most significant bit first; the last byte is padded with zeros.
//!
//! Basic usage from the command line:
//!
//! `$> huff notes.txt` creates notes.txt.hf and removes notes.txt.
//!
//! `$> huff -d notes.txt.hf` restores it.
//!
//! Basic usage as a library:
//!
//! ```
//! use huff::{compress_slice, decompress_slice, HeaderFormat};
//!
//! let packed = compress_slice(b"abracadabra", HeaderFormat::Tree)?;
//! assert_eq!(decompress_slice(&packed)?, b"abracadabra");
//! # Ok::<(), huff::Error>(())
//! ```
//!
#![warn(rust_2018_idioms)]

pub mod bitstream;
pub mod compression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use compression::compress::{compress, compress_file, compress_slice};
pub use compression::decompress::{decompress, decompress_file, decompress_slice, test_file};
pub use compression::Report;
pub use error::{Error, Result};
pub use huffman_coding::header::HeaderFormat;
pub use huffman_coding::tree::{HuffmanTree, Symbol};
