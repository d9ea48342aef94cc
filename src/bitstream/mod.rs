//! The bitstream module forms the I/O subsystem for huff.
//!
//! Huffman codes are not byte aligned, so everything after the input bytes themselves moves
//! through a bit-level reader or writer. Both are MSB-first: a multi-bit field is written
//! most significant bit first, and the final byte of a stream is padded with zero bits.
//!
//! The reader reports the end of its source with `None` rather than an error. Whether
//! running out of data is fine (the counting pass) or fatal (a header or payload) is for the
//! caller to decide.
//!
pub mod bitreader;
pub mod bitwriter;
