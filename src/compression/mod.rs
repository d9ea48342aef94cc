//! The compression module drives the two directions of huff.
//!
//! Compression happens in the following steps:
//! - Count: read the whole input once and count every byte value.
//! - Tree: merge the counted bytes (plus one END_OF_STREAM symbol) into a Huffman tree.
//! - Codes: walk the tree to find every symbol's code.
//! - Header: write the magic number and the tree (or the counts).
//! - Encode: rewind the input, write the code of every byte, then the END_OF_STREAM code.
//!
//! Decompression is the inverse: check the magic number, rebuild the tree from the header,
//! then follow the payload bits down the tree until END_OF_STREAM turns up.
//!
//! Both directions are single threaded and stop at the first error.
//!

pub mod compress;
pub mod decompress;

use std::fmt::{Display, Formatter};
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Write};

use log::{debug, warn};

use crate::bitstream::bitwriter::BitWriter;
use crate::error::{Error, Result};

/// Suffix added to compressed file names.
pub const HUFF_SUFFIX: &str = ".hf";

/// Sizes seen by one compress or decompress call. The fields mean the same in both
/// directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    /// Plain bytes: read when compressing, written when decompressing.
    pub uncompressed_bytes: u64,
    /// Magic number plus header, in bits.
    pub header_bits: u64,
    /// Compressed stream up to and including the END_OF_STREAM code, in bits: written when
    /// compressing, read when decompressing. The padding of the last byte is not counted.
    pub compressed_bits: u64,
}

impl Report {
    /// Compressed bytes per uncompressed byte, or None for empty input.
    pub fn ratio(&self) -> Option<f64> {
        if self.uncompressed_bytes == 0 {
            return None;
        }
        Some(self.compressed_bits.div_ceil(8) as f64 / self.uncompressed_bytes as f64)
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} bytes <-> {} bits ({} header bits)",
            self.uncompressed_bytes, self.compressed_bits, self.header_bits
        )?;
        if let Some(ratio) = self.ratio() {
            write!(f, ", ratio {:.3}", ratio)?;
        }
        Ok(())
    }
}

/// Open the output: the named file, or stdout when there is no name. An existing file is only
/// replaced when `force` is set.
pub(crate) fn create_output(name: Option<&str>, force: bool) -> Result<Box<dyn Write>> {
    match name {
        None => Ok(Box::new(io::stdout())),
        Some(name) => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .create_new(!force)
                .truncate(true)
                .open(name)
                .map_err(|e| match e.kind() {
                    io::ErrorKind::AlreadyExists => Error::OutputExists(name.to_string()),
                    _ => Error::Io(e),
                })?;
            Ok(Box::new(file))
        }
    }
}

/// Open the output and run `work` on it. If `work` or the final flush fails, a file opened
/// here is removed again so no partial output is left behind. Open the input before calling
/// this, so a missing input never touches the output.
pub(crate) fn write_output<F>(sink: Option<&str>, force: bool, work: F) -> Result<Report>
where
    F: FnOnce(&mut BitWriter<BufWriter<Box<dyn Write>>>) -> Result<Report>,
{
    let writer = create_output(sink, force)?;
    let mut bw = BitWriter::new(BufWriter::new(writer));
    let result = work(&mut bw).and_then(|report| {
        bw.flush()?;
        Ok(report)
    });
    if result.is_err() {
        drop(bw);
        if let Some(name) = sink {
            debug!("Removing partial output {}.", name);
            if let Err(e) = fs::remove_file(name) {
                warn!("Could not remove {}: {}", name, e);
            }
        }
    }
    result
}
