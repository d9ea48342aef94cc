//! BitReader: the input half of the bit-level I/O layer.
//!
//! Reads a packed, MSB-first bitstream from any source that supports `read()`. Sources that
//! also support `seek()` can be rewound with `reset()`, which is what the two-pass compressor
//! uses between counting and encoding.
//!
use std::io::{self, Read, Seek, SeekFrom};

const BUFFER_SIZE: usize = 64 * 1024;

/// Reads a binary stream a few bits at a time.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    /// Index of the byte currently being read.
    cursor: usize,
    /// Bits already consumed from the byte at `cursor` (0-7).
    bit_index: usize,
    /// Total bits handed out since creation (or the last reset).
    consumed: u64,
    source: R,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader with a 64k buffer.
    pub fn new(source: R) -> Self {
        Self {
            buffer: Vec::with_capacity(BUFFER_SIZE),
            cursor: 0,
            bit_index: 0,
            consumed: 0,
            source,
        }
    }

    /// Check (and refill) the buffer. Returns false once the source is exhausted.
    fn have_data(&mut self) -> io::Result<bool> {
        if self.cursor < self.buffer.len() {
            return Ok(true);
        }
        self.buffer.resize(BUFFER_SIZE, 0);
        let size = loop {
            match self.source.read(&mut self.buffer) {
                Ok(size) => break size,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buffer.clear();
                    return Err(e);
                }
            }
        };
        self.buffer.truncate(size);
        self.cursor = 0;
        self.bit_index = 0;
        Ok(size > 0)
    }

    /// Return the next bit (1 or 0), or None if there is no more data to read.
    pub fn bit(&mut self) -> io::Result<Option<usize>> {
        self.bint(1)
    }

    /// Return the next `n` bits (n <= 32) as an unsigned value, most significant bit first,
    /// or None if the source runs out before `n` bits could be read.
    pub fn bint(&mut self, mut n: usize) -> io::Result<Option<usize>> {
        debug_assert!(n <= 32, "bint reads at most 32 bits at a time");
        let mut result = 0_usize;
        while n > 0 {
            if self.bit_index == 0 && !self.have_data()? {
                return Ok(None);
            }
            // Take as much as we can from the current byte
            let avail = 8 - self.bit_index;
            let take = n.min(avail);
            let byte = self.buffer[self.cursor] as usize;
            let bits = (byte >> (avail - take)) & ((1 << take) - 1);
            result = (result << take) | bits;

            self.bit_index += take;
            if self.bit_index == 8 {
                self.bit_index = 0;
                self.cursor += 1;
            }
            self.consumed += take as u64;
            n -= take;
        }
        Ok(Some(result))
    }

    /// Returns a byte, or None if there is no more data to read. Calls bint(8).
    pub fn byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.bint(8)?.map(|byte| byte as u8))
    }

    /// Number of bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.consumed
    }

    /// Debugging function. Report current position as bytes.bits.
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.consumed / 8, self.consumed % 8)
    }

    /// Give back the underlying source.
    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: Read + Seek> BitReader<R> {
    /// Reposition the source at its beginning and drop anything buffered.
    pub fn reset(&mut self) -> io::Result<()> {
        self.source.seek(SeekFrom::Start(0))?;
        self.buffer.clear();
        self.cursor = 0;
        self.bit_index = 0;
        self.consumed = 0;
        Ok(())
    }
}
