use std::io::{self, Write};

/// Bytes held in the output buffer before they are handed to the writer.
const BUFFER_SIZE: usize = 64 * 1024;

/// Writes a packed, MSB-first bitstream to any `Write` sink. Bits are queued in a u64 and
/// moved to the output buffer a byte at a time. Call flush() when done or the last partial
/// byte will be lost.
pub struct BitWriter<W: Write> {
    /// Output buffer used to write the bitstream.
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as bytes into the output buffer.
    queue: u64,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Total bits accepted so far, padding excluded.
    written: u64,
    /// Handle to the output stream
    writer: W,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter over the given sink.
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::with_capacity(BUFFER_SIZE),
            queue: 0,
            q_bits: 0,
            written: 0,
            writer,
        }
    }

    /// Move all full bytes from the queue to the output buffer, and the buffer to the
    /// writer when it is full.
    fn push_queue(&mut self) -> io::Result<()> {
        while self.q_bits > 7 {
            let byte = (self.queue >> (self.q_bits - 8)) as u8;
            self.output.push(byte); //push the packed byte out
            self.q_bits -= 8; //adjust the count of bits left in the queue
        }
        if self.output.len() >= BUFFER_SIZE {
            self.writer.write_all(&self.output)?;
            self.output.clear();
        }
        Ok(())
    }

    /// Append the `width` least significant bits of `value` (width <= 32), most significant
    /// bit first.
    pub fn write_bits(&mut self, width: u8, value: u32) -> io::Result<()> {
        debug_assert!(width <= 32, "write_bits takes at most 32 bits at a time");
        if width == 0 {
            return Ok(());
        }
        let mask = u64::MAX >> (64 - width as u32);
        self.queue <<= width; //shift queue by bit length
        self.queue |= value as u64 & mask; //add data portion to queue
        self.q_bits += width; //update depth of queue bits
        self.written += width as u64;
        self.push_queue()
    }

    /// Put a byte on the stream.
    pub fn out8(&mut self, data: u8) -> io::Result<()> {
        self.write_bits(8, data as u32)
    }

    /// Put a 32 bit word on the stream.
    pub fn out32(&mut self, data: u32) -> io::Result<()> {
        self.write_bits(32, data)
    }

    /// Number of bits written so far, not counting flush padding.
    pub fn bits_written(&self) -> u64 {
        self.written
    }

    /// Flushes the remaining bits (1-7) from the queue, padding with 0s in the least
    /// signficant bits, and hands everything buffered to the writer.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.q_bits > 0 {
            let pad = 8 - self.q_bits;
            self.queue <<= pad; //pad the queue with zeros
            self.q_bits += pad;
        }
        self.push_queue()?;
        self.writer.write_all(&self.output)?;
        self.output.clear();
        self.writer.flush()
    }

    /// Debugging function to return the number of bytes.bits output so far
    pub fn loc(&self) -> String {
        format!("[{}.{}]", self.written / 8, self.written % 8)
    }

    /// Flush and give back the underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}
