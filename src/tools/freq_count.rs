use std::io::Read;

use log::debug;

use crate::bitstream::bitreader::BitReader;
use crate::huffman_coding::tree::ALPH_SIZE;

/// Returns a frequency count of every byte left in the reader, consuming it to the end.
/// The reader is not rewound.
pub fn freqs<R: Read>(br: &mut BitReader<R>) -> std::io::Result<[u64; ALPH_SIZE]> {
    let mut freqs = [0_u64; ALPH_SIZE];
    while let Some(byte) = br.byte()? {
        freqs[byte as usize] += 1;
    }
    debug!(
        "Counted {} bytes, {} distinct.",
        freqs.iter().sum::<u64>(),
        freqs.iter().filter(|&&f| f > 0).count()
    );
    Ok(freqs)
}
