use std::fs::{self, File};
use std::io::{self, Cursor, Read, Seek, Write};

use log::{debug, info, warn};

use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::{Error, Result};
use crate::huffman_coding::code_table::CodeTable;
use crate::huffman_coding::header::{write_header, HeaderFormat};
use crate::huffman_coding::tree::{HuffmanTree, Symbol};
use crate::tools::cli::{HuffOpts, Output};
use crate::tools::freq_count::freqs;

use super::{write_output, Report, HUFF_SUFFIX};

/*
    Compression is two passes over the input. The first pass counts bytes, the counts become a
    tree, the tree becomes a code table and a header. Then the input is rewound and read again,
    and every byte is replaced by its code. The END_OF_STREAM code closes the stream so the
    decoder never has to guess where the padding in the last byte starts.
*/

/// Compress everything in `input` onto `output` using the given header. The input must be
/// positioned at its start, since it is rewound to the start for the second pass.
/// The writer is not flushed.
pub fn compress<R: Read + Seek, W: Write>(
    input: &mut BitReader<R>,
    output: &mut BitWriter<W>,
    format: HeaderFormat,
) -> Result<Report> {
    let start = output.bits_written();

    let counts = freqs(input)?;
    let tree = HuffmanTree::from_counts(&counts);
    info!(
        "Built a tree with {} leaves, {} levels deep.",
        tree.leaf_count(),
        tree.depth()
    );
    let table = CodeTable::from_tree(&tree);
    write_header(format, &tree, &counts, output)?;
    let header_bits = output.bits_written() - start;

    input.reset()?;
    let bytes = encode_stream(input, &table, output)?;

    let report = Report {
        uncompressed_bytes: bytes,
        header_bits,
        compressed_bits: output.bits_written() - start,
    };
    info!("{}", report);
    Ok(report)
}

/// Replace every byte left in `input` by its code, then write the END_OF_STREAM code once.
/// Returns the number of bytes encoded.
pub fn encode_stream<R: Read, W: Write>(
    input: &mut BitReader<R>,
    table: &CodeTable,
    output: &mut BitWriter<W>,
) -> Result<u64> {
    let mut bytes = 0_u64;
    while let Some(byte) = input.byte()? {
        let sym = Symbol::Byte(byte);
        table
            .get(sym)
            .ok_or(Error::MissingCode(sym))?
            .write_to(output)?;
        bytes += 1;
    }
    table
        .get(Symbol::EndOfStream)
        .ok_or(Error::MissingCode(Symbol::EndOfStream))?
        .write_to(output)?;
    debug!("Encoded {} bytes, payload ends at {}.", bytes, output.loc());
    Ok(bytes)
}

/// Compress a buffer in memory.
pub fn compress_slice(data: &[u8], format: HeaderFormat) -> Result<Vec<u8>> {
    let mut br = BitReader::new(Cursor::new(data));
    let mut bw = BitWriter::new(Vec::with_capacity(data.len() / 2 + 64));
    compress(&mut br, &mut bw, format)?;
    Ok(bw.into_inner()?)
}

/// Compress the input named in opts (or stdin) to the file or stdout the options select.
/// The input is opened before the output, and a failed run removes its output file.
pub fn compress_file(opts: &HuffOpts) -> Result<Report> {
    let sink = match (&opts.output, &opts.file, &opts.out_file) {
        (Output::Stdout, _, _) | (_, None, None) => None,
        (_, _, Some(name)) => Some(name.clone()),
        (_, Some(name), None) => Some(format!("{}{}", name, HUFF_SUFFIX)),
    };

    let report = match &opts.file {
        Some(name) => {
            let mut br = BitReader::new(File::open(name)?);
            info!("Compressing {}.", name);
            write_output(sink.as_deref(), opts.force_overwrite, |bw| {
                compress(&mut br, bw, opts.header)
            })?
        }
        None => {
            // stdin cannot be rewound, so hold it in memory for the second pass
            let mut data = Vec::new();
            io::stdin().lock().read_to_end(&mut data)?;
            let mut br = BitReader::new(Cursor::new(data));
            write_output(sink.as_deref(), opts.force_overwrite, |bw| {
                compress(&mut br, bw, opts.header)
            })?
        }
    };

    if let Some(name) = &sink {
        info!("Wrote {}.", name);
    }
    if let (Some(name), Some(_)) = (&opts.file, &sink) {
        if !opts.keep_input_files {
            debug!("Removing {}.", name);
            if let Err(e) = fs::remove_file(name) {
                warn!("Could not remove {}: {}", name, e);
            }
        }
    }
    Ok(report)
}
