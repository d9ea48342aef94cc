use std::fs::{self, File};
use std::io::{self, Read, Write};

use log::{debug, info, trace, warn};

use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::{Error, Result, Section};
use crate::huffman_coding::header::read_header;
use crate::huffman_coding::tree::{HuffmanTree, NodeData, Symbol};
use crate::tools::cli::{HuffOpts, Output};

use super::{write_output, Report, HUFF_SUFFIX};

/// Suffix for decompressed files whose name did not end in HUFF_SUFFIX.
const OUT_SUFFIX: &str = ".out";

/// Decompress one stream from `input` onto `output`: validate the magic number, rebuild the
/// tree from the header, then decode until the END_OF_STREAM code. The writer is not flushed.
pub fn decompress<R: Read, W: Write>(
    input: &mut BitReader<R>,
    output: &mut BitWriter<W>,
) -> Result<Report> {
    let tree = read_header(input)?;
    let header_bits = input.bits_read();
    let bytes = decode_stream(input, &tree, output)?;

    let report = Report {
        uncompressed_bytes: bytes,
        header_bits,
        compressed_bits: input.bits_read(),
    };
    info!("{}", report);
    Ok(report)
}

/// Walk the tree one bit at a time: 0 goes left, 1 goes right. At a leaf, emit its byte and go
/// back to the root, or stop if the leaf is END_OF_STREAM. Returns the number of bytes written.
pub fn decode_stream<R: Read, W: Write>(
    input: &mut BitReader<R>,
    tree: &HuffmanTree,
    output: &mut BitWriter<W>,
) -> Result<u64> {
    let mut bytes = 0_u64;

    // A lone END_OF_STREAM root is an empty stream; its code has no bits.
    if tree.root.symbol() == Some(Symbol::EndOfStream) {
        debug!("Empty stream.");
        return Ok(bytes);
    }

    let mut node = &tree.root;
    loop {
        let bit = input.bit()?.ok_or(Error::Truncated(Section::Payload))?;
        node = match &node.node_data {
            NodeData::Kids(left, right) => {
                if bit == 0 {
                    left.as_ref()
                } else {
                    right.as_ref()
                }
            }
            // The cursor is reset to the root at every leaf, so this is a lone non-EOS root,
            // which the header reader rejects.
            NodeData::Leaf(sym) => {
                return Err(Error::MalformedHeader(format!(
                    "tree is a single leaf for {}",
                    sym
                )))
            }
        };
        match node.symbol() {
            Some(Symbol::EndOfStream) => break,
            Some(Symbol::Byte(byte)) => {
                output.out8(byte)?;
                bytes += 1;
                node = &tree.root;
            }
            None => {}
        }
    }
    trace!("End of stream found at {}.", input.loc());
    debug!("Decoded {} bytes.", bytes);
    Ok(bytes)
}

/// Decompress a buffer in memory.
pub fn decompress_slice(data: &[u8]) -> Result<Vec<u8>> {
    let mut br = BitReader::new(data);
    let mut bw = BitWriter::new(Vec::with_capacity(data.len() * 2));
    decompress(&mut br, &mut bw)?;
    Ok(bw.into_inner()?)
}

/// Name of the file a compressed file decompresses to.
pub fn output_name(input: &str) -> String {
    match input.strip_suffix(HUFF_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => format!("{}{}", input, OUT_SUFFIX),
    }
}

/// Decompress the input named in opts (or stdin) to the file or stdout the options select.
/// The input is opened before the output, and a failed run removes its output file.
pub fn decompress_file(opts: &HuffOpts) -> Result<Report> {
    let sink = match (&opts.output, &opts.file, &opts.out_file) {
        (Output::Stdout, _, _) | (_, None, None) => None,
        (_, _, Some(name)) => Some(name.clone()),
        (_, Some(name), None) => Some(output_name(name)),
    };

    let report = match &opts.file {
        Some(name) => {
            let mut br = BitReader::new(File::open(name)?);
            info!("Decompressing {}.", name);
            write_output(sink.as_deref(), opts.force_overwrite, |bw| {
                decompress(&mut br, bw)
            })?
        }
        None => write_output(sink.as_deref(), opts.force_overwrite, |bw| {
            decompress(&mut BitReader::new(io::stdin().lock()), bw)
        })?,
    };

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

/// Decode the input named in opts without writing anything, to check that it is intact.
pub fn test_file(opts: &HuffOpts) -> Result<Report> {
    let mut bw = BitWriter::new(io::sink());
    let report = match &opts.file {
        Some(name) => decompress(&mut BitReader::new(File::open(name)?), &mut bw)?,
        None => decompress(&mut BitReader::new(io::stdin().lock()), &mut bw)?,
    };
    info!(
        "{}: ok ({} bytes)",
        opts.file.as_deref().unwrap_or("(stdin)"),
        report.uncompressed_bytes
    );
    Ok(report)
}
