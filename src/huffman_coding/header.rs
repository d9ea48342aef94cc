//! Reads and writes the header that lets a decoder rebuild the encoder's tree.
//!
//! Every compressed stream starts with a 32 bit magic number that also says which kind of
//! header follows:
//! - tree header: the tree in preorder. An internal node is a 0 bit followed by its left and
//!   right subtrees; a leaf is a 1 bit followed by the 9 bit symbol.
//! - count header: the 256 byte counts, 64 bits each (high word first). The decoder rebuilds
//!   the tree from them exactly as the encoder did.
//!
//! The tree header is self delimiting and costs 10 bits per leaf plus 1 per internal node, so it
//! is the default.

use std::fmt::{Display, Formatter};
use std::io::{Read, Write};

use log::{debug, info};

use super::tree::{HuffmanTree, Node, NodeData, Symbol, ALPH_SIZE, MAX_DEPTH, SYMBOL_BITS};
use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter};
use crate::error::{Error, Result, Section};

pub const HUFF_NUMBER: u32 = 0xface8200;
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;
pub const HUFF_COUNTS: u32 = HUFF_NUMBER | 2;

/// Which header to write when compressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderFormat {
    #[default]
    Tree,
    Counts,
}

impl HeaderFormat {
    /// The magic number written for this header.
    pub fn magic(self) -> u32 {
        match self {
            HeaderFormat::Tree => HUFF_NUMBER,
            HeaderFormat::Counts => HUFF_COUNTS,
        }
    }

    /// Which header a magic number announces. HUFF_TREE is accepted as a tree header too.
    pub fn from_magic(magic: u32) -> Option<HeaderFormat> {
        match magic {
            HUFF_NUMBER | HUFF_TREE => Some(HeaderFormat::Tree),
            HUFF_COUNTS => Some(HeaderFormat::Counts),
            _ => None,
        }
    }
}

impl Display for HeaderFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Write the magic number and the chosen header. The count header needs the counts the tree
/// was built from.
pub fn write_header<W: Write>(
    format: HeaderFormat,
    tree: &HuffmanTree,
    counts: &[u64; ALPH_SIZE],
    bw: &mut BitWriter<W>,
) -> Result<()> {
    let start = bw.bits_written();
    bw.out32(format.magic())?;
    match format {
        HeaderFormat::Tree => write_tree(&tree.root, bw)?,
        HeaderFormat::Counts => write_counts(counts, bw)?,
    }
    info!(
        "Wrote a {} header of {} bits.",
        format,
        bw.bits_written() - start
    );
    Ok(())
}

/// Preorder: 0 + left + right for internal nodes, 1 + symbol for leaves.
pub fn write_tree<W: Write>(node: &Node, bw: &mut BitWriter<W>) -> Result<()> {
    match &node.node_data {
        NodeData::Leaf(sym) => {
            bw.write_bits(1, 1)?;
            bw.write_bits(SYMBOL_BITS, sym.value() as u32)?;
        }
        NodeData::Kids(left, right) => {
            bw.write_bits(1, 0)?;
            write_tree(left, bw)?;
            write_tree(right, bw)?;
        }
    }
    Ok(())
}

fn write_counts<W: Write>(counts: &[u64; ALPH_SIZE], bw: &mut BitWriter<W>) -> Result<()> {
    for &count in counts.iter() {
        bw.out32((count >> 32) as u32)?;
        bw.out32(count as u32)?;
    }
    Ok(())
}

/// Read the 32 bit magic number and report which header follows it.
pub fn read_magic<R: Read>(br: &mut BitReader<R>) -> Result<HeaderFormat> {
    let magic = br.bint(32)?.ok_or(Error::Truncated(Section::Magic))? as u32;
    HeaderFormat::from_magic(magic).ok_or(Error::BadMagic { found: magic })
}

/// Read the magic number and the header after it, and return the tree it describes.
pub fn read_header<R: Read>(br: &mut BitReader<R>) -> Result<HuffmanTree> {
    let format = read_magic(br)?;
    debug!("Found a {} header.", format);
    let tree = match format {
        HeaderFormat::Tree => read_tree(br)?,
        HeaderFormat::Counts => HuffmanTree::from_counts(&read_counts(br)?),
    };
    info!(
        "Read a tree with {} leaves ending at {}.",
        tree.leaf_count(),
        br.loc()
    );
    Ok(tree)
}

/// Parse a preorder tree (the part after the magic number) and check that it can drive the
/// decoder: symbols in range, no duplicates, one END_OF_STREAM leaf.
pub fn read_tree<R: Read>(br: &mut BitReader<R>) -> Result<HuffmanTree> {
    let mut seen = [false; ALPH_SIZE + 1];
    let root = read_node(br, 0, &mut seen)?;
    if !seen[ALPH_SIZE] {
        return Err(Error::MalformedHeader(
            "tree has no end-of-stream leaf".to_string(),
        ));
    }
    // A lone leaf is only valid for an empty stream, where it is END_OF_STREAM itself
    if let Some(sym) = root.symbol() {
        if sym != Symbol::EndOfStream {
            return Err(Error::MalformedHeader(format!(
                "tree is a single leaf for {}",
                sym
            )));
        }
    }
    Ok(HuffmanTree { root })
}

fn read_node<R: Read>(br: &mut BitReader<R>, depth: usize, seen: &mut [bool]) -> Result<Node> {
    if depth > MAX_DEPTH {
        return Err(Error::MalformedHeader(format!(
            "tree is deeper than {} levels",
            MAX_DEPTH
        )));
    }
    let truncated = || Error::Truncated(Section::Header);
    if br.bit()?.ok_or_else(truncated)? == 0 {
        let left = read_node(br, depth + 1, seen)?;
        let right = read_node(br, depth + 1, seen)?;
        return Ok(Node {
            weight: 0,
            node_data: NodeData::Kids(Box::new(left), Box::new(right)),
        });
    }

    let value = br.bint(SYMBOL_BITS as usize)?.ok_or_else(truncated)? as u16;
    let sym = Symbol::from_value(value).ok_or_else(|| {
        Error::MalformedHeader(format!("leaf value {} is not a symbol", value))
    })?;
    if seen[value as usize] {
        return Err(Error::MalformedHeader(format!(
            "symbol {} appears twice",
            sym
        )));
    }
    seen[value as usize] = true;
    Ok(Node::leaf(sym, 0))
}

/// Read the 256 counts. Their total plus the END_OF_STREAM weight becomes the root weight, so
/// it has to fit in a u64.
fn read_counts<R: Read>(br: &mut BitReader<R>) -> Result<[u64; ALPH_SIZE]> {
    let mut counts = [0_u64; ALPH_SIZE];
    let mut total = 1_u64;
    for count in counts.iter_mut() {
        let high = br.bint(32)?.ok_or(Error::Truncated(Section::Header))? as u64;
        let low = br.bint(32)?.ok_or(Error::Truncated(Section::Header))? as u64;
        *count = high << 32 | low;
        total = total.checked_add(*count).ok_or_else(|| {
            Error::MalformedHeader("byte counts add up to more than 64 bits".to_string())
        })?;
    }
    Ok(counts)
}

#[cfg(test)]
mod test {
    use super::*;

    fn counts_of(data: &[u8]) -> [u64; ALPH_SIZE] {
        let mut counts = [0_u64; ALPH_SIZE];
        data.iter().for_each(|&b| counts[b as usize] += 1);
        counts
    }

    fn header_bytes(format: HeaderFormat, data: &[u8]) -> (HuffmanTree, Vec<u8>) {
        let counts = counts_of(data);
        let tree = HuffmanTree::from_counts(&counts);
        let mut bw = BitWriter::new(Vec::new());
        write_header(format, &tree, &counts, &mut bw).unwrap();
        (tree, bw.into_inner().unwrap())
    }

    #[test]
    fn magic_numbers() {
        assert_eq!(HeaderFormat::from_magic(0xface8200), Some(HeaderFormat::Tree));
        assert_eq!(HeaderFormat::from_magic(0xface8201), Some(HeaderFormat::Tree));
        assert_eq!(HeaderFormat::from_magic(0xface8202), Some(HeaderFormat::Counts));
        assert_eq!(HeaderFormat::from_magic(0xface8203), None);
        assert_eq!(HeaderFormat::Tree.magic(), HUFF_NUMBER);
    }

    #[test]
    fn tree_header_bits() {
        // Root joins EOS (left, lighter) and 'A' (right)
        let (_, bytes) = header_bytes(HeaderFormat::Tree, b"AAAA");
        // magic, then 0 | 1 100000000 | 1 001000001, then padding
        assert_eq!(&bytes[..4], &[0xfa, 0xce, 0x82, 0x00]);
        assert_eq!(&bytes[4..], &[0b0110_0000, 0b0001_0010, 0b0000_1000]);
    }

    #[test]
    fn tree_header_shape_survives() {
        let data = b"she sells sea shells by the sea shore";
        let (tree, bytes) = header_bytes(HeaderFormat::Tree, data);
        let mut br = BitReader::new(bytes.as_slice());
        let back = read_header(&mut br).unwrap();
        assert!(back.same_shape(&tree));
        assert_eq!(back.root.weight, 0);
        assert_eq!(back.symbols(), tree.symbols());
    }

    #[test]
    fn count_header_survives() {
        let data = b"mississippi river";
        let (tree, bytes) = header_bytes(HeaderFormat::Counts, data);
        assert_eq!(bytes.len(), 4 + 256 * 8);
        let mut br = BitReader::new(bytes.as_slice());
        let back = read_header(&mut br).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn empty_input_header() {
        let (tree, bytes) = header_bytes(HeaderFormat::Tree, b"");
        assert_eq!(tree.leaf_count(), 1);
        let mut br = BitReader::new(bytes.as_slice());
        let back = read_header(&mut br).unwrap();
        assert_eq!(back.root.symbol(), Some(Symbol::EndOfStream));
    }

    #[test]
    fn bad_magic() {
        let bytes = [0xca_u8, 0xfe, 0xba, 0xbe, 0x00];
        let mut br = BitReader::new(bytes.as_slice());
        match read_header(&mut br) {
            Err(Error::BadMagic { found }) => assert_eq!(found, 0xcafebabe),
            other => panic!("expected BadMagic, got {:?}", other),
        }
    }

    #[test]
    fn short_magic() {
        let bytes = [0xfa_u8, 0xce];
        let mut br = BitReader::new(bytes.as_slice());
        assert!(matches!(
            read_header(&mut br),
            Err(Error::Truncated(Section::Magic))
        ));
    }

    #[test]
    fn truncated_tree() {
        let (_, bytes) = header_bytes(HeaderFormat::Tree, b"abcdefgh");
        let short = &bytes[..bytes.len() - 3];
        let mut br = BitReader::new(short);
        assert!(matches!(
            read_header(&mut br),
            Err(Error::Truncated(Section::Header))
        ));
    }

    #[test]
    fn truncated_counts() {
        let (_, bytes) = header_bytes(HeaderFormat::Counts, b"abc");
        let mut br = BitReader::new(&bytes[..100]);
        assert!(matches!(
            read_header(&mut br),
            Err(Error::Truncated(Section::Header))
        ));
    }

    #[test]
    fn count_overflow() {
        let mut bw = BitWriter::new(Vec::new());
        bw.out32(HUFF_COUNTS).unwrap();
        for byte in 0..ALPH_SIZE {
            let count = if byte < 2 { u64::MAX } else { 0 };
            bw.out32((count >> 32) as u32).unwrap();
            bw.out32(count as u32).unwrap();
        }
        let bytes = bw.into_inner().unwrap();
        let mut br = BitReader::new(bytes.as_slice());
        assert!(matches!(read_header(&mut br), Err(Error::MalformedHeader(_))));

        // A single huge count still leaves room for END_OF_STREAM
        let mut counts = [0_u64; ALPH_SIZE];
        counts[9] = u64::MAX - 1;
        let mut bw = BitWriter::new(Vec::new());
        write_counts(&counts, &mut bw).unwrap();
        let bytes = bw.into_inner().unwrap();
        let mut br = BitReader::new(bytes.as_slice());
        assert_eq!(read_counts(&mut br).unwrap(), counts);
    }

    /// Write a raw preorder description ('0' internal, digits as symbols) after the magic.
    fn raw_tree(leaves: &[Option<u16>]) -> Vec<u8> {
        let mut bw = BitWriter::new(Vec::new());
        bw.out32(HUFF_NUMBER).unwrap();
        for node in leaves {
            match node {
                None => bw.write_bits(1, 0).unwrap(),
                Some(v) => {
                    bw.write_bits(1, 1).unwrap();
                    bw.write_bits(SYMBOL_BITS, *v as u32).unwrap();
                }
            }
        }
        bw.into_inner().unwrap()
    }

    #[test]
    fn symbol_out_of_range() {
        let bytes = raw_tree(&[None, Some(300), Some(256)]);
        let mut br = BitReader::new(bytes.as_slice());
        assert!(matches!(read_header(&mut br), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn duplicate_symbol() {
        let bytes = raw_tree(&[None, None, Some(7), Some(7), Some(256)]);
        let mut br = BitReader::new(bytes.as_slice());
        assert!(matches!(read_header(&mut br), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn missing_eos() {
        let bytes = raw_tree(&[None, Some(1), Some(2)]);
        let mut br = BitReader::new(bytes.as_slice());
        assert!(matches!(read_header(&mut br), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn lone_byte_leaf() {
        let bytes = raw_tree(&[Some(65)]);
        let mut br = BitReader::new(bytes.as_slice());
        assert!(matches!(read_header(&mut br), Err(Error::MalformedHeader(_))));
    }

    #[test]
    fn too_deep() {
        let nodes = vec![None; MAX_DEPTH + 2];
        let bytes = raw_tree(&nodes);
        let mut br = BitReader::new(bytes.as_slice());
        assert!(matches!(read_header(&mut br), Err(Error::MalformedHeader(_))));
    }
}
