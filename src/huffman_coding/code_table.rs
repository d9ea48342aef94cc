//! Turns a tree into a symbol -> code lookup for the encoder.

use std::fmt::{Display, Formatter};
use std::io::{self, Write};

use log::{debug, trace};
use rustc_hash::FxHashMap;

use super::tree::{HuffmanTree, Node, NodeData, Symbol};
use crate::bitstream::bitwriter::BitWriter;

/// The root-to-leaf path of one symbol. Each element is 0 (left) or 1 (right).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code {
    bits: Vec<u8>,
}

impl Code {
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }

    /// Put the code on the stream, up to 32 bits per write.
    pub fn write_to<W: Write>(&self, bw: &mut BitWriter<W>) -> io::Result<()> {
        for chunk in self.bits.chunks(32) {
            let value = chunk.iter().fold(0_u32, |acc, &bit| acc << 1 | bit as u32);
            bw.write_bits(chunk.len() as u8, value)?;
        }
        Ok(())
    }
}

impl Display for Code {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for bit in &self.bits {
            write!(f, "{}", bit)?;
        }
        Ok(())
    }
}

/// Symbol -> code for every leaf of a tree.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    codes: FxHashMap<Symbol, Code>,
}

impl CodeTable {
    /// Walk the tree from the root with an empty path, appending 0 for every left edge and 1 for
    /// every right edge. A tree that is a single leaf gives that leaf the empty code.
    pub fn from_tree(tree: &HuffmanTree) -> CodeTable {
        let mut codes = FxHashMap::default();
        let mut path = Vec::new();
        find_codes(&tree.root, &mut path, &mut codes);
        debug!("Generated {} codes.", codes.len());
        CodeTable { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Code)> {
        self.codes.iter()
    }

    /// Bits needed to encode the given byte counts plus one END_OF_STREAM. None if a counted
    /// byte has no code.
    pub fn payload_bits(&self, counts: &[u64]) -> Option<u64> {
        let mut total = self.get(Symbol::EndOfStream)?.len() as u64;
        for (byte, &count) in counts.iter().enumerate() {
            if count > 0 {
                total += count * self.get(Symbol::Byte(byte as u8))?.len() as u64;
            }
        }
        Some(total)
    }
}

/// Recursively walk the tree, recording the path to every leaf.
fn find_codes(node: &Node, path: &mut Vec<u8>, codes: &mut FxHashMap<Symbol, Code>) {
    match &node.node_data {
        NodeData::Leaf(sym) => {
            trace!("{:>12} -> {}", sym.to_string(), path.iter().map(|b| b.to_string()).collect::<String>());
            codes.insert(*sym, Code { bits: path.clone() });
        }
        NodeData::Kids(left, right) => {
            path.push(0);
            find_codes(left, path, codes);
            path.pop();
            path.push(1);
            find_codes(right, path, codes);
            path.pop();
        }
    }
}
