//! The Huffman tree: symbols, nodes, and the builder that merges weighted leaves into a tree.
//!
//! A built tree always holds exactly one `EndOfStream` leaf, so the decoder can find the end
//! of the payload without relying on the end of the underlying file.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::{Display, Formatter};

use log::{debug, trace};

/// Number of byte symbols.
pub const ALPH_SIZE: usize = 256;
/// Wire value of the end-of-stream symbol.
pub const END_OF_STREAM: u16 = ALPH_SIZE as u16;
/// Width of a symbol in the tree header. Covers 0-255 plus END_OF_STREAM.
pub const SYMBOL_BITS: u8 = 9;
/// A tree over 257 leaves can never be deeper than this.
pub const MAX_DEPTH: usize = ALPH_SIZE;

/// One of the 257 leaf values: a literal byte or the end-of-stream marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Byte(u8),
    EndOfStream,
}

impl Symbol {
    /// The 9-bit value used on the wire.
    pub fn value(self) -> u16 {
        match self {
            Symbol::Byte(b) => b as u16,
            Symbol::EndOfStream => END_OF_STREAM,
        }
    }

    /// Inverse of value(). None for anything above END_OF_STREAM.
    pub fn from_value(value: u16) -> Option<Symbol> {
        match value {
            0..=255 => Some(Symbol::Byte(value as u8)),
            END_OF_STREAM => Some(Symbol::EndOfStream),
            _ => None,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::Byte(b) if b.is_ascii_graphic() => write!(f, "{} ('{}')", b, *b as char),
            Symbol::Byte(b) => write!(f, "{}", b),
            Symbol::EndOfStream => write!(f, "EOS"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Kids(Box<Node>, Box<Node>),
    Leaf(Symbol),
}

/// A tree node. Weights are only meaningful on trees built from counts; trees read back
/// from a header carry 0 everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub weight: u64,
    pub node_data: NodeData,
}

impl Node {
    /// Create a new leaf
    pub fn leaf(symbol: Symbol, weight: u64) -> Node {
        Node {
            weight,
            node_data: NodeData::Leaf(symbol),
        }
    }

    /// Join two subtrees under a new parent. `left` is reached with a 0 bit.
    pub fn join(left: Node, right: Node) -> Node {
        Node {
            weight: left.weight + right.weight,
            node_data: NodeData::Kids(Box::new(left), Box::new(right)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node_data, NodeData::Leaf(_))
    }

    /// The symbol if this node is a leaf.
    pub fn symbol(&self) -> Option<Symbol> {
        match self.node_data {
            NodeData::Leaf(sym) => Some(sym),
            NodeData::Kids(..) => None,
        }
    }
}

/// A node waiting in the merge queue. Ordered so that BinaryHeap (a max-heap) pops the
/// lowest weight first, and among equal weights the earliest inserted.
struct Queued {
    weight: u64,
    seq: u32,
    node: Node,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// A complete Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: Node,
}

impl HuffmanTree {
    /// Build a tree from byte counts. Every byte with a non-zero count gets a leaf, and one
    /// END_OF_STREAM leaf of weight 1 is always added.
    ///
    /// The two lightest nodes are merged until one remains, the first one popped becoming the
    /// left child. Which of several equal-weight nodes is popped first is not part of the
    /// contract: callers must not depend on which of two equally frequent bytes ends up with
    /// the shorter code. For a given count table the result is the same on every run, which
    /// the count header depends on.
    pub fn from_counts(counts: &[u64; ALPH_SIZE]) -> HuffmanTree {
        let mut heap = BinaryHeap::with_capacity(ALPH_SIZE + 1);
        let mut seq = 0_u32;
        let mut push = |heap: &mut BinaryHeap<Queued>, node: Node| {
            heap.push(Queued {
                weight: node.weight,
                seq,
                node,
            });
            seq += 1;
        };

        for (byte, &count) in counts.iter().enumerate() {
            if count > 0 {
                push(&mut heap, Node::leaf(Symbol::Byte(byte as u8), count));
            }
        }
        push(&mut heap, Node::leaf(Symbol::EndOfStream, 1));
        debug!("Building a tree from {} leaves.", heap.len());

        // Pair off the two lightest nodes until only the root is left
        while heap.len() > 1 {
            if let (Some(left), Some(right)) = (heap.pop(), heap.pop()) {
                trace!("Merging weights {} and {}.", left.weight, right.weight);
                push(&mut heap, Node::join(left.node, right.node));
            }
        }

        // The END_OF_STREAM leaf guarantees the heap is never empty here
        let root = match heap.pop() {
            Some(queued) => queued.node,
            None => Node::leaf(Symbol::EndOfStream, 1),
        };
        HuffmanTree { root }
    }

    /// Number of leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            match &node.node_data {
                NodeData::Leaf(_) => 1,
                NodeData::Kids(left, right) => count(left) + count(right),
            }
        }
        count(&self.root)
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        fn depth(node: &Node) -> usize {
            match &node.node_data {
                NodeData::Leaf(_) => 0,
                NodeData::Kids(left, right) => 1 + depth(left).max(depth(right)),
            }
        }
        depth(&self.root)
    }

    /// The leaf symbols in preorder (left before right).
    pub fn symbols(&self) -> Vec<Symbol> {
        fn collect(node: &Node, out: &mut Vec<Symbol>) {
            match &node.node_data {
                NodeData::Leaf(sym) => out.push(*sym),
                NodeData::Kids(left, right) => {
                    collect(left, out);
                    collect(right, out);
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.root, &mut out);
        out
    }

    /// True when both trees have the same parent/child structure and the same symbol at every
    /// leaf. Weights are ignored.
    pub fn same_shape(&self, other: &HuffmanTree) -> bool {
        fn same(a: &Node, b: &Node) -> bool {
            match (&a.node_data, &b.node_data) {
                (NodeData::Leaf(x), NodeData::Leaf(y)) => x == y,
                (NodeData::Kids(al, ar), NodeData::Kids(bl, br)) => same(al, bl) && same(ar, br),
                _ => false,
            }
        }
        same(&self.root, &other.root)
    }
}
