//! Huffman coding over bytes.
//!
//! The tree is built bottom-up by repeatedly merging the two lightest nodes
//! and read top-down to assign codes: '0' for a left branch, '1' for a right
//! branch. Nodes live in a flat arena and refer to their children by index.

use crate::compression::code_table::CodeTable;
use crate::compression::entropy::FrequencyTable;
use crate::compression::{PrefixCoder, Result};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Represents a node in the Huffman tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuffmanNode {
    /// A leaf node contains a byte value and its frequency.
    Leaf { symbol: u8, freq: u64 },
    /// An internal node with the arena indices of its children and their combined frequency.
    Internal { freq: u64, left: usize, right: usize },
}

impl HuffmanNode {
    /// Returns the frequency of the node.
    pub fn freq(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { freq, .. } => *freq,
            HuffmanNode::Internal { freq, .. } => *freq,
        }
    }
}

/// A Huffman tree stored as an arena of nodes.
///
/// Leaves are created first, in ascending byte order, and every merge
/// appends one internal node, so an index is also the creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<HuffmanNode>,
    root: usize,
}

impl HuffmanTree {
    /// The root node
    pub fn root(&self) -> &HuffmanNode {
        &self.nodes[self.root]
    }

    /// Node at arena index `index`
    pub fn node(&self, index: usize) -> Option<&HuffmanNode> {
        self.nodes.get(index)
    }

    /// Number of leaves, i.e. distinct symbols
    pub fn leaf_count(&self) -> usize {
        (self.nodes.len() + 1) / 2
    }
}

/// Heap entry for a pending subtree.
/// We want the node with the smallest frequency to have highest priority,
/// and among equal frequencies the one created first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeRef {
    freq: u64,
    index: usize,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse: lower frequency, then lower index, should come first.
        other
            .freq
            .cmp(&self.freq)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Huffman prefix coder.
#[derive(Debug, Clone, Copy, Default)]
pub struct Huffman;

impl PrefixCoder for Huffman {
    fn code_table_for(&self, freq: &FrequencyTable) -> CodeTable {
        match build_huffman_tree(freq) {
            Some(tree) => build_code_table(&tree),
            None => CodeTable::new(),
        }
    }
}

/// Build a frequency table counting each byte of `input`.
pub fn build_frequency_table(input: &[u8]) -> FrequencyTable {
    FrequencyTable::from_data(input)
}

/// Build the Huffman tree given a frequency table.
/// Returns `None` if the frequency table is empty.
pub fn build_huffman_tree(freq_table: &FrequencyTable) -> Option<HuffmanTree> {
    let mut nodes = Vec::with_capacity(2 * freq_table.distinct());
    let mut heap = BinaryHeap::new();
    for (symbol, freq) in freq_table.symbols() {
        heap.push(NodeRef {
            freq,
            index: nodes.len(),
        });
        nodes.push(HuffmanNode::Leaf { symbol, freq });
    }
    // Combine nodes until only one tree remains.
    while heap.len() > 1 {
        let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
            break;
        };
        let freq = left.freq + right.freq;
        heap.push(NodeRef {
            freq,
            index: nodes.len(),
        });
        nodes.push(HuffmanNode::Internal {
            freq,
            left: left.index,
            right: right.index,
        });
    }
    let root = heap.pop()?.index;
    log::debug!(
        "built Huffman tree with {} nodes over {} symbols",
        nodes.len(),
        freq_table.distinct()
    );
    Some(HuffmanTree { nodes, root })
}

/// Build the code table mapping byte values to their Huffman codes.
///
/// If the tree consists of a single leaf (i.e. one unique symbol), the code "0" is assigned.
pub fn build_code_table(tree: &HuffmanTree) -> CodeTable {
    let mut table = CodeTable::new();
    build_code_table_helper(tree, tree.root, String::new(), &mut table);
    table
}

fn build_code_table_helper(tree: &HuffmanTree, index: usize, prefix: String, table: &mut CodeTable) {
    match tree.nodes[index] {
        HuffmanNode::Leaf { symbol, .. } => {
            let code = if prefix.is_empty() {
                "0".to_string()
            } else {
                prefix
            };
            table.insert_generated(symbol, code);
        }
        HuffmanNode::Internal { left, right, .. } => {
            let mut left_prefix = prefix.clone();
            left_prefix.push('0');
            build_code_table_helper(tree, left, left_prefix, table);
            let mut right_prefix = prefix;
            right_prefix.push('1');
            build_code_table_helper(tree, right, right_prefix, table);
        }
    }
}

/// Convenience function: builds the Huffman table from input, encodes the input,
/// and returns (encoded bit string, code table).
pub fn huffman_encode(input: &[u8]) -> Result<(String, CodeTable)> {
    Huffman.encode(input)
}

/// Convenience function: decodes an encoded bit string using the provided code table.
pub fn huffman_decode(encoded: &str, table: &CodeTable) -> Result<Vec<u8>> {
    Huffman.decode(encoded, table)
}
