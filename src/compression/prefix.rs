//! Greedy decoding of prefix codes.
//!
//! The code table is inverted into a binary trie stored in a flat arena.
//! Decoding walks the trie one bit at a time and emits a symbol whenever a
//! leaf is reached, which is the same as accumulating bits until they spell
//! a known code.

use crate::compression::code_table::CodeTable;
use crate::error::{Error, Result};

const ROOT: usize = 0;

#[derive(Debug, Clone, Copy, Default)]
struct TrieNode {
    children: [Option<usize>; 2],
    symbol: Option<u8>,
}

impl TrieNode {
    fn is_leaf(&self) -> bool {
        self.children == [None, None]
    }
}

/// Decoder for the codes of a single [`CodeTable`].
#[derive(Debug, Clone)]
pub struct PrefixDecoder {
    nodes: Vec<TrieNode>,
}

impl PrefixDecoder {
    /// Build the decoding trie for `table`.
    ///
    /// Fails with [`Error::NotPrefixFree`] if any code is a prefix of (or
    /// equal to) another.
    pub fn new(table: &CodeTable) -> Result<Self> {
        let mut nodes = vec![TrieNode::default()];
        for (symbol, code) in table.iter() {
            let mut idx = ROOT;
            for (depth, bit) in code.bytes().enumerate() {
                if nodes[idx].symbol.is_some() {
                    return Err(Error::NotPrefixFree {
                        prefix: code[..depth].to_string(),
                        code: code.to_string(),
                    });
                }
                let branch = usize::from(bit == b'1');
                idx = match nodes[idx].children[branch] {
                    Some(next) => next,
                    None => {
                        nodes.push(TrieNode::default());
                        let next = nodes.len() - 1;
                        nodes[idx].children[branch] = Some(next);
                        next
                    }
                };
            }
            if nodes[idx].symbol.is_some() || !nodes[idx].is_leaf() {
                let longer = table
                    .iter()
                    .find(|&(other, c)| other != symbol && c.starts_with(code))
                    .map(|(_, c)| c.to_string())
                    .unwrap_or_default();
                return Err(Error::NotPrefixFree {
                    prefix: code.to_string(),
                    code: longer,
                });
            }
            nodes[idx].symbol = Some(symbol);
        }
        Ok(PrefixDecoder { nodes })
    }

    /// Decode every complete code in `bits`.
    ///
    /// Bits left over after the last complete code are treated as padding and
    /// dropped. A bit that leads outside the trie fails with
    /// [`Error::InvalidCode`].
    pub fn decode(&self, bits: &str) -> Result<Vec<u8>> {
        self.decode_symbols(bits, None)
    }

    /// Decode at most `count` symbols, ignoring whatever bits follow them.
    pub fn decode_n(&self, bits: &str, count: usize) -> Result<Vec<u8>> {
        self.decode_symbols(bits, Some(count))
    }

    fn decode_symbols(&self, bits: &str, limit: Option<usize>) -> Result<Vec<u8>> {
        let mut output = Vec::with_capacity(limit.unwrap_or(0));
        if limit == Some(0) {
            return Ok(output);
        }
        let mut idx = ROOT;
        let mut pending = 0usize;
        for (position, ch) in bits.chars().enumerate() {
            let branch = match ch {
                '0' => 0,
                '1' => 1,
                _ => return Err(Error::InvalidBit { ch, position }),
            };
            idx = self.nodes[idx].children[branch].ok_or(Error::InvalidCode { position })?;
            pending += 1;
            if let Some(symbol) = self.nodes[idx].symbol {
                output.push(symbol);
                idx = ROOT;
                pending = 0;
                if limit == Some(output.len()) {
                    return Ok(output);
                }
            }
        }
        if pending > 0 {
            log::trace!("dropped {} trailing bits after the last code", pending);
        }
        Ok(output)
    }
}
