//! Shannon-Fano coding.
//!
//! Symbols are sorted by decreasing frequency and the sorted list is split
//! where the two halves are closest in total weight. The first half gets a
//! '0' appended to its codes, the second half a '1', and each half is split
//! again until it holds a single symbol.
//!
//! The resulting code is prefix-free but, unlike Huffman coding, not always
//! optimal.

use crate::compression::code_table::CodeTable;
use crate::compression::entropy::FrequencyTable;
use crate::compression::{PrefixCoder, Result};

/// Shannon-Fano prefix coder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShannonFano;

impl PrefixCoder for ShannonFano {
    fn code_table_for(&self, freq: &FrequencyTable) -> CodeTable {
        build_code_table_from_frequencies(freq)
    }
}

/// Build the Shannon-Fano code table for the bytes of `data`.
pub fn build_code_table(data: &[u8]) -> CodeTable {
    build_code_table_from_frequencies(&FrequencyTable::from_data(data))
}

/// Build the Shannon-Fano code table for a frequency distribution.
///
/// Equal frequencies are ordered by ascending byte value. A single symbol
/// gets the code "0"; an empty table yields an empty code table.
pub fn build_code_table_from_frequencies(freq: &FrequencyTable) -> CodeTable {
    let mut symbols: Vec<(u8, u64)> = freq.symbols().collect();
    symbols.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut codes = vec![String::new(); symbols.len()];
    if symbols.len() == 1 {
        codes[0].push('0');
    }

    // Work stack of half-open ranges still to be split.
    let mut pending = vec![(0, symbols.len())];
    while let Some((start, end)) = pending.pop() {
        if end - start <= 1 {
            continue;
        }
        let split = start + split_index(&symbols[start..end]);
        for (i, code) in codes[start..end].iter_mut().enumerate() {
            code.push(if start + i <= split { '0' } else { '1' });
        }
        pending.push((split + 1, end));
        pending.push((start, split + 1));
    }

    let mut table = CodeTable::new();
    for ((symbol, _), code) in symbols.into_iter().zip(codes) {
        table.insert_generated(symbol, code);
    }
    log::debug!("built Shannon-Fano table with {} codes", table.len());
    table
}

/// Index of the last symbol of the first half: the first `i` minimizing
/// `|sum(0..=i) - sum(i+1..)|`.
///
/// With two or more positive counts the result always leaves both halves
/// non-empty.
fn split_index(symbols: &[(u8, u64)]) -> usize {
    let total: u64 = symbols.iter().map(|&(_, count)| count).sum();
    let mut cumulative = 0u64;
    let mut best = (u64::MAX, 0);
    for (i, &(_, count)) in symbols.iter().enumerate() {
        cumulative += count;
        let diff = cumulative.abs_diff(total - cumulative);
        if diff < best.0 {
            best = (diff, i);
        }
    }
    best.1
}

/// Build a Shannon-Fano table for `input` and encode it.
///
/// Returns the encoded bit string and the table needed to decode it.
pub fn shannon_fano_encode(input: &[u8]) -> Result<(String, CodeTable)> {
    ShannonFano.encode(input)
}

/// Decode a Shannon-Fano bit string with its code table.
pub fn shannon_fano_decode(encoded: &str, table: &CodeTable) -> Result<Vec<u8>> {
    ShannonFano.decode(encoded, table)
}
