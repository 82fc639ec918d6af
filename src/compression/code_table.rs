//! Code tables and their canonical binary layout.
//!
//! A table maps byte values to codes written as strings of '0'/'1'. On disk
//! each entry is one record
//!
//! ```text
//! +--------+--------+---------------------------+
//! | symbol | length | length x ASCII '0' or '1' |
//! +--------+--------+---------------------------+
//! ```
//!
//! with no header and no terminator: the end of the stream ends the table.

use crate::compression::entropy::FrequencyTable;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};

/// Longest code the one-byte length field can describe.
pub const MAX_CODE_LENGTH: usize = u8::MAX as usize;

/// Mapping from byte value to its bit-string code, iterated in ascending
/// byte order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<u8, String>,
}

impl CodeTable {
    /// Create an empty code table
    pub fn new() -> Self {
        CodeTable {
            codes: BTreeMap::new(),
        }
    }

    /// Assign `code` to `symbol`, returning the code it replaces.
    ///
    /// The code must be non-empty, at most [`MAX_CODE_LENGTH`] bits long and
    /// made of '0'/'1' only.
    pub fn insert(&mut self, symbol: u8, code: impl Into<String>) -> Result<Option<String>> {
        let code = code.into();
        validate_code(symbol, &code)?;
        Ok(self.codes.insert(symbol, code))
    }

    /// Insert a code produced by one of the crate's own coders.
    pub(crate) fn insert_generated(&mut self, symbol: u8, code: String) {
        debug_assert!(validate_code(symbol, &code).is_ok());
        self.codes.insert(symbol, code);
    }

    /// Code assigned to `symbol`, if any
    pub fn get(&self, symbol: u8) -> Option<&str> {
        self.codes.get(&symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending byte order
    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.codes.iter().map(|(&symbol, code)| (symbol, code.as_str()))
    }

    /// Concatenate the codes of every byte of `data`.
    pub fn encode(&self, data: &[u8]) -> Result<String> {
        let mut bits = String::new();
        for &byte in data {
            let code = self.get(byte).ok_or(Error::UnknownSymbol(byte))?;
            bits.push_str(code);
        }
        Ok(bits)
    }

    /// True when no code is a prefix of another code.
    pub fn is_prefix_free(&self) -> bool {
        let mut codes: Vec<&str> = self.codes.values().map(String::as_str).collect();
        codes.sort_unstable();
        // In lexicographic order a prefix sorts directly before some code it prefixes.
        codes.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }

    /// Average code length in bits per symbol under the distribution `freq`.
    ///
    /// Symbols without a code are ignored.
    pub fn expected_length(&self, freq: &FrequencyTable) -> f64 {
        if freq.total() == 0 {
            return 0.0;
        }
        let bits: u64 = freq
            .symbols()
            .filter_map(|(symbol, count)| self.get(symbol).map(|code| count * code.len() as u64))
            .sum();
        bits as f64 / freq.total() as f64
    }

    /// Write the table in the record layout.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&serialize(self))?;
        Ok(())
    }

    /// Read a table from a reader until end of stream.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        deserialize(&bytes)
    }
}

impl fmt::Display for CodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, code) in self.iter() {
            writeln!(f, "Code {}: {}", symbol, code)?;
        }
        Ok(())
    }
}

fn validate_code(symbol: u8, code: &str) -> Result<()> {
    if code.is_empty() {
        return Err(Error::format(format!("empty code for symbol {:#04x}", symbol)));
    }
    if code.len() > MAX_CODE_LENGTH {
        return Err(Error::CodeTooLong {
            symbol,
            length: code.len(),
        });
    }
    if let Some((position, ch)) = code.chars().enumerate().find(|&(_, c)| c != '0' && c != '1') {
        return Err(Error::InvalidBit { ch, position });
    }
    Ok(())
}

/// Serialize `table` into the record layout, in the table's iteration order.
///
/// # Example
///
/// ```
/// use classic_codecs::code_table::{deserialize, serialize, CodeTable};
///
/// let mut table = CodeTable::new();
/// table.insert(b'a', "0").unwrap();
/// table.insert(b'b', "10").unwrap();
///
/// let bytes = serialize(&table);
/// assert_eq!(bytes, vec![b'a', 1, b'0', b'b', 2, b'1', b'0']);
/// assert_eq!(deserialize(&bytes).unwrap(), table);
/// ```
pub fn serialize(table: &CodeTable) -> Vec<u8> {
    let mut out = Vec::with_capacity(table.iter().map(|(_, code)| code.len() + 2).sum());
    for (symbol, code) in table.iter() {
        out.push(symbol);
        // Bounded by MAX_CODE_LENGTH on insertion.
        out.push(code.len() as u8);
        out.extend_from_slice(code.as_bytes());
    }
    out
}

/// Parse records until the stream is exhausted.
///
/// Fails with [`Error::Format`] if a record is cut short, a code holds
/// anything but '0'/'1', or a symbol appears twice.
pub fn deserialize(bytes: &[u8]) -> Result<CodeTable> {
    let mut table = CodeTable::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let symbol = bytes[pos];
        let length = *bytes.get(pos + 1).ok_or_else(|| {
            Error::format(format!(
                "record for symbol {:#04x} at offset {} has no length byte",
                symbol, pos
            ))
        })? as usize;
        let start = pos + 2;
        let code = bytes.get(start..start + length).ok_or_else(|| {
            Error::format(format!(
                "record for symbol {:#04x} declares {} code bytes but only {} remain",
                symbol,
                length,
                bytes.len() - start
            ))
        })?;
        if let Some(bad) = code.iter().find(|&&b| b != b'0' && b != b'1') {
            return Err(Error::format(format!(
                "code for symbol {:#04x} contains byte {:#04x}",
                symbol, bad
            )));
        }
        if length == 0 {
            return Err(Error::format(format!("empty code for symbol {:#04x}", symbol)));
        }
        // Only ASCII '0'/'1' remain, so the conversion cannot fail.
        let code: String = code.iter().map(|&b| b as char).collect();
        if table.codes.insert(symbol, code).is_some() {
            return Err(Error::format(format!(
                "duplicate record for symbol {:#04x}",
                symbol
            )));
        }
        pos = start + length;
    }
    log::debug!("deserialized code table with {} entries", table.len());
    Ok(table)
}
