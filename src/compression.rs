//! Compression algorithms implementation.
//!
//! This module provides textbook lossless codecs over byte buffers:
//! - Prefix codes built from symbol statistics (Shannon-Fano, Huffman)
//! - Dictionary coders (LZ77 sliding window, LZW adaptive dictionary)
//! - A byte entropy estimator and MSB-first bit packing
//!
//! The prefix coders produce a [`CodeTable`] alongside the bit string, and
//! that table is what a decoder needs to recover the input. The dictionary
//! coders are self-describing and persist as fixed-width big-endian records.
//!
//! # Examples
//!
//! ```rust
//! use classic_codecs::compression::{Compression, Huffman, Lzw, PrefixCoder};
//!
//! let data = b"abracadabra";
//!
//! let (bits, table) = Huffman.encode(data).unwrap();
//! assert_eq!(Huffman.decode(&bits, &table).unwrap(), data);
//!
//! let stream = Lzw.compress(data).unwrap();
//! assert_eq!(Lzw.decompress(&stream).unwrap(), data);
//! ```

pub use crate::error::Result;

/// Trait for codecs whose compressed form is a self-contained byte stream
pub trait Compression {
    /// Compress the input data
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;

    /// Decompress the compressed data
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// Trait for variable-length prefix coders driven by a frequency table.
///
/// Implementors only decide how codes are assigned; encoding, packing and
/// decoding are shared.
pub trait PrefixCoder {
    /// Assign a code to every symbol with a non-zero count.
    fn code_table_for(&self, freq: &FrequencyTable) -> CodeTable;

    /// Count the symbols of `data` and assign codes to them.
    fn build_code_table(&self, data: &[u8]) -> CodeTable {
        self.code_table_for(&FrequencyTable::from_data(data))
    }

    /// Encode `data` into a string of '0'/'1' characters plus the table used.
    fn encode(&self, data: &[u8]) -> Result<(String, CodeTable)> {
        let table = self.build_code_table(data);
        let bits = table.encode(data)?;
        log::debug!(
            "prefix-coded {} bytes into {} bits with {} codes",
            data.len(),
            bits.len(),
            table.len()
        );
        Ok((bits, table))
    }

    /// Decode a bit string produced by [`PrefixCoder::encode`].
    fn decode(&self, bits: &str, table: &CodeTable) -> Result<Vec<u8>> {
        PrefixDecoder::new(table)?.decode(bits)
    }

    /// Encode `data` and pack the bit string into bytes.
    fn encode_packed(&self, data: &[u8]) -> Result<(Vec<u8>, CodeTable)> {
        let (bits, table) = self.encode(data)?;
        Ok((bits::pack(&bits)?, table))
    }

    /// Decode packed bytes. Without `symbols` the zero padding of the last
    /// byte may decode as extra symbols when a short all-zero code exists.
    fn decode_packed(
        &self,
        packed: &[u8],
        table: &CodeTable,
        symbols: Option<usize>,
    ) -> Result<Vec<u8>> {
        let decoder = PrefixDecoder::new(table)?;
        let bits = bits::unpack(packed);
        match symbols {
            Some(count) => decoder.decode_n(&bits, count),
            None => decoder.decode(&bits),
        }
    }
}

pub mod bits;
pub mod code_table;
pub mod entropy;
pub mod huffman;
pub mod lz77;
pub mod lzw;
pub mod prefix;
pub mod shannon_fano;

pub use code_table::CodeTable;
pub use entropy::{entropy, FrequencyTable};
pub use huffman::{
    build_code_table, build_frequency_table, build_huffman_tree, huffman_decode, huffman_encode,
    Huffman, HuffmanNode, HuffmanTree,
};
pub use lz77::{Lz77, Token};
pub use lzw::{Lzw, LzwDictionary};
pub use prefix::PrefixDecoder;
pub use shannon_fano::{shannon_fano_decode, shannon_fano_encode, ShannonFano};
