//! Error type shared by every codec in the crate.

use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, persisting or decoding compressed data.
#[derive(Debug, Error)]
pub enum Error {
    /// A persisted code table is truncated or malformed.
    #[error("malformed code table: {0}")]
    Format(String),

    /// LZW decoding met a code that is neither known nor the next one to be assigned.
    #[error("LZW code {code} is not in the dictionary (next code is {expected})")]
    Dictionary { code: u32, expected: u32 },

    /// A bit string contained something other than '0' or '1'.
    #[error("invalid bit character {ch:?} at position {position}")]
    InvalidBit { ch: char, position: usize },

    /// The input contains a byte the code table has no code for.
    #[error("no code for symbol {0:#04x}")]
    UnknownSymbol(u8),

    /// A code is too long for the one-byte length field of the table format.
    #[error("code for symbol {symbol:#04x} is {length} bits long, at most 255 are allowed")]
    CodeTooLong { symbol: u8, length: usize },

    /// One code is a prefix of another, so greedy decoding would be ambiguous.
    #[error("code {prefix:?} is a prefix of code {code:?}")]
    NotPrefixFree { prefix: String, code: String },

    /// A bit sequence that matches no code in the table.
    #[error("invalid code at bit position {position}")]
    InvalidCode { position: usize },

    /// An LZ77 back-reference points before the start of the decoded output.
    #[error("back-reference offset {offset} with {available} bytes decoded")]
    InvalidReference { offset: usize, available: usize },

    /// An LZW code does not fit in a 16-bit stream record.
    #[error("code {0} does not fit in a 16-bit record")]
    CodeOverflow(u32),

    /// A fixed-width record stream ends in the middle of a record.
    #[error("stream ends inside a {record_size}-byte record ({trailing} trailing bytes)")]
    Truncated { record_size: usize, trailing: usize },

    /// A codec was configured with an unusable parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }
}
