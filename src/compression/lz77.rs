//! LZ77 sliding-window compression.
//!
//! Each position is replaced by the longest earlier occurrence found in the
//! window, written as a `(offset, length, literal)` token. Persisted streams
//! are a sequence of fixed 5-byte records:
//!
//! ```text
//! +----------------+----------------+---------+
//! | offset: u16 BE | length: u16 BE | literal |
//! +----------------+----------------+---------+
//! ```

use crate::compression::{Compression, Result};
use crate::error::Error;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Write};

/// Default number of previous bytes searched for a match.
pub const DEFAULT_WINDOW_SIZE: u16 = 256;
/// Default maximum match length.
pub const DEFAULT_LOOKAHEAD_SIZE: u16 = 16;
/// Size of one persisted token.
pub const RECORD_SIZE: usize = 5;

/// An LZ77 token.
///
/// When a match is found, the token is:
///   (offset, length, literal)
///
/// If no match is found, then offset and length are zero, and `literal` is
/// the next input byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub offset: u16,
    pub length: u16,
    pub literal: u8,
}

impl Token {
    /// A token that only emits `byte`
    pub fn literal(byte: u8) -> Self {
        Token {
            offset: 0,
            length: 0,
            literal: byte,
        }
    }

    pub fn is_literal(&self) -> bool {
        self.length == 0
    }
}

/// LZ77 codec parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lz77 {
    window_size: u16,
    lookahead_size: u16,
}

impl Default for Lz77 {
    fn default() -> Self {
        Lz77 {
            window_size: DEFAULT_WINDOW_SIZE,
            lookahead_size: DEFAULT_LOOKAHEAD_SIZE,
        }
    }
}

impl Lz77 {
    /// Creates a codec with the given window and lookahead sizes.
    ///
    /// # Arguments
    ///
    /// * `window_size` - Number of previous bytes searched for a match
    /// * `lookahead_size` - Maximum match length
    ///
    /// # Returns
    ///
    /// A new `Lz77` instance or an error if either size is zero
    pub fn new(window_size: u16, lookahead_size: u16) -> Result<Self> {
        if window_size == 0 {
            return Err(Error::InvalidParameter(
                "LZ77 window size must be positive".to_string(),
            ));
        }
        if lookahead_size == 0 {
            return Err(Error::InvalidParameter(
                "LZ77 lookahead size must be positive".to_string(),
            ));
        }
        Ok(Lz77 {
            window_size,
            lookahead_size,
        })
    }

    pub fn window_size(&self) -> u16 {
        self.window_size
    }

    pub fn lookahead_size(&self) -> u16 {
        self.lookahead_size
    }

    /// Compress `input` into tokens with this codec's parameters.
    pub fn tokens(&self, input: &[u8]) -> Vec<Token> {
        compress(input, self.window_size, self.lookahead_size)
    }
}

impl Compression for Lz77 {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let tokens = self.tokens(data);
        let mut out = Vec::with_capacity(tokens.len() * RECORD_SIZE);
        write_tokens(&mut out, &tokens)?;
        Ok(out)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        decompress(&read_tokens(data)?)
    }
}

/// Compress the input data using the LZ77 algorithm.
///
/// # Parameters
///
/// - `input`: the data to compress as a byte slice.
/// - `window_size`: the maximum number of previous bytes to search for a match.
/// - `lookahead_size`: the maximum match length to consider.
///
/// Matches may run into the bytes they are copying (offset < length), and
/// stop one byte short of the end of input so that every token carries a
/// real literal.
///
/// # Returns
///
/// A vector of `Token` representing the compressed data.
///
/// # Example
///
/// ```
/// use classic_codecs::lz77::{compress, decompress};
///
/// let data = b"abracadabra abracadabra";
/// let tokens = compress(data, 16, 8);
/// assert!(tokens.len() < data.len());
/// assert_eq!(decompress(&tokens).unwrap(), data);
/// ```
pub fn compress(input: &[u8], window_size: u16, lookahead_size: u16) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < input.len() {
        let (offset, length) = longest_match(input, i, window_size, lookahead_size);
        if length > 0 {
            tokens.push(Token {
                offset,
                length,
                literal: input[i + length as usize],
            });
            i += length as usize + 1;
        } else {
            // No match found: output literal token.
            tokens.push(Token::literal(input[i]));
            i += 1;
        }
    }
    log::debug!(
        "LZ77 compressed {} bytes into {} tokens",
        input.len(),
        tokens.len()
    );
    tokens
}

/// Longest match for `input[i..]` starting within the window, as
/// `(offset, length)`. Offsets are scanned from 1 upwards and the first
/// longest match wins, so ties go to the nearest occurrence.
fn longest_match(input: &[u8], i: usize, window_size: u16, lookahead_size: u16) -> (u16, u16) {
    // Leave at least one byte for the literal.
    let max_length = (lookahead_size as usize).min(input.len() - i - 1);
    let max_offset = (window_size as usize).min(i);
    let mut best = (0, 0);
    if max_length == 0 {
        return best;
    }
    let target = &input[i..i + max_length];
    for offset in 1..=max_offset {
        let length = input[i - offset..]
            .iter()
            .zip(target)
            .take_while(|(a, b)| a == b)
            .count();
        if length > best.1 as usize {
            // Both bounded by u16 parameters.
            best = (offset as u16, length as u16);
            if length == max_length {
                break;
            }
        }
    }
    best
}

/// Decompress a sequence of LZ77 tokens into the original data.
///
/// Copies are done byte by byte, so a match may overlap the bytes it
/// produces. Fails with [`Error::InvalidReference`] if a match reaches back
/// before the start of the output.
pub fn decompress(tokens: &[Token]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    for token in tokens {
        // If length > 0, copy the matching substring from output.
        if token.length > 0 {
            let offset = token.offset as usize;
            if offset == 0 || offset > output.len() {
                return Err(Error::InvalidReference {
                    offset,
                    available: output.len(),
                });
            }
            let start = output.len() - offset;
            for k in 0..token.length as usize {
                let byte = output[start + k];
                output.push(byte);
            }
        }
        output.push(token.literal);
    }
    Ok(output)
}

/// Write tokens as 5-byte big-endian records.
pub fn write_tokens<W: Write>(writer: &mut W, tokens: &[Token]) -> Result<()> {
    for token in tokens {
        writer.write_u16::<BigEndian>(token.offset)?;
        writer.write_u16::<BigEndian>(token.length)?;
        writer.write_u8(token.literal)?;
    }
    Ok(())
}

/// Parse a stream of 5-byte records.
///
/// Fails with [`Error::Truncated`] if the stream ends inside a record.
pub fn read_tokens(bytes: &[u8]) -> Result<Vec<Token>> {
    let trailing = bytes.len() % RECORD_SIZE;
    if trailing != 0 {
        return Err(Error::Truncated {
            record_size: RECORD_SIZE,
            trailing,
        });
    }
    let mut cursor = Cursor::new(bytes);
    let mut tokens = Vec::with_capacity(bytes.len() / RECORD_SIZE);
    for _ in 0..bytes.len() / RECORD_SIZE {
        tokens.push(Token {
            offset: cursor.read_u16::<BigEndian>()?,
            length: cursor.read_u16::<BigEndian>()?,
            literal: cursor.read_u8()?,
        });
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let input = b"";
        let tokens = compress(input, 16, 8);
        assert!(tokens.is_empty());
        let decompressed = decompress(&tokens).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_no_repetition() {
        // When there is no repetition, every token should be a literal.
        let input = b"abcdefg";
        let tokens = compress(input, 16, 8);
        for token in &tokens {
            assert!(token.is_literal());
            assert_eq!(token.offset, 0);
        }
        let decompressed = decompress(&tokens).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_single_character_repetition() {
        let input = b"aaaaaaa";
        let tokens = compress(input, 16, 8);
        // A literal, then one self-overlapping match that stops before the last byte.
        assert_eq!(
            tokens,
            vec![
                Token::literal(b'a'),
                Token {
                    offset: 1,
                    length: 5,
                    literal: b'a'
                },
            ]
        );
        let decompressed = decompress(&tokens).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_match_bounded_by_lookahead() {
        let input = [b'x'; 20];
        let tokens = compress(&input, 16, 4);
        assert!(tokens.iter().all(|t| t.length <= 4));
        assert_eq!(decompress(&tokens).unwrap(), input);
    }

    #[test]
    fn test_nearest_match_wins_ties() {
        // The final "ab" matches at offsets 3 and 6.
        let input = b"abxabyab!";
        let tokens = compress(input, 16, 2);
        assert_eq!(tokens.len(), 5);
        assert_eq!(
            tokens[4],
            Token {
                offset: 3,
                length: 2,
                literal: b'!'
            }
        );
    }

    #[test]
    fn test_window_limits_offsets() {
        let input = b"abcdefgh abcdefgh abcdefgh";
        let tokens = compress(input, 4, 8);
        assert!(tokens.iter().all(|t| t.offset <= 4));
        assert_eq!(decompress(&tokens).unwrap(), input);
    }

    #[test]
    fn test_compress_decompress() {
        let input = b"abracadabra abracadabra";
        // Use a moderate window and lookahead sizes.
        let tokens = compress(input, 16, 8);
        let decompressed = decompress(&tokens).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_longer_input() {
        let input = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                      Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";
        let tokens = compress(input, 32, 16);
        let decompressed = decompress(&tokens).unwrap();
        assert_eq!(decompressed, input);
    }

    #[test]
    fn test_invalid_reference() {
        let tokens = [
            Token::literal(b'a'),
            Token {
                offset: 2,
                length: 1,
                literal: b'b',
            },
        ];
        assert!(matches!(
            decompress(&tokens),
            Err(Error::InvalidReference {
                offset: 2,
                available: 1
            })
        ));
    }

    #[test]
    fn test_record_layout() {
        let mut out = Vec::new();
        write_tokens(
            &mut out,
            &[Token {
                offset: 0x0102,
                length: 0x0304,
                literal: 0x05,
            }],
        )
        .unwrap();
        assert_eq!(out, vec![0x01, 0x02, 0x03, 0x04, 0x05]);
    }

    #[test]
    fn test_truncated_stream() {
        assert!(matches!(
            read_tokens(&[0, 0, 0, 0, b'a', 0, 1]),
            Err(Error::Truncated {
                record_size: 5,
                trailing: 2
            })
        ));
    }

    #[test]
    fn test_codec_round_trip() {
        let codec = Lz77::default();
        let input = b"to be or not to be, that is the question";
        let stream = codec.compress(input).unwrap();
        assert_eq!(stream.len() % RECORD_SIZE, 0);
        assert_eq!(codec.decompress(&stream).unwrap(), input);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(Lz77::new(0, 16), Err(Error::InvalidParameter(_))));
        assert!(matches!(Lz77::new(256, 0), Err(Error::InvalidParameter(_))));
        let codec = Lz77::new(u16::MAX, u16::MAX).unwrap();
        assert_eq!(codec.window_size(), u16::MAX);
    }
}
