use crate::compression::{Compression, Result};
use crate::error::Error;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::collections::HashMap;
use std::io::{Cursor, Write};

/// Number of single-byte phrases the dictionary starts with.
const ALPHABET_SIZE: u32 = 256;
/// Size of one persisted code.
pub const RECORD_SIZE: usize = 2;

/// LZW codec whose persisted form is a stream of 16-bit big-endian codes.
///
/// The dictionary itself is unbounded; compressing input that needs a code
/// above `u16::MAX` fails with [`Error::CodeOverflow`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Lzw;

impl Compression for Lzw {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let codes = compress(data);
        let mut out = Vec::with_capacity(codes.len() * RECORD_SIZE);
        write_codes(&mut out, &codes)?;
        Ok(out)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        decompress(&read_codes(data)?)
    }
}

/// The decoder's phrase table.
///
/// Code `n` below 256 is the single byte `n`; code `256 + k` is the `k`-th
/// phrase inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LzwDictionary {
    phrases: Vec<Vec<u8>>,
}

impl Default for LzwDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl LzwDictionary {
    /// Dictionary seeded with all 256 single-byte phrases
    pub fn new() -> Self {
        LzwDictionary {
            phrases: (0..ALPHABET_SIZE).map(|b| vec![b as u8]).collect(),
        }
    }

    /// Phrase for `code`, if assigned
    pub fn get(&self, code: u32) -> Option<&[u8]> {
        self.phrases.get(code as usize).map(Vec::as_slice)
    }

    /// Code the next inserted phrase receives
    pub fn next_code(&self) -> u32 {
        self.phrases.len() as u32
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    /// Never true: the seed phrases are always present.
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Number of phrases inserted beyond the seed
    pub fn added(&self) -> usize {
        self.phrases.len() - ALPHABET_SIZE as usize
    }

    fn push(&mut self, phrase: Vec<u8>) {
        self.phrases.push(phrase);
    }
}

/// Compresses the input data using the LZW algorithm.
///
/// # Details
///
/// The dictionary is initialized with all 256 possible single-byte sequences.
/// Then, the algorithm finds the longest sequence `w` present in the dictionary that
/// is a prefix of the remaining input. It outputs the code for `w`, adds `w` concatenated
/// with the next byte to the dictionary, and continues.
///
/// # Example
///
/// ```
/// use classic_codecs::lzw::compress;
///
/// let input = b"TOBEORNOTTOBEORTOBEORNOT";
/// let compressed = compress(input);
/// assert!(compressed.len() < input.len());
/// ```
pub fn compress(input: &[u8]) -> Vec<u32> {
    compress_with_stats(input).0
}

/// Like [`compress`], also returning how many phrases were added to the
/// dictionary.
pub fn compress_with_stats(input: &[u8]) -> (Vec<u32>, usize) {
    // A phrase is identified by the code of its prefix plus its last byte.
    let mut dict: HashMap<(u32, u8), u32> = HashMap::new();
    let mut next_code = ALPHABET_SIZE;
    let mut result = Vec::new();
    let mut w: Option<u32> = None;
    for &byte in input {
        w = Some(match w {
            None => u32::from(byte),
            Some(prefix) => match dict.get(&(prefix, byte)) {
                Some(&code) => code,
                None => {
                    result.push(prefix);
                    dict.insert((prefix, byte), next_code);
                    next_code += 1;
                    u32::from(byte)
                }
            },
        });
    }
    // Output remaining code.
    if let Some(code) = w {
        result.push(code);
    }
    let added = dict.len();
    log::debug!(
        "LZW compressed {} bytes into {} codes, {} phrases added",
        input.len(),
        result.len(),
        added
    );
    (result, added)
}

/// Decompresses a sequence of LZW codes back into the original byte data.
///
/// # Details
///
/// For each code read, the corresponding dictionary entry is output, and the
/// previous entry extended by the first byte of the current one is added to
/// the dictionary. A code equal to the next unassigned code stands for the
/// previous entry followed by its own first byte. Any other unknown code
/// fails with [`Error::Dictionary`].
///
/// # Example
///
/// ```
/// use classic_codecs::lzw::{compress, decompress};
///
/// let input = b"TOBEORNOTTOBE";
/// let compressed = compress(input);
/// let decompressed = decompress(&compressed).unwrap();
/// assert_eq!(decompressed, input);
/// ```
pub fn decompress(codes: &[u32]) -> Result<Vec<u8>> {
    Ok(decompress_with_dictionary(codes)?.0)
}

/// Like [`decompress`], also returning the dictionary the decoder built.
pub fn decompress_with_dictionary(codes: &[u32]) -> Result<(Vec<u8>, LzwDictionary)> {
    let mut dict = LzwDictionary::new();
    let mut result = Vec::new();

    // Handle first code.
    let Some((&first, rest)) = codes.split_first() else {
        return Ok((result, dict));
    };
    let mut w = match dict.get(first) {
        Some(phrase) => phrase.to_vec(),
        None => {
            return Err(Error::Dictionary {
                code: first,
                expected: dict.next_code(),
            })
        }
    };
    result.extend_from_slice(&w);

    for &code in rest {
        let entry = match dict.get(code) {
            Some(phrase) => phrase.to_vec(),
            None if code == dict.next_code() => {
                // The encoder used this phrase in the step that defined it.
                let mut entry = w.clone();
                entry.push(w[0]);
                entry
            }
            None => {
                return Err(Error::Dictionary {
                    code,
                    expected: dict.next_code(),
                })
            }
        };
        result.extend_from_slice(&entry);
        // Add new dictionary entry: w + first byte of entry.
        let mut phrase = w;
        phrase.push(entry[0]);
        dict.push(phrase);
        w = entry;
    }
    Ok((result, dict))
}

/// Write codes as 2-byte big-endian records.
///
/// Fails with [`Error::CodeOverflow`] on the first code above `u16::MAX`.
pub fn write_codes<W: Write>(writer: &mut W, codes: &[u32]) -> Result<()> {
    for &code in codes {
        let code = u16::try_from(code).map_err(|_| Error::CodeOverflow(code))?;
        writer.write_u16::<BigEndian>(code)?;
    }
    Ok(())
}

/// Parse a stream of 2-byte records.
pub fn read_codes(bytes: &[u8]) -> Result<Vec<u32>> {
    let trailing = bytes.len() % RECORD_SIZE;
    if trailing != 0 {
        return Err(Error::Truncated {
            record_size: RECORD_SIZE,
            trailing,
        });
    }
    let mut cursor = Cursor::new(bytes);
    let mut codes = Vec::with_capacity(bytes.len() / RECORD_SIZE);
    for _ in 0..bytes.len() / RECORD_SIZE {
        codes.push(u32::from(cursor.read_u16::<BigEndian>()?));
    }
    Ok(codes)
}
