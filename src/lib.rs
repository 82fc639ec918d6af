pub mod compression;
pub mod error;

pub use compression::{code_table, entropy, huffman, lz77, lzw, shannon_fano};
pub use error::{Error, Result};
