//! Byte frequency counting and Shannon entropy.
//!
//! The entropy of a buffer is the lower bound, in bits per byte, that any
//! symbol-by-symbol prefix code built from its statistics can approach.

/// Occurrence counts of every byte value in a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FrequencyTable {
    /// Create an empty frequency table
    pub fn new() -> Self {
        FrequencyTable {
            counts: [0; 256],
            total: 0,
        }
    }

    /// Count every byte of `data`
    pub fn from_data(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.count(data);
        table
    }

    /// Add the bytes of `data` to the running counts
    pub fn count(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
        }
        self.total += data.len() as u64;
    }

    /// Number of occurrences of `symbol`
    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of byte values that occur at least once
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Present symbols with their counts, in ascending byte order
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(symbol, &count)| (symbol as u8, count))
    }

    /// Empirical probability of `symbol`, 0.0 for an empty table
    pub fn probability(&self, symbol: u8) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.get(symbol) as f64 / self.total as f64
    }

    /// Shannon entropy of the distribution in bits per symbol.
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        let h: f64 = self
            .symbols()
            .map(|(_, count)| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum();
        // A single symbol sums to -0.0
        h.max(0.0)
    }
}

impl FromIterator<(u8, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (u8, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (symbol, count) in iter {
            table.counts[symbol as usize] += count;
            table.total += count;
        }
        table
    }
}

/// Shannon entropy of the byte distribution of `data`, in bits per byte.
///
/// # Example
///
/// ```
/// use classic_codecs::compression::entropy;
///
/// assert_eq!(entropy(b""), 0.0);
/// assert_eq!(entropy(b"aaaa"), 0.0);
/// assert!((entropy(b"abab") - 1.0).abs() < 1e-12);
/// ```
pub fn entropy(data: &[u8]) -> f64 {
    FrequencyTable::from_data(data).entropy()
}
