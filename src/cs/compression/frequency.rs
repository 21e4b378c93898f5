use crate::cs::compression::symbol::Symbol;
use crate::cs::compression::Result;
use crate::cs::error::Error;
use std::marker::PhantomData;

/// Dense count of how often each symbol of an alphabet occurs.
///
/// The table always holds exactly `S::ALPHABET_SIZE` entries, indexed by
/// symbol value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S: Symbol> {
    counts: Vec<u64>,
    _symbol: PhantomData<S>,
}

impl<S: Symbol> FrequencyTable<S> {
    /// Create a table with every count at zero.
    pub fn new() -> Self {
        FrequencyTable {
            counts: vec![0; S::ALPHABET_SIZE],
            _symbol: PhantomData,
        }
    }

    /// Count every symbol of `symbols`.
    pub fn from_symbols(symbols: &[S]) -> Self {
        let mut table = Self::new();
        for &symbol in symbols {
            table.increment(symbol);
        }
        table
    }

    /// Adopt a table of raw counts. Fails unless there is one count per symbol.
    pub fn from_counts(counts: Vec<u64>) -> Result<Self> {
        if counts.len() != S::ALPHABET_SIZE {
            return Err(Error::InvalidInput(format!(
                "frequency table needs {} entries, got {}",
                S::ALPHABET_SIZE,
                counts.len()
            )));
        }
        Ok(FrequencyTable {
            counts,
            _symbol: PhantomData,
        })
    }

    /// Count one more occurrence of `symbol`, saturating at `u64::MAX`.
    pub fn increment(&mut self, symbol: S) {
        let slot = &mut self.counts[symbol.index()];
        *slot = slot.saturating_add(1);
    }

    /// How often `symbol` occurs.
    pub fn count(&self, symbol: S) -> u64 {
        self.counts[symbol.index()]
    }

    /// Sum of all counts, or `None` if it does not fit in a `u64`.
    pub fn total(&self) -> Option<u64> {
        self.counts
            .iter()
            .try_fold(0u64, |sum, &count| sum.checked_add(count))
    }

    /// Number of symbols with a nonzero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Iterate over `(symbol, count)` for every symbol that occurs.
    pub fn present(&self) -> impl Iterator<Item = (S, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .filter_map(|(index, &count)| S::from_index(index).map(|symbol| (symbol, count)))
    }

    /// Raw counts, indexed by symbol value.
    pub fn as_slice(&self) -> &[u64] {
        &self.counts
    }
}

impl<S: Symbol> Default for FrequencyTable<S> {
    fn default() -> Self {
        Self::new()
    }
}
