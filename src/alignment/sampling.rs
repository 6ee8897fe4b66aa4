//! Round-robin link group subsampling.
use crate::error::Error;

/// Selects every `rate`th group, starting at `index`.
///
/// Running every index of `0..rate` processes each group exactly once,
/// which is how a large alignment file is split between processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sampling {
    rate: usize,
    index: usize,
}

impl Default for Sampling {
    fn default() -> Self {
        Self { rate: 1, index: 0 }
    }
}

impl Sampling {
    /// Fails if `rate == 0` or `index >= rate`.
    pub fn new(rate: usize, index: usize) -> Result<Self, Error> {
        if rate == 0 {
            return Err(Error::Config("subsample rate must be at least 1".to_string()));
        }
        if index >= rate {
            return Err(Error::Config(format!(
                "sample index {} is not in [0, {})",
                index, rate
            )));
        }
        Ok(Self { rate, index })
    }

    pub fn rate(&self) -> usize {
        self.rate
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Is the group at (0-based) position `ordinal` selected?
    pub fn selects(&self, ordinal: usize) -> bool {
        ordinal % self.rate == self.index
    }

    /// Number of selected groups among `total` groups.
    pub fn expected(&self, total: usize) -> usize {
        if total <= self.index {
            0
        } else {
            (total - self.index + self.rate - 1) / self.rate
        }
    }
}
