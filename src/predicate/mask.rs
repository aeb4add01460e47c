//! Boolean membership vectors
//!
//! A mask is aligned with the dataset row index: `mask.get(i)` tells whether
//! respondent `i` belongs to the subset. Masks built for the full dataset can
//! be combined with any other full-length mask; combining masks of different
//! lengths treats the missing tail as excluded.

/// Row membership vector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mask {
    bits: Vec<bool>,
}

impl Mask {
    /// All rows included
    pub fn all(len: usize) -> Self {
        Self {
            bits: vec![true; len],
        }
    }

    /// No rows included
    pub fn none(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Builds a mask by testing each row index
    pub fn from_fn(len: usize, f: impl FnMut(usize) -> bool) -> Self {
        Self {
            bits: (0..len).map(f).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Membership of row `i`; rows past the end are excluded
    pub fn get(&self, i: usize) -> bool {
        self.bits.get(i).copied().unwrap_or(false)
    }

    /// Number of included rows
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// Intersection
    pub fn and(&self, other: &Mask) -> Mask {
        Mask::from_fn(self.len().max(other.len()), |i| self.get(i) && other.get(i))
    }

    /// Union
    pub fn or(&self, other: &Mask) -> Mask {
        Mask::from_fn(self.len().max(other.len()), |i| self.get(i) || other.get(i))
    }

    /// Logical complement over the same length
    pub fn complement(&self) -> Mask {
        Mask {
            bits: self.bits.iter().map(|b| !b).collect(),
        }
    }

    /// Included row indices in ascending order
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &b)| if b { Some(i) } else { None })
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }
}
