//! Candidate substrings ranked for dictionary inclusion
//!
//! A [`SubstringArray`] is a struct-of-arrays bag of `(index, length, score)`
//! triples. `index` is a suffix-array rank: the candidate's bytes start at
//! `corpus[suffix_array[index]]`. The optimizer fills one array with every
//! mined candidate (this can become very large), sorts it by score, and then
//! moves the winners into a small working array while pruning overlaps.

use crate::algorithms::RadixSort;

/// Growth step for the parallel columns. The full candidate set can run to
/// millions of entries, so capacity grows in fixed chunks rather than doubling.
pub const GROWTH_CHUNK: usize = 8 * 1024;

/// Dictionary value of a substring of `length` bytes occurring in `count`
/// distinct documents.
///
/// Each occurrence saves `length` bytes of output at the cost of roughly three
/// bytes of back-reference, and the substring costs `length` bytes of
/// dictionary, so the score is `100 * count * (length - 3) / length`.
/// Substrings of three bytes or fewer are worthless.
pub fn compute_score(length: u32, count: u32) -> u32 {
    if length <= 3 {
        return 0;
    }
    let score = 100 * count as u64 * (length as u64 - 3) / length as u64;
    score.min(u32::MAX as u64) as u32
}

/// Parallel `(index, length, score)` columns
#[derive(Debug, Clone, Default)]
pub struct SubstringArray {
    indexes: Vec<u32>,
    lengths: Vec<u32>,
    scores: Vec<u32>,
}

impl SubstringArray {
    /// Create an empty array with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            indexes: Vec::with_capacity(capacity),
            lengths: Vec::with_capacity(capacity),
            scores: Vec::with_capacity(capacity),
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Whether the array holds no entries
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Slots available before the next growth step
    pub fn capacity(&self) -> usize {
        self.indexes.capacity()
    }

    /// Append a substring occurring in `count` documents, scoring it on the way in
    pub fn add(&mut self, index: u32, length: u32, count: u32) -> usize {
        self.set_score(self.len(), index, length, compute_score(length, count))
    }

    /// Store an entry at slot `i`, growing the array when `i` is past the end
    ///
    /// Slots skipped over by a write past the end are zero-filled.
    pub fn set_score(&mut self, i: usize, index: u32, length: u32, score: u32) -> usize {
        let capacity = self.capacity();
        if i >= capacity {
            let grow_by = ((i - capacity) / GROWTH_CHUNK + 1) * GROWTH_CHUNK;
            let additional = capacity + grow_by - self.len();
            self.indexes.reserve_exact(additional);
            self.lengths.reserve_exact(additional);
            self.scores.reserve_exact(additional);
        }

        if i >= self.len() {
            self.indexes.resize(i + 1, 0);
            self.lengths.resize(i + 1, 0);
            self.scores.resize(i + 1, 0);
        }

        self.indexes[i] = index;
        self.lengths[i] = length;
        self.scores[i] = score;
        i
    }

    /// Remove slot `i`, shifting every later entry down by one
    pub fn remove(&mut self, i: usize) {
        self.indexes.remove(i);
        self.lengths.remove(i);
        self.scores.remove(i);
    }

    /// Drop every entry, keeping the allocation
    pub fn clear(&mut self) {
        self.indexes.clear();
        self.lengths.clear();
        self.scores.clear();
    }

    /// Suffix-array rank of slot `i`
    pub fn index(&self, i: usize) -> u32 {
        self.indexes[i]
    }

    /// Length of slot `i`
    pub fn length(&self, i: usize) -> u32 {
        self.lengths[i]
    }

    /// Score of slot `i`
    pub fn score(&self, i: usize) -> u32 {
        self.scores[i]
    }

    /// Corpus offset at which `other[other_slot]` occurs inside `self[self_slot]`
    ///
    /// Both entries are resolved to bytes through `suffix_array`. Returns
    /// `None` when the other substring is longer or does not occur.
    pub fn index_of(
        &self,
        self_slot: usize,
        other: &SubstringArray,
        other_slot: usize,
        corpus: &[u8],
        suffix_array: &[u32],
    ) -> Option<usize> {
        let outer_start = suffix_array[self.indexes[self_slot] as usize] as usize;
        let outer_len = self.lengths[self_slot] as usize;
        let inner_start = suffix_array[other.indexes[other_slot] as usize] as usize;
        let inner_len = other.lengths[other_slot] as usize;

        if inner_len > outer_len {
            return None;
        }

        let needle = &corpus[inner_start..inner_start + inner_len];
        (outer_start..=outer_start + outer_len - inner_len)
            .find(|&at| &corpus[at..at + inner_len] == needle)
    }

    /// Sort ascending by score with a stable four-pass radix sort
    pub fn sort(&mut self) {
        self.sort_with(&mut RadixSort::new());
    }

    /// Sort ascending by score using a caller-pooled sorter
    pub fn sort_with(&mut self, sorter: &mut RadixSort) {
        let order = sorter.argsort_u32(&self.scores);
        self.indexes = order.iter().map(|&slot| self.indexes[slot as usize]).collect();
        self.lengths = order.iter().map(|&slot| self.lengths[slot as usize]).collect();
        self.scores = order.iter().map(|&slot| self.scores[slot as usize]).collect();
    }

    /// Iterate `(index, length, score)` triples in slot order
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u32, u32, u32)> + '_ {
        self.indexes
            .iter()
            .zip(&self.lengths)
            .zip(&self.scores)
            .map(|((&index, &length), &score)| (index, length, score))
    }
}
