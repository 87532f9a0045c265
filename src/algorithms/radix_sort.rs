//! LSD radix sort over 32-bit keys
//!
//! Four stable counting-sort passes of 8-bit digits, least significant digit
//! first. Besides sorting plain `u32` slices the sorter can produce a stable
//! permutation (`argsort_u32`), which lets struct-of-arrays containers
//! reorder several parallel columns by one key column.

use crate::algorithms::AlgorithmStats;
use std::time::Instant;

const RADIX_BITS: usize = 8;
const RADIX: usize = 1 << RADIX_BITS;
const DIGIT_MASK: u32 = (RADIX - 1) as u32;
const PASSES: usize = 32 / RADIX_BITS;

/// Radix sorter with a pooled histogram and scratch buffer
#[derive(Debug)]
pub struct RadixSort {
    counts: Vec<usize>,
    scratch: Vec<u32>,
    stats: AlgorithmStats,
}

impl Default for RadixSort {
    fn default() -> Self {
        Self::new()
    }
}

impl RadixSort {
    /// Create a new radix sort instance
    pub fn new() -> Self {
        Self {
            counts: vec![0; RADIX],
            scratch: Vec::new(),
            stats: AlgorithmStats::default(),
        }
    }

    /// Sort a slice of unsigned 32-bit integers ascending
    pub fn sort_u32(&mut self, data: &mut [u32]) {
        let start_time = Instant::now();

        self.scratch.clear();
        self.scratch.resize(data.len(), 0);

        for pass in 0..PASSES {
            let shift = pass * RADIX_BITS;

            self.counts.fill(0);
            for &value in data.iter() {
                self.counts[((value >> shift) & DIGIT_MASK) as usize] += 1;
            }
            prefix_sums(&mut self.counts);

            for &value in data.iter() {
                let digit = ((value >> shift) & DIGIT_MASK) as usize;
                self.scratch[self.counts[digit]] = value;
                self.counts[digit] += 1;
            }

            data.copy_from_slice(&self.scratch);
        }

        self.record(data.len(), start_time);
    }

    /// Stable ascending permutation of `keys`
    ///
    /// `keys[order[0]] <= keys[order[1]] <= ...`, and equal keys keep their
    /// original relative order.
    pub fn argsort_u32(&mut self, keys: &[u32]) -> Vec<u32> {
        let start_time = Instant::now();

        let mut order: Vec<u32> = (0..keys.len() as u32).collect();
        self.scratch.clear();
        self.scratch.resize(keys.len(), 0);

        for pass in 0..PASSES {
            let shift = pass * RADIX_BITS;

            self.counts.fill(0);
            for &slot in order.iter() {
                self.counts[((keys[slot as usize] >> shift) & DIGIT_MASK) as usize] += 1;
            }
            prefix_sums(&mut self.counts);

            for &slot in order.iter() {
                let digit = ((keys[slot as usize] >> shift) & DIGIT_MASK) as usize;
                self.scratch[self.counts[digit]] = slot;
                self.counts[digit] += 1;
            }

            std::mem::swap(&mut order, &mut self.scratch);
        }

        self.record(keys.len(), start_time);
        order
    }

    /// Statistics of the last sort
    pub fn stats(&self) -> &AlgorithmStats {
        &self.stats
    }

    fn record(&mut self, items: usize, start_time: Instant) {
        self.stats = AlgorithmStats {
            items_processed: items,
            processing_time_us: start_time.elapsed().as_micros() as u64,
            memory_used: RADIX * std::mem::size_of::<usize>()
                + self.scratch.capacity() * std::mem::size_of::<u32>(),
        };
    }
}

// Convert digit counts to starting offsets in place.
fn prefix_sums(counts: &mut [usize]) {
    let mut pos = 0;
    for count in counts.iter_mut() {
        let old_count = *count;
        *count = pos;
        pos += old_count;
    }
}
