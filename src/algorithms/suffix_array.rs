//! Suffix array construction and LCP array computation
//!
//! The sorter is the bucket/doubling scheme of Quinlan and Doward: suffixes
//! are first bucketed by their leading two bytes, then every unresolved
//! bucket is refined by the rank of the suffix `h` positions ahead, with `h`
//! doubling each pass, until every suffix sits in a bucket of its own. The
//! LCP array is computed afterwards with Kasai's linear-time algorithm.
//!
//! Both arrays carry one extra entry for the virtual empty suffix that starts
//! one past the end of the text. That suffix always sorts first, so
//! `sa[0] == text.len()` and `lcp[0] == lcp[1] == 0` for any non-empty text.

use crate::algorithms::AlgorithmStats;
use crate::error::{DictZipError, Result};
use std::time::Instant;

/// Largest text the sorter can index. The high bit of an `i32` slot marks
/// the end of a bucket during sorting, and one slot goes to the end sentinel.
pub const MAX_TEXT_LEN: usize = i32::MAX as usize - 1;

const BUCKET_END: i32 = i32::MIN;
const TWO_BYTE_BUCKETS: usize = 256 * 256;
const INSERTION_SORT_THRESHOLD: usize = 15;
const PSEUDO_MEDIAN_THRESHOLD: usize = 30;

/// Configuration for suffix array construction
#[derive(Debug, Clone)]
pub struct SuffixArrayConfig {
    /// Keep the sorter's scratch buffers between builds
    pub reuse_scratch: bool,
}

impl Default for SuffixArrayConfig {
    fn default() -> Self {
        Self {
            reuse_scratch: true,
        }
    }
}

/// A suffix array over a byte text, including the end sentinel
#[derive(Debug, Clone)]
pub struct SuffixArray {
    sa: Vec<u32>,
    text_len: usize,
    stats: AlgorithmStats,
}

impl SuffixArray {
    /// Create a new suffix array from the given text
    pub fn new(text: &[u8]) -> Result<Self> {
        SuffixArrayBuilder::new(SuffixArrayConfig::default()).build(text)
    }

    /// Suffix start offsets in lexicographic order
    pub fn as_slice(&self) -> &[u32] {
        &self.sa
    }

    /// Consume the array and return the raw offsets
    pub fn into_vec(self) -> Vec<u32> {
        self.sa
    }

    /// Number of entries (text length plus the sentinel, or 0 for empty text)
    pub fn len(&self) -> usize {
        self.sa.len()
    }

    /// Whether the array is empty (only for an empty text)
    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    /// Length of the text this array was built from
    pub fn text_len(&self) -> usize {
        self.text_len
    }

    /// Get the suffix start offset at the given rank
    pub fn suffix_at_rank(&self, rank: usize) -> Option<usize> {
        self.sa.get(rank).map(|&offset| offset as usize)
    }

    /// Get performance statistics
    pub fn stats(&self) -> &AlgorithmStats {
        &self.stats
    }
}

/// Builder for suffix arrays that pools its working memory
///
/// The 64K-entry bucket heads and the two rank/permutation arrays are kept
/// between builds when [`SuffixArrayConfig::reuse_scratch`] is set, so an
/// optimizer that is re-run over a growing corpus does not reallocate them.
#[derive(Debug, Default)]
pub struct SuffixArrayBuilder {
    config: SuffixArrayConfig,
    buckets: Vec<i32>,
    ranks: Vec<i32>,
    order: Vec<i32>,
}

impl SuffixArrayBuilder {
    /// Create a new suffix array builder
    pub fn new(config: SuffixArrayConfig) -> Self {
        Self {
            config,
            buckets: Vec::new(),
            ranks: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &SuffixArrayConfig {
        &self.config
    }

    /// Bytes currently held in pooled scratch buffers
    pub fn scratch_bytes(&self) -> usize {
        (self.buckets.capacity() + self.ranks.capacity() + self.order.capacity())
            * std::mem::size_of::<i32>()
    }

    /// Build a suffix array from the given text
    pub fn build(&mut self, text: &[u8]) -> Result<SuffixArray> {
        let start_time = Instant::now();

        if text.len() > MAX_TEXT_LEN {
            return Err(DictZipError::capacity_exceeded(text.len(), MAX_TEXT_LEN));
        }

        let sa = if text.is_empty() {
            Vec::new()
        } else {
            self.sort(text)
        };

        if !self.config.reuse_scratch {
            self.release_scratch();
        }

        let elapsed = start_time.elapsed();
        Ok(SuffixArray {
            text_len: text.len(),
            stats: AlgorithmStats {
                items_processed: text.len(),
                processing_time_us: elapsed.as_micros() as u64,
                memory_used: sa.len() * std::mem::size_of::<u32>(),
            },
            sa,
        })
    }

    /// Build both the suffix array and its LCP array
    pub fn build_with_lcp(&mut self, text: &[u8]) -> Result<(SuffixArray, LcpArray)> {
        let sa = self.build(text)?;
        let lcp = LcpArray::new(text, &sa)?;
        Ok((sa, lcp))
    }

    /// Drop pooled scratch memory
    pub fn release_scratch(&mut self) {
        self.buckets = Vec::new();
        self.ranks = Vec::new();
        self.order = Vec::new();
    }

    fn sort(&mut self, text: &[u8]) -> Vec<u32> {
        let n = text.len();
        let total = n + 1;

        self.buckets.clear();
        self.buckets.resize(TWO_BYTE_BUCKETS, -1);
        self.ranks.clear();
        self.ranks.resize(total, 0);
        self.order.clear();
        self.order.resize(total, 0);

        let buckets = &mut self.buckets;
        let a = &mut self.ranks;
        let p = &mut self.order;

        // Thread every position onto the list of its two-byte bucket. The
        // list links live in `a` until labels overwrite them.
        let mut c = (text[n - 1] as usize) << 8;
        let last = c;
        for i in (0..n - 1).rev() {
            c = ((text[i] as usize) << 8) | (c >> 8);
            a[i] = buckets[c];
            buckets[c] = i as i32;
        }
        a[n] = 0;

        // Label each position with the rank of the first slot of its bucket.
        // Singleton buckets are final and dropped from the work list; the last
        // member of every other bucket carries the BUCKET_END flag.
        let mut lab: i32 = 1;
        let mut cum: i32 = 1;
        let mut pe = 0usize;
        for c in 0..TWO_BYTE_BUCKETS {
            if c == last {
                // The final byte pairs with the sentinel and precedes any
                // other suffix sharing its first byte.
                a[n - 1] = lab;
                cum += 1;
                lab += 1;
            }

            let mut cc = buckets[c];
            while cc != -1 {
                let next = a[cc as usize];
                a[cc as usize] = lab;
                cum += 1;
                p[pe] = cc;
                pe += 1;
                cc = next;
            }

            if lab == cum {
                continue;
            }
            if lab + 1 == cum {
                pe -= 1;
            } else {
                p[pe - 1] |= BUCKET_END;
            }
            lab = cum;
        }

        refine_buckets(a, p, total, 2, pe);

        let mut sa = vec![0u32; total];
        for (position, &rank) in a.iter().enumerate() {
            sa[rank as usize] = position as u32;
        }
        sa
    }
}

/// Doubling passes: refine every unresolved bucket by successor rank until
/// the work list is empty.
fn refine_buckets(a: &mut [i32], p: &mut [i32], total: usize, mut h: usize, mut pe: usize) {
    while h < total && pe > 0 {
        let mut packing = 0usize;
        let mut sorting = 0usize;

        while sorting < pe {
            // Replace each member's label with the flagged rank of its
            // successor. A successor already rewritten in this bucket still
            // belongs to the bucket, so it compares as the bucket's own rank.
            let mut lab = a[(p[sorting] & !BUCKET_END) as usize];
            let mut s = sorting;
            loop {
                let sv = p[s];
                let position = (sv & !BUCKET_END) as usize;
                let succ = position + h;
                let mut v = if succ < total { a[succ] } else { lab };
                if v & BUCKET_END != 0 {
                    v = lab;
                }
                a[position] = v | BUCKET_END;
                if sv & BUCKET_END != 0 {
                    break;
                }
                s += 1;
            }
            p[s] &= !BUCKET_END;
            s += 1;

            quicksort_by_rank(&mut p[sorting..s], a);

            // Relabel the sorted bucket, splitting it on key changes, and
            // compact the still-unresolved runs to the front of `p`.
            let mut v = a[p[sorting] as usize];
            a[p[sorting] as usize] = lab;
            let mut packed = 0i32;
            for ss in sorting + 1..s {
                let sv = p[ss] as usize;
                let vv = a[sv];
                if vv == v {
                    p[packing] = p[ss - 1];
                    packing += 1;
                    packed += 1;
                } else {
                    if packed != 0 {
                        p[packing] = p[ss - 1] | BUCKET_END;
                        packing += 1;
                    }
                    lab += packed + 1;
                    packed = 0;
                    v = vv;
                }
                a[sv] = lab;
            }
            if packed != 0 {
                p[packing] = p[s - 1] | BUCKET_END;
                packing += 1;
            }

            sorting = s;
        }

        pe = packing;
        h *= 2;
    }
}

#[inline]
fn key(items: &[i32], at: usize, keys: &[i32]) -> i32 {
    keys[items[at] as usize]
}

fn median_of_three(items: &[i32], x: usize, y: usize, z: usize, keys: &[i32]) -> usize {
    let vx = key(items, x, keys);
    let vy = key(items, y, keys);
    if vx == vy {
        return x;
    }
    let vz = key(items, z, keys);
    if vz == vx || vz == vy {
        return z;
    }
    if vx < vy {
        if vy < vz {
            y
        } else if vx < vz {
            z
        } else {
            x
        }
    } else if vy > vz {
        y
    } else if vx < vz {
        x
    } else {
        z
    }
}

fn insertion_sort_by_rank(items: &mut [i32], keys: &[i32]) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && key(items, j - 1, keys) > key(items, j, keys) {
            items.swap(j, j - 1);
            j -= 1;
        }
    }
}

fn swap_ranges(items: &mut [i32], mut x: usize, mut y: usize, count: usize) {
    for _ in 0..count {
        items.swap(x, y);
        x += 1;
        y += 1;
    }
}

/// Three-way partitioning quicksort (Bentley-McIlroy) of positions by the
/// value `keys[position]`.
fn quicksort_by_rank(items: &mut [i32], keys: &[i32]) {
    let n = items.len();
    if n < INSERTION_SORT_THRESHOLD {
        insertion_sort_by_rank(items, keys);
        return;
    }

    let mut pl = 0;
    let mut pm = n >> 1;
    let mut pn = n - 1;
    if n > PSEUDO_MEDIAN_THRESHOLD {
        let d = n >> 3;
        pl = median_of_three(items, pl, pl + d, pl + 2 * d, keys);
        pm = median_of_three(items, pm - d, pm, pm + d, keys);
        pn = median_of_three(items, pn - 2 * d, pn - d, pn, keys);
    }
    pm = median_of_three(items, pl, pm, pn, keys);
    items.swap(0, pm);
    let pivot = key(items, 0, keys) as i64;

    // Equal keys collect at both ends: [0, pa) and (pd, n).
    let mut pa = 1usize;
    let mut pb = 1usize;
    let mut pc = n as isize - 1;
    let mut pd = n as isize - 1;
    loop {
        while pb as isize <= pc {
            let r = key(items, pb, keys) as i64 - pivot;
            if r > 0 {
                break;
            }
            if r == 0 {
                items.swap(pa, pb);
                pa += 1;
            }
            pb += 1;
        }
        while pb as isize <= pc {
            let r = key(items, pc as usize, keys) as i64 - pivot;
            if r < 0 {
                break;
            }
            if r == 0 {
                items.swap(pc as usize, pd as usize);
                pd -= 1;
            }
            pc -= 1;
        }
        if pb as isize > pc {
            break;
        }
        items.swap(pb, pc as usize);
        pb += 1;
        pc -= 1;
    }

    let r = pa.min(pb - pa);
    swap_ranges(items, 0, pb - r, r);
    let pd = pd as usize;
    let pc = pc as usize;
    let r = (n - pd - 1).min(pd - pc);
    swap_ranges(items, pb, n - r, r);

    let lower = pb - pa;
    if lower > 1 {
        quicksort_by_rank(&mut items[..lower], keys);
    }
    let upper = pd - pc;
    if upper > 1 {
        quicksort_by_rank(&mut items[n - upper..], keys);
    }
}

/// LCP (Longest Common Prefix) array
///
/// `lcp[i]` is the common prefix length of the suffixes at ranks `i - 1`
/// and `i`; `lcp[0]` is 0.
#[derive(Debug, Clone)]
pub struct LcpArray {
    lcp: Vec<u32>,
    stats: AlgorithmStats,
}

impl LcpArray {
    /// Compute LCP array from suffix array and original text
    pub fn new(text: &[u8], suffix_array: &SuffixArray) -> Result<Self> {
        let start_time = Instant::now();

        if suffix_array.text_len() != text.len() {
            return Err(DictZipError::invalid_data(format!(
                "suffix array built over {} bytes, text has {}",
                suffix_array.text_len(),
                text.len()
            )));
        }

        let lcp = Self::compute_lcp_kasai(text, suffix_array.as_slice());

        let elapsed = start_time.elapsed();
        Ok(Self {
            stats: AlgorithmStats {
                items_processed: text.len(),
                processing_time_us: elapsed.as_micros() as u64,
                memory_used: lcp.len() * std::mem::size_of::<u32>(),
            },
            lcp,
        })
    }

    /// Get the LCP array
    pub fn as_slice(&self) -> &[u32] {
        &self.lcp
    }

    /// Consume the array and return the raw values
    pub fn into_vec(self) -> Vec<u32> {
        self.lcp
    }

    /// Get the LCP value at the given rank
    pub fn lcp_at(&self, index: usize) -> Option<usize> {
        self.lcp.get(index).map(|&h| h as usize)
    }

    /// Get performance statistics
    pub fn stats(&self) -> &AlgorithmStats {
        &self.stats
    }

    // Kasai et al.: walking positions in text order, the LCP with the
    // preceding suffix drops by at most one per step.
    fn compute_lcp_kasai(text: &[u8], sa: &[u32]) -> Vec<u32> {
        let total = sa.len();
        if total == 0 {
            return Vec::new();
        }
        let n = text.len();

        let mut inverse = vec![0usize; total];
        for (rank, &position) in sa.iter().enumerate() {
            inverse[position as usize] = rank;
        }

        let mut lcp = vec![0u32; total];
        let mut h = 0usize;
        for i in 0..n {
            let rank = inverse[i];
            // Only the sentinel has rank 0, so every real suffix has a predecessor.
            let j = sa[rank - 1] as usize;
            while i + h < n && j + h < n && text[i + h] == text[j + h] {
                h += 1;
            }
            lcp[rank] = h as u32;
            h = h.saturating_sub(1);
        }

        lcp[0] = 0;
        lcp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_suffix_array(text: &[u8]) -> Vec<u32> {
        let mut sa: Vec<u32> = (0..=text.len() as u32).collect();
        sa.sort_by(|&a, &b| text[a as usize..].cmp(&text[b as usize..]));
        sa
    }

    fn common_prefix(a: &[u8], b: &[u8]) -> u32 {
        a.iter().zip(b).take_while(|(x, y)| x == y).count() as u32
    }

    #[test]
    fn test_suffix_array_empty() {
        let sa = SuffixArray::new(b"").unwrap();
        assert!(sa.is_empty());
        assert_eq!(sa.text_len(), 0);

        let lcp = LcpArray::new(b"", &sa).unwrap();
        assert!(lcp.as_slice().is_empty());
    }

    #[test]
    fn test_suffix_array_single_byte() {
        let sa = SuffixArray::new(b"x").unwrap();
        assert_eq!(sa.as_slice(), &[1, 0]);
    }

    #[test]
    fn test_suffix_array_banana() {
        let text = b"banana";
        let sa = SuffixArray::new(text).unwrap();
        assert_eq!(sa.as_slice(), &[6, 5, 3, 1, 0, 4, 2]);
        assert_eq!(sa.text_len(), 6);
        assert_eq!(sa.suffix_at_rank(0), Some(6));
        assert_eq!(sa.suffix_at_rank(7), None);
    }

    #[test]
    fn test_lcp_banana() {
        let text = b"banana";
        let sa = SuffixArray::new(text).unwrap();
        let lcp = LcpArray::new(text, &sa).unwrap();
        // "", a, ana, anana, banana, na, nana
        assert_eq!(lcp.as_slice(), &[0, 0, 1, 3, 0, 0, 2]);
        assert_eq!(lcp.lcp_at(0), Some(0));
    }

    #[test]
    fn test_matches_naive_sort() {
        let texts: [&[u8]; 6] = [
            b"abracadabra",
            b"mississippi",
            b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
            b"abababababababababababababababababababababab",
            b"http://example.com/ahttp://example.com/bhttp://example.com/c",
            b"\x00\x00\x01\x00\xff\xff\x00",
        ];
        let mut builder = SuffixArrayBuilder::default();
        for text in texts {
            let sa = builder.build(text).unwrap();
            assert_eq!(sa.as_slice(), naive_suffix_array(text).as_slice(), "text {:?}", text);
        }
    }

    #[test]
    fn test_lcp_matches_naive() {
        let text = b"the cat sat on the mat with the hat";
        let sa = SuffixArray::new(text).unwrap();
        let lcp = LcpArray::new(text, &sa).unwrap();
        let offsets = sa.as_slice();
        assert_eq!(lcp.as_slice()[0], 0);
        for i in 1..offsets.len() {
            let expected = common_prefix(&text[offsets[i - 1] as usize..], &text[offsets[i] as usize..]);
            assert_eq!(lcp.as_slice()[i], expected, "rank {}", i);
        }
    }

    #[test]
    fn test_large_repetitive_text_uses_quicksort_path() {
        // Buckets well above the insertion-sort threshold.
        let text: Vec<u8> = (0..2000).map(|i| b"abcab"[i % 5]).collect();
        let sa = SuffixArray::new(&text).unwrap();
        assert_eq!(sa.as_slice(), naive_suffix_array(&text).as_slice());
    }

    #[test]
    fn test_scratch_reuse() {
        let mut builder = SuffixArrayBuilder::new(SuffixArrayConfig::default());
        builder.build(b"first text to sort").unwrap();
        assert!(builder.scratch_bytes() > 0);

        let sa = builder.build(b"second").unwrap();
        assert_eq!(sa.as_slice(), naive_suffix_array(b"second").as_slice());

        let mut no_pool = SuffixArrayBuilder::new(SuffixArrayConfig {
            reuse_scratch: false,
        });
        no_pool.build(b"pooled nothing").unwrap();
        assert_eq!(no_pool.scratch_bytes(), 0);
    }

    #[test]
    fn test_build_with_lcp() {
        let mut builder = SuffixArrayBuilder::default();
        let (sa, lcp) = builder.build_with_lcp(b"abcabc").unwrap();
        assert_eq!(sa.len(), 7);
        assert_eq!(lcp.as_slice().len(), 7);
        assert_eq!(lcp.as_slice().iter().max(), Some(&3));
    }

    #[test]
    fn test_lcp_rejects_mismatched_text() {
        let sa = SuffixArray::new(b"abc").unwrap();
        assert!(LcpArray::new(b"abcd", &sa).is_err());
    }
}
