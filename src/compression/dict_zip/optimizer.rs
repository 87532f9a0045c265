//! Dictionary construction from a corpus of sample documents
//!
//! [`DictionaryOptimizer`] concatenates the added documents and builds a
//! suffix array with its LCP array over the result. Walking the LCP array
//! exposes every substring shared by two or more suffixes; each one is scored
//! by the number of distinct documents it occurs in, counting only
//! occurrences that stay inside one document.
//!
//! The best candidates are then pruned for containment and laid out back to
//! front in the dictionary buffer, highest score last, so the most valuable
//! fragments sit nearest the data and get the shortest offsets. Adjacent
//! fragments share any overlap between the tail of one and the head of the
//! next.
//!
//! ```rust
//! use dictzip::compression::dict_zip::DictionaryOptimizer;
//! # fn main() -> dictzip::Result<()> {
//! let mut optimizer = DictionaryOptimizer::new();
//! optimizer.add(b"http://example.com/a")?;
//! optimizer.add(b"http://example.com/b")?;
//! optimizer.add(b"http://example.com/c")?;
//!
//! let dictionary = optimizer.optimize(16)?;
//! assert!(dictionary.len() <= 16);
//! # Ok(())
//! # }
//! ```
//!
//! The optimizer does not track staleness: documents added after
//! [`optimize`](DictionaryOptimizer::optimize) only take effect on the next
//! call.

use crate::algorithms::{RadixSort, SuffixArrayBuilder, SuffixArrayConfig};
use crate::compression::dict_zip::substring_array::SubstringArray;
use crate::compression::dict_zip::MAX_DICTIONARY_BYTES;
use crate::config::DictionaryConfig;
use crate::error::{DictZipError, Result};

/// Shortest substring worth a dictionary slot
const MIN_CANDIDATE_LENGTH: u32 = 4;

/// Mined candidate, resolved to its bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedSubstring<'a> {
    /// Score from [`compute_score`](crate::compression::dict_zip::compute_score)
    pub score: u32,
    /// Candidate bytes inside the corpus
    pub bytes: &'a [u8],
}

/// Iterator over the documents added to an optimizer, in insertion order
#[derive(Debug, Clone)]
pub struct Documents<'a> {
    corpus: &'a [u8],
    starts: &'a [u32],
    next: usize,
}

impl<'a> Iterator for Documents<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let start = *self.starts.get(self.next)? as usize;
        self.next += 1;
        let end = self
            .starts
            .get(self.next)
            .map_or(self.corpus.len(), |&s| s as usize);
        Some(&self.corpus[start..end])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.starts.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Documents<'_> {}

/// Accumulates sample documents and builds a shared dictionary from them
#[derive(Debug)]
pub struct DictionaryOptimizer {
    config: DictionaryConfig,
    corpus: Vec<u8>,
    starts: Vec<u32>,
    builder: SuffixArrayBuilder,
    sorter: RadixSort,
    suffix_array: Vec<u32>,
    lcp: Vec<u32>,
    substrings: Option<SubstringArray>,
}

impl Default for DictionaryOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryOptimizer {
    /// Create an optimizer with the default configuration
    pub fn new() -> Self {
        Self::with_config(DictionaryConfig::default())
    }

    /// Create an optimizer with the given configuration
    pub fn with_config(config: DictionaryConfig) -> Self {
        let builder = SuffixArrayBuilder::new(SuffixArrayConfig {
            reuse_scratch: config.reuse_scratch,
        });
        Self {
            config,
            corpus: Vec::new(),
            starts: Vec::new(),
            builder,
            sorter: RadixSort::new(),
            suffix_array: Vec::new(),
            lcp: Vec::new(),
            substrings: None,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    /// Append one document to the corpus
    ///
    /// Fails with `CapacityExceeded` if the corpus would grow past
    /// `max_corpus_bytes`; the corpus is left unchanged in that case.
    pub fn add(&mut self, document: &[u8]) -> Result<()> {
        let requested = self.corpus.len() + document.len();
        if requested > self.config.max_corpus_bytes {
            return Err(DictZipError::capacity_exceeded(
                requested,
                self.config.max_corpus_bytes,
            ));
        }
        self.starts.push(self.corpus.len() as u32);
        self.corpus.extend_from_slice(document);
        Ok(())
    }

    /// Append one UTF-8 text document
    pub fn add_str(&mut self, document: &str) -> Result<()> {
        self.add(document.as_bytes())
    }

    /// Documents added so far
    pub fn documents(&self) -> Documents<'_> {
        Documents {
            corpus: &self.corpus,
            starts: &self.starts,
            next: 0,
        }
    }

    /// Number of documents added
    pub fn document_count(&self) -> usize {
        self.starts.len()
    }

    /// The concatenated corpus
    pub fn corpus(&self) -> &[u8] {
        &self.corpus
    }

    /// Corpus length in bytes
    pub fn corpus_len(&self) -> usize {
        self.corpus.len()
    }

    /// Suffix array from the last optimize, including the end sentinel
    pub fn suffix_array(&self) -> &[u32] {
        &self.suffix_array
    }

    /// LCP array from the last optimize
    pub fn lcp(&self) -> &[u32] {
        &self.lcp
    }

    /// Up to `max_len` leading bytes of the suffix at `rank`
    pub fn suffix(&self, rank: usize, max_len: usize) -> Option<&[u8]> {
        let start = *self.suffix_array.get(rank)? as usize;
        let end = start + max_len.min(self.corpus.len() - start);
        Some(&self.corpus[start..end])
    }

    /// Mined candidates from the last optimize, highest score first
    pub fn ranked_substrings(&self) -> impl Iterator<Item = RankedSubstring<'_>> + '_ {
        self.substrings
            .iter()
            .flat_map(|substrings| substrings.iter().rev())
            .filter(|&(_, length, _)| length > 0)
            .map(move |(index, length, score)| {
                let start = self.suffix_array[index as usize] as usize;
                RankedSubstring {
                    score,
                    bytes: &self.corpus[start..start + length as usize],
                }
            })
    }

    /// Build a dictionary of the configured `dictionary_size`
    pub fn build_dictionary(&mut self) -> Result<Vec<u8>> {
        self.optimize(self.config.dictionary_size)
    }

    /// Build a dictionary of at most `desired_length` bytes
    ///
    /// The result is shorter than `desired_length` only when the accepted
    /// fragments run out first. Fails with `CapacityExceeded` if
    /// `desired_length` is over [`MAX_DICTIONARY_BYTES`], and with
    /// `InvalidState` if no bytes have been added.
    pub fn optimize(&mut self, desired_length: usize) -> Result<Vec<u8>> {
        if desired_length > MAX_DICTIONARY_BYTES {
            return Err(DictZipError::capacity_exceeded(
                desired_length,
                MAX_DICTIONARY_BYTES,
            ));
        }
        if self.corpus.is_empty() {
            return Err(DictZipError::invalid_state(
                "cannot optimize a dictionary over an empty corpus",
            ));
        }

        log::debug!(
            "optimizing dictionary of {} bytes over {} documents ({} bytes)",
            desired_length,
            self.starts.len(),
            self.corpus.len()
        );

        let (sa, lcp) = self.builder.build_with_lcp(&self.corpus)?;
        self.suffix_array = sa.into_vec();
        self.lcp = lcp.into_vec();

        let substrings = self.compute_substrings();
        log::debug!("mined {} candidate substrings", substrings.len());
        self.substrings = Some(substrings);

        let dictionary = self.pack(desired_length)?;
        log::debug!("built dictionary of {} bytes", dictionary.len());
        Ok(dictionary)
    }

    fn compute_substrings(&mut self) -> SubstringArray {
        let sa = &self.suffix_array;
        let lcp = &self.lcp;
        let starts = &self.starts;
        let corpus_len = self.corpus.len();

        let mut active = SubstringArray::with_capacity(128);
        let mut substrings = SubstringArray::with_capacity(1024);

        // Per-document stamp of the run that last counted it.
        let mut seen = vec![0u32; starts.len()];
        let mut generation = 0u32;

        let n = lcp.len();
        let mut last_lcp = lcp[0];
        // One step past the end closes every run still open.
        for i in 1..=n {
            let current = if i == n { 0 } else { lcp[i] };

            if current > last_lcp {
                // Shorter lengths first: the closing walk below relies on it.
                for length in last_lcp + 1..=current {
                    active.add(i as u32, length, 0);
                }
            } else if current < last_lcp {
                let mut last_emitted: Option<(u32, u32, u32)> = None;

                for j in (0..active.len()).rev() {
                    let length = active.length(j);
                    if length <= current {
                        continue;
                    }
                    let index = active.index(j);
                    let occurrences = i as u32 - index + 1;

                    generation = generation.wrapping_add(1);
                    if generation == 0 {
                        seen.fill(0);
                        generation = 1;
                    }

                    let mut documents = 0u32;
                    for &offset in &sa[index as usize - 1..i] {
                        let offset = offset as usize;
                        let doc = starts.partition_point(|&s| s as usize <= offset) - 1;
                        let next_start = starts.get(doc + 1).map_or(corpus_len, |&s| s as usize);
                        // Occurrences running into the next document do not count.
                        if length as usize <= next_start - offset && seen[doc] != generation {
                            seen[doc] = generation;
                            documents += 1;
                        }
                    }

                    active.remove(j);

                    if documents == 0 {
                        continue;
                    }

                    // A longer string with the same occurrences was just
                    // emitted; this prefix of it adds nothing.
                    let redundant = matches!(
                        last_emitted,
                        Some((last_index, last_length, last_occurrences))
                            if last_index == index
                                && last_occurrences == occurrences
                                && last_length > length
                    );
                    if !redundant && length >= MIN_CANDIDATE_LENGTH {
                        substrings.add(index, length, documents);
                    }
                    last_emitted = Some((index, length, occurrences));
                }
            }
            last_lcp = current;
        }

        substrings.sort_with(&mut self.sorter);
        substrings
    }

    fn pack(&self, desired_length: usize) -> Result<Vec<u8>> {
        let substrings = self.substrings.as_ref().ok_or_else(|| {
            DictZipError::invalid_state("substrings must be mined before packing")
        })?;
        let corpus = self.corpus.as_slice();
        let sa = self.suffix_array.as_slice();

        let mut pruned = SubstringArray::with_capacity(1024);
        let mut size = 0usize;

        for i in (0..substrings.len()).rev() {
            let covered = (0..pruned.len())
                .any(|j| pruned.index_of(j, substrings, i, corpus, sa).is_some());
            if covered {
                continue;
            }

            for j in (0..pruned.len()).rev() {
                if substrings.index_of(i, &pruned, j, corpus, sa).is_some() {
                    size -= pruned.length(j) as usize;
                    pruned.remove(j);
                }
            }
            pruned.set_score(
                pruned.len(),
                substrings.index(i),
                substrings.length(i),
                substrings.score(i),
            );
            size += substrings.length(i) as usize;

            // Overlap merging shrinks the laid-out size, so collect twice
            // the target.
            if size >= desired_length.saturating_mul(2) {
                break;
            }
        }

        log::debug!(
            "accepted {} fragments totalling {} bytes",
            pruned.len(),
            size
        );

        // Fragments never fill more than their total length.
        let capacity = desired_length.min(size);
        let mut packed = vec![0u8; capacity];
        let mut pi = capacity;
        for (index, length, _) in pruned.iter() {
            if pi == 0 {
                break;
            }
            let length = (length as usize).min(pi);
            let from = sa[index as usize] as usize;
            pi -= prepend(&corpus[from..from + length], &mut packed, pi);
        }

        Ok(packed.split_off(pi))
    }
}

/// Copy `fragment` so it ends at `to_index`, sharing the longest tail of
/// `fragment` that already starts the filled region `to[to_index..]`.
///
/// Returns the number of bytes written.
fn prepend(fragment: &[u8], to: &mut [u8], to_index: usize) -> usize {
    let length = fragment.len();
    let filled = to.len() - to_index;

    let overlap = (1..length.min(filled + 1))
        .rev()
        .find(|&l| fragment[length - l..] == to[to_index..to_index + l])
        .unwrap_or(0);

    let written = length - overlap;
    to[to_index - written..to_index].copy_from_slice(&fragment[..written]);
    written
}
