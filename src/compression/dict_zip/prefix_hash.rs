//! Hash chains keyed on 4-byte prefixes
//!
//! A [`PrefixHash`] indexes positions of one source buffer by the four bytes
//! starting there. Each bucket keeps only the newest position; a parallel
//! `chain` array links every position to the previous one in its bucket, so a
//! lookup walks candidates newest (nearest) first.
//!
//! The packer uses two of these: one over the shared dictionary, populated up
//! front, and one over the document being packed, populated as the packer
//! advances so a match can never reference bytes that have not been seen.

/// Bytes hashed per position, and the shortest usable match
pub const PREFIX_LENGTH: usize = 4;

/// Longest match a lookup reports (fits one byte downstream)
pub const MAX_MATCH_LENGTH: usize = 255;

/// Farthest back-reference a lookup reports (fits two bytes downstream)
pub const MAX_MATCH_DISTANCE: usize = 65_535;

const NO_POSITION: i32 = -1;
const HASH_CODE_MASK: u32 = 0x7f_ffff;

/// Best match found by a lookup; length 0 means nothing usable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Match {
    /// Start of the match in the hashed source buffer
    pub index: usize,
    /// Number of matching bytes
    pub length: usize,
}

impl Match {
    /// The empty match
    pub const NONE: Match = Match { index: 0, length: 0 };

    /// Whether the match covers no bytes
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// Prefix hash over a source buffer `B`
///
/// Shared dictionaries are hashed as `PrefixHash<Arc<[u8]>>`; the per-call
/// history of the packer borrows the input as `PrefixHash<&[u8]>`.
#[derive(Debug, Clone)]
pub struct PrefixHash<B: AsRef<[u8]>> {
    buffer: B,
    heads: Vec<i32>,
    chain: Vec<i32>,
}

impl<B: AsRef<[u8]>> PrefixHash<B> {
    /// Create a hash over `buffer`, optionally indexing every position now
    pub fn new(buffer: B, populate: bool) -> Self {
        let len = buffer.as_ref().len();
        let table_size = len * 7 / 4;
        let mut hash = Self {
            buffer,
            heads: vec![NO_POSITION; table_size],
            chain: vec![NO_POSITION; len],
        };
        if populate {
            for i in 0..len.saturating_sub(PREFIX_LENGTH) {
                hash.put(i);
            }
        }
        hash
    }

    /// The hashed source buffer
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// Number of buckets in the table
    pub fn table_size(&self) -> usize {
        self.heads.len()
    }

    /// Bucket of the four bytes of `buffer` starting at `i`
    ///
    /// The caller guarantees `i + PREFIX_LENGTH <= buffer.len()` and a
    /// non-empty table.
    pub fn hash_index(&self, buffer: &[u8], i: usize) -> usize {
        let code = u32::from_le_bytes([buffer[i], buffer[i + 1], buffer[i + 2], buffer[i + 3]]);
        (code & HASH_CODE_MASK) as usize % self.heads.len()
    }

    /// Push position `index` of the source buffer onto its bucket's chain
    pub fn put(&mut self, index: usize) {
        let bucket = self.hash_index(self.buffer.as_ref(), index);
        self.chain[index] = self.heads[bucket];
        self.heads[bucket] = index as i32;
    }

    /// Longest, nearest earlier occurrence of `target[index..]` in the source
    ///
    /// Distances are measured in the combined address space where the source
    /// sits immediately before `target`, or directly when `target` is the
    /// source itself. Candidates past [`MAX_MATCH_DISTANCE`] end the walk.
    pub fn get_best_match(&self, index: usize, target: &[u8]) -> Match {
        let source = self.buffer.as_ref();
        let same_buffer =
            std::ptr::eq(source.as_ptr(), target.as_ptr()) && source.len() == target.len();
        self.best_match(index, target, same_buffer)
    }

    /// Like [`get_best_match`](Self::get_best_match), but always places the
    /// source immediately before `target`, even if they are the same slice
    pub fn get_best_preceding_match(&self, index: usize, target: &[u8]) -> Match {
        self.best_match(index, target, false)
    }

    fn best_match(&self, index: usize, target: &[u8], same_buffer: bool) -> Match {
        let source = self.buffer.as_ref();
        let source_len = source.len();

        if source_len == 0 || index + PREFIX_LENGTH > target.len() {
            return Match::NONE;
        }

        let max_limit = MAX_MATCH_LENGTH.min(target.len() - index);

        let mut best = Match::NONE;
        let mut candidate = self.heads[self.hash_index(target, index)];
        while candidate >= 0 {
            let candidate_index = candidate as usize;
            let distance = if same_buffer {
                match index.checked_sub(candidate_index) {
                    Some(distance) if distance > 0 => distance,
                    // Not yet behind the cursor.
                    _ => {
                        candidate = self.chain[candidate_index];
                        continue;
                    }
                }
            } else {
                index + source_len - candidate_index
            };
            if distance > MAX_MATCH_DISTANCE {
                // Chains run nearest first, so every later candidate is farther.
                break;
            }

            let limit = max_limit.min(source_len - candidate_index);
            let length = source[candidate_index..candidate_index + limit]
                .iter()
                .zip(&target[index..index + limit])
                .take_while(|(a, b)| a == b)
                .count();

            if length > best.length {
                best = Match {
                    index: candidate_index,
                    length,
                };
            }
            candidate = self.chain[candidate_index];
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_empty_source() {
        let hash = PrefixHash::new(&b""[..], true);
        assert_eq!(hash.table_size(), 0);
        assert_eq!(hash.get_best_match(0, b"abcdef"), Match::NONE);
    }

    #[test]
    fn test_dictionary_match() {
        let dict: Arc<[u8]> = Arc::from(&b"the quick brown fox"[..]);
        let hash = PrefixHash::new(dict, true);

        let m = hash.get_best_match(0, b"quick brown cow");
        assert_eq!(m, Match { index: 4, length: 12 });
        assert!(!m.is_empty());
    }

    #[test]
    fn test_target_too_short_for_prefix() {
        let hash = PrefixHash::new(&b"abcdefgh"[..], true);
        assert_eq!(hash.get_best_match(0, b"abc"), Match::NONE);
        assert_eq!(hash.get_best_match(3, b"xxxabc"), Match::NONE);
    }

    #[test]
    fn test_last_prefix_position_not_indexed() {
        // Population stops one short of the final 4-byte window.
        let hash = PrefixHash::new(&b"xxxxabcd"[..], true);
        assert_eq!(hash.get_best_match(0, b"abcd"), Match::NONE);
        let hash = PrefixHash::new(&b"xxxabcd!"[..], true);
        assert_eq!(hash.get_best_match(0, b"abcd"), Match { index: 3, length: 4 });
    }

    #[test]
    fn test_prefers_longest_then_nearest() {
        let source = b"abcd1abcd2abcd12345";
        let hash = PrefixHash::new(&source[..], true);
        let m = hash.get_best_match(0, b"abcd1234");
        assert_eq!(m, Match { index: 10, length: 8 });

        // Equal lengths: the newest (highest) position wins.
        let hash = PrefixHash::new(&b"abcdXabcdY"[..], true);
        let m = hash.get_best_match(0, b"abcdZ");
        assert_eq!(m, Match { index: 5, length: 4 });
    }

    #[test]
    fn test_self_matching_incremental() {
        let input = b"abcdabcdabcd";
        let mut hash = PrefixHash::new(&input[..], false);
        assert_eq!(hash.get_best_match(4, input), Match::NONE);

        for i in 0..4 {
            hash.put(i);
        }
        // Overlapping self match runs to the end of the input.
        assert_eq!(hash.get_best_match(4, input), Match { index: 0, length: 8 });
    }

    #[test]
    fn test_match_length_capped() {
        let data = vec![b'a'; 1000];
        let mut hash = PrefixHash::new(&data[..], false);
        hash.put(0);
        let m = hash.get_best_match(1, &data);
        assert_eq!(m.length, MAX_MATCH_LENGTH);
    }

    #[test]
    fn test_distance_cutoff() {
        let mut source = vec![0u8; 70_000];
        source[..4].copy_from_slice(b"WXYZ");
        let hash = PrefixHash::new(&source[..], true);

        // The only occurrence sits 70_000 bytes before the target start.
        assert_eq!(hash.get_best_match(0, b"WXYZ"), Match::NONE);

        let near = PrefixHash::new(&source[..100], true);
        assert_eq!(near.get_best_match(0, b"WXYZ"), Match { index: 0, length: 4 });
    }

    #[test]
    fn test_same_slice_placement() {
        let data = b"abcdefgh-abcdefgh";
        let hash = PrefixHash::new(&data[..], true);

        // Within itself, positions at or after the cursor are not candidates.
        assert_eq!(hash.get_best_match(0, data), Match::NONE);
        assert_eq!(hash.get_best_match(9, data), Match { index: 0, length: 8 });

        // Placed before itself, every indexed position is behind the cursor.
        assert_eq!(hash.get_best_preceding_match(0, data), Match { index: 0, length: 17 });
    }
}
