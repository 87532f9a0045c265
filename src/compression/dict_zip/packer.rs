//! Greedy LZ77 packing against a shared dictionary
//!
//! [`SubstringPacker`] turns a document into literal and back-reference
//! events. Back-references address the dictionary and the document as one
//! buffer, with the dictionary immediately before the document, so an offset
//! reaching back past the start of the document lands in the dictionary.
//!
//! Matching is lazy by one byte: a match found at position `p` is held until
//! the lookup at `p + 1`. If that lookup finds a strictly longer match, the
//! byte at `p` goes out as a literal and the newer match is held instead.

use crate::compression::dict_zip::prefix_hash::{Match, PrefixHash, PREFIX_LENGTH};
use crate::compression::dict_zip::token::{PackerOutput, Token, TokenCollector};
use crate::error::Result;
use std::sync::Arc;

/// Shortest back-reference the packer emits
pub const MIN_MATCH_LENGTH: usize = PREFIX_LENGTH;

/// One-byte lookahead state
#[derive(Debug, Clone, Copy)]
enum Pending {
    Idle,
    /// Match found at the previous position, not yet emitted
    Held(Match),
}

/// Packer bound to one shared dictionary
///
/// The dictionary hash is built once and is read-only afterwards, so one
/// packer can serve any number of `pack` calls, including concurrent ones
/// behind an `Arc`.
#[derive(Debug, Clone)]
pub struct SubstringPacker {
    dict_hash: PrefixHash<Arc<[u8]>>,
}

impl SubstringPacker {
    /// Index `dictionary` for packing
    pub fn new(dictionary: Arc<[u8]>) -> Self {
        Self {
            dict_hash: PrefixHash::new(dictionary, true),
        }
    }

    /// Create a packer that works without a dictionary
    pub fn without_dictionary() -> Self {
        Self::new(Arc::from(&[][..]))
    }

    /// The shared dictionary
    pub fn dictionary(&self) -> &[u8] {
        self.dict_hash.buffer()
    }

    /// Pack `input`, driving `output` with `context`
    ///
    /// `end_encoding` is called exactly once, after the last byte of input is
    /// covered. The first error returned by the sink aborts packing.
    pub fn pack<C, O>(&self, input: &[u8], output: &mut O, context: &mut C) -> Result<()>
    where
        C: ?Sized,
        O: PackerOutput<C> + ?Sized,
    {
        let dict_len = self.dictionary().len();
        let count = input.len();
        let mut history = PrefixHash::new(input, false);

        let mut literals = 0usize;
        let mut substrings = 0usize;
        let mut pending = Pending::Idle;

        let mut curr = 0;
        while curr < count {
            let mut best = Match::NONE;

            if curr + PREFIX_LENGTH - 1 < count {
                best = self.dict_hash.get_best_preceding_match(curr, input);

                // A match inside the document is always nearer than one in
                // the dictionary, so it wins ties.
                let local = history.get_best_match(curr, input);
                if local.length >= best.length {
                    best = Match {
                        index: local.index + dict_len,
                        length: local.length,
                    };
                }

                history.put(curr);
            }

            let best = if best.length < MIN_MATCH_LENGTH {
                None
            } else {
                Some(best)
            };

            pending = match pending {
                Pending::Held(held) => match best {
                    Some(better) if better.length > held.length => {
                        output.encode_literal(input[curr - 1], context)?;
                        literals += 1;
                        Pending::Held(better)
                    }
                    _ => {
                        // The held match started one byte back.
                        let offset = -((curr + dict_len - 1 - held.index) as i64);
                        output.encode_substring(offset as i32, held.length as i32, context)?;
                        substrings += 1;

                        // Index the covered positions so repeats keep
                        // producing the same relative offsets.
                        let end = curr - 1 + held.length;
                        curr += 1;
                        while curr < end && curr + PREFIX_LENGTH < count {
                            history.put(curr);
                            curr += 1;
                        }
                        curr = end - 1;
                        Pending::Idle
                    }
                },
                Pending::Idle => match best {
                    Some(found) => Pending::Held(found),
                    None => {
                        output.encode_literal(input[curr], context)?;
                        literals += 1;
                        Pending::Idle
                    }
                },
            };

            curr += 1;
        }
        debug_assert!(matches!(pending, Pending::Idle));

        output.end_encoding(context)?;

        log::trace!(
            "packed {} bytes into {} literals and {} substrings",
            count,
            literals,
            substrings
        );
        Ok(())
    }

    /// Pack `input` and collect the events as tokens, ending with
    /// [`Token::EndOfStream`]
    pub fn pack_to_tokens(&self, input: &[u8]) -> Result<Vec<Token>> {
        let mut tokens = Vec::with_capacity(input.len() / 4 + 1);
        self.pack(input, &mut TokenCollector, &mut tokens)?;
        Ok(tokens)
    }
}
