//! Shared-dictionary compression for small documents
//!
//! Many small payloads (JSON records, URLs, log lines) are too short for a
//! standalone LZ compressor to find redundancy in, but share a great deal of
//! structure with each other. This module mines that shared structure from a
//! sample corpus into a compact dictionary, then compresses each document as
//! literals and back-references into `[dictionary][document]`.
//!
//! # Components
//!
//! - [`DictionaryOptimizer`]: builds the dictionary from sample documents
//! - [`SubstringArray`]: ranked candidate substrings used while optimizing
//! - [`PrefixHash`]: 4-byte hash chains for longest-nearest match lookup
//! - [`SubstringPacker`] / [`SubstringUnpacker`]: the token codec
//! - [`DictionaryCodec`]: both halves bound to one shared dictionary
//!
//! # Usage Example
//!
//! ```rust
//! use dictzip::compression::dict_zip::{DictionaryCodec, DictionaryOptimizer};
//!
//! let mut optimizer = DictionaryOptimizer::new();
//! for id in 0..20 {
//!     optimizer.add_str(&format!("{{\"id\":{},\"status\":\"active\"}}", id))?;
//! }
//! let dictionary = optimizer.optimize(64)?;
//!
//! let codec = DictionaryCodec::new(dictionary);
//! let tokens = codec.compress_tokens(br#"{"id":99,"status":"active"}"#)?;
//! assert_eq!(codec.decompress_tokens(&tokens)?, br#"{"id":99,"status":"active"}"#);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The token stream is meant for a downstream entropy coder, which plugs in
//! as a [`PackerOutput`]. Match lengths never exceed [`MAX_MATCH_LENGTH`] and
//! offsets never exceed [`MAX_MATCH_DISTANCE`], so both fit fixed-width
//! fields of one and two bytes.

pub mod codec;
pub mod optimizer;
pub mod packer;
pub mod prefix_hash;
pub mod substring_array;
pub mod token;
pub mod unpacker;

// Re-export main types for convenient access
pub use codec::{DictionaryCodec, TokenStats};
pub use optimizer::{DictionaryOptimizer, Documents, RankedSubstring};
pub use packer::{SubstringPacker, MIN_MATCH_LENGTH};
pub use prefix_hash::{Match, PrefixHash, MAX_MATCH_DISTANCE, MAX_MATCH_LENGTH, PREFIX_LENGTH};
pub use substring_array::{compute_score, SubstringArray};
pub use token::{PackerOutput, Token, TokenCollector, TokenSource};
pub use unpacker::SubstringUnpacker;

use crate::algorithms::suffix_array::MAX_TEXT_LEN;
use crate::error::Result;

/// Largest corpus the optimizer can index
pub const MAX_CORPUS_BYTES: usize = MAX_TEXT_LEN;

/// Largest dictionary a configuration may request
pub const MAX_DICTIONARY_BYTES: usize = 16 * 1024 * 1024;

/// Build a dictionary of at most `desired_length` bytes from `documents`
pub fn train_dictionary<I, D>(documents: I, desired_length: usize) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = D>,
    D: AsRef<[u8]>,
{
    let mut optimizer = DictionaryOptimizer::new();
    for document in documents {
        optimizer.add(document.as_ref())?;
    }
    optimizer.optimize(desired_length)
}
