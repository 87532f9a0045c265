//! # dictzip: Shared-Dictionary Compression for Small Documents
//!
//! This crate builds a compact reference dictionary from a corpus of small,
//! similar documents, and compresses individual documents against it as a
//! stream of literal bytes and back-references, ready for a downstream
//! entropy coder.
//!
//! ## Key Features
//!
//! - **Suffix Arrays**: bucket/doubling suffix sort with Kasai LCP arrays
//! - **Dictionary Optimization**: substrings ranked by the number of distinct
//!   documents they occur in, pruned for containment, merged on overlap
//! - **Lazy LZ77 Packing**: hash-chain matching against dictionary and history
//!   with one byte of lookahead
//! - **Pluggable Sinks**: any entropy coder can consume the token stream
//!
//! ## Quick Start
//!
//! ```rust
//! use dictzip::{DictionaryCodec, DictionaryOptimizer};
//!
//! let mut optimizer = DictionaryOptimizer::new();
//! optimizer.add(b"http://example.com/a")?;
//! optimizer.add(b"http://example.com/b")?;
//! optimizer.add(b"http://example.com/c")?;
//! let dictionary = optimizer.optimize(16)?;
//!
//! let codec = DictionaryCodec::new(dictionary);
//! let tokens = codec.compress_tokens(b"http://example.com/d")?;
//! assert_eq!(codec.decompress_tokens(&tokens)?, b"http://example.com/d");
//! # Ok::<(), dictzip::DictZipError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod algorithms;
pub mod compression;
pub mod config;
pub mod error;

// Re-export core types
pub use error::{DictZipError, Result};

pub use algorithms::{AlgorithmStats, LcpArray, RadixSort, SuffixArray, SuffixArrayBuilder, SuffixArrayConfig};

pub use compression::dict_zip::{
    compute_score, train_dictionary, DictionaryCodec, DictionaryOptimizer, Documents, Match,
    PackerOutput, PrefixHash, RankedSubstring, SubstringArray, SubstringPacker, SubstringUnpacker,
    Token, TokenCollector, TokenSource, TokenStats, MAX_CORPUS_BYTES, MAX_DICTIONARY_BYTES,
    MAX_MATCH_DISTANCE, MAX_MATCH_LENGTH,
};

pub use config::{Config, DictionaryConfig};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library; logs the version at debug level
pub fn init() {
    log::debug!("Initializing dictzip v{}", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        init();
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_version_info() {
        assert!(VERSION.contains('.'));
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2);
    }

    #[test]
    fn test_re_exports() {
        let _optimizer = DictionaryOptimizer::new();
        let _codec = DictionaryCodec::new(Vec::<u8>::new());
        let _config = DictionaryConfig::default();

        let _err = DictZipError::invalid_data("test");
        assert!(std::any::type_name::<Result<()>>().contains("DictZipError"));
    }

    #[test]
    fn test_multiple_init_calls() {
        init();
        init();
        init();
    }
}
