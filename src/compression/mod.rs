//! Compression algorithms
//!
//! [`dict_zip`] holds the shared-dictionary codec: dictionary optimization,
//! substring packing, and unpacking.

pub mod dict_zip;

pub use dict_zip::{
    DictionaryCodec, DictionaryOptimizer, PackerOutput, SubstringPacker, SubstringUnpacker, Token,
    TokenCollector, TokenSource, TokenStats,
};
