//! Dictionary-bound compressor and decompressor pair
//!
//! [`DictionaryCodec`] owns a shared dictionary and its packer. It hands the
//! token stream to any [`PackerOutput`] (normally an entropy coder), or
//! collects it as [`Token`]s for in-memory use.

use crate::compression::dict_zip::packer::SubstringPacker;
use crate::compression::dict_zip::token::{PackerOutput, Token, TokenSource};
use crate::compression::dict_zip::unpacker::SubstringUnpacker;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Summary counts over a token stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenStats {
    /// Literal tokens
    pub literals: usize,
    /// Substring tokens
    pub substrings: usize,
    /// Substring tokens that start inside the dictionary
    pub dictionary_references: usize,
    /// Bytes produced by substring tokens
    pub matched_bytes: usize,
    /// Total decoded length
    pub output_bytes: usize,
}

impl TokenStats {
    /// Tally a token stream up to its end marker
    pub fn from_tokens(tokens: &[Token]) -> Self {
        let mut stats = Self::default();
        for token in tokens {
            match *token {
                Token::Literal(_) => stats.literals += 1,
                Token::Substring { offset, .. } => {
                    stats.substrings += 1;
                    stats.matched_bytes += token.output_len();
                    if (stats.output_bytes as i64) + (offset as i64) < 0 {
                        stats.dictionary_references += 1;
                    }
                }
                Token::EndOfStream => break,
            }
            stats.output_bytes += token.output_len();
        }
        stats
    }

    /// Fraction of output bytes covered by back-references
    pub fn match_ratio(&self) -> f64 {
        if self.output_bytes == 0 {
            return 0.0;
        }
        self.matched_bytes as f64 / self.output_bytes as f64
    }
}

/// Compressor and decompressor bound to one shared dictionary
///
/// Cloning is cheap: clones share the dictionary and its hash.
#[derive(Debug, Clone)]
pub struct DictionaryCodec {
    dictionary: Arc<[u8]>,
    packer: Arc<SubstringPacker>,
}

impl DictionaryCodec {
    /// Create a codec over `dictionary`
    pub fn new(dictionary: impl Into<Arc<[u8]>>) -> Self {
        let dictionary = dictionary.into();
        let packer = Arc::new(SubstringPacker::new(Arc::clone(&dictionary)));
        Self { dictionary, packer }
    }

    /// The shared dictionary
    pub fn dictionary(&self) -> &[u8] {
        &self.dictionary
    }

    /// The packer, for callers that drive their own sinks
    pub fn packer(&self) -> &SubstringPacker {
        &self.packer
    }

    /// An empty unpacker sharing this codec's dictionary
    pub fn unpacker(&self) -> SubstringUnpacker {
        SubstringUnpacker::new(Arc::clone(&self.dictionary))
    }

    /// Pack `input` into `sink`
    pub fn compress_into<C, O>(&self, input: &[u8], sink: &mut O, context: &mut C) -> Result<()>
    where
        C: ?Sized,
        O: PackerOutput<C> + ?Sized,
    {
        self.packer.pack(input, sink, context)
    }

    /// Pack `input` into a token vector ending with [`Token::EndOfStream`]
    pub fn compress_tokens(&self, input: &[u8]) -> Result<Vec<Token>> {
        self.packer.pack_to_tokens(input)
    }

    /// Rebuild the bytes described by `tokens`
    pub fn decompress_tokens<S>(&self, tokens: &S) -> Result<Vec<u8>>
    where
        S: TokenSource + ?Sized,
    {
        let mut unpacker = self.unpacker();
        tokens.replay(&mut unpacker)?;
        Ok(unpacker.take_uncompressed_data())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DictZipError;

    #[test]
    fn test_round_trip() {
        let codec = DictionaryCodec::new(&b"{\"name\":\"\",\"email\":\"\"}"[..]);
        let input = br#"{"name":"ada","email":"ada@example.com"}"#;
        let tokens = codec.compress_tokens(input).unwrap();
        assert_eq!(tokens.last(), Some(&Token::EndOfStream));
        assert_eq!(codec.decompress_tokens(&tokens).unwrap(), input);
        assert_eq!(codec.decompress_tokens(&tokens[..]).unwrap(), input);
    }

    #[test]
    fn test_empty_dictionary() {
        let codec = DictionaryCodec::new(Vec::<u8>::new());
        assert!(codec.dictionary().is_empty());
        let input = b"no dictionary, no dictionary, no dictionary";
        let tokens = codec.compress_tokens(input).unwrap();
        assert_eq!(codec.decompress_tokens(&tokens).unwrap(), input);
        assert_eq!(TokenStats::from_tokens(&tokens).dictionary_references, 0);
    }

    #[test]
    fn test_compress_into_unpacker() {
        let codec = DictionaryCodec::new(&b"shared header: "[..]);
        let mut unpacker = codec.unpacker();
        codec
            .compress_into(b"shared header: body", &mut unpacker, &mut ())
            .unwrap();
        assert_eq!(unpacker.uncompressed_data(), b"shared header: body");
    }

    #[test]
    fn test_decompress_rejects_bad_reference() {
        let codec = DictionaryCodec::new(&b"abc"[..]);
        let tokens = vec![Token::Substring { offset: -4, length: 2 }, Token::EndOfStream];
        assert!(matches!(
            codec.decompress_tokens(&tokens),
            Err(DictZipError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_token_stats() {
        let tokens = [
            Token::Literal(b'a'),
            Token::Literal(b'b'),
            Token::Substring { offset: -2, length: 6 },
            Token::Substring { offset: -12, length: 4 },
            Token::EndOfStream,
            Token::Literal(b'z'),
        ];
        let stats = TokenStats::from_tokens(&tokens);
        assert_eq!(stats.literals, 2);
        assert_eq!(stats.substrings, 2);
        assert_eq!(stats.dictionary_references, 1);
        assert_eq!(stats.matched_bytes, 10);
        assert_eq!(stats.output_bytes, 12);
        assert_eq!(TokenStats::default().match_ratio(), 0.0);
        assert!((stats.match_ratio() - 10.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_stats_count_dictionary_hits() {
        let codec = DictionaryCodec::new(&b"hello world"[..]);
        let tokens = codec.compress_tokens(b"hello world").unwrap();
        let stats = TokenStats::from_tokens(&tokens);
        assert_eq!(stats.dictionary_references, 1);
        assert_eq!(stats.literals, 0);
        assert_eq!(stats.match_ratio(), 1.0);
    }

    #[test]
    fn test_clones_share_dictionary() {
        let codec = DictionaryCodec::new(&b"dictionary bytes"[..]);
        let clone = codec.clone();
        assert!(std::ptr::eq(codec.dictionary().as_ptr(), clone.dictionary().as_ptr()));
        assert!(std::ptr::eq(codec.dictionary().as_ptr(), codec.packer().dictionary().as_ptr()));
    }
}
