//! The literal/back-reference token boundary
//!
//! The packer does not produce bytes. It drives a [`PackerOutput`] sink with
//! a sequence of events: literal bytes, substring back-references, and one
//! final end-of-stream call. An entropy coder is the usual sink; the
//! [`TokenCollector`] simply records the events as [`Token`]s.
//!
//! Going the other way, a [`TokenSource`] replays events into a
//! [`SubstringUnpacker`] in their original order.

use crate::compression::dict_zip::unpacker::SubstringUnpacker;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// One event of a packed stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// A byte copied through unchanged
    Literal(u8),
    /// Copy `length` bytes starting `-offset` bytes back in
    /// `[dictionary][output so far]`
    Substring {
        /// Negative displacement from the current output position
        offset: i32,
        /// Number of bytes to copy
        length: i32,
    },
    /// Terminal marker
    EndOfStream,
}

impl Token {
    /// Number of output bytes this token produces
    pub fn output_len(&self) -> usize {
        match *self {
            Token::Literal(_) => 1,
            Token::Substring { length, .. } => length.max(0) as usize,
            Token::EndOfStream => 0,
        }
    }
}

/// Sink for the events emitted by
/// [`SubstringPacker`](crate::compression::dict_zip::SubstringPacker)
///
/// `context` is an opaque per-call value handed through unchanged, so one sink
/// (for example a shared entropy model) can serve many pack calls without
/// holding per-call state itself.
pub trait PackerOutput<C: ?Sized> {
    /// Emit one literal byte
    fn encode_literal(&mut self, byte: u8, context: &mut C) -> Result<()>;

    /// Emit a back-reference; `offset` is negative
    fn encode_substring(&mut self, offset: i32, length: i32, context: &mut C) -> Result<()>;

    /// Flush any trailing state; called exactly once per pack
    fn end_encoding(&mut self, context: &mut C) -> Result<()>;
}

/// Stateless sink that appends every event to a `Vec<Token>` context
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCollector;

impl PackerOutput<Vec<Token>> for TokenCollector {
    fn encode_literal(&mut self, byte: u8, tokens: &mut Vec<Token>) -> Result<()> {
        tokens.push(Token::Literal(byte));
        Ok(())
    }

    fn encode_substring(&mut self, offset: i32, length: i32, tokens: &mut Vec<Token>) -> Result<()> {
        tokens.push(Token::Substring { offset, length });
        Ok(())
    }

    fn end_encoding(&mut self, tokens: &mut Vec<Token>) -> Result<()> {
        tokens.push(Token::EndOfStream);
        Ok(())
    }
}

/// A decoded event stream that can be replayed into an unpacker
pub trait TokenSource {
    /// Feed every event, in emission order, to `unpacker`
    fn replay(&self, unpacker: &mut SubstringUnpacker) -> Result<()>;
}

impl TokenSource for [Token] {
    fn replay(&self, unpacker: &mut SubstringUnpacker) -> Result<()> {
        for token in self {
            match *token {
                Token::Literal(byte) => unpacker.encode_literal(byte),
                Token::Substring { offset, length } => unpacker.encode_substring(offset, length)?,
                Token::EndOfStream => break,
            }
        }
        Ok(())
    }
}

impl TokenSource for Vec<Token> {
    fn replay(&self, unpacker: &mut SubstringUnpacker) -> Result<()> {
        self.as_slice().replay(unpacker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_collector_records_events() {
        let mut tokens = Vec::new();
        let mut sink = TokenCollector;
        sink.encode_literal(b'a', &mut tokens).unwrap();
        sink.encode_substring(-4, 6, &mut tokens).unwrap();
        sink.end_encoding(&mut tokens).unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal(b'a'),
                Token::Substring { offset: -4, length: 6 },
                Token::EndOfStream
            ]
        );
    }

    #[test]
    fn test_replay_stops_at_end_marker() {
        let tokens = vec![
            Token::Literal(b'x'),
            Token::EndOfStream,
            Token::Literal(b'y'),
        ];
        let mut unpacker = SubstringUnpacker::new(Arc::from(&b""[..]));
        tokens.replay(&mut unpacker).unwrap();
        assert_eq!(unpacker.uncompressed_data(), b"x");
    }

    #[test]
    fn test_token_serde() {
        let tokens = vec![Token::Literal(7), Token::Substring { offset: -9, length: 4 }];
        let json = serde_json::to_string(&tokens).unwrap();
        let back: Vec<Token> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tokens);
    }
}
