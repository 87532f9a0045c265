//! Reconstruct bytes from literal/back-reference events
//!
//! Back-references address one logical buffer: the shared dictionary followed
//! by everything decoded so far. A reference that starts inside the
//! dictionary and runs past its end continues at the start of the output.

use crate::compression::dict_zip::token::PackerOutput;
use crate::error::{check_range, DictZipError, Result};
use std::sync::Arc;

/// Decoder state for one stream against a shared dictionary
#[derive(Debug, Clone)]
pub struct SubstringUnpacker {
    dictionary: Arc<[u8]>,
    buffer: Vec<u8>,
}

impl SubstringUnpacker {
    /// Create an unpacker over `dictionary`
    pub fn new(dictionary: Arc<[u8]>) -> Self {
        Self {
            dictionary,
            buffer: Vec::new(),
        }
    }

    /// The shared dictionary
    pub fn dictionary(&self) -> &[u8] {
        &self.dictionary
    }

    /// Forget decoded output so the unpacker can decode another stream
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Output decoded so far
    pub fn uncompressed_data(&self) -> &[u8] {
        &self.buffer
    }

    /// Take the decoded output, leaving the unpacker empty
    pub fn take_uncompressed_data(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.buffer)
    }

    /// Append one literal byte
    pub fn encode_literal(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    /// Copy `length` bytes starting `-offset` bytes back in
    /// `[dictionary][output]`
    ///
    /// The reference must start behind the current position and not before
    /// the start of the dictionary.
    pub fn encode_substring(&mut self, offset: i32, length: i32) -> Result<()> {
        if offset >= 0 {
            return Err(DictZipError::invalid_data(format!(
                "back-reference offset must be negative, got {}",
                offset
            )));
        }
        if length < 0 {
            return Err(DictZipError::invalid_data(format!(
                "back-reference length must not be negative, got {}",
                length
            )));
        }

        let dict_len = self.dictionary.len();
        let history = dict_len + self.buffer.len();
        let distance = offset.unsigned_abs() as usize;
        check_range(0, distance, history)?;

        let length = length as usize;
        let start = history - distance;
        self.buffer.reserve(length);
        if start < dict_len {
            let end_dict = (start + length).min(dict_len);
            self.buffer.extend_from_slice(&self.dictionary[start..end_dict]);

            // The logical buffer continues with the output, from its start.
            // The dictionary part above always adds at least one byte, so the
            // read position stays behind the write position.
            let spill = length - (end_dict - start);
            for i in 0..spill {
                let byte = self.buffer[i];
                self.buffer.push(byte);
            }
        } else {
            // Byte by byte: source and destination may overlap.
            let start = start - dict_len;
            for i in 0..length {
                let byte = self.buffer[start + i];
                self.buffer.push(byte);
            }
        }
        Ok(())
    }
}

impl<C: ?Sized> PackerOutput<C> for SubstringUnpacker {
    fn encode_literal(&mut self, byte: u8, _context: &mut C) -> Result<()> {
        SubstringUnpacker::encode_literal(self, byte);
        Ok(())
    }

    fn encode_substring(&mut self, offset: i32, length: i32, _context: &mut C) -> Result<()> {
        SubstringUnpacker::encode_substring(self, offset, length)
    }

    fn end_encoding(&mut self, _context: &mut C) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unpacker(dictionary: &[u8]) -> SubstringUnpacker {
        SubstringUnpacker::new(Arc::from(dictionary))
    }

    #[test]
    fn test_literals() {
        let mut u = unpacker(b"");
        for &b in b"plain" {
            u.encode_literal(b);
        }
        assert_eq!(u.uncompressed_data(), b"plain");
    }

    #[test]
    fn test_dictionary_reference() {
        let mut u = unpacker(b"hello ");
        for &b in b"world" {
            u.encode_literal(b);
        }
        // 11 back from the end of "hello world" is the start of the dictionary.
        u.encode_substring(-11, 6).unwrap();
        assert_eq!(u.uncompressed_data(), b"worldhello ");

        let mut logical = u.dictionary().to_vec();
        logical.extend_from_slice(u.uncompressed_data());
        assert_eq!(logical, b"hello worldhello ");
    }

    #[test]
    fn test_reference_spills_from_dictionary_into_output() {
        let mut u = unpacker(b"hello ");
        for &b in b"world" {
            u.encode_literal(b);
        }
        u.encode_substring(-11, 9).unwrap();
        assert_eq!(u.uncompressed_data(), b"worldhello wor");
    }

    #[test]
    fn test_overlapping_self_reference() {
        let mut u = unpacker(b"");
        u.encode_literal(b'a');
        u.encode_literal(b'b');
        u.encode_substring(-2, 6).unwrap();
        assert_eq!(u.uncompressed_data(), b"abababab");

        u.encode_substring(-1, 3).unwrap();
        assert_eq!(u.uncompressed_data(), b"ababababbbb");
    }

    #[test]
    fn test_rejects_malformed_references() {
        let mut u = unpacker(b"dict");
        u.encode_literal(b'x');
        assert!(u.encode_substring(0, 1).is_err());
        assert!(u.encode_substring(-1, -1).is_err());
        assert!(matches!(
            u.encode_substring(-6, 1),
            Err(DictZipError::OutOfBounds { index: 6, size: 5 })
        ));
        // Failed references leave the output untouched.
        assert_eq!(u.uncompressed_data(), b"x");
    }

    #[test]
    fn test_rejected_reference_allocates_nothing() {
        let mut u = unpacker(b"dict");
        u.encode_literal(b'x');
        assert!(matches!(
            u.encode_substring(-100, i32::MAX),
            Err(DictZipError::OutOfBounds { index: 100, size: 5 })
        ));
        assert!(matches!(
            u.encode_substring(i32::MIN, i32::MAX),
            Err(DictZipError::OutOfBounds { .. })
        ));
        let output = u.take_uncompressed_data();
        assert_eq!(output, b"x");
        assert!(output.capacity() < 1024);
    }

    #[test]
    fn test_reset_and_take() {
        let mut u = unpacker(b"abcd");
        u.encode_substring(-4, 4).unwrap();
        assert_eq!(u.uncompressed_data(), b"abcd");
        u.reset();
        assert!(u.uncompressed_data().is_empty());

        u.encode_literal(b'z');
        assert_eq!(u.take_uncompressed_data(), b"z".to_vec());
        assert!(u.uncompressed_data().is_empty());
    }
}
