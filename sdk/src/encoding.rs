//! # Canonical Encoding
//!
//! The byte layout that gets hashed and signed. This is not a wire format:
//! nothing ever decodes these bytes. Its only job is to turn the same logical
//! value into the same bytes on every machine, in every language, forever.
//!
//! ## Rules
//!
//! - Integers are fixed-width big-endian (`i64` as 8 bytes, `i32` as 4).
//! - Variable-length values carry a 4-byte big-endian length prefix.
//! - Strings are written one byte per character (Latin-1), never as
//!   multi-byte UTF-8. A character above `U+00FF` has no Latin-1 byte; it is
//!   written as its UTF-8 bytes so encoding stays total. Values built by this
//!   SDK never hit that path because action arguments are ASCII-escaped JSON.
//! - Slices write their element count, then each element with the scalar
//!   writer for its type.
//!
//! Field order is the caller's responsibility. See
//! [`Transaction::base_bytes`](crate::transaction::Transaction::base_bytes)
//! for the one ordering that matters.

/// Append-only buffer implementing the canonical encoding rules.
///
/// Writers return `&mut Self` so a record can be encoded in one chain:
///
/// ```
/// use iost_sdk::encoding::CanonicalEncoder;
///
/// let mut enc = CanonicalEncoder::new();
/// enc.write_string("token.iost").write_int64(42);
/// assert_eq!(enc.len(), 4 + 10 + 8);
/// ```
#[derive(Debug, Default, Clone)]
pub struct CanonicalEncoder {
    buf: Vec<u8>,
}

impl CanonicalEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Writes a single raw byte, no prefix.
    pub fn write_byte(&mut self, b: u8) -> &mut Self {
        self.buf.push(b);
        self
    }

    /// 8 bytes, big-endian. Negative values are written in two's complement,
    /// which matches an unsigned write of the same bit pattern.
    pub fn write_int64(&mut self, i: i64) -> &mut Self {
        self.buf.extend_from_slice(&i.to_be_bytes());
        self
    }

    /// 4 bytes, big-endian.
    pub fn write_int32(&mut self, i: i32) -> &mut Self {
        self.buf.extend_from_slice(&i.to_be_bytes());
        self
    }

    /// Length prefix followed by the raw bytes.
    pub fn write_bytes(&mut self, b: &[u8]) -> &mut Self {
        self.write_len(b.len());
        self.buf.extend_from_slice(b);
        self
    }

    /// Latin-1 encodes `s`, then writes it as [`write_bytes`](Self::write_bytes).
    pub fn write_string(&mut self, s: &str) -> &mut Self {
        self.write_bytes(&latin1_bytes(s))
    }

    pub fn write_string_slice<S: AsRef<str>>(&mut self, items: &[S]) -> &mut Self {
        self.write_len(items.len());
        for item in items {
            self.write_string(item.as_ref());
        }
        self
    }

    pub fn write_bytes_slice<B: AsRef<[u8]>>(&mut self, items: &[B]) -> &mut Self {
        self.write_len(items.len());
        for item in items {
            self.write_bytes(item.as_ref());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Copy of the accumulated buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buf.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // Lengths and counts share the int32 layout. Anything past u32::MAX
    // would be rejected by the node long before it got here.
    fn write_len(&mut self, len: usize) {
        self.buf.extend_from_slice(&(len as u32).to_be_bytes());
    }
}

/// A value with a canonical byte representation.
pub trait CanonicalEncode {
    /// Appends this value's fields to `enc` in their fixed order.
    fn encode(&self, enc: &mut CanonicalEncoder);

    /// Standalone canonical bytes, as nested inside a bytes slice.
    fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut enc = CanonicalEncoder::new();
        self.encode(&mut enc);
        enc.into_bytes()
    }
}

/// One byte per character for Latin-1 text; UTF-8 bytes for anything above.
pub(crate) fn latin1_bytes(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    for c in s.chars() {
        match u8::try_from(u32::from(c)) {
            Ok(b) => out.push(b),
            Err(_) => {
                let mut utf8 = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
        }
    }
    out
}

/// Inverse of Latin-1 encoding: every byte becomes the char with the same
/// code point. Never fails.
pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
