//! BER decoding.
//!
//! `Decoder` is a cursor over a [`Bytes`] buffer. Primitive `read_*` methods
//! expect the tag to already be consumed by the caller (the value decoders
//! in `crate::value` strip the tag before dispatching, matching this crate's
//! "decode presumes the tag has already been consumed"). `read_sequence`
//! strips both tag and length and hands back a sub-decoder scoped to
//! exactly the declared content, which is how constructed decode enforces
//! "trailing bytes" / "short payload" without extra bookkeeping.

use bytes::{Buf, Bytes};

use super::length::decode_length;
use super::tag;
use crate::error::{Error, Result};
use crate::oid::Oid;

/// A cursor over a BER-encoded byte buffer.
pub struct Decoder {
    buf: Bytes,
}

impl Decoder {
    /// Create a decoder over the given bytes.
    pub fn new(buf: Bytes) -> Self {
        Self { buf }
    }

    /// Remaining, undecoded bytes.
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// True if no bytes remain.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Peek the next tag byte without consuming it. Used by callers that
    /// need to dispatch on tag before deciding how to decode (e.g. the
    /// polymorphic value factory, or Opaque's float-recognition check).
    pub fn peek_tag(&self) -> Result<u8> {
        self.buf.first().copied().ok_or(Error::MalformedTag)
    }

    /// Peek the next two bytes without consuming them (for the multi-byte
    /// `OpaqueFloat` tag).
    pub fn peek_tag2(&self) -> Option<[u8; 2]> {
        if self.buf.len() >= 2 {
            Some([self.buf[0], self.buf[1]])
        } else {
            None
        }
    }

    /// Consume and return the next tag byte.
    pub fn read_tag_byte(&mut self) -> Result<u8> {
        if self.buf.is_empty() {
            return Err(Error::MalformedTag);
        }
        Ok(self.buf.get_u8())
    }

    /// Consume `n` tag bytes (for the multi-byte `OpaqueFloat` tag).
    pub fn skip_tag_bytes(&mut self, n: usize) -> Result<()> {
        if self.buf.len() < n {
            return Err(Error::MalformedTag);
        }
        self.buf.advance(n);
        Ok(())
    }

    /// Read a BER length from the front of the buffer.
    fn read_length(&mut self) -> Result<usize> {
        let (len, consumed) = decode_length(&self.buf)?;
        self.buf.advance(consumed);
        Ok(len)
    }

    /// Split off exactly `len` bytes as the content of a TLV, advancing past
    /// them. Fails with [`Error::ShortPayload`] if fewer than `len` bytes
    /// remain.
    fn take_content(&mut self, len: usize, field: &'static str) -> Result<Bytes> {
        if self.buf.len() < len {
            return Err(Error::ShortPayload { field });
        }
        Ok(self.buf.split_to(len))
    }

    /// Expect and consume a specific tag byte.
    pub fn expect_tag(&mut self, expected: u8) -> Result<()> {
        let actual = self.read_tag_byte()?;
        if actual != expected {
            return Err(Error::UnknownTag { tag: actual });
        }
        Ok(())
    }

    /// Read a BOOLEAN. Tag already consumed by the caller via
    /// [`Decoder::expect_tag`] or the value factory.
    pub fn read_boolean(&mut self) -> Result<bool> {
        let len = self.read_length()?;
        let content = self.take_content(len, "Boolean")?;
        if content.len() != 1 {
            return Err(Error::ShortPayload { field: "Boolean" });
        }
        Ok(content[0] != 0)
    }

    /// Read an INTEGER (minimal two's-complement signed bytes, MSB-first).
    pub fn read_integer(&mut self) -> Result<i32> {
        let len = self.read_length()?;
        let content = self.take_content(len, "Integer")?;
        if content.is_empty() {
            return Err(Error::ShortPayload { field: "Integer" });
        }
        let mut value: i32 = if content[0] & 0x80 != 0 { -1 } else { 0 };
        for &byte in &content {
            value = (value << 8) | byte as i32;
        }
        Ok(value)
    }

    /// Read an unsigned value of up to 4 bytes (Counter32, Gauge32,
    /// TimeTicks): minimal unsigned big-endian with a mandatory leading zero
    /// when the MSB would otherwise be set.
    pub fn read_unsigned32(&mut self, field: &'static str) -> Result<u32> {
        let len = self.read_length()?;
        let content = self.take_content(len, field)?;
        if content.is_empty() || content.len() > 5 {
            return Err(Error::ShortPayload { field });
        }
        let mut value: u64 = 0;
        for &byte in &content {
            value = (value << 8) | byte as u64;
        }
        if value > u32::MAX as u64 {
            return Err(Error::ShortPayload { field });
        }
        Ok(value as u32)
    }

    /// Read an unsigned 64-bit value (Counter64): may occupy 1-9 bytes.
    pub fn read_counter64(&mut self) -> Result<u64> {
        let len = self.read_length()?;
        let content = self.take_content(len, "Counter64")?;
        if content.is_empty() || content.len() > 9 {
            return Err(Error::ShortPayload { field: "Counter64" });
        }
        let mut value: u128 = 0;
        for &byte in &content {
            value = (value << 8) | byte as u128;
        }
        if value > u64::MAX as u128 {
            return Err(Error::ShortPayload { field: "Counter64" });
        }
        Ok(value as u64)
    }

    /// Read an OCTET STRING.
    pub fn read_octet_string(&mut self) -> Result<Bytes> {
        let len = self.read_length()?;
        self.take_content(len, "OctetString")
    }

    /// Read a NULL (or one of the context-tagged zero-payload siblings);
    /// fails if the declared length is non-zero.
    pub fn read_null(&mut self) -> Result<()> {
        let len = self.read_length()?;
        if len != 0 {
            return Err(Error::ShortPayload { field: "Null" });
        }
        Ok(())
    }

    /// Read an OBJECT IDENTIFIER.
    pub fn read_oid(&mut self) -> Result<Oid> {
        let len = self.read_length()?;
        let content = self.take_content(len, "ObjectIdentifier")?;
        Oid::from_ber(&content)
    }

    /// Read an IP address (exactly 4 bytes).
    pub fn read_ip_address(&mut self) -> Result<[u8; 4]> {
        let len = self.read_length()?;
        let content = self.take_content(len, "IpAddress")?;
        if content.len() != 4 {
            return Err(Error::ShortPayload {
                field: "IpAddress",
            });
        }
        let mut addr = [0u8; 4];
        addr.copy_from_slice(&content);
        Ok(addr)
    }

    /// Read an IEEE-754 single-precision float (exactly 4 bytes, big-endian).
    pub fn read_float(&mut self) -> Result<f32> {
        let len = self.read_length()?;
        let content = self.take_content(len, "Float")?;
        if content.len() != 4 {
            return Err(Error::ShortPayload { field: "Float" });
        }
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&content);
        Ok(f32::from_bits(u32::from_be_bytes(raw)))
    }

    /// Read raw bytes of exactly `len` without interpreting them (used for
    /// the generic Opaque payload).
    pub fn read_raw(&mut self, len: usize, field: &'static str) -> Result<Bytes> {
        self.take_content(len, field)
    }

    /// Consume the SEQUENCE tag and length, returning a sub-decoder scoped
    /// to exactly the declared content bytes. Constructed decode loops
    /// drive child decode from this sub-decoder and check `is_empty()`
    /// afterward — any remainder is a short payload, any attempt to read
    /// past the end is a trailing-bytes error surfaced by the caller.
    pub fn read_sequence(&mut self) -> Result<Decoder> {
        self.expect_tag(tag::universal::SEQUENCE)?;
        let len = self.read_length()?;
        let content = self.take_content(len, "Sequence")?;
        Ok(Decoder::new(content))
    }

    /// Like [`Decoder::read_sequence`] but for an arbitrary constructed tag
    /// (used for PDU bodies, whose tag identifies the PDU kind).
    pub fn read_constructed(&mut self, expected_tag: u8) -> Result<Decoder> {
        self.expect_tag(expected_tag)?;
        let len = self.read_length()?;
        let content = self.take_content(len, "Constructed")?;
        Ok(Decoder::new(content))
    }

    /// Read the content octets of an Opaque TLV (tag already consumed),
    /// without interpreting them — the caller checks for the nested
    /// `OpaqueFloat` tag itself.
    pub fn read_opaque_content(&mut self) -> Result<Bytes> {
        let len = self.read_length()?;
        self.take_content(len, "Opaque")
    }

    /// Consumes `self`, failing with [`Error::TrailingBytes`] if any bytes
    /// remain. Called after decoding a constructed region's known, fixed-
    /// shape fields (e.g. a PDU's header fields plus its VarBindList) to
    /// reject extra content the declared length made room for but the
    /// shape doesn't define.
    pub fn finish(self, field: &'static str) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::TrailingBytes { field })
        }
    }
}
