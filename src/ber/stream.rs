//! The streaming seam: a byte-sink/byte-source pair that produces
//! byte-identical output to the buffer path.
//!
//! Build always assembles the full [`EncodeBuf`](super::EncodeBuf) first —
//! BER's length-before-value layout means a constructed TLV's length is
//! known only once its content is fully written, so there's nothing to gain
//! from writing a message one field at a time — then walks the result
//! through a [`ByteSink`]. Decode reads exactly one BER TLV's tag and length
//! incrementally through a [`ByteSource`]'s one-byte-lookahead interface,
//! then hands the now-known-length content to the same zero-copy
//! [`Decoder`](super::Decoder) the buffer path uses.

use bytes::Bytes;

use crate::error::{Error, Result};

/// A destination a message can be written to one byte (or slice) at a time.
pub trait ByteSink {
    fn write_byte(&mut self, byte: u8) -> Result<()>;

    /// Write a whole slice. The default forwards to [`ByteSink::write_byte`];
    /// implementations with a bulk path (e.g. `io::Write`) should override it.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        for &b in bytes {
            self.write_byte(b)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> ByteSink for W {
    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_all(&[byte]).map_err(Into::into)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_all(bytes).map_err(Into::into)
    }
}

/// A source a message can be read from one byte at a time, with a single
/// byte of lookahead (needed to tell a long-form tag/length continuation
/// byte from the next TLV's first byte).
pub trait ByteSource {
    /// Consume and return the next byte, or `None` at end of stream.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Return the next byte without consuming it, or `None` at end of stream.
    fn peek_byte(&mut self) -> Result<Option<u8>>;
}

/// Adapts any [`std::io::Read`] into a [`ByteSource`] via a one-byte
/// lookahead buffer.
pub struct IoByteSource<R> {
    inner: R,
    lookahead: Option<u8>,
}

impl<R: std::io::Read> IoByteSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            lookahead: None,
        }
    }

    fn read_raw(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.inner.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) => Err(e.into()),
        }
    }
}

impl<R: std::io::Read> ByteSource for IoByteSource<R> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.lookahead.take() {
            return Ok(Some(b));
        }
        self.read_raw()
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        if self.lookahead.is_none() {
            self.lookahead = self.read_raw()?;
        }
        Ok(self.lookahead)
    }
}

fn require_byte<S: ByteSource>(src: &mut S, on_eof: Error) -> Result<u8> {
    src.read_byte()?.ok_or(on_eof)
}

/// Read exactly one BER TLV (tag, length, and declared content) from `src`,
/// returning the tag-inclusive bytes. Tag and length are parsed incrementally
/// byte by byte, including the multi-byte tag and long-form length cases;
/// once the content length is known, the content octets are read in one pass
/// since their count is no longer in question.
pub fn read_tlv<S: ByteSource>(src: &mut S) -> Result<Bytes> {
    let mut out = Vec::new();

    let first = require_byte(src, Error::MalformedTag)?;
    out.push(first);
    if first & 0x1F == 0x1F {
        loop {
            let b = require_byte(src, Error::MalformedTag)?;
            out.push(b);
            if b & 0x80 == 0 {
                break;
            }
        }
    }

    let len_first = require_byte(src, Error::MalformedLength)?;
    out.push(len_first);
    let content_len = if len_first & 0x80 == 0 {
        len_first as usize
    } else {
        let count = (len_first & 0x7F) as usize;
        if count == 0 || count > 8 {
            return Err(Error::MalformedLength);
        }
        let mut value: u64 = 0;
        for _ in 0..count {
            let b = require_byte(src, Error::MalformedLength)?;
            out.push(b);
            value = (value << 8) | b as u64;
        }
        value as usize
    };

    for _ in 0..content_len {
        out.push(require_byte(src, Error::ShortPayload { field: "Tlv" })?);
    }

    Ok(Bytes::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::EncodeBuf;

    #[test]
    fn read_tlv_matches_buffer_for_short_form() {
        let mut buf = EncodeBuf::new();
        buf.push_integer(42);
        let bytes = buf.finish();

        let cursor = std::io::Cursor::new(bytes.to_vec());
        let mut source = IoByteSource::new(cursor);
        let streamed = read_tlv(&mut source).unwrap();
        assert_eq!(streamed, bytes);
    }

    #[test]
    fn read_tlv_matches_buffer_for_long_form_length() {
        let mut buf = EncodeBuf::new();
        buf.push_octet_string(&vec![0xAB; 200]);
        let bytes = buf.finish();

        let cursor = std::io::Cursor::new(bytes.to_vec());
        let mut source = IoByteSource::new(cursor);
        let streamed = read_tlv(&mut source).unwrap();
        assert_eq!(streamed, bytes);
    }

    #[test]
    fn write_bytes_round_trips_through_vec_sink() {
        let mut buf = EncodeBuf::new();
        buf.push_null();
        let bytes = buf.finish();

        let mut sink: Vec<u8> = Vec::new();
        sink.write_bytes(&bytes).unwrap();
        assert_eq!(sink, bytes.to_vec());
    }

    #[test]
    fn truncated_stream_yields_malformed_tag() {
        let mut source = IoByteSource::new(std::io::Cursor::new(Vec::<u8>::new()));
        assert!(matches!(read_tlv(&mut source), Err(Error::MalformedTag)));
    }

    #[test]
    fn truncated_after_tag_yields_malformed_length() {
        let mut source = IoByteSource::new(std::io::Cursor::new(vec![0x02]));
        assert!(matches!(read_tlv(&mut source), Err(Error::MalformedLength)));
    }

    #[test]
    fn truncated_content_yields_short_payload() {
        // INTEGER tag, length 2, but only 1 content byte.
        let mut source = IoByteSource::new(std::io::Cursor::new(vec![0x02, 0x02, 0x01]));
        assert!(matches!(
            read_tlv(&mut source),
            Err(Error::ShortPayload { .. })
        ));
    }
}
