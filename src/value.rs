//! The `Value` type: SNMP's tagged-union wire types.
//!
//! SNMP values dispatch on a BER tag byte rather than a vtable; this enum
//! mirrors that directly instead of going through trait objects, so `encode`
//! and `decode` are a single flat match with no allocation beyond what the
//! variant itself owns.

use bytes::Bytes;

use crate::ber::{tag, Decoder, EncodeBuf};
use crate::error::{Error, Result};
use crate::oid::Oid;

/// An SNMP value: one of the ASN.1/SNMP application types carried in a
/// VarBind, or one of the three exception placeholders SNMPv2c introduced
/// for GetResponse/GetBulkResponse error reporting (RFC 3416 §3).
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// BOOLEAN (rarely used directly by SNMP agents, but legal BER).
    Boolean(bool),
    /// INTEGER / INTEGER32.
    Integer(i32),
    /// OCTET STRING.
    OctetString(Bytes),
    /// NULL.
    Null,
    /// OBJECT IDENTIFIER.
    ObjectIdentifier(Oid),
    /// IpAddress (4-byte application type).
    IpAddress([u8; 4]),
    /// Counter32.
    Counter32(u32),
    /// Gauge32 (also known as Unsigned32).
    Gauge32(u32),
    /// TimeTicks, in hundredths of a second.
    TimeTicks(u32),
    /// Opaque: arbitrary pre-encoded ASN.1 carried as an uninterpreted
    /// octet string, except when it wraps the recognized `OpaqueFloat`
    /// payload (see [`Value::OpaqueFloat`]).
    Opaque(Bytes),
    /// A single-precision float smuggled through an Opaque wrapper
    /// (net-snmp's `ASN_OPAQUE_FLOAT` convention). Decoded separately from
    /// plain `Opaque` because the nested tag is recognized on read.
    OpaqueFloat(f32),
    /// Counter64.
    Counter64(u64),
    /// IEEE-754 single-precision float, carried at the top level under the
    /// dedicated application tag (distinct from [`Value::OpaqueFloat`],
    /// which nests inside an Opaque envelope).
    Float(f32),
    /// noSuchObject exception (SNMPv2c, RFC 3416 §3).
    NoSuchObject,
    /// noSuchInstance exception.
    NoSuchInstance,
    /// endOfMibView exception.
    EndOfMibView,
}

impl Value {
    /// True if this value is one of the three SNMPv2c exception
    /// placeholders rather than real data.
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    /// Encode this value's TLV into `buf`.
    ///
    /// Encoding an out-of-range [`Value::ObjectIdentifier`] silently leaves
    /// the buffer short (its tag/length would be pushed without content);
    /// callers that build `ObjectIdentifier` values from untrusted input
    /// should validate with [`Oid::to_ber`] first. All other variants
    /// cannot fail.
    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Boolean(b) => {
                buf.push_byte(if *b { 0xFF } else { 0x00 });
                buf.push_length(1);
                buf.push_tag(tag::universal::BOOLEAN);
            }
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => {
                // Encode errors on malformed OIDs are not representable
                // here; validated OIDs (parsed or built via `oid!`) never
                // fail `to_ber`.
                let _ = buf.push_oid(oid);
            }
            Value::IpAddress(addr) => buf.push_ip_address(*addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Opaque(data) => buf.push_opaque(data),
            Value::OpaqueFloat(v) => buf.push_opaque_float(*v),
            Value::Counter64(v) => buf.push_integer64(*v),
            Value::Float(v) => buf.push_float(*v),
            Value::NoSuchObject => buf.push_exception(tag::context::NO_SUCH_OBJECT),
            Value::NoSuchInstance => buf.push_exception(tag::context::NO_SUCH_INSTANCE),
            Value::EndOfMibView => buf.push_exception(tag::context::END_OF_MIB_VIEW),
        }
    }

    /// Decode a value from the front of `decoder`, dispatching on its tag.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let t = decoder.peek_tag()?;
        match t {
            t if t == tag::universal::BOOLEAN => {
                decoder.expect_tag(t)?;
                Ok(Value::Boolean(decoder.read_boolean()?))
            }
            tag::universal::INTEGER => {
                decoder.expect_tag(t)?;
                Ok(Value::Integer(decoder.read_integer()?))
            }
            tag::universal::OCTET_STRING => {
                decoder.expect_tag(t)?;
                Ok(Value::OctetString(decoder.read_octet_string()?))
            }
            tag::universal::OCTET_STRING_CONSTRUCTED => Err(Error::UnknownTag { tag: t }),
            tag::universal::NULL => {
                decoder.expect_tag(t)?;
                decoder.read_null()?;
                Ok(Value::Null)
            }
            tag::universal::OBJECT_IDENTIFIER => {
                decoder.expect_tag(t)?;
                Ok(Value::ObjectIdentifier(decoder.read_oid()?))
            }
            tag::application::IP_ADDRESS => {
                decoder.expect_tag(t)?;
                Ok(Value::IpAddress(decoder.read_ip_address()?))
            }
            tag::application::COUNTER32 => {
                decoder.expect_tag(t)?;
                Ok(Value::Counter32(decoder.read_unsigned32("Counter32")?))
            }
            tag::application::GAUGE32 => {
                decoder.expect_tag(t)?;
                Ok(Value::Gauge32(decoder.read_unsigned32("Gauge32")?))
            }
            tag::application::TIMETICKS => {
                decoder.expect_tag(t)?;
                Ok(Value::TimeTicks(decoder.read_unsigned32("TimeTicks")?))
            }
            tag::application::OPAQUE => {
                decoder.expect_tag(t)?;
                decode_opaque(decoder)
            }
            tag::application::COUNTER64 => {
                decoder.expect_tag(t)?;
                Ok(Value::Counter64(decoder.read_counter64()?))
            }
            tag::application::FLOAT => {
                decoder.expect_tag(t)?;
                Ok(Value::Float(decoder.read_float()?))
            }
            tag::context::NO_SUCH_OBJECT => {
                decoder.expect_tag(t)?;
                decoder.read_null()?;
                Ok(Value::NoSuchObject)
            }
            tag::context::NO_SUCH_INSTANCE => {
                decoder.expect_tag(t)?;
                decoder.read_null()?;
                Ok(Value::NoSuchInstance)
            }
            tag::context::END_OF_MIB_VIEW => {
                decoder.expect_tag(t)?;
                decoder.read_null()?;
                Ok(Value::EndOfMibView)
            }
            other => Err(Error::UnknownTag { tag: other }),
        }
    }
}

/// Decode an Opaque TLV, recognizing the nested `OpaqueFloat` payload if
/// present; otherwise returns the raw content as [`Value::Opaque`].
fn decode_opaque(decoder: &mut Decoder) -> Result<Value> {
    let content = decoder.read_opaque_content()?;
    if content.len() == 7 && content[0..2] == tag::OPAQUE_FLOAT_TAG && content[2] == 0x04 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&content[3..7]);
        return Ok(Value::OpaqueFloat(f32::from_bits(u32::from_be_bytes(raw))));
    }
    Ok(Value::Opaque(content))
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) => write!(f, "{}", crate::util::HexBytes(data)),
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(addr) => {
                write!(f, "{}.{}.{}.{}", addr[0], addr[1], addr[2], addr[3])
            }
            Value::Counter32(v) => write!(f, "Counter32: {}", v),
            Value::Gauge32(v) => write!(f, "Gauge32: {}", v),
            Value::TimeTicks(v) => write!(f, "Timeticks: {}", v),
            Value::Opaque(data) => write!(f, "Opaque: {} bytes", data.len()),
            Value::OpaqueFloat(v) => write!(f, "Opaque(Float): {}", v),
            Value::Counter64(v) => write!(f, "Counter64: {}", v),
            Value::Float(v) => write!(f, "Float: {}", v),
            Value::NoSuchObject => write!(f, "noSuchObject"),
            Value::NoSuchInstance => write!(f, "noSuchInstance"),
            Value::EndOfMibView => write!(f, "endOfMibView"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn roundtrip(value: Value) {
        let mut buf = EncodeBuf::new();
        value.encode(&mut buf);
        let bytes = buf.finish();
        let mut decoder = Decoder::new(bytes);
        let decoded = Value::decode(&mut decoder).unwrap();
        assert_eq!(value, decoded);
        assert!(decoder.is_empty());
    }

    #[test]
    fn roundtrip_all_scalar_variants() {
        roundtrip(Value::Boolean(true));
        roundtrip(Value::Boolean(false));
        roundtrip(Value::Integer(-1));
        roundtrip(Value::Integer(i32::MIN));
        roundtrip(Value::Integer(i32::MAX));
        roundtrip(Value::OctetString(Bytes::from_static(b"hello")));
        roundtrip(Value::Null);
        roundtrip(Value::ObjectIdentifier(oid!(1, 3, 6, 1, 2, 1)));
        roundtrip(Value::IpAddress([10, 0, 0, 1]));
        roundtrip(Value::Counter32(u32::MAX));
        roundtrip(Value::Gauge32(0));
        roundtrip(Value::TimeTicks(123456));
        roundtrip(Value::Counter64(u64::MAX));
        roundtrip(Value::Float(3.5));
        roundtrip(Value::NoSuchObject);
        roundtrip(Value::NoSuchInstance);
        roundtrip(Value::EndOfMibView);
    }

    #[test]
    fn opaque_float_round_trip_matches_spec_example() {
        // Opaque-wrapped float, net-snmp's ASN_OPAQUE_FLOAT convention: 3.14159
        let value = Value::OpaqueFloat(3.14159_f32);
        let mut buf = EncodeBuf::new();
        value.encode(&mut buf);
        let bytes = buf.finish();
        assert_eq!(bytes[0], tag::application::OPAQUE);
        assert_eq!(bytes[1], 7); // length
        assert_eq!(&bytes[2..4], &tag::OPAQUE_FLOAT_TAG[..]);
        assert_eq!(bytes[4], 4); // inner length

        let mut decoder = Decoder::new(bytes);
        let decoded = Value::decode(&mut decoder).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn plain_opaque_is_distinguished_from_opaque_float() {
        let value = Value::Opaque(Bytes::from_static(&[0x01, 0x02, 0x03]));
        roundtrip(value);
    }

    #[test]
    fn is_exception_true_only_for_exception_variants() {
        assert!(Value::NoSuchObject.is_exception());
        assert!(Value::NoSuchInstance.is_exception());
        assert!(Value::EndOfMibView.is_exception());
        assert!(!Value::Null.is_exception());
        assert!(!Value::Integer(0).is_exception());
    }

    #[test]
    fn unknown_tag_rejected() {
        let bytes = Bytes::from_static(&[0x99, 0x00]);
        let mut decoder = Decoder::new(bytes);
        assert!(matches!(
            Value::decode(&mut decoder),
            Err(Error::UnknownTag { tag: 0x99 })
        ));
    }

    #[test]
    fn constructed_octet_string_rejected() {
        let bytes = Bytes::from_static(&[0x24, 0x00]);
        let mut decoder = Decoder::new(bytes);
        assert!(Value::decode(&mut decoder).is_err());
    }
}
