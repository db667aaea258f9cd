//! BER tag definitions for SNMP.
//!
//! Tag encoding follows X.690 Section 8.1.2:
//! - Bits 7-6: Class (00=Universal, 01=Application, 10=Context-specific, 11=Private)
//! - Bit 5: Primitive (0) or Constructed (1)
//! - Bits 4-0: Tag number (0-30, or 31 for long form)

/// Tag class bits (bits 7-6)
pub mod class {
    /// Universal class (bits 7-6 = 00).
    pub const UNIVERSAL: u8 = 0x00;
    /// Application class (bits 7-6 = 01).
    pub const APPLICATION: u8 = 0x40;
    /// Context-specific class (bits 7-6 = 10).
    pub const CONTEXT_SPECIFIC: u8 = 0x80;
    /// Private class (bits 7-6 = 11).
    pub const PRIVATE: u8 = 0xC0;
}

/// Constructed bit (bit 5)
pub const CONSTRUCTED: u8 = 0x20;

/// Universal tags (class bits 00)
pub mod universal {
    /// Boolean type (tag 0x01).
    pub const BOOLEAN: u8 = 0x01;
    /// Integer type (tag 0x02).
    pub const INTEGER: u8 = 0x02;
    /// Octet string type (tag 0x04).
    pub const OCTET_STRING: u8 = 0x04;
    /// Constructed OCTET STRING (0x24) - not supported, should be rejected.
    pub const OCTET_STRING_CONSTRUCTED: u8 = 0x24;
    /// Null type (tag 0x05).
    pub const NULL: u8 = 0x05;
    /// Object identifier type (tag 0x06).
    pub const OBJECT_IDENTIFIER: u8 = 0x06;
    /// Sequence type, constructed (tag 0x30).
    pub const SEQUENCE: u8 = 0x30;
}

/// Application tags (class bits 01) - SNMP-specific types
pub mod application {
    /// IP address type (tag 0x40).
    pub const IP_ADDRESS: u8 = 0x40;
    /// 32-bit counter type (tag 0x41).
    pub const COUNTER32: u8 = 0x41;
    /// 32-bit gauge type, also known as Unsigned32 (tag 0x42).
    pub const GAUGE32: u8 = 0x42;
    /// Time ticks type in hundredths of a second (tag 0x43).
    pub const TIMETICKS: u8 = 0x43;
    /// Opaque type for arbitrary ASN.1 data (tag 0x44).
    pub const OPAQUE: u8 = 0x44;
    /// 64-bit counter type (tag 0x46).
    pub const COUNTER64: u8 = 0x46;
    /// IEEE-754 single-precision float (tag 0x48).
    pub const FLOAT: u8 = 0x48;
}

/// The two-byte tag used for a float value wrapped inside an [`OPAQUE`](application::OPAQUE)
/// envelope (net-snmp's `ASN_OPAQUE_FLOAT` convention). Always appears nested inside an
/// Opaque TLV, never at the top level of a VarBind.
pub const OPAQUE_FLOAT_TAG: [u8; 2] = [0x9F, 0x78];

/// Context-specific tags (class bits 10) - Exception values
pub mod context {
    /// No such object exception (tag 0x80).
    pub const NO_SUCH_OBJECT: u8 = 0x80;
    /// No such instance exception (tag 0x81).
    pub const NO_SUCH_INSTANCE: u8 = 0x81;
    /// End of MIB view exception (tag 0x82).
    pub const END_OF_MIB_VIEW: u8 = 0x82;
}

/// PDU tags (context-specific, constructed)
pub mod pdu {
    use super::CONSTRUCTED;
    use super::class::CONTEXT_SPECIFIC;

    /// GET request PDU tag (0xA0).
    pub const GET_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED;
    /// GET-NEXT request PDU tag (0xA1).
    pub const GET_NEXT_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x01;
    /// Response PDU tag (0xA2).
    pub const RESPONSE: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x02;
    /// SET request PDU tag (0xA3).
    pub const SET_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x03;
    /// SNMPv1 trap PDU tag (0xA4).
    pub const TRAP_V1: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x04;
    /// GET-BULK request PDU tag (0xA5).
    pub const GET_BULK_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x05;
    /// INFORM request PDU tag (0xA6).
    pub const INFORM_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x06;
    /// SNMPv2c/v3 trap PDU tag (0xA7).
    pub const TRAP_V2: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x07;
    /// Report PDU tag (0xA8).
    pub const REPORT: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x08;
}

/// Check if a tag indicates a constructed type
#[inline]
pub const fn is_constructed(tag: u8) -> bool {
    tag & CONSTRUCTED != 0
}

/// Get the class of a tag
#[inline]
pub const fn tag_class(tag: u8) -> u8 {
    tag & 0xC0
}

/// Get the tag number (bits 4-0)
#[inline]
pub const fn tag_number(tag: u8) -> u8 {
    tag & 0x1F
}

/// Tag class, as a proper enum rather than raw bits.
///
/// Most of this crate works directly with the single-byte constants above
/// (every SNMP-carried type fits in one byte); this type exists for the
/// general multi-byte tag codec below, used by the long-form `OpaqueFloat`
/// tag and exercised by the tag-canonicalization property test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Universal,
    Application,
    ContextSpecific,
    Private,
}

impl Class {
    const fn bits(self) -> u8 {
        match self {
            Class::Universal => class::UNIVERSAL,
            Class::Application => class::APPLICATION,
            Class::ContextSpecific => class::CONTEXT_SPECIFIC,
            Class::Private => class::PRIVATE,
        }
    }

    const fn from_bits(bits: u8) -> Self {
        match bits & 0xC0 {
            class::APPLICATION => Class::Application,
            class::CONTEXT_SPECIFIC => Class::ContextSpecific,
            class::PRIVATE => Class::Private,
            _ => Class::Universal,
        }
    }
}

/// Primitive or constructed form (bit 5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Primitive,
    Constructed,
}

/// A fully decomposed BER identifier octet sequence: class, form, and tag number.
///
/// Encoding: short form (`class | form | number`) when `number < 31`; long form
/// (`class | form | 0x1F` followed by base-128 groups, continuation bit set on
/// all but the last group) otherwise (X.690 §8.1.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    pub class: Class,
    pub form: Form,
    pub number: u32,
}

impl Tag {
    pub const fn new(class: Class, form: Form, number: u32) -> Self {
        Self {
            class,
            form,
            number,
        }
    }

    /// Encode into the provided buffer, returning the number of bytes written.
    pub fn encode(&self, out: &mut Vec<u8>) -> usize {
        let first = self.class.bits()
            | match self.form {
                Form::Primitive => 0,
                Form::Constructed => CONSTRUCTED,
            };

        if self.number < 31 {
            out.push(first | self.number as u8);
            1
        } else {
            out.push(first | 0x1F);
            let mut groups = [0u8; 5];
            let mut n = self.number;
            let mut i = groups.len();
            loop {
                i -= 1;
                groups[i] = (n & 0x7F) as u8;
                n >>= 7;
                if n == 0 {
                    break;
                }
            }
            let written = groups.len() - i;
            for (idx, byte) in groups[i..].iter().enumerate() {
                let is_last = idx == written - 1;
                out.push(if is_last { *byte } else { byte | 0x80 });
            }
            1 + written
        }
    }

    /// Decode a tag from the front of `input`, returning the tag and the number
    /// of bytes consumed. Fails with [`crate::error::Error::MalformedTag`] if a
    /// long-form tag never terminates within the available input.
    pub fn decode(input: &[u8]) -> crate::error::Result<(Tag, usize)> {
        let first = *input.first().ok_or(crate::error::Error::MalformedTag)?;
        let class = Class::from_bits(first);
        let form = if first & CONSTRUCTED != 0 {
            Form::Constructed
        } else {
            Form::Primitive
        };
        let low = first & 0x1F;

        if low != 0x1F {
            return Ok((Tag::new(class, form, low as u32), 1));
        }

        let mut number: u32 = 0;
        let mut consumed = 1;
        loop {
            let byte = *input.get(consumed).ok_or(crate::error::Error::MalformedTag)?;
            consumed += 1;
            number = (number << 7) | (byte & 0x7F) as u32;
            if byte & 0x80 == 0 {
                break;
            }
        }
        Ok((Tag::new(class, form, number), consumed))
    }
}

#[cfg(test)]
mod tag_struct_tests {
    use super::*;

    fn roundtrip(class: Class, form: Form, number: u32) {
        let tag = Tag::new(class, form, number);
        let mut buf = Vec::new();
        tag.encode(&mut buf);
        let (decoded, consumed) = Tag::decode(&buf).unwrap();
        assert_eq!(consumed, buf.len());
        assert_eq!(decoded, tag);
    }

    #[test]
    fn short_form_round_trip() {
        roundtrip(Class::Universal, Form::Primitive, 0);
        roundtrip(Class::ContextSpecific, Form::Constructed, 30);
    }

    #[test]
    fn long_form_round_trip() {
        roundtrip(Class::ContextSpecific, Form::Primitive, 31);
        roundtrip(Class::Application, Form::Primitive, 0x78);
        roundtrip(Class::Private, Form::Constructed, 1_000_000);
    }

    #[test]
    fn opaque_float_tag_matches_literal() {
        // Class=context-specific(10), form=primitive, number=0x1F escape then 0x78.
        let tag = Tag::new(Class::ContextSpecific, Form::Primitive, 0x78);
        let mut buf = Vec::new();
        tag.encode(&mut buf);
        assert_eq!(&buf[..], &OPAQUE_FLOAT_TAG[..]);
    }

    #[test]
    fn truncated_long_form_is_malformed() {
        // 0x9F announces long form but supplies no continuation byte.
        let err = Tag::decode(&[0x9F]).unwrap_err();
        assert!(matches!(err, crate::error::Error::MalformedTag));
    }
}
