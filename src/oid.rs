//! Object Identifier (OID) type and BER sub-identifier codec.
//!
//! Stored as a numeric arc vector rather than the dotted-decimal string the
//! original engine used internally (see DESIGN.md: the string form was an
//! embedded-memory workaround, not a semantic requirement, and lexicographic
//! OID ordering — needed by any GETNEXT-style walk — is natural on a numeric
//! vector and awkward on a string). The dotted-decimal form is always
//! available via [`Oid::parse`] and `Display`.

use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, OidErrorKind, Result};

/// Maximum number of sub-identifiers this crate will decode or accept from a
/// string. SNMP implementations conventionally cap OIDs well above the
/// 128-arc minimum X.690 implementations conventionally support; this cap exists only to
/// bound adversarial input during decode.
pub const MAX_OID_LEN: usize = 256;

/// An SNMP object identifier: an ordered sequence of non-negative integer
/// "arcs".
///
/// Comparison is lexicographic arc-by-arc (derived `Ord` on the underlying
/// vector already gives the right semantics: a strict prefix compares as
/// "less than" its extensions, matching the GETNEXT ordering convention).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid(SmallVec<[u32; 16]>);

impl Oid {
    /// Build an OID from a slice of arcs, without validating the canonical
    /// first-two-arc range. Used internally by the `oid!` macro and by
    /// decode, where the range is checked separately.
    pub fn from_arcs(arcs: &[u32]) -> Self {
        Oid(SmallVec::from_slice(arcs))
    }

    /// Arcs as a slice.
    pub fn arcs(&self) -> &[u32] {
        &self.0
    }

    /// Number of arcs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if this OID has no arcs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` is `prefix` followed by zero or more additional arcs.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }

    /// Parse a dotted-decimal string (e.g. `"1.3.6.1.2.1.1.5.0"`) into an
    /// `Oid`. Leading/trailing dots and empty arcs are rejected.
    pub fn parse(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::invalid_oid(OidErrorKind::Empty));
        }
        let mut arcs = SmallVec::new();
        for part in s.split('.') {
            let arc: u32 = part
                .parse()
                .map_err(|_| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s))?;
            arcs.push(arc);
        }
        if arcs.len() > MAX_OID_LEN {
            return Err(Error::invalid_oid_with_input(
                OidErrorKind::TooManyArcs {
                    count: arcs.len(),
                    max: MAX_OID_LEN,
                },
                s,
            ));
        }
        Ok(Oid(arcs))
    }

    /// Validate the canonical range for the first two arcs: the first arc
    /// must be 0, 1, or 2; if it's 0 or 1, the second arc must be <= 39
    /// (X.690 §8.19.4, the rule the `40*a+b` collapse
    /// on). Called before encoding.
    fn check_canonical_prefix(&self) -> Result<()> {
        let first = *self.0.first().unwrap_or(&0);
        if self.0.is_empty() {
            return Ok(());
        }
        if first > 2 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidFirstArc(first)));
        }
        if let Some(&second) = self.0.get(1)
            && first < 2
            && second > 39
        {
            return Err(Error::invalid_oid(OidErrorKind::InvalidSecondArc {
                first,
                second,
            }));
        }
        Ok(())
    }

    /// Encode to the BER sub-identifier byte stream (X.690 §8.19): the first
    /// two arcs collapse into a single byte `40*a + b`; every subsequent arc
    /// is base-128 encoded MSB-first with a continuation bit on all but the
    /// last group of each arc.
    pub fn to_ber(&self) -> Result<Vec<u8>> {
        self.check_canonical_prefix()?;

        let mut out = Vec::new();
        let mut iter = self.0.iter().copied();

        match (iter.next(), iter.next()) {
            (Some(a), Some(b)) => encode_subidentifier(40 * a + b, &mut out),
            (Some(a), None) => encode_subidentifier(40 * a, &mut out),
            (None, _) => {}
        }

        for arc in iter {
            encode_subidentifier(arc, &mut out);
        }

        Ok(out)
    }

    /// Decode from a raw BER sub-identifier byte stream (the content octets
    /// of an OBJECT IDENTIFIER TLV, tag and length already stripped).
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Oid(SmallVec::new()));
        }

        let mut arcs: SmallVec<[u32; 16]> = SmallVec::new();
        let mut value: u64 = 0;
        let mut first_decoded = false;

        for &byte in data {
            value = (value << 7) | (byte & 0x7F) as u64;
            if byte & 0x80 != 0 {
                continue;
            }

            if !first_decoded {
                // First byte group encodes 40*a + b.
                let (a, b) = if value < 40 {
                    (0, value)
                } else if value < 80 {
                    (1, value - 40)
                } else {
                    (2, value - 80)
                };
                arcs.push(a as u32);
                arcs.push(b as u32);
                first_decoded = true;
            } else {
                arcs.push(value as u32);
            }
            value = 0;

            if arcs.len() > MAX_OID_LEN {
                return Err(Error::invalid_oid(OidErrorKind::TooManyArcs {
                    count: arcs.len(),
                    max: MAX_OID_LEN,
                }));
            }
        }

        if value != 0 || (data.last().is_some_and(|b| b & 0x80 != 0)) {
            // Last group never terminated (continuation bit still set).
            return Err(Error::invalid_oid(OidErrorKind::InvalidArc));
        }

        Ok(Oid(arcs))
    }
}

fn encode_subidentifier(value: u32, out: &mut Vec<u8>) {
    if value < 0x80 {
        out.push(value as u8);
        return;
    }

    let mut groups = [0u8; 5];
    let mut n = value;
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
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arc) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", arc)?;
        }
        Ok(())
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Oid::parse(s)
    }
}

/// Build an `Oid` from a literal list of arcs at the call site, e.g.
/// `oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)`.
#[macro_export]
macro_rules! oid {
    ($($arc:expr),+ $(,)?) => {
        $crate::oid::Oid::from_arcs(&[$($arc as u32),+])
    };
}
