//! Error types for the SNMP v1/v2c BER codec and message engine.
//!
//! All errors are `#[non_exhaustive]` to allow adding new variants without
//! breaking changes, matching the convention used throughout this crate's
//! lineage.

/// Result type alias using the crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// SNMP error status codes (RFC 1157 / RFC 3416).
///
/// Values 0-5 are defined by SNMPv1; values 6-18 were added by SNMPv2c.
/// `Unknown` preserves a future/out-of-range code round-trip rather than
/// failing decode on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorStatus {
    NoError,
    TooBig,
    NoSuchName,
    BadValue,
    ReadOnly,
    GenErr,
    NoAccess,
    WrongType,
    WrongLength,
    WrongEncoding,
    WrongValue,
    NoCreation,
    InconsistentValue,
    ResourceUnavailable,
    CommitFailed,
    UndoFailed,
    AuthorizationError,
    NotWritable,
    InconsistentName,
    /// Unknown/future error status code.
    Unknown(i32),
}

impl ErrorStatus {
    /// Create from a raw status code.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::NoError,
            1 => Self::TooBig,
            2 => Self::NoSuchName,
            3 => Self::BadValue,
            4 => Self::ReadOnly,
            5 => Self::GenErr,
            6 => Self::NoAccess,
            7 => Self::WrongType,
            8 => Self::WrongLength,
            9 => Self::WrongEncoding,
            10 => Self::WrongValue,
            11 => Self::NoCreation,
            12 => Self::InconsistentValue,
            13 => Self::ResourceUnavailable,
            14 => Self::CommitFailed,
            15 => Self::UndoFailed,
            16 => Self::AuthorizationError,
            17 => Self::NotWritable,
            18 => Self::InconsistentName,
            other => Self::Unknown(other),
        }
    }

    /// Convert to a raw status code.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::NoError => 0,
            Self::TooBig => 1,
            Self::NoSuchName => 2,
            Self::BadValue => 3,
            Self::ReadOnly => 4,
            Self::GenErr => 5,
            Self::NoAccess => 6,
            Self::WrongType => 7,
            Self::WrongLength => 8,
            Self::WrongEncoding => 9,
            Self::WrongValue => 10,
            Self::NoCreation => 11,
            Self::InconsistentValue => 12,
            Self::ResourceUnavailable => 13,
            Self::CommitFailed => 14,
            Self::UndoFailed => 15,
            Self::AuthorizationError => 16,
            Self::NotWritable => 17,
            Self::InconsistentName => 18,
            Self::Unknown(code) => *code,
        }
    }

    /// Remap a v2c-only status code onto the v1-defined range (0-5), per
    /// RFC 2089 §2.1. Codes already in the v1 range (or `Unknown`) pass
    /// through unchanged, which also makes this mapping idempotent.
    pub fn map_v2_to_v1(self) -> Self {
        match self {
            Self::WrongValue
            | Self::WrongEncoding
            | Self::WrongType
            | Self::WrongLength
            | Self::InconsistentValue => Self::BadValue,
            Self::NoAccess
            | Self::NotWritable
            | Self::NoCreation
            | Self::InconsistentName
            | Self::AuthorizationError => Self::NoSuchName,
            Self::ResourceUnavailable | Self::CommitFailed | Self::UndoFailed => Self::GenErr,
            other => other,
        }
    }

    /// True if this status is within the v1-defined range (0-5 inclusive).
    pub fn is_v1_defined(&self) -> bool {
        matches!(self.as_i32(), 0..=5)
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoError => write!(f, "noError"),
            Self::TooBig => write!(f, "tooBig"),
            Self::NoSuchName => write!(f, "noSuchName"),
            Self::BadValue => write!(f, "badValue"),
            Self::ReadOnly => write!(f, "readOnly"),
            Self::GenErr => write!(f, "genErr"),
            Self::NoAccess => write!(f, "noAccess"),
            Self::WrongType => write!(f, "wrongType"),
            Self::WrongLength => write!(f, "wrongLength"),
            Self::WrongEncoding => write!(f, "wrongEncoding"),
            Self::WrongValue => write!(f, "wrongValue"),
            Self::NoCreation => write!(f, "noCreation"),
            Self::InconsistentValue => write!(f, "inconsistentValue"),
            Self::ResourceUnavailable => write!(f, "resourceUnavailable"),
            Self::CommitFailed => write!(f, "commitFailed"),
            Self::UndoFailed => write!(f, "undoFailed"),
            Self::AuthorizationError => write!(f, "authorizationError"),
            Self::NotWritable => write!(f, "notWritable"),
            Self::InconsistentName => write!(f, "inconsistentName"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// OID validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OidErrorKind {
    /// Empty OID string.
    Empty,
    /// An arc failed to parse as a non-negative integer.
    InvalidArc,
    /// First arc must be 0, 1, or 2.
    InvalidFirstArc(u32),
    /// Second arc too large for the given first-arc value (must be <= 39
    /// when the first arc is 0 or 1).
    InvalidSecondArc { first: u32, second: u32 },
    /// OID has too many arcs (exceeds the configured maximum).
    TooManyArcs { count: usize, max: usize },
}

impl std::fmt::Display for OidErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty OID"),
            Self::InvalidArc => write!(f, "invalid arc value"),
            Self::InvalidFirstArc(v) => write!(f, "first arc must be 0, 1, or 2, got {}", v),
            Self::InvalidSecondArc { first, second } => {
                write!(f, "second arc {} too large for first arc {}", second, first)
            }
            Self::TooManyArcs { count, max } => {
                write!(f, "OID has {} arcs, exceeds maximum {}", count, max)
            }
        }
    }
}

/// Crate error type.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A long-form tag never terminated within the available input, or no
    /// input was available to read a tag from at all.
    #[error("malformed tag")]
    MalformedTag,

    /// The indefinite length form was used, a long-form length's count byte
    /// was truncated, or the declared length bytes overran the input.
    #[error("malformed length")]
    MalformedLength,

    /// A declared length exceeds the bytes available, or a child decode
    /// inside a constructed region underflowed the declared length.
    #[error("short payload for field `{field}`")]
    ShortPayload { field: &'static str },

    /// Child decodes inside a constructed region overshot its declared
    /// length.
    #[error("trailing bytes after decoding `{field}`")]
    TrailingBytes { field: &'static str },

    /// A tag inside a constructed region matched no recognized variant.
    #[error("unknown tag 0x{tag:02X}")]
    UnknownTag { tag: u8 },

    /// A PDU's child sequence did not match the shape its tag promised
    /// (e.g. a Trap PDU missing its agent-address field, or a v1 message
    /// carrying a GetBulkRequest PDU).
    #[error("structure error: {0}")]
    StructureError(&'static str),

    /// Encoding failed: either a capacity/allocation failure, or an OID
    /// whose first two sub-identifiers are outside the canonical range.
    #[error("encode error: {0}")]
    EncodeError(&'static str),

    /// A fixed-capacity container's `add` exceeded its configured ceiling.
    #[error("capacity exceeded: at most {max} children")]
    CapacityExceeded { max: usize },

    /// Invalid OID format.
    #[error("invalid OID: {kind}")]
    InvalidOid {
        kind: OidErrorKind,
        input: Option<Box<str>>,
    },

    /// I/O error while reading from or writing to a byte stream.
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Create an invalid-OID error from a kind, with no source string.
    pub fn invalid_oid(kind: OidErrorKind) -> Self {
        Self::InvalidOid { kind, input: None }
    }

    /// Create an invalid-OID error carrying the input string that failed.
    pub fn invalid_oid_with_input(kind: OidErrorKind, input: impl Into<Box<str>>) -> Self {
        Self::InvalidOid {
            kind,
            input: Some(input.into()),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<getrandom::Error> for Error {
    fn from(err: getrandom::Error) -> Self {
        Error::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn error_mapping_v2_to_v1() {
        assert_eq!(
            ErrorStatus::WrongValue.map_v2_to_v1(),
            ErrorStatus::BadValue
        );
        assert_eq!(ErrorStatus::NoAccess.map_v2_to_v1(), ErrorStatus::NoSuchName);
        assert_eq!(
            ErrorStatus::ResourceUnavailable.map_v2_to_v1(),
            ErrorStatus::GenErr
        );
        assert_eq!(
            ErrorStatus::NoSuchName.map_v2_to_v1(),
            ErrorStatus::NoSuchName
        );
    }

    #[test]
    fn error_mapping_is_idempotent() {
        for code in 0..=18 {
            let status = ErrorStatus::from_i32(code);
            let once = status.map_v2_to_v1();
            let twice = once.map_v2_to_v1();
            assert_eq!(once.as_i32(), twice.as_i32());
        }
    }

    #[test]
    fn v1_closure_after_mapping() {
        for code in 0..=18 {
            let mapped = ErrorStatus::from_i32(code).map_v2_to_v1();
            assert!(mapped.is_v1_defined(), "code {} did not map into v1 range", code);
        }
    }

    proptest! {
        #[test]
        fn prop_mapping_idempotent(code in 0i32..=30) {
            let once = ErrorStatus::from_i32(code).map_v2_to_v1();
            let twice = once.map_v2_to_v1();
            prop_assert_eq!(once.as_i32(), twice.as_i32());
        }

        #[test]
        fn prop_v1_closure(code in 0i32..=18) {
            let mapped = ErrorStatus::from_i32(code).map_v2_to_v1();
            prop_assert!(mapped.is_v1_defined());
        }
    }
}
