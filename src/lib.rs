//! SNMP v1/v2c BER codec and message/PDU engine.
//!
//! Covers the wire format only: ASN.1 BER encode/decode, the SNMP message
//! envelope, and the nine PDU shapes RFC 1157 and RFC 3416 define. No
//! datagram transport, MIB/OID name resolution, access control, or SNMPv3
//! (USM/auth/priv) — those are layered on top of this crate, not in it.
//!
//! ```
//! use snmp_ber_core::{oid, ErrorStatus, Message, Pdu, PduType, Value, VarBind, VarBindList, Version};
//!
//! let pdu = Pdu::generic(
//!     PduType::GetRequest,
//!     1,
//!     ErrorStatus::NoError,
//!     0,
//!     VarBindList::from_oids_null(vec![oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)]),
//! )
//! .unwrap();
//! let mut message = Message::new(Version::V2c, "public", pdu);
//! let bytes = message.build_into_buffer().unwrap();
//!
//! let parsed = Message::parse_from_buffer(bytes).unwrap();
//! assert_eq!(parsed.pdu.varbinds()[0].value, Value::Null);
//! ```

pub mod ber;
pub mod config;
pub mod error;
pub mod message;
pub mod oid;
pub mod pdu;
pub mod prelude;
pub mod value;
pub mod varbind;
pub mod version;

mod util;

pub use config::EngineConfig;
pub use error::{Error, ErrorStatus, Result};
pub use message::Message;
pub use oid::Oid;
pub use pdu::{GenericTrap, Pdu, PduFields, PduType};
pub use value::Value;
pub use varbind::{VarBind, VarBindList};
pub use version::Version;

/// Conventional UDP ports for SNMP traffic (RFC 3411 §2). This crate never
/// binds a socket itself (transport is out of scope); these constants exist
/// so a caller wiring up transport elsewhere doesn't have to hardcode them.
pub mod ports {
    /// The agent-facing port for requests (GetRequest, SetRequest, ...).
    pub const SNMP: u16 = 161;
    /// The manager-facing port for unsolicited notifications (traps/informs).
    pub const TRAP: u16 = 162;
}
