//! PDU (Protocol Data Unit) types: the three distinct body shapes SNMPv1/v2c
//! carry, dispatched by the context-specific tag at the head of the PDU.
//!
//! The v1 Trap shape (enterprise/agent-address/generic-trap/specific-trap/
//! timestamp) follows RFC 1157 §4.1.6 directly.

use crate::ber::{tag, Decoder, EncodeBuf};
use crate::error::{Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::varbind::VarBindList;

/// Which of the nine SNMP PDU kinds a [`Pdu`] is, identified by its
/// context-specific BER tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PduType {
    GetRequest,
    GetNextRequest,
    Response,
    SetRequest,
    /// SNMPv1-only trap shape (RFC 1157 §4.1.6); not valid under SNMPv2c
    /// framing.
    TrapV1,
    /// SNMPv2c-only; not valid under SNMPv1 framing.
    GetBulkRequest,
    /// SNMPv2c-only; not valid under SNMPv1 framing.
    InformRequest,
    /// SNMPv2c-only; not valid under SNMPv1 framing.
    SnmpV2Trap,
    /// SNMPv2c-only; not valid under SNMPv1 framing.
    Report,
}

impl PduType {
    /// The context-specific, constructed tag byte this PDU kind is framed
    /// under.
    pub const fn tag(self) -> u8 {
        match self {
            PduType::GetRequest => tag::pdu::GET_REQUEST,
            PduType::GetNextRequest => tag::pdu::GET_NEXT_REQUEST,
            PduType::Response => tag::pdu::RESPONSE,
            PduType::SetRequest => tag::pdu::SET_REQUEST,
            PduType::TrapV1 => tag::pdu::TRAP_V1,
            PduType::GetBulkRequest => tag::pdu::GET_BULK_REQUEST,
            PduType::InformRequest => tag::pdu::INFORM_REQUEST,
            PduType::SnmpV2Trap => tag::pdu::TRAP_V2,
            PduType::Report => tag::pdu::REPORT,
        }
    }

    /// Recover the PDU kind from a tag byte, or `None` if it matches none of
    /// the nine recognized PDU tags.
    pub fn from_tag(t: u8) -> Option<Self> {
        match t {
            tag::pdu::GET_REQUEST => Some(PduType::GetRequest),
            tag::pdu::GET_NEXT_REQUEST => Some(PduType::GetNextRequest),
            tag::pdu::RESPONSE => Some(PduType::Response),
            tag::pdu::SET_REQUEST => Some(PduType::SetRequest),
            tag::pdu::TRAP_V1 => Some(PduType::TrapV1),
            tag::pdu::GET_BULK_REQUEST => Some(PduType::GetBulkRequest),
            tag::pdu::INFORM_REQUEST => Some(PduType::InformRequest),
            tag::pdu::TRAP_V2 => Some(PduType::SnmpV2Trap),
            tag::pdu::REPORT => Some(PduType::Report),
            _ => None,
        }
    }

    /// True for the SNMPv1-only Trap-PDU shape.
    pub fn is_v1_only(self) -> bool {
        matches!(self, PduType::TrapV1)
    }

    /// True for PDU kinds SNMPv2c introduced, invalid under SNMPv1 framing
    /// (RFC 3416 introduced these; RFC 1157 does not define them).
    pub fn is_v2_only(self) -> bool {
        matches!(
            self,
            PduType::GetBulkRequest
                | PduType::InformRequest
                | PduType::SnmpV2Trap
                | PduType::Report
        )
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PduType::GetRequest => "GetRequest",
            PduType::GetNextRequest => "GetNextRequest",
            PduType::Response => "Response",
            PduType::SetRequest => "SetRequest",
            PduType::TrapV1 => "Trap-v1",
            PduType::GetBulkRequest => "GetBulkRequest",
            PduType::InformRequest => "InformRequest",
            PduType::SnmpV2Trap => "SNMPv2-Trap",
            PduType::Report => "Report",
        };
        write!(f, "{}", name)
    }
}

/// RFC 1157 §4.1.6 `generic-trap` field: one of six well-known trap
/// conditions, or `EnterpriseSpecific` (6) when the real condition is
/// carried in `specific-trap` instead. `Unknown` preserves a future/
/// out-of-range code round-trip rather than failing decode on it, matching
/// [`crate::error::ErrorStatus::Unknown`]'s convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum GenericTrap {
    ColdStart,
    WarmStart,
    LinkDown,
    LinkUp,
    AuthenticationFailure,
    EgpNeighborLoss,
    EnterpriseSpecific,
    Unknown(i32),
}

impl GenericTrap {
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Self::ColdStart,
            1 => Self::WarmStart,
            2 => Self::LinkDown,
            3 => Self::LinkUp,
            4 => Self::AuthenticationFailure,
            5 => Self::EgpNeighborLoss,
            6 => Self::EnterpriseSpecific,
            other => Self::Unknown(other),
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            Self::ColdStart => 0,
            Self::WarmStart => 1,
            Self::LinkDown => 2,
            Self::LinkUp => 3,
            Self::AuthenticationFailure => 4,
            Self::EgpNeighborLoss => 5,
            Self::EnterpriseSpecific => 6,
            Self::Unknown(code) => code,
        }
    }
}

impl std::fmt::Display for GenericTrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColdStart => write!(f, "coldStart"),
            Self::WarmStart => write!(f, "warmStart"),
            Self::LinkDown => write!(f, "linkDown"),
            Self::LinkUp => write!(f, "linkUp"),
            Self::AuthenticationFailure => write!(f, "authenticationFailure"),
            Self::EgpNeighborLoss => write!(f, "egpNeighborLoss"),
            Self::EnterpriseSpecific => write!(f, "enterpriseSpecific"),
            Self::Unknown(code) => write!(f, "unknown({})", code),
        }
    }
}

/// The body of a PDU, one of three distinct field shapes:
/// the generic request/response shape shared by seven of the nine PDU
/// kinds, the GetBulkRequest shape (non-repeaters/max-repetitions in place
/// of error-status/error-index), and the SNMPv1 Trap-PDU shape.
#[derive(Debug, Clone, PartialEq)]
pub enum PduFields {
    /// `request-id`, `error-status`, `error-index`, `variable-bindings` —
    /// shared by GetRequest, GetNextRequest, Response, SetRequest,
    /// InformRequest, SNMPv2-Trap, and Report.
    Generic {
        request_id: i32,
        error_status: ErrorStatus,
        error_index: i32,
        varbinds: VarBindList,
    },
    /// `request-id`, `non-repeaters`, `max-repetitions`,
    /// `variable-bindings` — GetBulkRequest only.
    Bulk {
        request_id: i32,
        non_repeaters: i32,
        max_repetitions: i32,
        varbinds: VarBindList,
    },
    /// `enterprise`, `agent-addr`, `generic-trap`, `specific-trap`,
    /// `time-stamp`, `variable-bindings` — Trap-v1 only.
    TrapV1 {
        enterprise: Oid,
        agent_addr: [u8; 4],
        generic_trap: GenericTrap,
        specific_trap: i32,
        timestamp: u32,
        varbinds: VarBindList,
    },
}

/// A complete SNMP PDU: a kind tag plus the field shape that kind carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Pdu {
    pub pdu_type: PduType,
    pub fields: PduFields,
}

impl Pdu {
    /// Build a PDU using the generic request/response shape. Fails if
    /// `pdu_type` doesn't use that shape (GetBulkRequest and Trap-v1 don't).
    pub fn generic(
        pdu_type: PduType,
        request_id: i32,
        error_status: ErrorStatus,
        error_index: i32,
        varbinds: VarBindList,
    ) -> Result<Self> {
        if matches!(pdu_type, PduType::GetBulkRequest | PduType::TrapV1) {
            return Err(Error::StructureError(
                "pdu_type does not use the generic PDU shape",
            ));
        }
        Ok(Self {
            pdu_type,
            fields: PduFields::Generic {
                request_id,
                error_status,
                error_index,
                varbinds,
            },
        })
    }

    /// Build a GetBulkRequest PDU.
    pub fn bulk(
        request_id: i32,
        non_repeaters: i32,
        max_repetitions: i32,
        varbinds: VarBindList,
    ) -> Self {
        Self {
            pdu_type: PduType::GetBulkRequest,
            fields: PduFields::Bulk {
                request_id,
                non_repeaters,
                max_repetitions,
                varbinds,
            },
        }
    }

    /// Build a Trap-v1 PDU.
    pub fn trap_v1(
        enterprise: Oid,
        agent_addr: [u8; 4],
        generic_trap: GenericTrap,
        specific_trap: i32,
        timestamp: u32,
        varbinds: VarBindList,
    ) -> Self {
        Self {
            pdu_type: PduType::TrapV1,
            fields: PduFields::TrapV1 {
                enterprise,
                agent_addr,
                generic_trap,
                specific_trap,
                timestamp,
                varbinds,
            },
        }
    }

    /// Borrow this PDU's variable bindings, whichever shape it is.
    pub fn varbinds(&self) -> &VarBindList {
        match &self.fields {
            PduFields::Generic { varbinds, .. } => varbinds,
            PduFields::Bulk { varbinds, .. } => varbinds,
            PduFields::TrapV1 { varbinds, .. } => varbinds,
        }
    }

    /// Mutably borrow this PDU's variable bindings, whichever shape it is.
    pub fn varbinds_mut(&mut self) -> &mut VarBindList {
        match &mut self.fields {
            PduFields::Generic { varbinds, .. } => varbinds,
            PduFields::Bulk { varbinds, .. } => varbinds,
            PduFields::TrapV1 { varbinds, .. } => varbinds,
        }
    }

    /// This PDU's `request-id`, if its shape carries one (Trap-v1 doesn't —
    /// RFC 1157 traps are fire-and-forget and have no matching response).
    pub fn request_id(&self) -> Option<i32> {
        match &self.fields {
            PduFields::Generic { request_id, .. } | PduFields::Bulk { request_id, .. } => {
                Some(*request_id)
            }
            PduFields::TrapV1 { .. } => None,
        }
    }

    /// Remap this PDU's `error-status` onto the v1-defined range (RFC 2089
    /// §2.1), if it has one. A no-op for the Bulk and Trap-v1 shapes, which
    /// carry no error-status field.
    pub fn map_error_to_v1(&mut self) {
        if let PduFields::Generic { error_status, .. } = &mut self.fields {
            *error_status = error_status.map_v2_to_v1();
        }
    }

    /// Encode this PDU's tag-framed body into `buf`.
    pub fn encode(&self, buf: &mut EncodeBuf) -> Result<()> {
        let mut inner_err = None;
        match &self.fields {
            PduFields::Generic {
                request_id,
                error_status,
                error_index,
                varbinds,
            } => {
                buf.push_constructed(self.pdu_type.tag(), |buf| {
                    if let Err(e) = varbinds.encode(buf) {
                        inner_err = Some(e);
                    }
                    buf.push_integer(*error_index);
                    buf.push_integer(error_status.as_i32());
                    buf.push_integer(*request_id);
                });
            }
            PduFields::Bulk {
                request_id,
                non_repeaters,
                max_repetitions,
                varbinds,
            } => {
                buf.push_constructed(self.pdu_type.tag(), |buf| {
                    if let Err(e) = varbinds.encode(buf) {
                        inner_err = Some(e);
                    }
                    buf.push_integer(*max_repetitions);
                    buf.push_integer(*non_repeaters);
                    buf.push_integer(*request_id);
                });
            }
            PduFields::TrapV1 {
                enterprise,
                agent_addr,
                generic_trap,
                specific_trap,
                timestamp,
                varbinds,
            } => {
                buf.push_constructed(self.pdu_type.tag(), |buf| {
                    if let Err(e) = varbinds.encode(buf) {
                        inner_err = Some(e);
                    }
                    buf.push_unsigned32(tag::application::TIMETICKS, *timestamp);
                    buf.push_integer(*specific_trap);
                    buf.push_integer(generic_trap.as_i32());
                    buf.push_ip_address(*agent_addr);
                    if let Err(e) = buf.push_oid(enterprise) {
                        inner_err = Some(e);
                    }
                });
            }
        }
        match inner_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Decode a PDU from the front of `decoder`, dispatching on its
    /// context-specific tag.
    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let raw_tag = decoder.peek_tag()?;
        let pdu_type = PduType::from_tag(raw_tag).ok_or(Error::UnknownTag { tag: raw_tag })?;
        let mut body = decoder.read_constructed(raw_tag)?;

        let fields = match pdu_type {
            PduType::GetBulkRequest => {
                body.expect_tag(tag::universal::INTEGER)?;
                let request_id = body.read_integer()?;
                body.expect_tag(tag::universal::INTEGER)?;
                let non_repeaters = body.read_integer()?;
                body.expect_tag(tag::universal::INTEGER)?;
                let max_repetitions = body.read_integer()?;
                let varbinds = VarBindList::decode(&mut body)?;
                PduFields::Bulk {
                    request_id,
                    non_repeaters,
                    max_repetitions,
                    varbinds,
                }
            }
            PduType::TrapV1 => {
                body.expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
                let enterprise = body.read_oid()?;
                body.expect_tag(tag::application::IP_ADDRESS)?;
                let agent_addr = body.read_ip_address()?;
                body.expect_tag(tag::universal::INTEGER)?;
                let generic_trap = GenericTrap::from_i32(body.read_integer()?);
                body.expect_tag(tag::universal::INTEGER)?;
                let specific_trap = body.read_integer()?;
                body.expect_tag(tag::application::TIMETICKS)?;
                let timestamp = body.read_unsigned32("TimeTicks")?;
                let varbinds = VarBindList::decode(&mut body)?;
                PduFields::TrapV1 {
                    enterprise,
                    agent_addr,
                    generic_trap,
                    specific_trap,
                    timestamp,
                    varbinds,
                }
            }
            _ => {
                body.expect_tag(tag::universal::INTEGER)?;
                let request_id = body.read_integer()?;
                body.expect_tag(tag::universal::INTEGER)?;
                let error_status = ErrorStatus::from_i32(body.read_integer()?);
                body.expect_tag(tag::universal::INTEGER)?;
                let error_index = body.read_integer()?;
                let varbinds = VarBindList::decode(&mut body)?;
                PduFields::Generic {
                    request_id,
                    error_status,
                    error_index,
                    varbinds,
                }
            }
        };

        body.finish("Pdu")?;
        Ok(Self { pdu_type, fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::value::Value;
    use crate::varbind::VarBind;

    fn sample_varbinds() -> VarBindList {
        vec![VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0))]
            .into_iter()
            .collect()
    }

    #[test]
    fn get_request_round_trip() {
        let pdu = Pdu::generic(
            PduType::GetRequest,
            1,
            ErrorStatus::NoError,
            0,
            sample_varbinds(),
        )
        .unwrap();

        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf).unwrap();
        let bytes = buf.finish();
        assert_eq!(bytes[0], tag::pdu::GET_REQUEST);

        let mut decoder = Decoder::new(bytes);
        let decoded = Pdu::decode(&mut decoder).unwrap();
        assert_eq!(decoded, pdu);
        assert_eq!(decoded.request_id(), Some(1));
    }

    #[test]
    fn get_bulk_request_round_trip() {
        let pdu = Pdu::bulk(7, 1, 10, sample_varbinds());

        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf).unwrap();
        let bytes = buf.finish();
        assert_eq!(bytes[0], tag::pdu::GET_BULK_REQUEST);

        let mut decoder = Decoder::new(bytes);
        let decoded = Pdu::decode(&mut decoder).unwrap();
        assert_eq!(decoded, pdu);
        match decoded.fields {
            PduFields::Bulk {
                non_repeaters,
                max_repetitions,
                ..
            } => {
                assert_eq!(non_repeaters, 1);
                assert_eq!(max_repetitions, 10);
            }
            _ => panic!("expected Bulk shape"),
        }
    }

    #[test]
    fn trap_v1_round_trip() {
        let mut varbinds = VarBindList::new();
        varbinds.push(VarBind::new(
            oid!(1, 3, 6, 1, 2, 1, 1, 3, 0),
            Value::TimeTicks(42),
        ));
        let pdu = Pdu::trap_v1(
            oid!(1, 3, 6, 1, 4, 1, 8072, 3, 2, 255),
            [192, 168, 1, 1],
            GenericTrap::ColdStart,
            0,
            123456,
            varbinds,
        );

        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf).unwrap();
        let bytes = buf.finish();
        assert_eq!(bytes[0], tag::pdu::TRAP_V1);

        let mut decoder = Decoder::new(bytes);
        let decoded = Pdu::decode(&mut decoder).unwrap();
        assert_eq!(decoded, pdu);
        assert_eq!(decoded.request_id(), None);
    }

    #[test]
    fn generic_shape_rejects_bulk_and_trap() {
        assert!(matches!(
            Pdu::generic(
                PduType::GetBulkRequest,
                1,
                ErrorStatus::NoError,
                0,
                VarBindList::new()
            ),
            Err(Error::StructureError(_))
        ));
        assert!(matches!(
            Pdu::generic(PduType::TrapV1, 1, ErrorStatus::NoError, 0, VarBindList::new()),
            Err(Error::StructureError(_))
        ));
    }

    #[test]
    fn map_error_to_v1_only_touches_generic_shape() {
        let mut pdu = Pdu::generic(
            PduType::Response,
            1,
            ErrorStatus::WrongValue,
            1,
            VarBindList::new(),
        )
        .unwrap();
        pdu.map_error_to_v1();
        match pdu.fields {
            PduFields::Generic { error_status, .. } => {
                assert_eq!(error_status, ErrorStatus::BadValue)
            }
            _ => panic!("expected Generic shape"),
        }

        let mut bulk = Pdu::bulk(1, 0, 5, VarBindList::new());
        bulk.map_error_to_v1(); // no-op, no error-status field
        assert!(matches!(bulk.fields, PduFields::Bulk { .. }));
    }

    #[test]
    fn unknown_tag_rejected() {
        let bytes = bytes::Bytes::from_static(&[0x99, 0x00]);
        let mut decoder = Decoder::new(bytes);
        assert!(matches!(
            Pdu::decode(&mut decoder),
            Err(Error::UnknownTag { tag: 0x99 })
        ));
    }

    #[test]
    fn pdu_type_is_v2_only_matches_spec_open_question_4() {
        assert!(PduType::GetBulkRequest.is_v2_only());
        assert!(PduType::InformRequest.is_v2_only());
        assert!(PduType::SnmpV2Trap.is_v2_only());
        assert!(PduType::Report.is_v2_only());
        assert!(!PduType::GetRequest.is_v2_only());
        assert!(PduType::TrapV1.is_v1_only());
    }

    #[test]
    fn generic_trap_round_trips_unknown_codes() {
        assert_eq!(GenericTrap::from_i32(2), GenericTrap::LinkDown);
        assert_eq!(GenericTrap::from_i32(99).as_i32(), 99);
    }
}
