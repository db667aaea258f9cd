//! The SNMP message envelope: version, community string, and PDU.
//!
//! Plain SNMPv1/v2c community-based framing: no USM header, no engine
//! discovery, no encrypted scoped PDU.

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::ber::{tag, ByteSink, ByteSource, Decoder, EncodeBuf};
use crate::error::{Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::pdu::{Pdu, PduFields, PduType};
use crate::value::Value;
use crate::version::Version;

/// `sysUpTime.0`, the object most traps and informs lead with so a manager
/// can tell how long the agent has been running. Not a parsed/validated
/// MIB name — just the one OID this engine recognizes by value to implement
/// the build-time sysUpTime.0 refresh this module performs.
fn sys_up_time_oid() -> Oid {
    Oid::from_arcs(&[1, 3, 6, 1, 2, 1, 1, 3, 0])
}

/// Seconds since the Unix epoch, in SNMP's hundredths-of-a-second TimeTicks
/// unit, wrapped to fit `u32`. This engine has no notion of "time since the
/// agent started" (that's platform integration, out of scope per §1) — this
/// is the best available proxy a caller can refresh a `sysUpTime.0` varbind
/// with before sending, and callers tracking real uptime should overwrite it
/// themselves rather than rely on this helper.
fn current_centiseconds() -> u32 {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    (now.as_secs().wrapping_mul(100) as u32).wrapping_add((now.subsec_millis() / 10) as u32)
}

/// Generate a fresh `request-id` using the system CSPRNG.
pub fn random_request_id() -> Result<i32> {
    let mut buf = [0u8; 4];
    getrandom::fill(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

/// Reject a (version, PDU type) combination that is invalid to *build*:
/// SNMPv1 framing cannot carry a v2c-only PDU type, and SNMPv2c framing
/// cannot carry the v1-only Trap-PDU shape.
fn check_pdu_version_build(version: Version, pdu_type: PduType) -> Result<()> {
    match version {
        Version::V1 if pdu_type.is_v2_only() => Err(Error::EncodeError(
            "SNMPv1 message cannot carry a SNMPv2c-only PDU type",
        )),
        Version::V2c if pdu_type.is_v1_only() => Err(Error::EncodeError(
            "SNMPv2c message cannot carry a Trap-v1 PDU",
        )),
        _ => Ok(()),
    }
}

/// Same check for a PDU type recovered while *parsing*; yields
/// [`Error::StructureError`] rather than [`Error::EncodeError`] since the
/// bytes are already on the wire — this is a decode-time rejection, not a
/// caller programming error.
fn check_pdu_version_parse(version: Version, pdu_type: PduType) -> Result<()> {
    match version {
        Version::V1 if pdu_type.is_v2_only() => Err(Error::StructureError(
            "SNMPv1 message carries a SNMPv2c-only PDU type",
        )),
        Version::V2c if pdu_type.is_v1_only() => Err(Error::StructureError(
            "SNMPv2c message carries a Trap-v1 PDU",
        )),
        _ => Ok(()),
    }
}

/// A complete SNMP v1/v2c message: version, community string, and PDU
/// (RFC 1157 §4 / RFC 1901 §3).
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub version: Version,
    pub community: Bytes,
    pub pdu: Pdu,
}

impl Message {
    /// Build a message from its three fields. Does not itself validate the
    /// (version, PDU type) pairing — that's checked at `build`/`parse` time,
    /// so a caller assembling a `Message` step by step never hits a
    /// surprising failure mid-construction.
    pub fn new(version: Version, community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self {
            version,
            community: community.into(),
            pdu,
        }
    }

    /// Overwrite this message's PDU `error-status`/`error-index` (a no-op
    /// for the Bulk and Trap-v1 shapes, which carry no such fields) — the
    /// usual way to turn a request PDU template into an error Response.
    pub fn set_error(&mut self, status: ErrorStatus, index: i32) {
        if let PduFields::Generic {
            error_status,
            error_index,
            ..
        } = &mut self.pdu.fields
        {
            *error_status = status;
            *error_index = index;
        }
    }

    /// Overwrite the first `sysUpTime.0` varbind in this message's PDU (if
    /// any) with the current time, in TimeTicks. Called automatically by
    /// [`Message::build_into_buffer`]/[`Message::build_into_stream`] just
    /// before encoding (patched at build time, not
    /// maintained live). A message whose PDU doesn't carry `sysUpTime.0`
    /// (e.g. a plain GetRequest) is left untouched.
    pub fn refresh_sys_up_time(&mut self) {
        let oid = sys_up_time_oid();
        if let Some(vb) = self
            .pdu
            .varbinds_mut()
            .iter_mut()
            .find(|vb| vb.oid == oid)
        {
            vb.value = Value::TimeTicks(current_centiseconds());
        }
    }

    fn encode_outer(&self, buf: &mut EncodeBuf) -> Result<()> {
        let mut inner_err = None;
        buf.push_sequence(|buf| {
            if let Err(e) = self.pdu.encode(buf) {
                inner_err = Some(e);
            }
            buf.push_octet_string(&self.community);
            buf.push_integer(self.version.as_i32());
        });
        match inner_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Refresh `sysUpTime.0` (if present) and encode this message into a
    /// single in-memory buffer — the natural fit for a complete UDP
    /// datagram ([`crate::config::StreamingMode::Buffer`]).
    pub fn build_into_buffer(&mut self) -> Result<Bytes> {
        check_pdu_version_build(self.version, self.pdu.pdu_type)?;
        self.refresh_sys_up_time();
        let mut buf = EncodeBuf::new();
        self.encode_outer(&mut buf)?;
        let bytes = buf.finish();
        debug!(
            version = %self.version,
            pdu.type = %self.pdu.pdu_type,
            bytes = bytes.len(),
            "built SNMP message"
        );
        Ok(bytes)
    }

    /// Refresh `sysUpTime.0` (if present), encode, and write this message
    /// to a [`ByteSink`] ([`crate::config::StreamingMode::Stream`]).
    pub fn build_into_stream<W: ByteSink>(&mut self, sink: &mut W) -> Result<()> {
        let bytes = self.build_into_buffer()?;
        sink.write_bytes(&bytes)
    }

    /// Parse a complete message out of `bytes`.
    pub fn parse_from_buffer(bytes: Bytes) -> Result<Self> {
        let mut decoder = Decoder::new(bytes);
        let mut seq = decoder.read_sequence()?;

        seq.expect_tag(tag::universal::INTEGER)?;
        let raw_version = seq.read_integer()?;
        let version = Version::from_i32(raw_version).ok_or(Error::StructureError(
            "unsupported SNMP version (not v1 or v2c)",
        ))?;

        seq.expect_tag(tag::universal::OCTET_STRING)?;
        let community = seq.read_octet_string()?;

        let pdu = Pdu::decode(&mut seq)?;
        seq.finish("Message")?;

        check_pdu_version_parse(version, pdu.pdu_type)?;

        trace!(
            version = %version,
            pdu.type = %pdu.pdu_type,
            varbinds = pdu.varbinds().len(),
            "parsed SNMP message"
        );

        Ok(Self {
            version,
            community,
            pdu,
        })
    }

    /// Read exactly one message's TLV from a [`ByteSource`] and parse it.
    pub fn parse_from_stream<S: ByteSource>(source: &mut S) -> Result<Self> {
        let bytes = crate::ber::read_tlv(source)?;
        Self::parse_from_buffer(bytes)
    }

    /// Thin convenience wrapper over [`Message::build_into_buffer`], named
    /// to match the call site other crates in this lineage expect.
    pub fn encode(&mut self) -> Result<Bytes> {
        self.build_into_buffer()
    }

    /// Thin convenience wrapper over [`Message::parse_from_buffer`].
    pub fn decode(bytes: Bytes) -> Result<Self> {
        Self::parse_from_buffer(bytes)
    }
}

/// Discard and log a datagram that failed to parse as an SNMP message,
/// so a caller's receive loop can log a rejected datagram consistently.
/// Transport code outside this crate's scope is expected to call this from
/// its receive loop; it does nothing itself beyond logging.
pub fn log_discarded_datagram(err: &Error) {
    warn!(error = %err, "discarded malformed SNMP datagram");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::oid;
    use crate::pdu::GenericTrap;
    use crate::varbind::{VarBind, VarBindList};

    fn get_request(request_id: i32) -> Message {
        let pdu = Pdu::generic(
            PduType::GetRequest,
            request_id,
            ErrorStatus::NoError,
            0,
            VarBindList::from_oids_null(vec![oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)]),
        )
        .unwrap();
        Message::new(Version::V2c, Bytes::from_static(b"public"), pdu)
    }

    #[test]
    fn build_and_parse_round_trip() {
        let mut msg = get_request(7);
        let bytes = msg.build_into_buffer().unwrap();
        let parsed = Message::parse_from_buffer(bytes).unwrap();
        assert_eq!(parsed.version, Version::V2c);
        assert_eq!(parsed.community, Bytes::from_static(b"public"));
        assert_eq!(parsed.pdu.request_id(), Some(7));
    }

    #[test]
    fn encode_decode_wrappers_match_buffer_path() {
        let mut msg = get_request(1);
        let bytes = msg.encode().unwrap();
        let decoded = Message::decode(bytes).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn set_error_updates_generic_shape_only() {
        let mut msg = get_request(1);
        msg.set_error(ErrorStatus::TooBig, 2);
        match msg.pdu.fields {
            PduFields::Generic {
                error_status,
                error_index,
                ..
            } => {
                assert_eq!(error_status, ErrorStatus::TooBig);
                assert_eq!(error_index, 2);
            }
            _ => panic!("expected Generic shape"),
        }
    }

    #[test]
    fn refresh_sys_up_time_patches_matching_varbind_only() {
        let mut varbinds = VarBindList::new();
        varbinds.push(VarBind::new(sys_up_time_oid(), Value::TimeTicks(0)));
        varbinds.push(VarBind::null(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0)));
        let pdu = Pdu::generic(PduType::SnmpV2Trap, 0, ErrorStatus::NoError, 0, varbinds).unwrap();
        let mut msg = Message::new(Version::V2c, Bytes::from_static(b"public"), pdu);

        msg.refresh_sys_up_time();

        match &msg.pdu.fields {
            PduFields::Generic { varbinds, .. } => {
                assert!(matches!(varbinds.get(0).unwrap().value, Value::TimeTicks(_)));
                assert_ne!(varbinds.get(0).unwrap().value, Value::TimeTicks(0));
                assert_eq!(varbinds.get(1).unwrap().value, Value::Null);
            }
            _ => panic!("expected Generic shape"),
        }
    }

    #[test]
    fn refresh_sys_up_time_is_noop_without_matching_oid() {
        let mut msg = get_request(1);
        let before = msg.pdu.varbinds().clone();
        msg.refresh_sys_up_time();
        assert_eq!(msg.pdu.varbinds(), &before);
    }

    #[test]
    fn v1_message_rejects_v2_only_pdu_on_build() {
        let pdu = Pdu::bulk(1, 0, 10, VarBindList::new());
        let mut msg = Message::new(Version::V1, Bytes::from_static(b"public"), pdu);
        assert!(matches!(
            msg.build_into_buffer(),
            Err(Error::EncodeError(_))
        ));
    }

    #[test]
    fn v2c_message_rejects_trap_v1_pdu_on_build() {
        let pdu = Pdu::trap_v1(
            oid!(1, 3, 6, 1, 4, 1, 1),
            [127, 0, 0, 1],
            GenericTrap::ColdStart,
            0,
            0,
            VarBindList::new(),
        );
        let mut msg = Message::new(Version::V2c, Bytes::from_static(b"public"), pdu);
        assert!(matches!(
            msg.build_into_buffer(),
            Err(Error::EncodeError(_))
        ));
    }

    #[test]
    fn parse_rejects_v1_framing_around_v2_only_pdu() {
        // Build as v2c (valid), then re-wrap the same PDU bytes under a v1
        // version field to exercise the parse-side rejection independently
        // of the build-side one.
        let pdu = Pdu::bulk(1, 0, 10, VarBindList::new());
        let mut msg = Message::new(Version::V2c, Bytes::from_static(b"public"), pdu);
        let mut buf = EncodeBuf::new();
        let mut err = None;
        buf.push_sequence(|buf| {
            if let Err(e) = msg.pdu.encode(buf) {
                err = Some(e);
            }
            buf.push_octet_string(&msg.community);
            buf.push_integer(Version::V1.as_i32());
        });
        assert!(err.is_none());
        let bytes = buf.finish();
        assert!(matches!(
            Message::parse_from_buffer(bytes),
            Err(Error::StructureError(_))
        ));
    }

    #[test]
    fn random_request_id_is_callable() {
        // Smoke test only: getrandom's output can't be asserted on beyond
        // "it produced a value without erroring".
        let _ = random_request_id().unwrap();
    }

    #[test]
    fn stream_round_trip_matches_buffer_round_trip() {
        let mut msg = get_request(3);
        let buffered = msg.build_into_buffer().unwrap();

        let mut msg2 = get_request(3);
        let mut sink: Vec<u8> = Vec::new();
        msg2.build_into_stream(&mut sink).unwrap();
        assert_eq!(sink, buffered.to_vec());

        let mut source = crate::ber::IoByteSource::new(std::io::Cursor::new(sink));
        let parsed = Message::parse_from_stream(&mut source).unwrap();
        assert_eq!(parsed.pdu.request_id(), Some(3));
    }

    #[test]
    fn engine_config_default_is_compatible_with_buffer_path() {
        // EngineConfig selects a usage convention, not a cfg-gated path;
        // both build/parse pairs stay exercised regardless of selection.
        let config = EngineConfig::default();
        let mut msg = get_request(9);
        let bytes = msg.build_into_buffer().unwrap();
        let _ = Message::parse_from_buffer(bytes).unwrap();
        let _ = config;
    }
}
