#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;

use snmp_ber_core::pdu::Pdu;
use snmp_ber_core::Message;

fuzz_target!(|data: &[u8]| {
    let bytes = Bytes::copy_from_slice(data);

    // Fuzz the message decoder
    let _ = Message::decode(bytes.clone());

    // Fuzz the PDU decoder directly
    let mut decoder = snmp_ber_core::ber::Decoder::new(bytes);
    let _ = Pdu::decode(&mut decoder);
});
