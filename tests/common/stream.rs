//! Helpers for exercising the streaming (`ByteSource`/`ByteSink`) seam in
//! integration tests.

use snmp_ber_core::ber::IoByteSource;
use snmp_ber_core::Message;

/// Parse as many back-to-back messages as `bytes` holds, via the streaming
/// decode path, stopping at the first parse error or end of input. BER TLVs
/// are self-delimiting, so concatenated messages (as a TCP-framed transport
/// might deliver them) parse out one at a time without any external framing.
pub fn parse_all_messages(bytes: Vec<u8>) -> Vec<Message> {
    let mut source = IoByteSource::new(std::io::Cursor::new(bytes));
    let mut messages = Vec::new();
    loop {
        match Message::parse_from_stream(&mut source) {
            Ok(msg) => messages.push(msg),
            Err(_) => break,
        }
    }
    messages
}
