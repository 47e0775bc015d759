// https://datatracker.ietf.org/doc/html/rfc1035#section-4

mod answer;
mod error;
mod header;
mod label;
mod message;
mod question;

pub use answer::Answer;
pub use error::DnsError;
pub use header::{Header, HEADER_SIZE, OPCODE_QUERY, RCODE_NOT_IMPLEMENTED, RCODE_NO_ERROR};
pub use label::{decode_name, encode_name, MAX_LABEL_LEN};
pub use message::Message;
pub use question::{Question, CLASS_IN, TYPE_A};

// Messages carried by UDP are restricted to 512 bytes (not counting the IP
// or UDP headers).
pub const MAX_UDP_MESSAGE_SIZE: usize = 512;

pub fn encode_request(id: u16, domain: &str) -> Result<Vec<u8>, DnsError> {
    Message::query(id, domain).encode()
}

pub fn decode_response(response_bytes: &[u8]) -> Result<Message, DnsError> {
    Message::decode_response(response_bytes)
}
