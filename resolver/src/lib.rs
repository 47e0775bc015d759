mod forwarder;
mod lookup;

pub use forwarder::{
    response_header, ForwardError, Forwarder, Upstream, ANSWER_TTL, PLACEHOLDER_ADDRESS,
};
pub use lookup::{Lookup, LookupError, UdpLookup};
