use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use byteorder::{ByteOrder, BE};
use bytes::BytesMut;
use dns::{DnsError, Message, MAX_UDP_MESSAGE_SIZE, RCODE_NO_ERROR};
use thiserror::Error;
use tokio::net::UdpSocket;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("upstream socket error: {0}")]
    Io(#[from] std::io::Error),

    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),

    #[error("malformed upstream message: {0}")]
    Malformed(#[from] DnsError),

    #[error("upstream answered with rcode {rcode}")]
    ServerFailure { rcode: u8 },
}

/// Resolves a domain name to its IPv4 addresses.
pub trait Lookup {
    fn lookup(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Vec<Ipv4Addr>, LookupError>> + Send;
}

/// Looks names up by sending one A query over UDP to an upstream server.
#[derive(Debug, Clone)]
pub struct UdpLookup {
    server_addr: SocketAddr,
    timeout: Duration,
}

impl UdpLookup {
    pub fn new(server_addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            server_addr,
            timeout,
        }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    // Sends the query and waits for the reply carrying `id`; replies with
    // any other id are dropped.
    async fn exchange(&self, request_bytes: &[u8], id: u16) -> Result<Message, LookupError> {
        let local_addr: SocketAddr = if self.server_addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let sock = UdpSocket::bind(local_addr).await?;
        sock.connect(self.server_addr).await?;

        let _send_size = sock.send(request_bytes).await?;

        loop {
            let mut resp_buf = BytesMut::with_capacity(MAX_UDP_MESSAGE_SIZE);
            let response_size = sock.recv_buf(&mut resp_buf).await?;
            tracing::debug!(
                "received udp response, length: {}, {:?}",
                response_size,
                &resp_buf[..]
            );

            let reply_id = resp_buf.get(..2).map(BE::read_u16);
            if reply_id != Some(id) {
                tracing::debug!("ignoring reply with id {:?}, expected {}", reply_id, id);
                continue;
            }

            return Ok(dns::decode_response(&resp_buf)?);
        }
    }
}

impl Lookup for UdpLookup {
    async fn lookup(&self, name: &str) -> Result<Vec<Ipv4Addr>, LookupError> {
        tracing::debug!("resolving domain: {} via {}", name, self.server_addr);

        let id = fastrand::u16(..);
        let request_bytes = dns::encode_request(id, name)?;

        let resp = tokio::time::timeout(self.timeout, self.exchange(&request_bytes, id))
            .await
            .map_err(|_| LookupError::Timeout(self.timeout))??;

        if resp.header.rcode != RCODE_NO_ERROR {
            return Err(LookupError::ServerFailure {
                rcode: resp.header.rcode,
            });
        }

        let addresses = addresses(&resp);
        tracing::debug!(
            "received udp response has {} answers, {} addresses",
            resp.answers.len(),
            addresses.len()
        );

        Ok(addresses)
    }
}

// A/IN answers only, in wire order; CNAME and friends are skipped
fn addresses(resp: &Message) -> Vec<Ipv4Addr> {
    resp.answers.iter().filter_map(|r| r.ipv4()).collect()
}
