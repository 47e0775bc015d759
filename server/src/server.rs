use std::net::SocketAddr;

use configuration::ResolverConfiguration;
use dns::{DnsError, Message, MAX_UDP_MESSAGE_SIZE};
use resolver::{Forwarder, Lookup, UdpLookup, Upstream};
use tokio::net::UdpSocket;

use crate::hex_dump::dump_packet;

/// Picks the upstream server: `--resolver` wins over the configured one,
/// and without either every question gets the placeholder answer.
pub fn upstream_from(
    cli_resolver: Option<SocketAddr>,
    config: &ResolverConfiguration,
) -> Upstream<UdpLookup> {
    match cli_resolver.or(config.upstream) {
        Some(upstream_addr) => Upstream::Forward(UdpLookup::new(upstream_addr, config.timeout())),
        None => Upstream::Local,
    }
}

/// Decodes one query packet, resolves its questions and encodes the response.
pub async fn handle_packet<L: Lookup>(
    forwarder: &Forwarder<L>,
    packet: &[u8],
) -> Result<Vec<u8>, DnsError> {
    let request = Message::decode(packet)?;
    let response = forwarder.respond(request).await;
    response.encode()
}

/// Serves queries on `socket` one at a time until receiving fails.
///
/// A packet that cannot be decoded or answered is logged and dropped.
pub async fn serve<L: Lookup>(socket: UdpSocket, forwarder: Forwarder<L>) -> std::io::Result<()> {
    let mut buf = [0u8; MAX_UDP_MESSAGE_SIZE];

    loop {
        let (size, source) = socket.recv_from(&mut buf).await.map_err(|e| {
            tracing::error!("Error receiving data: {}", e);
            e
        })?;
        let packet = &buf[..size];
        tracing::debug!("received {} bytes from {}\n{}", size, source, dump_packet(packet));

        let response = match handle_packet(&forwarder, packet).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!("Failed to handle packet from {}: {}", source, e);
                continue;
            }
        };

        if let Err(e) = socket.send_to(&response, source).await {
            tracing::error!("Failed to send response to {}: {}", source, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dns::{decode_name, Header, HEADER_SIZE};
    use std::net::Ipv4Addr;
    use std::time::Duration;

    fn resolver_config(upstream: Option<&str>) -> ResolverConfiguration {
        let upstream = upstream.map(|a| a.parse().unwrap());
        ResolverConfiguration::new(upstream, Duration::from_millis(1500))
    }

    fn forward_addr(upstream: &Upstream<UdpLookup>) -> Option<SocketAddr> {
        match upstream {
            Upstream::Local => None,
            Upstream::Forward(lookup) => Some(lookup.server_addr()),
        }
    }

    #[test]
    fn cli_resolver_overrides_config() {
        let config = resolver_config(Some("1.1.1.1:53"));
        let cli = Some("9.9.9.9:53".parse().unwrap());

        assert_eq!(forward_addr(&upstream_from(cli, &config)), cli);
    }

    #[test]
    fn configured_resolver_without_flag() {
        let config = resolver_config(Some("1.1.1.1:53"));

        assert_eq!(
            forward_addr(&upstream_from(None, &config)),
            Some("1.1.1.1:53".parse().unwrap())
        );
    }

    #[test]
    fn no_resolver_is_local() {
        let config = resolver_config(None);

        assert!(matches!(upstream_from(None, &config), Upstream::Local));
    }

    #[tokio::test]
    async fn binary_and_dotted_labels_are_echoed() {
        let mut binary = vec![63];
        binary.extend_from_slice(&[0xC3; 63]);
        binary.push(0);

        let names = [
            vec![1, 0xFF, 4, b't', b'e', b's', b't', 0],
            vec![3, b'a', b'.', b'b', 4, b't', b'e', b's', b't', 0],
            binary,
        ];

        for name in names {
            let mut query = vec![0x04, 0xd2, 0x01, 0x00, 0x00, 0x01, 0, 0, 0, 0, 0, 0];
            query.extend_from_slice(&name);
            query.extend_from_slice(&[0, 1, 0, 1]);

            let response = handle_packet(&local(), &query).await.unwrap();
            assert_eq!(&response[HEADER_SIZE..query.len()], &query[HEADER_SIZE..]);

            // the answer carries the same name bytes
            let answer_at = query.len();
            assert_eq!(&response[answer_at..answer_at + name.len()], &name[..]);
        }
    }

    fn local() -> Forwarder<UdpLookup> {
        Forwarder::new(Upstream::Local)
    }

    #[tokio::test]
    async fn end_to_end_packet() {
        let query = [
            0x04, 0xd2, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // header
            3, b'd', b'n', b's', 4, b't', b'e', b's', b't', 0, 0, 1, 0, 1, // dns.test A IN
        ];

        let response = handle_packet(&local(), &query).await.unwrap();

        let header_bytes: &[u8; HEADER_SIZE] = response[..HEADER_SIZE].try_into().unwrap();
        let header = Header::from_bytes(header_bytes);
        assert_eq!(header.id, 1234);
        assert!(header.qr);
        assert!(header.rd);
        assert_eq!(header.qdcount, 1);
        assert_eq!(header.ancount, 1);

        // question echoed verbatim
        assert_eq!(&response[HEADER_SIZE..query.len()], &query[HEADER_SIZE..]);

        let answer_at = query.len();
        let (name, consumed) = decode_name(&response, answer_at);
        assert_eq!(name, "dns.test");
        let fixed = &response[answer_at + consumed..];
        assert_eq!(&fixed[..10], &[0, 1, 0, 1, 0, 0, 0, 60, 0, 4]);
        assert_eq!(&fixed[10..], &[8, 8, 8, 8]);
    }

    #[tokio::test]
    async fn compressed_second_question() {
        let mut query = vec![0, 9, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0];
        query.extend_from_slice(&[3, b'a', b'b', b'c', 3, b'c', b'o', b'm', 0, 0, 1, 0, 1]);
        query.extend_from_slice(&[3, b'w', b'w', b'w', 0xC0, 12, 0, 1, 0, 1]);

        let response = handle_packet(&local(), &query).await.unwrap();
        let msg = dns::decode_response(&response).unwrap();

        let names: Vec<_> = msg.answers.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["abc.com", "www.abc.com"]);
    }

    #[tokio::test]
    async fn truncated_packet_is_rejected() {
        let query = [
            0x04, 0xd2, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // header
            3, b'd',
        ];

        assert!(matches!(
            handle_packet(&local(), &query).await,
            Err(DnsError::IncompleteQuestion { .. })
        ));
    }

    #[tokio::test]
    async fn serve_loopback() {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server_addr = socket.local_addr().unwrap();
        tokio::spawn(serve(socket, local()));

        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.connect(server_addr).await.unwrap();

        // garbage first, the server must keep serving
        client.send(&[1, 2, 3]).await.unwrap();

        let request = dns::encode_request(4321, "loopback.test").unwrap();
        client.send(&request).await.unwrap();

        let mut buf = [0u8; MAX_UDP_MESSAGE_SIZE];
        let n = tokio::time::timeout(Duration::from_secs(5), client.recv(&mut buf))
            .await
            .unwrap()
            .unwrap();

        let response = dns::decode_response(&buf[..n]).unwrap();
        assert_eq!(response.header.id, 4321);
        assert!(response.header.qr);
        assert_eq!(response.answers.len(), 1);
        assert_eq!(response.answers[0].name, "loopback.test");
        assert_eq!(response.answers[0].ipv4(), Some(resolver::PLACEHOLDER_ADDRESS));
    }

    #[tokio::test]
    async fn serve_forwarding() {
        // upstream that answers every query with two addresses
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let upstream_addr = upstream.local_addr().unwrap();
        tokio::spawn(async move {
            let mut buf = [0u8; MAX_UDP_MESSAGE_SIZE];
            while let Ok((n, peer)) = upstream.recv_from(&mut buf).await {
                let mut reply = Message::decode(&buf[..n]).unwrap();
                let name = reply.questions[0].name.clone();
                reply.header.qr = true;
                reply.answers = vec![
                    dns::Answer::a_record(&name, 300, "10.0.0.1".parse().unwrap()),
                    dns::Answer::a_record(&name, 300, "10.0.0.2".parse().unwrap()),
                ];
                let _ = upstream.send_to(&reply.encode().unwrap(), peer).await;
            }
        });

        let forwarder = Forwarder::new(Upstream::Forward(UdpLookup::new(
            upstream_addr,
            Duration::from_secs(2),
        )));
        let query = Message::decode(&dns::encode_request(11, "fwd.test").unwrap()).unwrap();
        let response = forwarder.respond(query).await;

        let addrs: Vec<_> = response.answers.iter().filter_map(|a| a.ipv4()).collect();
        let expected = vec![Ipv4Addr::new(10, 0, 0, 1), Ipv4Addr::new(10, 0, 0, 2)];
        assert_eq!(addrs, expected);
        assert!(response.answers.iter().all(|a| a.ttl == 60));
        assert_eq!(response.header.ancount, 2);
    }
}
