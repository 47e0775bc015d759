use std::error::Error;
use std::net::SocketAddr;
use std::time::Duration;
use log::{info, warn};
use tokio::net::UdpSocket;

// usage: mock_client [name] [server address]
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = env_logger::try_init();

    let name = std::env::args().nth(1).unwrap_or("codecrafters.io".to_string());
    let server_address = std::env::args().nth(2).unwrap_or("127.0.0.1:2053".to_string());
    let addr = server_address.parse::<SocketAddr>()?;

    // 1. sends an A query for the name
    let sock = UdpSocket::bind("0.0.0.0:0").await?;
    let request = dns::encode_request(std::process::id() as u16, &name)?;
    sock.send_to(&request, addr).await?;
    info!("sent query for {} to {}", name, addr);

    // 2. waits for the response
    let mut buf = [0u8; dns::MAX_UDP_MESSAGE_SIZE];
    let n = tokio::time::timeout(Duration::from_secs(5), sock.recv(&mut buf)).await??;
    let response = dns::decode_response(&buf[..n])?;
    info!("response header: {:?}", response.header);

    if response.answers.is_empty() {
        warn!("no answers for {}", name);
    }
    for answer in &response.answers {
        match answer.ipv4() {
            Some(ip) => println!("{}\t{}\tA\t{}", answer.name, answer.ttl, ip),
            None => println!(
                "{}\t{}\ttype {}\t{:?}",
                answer.name, answer.ttl, answer.rtype, answer.rdata
            ),
        }
    }

    Ok(())
}
