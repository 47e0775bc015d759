use std::error::Error;

use configuration::DnsServerConfiguration;
use resolver::{Forwarder, Upstream};
use server::cli_args::CliArgs;
use tokio::net::UdpSocket;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: CliArgs = argh::from_env();
    let config: DnsServerConfiguration = configuration::get_config(args.config)?;

    let address = config.server.bind_address();
    let socket = UdpSocket::bind(address).await?;
    tracing::info!("Listening on: {}, pid: {}", address, std::process::id());

    let upstream = server::upstream_from(args.resolver, &config.resolver);
    match &upstream {
        Upstream::Forward(lookup) => tracing::info!("Resolver address: {}", lookup.server_addr()),
        Upstream::Local => tracing::info!(
            "No resolver configured, answering with {}",
            resolver::PLACEHOLDER_ADDRESS
        ),
    }

    server::serve(socket, Forwarder::new(upstream)).await?;

    Ok(())
}
