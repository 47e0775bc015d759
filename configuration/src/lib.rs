use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use serde::Deserialize;

const ENV_PREFIX: &str = "DNS_SERVER";

/// Loads `T` from an optional TOML file, then `DNS_SERVER_*` environment
/// variables (`__` separates nested keys, e.g. `DNS_SERVER_RESOLVER__UPSTREAM`).
pub fn get_config<T>(config_path: PathBuf) -> Result<T, config::ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let f = config::File::from(config_path).required(false);
    let env = config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__");
    let config = config::Config::builder()
        .add_source(f)
        .add_source(env)
        .build()?;
    config.try_deserialize::<T>()
}

#[derive(Debug, Default, Deserialize)]
pub struct DnsServerConfiguration {
    #[serde(default)]
    pub server: ServerConfiguration,
    #[serde(default)]
    pub resolver: ResolverConfiguration,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfiguration {
    #[serde(default = "default_ip_address")]
    ip_address: IpAddr,
    #[serde(default = "default_port")]
    port: u16,
}

impl ServerConfiguration {
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.ip_address, self.port)
    }
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            ip_address: default_ip_address(),
            port: default_port(),
        }
    }
}

fn default_ip_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    2053
}

#[derive(Debug, Deserialize)]
pub struct ResolverConfiguration {
    /// Upstream DNS server, answers are forwarded from it when set.
    pub upstream: Option<SocketAddr>,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
}

impl ResolverConfiguration {
    pub fn new(upstream: Option<SocketAddr>, timeout: Duration) -> Self {
        Self {
            upstream,
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ResolverConfiguration {
    fn default() -> Self {
        Self {
            upstream: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}
