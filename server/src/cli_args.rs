use std::net::SocketAddr;
use std::path::PathBuf;
use argh::FromArgs;

fn default_config_path () -> PathBuf {
    PathBuf::from("./dns_server.toml")
}

#[derive(Debug, FromArgs)]
#[argh(description = "a minimal DNS server answering A queries over UDP")]
pub struct CliArgs {
    #[argh(
        option,
        description = "config file path, default: './dns_server.toml'",
        default = "default_config_path()"
    )]
    pub config: PathBuf,

    #[argh(
        option,
        description = "upstream resolver address, e.g. 1.1.1.1:53; overrides the config file"
    )]
    pub resolver: Option<SocketAddr>,
}
