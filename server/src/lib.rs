pub mod cli_args;
mod hex_dump;
mod server;

pub use hex_dump::{bytes_to_hex, dump_packet};
pub use server::{handle_packet, serve, upstream_from};
