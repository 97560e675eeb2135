//! Keyword search over secure indexes
//!
//! - `protocol`: line-delimited JSON wire frames (trapdoor requests and
//!   structured replies)
//! - `server`: the per-connection search loop over a directory of
//!   `.sindex` files
//! - `config`: command-line and environment configuration for the server

pub mod config;
pub mod protocol;
pub mod server;
