//! Pure Rust synchronous client for the [Source RCON protocol](https://wiki.vg/RCON)
//! as spoken by Minecraft servers.
pub mod client;
pub mod connection;
pub mod error;
pub mod packet;

pub use client::Client;
pub use error::{PayloadError, RconError};
