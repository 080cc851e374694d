//! # vcontrold-client
//!
//! Async Rust client for the CLI protocol spoken by the
//! [vcontrold](https://github.com/openv/vcontrold) heating-control daemon
//! over TCP.
//!
//! The daemon accepts newline-terminated commands and replies with free-form
//! text terminated by the literal prompt token `vctrld>`. This crate manages
//! the connection lifecycle and turns that raw byte stream into a
//! request/response contract: one pending command at a time, the response
//! buffered until the prompt reappears, with timeout and error propagation.
//!
//! ## Architecture
//!
//! - **Protocol** ([`protocol`]): command-line encoding, prompt-delimited
//!   response accumulation, get/set response classification. No I/O.
//! - **Client** ([`client`]): TCP connection ownership, connect handshake,
//!   command dispatch, timeout-triggered teardown.
//!
//! The client does not interpret command semantics, does not retry failed
//! commands, and keeps no state across connections. A timeout or transport
//! error invalidates the client; reconnecting requires building a fresh one.
//!
//! ## Example
//!
//! ```ignore
//! use vcontrold_client::VControlClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = VControlClient::builder("192.168.1.10", 3002)
//!         .debug(true)
//!         .build();
//!
//!     client.connect().await?;
//!     let temp = client.get("getTempA").await?;
//!     println!("outside temperature: {temp}");
//!     client.set("setTempRaumNorSollM1", ["20"]).await?;
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod protocol;

pub use client::{ClientBuilder, ClientConfig, Mode, VControlClient, DEFAULT_TIMEOUT};
pub use error::{Result, VControlError};
