//! Bolt client core — connection establishment and the live channel.
//!
//! [`BoltConnector`] consumes a resolved [`BoltAddress`](crate::addressing::BoltAddress)
//! and a transport preference, opens a socket (optionally TLS-wrapped),
//! performs the version handshake, and yields a stateful [`BoltConnection`].

mod connection;
mod connector;
mod handshake;
mod stream;

pub use connection::{BoltConnection, ConnectionState};
pub use connector::{BoltConnector, Transport};
pub use handshake::client_handshake;
