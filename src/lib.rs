//! boltkit — A pure-Rust Bolt protocol client core.
//!
//! This crate implements the client-side foundation of the Bolt binary
//! protocol used by Neo4j and compatible graph databases: a tagged value
//! representation, host-name resolution, and connection establishment with
//! version negotiation over plain or TLS transports.
//!
//! # Architecture
//!
//! - **`types`** — Tagged Bolt values (fixed-width integer scalars and arrays)
//! - **`addressing`** — Host/port resolution into concrete IPv4/IPv6 candidates
//! - **`version`** — Handshake preamble and version negotiation helpers
//! - **`client`** — `BoltConnector` and the stateful `BoltConnection` handle
//!
//! All operations complete within the awaited call: resolution, connect, and
//! handshake make no background progress. Message-level protocol semantics
//! (PackStream serialization, query execution) are layered on top of the raw
//! byte channel this crate provides and are out of scope here.

pub mod addressing;
pub mod client;
pub mod error;
pub mod types;
pub mod version;
