//! The live connection handle and its state machine.

use std::fmt;
use std::net::SocketAddr;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use uuid::Uuid;

use crate::client::connector::Transport;
use crate::client::handshake::client_handshake;
use crate::client::stream::Stream;
use crate::error::BoltError;

/// The lifecycle state of a [`BoltConnection`].
///
/// `Closed` and `Failed` are terminal — a connection cannot be reopened;
/// construct a new one through the connector instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport established, handshake not yet complete.
    Connecting,
    /// Handshake complete; the channel is usable.
    Open,
    /// Explicitly closed by the owner.
    Closed,
    /// A transport or negotiation failure ended the connection.
    Failed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A channel to one resolved candidate, live until closed or failed.
///
/// The connection exclusively owns its socket (and TLS session, when the
/// transport is encrypted); both are released when the handle is dropped,
/// on every path. I/O requires `&mut self`, so concurrent use from
/// multiple tasks must be serialized by the caller. All operations
/// complete within the awaited call.
#[derive(Debug)]
pub struct BoltConnection {
    id: Uuid,
    transport: Transport,
    stream: Stream,
    remote_addr: SocketAddr,
    protocol_version: u32,
    state: ConnectionState,
}

impl BoltConnection {
    pub(crate) fn connecting(
        transport: Transport,
        stream: Stream,
        remote_addr: SocketAddr,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            transport,
            stream,
            remote_addr,
            protocol_version: 0,
            state: ConnectionState::Connecting,
        }
    }

    /// Runs the version handshake and opens the connection.
    pub(crate) async fn negotiate(&mut self) -> Result<(), BoltError> {
        match client_handshake(&mut self.stream).await {
            Ok(version) => {
                self.protocol_version = version;
                self.set_state(ConnectionState::Open);
                tracing::info!(conn = %self.id, version, "connection open");
                Ok(())
            }
            Err(err) => {
                self.set_state(ConnectionState::Failed);
                Err(err)
            }
        }
    }

    /// Identifier used to correlate this connection in logs.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The transport kind this connection was opened with.
    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// The candidate endpoint this connection is attached to.
    pub fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    /// The negotiated protocol version. Valid once the connection is open.
    pub fn protocol_version(&self) -> u32 {
        self.protocol_version
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Sends `data` in full on the open channel.
    ///
    /// A transport failure transitions the connection to `Failed`.
    pub async fn send(&mut self, data: &[u8]) -> Result<(), BoltError> {
        self.ensure_open()?;
        if data.is_empty() {
            return Ok(());
        }
        if let Err(err) = self.stream.write_all(data).await {
            return Err(self.fail(err));
        }
        if let Err(err) = self.stream.flush().await {
            return Err(self.fail(err));
        }
        tracing::trace!(conn = %self.id, bytes = data.len(), "sent");
        Ok(())
    }

    /// Receives exactly `len` bytes from the open channel.
    ///
    /// A transport failure (including peer disconnect mid-read) transitions
    /// the connection to `Failed`.
    pub async fn receive(&mut self, len: usize) -> Result<BytesMut, BoltError> {
        self.ensure_open()?;
        let mut buf = BytesMut::zeroed(len);
        if let Err(err) = self.stream.read_exact(&mut buf[..]).await {
            return Err(self.fail(err));
        }
        tracing::trace!(conn = %self.id, bytes = len, "received");
        Ok(buf)
    }

    /// Orderly shutdown of the transport (and TLS session, if any).
    ///
    /// Idempotent: closing a connection that is already `Closed` or
    /// `Failed` is a no-op, not an error.
    pub async fn close(&mut self) -> Result<(), BoltError> {
        match self.state {
            ConnectionState::Connecting | ConnectionState::Open => {
                tracing::info!(conn = %self.id, "closing connection");
                if let Err(err) = self.stream.shutdown().await {
                    tracing::debug!(conn = %self.id, error = %err, "shutdown error ignored");
                }
                self.set_state(ConnectionState::Closed);
                Ok(())
            }
            ConnectionState::Closed | ConnectionState::Failed => Ok(()),
        }
    }

    fn ensure_open(&self) -> Result<(), BoltError> {
        match self.state {
            ConnectionState::Open => Ok(()),
            other => Err(BoltError::NotOpen(other)),
        }
    }

    fn fail(&mut self, err: std::io::Error) -> BoltError {
        tracing::warn!(conn = %self.id, error = %err, "transport failure");
        self.set_state(ConnectionState::Failed);
        BoltError::Io(err)
    }

    fn set_state(&mut self, state: ConnectionState) {
        if state != self.state {
            tracing::debug!(conn = %self.id, from = %self.state, to = %state, "state change");
            self.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::{BoltAddress, StaticResolver};
    use crate::client::connector::BoltConnector;
    use crate::client::testing;

    async fn open_against(addr: SocketAddr) -> BoltConnection {
        let mut address = BoltAddress::new("localhost", "7687");
        address
            .resolve_with(&StaticResolver::new(vec![addr]))
            .await
            .unwrap();
        BoltConnector::new()
            .open(&address, Transport::Plain)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn send_and_receive_round_trip() {
        let addr = testing::spawn_echo_server().await;
        let mut conn = open_against(addr).await;

        conn.send(&[0x01, 0x02, 0x03]).await.unwrap();
        let echoed = conn.receive(3).await.unwrap();
        assert_eq!(&echoed[..], &[0x01, 0x02, 0x03]);

        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn empty_send_is_a_no_op() {
        let addr = testing::spawn_echo_server().await;
        let mut conn = open_against(addr).await;
        conn.send(&[]).await.unwrap();
        assert_eq!(conn.state(), ConnectionState::Open);
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let addr = testing::spawn_handshake_server(1u32.to_be_bytes()).await;
        let mut conn = open_against(addr).await;

        conn.close().await.unwrap();
        assert_eq!(conn.state(), ConnectionState::Closed);
        conn.close().await.unwrap();
        assert_eq!(conn.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn send_after_close_fails() {
        let addr = testing::spawn_handshake_server(1u32.to_be_bytes()).await;
        let mut conn = open_against(addr).await;
        conn.close().await.unwrap();

        let err = conn.send(&[0xFF]).await.unwrap_err();
        assert!(matches!(err, BoltError::NotOpen(ConnectionState::Closed)));
    }

    #[tokio::test]
    async fn peer_disconnect_marks_failed() {
        let addr = testing::spawn_closing_server().await;
        let mut conn = open_against(addr).await;

        // The server hung up after the handshake; an exact read cannot
        // complete.
        let err = conn.receive(1).await.unwrap_err();
        assert!(matches!(err, BoltError::Io(_)));
        assert_eq!(conn.state(), ConnectionState::Failed);

        // Failed is terminal; close stays a no-op.
        conn.close().await.unwrap();
        assert_eq!(conn.state(), ConnectionState::Failed);

        let err = conn.send(&[0x00]).await.unwrap_err();
        assert!(matches!(err, BoltError::NotOpen(ConnectionState::Failed)));
    }
}
