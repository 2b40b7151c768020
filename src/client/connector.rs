//! Connection establishment: candidate selection, transport, negotiation.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rustls_pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::ClientConfig;

use crate::addressing::BoltAddress;
use crate::client::connection::BoltConnection;
use crate::client::stream::Stream;
use crate::error::BoltError;

/// Whether the byte stream is sent in the clear or wrapped in TLS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Plain,
    Encrypted,
}

/// Opens connections against resolved addresses.
///
/// The connector is an explicit context handle: TLS configuration and
/// timeouts live here rather than in process-wide state, so independent
/// connectors can coexist and be torn down cleanly.
pub struct BoltConnector {
    tls_config: Option<Arc<ClientConfig>>,
    connect_timeout: Option<Duration>,
}

impl BoltConnector {
    /// Creates a connector with no TLS configuration and no connect
    /// timeout (the transport's own timeout applies).
    pub fn new() -> Self {
        Self {
            tls_config: None,
            connect_timeout: None,
        }
    }

    /// Sets the rustls client configuration used for encrypted transports.
    /// Certificate validation policy is entirely the configuration's.
    pub fn tls_config(mut self, config: Arc<ClientConfig>) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Bounds each candidate's transport-layer connect attempt. This is
    /// the cancellation hook for callers that cannot wait on the OS
    /// default.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Opens a connection to `address` over the chosen transport and
    /// performs the version handshake.
    ///
    /// Requires a successfully resolved address. Candidates are tried in
    /// resolved order; a transport-layer connect failure falls through to
    /// the next candidate, while TLS and handshake failures are terminal.
    /// On any failure every partially-acquired resource is released before
    /// returning. Completes within the awaited call.
    pub async fn open(
        &self,
        address: &BoltAddress,
        transport: Transport,
    ) -> Result<BoltConnection, BoltError> {
        if address.resolved_count() == 0 {
            return Err(BoltError::Unresolved);
        }

        let mut attempts = 0;
        let mut last_err: Option<io::Error> = None;
        let mut connected: Option<(TcpStream, SocketAddr)> = None;
        for candidate in address.resolved_hosts() {
            attempts += 1;
            tracing::info!(
                family = if candidate.is_ipv4() { "IPv4" } else { "IPv6" },
                %candidate,
                "opening connection"
            );
            match self.connect_tcp(*candidate).await {
                Ok(stream) => {
                    connected = Some((stream, *candidate));
                    break;
                }
                Err(err) => {
                    tracing::debug!(%candidate, error = %err, "candidate connect failed");
                    last_err = Some(err);
                }
            }
        }
        let (tcp, remote) = match connected {
            Some(pair) => pair,
            None => {
                let source =
                    last_err.unwrap_or_else(|| io::Error::other("no candidates attempted"));
                return Err(BoltError::ConnectFailed { attempts, source });
            }
        };

        let stream = match transport {
            Transport::Plain => Stream::Plain(tcp),
            Transport::Encrypted => Stream::Tls(Box::new(self.secure(tcp, address).await?)),
        };

        let mut connection = BoltConnection::connecting(transport, stream, remote);
        connection.negotiate().await?;
        Ok(connection)
    }

    async fn connect_tcp(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        match self.connect_timeout {
            Some(limit) => tokio::time::timeout(limit, TcpStream::connect(addr))
                .await
                .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "connect timed out"))?,
            None => TcpStream::connect(addr).await,
        }
    }

    async fn secure(
        &self,
        tcp: TcpStream,
        address: &BoltAddress,
    ) -> Result<tokio_rustls::client::TlsStream<TcpStream>, BoltError> {
        let config = self
            .tls_config
            .clone()
            .ok_or_else(|| BoltError::Tls("no TLS client configuration provided".into()))?;
        tracing::info!(host = address.host(), "securing socket");

        let server_name = ServerName::try_from(address.host().to_string())
            .map_err(|err| BoltError::Tls(format!("invalid server name {:?}: {err}", address.host())))?;
        TlsConnector::from(config)
            .connect(server_name, tcp)
            .await
            .map_err(|err| BoltError::Tls(err.to_string()))
    }
}

impl Default for BoltConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::StaticResolver;
    use crate::client::connection::ConnectionState;
    use crate::client::testing;

    async fn resolved_to(candidates: Vec<SocketAddr>) -> BoltAddress {
        let mut address = BoltAddress::new("localhost", "7687");
        address
            .resolve_with(&StaticResolver::new(candidates))
            .await
            .unwrap();
        address
    }

    #[tokio::test]
    async fn open_plain_connection() {
        let addr = testing::spawn_handshake_server(1u32.to_be_bytes()).await;
        let address = resolved_to(vec![addr]).await;

        let mut conn = BoltConnector::new()
            .open(&address, Transport::Plain)
            .await
            .unwrap();

        assert_eq!(conn.state(), ConnectionState::Open);
        assert_eq!(conn.protocol_version(), 1);
        assert_eq!(conn.transport(), Transport::Plain);
        assert_eq!(conn.remote_addr(), addr);

        conn.close().await.unwrap();
        assert_eq!(conn.state(), ConnectionState::Closed);
    }

    #[tokio::test]
    async fn open_requires_resolution() {
        let address = BoltAddress::new("localhost", "7687");
        let err = BoltConnector::new()
            .open(&address, Transport::Plain)
            .await
            .unwrap_err();
        assert!(matches!(err, BoltError::Unresolved));
    }

    #[tokio::test]
    async fn open_unreachable_candidate() {
        let dead = testing::unreachable_addr().await;
        let address = resolved_to(vec![dead]).await;

        let err = BoltConnector::new()
            .open(&address, Transport::Plain)
            .await
            .unwrap_err();
        assert!(matches!(err, BoltError::ConnectFailed { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn open_falls_through_to_working_candidate() {
        let dead = testing::unreachable_addr().await;
        let live = testing::spawn_handshake_server(1u32.to_be_bytes()).await;
        let address = resolved_to(vec![dead, live]).await;

        let mut conn = BoltConnector::new()
            .open(&address, Transport::Plain)
            .await
            .unwrap();
        assert_eq!(conn.remote_addr(), live);
        conn.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_exhausts_all_candidates() {
        let dead1 = testing::unreachable_addr().await;
        let dead2 = testing::unreachable_addr().await;
        let address = resolved_to(vec![dead1, dead2]).await;

        let err = BoltConnector::new()
            .open(&address, Transport::Plain)
            .await
            .unwrap_err();
        assert!(matches!(err, BoltError::ConnectFailed { attempts: 2, .. }));
    }

    #[tokio::test]
    async fn handshake_rejection_is_terminal() {
        let addr = testing::spawn_handshake_server([0, 0, 0, 0]).await;
        let address = resolved_to(vec![addr]).await;

        let err = BoltConnector::new()
            .open(&address, Transport::Plain)
            .await
            .unwrap_err();
        assert!(matches!(err, BoltError::Handshake(_)));
    }

    #[tokio::test]
    async fn encrypted_transport_requires_tls_config() {
        let addr = testing::spawn_handshake_server(1u32.to_be_bytes()).await;
        let address = resolved_to(vec![addr]).await;

        let err = BoltConnector::new()
            .open(&address, Transport::Encrypted)
            .await
            .unwrap_err();
        assert!(matches!(err, BoltError::Tls(_)));
    }

    #[tokio::test]
    async fn connect_timeout_is_applied() {
        // 198.51.100.0/24 (TEST-NET-2) does not route; the connect attempt
        // can only end by timing out.
        let address = resolved_to(vec!["198.51.100.1:7687".parse().unwrap()]).await;

        let err = BoltConnector::new()
            .connect_timeout(Duration::from_millis(50))
            .open(&address, Transport::Plain)
            .await
            .unwrap_err();
        assert!(matches!(err, BoltError::ConnectFailed { .. }));
    }
}
