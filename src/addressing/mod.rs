//! Logical endpoints and host-name resolution.

mod resolver;

pub use resolver::{AddressResolver, StaticResolver, SystemResolver};

use std::net::{IpAddr, SocketAddr};

use crate::error::BoltError;

/// Outcome of the last resolution attempt on a [`BoltAddress`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResolutionStatus {
    /// No resolution has been attempted yet.
    #[default]
    Unresolved,
    /// The last attempt succeeded; the candidate list is non-empty.
    Resolved,
    /// The last attempt failed; the candidate list is empty. `code` is the
    /// underlying OS resolver status when one was reported.
    Failed {
        code: Option<i32>,
        message: String,
    },
}

/// A logical host/port pair plus its resolution result.
///
/// The candidate list is populated in place by [`resolve`](Self::resolve)
/// and replaced wholesale on every attempt: a failed resolution leaves it
/// empty rather than partially filled, and re-resolving never appends.
#[derive(Debug, Clone)]
pub struct BoltAddress {
    host: String,
    port: String,
    resolved: Vec<SocketAddr>,
    resolved_port: u16,
    status: ResolutionStatus,
}

impl BoltAddress {
    /// Creates an unresolved address. `port` may be a numeric string or a
    /// service name the configured resolver understands.
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
            resolved: Vec::new(),
            resolved_port: 0,
            status: ResolutionStatus::Unresolved,
        }
    }

    /// The logical host this address was created with.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The logical port this address was created with.
    pub fn port(&self) -> &str {
        &self.port
    }

    /// The numeric port chosen by the last successful resolution.
    /// The first candidate's port wins.
    pub fn resolved_port(&self) -> u16 {
        self.resolved_port
    }

    /// Status of the last resolution attempt.
    pub fn status(&self) -> &ResolutionStatus {
        &self.status
    }

    /// Number of resolved candidates.
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// Iterates over the already-resolved candidates in resolver order.
    /// Restartable; never re-triggers resolution.
    pub fn resolved_hosts(&self) -> std::slice::Iter<'_, SocketAddr> {
        self.resolved.iter()
    }

    /// Resolves this address with the system resolver.
    ///
    /// Completes within the awaited call. Idempotent: every invocation
    /// replaces the candidate list wholesale.
    pub async fn resolve(&mut self) -> Result<(), BoltError> {
        self.resolve_with(&SystemResolver).await
    }

    /// Resolves this address with a caller-supplied resolver.
    pub async fn resolve_with(
        &mut self,
        resolver: &dyn AddressResolver,
    ) -> Result<(), BoltError> {
        tracing::info!(host = %self.host, port = %self.port, "resolving address");
        self.resolved.clear();
        self.resolved_port = 0;

        let result = resolver.resolve(&self.host, &self.port).await;
        let candidates = match result {
            Ok(candidates) if candidates.is_empty() => {
                let err = std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "host resolved to no usable addresses",
                );
                return Err(self.fail(err));
            }
            Ok(candidates) => candidates,
            Err(err) => return Err(self.fail(err)),
        };

        self.resolved = candidates.into_iter().map(canonical).collect();
        self.resolved_port = self.resolved[0].port();
        self.status = ResolutionStatus::Resolved;
        tracing::info!(
            host = %self.host,
            candidates = self.resolved.len(),
            resolved_port = self.resolved_port,
            "host resolved"
        );
        Ok(())
    }

    fn fail(&mut self, err: std::io::Error) -> BoltError {
        tracing::info!(
            host = %self.host,
            port = %self.port,
            error = %err,
            "host resolution failed"
        );
        self.status = ResolutionStatus::Failed {
            code: err.raw_os_error(),
            message: err.to_string(),
        };
        BoltError::Resolution {
            host: self.host.clone(),
            port: self.port.clone(),
            source: err,
        }
    }
}

/// Unwraps an IPv4-mapped IPv6 candidate to its true 4-byte IPv4 form so
/// the family discriminant reflects the address actually in use.
fn canonical(addr: SocketAddr) -> SocketAddr {
    match addr.ip() {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => SocketAddr::new(IpAddr::V4(v4), addr.port()),
            None => addr,
        },
        IpAddr::V4(_) => addr,
    }
}
