//! Pluggable name resolution.

use std::io;
use std::net::SocketAddr;

use async_trait::async_trait;

/// Turns a logical host/port pair into concrete socket-addressable
/// candidates.
///
/// Implementations report failures through `io::Error` so the underlying
/// system status code survives into the recorded resolution status. An
/// empty candidate list is treated as a failure by the caller.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, host: &str, port: &str) -> io::Result<Vec<SocketAddr>>;
}

/// Resolves through the operating system resolver, preserving its
/// candidate ordering.
///
/// Port strings must be numeric or the Bolt protocol's registered service
/// name (`"bolt"`, 7687); other service names are rejected rather than
/// guessed at.
pub struct SystemResolver;

#[async_trait]
impl AddressResolver for SystemResolver {
    async fn resolve(&self, host: &str, port: &str) -> io::Result<Vec<SocketAddr>> {
        let port = service_port(port).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unknown service port {port:?}"),
            )
        })?;
        let candidates = tokio::net::lookup_host((host, port)).await?.collect();
        Ok(candidates)
    }
}

/// Maps a port string to its numeric value.
fn service_port(port: &str) -> Option<u16> {
    if let Ok(numeric) = port.parse::<u16>() {
        return Some(numeric);
    }
    match port {
        "bolt" => Some(7687),
        _ => None,
    }
}

/// Resolves every host to a fixed candidate list.
///
/// Useful for caller-supplied topologies and for exercising connection
/// logic without touching the system resolver.
pub struct StaticResolver {
    candidates: Vec<SocketAddr>,
}

impl StaticResolver {
    pub fn new(candidates: Vec<SocketAddr>) -> Self {
        Self { candidates }
    }
}

#[async_trait]
impl AddressResolver for StaticResolver {
    async fn resolve(&self, _host: &str, _port: &str) -> io::Result<Vec<SocketAddr>> {
        Ok(self.candidates.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ports_parse() {
        assert_eq!(service_port("7687"), Some(7687));
        assert_eq!(service_port("0"), Some(0));
    }

    #[test]
    fn bolt_service_name_maps() {
        assert_eq!(service_port("bolt"), Some(7687));
    }

    #[test]
    fn unknown_service_names_rejected() {
        assert_eq!(service_port("gopher"), None);
        assert_eq!(service_port(""), None);
        assert_eq!(service_port("99999"), None);
    }

    #[tokio::test]
    async fn static_resolver_returns_fixed_list() {
        let addrs: Vec<SocketAddr> = vec![
            "10.0.0.1:7687".parse().unwrap(),
            "10.0.0.2:7688".parse().unwrap(),
        ];
        let resolver = StaticResolver::new(addrs.clone());
        let resolved = resolver.resolve("anything", "7687").await.unwrap();
        assert_eq!(resolved, addrs);
    }
}
