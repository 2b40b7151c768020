//! Error types for the Bolt client core.

use crate::client::ConnectionState;
use crate::types::BoltType;

/// Errors that can occur during Bolt value, addressing, and connection
/// operations.
#[derive(Debug, thiserror::Error)]
pub enum BoltError {
    /// An accessor was invoked against a value whose current tag does not
    /// support it. The value itself is left unchanged.
    #[error("type mismatch: expected {expected}, found {actual}")]
    TypeMismatch {
        expected: BoltType,
        actual: BoltType,
    },

    /// A scalar setter was given a value outside the destination width's
    /// range. Rejected before mutation — the value keeps its prior state.
    #[error("value {value} out of range for {target}")]
    OutOfRange { value: i64, target: BoltType },

    /// An array accessor was given an index past the end.
    #[error("index {index} out of range for array of size {size}")]
    IndexOutOfRange { index: usize, size: usize },

    /// Host/port resolution failed; the candidate list is left empty.
    #[error("cannot resolve {host}:{port}: {source}")]
    Resolution {
        host: String,
        port: String,
        #[source]
        source: std::io::Error,
    },

    /// A connection was requested against an address with no resolved
    /// candidates. The caller must resolve first.
    #[error("address has no resolved candidates")]
    Unresolved,

    /// Every resolved candidate refused the transport-layer connection.
    /// Carries the last candidate's failure.
    #[error("connect failed after {attempts} candidate(s): {source}")]
    ConnectFailed {
        attempts: usize,
        #[source]
        source: std::io::Error,
    },

    /// Version negotiation with the server did not complete.
    #[error("handshake failed: {0}")]
    Handshake(String),

    /// TLS session establishment failed on the encrypted transport.
    #[error("TLS error: {0}")]
    Tls(String),

    /// I/O was attempted on a connection that is not open.
    #[error("connection is {0}")]
    NotOpen(ConnectionState),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
