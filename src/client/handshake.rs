//! Client-side Bolt handshake: magic preamble and version negotiation.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::BoltError;
use crate::version::{self, BOLT_MAGIC, NO_VERSION};

/// Performs the client-side Bolt handshake on a connected stream.
///
/// 1. Sends the 4-byte magic preamble (`60 60 B0 17`).
/// 2. Sends 4 version proposals (16 bytes, big-endian, highest first).
/// 3. Reads the server's 4-byte agreed version.
///
/// Returns the agreed version on success. A zero answer (server supports
/// none of the proposals) or an answer that was never proposed fails the
/// negotiation; so does any transport error during the exchange.
pub async fn client_handshake<S>(stream: &mut S) -> Result<u32, BoltError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    tracing::debug!("performing handshake");

    let mut request = [0u8; 20];
    request[..4].copy_from_slice(&BOLT_MAGIC);
    request[4..].copy_from_slice(&version::encode_proposals());
    stream.write_all(&request).await.map_err(handshake_io)?;
    stream.flush().await.map_err(handshake_io)?;

    let mut response = [0u8; 4];
    stream.read_exact(&mut response).await.map_err(handshake_io)?;

    let agreed = version::decode_agreed(response);
    if agreed == NO_VERSION {
        return Err(BoltError::Handshake(
            "server rejected all proposed versions".into(),
        ));
    }
    if !version::is_proposed(agreed) {
        return Err(BoltError::Handshake(format!(
            "server chose unproposed version {agreed}"
        )));
    }

    tracing::debug!(version = agreed, "handshake complete");
    Ok(agreed)
}

fn handshake_io(err: std::io::Error) -> BoltError {
    BoltError::Handshake(err.to_string())
}
