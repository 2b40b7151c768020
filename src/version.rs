//! Bolt protocol version negotiation.

/// Bolt magic preamble bytes.
pub const BOLT_MAGIC: [u8; 4] = [0x60, 0x60, 0xB0, 0x17];

/// Version proposal slots sent during the handshake, in preference order.
/// Each slot is transmitted as a 4-byte big-endian value; zero marks an
/// unused slot.
pub const PROPOSED_VERSIONS: [u32; 4] = [1, 0, 0, 0];

/// The "no version" answer a server sends when it supports none of the
/// proposed versions.
pub const NO_VERSION: u32 = 0;

/// Encodes the proposal slots as the 16 bytes that follow the magic
/// preamble on the wire.
pub fn encode_proposals() -> [u8; 16] {
    let mut bytes = [0u8; 16];
    for (slot, version) in PROPOSED_VERSIONS.iter().enumerate() {
        bytes[slot * 4..slot * 4 + 4].copy_from_slice(&version.to_be_bytes());
    }
    bytes
}

/// Decodes the server's 4-byte big-endian agreed-version answer.
pub fn decode_agreed(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Returns whether `version` was actually proposed (zero slots excluded).
/// A server answering anything else has violated the negotiation.
pub fn is_proposed(version: u32) -> bool {
    version != NO_VERSION && PROPOSED_VERSIONS.contains(&version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proposals_highest_first() {
        let bytes = encode_proposals();
        assert_eq!(&bytes[0..4], &[0, 0, 0, 1]);
        // Unused slots stay zero.
        assert_eq!(&bytes[4..16], &[0u8; 12]);
    }

    #[test]
    fn decode_agreed_version() {
        assert_eq!(decode_agreed([0, 0, 0, 1]), 1);
        assert_eq!(decode_agreed([0, 0, 0, 0]), NO_VERSION);
    }

    #[test]
    fn proposed_version_accepted() {
        assert!(is_proposed(1));
    }

    #[test]
    fn unproposed_version_rejected() {
        assert!(!is_proposed(2));
        assert!(!is_proposed(NO_VERSION));
    }
}
