use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::Digest as _;

/// Digest algorithms usable for content identifiers.
///
/// Codes are the multihash table values, so they are recorded inside every
/// CID and a reader can tell which function to re-run when verifying.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlg {
    /// SHA2-256, the interoperable default.
    #[default]
    #[serde(rename = "sha2-256")]
    Sha2_256,
    /// BLAKE3 with a 256-bit output.
    #[serde(rename = "blake3")]
    Blake3,
}

impl HashAlg {
    /// Multihash function code.
    pub const fn code(&self) -> u64 {
        match self {
            Self::Sha2_256 => 0x12,
            Self::Blake3 => 0x1e,
        }
    }

    /// Digest length in bytes.
    pub const fn digest_len(&self) -> usize {
        32
    }

    /// Look up an algorithm by multihash code.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0x12 => Some(Self::Sha2_256),
            0x1e => Some(Self::Blake3),
            _ => None,
        }
    }

    /// Hash `data` with this algorithm.
    pub fn digest(&self, data: &[u8]) -> [u8; 32] {
        match self {
            Self::Sha2_256 => {
                let mut out = [0u8; 32];
                out.copy_from_slice(&sha2::Sha256::digest(data));
                out
            }
            Self::Blake3 => *blake3::hash(data).as_bytes(),
        }
    }
}

impl fmt::Display for HashAlg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha2_256 => write!(f, "sha2-256"),
            Self::Blake3 => write!(f, "blake3"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        for alg in [HashAlg::Sha2_256, HashAlg::Blake3] {
            assert_eq!(HashAlg::from_code(alg.code()), Some(alg));
        }
        assert_eq!(HashAlg::from_code(0x13), None);
    }

    #[test]
    fn sha256_known_answer() {
        let digest = HashAlg::Sha2_256.digest(b"abc");
        assert_eq!(
            hex(&digest),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn algorithms_differ() {
        assert_ne!(
            HashAlg::Sha2_256.digest(b"data"),
            HashAlg::Blake3.digest(b"data")
        );
    }

    #[test]
    fn serde_names() {
        assert_eq!(serde_json::to_string(&HashAlg::Sha2_256).unwrap(), "\"sha2-256\"");
        let alg: HashAlg = serde_json::from_str("\"blake3\"").unwrap();
        assert_eq!(alg, HashAlg::Blake3);
        assert_eq!(HashAlg::default(), HashAlg::Sha2_256);
    }

    fn hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
