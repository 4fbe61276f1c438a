use cas_types::content_id::JSON_CODEC;
use cas_types::Cid;
use cid::multihash::Multihash;

use crate::alg::HashAlg;

/// Derives content identifiers from canonical bytes.
///
/// Each hasher pairs a digest algorithm with a content-type tag. The tag is
/// written into the CID ahead of the digest, so identical bytes stored under
/// different content types never share an identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContentHasher {
    alg: HashAlg,
    codec: u64,
}

impl ContentHasher {
    /// Canonical JSON hashed with SHA2-256 (the default).
    pub const JSON_SHA2_256: Self = Self {
        alg: HashAlg::Sha2_256,
        codec: JSON_CODEC,
    };
    /// Canonical JSON hashed with BLAKE3.
    pub const JSON_BLAKE3: Self = Self {
        alg: HashAlg::Blake3,
        codec: JSON_CODEC,
    };

    /// Create a hasher with a custom algorithm and content-type tag.
    pub const fn new(alg: HashAlg, codec: u64) -> Self {
        Self { alg, codec }
    }

    /// JSON hasher for the given algorithm.
    pub const fn json(alg: HashAlg) -> Self {
        Self::new(alg, JSON_CODEC)
    }

    pub fn alg(&self) -> HashAlg {
        self.alg
    }

    pub fn codec(&self) -> u64 {
        self.codec
    }

    /// Derive the CID of `canonical`.
    pub fn derive(&self, canonical: &[u8]) -> Result<Cid, HasherError> {
        let digest = self.alg.digest(canonical);
        let mh = Multihash::<64>::wrap(self.alg.code(), &digest)
            .map_err(|e| HasherError::Envelope(e.to_string()))?;
        Cid::from_raw(cid::Cid::new_v1(self.codec, mh))
            .map_err(|e| HasherError::Envelope(e.to_string()))
    }

    /// Check that `canonical` hashes to `expected`.
    ///
    /// The algorithm and content-type tag are taken from `expected` itself,
    /// so this works for any CID regardless of the hasher's own settings.
    /// A digest whose length does not fit the named algorithm is an error,
    /// not a mismatch.
    pub fn verify(canonical: &[u8], expected: &Cid) -> Result<bool, HasherError> {
        let alg = HashAlg::from_code(expected.hash_code())
            .ok_or(HasherError::UnsupportedHash(expected.hash_code()))?;
        let found = expected.digest().len();
        if found != alg.digest_len() {
            return Err(HasherError::DigestLength {
                alg,
                expected: alg.digest_len(),
                found,
            });
        }
        let actual = Self::new(alg, expected.codec()).derive(canonical)?;
        Ok(actual == *expected)
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::JSON_SHA2_256
    }
}

/// Errors from identifier derivation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("unsupported multihash code 0x{0:x}")]
    UnsupportedHash(u64),

    #[error("{alg} digest must be {expected} bytes, found {found}")]
    DigestLength {
        alg: HashAlg,
        expected: usize,
        found: usize,
    },

    #[error("failed to build CID envelope: {0}")]
    Envelope(String),
}
