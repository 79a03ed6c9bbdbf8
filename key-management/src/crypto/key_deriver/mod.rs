// key-management/src/crypto/key_deriver/mod.rs
//
// Key Derivation Engine
//
// Kiến trúc:
// ┌──────────────────────────────────────────────────────┐
// │  Seed (64 bytes from BIP-39 Mnemonic)                │
// │                    │                                 │
// │          secp256k1 BIP-32 (HMAC-SHA512)              │
// │     ┌──────────────┼───────────────┐                 │
// │     ▼              ▼               ▼                 │
// │  Mina           Ethereum        Starknet             │
// │  12586'         60'             2645' (EIP-2645)     │
// │  → Pallas       → secp256k1     → grind → Stark      │
// └──────────────────────────────────────────────────────┘

pub mod secp256k1;

pub use secp256k1::Secp256k1Deriver;

use crate::error::{CryptoError, WalletError, WalletResult};
use zeroize::Zeroizing;

/// BIP-39 seed length.
pub const SEED_LEN: usize = 64;

/// Kết quả derivation chứa private key + metadata
pub struct DerivedKey {
    /// Private key bytes (32 bytes big-endian, auto-zeroize khi drop)
    pub private_key: Zeroizing<[u8; 32]>,
    /// Derivation path đã sử dụng
    pub path: String,
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("path", &self.path)
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// Unified Key Deriver - Entry point cho mọi chain adapter
pub struct KeyDeriver;

impl KeyDeriver {
    /// Derive key tại `path`
    ///
    /// # Arguments
    /// * `seed` - BIP-39 seed (64 bytes)
    /// * `path` - Derivation path (e.g., "m/44'/60'/0'/0/0")
    pub fn derive(seed: &[u8], path: &str) -> WalletResult<DerivedKey> {
        Self::validate_seed(seed)?;
        let private_key = Secp256k1Deriver::derive(seed, path)?;
        Ok(DerivedKey {
            private_key,
            path: path.to_string(),
        })
    }

    /// Master private key (privileged export only).
    pub fn root_private_key(seed: &[u8]) -> WalletResult<Zeroizing<[u8; 32]>> {
        Self::validate_seed(seed)?;
        Secp256k1Deriver::root_private_key(seed)
    }

    /// Validate seed length
    #[inline]
    fn validate_seed(seed: &[u8]) -> WalletResult<()> {
        if seed.len() != SEED_LEN {
            return Err(WalletError::Crypto(CryptoError::DerivationFailed(format!(
                "Invalid seed length: expected {} bytes, got {}",
                SEED_LEN,
                seed.len()
            ))));
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::paths::DerivationPaths;

    const TEST_SEED: &str = "16270f7b026afe7a3746efbfcf43e083500951db9e2699d1e4f372515dabcc80459b9181c3937b5faa4b8f7602f886553d2c32c5f12f3331cef40153aead4de6";

    #[test]
    fn test_derive_records_path() {
        let seed = hex::decode(TEST_SEED).unwrap();
        let key = KeyDeriver::derive(&seed, DerivationPaths::MINA_0).unwrap();
        assert_eq!(key.path, DerivationPaths::MINA_0);
        assert_eq!(key.private_key.len(), 32);
    }

    #[test]
    fn test_invalid_seed() {
        let bad_seed = [0u8; 32];
        assert!(KeyDeriver::derive(&bad_seed, "m/44'/60'/0'/0/0").is_err());
        assert!(KeyDeriver::root_private_key(&bad_seed).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let seed = hex::decode(TEST_SEED).unwrap();
        let key = KeyDeriver::derive(&seed, DerivationPaths::EVM_0).unwrap();
        let debug_output = format!("{:?}", key);
        assert!(!debug_output.contains(&hex::encode(&*key.private_key)));
        assert!(debug_output.contains("REDACTED"));
    }
}
