// key-management/src/crypto/key_deriver/secp256k1.rs
//
// secp256k1 Key Derivation - BIP-32 / BIP-44 / EIP-2645
//
// Dùng cho: Mina (12586'), Ethereum (60'), Starknet (2645', grind sau đó)
// Algorithm: HMAC-SHA512 hierarchical deterministic derivation
// Reference: https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki

use crate::error::{CryptoError, DerivationError, WalletError, WalletResult};
use bip32::{DerivationPath, XPrv};
use std::str::FromStr;
use zeroize::Zeroizing;

/// secp256k1 Key Deriver - BIP-32 Standard
///
/// # Security
/// - Private keys wrap trong `Zeroizing<[u8; 32]>` (auto-zeroize khi drop)
/// - Root node được dựng lại từ seed mỗi lần gọi, không cache
/// - Không lưu intermediate keys
pub struct Secp256k1Deriver;

impl Secp256k1Deriver {
    /// Derive single private key từ seed + path
    ///
    /// # Arguments
    /// * `seed` - 64 bytes BIP-39 seed
    /// * `path` - Derivation path (e.g. "m/44'/12586'/0'/0/0")
    ///
    /// # Returns
    /// 32-byte private key (big-endian), auto-zeroize on drop
    pub fn derive(seed: &[u8], path: &str) -> WalletResult<Zeroizing<[u8; 32]>> {
        let derivation_path = DerivationPath::from_str(path)
            .map_err(|e| DerivationError::InvalidPath(format!("'{}': {}", path, e)))?;

        let mut child = Self::master(seed)?;
        for child_num in derivation_path {
            child = child.derive_child(child_num).map_err(|e| {
                WalletError::Crypto(CryptoError::DerivationFailed(format!(
                    "Child derivation failed: {}",
                    e
                )))
            })?;
        }

        let key_bytes: [u8; 32] = child.private_key().to_bytes().into();
        Ok(Zeroizing::new(key_bytes))
    }

    /// Private key of the master node `m`.
    pub fn root_private_key(seed: &[u8]) -> WalletResult<Zeroizing<[u8; 32]>> {
        let root = Self::master(seed)?;
        let key_bytes: [u8; 32] = root.private_key().to_bytes().into();
        Ok(Zeroizing::new(key_bytes))
    }

    /// Validate path format
    #[inline]
    pub fn is_valid_path(path: &str) -> bool {
        DerivationPath::from_str(path).is_ok()
    }

    fn master(seed: &[u8]) -> WalletResult<XPrv> {
        XPrv::new(seed).map_err(|e| {
            WalletError::Crypto(CryptoError::DerivationFailed(format!(
                "Failed to create master key: {}",
                e
            )))
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
