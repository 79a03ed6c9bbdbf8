// key-management/src/chains/evm/address.rs
//
// Ethereum Address Derivation
// EIP-55 (Checksum), Keccak-256, secp256k1

use crate::error::{CryptoError, WalletError, WalletResult};
use alloy::primitives::Address;
use k256::{elliptic_curve::sec1::ToEncodedPoint, SecretKey};
use tiny_keccak::{Hasher, Keccak};
use zeroize::{Zeroize, Zeroizing};

/// Ethereum Address Generator
///
/// # Flow:  Private Key (32B) → Public Key (64B) → Keccak256 → Address (20B)
///
/// # Security
/// - Zeroize: intermediate hash + public key bytes bị xóa sau khi dùng
/// - No Storage: không lưu private key
pub struct EvmAddress;

impl EvmAddress {
    /// Derive 20 address bytes from a borrowed private key.
    ///
    /// # Algorithm
    /// 1. `priv_key` (32B) → secp256k1 → `pub_key` (uncompressed, 65B)
    /// 2. Bỏ prefix byte 0x04 → `pub_key_raw` (64B)
    /// 3. Keccak-256(`pub_key_raw`) → `hash` (32B)
    /// 4. `hash[12..32]` → `address` (20B)
    pub fn derive_bytes(priv_key: &[u8]) -> WalletResult<[u8; 20]> {
        let secret_key = SecretKey::from_slice(priv_key).map_err(|e| {
            WalletError::Crypto(CryptoError::InvalidKeyFormat(format!(
                "Invalid secp256k1 private key: {}",
                e
            )))
        })?;

        let public_key = secret_key.public_key();
        let encoded = Zeroizing::new(public_key.to_encoded_point(false));
        let pub_key_raw = &encoded.as_bytes()[1..];

        let mut hasher = Keccak::v256();
        let mut hash = [0u8; 32];
        hasher.update(pub_key_raw);
        hasher.finalize(&mut hash);

        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        hash.zeroize();

        Ok(address)
    }

    /// EIP-55 checksummed address, e.g. `"0xA98005e6ce8E62ADf8f9020fa99888E8f107e3C9"`.
    #[inline]
    pub fn derive(priv_key: &[u8]) -> WalletResult<String> {
        let bytes = Self::derive_bytes(priv_key)?;
        Ok(Address::from_slice(&bytes).to_checksum(None))
    }

    /// `0x` prefix + 40 hex chars. Mixed case must carry a valid EIP-55 checksum;
    /// all-lowercase or all-uppercase hex is accepted as is.
    pub fn is_valid(address: &str) -> bool {
        let Some(hex_part) = address.strip_prefix("0x") else {
            return false;
        };
        let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper {
            Address::parse_checksummed(address, None).is_ok()
        } else {
            address.parse::<Address>().is_ok()
        }
    }

    /// Parse một address hex bất kỳ thành 20 bytes
    pub fn parse(address: &str) -> WalletResult<[u8; 20]> {
        let addr: Address = address.parse().map_err(|_| {
            WalletError::Validation(format!("Invalid Ethereum address '{}'", address))
        })?;
        Ok(addr.into())
    }

    pub fn to_checksum(address: &str) -> WalletResult<String> {
        let bytes = Self::parse(address)?;
        Ok(Address::from(bytes).to_checksum(None))
    }

    /// So sánh 2 address (case-insensitive)
    #[inline]
    pub fn equals(addr1: &str, addr2: &str) -> bool {
        match (addr1.parse::<Address>(), addr2.parse::<Address>()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
