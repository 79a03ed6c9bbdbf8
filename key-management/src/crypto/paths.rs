// key-management/src/crypto/paths.rs
//
// Derivation Paths Module - Multi-Chain HD Path Generator
// BIP-44 (Purpose), SLIP-44 (Coin Types), EIP-2645 (Starknet account path)

use sha2::{Digest, Sha256};

// =============================================================================
// SLIP-44 COIN TYPES
// =============================================================================
/// SLIP-44 Registered Coin Types
/// Ref: https://github.com/satoshilabs/slips/blob/master/slip-0044.md
pub mod coin_type {
    pub const ETHEREUM: u32 = 60;
    pub const MINA: u32 = 12586;
}

/// EIP-2645 purpose level
pub const EIP2645_PURPOSE: u32 = 2645;

const MASK_31: u32 = 0x7FFF_FFFF;

// =============================================================================
// DERIVATION PATHS
// =============================================================================
/// Pre-built Derivation Paths cho key agent
///
/// # Conventions
/// - BIP-44: `m/44'/coin'/account'/change/index` (secp256k1)
/// - EIP-2645: `m/2645'/layer'/application'/eth_1'/eth_2'/index`
pub struct DerivationPaths;

impl DerivationPaths {
    // =========================================================================
    // MINA - BIP-44, coin_type = 12586
    // =========================================================================
    pub const MINA_0: &'static str = "m/44'/12586'/0'/0/0";

    #[inline]
    pub fn mina(account: u32, index: u32) -> String {
        Self::bip44(44, coin_type::MINA, account, 0, index)
    }

    // =========================================================================
    // EVM CHAINS - BIP-44, coin_type = 60
    // =========================================================================
    pub const EVM_0: &'static str = "m/44'/60'/0'/0/0";

    /// EVM path with custom account & index (multi-account)
    #[inline]
    pub fn evm_account(account: u32, index: u32) -> String {
        Self::bip44(44, coin_type::ETHEREUM, account, 0, index)
    }

    // =========================================================================
    // STARKNET - EIP-2645
    // =========================================================================
    /// Build the EIP-2645 account path for a Stark key.
    ///
    /// Layer and application are folded into the path as the low 31 bits of
    /// their SHA-256 digest; the Ethereum address contributes its low 31 bits
    /// and the next 31 bits as two further hardened levels.
    ///
    /// # Arguments
    /// * `layer` - e.g. `"starkex"`
    /// * `application` - e.g. `"starkdeployement"`
    /// * `eth_address` - 20-byte address, big-endian
    /// * `index` - Address index (non-hardened leaf)
    pub fn starknet_account(
        layer: &str,
        application: &str,
        eth_address: &[u8; 20],
        index: u32,
    ) -> String {
        let layer_num = Self::sha256_int31(layer.as_bytes());
        let application_num = Self::sha256_int31(application.as_bytes());

        // Địa chỉ ETH là số 160-bit big-endian; chỉ cần 62 bit thấp
        let mut low = [0u8; 8];
        low.copy_from_slice(&eth_address[12..]);
        let eth = u64::from_be_bytes(low);
        let eth_1 = (eth as u32) & MASK_31;
        let eth_2 = ((eth >> 31) as u32) & MASK_31;

        format!(
            "m/{}'/{}'/{}'/{}'/{}'/{}",
            EIP2645_PURPOSE, layer_num, application_num, eth_1, eth_2, index
        )
    }

    /// Low 31 bits of SHA-256(data) read as a big-endian integer.
    fn sha256_int31(data: &[u8]) -> u32 {
        let digest = Sha256::digest(data);
        let mut tail = [0u8; 4];
        tail.copy_from_slice(&digest[28..]);
        u32::from_be_bytes(tail) & MASK_31
    }

    // =========================================================================
    // CUSTOM PATH BUILDER
    // =========================================================================
    /// Tạo BIP-44 path tùy chỉnh (cho secp256k1 chains)
    ///
    /// # Arguments
    /// * `purpose` - 44 (BIP-44)
    /// * `coin_type` - SLIP-44 coin type (dùng constants từ `coin_type::*`)
    /// * `account` - Account index (hardened)
    /// * `change` - 0 = external, 1 = internal
    /// * `index` - Address index
    #[inline]
    pub fn bip44(purpose: u32, coin_type: u32, account: u32, change: u32, index: u32) -> String {
        format!(
            "m/{}'/{}'/{}'/{}/{}",
            purpose, coin_type, account, change, index
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
