// key-management/src/chains/mina/keys.rs
//
// Mina Key Derivation
// secp256k1 child (BIP-44, coin 12586) → Pallas scalar → B62q address
//
// Flow:  Seed → m/44'/12586'/a'/0/i → 32B key (BE) → clear top 2 bits
//        → SecKey → Keypair → base58check(0xcb 0x01 0x01 ‖ x(LE) ‖ parity)

use crate::crypto::{DerivationPaths, KeyDeriver};
use crate::error::{CryptoError, WalletError, WalletResult};
use mina_signer::{CompressedPubKey, Keypair, PubKey};
use zeroize::{Zeroize, Zeroizing};

/// Pallas key pair for one derivation path.
///
/// # Security
/// - Debug không hiển thị secret key
/// - Secret chỉ giữ dạng bytes, xoá khi drop; `Keypair` dựng lại mỗi lần ký
/// - Chỉ sống trong phạm vi một lần derive/sign
pub struct MinaKeyPair {
    secret: Zeroizing<[u8; 32]>,
    public: PubKey,
    address: String,
}

impl std::fmt::Debug for MinaKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinaKeyPair")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl MinaKeyPair {
    /// Derive the key pair at `m/44'/12586'/account'/0/index`.
    pub fn derive(seed: &[u8], account: u32, index: u32) -> WalletResult<Self> {
        let derived = KeyDeriver::derive(seed, &DerivationPaths::mina(account, index))?;
        Self::from_child_key(derived.private_key)
    }

    /// Fold a BIP-32 child key into the Pallas scalar field.
    ///
    /// The two most significant bits of the big-endian key are cleared, which
    /// keeps it below the field modulus.
    pub fn from_child_key(mut child_key: Zeroizing<[u8; 32]>) -> WalletResult<Self> {
        child_key[0] &= 0x3f;

        let public = keypair_from_secret(&child_key)?.public;
        let address = public.into_address();

        Ok(Self {
            secret: child_key,
            public,
            address,
        })
    }

    #[inline]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[inline]
    pub fn public_key(&self) -> &PubKey {
        &self.public
    }

    #[inline]
    pub fn compressed(&self) -> CompressedPubKey {
        self.public.into_compressed()
    }

    /// Signing key pair, rebuilt from the masked secret. Drop it right after use.
    pub(crate) fn keypair(&self) -> WalletResult<Keypair> {
        keypair_from_secret(&self.secret)
    }
}

impl Zeroize for MinaKeyPair {
    fn zeroize(&mut self) {
        self.secret.zeroize();
    }
}

fn keypair_from_secret(secret: &[u8; 32]) -> WalletResult<Keypair> {
    Keypair::from_bytes(&secret[..]).map_err(|e| {
        WalletError::Crypto(CryptoError::InvalidKeyFormat(format!(
            "Invalid Pallas secret key: {:?}",
            e
        )))
    })
}

/// Parse a `B62q...` address into its compressed form.
pub fn parse_address(address: &str) -> WalletResult<CompressedPubKey> {
    CompressedPubKey::from_address(address)
        .map_err(|e| WalletError::Validation(format!("Invalid Mina address '{}': {:?}", address, e)))
}

/// Parse a `B62q...` address into a full public key (for verification).
pub fn parse_public_key(address: &str) -> WalletResult<PubKey> {
    PubKey::from_address(address)
        .map_err(|e| WalletError::Validation(format!("Invalid Mina address '{}': {:?}", address, e)))
}

/// Kiểm tra địa chỉ Mina hợp lệ (checksum + điểm trên curve)
#[inline]
pub fn is_valid_address(address: &str) -> bool {
    PubKey::from_address(address).is_ok()
}

// =============================================================================
// TESTS
// =============================================================================
