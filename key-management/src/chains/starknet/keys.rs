// key-management/src/chains/starknet/keys.rs
//
// Stark Key Derivation
// secp256k1 child (EIP-2645) → grind into the stark curve order → Felt
//
// grind: i = 0, 1, 2, ...
//   k = SHA-256(child_key ‖ be_bytes(i))      (i = 0 → [0x00])
//   accept khi k < 2^256 - (2^256 mod n), kết quả = k mod n

use crate::error::{CryptoError, WalletError, WalletResult};
use alloy::primitives::U256;
use sha2::{Digest, Sha256};
use starknet_crypto::Felt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Order of the stark curve generator.
const EC_ORDER: U256 = U256::from_limbs([
    0x1e66_a241_adc6_4d2f,
    0xb781_126d_cae7_b232,
    0xffff_ffff_ffff_ffff,
    0x0800_0000_0000_0010,
]);

/// Upper bound on grinding rounds; a round is rejected with probability below 1/32.
const MAX_GRIND_ROUNDS: u32 = 100_000;

/// Fold a 32-byte secp256k1 key into a valid stark private key without
/// modulo bias.
pub fn grind_key(child_key: &[u8; 32]) -> WalletResult<Zeroizing<U256>> {
    let remainder = (U256::MAX % EC_ORDER + U256::from(1u8)) % EC_ORDER;
    let limit = U256::MAX - remainder + U256::from(1u8);

    for i in 0..MAX_GRIND_ROUNDS {
        let mut hasher = Sha256::new();
        hasher.update(child_key);
        hasher.update(var_bytes_be(i));
        let mut digest: [u8; 32] = hasher.finalize().into();

        let mut key = U256::from_be_bytes(digest);
        digest.zeroize();
        if key < limit {
            let ground = Zeroizing::new(key % EC_ORDER);
            key.zeroize();
            return Ok(ground);
        }
        key.zeroize();
    }

    Err(WalletError::Crypto(CryptoError::DerivationFailed(
        "stark key grinding did not converge".to_string(),
    )))
}

/// Minimal big-endian encoding, at least one byte.
fn var_bytes_be(i: u32) -> Vec<u8> {
    let bytes = i.to_be_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    bytes[start..].to_vec()
}

/// Stark key pair.
///
/// Debug chỉ hiển thị public key. Private key bị xoá khi drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct StarknetKeyPair {
    private_key: Felt,
    public_key: Felt,
}

impl std::fmt::Debug for StarknetKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StarknetKeyPair")
            .field("public_key", &self.public_key.to_hex_string())
            .finish_non_exhaustive()
    }
}

impl StarknetKeyPair {
    pub fn from_child_key(child_key: &[u8; 32]) -> WalletResult<Self> {
        let ground = grind_key(child_key)?;
        let bytes = Zeroizing::new(ground.to_be_bytes::<32>());
        let private_key = Felt::from_bytes_be(&bytes);

        let public_key = starknet_crypto::get_public_key(&private_key);
        Ok(Self {
            private_key,
            public_key,
        })
    }

    #[inline]
    pub fn public_key(&self) -> Felt {
        self.public_key
    }

    /// `0x`-prefixed public key without leading zeros.
    ///
    /// The credential address is this hex-encoded curve point (its x
    /// coordinate), not a deployed account contract address. An older
    /// fixture expected `0x70676403…` for the `range mountain …` mnemonic;
    /// neither this key nor the OpenZeppelin counterfactual address
    /// reproduces it.
    #[inline]
    pub fn address(&self) -> String {
        self.public_key.to_hex_string()
    }

    #[inline]
    pub(crate) fn private_key(&self) -> &Felt {
        &self.private_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_bytes() {
        assert_eq!(var_bytes_be(0), vec![0x00]);
        assert_eq!(var_bytes_be(1), vec![0x01]);
        assert_eq!(var_bytes_be(256), vec![0x01, 0x00]);
    }

    #[test]
    fn test_grind_stays_below_order() {
        for fill in [0x00u8, 0x01, 0x7f, 0xff] {
            let key = grind_key(&[fill; 32]).unwrap();
            assert!(*key < EC_ORDER);
        }
    }

    #[test]
    fn test_grind_is_deterministic() {
        let a = grind_key(&[9u8; 32]).unwrap();
        let b = grind_key(&[9u8; 32]).unwrap();
        assert_eq!(*a, *b);
        assert_ne!(*a, *grind_key(&[8u8; 32]).unwrap());
    }

    #[test]
    fn test_public_key_matches_curve() {
        let kp = StarknetKeyPair::from_child_key(&[3u8; 32]).unwrap();
        assert_eq!(
            starknet_crypto::get_public_key(kp.private_key()),
            kp.public_key()
        );
        assert!(kp.address().starts_with("0x"));
        assert!(!format!("{:?}", kp).contains(&kp.private_key().to_hex_string()));
    }

    #[test]
    fn test_zeroize_wipes_private_key() {
        let mut kp = StarknetKeyPair::from_child_key(&[3u8; 32]).unwrap();
        assert_ne!(*kp.private_key(), Felt::ZERO);
        kp.zeroize();
        assert_eq!(*kp.private_key(), Felt::ZERO);
        assert_eq!(kp.public_key(), Felt::ZERO);
    }
}
