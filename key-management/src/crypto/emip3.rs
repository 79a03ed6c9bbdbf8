// key-management/src/crypto/emip3.rs
//
// EMIP-3 Passphrase Encryption
// PBKDF2-HMAC-SHA512 (key stretching) + ChaCha20-Poly1305 (AEAD)
//
// Wire layout (blob lưu trong KeyAgentData):
// ┌──────────┬──────────┬──────────┬────────────────┐
// │ salt 32B │ nonce 12B│  tag 16B │ ciphertext ... │
// └──────────┴──────────┴──────────┴────────────────┘

use crate::error::{CryptoError, WalletError, WalletResult};
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use hmac::Hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

/// PBKDF2 iteration count fixed by EMIP-3.
pub const KDF_ITERATIONS: u32 = 19_162;
pub const SALT_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;
pub const KEY_LEN: usize = 32;

const HEADER_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Ciphertext + nonce + authentication tag produced by [`encrypt`].
///
/// The salt travels with the blob so the symmetric key can be re-stretched
/// from the passphrase alone.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedSeed {
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    tag: [u8; TAG_LEN],
    ciphertext: Vec<u8>,
}

impl std::fmt::Debug for EncryptedSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedSeed")
            .field("ciphertext_len", &self.ciphertext.len())
            .finish_non_exhaustive()
    }
}

impl EncryptedSeed {
    /// Serialize to the EMIP-3 layout `salt || nonce || tag || ciphertext`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Parse an EMIP-3 blob.
    ///
    /// A truncated blob is reported as [`WalletError::Authentication`], the same
    /// error a wrong passphrase produces.
    pub fn from_bytes(bytes: &[u8]) -> WalletResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(WalletError::Authentication);
        }

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        let mut tag = [0u8; TAG_LEN];
        salt.copy_from_slice(&bytes[..SALT_LEN]);
        nonce.copy_from_slice(&bytes[SALT_LEN..SALT_LEN + NONCE_LEN]);
        tag.copy_from_slice(&bytes[SALT_LEN + NONCE_LEN..HEADER_LEN]);

        Ok(Self {
            salt,
            nonce,
            tag,
            ciphertext: bytes[HEADER_LEN..].to_vec(),
        })
    }

    #[inline]
    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    #[inline]
    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }
}

/// Stretch `passphrase` into a 256-bit ChaCha20 key.
fn derive_key(passphrase: &[u8], salt: &[u8; SALT_LEN]) -> WalletResult<Zeroizing<[u8; KEY_LEN]>> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::pbkdf2::<Hmac<Sha512>>(passphrase, salt, KDF_ITERATIONS, &mut key[..]).map_err(
        |e| WalletError::Crypto(CryptoError::EncryptionFailed(format!("PBKDF2 failed: {e}"))),
    )?;
    Ok(key)
}

/// Encrypt `plaintext` under `passphrase`.
///
/// Salt and nonce are drawn fresh from `OsRng` on every call, so the same
/// plaintext never produces the same blob twice.
pub fn encrypt(plaintext: &[u8], passphrase: &[u8]) -> WalletResult<EncryptedSeed> {
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut salt);
    OsRng.fill_bytes(&mut nonce);

    let key = derive_key(passphrase, &salt)?;
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key[..]));
    let payload = Payload {
        msg: plaintext,
        aad: &[],
    };

    // Cipher trả về ciphertext || tag
    let mut sealed = cipher
        .encrypt(Nonce::from_slice(&nonce), payload)
        .map_err(|e| {
            WalletError::Crypto(CryptoError::EncryptionFailed(format!(
                "ChaCha20-Poly1305 encryption failed: {e}"
            )))
        })?;

    let split = sealed.len() - TAG_LEN;
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&sealed[split..]);
    let ciphertext = sealed[..split].to_vec();
    sealed.zeroize();

    Ok(EncryptedSeed {
        salt,
        nonce,
        tag,
        ciphertext,
    })
}

/// Decrypt an [`EncryptedSeed`].
///
/// # Errors
/// [`WalletError::Authentication`] for a wrong passphrase and for tampered
/// data alike. No other detail is surfaced.
pub fn decrypt(encrypted: &EncryptedSeed, passphrase: &[u8]) -> WalletResult<Zeroizing<Vec<u8>>> {
    let key = derive_key(passphrase, &encrypted.salt)?;
    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key[..]));

    let mut sealed = Vec::with_capacity(encrypted.ciphertext.len() + TAG_LEN);
    sealed.extend_from_slice(&encrypted.ciphertext);
    sealed.extend_from_slice(&encrypted.tag);

    let payload = Payload {
        msg: &sealed,
        aad: &[],
    };

    cipher
        .decrypt(Nonce::from_slice(&encrypted.nonce), payload)
        .map(Zeroizing::new)
        .map_err(|_| WalletError::Authentication)
}

// =============================================================================
// TESTS
// =============================================================================
