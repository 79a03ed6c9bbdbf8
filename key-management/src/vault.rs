// key-management/src/vault.rs
//
// SeedVault - một encrypted seed, giải mã tạm thời theo từng lời gọi
//
// Quy tắc:
// - Không bao giờ cache plaintext seed hay root node
// - Tối đa một phiên giải mã tại một thời điểm (single-permit gate)
// - Passphrase được resolve TRƯỚC khi lấy permit

use crate::agent::passphrase::{resolve_passphrase, PassphraseProvider};
use crate::crypto::{emip3, EncryptedSeed, KeyDeriver};
use crate::error::{WalletError, WalletResult};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Owns one [`EncryptedSeed`].
pub struct SeedVault {
    encrypted: EncryptedSeed,
    gate: Mutex<()>,
}

impl std::fmt::Debug for SeedVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedVault")
            .field("encrypted", &self.encrypted)
            .finish_non_exhaustive()
    }
}

/// Decrypted seed plus the vault permit.
///
/// Both are released together on drop; the seed buffer is zeroed first.
pub struct SeedSession<'a> {
    seed: Zeroizing<Vec<u8>>,
    _permit: MutexGuard<'a, ()>,
}

impl SeedSession<'_> {
    #[inline]
    pub fn seed(&self) -> &[u8] {
        &self.seed
    }
}

impl std::fmt::Debug for SeedSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SeedSession([REDACTED])")
    }
}

impl SeedVault {
    pub fn new(encrypted: EncryptedSeed) -> Self {
        Self {
            encrypted,
            gate: Mutex::new(()),
        }
    }

    /// Encrypt `seed` under `passphrase` and wrap it.
    pub fn seal(seed: &[u8], passphrase: &[u8]) -> WalletResult<Self> {
        Ok(Self::new(emip3::encrypt(seed, passphrase)?))
    }

    #[inline]
    pub fn encrypted(&self) -> &EncryptedSeed {
        &self.encrypted
    }

    /// Take the permit, then decrypt.
    ///
    /// # Errors
    /// [`WalletError::Authentication`] for a wrong passphrase.
    pub async fn open(&self, passphrase: &[u8]) -> WalletResult<SeedSession<'_>> {
        let permit = self.gate.lock().await;
        let seed = emip3::decrypt(&self.encrypted, passphrase).map_err(|e| {
            if e == WalletError::Authentication {
                warn!("seed vault: authentication failed");
            }
            e
        })?;
        debug!("seed vault: session opened");
        Ok(SeedSession {
            seed,
            _permit: permit,
        })
    }

    /// Resolve the provider (outside the permit), then [`open`](Self::open).
    pub async fn unlock(&self, provider: &dyn PassphraseProvider) -> WalletResult<SeedSession<'_>> {
        let passphrase = resolve_passphrase(provider).await?;
        self.open(&passphrase).await
    }

    /// Master private key rebuilt from the decrypted seed.
    ///
    /// # Security
    /// Privileged export. Caller owns the returned bytes.
    pub async fn export_root_private_key(
        &self,
        passphrase: &[u8],
    ) -> WalletResult<Zeroizing<Vec<u8>>> {
        let session = self.open(passphrase).await?;
        let root = KeyDeriver::root_private_key(session.seed())?;
        Ok(Zeroizing::new(root.to_vec()))
    }
}
