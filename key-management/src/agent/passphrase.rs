// key-management/src/agent/passphrase.rs
//
// Passphrase provider - host-supplied async callback
//
// Agent không bao giờ giữ provider; mỗi lời gọi derive/sign nhận provider mới.

use crate::error::{WalletError, WalletResult};
use async_trait::async_trait;
use std::future::Future;
use tracing::warn;
use zeroize::Zeroizing;

pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;
pub type ProviderResult = Result<Zeroizing<Vec<u8>>, ProviderError>;

/// Source of the encryption passphrase.
///
/// Any `Fn() -> impl Future<Output = ProviderResult>` closure is a provider:
///
/// ```ignore
/// let provider = || async { Ok::<_, ProviderError>(Zeroizing::new(b"passphrase".to_vec())) };
/// agent.derive_credentials(payload, &args, &provider, false).await?;
/// ```
#[async_trait]
pub trait PassphraseProvider: Send + Sync {
    async fn passphrase(&self) -> ProviderResult;
}

#[async_trait]
impl<F, Fut> PassphraseProvider for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = ProviderResult> + Send,
{
    async fn passphrase(&self) -> ProviderResult {
        (self)().await
    }
}

/// Fixed passphrase, for hosts that already hold it (and for tests).
#[derive(Clone)]
pub struct StaticPassphrase(Zeroizing<Vec<u8>>);

impl StaticPassphrase {
    pub fn new(passphrase: impl AsRef<[u8]>) -> Self {
        Self(Zeroizing::new(passphrase.as_ref().to_vec()))
    }
}

impl std::fmt::Debug for StaticPassphrase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StaticPassphrase([REDACTED])")
    }
}

#[async_trait]
impl PassphraseProvider for StaticPassphrase {
    async fn passphrase(&self) -> ProviderResult {
        Ok(self.0.clone())
    }
}

/// Await the provider fully. Its error is dropped and replaced by
/// [`WalletError::PassphraseProvider`].
pub async fn resolve_passphrase(
    provider: &dyn PassphraseProvider,
) -> WalletResult<Zeroizing<Vec<u8>>> {
    provider.passphrase().await.map_err(|_| {
        warn!("passphrase provider failed");
        WalletError::PassphraseProvider
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_passphrase() {
        let provider = StaticPassphrase::new("passphrase");
        let pass = resolve_passphrase(&provider).await.unwrap();
        assert_eq!(pass.as_slice(), b"passphrase");
    }

    #[tokio::test]
    async fn test_closure_provider() {
        let provider = || async { Ok::<_, ProviderError>(Zeroizing::new(b"from closure".to_vec())) };
        let pass = resolve_passphrase(&provider).await.unwrap();
        assert_eq!(pass.as_slice(), b"from closure");
    }

    #[tokio::test]
    async fn test_failure_is_wrapped_without_cause() {
        let provider = || async { Err::<Zeroizing<Vec<u8>>, ProviderError>("user cancelled: secret detail".into()) };
        let err = resolve_passphrase(&provider).await.unwrap_err();
        assert_eq!(err, WalletError::PassphraseProvider);
        assert!(!err.to_string().contains("secret detail"));
    }

    #[test]
    fn test_debug_redacted() {
        let provider = StaticPassphrase::new("hunter2");
        assert!(!format!("{:?}", provider).contains("hunter2"));
    }
}
