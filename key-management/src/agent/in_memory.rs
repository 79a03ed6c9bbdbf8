// key-management/src/agent/in_memory.rs
//
// InMemoryKeyAgent - seed được mã hoá (EMIP-3) và giữ trong RAM
//
// Flow khởi tạo:
//   mnemonic -> seed (BIP-39) -> encrypt ngay -> mnemonic + seed bị zeroize
//
// Sau đó mỗi lời gọi derive/sign giải mã seed tạm thời qua SeedVault.

use super::passphrase::{resolve_passphrase, PassphraseProvider};
use super::shared::AgentCore;
use super::{AgentState, KeyAgent, KeyAgentData, KeyAgentType};
use crate::chains::{ChainPayload, ChainSignable, ChainSignatureResult, DerivationArgs};
use crate::config::{EvmChainConfig, KeyAgentConfig};
use crate::credentials::{CredentialStore, GroupedCredential};
use crate::crypto::WalletMnemonic;
use crate::error::WalletResult;
use async_trait::async_trait;
use zeroize::Zeroizing;

#[derive(Debug)]
pub struct InMemoryKeyAgent {
    core: AgentCore,
}

impl InMemoryKeyAgent {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Validate `mnemonic`, derive its seed and seal it under `passphrase`.
    ///
    /// # Arguments
    /// * `mnemonic` - BIP-39 phrase (checksum verified)
    /// * `bip39_passphrase` - optional second factor mixed into the seed
    /// * `passphrase` - encryption passphrase for the vault
    pub fn from_mnemonic(
        mnemonic: &str,
        bip39_passphrase: Option<&str>,
        passphrase: &[u8],
        config: KeyAgentConfig,
    ) -> WalletResult<Self> {
        let mnemonic = WalletMnemonic::from_phrase(mnemonic)?;
        let seed = mnemonic.to_seed(bip39_passphrase)?;
        drop(mnemonic);

        let mut core = AgentCore::new(KeyAgentType::InMemory, config);
        core.initialize(&seed[..], passphrase)?;
        Ok(Self { core })
    }

    /// Same as [`from_mnemonic`](Self::from_mnemonic), with the encryption
    /// passphrase taken from `provider`.
    pub async fn from_mnemonic_with_provider(
        mnemonic: &str,
        bip39_passphrase: Option<&str>,
        provider: &dyn PassphraseProvider,
        config: KeyAgentConfig,
    ) -> WalletResult<Self> {
        let passphrase = resolve_passphrase(provider).await?;
        Self::from_mnemonic(mnemonic, bip39_passphrase, &passphrase, config)
    }

    /// Restore from a snapshot produced by [`KeyAgent::serializable_data`].
    pub fn from_serializable_data(data: KeyAgentData) -> WalletResult<Self> {
        Self::from_serializable_data_with_chain(data, EvmChainConfig::default())
    }

    pub fn from_serializable_data_with_chain(
        data: KeyAgentData,
        evm_chain: EvmChainConfig,
    ) -> WalletResult<Self> {
        Ok(Self {
            core: AgentCore::restore(data, evm_chain)?,
        })
    }

    /// EVM chain used for EIP-155 signing from now on.
    pub fn with_evm_chain(mut self, evm_chain: EvmChainConfig) -> Self {
        self.core.set_evm_chain(evm_chain);
        self
    }

    #[inline]
    pub fn evm_chain(&self) -> &EvmChainConfig {
        self.core.evm_chain()
    }

    #[inline]
    pub fn credentials(&self) -> &CredentialStore {
        self.core.store()
    }
}

#[async_trait]
impl KeyAgent for InMemoryKeyAgent {
    fn agent_type(&self) -> KeyAgentType {
        self.core.agent_type()
    }

    fn state(&self) -> AgentState {
        self.core.state()
    }

    async fn derive_credentials(
        &mut self,
        payload: &ChainPayload,
        args: &DerivationArgs,
        provider: &dyn PassphraseProvider,
        pure: bool,
    ) -> WalletResult<GroupedCredential> {
        self.core
            .derive_credentials(payload, args, provider, pure)
            .await
    }

    async fn sign(
        &self,
        credential: &GroupedCredential,
        signable: &ChainSignable,
        args: &DerivationArgs,
        provider: &dyn PassphraseProvider,
    ) -> WalletResult<ChainSignatureResult> {
        self.core.sign(credential, signable, args, provider).await
    }

    async fn export_root_private_key(
        &self,
        provider: &dyn PassphraseProvider,
    ) -> WalletResult<Zeroizing<Vec<u8>>> {
        self.core.export_root_private_key(provider).await
    }

    fn known_credentials(&self) -> &[GroupedCredential] {
        self.core.known_credentials()
    }

    fn serializable_data(&self) -> WalletResult<KeyAgentData> {
        self.core.serializable_data()
    }

    fn destroy(&mut self) {
        self.core.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{MnemonicError, WalletError};

    const MNEMONIC: &str = "habit hope tip crystal because grunt nation idea electric witness alert like";

    #[test]
    fn test_from_mnemonic() {
        let agent =
            InMemoryKeyAgent::from_mnemonic(MNEMONIC, None, b"passphrase", KeyAgentConfig::default())
                .unwrap();
        assert_eq!(agent.state(), AgentState::Initialized);
        assert_eq!(agent.agent_type(), KeyAgentType::InMemory);
        assert!(agent.known_credentials().is_empty());
    }

    #[test]
    fn test_bad_checksum_rejected() {
        let bad = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        let err = InMemoryKeyAgent::from_mnemonic(bad, None, b"passphrase", KeyAgentConfig::default())
            .unwrap_err();
        assert_eq!(err, WalletError::Mnemonic(MnemonicError::ChecksumFailed));
    }

    #[test]
    fn test_snapshot_carries_config() {
        let config = KeyAgentConfig::default().with_issuer("did:example:123");
        let id = config.id.clone();
        let agent = InMemoryKeyAgent::from_mnemonic(MNEMONIC, None, b"passphrase", config).unwrap();

        let data = agent.serializable_data().unwrap();
        assert_eq!(data.id, id);
        assert_eq!(data.issuer, "did:example:123");
        assert_eq!(data.credential_subject.id, "did:example:123");
        assert_eq!(data.credential_type, vec!["VerifiableCredential", "EncryptedWallet"]);
        // plaintext seed không bao giờ có trong snapshot
        assert!(data.encrypted_seed_bytes.len() > 64);
    }

    #[tokio::test]
    async fn test_from_provider() {
        let provider = crate::agent::StaticPassphrase::new("passphrase");
        let agent = InMemoryKeyAgent::from_mnemonic_with_provider(
            MNEMONIC,
            None,
            &provider,
            KeyAgentConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(agent.state(), AgentState::Initialized);
    }

    #[test]
    fn test_with_evm_chain() {
        let agent =
            InMemoryKeyAgent::from_mnemonic(MNEMONIC, None, b"passphrase", KeyAgentConfig::default())
                .unwrap()
                .with_evm_chain(EvmChainConfig::sepolia());
        assert_eq!(agent.evm_chain().chain_id, 11155111);
    }
}
