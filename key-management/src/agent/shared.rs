// key-management/src/agent/shared.rs
//
// AgentCore - bookkeeping dùng chung cho mọi KeyAgent variant
//
// Giữ: SeedVault, CredentialStore, metadata của snapshot và state machine.
// Mọi thao tác derive/sign đều atomic: chỉ ghi ledger sau khi toàn bộ
// phần crypto đã thành công.

use super::passphrase::{resolve_passphrase, PassphraseProvider};
use super::{AgentState, CredentialSubject, KeyAgentData, KeyAgentType};
use crate::chains::{self, ChainPayload, ChainSignable, ChainSignatureResult, DerivationArgs};
use crate::config::{EvmChainConfig, KeyAgentConfig};
use crate::credentials::{CredentialStore, GroupedCredential};
use crate::crypto::EncryptedSeed;
use crate::error::{WalletError, WalletResult};
use crate::vault::SeedVault;
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use zeroize::Zeroizing;

pub struct AgentCore {
    agent_type: KeyAgentType,
    state: AgentState,
    vault: Option<SeedVault>,
    store: CredentialStore,
    id: String,
    issuer: String,
    credential_type: Vec<String>,
    issuance_date: Option<DateTime<Utc>>,
    evm_chain: EvmChainConfig,
}

impl std::fmt::Debug for AgentCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentCore")
            .field("agent_type", &self.agent_type)
            .field("state", &self.state)
            .field("id", &self.id)
            .field("credentials", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl AgentCore {
    pub fn new(agent_type: KeyAgentType, config: KeyAgentConfig) -> Self {
        Self {
            agent_type,
            state: AgentState::Uninitialized,
            vault: None,
            store: CredentialStore::new(),
            id: config.id,
            issuer: config.issuer,
            credential_type: config.credential_type,
            issuance_date: None,
            evm_chain: config.evm_chain,
        }
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Encrypt `seed` and move to `Initialized`. Allowed once.
    pub fn initialize(&mut self, seed: &[u8], passphrase: &[u8]) -> WalletResult<()> {
        self.expect_state(AgentState::Uninitialized)?;

        self.vault = Some(SeedVault::seal(seed, passphrase)?);
        self.issuance_date = Some(Utc::now());
        self.state = AgentState::Initialized;
        info!(agent = %self.id, "key agent initialized");
        Ok(())
    }

    /// Rebuild from a persisted snapshot.
    pub fn restore(data: KeyAgentData, evm_chain: EvmChainConfig) -> WalletResult<Self> {
        let encrypted = EncryptedSeed::from_bytes(&data.encrypted_seed_bytes)?;
        let store = CredentialStore::from_credentials(data.credential_subject.contents);
        let state = if store.is_empty() {
            AgentState::Initialized
        } else {
            AgentState::Populated
        };

        info!(agent = %data.id, credentials = store.len(), "key agent restored");
        Ok(Self {
            agent_type: data.agent_type,
            state,
            vault: Some(SeedVault::new(encrypted)),
            store,
            id: data.id,
            issuer: data.issuer,
            credential_type: data.credential_type,
            issuance_date: Some(data.issuance_date),
            evm_chain,
        })
    }

    pub fn destroy(&mut self) {
        // SeedVault drop -> ciphertext bị giải phóng, không còn plaintext nào tồn tại
        self.vault = None;
        self.store = CredentialStore::new();
        self.state = AgentState::Destroyed;
        info!(agent = %self.id, "key agent destroyed");
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[inline]
    pub fn state(&self) -> AgentState {
        self.state
    }

    #[inline]
    pub fn agent_type(&self) -> KeyAgentType {
        self.agent_type
    }

    #[inline]
    pub fn known_credentials(&self) -> &[GroupedCredential] {
        self.store.as_slice()
    }

    #[inline]
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    #[inline]
    pub fn evm_chain(&self) -> &EvmChainConfig {
        &self.evm_chain
    }

    pub fn set_evm_chain(&mut self, evm_chain: EvmChainConfig) {
        self.evm_chain = evm_chain;
    }

    pub fn serializable_data(&self) -> WalletResult<KeyAgentData> {
        let vault = self.vault()?;
        let issuance_date = self.issuance_date.ok_or(WalletError::InvalidState {
            expected: AgentState::Initialized.name(),
            actual: self.state.name(),
        })?;

        Ok(KeyAgentData {
            agent_type: self.agent_type,
            encrypted_seed_bytes: vault.encrypted().to_bytes(),
            id: self.id.clone(),
            credential_type: self.credential_type.clone(),
            issuer: self.issuer.clone(),
            issuance_date,
            credential_subject: CredentialSubject {
                id: self.issuer.clone(),
                contents: self.store.as_slice().to_vec(),
            },
        })
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    pub async fn derive_credentials(
        &mut self,
        payload: &ChainPayload,
        args: &DerivationArgs,
        provider: &dyn PassphraseProvider,
        pure: bool,
    ) -> WalletResult<GroupedCredential> {
        debug!(
            chain = %args.network(),
            account = args.account_index(),
            index = args.address_index(),
            pure,
            "deriving credential"
        );

        let identity = {
            let session = self.vault()?.unlock(provider).await?;
            chains::derive_identity(payload, session.seed(), args)?
        };
        let credential = GroupedCredential::from_identity(&identity);

        if !pure {
            if self.store.insert(credential.clone()) {
                self.state = AgentState::Populated;
                info!(chain = %identity.network, address = %identity.address, "credential stored");
            } else {
                debug!(chain = %identity.network, "credential already known");
            }
        }
        Ok(credential)
    }

    pub async fn sign(
        &self,
        credential: &GroupedCredential,
        signable: &ChainSignable,
        args: &DerivationArgs,
        provider: &dyn PassphraseProvider,
    ) -> WalletResult<ChainSignatureResult> {
        let vault = self.vault()?;
        check_credential_args(credential, args)?;
        if signable.network() != args.network() {
            return Err(WalletError::unsupported(args.network().name(), signable.kind()));
        }

        debug!(chain = %args.network(), kind = signable.kind(), "signing");
        let session = vault.unlock(provider).await?;
        chains::sign_with_seed(
            session.seed(),
            args,
            signable,
            credential.address(),
            self.evm_chain.chain_id,
        )
        .await
    }

    pub async fn export_root_private_key(
        &self,
        provider: &dyn PassphraseProvider,
    ) -> WalletResult<Zeroizing<Vec<u8>>> {
        let vault = self.vault()?;
        let passphrase = resolve_passphrase(provider).await?;
        let root = vault.export_root_private_key(&passphrase).await?;
        info!(agent = %self.id, "root private key exported");
        Ok(root)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn vault(&self) -> WalletResult<&SeedVault> {
        match (&self.vault, self.state.is_ready()) {
            (Some(vault), true) => Ok(vault),
            _ => Err(WalletError::InvalidState {
                expected: AgentState::Initialized.name(),
                actual: self.state.name(),
            }),
        }
    }

    fn expect_state(&self, expected: AgentState) -> WalletResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(WalletError::InvalidState {
                expected: expected.name(),
                actual: self.state.name(),
            })
        }
    }
}

fn check_credential_args(credential: &GroupedCredential, args: &DerivationArgs) -> WalletResult<()> {
    if credential.chain() != args.network()
        || credential.account_index() != args.account_index()
        || credential.address_index() != args.address_index()
    {
        return Err(WalletError::Validation(format!(
            "credential {} does not match {} derivation arguments ({}/{})",
            credential.id(),
            args.network(),
            args.account_index(),
            args.address_index()
        )));
    }
    Ok(())
}
