// key-management/src/agent/mod.rs

// Key Agent - Capability Interface
//
// Orchestrator chỉ làm việc với trait `KeyAgent`; variant hiện có là
// `InMemoryKeyAgent`. Một variant hardware-backed sau này chỉ cần implement
// cùng trait, bookkeeping dùng chung nằm trong `AgentCore` (composition).

pub mod shared;
pub mod in_memory;
pub mod passphrase;

pub use shared::AgentCore;
pub use in_memory::InMemoryKeyAgent;
pub use passphrase::{PassphraseProvider, ProviderError, ProviderResult, StaticPassphrase};

use crate::chains::{ChainPayload, ChainSignable, ChainSignatureResult, DerivationArgs};
use crate::credentials::GroupedCredential;
use crate::error::{WalletError, WalletResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

// =============================================================================
// AGENT TYPE + STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAgentType {
    InMemory,
}

/// Lifecycle: `Uninitialized -> Initialized -> Populated -> Destroyed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Uninitialized,
    /// Encrypted seed present, ledger empty
    Initialized,
    /// At least one credential in the ledger
    Populated,
    Destroyed,
}

impl AgentState {
    pub const fn name(self) -> &'static str {
        match self {
            AgentState::Uninitialized => "Uninitialized",
            AgentState::Initialized => "Initialized",
            AgentState::Populated => "Populated",
            AgentState::Destroyed => "Destroyed",
        }
    }

    /// Seed available for derivation and signing.
    #[inline]
    pub const fn is_ready(self) -> bool {
        matches!(self, AgentState::Initialized | AgentState::Populated)
    }
}

// =============================================================================
// PERSISTED SNAPSHOT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubject {
    pub id: String,
    pub contents: Vec<GroupedCredential>,
}

/// The only artifact a host persists.
///
/// `encrypted_seed_bytes` is the sole secret-bearing field and is opaque
/// without the passphrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyAgentData {
    #[serde(rename = "__typename")]
    pub agent_type: KeyAgentType,
    #[serde(with = "hex")]
    pub encrypted_seed_bytes: Vec<u8>,
    pub id: String,
    #[serde(rename = "type")]
    pub credential_type: Vec<String>,
    pub issuer: String,
    pub issuance_date: DateTime<Utc>,
    pub credential_subject: CredentialSubject,
}

impl KeyAgentData {
    #[inline]
    pub fn known_credentials(&self) -> &[GroupedCredential] {
        &self.credential_subject.contents
    }

    pub fn to_json(&self) -> WalletResult<String> {
        serde_json::to_string(self).map_err(|e| WalletError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> WalletResult<Self> {
        serde_json::from_str(json).map_err(|e| WalletError::Serialization(e.to_string()))
    }
}

// =============================================================================
// CAPABILITY TRAIT
// =============================================================================

/// What an orchestrator may ask of a key agent.
///
/// Every operation that touches key material takes a fresh
/// [`PassphraseProvider`]; agents never store one.
#[async_trait]
pub trait KeyAgent: Send + Sync {
    fn agent_type(&self) -> KeyAgentType;

    fn state(&self) -> AgentState;

    /// Derive the credential for `args` with the adapter chosen by `payload`.
    ///
    /// `pure = true` leaves the ledger untouched. `pure = false` appends the
    /// credential once; repeating the call is a no-op on the ledger.
    ///
    /// # Errors
    /// A wrong passphrase yields [`WalletError::Authentication`] and the agent
    /// is left exactly as it was.
    async fn derive_credentials(
        &mut self,
        payload: &ChainPayload,
        args: &DerivationArgs,
        provider: &dyn PassphraseProvider,
        pure: bool,
    ) -> WalletResult<GroupedCredential>;

    /// Sign `signable` with the key behind `credential`.
    ///
    /// The key pair is re-derived from the freshly decrypted seed on each call.
    async fn sign(
        &self,
        credential: &GroupedCredential,
        signable: &ChainSignable,
        args: &DerivationArgs,
        provider: &dyn PassphraseProvider,
    ) -> WalletResult<ChainSignatureResult>;

    /// Privileged export of the BIP-32 master private key.
    async fn export_root_private_key(
        &self,
        provider: &dyn PassphraseProvider,
    ) -> WalletResult<Zeroizing<Vec<u8>>>;

    fn known_credentials(&self) -> &[GroupedCredential];

    fn serializable_data(&self) -> WalletResult<KeyAgentData>;

    /// Drop the encrypted seed and the ledger. Irreversible.
    fn destroy(&mut self);
}
