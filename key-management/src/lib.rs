// key-management/src/lib.rs

//! Multi-chain HD key agent.
//!
//! One mnemonic is turned into a BIP-39 seed, sealed immediately with EMIP-3
//! and only ever decrypted for the duration of a single derive/sign call.
//! Chains: Mina, Ethereum, Starknet.
//!
//! ```ignore
//! use key_management::prelude::*;
//!
//! let mut agent = InMemoryKeyAgent::from_mnemonic(phrase, None, b"passphrase", KeyAgentConfig::default())?;
//! let provider = StaticPassphrase::new("passphrase");
//! let args = MinaSpecificArgs::new(0, 0, NetworkType::Mainnet);
//! let credential = agent
//!     .derive_credentials(&MinaPayload.into(), &args.clone().into(), &provider, false)
//!     .await?;
//! ```

pub mod agent;
pub mod chains;
pub mod config;
pub mod credentials;
pub mod crypto;
pub mod error;
pub mod vault;

pub use agent::{
    AgentState, InMemoryKeyAgent, KeyAgent, KeyAgentData, KeyAgentType, PassphraseProvider,
    StaticPassphrase,
};
pub use chains::{
    ChainPayload, ChainSignable, ChainSignatureResult, DerivationArgs, DerivedIdentity, Network,
};
pub use config::{EvmChainConfig, KeyAgentConfig};
pub use credentials::{CredentialStore, GroupedCredential};
pub use error::{ErrorKind, WalletError, WalletResult};
pub use vault::SeedVault;

pub mod prelude {
    pub use crate::agent::{
        InMemoryKeyAgent, KeyAgent, PassphraseProvider, ProviderError, StaticPassphrase,
    };
    pub use crate::chains::evm::{EthereumPayload, EthereumSignable, EthereumSpecificArgs};
    pub use crate::chains::mina::{MinaPayload, MinaSignable, MinaSpecificArgs, NetworkType};
    pub use crate::chains::starknet::{StarknetPayload, StarknetSignable, StarknetSpecificArgs};
    pub use crate::chains::{ChainPayload, ChainSignable, ChainSignatureResult, DerivationArgs};
    pub use crate::config::KeyAgentConfig;
    pub use crate::error::{WalletError, WalletResult};
}
