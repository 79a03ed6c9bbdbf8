// key-management/src/chains/mod.rs
//
// Chain adapters - Mina, Ethereum, Starknet
//
// Mỗi chain implement `ChainAdapter`; agent chỉ làm việc với các enum
// `ChainPayload` / `DerivationArgs` / `ChainSignable` / `ChainSignatureResult`
// và match exhaustive, không kiểm tra type lúc runtime.

pub mod evm;
pub mod mina;
pub mod starknet;

use crate::error::{WalletError, WalletResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use evm::{EthereumPayload, EthereumSignable, EthereumSignatureResult, EthereumSpecificArgs};
pub use mina::{MinaPayload, MinaSignable, MinaSignatureResult, MinaSpecificArgs};
pub use starknet::{StarknetPayload, StarknetSignable, StarknetSignature, StarknetSpecificArgs};

// =============================================================================
// NETWORK
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    Mina,
    Ethereum,
    Starknet,
}

impl Network {
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Network::Mina => "Mina",
            Network::Ethereum => "Ethereum",
            Network::Starknet => "Starknet",
        }
    }

    /// DID method dùng trong credential id
    #[inline]
    pub const fn did_method(self) -> &'static str {
        match self {
            Network::Mina => "mina",
            Network::Ethereum => "ethr",
            Network::Starknet => "starknet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// ADAPTER TRAIT
// =============================================================================

/// Per-chain derivation and signing.
///
/// `(seed, args) -> (key pair, address)` is a pure function: the same inputs
/// always give the same address. Key pairs are never stored by the caller
/// beyond a single operation.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    type Args: Send + Sync;
    type KeyPair: Send + Sync;
    type Signable: Send + Sync;
    type Signed: Send;

    const NETWORK: Network;

    /// Derivation path for `args`.
    ///
    /// # Errors
    /// `DerivationError::MissingArgument` when a chain-specific argument is absent.
    fn derivation_path(&self, args: &Self::Args) -> WalletResult<String>;

    fn derive_key_pair(&self, seed: &[u8], args: &Self::Args) -> WalletResult<Self::KeyPair>;

    fn address(&self, key_pair: &Self::KeyPair) -> WalletResult<String>;

    async fn sign(
        &self,
        key_pair: &Self::KeyPair,
        signable: &Self::Signable,
        args: &Self::Args,
    ) -> WalletResult<Self::Signed>;
}

// =============================================================================
// TAGGED VARIANTS
// =============================================================================

/// Chọn adapter cho `derive_credentials`.
#[derive(Debug, Clone)]
pub enum ChainPayload {
    Mina(MinaPayload),
    Ethereum(EthereumPayload),
    Starknet(StarknetPayload),
}

impl ChainPayload {
    pub fn network(&self) -> Network {
        match self {
            ChainPayload::Mina(_) => Network::Mina,
            ChainPayload::Ethereum(_) => Network::Ethereum,
            ChainPayload::Starknet(_) => Network::Starknet,
        }
    }
}

impl From<MinaPayload> for ChainPayload {
    fn from(payload: MinaPayload) -> Self {
        ChainPayload::Mina(payload)
    }
}

impl From<EthereumPayload> for ChainPayload {
    fn from(payload: EthereumPayload) -> Self {
        ChainPayload::Ethereum(payload)
    }
}

impl From<StarknetPayload> for ChainPayload {
    fn from(payload: StarknetPayload) -> Self {
        ChainPayload::Starknet(payload)
    }
}

/// Derivation arguments, tagged by `network`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "network")]
pub enum DerivationArgs {
    Mina(MinaSpecificArgs),
    Ethereum(EthereumSpecificArgs),
    Starknet(StarknetSpecificArgs),
}

impl DerivationArgs {
    pub fn network(&self) -> Network {
        match self {
            DerivationArgs::Mina(_) => Network::Mina,
            DerivationArgs::Ethereum(_) => Network::Ethereum,
            DerivationArgs::Starknet(_) => Network::Starknet,
        }
    }

    pub fn account_index(&self) -> u32 {
        match self {
            DerivationArgs::Mina(a) => a.account_index,
            DerivationArgs::Ethereum(a) => a.account_index,
            DerivationArgs::Starknet(a) => a.account_index,
        }
    }

    pub fn address_index(&self) -> u32 {
        match self {
            DerivationArgs::Mina(a) => a.address_index,
            DerivationArgs::Ethereum(a) => a.address_index,
            DerivationArgs::Starknet(a) => a.address_index,
        }
    }
}

impl From<MinaSpecificArgs> for DerivationArgs {
    fn from(args: MinaSpecificArgs) -> Self {
        DerivationArgs::Mina(args)
    }
}

impl From<EthereumSpecificArgs> for DerivationArgs {
    fn from(args: EthereumSpecificArgs) -> Self {
        DerivationArgs::Ethereum(args)
    }
}

impl From<StarknetSpecificArgs> for DerivationArgs {
    fn from(args: StarknetSpecificArgs) -> Self {
        DerivationArgs::Starknet(args)
    }
}

/// Anything the agent can sign, tagged by chain then by kind.
#[derive(Debug, Clone)]
pub enum ChainSignable {
    Mina(MinaSignable),
    Ethereum(EthereumSignable),
    Starknet(StarknetSignable),
}

impl ChainSignable {
    pub fn network(&self) -> Network {
        match self {
            ChainSignable::Mina(_) => Network::Mina,
            ChainSignable::Ethereum(_) => Network::Ethereum,
            ChainSignable::Starknet(_) => Network::Starknet,
        }
    }

    /// Tên kind, dùng cho log và `UnsupportedPayload`
    pub fn kind(&self) -> &'static str {
        match self {
            ChainSignable::Mina(s) => s.kind(),
            ChainSignable::Ethereum(s) => s.kind(),
            ChainSignable::Starknet(s) => s.kind(),
        }
    }
}

impl From<MinaSignable> for ChainSignable {
    fn from(signable: MinaSignable) -> Self {
        ChainSignable::Mina(signable)
    }
}

impl From<EthereumSignable> for ChainSignable {
    fn from(signable: EthereumSignable) -> Self {
        ChainSignable::Ethereum(signable)
    }
}

impl From<StarknetSignable> for ChainSignable {
    fn from(signable: StarknetSignable) -> Self {
        ChainSignable::Starknet(signable)
    }
}

#[derive(Debug, Clone)]
pub enum ChainSignatureResult {
    Mina(MinaSignatureResult),
    Ethereum(EthereumSignatureResult),
    Starknet(StarknetSignature),
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Public identity produced by an adapter for one derivation path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedIdentity {
    pub network: Network,
    pub account_index: u32,
    pub address_index: u32,
    pub address: String,
}

/// Derive the address for `args` with the adapter selected by `payload`.
pub(crate) fn derive_identity(
    payload: &ChainPayload,
    seed: &[u8],
    args: &DerivationArgs,
) -> WalletResult<DerivedIdentity> {
    let address = match (payload, args) {
        (ChainPayload::Mina(adapter), DerivationArgs::Mina(a)) => derive_address(adapter, seed, a)?,
        (ChainPayload::Ethereum(adapter), DerivationArgs::Ethereum(a)) => {
            derive_address(adapter, seed, a)?
        }
        (ChainPayload::Starknet(adapter), DerivationArgs::Starknet(a)) => {
            derive_address(adapter, seed, a)?
        }
        (payload, args) => {
            return Err(WalletError::Validation(format!(
                "{} payload cannot derive with {} arguments",
                payload.network(),
                args.network()
            )))
        }
    };

    Ok(DerivedIdentity {
        network: args.network(),
        account_index: args.account_index(),
        address_index: args.address_index(),
        address,
    })
}

/// Re-derive the key pair for `args`, check it controls `expected_address`,
/// then sign `signable` with it.
///
/// A signable whose chain differs from the arguments' chain is reported as
/// `UnsupportedPayload`.
pub(crate) async fn sign_with_seed(
    seed: &[u8],
    args: &DerivationArgs,
    signable: &ChainSignable,
    expected_address: &str,
    evm_chain_id: u64,
) -> WalletResult<ChainSignatureResult> {
    match (args, signable) {
        (DerivationArgs::Mina(a), ChainSignable::Mina(s)) => {
            sign_checked(&MinaPayload, seed, a, s, expected_address)
                .await
                .map(ChainSignatureResult::Mina)
        }
        (DerivationArgs::Ethereum(a), ChainSignable::Ethereum(s)) => {
            sign_checked(&EthereumPayload::new(evm_chain_id), seed, a, s, expected_address)
                .await
                .map(ChainSignatureResult::Ethereum)
        }
        (DerivationArgs::Starknet(a), ChainSignable::Starknet(s)) => {
            sign_checked(&StarknetPayload, seed, a, s, expected_address)
                .await
                .map(ChainSignatureResult::Starknet)
        }
        (args, signable) => Err(WalletError::unsupported(
            args.network().name(),
            signable.kind(),
        )),
    }
}

fn derive_address<A: ChainAdapter>(adapter: &A, seed: &[u8], args: &A::Args) -> WalletResult<String> {
    let key_pair = adapter.derive_key_pair(seed, args)?;
    adapter.address(&key_pair)
}

async fn sign_checked<A: ChainAdapter>(
    adapter: &A,
    seed: &[u8],
    args: &A::Args,
    signable: &A::Signable,
    expected_address: &str,
) -> WalletResult<A::Signed> {
    let key_pair = adapter.derive_key_pair(seed, args)?;
    if adapter.address(&key_pair)? != expected_address {
        return Err(WalletError::Validation(format!(
            "{} credential does not match its derivation arguments",
            A::NETWORK
        )));
    }
    adapter.sign(&key_pair, signable, args).await
}
