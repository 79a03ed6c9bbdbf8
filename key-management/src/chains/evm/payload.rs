// key-management/src/chains/evm/payload.rs
//
// EthereumPayload - ChainAdapter cho Ethereum

use super::signer::EvmSigner;
use crate::chains::{ChainAdapter, Network};
use crate::crypto::{DerivationPaths, KeyDeriver};
use crate::error::WalletResult;
use alloy::primitives::{Address, Signature, B256};
use alloy::rpc::types::eth::TransactionRequest;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Ethereum Mainnet
pub const DEFAULT_CHAIN_ID: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EthereumSpecificArgs {
    pub account_index: u32,
    pub address_index: u32,
}

impl EthereumSpecificArgs {
    pub fn new(account_index: u32, address_index: u32) -> Self {
        Self {
            account_index,
            address_index,
        }
    }
}

#[derive(Debug, Clone)]
pub enum EthereumSignable {
    /// EIP-191 personal message
    Message(Vec<u8>),
    /// Pre-hashed 32 bytes, signed as is
    Hash(B256),
    Transaction(TransactionRequest),
}

impl EthereumSignable {
    pub fn kind(&self) -> &'static str {
        match self {
            EthereumSignable::Message(_) => "Message",
            EthereumSignable::Hash(_) => "Hash",
            EthereumSignable::Transaction(_) => "Transaction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EthereumSignatureResult {
    Message { signer: Address, signature: Signature },
    Hash { signer: Address, signature: Signature },
    /// EIP-2718 encoded signed transaction
    Transaction { signer: Address, raw: Vec<u8> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthereumPayload {
    chain_id: u64,
}

impl Default for EthereumPayload {
    fn default() -> Self {
        Self::new(DEFAULT_CHAIN_ID)
    }
}

impl EthereumPayload {
    pub fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }

    #[inline]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[async_trait]
impl ChainAdapter for EthereumPayload {
    type Args = EthereumSpecificArgs;
    type KeyPair = EvmSigner;
    type Signable = EthereumSignable;
    type Signed = EthereumSignatureResult;

    const NETWORK: Network = Network::Ethereum;

    fn derivation_path(&self, args: &EthereumSpecificArgs) -> WalletResult<String> {
        Ok(DerivationPaths::evm_account(args.account_index, args.address_index))
    }

    fn derive_key_pair(&self, seed: &[u8], args: &EthereumSpecificArgs) -> WalletResult<EvmSigner> {
        let derived = KeyDeriver::derive(seed, &self.derivation_path(args)?)?;
        EvmSigner::new(&derived.private_key[..], self.chain_id)
    }

    fn address(&self, key_pair: &EvmSigner) -> WalletResult<String> {
        Ok(key_pair.address().to_checksum(None))
    }

    async fn sign(
        &self,
        key_pair: &EvmSigner,
        signable: &EthereumSignable,
        _args: &EthereumSpecificArgs,
    ) -> WalletResult<EthereumSignatureResult> {
        debug!(kind = signable.kind(), chain_id = self.chain_id, "ethereum: signing");
        let signer = key_pair.address();

        match signable {
            EthereumSignable::Message(message) => Ok(EthereumSignatureResult::Message {
                signer,
                signature: key_pair.sign_message(message)?,
            }),
            EthereumSignable::Hash(hash) => Ok(EthereumSignatureResult::Hash {
                signer,
                signature: key_pair.sign_hash(hash)?,
            }),
            EthereumSignable::Transaction(tx) => {
                let raw = key_pair.sign_transaction(tx.clone()).await?;
                Ok(EthereumSignatureResult::Transaction { signer, raw })
            }
        }
    }
}
