// key-management/src/chains/starknet/mod.rs

//! Starknet Support
//!
//! - **Path**: EIP-2645 `m/2645'/layer'/application'/eth_1'/eth_2'/index`.
//! - **Keys**: secp256k1 child key ground into the stark curve order via [`grind_key`].
//! - **Signing**: ECDSA over the stark curve with RFC 6979 nonces ([`starknet_crypto`]).

pub mod keys;

pub use keys::{grind_key, StarknetKeyPair};

use crate::chains::evm::EvmAddress;
use crate::chains::{ChainAdapter, Network};
use crate::crypto::{DerivationPaths, KeyDeriver};
use crate::error::{CryptoError, DerivationError, WalletError, WalletResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use starknet_crypto::Felt;
use tracing::debug;
use zeroize::Zeroize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarknetSpecificArgs {
    /// EIP-2645 has no account level, so only 0 is accepted. Any other value
    /// would map to the same key as account 0.
    #[serde(default)]
    pub account_index: u32,
    pub address_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_address: Option<String>,
}

impl StarknetSpecificArgs {
    pub fn new(layer: &str, application: &str, eth_address: &str, address_index: u32) -> Self {
        Self {
            account_index: 0,
            address_index,
            layer: Some(layer.to_string()),
            application: Some(application.to_string()),
            eth_address: Some(eth_address.to_string()),
        }
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> WalletResult<&'a str> {
    value
        .as_deref()
        .ok_or(WalletError::Derivation(DerivationError::MissingArgument(name)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StarknetSignable {
    /// `0x`-prefixed field element below 2^251
    MessageHash(String),
}

impl StarknetSignable {
    pub fn kind(&self) -> &'static str {
        match self {
            StarknetSignable::MessageHash(_) => "MessageHash",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StarknetSignature {
    pub public_key: String,
    pub message_hash: String,
    pub r: String,
    pub s: String,
}

fn parse_felt(value: &str, what: &str) -> WalletResult<Felt> {
    Felt::from_hex(value)
        .map_err(|_| WalletError::Validation(format!("{} '{}' is not a field element", what, value)))
}

/// Check `signature` against its own public key and message hash.
pub fn verify(signature: &StarknetSignature) -> WalletResult<bool> {
    let public_key = parse_felt(&signature.public_key, "public key")?;
    let message = parse_felt(&signature.message_hash, "message hash")?;
    let r = parse_felt(&signature.r, "r")?;
    let s = parse_felt(&signature.s, "s")?;
    Ok(starknet_crypto::verify(&public_key, &message, &r, &s).unwrap_or(false))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StarknetPayload;

#[async_trait]
impl ChainAdapter for StarknetPayload {
    type Args = StarknetSpecificArgs;
    type KeyPair = StarknetKeyPair;
    type Signable = StarknetSignable;
    type Signed = StarknetSignature;

    const NETWORK: Network = Network::Starknet;

    fn derivation_path(&self, args: &StarknetSpecificArgs) -> WalletResult<String> {
        if args.account_index != 0 {
            return Err(WalletError::Derivation(DerivationError::InvalidArgument {
                name: "accountIndex",
                reason: format!(
                    "starknet paths have no account level, got {}",
                    args.account_index
                ),
            }));
        }
        let layer = required(&args.layer, "layer")?;
        let application = required(&args.application, "application")?;
        let eth_address = required(&args.eth_address, "ethAddress")?;
        let eth = EvmAddress::parse(eth_address).map_err(|_| {
            WalletError::Derivation(DerivationError::InvalidArgument {
                name: "ethAddress",
                reason: "expected a 20-byte hex address".to_string(),
            })
        })?;

        Ok(DerivationPaths::starknet_account(
            layer,
            application,
            &eth,
            args.address_index,
        ))
    }

    fn derive_key_pair(
        &self,
        seed: &[u8],
        args: &StarknetSpecificArgs,
    ) -> WalletResult<StarknetKeyPair> {
        let derived = KeyDeriver::derive(seed, &self.derivation_path(args)?)?;
        StarknetKeyPair::from_child_key(&derived.private_key)
    }

    fn address(&self, key_pair: &StarknetKeyPair) -> WalletResult<String> {
        Ok(key_pair.address())
    }

    async fn sign(
        &self,
        key_pair: &StarknetKeyPair,
        signable: &StarknetSignable,
        _args: &StarknetSpecificArgs,
    ) -> WalletResult<StarknetSignature> {
        debug!(kind = signable.kind(), "starknet: signing");
        let StarknetSignable::MessageHash(hash) = signable;
        let message = parse_felt(hash, "message hash")?;

        let mut k = starknet_crypto::rfc6979_generate_k(&message, key_pair.private_key(), None);
        let signed = starknet_crypto::sign(key_pair.private_key(), &message, &k);
        k.zeroize();
        let signature =
            signed.map_err(|e| WalletError::Crypto(CryptoError::SigningFailed(format!("{:?}", e))))?;

        Ok(StarknetSignature {
            public_key: key_pair.address(),
            message_hash: message.to_hex_string(),
            r: signature.r.to_hex_string(),
            s: signature.s.to_hex_string(),
        })
    }
}
