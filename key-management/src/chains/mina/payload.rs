// key-management/src/chains/mina/payload.rs
//
// MinaPayload - ChainAdapter cho Mina

use super::keys::MinaKeyPair;
use super::message::{parse_fields, FieldInput, LegacyMessage};
use super::signature::{MinaSignature, NetworkType, Signed};
use super::transaction::{LegacyTransaction, TransactionBody};
use super::zkapp::{self, SignedZkAppCommand, ZkAppCommand};
use crate::chains::{ChainAdapter, Network};
use crate::crypto::DerivationPaths;
use crate::error::{CryptoError, DerivationError, WalletError, WalletResult};
use async_trait::async_trait;
use mina_signer::Signer;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinaSpecificArgs {
    pub account_index: u32,
    pub address_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_type: Option<NetworkType>,
}

impl MinaSpecificArgs {
    pub fn new(account_index: u32, address_index: u32, network_type: NetworkType) -> Self {
        Self {
            account_index,
            address_index,
            network_type: Some(network_type),
        }
    }

    fn network_type(&self) -> WalletResult<NetworkType> {
        self.network_type
            .ok_or(WalletError::Derivation(DerivationError::MissingArgument("networkType")))
    }
}

/// The four Mina signable kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinaSignable {
    Transaction(TransactionBody),
    Message(String),
    /// Decimal base field elements
    Fields(Vec<String>),
    ZkAppCommand(ZkAppCommand),
}

impl MinaSignable {
    pub fn kind(&self) -> &'static str {
        match self {
            MinaSignable::Transaction(_) => "Transaction",
            MinaSignable::Message(_) => "Message",
            MinaSignable::Fields(_) => "Fields",
            MinaSignable::ZkAppCommand(_) => "ZkAppCommand",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinaSignatureResult {
    Transaction(Signed<TransactionBody>),
    Message(Signed<String>),
    Fields(Signed<Vec<String>>),
    ZkAppCommand(SignedZkAppCommand),
}

/// Mina chain adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinaPayload;

impl MinaPayload {
    fn envelope<T>(key_pair: &MinaKeyPair, data: T, signature: &mina_signer::Signature) -> Signed<T> {
        Signed {
            data,
            public_key: key_pair.address().to_string(),
            signature: MinaSignature::from(signature),
        }
    }
}

#[async_trait]
impl ChainAdapter for MinaPayload {
    type Args = MinaSpecificArgs;
    type KeyPair = MinaKeyPair;
    type Signable = MinaSignable;
    type Signed = MinaSignatureResult;

    const NETWORK: Network = Network::Mina;

    fn derivation_path(&self, args: &MinaSpecificArgs) -> WalletResult<String> {
        args.network_type()?;
        Ok(DerivationPaths::mina(args.account_index, args.address_index))
    }

    fn derive_key_pair(&self, seed: &[u8], args: &MinaSpecificArgs) -> WalletResult<MinaKeyPair> {
        self.derivation_path(args)?;
        MinaKeyPair::derive(seed, args.account_index, args.address_index)
    }

    fn address(&self, key_pair: &MinaKeyPair) -> WalletResult<String> {
        Ok(key_pair.address().to_string())
    }

    async fn sign(
        &self,
        key_pair: &MinaKeyPair,
        signable: &MinaSignable,
        args: &MinaSpecificArgs,
    ) -> WalletResult<MinaSignatureResult> {
        let network = args.network_type()?;
        let network_id = network.network_id();
        debug!(kind = signable.kind(), "mina: signing");

        let result = match signable {
            MinaSignable::Transaction(body) => {
                if body.from != key_pair.address() {
                    return Err(WalletError::Validation(
                        "transaction sender is not the signing account".to_string(),
                    ));
                }
                let input = LegacyTransaction::from_body(body)?;
                let mut signer = mina_signer::create_legacy::<LegacyTransaction>(network_id);
                let sig = signer.sign(&key_pair.keypair()?, &input);
                MinaSignatureResult::Transaction(Self::envelope(key_pair, body.clone(), &sig))
            }
            MinaSignable::Message(message) => {
                let input = LegacyMessage(message.clone());
                let mut signer = mina_signer::create_legacy::<LegacyMessage>(network_id);
                let sig = signer.sign(&key_pair.keypair()?, &input);
                MinaSignatureResult::Message(Self::envelope(key_pair, message.clone(), &sig))
            }
            MinaSignable::Fields(fields) => {
                let input = FieldInput(parse_fields(fields)?);
                let mut signer = mina_signer::create_kimchi::<FieldInput>(network_id);
                let sig = signer.sign(&key_pair.keypair()?, &input);
                MinaSignatureResult::Fields(Self::envelope(key_pair, fields.clone(), &sig))
            }
            MinaSignable::ZkAppCommand(command) => {
                MinaSignatureResult::ZkAppCommand(zkapp::sign_command(command, key_pair, network)?)
            }
        };

        if !super::verify::verify_result(&result, network)? {
            return Err(WalletError::Crypto(CryptoError::SigningFailed(
                "mina signature failed self-verification".to_string(),
            )));
        }
        Ok(result)
    }
}
