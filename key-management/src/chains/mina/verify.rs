// key-management/src/chains/mina/verify.rs
//
// Independent verification of signed Mina envelopes (mina-signer Schnorr).
// Chỉ dùng dữ liệu công khai: address + payload + signature.

use super::keys::parse_public_key;
use super::message::{parse_fields, FieldInput, LegacyMessage};
use super::payload::MinaSignatureResult;
use super::signature::{NetworkType, Signed};
use super::transaction::{LegacyTransaction, TransactionBody};
use super::zkapp::{self, SignedZkAppCommand};
use crate::error::WalletResult;
use mina_signer::{BaseField, Signer};

pub fn verify_transaction(signed: &Signed<TransactionBody>, network: NetworkType) -> WalletResult<bool> {
    let public_key = parse_public_key(&signed.public_key)?;
    let signature = signed.signature.to_signature()?;
    let input = LegacyTransaction::from_body(&signed.data)?;
    let mut signer = mina_signer::create_legacy::<LegacyTransaction>(network.network_id());
    Ok(signer.verify(&signature, &public_key, &input))
}

pub fn verify_message(signed: &Signed<String>, network: NetworkType) -> WalletResult<bool> {
    let public_key = parse_public_key(&signed.public_key)?;
    let signature = signed.signature.to_signature()?;
    let mut signer = mina_signer::create_legacy::<LegacyMessage>(network.network_id());
    Ok(signer.verify(&signature, &public_key, &LegacyMessage(signed.data.clone())))
}

pub fn verify_fields(signed: &Signed<Vec<String>>, network: NetworkType) -> WalletResult<bool> {
    let public_key = parse_public_key(&signed.public_key)?;
    let signature = signed.signature.to_signature()?;
    let input = FieldInput(parse_fields(&signed.data)?);
    let mut signer = mina_signer::create_kimchi::<FieldInput>(network.network_id());
    Ok(signer.verify(&signature, &public_key, &input))
}

/// Recompute both commitments from the command and check every signature in it.
///
/// - the fee payer `authorization` must equal `fee_payer_signature` and sign
///   the full commitment
/// - each account update carrying a signature must sign the commitment its
///   `useFullCommitment` flag selects
///
/// A stale `full_commitment` string fails verification.
pub fn verify_zkapp_command(signed: &SignedZkAppCommand, network: NetworkType) -> WalletResult<bool> {
    let command = &signed.command;
    let commitments = zkapp::transaction_commitments(command, network)?;
    if commitments.full_commitment.to_string() != signed.full_commitment {
        return Ok(false);
    }

    let mut signer = mina_signer::create_kimchi::<FieldInput>(network.network_id());
    let mut check = |address: &str, encoded: &str, message: BaseField| -> WalletResult<bool> {
        let public_key = parse_public_key(address)?;
        let signature = zkapp::signature_from_base58(encoded)?;
        Ok(signer.verify(&signature, &public_key, &FieldInput(vec![message])))
    };

    let fee_payer = &command.fee_payer;
    let envelope = signed.fee_payer_signature.to_signature()?;
    if fee_payer.authorization != zkapp::signature_to_base58(&envelope) {
        return Ok(false);
    }
    if !check(&fee_payer.body.public_key, &fee_payer.authorization, commitments.full_commitment)? {
        return Ok(false);
    }

    for update in &command.account_updates {
        let Some(encoded) = update.authorization.signature.as_deref() else {
            continue;
        };
        let message = if update.body.use_full_commitment {
            commitments.full_commitment
        } else {
            commitments.commitment
        };
        if !check(&update.body.public_key, encoded, message)? {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn verify_result(result: &MinaSignatureResult, network: NetworkType) -> WalletResult<bool> {
    match result {
        MinaSignatureResult::Transaction(signed) => verify_transaction(signed, network),
        MinaSignatureResult::Message(signed) => verify_message(signed, network),
        MinaSignatureResult::Fields(signed) => verify_fields(signed, network),
        MinaSignatureResult::ZkAppCommand(signed) => verify_zkapp_command(signed, network),
    }
}
