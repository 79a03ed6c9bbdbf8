// key-management/src/chains/mina/zkapp/mod.rs

//! zkApp commands
//!
//! The fee payer signs the full commitment of the command:
//!
//! ```text
//! commitment      = forest(accountUpdates)
//! feePayerDigest  = H(zkappBody(network), body(feePayer as account update))
//! fullCommitment  = H("MinaAcctUpdateCons", [memoHash, feePayerDigest, commitment])
//!
//! node(u)    = H("MinaAcctUpdateNode", [H(zkappBody(network), body(u)), forest(u.calls)])
//! cons(n, r) = H("MinaAcctUpdateCons", [n, r]),  forest([]) = 0
//! ```
//!
//! Account updates owned by the fee payer with `authorizationKind.isSigned`
//! are signed too, over `fullCommitment` or `commitment` depending on
//! `useFullCommitment`.

pub mod input;
pub mod layout;

pub use layout::{
    AccountUpdate, AccountUpdateBody, AuthorizationKind, BalanceChange, Control, Interval, Sign,
};

use self::input::{prefix, HashInput};
use self::layout::{opt_uint_str, uint_str};
use super::keys::MinaKeyPair;
use super::message::FieldInput;
use super::signature::{MinaSignature, NetworkType};
use super::transaction::MEMO_BYTES;
use crate::error::{WalletError, WalletResult};
use mina_hasher::ROInput;
use mina_signer::{BaseField, ScalarField, Signature, Signer};
use o1_utils::FieldHelpers;
use serde::{Deserialize, Serialize};

/// Version byte of base58check-encoded memos (`E4Y...`).
const MEMO_VERSION: u8 = 0x14;
const SIGNATURE_VERSION: u8 = 0x9a;
const SIGNATURE_FORMAT: u8 = 0x01;
const FIELD_BYTES: usize = 32;

// =============================================================================
// COMMAND
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePayerBody {
    pub public_key: String,
    #[serde(with = "uint_str")]
    pub fee: u64,
    #[serde(default, with = "opt_uint_str")]
    pub valid_until: Option<u32>,
    #[serde(with = "uint_str")]
    pub nonce: u32,
}

impl FeePayerBody {
    pub fn new(public_key: &str, fee: u64, nonce: u32) -> Self {
        Self {
            public_key: public_key.to_string(),
            fee,
            valid_until: None,
            nonce,
        }
    }

    pub fn with_valid_until(mut self, slot: u32) -> Self {
        self.valid_until = Some(slot);
        self
    }

    /// The account update the protocol applies for the fee payer.
    pub fn to_account_update(&self) -> AccountUpdateBody {
        let mut body = AccountUpdateBody::new(&self.public_key);
        body.balance_change = BalanceChange {
            magnitude: self.fee,
            sgn: Sign::Negative,
        };
        body.increment_nonce = true;
        body.preconditions.network.global_slot_since_genesis =
            Some(Interval::new(0, self.valid_until.unwrap_or(u32::MAX)));
        body.preconditions.account.nonce = Some(Interval::exactly(self.nonce));
        body.use_full_commitment = true;
        body.implicit_account_creation_fee = true;
        body.authorization_kind = AuthorizationKind::signature();
        body
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePayer {
    pub body: FeePayerBody,
    /// Base58 signature, empty until signed.
    #[serde(default)]
    pub authorization: String,
}

/// `zkappCommand` JSON as produced by o1js `ZkappCommand.toJSON`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkAppCommand {
    pub fee_payer: FeePayer,
    #[serde(default)]
    pub account_updates: Vec<AccountUpdate>,
    /// Base58check memo (`E4Y...`) or a plain string of at most 32 bytes
    #[serde(default)]
    pub memo: String,
}

impl ZkAppCommand {
    pub fn new(fee_payer: FeePayerBody, account_updates: Vec<AccountUpdate>, memo: &str) -> Self {
        Self {
            fee_payer: FeePayer {
                body: fee_payer,
                authorization: String::new(),
            },
            account_updates,
            memo: memo.to_string(),
        }
    }
}

/// Signed command (authorizations filled in) plus the commitment the fee payer signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedZkAppCommand {
    pub command: ZkAppCommand,
    pub full_commitment: String,
    pub fee_payer_signature: MinaSignature,
}

// =============================================================================
// COMMITMENTS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commitments {
    /// Signed by updates with `useFullCommitment = false`
    pub commitment: BaseField,
    pub full_commitment: BaseField,
}

/// Body hash under the network's zkApp body prefix.
pub fn account_update_hash(body: &AccountUpdateBody, network: NetworkType) -> WalletResult<BaseField> {
    let input: HashInput = body.to_input()?;
    Ok(input::hash_with_prefix(
        network.zkapp_body_prefix(),
        &input.to_fields(),
    ))
}

/// Tree view of the flat, depth-annotated update list.
struct CallNode {
    hash: BaseField,
    calls: Vec<CallNode>,
}

fn build_forest(
    updates: &[AccountUpdate],
    network: NetworkType,
    pos: &mut usize,
    depth: usize,
) -> WalletResult<Vec<CallNode>> {
    let mut forest = Vec::new();
    while let Some(update) = updates.get(*pos) {
        let call_depth = update.body.call_depth;
        if call_depth < depth {
            break;
        }
        if call_depth > depth {
            return Err(WalletError::Validation(format!(
                "account update {} jumps from call depth {} to {}",
                *pos, depth, call_depth
            )));
        }
        let hash = account_update_hash(&update.body, network)?;
        *pos += 1;
        let calls = build_forest(updates, network, pos, depth + 1)?;
        forest.push(CallNode { hash, calls });
    }
    Ok(forest)
}

fn forest_hash(forest: &[CallNode]) -> BaseField {
    forest.iter().rev().fold(BaseField::from(0u64), |rest, node| {
        let node_hash = input::hash_with_prefix(
            prefix::ACCOUNT_UPDATE_NODE,
            &[node.hash, forest_hash(&node.calls)],
        );
        input::hash_with_prefix(prefix::ACCOUNT_UPDATE_CONS, &[node_hash, rest])
    })
}

/// Commitment over all account updates (without fee payer or memo).
pub fn call_forest_commitment(updates: &[AccountUpdate], network: NetworkType) -> WalletResult<BaseField> {
    let mut pos = 0;
    let forest = build_forest(updates, network, &mut pos, 0)?;
    Ok(forest_hash(&forest))
}

/// Bare body hash of the fee payer, no call-forest node around it.
pub fn fee_payer_digest(fee_payer: &FeePayerBody, network: NetworkType) -> WalletResult<BaseField> {
    account_update_hash(&fee_payer.to_account_update(), network)
}

/// Decode the memo into its 34-byte form.
pub fn memo_bytes(memo: &str) -> WalletResult<[u8; MEMO_BYTES]> {
    if let Ok(decoded) = bs58::decode(memo).with_check(Some(MEMO_VERSION)).into_vec() {
        // with_check giữ lại version byte ở đầu
        if decoded.len() == MEMO_BYTES + 1 {
            let mut out = [0u8; MEMO_BYTES];
            out.copy_from_slice(&decoded[1..]);
            return Ok(out);
        }
    }
    super::transaction::encode_memo(memo)
}

pub fn memo_hash(memo: &str) -> WalletResult<BaseField> {
    let bytes = memo_bytes(memo)?;
    Ok(input::hash_bits_with_prefix(
        prefix::ZKAPP_MEMO,
        ROInput::new().append_bytes(&bytes),
    ))
}

pub fn transaction_commitments(command: &ZkAppCommand, network: NetworkType) -> WalletResult<Commitments> {
    let commitment = call_forest_commitment(&command.account_updates, network)?;
    let memo = memo_hash(&command.memo)?;
    let fee_payer = fee_payer_digest(&command.fee_payer.body, network)?;
    Ok(Commitments {
        commitment,
        full_commitment: input::hash_with_prefix(
            prefix::ACCOUNT_UPDATE_CONS,
            &[memo, fee_payer, commitment],
        ),
    })
}

/// The field element the fee payer signs.
pub fn full_commitment(command: &ZkAppCommand, network: NetworkType) -> WalletResult<BaseField> {
    Ok(transaction_commitments(command, network)?.full_commitment)
}

// =============================================================================
// SIGNATURES
// =============================================================================

/// `base58check(0x9a ‖ 0x01 ‖ rx(LE) ‖ s(LE))`
pub fn signature_to_base58(signature: &Signature) -> String {
    let mut bytes = Vec::with_capacity(2 + 2 * FIELD_BYTES);
    bytes.push(SIGNATURE_FORMAT);
    bytes.extend(signature.rx.to_bytes());
    bytes.extend(signature.s.to_bytes());
    bs58::encode(bytes).with_check_version(SIGNATURE_VERSION).into_string()
}

pub fn signature_from_base58(encoded: &str) -> WalletResult<Signature> {
    let invalid = || WalletError::Validation(format!("'{}' is not a Mina signature", encoded));

    let decoded = bs58::decode(encoded)
        .with_check(Some(SIGNATURE_VERSION))
        .into_vec()
        .map_err(|_| invalid())?;
    if decoded.len() != 2 + 2 * FIELD_BYTES || decoded[1] != SIGNATURE_FORMAT {
        return Err(invalid());
    }
    let rx = BaseField::from_bytes(&decoded[2..2 + FIELD_BYTES]).map_err(|_| invalid())?;
    let s = ScalarField::from_bytes(&decoded[2 + FIELD_BYTES..]).map_err(|_| invalid())?;
    Ok(Signature { rx, s })
}

/// Sign the fee payer and every update that `key_pair` must authorize.
pub fn sign_command(
    command: &ZkAppCommand,
    key_pair: &MinaKeyPair,
    network: NetworkType,
) -> WalletResult<SignedZkAppCommand> {
    if command.fee_payer.body.public_key != key_pair.address() {
        return Err(WalletError::Validation(
            "zkApp fee payer is not the signing account".to_string(),
        ));
    }

    let commitments = transaction_commitments(command, network)?;
    let keypair = key_pair.keypair()?;
    let mut signer = mina_signer::create_kimchi::<FieldInput>(network.network_id());

    let fee_payer_sig = signer.sign(&keypair, &FieldInput(vec![commitments.full_commitment]));
    let mut signed = command.clone();
    signed.fee_payer.authorization = signature_to_base58(&fee_payer_sig);

    for update in signed
        .account_updates
        .iter_mut()
        .filter(|u| u.needs_signature_from(key_pair.address()))
    {
        let message = if update.body.use_full_commitment {
            commitments.full_commitment
        } else {
            commitments.commitment
        };
        let sig = signer.sign(&keypair, &FieldInput(vec![message]));
        update.authorization = Control {
            proof: None,
            signature: Some(signature_to_base58(&sig)),
        };
    }

    Ok(SignedZkAppCommand {
        command: signed,
        full_commitment: commitments.full_commitment.to_string(),
        fee_payer_signature: MinaSignature::from(&fee_payer_sig),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEE_PAYER: &str = "B62qjsV6WQwTeEWrNrRRBP6VaaLvQhwWTnFi4WP4LQjGvpfZEumXzxb";
    const OTHER: &str = "B62qnhgMG71bvPDvAn3x8dEpXB2sXKCWukj2B6hFKACCHp6uVTCt6HB";
    const MEMO: &str = "E4YM2vTHhWEg66xpj52JErHUBU4pZ1yageL4TVDDpTTSsv8mK6YaH";

    fn fee_payer() -> FeePayerBody {
        FeePayerBody::new(FEE_PAYER, 100_000_000, 1).with_valid_until(100_000)
    }

    fn update(public_key: &str, depth: usize) -> AccountUpdate {
        let mut body = AccountUpdateBody::new(public_key);
        body.call_depth = depth;
        AccountUpdate::new(body)
    }

    #[test]
    fn test_fee_payer_json_shape() {
        let json = serde_json::json!({
            "feePayer": {
                "body": {
                    "publicKey": FEE_PAYER,
                    "fee": "100000000",
                    "validUntil": "100000",
                    "nonce": "1"
                },
                "authorization": ""
            },
            "accountUpdates": [],
            "memo": MEMO
        });
        let command: ZkAppCommand = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(command, ZkAppCommand::new(fee_payer(), vec![], MEMO));
        assert_eq!(serde_json::to_value(&command).unwrap(), json);

        let open: FeePayerBody = serde_json::from_value(serde_json::json!({
            "publicKey": FEE_PAYER, "fee": "1", "validUntil": null, "nonce": "0"
        }))
        .unwrap();
        assert_eq!(open.valid_until, None);
    }

    #[test]
    fn test_fee_payer_as_account_update() {
        let body = fee_payer().to_account_update();
        assert_eq!(body.balance_change.sgn, Sign::Negative);
        assert_eq!(body.balance_change.magnitude, 100_000_000);
        assert!(body.increment_nonce && body.use_full_commitment);
        assert!(body.implicit_account_creation_fee);
        assert!(body.authorization_kind.is_signed);
        assert_eq!(
            body.preconditions.network.global_slot_since_genesis,
            Some(Interval::new(0, 100_000))
        );
        assert_eq!(body.preconditions.account.nonce, Some(Interval::exactly(1)));

        let open = FeePayerBody::new(FEE_PAYER, 1, 0).to_account_update();
        assert_eq!(
            open.preconditions.network.global_slot_since_genesis,
            Some(Interval::new(0, u32::MAX))
        );
    }

    #[test]
    fn test_fee_payer_digest_depends_on_network() {
        let mainnet = fee_payer_digest(&fee_payer(), NetworkType::Mainnet).unwrap();
        let testnet = fee_payer_digest(&fee_payer(), NetworkType::Testnet).unwrap();
        assert_ne!(mainnet, testnet);
    }

    #[test]
    fn test_fee_payer_digest_is_the_bare_body_hash() {
        let digest = fee_payer_digest(&fee_payer(), NetworkType::Testnet).unwrap();
        let body_hash =
            account_update_hash(&fee_payer().to_account_update(), NetworkType::Testnet).unwrap();
        assert_eq!(digest, body_hash);
    }

    #[test]
    fn test_empty_forest_is_zero() {
        assert_eq!(
            call_forest_commitment(&[], NetworkType::Testnet).unwrap(),
            BaseField::from(0u64)
        );
    }

    #[test]
    fn test_call_depth_changes_commitment() {
        let net = NetworkType::Testnet;
        let flat = call_forest_commitment(&[update(FEE_PAYER, 0), update(OTHER, 0)], net).unwrap();
        let nested = call_forest_commitment(&[update(FEE_PAYER, 0), update(OTHER, 1)], net).unwrap();
        assert_ne!(flat, nested);
    }

    #[test]
    fn test_depth_jump_rejected() {
        let net = NetworkType::Testnet;
        let result = call_forest_commitment(&[update(FEE_PAYER, 0), update(OTHER, 2)], net);
        assert!(matches!(result, Err(WalletError::Validation(_))));
        assert!(call_forest_commitment(&[update(FEE_PAYER, 1)], net).is_err());
    }

    #[test]
    fn test_encoded_memo_decodes_to_34_bytes() {
        let bytes = memo_bytes(MEMO).unwrap();
        assert_eq!(bytes[0], 0x01);
        assert!((bytes[1] as usize) <= MEMO_BYTES - 2);
    }

    #[test]
    fn test_plain_memo_falls_back_to_encoding() {
        let bytes = memo_bytes("test memo").unwrap();
        assert_eq!(bytes[1], 9);
        assert_eq!(&bytes[2..11], b"test memo");
    }

    #[test]
    fn test_commitments() {
        let net = NetworkType::Testnet;
        let empty = ZkAppCommand::new(fee_payer(), vec![], MEMO);
        let with_update = ZkAppCommand::new(fee_payer(), vec![update(OTHER, 0)], MEMO);

        let a = transaction_commitments(&empty, net).unwrap();
        assert_eq!(a.commitment, BaseField::from(0u64));
        assert_eq!(a, transaction_commitments(&empty, net).unwrap());

        let b = transaction_commitments(&with_update, net).unwrap();
        assert_ne!(a.full_commitment, b.full_commitment);
        assert_ne!(b.commitment, b.full_commitment);
    }

    #[test]
    fn test_fee_change_breaks_commitment() {
        let mut cmd = ZkAppCommand::new(fee_payer(), vec![], MEMO);
        let before = full_commitment(&cmd, NetworkType::Testnet).unwrap();
        cmd.fee_payer.body.fee += 1;
        assert_ne!(before, full_commitment(&cmd, NetworkType::Testnet).unwrap());
    }

    #[test]
    fn test_authorization_does_not_enter_commitment() {
        let mut cmd = ZkAppCommand::new(fee_payer(), vec![update(OTHER, 0)], MEMO);
        let before = full_commitment(&cmd, NetworkType::Testnet).unwrap();
        cmd.fee_payer.authorization = "anything".to_string();
        cmd.account_updates[0].authorization.proof = Some("proof".to_string());
        assert_eq!(before, full_commitment(&cmd, NetworkType::Testnet).unwrap());
    }

    #[test]
    fn test_signature_base58_roundtrip() {
        let signature = Signature {
            rx: BaseField::from(12345u64),
            s: ScalarField::from(678u64),
        };
        let encoded = signature_to_base58(&signature);
        let decoded = signature_from_base58(&encoded).unwrap();
        assert_eq!((decoded.rx, decoded.s), (signature.rx, signature.s));
        assert!(signature_from_base58(MEMO).is_err());
    }
}
