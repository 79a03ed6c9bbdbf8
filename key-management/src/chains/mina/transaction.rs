// key-management/src/chains/mina/transaction.rs
//
// Payment / stake delegation - legacy Poseidon input (signed command payload)
//
// Thứ tự input (phải khớp với node):
//   fields: fee_payer.x, source.x, receiver.x
//   bits:   fee, fee_token, fee_payer.odd, nonce, valid_until, memo(34B),
//           tag(3), source.odd, receiver.odd, token_id, amount, token_locked

use super::keys::parse_address;
use super::signature::domain_string;
use crate::error::{WalletError, WalletResult};
use mina_hasher::{Hashable, ROInput};
use mina_signer::{CompressedPubKey, NetworkId};
use serde::{Deserialize, Serialize};

pub const MEMO_BYTES: usize = 34;
pub const MAX_MEMO_LEN: usize = MEMO_BYTES - 2;

const MEMO_USER_TAG: u8 = 0x01;
const DEFAULT_TOKEN_ID: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Payment,
    Delegation,
}

impl TransactionKind {
    const fn tag(self) -> [bool; 3] {
        match self {
            TransactionKind::Payment => [false, false, false],
            TransactionKind::Delegation => [false, false, true],
        }
    }
}

/// User-facing transaction body. `amount` là 0 cho delegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBody {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub from: String,
    pub to: String,
    pub fee: u64,
    #[serde(default)]
    pub amount: u64,
    pub nonce: u32,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub valid_until: Option<u32>,
}

impl TransactionBody {
    pub fn payment(from: &str, to: &str, amount: u64, fee: u64, nonce: u32) -> Self {
        Self {
            kind: TransactionKind::Payment,
            from: from.to_string(),
            to: to.to_string(),
            fee,
            amount,
            nonce,
            memo: None,
            valid_until: None,
        }
    }

    pub fn delegation(from: &str, to: &str, fee: u64, nonce: u32) -> Self {
        Self {
            kind: TransactionKind::Delegation,
            from: from.to_string(),
            to: to.to_string(),
            fee,
            amount: 0,
            nonce,
            memo: None,
            valid_until: None,
        }
    }

    pub fn with_memo(mut self, memo: &str) -> Self {
        self.memo = Some(memo.to_string());
        self
    }

    pub fn with_valid_until(mut self, valid_until: u32) -> Self {
        self.valid_until = Some(valid_until);
        self
    }
}

/// Encode a user memo as `[0x01, len, bytes.., 0 padding]`.
pub fn encode_memo(memo: &str) -> WalletResult<[u8; MEMO_BYTES]> {
    let bytes = memo.as_bytes();
    if bytes.len() > MAX_MEMO_LEN {
        return Err(WalletError::Validation(format!(
            "memo is {} bytes, at most {} allowed",
            bytes.len(),
            MAX_MEMO_LEN
        )));
    }

    let mut out = [0u8; MEMO_BYTES];
    out[0] = MEMO_USER_TAG;
    out[1] = bytes.len() as u8;
    out[2..2 + bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

/// Hash input for a signed command, built from a [`TransactionBody`].
#[derive(Clone)]
pub(crate) struct LegacyTransaction {
    fee_payer: CompressedPubKey,
    source: CompressedPubKey,
    receiver: CompressedPubKey,
    fee: u64,
    nonce: u32,
    valid_until: u32,
    memo: [u8; MEMO_BYTES],
    tag: [bool; 3],
    amount: u64,
}

impl LegacyTransaction {
    pub(crate) fn from_body(body: &TransactionBody) -> WalletResult<Self> {
        let source = parse_address(&body.from)?;
        let receiver = parse_address(&body.to)?;
        if body.kind == TransactionKind::Delegation && body.amount != 0 {
            return Err(WalletError::Validation(
                "stake delegation cannot carry an amount".to_string(),
            ));
        }

        Ok(Self {
            fee_payer: source.clone(),
            source,
            receiver,
            fee: body.fee,
            nonce: body.nonce,
            valid_until: body.valid_until.unwrap_or(u32::MAX),
            memo: encode_memo(body.memo.as_deref().unwrap_or(""))?,
            tag: body.kind.tag(),
            amount: body.amount,
        })
    }
}

impl Hashable for LegacyTransaction {
    type D = NetworkId;

    fn to_roinput(&self) -> ROInput {
        let mut roi = ROInput::new()
            .append_field(self.fee_payer.x)
            .append_field(self.source.x)
            .append_field(self.receiver.x)
            .append_u64(self.fee)
            .append_u64(DEFAULT_TOKEN_ID)
            .append_bool(self.fee_payer.is_odd)
            .append_u32(self.nonce)
            .append_u32(self.valid_until)
            .append_bytes(&self.memo);

        for bit in self.tag {
            roi = roi.append_bool(bit);
        }

        roi.append_bool(self.source.is_odd)
            .append_bool(self.receiver.is_odd)
            .append_u64(DEFAULT_TOKEN_ID)
            .append_u64(self.amount)
            .append_bool(false)
    }

    fn domain_string(network_id: NetworkId) -> Option<String> {
        domain_string(network_id)
    }
}
