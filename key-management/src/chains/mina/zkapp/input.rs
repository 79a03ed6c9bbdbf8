// key-management/src/chains/mina/zkapp/input.rs
//
// Chunked hash input + prefixed Poseidon (Kimchi sponge)
//
// HashInput giữ 2 danh sách:
//   fields - absorb nguyên vẹn
//   packed - (value, bits), gộp big-endian vào field < 255 bit, nối sau fields
//
// hash_with_prefix(p, xs)  = Poseidon(salt(p), xs)[0]
// empty_hash(p)            = salt(p)[0]
// salt(p)                  = permute([field(p), 0, 0])

use crate::error::{WalletError, WalletResult};
use mina_hasher::{DomainParameter, Hashable, Hasher, ROInput};
use mina_signer::BaseField;
use o1_utils::FieldHelpers;

/// Hash prefixes of the transaction logic. Padded to 20 bytes with `*` on use.
pub mod prefix {
    pub const ACCOUNT_UPDATE_NODE: &str = "MinaAcctUpdateNode";
    pub const ACCOUNT_UPDATE_CONS: &str = "MinaAcctUpdateCons";
    pub const ZKAPP_MEMO: &str = "MinaZkappMemo";
    pub const ZKAPP_URI: &str = "MinaZkappUri";
    pub const EVENT: &str = "MinaZkappEvent";
    pub const EVENTS: &str = "MinaZkappEvents";
    pub const ACTIONS: &str = "MinaZkappSeqEvents";
}

/// Salts for empty values. Used as-is, without padding.
pub mod salt {
    pub const EVENTS_EMPTY: &str = "MinaZkappEventsEmpty";
    pub const ACTIONS_EMPTY: &str = "MinaZkappActionsEmpty";
    pub const ACTION_STATE_EMPTY: &str = "MinaZkappActionStateEmptyElt";
    pub const RECEIPT_CHAIN_EMPTY: &str = "CodaReceiptEmpty";
}

const PACKED_FIELD_BITS: u32 = 255;
const FIELD_BYTES: usize = 32;

// =============================================================================
// HASH INPUT
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashInput {
    fields: Vec<BaseField>,
    packed: Vec<(BaseField, u32)>,
}

impl HashInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, value: BaseField) -> Self {
        self.fields.push(value);
        self
    }

    /// `value` must fit in `bits` bits.
    pub fn packed(mut self, value: BaseField, bits: u32) -> Self {
        self.packed.push((value, bits));
        self
    }

    pub fn bool(self, value: bool) -> Self {
        self.packed(BaseField::from(u64::from(value)), 1)
    }

    pub fn u32(self, value: u32) -> Self {
        self.packed(BaseField::from(u64::from(value)), 32)
    }

    pub fn u64(self, value: u64) -> Self {
        self.packed(BaseField::from(value), 64)
    }

    pub fn append(mut self, other: HashInput) -> Self {
        self.fields.extend(other.fields);
        self.packed.extend(other.packed);
        self
    }

    /// Fields first, then packed values folded most-significant first.
    pub fn to_fields(&self) -> Vec<BaseField> {
        let mut out = self.fields.clone();
        if self.packed.is_empty() {
            return out;
        }

        let mut current = BaseField::from(0u64);
        let mut used = 0u32;
        for (value, bits) in &self.packed {
            used += bits;
            if used < PACKED_FIELD_BITS {
                current = current * BaseField::from(1u128 << *bits) + *value;
            } else {
                out.push(current);
                used = *bits;
                current = *value;
            }
        }
        out.push(current);
        out
    }
}

// =============================================================================
// PREFIXED POSEIDON
// =============================================================================

#[derive(Clone)]
struct Domain(Option<&'static str>);

impl DomainParameter for Domain {
    fn into_bytes(self) -> Vec<u8> {
        self.0.map(|p| p.as_bytes().to_vec()).unwrap_or_default()
    }
}

#[derive(Clone)]
struct Absorb(ROInput);

impl Hashable for Absorb {
    type D = Domain;

    fn to_roinput(&self) -> ROInput {
        self.0.clone()
    }

    fn domain_string(domain: Domain) -> Option<String> {
        domain.0.map(str::to_string)
    }
}

fn sponge(domain: Domain, input: ROInput) -> BaseField {
    let mut hasher = mina_hasher::create_kimchi::<Absorb>(domain);
    hasher.hash(&Absorb(input))
}

/// Kimchi Poseidon over `fields`, initialised with `prefix`.
///
/// An empty input still runs one permutation after the salt.
pub fn hash_with_prefix(prefix: &'static str, fields: &[BaseField]) -> BaseField {
    let input = if fields.is_empty() {
        ROInput::new().append_field(BaseField::from(0u64))
    } else {
        fields.iter().fold(ROInput::new(), |roi, f| roi.append_field(*f))
    };
    sponge(Domain(Some(prefix)), input)
}

/// Bit-serialised input (memo), absorbed in 254-bit chunks.
pub fn hash_bits_with_prefix(prefix: &'static str, input: ROInput) -> BaseField {
    sponge(Domain(Some(prefix)), input)
}

/// First state element right after salting with the raw `salt` string.
pub fn empty_hash(salt: &str) -> WalletResult<BaseField> {
    let salt_field = string_to_field(salt)?;
    Ok(sponge(Domain(None), ROInput::new().append_field(salt_field)))
}

/// Little-endian bytes of `s` as one field element.
fn string_to_field(s: &str) -> WalletResult<BaseField> {
    if s.len() >= FIELD_BYTES - 1 {
        return Err(WalletError::Validation(format!("salt '{}' is too long", s)));
    }
    let mut bytes = [0u8; FIELD_BYTES];
    bytes[..s.len()].copy_from_slice(s.as_bytes());
    BaseField::from_bytes(&bytes)
        .map_err(|_| WalletError::Validation(format!("salt '{}' is not a field element", s)))
}
