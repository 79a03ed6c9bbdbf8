// key-management/src/chains/mina/zkapp/layout.rs
//
// Account update body - JSON shape của zkappCommand.accountUpdates[i]
// và chunked hash input tương ứng.
//
// Thứ tự trong to_input() phải khớp từng trường với transaction logic của node.
// Option = "flagged": 1 bit is_some rồi tới value (value mặc định khi None).
// Interval bị bỏ qua = [0, MAX].

use super::input::{self, prefix, salt, HashInput};
use crate::chains::mina::keys::parse_address;
use crate::error::{WalletError, WalletResult};
use mina_signer::BaseField;
use o1_utils::FieldHelpers;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub const APP_STATE_LEN: usize = 8;

/// Hash of the dummy verification key, carried by signature-authorized updates.
pub const DUMMY_VK_HASH: &str =
    "3392518251768960475377392625298437850623664973002200885669375116181514017494";

/// Base58 form of the MINA token id (field element 1).
pub const DEFAULT_TOKEN_ID: &str = "wSHV2S4qX9jFsLjQo8r1BsMLH2ZRKsZx6EJd1sbozGPieEC4Jf";

const TXN_VERSION: u32 = 3;
const TOKEN_SYMBOL_BYTES: usize = 6;
const FIELD_BYTES: usize = 32;

// =============================================================================
// LEAVES
// =============================================================================

/// Unsigned integers travel as decimal strings; plain JSON numbers are accepted.
pub(crate) mod uint_str {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum Repr {
        Str(String),
        Num(u64),
    }

    impl Repr {
        pub(super) fn parse<T: FromStr + TryFrom<u64>>(self) -> Result<T, String> {
            match self {
                Repr::Str(s) => s.parse().map_err(|_| format!("'{}' is not an unsigned integer", s)),
                Repr::Num(n) => T::try_from(n).map_err(|_| format!("{} is out of range", n)),
            }
        }
    }

    pub fn serialize<T: Display, S: Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(d: D) -> Result<T, D::Error>
    where
        T: FromStr + TryFrom<u64>,
        D: Deserializer<'de>,
    {
        Repr::deserialize(d)?.parse().map_err(de::Error::custom)
    }
}

/// `null` or a decimal string.
pub(crate) mod opt_uint_str {
    use super::uint_str::Repr;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<T: Display, S: Serializer>(value: &Option<T>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.collect_str(v),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, T, D>(d: D) -> Result<Option<T>, D::Error>
    where
        T: FromStr + TryFrom<u64>,
        D: Deserializer<'de>,
    {
        Option::<Repr>::deserialize(d)?
            .map(|r| r.parse().map_err(de::Error::custom))
            .transpose()
    }
}

/// Decimal string, or any base58check encoding of a 32-byte little-endian field.
pub fn parse_field(value: &str, what: &str) -> WalletResult<BaseField> {
    let invalid = || WalletError::Validation(format!("{} '{}' is not a field element", what, value));

    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return BaseField::from_str(value).map_err(|_| invalid());
    }
    let decoded = bs58::decode(value).with_check(None).into_vec().map_err(|_| invalid())?;
    if decoded.len() < FIELD_BYTES + 1 {
        return Err(invalid());
    }
    BaseField::from_bytes(&decoded[decoded.len() - FIELD_BYTES..]).map_err(|_| invalid())
}

fn parse_fields(values: &[String], what: &str) -> WalletResult<Vec<BaseField>> {
    values.iter().map(|v| parse_field(v, what)).collect()
}

fn public_key_input(address: Option<&str>) -> WalletResult<HashInput> {
    Ok(match address {
        Some(address) => {
            let pk = parse_address(address)?;
            HashInput::new().field(pk.x).bool(pk.is_odd)
        }
        None => HashInput::new().field(BaseField::from(0u64)).bool(false),
    })
}

fn flagged_field(value: Option<&str>, default: BaseField, what: &str) -> WalletResult<HashInput> {
    Ok(match value {
        Some(v) => HashInput::new().bool(true).field(parse_field(v, what)?),
        None => HashInput::new().bool(false).field(default),
    })
}

fn flagged_public_key(address: Option<&str>) -> WalletResult<HashInput> {
    Ok(HashInput::new()
        .bool(address.is_some())
        .append(public_key_input(address)?))
}

fn flagged_bool(value: Option<bool>) -> HashInput {
    HashInput::new()
        .bool(value.is_some())
        .bool(value.unwrap_or(false))
}

fn state_input(state: &[Option<String>], what: &str) -> WalletResult<HashInput> {
    if state.len() != APP_STATE_LEN {
        return Err(WalletError::Validation(format!(
            "{} has {} elements, expected {}",
            what,
            state.len(),
            APP_STATE_LEN
        )));
    }
    state.iter().try_fold(HashInput::new(), |acc, element| {
        Ok(acc.append(flagged_field(element.as_deref(), BaseField::from(0u64), what)?))
    })
}

fn empty_state() -> Vec<Option<String>> {
    vec![None; APP_STATE_LEN]
}

fn default_token_id() -> String {
    DEFAULT_TOKEN_ID.to_string()
}

fn zero_field() -> String {
    "0".to_string()
}

fn dummy_vk_hash() -> String {
    DUMMY_VK_HASH.to_string()
}

// =============================================================================
// INTERVALS
// =============================================================================

pub trait Bound: Copy + Display + FromStr + TryFrom<u64> {
    const MIN: Self;
    const MAX: Self;
    fn input(self) -> HashInput;
}

impl Bound for u32 {
    const MIN: Self = 0;
    const MAX: Self = u32::MAX;

    fn input(self) -> HashInput {
        HashInput::new().u32(self)
    }
}

impl Bound for u64 {
    const MIN: Self = 0;
    const MAX: Self = u64::MAX;

    fn input(self) -> HashInput {
        HashInput::new().u64(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Display", deserialize = "T: FromStr + TryFrom<u64>"))]
pub struct Interval<T> {
    #[serde(with = "uint_str")]
    pub lower: T,
    #[serde(with = "uint_str")]
    pub upper: T,
}

impl<T: Bound> Interval<T> {
    pub fn new(lower: T, upper: T) -> Self {
        Self { lower, upper }
    }

    pub fn exactly(value: T) -> Self {
        Self::new(value, value)
    }
}

fn interval_input<T: Bound>(interval: &Option<Interval<T>>) -> HashInput {
    let (is_some, range) = match interval {
        Some(range) => (true, *range),
        None => (false, Interval::new(T::MIN, T::MAX)),
    };
    HashInput::new()
        .bool(is_some)
        .append(range.lower.input())
        .append(range.upper.input())
}

// =============================================================================
// UPDATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthRequired {
    None,
    Either,
    Proof,
    Signature,
    Impossible,
}

impl AuthRequired {
    /// (constant, signatureNecessary, signatureSufficient)
    const fn encoding(self) -> [bool; 3] {
        match self {
            AuthRequired::None => [true, false, true],
            AuthRequired::Either => [false, false, true],
            AuthRequired::Proof => [false, false, false],
            AuthRequired::Signature => [false, true, true],
            AuthRequired::Impossible => [true, true, false],
        }
    }

    fn input(self) -> HashInput {
        self.encoding()
            .iter()
            .fold(HashInput::new(), |acc, bit| acc.bool(*bit))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationKeyPermission {
    pub auth: AuthRequired,
    #[serde(with = "uint_str")]
    pub txn_version: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub edit_state: AuthRequired,
    pub access: AuthRequired,
    pub send: AuthRequired,
    pub receive: AuthRequired,
    pub set_delegate: AuthRequired,
    pub set_permissions: AuthRequired,
    pub set_verification_key: VerificationKeyPermission,
    pub set_zkapp_uri: AuthRequired,
    pub edit_action_state: AuthRequired,
    pub set_token_symbol: AuthRequired,
    pub increment_nonce: AuthRequired,
    pub set_voting_for: AuthRequired,
    pub set_timing: AuthRequired,
}

impl Default for Permissions {
    fn default() -> Self {
        let none = AuthRequired::None;
        Self {
            edit_state: none,
            access: none,
            send: none,
            receive: none,
            set_delegate: none,
            set_permissions: none,
            set_verification_key: VerificationKeyPermission {
                auth: none,
                txn_version: TXN_VERSION,
            },
            set_zkapp_uri: none,
            edit_action_state: none,
            set_token_symbol: none,
            increment_nonce: none,
            set_voting_for: none,
            set_timing: none,
        }
    }
}

impl Permissions {
    fn input(&self) -> HashInput {
        HashInput::new()
            .append(self.edit_state.input())
            .append(self.access.input())
            .append(self.send.input())
            .append(self.receive.input())
            .append(self.set_delegate.input())
            .append(self.set_permissions.input())
            .append(self.set_verification_key.auth.input())
            .u32(self.set_verification_key.txn_version)
            .append(self.set_zkapp_uri.input())
            .append(self.edit_action_state.input())
            .append(self.set_token_symbol.input())
            .append(self.increment_nonce.input())
            .append(self.set_voting_for.input())
            .append(self.set_timing.input())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    #[serde(with = "uint_str")]
    pub initial_minimum_balance: u64,
    #[serde(with = "uint_str")]
    pub cliff_time: u32,
    #[serde(with = "uint_str")]
    pub cliff_amount: u64,
    #[serde(with = "uint_str")]
    pub vesting_period: u32,
    #[serde(with = "uint_str")]
    pub vesting_increment: u64,
}

impl Timing {
    fn input(&self) -> HashInput {
        HashInput::new()
            .u64(self.initial_minimum_balance)
            .u32(self.cliff_time)
            .u64(self.cliff_amount)
            .u32(self.vesting_period)
            .u64(self.vesting_increment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationKey {
    pub data: String,
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    #[serde(default = "empty_state")]
    pub app_state: Vec<Option<String>>,
    #[serde(default)]
    pub delegate: Option<String>,
    #[serde(default)]
    pub verification_key: Option<VerificationKey>,
    #[serde(default)]
    pub permissions: Option<Permissions>,
    #[serde(default)]
    pub zkapp_uri: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default)]
    pub timing: Option<Timing>,
    #[serde(default)]
    pub voting_for: Option<String>,
}

impl Default for Update {
    fn default() -> Self {
        Self {
            app_state: empty_state(),
            delegate: None,
            verification_key: None,
            permissions: None,
            zkapp_uri: None,
            token_symbol: None,
            timing: None,
            voting_for: None,
        }
    }
}

/// Poseidon over the URI bits plus one trailing `1` bit; `None` hashes a zero field.
pub fn zkapp_uri_hash(uri: Option<&str>) -> BaseField {
    match uri {
        Some(uri) => {
            let input = uri
                .bytes()
                .flat_map(|byte| (0..8).map(move |i| (byte >> i) & 1 == 1))
                .chain(std::iter::once(true))
                .fold(HashInput::new(), |acc, bit| acc.bool(bit));
            input::hash_with_prefix(prefix::ZKAPP_URI, &input.to_fields())
        }
        None => input::hash_with_prefix(prefix::ZKAPP_URI, &[BaseField::from(0u64)]),
    }
}

/// Up to 6 bytes, read little-endian into 48 bits.
fn token_symbol_input(symbol: &str) -> WalletResult<HashInput> {
    let bytes = symbol.as_bytes();
    if bytes.len() > TOKEN_SYMBOL_BYTES {
        return Err(WalletError::Validation(format!(
            "token symbol '{}' is longer than {} bytes",
            symbol, TOKEN_SYMBOL_BYTES
        )));
    }
    let value = bytes
        .iter()
        .rev()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    Ok(HashInput::new().packed(BaseField::from(value), 48))
}

impl Update {
    fn input(&self) -> WalletResult<HashInput> {
        let vk_hash = self
            .verification_key
            .as_ref()
            .map(|vk| vk.hash.as_str());
        let permissions = self.permissions.unwrap_or_default();
        let timing = self.timing.unwrap_or_default();

        Ok(HashInput::new()
            .append(state_input(&self.app_state, "update.appState")?)
            .append(flagged_public_key(self.delegate.as_deref())?)
            .append(flagged_field(vk_hash, BaseField::from(0u64), "verification key hash")?)
            .bool(self.permissions.is_some())
            .append(permissions.input())
            .bool(self.zkapp_uri.is_some())
            .field(zkapp_uri_hash(self.zkapp_uri.as_deref()))
            .bool(self.token_symbol.is_some())
            .append(token_symbol_input(self.token_symbol.as_deref().unwrap_or(""))?)
            .bool(self.timing.is_some())
            .append(timing.input())
            .append(flagged_field(
                self.voting_for.as_deref(),
                BaseField::from(0u64),
                "votingFor",
            )?))
    }
}

// =============================================================================
// PRECONDITIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochLedger {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub total_currency: Option<Interval<u64>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpochData {
    #[serde(default)]
    pub ledger: EpochLedger,
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub start_checkpoint: Option<String>,
    #[serde(default)]
    pub lock_checkpoint: Option<String>,
    #[serde(default)]
    pub epoch_length: Option<Interval<u32>>,
}

impl EpochData {
    fn input(&self) -> WalletResult<HashInput> {
        let zero = BaseField::from(0u64);
        Ok(HashInput::new()
            .append(flagged_field(self.ledger.hash.as_deref(), zero, "epoch ledger hash")?)
            .append(interval_input(&self.ledger.total_currency))
            .append(flagged_field(self.seed.as_deref(), zero, "epoch seed")?)
            .append(flagged_field(self.start_checkpoint.as_deref(), zero, "start checkpoint")?)
            .append(flagged_field(self.lock_checkpoint.as_deref(), zero, "lock checkpoint")?)
            .append(interval_input(&self.epoch_length)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPrecondition {
    #[serde(default)]
    pub snarked_ledger_hash: Option<String>,
    #[serde(default)]
    pub blockchain_length: Option<Interval<u32>>,
    #[serde(default)]
    pub min_window_density: Option<Interval<u32>>,
    #[serde(default)]
    pub total_currency: Option<Interval<u64>>,
    #[serde(default)]
    pub global_slot_since_genesis: Option<Interval<u32>>,
    #[serde(default)]
    pub staking_epoch_data: EpochData,
    #[serde(default)]
    pub next_epoch_data: EpochData,
}

impl NetworkPrecondition {
    fn input(&self) -> WalletResult<HashInput> {
        Ok(HashInput::new()
            .append(flagged_field(
                self.snarked_ledger_hash.as_deref(),
                BaseField::from(0u64),
                "snarked ledger hash",
            )?)
            .append(interval_input(&self.blockchain_length))
            .append(interval_input(&self.min_window_density))
            .append(interval_input(&self.total_currency))
            .append(interval_input(&self.global_slot_since_genesis))
            .append(self.staking_epoch_data.input()?)
            .append(self.next_epoch_data.input()?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPrecondition {
    #[serde(default)]
    pub balance: Option<Interval<u64>>,
    #[serde(default)]
    pub nonce: Option<Interval<u32>>,
    #[serde(default)]
    pub receipt_chain_hash: Option<String>,
    #[serde(default)]
    pub delegate: Option<String>,
    #[serde(default = "empty_state")]
    pub state: Vec<Option<String>>,
    #[serde(default)]
    pub action_state: Option<String>,
    #[serde(default)]
    pub proved_state: Option<bool>,
    #[serde(default)]
    pub is_new: Option<bool>,
}

impl Default for AccountPrecondition {
    fn default() -> Self {
        Self {
            balance: None,
            nonce: None,
            receipt_chain_hash: None,
            delegate: None,
            state: empty_state(),
            action_state: None,
            proved_state: None,
            is_new: None,
        }
    }
}

impl AccountPrecondition {
    fn input(&self) -> WalletResult<HashInput> {
        let empty_receipt = input::empty_hash(salt::RECEIPT_CHAIN_EMPTY)?;
        let empty_action_state = input::empty_hash(salt::ACTION_STATE_EMPTY)?;

        Ok(HashInput::new()
            .append(interval_input(&self.balance))
            .append(interval_input(&self.nonce))
            .append(flagged_field(
                self.receipt_chain_hash.as_deref(),
                empty_receipt,
                "receipt chain hash",
            )?)
            .append(flagged_public_key(self.delegate.as_deref())?)
            .append(state_input(&self.state, "account.state")?)
            .append(flagged_field(
                self.action_state.as_deref(),
                empty_action_state,
                "action state",
            )?)
            .append(flagged_bool(self.proved_state))
            .append(flagged_bool(self.is_new)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preconditions {
    #[serde(default)]
    pub network: NetworkPrecondition,
    #[serde(default)]
    pub account: AccountPrecondition,
    #[serde(default)]
    pub valid_while: Option<Interval<u32>>,
}

impl Preconditions {
    fn input(&self) -> WalletResult<HashInput> {
        Ok(HashInput::new()
            .append(self.network.input()?)
            .append(self.account.input()?)
            .append(interval_input(&self.valid_while)))
    }
}

// =============================================================================
// BODY
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BalanceChange {
    #[serde(with = "uint_str")]
    pub magnitude: u64,
    pub sgn: Sign,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MayUseToken {
    pub parents_own_token: bool,
    pub inherit_from_parent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationKind {
    pub is_signed: bool,
    pub is_proved: bool,
    #[serde(default = "dummy_vk_hash")]
    pub verification_key_hash: String,
}

impl Default for AuthorizationKind {
    fn default() -> Self {
        Self {
            is_signed: false,
            is_proved: false,
            verification_key_hash: dummy_vk_hash(),
        }
    }
}

impl AuthorizationKind {
    pub fn signature() -> Self {
        Self {
            is_signed: true,
            ..Self::default()
        }
    }
}

/// Body of one account update. `callDepth` shapes the call forest and is not hashed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdateBody {
    pub public_key: String,
    #[serde(default = "default_token_id")]
    pub token_id: String,
    #[serde(default)]
    pub update: Update,
    #[serde(default)]
    pub balance_change: BalanceChange,
    #[serde(default)]
    pub increment_nonce: bool,
    #[serde(default)]
    pub events: Vec<Vec<String>>,
    #[serde(default)]
    pub actions: Vec<Vec<String>>,
    #[serde(default = "zero_field")]
    pub call_data: String,
    #[serde(default)]
    pub call_depth: usize,
    #[serde(default)]
    pub preconditions: Preconditions,
    #[serde(default)]
    pub use_full_commitment: bool,
    #[serde(default)]
    pub implicit_account_creation_fee: bool,
    #[serde(default)]
    pub may_use_token: MayUseToken,
    #[serde(default)]
    pub authorization_kind: AuthorizationKind,
}

impl AccountUpdateBody {
    /// Body with every field ignored or unchanged, for `public_key`.
    pub fn new(public_key: &str) -> Self {
        Self {
            public_key: public_key.to_string(),
            token_id: default_token_id(),
            update: Update::default(),
            balance_change: BalanceChange::default(),
            increment_nonce: false,
            events: Vec::new(),
            actions: Vec::new(),
            call_data: zero_field(),
            call_depth: 0,
            preconditions: Preconditions::default(),
            use_full_commitment: false,
            implicit_account_creation_fee: false,
            may_use_token: MayUseToken::default(),
            authorization_kind: AuthorizationKind::default(),
        }
    }

    pub fn to_input(&self) -> WalletResult<HashInput> {
        let kind = &self.authorization_kind;
        if kind.is_signed && kind.is_proved {
            return Err(WalletError::Validation(
                "authorization kind cannot be both signed and proved".to_string(),
            ));
        }

        Ok(HashInput::new()
            .append(public_key_input(Some(&self.public_key))?)
            .field(parse_field(&self.token_id, "token id")?)
            .append(self.update.input()?)
            .u64(self.balance_change.magnitude)
            .bool(self.balance_change.sgn == Sign::Positive)
            .bool(self.increment_nonce)
            .field(events_hash(&self.events, prefix::EVENTS, salt::EVENTS_EMPTY)?)
            .field(events_hash(&self.actions, prefix::ACTIONS, salt::ACTIONS_EMPTY)?)
            .field(parse_field(&self.call_data, "call data")?)
            .append(self.preconditions.input()?)
            .bool(self.use_full_commitment)
            .bool(self.implicit_account_creation_fee)
            .bool(self.may_use_token.parents_own_token)
            .bool(self.may_use_token.inherit_from_parent)
            .bool(kind.is_signed)
            .bool(kind.is_proved)
            .field(parse_field(&kind.verification_key_hash, "verification key hash")?))
    }
}

/// Events and actions are listed newest first; the hash chain starts from the oldest.
pub fn events_hash(
    events: &[Vec<String>],
    list_prefix: &'static str,
    empty_salt: &str,
) -> WalletResult<BaseField> {
    events
        .iter()
        .rev()
        .try_fold(input::empty_hash(empty_salt)?, |hash, event| {
            let fields = parse_fields(event, "event field")?;
            let event_hash = input::hash_with_prefix(prefix::EVENT, &fields);
            Ok(input::hash_with_prefix(list_prefix, &[hash, event_hash]))
        })
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Control {
    #[serde(default)]
    pub proof: Option<String>,
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    pub body: AccountUpdateBody,
    #[serde(default)]
    pub authorization: Control,
}

impl AccountUpdate {
    pub fn new(body: AccountUpdateBody) -> Self {
        Self {
            body,
            authorization: Control::default(),
        }
    }

    /// Signature-authorized update owned by `address`.
    pub fn needs_signature_from(&self, address: &str) -> bool {
        self.body.authorization_kind.is_signed && self.body.public_key == address
    }
}
