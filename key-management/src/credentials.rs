// key-management/src/credentials.rs
//
// GroupedCredential + CredentialStore
//
// Ledger append-only, giữ thứ tự chèn, key = (chain, accountIndex, addressIndex).
// Không có thao tác xoá.

use crate::chains::{DerivedIdentity, Network};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const WALLET_CONTEXT: &str = "https://w3id.org/wallet/v1";

/// Public identity derived for one path, in W3C wallet form.
///
/// Immutable once built: fields are read through accessors only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedCredential {
    #[serde(rename = "@context")]
    context: Vec<String>,
    id: String,
    #[serde(rename = "type")]
    credential_type: String,
    controller: String,
    name: String,
    description: String,
    chain: Network,
    account_index: u32,
    address_index: u32,
    address: String,
}

impl GroupedCredential {
    pub fn new(chain: Network, account_index: u32, address_index: u32, address: &str) -> Self {
        let did = format!("did:{}:{}", chain.did_method(), address);
        Self {
            context: vec![WALLET_CONTEXT.to_string()],
            id: did.clone(),
            credential_type: format!("{}Address", chain.name()),
            controller: did,
            name: format!("{} Account", chain.name()),
            description: format!("My {} account.", chain.name()),
            chain,
            account_index,
            address_index,
            address: address.to_string(),
        }
    }

    pub(crate) fn from_identity(identity: &DerivedIdentity) -> Self {
        Self::new(
            identity.network,
            identity.account_index,
            identity.address_index,
            &identity.address,
        )
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn controller(&self) -> &str {
        &self.controller
    }

    #[inline]
    pub fn display_name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn chain(&self) -> Network {
        self.chain
    }

    #[inline]
    pub fn account_index(&self) -> u32 {
        self.account_index
    }

    #[inline]
    pub fn address_index(&self) -> u32 {
        self.address_index
    }

    #[inline]
    pub fn address(&self) -> &str {
        &self.address
    }

    #[inline]
    pub fn key(&self) -> CredentialKey {
        (self.chain, self.account_index, self.address_index)
    }
}

pub type CredentialKey = (Network, u32, u32);

/// Insertion-ordered ledger with a key index and an address index.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    entries: Vec<GroupedCredential>,
    by_key: HashMap<CredentialKey, usize>,
    by_address: HashMap<String, usize>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild both indexes from a persisted list. Later duplicates are dropped.
    pub fn from_credentials(credentials: Vec<GroupedCredential>) -> Self {
        let mut store = Self::new();
        for credential in credentials {
            store.insert(credential);
        }
        store
    }

    /// Append `credential` unless its key or its address is already present.
    ///
    /// Returns `true` when the ledger grew.
    pub fn insert(&mut self, credential: GroupedCredential) -> bool {
        let key = credential.key();
        if self.by_key.contains_key(&key) || self.by_address.contains_key(&credential.address) {
            return false;
        }

        let position = self.entries.len();
        self.by_key.insert(key, position);
        self.by_address.insert(credential.address.clone(), position);
        self.entries.push(credential);
        true
    }

    pub fn contains(&self, key: &CredentialKey) -> bool {
        self.by_key.contains_key(key)
    }

    pub fn get(&self, key: &CredentialKey) -> Option<&GroupedCredential> {
        self.by_key.get(key).map(|i| &self.entries[*i])
    }

    pub fn find_by_address(&self, address: &str) -> Option<&GroupedCredential> {
        self.by_address.get(address).map(|i| &self.entries[*i])
    }

    #[inline]
    pub fn as_slice(&self) -> &[GroupedCredential] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
