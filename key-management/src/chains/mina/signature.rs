// key-management/src/chains/mina/signature.rs
//
// Signature envelope + network domain

use crate::error::{WalletError, WalletResult};
use mina_signer::{BaseField, NetworkId, ScalarField, Signature};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Mina network selector. Chọn signature domain cho Poseidon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

impl NetworkType {
    #[inline]
    pub fn network_id(self) -> NetworkId {
        match self {
            NetworkType::Mainnet => NetworkId::MAINNET,
            NetworkType::Testnet => NetworkId::TESTNET,
        }
    }

    #[inline]
    pub const fn signature_prefix(self) -> &'static str {
        match self {
            NetworkType::Mainnet => "MinaSignatureMainnet",
            NetworkType::Testnet => "CodaSignature",
        }
    }

    /// Account update body prefix (zkApp commitments).
    #[inline]
    pub const fn zkapp_body_prefix(self) -> &'static str {
        match self {
            NetworkType::Mainnet => "MainnetZkappBody",
            NetworkType::Testnet => "TestnetZkappBody",
        }
    }
}

/// Domain string for a `NetworkId`, shared by every signable Mina input.
pub(crate) fn domain_string(network_id: NetworkId) -> Option<String> {
    let network = match network_id {
        NetworkId::MAINNET => NetworkType::Mainnet,
        NetworkId::TESTNET => NetworkType::Testnet,
    };
    Some(network.signature_prefix().to_string())
}

/// Schnorr signature as decimal strings, `field` = r.x, `scalar` = s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinaSignature {
    pub field: String,
    pub scalar: String,
}

impl From<&Signature> for MinaSignature {
    fn from(sig: &Signature) -> Self {
        Self {
            field: sig.rx.to_string(),
            scalar: sig.s.to_string(),
        }
    }
}

impl MinaSignature {
    pub(crate) fn to_signature(&self) -> WalletResult<Signature> {
        let rx = BaseField::from_str(&self.field)
            .map_err(|_| WalletError::Validation("signature field is not a base field element".into()))?;
        let s = ScalarField::from_str(&self.scalar)
            .map_err(|_| WalletError::Validation("signature scalar is not a scalar field element".into()))?;
        Ok(Signature { rx, s })
    }
}

/// Signed envelope: the data as given, the signer's address and signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signed<T> {
    pub data: T,
    pub public_key: String,
    pub signature: MinaSignature,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_domains() {
        assert_eq!(
            domain_string(NetworkType::Testnet.network_id()).as_deref(),
            Some("CodaSignature")
        );
        assert_eq!(
            domain_string(NetworkType::Mainnet.network_id()).as_deref(),
            Some("MinaSignatureMainnet")
        );
    }

    #[test]
    fn test_network_type_serde() {
        assert_eq!(serde_json::to_string(&NetworkType::Testnet).unwrap(), "\"testnet\"");
        let parsed: NetworkType = serde_json::from_str("\"mainnet\"").unwrap();
        assert_eq!(parsed, NetworkType::Mainnet);
    }

    #[test]
    fn test_signature_strings_roundtrip() {
        let sig = MinaSignature {
            field: "12345".to_string(),
            scalar: "678".to_string(),
        };
        let parsed = sig.to_signature().unwrap();
        assert_eq!(MinaSignature::from(&parsed), sig);
    }

    #[test]
    fn test_signature_rejects_garbage() {
        let sig = MinaSignature {
            field: "not a number".to_string(),
            scalar: "1".to_string(),
        };
        assert!(matches!(sig.to_signature(), Err(WalletError::Validation(_))));
    }
}
