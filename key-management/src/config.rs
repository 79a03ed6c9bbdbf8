// key-management/src/config.rs
//
// Cấu hình cho key agent: metadata của snapshot + EVM chain dùng khi ký

use serde::{Deserialize, Serialize};

pub const DEFAULT_ISSUER: &str = "did:key:local";
pub const DEFAULT_CREDENTIAL_TYPES: [&str; 2] = ["VerifiableCredential", "EncryptedWallet"];

// Định nghĩa cấu hình chung cho các EVM Chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvmChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

// Helper để tạo nhanh config cho các mạng phổ biến
impl EvmChainConfig {
    pub fn ethereum() -> Self {
        Self {
            chain_id: 1,
            name: "Ethereum Mainnet".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }

    pub fn sepolia() -> Self {
        Self {
            chain_id: 11155111,
            name: "Ethereum Sepolia".to_string(),
            symbol: "ETH".to_string(),
            decimals: 18,
        }
    }

    pub fn bsc() -> Self {
        Self {
            chain_id: 56,
            name: "BNB Smart Chain".to_string(),
            symbol: "BNB".to_string(),
            decimals: 18,
        }
    }
}

impl Default for EvmChainConfig {
    fn default() -> Self {
        Self::ethereum()
    }
}

/// Agent-level settings.
///
/// Mọi field đều có default, nên `{}` là một config hợp lệ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KeyAgentConfig {
    /// Snapshot id, `urn:uuid:<v4>` unless given
    pub id: String,
    pub issuer: String,
    pub credential_type: Vec<String>,
    pub evm_chain: EvmChainConfig,
}

impl Default for KeyAgentConfig {
    fn default() -> Self {
        Self {
            id: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
            issuer: DEFAULT_ISSUER.to_string(),
            credential_type: DEFAULT_CREDENTIAL_TYPES.iter().map(|t| t.to_string()).collect(),
            evm_chain: EvmChainConfig::default(),
        }
    }
}

impl KeyAgentConfig {
    pub fn with_evm_chain(mut self, evm_chain: EvmChainConfig) -> Self {
        self.evm_chain = evm_chain;
        self
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.issuer = issuer.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KeyAgentConfig::default();
        assert!(config.id.starts_with("urn:uuid:"));
        assert_eq!(config.issuer, DEFAULT_ISSUER);
        assert_eq!(config.credential_type, vec!["VerifiableCredential", "EncryptedWallet"]);
        assert_eq!(config.evm_chain.chain_id, 1);
    }

    #[test]
    fn test_fresh_id_per_default() {
        assert_ne!(KeyAgentConfig::default().id, KeyAgentConfig::default().id);
    }

    #[test]
    fn test_empty_json_is_valid() {
        let config: KeyAgentConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.issuer, DEFAULT_ISSUER);
    }

    #[test]
    fn test_partial_json() {
        let config: KeyAgentConfig = serde_json::from_str(
            r#"{"issuer":"did:example:123","evmChain":{"chainId":11155111,"name":"Ethereum Sepolia","symbol":"ETH","decimals":18}}"#,
        )
        .unwrap();
        assert_eq!(config.issuer, "did:example:123");
        assert_eq!(config.evm_chain, EvmChainConfig::sepolia());
    }

    #[test]
    fn test_presets() {
        assert_eq!(EvmChainConfig::bsc().chain_id, 56);
        assert_eq!(EvmChainConfig::sepolia().symbol, "ETH");
    }
}
