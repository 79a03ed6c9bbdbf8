// key-management/src/crypto/mod.rs

//! Core Cryptography Module
//!
//! - **Mnemonic**: BIP-39 phrases (12-24 words) via [`WalletMnemonic`].
//! - **Key Derivation**: BIP-32 secp256k1 derivation shared by every chain via [`KeyDeriver`].
//! - **Derivation Paths**: BIP-44 and EIP-2645 path builders via [`DerivationPaths`].
//! - **EMIP-3**: passphrase encryption of the seed via [`emip3::encrypt`] / [`emip3::decrypt`].

pub mod emip3;
pub mod key_deriver;
pub mod mnemonic;
pub mod paths;

// Re-exports for cleaner API access
pub use emip3::EncryptedSeed;
pub use key_deriver::{DerivedKey, KeyDeriver};
pub use mnemonic::{WalletMnemonic, WordCount};
pub use paths::DerivationPaths;
