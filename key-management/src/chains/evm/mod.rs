// key-management/src/chains/evm/mod.rs

//! Ethereum Support
//!
//! - **Address Derivation**: EIP-55 checksummed address via [`EvmAddress`], path `m/44'/60'/account'/0/index`.
//! - **Signing**: Transactions (EIP-155/1559/2930), messages (EIP-191) and raw hashes via [`EvmSigner`].
//! - **Verification**: signer recovery via [`verify_message`], [`verify_hash`], [`recover_transaction_signer`].

pub mod address;
pub mod payload;
pub mod signer;

// Re-exports for cleaner API access
pub use address::EvmAddress;
pub use payload::{EthereumPayload, EthereumSignable, EthereumSignatureResult, EthereumSpecificArgs};
pub use signer::{recover_transaction_signer, verify_hash, verify_message, EvmSigner};
