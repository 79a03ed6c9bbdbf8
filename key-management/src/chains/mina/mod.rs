// key-management/src/chains/mina/mod.rs

//! Mina Protocol Support
//!
//! - **Keys**: BIP-44 path `m/44'/12586'/account'/0/index`, secp256k1 child key
//!   folded into the Pallas scalar field, base58check `B62q...` addresses.
//! - **Signing**: Schnorr over Pallas via `mina-signer`, four payload kinds:
//!   payment/delegation transactions and strings (legacy Poseidon),
//!   field arrays and zkApp commands (Kimchi Poseidon).
//! - **Verification**: [`verify`] re-checks every signed envelope with the
//!   `mina-signer` verifier, independently of the agent.

pub mod keys;
pub mod message;
pub mod payload;
pub mod signature;
pub mod transaction;
pub mod verify;
pub mod zkapp;

pub use keys::MinaKeyPair;
pub use payload::{MinaPayload, MinaSignable, MinaSignatureResult, MinaSpecificArgs};
pub use signature::{MinaSignature, NetworkType, Signed};
pub use transaction::{TransactionBody, TransactionKind};
pub use zkapp::{AccountUpdate, AccountUpdateBody, FeePayer, FeePayerBody, SignedZkAppCommand, ZkAppCommand};
