// key-management/src/error.rs
//
// Error taxonomy cho toàn bộ key agent.
// Mỗi lỗi đều typed, không có lỗi nào bị nuốt im lặng.

use thiserror::Error;

pub type WalletResult<T> = std::result::Result<T, WalletError>;

/// Coarse error classification exposed to the orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Derivation,
    UnsupportedPayload,
    PassphraseProvider,
    Internal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Mnemonic Error: {0}")]
    Mnemonic(#[from] MnemonicError),

    #[error("Cryptography Error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Derivation Error: {0}")]
    Derivation(#[from] DerivationError),

    #[error("Validation Error: {0}")]
    Validation(String),

    /// Wrong passphrase or tampered ciphertext. Deliberately carries no detail.
    #[error("Authentication failed")]
    Authentication,

    #[error("Unsupported payload: {chain} cannot sign '{kind}'")]
    UnsupportedPayload { chain: String, kind: String },

    /// The host passphrase callback failed or was cancelled. The cause is not kept.
    #[error("Passphrase provider failed")]
    PassphraseProvider,

    #[error("Invalid agent state: expected {expected}, found {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Serialization Error: {0}")]
    Serialization(String),
}

impl WalletError {
    /// Map every variant onto the five-way taxonomy (plus `Internal`).
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::Mnemonic(_) | WalletError::Validation(_) => ErrorKind::Validation,
            WalletError::InvalidState { .. } => ErrorKind::Validation,
            WalletError::Authentication => ErrorKind::Authentication,
            WalletError::Derivation(_) => ErrorKind::Derivation,
            WalletError::Crypto(CryptoError::DerivationFailed(_)) => ErrorKind::Derivation,
            WalletError::UnsupportedPayload { .. } => ErrorKind::UnsupportedPayload,
            WalletError::PassphraseProvider => ErrorKind::PassphraseProvider,
            WalletError::Crypto(_) | WalletError::Serialization(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn unsupported(chain: impl Into<String>, kind: impl Into<String>) -> Self {
        WalletError::UnsupportedPayload {
            chain: chain.into(),
            kind: kind.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("Invalid word count: {0}. Expected 12, 15, 18, 21 or 24 words.")]
    InvalidWordCount(usize),

    #[error("Word '{0}' not found in the BIP39 wordlist.")]
    UnknownWord(String),

    #[error("Checksum validation failed.")]
    ChecksumFailed,

    #[error("BIP39 internal error: {0}")]
    Bip39Error(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DerivationError {
    #[error("missing chain-specific argument '{0}'")]
    MissingArgument(&'static str),

    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },
}
