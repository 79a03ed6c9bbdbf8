// key-management/src/chains/evm/signer.rs
//
// Ethereum Signer - Offline Signing
// Hỗ trợ: EIP-155 (Replay Protection), EIP-191 (Personal Sign), EIP-1559/2930/2718

use crate::error::{CryptoError, WalletError, WalletResult};
use alloy::{
    consensus::{transaction::SignerRecoverable, TxEnvelope},
    eips::eip2718::{Decodable2718, Encodable2718},
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Signature, B256},
    rpc::types::eth::TransactionRequest,
    signers::{local::LocalSigner, Signer, SignerSync},
};
use k256::ecdsa::SigningKey;

/// Ethereum Signer
///
/// # Security Architecture
/// - **ZeroizeOnDrop**: `SigningKey` tự động ghi đè bộ nhớ bằng 0 khi Drop
/// - **Replay Protection**: Chain ID bắt buộc (EIP-155)
/// - **No Debug Leak**: Custom Debug impl không hiển thị private key
pub struct EvmSigner {
    signer: LocalSigner<SigningKey>,
    address: Address,
    chain_id: u64,
}

// Custom Debug - KHÔNG BAO GIỜ hiển thị private key
impl std::fmt::Debug for EvmSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmSigner")
            .field("address", &self.address)
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}

impl EvmSigner {
    /// Khởi tạo Signer với Private Key và Chain ID
    ///
    /// # Arguments
    /// * `priv_key` - Private key 32 bytes
    /// * `chain_id` - Chain ID (1 = Ethereum, 11155111 = Sepolia, 56 = BSC, ...)
    pub fn new(priv_key: &[u8], chain_id: u64) -> WalletResult<Self> {
        let signing_key = SigningKey::from_slice(priv_key).map_err(|e| {
            WalletError::Crypto(CryptoError::InvalidKeyFormat(format!(
                "Invalid private key (must be 32 bytes): {}",
                e
            )))
        })?;

        let signer = LocalSigner::from(signing_key).with_chain_id(Some(chain_id));
        let address = signer.address();

        Ok(Self {
            signer,
            address,
            chain_id,
        })
    }

    #[inline]
    pub fn address(&self) -> Address {
        self.address
    }

    #[inline]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    // =========================================================================
    // TRANSACTION SIGNING (EIP-155, EIP-1559, EIP-2930)
    // =========================================================================

    /// Ký giao dịch Offline và trả về Raw Bytes (EIP-2718 envelope)
    ///
    /// Thiếu `chain_id` thì dùng chain id của signer.
    pub async fn sign_transaction(&self, tx: TransactionRequest) -> WalletResult<Vec<u8>> {
        let tx = if tx.chain_id.is_none() {
            tx.with_chain_id(self.chain_id)
        } else {
            tx
        };
        let wallet = EthereumWallet::from(self.signer.clone());

        let envelope = tx
            .build(&wallet)
            .await
            .map_err(|e| WalletError::Crypto(CryptoError::SigningFailed(e.to_string())))?;

        Ok(envelope.encoded_2718())
    }

    // =========================================================================
    // MESSAGE + HASH SIGNING
    // =========================================================================

    /// EIP-191 Personal Sign: "\x19Ethereum Signed Message:\n{len}{message}"
    pub fn sign_message(&self, message: &[u8]) -> WalletResult<Signature> {
        self.signer
            .sign_message_sync(message)
            .map_err(|e| WalletError::Crypto(CryptoError::SigningFailed(e.to_string())))
    }

    /// Ký hash trực tiếp (32 bytes)
    ///
    /// # Warning
    /// Chỉ sử dụng khi bạn đã tự hash dữ liệu theo chuẩn phù hợp.
    pub fn sign_hash(&self, hash: &B256) -> WalletResult<Signature> {
        self.signer
            .sign_hash_sync(hash)
            .map_err(|e| WalletError::Crypto(CryptoError::SigningFailed(e.to_string())))
    }
}

// =============================================================================
// VERIFICATION (no key needed)
// =============================================================================

/// EIP-191 recovery check.
pub fn verify_message(address: &str, message: &[u8], signature: &Signature) -> bool {
    match address.parse::<Address>() {
        Ok(expected) => signature
            .recover_address_from_msg(message)
            .map(|recovered| recovered == expected)
            .unwrap_or(false),
        Err(_) => false,
    }
}

pub fn verify_hash(address: &str, hash: &B256, signature: &Signature) -> bool {
    match address.parse::<Address>() {
        Ok(expected) => signature
            .recover_address_from_prehash(hash)
            .map(|recovered| recovered == expected)
            .unwrap_or(false),
        Err(_) => false,
    }
}

/// Decode a raw EIP-2718 transaction and recover its sender.
pub fn recover_transaction_signer(raw: &[u8]) -> WalletResult<Address> {
    let mut buf = raw;
    let envelope = TxEnvelope::decode_2718(&mut buf)
        .map_err(|e| WalletError::Validation(format!("Invalid raw transaction: {}", e)))?;
    envelope
        .recover_signer()
        .map_err(|e| WalletError::Validation(format!("Cannot recover transaction signer: {}", e)))
}

// =============================================================================
// UNIT TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    const TEST_PRIVATE_KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const TEST_CHAIN_ID: u64 = 31337; // Anvil/Hardhat

    fn create_test_signer() -> EvmSigner {
        let priv_key = hex::decode(TEST_PRIVATE_KEY).unwrap();
        EvmSigner::new(&priv_key, TEST_CHAIN_ID).expect("Create signer")
    }

    #[test]
    fn test_address_derivation() {
        let signer = create_test_signer();
        let expected: Address = TEST_ADDRESS.parse().unwrap();
        assert_eq!(signer.address(), expected);
    }

    #[test]
    fn test_sign_message() {
        let signer = create_test_signer();
        let message = b"Hello, Ethereum!";
        let signature = signer.sign_message(message).expect("Sign message");
        assert!(verify_message(TEST_ADDRESS, message, &signature));
        assert!(!verify_message(TEST_ADDRESS, b"other", &signature));
    }

    #[test]
    fn test_sign_hash() {
        let signer = create_test_signer();
        let hash = B256::repeat_byte(0x42);
        let signature = signer.sign_hash(&hash).expect("Sign hash");
        assert!(verify_hash(TEST_ADDRESS, &hash, &signature));
    }

    #[tokio::test]
    async fn test_sign_transaction_recovers_sender() {
        let signer = create_test_signer();

        let tx = TransactionRequest::default()
            .with_to(
                "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
                    .parse()
                    .unwrap(),
            )
            .with_value(U256::from(1_000_000_000_000_000_000u128)) // 1 ETH
            .with_nonce(0)
            .with_gas_limit(21000)
            .with_gas_price(1_000_000_000);

        let raw_tx = signer.sign_transaction(tx).await.expect("Sign tx");
        println!("Signed TX: 0x{}", hex::encode(&raw_tx));

        let sender = recover_transaction_signer(&raw_tx).unwrap();
        assert_eq!(sender, signer.address());
    }

    #[test]
    fn test_invalid_private_key() {
        let invalid_key = [0u8; 31];
        assert!(EvmSigner::new(&invalid_key, 1).is_err());
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let signer = create_test_signer();
        let debug_output = format!("{:?}", signer);
        assert!(!debug_output.contains(TEST_PRIVATE_KEY));
        assert!(debug_output.contains("EvmSigner"));
    }
}
