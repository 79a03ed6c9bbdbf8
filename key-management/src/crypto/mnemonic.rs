// key-management/src/crypto/mnemonic.rs
//
// Mnemonic Module - BIP-39 Implementation
// Chuẩn: BIP-39 (Mnemonic), PBKDF2-HMAC-SHA512 (Seed Derivation)
//
// Mnemonic chỉ tồn tại tạm thời trong lúc khởi tạo agent, sau đó bị xóa.

use crate::error::{MnemonicError, WalletError, WalletResult};
use bip39::{Language, Mnemonic};
use rand::{rngs::OsRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Số lượng words hỗ trợ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCount {
    /// 12 words (128-bit entropy)
    Twelve = 12,
    /// 15 words (160-bit entropy)
    Fifteen = 15,
    /// 18 words (192-bit entropy)
    Eighteen = 18,
    /// 21 words (224-bit entropy)
    TwentyOne = 21,
    /// 24 words (256-bit entropy)
    TwentyFour = 24,
}

impl WordCount {
    /// Lấy số bytes entropy cần thiết
    #[inline]
    pub const fn entropy_bytes(self) -> usize {
        match self {
            WordCount::Twelve => 16,
            WordCount::Fifteen => 20,
            WordCount::Eighteen => 24,
            WordCount::TwentyOne => 28,
            WordCount::TwentyFour => 32,
        }
    }
}

/// Wallet Mnemonic - BIP-39 phrase validated against the English wordlist
///
/// # Security
/// - **ZeroizeOnDrop**: phrase được ghi đè bằng 0 khi drop
/// - **CSPRNG**: entropy lấy từ `OsRng`
/// - **No Debug Leak**: Debug không hiển thị phrase
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WalletMnemonic {
    phrase: String,
    word_count: usize,
}

impl std::fmt::Debug for WalletMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletMnemonic")
            .field("word_count", &self.word_count)
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

impl WalletMnemonic {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Generate a fresh mnemonic with the requested number of words.
    pub fn generate(word_count: WordCount) -> WalletResult<Self> {
        let entropy_size = word_count.entropy_bytes();

        let mut entropy = [0u8; 32];
        OsRng.fill_bytes(&mut entropy[..entropy_size]);

        let result = Mnemonic::from_entropy_in(Language::English, &entropy[..entropy_size]);
        entropy.zeroize();

        let mnemonic = result.map_err(|e| MnemonicError::Bip39Error(e.to_string()))?;

        Ok(Self {
            phrase: mnemonic.to_string(),
            word_count: word_count as usize,
        })
    }

    /// Khôi phục mnemonic từ phrase có sẵn
    ///
    /// # Validation
    /// - Kiểm tra số lượng words (12, 15, 18, 21, 24)
    /// - Kiểm tra từng word có trong BIP-39 wordlist
    /// - Kiểm tra checksum
    pub fn from_phrase(phrase: &str) -> WalletResult<Self> {
        let normalized = phrase.split_whitespace().collect::<Vec<_>>();
        let count = normalized.len();

        if !matches!(count, 12 | 15 | 18 | 21 | 24) {
            return Err(WalletError::Mnemonic(MnemonicError::InvalidWordCount(
                count,
            )));
        }

        let normalized_phrase = normalized.join(" ");
        Mnemonic::parse_in(Language::English, &normalized_phrase).map_err(|e| match e {
            bip39::Error::UnknownWord(index) => MnemonicError::UnknownWord(
                normalized.get(index).map(|w| w.to_string()).unwrap_or_default(),
            ),
            bip39::Error::InvalidChecksum => MnemonicError::ChecksumFailed,
            bip39::Error::BadWordCount(n) => MnemonicError::InvalidWordCount(n),
            other => MnemonicError::Bip39Error(other.to_string()),
        })?;

        Ok(Self {
            phrase: normalized_phrase,
            word_count: count,
        })
    }

    /// Build from individual words (the shape a mnemonic input form produces).
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> WalletResult<Self> {
        let phrase = Zeroizing::new(
            words
                .iter()
                .map(|w| w.as_ref().trim())
                .collect::<Vec<_>>()
                .join(" "),
        );
        Self::from_phrase(&phrase)
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    /// Lấy mnemonic phrase
    ///
    /// # Warning
    /// Cẩn thận khi hiển thị hoặc log giá trị này!
    #[inline]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    #[inline]
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn words(&self) -> Vec<&str> {
        self.phrase.split_whitespace().collect()
    }

    // =========================================================================
    // SEED DERIVATION
    // =========================================================================

    /// Derive the 64-byte BIP-39 seed (PBKDF2-HMAC-SHA512, 2048 rounds).
    ///
    /// # Arguments
    /// * `passphrase` - Optional BIP-39 second factor
    ///
    /// Passphrase khác với password mã hóa. Mất passphrase thì không thể khôi phục ví.
    pub fn to_seed(&self, passphrase: Option<&str>) -> WalletResult<Zeroizing<[u8; 64]>> {
        let mnemonic = Mnemonic::parse_in(Language::English, &self.phrase)
            .map_err(|e| MnemonicError::Bip39Error(e.to_string()))?;
        Ok(Zeroizing::new(mnemonic.to_seed(passphrase.unwrap_or(""))))
    }

    // =========================================================================
    // VALIDATION
    // =========================================================================

    /// Full validation: word count, wordlist, checksum
    #[inline]
    pub fn validate(phrase: &str) -> bool {
        Self::from_phrase(phrase).is_ok()
    }

    /// Kiểm tra một từ có trong BIP-39 English wordlist không
    pub fn is_valid_word(word: &str) -> bool {
        Language::English.find_word(word).is_some()
    }

    pub fn strength_bits(&self) -> usize {
        match self.word_count {
            12 => 128,
            15 => 160,
            18 => 192,
            21 => 224,
            24 => 256,
            _ => 0,
        }
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================
