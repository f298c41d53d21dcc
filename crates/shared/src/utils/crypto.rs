use anyhow::{Context, Result, anyhow};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use openssl::symm::{self, Cipher};

use crate::config::CryptoConfig;

/// AES-CBC cipher for card numbers at rest. The key and IV are fixed
/// process-wide, so encryption is deterministic: equal plaintexts always
/// produce equal ciphertexts, and the UNIQUE constraint on the stored
/// column keeps enforcing uniqueness of the underlying numbers. That costs
/// ciphertext indistinguishability and is accepted deliberately.
pub struct CardCipher {
    cipher: Cipher,
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl CardCipher {
    /// The key length selects AES-128/192/256; anything else is a fatal
    /// configuration error.
    pub fn new(config: &CryptoConfig) -> Result<Self> {
        let cipher = match config.key.len() {
            16 => Cipher::aes_128_cbc(),
            24 => Cipher::aes_192_cbc(),
            32 => Cipher::aes_256_cbc(),
            n => return Err(anyhow!("crypto key must be 16, 24 or 32 bytes, got {n}")),
        };

        let iv_len = cipher.iv_len().unwrap_or(0);
        if config.iv.len() != iv_len {
            return Err(anyhow!(
                "crypto IV must be {iv_len} bytes, got {}",
                config.iv.len()
            ));
        }

        Ok(Self {
            cipher,
            key: config.key.clone(),
            iv: config.iv.clone(),
        })
    }

    pub fn encrypt(&self, plain: &str) -> Result<String> {
        let raw = symm::encrypt(self.cipher, &self.key, Some(&self.iv), plain.as_bytes())
            .context("card number encryption failed")?;

        Ok(BASE64.encode(raw))
    }

    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        let raw = BASE64
            .decode(encoded)
            .context("stored card number is not valid base64")?;

        let plain = symm::decrypt(self.cipher, &self.key, Some(&self.iv), &raw)
            .context("card number decryption failed")?;

        String::from_utf8(plain).context("decrypted card number is not valid UTF-8")
    }
}
