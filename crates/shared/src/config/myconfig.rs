use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub crypto: CryptoConfig,
    pub card: CardConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("Missing env: DATABASE_URL")?;
        let run_migrations_str =
            std::env::var("RUN_MIGRATIONS").context("Missing env: RUN_MIGRATIONS")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{other}'",
                ));
            }
        };

        Ok(Self {
            database_url,
            run_migrations,
            crypto: CryptoConfig::from_env()?,
            card: CardConfig::from_env()?,
        })
    }
}

/// Key material for the card-number cipher. Read once at startup and never
/// mutated afterwards; every component that encrypts or decrypts shares the
/// same key and IV so ciphertexts stay comparable.
#[derive(Debug, Clone)]
pub struct CryptoConfig {
    pub key: Vec<u8>,
    pub iv: Vec<u8>,
}

impl CryptoConfig {
    pub fn from_env() -> Result<Self> {
        let key = std::env::var("CRYPTO_KEY").context("Missing env: CRYPTO_KEY")?;
        let iv = std::env::var("CRYPTO_IV").context("Missing env: CRYPTO_IV")?;

        Ok(Self {
            key: key.into_bytes(),
            iv: iv.into_bytes(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct CardConfig {
    /// Bank identification number, the fixed 6-digit prefix of every
    /// generated card number.
    pub bin: String,
}

impl CardConfig {
    pub fn from_env() -> Result<Self> {
        let bin = std::env::var("CARD_BIN").context("Missing env: CARD_BIN")?;

        if bin.len() != 6 || !bin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(anyhow!("CARD_BIN must be exactly 6 digits, got '{bin}'"));
        }

        Ok(Self { bin })
    }
}
