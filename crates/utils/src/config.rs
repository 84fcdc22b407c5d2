use clap::Parser;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::warn;

use crate::errors::{AppError, AppResult};

#[derive(clap::ValueEnum, Clone, Debug, Copy)]
#[clap(rename_all = "lowercase")]
pub enum CargoEnv {
    Development,
    Production,
}

/// Environment file loader
pub struct EnvLoader;

impl EnvLoader {
    /// Loads the env file that matches CARGO_ENV, falling back to plain .env
    pub fn load_env_file() -> Result<(), Box<dyn std::error::Error>> {
        let cargo_env = std::env::var("CARGO_ENV").unwrap_or_else(|_| "development".to_string());
        let env_file = match cargo_env.as_str() {
            "production" | "Production" | "prod" => ".env.production",
            "development" | "Development" | "dev" => ".env.development",
            "test" | "Test" => ".env.test",
            _ => {
                println!("⚠️  unknown CARGO_ENV: {}, defaulting to .env.development", cargo_env);
                ".env.development"
            }
        };
        if !std::path::Path::new(env_file).exists() {
            if std::path::Path::new(".env").exists() {
                dotenvy::from_filename(".env")?;
                println!("✅ loaded env file: .env");
            } else {
                eprintln!("❌ no env file found, relying on process environment");
            }
            return Ok(());
        }

        dotenvy::from_filename(env_file)?;
        println!("✅ loaded env file: {} (CARGO_ENV={})", env_file, cargo_env);

        Ok(())
    }
}

#[derive(clap::Parser, Clone)]
pub struct AppConfig {
    #[clap(long, env, value_enum, default_value = "development")]
    pub cargo_env: CargoEnv,

    #[clap(long, env, default_value = "0.0.0.0")]
    pub app_host: String,

    #[clap(long, env, default_value = "8000")]
    pub app_port: u16,

    #[clap(long, env, default_value = "mongodb://localhost:27017")]
    pub mongo_uri: String,

    #[clap(long, env, default_value = "faucet")]
    pub mongo_db: String,

    /// Mainnet read endpoint backing the anti-sybil balance gate
    #[clap(long, env)]
    pub ethereum_mainnet_rpc: String,

    /// Testnet endpoint the faucet pays out on
    #[clap(long, env)]
    pub sepolia_rpc: String,

    #[clap(long, env, default_value = "11155111")]
    pub target_chain_id: u64,

    /// Comma-separated hot wallet keys, each 0x-prefixed 64 hex chars
    #[clap(long, env)]
    pub treasury_private_keys: String,

    #[clap(long, env)]
    pub twitter_bearer_token: String,

    /// Minimum mainnet ETH a wallet must hold before it may claim
    #[clap(long, env, default_value = "0.0025")]
    pub min_mainnet_balance: String,

    #[clap(long, env, default_value = "5")]
    pub cooldown_minutes: i64,

    #[clap(long, env, default_value = "3")]
    pub daily_claim_limit: u64,

    /// Amount of Sepolia ETH paid per approved claim
    #[clap(long, env, default_value = "0.05")]
    pub faucet_amount: String,

    /// Total Sepolia ETH the faucet may pay out per UTC day
    #[clap(long, env, default_value = "1.0")]
    pub daily_budget: String,

    /// Phrase a proof tweet must contain verbatim
    #[clap(long, env, default_value = "I'm claiming Sepolia ETH from the faucet")]
    pub claim_marker_phrase: String,

    #[clap(long, env, default_value = "info")]
    pub rust_log: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        EnvLoader::load_env_file().ok();
        AppConfig::parse()
    }
}

impl AppConfig {
    /// Manual construction for tests, no env parsing involved
    pub fn new_for_test() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            app_host: "0.0.0.0".to_string(),
            app_port: 8765,
            mongo_uri: std::env::var("MONGO_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db: std::env::var("MONGO_DB").unwrap_or_else(|_| "test_db".to_string()),
            ethereum_mainnet_rpc: "https://eth.example.com/rpc".to_string(),
            sepolia_rpc: "https://sepolia.example.com/rpc".to_string(),
            target_chain_id: 11155111,
            treasury_private_keys:
                "0x0000000000000000000000000000000000000000000000000000000000000001,0x0000000000000000000000000000000000000000000000000000000000000002"
                    .to_string(),
            twitter_bearer_token: "test-bearer-token".to_string(),
            min_mainnet_balance: "0.0025".to_string(),
            cooldown_minutes: 5,
            daily_claim_limit: 3,
            faucet_amount: "0.05".to_string(),
            daily_budget: "1.0".to_string(),
            claim_marker_phrase: "I'm claiming Sepolia ETH from the faucet".to_string(),
            rust_log: "info".to_string(),
        }
    }
}

pub const PLACEHOLDER_RPC_KEY: &str = "YOUR_API_KEY";
pub const PLACEHOLDER_PRIVATE_KEY: &str = "YOUR_PRIVATE_KEY";
pub const PLACEHOLDER_BEARER_TOKEN: &str = "your_twitter_bearer_token";

/// Validated faucet policy, built once at startup and shared immutably.
///
/// Construction collects every problem it finds and reports them in one
/// error, so a broken deployment shows the whole repair list at once
/// instead of failing one variable at a time.
#[derive(Debug, Clone)]
pub struct FaucetParams {
    pub min_mainnet_balance: Decimal,
    pub cooldown_minutes: i64,
    pub daily_claim_limit: u64,
    pub faucet_amount: Decimal,
    pub daily_budget: Decimal,
    pub marker_phrase: String,
    pub mainnet_rpc: String,
    pub sepolia_rpc: String,
    pub target_chain_id: u64,
    pub treasury_private_keys: Vec<String>,
    pub twitter_bearer_token: String,
}

impl FaucetParams {
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let mut errors: Vec<String> = Vec::new();

        let min_mainnet_balance =
            parse_positive_decimal(&config.min_mainnet_balance, "MIN_MAINNET_BALANCE", &mut errors);
        let faucet_amount =
            parse_positive_decimal(&config.faucet_amount, "FAUCET_AMOUNT", &mut errors);
        let daily_budget =
            parse_positive_decimal(&config.daily_budget, "DAILY_BUDGET", &mut errors);

        if config.cooldown_minutes < 1 {
            errors.push("COOLDOWN_MINUTES must be a positive integer".to_string());
        }
        if config.daily_claim_limit < 1 {
            errors.push("DAILY_CLAIM_LIMIT must be a positive integer".to_string());
        }
        if config.claim_marker_phrase.trim().is_empty() {
            errors.push("CLAIM_MARKER_PHRASE must not be empty".to_string());
        }

        check_rpc_endpoint(&config.ethereum_mainnet_rpc, "ETHEREUM_MAINNET_RPC", &mut errors);
        check_rpc_endpoint(&config.sepolia_rpc, "SEPOLIA_RPC", &mut errors);

        if config.target_chain_id == 0 {
            errors.push("TARGET_CHAIN_ID must be a non-zero chain id".to_string());
        }

        let treasury_private_keys = parse_treasury_keys(&config.treasury_private_keys, &mut errors);

        let bearer = config.twitter_bearer_token.trim();
        if bearer.is_empty() || bearer == PLACEHOLDER_BEARER_TOKEN {
            errors.push("TWITTER_BEARER_TOKEN is not set or still holds the placeholder".to_string());
        }

        if !errors.is_empty() {
            return Err(AppError::Configuration(format!(
                "Invalid faucet configuration: {}",
                errors.join("; ")
            )));
        }

        // unwraps are safe, a None pushed an error above
        let min_mainnet_balance = min_mainnet_balance.ok_or_else(config_bug)?;
        let faucet_amount = faucet_amount.ok_or_else(config_bug)?;
        let daily_budget = daily_budget.ok_or_else(config_bug)?;

        if treasury_private_keys.len() == 1 {
            warn!("⚠️ only one treasury wallet configured, no failover if it runs dry");
        }
        if daily_budget < faucet_amount {
            warn!(
                "⚠️ DAILY_BUDGET {} is below FAUCET_AMOUNT {}, every claim will be refused",
                daily_budget, faucet_amount
            );
        }

        Ok(Self {
            min_mainnet_balance,
            cooldown_minutes: config.cooldown_minutes,
            daily_claim_limit: config.daily_claim_limit,
            faucet_amount,
            daily_budget,
            marker_phrase: config.claim_marker_phrase.trim().to_string(),
            mainnet_rpc: config.ethereum_mainnet_rpc.clone(),
            sepolia_rpc: config.sepolia_rpc.clone(),
            target_chain_id: config.target_chain_id,
            treasury_private_keys,
            twitter_bearer_token: bearer.to_string(),
        })
    }

    pub fn cooldown_seconds(&self) -> i64 {
        self.cooldown_minutes * 60
    }
}

fn config_bug() -> AppError {
    AppError::Configuration("faucet configuration validation lost an error".to_string())
}

fn parse_positive_decimal(raw: &str, name: &str, errors: &mut Vec<String>) -> Option<Decimal> {
    match Decimal::from_str(raw.trim()) {
        Ok(value) if value > Decimal::ZERO => Some(value),
        Ok(_) => {
            errors.push(format!("{} must be greater than zero, got {}", name, raw));
            None
        }
        Err(_) => {
            errors.push(format!("{} is not a valid decimal number: {}", name, raw));
            None
        }
    }
}

fn check_rpc_endpoint(url: &str, name: &str, errors: &mut Vec<String>) {
    let url = url.trim();
    if url.is_empty() {
        errors.push(format!("{} is not set", name));
        return;
    }
    if url.contains(PLACEHOLDER_RPC_KEY) {
        errors.push(format!("{} still holds the {} placeholder", name, PLACEHOLDER_RPC_KEY));
        return;
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        errors.push(format!("{} must be an http(s) URL, got {}", name, url));
    }
}

fn parse_treasury_keys(raw: &str, errors: &mut Vec<String>) -> Vec<String> {
    let candidates: Vec<&str> = raw.split(',').map(str::trim).filter(|k| !k.is_empty()).collect();
    if candidates.is_empty() {
        errors.push("TREASURY_PRIVATE_KEYS is not set".to_string());
        return Vec::new();
    }

    let mut keys = Vec::with_capacity(candidates.len());
    for (i, key) in candidates.iter().enumerate() {
        let position = i + 1;
        if key.contains(PLACEHOLDER_PRIVATE_KEY) {
            errors.push(format!("treasury key #{} still holds the placeholder", position));
            continue;
        }
        if !key.starts_with("0x") {
            errors.push(format!("treasury key #{} must start with 0x", position));
            continue;
        }
        if key.len() != 66 {
            errors.push(format!(
                "treasury key #{} has invalid length {}, expected 66 characters",
                position,
                key.len()
            ));
            continue;
        }
        if !key[2..].chars().all(|c| c.is_ascii_hexdigit()) {
            errors.push(format!("treasury key #{} is not valid hex", position));
            continue;
        }
        keys.push((*key).to_string());
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_builds_params() {
        let config = AppConfig::new_for_test();
        let params = FaucetParams::from_config(&config).unwrap();

        assert_eq!(params.min_mainnet_balance, Decimal::from_str("0.0025").unwrap());
        assert_eq!(params.cooldown_minutes, 5);
        assert_eq!(params.cooldown_seconds(), 300);
        assert_eq!(params.daily_claim_limit, 3);
        assert_eq!(params.treasury_private_keys.len(), 2);
        assert_eq!(params.target_chain_id, 11155111);
    }

    #[test]
    fn placeholder_rpc_key_is_rejected() {
        let mut config = AppConfig::new_for_test();
        config.ethereum_mainnet_rpc = "https://mainnet.infura.io/v3/YOUR_API_KEY".to_string();

        let err = FaucetParams::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("ETHEREUM_MAINNET_RPC"));
    }

    #[test]
    fn malformed_treasury_key_is_rejected() {
        let mut config = AppConfig::new_for_test();
        config.treasury_private_keys = "0x1234".to_string();

        let err = FaucetParams::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("invalid length"));
    }

    #[test]
    fn key_without_prefix_is_rejected() {
        let mut config = AppConfig::new_for_test();
        config.treasury_private_keys =
            "0000000000000000000000000000000000000000000000000000000000000001".to_string();

        let err = FaucetParams::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("must start with 0x"));
    }

    #[test]
    fn all_problems_are_reported_together() {
        let mut config = AppConfig::new_for_test();
        config.min_mainnet_balance = "abc".to_string();
        config.cooldown_minutes = 0;
        config.twitter_bearer_token = PLACEHOLDER_BEARER_TOKEN.to_string();

        let err = FaucetParams::from_config(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("MIN_MAINNET_BALANCE"));
        assert!(message.contains("COOLDOWN_MINUTES"));
        assert!(message.contains("TWITTER_BEARER_TOKEN"));
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let mut config = AppConfig::new_for_test();
        config.faucet_amount = "0".to_string();

        let err = FaucetParams::from_config(&config).unwrap_err();
        assert!(err.to_string().contains("FAUCET_AMOUNT must be greater than zero"));
    }
}
