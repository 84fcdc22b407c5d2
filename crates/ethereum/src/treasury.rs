use async_trait::async_trait;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, TransactionRequest, U256, U64};
use ethers::utils::{parse_ether, to_checksum};
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info};
use utils::{AppError, AppResult};

/// Client-facing text for every failed payout, causes stay in the log
const SEND_FAILED: &str = "Failed to send ETH. Please try again later.";

pub type DynTreasury = Arc<dyn TreasuryTrait + Send + Sync>;
pub type DynKeySelector = Arc<dyn KeySelectorTrait + Send + Sync>;

/// A confirmed on-chain payout
#[derive(Debug, Clone)]
pub struct Distribution {
    pub tx_hash: String,
    pub source_address: String,
}

#[async_trait]
pub trait TreasuryTrait {
    /// Sends the configured amount to the recipient and waits for inclusion
    async fn distribute(&self, recipient: &str) -> AppResult<Distribution>;
}

/// Decides which hot wallet signs the next payout
pub trait KeySelectorTrait {
    fn select(&self, key_count: usize) -> usize;
}

/// Spreads payouts uniformly across the configured wallets
pub struct UniformRandomSelector;

impl KeySelectorTrait for UniformRandomSelector {
    fn select(&self, key_count: usize) -> usize {
        rand::thread_rng().gen_range(0..key_count)
    }
}

pub struct HotWalletTreasury {
    provider: Provider<Http>,
    wallets: Vec<LocalWallet>,
    amount_wei: U256,
    amount_eth: Decimal,
    selector: DynKeySelector,
}

impl std::fmt::Debug for HotWalletTreasury {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotWalletTreasury")
            .field("provider", &self.provider)
            .field("wallets", &self.wallets)
            .field("amount_wei", &self.amount_wei)
            .field("amount_eth", &self.amount_eth)
            .finish_non_exhaustive()
    }
}

impl HotWalletTreasury {
    /// Fails outright on any unusable key or endpoint, a faucet that would
    /// discover a broken signer on its first payout helps nobody.
    pub fn new(
        rpc_url: &str,
        private_keys: &[String],
        amount_eth: Decimal,
        chain_id: u64,
        selector: DynKeySelector,
    ) -> AppResult<Self> {
        if private_keys.is_empty() {
            return Err(AppError::Configuration(
                "TREASURY_PRIVATE_KEYS holds no usable key".to_string(),
            ));
        }

        let provider = Provider::<Http>::try_from(rpc_url).map_err(|e| {
            AppError::Configuration(format!("Cannot build testnet provider from SEPOLIA_RPC: {}", e))
        })?;

        let mut wallets = Vec::with_capacity(private_keys.len());
        for (i, key) in private_keys.iter().enumerate() {
            let stripped = key.strip_prefix("0x").unwrap_or(key);
            let wallet = stripped
                .parse::<LocalWallet>()
                .map_err(|_| {
                    AppError::Configuration(format!(
                        "Treasury key #{} is not a valid secp256k1 private key",
                        i + 1
                    ))
                })?
                .with_chain_id(chain_id);
            wallets.push(wallet);
        }

        let amount_wei = parse_ether(amount_eth).map_err(|e| {
            AppError::Configuration(format!("FAUCET_AMOUNT does not scale to wei: {}", e))
        })?;

        Ok(Self {
            provider,
            wallets,
            amount_wei,
            amount_eth,
            selector,
        })
    }
}

#[async_trait]
impl TreasuryTrait for HotWalletTreasury {
    async fn distribute(&self, recipient: &str) -> AppResult<Distribution> {
        let to: Address = recipient
            .parse()
            .map_err(|_| AppError::InvalidInput("Invalid wallet address".to_string()))?;

        let index = self.selector.select(self.wallets.len());
        let wallet = self
            .wallets
            .get(index)
            .ok_or_else(|| {
                error!("🔴 key selector produced out-of-range index {}", index);
                AppError::Distribution(SEND_FAILED.to_string())
            })?
            .clone();
        let source_address = to_checksum(&wallet.address(), None);

        info!(
            "🚀 sending {} ETH to {} from treasury wallet {}",
            self.amount_eth, recipient, source_address
        );

        let client = SignerMiddleware::new(self.provider.clone(), wallet);
        let tx = TransactionRequest::pay(to, self.amount_wei);

        let pending = client.send_transaction(tx, None).await.map_err(|e| {
            error!("🔴 transaction submission failed: {}", e);
            AppError::Distribution(SEND_FAILED.to_string())
        })?;

        let receipt = pending
            .await
            .map_err(|e| {
                error!("🔴 confirmation wait failed: {}", e);
                AppError::Distribution(SEND_FAILED.to_string())
            })?
            .ok_or_else(|| {
                error!("🔴 transaction to {} dropped before inclusion", recipient);
                AppError::Distribution(SEND_FAILED.to_string())
            })?;

        let tx_hash = format!("{:?}", receipt.transaction_hash);
        if receipt.status != Some(U64::from(1u64)) {
            error!("🔴 transaction {} reverted on chain", tx_hash);
            return Err(AppError::Distribution(SEND_FAILED.to_string()));
        }

        info!("✅ payout confirmed, tx {}", tx_hash);

        Ok(Distribution { tx_hash, source_address })
    }
}
