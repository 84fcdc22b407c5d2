use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::{Address, U256};
use ethers::utils::parse_ether;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::error;
use utils::{AppError, AppResult};

pub type DynBalanceOracle = Arc<dyn BalanceOracleTrait + Send + Sync>;

/// Mainnet balance of one wallet together with the gate verdict
#[derive(Debug, Clone, Copy)]
pub struct BalanceReading {
    pub balance_wei: U256,
    pub meets_minimum: bool,
}

#[async_trait]
pub trait BalanceOracleTrait {
    async fn read_balance(&self, address: &str) -> AppResult<BalanceReading>;
}

/// Reads mainnet balances over JSON-RPC. The threshold is scaled to wei
/// once at construction so the hot path compares integers, no floats.
#[derive(Debug)]
pub struct JsonRpcBalanceOracle {
    provider: Provider<Http>,
    minimum_wei: U256,
}

impl JsonRpcBalanceOracle {
    pub fn new(rpc_url: &str, minimum_eth: Decimal) -> AppResult<Self> {
        let provider = Provider::<Http>::try_from(rpc_url).map_err(|e| {
            AppError::Configuration(format!(
                "Cannot build mainnet provider from ETHEREUM_MAINNET_RPC: {}",
                e
            ))
        })?;
        let minimum_wei = parse_ether(minimum_eth).map_err(|e| {
            AppError::Configuration(format!("MIN_MAINNET_BALANCE does not scale to wei: {}", e))
        })?;

        Ok(Self { provider, minimum_wei })
    }
}

#[async_trait]
impl BalanceOracleTrait for JsonRpcBalanceOracle {
    async fn read_balance(&self, address: &str) -> AppResult<BalanceReading> {
        let address: Address = address
            .parse()
            .map_err(|_| AppError::InvalidInput("Invalid wallet address".to_string()))?;

        let balance_wei = self.provider.get_balance(address, None).await.map_err(|e| {
            error!("🔴 mainnet balance lookup failed for {:?}: {}", address, e);
            AppError::Upstream("Failed to check balance. Please try again.".to_string())
        })?;

        Ok(BalanceReading {
            balance_wei,
            meets_minimum: balance_wei >= self.minimum_wei,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn threshold_is_scaled_to_wei_once() {
        let oracle = JsonRpcBalanceOracle::new(
            "http://localhost:8545",
            Decimal::from_str("0.0025").unwrap(),
        )
        .unwrap();

        assert_eq!(oracle.minimum_wei, U256::from(2_500_000_000_000_000u64));
    }

    #[test]
    fn unusable_rpc_url_is_a_configuration_error() {
        let err = JsonRpcBalanceOracle::new("not a url", Decimal::ONE).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[tokio::test]
    async fn malformed_address_is_rejected_before_rpc() {
        let oracle = JsonRpcBalanceOracle::new("http://localhost:8545", Decimal::ONE).unwrap();

        let err = oracle.read_balance("0x1234").await.unwrap_err();

        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(err.to_string(), "Invalid wallet address");
    }
}
