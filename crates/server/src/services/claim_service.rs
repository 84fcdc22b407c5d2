use crate::dtos::faucet_dto::{
    BalanceCheckResponseDto, ClaimResponseDto, FaucetConfigDto, StatusResponseDto,
};
use crate::services::tweet_verifier::DynTweetVerifier;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use database::{DynClaimRepository, NewClaim};
use ethereum::{DynBalanceOracle, DynTreasury};
use ethers::types::U256;
use ethers::utils::format_ether;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info};
use utils::{AppError, AppResult, FaucetParams};

pub type DynClaimService = Arc<dyn ClaimServiceTrait + Send + Sync>;

#[async_trait]
pub trait ClaimServiceTrait {
    /// Runs the full admission pipeline and, when every gate passes, pays
    /// out and records the claim. Checks are ordered cheapest first and the
    /// transfer is deliberately last.
    async fn submit_claim(
        &self,
        wallet_address: String,
        tweet_url: String,
        request_ip: Option<String>,
    ) -> AppResult<ClaimResponseDto>;

    /// Read-only standing of a wallet, daily limit outranks cooldown
    async fn wallet_status(&self, address: String) -> AppResult<StatusResponseDto>;

    /// Mainnet balance gate preview for the claim form
    async fn check_balance(&self, address: String) -> AppResult<BalanceCheckResponseDto>;

    /// Policy values safe to show publicly
    fn public_config(&self) -> FaucetConfigDto;
}

pub struct ClaimService {
    repository: DynClaimRepository,
    oracle: DynBalanceOracle,
    verifier: DynTweetVerifier,
    treasury: DynTreasury,
    params: Arc<FaucetParams>,
}

impl ClaimService {
    pub fn new(
        repository: DynClaimRepository,
        oracle: DynBalanceOracle,
        verifier: DynTweetVerifier,
        treasury: DynTreasury,
        params: Arc<FaucetParams>,
    ) -> Self {
        Self {
            repository,
            oracle,
            verifier,
            treasury,
            params,
        }
    }
}

#[async_trait]
impl ClaimServiceTrait for ClaimService {
    async fn submit_claim(
        &self,
        wallet_address: String,
        tweet_url: String,
        request_ip: Option<String>,
    ) -> AppResult<ClaimResponseDto> {
        if !is_well_formed_address(&wallet_address) {
            return Err(AppError::InvalidInput("Invalid wallet address".to_string()));
        }
        // ledger keys are lowercase, EIP-55 casing must not split a wallet's history
        let recipient = wallet_address.to_lowercase();

        if tweet_url.trim().is_empty() {
            return Err(AppError::InvalidInput("Tweet URL is required".to_string()));
        }

        let reading = self.oracle.read_balance(&recipient).await?;
        if !reading.meets_minimum {
            return Err(AppError::InsufficientBalance(format!(
                "Insufficient mainnet balance. Minimum {} ETH required.",
                self.params.min_mainnet_balance
            )));
        }

        let proof = self.verifier.verify(&tweet_url).await?;
        if !proof.is_valid {
            return Err(AppError::ContentRequirement(
                "Tweet does not meet requirements".to_string(),
            ));
        }

        if self.repository.exists_by_tweet_id(&proof.tweet_id).await? {
            return Err(AppError::DuplicateProof(
                "This tweet has already been used for a claim".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        if let Some(last) = self.repository.last_claim_for_wallet(&recipient).await? {
            let elapsed = now - last.created_at;
            let cooldown = self.params.cooldown_seconds();
            if elapsed < cooldown {
                return Err(AppError::Cooldown(format!(
                    "Please wait {} minute(s) before claiming again",
                    minutes_remaining(cooldown - elapsed)
                )));
            }
        }

        let day_start = start_of_utc_day(now);
        let today_claims = self
            .repository
            .count_claims_for_wallet_since(&recipient, day_start)
            .await?;
        if today_claims >= self.params.daily_claim_limit {
            return Err(AppError::DailyLimit(format!(
                "Daily claim limit reached ({} claims per day)",
                self.params.daily_claim_limit
            )));
        }

        let paid_today = self.repository.sum_amount_since(day_start).await?;
        let remaining = (self.params.daily_budget - paid_today).max(Decimal::ZERO);
        if remaining < self.params.faucet_amount {
            return Err(AppError::BudgetExhausted(format!(
                "Faucet daily budget exhausted ({} ETH remaining today)",
                remaining
            )));
        }

        let distribution = self.treasury.distribute(&recipient).await?;

        let record = NewClaim {
            recipient_address: recipient.clone(),
            source_address: distribution.source_address,
            tweet_id: proof.tweet_id,
            tweet_author: proof.tweet_author,
            amount: self.params.faucet_amount.to_string(),
            request_ip,
        };
        if let Err(e) = self.repository.insert_claim(record).await {
            // funds are on-chain but the ledger refused the row, the payout
            // must be reconciled by hand from this line
            error!(
                "🔴 CRITICAL: payout {} to {} is not recorded: {}",
                distribution.tx_hash, recipient, e
            );
            return Err(e);
        }

        info!(
            "✅ claim granted: {} ETH to {} (tx {})",
            self.params.faucet_amount, recipient, distribution.tx_hash
        );

        Ok(ClaimResponseDto {
            message: format!("Successfully sent {} Sepolia ETH!", self.params.faucet_amount),
            tx_hash: distribution.tx_hash,
            amount: self.params.faucet_amount.to_string(),
        })
    }

    async fn wallet_status(&self, address: String) -> AppResult<StatusResponseDto> {
        if !is_well_formed_address(&address) {
            return Err(AppError::InvalidInput("Invalid wallet address".to_string()));
        }
        let address = address.to_lowercase();

        let now = Utc::now().timestamp();
        let today_claims = self
            .repository
            .count_claims_for_wallet_since(&address, start_of_utc_day(now))
            .await?;
        let last_claim = self.repository.last_claim_for_wallet(&address).await?;

        let mut can_claim = true;
        let mut reason = String::new();

        if today_claims >= self.params.daily_claim_limit {
            can_claim = false;
            reason = format!(
                "Daily limit reached ({} claims per day)",
                self.params.daily_claim_limit
            );
        } else if let Some(last) = &last_claim {
            let elapsed = now - last.created_at;
            let cooldown = self.params.cooldown_seconds();
            if elapsed < cooldown {
                can_claim = false;
                reason = format!(
                    "Cooldown active. Wait {} minute(s)",
                    minutes_remaining(cooldown - elapsed)
                );
            }
        }

        Ok(StatusResponseDto {
            can_claim,
            reason,
            today_claims,
            daily_limit: self.params.daily_claim_limit,
            last_claim_time: last_claim
                .and_then(|c| DateTime::from_timestamp(c.created_at, 0))
                .map(|t| t.to_rfc3339()),
        })
    }

    async fn check_balance(&self, address: String) -> AppResult<BalanceCheckResponseDto> {
        if !is_well_formed_address(&address) {
            return Err(AppError::InvalidInput("Invalid wallet address format".to_string()));
        }

        let reading = self.oracle.read_balance(&address.to_lowercase()).await?;

        Ok(BalanceCheckResponseDto {
            has_min_balance: reading.meets_minimum,
            balance: format_balance_eth(reading.balance_wei),
            required: self.params.min_mainnet_balance.to_string(),
        })
    }

    fn public_config(&self) -> FaucetConfigDto {
        FaucetConfigDto {
            min_mainnet_balance: self.params.min_mainnet_balance.to_string(),
            cooldown_minutes: self.params.cooldown_minutes,
            daily_claim_limit: self.params.daily_claim_limit,
            faucet_amount: self.params.faucet_amount.to_string(),
        }
    }
}

fn is_well_formed_address(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}

fn start_of_utc_day(ts: i64) -> i64 {
    ts - ts.rem_euclid(86_400)
}

fn minutes_remaining(remaining_secs: i64) -> i64 {
    (remaining_secs + 59) / 60
}

fn format_balance_eth(wei: U256) -> String {
    let raw = format_ether(wei);
    Decimal::from_str(&raw)
        .map(|eth| eth.round_dp(6).to_string())
        .unwrap_or(raw)
}
