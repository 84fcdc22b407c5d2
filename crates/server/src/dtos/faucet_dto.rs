use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Claim submission body.
///
/// Fields default to empty strings instead of failing deserialization, the
/// admission pipeline owns the wording of every rejection.
#[derive(Clone, Serialize, Deserialize, Debug, Validate, Default, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ClaimRequestDto {
    /// Receiving wallet address, 0x-prefixed hex
    pub wallet_address: String,

    /// Link to the proof tweet
    pub tweet_url: String,
}

/// Successful payout
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponseDto {
    pub message: String,

    /// Hash of the testnet transfer transaction
    pub tx_hash: String,

    /// Paid amount in ETH as a decimal string
    pub amount: String,
}

/// Current claim standing of one wallet
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponseDto {
    pub can_claim: bool,

    /// Empty when the wallet may claim right now
    pub reason: String,

    pub today_claims: u64,

    pub daily_limit: u64,

    /// RFC 3339 time of the latest claim, null for first-time wallets
    pub last_claim_time: Option<String>,
}

/// Mainnet balance gate result
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceCheckResponseDto {
    pub has_min_balance: bool,

    /// Mainnet balance in ETH, rounded to six decimal places
    pub balance: String,

    /// Required minimum in ETH
    pub required: String,
}

/// Publicly visible faucet policy
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FaucetConfigDto {
    pub min_mainnet_balance: String,
    pub cooldown_minutes: i64,
    pub daily_claim_limit: u64,
    pub faucet_amount: String,
}

/// Address query for the read-only endpoints
#[derive(Clone, Deserialize, Debug, Default)]
pub struct AddressQueryDto {
    pub address: Option<String>,
}

/// Body shape of every failed request
#[derive(Clone, Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorResponseDto {
    pub error: String,
}
