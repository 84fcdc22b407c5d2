use crate::{claim::model::ClaimRecord, Database};
use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::FindOneOptions,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use utils::{AppError, AppResult};

pub type DynClaimRepository = Arc<dyn ClaimRepositoryTrait + Send + Sync>;

/// Fields of a claim the service decides, the repository adds id and timestamp.
#[derive(Debug, Clone)]
pub struct NewClaim {
    pub recipient_address: String,
    pub source_address: String,
    pub tweet_id: String,
    pub tweet_author: String,
    pub amount: String,
    pub request_ip: Option<String>,
}

#[async_trait]
pub trait ClaimRepositoryTrait {
    /// Whether a tweet id has already been consumed by any claim
    async fn exists_by_tweet_id(&self, tweet_id: &str) -> AppResult<bool>;

    /// Most recent claim of a wallet, None for first-time claimers
    async fn last_claim_for_wallet(&self, address: &str) -> AppResult<Option<ClaimRecord>>;

    /// Number of claims a wallet made at or after the given unix second
    async fn count_claims_for_wallet_since(&self, address: &str, since: i64) -> AppResult<u64>;

    /// Sum of all paid amounts at or after the given unix second
    async fn sum_amount_since(&self, since: i64) -> AppResult<Decimal>;

    /// Appends a claim. The unique tweet_id index turns a concurrent
    /// double-spend of the same proof into AppError::Conflict.
    async fn insert_claim(&self, claim: NewClaim) -> AppResult<ClaimRecord>;
}

#[async_trait]
impl ClaimRepositoryTrait for Database {
    async fn exists_by_tweet_id(&self, tweet_id: &str) -> AppResult<bool> {
        let existing = self.claims.find_one(doc! { "tweet_id": tweet_id }, None).await?;

        Ok(existing.is_some())
    }

    async fn last_claim_for_wallet(&self, address: &str) -> AppResult<Option<ClaimRecord>> {
        let filter = doc! { "recipient_address": address.to_lowercase() };
        let options = FindOneOptions::builder().sort(doc! { "created_at": -1 }).build();
        let claim = self.claims.find_one(filter, options).await?;

        Ok(claim)
    }

    async fn count_claims_for_wallet_since(&self, address: &str, since: i64) -> AppResult<u64> {
        let filter = doc! {
            "recipient_address": address.to_lowercase(),
            "created_at": { "$gte": since },
        };
        let count = self.claims.count_documents(filter, None).await?;

        Ok(count)
    }

    async fn sum_amount_since(&self, since: i64) -> AppResult<Decimal> {
        let filter = doc! { "created_at": { "$gte": since } };
        let mut cursor = self.claims.find(filter, None).await?;

        let mut total = Decimal::ZERO;
        while let Some(claim) = cursor.try_next().await? {
            let amount = Decimal::from_str(&claim.amount).map_err(|e| {
                AppError::InternalServerErrorWithContext(format!(
                    "Stored claim {} has unparseable amount {:?}: {}",
                    claim.tweet_id, claim.amount, e
                ))
            })?;
            total += amount;
        }

        Ok(total)
    }

    async fn insert_claim(&self, claim: NewClaim) -> AppResult<ClaimRecord> {
        let mut record = ClaimRecord {
            id: None,
            recipient_address: claim.recipient_address.to_lowercase(),
            source_address: claim.source_address,
            tweet_id: claim.tweet_id,
            tweet_author: claim.tweet_author,
            amount: claim.amount,
            request_ip: claim.request_ip,
            created_at: Utc::now().timestamp(),
        };

        match self.claims.insert_one(&record, None).await {
            Ok(result) => {
                record.id = result.inserted_id.as_object_id();
                Ok(record)
            }
            Err(e) => {
                if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = &*e.kind {
                    if write_error.code == 11000 {
                        return Err(AppError::Conflict(format!(
                            "Claim for tweet {} was already recorded",
                            record.tweet_id
                        )));
                    }
                }
                Err(AppError::from(e))
            }
        }
    }
}
