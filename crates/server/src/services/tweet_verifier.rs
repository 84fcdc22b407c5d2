use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};
use utils::{AppError, AppResult};

pub type DynTweetVerifier = Arc<dyn TweetVerifierTrait + Send + Sync>;

/// What one proof tweet resolved to
#[derive(Debug, Clone)]
pub struct TweetProof {
    pub tweet_id: String,
    pub tweet_author: String,
    pub is_valid: bool,
}

#[async_trait]
pub trait TweetVerifierTrait {
    /// Resolves a tweet URL into an admission verdict. The id must parse out
    /// of the URL before any provider call is made, and a provider failure or
    /// a missing tweet is a hard error, never an implicit pass.
    async fn verify(&self, tweet_url: &str) -> AppResult<TweetProof>;
}

/// Twitter v2 API client
pub struct TwitterApiVerifier {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
    marker_phrase: String,
}

impl TwitterApiVerifier {
    pub fn new(bearer_token: &str, marker_phrase: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://api.twitter.com".to_string(),
            bearer_token: bearer_token.to_string(),
            marker_phrase: marker_phrase.to_string(),
        }
    }
}

#[async_trait]
impl TweetVerifierTrait for TwitterApiVerifier {
    async fn verify(&self, tweet_url: &str) -> AppResult<TweetProof> {
        let tweet_id = extract_tweet_id(tweet_url)
            .ok_or_else(|| AppError::InvalidInput("Invalid tweet URL format".to_string()))?;

        let url = format!(
            "{}/2/tweets/{}?expansions=author_id&tweet.fields=text&user.fields=username",
            self.base_url, tweet_id
        );
        info!("🔍 verifying tweet {}", tweet_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| {
                error!("🔴 tweet lookup failed for {}: {}", tweet_id, e);
                AppError::Verification("Failed to verify tweet".to_string())
            })?;

        if !response.status().is_success() {
            error!("🔴 twitter api answered {} for tweet {}", response.status(), tweet_id);
            return Err(AppError::Verification("Failed to verify tweet".to_string()));
        }

        let payload: Value = response.json().await.map_err(|e| {
            error!("🔴 unreadable twitter response for {}: {}", tweet_id, e);
            AppError::Verification("Failed to verify tweet".to_string())
        })?;

        read_proof(&payload, &tweet_id, &self.marker_phrase).ok_or_else(|| {
            error!("🔴 twitter response carries no tweet {}", tweet_id);
            AppError::Verification("Failed to verify tweet".to_string())
        })
    }
}

/// Digits after the `status/` path segment, shared by x.com and twitter.com
/// permalinks. Query strings and trailing segments are ignored.
pub fn extract_tweet_id(tweet_url: &str) -> Option<String> {
    let rest = tweet_url.split("status/").nth(1)?;
    let id: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

/// None when the response holds no tweet body at all, which callers treat as
/// a failed lookup rather than an invalid tweet.
fn read_proof(payload: &Value, tweet_id: &str, marker_phrase: &str) -> Option<TweetProof> {
    let text = payload.get("data")?.get("text")?.as_str()?;

    let author_id = payload
        .get("data")
        .and_then(|data| data.get("author_id"))
        .and_then(|id| id.as_str());
    let tweet_author = author_id
        .and_then(|id| {
            payload
                .get("includes")?
                .get("users")?
                .as_array()?
                .iter()
                .find(|user| user.get("id").and_then(|v| v.as_str()) == Some(id))?
                .get("username")?
                .as_str()
        })
        .unwrap_or("unknown")
        .to_string();

    Some(TweetProof {
        tweet_id: tweet_id.to_string(),
        tweet_author,
        // exact case-sensitive containment of the one canonical phrase
        is_valid: text.contains(marker_phrase),
    })
}
