use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One granted claim. A record exists only for payouts that went through,
/// rejected requests leave no trace here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ClaimRecord {
    /// MongoDB document id
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,

    /// Receiving wallet, stored lowercase so history lookups are case-stable
    pub recipient_address: String,

    /// Treasury wallet that signed the payout
    pub source_address: String,

    /// Numeric id of the proof tweet, unique across all claims
    pub tweet_id: String,

    /// Author handle reported by the social API, "unknown" when unavailable
    pub tweet_author: String,

    /// Paid amount in ETH as a decimal string, e.g. "0.05"
    pub amount: String,

    /// Caller IP as seen by the server, None when the socket gave none
    pub request_ip: Option<String>,

    /// Unix seconds, stamped by the repository at insert time
    pub created_at: i64,
}
