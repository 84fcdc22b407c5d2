////////////////////////////////////////////////////////////////////////
//
// 1. Each domain entity gets its own folder
// 2. Each domain has two parts:
//    - model: the schema definition
//    - repository: the raw database operations
//
//////////////////////////////////////////////////////////////////////

use mongodb::{Client, Collection};
use std::sync::Arc;
use tracing::info;
use utils::{AppConfig, AppResult};

pub mod claim;

pub use claim::model::ClaimRecord;
pub use claim::repository::{ClaimRepositoryTrait, DynClaimRepository, NewClaim};

#[derive(Clone, Debug)]
pub struct Database {
    pub claims: Collection<ClaimRecord>,
}

impl Database {
    pub async fn new(config: Arc<AppConfig>) -> AppResult<Self> {
        let client = Client::with_uri_str(&config.mongo_uri).await?;
        let db: mongodb::Database = client.database(&config.mongo_db);

        let claims = db.collection("FaucetClaim");

        info!("🧱 database({:#}) connected.", &config.mongo_db);

        let database = Database { claims };
        database.init_indexes().await?;

        Ok(database)
    }

    /// The unique tweet_id index is what makes concurrent double-claims
    /// lose the race, the insert path relies on it being in place.
    async fn init_indexes(&self) -> AppResult<()> {
        use mongodb::{options::IndexOptions, IndexModel};

        let indexes = vec![
            // unique consumed-proof index, the claim race adjudicator
            IndexModel::builder()
                .keys(mongodb::bson::doc! { "tweet_id": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            // wallet history queries (cooldown, daily count)
            IndexModel::builder()
                .keys(mongodb::bson::doc! { "recipient_address": 1, "created_at": -1 })
                .build(),
            // day-window budget scans
            IndexModel::builder()
                .keys(mongodb::bson::doc! { "created_at": -1 })
                .build(),
        ];

        self.claims.create_indexes(indexes, None).await?;
        info!("✅ FaucetClaim indexes ready");
        Ok(())
    }
}
