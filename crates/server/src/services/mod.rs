pub mod claim_service;
pub mod tweet_verifier;


use crate::services::claim_service::{ClaimService, DynClaimService};
use crate::services::tweet_verifier::{DynTweetVerifier, TwitterApiVerifier};
use database::{Database, DynClaimRepository};
use ethereum::{
    DynBalanceOracle, DynKeySelector, DynTreasury, HotWalletTreasury, JsonRpcBalanceOracle,
    UniformRandomSelector,
};
use std::sync::Arc;
use tracing::info;
use utils::{AppResult, FaucetParams};

#[derive(Clone)]
pub struct Services {
    pub claim: DynClaimService,
}

impl Services {
    pub fn new(db: Database, params: Arc<FaucetParams>) -> AppResult<Self> {
        let repository = Arc::new(db) as DynClaimRepository;

        let oracle = Arc::new(JsonRpcBalanceOracle::new(
            &params.mainnet_rpc,
            params.min_mainnet_balance,
        )?) as DynBalanceOracle;

        let verifier = Arc::new(TwitterApiVerifier::new(
            &params.twitter_bearer_token,
            &params.marker_phrase,
        )) as DynTweetVerifier;

        let selector = Arc::new(UniformRandomSelector) as DynKeySelector;
        let treasury = Arc::new(HotWalletTreasury::new(
            &params.sepolia_rpc,
            &params.treasury_private_keys,
            params.faucet_amount,
            params.target_chain_id,
            selector,
        )?) as DynTreasury;

        let claim = Arc::new(ClaimService::new(
            repository,
            oracle,
            verifier,
            treasury,
            params,
        )) as DynClaimService;

        info!("🧠 services initialized");

        Ok(Self { claim })
    }
}
