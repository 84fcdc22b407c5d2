#[cfg(test)]
mod integration_tests {
    use crate::dtos::faucet_dto::{
        BalanceCheckResponseDto, ClaimResponseDto, FaucetConfigDto, StatusResponseDto,
    };
    use crate::router::AppRouter;
    use crate::services::claim_service::ClaimServiceTrait;
    use crate::services::Services;
    use async_trait::async_trait;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use utils::{AppError, AppResult};

    const WALLET: &str = "0xF39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    #[derive(Clone, Copy)]
    enum Outcome {
        Grant,
        CooldownHit,
    }

    struct MockClaimService {
        outcome: Outcome,
        seen_wallet: Mutex<Option<String>>,
        seen_ip: Mutex<Option<String>>,
    }

    impl MockClaimService {
        fn new(outcome: Outcome) -> Self {
            Self {
                outcome,
                seen_wallet: Mutex::new(None),
                seen_ip: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ClaimServiceTrait for MockClaimService {
        async fn submit_claim(
            &self,
            wallet_address: String,
            _tweet_url: String,
            request_ip: Option<String>,
        ) -> AppResult<ClaimResponseDto> {
            *self.seen_wallet.lock().unwrap() = Some(wallet_address);
            *self.seen_ip.lock().unwrap() = request_ip;
            match self.outcome {
                Outcome::Grant => Ok(ClaimResponseDto {
                    message: "Successfully sent 0.05 Sepolia ETH!".to_string(),
                    tx_hash: "0xabc123".to_string(),
                    amount: "0.05".to_string(),
                }),
                Outcome::CooldownHit => Err(AppError::Cooldown(
                    "Please wait 5 minute(s) before claiming again".to_string(),
                )),
            }
        }

        async fn wallet_status(&self, _address: String) -> AppResult<StatusResponseDto> {
            Ok(StatusResponseDto {
                can_claim: true,
                reason: String::new(),
                today_claims: 0,
                daily_limit: 3,
                last_claim_time: None,
            })
        }

        async fn check_balance(&self, _address: String) -> AppResult<BalanceCheckResponseDto> {
            Ok(BalanceCheckResponseDto {
                has_min_balance: true,
                balance: "0.010000".to_string(),
                required: "0.0025".to_string(),
            })
        }

        fn public_config(&self) -> FaucetConfigDto {
            FaucetConfigDto {
                min_mainnet_balance: "0.0025".to_string(),
                cooldown_minutes: 5,
                daily_claim_limit: 3,
                faucet_amount: "0.05".to_string(),
            }
        }
    }

    fn test_server(outcome: Outcome) -> (TestServer, Arc<MockClaimService>) {
        let mock = Arc::new(MockClaimService::new(outcome));
        let services = Services { claim: mock.clone() };
        let server = TestServer::new(AppRouter::new(services)).unwrap();
        (server, mock)
    }

    #[tokio::test]
    async fn health_endpoint_answers() {
        let (server, _) = test_server(Outcome::Grant);

        let response = server.get("/api/v1/").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "Server is running! 🚀");
    }

    #[tokio::test]
    async fn claim_returns_payout_as_camel_case_json() {
        let (server, mock) = test_server(Outcome::Grant);

        let response = server
            .post("/api/v1/claim")
            .json(&json!({
                "walletAddress": WALLET,
                "tweetUrl": "https://x.com/alice/status/1790000000000000001",
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["message"], "Successfully sent 0.05 Sepolia ETH!");
        assert_eq!(body["txHash"], "0xabc123");
        assert_eq!(body["amount"], "0.05");

        // casing is forwarded untouched, the service owns normalization
        assert_eq!(mock.seen_wallet.lock().unwrap().as_deref(), Some(WALLET));
    }

    #[tokio::test]
    async fn claim_records_the_forwarded_client_ip() {
        let (server, mock) = test_server(Outcome::Grant);

        let response = server
            .post("/api/v1/claim")
            .add_header(
                HeaderName::from_static("x-forwarded-for"),
                HeaderValue::from_static("203.0.113.7, 70.41.3.18"),
            )
            .json(&json!({
                "walletAddress": WALLET,
                "tweetUrl": "https://x.com/alice/status/1790000000000000001",
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        // first hop only, the rest of the chain is proxy noise
        assert_eq!(mock.seen_ip.lock().unwrap().as_deref(), Some("203.0.113.7"));
    }

    #[tokio::test]
    async fn claim_rejections_use_the_error_envelope() {
        let (server, _) = test_server(Outcome::CooldownHit);

        let response = server
            .post("/api/v1/claim")
            .json(&json!({
                "walletAddress": WALLET,
                "tweetUrl": "https://x.com/alice/status/1790000000000000001",
            }))
            .await;

        assert_eq!(response.status_code(), StatusCode::TOO_MANY_REQUESTS);
        let body: Value = response.json();
        assert_eq!(body["error"], "Please wait 5 minute(s) before claiming again");
    }

    #[tokio::test]
    async fn claim_with_broken_json_is_a_client_error() {
        let (server, mock) = test_server(Outcome::Grant);

        let response = server
            .post("/api/v1/claim")
            .content_type("application/json")
            .text("{ not json")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].is_string());
        assert!(mock.seen_wallet.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn status_reports_wallet_standing() {
        let (server, _) = test_server(Outcome::Grant);

        let response = server
            .get("/api/v1/status")
            .add_query_param("address", WALLET)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["canClaim"], true);
        assert_eq!(body["reason"], "");
        assert_eq!(body["todayClaims"], 0);
        assert_eq!(body["dailyLimit"], 3);
        assert!(body["lastClaimTime"].is_null());
    }

    #[tokio::test]
    async fn status_without_address_is_rejected() {
        let (server, _) = test_server(Outcome::Grant);

        let response = server.get("/api/v1/status").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Wallet address is required");
    }

    #[tokio::test]
    async fn balance_check_reports_the_gate() {
        let (server, _) = test_server(Outcome::Grant);

        let response = server
            .get("/api/v1/balance-check")
            .add_query_param("address", WALLET)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["hasMinBalance"], true);
        assert_eq!(body["balance"], "0.010000");
        assert_eq!(body["required"], "0.0025");
    }

    #[tokio::test]
    async fn config_is_public() {
        let (server, _) = test_server(Outcome::Grant);

        let response = server.get("/api/v1/config").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["minMainnetBalance"], "0.0025");
        assert_eq!(body["cooldownMinutes"], 5);
        assert_eq!(body["dailyClaimLimit"], 3);
        assert_eq!(body["faucetAmount"], "0.05");
    }

    #[tokio::test]
    async fn unknown_routes_get_the_json_404() {
        let (server, _) = test_server(Outcome::Grant);

        let response = server.get("/definitely/not/here").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(
            body["error"],
            "The requested resource does not exist on this server!"
        );
    }
}
