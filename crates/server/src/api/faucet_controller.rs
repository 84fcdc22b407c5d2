use crate::{
    dtos::faucet_dto::{
        AddressQueryDto, BalanceCheckResponseDto, ClaimRequestDto, ClaimResponseDto,
        ErrorResponseDto, FaucetConfigDto, StatusResponseDto,
    },
    extractors::validation_extractor::ValidationExtractor,
    middleware,
    services::Services,
};
use axum::{
    extract::{ConnectInfo, Query},
    http::HeaderMap,
    routing::{get, post},
    Extension, Json, Router,
};
use std::net::SocketAddr;
use utils::{AppError, AppResult};

/// Submit a claim for testnet ETH
#[utoipa::path(
    post,
    path = "/api/v1/claim",
    tag = "faucet",
    request_body = ClaimRequestDto,
    responses(
        (status = 200, description = "Payout sent and recorded", body = ClaimResponseDto),
        (status = 400, description = "Request failed an eligibility check", body = ErrorResponseDto),
        (status = 429, description = "Cooldown, daily limit or budget reached", body = ErrorResponseDto),
        (status = 500, description = "Verification, payout or ledger failure", body = ErrorResponseDto)
    )
)]
pub async fn claim(
    Extension(services): Extension<Services>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
    ValidationExtractor(req): ValidationExtractor<ClaimRequestDto>,
) -> AppResult<Json<ClaimResponseDto>> {
    let request_ip = middleware::client_ip(&headers, connect_info.as_ref());

    let response = services
        .claim
        .submit_claim(req.wallet_address, req.tweet_url, request_ip)
        .await?;

    Ok(Json(response))
}

/// Claim standing of a wallet
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "faucet",
    params(
        ("address" = String, Query, description = "Wallet address to inspect")
    ),
    responses(
        (status = 200, description = "Current standing", body = StatusResponseDto),
        (status = 400, description = "Missing or malformed address", body = ErrorResponseDto)
    )
)]
pub async fn status(
    Extension(services): Extension<Services>,
    Query(query): Query<AddressQueryDto>,
) -> AppResult<Json<StatusResponseDto>> {
    let address = query
        .address
        .ok_or_else(|| AppError::InvalidInput("Wallet address is required".to_string()))?;

    let status = services.claim.wallet_status(address).await?;

    Ok(Json(status))
}

/// Mainnet balance gate preview
#[utoipa::path(
    get,
    path = "/api/v1/balance-check",
    tag = "faucet",
    params(
        ("address" = String, Query, description = "Wallet address to look up on mainnet")
    ),
    responses(
        (status = 200, description = "Balance and gate verdict", body = BalanceCheckResponseDto),
        (status = 400, description = "Missing or malformed address", body = ErrorResponseDto),
        (status = 500, description = "Mainnet RPC unavailable", body = ErrorResponseDto)
    )
)]
pub async fn check_balance(
    Extension(services): Extension<Services>,
    Query(query): Query<AddressQueryDto>,
) -> AppResult<Json<BalanceCheckResponseDto>> {
    let address = query
        .address
        .ok_or_else(|| AppError::InvalidInput("Wallet address is required".to_string()))?;

    let check = services.claim.check_balance(address).await?;

    Ok(Json(check))
}

/// Public faucet policy
#[utoipa::path(
    get,
    path = "/api/v1/config",
    tag = "faucet",
    responses(
        (status = 200, description = "Current policy values", body = FaucetConfigDto)
    )
)]
pub async fn config(Extension(services): Extension<Services>) -> Json<FaucetConfigDto> {
    Json(services.claim.public_config())
}

pub struct FaucetController;
impl FaucetController {
    pub fn app() -> Router {
        Router::new()
            .route("/claim", post(claim))
            .route("/status", get(status))
            .route("/balance-check", get(check_balance))
            .route("/config", get(config))
    }
}
