use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sepolia Faucet API",
        description = "Rust and Axum backend that pays Sepolia ETH for tweet-verified claims",
        version = "1.0.0",
        contact(
            name = "API Support",
            email = "support@payram.xyz"
        )
    ),
    paths(
        // System health check
        crate::api::health,
        // Faucet endpoints
        crate::api::faucet_controller::claim,
        crate::api::faucet_controller::status,
        crate::api::faucet_controller::check_balance,
        crate::api::faucet_controller::config,
    ),
    components(
        schemas(
            // Database models
            database::claim::model::ClaimRecord,
            // DTOs
            crate::dtos::faucet_dto::ClaimRequestDto,
            crate::dtos::faucet_dto::ClaimResponseDto,
            crate::dtos::faucet_dto::StatusResponseDto,
            crate::dtos::faucet_dto::BalanceCheckResponseDto,
            crate::dtos::faucet_dto::FaucetConfigDto,
            crate::dtos::faucet_dto::ErrorResponseDto,
        )
    ),
    tags(
        (name = "system", description = "Health and status monitoring"),
        (name = "faucet", description = "Claim submission and eligibility checks")
    )
)]
pub struct ApiDoc;
