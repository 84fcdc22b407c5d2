use crate::{router::AppRouter, services::Services};
use anyhow::Context;
use axum::serve;
use database::Database;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::info;
use utils::{AppConfig, FaucetParams};

pub struct ApplicationServer;

impl ApplicationServer {
    pub async fn serve(config: Arc<AppConfig>) -> anyhow::Result<()> {
        // Validate the faucet policy before binding anything. A process with a
        // placeholder key or an unparseable amount must never take requests.
        let params = Arc::new(
            FaucetParams::from_config(&config).context("🔴 Faucet configuration rejected")?,
        );
        Self::report_policy(&params);

        let address = format!("{}:{}", config.app_host, config.app_port);
        let tcp_listener = tokio::net::TcpListener::bind(address)
            .await
            .context("🔴 Failed to bind TCP listener")?;

        let local_addr = tcp_listener.local_addr().context("🔴 Failed to get local address")?;

        let db = Database::new(config.clone()).await?;
        let services = Services::new(db, params)?;
        let router = AppRouter::new(services);

        info!("🟢 server:faucet has launched on {local_addr} 🚀");

        serve(tcp_listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(Self::shutdown_signal())
            .await
            .context("🔴 Failed to start server")?;

        Ok(())
    }

    fn report_policy(params: &FaucetParams) {
        info!("📍 faucet pays {} ETH per claim on chain {}", params.faucet_amount, params.target_chain_id);
        info!(
            "📍 cooldown {} minute(s), {} claims per wallet per day",
            params.cooldown_minutes, params.daily_claim_limit
        );
        info!(
            "📍 daily budget {} ETH, mainnet gate {} ETH",
            params.daily_budget, params.min_mainnet_balance
        );
        info!("📍 {} treasury wallet(s) configured", params.treasury_private_keys.len());
    }

    async fn shutdown_signal() {
        let ctrl_c = async {
            signal::ctrl_c().await.expect("🔴 Failed to install Ctrl+C handler");
        };

        #[cfg(unix)]
        let terminate = async {
            signal::unix::signal(signal::unix::SignalKind::terminate())
                .expect("🔴 Failed to install signal handler")
                .recv()
                .await;
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }

        tracing::warn!("❌ Signal received, starting graceful shutdown...");
    }
}
