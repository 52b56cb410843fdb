//! Headless sync runner: keeps a session alive against a live node and logs what it sees.

use cosmos_sync::app::{selectors, Session, SyncEvent};
use cosmos_sync::config::{load_deployment, ResolvedDeployment, SyncConfig};
use cosmos_sync::core::Result;
use cosmos_sync::debug::{init_logger, LogConfig};
use cosmos_sync::services::{JsonRpcClient, WalletService};
use std::sync::Arc;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    init_logger(&LogConfig::from_env());

    if let Err(e) = run().await {
        error!(error = %e, "Sync runner failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = SyncConfig::from_env()?;
    config.validate()?;

    let deployment = load_deployment(&config.deployment_path)?;
    let deployment = ResolvedDeployment::resolve(&deployment, config.chain_id)?;
    info!(
        rpc_url = %config.rpc_url,
        chain_id = config.chain_id,
        farms = deployment.farms.len(),
        pools = deployment.pools.len(),
        indexes = deployment.indexes.len(),
        vaults = deployment.vaults.len(),
        "Deployment loaded"
    );

    let client = Arc::new(JsonRpcClient::new(config.rpc_url.clone(), config.receipt_timeout));
    let wallet = Arc::new(match config.account {
        Some(account) => WalletService::connected(account),
        None => WalletService::new(),
    });

    let session = Session::start(
        client,
        wallet,
        deployment,
        config.fast_refresh,
        config.slow_refresh,
    )?;

    let events = session.events();
    let mut slow = session.slow_ticks();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, shutting down");
                break;
            }
            tick = slow.changed() => {
                if tick.is_err() {
                    break;
                }
                let (tvl, bnb, cake) = session.store().read(|s| {
                    (
                        selectors::total_value_locked(s),
                        selectors::price_bnb_busd(s),
                        selectors::price_cake_busd(s),
                    )
                });
                info!(
                    tvl_usd = %tvl.to_fixed(2),
                    bnb_busd = %bnb.to_fixed(4),
                    cake_busd = %cake.to_fixed(4),
                    "Protocol snapshot"
                );
            }
            Ok(event) = events.recv() => match event {
                SyncEvent::UserDataDiscarded { family, account } => {
                    info!(family, account = %account, "Stale user data discarded");
                }
                other => debug!(event = ?other, "Sync event"),
            },
        }
    }

    session.shutdown();
    Ok(())
}
