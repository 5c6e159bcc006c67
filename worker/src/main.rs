mod config;
mod decode;
mod errors;
mod pipelines;
mod rpc;
mod state;
mod time;
mod worker;

use std::sync::Arc;
use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::worker::Worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(worker_id = %config.worker_id, chain_id = config.chain_id, "starting worker");

    let db = connect_db(&config).await;
    if let Err(err) = Migrator::up(&db, None).await {
        tracing::error!(error = %err, "database migration failed, continuing with existing schema");
    }

    let worker = Arc::new(Worker::new(db, config));
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let probe = tokio::spawn(pipelines::probe::run(worker.clone(), shutdown_rx.clone()));
    let scanner = tokio::spawn(pipelines::scanner::run(worker.clone(), shutdown_rx.clone()));
    let rollup = tokio::spawn(pipelines::rollup::run(worker.clone(), shutdown_rx.clone()));
    let alerts = tokio::spawn(pipelines::alerts::run(worker.clone(), shutdown_rx));

    wait_for_shutdown_signal().await;
    tracing::info!("shutdown signal received, stopping pipelines");
    let _ = shutdown_tx.send(true);

    let _ = tokio::join!(probe, scanner, rollup, alerts);

    tracing::info!("worker stopped");
    Ok(())
}

/// Connect with the pool tuning the spec requires (2-20 connections, 30s
/// connect timeout, 60s idle/command timeout, SSL, no prepared-statement
/// caching so a connection pooler proxy in front of postgres is tolerated).
/// Retries forever with capped exponential backoff rather than failing
/// `main` — a dead database at boot must not take the rest of the process
/// down with it, since every pipeline already surfaces its own `DbErr` per
/// cycle.
async fn connect_db(config: &Config) -> DatabaseConnection {
    let mut opts = ConnectOptions::new(require_ssl(&config.database_url));
    opts.max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(60))
        .idle_timeout(Duration::from_secs(60))
        .max_lifetime(Duration::from_secs(60))
        .sqlx_logging(false);

    let mut attempt: u32 = 0;
    loop {
        match Database::connect(opts.clone()).await {
            Ok(db) => return db,
            Err(err) => {
                let backoff = config.backoff_base.saturating_pow(attempt.min(config.max_retries));
                attempt += 1;
                tracing::error!(error = %err, attempt, backoff_secs = backoff, "database connect failed, retrying");
                tokio::time::sleep(Duration::from_secs(backoff as u64)).await;
            }
        }
    }
}

fn require_ssl(url: &str) -> String {
    if url.contains("sslmode=") {
        return url.to_string();
    }
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}sslmode=require")
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
