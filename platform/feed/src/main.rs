use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use common::global::{GlobalConfig, GlobalDb};
use common::logging;
use common::signal::SignalHandler;
use platform_feed::config::FeedConfig;
use platform_feed::event_handler;
use platform_feed::global::{self, FeedState, GlobalState};
use tokio::signal::unix::SignalKind;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let config = FeedConfig::parse().context("failed to parse config")?;

	logging::init(&config.logging.level, config.logging.mode).context("failed to initialize logging")?;

	if let Some(file) = &config.config_file {
		tracing::info!(file = file, "loaded config from file");
	}

	tracing::debug!("config: {:#?}", config);

	let db = global::setup_database(&config.database).await?;
	let nats = global::setup_nats(&config.name, &config.nats).await?;

	let ctx = CancellationToken::new();

	let global = Arc::new(GlobalState::new(config, db, nats, ctx.clone()));

	if global.config::<FeedConfig>().database.run_migrations {
		sqlx::migrate!("./migrations")
			.run(global.db().as_ref())
			.await
			.context("failed to run migrations")?;
	}

	let worker = tokio::spawn(event_handler::run(global.clone()));

	// Listen on both sigint and sigterm and cancel the context when either is received
	let mut signal_handler = SignalHandler::new()
		.with_signal(SignalKind::interrupt())
		.context("failed to listen for sigint")?
		.with_signal(SignalKind::terminate())
		.context("failed to listen for sigterm")?;

	select! {
		r = worker => tracing::error!("event handler stopped unexpectedly: {:?}", r),
		_ = signal_handler.recv() => tracing::info!("shutting down"),
	}

	ctx.cancel();
	global.tasks().close();

	tracing::info!("waiting for tasks to finish");

	select! {
		_ = time::sleep(Duration::from_secs(60)) => tracing::warn!("force shutting down"),
		_ = signal_handler.recv() => tracing::warn!("force shutting down"),
		_ = global.tasks().wait() => tracing::info!("shutting down"),
	}

	Ok(())
}
