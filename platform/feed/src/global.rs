use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use async_nats::ServerAddr;
use common::config::{DatabaseConfig, NatsConfig};
use common::global::{GlobalConfig, GlobalConfigProvider, GlobalCtx, GlobalDb, GlobalNats};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::ConnectOptions;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::config::FeedConfig;
use crate::fanout::FanoutPublisher;
use crate::report::NatsReporter;
use crate::store::postgres::{PgCommentStore, PgFollowIndex, PgNewsfeedStore, PgPostIndex};
use crate::thread::ThreadAssembler;

pub type PgFanoutPublisher = FanoutPublisher<PgFollowIndex, PgNewsfeedStore, PgPostIndex, NatsReporter>;
pub type PgThreadAssembler = ThreadAssembler<PgCommentStore>;

pub trait FeedState {
	fn fanout(&self) -> &PgFanoutPublisher;
	fn threads(&self) -> &PgThreadAssembler;
	/// Tracks in-flight message handlers so shutdown can wait for them.
	fn tasks(&self) -> &TaskTracker;
}

pub trait FeedGlobal:
	GlobalCtx + GlobalConfigProvider<FeedConfig> + GlobalNats + GlobalDb + GlobalConfig + FeedState + Send + Sync + 'static
{
}

impl<T> FeedGlobal for T where
	T: GlobalCtx
		+ GlobalConfigProvider<FeedConfig>
		+ GlobalNats
		+ GlobalDb
		+ GlobalConfig
		+ FeedState
		+ Send
		+ Sync
		+ 'static
{
}

pub struct GlobalState {
	ctx: CancellationToken,
	config: FeedConfig,
	nats: async_nats::Client,
	db: Arc<sqlx::PgPool>,
	tasks: TaskTracker,
	fanout: PgFanoutPublisher,
	threads: PgThreadAssembler,
}

impl GlobalState {
	pub fn new(config: FeedConfig, db: Arc<sqlx::PgPool>, nats: async_nats::Client, ctx: CancellationToken) -> Self {
		let reporter = NatsReporter::new(nats.clone(), config.fanout.subject("errors"));

		let fanout = FanoutPublisher::new(
			PgFollowIndex::new(db.clone()),
			PgNewsfeedStore::new(db.clone()),
			PgPostIndex::new(db.clone()),
			reporter,
			config.fanout.clone(),
		);

		let threads = ThreadAssembler::new(PgCommentStore::new(db.clone()), config.thread.clone());

		Self {
			ctx,
			config,
			nats,
			db,
			tasks: TaskTracker::new(),
			fanout,
			threads,
		}
	}
}

impl GlobalCtx for GlobalState {
	#[inline(always)]
	fn ctx(&self) -> &CancellationToken {
		&self.ctx
	}
}

impl GlobalConfigProvider<FeedConfig> for GlobalState {
	#[inline(always)]
	fn provide_config(&self) -> &FeedConfig {
		&self.config
	}
}

impl GlobalConfig for GlobalState {}

impl GlobalNats for GlobalState {
	#[inline(always)]
	fn nats(&self) -> &async_nats::Client {
		&self.nats
	}
}

impl GlobalDb for GlobalState {
	#[inline(always)]
	fn db(&self) -> &Arc<sqlx::PgPool> {
		&self.db
	}
}

impl FeedState for GlobalState {
	#[inline(always)]
	fn fanout(&self) -> &PgFanoutPublisher {
		&self.fanout
	}

	#[inline(always)]
	fn threads(&self) -> &PgThreadAssembler {
		&self.threads
	}

	#[inline(always)]
	fn tasks(&self) -> &TaskTracker {
		&self.tasks
	}
}

pub async fn setup_nats(name: &str, config: &NatsConfig) -> anyhow::Result<async_nats::Client> {
	let mut options = async_nats::ConnectOptions::new()
		.connection_timeout(Duration::from_secs(5))
		.name(name)
		.retry_on_initial_connect();

	if let Some(user) = &config.username {
		options = options.user_and_password(user.clone(), config.password.clone().unwrap_or_default())
	} else if let Some(token) = &config.token {
		options = options.token(token.clone())
	}

	options
		.connect(
			config
				.servers
				.iter()
				.map(|s| s.parse::<ServerAddr>())
				.collect::<Result<Vec<_>, _>>()
				.context("failed to parse nats server addresses")?,
		)
		.await
		.context("failed to connect to nats")
}

pub async fn setup_database(config: &DatabaseConfig) -> anyhow::Result<Arc<sqlx::PgPool>> {
	let options = PgConnectOptions::from_str(&config.uri)
		.context("failed to parse database uri")?
		.disable_statement_logging()
		.to_owned();

	let pool = PgPoolOptions::new()
		.max_connections(config.max_connections)
		.acquire_timeout(config.acquire_timeout)
		.connect_with(options)
		.await
		.context("failed to connect to database")?;

	Ok(Arc::new(pool))
}
