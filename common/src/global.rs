use std::sync::Arc;

use tokio_util::sync::CancellationToken;

pub trait GlobalCtx {
	fn ctx(&self) -> &CancellationToken;
}

pub trait GlobalConfig {
	#[inline(always)]
	fn config<C>(&self) -> &C
	where
		Self: GlobalConfigProvider<C>,
	{
		GlobalConfigProvider::provide_config(self)
	}
}

pub trait GlobalConfigProvider<C> {
	fn provide_config(&self) -> &C;
}

pub trait GlobalNats {
	fn nats(&self) -> &async_nats::Client;
}

pub trait GlobalDb {
	fn db(&self) -> &Arc<sqlx::PgPool>;
}
