use common::database::Ulid;
use itertools::Itertools;

use crate::config::FanoutConfig;
use crate::database::{AudienceChange, NewsfeedEntry, PostAudience};
use crate::error::{FeedError, Result};
use crate::pagination::{CursorPaginator, Order, PageArgs};
use crate::report::ErrorReporter;
use crate::retry::RetryPolicy;
use crate::store::{FollowIndex, FollowerQuery, NewsfeedStore, PostFilter, PostIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
	Attach,
	Detach,
	Follow,
	Unfollow,
	RemovePost,
}

impl Phase {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Attach => "attach",
			Self::Detach => "detach",
			Self::Follow => "follow",
			Self::Unfollow => "unfollow",
			Self::RemovePost => "remove_post",
		}
	}
}

/// What a fanout call got done. Failures never escape as errors; a phase that
/// failed is listed in `failed` and was abandoned at the failing batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FanoutReport {
	/// Batches read from the follow or post index
	pub batches: usize,
	/// Entries written or deleted, as reported by the store
	pub affected: u64,
	pub failed: Vec<Phase>,
}

impl FanoutReport {
	pub fn is_complete(&self) -> bool {
		self.failed.is_empty()
	}
}

/// Keeps `user_newsfeeds` in step with post audiences and group memberships.
pub struct FanoutPublisher<F, N, P, R> {
	follows: F,
	newsfeed: N,
	posts: P,
	reporter: R,
	retry: RetryPolicy,
	config: FanoutConfig,
}

impl<F, N, P, R> FanoutPublisher<F, N, P, R>
where
	F: FollowIndex,
	N: NewsfeedStore,
	P: PostIndex,
	R: ErrorReporter,
{
	pub fn new(follows: F, newsfeed: N, posts: P, reporter: R, config: FanoutConfig) -> Self {
		Self {
			follows,
			newsfeed,
			posts,
			reporter,
			retry: RetryPolicy::from(&config.retry),
			config,
		}
	}

	pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
		self.retry = retry;
		self
	}

	async fn retrying<T, Fut>(&self, op: impl FnMut() -> Fut) -> Result<T>
	where
		Fut: std::future::Future<Output = Result<T>>,
	{
		self.retry.run(op, FeedError::is_retryable).await
	}

	fn fail(&self, phase: Phase, err: FeedError, report: &mut FanoutReport) {
		tracing::error!(phase = phase.as_str(), err = %err, "fanout failed, abandoning phase");
		self.reporter.capture(phase.as_str(), &err);
		report.failed.push(phase);
	}

	/// Brings every follower's feed in line with a post moving from
	/// `old_group_ids` to `new_group_ids`.
	#[tracing::instrument(skip(self, new_group_ids, old_group_ids), fields(post_id = %post_id))]
	pub async fn fanout_on_write(&self, post_id: Ulid, new_group_ids: &[Ulid], old_group_ids: &[Ulid]) -> FanoutReport {
		let (_, change) = PostAudience::new(post_id, old_group_ids.iter().copied()).update(new_group_ids.iter().copied());
		self.apply(post_id, &change).await
	}

	/// Attach runs before detach. A failed attach does not stop the detach.
	pub async fn apply(&self, post_id: Ulid, change: &AudienceChange) -> FanoutReport {
		let mut report = FanoutReport::default();

		if change.is_empty() {
			tracing::debug!("audience unchanged, nothing to fan out");
			return report;
		}

		if !change.attached.is_empty() {
			self.fanout_phase(Phase::Attach, post_id, &change.attached, change.attach_exclusions(), &mut report)
				.await;
		}

		if !change.detached.is_empty() {
			self.fanout_phase(Phase::Detach, post_id, &change.detached, change.detach_exclusions(), &mut report)
				.await;
		}

		tracing::info!(
			batches = report.batches,
			affected = report.affected,
			complete = report.is_complete(),
			"fanout finished"
		);

		report
	}

	async fn fanout_phase(&self, phase: Phase, post_id: Ulid, targets: &[Ulid], exclude: &[Ulid], report: &mut FanoutReport) {
		let mut after_follow_id = 0;

		loop {
			let query = FollowerQuery {
				target_group_ids: targets,
				exclude_group_ids: exclude,
				after_follow_id,
				limit: self.config.batch_size.get(),
			};

			let batch = match self.retrying(|| self.follows.followers(&query)).await {
				Ok(batch) => batch,
				Err(err) => return self.fail(phase, err, report),
			};

			report.batches += 1;
			let fetched = batch.user_ids.len();

			// a user following several target groups appears once per follow
			let user_ids = batch.user_ids.into_iter().unique().collect::<Vec<_>>();

			if !user_ids.is_empty() {
				let written = match phase {
					Phase::Attach => {
						let entries = user_ids
							.iter()
							.map(|user_id| NewsfeedEntry::unseen(*user_id, post_id))
							.collect::<Vec<_>>();
						self.retrying(|| self.newsfeed.attach(&entries)).await
					}
					_ => self.retrying(|| self.newsfeed.detach(post_id, &user_ids)).await,
				};

				match written {
					Ok(affected) => report.affected += affected,
					Err(err) => return self.fail(phase, err, report),
				}
			}

			tracing::debug!(phase = phase.as_str(), fetched, after_follow_id, "fanout batch done");

			if fetched < self.config.batch_size.get() {
				break;
			}

			after_follow_id = batch.latest_follow_id;
		}
	}

	/// Adds the existing published posts of `group_ids` to the user's feed.
	#[tracing::instrument(skip(self, group_ids), fields(user_id = %user_id))]
	pub async fn follow_groups(&self, user_id: Ulid, group_ids: &[Ulid]) -> FanoutReport {
		let mut report = FanoutReport::default();

		if group_ids.is_empty() {
			return report;
		}

		let filter = PostFilter {
			group_ids: group_ids.to_vec(),
			exclude_group_ids: Vec::new(),
		};

		self.backfill(Phase::Follow, user_id, &filter, &mut report).await;

		report
	}

	/// Removes the posts of `group_ids` from the user's feed, keeping any post
	/// that also belongs to a group the user still follows.
	#[tracing::instrument(skip(self, group_ids), fields(user_id = %user_id))]
	pub async fn unfollow_groups(&self, user_id: Ulid, group_ids: &[Ulid]) -> FanoutReport {
		let mut report = FanoutReport::default();

		if group_ids.is_empty() {
			return report;
		}

		let still_following = match self.retrying(|| self.follows.groups_of_user(user_id)).await {
			Ok(groups) => groups,
			Err(err) => {
				self.fail(Phase::Unfollow, err, &mut report);
				return report;
			}
		};

		let filter = PostFilter {
			group_ids: group_ids.to_vec(),
			exclude_group_ids: still_following
				.into_iter()
				.filter(|group_id| !group_ids.contains(group_id))
				.collect(),
		};

		self.backfill(Phase::Unfollow, user_id, &filter, &mut report).await;

		report
	}

	async fn backfill(&self, phase: Phase, user_id: Ulid, filter: &PostFilter, report: &mut FanoutReport) {
		let paginator = CursorPaginator::new(&self.posts);
		let mut args = PageArgs::first(self.config.membership_batch_size.get());

		loop {
			let page = match self.retrying(|| paginator.paginate(filter, Order::Asc, &args)).await {
				Ok(page) => page,
				Err(err) => return self.fail(phase, err, report),
			};

			report.batches += 1;

			let post_ids = page.rows.iter().map(|post| post.id).collect::<Vec<_>>();

			let written = match phase {
				Phase::Follow => {
					let entries = post_ids
						.iter()
						.map(|post_id| NewsfeedEntry::unseen(user_id, *post_id))
						.collect::<Vec<_>>();
					self.retrying(|| self.newsfeed.attach(&entries)).await
				}
				_ => self.retrying(|| self.newsfeed.detach_for_user(user_id, &post_ids)).await,
			};

			match written {
				Ok(affected) => report.affected += affected,
				Err(err) => return self.fail(phase, err, report),
			}

			if !page.has_next_page {
				break;
			}

			args.after = page.end_cursor;
		}
	}

	/// Takes a deleted or unpublished post out of every feed.
	#[tracing::instrument(skip(self), fields(post_id = %post_id))]
	pub async fn remove_post(&self, post_id: Ulid) -> FanoutReport {
		let mut report = FanoutReport::default();

		match self.retrying(|| self.newsfeed.detach_post(post_id)).await {
			Ok(affected) => report.affected = affected,
			Err(err) => self.fail(Phase::RemovePost, err, &mut report),
		}

		report
	}
}
