use std::sync::Arc;

use anyhow::Context as _;
use common::database::Ulid;
use futures::StreamExt;
use tokio::select;

use crate::config::FeedConfig;
use crate::global::FeedGlobal;
use crate::thread::ThreadOptions;

/// The subjects the worker listens on, relative to `fanout.subject_prefix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
	AudienceChanged,
	PostRemoved,
	MembershipChanged,
	ThreadAround,
}

impl EventKind {
	pub const ALL: [Self; 4] = [
		Self::AudienceChanged,
		Self::PostRemoved,
		Self::MembershipChanged,
		Self::ThreadAround,
	];

	pub fn subject_name(self) -> &'static str {
		match self {
			Self::AudienceChanged => "audience_changed",
			Self::PostRemoved => "post_removed",
			Self::MembershipChanged => "membership_changed",
			Self::ThreadAround => "thread_around",
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct AudienceChanged {
	pub post_id: Ulid,
	#[serde(default)]
	pub new_group_ids: Vec<Ulid>,
	#[serde(default)]
	pub old_group_ids: Vec<Ulid>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct PostRemoved {
	pub post_id: Ulid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipAction {
	Follow,
	Unfollow,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct MembershipChanged {
	pub user_id: Ulid,
	pub group_ids: Vec<Ulid>,
	pub action: MembershipAction,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ThreadRequest {
	pub comment_id: Ulid,
	#[serde(flatten)]
	pub options: ThreadOptions,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "snake_case")]
enum ThreadResponse<T> {
	Data(T),
	Error { kind: &'static str, message: String },
}

pub async fn run<G: FeedGlobal>(global: Arc<G>) -> anyhow::Result<()> {
	let config = global.config::<FeedConfig>();

	let mut subscriptions = Vec::with_capacity(EventKind::ALL.len());
	for kind in EventKind::ALL {
		let subject = config.fanout.subject(kind.subject_name());
		let subscriber = global
			.nats()
			.subscribe(subject.clone())
			.await
			.with_context(|| format!("failed to subscribe to {subject}"))?;

		tracing::info!(subject = subject, "listening for events");
		subscriptions.push(subscriber.map(move |message| (kind, message)));
	}

	let mut messages = futures::stream::select_all(subscriptions);

	loop {
		select! {
			_ = global.ctx().cancelled() => break,
			message = messages.next() => {
				let Some((kind, message)) = message else {
					anyhow::bail!("nats subscriptions closed");
				};

				let handler_global = global.clone();
				global.tasks().spawn(async move {
					if let Err(err) = handle_message(&handler_global, kind, message).await {
						tracing::error!(event = kind.subject_name(), err = %err, "failed to handle event");
					}
				});
			}
		}
	}

	Ok(())
}

async fn handle_message<G: FeedGlobal>(global: &Arc<G>, kind: EventKind, message: async_nats::Message) -> anyhow::Result<()> {
	match kind {
		EventKind::AudienceChanged => {
			let event: AudienceChanged = serde_json::from_slice(&message.payload).context("invalid audience event")?;
			global
				.fanout()
				.fanout_on_write(event.post_id, &event.new_group_ids, &event.old_group_ids)
				.await;
		}
		EventKind::PostRemoved => {
			let event: PostRemoved = serde_json::from_slice(&message.payload).context("invalid post removal event")?;
			global.fanout().remove_post(event.post_id).await;
		}
		EventKind::MembershipChanged => {
			let event: MembershipChanged = serde_json::from_slice(&message.payload).context("invalid membership event")?;
			match event.action {
				MembershipAction::Follow => global.fanout().follow_groups(event.user_id, &event.group_ids).await,
				MembershipAction::Unfollow => global.fanout().unfollow_groups(event.user_id, &event.group_ids).await,
			};
		}
		EventKind::ThreadAround => {
			let reply = message.reply.context("thread request has no reply subject")?;
			let request: ThreadRequest = serde_json::from_slice(&message.payload).context("invalid thread request")?;

			let response = match global
				.threads()
				.get_thread_around_comment(request.comment_id, request.options)
				.await
			{
				Ok(window) => ThreadResponse::Data(window),
				Err(err) => ThreadResponse::Error {
					kind: err.kind(),
					message: err.to_string(),
				},
			};

			let payload = serde_json::to_vec(&response).context("failed to serialize thread response")?;

			global
				.nats()
				.publish(reply, payload.into())
				.await
				.context("failed to publish thread response")?;
		}
	}

	Ok(())
}
