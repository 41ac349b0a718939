use common::database::Ulid;

use crate::config::ThreadConfig;
use crate::database::{Comment, CommentKind};
use crate::error::{FeedError, Result};
use crate::pagination::{AroundAnchorRetriever, CursorPaginator, Order, PageBound, PageWindow};
use crate::store::{CommentFilter, CommentStore, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ThreadOptions {
	/// Size of the root comment window
	pub limit: Option<usize>,
	/// Size of the reply window, defaults to `limit`
	pub target_child_limit: Option<usize>,
	pub viewer_id: Option<Ulid>,
	/// Order of both windows, newest first unless asked otherwise
	pub order: Order,
}

impl Default for ThreadOptions {
	fn default() -> Self {
		Self {
			limit: None,
			target_child_limit: None,
			viewer_id: None,
			order: Order::Desc,
		}
	}
}

/// A root comment in a thread window. Only the root the anchor belongs to
/// carries its replies.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ThreadNode {
	#[serde(flatten)]
	pub comment: Comment,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub replies: Option<PageWindow<Comment>>,
}

pub struct ThreadAssembler<S> {
	store: S,
	limits: ThreadConfig,
}

impl<S: CommentStore> ThreadAssembler<S> {
	pub fn new(store: S, limits: ThreadConfig) -> Self {
		Self { store, limits }
	}

	fn resolve_limit(&self, limit: Option<usize>, default: usize) -> Result<usize> {
		match limit.unwrap_or(default) {
			0 => Err(FeedError::InvalidArgument("limit must be at least 1")),
			limit if limit > self.limits.max_limit => Err(FeedError::InvalidArgument("limit exceeds the maximum")),
			limit => Ok(limit),
		}
	}

	/// The window of root comments around the thread `anchor_id` belongs to.
	///
	/// For a reply the window is centred on its parent, which carries a window
	/// of its replies centred on the anchor. For a root comment the window is
	/// centred on the anchor itself, which carries the first page of its replies.
	#[tracing::instrument(skip(self, options), fields(anchor_id = %anchor_id))]
	pub async fn get_thread_around_comment(&self, anchor_id: Ulid, options: ThreadOptions) -> Result<PageWindow<ThreadNode>> {
		let outer_limit = self.resolve_limit(options.limit, self.limits.default_limit)?;
		let inner_limit = self.resolve_limit(options.target_child_limit, outer_limit)?;

		let visibility = Visibility {
			viewer_id: options.viewer_id,
		};

		let anchor = self
			.store
			.find_comment(anchor_id, &visibility)
			.await?
			.ok_or(FeedError::NotFound("comment"))?;

		let order = options.order;
		let retriever = AroundAnchorRetriever::new(&self.store);

		let (root, replies) = match anchor.kind {
			CommentKind::Root => {
				let filter = CommentFilter::replies(anchor.post_id, anchor.id, visibility);
				let replies = CursorPaginator::new(&self.store)
					.paginate_from(&filter, order, PageBound::Start, inner_limit)
					.await?;
				(anchor, replies)
			}
			CommentKind::Reply { parent_id } => {
				let filter = CommentFilter::replies(anchor.post_id, parent_id, visibility);
				let siblings = retriever.get_around(&filter, order, &anchor, inner_limit).await?;

				let parent = self
					.store
					.find_comment(parent_id, &visibility)
					.await?
					.ok_or(FeedError::NotFound("parent comment"))?;

				(parent, siblings)
			}
		};

		let root_id = root.id;
		let filter = CommentFilter::roots(root.post_id, visibility);
		let window = retriever.get_around(&filter, order, &root, outer_limit).await?;

		let mut replies = Some(replies);

		Ok(window.map(|comment| ThreadNode {
			replies: if comment.id == root_id { replies.take() } else { None },
			comment,
		}))
	}
}
