use super::{CursorCodec, KeyBound, KeysetSource, Order, PageArgs, PageWindow, SortKey};
use crate::error::{FeedError, Result};

/// Where a page starts, after the cursors have been decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageBound {
	#[default]
	Start,
	After(SortKey),
	Before(SortKey),
}

impl TryFrom<&PageArgs> for PageBound {
	type Error = FeedError;

	fn try_from(args: &PageArgs) -> Result<Self> {
		match (args.after.as_deref(), args.before.as_deref()) {
			(Some(_), Some(_)) => Err(FeedError::InvalidArgument("after and before cannot be used together")),
			(Some(after), None) => Ok(Self::After(CursorCodec::decode(after)?)),
			(None, Some(before)) => Ok(Self::Before(CursorCodec::decode(before)?)),
			(None, None) => Ok(Self::Start),
		}
	}
}

pub struct CursorPaginator<'a, S> {
	source: &'a S,
}

impl<'a, S: KeysetSource> CursorPaginator<'a, S> {
	pub fn new(source: &'a S) -> Self {
		Self { source }
	}

	pub async fn paginate(&self, filter: &S::Filter, order: Order, args: &PageArgs) -> Result<PageWindow<S::Row>> {
		let bound = PageBound::try_from(args)?;
		self.paginate_from(filter, order, bound, args.limit).await
	}

	/// Reads one extra row to learn whether more exist past the page. A
	/// `Before` bound walks backwards and the rows are flipped back
	/// into `order` afterwards.
	pub async fn paginate_from(
		&self,
		filter: &S::Filter,
		order: Order,
		bound: PageBound,
		limit: usize,
	) -> Result<PageWindow<S::Row>> {
		let (key_bound, fetch_order) = match bound {
			PageBound::Start => (None, order),
			PageBound::After(key) => (Some(KeyBound::after(key, order)), order),
			PageBound::Before(key) => (Some(KeyBound::before(key, order)), order.reverse()),
		};

		let mut rows = self
			.source
			.find_page(filter, key_bound, fetch_order, limit.saturating_add(1))
			.await?;

		let has_more = rows.len() > limit;
		rows.truncate(limit);

		let (has_next_page, has_previous_page) = match bound {
			PageBound::Start => (has_more, false),
			PageBound::After(_) => (has_more, true),
			PageBound::Before(_) => {
				rows.reverse();
				(true, has_more)
			}
		};

		Ok(PageWindow::from_rows(rows, has_next_page, has_previous_page))
	}
}
