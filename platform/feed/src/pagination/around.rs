use super::{CursorCodec, CursorPaginator, Keyed, KeysetSource, Order, PageBound, PageWindow};
use crate::error::{FeedError, Result};

/// Builds a window of rows centred on an anchor row.
pub struct AroundAnchorRetriever<'a, S> {
	source: &'a S,
	paginator: CursorPaginator<'a, S>,
}

impl<'a, S: KeysetSource> AroundAnchorRetriever<'a, S> {
	pub fn new(source: &'a S) -> Self {
		Self {
			source,
			paginator: CursorPaginator::new(source),
		}
	}

	/// Returns at most `total_limit` rows: the rows just before the anchor,
	/// the anchor itself, then the rows just after it. When the count around
	/// the anchor is odd the extra row goes after it.
	///
	/// The anchor is read again alongside the two sides, so a row that has
	/// been removed or hidden since the caller fetched it yields `NotFound`.
	pub async fn get_around(
		&self,
		filter: &S::Filter,
		order: Order,
		anchor: &S::Row,
		total_limit: usize,
	) -> Result<PageWindow<S::Row>> {
		if total_limit == 0 {
			return Err(FeedError::InvalidArgument("limit must be at least 1"));
		}

		let remaining = total_limit - 1;
		let sooner_limit = remaining.div_ceil(2);
		let later_limit = remaining - sooner_limit;

		let key = anchor.sort_key();

		let (sooner, later, current) = tokio::try_join!(
			self.paginator
				.paginate_from(filter, order, PageBound::After(key), sooner_limit),
			self.paginator
				.paginate_from(filter, order, PageBound::Before(key), later_limit),
			self.source.find_one(filter, key.id),
		)?;

		let current = current.ok_or(FeedError::NotFound("anchor row"))?;
		let anchor_cursor = CursorCodec::encode(&key);

		let start_cursor = match later.rows.is_empty() {
			true => Some(anchor_cursor.clone()),
			false => later.start_cursor,
		};
		let end_cursor = match sooner.rows.is_empty() {
			true => Some(anchor_cursor),
			false => sooner.end_cursor,
		};

		let mut rows = later.rows;
		rows.push(current);
		rows.extend(sooner.rows);

		Ok(PageWindow {
			rows,
			start_cursor,
			end_cursor,
			has_next_page: sooner.has_next_page,
			has_previous_page: later.has_previous_page,
		})
	}
}
