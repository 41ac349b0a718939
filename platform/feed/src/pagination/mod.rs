use std::future::Future;

use common::database::Ulid;

use crate::error::Result;

mod around;
mod cursor;
mod paginator;

pub use around::AroundAnchorRetriever;
pub use cursor::{CursorCodec, Keyed, SortKey};
pub use paginator::{CursorPaginator, PageBound};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
	#[default]
	Asc,
	Desc,
}

impl Order {
	pub fn reverse(self) -> Self {
		match self {
			Self::Asc => Self::Desc,
			Self::Desc => Self::Asc,
		}
	}

	pub fn as_sql(self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
	Gt,
	Lt,
}

impl Comparison {
	pub fn as_sql(self) -> &'static str {
		match self {
			Self::Gt => ">",
			Self::Lt => "<",
		}
	}
}

/// A strict bound on the sort key: rows must compare `comparison` against `key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBound {
	pub comparison: Comparison,
	pub key: SortKey,
}

impl KeyBound {
	/// Rows that come after `key` when walking in `order`.
	pub fn after(key: SortKey, order: Order) -> Self {
		let comparison = match order {
			Order::Asc => Comparison::Gt,
			Order::Desc => Comparison::Lt,
		};

		Self { comparison, key }
	}

	/// Rows that come before `key` when walking in `order`.
	pub fn before(key: SortKey, order: Order) -> Self {
		Self::after(key, order.reverse())
	}

	pub fn admits(&self, key: &SortKey) -> bool {
		match self.comparison {
			Comparison::Gt => *key > self.key,
			Comparison::Lt => *key < self.key,
		}
	}
}

/// Caller supplied paging arguments. At most one of `after` and `before` may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct PageArgs {
	pub after: Option<String>,
	pub before: Option<String>,
	pub limit: usize,
}

impl PageArgs {
	pub fn first(limit: usize) -> Self {
		Self {
			limit,
			..Default::default()
		}
	}
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PageWindow<T> {
	pub rows: Vec<T>,
	pub start_cursor: Option<String>,
	pub end_cursor: Option<String>,
	pub has_next_page: bool,
	pub has_previous_page: bool,
}

impl<T> PageWindow<T> {
	pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageWindow<U> {
		PageWindow {
			rows: self.rows.into_iter().map(f).collect(),
			start_cursor: self.start_cursor,
			end_cursor: self.end_cursor,
			has_next_page: self.has_next_page,
			has_previous_page: self.has_previous_page,
		}
	}
}

impl<T: Keyed> PageWindow<T> {
	fn from_rows(rows: Vec<T>, has_next_page: bool, has_previous_page: bool) -> Self {
		let start_cursor = rows.first().map(|row| CursorCodec::encode(&row.sort_key()));
		let end_cursor = rows.last().map(|row| CursorCodec::encode(&row.sort_key()));

		Self {
			rows,
			start_cursor,
			end_cursor,
			has_next_page,
			has_previous_page,
		}
	}
}

/// A store that can read rows in keyset order.
pub trait KeysetSource: Send + Sync {
	type Row: Keyed + Send;
	type Filter: Send + Sync;

	/// Up to `limit` rows matching `filter` and `bound`, in `order`.
	fn find_page(
		&self,
		filter: &Self::Filter,
		bound: Option<KeyBound>,
		order: Order,
		limit: usize,
	) -> impl Future<Output = Result<Vec<Self::Row>>> + Send;

	/// Fetches one row by id. Only the visibility rules of `filter` apply,
	/// never its scope.
	fn find_one(&self, filter: &Self::Filter, id: Ulid) -> impl Future<Output = Result<Option<Self::Row>>> + Send;
}
