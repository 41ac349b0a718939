use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use common::database::Ulid;

use crate::error::{FeedError, Result};

/// The `(created_at, id)` tuple every paginated table is ordered by. The id
/// breaks ties between rows created in the same instant, so the order is strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey {
	pub created_at: DateTime<Utc>,
	pub id: Ulid,
}

impl SortKey {
	pub fn new(created_at: DateTime<Utc>, id: Ulid) -> Self {
		Self { created_at, id }
	}
}

/// Rows that can be placed in the keyset order.
pub trait Keyed {
	fn sort_key(&self) -> SortKey;
}

const SEPARATOR: char = ',';

/// Turns a [`SortKey`] into an opaque token and back.
///
/// Tokens are `base64url(<rfc3339 with nanoseconds>,<ulid>)`. They are not
/// signed; the only promise is that `decode(encode(k)) == k`.
pub struct CursorCodec;

impl CursorCodec {
	pub fn encode(key: &SortKey) -> String {
		let raw = format!(
			"{}{SEPARATOR}{}",
			key.created_at.to_rfc3339_opts(SecondsFormat::Nanos, true),
			key.id
		);

		URL_SAFE_NO_PAD.encode(raw)
	}

	pub fn decode(token: &str) -> Result<SortKey> {
		let invalid = || FeedError::InvalidArgument("invalid cursor");

		let raw = URL_SAFE_NO_PAD.decode(token).map_err(|_| invalid())?;
		let raw = String::from_utf8(raw).map_err(|_| invalid())?;
		let (created_at, id) = raw.split_once(SEPARATOR).ok_or_else(invalid)?;

		let created_at = DateTime::parse_from_rfc3339(created_at)
			.map_err(|_| invalid())?
			.with_timezone(&Utc);
		let id = id.parse::<Ulid>().map_err(|_| invalid())?;

		Ok(SortKey { created_at, id })
	}
}
