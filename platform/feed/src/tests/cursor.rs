use chrono::{TimeZone, Utc};

use super::memory::{at, ulid};
use crate::error::FeedError;
use crate::pagination::{CursorCodec, SortKey};

#[test]
fn test_cursor_round_trip() {
	let keys = [
		SortKey::new(at(0), ulid(1)),
		SortKey::new(at(86_400), ulid(2)),
		// sub-microsecond precision survives
		SortKey::new(
			Utc.timestamp_opt(1_700_000_000, 123_456_789).single().expect("valid timestamp"),
			ulid(3),
		),
	];

	for key in keys {
		let token = CursorCodec::encode(&key);
		assert_eq!(CursorCodec::decode(&token).expect("failed to decode cursor"), key);
	}
}

#[test]
fn test_cursor_is_url_safe() {
	let token = CursorCodec::encode(&SortKey::new(at(42), ulid(42)));

	assert!(!token.is_empty());
	assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

#[test]
fn test_cursor_rejects_garbage() {
	for token in ["", "!!!", "bm90LWEtY3Vyc29y", "MjAyMy0xMS0xNFQyMjoxMzoyMFosbm90LWEtdWxpZA"] {
		assert!(
			matches!(CursorCodec::decode(token), Err(FeedError::InvalidArgument(_))),
			"{token} should not decode"
		);
	}
}
