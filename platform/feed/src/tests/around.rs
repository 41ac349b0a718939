use common::database::Ulid;

use super::memory::{at, comment, ulid, MemoryDb};
use crate::database::Comment;
use crate::error::FeedError;
use crate::pagination::{AroundAnchorRetriever, CursorCodec, Keyed, Order};
use crate::store::{CommentFilter, Visibility};

const POST: u64 = 500_000;

fn seeded(count: u64) -> (MemoryDb, Vec<Comment>, CommentFilter) {
	let db = MemoryDb::default();
	let rows = (1..=count)
		.map(|n| comment(n, ulid(POST), None, at(n as i64)))
		.collect::<Vec<_>>();

	for row in &rows {
		db.insert_comment(row.clone());
	}

	(db, rows, CommentFilter::roots(ulid(POST), Visibility::default()))
}

fn ids(rows: &[Comment]) -> Vec<Ulid> {
	rows.iter().map(|c| c.id).collect()
}

#[tokio::test]
async fn test_window_is_centred_on_anchor() {
	let (db, rows, filter) = seeded(21);
	let comments = db.comments();
	let retriever = AroundAnchorRetriever::new(&comments);

	let window = retriever
		.get_around(&filter, Order::Asc, &rows[10], 5)
		.await
		.expect("failed to get window");

	assert_eq!(ids(&window.rows), (9..=13).map(ulid).collect::<Vec<_>>());
	assert!(window.has_next_page);
	assert!(window.has_previous_page);
	assert_eq!(window.start_cursor, Some(CursorCodec::encode(&rows[8].sort_key())));
	assert_eq!(window.end_cursor, Some(CursorCodec::encode(&rows[12].sort_key())));
}

#[tokio::test]
async fn test_extra_row_goes_after_anchor() {
	let (db, rows, filter) = seeded(21);
	let comments = db.comments();
	let retriever = AroundAnchorRetriever::new(&comments);

	let window = retriever
		.get_around(&filter, Order::Asc, &rows[10], 4)
		.await
		.expect("failed to get window");

	assert_eq!(ids(&window.rows), vec![ulid(10), ulid(11), ulid(12), ulid(13)]);
}

#[tokio::test]
async fn test_anchor_at_start() {
	let (db, rows, filter) = seeded(21);
	let comments = db.comments();
	let retriever = AroundAnchorRetriever::new(&comments);

	let window = retriever
		.get_around(&filter, Order::Asc, &rows[0], 5)
		.await
		.expect("failed to get window");

	assert_eq!(ids(&window.rows), vec![ulid(1), ulid(2), ulid(3)]);
	assert!(!window.has_previous_page);
	assert!(window.has_next_page);
	assert_eq!(window.start_cursor, Some(CursorCodec::encode(&rows[0].sort_key())));
}

#[tokio::test]
async fn test_anchor_at_end() {
	let (db, rows, filter) = seeded(21);
	let comments = db.comments();
	let retriever = AroundAnchorRetriever::new(&comments);

	let window = retriever
		.get_around(&filter, Order::Asc, &rows[20], 5)
		.await
		.expect("failed to get window");

	assert_eq!(ids(&window.rows), vec![ulid(19), ulid(20), ulid(21)]);
	assert!(window.has_previous_page);
	assert!(!window.has_next_page);
	assert_eq!(window.end_cursor, Some(CursorCodec::encode(&rows[20].sort_key())));
}

#[tokio::test]
async fn test_single_row_window() {
	let (db, rows, filter) = seeded(3);
	let comments = db.comments();
	let retriever = AroundAnchorRetriever::new(&comments);

	let window = retriever
		.get_around(&filter, Order::Asc, &rows[1], 1)
		.await
		.expect("failed to get window");

	assert_eq!(ids(&window.rows), vec![ulid(2)]);
	let anchor_cursor = Some(CursorCodec::encode(&rows[1].sort_key()));
	assert_eq!(window.start_cursor, anchor_cursor);
	assert_eq!(window.end_cursor, anchor_cursor);
}

#[tokio::test]
async fn test_removed_anchor_is_not_found() {
	let (db, rows, filter) = seeded(5);
	let comments = db.comments();
	let retriever = AroundAnchorRetriever::new(&comments);

	db.delete_comment(rows[2].id);

	let result = retriever.get_around(&filter, Order::Asc, &rows[2], 3).await;
	assert!(matches!(result, Err(FeedError::NotFound(_))));

	db.hide_comment(rows[3].id);

	let result = retriever.get_around(&filter, Order::Asc, &rows[3], 3).await;
	assert!(matches!(result, Err(FeedError::NotFound(_))));
}

#[tokio::test]
async fn test_zero_limit_is_rejected() {
	let (db, rows, filter) = seeded(3);
	let comments = db.comments();
	let retriever = AroundAnchorRetriever::new(&comments);

	let result = retriever.get_around(&filter, Order::Asc, &rows[0], 0).await;
	assert!(matches!(result, Err(FeedError::InvalidArgument(_))));
}
