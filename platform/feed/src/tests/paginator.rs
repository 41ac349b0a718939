use common::database::Ulid;

use super::memory::{at, comment, ulid, MemoryDb};
use crate::database::Comment;
use crate::error::FeedError;
use crate::pagination::{CursorPaginator, Order, PageArgs};
use crate::store::{CommentFilter, Visibility};

const POST: u64 = 500_000;

/// `count` root comments, one second apart, with ids 1..=count.
fn seeded(count: u64) -> (MemoryDb, CommentFilter) {
	let db = MemoryDb::default();
	for n in 1..=count {
		db.insert_comment(comment(n, ulid(POST), None, at(n as i64)));
	}

	(db, CommentFilter::roots(ulid(POST), Visibility::default()))
}

fn ids(rows: &[Comment]) -> Vec<Ulid> {
	rows.iter().map(|c| c.id).collect()
}

fn range(from: u64, to: u64) -> Vec<Ulid> {
	(from..=to).map(ulid).collect()
}

#[tokio::test]
async fn test_first_page() {
	let (db, filter) = seeded(21);
	let comments = db.comments();
	let paginator = CursorPaginator::new(&comments);

	let page = paginator
		.paginate(&filter, Order::Asc, &PageArgs::first(5))
		.await
		.expect("failed to paginate");

	assert_eq!(ids(&page.rows), range(1, 5));
	assert!(page.has_next_page);
	assert!(!page.has_previous_page);
	assert!(page.start_cursor.is_some());
	assert!(page.end_cursor.is_some());
}

#[tokio::test]
async fn test_walk_forward_visits_every_row_once() {
	let (db, filter) = seeded(21);
	let comments = db.comments();
	let paginator = CursorPaginator::new(&comments);

	let mut args = PageArgs::first(5);
	let mut seen = Vec::new();
	let mut pages = 0;

	loop {
		let page = paginator.paginate(&filter, Order::Asc, &args).await.expect("failed to paginate");
		pages += 1;
		seen.extend(ids(&page.rows));

		if pages > 1 {
			assert!(page.has_previous_page);
		}

		if !page.has_next_page {
			break;
		}

		args.after = page.end_cursor;
	}

	assert_eq!(pages, 5);
	assert_eq!(seen, range(1, 21));
}

#[tokio::test]
async fn test_walk_backward() {
	let (db, filter) = seeded(12);
	let comments = db.comments();
	let paginator = CursorPaginator::new(&comments);

	let first = paginator
		.paginate(&filter, Order::Asc, &PageArgs::first(5))
		.await
		.expect("failed to paginate");
	let second = paginator
		.paginate(
			&filter,
			Order::Asc,
			&PageArgs {
				after: first.end_cursor.clone(),
				limit: 5,
				..Default::default()
			},
		)
		.await
		.expect("failed to paginate");

	assert_eq!(ids(&second.rows), range(6, 10));

	let back = paginator
		.paginate(
			&filter,
			Order::Asc,
			&PageArgs {
				before: second.start_cursor.clone(),
				limit: 5,
				..Default::default()
			},
		)
		.await
		.expect("failed to paginate");

	// rows come back in the requested order, not the fetch order
	assert_eq!(ids(&back.rows), range(1, 5));
	assert!(back.has_next_page);
	assert!(!back.has_previous_page);
	assert_eq!(back.start_cursor, first.start_cursor);
	assert_eq!(back.end_cursor, first.end_cursor);

	let partial = paginator
		.paginate(
			&filter,
			Order::Asc,
			&PageArgs {
				before: second.end_cursor.clone(),
				limit: 3,
				..Default::default()
			},
		)
		.await
		.expect("failed to paginate");

	assert_eq!(ids(&partial.rows), range(7, 9));
	assert!(partial.has_previous_page);
}

#[tokio::test]
async fn test_descending_order() {
	let (db, filter) = seeded(8);
	let comments = db.comments();
	let paginator = CursorPaginator::new(&comments);

	let page = paginator
		.paginate(&filter, Order::Desc, &PageArgs::first(3))
		.await
		.expect("failed to paginate");
	assert_eq!(ids(&page.rows), vec![ulid(8), ulid(7), ulid(6)]);

	let next = paginator
		.paginate(
			&filter,
			Order::Desc,
			&PageArgs {
				after: page.end_cursor,
				limit: 3,
				..Default::default()
			},
		)
		.await
		.expect("failed to paginate");
	assert_eq!(ids(&next.rows), vec![ulid(5), ulid(4), ulid(3)]);
}

#[tokio::test]
async fn test_ties_are_broken_by_id() {
	let db = MemoryDb::default();
	for n in 1..=7 {
		db.insert_comment(comment(n, ulid(POST), None, at(0)));
	}
	let filter = CommentFilter::roots(ulid(POST), Visibility::default());
	let comments = db.comments();
	let paginator = CursorPaginator::new(&comments);

	let mut args = PageArgs::first(2);
	let mut seen = Vec::new();
	loop {
		let page = paginator.paginate(&filter, Order::Asc, &args).await.expect("failed to paginate");
		seen.extend(ids(&page.rows));
		if !page.has_next_page {
			break;
		}
		args.after = page.end_cursor;
	}

	assert_eq!(seen, range(1, 7));
}

#[tokio::test]
async fn test_zero_limit() {
	let (db, filter) = seeded(3);
	let comments = db.comments();
	let paginator = CursorPaginator::new(&comments);

	let page = paginator
		.paginate(&filter, Order::Asc, &PageArgs::first(0))
		.await
		.expect("failed to paginate");

	assert!(page.rows.is_empty());
	assert!(page.start_cursor.is_none());
	assert!(page.end_cursor.is_none());
	assert!(page.has_next_page);
}

#[tokio::test]
async fn test_rejects_both_cursors() {
	let (db, filter) = seeded(3);
	let comments = db.comments();
	let paginator = CursorPaginator::new(&comments);

	let page = paginator
		.paginate(&filter, Order::Asc, &PageArgs::first(1))
		.await
		.expect("failed to paginate");

	let result = paginator
		.paginate(
			&filter,
			Order::Asc,
			&PageArgs {
				after: page.end_cursor.clone(),
				before: page.end_cursor,
				limit: 1,
			},
		)
		.await;

	assert!(matches!(result, Err(FeedError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_rejects_malformed_cursor() {
	let (db, filter) = seeded(3);
	let comments = db.comments();
	let paginator = CursorPaginator::new(&comments);

	let result = paginator
		.paginate(
			&filter,
			Order::Asc,
			&PageArgs {
				after: Some("definitely not a cursor".to_string()),
				limit: 1,
				..Default::default()
			},
		)
		.await;

	assert!(matches!(result, Err(FeedError::InvalidArgument(_))));
}
