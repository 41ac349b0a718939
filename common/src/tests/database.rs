use crate::database::{is_transient, Ulid};

#[test]
fn test_ulid_conversions() {
	let id = Ulid::new();

	let uuid = uuid::Uuid::from(id);
	assert_eq!(Ulid::from(uuid), id);

	let parsed: Ulid = id.to_string().parse().expect("failed to parse ulid");
	assert_eq!(parsed, id);

	assert!("not-a-ulid".parse::<Ulid>().is_err());
}

#[test]
fn test_ulid_order_follows_time() {
	let earlier = Ulid::from(ulid::Ulid::from_parts(1_000, 5));
	let later = Ulid::from(ulid::Ulid::from_parts(2_000, 1));

	assert!(earlier < later);
	assert_eq!(earlier.timestamp_ms(), 1_000);
}

#[test]
fn test_is_transient() {
	assert!(is_transient(&sqlx::Error::PoolTimedOut));
	assert!(is_transient(&sqlx::Error::Io(std::io::Error::from(std::io::ErrorKind::ConnectionReset))));
	assert!(!is_transient(&sqlx::Error::RowNotFound));
	assert!(!is_transient(&sqlx::Error::PoolClosed));
}
