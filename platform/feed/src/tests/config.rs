use std::time::Duration;

use serial_test::serial;

use crate::config::FeedConfig;

fn clear_env() {
	for (key, _) in std::env::vars() {
		if key.starts_with("FEED_") {
			std::env::remove_var(key);
		}
	}
}

#[test]
#[serial]
fn test_defaults() {
	clear_env();

	let config = FeedConfig::parse().expect("failed to parse config");

	assert_eq!(config, FeedConfig::default());
	assert_eq!(config.fanout.batch_size.get(), 1000);
	assert_eq!(config.fanout.membership_batch_size.get(), 500);
	assert_eq!(config.fanout.retry.max_attempts, 3);
	assert_eq!(config.fanout.retry.backoff, Duration::from_millis(100));
	assert_eq!(config.thread.default_limit, 10);
	assert_eq!(config.thread.max_limit, 100);
	assert_eq!(config.fanout.subject("audience_changed"), "feed.audience_changed");
}

#[test]
#[serial]
fn test_file_and_env() {
	clear_env();

	let tmp_dir = tempfile::tempdir().expect("failed to create temp dir");
	let config_file = tmp_dir.path().join("feed.toml");

	std::fs::write(
		&config_file,
		r#"
name = "feed-test"

[fanout]
batch_size = 250
subject_prefix = "staging.feed"

[fanout.retry]
backoff = 20

[thread]
max_limit = 50
"#,
	)
	.expect("failed to write config file");

	std::env::set_var("FEED_CONFIG_FILE", config_file.to_str().expect("failed to get config path"));
	std::env::set_var("FEED_FANOUT__BATCH_SIZE", "10");
	std::env::set_var("FEED_FANOUT__RETRY__MAX_ATTEMPTS", "5");

	let config = FeedConfig::parse();

	clear_env();

	let config = config.expect("failed to parse config");
	assert_eq!(config.name, "feed-test");
	assert_eq!(config.fanout.batch_size.get(), 10);
	assert_eq!(config.fanout.retry.max_attempts, 5);
	assert_eq!(config.fanout.retry.backoff, Duration::from_millis(20));
	assert_eq!(config.fanout.subject("errors"), "staging.feed.errors");
	assert_eq!(config.thread.max_limit, 50);
	assert_eq!(config.thread.default_limit, 10);
}

#[test]
#[serial]
fn test_named_file_must_exist() {
	clear_env();

	std::env::set_var("FEED_CONFIG_FILE", "/definitely/not/here.toml");
	let config = FeedConfig::parse();
	clear_env();

	assert!(config.is_err());
}

#[test]
#[serial]
fn test_zero_batch_sizes_are_rejected() {
	clear_env();

	std::env::set_var("FEED_FANOUT__BATCH_SIZE", "0");
	let config = FeedConfig::parse();
	clear_env();

	assert!(config.is_err());

	std::env::set_var("FEED_FANOUT__MEMBERSHIP_BATCH_SIZE", "0");
	let config = FeedConfig::parse();
	clear_env();

	assert!(config.is_err());
}

#[test]
#[serial]
fn test_zero_batch_size_in_file_is_rejected() {
	clear_env();

	let tmp_dir = tempfile::tempdir().expect("failed to create temp dir");
	let config_file = tmp_dir.path().join("feed.toml");
	std::fs::write(&config_file, "[fanout]\nbatch_size = 0\n").expect("failed to write config file");

	std::env::set_var("FEED_CONFIG_FILE", config_file.to_str().expect("failed to get config path"));
	let config = FeedConfig::parse();
	clear_env();

	assert!(config.is_err());
}
