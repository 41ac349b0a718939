use serial_test::serial;

use crate::logging::{init, LoggingError, Mode};

#[test]
#[serial]
fn test_init() {
	init("info", Mode::Compact).expect("failed to init logger");
	// a second call only changes the level
	init("debug", Mode::Json).expect("failed to reload logger");
}

#[test]
#[serial]
fn test_with_bad_input() {
	assert!(matches!(init("feed=notalevel", Mode::Default), Err(LoggingError::InvalidLevel(_))));
}
