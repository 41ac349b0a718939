#[cfg(feature = "database")]
mod database;
#[cfg(feature = "logging")]
mod logging;
