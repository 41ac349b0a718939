#![forbid(unsafe_code)]

pub mod config;
pub mod database;
pub mod error;
pub mod event_handler;
pub mod fanout;
pub mod global;
pub mod pagination;
pub mod report;
pub mod retry;
pub mod store;
pub mod thread;

#[cfg(test)]
mod tests;
