mod around;
mod config;
mod cursor;
mod paginator;
