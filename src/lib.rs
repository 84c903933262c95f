// Chat-bot relay answering league questions from a shared spreadsheet.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod keep_alive;
pub mod metrics;
pub mod query;
pub mod rate_limit;
pub mod sheets;
