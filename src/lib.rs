pub mod bidding;
pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod scheduler;
pub mod session;
pub mod store;
