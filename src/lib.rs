pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod retry;
pub mod worker;

pub use backend::LockBackend;
pub use client::LockClient;
pub use error::LockError;
