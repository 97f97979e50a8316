pub mod codec;
pub mod commands;
pub mod config;
pub mod connection;
pub mod engine;
pub mod frame;
pub mod response;
pub mod server;
pub mod store;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
