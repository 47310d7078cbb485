//! Client for the Aogo token-claim program and its authorization service.

pub mod blockchain;
pub mod claims;
pub mod config;
pub mod context;
pub mod observability;

pub use config::ClientConfig;
pub use context::AogoContext;
