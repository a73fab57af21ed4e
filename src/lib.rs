//! Election Vote Intake System
//!
//! Registers candidates and parties, looks up voters by national ID, and
//! records one ballot per voter per contested office in an append-only ledger.

pub mod config;
pub mod election;
pub mod errors;
pub mod types;

// Re-export commonly used types
pub use errors::{Error, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the voting system with proper logging
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "votacion=info".into()),
        )
        .init();

    tracing::info!("🗳️  Vote intake system v{} initialized", VERSION);
    Ok(())
}
