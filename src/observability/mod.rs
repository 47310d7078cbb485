//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields: signature, address, mint)
//!
//! Consumers:
//!     → logging.rs subscriber (stderr, pretty or JSON)
//! ```

pub mod logging;
