//! # halo-telemetry
//!
//! Structured logging and distributed tracing for the Halo crates.
//!
//! ```rust
//! use halo_telemetry::{init_telemetry, info};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     init_telemetry("halo")?;
//!     info!(channel = "web", "ready");
//!     Ok(())
//! }
//! ```

pub mod init;
pub mod spans;

pub use tracing::{Instrument, Span, debug, error, info, instrument, trace, warn};

pub use spans::*;

pub use init::{TelemetryError, init_telemetry, init_with_otlp, shutdown_telemetry};
