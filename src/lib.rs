//! Structured logging bootstrap for `tracing`.
//!
//! Severities in decreasing order of precedence:
//! Error > Warn > Info > Debug
//!
//! ```no_run
//! use logwire::{Secret, Severity};
//! use tracing::{debug, error, info};
//!
//! fn main() {
//!     let _cleanup = match logwire::init_guarded(Severity::Debug, false) {
//!         Ok(guard) => guard,
//!         Err(e) => {
//!             eprintln!("failed to set up logging: {e}");
//!             std::process::exit(1);
//!         }
//!     };
//!
//!     info!(name = "demo", vcpu = 8, "created vm at provider");
//!     debug!(username = "ram", password = %Secret::new("admin"), "read userinfo from db");
//!     error!(vm = "demo", "failed to attach volume at vm");
//! }
//! ```
//!
//! Output:
//!
//! ```text
//! {"level":"info","time":"2025-11-08T21:31:09.311+0530","line":"src/main.rs:14","msg":"created vm at provider","name":"demo","vcpu":8}
//! {"level":"debug","time":"2025-11-08T21:31:09.311+0530","line":"src/main.rs:15","msg":"read userinfo from db","username":"ram","password":"****"}
//! {"level":"error","time":"2025-11-08T21:31:09.311+0530","line":"src/main.rs:16","msg":"failed to attach volume at vm","vm":"demo"}
//! ```

pub mod config;
mod encoder;
pub mod error;
mod logger;
#[cfg(test)]
mod logger_tests;
mod logging;
pub mod redaction;
mod sampling;
mod secret;
mod severity;
mod sink;

// Re-export core types and functions
pub use config::{Encoding, FieldKeys, LoggingConfig, Output, Sampling};
pub use encoder::{RecordEncoder, TIME_FORMAT};
pub use error::{ConfigError, Error, Result};
pub use logger::Logger;
pub use logging::{
    cleanup, init, init_from_env, init_guarded, init_with_config, CleanupGuard,
};
pub use redaction::{register_for_redaction, register_secret_for_redaction, scrub};
pub use sampling::SamplingLayer;
pub use secret::{Secret, REDACTION_MARKER};
pub use severity::Severity;
pub use sink::{LogSink, MemoryWriter, SinkWriter};
