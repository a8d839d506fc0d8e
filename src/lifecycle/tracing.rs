//! # Observability & Tracing
//!
//! This module provides the tracing infrastructure for the module host.
//!
//! ## Overview
//!
//! The [`setup_tracing`] function initializes structured logging with the
//! `tracing` crate. Every host operation logs with structured fields
//! (`module`, `hook`, `capability`, …) rather than interpolated strings, so
//! the output can be filtered and analyzed in production logging systems.
//!
//! ## Configuration
//!
//! The host uses a compact format that hides the crate/module prefix
//! (`with_target(false)`). This keeps log lines short while still providing
//! rich structured data.
//!
//! - **Structured logging** with `tracing` crate
//! - **Configurable log levels** via `RUST_LOG` environment variable
//! - **Compact format** optimized for development
//!
//! ## What Gets Traced
//!
//! - **Load/Unload**: per-module instantiation, exclusion decisions, the
//!   load and unload hooks, and the final set size
//! - **Wiring**: every resolved dependency edge and every failed connection
//! - **Injection**: the injector identity, provider count, and per-target
//!   failures
//! - **Dispatch**: every failed subscriber with module name and hook
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs
//! RUST_LOG=info cargo run
//!
//! # Show exclusion decisions and per-edge wiring
//! RUST_LOG=debug cargo run
//!
//! # Filter to the host only
//! RUST_LOG=module_host=debug cargo run
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - we use structured fields instead
        .compact()
        .init();
}
