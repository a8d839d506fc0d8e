#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Module Host
//!
//! > **A module-lifecycle orchestrator for a game-engine runtime.**
//!
//! This crate discovers registered module types, instantiates them in a
//! dependency-respecting order, wires cross-module dependencies and a
//! functionality-injection graph, forwards engine lifecycle events to
//! subscribed modules, and tears everything down deterministically.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Explicit over Reflected
//!
//! There is no runtime type discovery. Module types are described by a
//! statically assembled descriptor table (type name, hosting kind, order
//! overrides, constructor thunk), and capabilities are declared through
//! accessor methods that the host probes exactly once, at construction.
//! What the compiler can check, the compiler checks.
//!
//! ### Degrade, Never Crash
//!
//! Every per-module operation is failure isolated: a failing constructor
//! skips that type, a failing hook is logged and the remaining subscribers
//! still run, a failing dependency edge leaves the other edges intact.
//! Nothing a module does is fatal to the host process.
//!
//! ### Deterministic Ordering
//!
//! Six independent order spaces (load, unload, behavior, scene, build,
//! asset), each sorted by an explicit order key with the fully-qualified
//! type name as tie-break. The same module set always produces the same
//! sequences, load after load.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Machinery ([`framework`])
//! The generic core: the [`EngineModule`](framework::EngineModule) contract,
//! per-category hook traits, the descriptor table and
//! [`ModuleRegistry`](framework::ModuleRegistry), order spaces, and the
//! functionality-injection contract.
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! [`ModuleHost`](lifecycle::ModuleHost) owns the module set: the
//! load/unload state machine, dependency wiring, injection sequencing, the
//! event dispatcher, and the query surface.
//!
//! ### 3. The Seams ([`engine`])
//! Thin trait interfaces to the rest of the engine (scene graph, settings
//! persistence), plus the payload types events carry. The host consumes
//! these; it never implements them.
//!
//! ## 🚀 Quick Start
//!
//! ```rust
//! use module_host::framework::ModuleRegistry;
//! use module_host::framework::mock::{new_journal, ProbeBuilder};
//! use module_host::lifecycle::settings::{ModuleConfig, Platform, RuntimeMode};
//! use module_host::lifecycle::ModuleHost;
//!
//! let journal = new_journal();
//! let mut registry = ModuleRegistry::new();
//! registry
//!     .register(ProbeBuilder::new("physics", &journal).with_behavior_hooks().descriptor())
//!     .unwrap();
//!
//! let mut host = ModuleHost::new(
//!     registry,
//!     ModuleConfig::default(),
//!     Platform::Linux,
//!     RuntimeMode::Player,
//! );
//! host.load_modules();
//! assert!(host.is_loaded());
//!
//! host.behavior_update();
//! host.unload_modules();
//! assert!(!host.is_loaded());
//! ```
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```
//!
//! ## Concurrency Model
//!
//! Single-threaded, cooperative. All orchestration runs on the engine's
//! main update thread; every dispatch is synchronous fan-out in the
//! precomputed order. Module hooks receive no handle back to the host, so
//! re-entrant load/unload from inside a hook is impossible by construction.

pub mod engine;
pub mod framework;
pub mod lifecycle;
