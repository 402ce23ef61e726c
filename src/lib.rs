// Library target exists for integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// that harnesses can import types via `letterpop::session::*` and friends.
// Much of the UI is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used directly by tests/ and benches/
pub mod audio;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod session;
pub mod speech;

// Private: the terminal front end
mod app;
mod event;
mod logging;
mod ui;
