/// Ripple - Terminal Chat Client
///
/// A mock-backed messenger: authentication screens and a conversation/thread
/// UI driven entirely by in-memory fixture data with simulated network delays.

pub mod backend;
pub mod config;
pub mod conversation;
pub mod engine;
pub mod error;
pub mod otp;
pub mod password;
pub mod session;
pub mod thread;
pub mod types;
pub mod ui;
pub mod validate;

pub use config::Config;
pub use engine::ChatEngine;
pub use error::{ChatError, Result};
