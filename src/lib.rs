//! Focusbrew - a Pomodoro focus timer with a session-recording backend
//!
//! The timer side owns the countdown state machine and reports completed
//! focus sessions over HTTP; the serve side validates them and appends them
//! to a local SQLite store.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod recorder;
pub mod session;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::{create_router, AppState};
pub use client::SessionClient;
pub use config::Config;
pub use recorder::{Database, SessionRecorder};
pub use utils::signals::shutdown_signal;
