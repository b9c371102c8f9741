//! miniterm library
//!
//! A minimalist terminal: it runs a shell on a pseudo-terminal and applies
//! user preferences loaded from a key-file configuration.
//!
//! - `settings`: configuration loading and the settings snapshot
//! - `controller`: applies settings to a terminal widget, key bindings
//! - `widget`: the terminal widget and window traits
//! - `relay`: widget backend that relays the child to the host terminal
//! - `app`: the event loop driving one session

pub mod app;
pub mod cli;
pub mod color;
pub mod controller;
pub mod error;
pub mod font;
pub mod host;
pub mod keys;
pub mod relay;
pub mod settings;
pub mod signal;
pub mod widget;

pub use app::App;
pub use controller::TerminalController;
pub use error::{Error, Result};
pub use settings::Settings;
