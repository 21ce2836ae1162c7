//! Stacked dialogs for terminal applications
//!
//! Modal and non-modal dialogs with a shared backdrop, z-index management,
//! cancellable close hooks and promise-style `confirm`/`alert`/`prompt`
//! helpers, rendered with ratatui.

pub mod config;
pub mod dialog;
pub mod tui;

pub use config::Settings;
pub use dialog::{DialogConfig, DialogId, DialogManager, DialogState};
