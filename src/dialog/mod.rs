//! Dialog stacking
//!
//! Dialogs are owned by a [`DialogManager`], which assigns z-indices,
//! decides which dialog is interactive and keeps the shared backdrop in
//! sync. Modal dialogs always stack above non-modal ones; while any modal
//! dialog is visible only the top-most modal accepts input.

pub mod builders;
pub mod entity;
pub mod hooks;
pub mod layer;
pub mod layout;
pub mod manager;
pub mod overlay;
pub mod pending;
pub mod registry;
pub mod types;
pub mod zindex;

pub use builders::{alert, confirm, prompt, show, PromptOptions};
pub use entity::Dialog;
pub use hooks::{EventBus, ListenerId};
pub use layout::{DialogLayout, Hit};
pub use manager::{DialogHandle, DialogManager};
pub use overlay::{Backdrop, Overlay};
pub use pending::Pending;
pub use types::*;
