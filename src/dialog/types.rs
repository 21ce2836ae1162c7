//! Core dialog types
//!
//! Identifiers, states, content descriptors, configuration and the error
//! types shared by every part of the dialog stack.

use super::manager::DialogManager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Unique identifier for dialog instances
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogId(pub String);

impl DialogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier.
    ///
    /// Collisions are unlikely but not impossible; the manager re-rolls
    /// when a generated id is already registered.
    pub fn generate() -> Self {
        let raw = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("dialog-{}", &raw[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DialogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DialogId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stacking state of a dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DialogState {
    /// Visible and accepting input
    Active,
    /// Visible but blocked, usually by a modal dialog above it
    Disabled,
    /// Registered but not rendered
    Hidden,
}

impl DialogState {
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

impl Default for DialogState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// What a dialog displays in its body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Literal markup rendered inline
    Html(String),
    /// An embedded document loaded from `url`
    Frame { url: String },
}

impl Content {
    pub fn html(markup: impl Into<String>) -> Self {
        Self::Html(markup.into())
    }

    pub fn frame(url: impl Into<String>) -> Self {
        Self::Frame { url: url.into() }
    }

    pub fn is_frame(&self) -> bool {
        matches!(self, Self::Frame { .. })
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::Html(String::new())
    }
}

impl From<&str> for Content {
    fn from(markup: &str) -> Self {
        Self::Html(markup.to_string())
    }
}

impl From<String> for Content {
    fn from(markup: String) -> Self {
        Self::Html(markup)
    }
}

/// Callback invoked when a dialog button is clicked.
///
/// It receives the manager that owns the dialog, so it may close, hide or
/// open dialogs itself.
pub type ButtonCallback = Arc<dyn Fn(&mut DialogManager, &DialogId) -> DialogResult<()> + Send + Sync>;

/// A button rendered in the dialog footer
#[derive(Clone)]
pub struct DialogButton {
    pub title: String,
    /// The default button is pre-selected and triggered by Enter
    pub is_default: bool,
    /// `None` closes the dialog
    pub callback: Option<ButtonCallback>,
}

impl DialogButton {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_default: false,
            callback: None,
        }
    }

    pub fn default_button(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn on_click<F>(mut self, callback: F) -> Self
    where
        F: Fn(&mut DialogManager, &DialogId) -> DialogResult<()> + Send + Sync + 'static,
    {
        self.callback = Some(Arc::new(callback));
        self
    }
}

impl std::fmt::Debug for DialogButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogButton")
            .field("title", &self.title)
            .field("is_default", &self.is_default)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Dialog configuration options
///
/// Fixed once the dialog is constructed.
#[derive(Debug, Clone)]
pub struct DialogConfig {
    /// Caller supplied identifier; generated when absent
    pub id: Option<DialogId>,
    pub title: String,
    pub content: Content,
    /// Whether dialog is modal (blocks interaction with every other dialog)
    pub modal: bool,
    /// Outer width in cells; `None` uses the configured default
    pub width: Option<u16>,
    /// Outer height in cells; `None` sizes to content
    pub height: Option<u16>,
    pub max_height: Option<u16>,
    /// Whether the title bar can be dragged
    pub move_able: bool,
    pub buttons: Vec<DialogButton>,
    /// Renders the `[x]` button and allows Escape to close the dialog
    pub show_top_close_button: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            id: None,
            title: "Dialog".to_string(),
            content: Content::default(),
            modal: true,
            width: None,
            height: None,
            max_height: None,
            move_able: true,
            buttons: Vec::new(),
            show_top_close_button: true,
        }
    }
}

impl DialogConfig {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<DialogId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<Content>) -> Self {
        self.content = content.into();
        self
    }

    pub fn modal(mut self, modal: bool) -> Self {
        self.modal = modal;
        self
    }

    pub fn with_width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_max_height(mut self, max_height: u16) -> Self {
        self.max_height = Some(max_height);
        self
    }

    pub fn move_able(mut self, move_able: bool) -> Self {
        self.move_able = move_able;
        self
    }

    pub fn with_button(mut self, button: DialogButton) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<DialogButton>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn show_top_close_button(mut self, show: bool) -> Self {
        self.show_top_close_button = show;
        self
    }

    /// Reject configurations that can never render.
    pub fn validate(&self) -> DialogResult<()> {
        if self.width == Some(0) {
            return Err(DialogError::InvalidConfig("width must be greater than zero".into()));
        }
        if self.height == Some(0) {
            return Err(DialogError::InvalidConfig("height must be greater than zero".into()));
        }
        if self.max_height == Some(0) {
            return Err(DialogError::InvalidConfig("max_height must be greater than zero".into()));
        }
        if let Content::Frame { url } = &self.content {
            if url.trim().is_empty() {
                return Err(DialogError::InvalidConfig("frame content requires a url".into()));
            }
        }
        if self.buttons.iter().any(|b| b.title.trim().is_empty()) {
            return Err(DialogError::InvalidConfig("button title must not be empty".into()));
        }
        if self.buttons.iter().filter(|b| b.is_default).count() > 1 {
            return Err(DialogError::InvalidConfig("at most one default button is allowed".into()));
        }
        Ok(())
    }
}

/// Payload handed to `on_close` and `on_closed` listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseRequest {
    pub id: DialogId,
    /// `false` when the dialog is only being hidden
    pub destroy: bool,
}

/// Result of a close or hide request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Closed,
    /// An `on_close` listener returned `false`; nothing changed
    Vetoed,
}

impl CloseOutcome {
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("Dialog with ID '{0}' not found")]
    NotFound(DialogId),

    #[error("Dialog with ID '{0}' already exists")]
    AlreadyExists(DialogId),

    #[error("Invalid dialog configuration: {0}")]
    InvalidConfig(String),

    #[error("Dialog '{0}' has no button at index {1}")]
    NoSuchButton(DialogId, usize),

    #[error("Dialog component error: {0}")]
    ComponentError(#[from] anyhow::Error),
}

/// Why a pending dialog result was not fulfilled
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DialogRejected {
    #[error("dialog was cancelled")]
    Cancelled,

    #[error("dialog was destroyed before a decision was made")]
    Dismissed,
}

/// Failure reported while loading embedded frame content
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameLoadError {
    #[error("frame failed to load: {0}")]
    Unreachable(String),

    #[error("frame did not report its size")]
    NoSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_have_prefix() {
        let id = DialogId::generate();
        assert!(id.as_str().starts_with("dialog-"));
        assert_eq!(id.as_str().len(), "dialog-".len() + 8);
        assert_ne!(id, DialogId::generate());
    }

    #[test]
    fn test_default_state_is_hidden() {
        assert_eq!(DialogState::default(), DialogState::Hidden);
        assert!(!DialogState::Hidden.is_visible());
        assert!(DialogState::Disabled.is_visible());
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        assert!(DialogConfig::new("ok").validate().is_ok());
        assert!(DialogConfig::new("w").with_width(0).validate().is_err());
        assert!(DialogConfig::new("f")
            .with_content(Content::frame("  "))
            .validate()
            .is_err());

        let two_defaults = DialogConfig::new("b")
            .with_button(DialogButton::new("A").default_button(true))
            .with_button(DialogButton::new("B").default_button(true));
        assert!(matches!(
            two_defaults.validate(),
            Err(DialogError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_content_from_str_is_html() {
        assert_eq!(Content::from("<b>x</b>"), Content::Html("<b>x</b>".into()));
        assert!(Content::frame("https://example.com").is_frame());
    }
}
