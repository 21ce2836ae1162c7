//! The per-instance dialog entity
//!
//! A [`Dialog`] owns its configuration, stacking state and lifecycle hooks.
//! It never changes its own state or z-index; the [`DialogManager`] does.
//!
//! [`DialogManager`]: super::DialogManager

use super::hooks::EventBus;
use super::types::{CloseRequest, Content, DialogButton, DialogConfig, DialogId, DialogResult, DialogState};
use unicode_width::UnicodeWidthStr;

/// Rows taken by the border, title bar and spacing around the body
const CHROME_ROWS: u16 = 3;

pub struct Dialog {
    id: DialogId,
    config: DialogConfig,
    state: DialogState,
    z_index: i32,

    /// Top-left corner after the user dragged the dialog
    position: Option<(u16, u16)>,
    /// Body height reported by a loaded frame
    measured_height: Option<u16>,
    /// Text field, present on prompt dialogs
    input: Option<String>,
    selected_button: usize,

    on_close: EventBus<CloseRequest>,
    on_closed: EventBus<CloseRequest>,
    on_show: EventBus<DialogId>,
}

impl Dialog {
    /// Build a dialog from `config`, generating an id when none was given.
    ///
    /// The dialog starts hidden and unregistered.
    pub fn new(mut config: DialogConfig) -> DialogResult<Self> {
        config.validate()?;

        let id = config.id.take().unwrap_or_else(DialogId::generate);
        let selected_button = config
            .buttons
            .iter()
            .position(|b| b.is_default)
            .unwrap_or(0);

        Ok(Self {
            id,
            config,
            state: DialogState::Hidden,
            z_index: 0,
            position: None,
            measured_height: None,
            input: None,
            selected_button,
            on_close: EventBus::cancellable(),
            on_closed: EventBus::notification(),
            on_show: EventBus::notification(),
        })
    }

    /// Attach a single-line text field, as used by prompts.
    pub fn with_input(mut self, value: impl Into<String>) -> Self {
        self.input = Some(value.into());
        self
    }

    pub fn id(&self) -> &DialogId {
        &self.id
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn is_modal(&self) -> bool {
        self.config.modal
    }

    pub fn is_visible(&self) -> bool {
        self.state.is_visible()
    }

    pub fn is_active(&self) -> bool {
        self.state == DialogState::Active
    }

    pub(crate) fn set_state(&mut self, state: DialogState) {
        self.state = state;
    }

    pub(crate) fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    /// Cancellable hook run before the dialog is closed or hidden
    pub fn on_close(&mut self) -> &mut EventBus<CloseRequest> {
        &mut self.on_close
    }

    /// Notification run after a close or hide has been applied
    pub fn on_closed(&mut self) -> &mut EventBus<CloseRequest> {
        &mut self.on_closed
    }

    /// Notification run after the dialog was shown
    pub fn on_show(&mut self) -> &mut EventBus<DialogId> {
        &mut self.on_show
    }

    pub(crate) fn close_hooks(&self) -> &EventBus<CloseRequest> {
        &self.on_close
    }

    pub(crate) fn closed_hooks(&self) -> &EventBus<CloseRequest> {
        &self.on_closed
    }

    pub(crate) fn show_hooks(&self) -> &EventBus<DialogId> {
        &self.on_show
    }

    pub fn position(&self) -> Option<(u16, u16)> {
        self.position
    }

    pub(crate) fn set_position(&mut self, position: Option<(u16, u16)>) {
        self.position = position;
    }

    pub fn measured_height(&self) -> Option<u16> {
        self.measured_height
    }

    pub(crate) fn set_measured_height(&mut self, height: u16) {
        self.measured_height = Some(height);
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        if let Some(input) = self.input.as_mut() {
            *input = value.into();
        }
    }

    pub(crate) fn input_mut(&mut self) -> Option<&mut String> {
        self.input.as_mut()
    }

    pub fn buttons(&self) -> &[DialogButton] {
        &self.config.buttons
    }

    pub fn selected_button(&self) -> usize {
        self.selected_button
    }

    /// Move the button selection by `delta`, wrapping around.
    pub(crate) fn cycle_button(&mut self, delta: isize) {
        let count = self.config.buttons.len() as isize;
        if count == 0 {
            return;
        }
        let next = (self.selected_button as isize + delta).rem_euclid(count);
        self.selected_button = next as usize;
    }

    /// Outer width, falling back to `default_width`.
    pub fn outer_width(&self, default_width: u16) -> u16 {
        self.config.width.unwrap_or(default_width)
    }

    /// Outer height in cells.
    ///
    /// An explicit `height` wins. Otherwise inline markup is sized to its
    /// lines and a frame uses its measured height, or `frame_default`
    /// until it reports one. The result never exceeds `max_height`, or
    /// `frame_max` for frames without one.
    pub fn outer_height(&self, frame_default: u16, frame_max: u16) -> u16 {
        if let Some(height) = self.config.height {
            return height;
        }

        let mut rows = CHROME_ROWS;
        if !self.config.buttons.is_empty() {
            rows += 1;
        }
        if self.input.is_some() {
            rows += 1;
        }

        match &self.config.content {
            Content::Html(markup) => {
                let body = markup_to_text(markup).lines().count().max(1) as u16;
                let height = rows.saturating_add(body);
                match self.config.max_height {
                    Some(max) => height.min(max),
                    None => height,
                }
            }
            Content::Frame { .. } => {
                let max = self.config.max_height.unwrap_or(frame_max);
                let body = self.measured_height.unwrap_or(frame_default);
                rows.saturating_add(body).min(max)
            }
        }
    }

    /// Width the title bar needs to show the title and close button.
    pub fn title_width(&self) -> u16 {
        let close = if self.config.show_top_close_button { 4 } else { 0 };
        (self.config.title.width() as u16).saturating_add(close + 4)
    }
}

impl std::fmt::Debug for Dialog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dialog")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("z_index", &self.z_index)
            .field("modal", &self.config.modal)
            .field("title", &self.config.title)
            .finish()
    }
}

/// Flatten simple markup into plain text for terminal display.
///
/// `<br>` and block closers become line breaks, other tags are dropped and
/// the common entities are decoded.
pub fn markup_to_text(markup: &str) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(start) = rest.find('<') {
        text.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            text.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let tag = rest[start + 1..start + end].trim().to_ascii_lowercase();
        let name = tag.trim_start_matches('/').split_whitespace().next().unwrap_or("");
        let name = name.trim_end_matches('/');
        let breaks = name == "br" || (tag.starts_with('/') && matches!(name, "p" | "div" | "li"));
        if breaks {
            text.push('\n');
        }
        rest = &rest[start + end + 1..];
    }
    text.push_str(rest);

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .trim_end_matches('\n')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::types::DialogId;

    #[test]
    fn test_new_dialog_is_hidden_with_generated_id() {
        let dialog = Dialog::new(DialogConfig::new("Hello")).unwrap();
        assert_eq!(dialog.state(), DialogState::Hidden);
        assert!(dialog.id().as_str().starts_with("dialog-"));
        assert!(dialog.config().id.is_none());
    }

    #[test]
    fn test_caller_id_is_kept() {
        let dialog = Dialog::new(DialogConfig::new("Hello").with_id("settings")).unwrap();
        assert_eq!(dialog.id(), &DialogId::from("settings"));
    }

    #[test]
    fn test_default_button_is_preselected() {
        let dialog = Dialog::new(
            DialogConfig::new("Buttons")
                .with_button(DialogButton::new("Cancel"))
                .with_button(DialogButton::new("OK").default_button(true)),
        )
        .unwrap();
        assert_eq!(dialog.selected_button(), 1);
    }

    #[test]
    fn test_cycle_button_wraps() {
        let mut dialog = Dialog::new(
            DialogConfig::new("Buttons")
                .with_button(DialogButton::new("A"))
                .with_button(DialogButton::new("B")),
        )
        .unwrap();
        dialog.cycle_button(-1);
        assert_eq!(dialog.selected_button(), 1);
        dialog.cycle_button(1);
        assert_eq!(dialog.selected_button(), 0);
    }

    #[test]
    fn test_outer_height_for_markup() {
        let dialog = Dialog::new(
            DialogConfig::new("Lines")
                .with_content("one<br>two<br/>three")
                .with_button(DialogButton::new("OK")),
        )
        .unwrap();
        assert_eq!(dialog.outer_height(8, 30), CHROME_ROWS + 1 + 3);

        let clamped = Dialog::new(
            DialogConfig::new("Lines")
                .with_content("a\nb\nc\nd\ne\nf")
                .with_max_height(5),
        )
        .unwrap();
        assert_eq!(clamped.outer_height(8, 30), 5);
    }

    #[test]
    fn test_outer_height_for_frame_uses_measurement() {
        let mut dialog = Dialog::new(
            DialogConfig::new("Frame").with_content(Content::frame("https://example.com")),
        )
        .unwrap();
        assert_eq!(dialog.outer_height(8, 30), CHROME_ROWS + 8);

        dialog.set_measured_height(12);
        assert_eq!(dialog.outer_height(8, 30), CHROME_ROWS + 12);

        dialog.set_measured_height(200);
        assert_eq!(dialog.outer_height(8, 30), 30);
    }

    #[test]
    fn test_markup_to_text() {
        assert_eq!(markup_to_text("<p>Hello <b>world</b></p><p>Bye</p>"), "Hello world\nBye");
        assert_eq!(markup_to_text("a &lt; b &amp;&amp; c"), "a < b && c");
        assert_eq!(markup_to_text("broken <tag"), "broken <tag");
    }
}
