//! Dialog manager for the dialog stack and lifecycle
//!
//! The dialog manager is responsible for:
//! - Owning every registered dialog
//! - Showing, hiding and closing dialogs while keeping z-indices and
//!   activation consistent
//! - Showing the shared backdrop while any dialog is visible
//! - Routing key and mouse events to the right dialog
//! - Rendering dialogs in z-index order

use super::{
    entity::Dialog,
    layer,
    layout::{contain, DialogLayout, Hit},
    overlay::{Backdrop, Overlay},
    registry::StackRegistry,
    types::*,
    zindex,
};
use crate::config::Settings;
use crate::tui::{Component, Frame, Theme};
use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::{debug, warn};

/// Title-bar drag in progress
#[derive(Debug, Clone)]
struct DragState {
    id: DialogId,
    /// Pointer offset from the dialog's top-left corner
    grab: (u16, u16),
}

/// Dialog manager handles the dialog stack and lifecycle
pub struct DialogManager {
    registry: StackRegistry,
    overlay: Box<dyn Overlay>,
    settings: Settings,

    /// Last known terminal size
    terminal_size: Rect,

    drag: Option<DragState>,
}

impl DialogManager {
    /// Create a new dialog manager with the default backdrop
    pub fn new(settings: Settings) -> Self {
        let overlay = Box::new(Backdrop::new(settings.backdrop_dim));
        Self::with_overlay(settings, overlay)
    }

    pub fn with_overlay(settings: Settings, overlay: Box<dyn Overlay>) -> Self {
        Self {
            registry: StackRegistry::new(),
            overlay,
            settings,
            terminal_size: Rect::default(),
            drag: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Add a constructed dialog to the registry. It stays hidden.
    pub fn register(&mut self, dialog: Dialog) -> DialogResult<DialogId> {
        let id = dialog.id().clone();
        self.registry.insert(dialog)?;
        debug!("Registered dialog {}", id);
        Ok(id)
    }

    /// Construct a dialog from `config` and register it.
    pub fn create(&mut self, config: DialogConfig) -> DialogResult<DialogId> {
        let dialog = self.build(config)?;
        self.register(dialog)
    }

    /// Construct a dialog whose generated id is not in use yet.
    pub fn build(&self, mut config: DialogConfig) -> DialogResult<Dialog> {
        if config.id.is_none() {
            config.id = Some(self.unused_id());
        }
        Dialog::new(config)
    }

    pub(crate) fn unused_id(&self) -> DialogId {
        loop {
            let id = DialogId::generate();
            if !self.registry.contains(&id) {
                return id;
            }
        }
    }

    /// Show a dialog above the others of its kind.
    pub fn show(&mut self, id: &DialogId) -> DialogResult<()> {
        if !self.registry.contains(id) {
            return Err(DialogError::NotFound(id.clone()));
        }

        self.overlay.show();
        zindex::plan_show(&self.registry, id, self.settings.base_z_index).apply(&mut self.registry);

        if let Some(dialog) = self.registry.get(id) {
            debug!(
                "Showing dialog {} (z-index {}, {:?})",
                id,
                dialog.z_index(),
                dialog.state()
            );
            dialog.show_hooks().fire(id);
        }
        Ok(())
    }

    /// Close a dialog, destroying it or only hiding it.
    ///
    /// `on_close` listeners run first; if one vetoes, nothing changes.
    pub fn close(&mut self, id: &DialogId, destroy: bool) -> DialogResult<CloseOutcome> {
        let dialog = self
            .registry
            .get(id)
            .ok_or_else(|| DialogError::NotFound(id.clone()))?;

        let request = CloseRequest {
            id: id.clone(),
            destroy,
        };
        if !dialog.close_hooks().fire(&request) {
            warn!("Close of dialog {} was vetoed", id);
            return Ok(CloseOutcome::Vetoed);
        }

        zindex::plan_close(&self.registry, id, self.settings.base_z_index).apply(&mut self.registry);

        if self.drag.as_ref().is_some_and(|drag| &drag.id == id) {
            self.drag = None;
        }

        let closed = if destroy {
            self.registry.remove(id)
        } else {
            if let Some(dialog) = self.registry.get_mut(id) {
                dialog.set_state(DialogState::Hidden);
            }
            None
        };

        if self.registry.all_available(None).is_empty() {
            self.overlay.hide();
        }

        debug!(
            "{} dialog {}",
            if destroy { "Destroyed" } else { "Hid" },
            id
        );

        if let Some(dialog) = closed.as_ref().or_else(|| self.registry.get(id)) {
            dialog.closed_hooks().fire(&request);
        }

        Ok(CloseOutcome::Closed)
    }

    /// Hide a dialog, keeping it registered for a later `show`.
    pub fn hide(&mut self, id: &DialogId) -> DialogResult<CloseOutcome> {
        self.close(id, false)
    }

    /// Raise a non-modal dialog above the other non-modal dialogs.
    ///
    /// Refused while any modal dialog is visible, for modal or hidden
    /// dialogs, and when `id` already is front-most.
    pub fn try_set_front(&mut self, id: &DialogId) -> bool {
        match zindex::plan_front(&self.registry, id, self.settings.base_z_index) {
            Some(plan) => {
                plan.apply(&mut self.registry);
                debug!("Raised dialog {} to front", id);
                true
            }
            None => false,
        }
    }

    /// Destroy every dialog without consulting `on_close` listeners.
    pub fn close_all(&mut self) {
        let dialogs = self.registry.drain();
        self.drag = None;
        self.overlay.hide();
        debug!("Closed all {} dialogs", dialogs.len());
    }

    pub fn find_by_id(&self, id: &DialogId) -> Option<&Dialog> {
        self.registry.get(id)
    }

    pub fn find_by_id_mut(&mut self, id: &DialogId) -> Option<&mut Dialog> {
        self.registry.get_mut(id)
    }

    /// Instance-style access to one dialog
    pub fn handle(&mut self, id: &DialogId) -> Option<DialogHandle<'_>> {
        if !self.registry.contains(id) {
            return None;
        }
        Some(DialogHandle {
            manager: self,
            id: id.clone(),
        })
    }

    pub fn front_most(&self) -> Option<DialogId> {
        self.registry.front_most()
    }

    pub fn modal_dialogs(&self, excluding: Option<&DialogId>) -> Vec<DialogId> {
        self.registry.modal_dialogs(excluding)
    }

    pub fn non_modal_dialogs(&self, excluding: Option<&DialogId>) -> Vec<DialogId> {
        self.registry.non_modal_dialogs(excluding)
    }

    pub fn all_available(&self, excluding: Option<&DialogId>) -> Vec<DialogId> {
        self.registry.all_available(excluding)
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    /// Number of registered dialogs, hidden ones included
    pub fn dialog_count(&self) -> usize {
        self.registry.len()
    }

    pub fn has_visible_dialogs(&self) -> bool {
        self.registry.iter().any(|d| d.is_visible())
    }

    pub fn dialog_ids(&self) -> Vec<DialogId> {
        self.registry.iter().map(|d| d.id().clone()).collect()
    }

    /// Run the callback of button `index`; buttons without one close the dialog.
    pub fn click_button(&mut self, id: &DialogId, index: usize) -> DialogResult<()> {
        let dialog = self
            .registry
            .get(id)
            .ok_or_else(|| DialogError::NotFound(id.clone()))?;
        let button = dialog
            .buttons()
            .get(index)
            .ok_or_else(|| DialogError::NoSuchButton(id.clone(), index))?;

        debug!("Button '{}' clicked on dialog {}", button.title, id);
        match button.callback.clone() {
            Some(callback) => callback(self, id),
            None => self.close(id, true).map(|_| ()),
        }
    }

    /// Report the outcome of loading a frame dialog's content.
    ///
    /// Without an explicit height the dialog adopts the measured height,
    /// bounded by its `max_height` or the configured frame maximum. A failed
    /// load is logged and the dialog keeps its last known size.
    pub fn frame_loaded(
        &mut self,
        id: &DialogId,
        result: std::result::Result<u16, FrameLoadError>,
    ) -> DialogResult<()> {
        let dialog = self
            .registry
            .get_mut(id)
            .ok_or_else(|| DialogError::NotFound(id.clone()))?;

        if !dialog.config().content.is_frame() || dialog.config().height.is_some() {
            return Ok(());
        }

        match result {
            Ok(height) => {
                dialog.set_measured_height(height);
                debug!("Frame dialog {} measured {} rows", id, height);
            }
            Err(e) => warn!("Frame dialog {} keeps its size: {}", id, e),
        }
        Ok(())
    }

    /// Layout of a dialog for the current terminal size
    pub fn layout_of(&self, id: &DialogId) -> Option<DialogLayout> {
        self.registry
            .get(id)
            .map(|dialog| DialogLayout::calculate(dialog, self.terminal_size, &self.settings))
    }

    /// Route a key press. Returns whether a dialog consumed it.
    ///
    /// Escape closes the front-most dialog when it has a top close button.
    /// Other keys go to the front-most dialog only.
    pub fn handle_key(&mut self, key: KeyEvent) -> DialogResult<bool> {
        if key.kind == KeyEventKind::Release {
            return Ok(false);
        }
        let Some(front) = self.front_most() else {
            return Ok(false);
        };

        if key.code == KeyCode::Esc {
            let closable = self
                .registry
                .get(&front)
                .is_some_and(|d| d.config().show_top_close_button);
            if closable {
                self.close(&front, true)?;
            }
            return Ok(closable);
        }

        let Some(dialog) = self.registry.get_mut(&front) else {
            return Ok(false);
        };
        if !dialog.is_active() {
            return Ok(false);
        }

        match key.code {
            KeyCode::Enter => {
                if dialog.buttons().is_empty() {
                    return Ok(false);
                }
                let index = dialog.selected_button();
                self.click_button(&front, index)?;
                Ok(true)
            }
            KeyCode::Tab | KeyCode::Right => {
                dialog.cycle_button(1);
                Ok(true)
            }
            KeyCode::BackTab | KeyCode::Left => {
                dialog.cycle_button(-1);
                Ok(true)
            }
            KeyCode::Backspace => Ok(dialog.input_mut().map(|input| input.pop()).is_some()),
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                match dialog.input_mut() {
                    Some(input) => {
                        input.push(c);
                        Ok(true)
                    }
                    None => Ok(false),
                }
            }
            _ => Ok(false),
        }
    }

    /// Route a mouse event. Returns whether the dialog layer consumed it.
    pub fn handle_mouse(&mut self, event: MouseEvent) -> DialogResult<bool> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => self.press(event.column, event.row),
            MouseEventKind::Drag(MouseButton::Left) => Ok(self.drag_to(event.column, event.row)),
            MouseEventKind::Up(MouseButton::Left) => Ok(self.drag.take().is_some()),
            _ => Ok(false),
        }
    }

    fn press(&mut self, column: u16, row: u16) -> DialogResult<bool> {
        let target = self
            .all_available(None)
            .into_iter()
            .rev()
            .find_map(|id| {
                let layout = self.layout_of(&id)?;
                let hit = layout.hit(column, row)?;
                Some((id, hit, layout))
            });

        // The backdrop swallows clicks that miss every dialog
        let Some((id, hit, layout)) = target else {
            return Ok(self.overlay.is_visible());
        };

        let Some(dialog) = self.registry.get(&id) else {
            return Ok(false);
        };
        if !dialog.is_active() {
            return Ok(true);
        }
        let modal = dialog.is_modal();
        let move_able = dialog.config().move_able;

        if !modal {
            self.try_set_front(&id);
        }

        match hit {
            Hit::CloseButton => {
                self.close(&id, true)?;
            }
            Hit::Button(index) => {
                self.click_button(&id, index)?;
            }
            Hit::TitleBar if move_able => {
                let area = layout.dialog_area;
                self.drag = Some(DragState {
                    id,
                    grab: (column - area.x, row - area.y),
                });
            }
            _ => {}
        }
        Ok(true)
    }

    fn drag_to(&mut self, column: u16, row: u16) -> bool {
        let Some(drag) = self.drag.clone() else {
            return false;
        };
        let Some(layout) = self.layout_of(&drag.id) else {
            self.drag = None;
            return false;
        };

        let area = layout.dialog_area;
        let position = contain(
            column.saturating_sub(drag.grab.0),
            row.saturating_sub(drag.grab.1),
            area.width,
            area.height,
            self.terminal_size,
        );
        if let Some(dialog) = self.registry.get_mut(&drag.id) {
            dialog.set_position(Some(position));
        }
        true
    }

    /// Adopt a new terminal size.
    ///
    /// Fixed dialogs re-center on their own; dragged ones are pulled back
    /// inside the new area.
    pub fn resize(&mut self, area: Rect) {
        self.terminal_size = area;
        let settings = &self.settings;
        for dialog in self.registry.iter_mut() {
            if dialog.position().is_some() && dialog.config().move_able {
                let layout = DialogLayout::calculate(dialog, area, settings);
                dialog.set_position(Some((layout.dialog_area.x, layout.dialog_area.y)));
            }
        }
    }

    /// Draw the backdrop and every visible dialog, lowest z-index first.
    pub fn render_stack(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if area != self.terminal_size {
            self.resize(area);
        }

        if self.overlay.is_visible() {
            self.overlay.render(frame, area, theme);
        }

        for id in self.all_available(None) {
            if let Some(dialog) = self.registry.get(&id) {
                let layout = DialogLayout::calculate(dialog, area, &self.settings);
                layer::render_dialog(frame, dialog, &layout, theme);
            }
        }
    }
}

#[async_trait]
impl Component for DialogManager {
    async fn handle_key_event(&mut self, event: KeyEvent) -> Result<()> {
        self.handle_key(event)?;
        Ok(())
    }

    async fn handle_mouse_event(&mut self, event: MouseEvent) -> Result<()> {
        self.handle_mouse(event)?;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme) {
        self.render_stack(frame, area, theme);
    }

    fn size(&self) -> Rect {
        self.terminal_size
    }

    fn set_size(&mut self, size: Rect) {
        self.resize(size);
    }

    fn has_focus(&self) -> bool {
        self.front_most().is_some()
    }

    fn is_visible(&self) -> bool {
        self.overlay.is_visible()
    }
}

impl Default for DialogManager {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

/// Borrowed handle giving a dialog instance-style operations
pub struct DialogHandle<'a> {
    manager: &'a mut DialogManager,
    id: DialogId,
}

impl DialogHandle<'_> {
    pub fn id(&self) -> &DialogId {
        &self.id
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.manager.find_by_id(&self.id)
    }

    pub fn show(&mut self) -> DialogResult<()> {
        self.manager.show(&self.id)
    }

    pub fn hide(&mut self) -> DialogResult<CloseOutcome> {
        self.manager.hide(&self.id)
    }

    pub fn close(&mut self) -> DialogResult<CloseOutcome> {
        self.manager.close(&self.id, true)
    }

    pub fn try_set_front(&mut self) -> bool {
        self.manager.try_set_front(&self.id)
    }
}
