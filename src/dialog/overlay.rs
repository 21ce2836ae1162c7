//! Shared backdrop behind visible dialogs
//!
//! The manager shows the overlay whenever at least one dialog is visible
//! and hides it when none is.

use crate::tui::Theme;
use ratatui::{
    layout::Rect,
    widgets::{Block, Clear},
    Frame,
};

pub trait Overlay: Send + Sync {
    fn show(&mut self);

    fn hide(&mut self);

    fn is_visible(&self) -> bool;

    /// Draw the overlay over `area`. Only called while visible.
    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let _ = (frame, area, theme);
    }
}

/// Full-screen dimmed backdrop
#[derive(Debug, Clone)]
pub struct Backdrop {
    visible: bool,
    dim: bool,
}

impl Backdrop {
    pub fn new(dim: bool) -> Self {
        Self {
            visible: false,
            dim,
        }
    }
}

impl Default for Backdrop {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Overlay for Backdrop {
    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.dim {
            return;
        }
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(theme.backdrop()), area);
    }
}
