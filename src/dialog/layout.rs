//! Dialog geometry
//!
//! Sizing, centering and containment of a dialog inside the terminal area,
//! plus the regions used for hit testing.

use super::entity::Dialog;
use crate::config::Settings;
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

/// Width of the `[x]` close button
const CLOSE_BUTTON_WIDTH: u16 = 3;

/// Region of a dialog hit by a pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    CloseButton,
    TitleBar,
    Button(usize),
    Input,
    Body,
}

/// Helper struct for dialog layout calculations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogLayout {
    /// Full available area
    pub available_area: Rect,
    /// Dialog area (including border)
    pub dialog_area: Rect,
    /// Top border row, which carries the title
    pub title_bar: Rect,
    pub close_button: Option<Rect>,
    /// Body area (excluding border, input and buttons)
    pub content_area: Rect,
    pub input_area: Option<Rect>,
    pub button_areas: Vec<Rect>,
}

impl DialogLayout {
    pub fn calculate(dialog: &Dialog, available_area: Rect, settings: &Settings) -> Self {
        let width = dialog
            .outer_width(settings.default_width)
            .max(dialog.title_width())
            .min(available_area.width);
        let height = dialog
            .outer_height(settings.frame_default_height, settings.frame_max_height)
            .min(available_area.height);

        let (x, y) = match dialog.position() {
            Some((x, y)) if dialog.config().move_able => contain(x, y, width, height, available_area),
            _ => center_in(available_area, width, height),
        };
        let dialog_area = Rect { x, y, width, height };

        let title_bar = Rect {
            height: height.min(1),
            ..dialog_area
        };
        let close_button = (dialog.config().show_top_close_button && width > CLOSE_BUTTON_WIDTH + 2)
            .then(|| Rect {
                x: dialog_area.x + width - CLOSE_BUTTON_WIDTH - 1,
                y: dialog_area.y,
                width: CLOSE_BUTTON_WIDTH,
                height: 1,
            });

        let mut inner = Rect {
            x: dialog_area.x.saturating_add(1),
            y: dialog_area.y.saturating_add(1),
            width: width.saturating_sub(2),
            height: height.saturating_sub(2),
        };

        let mut button_areas = Vec::new();
        if !dialog.buttons().is_empty() && inner.height > 0 {
            let row = inner.y + inner.height - 1;
            inner.height -= 1;

            // Right-aligned, separated by one cell
            let mut right = inner.x + inner.width;
            let mut areas: Vec<Rect> = Vec::with_capacity(dialog.buttons().len());
            for button in dialog.buttons().iter().rev() {
                let label_width = button_label(&button.title).width() as u16;
                let label_width = label_width.min(right.saturating_sub(inner.x));
                let left = right.saturating_sub(label_width);
                areas.push(Rect {
                    x: left,
                    y: row,
                    width: label_width,
                    height: 1,
                });
                right = left.saturating_sub(1);
            }
            areas.reverse();
            button_areas = areas;
        }

        let input_area = if dialog.input().is_some() && inner.height > 0 {
            let row = inner.y + inner.height - 1;
            inner.height -= 1;
            Some(Rect {
                x: inner.x,
                y: row,
                width: inner.width,
                height: 1,
            })
        } else {
            None
        };

        Self {
            available_area,
            dialog_area,
            title_bar,
            close_button,
            content_area: inner,
            input_area,
            button_areas,
        }
    }

    /// The region of this dialog under `(column, row)`, if any.
    pub fn hit(&self, column: u16, row: u16) -> Option<Hit> {
        if !contains(self.dialog_area, column, row) {
            return None;
        }
        if let Some(close) = self.close_button {
            if contains(close, column, row) {
                return Some(Hit::CloseButton);
            }
        }
        if contains(self.title_bar, column, row) {
            return Some(Hit::TitleBar);
        }
        if let Some(index) = self.button_areas.iter().position(|a| contains(*a, column, row)) {
            return Some(Hit::Button(index));
        }
        if let Some(input) = self.input_area {
            if contains(input, column, row) {
                return Some(Hit::Input);
            }
        }
        Some(Hit::Body)
    }
}

/// Label drawn for a footer button
pub fn button_label(title: &str) -> String {
    format!("[ {} ]", title)
}

/// Top-left corner that centers a `width` x `height` box in `area`.
pub fn center_in(area: Rect, width: u16, height: u16) -> (u16, u16) {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    (x, y)
}

/// Clamp a box's top-left corner so the box stays inside `area`.
pub fn contain(x: u16, y: u16, width: u16, height: u16, area: Rect) -> (u16, u16) {
    let max_x = area.x + area.width.saturating_sub(width);
    let max_y = area.y + area.height.saturating_sub(height);
    (x.clamp(area.x, max_x), y.clamp(area.y, max_y))
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}
