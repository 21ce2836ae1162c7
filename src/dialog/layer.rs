//! Drawing a single dialog
//!
//! The manager decides the order; this module only paints one dialog into
//! its precomputed [`DialogLayout`]. Inactive dialogs are drawn dimmed.

use super::{
    entity::{markup_to_text, Dialog},
    layout::{button_label, DialogLayout},
    types::Content,
};
use crate::tui::{Frame, Theme};
use ratatui::{
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render_dialog(frame: &mut Frame, dialog: &Dialog, layout: &DialogLayout, theme: &Theme) {
    let area = layout.dialog_area;
    if area.width == 0 || area.height == 0 {
        return;
    }
    let active = dialog.is_active();

    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.dialog_border(active))
        .style(theme.dialog_content(active))
        .title(Span::styled(
            format!(" {} ", dialog.config().title),
            theme.dialog_title(active),
        ));
    frame.render_widget(block, area);

    if let Some(close) = layout.close_button {
        frame.render_widget(
            Paragraph::new("[x]").style(theme.close_button(active)),
            close,
        );
    }

    let body = Paragraph::new(body_text(dialog))
        .style(theme.dialog_content(active))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, layout.content_area);

    if let (Some(area), Some(value)) = (layout.input_area, dialog.input()) {
        let mut spans = vec![Span::styled("> ", theme.dialog_title(active))];
        spans.push(Span::styled(value.to_string(), theme.dialog_content(active)));
        if active {
            spans.push(Span::styled("_", theme.button(true, active)));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    for (index, (button, area)) in dialog.buttons().iter().zip(&layout.button_areas).enumerate() {
        let selected = index == dialog.selected_button();
        frame.render_widget(
            Paragraph::new(button_label(&button.title)).style(theme.button(selected, active)),
            *area,
        );
    }
}

fn body_text(dialog: &Dialog) -> String {
    match &dialog.config().content {
        Content::Html(markup) => markup_to_text(markup),
        Content::Frame { url } => match dialog.measured_height() {
            Some(_) => format!("[frame] {}", url),
            None => format!("Loading {}...", url),
        },
    }
}
