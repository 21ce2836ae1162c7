use crate::config::Settings;
use crate::dialog::{
    self, Content, DialogConfig, DialogId, DialogManager, DialogRejected, FrameLoadError, Pending, PromptOptions,
};
use crate::tui::{events::Event, keys::KeyMap, Frame, Theme};
use anyhow::Result;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Simulated latency of an embedded page load
const FRAME_LOAD_DELAY: Duration = Duration::from_millis(600);

/// Demo application showing the dialog stack
pub struct App {
    /// Whether the application should quit
    pub should_quit: bool,

    /// Current application dimensions
    pub size: Rect,

    pub key_map: KeyMap,

    pub dialogs: DialogManager,

    pub theme: Theme,

    /// Status message to display
    pub status_message: Option<String>,

    /// Sender for events posted back by background tasks
    event_sender: mpsc::UnboundedSender<Event>,

    /// Counter used to title opened dialogs
    opened: usize,
}

impl App {
    pub fn new(settings: Settings, event_sender: mpsc::UnboundedSender<Event>) -> Self {
        let theme = Theme::by_name(&settings.theme).unwrap_or_else(|| {
            warn!("Unknown theme '{}', using the default", settings.theme);
            Theme::default()
        });

        Self {
            should_quit: false,
            size: Rect::default(),
            key_map: KeyMap::default(),
            dialogs: DialogManager::new(settings),
            theme,
            status_message: None,
            event_sender,
            opened: 0,
        }
    }

    /// Handle an incoming event. Returns `true` when the app should exit.
    pub async fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) => {
                if self.key_map.should_quit(&key_event) {
                    self.should_quit = true;
                    return Ok(true);
                }

                if !self.dialogs.handle_key(key_event)? {
                    self.handle_demo_key(&key_event)?;
                }
            }

            Event::Mouse(mouse_event) => {
                self.dialogs.handle_mouse(mouse_event)?;
            }

            Event::Resize(width, height) => {
                self.size = Rect::new(0, 0, width, height);
                self.dialogs.resize(self.size);
            }

            Event::Tick => {}

            Event::StatusMessage(message) => {
                self.status_message = Some(message);
            }

            Event::FrameLoaded(id, result) => {
                if self.dialogs.find_by_id(&id).is_some() {
                    self.dialogs.frame_loaded(&id, result)?;
                }
            }
        }

        Ok(self.should_quit)
    }

    fn handle_demo_key(&mut self, key: &crossterm::event::KeyEvent) -> Result<()> {
        let keys = &self.key_map;

        if keys.open_dialog.matches(key) || keys.open_modal.matches(key) {
            let modal = keys.open_modal.matches(key);
            self.opened += 1;
            let kind = if modal { "Modal" } else { "Window" };
            let content = if modal {
                "Only this dialog accepts input while it is open."
            } else {
                "Click a window to raise it. Drag the title bar to move it."
            };
            let id = dialog::show(
                &mut self.dialogs,
                format!("{} {}", kind, self.opened),
                content,
                DialogConfig::default().modal(modal).with_width(44),
            )?;
            info!("Opened {}", id);
        } else if keys.confirm.matches(key) {
            let pending = dialog::confirm(
                &mut self.dialogs,
                "Delete file",
                "Delete <b>notes.txt</b>?<br>This cannot be undone.",
                DialogConfig::default(),
            )?;
            self.report(pending, |_: ()| "Deleted notes.txt".to_string());
        } else if keys.alert.matches(key) {
            let pending = dialog::alert(
                &mut self.dialogs,
                "Saved",
                "Your changes were saved.",
                DialogConfig::default(),
            )?;
            self.report(pending, |_: ()| "Alert acknowledged".to_string());
        } else if keys.prompt.matches(key) {
            let options = PromptOptions::new()
                .with_config(DialogConfig::default().with_content("Name (3 characters or more):"))
                .with_validator(|value| value.trim().chars().count() >= 3);
            let pending = dialog::prompt(&mut self.dialogs, "Rename", options)?;
            self.report(pending, |name: String| format!("Renamed to '{}'", name));
        } else if keys.frame.matches(key) {
            self.open_frame()?;
        } else if keys.close_all.matches(key) {
            self.dialogs.close_all();
            self.status_message = Some("Closed every dialog".to_string());
        } else if keys.help.matches(key) {
            let pending = dialog::alert(
                &mut self.dialogs,
                "Keys",
                self.key_map.help_text(),
                DialogConfig::default().modal(false),
            )?;
            self.report(pending, |_: ()| String::new());
        }
        Ok(())
    }

    fn open_frame(&mut self) -> Result<()> {
        self.opened += 1;
        let url = format!("https://example.com/page/{}", self.opened);
        let id = dialog::show(
            &mut self.dialogs,
            "Embedded page",
            Content::frame(url),
            DialogConfig::default().modal(false).with_width(60),
        )?;

        // Every third page fails to load
        let result = if self.opened % 3 == 0 {
            Err(FrameLoadError::Unreachable("connection refused".to_string()))
        } else {
            Ok(4 + (self.opened % 5) as u16 * 3)
        };
        self.spawn_frame_load(id, result);
        Ok(())
    }

    fn spawn_frame_load(&self, id: DialogId, result: std::result::Result<u16, FrameLoadError>) {
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            tokio::time::sleep(FRAME_LOAD_DELAY).await;
            let _ = sender.send(Event::FrameLoaded(id, result));
        });
    }

    /// Post the outcome of a pending dialog to the status bar.
    fn report<T, F>(&self, pending: Pending<T>, describe: F)
    where
        T: Send + 'static,
        F: FnOnce(T) -> String + Send + 'static,
    {
        let sender = self.event_sender.clone();
        tokio::spawn(async move {
            let id = pending.id().clone();
            let message = match pending.wait().await {
                Ok(value) => describe(value),
                Err(DialogRejected::Cancelled) => "Cancelled".to_string(),
                Err(DialogRejected::Dismissed) => "Dismissed".to_string(),
            };
            debug!("Dialog {} settled: {}", id, message);
            if !message.is_empty() {
                let _ = sender.send(Event::StatusMessage(message));
            }
        });
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        self.size = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(frame.size());

        let intro: Vec<Line> = self
            .key_map
            .bindings()
            .iter()
            .map(|b| Line::from(format!("  {:<7} {}", b.label(), b.description)))
            .collect();
        let background = Paragraph::new(intro)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.dialog_border(false))
                    .title(" dialog-stack "),
            )
            .style(self.theme.dialog_content(true))
            .wrap(Wrap { trim: false });
        frame.render_widget(background, chunks[0]);

        self.render_status_bar(frame, chunks[1]);

        let area = frame.size();
        self.dialogs.render_stack(frame, area, &self.theme);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let front = self
            .dialogs
            .front_most()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "none".to_string());
        let status = match &self.status_message {
            Some(message) => format!("{} | front: {}", message, front),
            None => format!(
                "{} dialogs | front: {} | ? for help | Ctrl+C to quit",
                self.dialogs.dialog_count(),
                front
            ),
        };
        frame.render_widget(Paragraph::new(status).style(self.theme.close_button(false)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn app() -> (App, mpsc::UnboundedReceiver<Event>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut app = App::new(Settings::default(), sender);
        app.dialogs.resize(Rect::new(0, 0, 100, 30));
        (app, receiver)
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_ctrl_c_quits() {
        let (mut app, _rx) = app();
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.handle_event(quit).await.unwrap());
    }

    #[tokio::test]
    async fn test_unused_keys_reach_the_app() {
        let (mut app, _rx) = app();
        app.handle_event(key('m')).await.unwrap();
        assert_eq!(app.dialogs.dialog_count(), 1);

        // The modal has no input field, so 'n' still opens a window below it
        app.handle_event(key('n')).await.unwrap();
        assert_eq!(app.dialogs.dialog_count(), 2);
        assert_eq!(app.dialogs.modal_dialogs(None).len(), 1);

        app.handle_event(key('x')).await.unwrap();
        assert_eq!(app.dialogs.dialog_count(), 0);
        assert!(!app.dialogs.overlay_visible());
    }

    #[tokio::test]
    async fn test_prompt_swallows_typed_keys() {
        let (mut app, _rx) = app();
        app.handle_event(key('p')).await.unwrap();
        app.handle_event(key('n')).await.unwrap();
        assert_eq!(app.dialogs.dialog_count(), 1);

        let id = app.dialogs.front_most().unwrap();
        assert_eq!(app.dialogs.find_by_id(&id).unwrap().input(), Some("n"));
    }

    #[tokio::test]
    async fn test_confirm_result_reaches_status_bar() {
        let (mut app, mut rx) = app();
        app.handle_event(key('c')).await.unwrap();
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)))
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        app.handle_event(event).await.unwrap();
        assert_eq!(app.status_message.as_deref(), Some("Deleted notes.txt"));
    }

    #[tokio::test]
    async fn test_frame_load_event_resizes_dialog() {
        let (mut app, _rx) = app();
        app.handle_event(key('f')).await.unwrap();
        let id = app.dialogs.front_most().unwrap();

        app.handle_event(Event::FrameLoaded(id.clone(), Ok(9))).await.unwrap();
        assert_eq!(app.dialogs.find_by_id(&id).unwrap().measured_height(), Some(9));

        // Late loads for destroyed dialogs are ignored
        app.dialogs.close_all();
        app.handle_event(Event::FrameLoaded(id, Ok(9))).await.unwrap();
    }
}
