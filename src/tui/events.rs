use crate::dialog::{DialogId, FrameLoadError};
use anyhow::Result;
use crossterm::event::{Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::time::Duration;
use tokio::sync::mpsc;

/// How long one poll waits for terminal input before yielding a tick
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Application events
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Periodic tick event
    Tick,

    /// Status message event
    StatusMessage(String),

    /// Content of a frame dialog finished loading
    FrameLoaded(DialogId, std::result::Result<u16, FrameLoadError>),
}

/// Event handler merging terminal input with internal events
pub struct EventHandler {
    receiver: mpsc::UnboundedReceiver<Event>,
    sender: mpsc::UnboundedSender<Event>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { receiver, sender }
    }

    /// Get the next event
    ///
    /// Internal events win over terminal input; with neither pending a
    /// `Tick` is returned after the poll interval.
    pub async fn next(&mut self) -> Option<Event> {
        if let Ok(event) = self.receiver.try_recv() {
            return Some(event);
        }

        let polled = tokio::task::spawn_blocking(|| -> std::io::Result<Option<CrosstermEvent>> {
            if crossterm::event::poll(POLL_INTERVAL)? {
                crossterm::event::read().map(Some)
            } else {
                Ok(None)
            }
        })
        .await;

        match polled {
            Ok(Ok(Some(event))) => Self::convert_crossterm_event(event).or(Some(Event::Tick)),
            Ok(Err(e)) => {
                tracing::warn!("Failed to read terminal event: {}", e);
                Some(Event::Tick)
            }
            _ => Some(Event::Tick),
        }
    }

    /// Convert crossterm events to application events
    fn convert_crossterm_event(event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(key_event) => Some(Event::Key(key_event)),
            CrosstermEvent::Mouse(mouse_event) => Some(Event::Mouse(mouse_event)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            _ => None,
        }
    }

    /// Send an internal event
    pub fn send(&self, event: Event) -> Result<()> {
        self.sender.send(event)?;
        Ok(())
    }

    /// Get a clone of the sender
    pub fn sender(&self) -> mpsc::UnboundedSender<Event> {
        self.sender.clone()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}
