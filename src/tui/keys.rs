use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
    pub description: String,
}

impl KeyBinding {
    pub fn new(key: KeyCode, modifiers: KeyModifiers, description: &str) -> Self {
        Self {
            key,
            modifiers,
            description: description.to_string(),
        }
    }

    /// Plain character bindings also match when Shift is reported.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        if self.key != event.code {
            return false;
        }
        self.modifiers == event.modifiers
            || (matches!(self.key, KeyCode::Char(_))
                && self.modifiers.is_empty()
                && event.modifiers == KeyModifiers::SHIFT)
    }

    /// Short label such as `Ctrl+C` or `n`
    pub fn label(&self) -> String {
        let key = match self.key {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            other => format!("{:?}", other),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", key.to_uppercase())
        } else {
            key
        }
    }
}

/// Demo key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub open_dialog: KeyBinding,
    pub open_modal: KeyBinding,
    pub confirm: KeyBinding,
    pub alert: KeyBinding,
    pub prompt: KeyBinding,
    pub frame: KeyBinding,
    pub close_all: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        let plain = |c: char, description: &str| {
            KeyBinding::new(KeyCode::Char(c), KeyModifiers::NONE, description)
        };
        Self {
            quit: KeyBinding::new(KeyCode::Char('c'), KeyModifiers::CONTROL, "Quit application"),
            help: plain('?', "Show key help"),
            open_dialog: plain('n', "Open a non-modal dialog"),
            open_modal: plain('m', "Open a modal dialog"),
            confirm: plain('c', "Ask for confirmation"),
            alert: plain('a', "Show an alert"),
            prompt: plain('p', "Prompt for text"),
            frame: plain('f', "Open an embedded page"),
            close_all: plain('x', "Close every dialog"),
        }
    }
}

impl KeyMap {
    pub fn should_quit(&self, event: &KeyEvent) -> bool {
        self.quit.matches(event)
    }

    pub fn bindings(&self) -> [&KeyBinding; 9] {
        [
            &self.open_dialog,
            &self.open_modal,
            &self.confirm,
            &self.alert,
            &self.prompt,
            &self.frame,
            &self.close_all,
            &self.help,
            &self.quit,
        ]
    }

    /// Get help text for all key bindings
    pub fn help_text(&self) -> String {
        self.bindings()
            .iter()
            .map(|b| format!("{:<7} {}", b.label(), b.description))
            .collect::<Vec<_>>()
            .join("<br>")
    }
}
