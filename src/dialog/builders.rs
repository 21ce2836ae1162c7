//! Convenience constructors
//!
//! `show` builds and shows a plain dialog. `confirm`, `alert` and `prompt`
//! additionally hand back a [`Pending`] that settles once the dialog is
//! destroyed: with the staged outcome of the clicked button, or with
//! [`DialogRejected::Cancelled`] when it was closed any other way.

use super::{
    manager::DialogManager,
    pending::{Pending, Settlement},
    types::*,
};
use std::sync::Arc;

/// Input check run before a prompt accepts its value
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Options for [`prompt`]
#[derive(Clone, Default)]
pub struct PromptOptions {
    pub config: DialogConfig,
    pub initial: String,
    pub validator: Option<Validator>,
}

impl PromptOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: DialogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_initial(mut self, initial: impl Into<String>) -> Self {
        self.initial = initial.into();
        self
    }

    /// Returning `false` keeps the prompt open.
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl std::fmt::Debug for PromptOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptOptions")
            .field("config", &self.config)
            .field("initial", &self.initial)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Construct a dialog, show it and return its id.
pub fn show(
    manager: &mut DialogManager,
    title: impl Into<String>,
    content: impl Into<Content>,
    options: DialogConfig,
) -> DialogResult<DialogId> {
    let config = options.with_title(title).with_content(content);
    let id = manager.create(config)?;
    manager.show(&id)?;
    Ok(id)
}

/// Ask for confirmation. Resolves on the confirm button, rejects on cancel.
///
/// The dialog has no top close button.
pub fn confirm(
    manager: &mut DialogManager,
    title: impl Into<String>,
    content: impl Into<Content>,
    options: DialogConfig,
) -> DialogResult<Pending<()>> {
    let (id, mut config) = prepare(manager, options.with_title(title).with_content(content));
    let (settlement, pending) = Settlement::channel(id);

    let cancel_label = manager.settings().cancel_label.clone();
    let confirm_label = manager.settings().confirm_label.clone();
    config.show_top_close_button = false;
    config.buttons = vec![
        settle_button(DialogButton::new(cancel_label), &settlement, |_, _| {
            Err(DialogRejected::Cancelled)
        }),
        settle_button(
            DialogButton::new(confirm_label).default_button(true),
            &settlement,
            |_, _| Ok(()),
        ),
    ];

    open(manager, config, settlement)?;
    Ok(pending)
}

/// Show a message with a single acknowledge button.
pub fn alert(
    manager: &mut DialogManager,
    title: impl Into<String>,
    content: impl Into<Content>,
    options: DialogConfig,
) -> DialogResult<Pending<()>> {
    let (id, mut config) = prepare(manager, options.with_title(title).with_content(content));
    let (settlement, pending) = Settlement::channel(id);

    let ok_label = manager.settings().ok_label.clone();
    config.buttons = vec![settle_button(
        DialogButton::new(ok_label).default_button(true),
        &settlement,
        |_, _| Ok(()),
    )];

    open(manager, config, settlement)?;
    Ok(pending)
}

/// Ask for a line of text. Resolves with the input once it passes the
/// validator.
pub fn prompt(
    manager: &mut DialogManager,
    title: impl Into<String>,
    options: PromptOptions,
) -> DialogResult<Pending<String>> {
    let PromptOptions {
        config,
        initial,
        validator,
    } = options;
    let (id, mut config) = prepare(manager, config.with_title(title));
    let (settlement, pending) = Settlement::channel(id);

    let cancel_label = manager.settings().cancel_label.clone();
    let ok_label = manager.settings().ok_label.clone();

    let accept = {
        let settlement = settlement.clone();
        move |manager: &mut DialogManager, id: &DialogId| -> DialogResult<()> {
            let value = manager
                .find_by_id(id)
                .and_then(|d| d.input())
                .unwrap_or_default()
                .to_string();
            if let Some(validator) = &validator {
                if !validator(&value) {
                    tracing::debug!("Prompt {} rejected its input", id);
                    return Ok(());
                }
            }
            settlement.stage(Ok(value));
            close_staged(manager, id, &settlement)
        }
    };

    config.buttons = vec![
        settle_button(DialogButton::new(cancel_label), &settlement, |_, _| {
            Err(DialogRejected::Cancelled)
        }),
        DialogButton::new(ok_label).default_button(true).on_click(accept),
    ];

    let dialog = manager.build(config)?.with_input(initial);
    register(manager, dialog, settlement)?;
    Ok(pending)
}

/// Assign the id up front so buttons and the pending result agree on it.
fn prepare(manager: &DialogManager, mut config: DialogConfig) -> (DialogId, DialogConfig) {
    let id = config.id.clone().unwrap_or_else(|| manager.unused_id());
    config.id = Some(id.clone());
    (id, config)
}

fn settle_button<T, F>(button: DialogButton, settlement: &Settlement<T>, outcome: F) -> DialogButton
where
    T: Send + 'static,
    F: Fn(&DialogManager, &DialogId) -> Result<T, DialogRejected> + Send + Sync + 'static,
{
    let settlement = settlement.clone();
    button.on_click(move |manager, id| {
        settlement.stage(outcome(&*manager, id));
        close_staged(manager, id, &settlement)
    })
}

fn close_staged<T: Send + 'static>(
    manager: &mut DialogManager,
    id: &DialogId,
    settlement: &Settlement<T>,
) -> DialogResult<()> {
    if manager.close(id, true)? == CloseOutcome::Vetoed {
        settlement.unstage();
    }
    Ok(())
}

fn open<T: Send + 'static>(
    manager: &mut DialogManager,
    config: DialogConfig,
    settlement: Settlement<T>,
) -> DialogResult<()> {
    let dialog = manager.build(config)?;
    register(manager, dialog, settlement)
}

fn register<T: Send + 'static>(
    manager: &mut DialogManager,
    mut dialog: super::entity::Dialog,
    settlement: Settlement<T>,
) -> DialogResult<()> {
    dialog.on_closed().listen(move |request: &CloseRequest| {
        if request.destroy {
            settlement.finish();
        }
        true
    });
    let id = manager.register(dialog)?;
    manager.show(&id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    const CANCEL: usize = 0;
    const ACCEPT: usize = 1;

    fn manager() -> DialogManager {
        DialogManager::default()
    }

    #[test]
    fn test_show_returns_visible_dialog() {
        let mut manager = manager();
        let id = show(&mut manager, "Info", "<b>hi</b>", DialogConfig::default().modal(false)).unwrap();
        let dialog = manager.find_by_id(&id).unwrap();
        assert!(dialog.is_active());
        assert_eq!(dialog.config().title, "Info");
        assert!(!dialog.is_modal());
    }

    #[test]
    fn test_confirm_resolves_and_removes_dialog() {
        let mut manager = manager();
        let mut pending = confirm(&mut manager, "t", "c", DialogConfig::default()).unwrap();
        let id = pending.id().clone();

        let dialog = manager.find_by_id(&id).unwrap();
        assert!(!dialog.config().show_top_close_button);
        assert_eq!(dialog.selected_button(), ACCEPT);
        assert!(pending.try_take().is_none());

        manager.click_button(&id, ACCEPT).unwrap();
        assert_eq!(pending.try_take(), Some(Ok(())));
        assert!(manager.find_by_id(&id).is_none());
        assert!(!manager.overlay_visible());
    }

    #[test]
    fn test_confirm_cancel_rejects() {
        let mut manager = manager();
        let mut pending = confirm(&mut manager, "t", "c", DialogConfig::default()).unwrap();
        let id = pending.id().clone();

        manager.click_button(&id, CANCEL).unwrap();
        assert_eq!(pending.try_take(), Some(Err(DialogRejected::Cancelled)));
        assert!(manager.find_by_id(&id).is_none());
    }

    #[test]
    fn test_confirm_ignores_escape() {
        let mut manager = manager();
        let mut pending = confirm(&mut manager, "t", "c", DialogConfig::default()).unwrap();

        let consumed = manager
            .handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert!(!consumed);
        assert!(manager.find_by_id(pending.id()).is_some());
        assert!(pending.try_take().is_none());
    }

    #[test]
    fn test_vetoed_close_leaves_promise_unsettled() {
        let mut manager = manager();
        let mut pending = confirm(&mut manager, "t", "c", DialogConfig::default()).unwrap();
        let id = pending.id().clone();

        let veto = manager
            .find_by_id_mut(&id)
            .unwrap()
            .on_close()
            .listen(|_| false);
        manager.click_button(&id, ACCEPT).unwrap();
        assert!(pending.try_take().is_none());
        assert!(manager.find_by_id(&id).unwrap().is_active());

        // A later cancel must not deliver the earlier staged outcome
        manager.find_by_id_mut(&id).unwrap().on_close().unlisten(veto);
        manager.click_button(&id, CANCEL).unwrap();
        assert_eq!(pending.try_take(), Some(Err(DialogRejected::Cancelled)));
    }

    #[test]
    fn test_alert_resolves_on_ok() {
        let mut manager = manager();
        let mut pending = alert(&mut manager, "Done", "Saved", DialogConfig::default()).unwrap();
        let id = pending.id().clone();
        assert_eq!(manager.find_by_id(&id).unwrap().buttons().len(), 1);

        manager
            .handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(pending.try_take(), Some(Ok(())));
    }

    #[test]
    fn test_prompt_validation_keeps_dialog_open() {
        let mut manager = manager();
        let options = PromptOptions::new()
            .with_initial("ab")
            .with_validator(|value| value.len() >= 3);
        let mut pending = prompt(&mut manager, "Name", options).unwrap();
        let id = pending.id().clone();

        manager.click_button(&id, ACCEPT).unwrap();
        assert!(pending.try_take().is_none());
        assert!(manager.find_by_id(&id).is_some());

        manager
            .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE))
            .unwrap();
        manager
            .handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(pending.try_take(), Some(Ok("abc".to_string())));
        assert!(manager.find_by_id(&id).is_none());
    }

    #[test]
    fn test_prompt_rejects_when_closed_from_title_bar() {
        let mut manager = manager();
        let mut pending = prompt(&mut manager, "Name", PromptOptions::new()).unwrap();
        let id = pending.id().clone();
        assert!(manager.find_by_id(&id).unwrap().config().show_top_close_button);

        manager
            .handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE))
            .unwrap();
        assert_eq!(pending.try_take(), Some(Err(DialogRejected::Cancelled)));
    }

    #[test]
    fn test_hide_does_not_settle() {
        let mut manager = manager();
        let mut pending = alert(&mut manager, "t", "c", DialogConfig::default()).unwrap();
        let id = pending.id().clone();

        manager.hide(&id).unwrap();
        assert!(pending.try_take().is_none());

        manager.show(&id).unwrap();
        manager.click_button(&id, 0).unwrap();
        assert_eq!(pending.try_take(), Some(Ok(())));
    }

    #[test]
    fn test_custom_labels_come_from_settings() {
        let settings = crate::config::Settings {
            confirm_label: "Yes".to_string(),
            cancel_label: "No".to_string(),
            ..Default::default()
        };
        let mut manager = DialogManager::new(settings);
        let pending = confirm(&mut manager, "t", "c", DialogConfig::default()).unwrap();
        let titles: Vec<_> = manager
            .find_by_id(pending.id())
            .unwrap()
            .buttons()
            .iter()
            .map(|b| b.title.clone())
            .collect();
        assert_eq!(titles, vec!["No", "Yes"]);
    }

    #[tokio::test]
    async fn test_close_all_dismisses_pending() {
        let mut manager = manager();
        let confirm = confirm(&mut manager, "t", "c", DialogConfig::default()).unwrap();
        let prompt = prompt(&mut manager, "p", PromptOptions::new()).unwrap();

        manager.close_all();
        assert_eq!(confirm.wait().await, Err(DialogRejected::Dismissed));
        assert_eq!(prompt.wait().await, Err(DialogRejected::Dismissed));
    }

    #[tokio::test]
    async fn test_wait_resolves_after_click() {
        let mut manager = manager();
        let pending = confirm(&mut manager, "t", "c", DialogConfig::default()).unwrap();
        let id = pending.id().clone();

        let waiter = tokio::spawn(pending.wait());
        manager.click_button(&id, ACCEPT).unwrap();
        assert_eq!(waiter.await.unwrap(), Ok(()));
    }
}
