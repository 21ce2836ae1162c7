//! Registry of live dialogs
//!
//! Holds every dialog that has been registered and not destroyed, in
//! registration order, and answers the partition queries every stacking
//! operation starts from.

use super::entity::Dialog;
use super::types::{DialogError, DialogId, DialogResult};

#[derive(Debug, Default)]
pub struct StackRegistry {
    dialogs: Vec<Dialog>,
}

impl StackRegistry {
    pub fn new() -> Self {
        Self { dialogs: Vec::new() }
    }

    pub fn insert(&mut self, dialog: Dialog) -> DialogResult<()> {
        if self.contains(dialog.id()) {
            return Err(DialogError::AlreadyExists(dialog.id().clone()));
        }
        self.dialogs.push(dialog);
        Ok(())
    }

    pub fn remove(&mut self, id: &DialogId) -> Option<Dialog> {
        let index = self.dialogs.iter().position(|d| d.id() == id)?;
        Some(self.dialogs.remove(index))
    }

    /// Remove every dialog, returning them in registration order.
    pub fn drain(&mut self) -> Vec<Dialog> {
        std::mem::take(&mut self.dialogs)
    }

    pub fn get(&self, id: &DialogId) -> Option<&Dialog> {
        self.dialogs.iter().find(|d| d.id() == id)
    }

    pub fn get_mut(&mut self, id: &DialogId) -> Option<&mut Dialog> {
        self.dialogs.iter_mut().find(|d| d.id() == id)
    }

    pub fn contains(&self, id: &DialogId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dialog> {
        self.dialogs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Dialog> {
        self.dialogs.iter_mut()
    }

    /// Visible modal dialogs, bottom to top.
    pub fn modal_dialogs(&self, excluding: Option<&DialogId>) -> Vec<DialogId> {
        self.partition(true, excluding)
    }

    /// Visible non-modal dialogs, bottom to top.
    pub fn non_modal_dialogs(&self, excluding: Option<&DialogId>) -> Vec<DialogId> {
        self.partition(false, excluding)
    }

    /// Every visible dialog in render order: non-modal first, then modal.
    pub fn all_available(&self, excluding: Option<&DialogId>) -> Vec<DialogId> {
        let mut all = self.non_modal_dialogs(excluding);
        all.extend(self.modal_dialogs(excluding));
        all
    }

    /// The dialog rendered above all others, if any is visible.
    pub fn front_most(&self) -> Option<DialogId> {
        self.all_available(None).pop()
    }

    fn partition(&self, modal: bool, excluding: Option<&DialogId>) -> Vec<DialogId> {
        let mut selected: Vec<&Dialog> = self
            .dialogs
            .iter()
            .filter(|d| d.is_modal() == modal && d.is_visible())
            .filter(|d| excluding != Some(d.id()))
            .collect();
        // Stable: equal z-indices keep registration order
        selected.sort_by_key(|d| d.z_index());
        selected.into_iter().map(|d| d.id().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::types::{DialogConfig, DialogState};

    fn dialog(id: &str, modal: bool, state: DialogState, z: i32) -> Dialog {
        let mut d = Dialog::new(DialogConfig::new(id).with_id(id).modal(modal)).unwrap();
        d.set_state(state);
        d.set_z_index(z);
        d
    }

    fn ids(list: &[DialogId]) -> Vec<&str> {
        list.iter().map(|id| id.as_str()).collect()
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut registry = StackRegistry::new();
        registry.insert(dialog("a", false, DialogState::Hidden, 0)).unwrap();
        let err = registry
            .insert(dialog("a", true, DialogState::Hidden, 0))
            .unwrap_err();
        assert!(matches!(err, DialogError::AlreadyExists(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_partitions_sorted_by_z_and_skip_hidden() {
        let mut registry = StackRegistry::new();
        registry.insert(dialog("n2", false, DialogState::Active, 1001)).unwrap();
        registry.insert(dialog("n1", false, DialogState::Active, 1000)).unwrap();
        registry.insert(dialog("hidden", false, DialogState::Hidden, 5000)).unwrap();
        registry.insert(dialog("m2", true, DialogState::Active, 1003)).unwrap();
        registry.insert(dialog("m1", true, DialogState::Disabled, 1002)).unwrap();
        registry.insert(dialog("mh", true, DialogState::Hidden, 9000)).unwrap();

        assert_eq!(ids(&registry.non_modal_dialogs(None)), vec!["n1", "n2"]);
        assert_eq!(ids(&registry.modal_dialogs(None)), vec!["m1", "m2"]);
        assert_eq!(
            ids(&registry.all_available(None)),
            vec!["n1", "n2", "m1", "m2"]
        );
        assert_eq!(registry.front_most(), Some(DialogId::from("m2")));
    }

    #[test]
    fn test_partitions_exclude_target() {
        let mut registry = StackRegistry::new();
        registry.insert(dialog("n1", false, DialogState::Active, 1000)).unwrap();
        registry.insert(dialog("m1", true, DialogState::Active, 1001)).unwrap();

        let m1 = DialogId::from("m1");
        assert!(registry.modal_dialogs(Some(&m1)).is_empty());
        assert_eq!(ids(&registry.all_available(Some(&m1))), vec!["n1"]);
    }

    #[test]
    fn test_modal_always_after_non_modal() {
        let mut registry = StackRegistry::new();
        // A modal with a lower z-index still counts as above
        registry.insert(dialog("m", true, DialogState::Active, 1)).unwrap();
        registry.insert(dialog("n", false, DialogState::Disabled, 50)).unwrap();
        assert_eq!(registry.front_most(), Some(DialogId::from("m")));
    }

    #[test]
    fn test_remove_and_drain() {
        let mut registry = StackRegistry::new();
        registry.insert(dialog("a", false, DialogState::Hidden, 0)).unwrap();
        registry.insert(dialog("b", false, DialogState::Hidden, 0)).unwrap();

        assert!(registry.remove(&DialogId::from("a")).is_some());
        assert!(registry.remove(&DialogId::from("a")).is_none());

        let drained = registry.drain();
        assert_eq!(drained.len(), 1);
        assert!(registry.is_empty());
    }
}
