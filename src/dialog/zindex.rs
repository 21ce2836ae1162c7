//! Z-index and activation assignment
//!
//! Every stacking operation is expressed as a [`StackPlan`]: the z-index
//! and state each visible dialog should end up with. Plans are computed
//! from the registry without touching it and then applied in one step.
//!
//! Non-modal dialogs occupy `base, base + 1, ...` in stacking order and
//! modal dialogs continue directly above them, so every modal dialog sits
//! above every non-modal one. While any modal dialog is visible only the
//! top-most modal dialog is active.

use super::registry::StackRegistry;
use super::types::{DialogId, DialogState};

/// Target z-index and state of one dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub id: DialogId,
    pub z_index: i32,
    pub state: DialogState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackPlan {
    placements: Vec<Placement>,
}

impl StackPlan {
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, id: &DialogId) -> Option<&Placement> {
        self.placements.iter().find(|p| &p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Write the planned z-indices and states into the registry.
    pub fn apply(&self, registry: &mut StackRegistry) {
        for placement in &self.placements {
            if let Some(dialog) = registry.get_mut(&placement.id) {
                dialog.set_z_index(placement.z_index);
                dialog.set_state(placement.state);
            }
        }
    }
}

/// Plan for showing `target` on top of its partition.
pub fn plan_show(registry: &StackRegistry, target: &DialogId, base: i32) -> StackPlan {
    let is_modal = registry.get(target).map(|d| d.is_modal()).unwrap_or(false);

    let mut non_modal = registry.non_modal_dialogs(Some(target));
    let mut modal = registry.modal_dialogs(Some(target));
    if is_modal {
        modal.push(target.clone());
    } else {
        non_modal.push(target.clone());
    }

    layout(&non_modal, &modal, base)
}

/// Plan for the dialogs that stay visible once `target` is gone.
pub fn plan_close(registry: &StackRegistry, target: &DialogId, base: i32) -> StackPlan {
    let non_modal = registry.non_modal_dialogs(Some(target));
    let modal = registry.modal_dialogs(Some(target));
    layout(&non_modal, &modal, base)
}

/// Plan for raising a non-modal `target` above the other non-modal dialogs.
///
/// Returns `None` when the request must be refused: a modal dialog is
/// visible, `target` is modal or hidden, or it already is front-most.
pub fn plan_front(registry: &StackRegistry, target: &DialogId, base: i32) -> Option<StackPlan> {
    let dialog = registry.get(target)?;
    if dialog.is_modal() || !dialog.is_visible() {
        return None;
    }
    if !registry.modal_dialogs(None).is_empty() {
        return None;
    }
    if registry.front_most().as_ref() == Some(target) {
        return None;
    }

    let mut non_modal = registry.non_modal_dialogs(Some(target));
    non_modal.push(target.clone());
    Some(layout(&non_modal, &[], base))
}

fn layout(non_modal: &[DialogId], modal: &[DialogId], base: i32) -> StackPlan {
    let non_modal_state = if modal.is_empty() {
        DialogState::Active
    } else {
        DialogState::Disabled
    };

    let mut placements = Vec::with_capacity(non_modal.len() + modal.len());
    for (offset, id) in non_modal.iter().enumerate() {
        placements.push(Placement {
            id: id.clone(),
            z_index: base + offset as i32,
            state: non_modal_state,
        });
    }

    let modal_base = base + non_modal.len() as i32;
    let top = modal.len().saturating_sub(1);
    for (offset, id) in modal.iter().enumerate() {
        placements.push(Placement {
            id: id.clone(),
            z_index: modal_base + offset as i32,
            state: if offset == top {
                DialogState::Active
            } else {
                DialogState::Disabled
            },
        });
    }

    StackPlan { placements }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::entity::Dialog;
    use crate::dialog::types::DialogConfig;

    const BASE: i32 = 1000;

    fn registry_with(entries: &[(&str, bool, DialogState, i32)]) -> StackRegistry {
        let mut registry = StackRegistry::new();
        for &(id, modal, state, z) in entries {
            let mut d = Dialog::new(DialogConfig::new(id).with_id(id).modal(modal)).unwrap();
            d.set_state(state);
            d.set_z_index(z);
            registry.insert(d).unwrap();
        }
        registry
    }

    fn z(plan: &StackPlan, id: &str) -> i32 {
        plan.placement(&DialogId::from(id)).unwrap().z_index
    }

    fn state(plan: &StackPlan, id: &str) -> DialogState {
        plan.placement(&DialogId::from(id)).unwrap().state
    }

    #[test]
    fn test_show_modal_goes_above_everything() {
        let registry = registry_with(&[
            ("n1", false, DialogState::Active, 1000),
            ("n2", false, DialogState::Active, 1001),
            ("m1", true, DialogState::Active, 1002),
            ("m2", true, DialogState::Hidden, 0),
        ]);

        let plan = plan_show(&registry, &DialogId::from("m2"), BASE);
        assert_eq!(z(&plan, "m2"), BASE + 3);
        assert_eq!(state(&plan, "m2"), DialogState::Active);
        for other in ["n1", "n2", "m1"] {
            assert_eq!(state(&plan, other), DialogState::Disabled);
        }
    }

    #[test]
    fn test_show_non_modal_shifts_modals_up() {
        let registry = registry_with(&[
            ("n1", false, DialogState::Disabled, 1000),
            ("m1", true, DialogState::Active, 1001),
            ("n2", false, DialogState::Hidden, 0),
        ]);

        let plan = plan_show(&registry, &DialogId::from("n2"), BASE);
        assert_eq!(z(&plan, "n2"), BASE + 1);
        assert_eq!(z(&plan, "m1"), BASE + 2);
        assert_eq!(state(&plan, "n2"), DialogState::Disabled);
        assert_eq!(state(&plan, "m1"), DialogState::Active);
    }

    #[test]
    fn test_show_non_modal_without_modals_is_active() {
        let registry = registry_with(&[
            ("n1", false, DialogState::Active, 1000),
            ("n2", false, DialogState::Hidden, 0),
        ]);

        let plan = plan_show(&registry, &DialogId::from("n2"), BASE);
        assert_eq!(z(&plan, "n1"), BASE);
        assert_eq!(z(&plan, "n2"), BASE + 1);
        assert_eq!(state(&plan, "n1"), DialogState::Active);
        assert_eq!(state(&plan, "n2"), DialogState::Active);
    }

    #[test]
    fn test_reshow_visible_dialog_moves_it_to_top() {
        let registry = registry_with(&[
            ("n1", false, DialogState::Active, 1000),
            ("n2", false, DialogState::Active, 1001),
        ]);

        let plan = plan_show(&registry, &DialogId::from("n1"), BASE);
        assert_eq!(z(&plan, "n2"), BASE);
        assert_eq!(z(&plan, "n1"), BASE + 1);
    }

    #[test]
    fn test_close_compacts_and_activates_new_top_modal() {
        let registry = registry_with(&[
            ("n1", false, DialogState::Disabled, 1000),
            ("m1", true, DialogState::Disabled, 1001),
            ("m2", true, DialogState::Active, 1002),
        ]);

        let plan = plan_close(&registry, &DialogId::from("m2"), BASE);
        assert!(plan.placement(&DialogId::from("m2")).is_none());
        assert_eq!(z(&plan, "n1"), BASE);
        assert_eq!(z(&plan, "m1"), BASE + 1);
        assert_eq!(state(&plan, "m1"), DialogState::Active);
        assert_eq!(state(&plan, "n1"), DialogState::Disabled);

        let registry = registry_with(&[
            ("n1", false, DialogState::Disabled, 1000),
            ("m1", true, DialogState::Active, 1001),
        ]);
        let plan = plan_close(&registry, &DialogId::from("m1"), BASE);
        assert_eq!(state(&plan, "n1"), DialogState::Active);
    }

    #[test]
    fn test_front_reorders_non_modal() {
        let registry = registry_with(&[
            ("n1", false, DialogState::Active, 1000),
            ("n2", false, DialogState::Active, 1001),
        ]);

        let plan = plan_front(&registry, &DialogId::from("n1"), BASE).unwrap();
        assert_eq!(z(&plan, "n2"), BASE);
        assert_eq!(z(&plan, "n1"), BASE + 1);
        assert!(plan_front(&registry, &DialogId::from("n2"), BASE).is_none());
    }

    #[test]
    fn test_front_refused_while_modal_visible() {
        let registry = registry_with(&[
            ("n1", false, DialogState::Disabled, 1000),
            ("n2", false, DialogState::Disabled, 1001),
            ("m1", true, DialogState::Active, 1002),
        ]);
        assert!(plan_front(&registry, &DialogId::from("n1"), BASE).is_none());
        assert!(plan_front(&registry, &DialogId::from("m1"), BASE).is_none());
    }

    #[test]
    fn test_front_ignores_hidden_modal() {
        let registry = registry_with(&[
            ("n1", false, DialogState::Active, 1000),
            ("n2", false, DialogState::Active, 1001),
            ("m1", true, DialogState::Hidden, 1002),
        ]);
        assert!(plan_front(&registry, &DialogId::from("n1"), BASE).is_some());
    }

    #[test]
    fn test_apply_writes_registry() {
        let mut registry = registry_with(&[("n1", false, DialogState::Hidden, 0)]);
        let plan = plan_show(&registry, &DialogId::from("n1"), BASE);
        plan.apply(&mut registry);

        let dialog = registry.get(&DialogId::from("n1")).unwrap();
        assert_eq!(dialog.z_index(), BASE);
        assert_eq!(dialog.state(), DialogState::Active);
    }
}
