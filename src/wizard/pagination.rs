//! Legality of the previous/next/finish controls.

use super::options::WizardOptions;
use crate::surface::{Action, ActionRow, ControlState, RenderSurface};

/// Control states for one position. `None` means the control is not mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationView {
    pub previous: Option<ControlState>,
    pub next: ControlState,
    pub finish: Option<ControlState>,
}

impl PaginationView {
    /// Pure function of options, step count and current index.
    pub fn compute(options: &WizardOptions, count: usize, current: usize) -> Self {
        let previous =
            (!options.force_move_forward).then(|| ControlState::shown(current > 0));
        let has_next = count > current + 1;

        if options.enable_finish_button && options.show_finish_button_always {
            return Self {
                previous,
                next: ControlState::shown(count > 1 && has_next),
                finish: Some(ControlState::shown(count > 0)),
            };
        }

        let (next, finish) = if count == 0 {
            (ControlState::shown(false), ControlState::hidden())
        } else if has_next {
            (ControlState::shown(true), ControlState::hidden())
        } else if !options.enable_finish_button {
            (ControlState::shown(false), ControlState::hidden())
        } else {
            (ControlState::hidden(), ControlState::shown(true))
        };

        Self {
            previous,
            next,
            finish: options.enable_finish_button.then_some(finish),
        }
    }

    pub fn state(&self, action: Action) -> Option<ControlState> {
        match action {
            Action::Previous => self.previous,
            Action::Next => Some(self.next),
            Action::Finish => self.finish,
        }
    }

    /// The control Enter should trigger: Next when it is usable, else Finish.
    pub fn primary(&self) -> Option<Action> {
        let usable = |state: ControlState| state.visible && state.enabled;
        if usable(self.next) {
            Some(Action::Next)
        } else if self.finish.is_some_and(usable) {
            Some(Action::Finish)
        } else {
            None
        }
    }

    pub(crate) fn apply<S: RenderSurface>(&self, surface: &mut S) {
        if let Some(previous) = self.previous {
            surface.set_action_state(Action::Previous, previous);
        }
        surface.set_action_state(Action::Next, self.next);
        if let Some(finish) = self.finish {
            surface.set_action_state(Action::Finish, finish);
        }
    }
}

/// Controls mounted for these options, in display order.
pub(crate) fn action_row(options: &WizardOptions) -> ActionRow {
    let labels = &options.labels;
    let mut controls = Vec::with_capacity(3);
    if !options.force_move_forward {
        controls.push((Action::Previous, labels.previous.clone()));
    }
    controls.push((Action::Next, labels.next.clone()));
    if options.enable_finish_button {
        controls.push((Action::Finish, labels.finish.clone()));
    }
    ActionRow {
        container_tag: options.action_container_tag.clone(),
        label: labels.pagination.clone(),
        controls,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown(enabled: bool) -> ControlState {
        ControlState::shown(enabled)
    }

    #[test]
    fn test_finish_replaces_next_on_last_step() {
        let opts = WizardOptions::default();

        let last = PaginationView::compute(&opts, 3, 2);
        assert_eq!(last.next, ControlState::hidden());
        assert_eq!(last.finish, Some(shown(true)));

        let middle = PaginationView::compute(&opts, 3, 1);
        assert_eq!(middle.next, shown(true));
        assert_eq!(middle.finish, Some(ControlState::hidden()));
        assert_eq!(middle.previous, Some(shown(true)));
    }

    #[test]
    fn test_previous_disabled_on_first_step() {
        let view = PaginationView::compute(&WizardOptions::default(), 3, 0);
        assert_eq!(view.previous, Some(shown(false)));
    }

    #[test]
    fn test_force_move_forward_has_no_previous() {
        let opts = WizardOptions {
            force_move_forward: true,
            ..WizardOptions::default()
        };
        let view = PaginationView::compute(&opts, 3, 2);
        assert_eq!(view.previous, None);
        assert!(action_row(&opts)
            .controls
            .iter()
            .all(|(action, _)| *action != Action::Previous));
    }

    #[test]
    fn test_empty_wizard() {
        let view = PaginationView::compute(&WizardOptions::default(), 0, 0);
        assert_eq!(view.next, shown(false));
        assert_eq!(view.finish, Some(ControlState::hidden()));

        let always = WizardOptions {
            show_finish_button_always: true,
            ..WizardOptions::default()
        };
        let view = PaginationView::compute(&always, 0, 0);
        assert_eq!(view.next, shown(false));
        assert_eq!(view.finish, Some(shown(false)));
    }

    #[test]
    fn test_finish_shown_always() {
        let opts = WizardOptions {
            show_finish_button_always: true,
            ..WizardOptions::default()
        };
        let first = PaginationView::compute(&opts, 3, 0);
        assert_eq!(first.next, shown(true));
        assert_eq!(first.finish, Some(shown(true)));

        let last = PaginationView::compute(&opts, 3, 2);
        assert_eq!(last.next, shown(false));
        assert_eq!(last.finish, Some(shown(true)));

        let single = PaginationView::compute(&opts, 1, 0);
        assert_eq!(single.next, shown(false));
    }

    #[test]
    fn test_finish_disabled_by_config() {
        let opts = WizardOptions {
            enable_finish_button: false,
            show_finish_button_always: true,
            ..WizardOptions::default()
        };
        let last = PaginationView::compute(&opts, 2, 1);
        assert_eq!(last.next, shown(false));
        assert_eq!(last.finish, None);
        assert_eq!(last.primary(), None);
    }

    #[test]
    fn test_primary_action() {
        let opts = WizardOptions::default();
        assert_eq!(
            PaginationView::compute(&opts, 3, 0).primary(),
            Some(Action::Next)
        );
        assert_eq!(
            PaginationView::compute(&opts, 3, 2).primary(),
            Some(Action::Finish)
        );
    }

    #[test]
    fn test_action_row_order_and_labels() {
        let row = action_row(&WizardOptions::default());
        let actions: Vec<_> = row.controls.iter().map(|(a, _)| *a).collect();
        assert_eq!(actions, [Action::Previous, Action::Next, Action::Finish]);
        assert_eq!(row.label, "Pagination");
        assert_eq!(row.controls[2].1, "Finish");
    }
}
