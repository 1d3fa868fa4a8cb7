//! Moving between steps: clicks, pagination, keys and finishing.

use super::Wizard;
use crate::error::StepsError;
use crate::surface::{Action, RenderSurface, RowClass};

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepChange {
    /// The current index moved.
    Changed,
    /// The step-changing hook vetoed; the old row is marked `error`.
    Vetoed,
    /// Backward move refused because `force_move_forward` is on.
    Refused,
}

/// Arrow keys that drive key navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Left,
    Right,
}

/// User input routed into the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    StepClicked(usize),
    ActionClicked(Action),
    Key(NavKey),
}

impl<S: RenderSurface> Wizard<S> {
    /// Route a user event. Returns whether the event had an effect.
    pub fn dispatch(&mut self, event: WizardEvent) -> Result<bool, StepsError> {
        match event {
            WizardEvent::StepClicked(index) => self.click_step(index),
            WizardEvent::ActionClicked(Action::Previous) => self.previous(),
            WizardEvent::ActionClicked(Action::Next) => self.next(),
            WizardEvent::ActionClicked(Action::Finish) => Ok(self.finish()),
            WizardEvent::Key(key) => self.handle_key(key),
        }
    }

    /// Make step `index` current.
    ///
    /// A veto from the step-changing hook is not an error; the call still
    /// counts as handled.
    pub fn go_to_step(&mut self, index: usize) -> Result<StepChange, StepsError> {
        let count = self.steps.count();
        if index >= count {
            return Err(StepsError::out_of_range(index, count));
        }

        let old = self.current_index;
        if self.options.force_move_forward && index < old {
            tracing::debug!(uid = %self.uid.value, from = old, to = index, "Backward move refused");
            return Ok(StepChange::Refused);
        }

        if self.hooks.step_changing(old, index).is_veto() {
            tracing::debug!(uid = %self.uid.value, from = old, to = index, "Step change vetoed");
            self.update_row(old, |classes| {
                classes.insert(RowClass::Error);
            });
            return Ok(StepChange::Vetoed);
        }

        self.current_index = index;
        self.persist_current_index();
        self.refresh_step_navigation(Some(old));
        self.refresh_pagination();
        self.load_current_content();
        self.start_transition(index, old);
        self.hooks.step_changed(index, old);

        Ok(StepChange::Changed)
    }

    /// Handle a click on the step row at `index`.
    ///
    /// Disabled rows and the current row ignore clicks. Returns whether the
    /// current index changed; if it did not, focus returns to the current row.
    pub fn click_step(&mut self, index: usize) -> Result<bool, StepsError> {
        let Some(classes) = self.rows.get(index) else {
            return Err(StepsError::out_of_range(index, self.rows.len()));
        };
        let clickable =
            !classes.contains(&RowClass::Disabled) && !classes.contains(&RowClass::Current);

        let old = self.current_index;
        if clickable {
            self.go_to_step(index)?;
        }

        if old == self.current_index {
            self.surface.focus_row(old);
            return Ok(false);
        }
        Ok(true)
    }

    /// Go to the following step.
    pub fn next(&mut self) -> Result<bool, StepsError> {
        self.pagination_click(self.current_index + 1)
    }

    /// Go to the preceding step.
    pub fn previous(&mut self) -> Result<bool, StepsError> {
        match self.current_index.checked_sub(1) {
            Some(target) => self.pagination_click(target),
            None => Ok(false),
        }
    }

    /// Navigate the way a click on the target row would, even if that row is
    /// still disabled. The row is disabled again if nothing moved.
    fn pagination_click(&mut self, index: usize) -> Result<bool, StepsError> {
        if index >= self.steps.count()
            || (self.options.force_move_forward && index < self.current_index)
        {
            return Ok(false);
        }

        let old = self.current_index;
        let was_disabled = self
            .rows
            .get(index)
            .is_some_and(|classes| classes.contains(&RowClass::Disabled));

        self.update_row(index, |classes| {
            classes.remove(&RowClass::Disabled);
        });
        self.click_step(index)?;

        if old == self.current_index && was_disabled {
            self.update_row(index, |classes| {
                classes.insert(RowClass::Disabled);
            });
            return Ok(false);
        }
        Ok(true)
    }

    /// Finish the wizard at the current step. The current index is unchanged.
    pub fn finish(&mut self) -> bool {
        let current = self.current_index;
        if self.hooks.finishing(current).is_veto() {
            tracing::debug!(uid = %self.uid.value, current, "Finish vetoed");
            self.update_row(current, |classes| {
                classes.insert(RowClass::Error);
            });
            return false;
        }

        self.update_row(current, |classes| {
            classes.insert(RowClass::Done);
            classes.remove(&RowClass::Error);
        });
        self.hooks.finished(current);
        tracing::info!(uid = %self.uid.value, current, "Wizard finished");
        true
    }

    /// Arrow-key navigation.
    pub fn handle_key(&mut self, key: NavKey) -> Result<bool, StepsError> {
        if !self.options.enable_key_navigation {
            return Ok(false);
        }
        if self.options.suppress_pagination_on_focus && self.surface.has_input_focus() {
            return Ok(false);
        }
        match key {
            NavKey::Left => self.previous(),
            NavKey::Right => self.next(),
        }
    }

    /// Move the `current` state from row `old` (if any) to the current row.
    pub(super) fn refresh_step_navigation(&mut self, old: Option<usize>) {
        let current = self.current_index;

        if let Some(old) = old {
            self.update_row(old, |classes| {
                classes.insert(RowClass::Done);
                classes.remove(&RowClass::Error);
                classes.remove(&RowClass::Current);
            });
            self.surface.set_panel_current(old, false);
        }

        self.update_row(current, |classes| {
            classes.insert(RowClass::Current);
            classes.remove(&RowClass::Done);
            classes.remove(&RowClass::Disabled);
        });
        self.surface
            .set_current_marker(current, &self.options.labels.current);
        self.surface.set_panel_current(current, true);

        if old.is_some() {
            self.surface.focus_row(current);
        }
    }
}
