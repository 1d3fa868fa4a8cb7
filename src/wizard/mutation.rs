//! Inserting and removing steps on a live wizard.

use super::{Step, Wizard};
use crate::error::StepsError;
use crate::surface::{RenderSurface, RowClass, RowClasses};
use crate::template;

impl<S: RenderSurface> Wizard<S> {
    /// Append a step.
    pub fn add(&mut self, step: Step) -> Result<&mut Self, StepsError> {
        let count = self.steps.count();
        self.insert(count, step)
    }

    /// Insert a step at `index` (`0 <= index <= step_count`).
    ///
    /// The current step keeps pointing at the same logical step: inserting at
    /// or before it shifts the current index up by one.
    pub fn insert(&mut self, index: usize, step: Step) -> Result<&mut Self, StepsError> {
        let count = self.steps.count();
        if index > count {
            return Err(StepsError::out_of_range(index, count));
        }
        let label = template::render_title(&self.options.title_template, index, &step.title)?;

        let was_empty = self.steps.is_empty();
        self.steps.insert_at(index, step.normalized())?;
        if !was_empty && self.current_index >= index {
            self.current_index += 1;
            self.persist_current_index();
        }

        let mut classes = RowClasses::new();
        if !self.options.enable_all_steps {
            classes.insert(RowClass::Disabled);
        }
        if self.current_index > index {
            classes.remove(&RowClass::Disabled);
            classes.insert(RowClass::Done);
        }
        self.rows.insert(index, classes);

        let nodes = self.step_nodes(index, label)?;
        self.surface.insert_step(index, nodes);
        if let Some(classes) = self.rows.get(index) {
            self.surface.set_row_classes(index, classes);
        }

        self.refresh_steps(index + 1)?;
        self.refresh_boundaries();

        if was_empty {
            self.current_index = 0;
            self.surface.set_panel_hidden(0, false);
            self.refresh_step_navigation(None);
            self.persist_current_index();
        }
        self.refresh_pagination();
        if was_empty {
            self.load_current_content();
        }

        tracing::debug!(
            uid = %self.uid.value,
            index,
            current = self.current_index,
            steps = self.steps.count(),
            "Step inserted"
        );
        Ok(self)
    }

    /// Remove the step at `index`.
    ///
    /// Returns false without touching anything if `index` is out of range or
    /// is the current step.
    pub fn remove(&mut self, index: usize) -> Result<bool, StepsError> {
        if index >= self.steps.count() || index == self.current_index {
            return Ok(false);
        }

        let removed_key = self.steps.key_of(index);
        self.steps.remove_at(index)?;
        self.rows.remove(index);
        self.surface.remove_step(index);

        if self.current_index > index {
            self.current_index -= 1;
            self.persist_current_index();
        }
        if removed_key.is_some() && self.transition_show == removed_key {
            self.transition_show = None;
        }

        self.refresh_boundaries();
        self.refresh_steps(index)?;
        self.refresh_pagination();

        tracing::debug!(
            uid = %self.uid.value,
            index,
            current = self.current_index,
            steps = self.steps.count(),
            "Step removed"
        );
        Ok(true)
    }

    /// Skip a number of steps. Not supported.
    pub fn skip(&mut self, _count: usize) -> Result<bool, StepsError> {
        Err(StepsError::NotImplemented("skip"))
    }

    /// Replace the step at `index`. Not supported.
    pub fn set_step(&mut self, _index: usize, _step: Step) -> Result<&mut Self, StepsError> {
        Err(StepsError::NotImplemented("setStep"))
    }
}
