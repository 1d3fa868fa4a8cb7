//! The wizard state machine.
//!
//! A [`Wizard`] owns its steps, the current index and the view it drives. All
//! writes to the current index go through the navigation operations; the
//! surface only ever reflects what the wizard tells it.

use std::sync::Arc;

use crate::content::{ContentEvent, ContentFetcher, ContentLoader};
use crate::error::StepsError;
use crate::markup;
use crate::state_store::{state_key, StateStore};
use crate::surface::{PanelContent, RenderSurface, RowClass, RowClasses, StepIds, StepNodes, SurfaceFrame};
use crate::template;
use crate::uid::{self, Uid, UidCounter};

mod enums;
mod hooks;
mod mutation;
mod navigation;
mod options;
mod pagination;
mod step;
mod transition;


pub use enums::{EnumRepr, KeyedEnum};
pub use hooks::{HookOutcome, Hooks};
pub use navigation::{NavKey, StepChange, WizardEvent};
pub use options::{Labels, TransitionEffect, WizardOptions};
pub use pagination::PaginationView;
pub use step::{ContentMode, Step, StepKey, StepRegistry};

use transition::Timeline;

/// Configures and builds a [`Wizard`].
#[derive(Default)]
pub struct WizardBuilder {
    options: WizardOptions,
    hooks: Hooks,
    store: Option<Box<dyn StateStore>>,
    fetcher: Option<Arc<dyn ContentFetcher>>,
    uid: Option<Uid>,
}

impl WizardBuilder {
    pub fn new(options: WizardOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// State store used when `save_state` is on.
    pub fn state_store(mut self, store: impl StateStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    pub fn boxed_state_store(mut self, store: Box<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Fetcher for `Async` steps.
    pub fn fetcher(mut self, fetcher: Arc<dyn ContentFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Take the instance id from `counter` instead of the process-wide one.
    pub fn uid_from(mut self, counter: &UidCounter) -> Self {
        self.uid = Some(counter.next_uid());
        self
    }

    /// Parse header/body pairs out of `source` and build on them.
    pub fn build_from_markup<S: RenderSurface>(
        self,
        source: &str,
        surface: S,
    ) -> Result<Wizard<S>, StepsError> {
        let steps = markup::parse(source, &self.options.header_tag, &self.options.body_tag)?;
        self.build(steps, surface)
    }

    pub fn build<S: RenderSurface>(
        self,
        steps: Vec<Step>,
        surface: S,
    ) -> Result<Wizard<S>, StepsError> {
        let count = steps.len();
        let options = self.options;
        if count > 0 && options.start_index >= count {
            return Err(StepsError::out_of_range(options.start_index, count));
        }

        // Templates are rendered up front so a bad one leaves the surface
        // untouched and later navigation cannot fail halfway.
        let labels = steps
            .iter()
            .enumerate()
            .map(|(i, step)| template::render_title(&options.title_template, i, &step.title))
            .collect::<Result<Vec<_>, _>>()?;
        let placeholder =
            template::render_loading(&options.loading_template, &options.labels.loading)?;

        let uid = self.uid.unwrap_or_else(uid::next_uid);
        let mut current_index = if count == 0 { 0 } else { options.start_index };
        if options.save_state {
            if let Some(saved) = self.store.as_ref().and_then(|s| s.load(&state_key(&uid.value))) {
                if saved < count {
                    current_index = saved;
                } else {
                    tracing::debug!(uid = %uid.value, saved, count, "Ignoring saved step index");
                }
            }
        }

        let mut registry = StepRegistry::new();
        for step in steps {
            registry.push(step.normalized());
        }

        let mut wizard = Wizard {
            uid,
            options,
            steps: registry,
            rows: Vec::with_capacity(count),
            current_index,
            transition_show: None,
            timeline: Timeline::default(),
            hooks: self.hooks,
            store: self.store,
            loader: ContentLoader::new(self.fetcher, placeholder),
            surface,
        };
        wizard.render(labels)?;

        if wizard.options.auto_focus && wizard.uid.first && count > 0 {
            wizard.surface.focus_row(wizard.current_index);
        }

        tracing::debug!(
            uid = %wizard.uid.value,
            steps = count,
            current = wizard.current_index,
            "Wizard initialized"
        );
        Ok(wizard)
    }
}

/// One wizard instance bound to a render surface.
pub struct Wizard<S: RenderSurface> {
    uid: Uid,
    options: WizardOptions,
    steps: StepRegistry,
    /// State classes per row, mirrored onto the surface
    rows: Vec<RowClasses>,
    current_index: usize,
    /// Panel to reveal once the in-flight hide animation completes
    transition_show: Option<StepKey>,
    timeline: Timeline,
    hooks: Hooks,
    store: Option<Box<dyn StateStore>>,
    loader: ContentLoader,
    surface: S,
}

impl<S: RenderSurface> std::fmt::Debug for Wizard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wizard")
            .field("uid", &self.uid.value)
            .field("current_index", &self.current_index)
            .field("step_count", &self.steps.count())
            .finish_non_exhaustive()
    }
}

impl<S: RenderSurface> Wizard<S> {
    pub fn uid(&self) -> &str {
        &self.uid.value
    }

    pub fn options(&self) -> &WizardOptions {
        &self.options
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn step_count(&self) -> usize {
        self.steps.count()
    }

    /// The current step, or `None` for an empty wizard.
    pub fn current_step(&self) -> Option<&Step> {
        self.steps.get(self.current_index).ok()
    }

    pub fn get_step(&self, index: usize) -> Result<&Step, StepsError> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for view-side state such as input focus.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn row_classes(&self, index: usize) -> Option<&RowClasses> {
        self.rows.get(index)
    }

    pub fn pagination(&self) -> PaginationView {
        PaginationView::compute(&self.options, self.steps.count(), self.current_index)
    }

    /// Unmount the view and hand the surface back.
    ///
    /// Pending animations and undelivered content are dropped.
    pub fn destroy(mut self) -> S {
        self.timeline.clear();
        self.loader.clear();
        self.transition_show = None;
        self.surface.unmount();
        tracing::debug!(uid = %self.uid.value, "Wizard destroyed");
        self.surface
    }

    /// Apply every fetched body that has arrived. Returns how many were applied.
    pub fn poll_content(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.loader.try_next() {
            if self.apply_content(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next fetched body and apply it.
    ///
    /// Returns false if the fetch failed or the body's step no longer exists.
    /// Waits indefinitely when no fetch is in flight.
    pub async fn await_content(&mut self) -> bool {
        match self.loader.next().await {
            Some(event) => self.apply_content(event),
            None => false,
        }
    }

    fn apply_content(&mut self, event: ContentEvent) -> bool {
        let Some(body) = event.body else {
            return false;
        };
        let Some(index) = self.steps.index_of(event.key) else {
            tracing::debug!(uid = %self.uid.value, "Dropping content for a removed step");
            return false;
        };
        self.surface
            .set_panel_content(index, PanelContent::Html(body));
        self.surface.set_panel_busy(index, false);
        if let Ok(step) = self.steps.get_mut(index) {
            step.content_loaded = true;
        }
        true
    }

    // ─── Rendering ─────────────────────────────────────────────────────────

    fn render(&mut self, labels: Vec<String>) -> Result<(), StepsError> {
        self.surface.mount(&SurfaceFrame {
            uid: self.uid.value.clone(),
            css_class: self.options.css_class.clone(),
            steps_container_tag: self.options.steps_container_tag.clone(),
            content_container_tag: self.options.content_container_tag.clone(),
        });

        for (index, label) in labels.into_iter().enumerate() {
            let nodes = self.step_nodes(index, label)?;
            self.surface.insert_step(index, nodes);

            let mut classes = RowClasses::new();
            if !self.options.enable_all_steps {
                classes.insert(RowClass::Disabled);
            }
            if self.current_index > index {
                classes.remove(&RowClass::Disabled);
                classes.insert(RowClass::Done);
            }
            self.rows.push(classes);
        }
        self.refresh_boundaries();

        if !self.steps.is_empty() {
            self.surface.set_panel_hidden(self.current_index, false);
            self.refresh_step_navigation(None);
        }

        if self.options.enable_pagination {
            self.surface
                .mount_actions(&pagination::action_row(&self.options));
            self.refresh_pagination();
        }

        self.load_current_content();
        Ok(())
    }

    fn step_nodes(&self, index: usize, label: String) -> Result<StepNodes, StepsError> {
        let step = self.steps.get(index)?;
        let body = match step.content_mode {
            ContentMode::Html => PanelContent::Html(step.content.clone()),
            _ => PanelContent::default(),
        };
        Ok(StepNodes {
            ids: StepIds::new(&self.uid.value, index),
            label,
            title: step.title.clone(),
            body,
        })
    }

    /// Change the classes of one row and mirror them onto the surface.
    fn update_row(&mut self, index: usize, f: impl FnOnce(&mut RowClasses)) {
        if let Some(classes) = self.rows.get_mut(index) {
            f(classes);
            self.surface.set_row_classes(index, classes);
        }
    }

    fn refresh_boundaries(&mut self) {
        let last = self.rows.len().saturating_sub(1);
        for index in 0..self.rows.len() {
            self.update_row(index, |classes| {
                set_class(classes, RowClass::First, index == 0);
                set_class(classes, RowClass::Last, index == last);
            });
        }
    }

    /// Reassign ids and labels of every step from `from` onwards.
    fn refresh_steps(&mut self, from: usize) -> Result<(), StepsError> {
        for index in from..self.steps.count() {
            let step = self.steps.get(index)?;
            let label = template::render_title(&self.options.title_template, index, &step.title)?;
            let ids = StepIds::new(&self.uid.value, index);
            self.surface.relabel_step(index, &ids, &label);
        }
        Ok(())
    }

    fn refresh_pagination(&mut self) {
        if self.options.enable_pagination {
            self.pagination().apply(&mut self.surface);
        }
    }

    fn persist_current_index(&mut self) {
        if !self.options.save_state {
            return;
        }
        let Some(store) = self.store.as_mut() else {
            return;
        };
        if let Err(e) = store.save(&state_key(&self.uid.value), self.current_index) {
            tracing::warn!(uid = %self.uid.value, error = %e, "Failed to save wizard state");
        }
    }

    fn load_current_content(&mut self) {
        let index = self.current_index;
        let Some(key) = self.steps.key_of(index) else {
            return;
        };
        let force_reload = !self.options.enable_content_cache;
        if let Ok(step) = self.steps.get_mut(index) {
            self.loader.load(index, key, step, force_reload, &mut self.surface);
        }
    }
}

fn set_class(classes: &mut RowClasses, class: RowClass, on: bool) {
    if on {
        classes.insert(class);
    } else {
        classes.remove(&class);
    }
}
