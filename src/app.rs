use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::content::ContentFetcher;
use crate::state_store::StateStore;
use crate::surface::MemorySurface;
use crate::ui::keybindings::{self, KeyAction};
use crate::ui::terminal::TerminalSession;
use crate::ui::wizard_view::{self, WizardLayout};
use crate::wizard::{Hooks, Step, Wizard, WizardBuilder, WizardEvent, WizardOptions};

/// Interactive terminal wizard.
pub struct App {
    wizard: Wizard<MemorySurface>,
    tick_rate: Duration,
    should_quit: bool,
    status: String,
    /// Step index the wizard finished on, set by the finished hook
    finished: Rc<Cell<Option<usize>>>,
}

impl App {
    pub fn new(
        config: &Config,
        options: WizardOptions,
        steps: Vec<Step>,
        store: Option<Box<dyn StateStore>>,
        fetcher: Option<Arc<dyn ContentFetcher>>,
    ) -> Result<Self> {
        let finished = Rc::new(Cell::new(None));
        let sink = Rc::clone(&finished);
        let hooks = Hooks::new().on_finished(move |index| sink.set(Some(index)));

        let mut builder = WizardBuilder::new(options).hooks(hooks);
        if let Some(store) = store {
            builder = builder.boxed_state_store(store);
        }
        if let Some(fetcher) = fetcher {
            builder = builder.fetcher(fetcher);
        }
        let wizard = builder.build(steps, MemorySurface::new())?;

        Ok(Self {
            wizard,
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms),
            should_quit: false,
            status: keybindings::hint_line(),
            finished,
        })
    }

    pub fn wizard(&self) -> &Wizard<MemorySurface> {
        &self.wizard
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Step the wizard was finished on, if it was.
    pub fn finished_on(&self) -> Option<usize> {
        self.finished.get()
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = TerminalSession::enter()?;

        while !self.should_quit {
            let layout = WizardLayout::new(terminal.area()?);
            self.wizard.surface_mut().panel_width = i32::from(layout.content.width);

            self.wizard.poll_content();
            self.wizard.advance(Instant::now());

            let status = self.status.clone();
            terminal.draw(|f| wizard_view::render(f, self.wizard.surface(), &status))?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            // event::poll blocks this worker; give other tasks a turn.
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Apply one key press. Wizard errors are shown on the status line.
    pub fn handle_key(&mut self, code: KeyCode) {
        let Some(action) = keybindings::action_for(code) else {
            return;
        };

        let pagination = self.wizard.pagination();
        let event = match action {
            KeyAction::Quit => {
                self.should_quit = true;
                return;
            }
            KeyAction::Arrow(key) => Some(WizardEvent::Key(key)),
            KeyAction::Press(action) => pagination
                .state(action)
                .filter(|state| state.visible && state.enabled)
                .map(|_| WizardEvent::ActionClicked(action)),
            KeyAction::Primary => pagination.primary().map(WizardEvent::ActionClicked),
            KeyAction::JumpTo(index) => {
                (index < self.wizard.step_count()).then_some(WizardEvent::StepClicked(index))
            }
        };
        let Some(event) = event else {
            return;
        };

        match self.wizard.dispatch(event) {
            Ok(_) => {
                self.status = keybindings::hint_line();
            }
            Err(e) => {
                tracing::warn!(error = %e, ?event, "Wizard event failed");
                self.status = format!("Error: {e}");
            }
        }

        if let Some(index) = self.finished.get() {
            tracing::info!(step = index, "Finished from terminal");
            self.should_quit = true;
        }
    }
}
