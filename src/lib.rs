//! Stepwise - step-by-step wizards for the terminal
//!
//! The [`wizard`] module holds the state machine; [`surface`] is the seam to
//! whatever displays it. The terminal front-end in [`ui`] and [`app`] is one
//! such display.

pub mod app;
pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod markup;
pub mod state_store;
pub mod surface;
pub mod template;
pub mod ui;
pub mod uid;
pub mod wizard;

pub use content::{ContentFetcher, FetchError, HttpFetcher, StaticFetcher};
pub use error::StepsError;
pub use state_store::{FileStateStore, MemoryStateStore, StateStore};
pub use surface::{MemorySurface, RenderSurface};
pub use wizard::{
    ContentMode, HookOutcome, Hooks, Step, StepChange, TransitionEffect, Wizard, WizardBuilder,
    WizardEvent, WizardOptions,
};
