pub mod keybindings;
pub mod terminal;
pub mod wizard_view;

pub use terminal::{install_panic_hook, TerminalSession};
pub use wizard_view::WizardLayout;
