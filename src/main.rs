use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use stepwise::app::App;
use stepwise::config::Config;
use stepwise::content::{ContentFetcher, HttpFetcher};
use stepwise::logging;
use stepwise::markup;
use stepwise::state_store::{FileStateStore, StateStore};
use stepwise::surface::Action;
use stepwise::ui;
use stepwise::wizard::{KeyedEnum, PaginationView, Step, TransitionEffect, WizardOptions};

#[derive(Parser)]
#[command(name = "stepwise")]
#[command(about = "Step-by-step wizards in the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk through the steps of a markup file
    Run {
        /// File with header/body element pairs
        file: PathBuf,

        /// Zero-based step to start on
        #[arg(short, long)]
        start: Option<usize>,

        /// Transition effect (none, fade, slide, slideLeft or 0-3)
        #[arg(short, long)]
        effect: Option<TransitionEffect>,
    },

    /// List the steps found in a markup file
    Inspect {
        file: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = matches!(cli.command, Commands::Run { .. });

    // Initialize logging (file-based for TUI, stderr for CLI)
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Commands::Run {
            file,
            start,
            effect,
        } => {
            let mut options = config.wizard.clone();
            if let Some(start) = start {
                options.start_index = start;
            }
            if let Some(effect) = effect {
                options.transition_effect = effect;
            }
            cmd_run(&config, options, &file, logging_handle.log_file_path).await?;
        }
        Commands::Inspect { file } => {
            cmd_inspect(&config.wizard, &file)?;
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}

fn read_steps(options: &WizardOptions, file: &Path) -> Result<Vec<Step>> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let steps = markup::parse(&source, &options.header_tag, &options.body_tag)
        .with_context(|| format!("Failed to parse steps in {}", file.display()))?;
    Ok(steps)
}

async fn cmd_run(
    config: &Config,
    options: WizardOptions,
    file: &Path,
    log_file_path: Option<PathBuf>,
) -> Result<()> {
    let steps = read_steps(&options, file)?;

    let store: Option<Box<dyn StateStore>> = if options.save_state {
        Some(Box::new(FileStateStore::open(&config.state_path())?))
    } else {
        None
    };
    let fetcher: Arc<dyn ContentFetcher> = Arc::new(HttpFetcher::new());

    tracing::info!(file = %file.display(), steps = steps.len(), "Starting wizard");
    ui::install_panic_hook();
    let mut app = App::new(config, options, steps, store, Some(fetcher))?;
    let result = app.run().await;

    if let Some(index) = app.finished_on() {
        println!("Finished on step {}", index + 1);
    }

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    result
}

fn cmd_inspect(options: &WizardOptions, file: &Path) -> Result<()> {
    let steps = read_steps(options, file)?;

    println!("{} ({} steps)", file.display(), steps.len());
    println!("{}", "─".repeat(60));
    for (index, step) in steps.iter().enumerate() {
        let title = ui::wizard_view::plain_text(&step.title);
        if step.content_url.is_empty() {
            println!("{:>3}  {:<7} {}", index, step.content_mode.key(), title);
        } else {
            println!(
                "{:>3}  {:<7} {}  <{}>",
                index,
                step.content_mode.key(),
                title,
                step.content_url
            );
        }
    }

    if options.enable_pagination && !steps.is_empty() {
        let start = options.start_index.min(steps.len() - 1);
        let view = PaginationView::compute(options, steps.len(), start);
        let controls: Vec<String> = [Action::Previous, Action::Next, Action::Finish]
            .into_iter()
            .filter_map(|action| {
                let state = view.state(action)?;
                state.visible.then(|| {
                    let mark = if state.enabled { "" } else { " (disabled)" };
                    format!("{action:?}{mark}")
                })
            })
            .collect();
        println!();
        println!("On step {}: {}", start, controls.join(", "));
    }

    Ok(())
}
