use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use tabliner_model::verify_tab_order;

use crate::app::{ReplaySession, play, render_tree};
use crate::settings::AppSettings;

#[derive(Debug, Parser)]
#[command(
    name = "tabliner",
    about = "Outline view of browser tabs, driven from recorded host sessions",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Play a recorded session and print the resulting tree.
    Replay(ReplayArgs),

    /// Validate the ordering of a session's initial tab list.
    Check(CheckArgs),

    /// Print the effective settings.
    Settings(SettingsArgs),
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Session file (JSON).
    pub session: PathBuf,

    /// Settings file to use instead of the default location.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Print the tree after every step.
    #[arg(long)]
    pub trace: bool,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Session file (JSON).
    pub session: PathBuf,
}

#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Settings file to use instead of the default location.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Write the defaults to the settings file.
    #[arg(long)]
    pub write_defaults: bool,
}

pub fn run_from_env() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Replay(args) => run_replay(args),
        Commands::Check(args) => run_check(args),
        Commands::Settings(args) => run_settings(args),
    }
}

fn load_settings(path: Option<&PathBuf>) -> AppSettings {
    match path {
        Some(path) => AppSettings::load_from(path),
        None => AppSettings::load(),
    }
}

fn init_logging(settings: &AppSettings) {
    let env = env_logger::Env::default().default_filter_or(settings.log_level.as_str());
    // A logger may already be installed when running under tests.
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn run_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.settings.as_ref());
    init_logging(&settings);

    let session = ReplaySession::load(&args.session)?;
    let trace = args.trace;
    let store = play(session, settings, |position, state| {
        if trace {
            println!("-- step {position}");
            print!("{}", render_tree(state));
        }
    })?;

    print!("{}", render_tree(store.state()));
    let commands = store.host().commands();
    if !commands.is_empty() {
        println!("host commands:");
        for command in commands {
            println!("  {}", serde_json::to_string(&command)?);
        }
    }
    if store.divergence_count() > 0 {
        println!("divergences: {}", store.divergence_count());
    }
    Ok(())
}

fn run_check(args: CheckArgs) -> anyhow::Result<()> {
    init_logging(&AppSettings::default());

    let session = ReplaySession::load(&args.session)?;
    verify_tab_order(&session.tabs)
        .with_context(|| format!("{} is out of order", args.session.display()))?;
    println!(
        "{}: {} tabs in order",
        args.session.display(),
        session.tabs.len()
    );
    Ok(())
}

fn run_settings(args: SettingsArgs) -> anyhow::Result<()> {
    let path = match args.settings {
        Some(path) => path,
        None => AppSettings::settings_path().context("no config directory on this platform")?,
    };

    if args.write_defaults {
        AppSettings::default().save_to(&path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let settings = AppSettings::load_from(&path);
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&settings)?);
    Ok(())
}
