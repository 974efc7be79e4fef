mod app;
mod cli;
mod settings;

fn main() -> anyhow::Result<()> {
    cli::run_from_env()
}
