use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;
use memfs::config::CliArgs;
use memfs::snapshot::{load_state, save_state};
use memfs::{FileSystem, Shell};

fn run(args: CliArgs) -> Result<()> {
    let fs = match &args.load {
        Some(path) => load_state(path)
            .with_context(|| format!("failed to load snapshot {}", path.display()))?,
        None => FileSystem::new(),
    };

    let mut shell = Shell::with_fs(fs);
    let stdin = std::io::stdin();
    // Only prompt a human; piped input gets clean output.
    let prompt = stdin.is_terminal().then_some(args.prompt.as_str());
    let mut stdout = std::io::stdout().lock();

    tracing::info!("memfs ready");
    shell.run(stdin.lock(), &mut stdout, prompt)?;

    if let Some(path) = &args.save_on_exit {
        save_state(shell.fs(), path)
            .with_context(|| format!("failed to save snapshot {}", path.display()))?;
    }
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    // Logs go to stderr; stdout carries command output only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    if let Err(e) = run(args) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}
