use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use timeclock_cli::commands::{add, codes, edit, report, status};
use timeclock_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Warnings reach the user unless RUST_LOG says otherwise
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    };
    // try_init so a subscriber set up elsewhere (tests) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let now = Local::now();
    let mut stdout = std::io::stdout().lock();
    match command {
        Commands::Add(args) => add::run(&mut stdout, args, &config, now)?,
        Commands::Time { time } => edit::set_time(&mut stdout, time, &config, now)?,
        Commands::Code { code } => edit::set_code(&mut stdout, code, &config)?,
        Commands::Note { note } => edit::set_note(&mut stdout, note, &config)?,
        Commands::Status => status::run(&mut stdout, &config, now)?,
        Commands::Codes => codes::run(&mut stdout, &config)?,
        Commands::Report(args) => report::run(&mut stdout, args, &config, now)?,
    }

    Ok(())
}
