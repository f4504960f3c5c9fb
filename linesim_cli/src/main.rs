mod cli;
mod error_fmt;
mod logging;
mod run;

use clap::Parser;
use cli::{Cli, Commands, JSON_MODE};
use eyre::{Result, WrapErr};
use linesim_config::Config;

fn load_config(path: &std::path::Path) -> Result<Config> {
    let text = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
    let cfg = linesim_config::load_toml(&text)?;
    cfg.validate()?;
    Ok(cfg)
}

fn real_main(cli: &Cli) -> Result<()> {
    let cfg = load_config(&cli.config)?;
    let _guard = logging::init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    match &cli.cmd {
        Commands::Run { ticks, layout } => run::run_sim(&cfg, *ticks, layout.as_deref(), cli.json),
        Commands::Probe {
            x,
            y,
            radius,
            layout,
        } => run::probe(&cfg, *x, *y, *radius, layout.as_deref(), cli.json),
        Commands::SelfCheck => run::self_check(&cfg, cli.json),
    }
}

fn main() {
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = real_main(&cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", error_fmt::format_error_json(&err));
        } else {
            eprintln!("{}", error_fmt::humanize(&err));
        }
        std::process::exit(error_fmt::exit_code_for_error(&err));
    }
}
