//! CLI entry point for tuicast.

use std::io;

use clap::{CommandFactory, Parser};
use color_eyre::eyre::{Result, WrapErr};

use tuicast::cli::{Cli, OutputFormat};
use tuicast::config::TuicastConfig;
use tuicast::logging::init_logging;
use tuicast::replay::replay;
use tuicast::tui;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return Ok(());
    }

    let config = TuicastConfig::layered(cli.config.as_deref(), &cli.to_config_overrides())
        .wrap_err("Failed to load configuration")?;

    if let Some(ref path) = cli.save_config {
        config
            .save(path)
            .wrap_err_with(|| format!("Failed to save config to {}", path.display()))?;
        eprintln!("Saved config to {}", path.display());
    }

    // The replay writes its trace to stdout, so only log to a file when asked
    let _guard = if cli.interactive || config.logging.file.is_some() {
        Some(init_logging(&config.logging)?)
    } else {
        None
    };

    if cli.interactive {
        return tui::run(&config);
    }

    let trace = replay(config.window.to_state(), &config.replay.steps)?;

    let rendered = match cli.format {
        OutputFormat::Yaml => {
            serde_yaml::to_string(&trace).wrap_err("Failed to serialize trace to YAML")?
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(&trace).wrap_err("Failed to serialize trace to JSON")?
                + "\n"
        }
    };

    if let Some(ref path) = cli.output {
        std::fs::write(path, &rendered)
            .wrap_err_with(|| format!("Failed to write to {}", path.display()))?;
        eprintln!("Wrote trace to {}", path.display());
    } else {
        print!("{rendered}");
    }

    Ok(())
}
