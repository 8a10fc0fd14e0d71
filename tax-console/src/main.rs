use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use tax_console::cli::{Cli, Command};
use tax_console::{ConsoleConfig, TaxApp, logging, session};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = ConsoleConfig::load(cli.config.as_deref()).context("loading configuration")?;
    config.apply_overrides(cli.backend, cli.source, cli.log_level);

    logging::init_logging(config.log_level());
    if let Some(path) = &config.log_file {
        logging::enable_file_logging(path)?;
    }

    debug!(backend = %config.source.backend, location = %config.source.location, "loading tax rates");
    let registry = tax_data::build_registry();
    let mut app = TaxApp::new();
    let loaded = app.load(&registry, &config.source).await;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    // A failed load is not fatal: commands run against an empty store.
    let failed = match cli.command {
        Command::List(args) => {
            report(&loaded);
            session::list(&app, &args, &mut out)?;
            false
        }
        Command::Summary => {
            report(&loaded);
            session::summary(&app, &mut out)?;
            false
        }
        Command::Calculate(args) => {
            report(&loaded);
            let notice = session::calculate(&mut app, &args, &mut out)?;
            report(&notice);
            notice.is_error()
        }
        Command::Export(args) => {
            report(&loaded);
            let notice = session::export(&mut app, &args, &mut out);
            report(&notice);
            notice.is_error()
        }
        Command::Session => {
            writeln!(out, "{loaded}")?;
            let stdin = io::stdin();
            let prompt = stdin.is_terminal();
            session::run_session(&mut app, stdin.lock(), &mut out, prompt)
                .context("reading session input")?;
            false
        }
    };

    out.flush()?;
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// One-shot commands keep stdout for their output; notices go to stderr.
fn report(notice: &tax_console::Notice) {
    eprintln!("{notice}");
}
