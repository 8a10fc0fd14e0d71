//! Console commands and the interactive session loop.
//!
//! The one-shot subcommands and the session share the functions here so a
//! `list` typed into a session prints exactly what `tax-console list` does.

use std::io::{self, BufRead, Write};

use clap::Parser;
use clap::error::ErrorKind;
use tax_core::TaxRate;
use tracing::debug;

use crate::app::{MessageType, Notice, TaxApp};
use crate::cli::{CalculateArgs, ExportArgs, ListArgs, SessionCommand, SessionLine};
use crate::logging;
use crate::render::{calculation_panel, rates_table, summary_cards};
use crate::utils::split_words;

/// Whether the session should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn list<W: Write>(app: &TaxApp, args: &ListArgs, out: &mut W) -> io::Result<()> {
    let store = app.store();
    let selected: Vec<&TaxRate> = match (args.country.as_deref(), args.active) {
        (Some(country), true) => store.by_country(country).filter(|r| r.effective).collect(),
        (Some(country), false) => store.by_country(country).collect(),
        (None, true) => store.active().collect(),
        (None, false) => store.rates().iter().collect(),
    };
    write!(out, "{}", rates_table(selected))
}

pub fn summary<W: Write>(app: &TaxApp, out: &mut W) -> io::Result<()> {
    write!(out, "{}", summary_cards(&app.store().summary()))
}

/// Prints the calculator panel on success; the notice says why otherwise.
pub fn calculate<W: Write>(
    app: &mut TaxApp,
    args: &CalculateArgs,
    out: &mut W,
) -> io::Result<Notice> {
    let notice = app.calculate_tax(&args.region, &args.amount);
    if !notice.is_error() {
        if let Some(calculation) = &app.state.last_calculation {
            write!(out, "{}", calculation_panel(calculation))?;
        }
    }
    Ok(notice)
}

/// Writes CSV to `--out`, or to `out` when no path is given.
pub fn export<W: Write>(app: &mut TaxApp, args: &ExportArgs, out: &mut W) -> Notice {
    match &args.out {
        Some(path) => app.export_to_path(path),
        None => app.export_tax_rates(out),
    }
}

/// Runs one parsed session command.
pub fn run_command<W: Write>(
    app: &mut TaxApp,
    command: SessionCommand,
    out: &mut W,
) -> io::Result<Flow> {
    let notice = match command {
        SessionCommand::Add(fields) => {
            let notice = app.add_tax_rate(&fields);
            if !notice.is_error() {
                write!(out, "{}", rates_table(app.store().rates().last()))?;
            }
            notice
        }
        SessionCommand::Edit(args) => {
            let notice = app.update_tax_rate(&args.id, &args.fields);
            if notice.kind == MessageType::Success {
                write!(out, "{}", rates_table(app.store().get(&args.id)))?;
            }
            notice
        }
        SessionCommand::Toggle { id } => app.toggle_tax_rate(&id),
        SessionCommand::Delete { id } => app.delete_tax_rate(&id),
        SessionCommand::List(args) => return list(app, &args, out).map(|()| Flow::Continue),
        SessionCommand::Summary => return summary(app, out).map(|()| Flow::Continue),
        SessionCommand::Calculate(args) => calculate(app, &args, out)?,
        SessionCommand::Export(args) => export(app, &args, out),
        SessionCommand::Log { level } => match logging::set_log_level(&level) {
            Ok(()) => app.show_message(format!("Log level set to {level}"), MessageType::Info),
            Err(e) => app.show_message(e.to_string(), MessageType::Error),
        },
        SessionCommand::Quit => return Ok(Flow::Quit),
    };
    writeln!(out, "{notice}")?;
    Ok(Flow::Continue)
}

/// Handles one raw input line. Blank lines and `#` comments are skipped.
pub fn run_line<W: Write>(app: &mut TaxApp, line: &str, out: &mut W) -> io::Result<Flow> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Flow::Continue);
    }

    let words = match split_words(line) {
        Ok(words) => words,
        Err(e) => {
            writeln!(out, "error: {e}")?;
            return Ok(Flow::Continue);
        }
    };

    match SessionLine::try_parse_from(words) {
        Ok(parsed) => {
            debug!(command = ?parsed.command, "session command");
            run_command(app, parsed.command, out)
        }
        Err(e) => {
            // `help` and `--help` arrive as clap errors of a display kind.
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    write!(out, "{}", e.render())?
                }
                _ => write!(out, "{e}")?,
            }
            Ok(Flow::Continue)
        }
    }
}

/// Reads commands from `input` until `quit` or end of input.
pub fn run_session<R: BufRead, W: Write>(
    app: &mut TaxApp,
    input: R,
    out: &mut W,
    prompt: bool,
) -> io::Result<()> {
    if prompt {
        writeln!(out, "Type `help` for commands, `quit` to leave.")?;
    }
    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "tax> ")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        if run_line(app, &line?, out)? == Flow::Quit {
            break;
        }
    }
    debug!("session ended");
    Ok(())
}
