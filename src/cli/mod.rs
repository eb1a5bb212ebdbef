use crate::domain::{AddressSummary, aggregate_events, detail_rows, summary_rows};
use crate::infra::{DecodeWarning, IngestError, load_log_file};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Tui { log_path: PathBuf },
    Print(PrintCommand),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrintCommand {
    pub log_path: PathBuf,
    pub address: Option<String>,
    pub json: bool,
}

#[derive(Debug, Error)]
pub enum CliParseError {
    #[error("missing log file argument")]
    MissingLogPath,

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("{0} requires --print")]
    RequiresPrint(String),
}

#[derive(Debug, Error)]
pub enum CliRunError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("address not found: {0}\nHint: run with --print to list addresses.")]
    AddressNotFound(String),

    #[error("failed to encode json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut log_path: Option<PathBuf> = None;
    let mut print = false;
    let mut json = false;
    let mut address: Option<String> = None;
    let mut flags_done = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if !flags_done {
            match arg.as_str() {
                "--" => {
                    flags_done = true;
                    continue;
                }
                "--print" | "-p" => {
                    print = true;
                    continue;
                }
                "--json" => {
                    json = true;
                    continue;
                }
                "--detail" | "-d" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| CliParseError::MissingFlagValue("--detail".to_string()))?;
                    address = Some(value.to_string());
                    continue;
                }
                _ if arg.starts_with('-') && arg.len() > 1 => {
                    return Err(CliParseError::UnknownFlag(arg.to_string()));
                }
                _ => {}
            }
        }

        if log_path.is_some() {
            return Err(CliParseError::UnexpectedArgument(arg.to_string()));
        }
        log_path = Some(PathBuf::from(arg));
    }

    if !print {
        if json {
            return Err(CliParseError::RequiresPrint("--json".to_string()));
        }
        if address.is_some() {
            return Err(CliParseError::RequiresPrint("--detail".to_string()));
        }
    }

    let log_path = log_path.ok_or(CliParseError::MissingLogPath)?;
    if print {
        return Ok(CliInvocation::Print(PrintCommand {
            log_path,
            address,
            json,
        }));
    }
    Ok(CliInvocation::Tui { log_path })
}

/// Writes one diagnostic line per undecodable input line.
pub fn report_decode_warnings(
    err: &mut impl Write,
    warnings: &[DecodeWarning],
) -> io::Result<()> {
    for warning in warnings {
        writeln!(
            err,
            "Error parsing JSON (line {}): {}",
            warning.line_no, warning.error
        )?;
    }
    Ok(())
}

pub fn run_print(command: PrintCommand) -> Result<(), CliRunError> {
    let output = load_log_file(&command.log_path)?;
    {
        let mut err = io::stderr().lock();
        report_decode_warnings(&mut err, &output.warnings)?;
    }

    let addresses = aggregate_events(output.events);
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    print_addresses(&mut out, &addresses, command.address.as_deref(), command.json)?;
    match out.flush() {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => Ok(result?),
    }
}

fn print_addresses(
    out: &mut impl Write,
    addresses: &[AddressSummary],
    address: Option<&str>,
    json: bool,
) -> Result<(), CliRunError> {
    match address {
        None => {
            for row in summary_rows(addresses) {
                let line = if json {
                    serde_json::to_string(&row)?
                } else {
                    tab_line(&[
                        row.address.as_str(),
                        row.first_seen.as_str(),
                        row.last_seen.as_str(),
                        if row.login_succeeded { "true" } else { "false" },
                    ])
                };
                if !write_line(out, &line)? {
                    return Ok(());
                }
            }
        }
        Some(address) => {
            let Some(summary) = addresses.iter().find(|summary| summary.address == address)
            else {
                return Err(CliRunError::AddressNotFound(address.to_string()));
            };
            for row in detail_rows(summary) {
                let line = if json {
                    serde_json::to_string(&row)?
                } else {
                    tab_line(&[
                        row.timestamp.as_str(),
                        row.eventid.as_str(),
                        row.identity.as_str(),
                        row.input.as_str(),
                        row.message.as_str(),
                    ])
                };
                if !write_line(out, &line)? {
                    return Ok(());
                }
            }
        }
    }
    Ok(())
}

fn tab_line(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| field.replace(['\t', '\n', '\r'], " "))
        .collect::<Vec<_>>()
        .join("\t")
}

fn write_line(out: &mut impl Write, line: &str) -> io::Result<bool> {
    match writeln!(out, "{line}") {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(false),
        Err(error) => Err(error),
    }
}
