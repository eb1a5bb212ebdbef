mod app;
mod cli;
mod domain;
mod infra;
mod ui;

use crate::app::{AppCommand, AppData, AppEvent, AppModel};
use crate::cli::CliInvocation;
use crate::domain::aggregate_events;
use crate::infra::{Clipboard, SystemClipboard, load_log_file, resolve_cowrie_home};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout, Write};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    App(#[from] crate::app::AppError),

    #[error(transparent)]
    Cli(#[from] crate::cli::CliRunError),

    #[error(transparent)]
    Ingest(#[from] crate::infra::IngestError),
}

fn main() {
    if let Err(error) = run_main() {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), MainError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match crate::cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Tui { log_path } => run_tui(log_path),
        CliInvocation::Print(command) => Ok(crate::cli::run_print(command)?),
    }
}

fn print_help() {
    let text = format!(
        "{name} — browse Cowrie honeypot JSON logs by source address\n\nUSAGE:\n  {name} <file.json>                        Start the TUI\n  {name} --print [--json] <file.json>       Print one row per source address\n  {name} --print --detail ADDRESS <file.json>  Print the event timeline for one address\n  {name} --help | --version\n\nOUTPUT:\n  summary: src_ip<TAB>first_event<TAB>last_event<TAB>login_success\n  detail:  timestamp<TAB>eventid<TAB>username/password<TAB>input<TAB>message\n\nENV:\n  COWRIE_HOME   Base dir for bin/playlog and TTY logs (default: /cowrie/cowrie-git)\n",
        name = env!("CARGO_PKG_NAME")
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}

fn run_tui(log_path: PathBuf) -> Result<(), MainError> {
    let output = load_log_file(&log_path)?;
    {
        let mut err = io::stderr().lock();
        let _ = crate::cli::report_decode_warnings(&mut err, &output.warnings);
    }

    let warnings = output.warnings.len();
    let data = AppData::new(
        log_path,
        aggregate_events(output.events),
        warnings,
        resolve_cowrie_home(),
    );
    let mut model = AppModel::new(data);
    let mut clipboard = SystemClipboard::new();

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut model, &mut clipboard);
    restore_terminal(&mut terminal)?;
    Ok(result?)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, app::AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), app::AppError> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    model: &mut AppModel,
    clipboard: &mut impl Clipboard,
) -> Result<(), app::AppError> {
    loop {
        terminal.draw(|frame| ui::render(frame, model))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        let (next, command) = app::update(model.clone(), AppEvent::Key(key));
        *model = next;
        match command {
            AppCommand::None => {}
            AppCommand::Quit => return Ok(()),
            AppCommand::CopyToClipboard { text } => {
                let notice = match clipboard.set_text(&text) {
                    Ok(()) => "Copied replay command to clipboard.".to_string(),
                    Err(error) => format!("Copy failed: {error}"),
                };
                model.notice = Some(notice);
            }
        }
    }
}
