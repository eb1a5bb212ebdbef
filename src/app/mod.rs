use crate::domain::{AddressSummary, AggregatedModel, DetailRow, build_replay_command, detail_rows};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

const PAGE_STEP: usize = 10;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything loaded at startup. Never mutated once the TUI is running.
#[derive(Clone, Debug)]
pub struct AppData {
    pub log_path: PathBuf,
    pub addresses: AggregatedModel,
    pub warnings: usize,
    pub cowrie_home: String,
}

impl AppData {
    pub fn new(
        log_path: PathBuf,
        addresses: AggregatedModel,
        warnings: usize,
        cowrie_home: String,
    ) -> Self {
        Self {
            log_path,
            addresses,
            warnings,
            cowrie_home,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen {
    Summary,
    Detail,
    ReplayModal,
}

#[derive(Clone, Debug)]
pub struct AppModel {
    pub data: Arc<AppData>,
    pub view: View,
    pub replay_modal: Option<ReplayModal>,
    pub help_open: bool,
    pub notice: Option<String>,
}

impl AppModel {
    pub fn new(data: AppData) -> Self {
        Self {
            data: Arc::new(data),
            view: View::Summary(SummaryView::default()),
            replay_modal: None,
            help_open: false,
            notice: None,
        }
    }

    pub fn screen(&self) -> Screen {
        if self.replay_modal.is_some() {
            return Screen::ReplayModal;
        }
        match self.view {
            View::Summary(_) => Screen::Summary,
            View::Detail(_) => Screen::Detail,
        }
    }

    pub fn detail_address(&self) -> Option<&AddressSummary> {
        match &self.view {
            View::Detail(view) => self.data.addresses.get(view.address_index),
            View::Summary(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SummaryView {
    pub selected: usize,
}

#[derive(Clone, Debug)]
pub struct DetailView {
    pub from_summary: SummaryView,
    pub address_index: usize,
    pub rows: Vec<DetailRow>,
    pub selected: usize,
}

#[derive(Clone, Debug)]
pub enum View {
    Summary(SummaryView),
    Detail(DetailView),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReplayModalButton {
    Copy,
    Close,
}

impl ReplayModalButton {
    pub const ALL: [Self; 2] = [Self::Copy, Self::Close];

    pub fn label(self) -> &'static str {
        match self {
            Self::Copy => "Copy to Clipboard",
            Self::Close => "Close",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Copy => 0,
            Self::Close => 1,
        }
    }

    fn from_index(index: usize) -> Self {
        if index == 0 { Self::Copy } else { Self::Close }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReplayModal {
    pub command: String,
    pub selected: ReplayModalButton,
}

impl ReplayModal {
    fn new(command: String) -> Self {
        Self {
            command,
            selected: ReplayModalButton::Copy,
        }
    }
}

/// Input the view layer delivers after translating raw keys.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NavInput {
    Select(usize),
    Confirm,
    Cancel,
    CopyRequested,
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Nav(NavInput),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppCommand {
    None,
    Quit,
    CopyToClipboard { text: String },
}

pub fn update(model: AppModel, event: AppEvent) -> (AppModel, AppCommand) {
    match event {
        AppEvent::Key(key) => update_on_key(model, key),
        AppEvent::Nav(input) => update_on_nav(model, input),
    }
}

fn update_on_key(model: AppModel, key: KeyEvent) -> (AppModel, AppCommand) {
    let mut model = model;
    model.notice = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return (model, AppCommand::Quit);
    }

    if model.help_open {
        if matches!(key.code, KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Esc) {
            model.help_open = false;
        }
        return (model, AppCommand::None);
    }

    if let Some(button) = model.replay_modal.as_ref().map(|modal| modal.selected) {
        let input = match key.code {
            KeyCode::Left => Some(NavInput::Select(ReplayModalButton::Copy.index())),
            KeyCode::Right => Some(NavInput::Select(ReplayModalButton::Close.index())),
            KeyCode::Tab | KeyCode::BackTab => Some(NavInput::Select(1 - button.index())),
            KeyCode::Enter => Some(NavInput::Confirm),
            KeyCode::Char('c') | KeyCode::Char('y') => Some(NavInput::CopyRequested),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('n') => Some(NavInput::Cancel),
            _ => None,
        };
        return match input {
            Some(input) => update(model, AppEvent::Nav(input)),
            None => (model, AppCommand::None),
        };
    }

    if matches!(key.code, KeyCode::F(1) | KeyCode::Char('?')) {
        model.help_open = true;
        return (model, AppCommand::None);
    }

    let (selected, in_detail) = match &model.view {
        View::Summary(view) => (view.selected, false),
        View::Detail(view) => (view.selected, true),
    };
    let input = match key.code {
        KeyCode::Enter => Some(NavInput::Confirm),
        KeyCode::Esc | KeyCode::Backspace => Some(NavInput::Cancel),
        KeyCode::Char('q') if !in_detail => return (model, AppCommand::Quit),
        code => movement_target(code, selected).map(NavInput::Select),
    };

    match input {
        Some(input) => update(model, AppEvent::Nav(input)),
        None => (model, AppCommand::None),
    }
}

fn movement_target(code: KeyCode, selected: usize) -> Option<usize> {
    match code {
        KeyCode::Up | KeyCode::Char('k') => Some(selected.saturating_sub(1)),
        KeyCode::Down | KeyCode::Char('j') => Some(selected.saturating_add(1)),
        KeyCode::PageUp => Some(selected.saturating_sub(PAGE_STEP)),
        KeyCode::PageDown => Some(selected.saturating_add(PAGE_STEP)),
        KeyCode::Home => Some(0),
        KeyCode::End => Some(usize::MAX),
        _ => None,
    }
}

fn update_on_nav(mut model: AppModel, input: NavInput) -> (AppModel, AppCommand) {
    if let Some(modal) = model.replay_modal.take() {
        return update_replay_modal(model, modal, input);
    }

    let view = std::mem::replace(&mut model.view, View::Summary(SummaryView::default()));
    match view {
        View::Summary(view) => update_summary(model, view, input),
        View::Detail(view) => update_detail(model, view, input),
    }
}

fn update_summary(
    mut model: AppModel,
    mut view: SummaryView,
    input: NavInput,
) -> (AppModel, AppCommand) {
    match input {
        NavInput::Select(index) => {
            view.selected = clamp_selection(index, model.data.addresses.len());
        }
        NavInput::Confirm => {
            let address_index = view.selected;
            if let Some(summary) = model.data.addresses.get(address_index) {
                let rows = detail_rows(summary);
                model.view = View::Detail(DetailView {
                    from_summary: view,
                    address_index,
                    rows,
                    selected: 0,
                });
                return (model, AppCommand::None);
            }
        }
        NavInput::Cancel => {
            model.view = View::Summary(view);
            return (model, AppCommand::Quit);
        }
        NavInput::CopyRequested => {}
    }

    model.view = View::Summary(view);
    (model, AppCommand::None)
}

fn update_detail(
    mut model: AppModel,
    mut view: DetailView,
    input: NavInput,
) -> (AppModel, AppCommand) {
    match input {
        NavInput::Select(index) => {
            view.selected = clamp_selection(index, view.rows.len());
        }
        NavInput::Confirm => {
            let command = view
                .rows
                .get(view.selected)
                .and_then(|row| build_replay_command(&row.message, &model.data.cowrie_home));
            if let Some(command) = command {
                model.replay_modal = Some(ReplayModal::new(command));
            }
        }
        NavInput::Cancel => {
            model.view = View::Summary(view.from_summary);
            return (model, AppCommand::None);
        }
        NavInput::CopyRequested => {}
    }

    model.view = View::Detail(view);
    (model, AppCommand::None)
}

// `model.replay_modal` has already been taken; putting it back keeps the modal open.
fn update_replay_modal(
    mut model: AppModel,
    mut modal: ReplayModal,
    input: NavInput,
) -> (AppModel, AppCommand) {
    match input {
        NavInput::Select(index) => {
            modal.selected = ReplayModalButton::from_index(index);
            model.replay_modal = Some(modal);
            (model, AppCommand::None)
        }
        NavInput::Confirm => match modal.selected {
            ReplayModalButton::Copy => (
                model,
                AppCommand::CopyToClipboard {
                    text: modal.command,
                },
            ),
            ReplayModalButton::Close => (model, AppCommand::None),
        },
        NavInput::CopyRequested => (
            model,
            AppCommand::CopyToClipboard {
                text: modal.command,
            },
        ),
        NavInput::Cancel => (model, AppCommand::None),
    }
}

fn clamp_selection(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}
