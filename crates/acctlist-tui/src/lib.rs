// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use acctlist_app::{
    AccountId, AccountListView, AccountType, HostEvent, HostPort, ListCommand, ListController,
    ListEvent, ListState, LoadRequest, PortalListView, render_accounts, render_portals,
};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

/// Where a reload gets its payloads from.
pub trait DataSource {
    fn load(&mut self) -> Result<LoadRequest>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub add_guard_delay: Duration,
    pub status_ttl: Duration,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            add_guard_delay: Duration::from_millis(1_000),
            status_ttl: Duration::from_secs(4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InternalEvent {
    ClearStatus { token: u64 },
    ReleaseAddGuard { token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Nav,
    Search,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    mode: InputMode,
    cursor: usize,
    portal_cursor: usize,
    pending_delete: Option<AccountId>,
    help_visible: bool,
    status_line: Option<String>,
    status_token: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum UiAction {
    Quit,
    SwitchType,
    CycleFilter,
    ClearSearch,
    BeginSearch,
    EndSearch,
    SearchInput(char),
    SearchBackspace,
    CursorDown,
    CursorUp,
    Toggle,
    RequestDelete,
    ConfirmDelete,
    CancelDelete,
    OpenAdd,
    CloseAdd,
    PortalInput(char),
    PortalBackspace,
    PortalDown,
    PortalUp,
    SubmitAdd,
    Reload,
    ToggleHelp,
}

/// Runs the interactive list until the user quits. The controller should
/// already hold the initial load.
pub fn run_app<H: HostPort, S: DataSource>(
    controller: &mut ListController<H>,
    source: &mut S,
    options: UiOptions,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let mut result = Ok(());
    loop {
        process_internal_events(controller, &mut view_data, &internal_rx);

        if let Err(error) =
            terminal.draw(|frame| render(frame, controller.state(), &view_data))
        {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(
                        controller,
                        source,
                        &mut view_data,
                        &internal_tx,
                        options,
                        key,
                    ) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<H: HostPort>(
    controller: &mut ListController<H>,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                view_data.status_line = None;
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::ReleaseAddGuard { token } => {
                controller.dispatch(ListCommand::ReleaseAddGuard { token });
            }
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64, after: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(after);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn schedule_guard_release(internal_tx: &Sender<InternalEvent>, token: u64, after: Duration) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(after);
        let _ = sender.send(InternalEvent::ReleaseAddGuard { token });
    });
}

fn emit_status(
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    options: UiOptions,
    message: impl Into<String>,
) {
    view_data.status_line = Some(message.into());
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token, options.status_ttl);
}

fn action_for_key(view_data: &ViewData, picker_open: bool, key: KeyEvent) -> Option<UiAction> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(UiAction::Quit);
    }

    if view_data.help_visible {
        return matches!(key.code, KeyCode::Esc | KeyCode::Char('?'))
            .then_some(UiAction::ToggleHelp);
    }

    if view_data.pending_delete.is_some() {
        return Some(match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => UiAction::ConfirmDelete,
            _ => UiAction::CancelDelete,
        });
    }

    if picker_open {
        return match key.code {
            KeyCode::Esc => Some(UiAction::CloseAdd),
            KeyCode::Enter => Some(UiAction::SubmitAdd),
            KeyCode::Up => Some(UiAction::PortalUp),
            KeyCode::Down => Some(UiAction::PortalDown),
            KeyCode::Backspace => Some(UiAction::PortalBackspace),
            KeyCode::Char(ch) => Some(UiAction::PortalInput(ch)),
            _ => None,
        };
    }

    if view_data.mode == InputMode::Search {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiAction::EndSearch),
            KeyCode::Backspace => Some(UiAction::SearchBackspace),
            KeyCode::Char(ch) => Some(UiAction::SearchInput(ch)),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(UiAction::Quit),
        KeyCode::Tab | KeyCode::BackTab => Some(UiAction::SwitchType),
        KeyCode::Char('f') => Some(UiAction::CycleFilter),
        KeyCode::Char('c') => Some(UiAction::ClearSearch),
        KeyCode::Char('/') => Some(UiAction::BeginSearch),
        KeyCode::Char('j') | KeyCode::Down => Some(UiAction::CursorDown),
        KeyCode::Char('k') | KeyCode::Up => Some(UiAction::CursorUp),
        KeyCode::Char(' ') | KeyCode::Char('t') => Some(UiAction::Toggle),
        KeyCode::Char('d') => Some(UiAction::RequestDelete),
        KeyCode::Char('a') => Some(UiAction::OpenAdd),
        KeyCode::Char('r') => Some(UiAction::Reload),
        KeyCode::Char('?') => Some(UiAction::ToggleHelp),
        _ => None,
    }
}

fn handle_key_event<H: HostPort, S: DataSource>(
    controller: &mut ListController<H>,
    source: &mut S,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    options: UiOptions,
    key: KeyEvent,
) -> bool {
    let picker_open = controller.state().picker().open;
    let Some(action) = action_for_key(view_data, picker_open, key) else {
        return false;
    };
    apply_action(controller, source, view_data, internal_tx, options, action)
}

fn apply_action<H: HostPort, S: DataSource>(
    controller: &mut ListController<H>,
    source: &mut S,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    options: UiOptions,
    action: UiAction,
) -> bool {
    let run = |controller: &mut ListController<H>, view_data: &mut ViewData, command| {
        dispatch(controller, view_data, internal_tx, options, command);
    };

    match action {
        UiAction::Quit => return true,
        UiAction::SwitchType => {
            let next = controller.state().active_type().other();
            view_data.cursor = 0;
            run(controller, view_data, ListCommand::SelectType(next));
        }
        UiAction::CycleFilter => {
            let next = controller.state().active_filter().status_filter.next();
            run(controller, view_data, ListCommand::SetStatusFilter(next));
        }
        UiAction::ClearSearch => run(controller, view_data, ListCommand::ClearSearch),
        UiAction::BeginSearch => view_data.mode = InputMode::Search,
        UiAction::EndSearch => view_data.mode = InputMode::Nav,
        UiAction::SearchInput(ch) => {
            let mut term = controller.state().active_filter().search_term.clone();
            term.push(ch);
            run(controller, view_data, ListCommand::SetSearch(term));
        }
        UiAction::SearchBackspace => {
            let mut term = controller.state().active_filter().search_term.clone();
            if term.pop().is_some() {
                run(controller, view_data, ListCommand::SetSearch(term));
            }
        }
        UiAction::CursorDown => {
            view_data.cursor =
                move_cursor(view_data.cursor, controller.state().filtered().len(), 1);
        }
        UiAction::CursorUp => {
            view_data.cursor =
                move_cursor(view_data.cursor, controller.state().filtered().len(), -1);
        }
        UiAction::Toggle => {
            if let Some(id) = selected_account_id(controller.state(), view_data) {
                run(controller, view_data, ListCommand::ToggleStatus(id));
            }
        }
        UiAction::RequestDelete => {
            if let Some(account) = controller.state().filtered().get(view_data.cursor) {
                let prompt = format!("delete {}? y to confirm", account.name);
                view_data.pending_delete = Some(account.id.clone());
                emit_status(view_data, internal_tx, options, prompt);
            }
        }
        UiAction::ConfirmDelete => {
            if let Some(id) = view_data.pending_delete.take() {
                run(controller, view_data, ListCommand::Delete(id));
            }
        }
        UiAction::CancelDelete => {
            view_data.pending_delete = None;
            emit_status(view_data, internal_tx, options, "delete canceled");
        }
        UiAction::OpenAdd => {
            view_data.portal_cursor = 0;
            run(controller, view_data, ListCommand::OpenAddModal);
        }
        UiAction::CloseAdd => run(controller, view_data, ListCommand::CloseAddModal),
        UiAction::PortalInput(ch) => {
            let mut term = controller.state().picker().search_term.clone();
            term.push(ch);
            view_data.portal_cursor = 0;
            run(controller, view_data, ListCommand::SetPortalSearch(term));
        }
        UiAction::PortalBackspace => {
            let mut term = controller.state().picker().search_term.clone();
            if term.pop().is_some() {
                view_data.portal_cursor = 0;
                run(controller, view_data, ListCommand::SetPortalSearch(term));
            }
        }
        UiAction::PortalDown => {
            let len = controller.state().picker().filtered.len();
            view_data.portal_cursor = move_cursor(view_data.portal_cursor, len, 1);
        }
        UiAction::PortalUp => {
            let len = controller.state().picker().filtered.len();
            view_data.portal_cursor = move_cursor(view_data.portal_cursor, len, -1);
        }
        UiAction::SubmitAdd => {
            let portal = controller
                .state()
                .picker()
                .filtered
                .get(view_data.portal_cursor)
                .cloned();
            if let Some(portal) = portal {
                run(controller, view_data, ListCommand::AddFromPortal(portal));
            }
        }
        UiAction::Reload => match source.load() {
            Ok(request) => run(controller, view_data, ListCommand::Load(request)),
            Err(error) => {
                tracing::warn!("reload failed: {error:#}");
                emit_status(
                    view_data,
                    internal_tx,
                    options,
                    format!("reload failed: {error:#}"),
                );
            }
        },
        UiAction::ToggleHelp => view_data.help_visible = !view_data.help_visible,
    }
    false
}

fn dispatch<H: HostPort>(
    controller: &mut ListController<H>,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    options: UiOptions,
    command: ListCommand,
) {
    let events = controller.dispatch(command);
    for event in &events {
        if let ListEvent::AddGuardArmed { token } = event {
            schedule_guard_release(internal_tx, *token, options.add_guard_delay);
        }
    }
    if let Some(message) = status_for_events(&events) {
        emit_status(view_data, internal_tx, options, message);
    }

    let state = controller.state();
    view_data.cursor = clamp_cursor(view_data.cursor, state.filtered().len());
    view_data.portal_cursor = clamp_cursor(view_data.portal_cursor, state.picker().filtered.len());
}

fn selected_account_id(state: &ListState, view_data: &ViewData) -> Option<AccountId> {
    state
        .filtered()
        .get(view_data.cursor)
        .map(|account| account.id.clone())
}

fn clamp_cursor(cursor: usize, len: usize) -> usize {
    if len == 0 { 0 } else { cursor.min(len - 1) }
}

fn move_cursor(cursor: usize, len: usize, delta: isize) -> usize {
    clamp_cursor(cursor.saturating_add_signed(delta), len)
}

/// First row to draw so the cursor stays inside a window of `visible` rows.
fn scroll_offset(cursor: usize, visible: usize) -> usize {
    if visible == 0 {
        return cursor;
    }
    cursor.saturating_sub(visible - 1)
}

fn status_for_events(events: &[ListEvent]) -> Option<String> {
    events.iter().rev().find_map(|event| match event {
        ListEvent::Loaded { accounts, portals } => {
            Some(format!("loaded {accounts} accounts, {portals} portals"))
        }
        ListEvent::Notify(HostEvent::StatusChanged(changed)) => Some(format!(
            "{} {}",
            changed.account.name,
            if changed.new_status.is_active() {
                "activated"
            } else {
                "deactivated"
            }
        )),
        ListEvent::Notify(HostEvent::AccountDeleted(deleted)) => {
            Some(format!("deleted {}", deleted.account.name))
        }
        ListEvent::Notify(HostEvent::AccountAdded(added)) => Some(format!(
            "requested {} account for {}",
            added.account_type.label(),
            added.portal.display_name()
        )),
        ListEvent::AddIgnored => Some("add already in progress".to_owned()),
        _ => None,
    })
}

fn tab_title(state: &ListState, kind: AccountType) -> String {
    format!("{} ({})", kind.as_str(), state.partition_count(kind))
}

fn filter_bar_text(state: &ListState, view_data: &ViewData) -> String {
    let filter = state.active_filter();
    let stats = state.stats();
    let cursor = if view_data.mode == InputMode::Search {
        "_"
    } else {
        ""
    };
    format!(
        "search: {}{cursor} | status: {} | {} shown | {} active of {}",
        filter.search_term,
        filter.status_filter.as_str(),
        state.filtered().len(),
        stats.active,
        stats.total,
    )
}

fn status_text(view_data: &ViewData) -> String {
    if let Some(status) = &view_data.status_line {
        return status.clone();
    }
    match view_data.mode {
        InputMode::Search => "type to search | enter/esc done".to_owned(),
        InputMode::Nav => {
            "tab type | / search | f filter | t toggle | d delete | a add | ? help | q quit"
                .to_owned()
        }
    }
}

fn help_overlay_text() -> &'static str {
    "nav: j/k move | tab/shift+tab switch type | r reload | q or ctrl+c quit\n\
filter: / search | f cycle status | c clear search\n\
rows: t or space toggle active | d delete (y confirms)\n\
add: a open portals | type to search | up/down pick | enter add | esc close\n\
? or esc close help"
}

fn render(frame: &mut ratatui::Frame<'_>, state: &ListState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = AccountType::ALL
        .iter()
        .position(|kind| *kind == state.active_type())
        .unwrap_or(0);
    let titles = AccountType::ALL
        .iter()
        .map(|kind| tab_title(state, *kind))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(titles)
        .block(Block::default().title("accounts").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    let filter_bar = Paragraph::new(filter_bar_text(state, view_data))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(filter_bar, layout[1]);

    render_account_table(frame, layout[2], state, view_data);

    let status_widget = Paragraph::new(status_text(view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[3]);

    if state.picker().open {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        render_portal_picker(frame, area, state, view_data);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 45, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_account_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &ListState,
    view_data: &ViewData,
) {
    let title = format!("{} accounts", state.active_type().label());
    let rows = match render_accounts(state.filtered()) {
        AccountListView::Empty(placeholder) => {
            let empty = Paragraph::new(format!("{}\n\n{}", placeholder.title, placeholder.message))
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(empty, area);
            return;
        }
        AccountListView::Rows(rows) => rows,
    };

    let visible = usize::from(area.height.saturating_sub(3));
    let offset = scroll_offset(view_data.cursor, visible);
    let header = Row::new(["name", "number", "status", "action"].map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let body = rows
        .into_iter()
        .enumerate()
        .skip(offset)
        .map(|(index, row)| {
            let mut style = if row.active {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            if index == view_data.cursor {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
                if !row.active {
                    style = style.fg(Color::White);
                }
            }
            let status = if row.active { "active" } else { "inactive" };
            Row::new([
                Cell::from(row.name),
                Cell::from(row.number_label),
                Cell::from(status),
                Cell::from(row.toggle_label),
            ])
            .style(style)
        });

    let widths = [
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(9),
        Constraint::Length(11),
    ];
    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_portal_picker(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &ListState,
    view_data: &ViewData,
) {
    let picker = state.picker();
    let title = format!("add {} account", state.active_type().label());
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let search = Paragraph::new(format!("search: {}_", picker.search_term));
    frame.render_widget(search, layout[0]);

    let rows = match render_portals(&picker.filtered) {
        PortalListView::Empty(placeholder) => {
            let empty = Paragraph::new(format!("{}\n\n{}", placeholder.title, placeholder.message))
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, layout[1]);
            return;
        }
        PortalListView::Rows(rows) => rows,
    };

    let offset = scroll_offset(view_data.portal_cursor, usize::from(layout[1].height));
    let body = rows
        .into_iter()
        .enumerate()
        .skip(offset)
        .map(|(index, row)| {
            let style = if index == view_data.portal_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new([Cell::from(row.name), Cell::from(row.number_label)]).style(style)
        });
    let table = Table::new(body, [Constraint::Min(20), Constraint::Length(20)]).column_spacing(1);
    frame.render_widget(table, layout[1]);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        DataSource, InputMode, InternalEvent, UiAction, UiOptions, ViewData, action_for_key,
        centered_rect, clamp_cursor, filter_bar_text, handle_key_event, help_overlay_text,
        move_cursor, process_internal_events, scroll_offset, status_for_events, status_text,
    };
    use acctlist_app::{
        AccountType, HostCommand, HostPort, ListController, ListEvent, LoadRequest, StatusFilter,
    };
    use anyhow::{Result, bail};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::layout::Rect;
    use serde_json::{Value, json};
    use std::sync::mpsc;
    use std::time::Duration;

    #[derive(Debug, Default)]
    struct TestHost {
        commands: Vec<HostCommand>,
    }

    impl HostPort for TestHost {
        fn deliver(&mut self, command: &HostCommand) -> Result<()> {
            self.commands.push(command.clone());
            Ok(())
        }
    }

    #[derive(Debug)]
    struct StaticSource {
        accounts: Value,
        portals: Value,
        fail: bool,
    }

    impl DataSource for StaticSource {
        fn load(&mut self) -> Result<LoadRequest> {
            if self.fail {
                bail!("payload file missing");
            }
            Ok(LoadRequest::new(self.accounts.clone()).with_portals(self.portals.clone()))
        }
    }

    fn source() -> StaticSource {
        StaticSource {
            accounts: json!({"value": [
                {"__ID": "1", "Name": "Stage Right", "AccountNumber": "13048", "fActive": 1, "Type": "Individual"},
                {"__ID": "2", "Name": "Maverick Dental", "AccountNumber": "12904", "fActive": 1, "Type": "Individual"},
                {"__ID": "3", "Name": "Heroes Never Alone", "AccountNumber": "23091", "fActive": null, "Type": "Group"}
            ]}),
            portals: json!([
                {"portal": "Stage Right", "number": "13048"},
                {"portal": "Harbor Signs", "number": "4410"},
                {"portal": "Summit Press"}
            ]),
            fail: false,
        }
    }

    fn options() -> UiOptions {
        UiOptions {
            add_guard_delay: Duration::from_millis(5),
            status_ttl: Duration::from_secs(60),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded() -> (ListController<TestHost>, StaticSource) {
        let mut source = source();
        let mut controller = ListController::new(TestHost::default());
        let request = source.load().expect("load");
        controller.dispatch(acctlist_app::ListCommand::Load(request));
        (controller, source)
    }

    fn press(
        controller: &mut ListController<TestHost>,
        source: &mut StaticSource,
        view_data: &mut ViewData,
        code: KeyCode,
    ) -> bool {
        let (tx, _rx) = mpsc::channel();
        handle_key_event(controller, source, view_data, &tx, options(), key(code))
    }

    #[test]
    fn nav_keys_map_to_actions() {
        let view_data = ViewData::default();
        assert_eq!(
            action_for_key(&view_data, false, key(KeyCode::Char('q'))),
            Some(UiAction::Quit)
        );
        assert_eq!(
            action_for_key(&view_data, false, key(KeyCode::BackTab)),
            Some(UiAction::SwitchType)
        );
        assert_eq!(
            action_for_key(&view_data, false, key(KeyCode::Char(' '))),
            Some(UiAction::Toggle)
        );
        assert_eq!(action_for_key(&view_data, false, key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn ctrl_c_quits_from_any_mode() {
        let view_data = ViewData {
            mode: InputMode::Search,
            help_visible: true,
            ..ViewData::default()
        };
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(&view_data, true, ctrl_c), Some(UiAction::Quit));
    }

    #[test]
    fn picker_captures_typed_characters() {
        let view_data = ViewData::default();
        assert_eq!(
            action_for_key(&view_data, true, key(KeyCode::Char('q'))),
            Some(UiAction::PortalInput('q'))
        );
        assert_eq!(
            action_for_key(&view_data, true, key(KeyCode::Esc)),
            Some(UiAction::CloseAdd)
        );
    }

    #[test]
    fn search_mode_edits_active_tab_term() {
        let (mut controller, mut source) = loaded();
        let mut view_data = ViewData::default();

        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('/'));
        assert_eq!(view_data.mode, InputMode::Search);
        for ch in "mav".chars() {
            press(&mut controller, &mut source, &mut view_data, KeyCode::Char(ch));
        }
        assert_eq!(controller.state().active_filter().search_term, "mav");
        assert_eq!(controller.state().filtered().len(), 1);

        press(&mut controller, &mut source, &mut view_data, KeyCode::Backspace);
        assert_eq!(controller.state().active_filter().search_term, "ma");
        press(&mut controller, &mut source, &mut view_data, KeyCode::Enter);
        assert_eq!(view_data.mode, InputMode::Nav);

        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('c'));
        assert!(controller.state().active_filter().search_term.is_empty());
    }

    #[test]
    fn filter_key_cycles_status() {
        let (mut controller, mut source) = loaded();
        let mut view_data = ViewData::default();
        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('f'));
        assert_eq!(
            controller.state().active_filter().status_filter,
            StatusFilter::Active
        );
        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('f'));
        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('f'));
        assert_eq!(
            controller.state().active_filter().status_filter,
            StatusFilter::All
        );
    }

    #[test]
    fn tab_switches_type_and_resets_cursor() {
        let (mut controller, mut source) = loaded();
        let mut view_data = ViewData {
            cursor: 1,
            ..ViewData::default()
        };
        press(&mut controller, &mut source, &mut view_data, KeyCode::Tab);
        assert_eq!(controller.state().active_type(), AccountType::Group);
        assert_eq!(view_data.cursor, 0);
    }

    #[test]
    fn delete_requires_confirmation() {
        let (mut controller, mut source) = loaded();
        let mut view_data = ViewData::default();

        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('d'));
        assert!(view_data.pending_delete.is_some());
        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('n'));
        assert!(view_data.pending_delete.is_none());
        assert!(controller.host().commands.is_empty());

        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('d'));
        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('y'));
        assert_eq!(controller.host().commands.len(), 1);
        assert_eq!(controller.state().accounts().len(), 2);
        assert_eq!(view_data.status_line.as_deref(), Some("deleted Stage Right"));
    }

    #[test]
    fn toggle_reports_new_status() {
        let (mut controller, mut source) = loaded();
        let mut view_data = ViewData::default();
        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('j'));
        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('t'));
        assert_eq!(
            view_data.status_line.as_deref(),
            Some("Maverick Dental deactivated")
        );
    }

    #[test]
    fn add_flow_sends_highlighted_portal_and_arms_guard() {
        let (mut controller, mut source) = loaded();
        let mut view_data = ViewData::default();
        let (tx, rx) = mpsc::channel();

        for code in [KeyCode::Char('a'), KeyCode::Down, KeyCode::Enter] {
            handle_key_event(
                &mut controller,
                &mut source,
                &mut view_data,
                &tx,
                options(),
                key(code),
            );
        }
        let [HostCommand::AddAccount { portal, .. }] = controller.host().commands.as_slice()
        else {
            panic!("expected one add command");
        };
        assert_eq!(portal.display_name(), "Summit Press");
        assert!(controller.state().add_guard().in_flight);

        let released = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("guard release event");
        assert!(matches!(released, InternalEvent::ReleaseAddGuard { .. }));
        tx.send(released).expect("requeue");
        process_internal_events(&mut controller, &mut view_data, &rx);
        assert!(!controller.state().add_guard().in_flight);
    }

    #[test]
    fn stale_status_clear_is_ignored() {
        let (mut controller, _source) = loaded();
        let mut view_data = ViewData {
            status_line: Some("deleted".to_owned()),
            status_token: 3,
            ..ViewData::default()
        };
        let (tx, rx) = mpsc::channel();
        tx.send(InternalEvent::ClearStatus { token: 2 }).expect("send");
        process_internal_events(&mut controller, &mut view_data, &rx);
        assert!(view_data.status_line.is_some());

        tx.send(InternalEvent::ClearStatus { token: 3 }).expect("send");
        process_internal_events(&mut controller, &mut view_data, &rx);
        assert!(view_data.status_line.is_none());
    }

    #[test]
    fn reload_failure_keeps_state_and_reports() {
        let (mut controller, mut source) = loaded();
        source.fail = true;
        let mut view_data = ViewData::default();
        press(&mut controller, &mut source, &mut view_data, KeyCode::Char('r'));
        assert_eq!(controller.state().accounts().len(), 3);
        let status = view_data.status_line.expect("status");
        assert!(status.contains("payload file missing"), "got {status}");
    }

    #[test]
    fn cursor_helpers_stay_in_bounds() {
        assert_eq!(clamp_cursor(5, 0), 0);
        assert_eq!(clamp_cursor(5, 3), 2);
        assert_eq!(move_cursor(0, 3, -1), 0);
        assert_eq!(move_cursor(2, 3, 1), 2);
        assert_eq!(scroll_offset(3, 10), 0);
        assert_eq!(scroll_offset(12, 10), 3);
    }

    #[test]
    fn status_prefers_latest_message() {
        let events = vec![
            ListEvent::Loaded {
                accounts: 2,
                portals: 1,
            },
            ListEvent::AddIgnored,
        ];
        assert_eq!(
            status_for_events(&events).as_deref(),
            Some("add already in progress")
        );
        assert_eq!(status_for_events(&[ListEvent::AddGuardReleased]), None);
    }

    #[test]
    fn filter_bar_shows_counts() {
        let (controller, _source) = loaded();
        let text = filter_bar_text(controller.state(), &ViewData::default());
        assert!(text.contains("status: all"), "got {text}");
        assert!(text.contains("2 shown"), "got {text}");
    }

    #[test]
    fn status_text_falls_back_to_key_hints() {
        assert!(status_text(&ViewData::default()).contains("? help"));
        let searching = ViewData {
            mode: InputMode::Search,
            ..ViewData::default()
        };
        assert!(status_text(&searching).contains("type to search"));
    }

    #[test]
    fn help_overlay_lists_add_shortcuts() {
        let help = help_overlay_text();
        assert!(help.contains("a open portals"));
        assert!(help.contains("y confirms"));
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(70, 60, area);
        assert!(popup.width <= 70 && popup.height <= 24);
        assert!(popup.x >= 15 && popup.y >= 8);
    }
}
