// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use coconut_app::{
    AppCommand, AppEvent, AppState, ApplicationContext, FallbackPolicy, FetchError, FetchTicket,
    LOADING_MESSAGE, ListingFetcher, ListingState, LoginCredentials, LoginError, LoginField,
    LoginForm, MonitoringPanel, Notification, OFFERING_COLUMNS, OfferingPage, OfferingViewModel,
    Pagination, Screen, Session, SessionToken, SignIn,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

const NO_OFFERINGS_MESSAGE: &str = "진행 중인 청약이 없습니다.";
const NO_MATCHES_MESSAGE: &str = "검색 결과가 없습니다.";
const NOTHING_SELECTED_MESSAGE: &str = "선택된 청약이 없습니다.";
const LOGIN_PENDING_MESSAGE: &str = "로그인 중...";

pub trait AppRuntime {
    fn fetch_offerings(&mut self, page: u32) -> Result<OfferingPage, FetchError>;
    /// Runs the fetch off the UI thread and reports back over `tx`. The
    /// default runs inline, which is what tests want.
    fn spawn_fetch(&mut self, ticket: FetchTicket, tx: Sender<InternalEvent>) -> Result<()> {
        let result = self.fetch_offerings(ticket.page());
        tx.send(InternalEvent::Fetched { ticket, result })
            .map_err(|_| anyhow!("fetch event channel closed"))?;
        Ok(())
    }
    fn sign_in(&mut self, credentials: &LoginCredentials) -> Result<SignIn, LoginError>;
    /// Same contract as `spawn_fetch`: the outcome arrives as
    /// `InternalEvent::LoggedIn` tagged with `attempt`.
    fn spawn_sign_in(
        &mut self,
        attempt: u64,
        credentials: LoginCredentials,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self.sign_in(&credentials);
        tx.send(InternalEvent::LoggedIn { attempt, result })
            .map_err(|_| anyhow!("login event channel closed"))?;
        Ok(())
    }
    fn store_token(&mut self, token: &SessionToken) -> Result<()>;
    fn clear_token(&mut self) -> Result<()>;
    fn oauth_url(&self) -> String;
    fn monitoring_panel(&self) -> MonitoringPanel;
    fn fallback_policy(&self) -> FallbackPolicy;
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    Fetched {
        ticket: FetchTicket,
        result: Result<OfferingPage, FetchError>,
    },
    LoggedIn {
        attempt: u64,
        result: Result<SignIn, LoginError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Nav,
    Search,
}

#[derive(Debug, Clone, PartialEq)]
struct ViewData {
    fetcher: ListingFetcher,
    input: InputMode,
    selected_row: usize,
    login: LoginForm,
    oauth_url: String,
    monitoring: MonitoringPanel,
    help_visible: bool,
    status_token: u64,
    login_attempt: u64,
    pending_login: Option<u64>,
}

impl ViewData {
    fn new<R: AppRuntime>(runtime: &R) -> Self {
        Self {
            fetcher: ListingFetcher::new(runtime.fallback_policy()),
            input: InputMode::Nav,
            selected_row: 0,
            login: LoginForm::default(),
            oauth_url: runtime.oauth_url(),
            monitoring: runtime.monitoring_panel(),
            help_visible: false,
            status_token: 0,
            login_attempt: 0,
            pending_login: None,
        }
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(&*runtime);
    let (internal_tx, internal_rx) = mpsc::channel();

    start_fetch(
        runtime,
        &mut view_data,
        &internal_tx,
        state.pagination.current_page(),
    );

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Fetched { ticket, result } => {
                let total_pages = result.as_ref().ok().map(|page| page.total_pages);
                if !view_data.fetcher.complete(ticket, result) {
                    continue;
                }
                clamp_selection(state, view_data);
                if let Some(total_pages) = total_pages {
                    dispatch_and_follow(
                        state,
                        runtime,
                        view_data,
                        tx,
                        AppCommand::SetTotalPages(total_pages),
                    );
                }
            }
            InternalEvent::LoggedIn { attempt, result } => {
                if view_data.pending_login != Some(attempt) {
                    debug!(attempt, "ignoring abandoned login");
                    continue;
                }
                view_data.pending_login = None;
                finish_login(state, runtime, view_data, tx, result);
            }
        }
    }
}

fn start_fetch<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    page: u32,
) {
    let ticket = view_data.fetcher.begin(page);
    view_data.selected_row = 0;
    if let Err(error) = runtime.spawn_fetch(ticket, tx.clone()) {
        warn!(page, error = %format!("{error:#}"), "could not start offerings fetch");
        view_data
            .fetcher
            .complete(ticket, Err(FetchError::Transport(error.to_string())));
    }
}

/// Dispatches `command` and reacts to the events it produced. A page change
/// is the only thing that triggers a fetch.
fn dispatch_and_follow<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    for event in state.dispatch(command) {
        match event {
            AppEvent::PageChanged(page) => start_fetch(runtime, view_data, tx, page),
            AppEvent::SearchChanged => {
                view_data.selected_row = 0;
                clamp_selection(state, view_data);
            }
            AppEvent::ScreenChanged(Screen::Login) => view_data.login.clear(),
            _ => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return true;
    }

    // Notifications block everything until acknowledged.
    if state.notification.is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            state.dispatch(AppCommand::DismissNotification);
        }
        return false;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    match state.screen {
        Screen::Listing if view_data.input == InputMode::Search => {
            handle_search_key(state, runtime, view_data, internal_tx, key);
            false
        }
        Screen::Listing => handle_listing_key(state, runtime, view_data, internal_tx, key),
        Screen::Login => {
            handle_login_key(state, runtime, view_data, internal_tx, key);
            false
        }
        Screen::Apply | Screen::Monitoring => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                dispatch_and_follow(
                    state,
                    runtime,
                    view_data,
                    internal_tx,
                    AppCommand::ShowScreen(Screen::Listing),
                );
            } else if key.code == KeyCode::Char('?') {
                view_data.help_visible = true;
            }
            false
        }
    }
}

fn handle_search_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Esc => {
            view_data.input = InputMode::Nav;
            AppCommand::ClearSearch
        }
        KeyCode::Enter => {
            view_data.input = InputMode::Nav;
            return;
        }
        KeyCode::Tab => AppCommand::ToggleSearchField,
        KeyCode::Backspace => AppCommand::PopSearchChar,
        KeyCode::Char(ch) => AppCommand::PushSearchChar(ch),
        _ => return,
    };
    dispatch_and_follow(state, runtime, view_data, tx, command);
}

fn handle_listing_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let command = match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => {
            view_data.input = InputMode::Search;
            return false;
        }
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            return false;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            view_data.selected_row = view_data.selected_row.saturating_add(1);
            clamp_selection(state, view_data);
            return false;
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.selected_row = view_data.selected_row.saturating_sub(1);
            return false;
        }
        KeyCode::Char('r') => {
            let page = state.pagination.current_page();
            start_fetch(runtime, view_data, tx, page);
            emit_status(state, view_data, tx, format!("{page} 페이지를 새로 불러옵니다."));
            return false;
        }
        KeyCode::Enter | KeyCode::Char('a') => {
            apply_selected(state, runtime, view_data, tx);
            return false;
        }
        KeyCode::Char('O') => {
            sign_out(state, runtime, view_data, tx);
            return false;
        }
        KeyCode::Char(ch @ '1'..='9') => {
            let index = ch.to_digit(10).map_or(0, |digit| digit as usize - 1);
            let Some(button) = state.pagination.window().get(index).copied() else {
                return false;
            };
            AppCommand::SelectPage(button.page)
        }
        KeyCode::Char('h') | KeyCode::Left => AppCommand::PrevPage,
        KeyCode::Char('l') | KeyCode::Right => AppCommand::NextPage,
        KeyCode::Tab => AppCommand::ToggleSearchField,
        KeyCode::Char('L') => AppCommand::ShowScreen(Screen::Login),
        KeyCode::Char('M') => AppCommand::ShowScreen(Screen::Monitoring),
        KeyCode::Esc => AppCommand::ClearSearch,
        _ => return false,
    };
    dispatch_and_follow(state, runtime, view_data, tx, command);
    false
}

fn handle_login_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if view_data.pending_login.is_some() && key.code != KeyCode::Esc {
        return;
    }
    match key.code {
        KeyCode::Esc => {
            view_data.pending_login = None;
            view_data.login.clear();
            dispatch_and_follow(
                state,
                runtime,
                view_data,
                tx,
                AppCommand::ShowScreen(Screen::Listing),
            );
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            view_data.login.toggle_focus();
        }
        KeyCode::Enter => submit_login(state, runtime, view_data, tx),
        KeyCode::Backspace => view_data.login.pop_char(),
        KeyCode::Char(ch) => view_data.login.push_char(ch),
        _ => {}
    }
}

fn submit_login<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let credentials = match view_data.login.validate() {
        Ok(credentials) => credentials,
        Err(error) => {
            state.dispatch(AppCommand::Notify(Notification::new(
                "로그인",
                error.to_string(),
            )));
            return;
        }
    };

    view_data.login_attempt = view_data.login_attempt.saturating_add(1);
    let attempt = view_data.login_attempt;
    view_data.pending_login = Some(attempt);
    info!(id = %credentials.id, attempt, "submitting login");
    if let Err(error) = runtime.spawn_sign_in(attempt, credentials, tx.clone()) {
        warn!(error = %format!("{error:#}"), "could not start login");
        view_data.pending_login = None;
        finish_login(
            state,
            runtime,
            view_data,
            tx,
            Err(LoginError::Transport(error.to_string())),
        );
    }
}

fn finish_login<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    result: Result<SignIn, LoginError>,
) {
    let SignIn { token, username } = match result {
        Ok(signed_in) => signed_in,
        Err(error) => {
            warn!(%error, "login failed");
            view_data.login.password.clear();
            state.dispatch(AppCommand::Notify(Notification::new(
                "로그인 실패",
                error.user_message(),
            )));
            return;
        }
    };

    if let Err(error) = runtime.store_token(&token) {
        warn!(error = %format!("{error:#}"), "could not persist session token");
        emit_status(state, view_data, tx, format!("세션 저장 실패: {error:#}"));
    }
    info!(user = %username, "signed in");

    let session = Session::from_token(Some(token), OffsetDateTime::now_utc());
    view_data.login.clear();
    dispatch_and_follow(
        state,
        runtime,
        view_data,
        tx,
        AppCommand::SignedIn { session, username },
    );
}

fn sign_out<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    if let Err(error) = runtime.clear_token() {
        emit_status(state, view_data, tx, format!("세션 삭제 실패: {error:#}"));
        return;
    }
    dispatch_and_follow(state, runtime, view_data, tx, AppCommand::SignOut);
}

fn apply_selected<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let selected = visible_rows(state, view_data)
        .get(view_data.selected_row)
        .map(|offering| (*offering).clone());
    let Some(offering) = selected else {
        emit_status(state, view_data, tx, NOTHING_SELECTED_MESSAGE);
        return;
    };
    dispatch_and_follow(
        state,
        runtime,
        view_data,
        tx,
        AppCommand::Apply {
            offering,
            now: OffsetDateTime::now_utc(),
        },
    );
}

fn visible_rows<'a>(state: &AppState, view_data: &'a ViewData) -> Vec<&'a OfferingViewModel> {
    state.search.apply(view_data.fetcher.visible_items())
}

fn clamp_selection(state: &AppState, view_data: &mut ViewData) {
    let len = visible_rows(state, view_data).len();
    view_data.selected_row = view_data.selected_row.min(len.saturating_sub(1));
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let selected = Screen::ALL
        .iter()
        .position(|screen| *screen == state.screen)
        .unwrap_or(0);
    let titles = Screen::ALL
        .iter()
        .map(|screen| screen.label())
        .collect::<Vec<&str>>();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(format!("coconut | {}", state.session.label()))
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.screen {
        Screen::Listing => render_listing(frame, layout[1], state, view_data),
        Screen::Login => {
            let body = Paragraph::new(render_login_text(
                &view_data.login,
                &view_data.oauth_url,
                view_data.pending_login.is_some(),
            ))
                .block(Block::default().borders(Borders::ALL).title("로그인"));
            frame.render_widget(body, layout[1]);
        }
        Screen::Apply => {
            let text = state
                .application
                .as_ref()
                .map(render_application_text)
                .unwrap_or_else(|| NOTHING_SELECTED_MESSAGE.to_owned());
            let body = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL).title("청약 신청"));
            frame.render_widget(body, layout[1]);
        }
        Screen::Monitoring => {
            let body = Paragraph::new(render_monitoring_text(&view_data.monitoring))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title("시스템 모니터링"));
            frame.render_widget(body, layout[1]);
        }
    }

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("도움말").borders(Borders::ALL));
        frame.render_widget(help, area);
    }

    if let Some(notification) = &state.notification {
        let area = centered_rect(50, 25, frame.area());
        frame.render_widget(Clear, area);
        let modal = Paragraph::new(format!("{}\n\n[enter] 확인", notification.body))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(notification.title.as_str())
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(modal, area);
    }
}

fn render_listing(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    let search_style = if view_data.input == InputMode::Search {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let search = Paragraph::new(search_bar_text(state, view_data)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("검색 ({})", state.search.field.label()))
            .style(search_style),
    );
    frame.render_widget(search, layout[0]);

    let banner = Paragraph::new(listing_banner(state, view_data))
        .style(Style::default().fg(Color::Red));
    frame.render_widget(banner, layout[1]);

    let rows = visible_rows(state, view_data)
        .into_iter()
        .enumerate()
        .map(|(index, offering)| {
            let style = if index == view_data.selected_row {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Row::new(offering.columns().map(Cell::from)).style(style)
        })
        .collect::<Vec<_>>();
    let header = Row::new(OFFERING_COLUMNS.map(Cell::from)).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let widths = [
        Constraint::Length(12),
        Constraint::Min(16),
        Constraint::Length(14),
        Constraint::Length(25),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("공모주 청약"));
    frame.render_widget(table, layout[2]);

    let pagination = Paragraph::new(pagination_text(&state.pagination));
    frame.render_widget(pagination, layout[3]);
}

fn search_bar_text(state: &AppState, view_data: &ViewData) -> String {
    let cursor = if view_data.input == InputMode::Search {
        "▌"
    } else {
        ""
    };
    if state.search.term.is_empty() && cursor.is_empty() {
        return format!("{}(으)로 검색하려면 / 를 누르세요", state.search.field.label());
    }
    format!("{}{cursor}", state.search.term)
}

/// The one-line message above the table: loading, failure, or empty result.
fn listing_banner(state: &AppState, view_data: &ViewData) -> String {
    match view_data.fetcher.state() {
        ListingState::Loading => LOADING_MESSAGE.to_owned(),
        ListingState::Failed { message, .. } => (*message).to_owned(),
        ListingState::Loaded { items, .. } if items.is_empty() => NO_OFFERINGS_MESSAGE.to_owned(),
        ListingState::Loaded { .. } if visible_rows(state, view_data).is_empty() => {
            NO_MATCHES_MESSAGE.to_owned()
        }
        ListingState::Loaded { .. } => String::new(),
    }
}

fn pagination_text(pagination: &Pagination) -> String {
    let mut parts = Vec::new();
    if pagination.has_prev() {
        parts.push("<".to_owned());
    }
    for button in pagination.window() {
        if button.active {
            parts.push(format!("[{}]", button.page));
        } else {
            parts.push(button.page.to_string());
        }
    }
    if pagination.has_next() {
        parts.push(">".to_owned());
    }
    parts.join(" ")
}

fn render_login_text(form: &LoginForm, oauth_url: &str, pending: bool) -> String {
    let marker = |field: LoginField| if form.focus == field { ">" } else { " " };
    let submit = if pending {
        LOGIN_PENDING_MESSAGE.to_owned()
    } else {
        "[enter] 로그인 | [tab] 입력칸 이동 | [esc] 취소".to_owned()
    };
    [
        format!("{} 아이디:   {}", marker(LoginField::Id), form.id),
        format!(
            "{} 비밀번호: {}",
            marker(LoginField::Password),
            form.masked_password()
        ),
        String::new(),
        submit,
        String::new(),
        "Google 계정으로 로그인하려면 브라우저에서 여세요:".to_owned(),
        oauth_url.to_owned(),
    ]
    .join("\n")
}

fn render_application_text(context: &ApplicationContext) -> String {
    let offering = &context.offering;
    let mut lines = OFFERING_COLUMNS
        .iter()
        .zip(offering.columns())
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>();
    lines.push(String::new());
    lines.push(format!("경쟁률: {}", context.competition_rate));
    lines.push(format!("공모주식수: {}", context.public_offering_volume));
    lines.push(format!("균등배정물량: {}", context.equal_distribution_volume));
    lines.push(format!("청약건수: {}", context.subscription_count));
    lines.join("\n")
}

fn render_monitoring_text(panel: &MonitoringPanel) -> String {
    if !panel.is_configured() {
        return "대시보드 주소가 없습니다. 설정 파일의 [dashboard] url 을 지정하세요.".to_owned();
    }
    format!(
        "대시보드: {}\nsandbox: {}\n\n브라우저에서 위 주소를 여세요.",
        panel.url,
        panel.sandbox_attribute()
    )
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let hints = match (state.screen, view_data.input) {
        (Screen::Listing, InputMode::Search) => "입력 검색어 | tab 검색기준 | enter 완료 | esc 지우기",
        (Screen::Listing, InputMode::Nav) => {
            "/ 검색 | j/k 이동 | h/l 1-9 페이지 | enter 청약 | r 새로고침 | L 로그인 | O 로그아웃 | M 모니터링 | ? | q"
        }
        (Screen::Login, _) if view_data.pending_login.is_some() => "esc 취소",
        (Screen::Login, _) => "enter 로그인 | tab 이동 | esc 취소",
        (Screen::Apply | Screen::Monitoring, _) => "esc 목록으로 | ? 도움말",
    };
    match &state.status_line {
        Some(status) => format!("{status} | {hints}"),
        None => hints.to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q/ctrl+c 종료 | ? 도움말\n\
목록: j/k 행 이동 | h/l 또는 ←/→ 페이지 | 1-9 페이지 버튼 | r 새로고침\n\
목록: / 검색 | tab 기업명/대표주관회사 전환 | esc 검색어 지우기\n\
목록: enter/a 청약 신청 | L 로그인 | O 로그아웃 | M 모니터링 | q 종료\n\
로그인: tab 입력칸 이동 | enter 제출 | esc 취소\n\
알림: enter 확인"
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
