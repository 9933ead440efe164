use crate::api_client::{HttpShortenApi, LookupResponse, ShortenApi, ShortenRequest, ShortenResponse};
use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::config::config::DisplayConfig;
use crate::config::key_bindings::{action_for, key_hints, FormAction};
use crate::config::{ApiEndpoint, Config};
use crate::errors::ApiError;
use crate::shortener::{ShortenerClient, SubmitStart};
use crate::utils::logging::LogRingBuffer;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, info};
use tui_input::{backend::crossterm::EventHandler, Input};

const PLACEHOLDER: &str = "Paste your URL here";

/// How long the loop waits for a key before checking responses and timers
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Completed requests coming back from the runtime
enum ApiResponse {
    Shorten(Result<ShortenResponse, ApiError>),
    Lookup(Result<LookupResponse, ApiError>),
}

pub struct TuiApp<A: ShortenApi + 'static, C: ClipboardSink> {
    client: ShortenerClient<A, C>,
    input: Input,
    endpoint: ApiEndpoint,
    display: DisplayConfig,
    log_buffer: Option<LogRingBuffer>,
    runtime: Handle,
    response_tx: Sender<ApiResponse>,
    response_rx: Receiver<ApiResponse>,
    show_help: bool,
    show_logs: bool,
}

impl<A: ShortenApi + 'static, C: ClipboardSink> TuiApp<A, C> {
    pub fn new(
        client: ShortenerClient<A, C>,
        endpoint: ApiEndpoint,
        display: DisplayConfig,
        runtime: Handle,
    ) -> Self {
        let (tx, rx) = channel();
        Self {
            client,
            input: Input::default(),
            endpoint,
            display,
            log_buffer: None,
            runtime,
            response_tx: tx,
            response_rx: rx,
            show_help: false,
            show_logs: false,
        }
    }

    pub fn with_log_buffer(mut self, buffer: LogRingBuffer) -> Self {
        self.log_buffer = Some(buffer);
        self
    }

    pub fn client(&self) -> &ShortenerClient<A, C> {
        &self.client
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.process_responses();
            self.client.tick();

            terminal.draw(|f| self.ui(f))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key) {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Handle one key press; returns true when the app should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match action_for(&key) {
            Some(FormAction::Quit) => {
                if self.show_help {
                    self.show_help = false;
                } else {
                    return true;
                }
            }
            Some(FormAction::Submit) => self.submit(),
            Some(FormAction::CopyShortUrl) => self.client.copy_to_clipboard(),
            Some(FormAction::LookupShortUrl) => self.lookup(),
            Some(FormAction::ToggleHelp) => self.show_help = !self.show_help,
            Some(FormAction::ToggleLogs) => self.show_logs = !self.show_logs,
            None => {
                self.input.handle_event(&Event::Key(key));
                if self.input.value() != self.client.state().url {
                    self.client.on_url_change(self.input.value());
                }
            }
        }
        false
    }

    fn submit(&mut self) {
        match self.client.begin_submit() {
            SubmitStart::Dispatch(request) => self.dispatch_shorten(request),
            SubmitStart::Invalid => {}
            SubmitStart::Busy => debug!(target: "tui", "Enter ignored while shortening"),
        }
    }

    fn lookup(&mut self) {
        if let Some(short_id) = self.client.begin_lookup() {
            self.dispatch_lookup(short_id);
        }
    }

    /// Run the request on the runtime; the watcher task always reports back,
    /// even if the request task panics, so `loading` cannot get stuck.
    fn dispatch_shorten(&self, request: ShortenRequest) {
        let api = self.client.api();
        let tx = self.response_tx.clone();
        let task = self.runtime.spawn(async move { api.shorten(&request).await });
        self.runtime.spawn(async move {
            let result = task
                .await
                .unwrap_or_else(|e| Err(ApiError::transport(format!("request task failed: {e}"))));
            let _ = tx.send(ApiResponse::Shorten(result));
        });
    }

    fn dispatch_lookup(&self, short_id: String) {
        let api = self.client.api();
        let tx = self.response_tx.clone();
        let task = self.runtime.spawn(async move { api.lookup(&short_id).await });
        self.runtime.spawn(async move {
            let result = task
                .await
                .unwrap_or_else(|e| Err(ApiError::transport(format!("lookup task failed: {e}"))));
            let _ = tx.send(ApiResponse::Lookup(result));
        });
    }

    /// Apply every response that has arrived since the last frame
    pub fn process_responses(&mut self) {
        while let Ok(response) = self.response_rx.try_recv() {
            match response {
                ApiResponse::Shorten(result) => self.client.complete_submit(result),
                ApiResponse::Lookup(result) => self.client.complete_lookup(result),
            }
        }
    }

    fn ui(&self, f: &mut Frame) {
        let log_height = if self.show_logs { 8 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),          // Title
                Constraint::Length(3),          // URL input
                Constraint::Length(1),          // Submit button
                Constraint::Min(4),             // Result / error
                Constraint::Length(log_height), // Log panel
                Constraint::Length(1),          // Footer
            ])
            .split(f.area());

        let title = Paragraph::new(Line::from(Span::styled(
            self.display.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        f.render_widget(title, chunks[0]);

        self.render_input(f, chunks[1]);
        self.render_button(f, chunks[2]);
        self.render_outcome(f, chunks[3]);

        if self.show_logs {
            self.render_logs(f, chunks[4]);
        }

        if self.display.show_footer {
            let footer = Line::from(vec![
                Span::styled(" API: ", Style::default().fg(Color::Cyan)),
                Span::raw(self.endpoint.api_base.as_str()),
                Span::styled(
                    format!("  ({})", self.endpoint.base_url),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" | F1=Help | Esc=Exit"),
            ]);
            f.render_widget(
                Paragraph::new(footer).style(Style::default().bg(Color::Black)),
                chunks[5],
            );
        }

        if self.show_help {
            self.render_help_popup(f);
        }
    }

    fn render_input(&self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("URL");
        // Inner width excludes the two border columns
        let width = area.width.saturating_sub(2) as usize;
        let scroll = self.input.visual_scroll(width);
        let paragraph = if self.input.value().is_empty() {
            Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(self.input.value())
                .style(Style::default().fg(Color::Yellow))
                .scroll((0, u16::try_from(scroll).unwrap_or(u16::MAX)))
        };
        f.render_widget(paragraph.block(block), area);

        let offset = self.input.visual_cursor().saturating_sub(scroll).min(width);
        f.set_cursor_position((
            area.x.saturating_add(1).saturating_add(offset as u16),
            area.y.saturating_add(1),
        ));
    }

    fn render_button(&self, f: &mut Frame, area: Rect) {
        let (label, style) = if self.client.state().loading {
            ("[ Shortening... ]", Style::default().fg(Color::DarkGray))
        } else {
            (
                "[ Shorten ]",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )
        };
        f.render_widget(
            Paragraph::new(Span::styled(label, style)).alignment(Alignment::Center),
            area,
        );
    }

    fn render_outcome(&self, f: &mut Frame, area: Rect) {
        let state = self.client.state();
        let mut lines = Vec::new();

        if state.has_result() {
            lines.push(Line::from(vec![
                Span::raw(format!("{} ", self.display.success_marker())),
                Span::styled("Short URL: ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    state.short_url.as_str(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                ),
            ]));
            let copy_label = if state.copied { "[ Copied! ]" } else { "[ Copy ]" };
            lines.push(Line::from(vec![
                Span::styled(copy_label, Style::default().fg(Color::Green)),
                Span::styled("  Ctrl+Y", Style::default().fg(Color::DarkGray)),
            ]));

            if !state.resolved_url.is_empty() {
                lines.push(Line::from(format!("Resolves to: {}", state.resolved_url)));
            } else if !state.lookup_error.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("Lookup failed: {}", state.lookup_error),
                    Style::default().fg(Color::Red),
                )));
            } else if self.client.is_lookup_in_flight() {
                lines.push(Line::from("Looking up..."));
            }
        }

        if state.has_error() {
            lines.push(Line::from(Span::styled(
                format!("{} {}", self.display.error_marker(), state.error),
                Style::default().fg(Color::Red),
            )));
        }

        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
    }

    fn render_logs(&self, f: &mut Frame, area: Rect) {
        let visible = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = self
            .log_buffer
            .as_ref()
            .map(|buffer| buffer.get_recent(visible))
            .unwrap_or_default()
            .iter()
            .map(|entry| Line::from(entry.format_for_display()))
            .collect();

        let logs = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Logs (F5)"));
        f.render_widget(logs, area);
    }

    fn render_help_popup(&self, f: &mut Frame) {
        let area = centered_rect(60, 50, f.area());
        f.render_widget(Clear, area);

        let mut help_text = vec![
            Line::from(Span::styled(
                "Keys",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        help_text.extend(
            key_hints()
                .iter()
                .map(|(key, what)| Line::from(format!("  {:<14} {}", key, what))),
        );

        let help_popup = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .wrap(Wrap { trim: false });
        f.render_widget(help_popup, area);
    }
}

// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Build the real client from config and run the form until the user quits
pub fn run_tui_app(config: &Config, endpoint: ApiEndpoint, log_buffer: LogRingBuffer) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    let api = match config.server.request_timeout() {
        Some(timeout) => HttpShortenApi::with_timeout(&endpoint.base_url, timeout)?,
        None => HttpShortenApi::new(&endpoint.base_url),
    };
    info!(target: "tui", "Using {}", api.shorten_endpoint());

    let client = ShortenerClient::new(api, SystemClipboard::new());
    let mut app = TuiApp::new(client, endpoint, config.display.clone(), runtime.handle().clone())
        .with_log_buffer(log_buffer);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
