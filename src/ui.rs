use anyhow::Result;
use banking_client::{
    BankApi, ClientError, CreateAccountField, CreationResponse, Customer, LookupField, Route,
    Shell, Ticket,
};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

/// Responses coming back from spawned requests
enum Completion {
    Created(Ticket, Result<CreationResponse, ClientError>),
    Fetched(Ticket, Result<Customer, ClientError>),
}

pub struct App {
    pub shell: Shell,
    pub focus: usize,
    pub scroll: u16,
    pub api_url: String,
    api: Arc<dyn BankApi>,
    runtime: Handle,
    completions_tx: Sender<Completion>,
    completions_rx: Receiver<Completion>,
}

impl App {
    pub fn new(api: Arc<dyn BankApi>, runtime: Handle, api_url: String, route: Route) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel();

        Self {
            shell: Shell::new(route),
            focus: 0,
            scroll: 0,
            api_url,
            api,
            runtime,
            completions_tx,
            completions_rx,
        }
    }

    fn field_count(&self) -> usize {
        match self.shell.route() {
            Route::CreateCurrentAccount => CreateAccountField::ALL.len(),
            Route::GetCustomer => LookupField::ALL.len(),
        }
    }

    pub fn next_page(&mut self) {
        self.shell.next_route();
        self.focus = 0;
        self.scroll = 0;
    }

    pub fn previous_page(&mut self) {
        self.shell.previous_route();
        self.focus = 0;
        self.scroll = 0;
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.field_count();
    }

    pub fn previous_field(&mut self) {
        let count = self.field_count();
        self.focus = (self.focus + count - 1) % count;
    }

    /// Applies `edit` to the focused field's text
    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        match self.shell.route() {
            Route::CreateCurrentAccount => {
                let field = CreateAccountField::ALL[self.focus];
                let mut value = self.shell.create_account.value(field).to_string();
                edit(&mut value);
                self.shell.create_account.on_change(field, value);
            }
            Route::GetCustomer => {
                let field = LookupField::ALL[self.focus];
                let mut value = self.shell.customer_lookup.value(field).to_string();
                edit(&mut value);
                self.shell.customer_lookup.on_change(field, value);
            }
        }
    }

    pub fn type_char(&mut self, c: char) {
        self.edit_focused(|value| value.push(c));
    }

    pub fn backspace(&mut self) {
        self.edit_focused(|value| {
            value.pop();
        });
    }

    /// Submits the current form; the response arrives later through the channel.
    pub fn submit(&mut self) {
        let api = Arc::clone(&self.api);
        let tx = self.completions_tx.clone();
        self.scroll = 0;

        match self.shell.route() {
            Route::CreateCurrentAccount => {
                if let Some((ticket, request)) = self.shell.create_account.submit() {
                    self.runtime.spawn(async move {
                        let result = api.create_current_account(&request).await;
                        if tx.send(Completion::Created(ticket, result)).is_err() {
                            debug!("UI closed before account creation finished");
                        }
                    });
                }
            }
            Route::GetCustomer => {
                if let Some((ticket, id)) = self.shell.customer_lookup.submit() {
                    self.runtime.spawn(async move {
                        let result = api.get_customer_by_id(&id).await;
                        if tx.send(Completion::Fetched(ticket, result)).is_err() {
                            debug!("UI closed before customer lookup finished");
                        }
                    });
                }
            }
        }
    }

    /// Applies every response that has arrived; returns how many there were.
    pub fn drain_completions(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            drained += 1;
            match completion {
                Completion::Created(ticket, result) => {
                    self.shell.create_account.complete(ticket, result);
                }
                Completion::Fetched(ticket, result) => {
                    self.shell.customer_lookup.complete(ticket, result);
                }
            }
        }
        drained
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(10);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(10);
    }

    fn result_lines(&self) -> Vec<String> {
        match self.shell.route() {
            Route::CreateCurrentAccount => self.shell.create_account.render_lines(),
            Route::GetCustomer => self.shell.customer_lookup.render_lines(),
        }
    }

    fn state_label(&self) -> &'static str {
        match self.shell.route() {
            Route::CreateCurrentAccount => self.shell.create_account.state().label(),
            Route::GetCustomer => self.shell.customer_lookup.state().label(),
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.drain_completions();
        terminal.draw(|f| ui(f, app))?;

        // Poll so responses get drawn without waiting for a keypress
        if !event::poll(Duration::from_millis(100))? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                KeyCode::Tab => app.next_page(),
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Down => app.next_field(),
                KeyCode::Up => app.previous_field(),
                KeyCode::Enter => app.submit(),
                KeyCode::Backspace => app.backspace(),
                KeyCode::PageDown => app.scroll_down(),
                KeyCode::PageUp => app.scroll_up(),
                KeyCode::Char(c) => app.type_char(c),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let form_height = (app.field_count() as u16) * 3 + 2;
    let content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(form_height), Constraint::Min(0)])
        .split(chunks[1]);

    render_form(f, content_chunks[0], app);
    render_result(f, content_chunks[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![Span::styled(
        "Banking Client  ",
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )];

    for (i, route) in Route::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *route == app.shell.route() {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(route.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        app.shell.route().path(),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let route = app.shell.route();
    let fields: Vec<(&str, &str, &str)> = match route {
        Route::CreateCurrentAccount => CreateAccountField::ALL
            .iter()
            .map(|field| {
                (
                    field.label(),
                    field.placeholder(),
                    app.shell.create_account.value(*field),
                )
            })
            .collect(),
        Route::GetCustomer => LookupField::ALL
            .iter()
            .map(|field| {
                (
                    field.label(),
                    field.placeholder(),
                    app.shell.customer_lookup.value(*field),
                )
            })
            .collect(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", route.heading()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); fields.len()])
        .split(inner);

    for (i, (label, placeholder, value)) in fields.into_iter().enumerate() {
        let focused = i == app.focus;
        let border = if focused { Color::Yellow } else { Color::DarkGray };

        let text = if value.is_empty() {
            Span::styled(placeholder, Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        } else {
            Span::raw(value)
        };

        let mut spans = vec![text];
        if focused {
            spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
        }

        let input = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" {}: ", label)),
        );
        f.render_widget(input, rows[i]);
    }
}

fn render_result(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .result_lines()
        .into_iter()
        .map(|line| {
            let color = if line.starts_with("Error:") {
                Color::Red
            } else if line == banking_client::SUCCESS_MESSAGE {
                Color::Green
            } else if line.ends_with("...") {
                Color::DarkGray
            } else {
                Color::White
            };
            Line::from(Span::styled(line, Style::default().fg(color)))
        })
        .collect();

    let result = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Result "),
        );

    f.render_widget(result, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![Span::styled(
        format!(" {} ", app.state_label()),
        Style::default().fg(Color::Cyan),
    )];

    if app.shell.route() == Route::CreateCurrentAccount {
        if let Some(rejection) = app.shell.create_account.last_rejection() {
            status_spans.push(Span::raw(" | "));
            status_spans.push(Span::styled(
                format!("Rejected ({})", rejection.status),
                Style::default().fg(Color::Red),
            ));
        }
    }

    if app.shell.route() == Route::GetCustomer && app.shell.customer_lookup.is_loading() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled("waiting for API", Style::default().fg(Color::DarkGray)));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Submit | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Field | "));
    status_spans.push(Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Scroll | "));
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit | "));
    status_spans.push(Span::styled(&app.api_url, Style::default().fg(Color::DarkGray)));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}
