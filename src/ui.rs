use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mr_competitors::{report, Competitor, StatisticalSummary};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Competitors,
    Statistics,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Competitors => Page::Statistics,
            Page::Statistics => Page::Competitors,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Competitors => "Competitors",
            Page::Statistics => "Statistics",
        }
    }
}

pub struct App {
    pub competitors: Vec<Competitor>,
    pub summary: StatisticalSummary,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
}

impl App {
    pub fn new(competitors: Vec<Competitor>, summary: StatisticalSummary) -> Self {
        let mut state = TableState::default();
        if !competitors.is_empty() {
            state.select(Some(0));
        }

        Self {
            competitors,
            summary,
            state,
            current_page: Page::Competitors,
            show_detail: false,
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_competitor(&self) -> Option<&Competitor> {
        self.state.selected().and_then(|i| self.competitors.get(i))
    }

    /// Highest overall score first
    pub fn sort_by_overall(&mut self) {
        self.competitors
            .sort_by(|a, b| b.overall_score().total_cmp(&a.overall_score()));
        self.state.select(if self.competitors.is_empty() { None } else { Some(0) });
    }

    pub fn sort_by_id(&mut self) {
        self.competitors.sort_by_key(|c| c.id);
        self.state.select(if self.competitors.is_empty() { None } else { Some(0) });
    }

    pub fn next(&mut self) {
        let len = self.competitors.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.competitors.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(())
                }
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => app.current_page = app.current_page.next(),
                KeyCode::Char('s') => app.sort_by_overall(),
                KeyCode::Char('i') => app.sort_by_id(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Home => {
                    if !app.competitors.is_empty() {
                        app.state.select(Some(0));
                    }
                }
                KeyCode::End => {
                    if !app.competitors.is_empty() {
                        app.state.select(Some(app.competitors.len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Competitors if app.show_detail => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            render_table(f, content_chunks[0], app);
            render_detail_panel(f, content_chunks[1], app);
        }
        Page::Competitors => render_table(f, chunks[1], app),
        Page::Statistics => render_statistics(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];
    for (i, page) in [Page::Competitors, Page::Statistics].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(page.title(), style));
    }

    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Total: {}", app.summary.total),
        Style::default().fg(Color::White),
    ));

    if let Some(top) = &app.summary.top_performer {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            format!("Top: {} ({:.2})", top.name.initials(), top.overall_score()),
            Style::default().fg(Color::Green),
        ));
    }

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn belt_style(competitor: &Competitor) -> Style {
    use mr_competitors::BeltColor;

    let color = match competitor.belt_color {
        BeltColor::White => Color::White,
        BeltColor::Yellow => Color::Yellow,
        BeltColor::Blue => Color::Blue,
        BeltColor::Purple => Color::Magenta,
        BeltColor::Brown => Color::LightRed,
        BeltColor::Black => Color::DarkGray,
    };
    Style::default().fg(color)
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["ID", "Name", "Level", "Belt", "Scores", "Overall"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.competitors.iter().map(|c| {
        Row::new(vec![
            Cell::from(c.id.to_string()),
            Cell::from(c.name.full_name()),
            Cell::from(c.competition_level.clone()),
            Cell::from(c.belt_color.as_str()).style(belt_style(c)),
            Cell::from(format!("{:?}", c.scores)),
            Cell::from(format!("{:.2}", c.overall_score())).style(Style::default().fg(Color::Green)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(28),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(24),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Competitors "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Competitor Details ");

    let Some(c) = app.selected_competitor() else {
        f.render_widget(Paragraph::new("No competitor selected").block(block), area);
        return;
    };

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let field = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("  {}: ", name), label), Span::raw(value)])
    };

    let content = vec![
        Line::from(""),
        field("Competitor", c.id.to_string()),
        field("Name", c.name.full_name()),
        field("Initials", c.name.initials()),
        field("Gender", c.gender.to_string()),
        field("Level", c.competition_level.clone()),
        Line::from(vec![
            Span::styled("  Belt: ", label),
            Span::styled(c.belt_color.as_str(), belt_style(c)),
        ]),
        Line::from(""),
        field("Scores", format!("{:?}", c.scores)),
        Line::from(vec![
            Span::styled("  Overall: ", label),
            Span::styled(
                format!("{:.2}", c.overall_score()),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", c.short_details()),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )),
    ];

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn render_statistics(f: &mut Frame, area: Rect, app: &App) {
    let content: Vec<Line> = report::summary_lines(&app.summary)
        .into_iter()
        .map(|line| Line::from(format!("  {}", line)))
        .collect();

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Statistical Summary "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let key = Style::default().fg(Color::Yellow);

    let spans = vec![
        Span::styled(
            format!(" Row: {}/{} ", selected, app.competitors.len()),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(" | "),
        Span::styled("Enter", key),
        Span::raw(" Details | "),
        Span::styled("Tab", key),
        Span::raw(" Page | "),
        Span::styled("s", key),
        Span::raw("/"),
        Span::styled("i", key),
        Span::raw(" Sort score/id | "),
        Span::styled("q", key),
        Span::raw(" Quit"),
    ];

    let status = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(status, area);
}
