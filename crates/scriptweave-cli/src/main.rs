use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use scriptweave_config::Config;
use scriptweave_engine::{
    LineRecord, OutlineKind, Screenplay, io,
    outline::OutlineRecord,
    pagination::{
        CancellationToken, ExportSettings, Finished, MonospaceStylesheet, PaginationWorker, paginate,
    },
};
use serde::Serialize;
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    sync::Arc,
    time::Duration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Json,
    Pages,
}

struct Args {
    mode: Mode,
    path: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut mode = Mode::Browse;
    let mut path = None;
    for arg in args {
        match arg.as_str() {
            "--json" => mode = Mode::Json,
            "--pages" => mode = Mode::Pages,
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            file if path.is_none() => path = Some(PathBuf::from(file)),
            extra => return Err(format!("unexpected argument {extra}")),
        }
    }
    Ok(Args { mode, path })
}

struct App {
    path: PathBuf,
    document: Screenplay,
    settings: ExportSettings,
    worker: PaginationWorker,
    pages: Option<Finished>,
    outline_state: ListState,
    page: usize,
    status: String,
}

impl App {
    fn new(path: PathBuf, document: Screenplay, config: &Config) -> Result<Self> {
        let worker = PaginationWorker::spawn(Arc::new(config.stylesheet()))?;
        let mut app = Self {
            path,
            document,
            settings: config.export.clone(),
            worker,
            pages: None,
            outline_state: ListState::default(),
            page: 0,
            status: String::new(),
        };
        if !app.document.outline().is_empty() {
            app.outline_state.select(Some(0));
        }
        app.submit();
        Ok(app)
    }

    fn submit(&mut self) {
        let generation = self
            .worker
            .submit(self.document.snapshot(), self.settings.clone());
        self.status = format!("paginating (generation {generation})");
    }

    fn reload(&mut self) {
        match io::read_document(&self.path) {
            Ok(document) => {
                info!("reloaded {}", self.path.display());
                self.document = document;
                let len = self.document.outline().len();
                if self.outline_state.selected().is_some_and(|i| i >= len) {
                    self.outline_state.select(len.checked_sub(1));
                }
                self.submit();
            }
            Err(e) => self.status = format!("Error reading file: {e}"),
        }
    }

    /// Picks up a finished pagination run, if any.
    fn poll_pages(&mut self) {
        let Some(finished) = self.worker.latest() else {
            return;
        };
        if self.pages.as_ref().map(|p| p.generation) == Some(finished.generation) {
            return;
        }
        self.status = format!("{} pages", finished.result.pages.len());
        self.page = self.page.min(finished.result.pages.len().saturating_sub(1));
        self.pages = Some(finished);
    }

    fn next_element(&mut self) {
        let len = self.document.outline().len();
        if len == 0 {
            return;
        }
        let i = match self.outline_state.selected() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.outline_state.select(Some(i));
        self.show_selected_page();
    }

    fn previous_element(&mut self) {
        let len = self.document.outline().len();
        if len == 0 {
            return;
        }
        let i = match self.outline_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.outline_state.select(Some(i));
        self.show_selected_page();
    }

    /// Turns to the page the selected element starts on.
    fn show_selected_page(&mut self) {
        let Some(element) = self
            .outline_state
            .selected()
            .and_then(|i| self.document.outline().elements().get(i))
        else {
            return;
        };
        let position = element.position;
        if let Some(pages) = &self.pages {
            if let Some(n) = pages.result.pages.iter().position(|p| p.range.contains(&position)) {
                self.page = n;
            }
        }
    }

    fn next_page(&mut self) {
        let count = self.pages.as_ref().map_or(0, |p| p.result.pages.len());
        if self.page + 1 < count {
            self.page += 1;
        }
    }

    fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    fn outline_items(&self) -> Vec<ListItem<'static>> {
        self.document
            .outline()
            .elements()
            .iter()
            .map(|element| {
                let indent = "  ".repeat(element.depth.saturating_sub(1));
                let label = match (element.kind, &element.scene_number) {
                    (OutlineKind::Section, _) => format!("{indent}# {}", element.string),
                    (OutlineKind::Heading, Some(number)) => {
                        format!("{indent}{number}. {}", element.string)
                    }
                    (OutlineKind::Heading, None) => format!("{indent}{}", element.string),
                };
                let style = match element.color.as_deref() {
                    Some(color) => Style::default().fg(terminal_color(color)),
                    None => Style::default(),
                };
                ListItem::new(Line::from(Span::styled(label, style)))
            })
            .collect()
    }

    fn page_lines(&self) -> (String, Vec<Line<'static>>) {
        let Some(finished) = &self.pages else {
            return ("Page".to_string(), vec![Line::from("Paginating...")]);
        };
        let Some(page) = finished.result.pages.get(self.page) else {
            return ("Page".to_string(), vec![Line::from("Nothing to print")]);
        };
        let title = format!(
            "Page {}/{} ({}/{} rows, {:?})",
            page.number,
            finished.result.pages.len(),
            page.used_height,
            page.max_height,
            page.break_reason
        );
        let lines = page.text().lines().map(|l| Line::from(l.to_string())).collect();
        (title, lines)
    }
}

fn terminal_color(name: &str) -> Color {
    match name {
        "red" => Color::Red,
        "blue" => Color::Blue,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "cyan" => Color::Cyan,
        "magenta" | "pink" | "purple" => Color::Magenta,
        "gray" | "grey" => Color::Gray,
        _ => Color::Reset,
    }
}

#[derive(Serialize)]
struct JsonExport {
    lines: Vec<LineRecord>,
    outline: Vec<OutlineRecord>,
}

fn print_json(document: &Screenplay) -> Result<()> {
    let export = JsonExport {
        lines: document
            .lines()
            .iter()
            .enumerate()
            .map(|(i, line)| line.to_serializable(i))
            .collect(),
        outline: document.outline().to_serializable(),
    };
    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}

fn print_pages(document: &Screenplay, config: &Config) {
    let stylesheet: MonospaceStylesheet = config.stylesheet();
    let result = paginate(
        document.lines(),
        &config.export,
        &stylesheet,
        &CancellationToken::new(),
    );
    for page in &result.pages {
        println!(
            "--- page {} ({}/{} rows, {:?}) ---",
            page.number, page.used_height, page.max_height, page.break_reason
        );
        println!("{}", page.text());
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let cli = match parse_args(&args[1..]) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {} [--json | --pages] [script.fountain]", args[0]);
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let Some(path) = cli.path.or_else(|| config.script_path.clone()) else {
        eprintln!("Error: No screenplay given and no script_path in the config file");
        eprintln!("Usage: {} [--json | --pages] [script.fountain]", args[0]);
        eprintln!("Or set script_path in {}", config_path.display());
        process::exit(1);
    };

    let document = io::read_document(&path)
        .with_context(|| format!("Failed to open screenplay '{}'", path.display()))?;

    match cli.mode {
        Mode::Json => return print_json(&document),
        Mode::Pages => {
            print_pages(&document, &config);
            return Ok(());
        }
        Mode::Browse => {}
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = App::new(path, document, &config).and_then(|mut app| run_app(&mut terminal, &mut app));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.poll_pages();
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_element(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_element(),
                KeyCode::Right | KeyCode::PageDown | KeyCode::Char('n') => app.next_page(),
                KeyCode::Left | KeyCode::PageUp | KeyCode::Char('p') => app.previous_page(),
                KeyCode::Char('r') => app.reload(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(rows[0]);

    // Outline panel
    let outline = List::new(app.outline_items())
        .block(Block::default().borders(Borders::ALL).title("Outline"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(outline, chunks[0], &mut app.outline_state);

    // Page panel
    let (title, lines) = app.page_lines();
    let page = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(page, chunks[1]);

    let help = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k ↓/j: Outline | "),
        Span::raw("←/p →/n: Page | "),
        Span::raw("r: Reload | "),
        Span::raw(app.status.clone()),
    ]);
    f.render_widget(Paragraph::new(help), rows[1]);
}
