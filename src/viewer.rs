use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame, Terminal,
};
use std::collections::HashMap;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::{debug, warn};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::bookmarks::BookmarkStore;
use crate::feed::{ArticleFeed, PageLoad};
use crate::history::SearchHistory;
use crate::models::{Article, Category};
use crate::summary::Summarizer;

const TICK: Duration = Duration::from_millis(100);

/// Results delivered by background tasks to the UI thread.
#[derive(Debug)]
pub enum TaskEvent {
    PageLoaded(PageLoad),
    Summary { url: String, summary: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryState {
    Pending,
    Ready(String),
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Detail,
    Bookmarks,
}

/// State of the interactive browser. Network work runs on the tokio runtime
/// behind `handle`; results come back through `events` and are applied on the
/// UI thread, so the feed itself is only ever touched from here.
pub struct BrowserApp {
    feed: ArticleFeed,
    bookmarks: BookmarkStore,
    history: SearchHistory,
    summarizer: Arc<Summarizer>,
    handle: Handle,
    tx: Sender<TaskEvent>,
    events: Receiver<TaskEvent>,

    category: Category,
    search_term: String,
    screen: Screen,
    detail_from: Screen,
    detail: Option<Article>,
    detail_scroll: u16,
    selected: usize,
    bookmark_selected: usize,
    /// Text being typed into the search box, if it is open.
    input: Option<String>,
    pending_delete: bool,
    summaries: HashMap<String, SummaryState>,
    should_quit: bool,
}

impl BrowserApp {
    pub fn new(
        feed: ArticleFeed,
        bookmarks: BookmarkStore,
        history: SearchHistory,
        summarizer: Arc<Summarizer>,
        handle: Handle,
    ) -> Self {
        let (tx, events) = mpsc::channel();
        Self {
            feed,
            bookmarks,
            history,
            summarizer,
            handle,
            tx,
            events,
            category: Category::All,
            search_term: String::new(),
            screen: Screen::Home,
            detail_from: Screen::Home,
            detail: None,
            detail_scroll: 0,
            selected: 0,
            bookmark_selected: 0,
            input: None,
            pending_delete: false,
            summaries: HashMap::new(),
            should_quit: false,
        }
    }

    pub fn feed(&self) -> &ArticleFeed {
        &self.feed
    }

    pub fn bookmarks(&self) -> &BookmarkStore {
        &self.bookmarks
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn summary(&self, url: &str) -> Option<&SummaryState> {
        self.summaries.get(url)
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Starts a fresh epoch for the given filter and kicks off page 1.
    pub fn apply_query(&mut self, category: Category, search_term: &str) {
        self.category = category;
        self.search_term = search_term.trim().to_string();
        self.selected = 0;
        self.feed.reset_epoch(category.wire_value(), &self.search_term);
        self.prune_summaries();
        self.request_load();
    }

    /// Drops summaries for articles that left the feed, keeping bookmarked
    /// ones and the article on the detail screen.
    fn prune_summaries(&mut self) {
        let detail_url = self.detail.as_ref().map(|a| a.url.as_str());
        let feed = &self.feed;
        let bookmarks = &self.bookmarks;
        self.summaries.retain(|url, _| {
            Some(url.as_str()) == detail_url
                || bookmarks.contains(url)
                || feed.articles().iter().any(|a| &a.url == url)
        });
    }

    fn submit_search(&mut self, term: &str) {
        self.history.record(term);
        self.apply_query(self.category, term);
    }

    fn request_load(&mut self) {
        let Some(pending) = self.feed.begin_load() else {
            return;
        };
        debug!(epoch = pending.epoch(), page = pending.page(), "spawning page load");
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let load = pending.run().await;
            let _ = tx.send(TaskEvent::PageLoaded(load));
        });
    }

    fn request_summary(&mut self, article: &Article, force: bool) {
        if !force && self.summaries.contains_key(&article.url) {
            return;
        }
        if !self.summarizer.is_configured() {
            self.summaries
                .insert(article.url.clone(), SummaryState::Unavailable);
            return;
        }

        self.summaries
            .insert(article.url.clone(), SummaryState::Pending);
        let summarizer = Arc::clone(&self.summarizer);
        let article = article.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let summary = summarizer.summarize(&article).await;
            let _ = tx.send(TaskEvent::Summary {
                url: article.url,
                summary,
            });
        });
    }

    /// Applies every finished background task.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                TaskEvent::PageLoaded(load) => {
                    self.feed.complete(load);
                }
                TaskEvent::Summary { url, summary } => {
                    let state = match summary {
                        Some(text) => SummaryState::Ready(text),
                        None => SummaryState::Unavailable,
                    };
                    self.summaries.insert(url, state);
                }
            }
        }
    }

    /// The infinite-scroll trigger: the cursor sits on the last article.
    fn reached_bottom(&mut self) {
        if self.feed.advance_page() {
            self.request_load();
        }
    }

    fn move_down(&mut self) {
        let len = self.feed.articles().len();
        if len == 0 {
            return;
        }
        if self.selected + 1 < len {
            self.selected += 1;
        }
        if self.selected + 1 >= len {
            self.reached_bottom();
        }
    }

    fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn selected_article(&self) -> Option<Article> {
        self.feed.articles().get(self.selected).cloned()
    }

    fn open_detail(&mut self, article: Article, from: Screen) {
        self.request_summary(&article, false);
        self.detail = Some(article);
        self.detail_from = from;
        self.detail_scroll = 0;
        self.screen = Screen::Detail;
    }

    fn open_bookmarks(&mut self) {
        self.bookmarks.reload();
        self.bookmark_selected = 0;
        self.screen = Screen::Bookmarks;
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.screen {
            Screen::Home => self.handle_home_key(key),
            Screen::Detail => self.handle_detail_key(key),
            Screen::Bookmarks => self.handle_bookmarks_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        if let Some(mut input) = self.input.take() {
            match key.code {
                KeyCode::Enter => {
                    self.submit_search(&input);
                    return;
                }
                KeyCode::Esc => return,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            self.input = Some(input);
            return;
        }

        if self.pending_delete {
            self.pending_delete = false;
            if let KeyCode::Char(c) = key.code {
                let term = history_slot(c)
                    .and_then(|i| self.history.get(i))
                    .map(str::to_string);
                if let Some(term) = term {
                    self.history.remove(&term);
                }
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => {
                let len = self.feed.articles().len();
                if len > 0 {
                    self.selected = len - 1;
                    self.reached_bottom();
                }
            }
            KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => {
                self.apply_query(self.category.next(), &self.search_term.clone());
            }
            KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => {
                self.apply_query(self.category.prev(), &self.search_term.clone());
            }
            KeyCode::Char('/') => self.input = Some(self.search_term.clone()),
            KeyCode::Char('x') => self.pending_delete = true,
            KeyCode::Char('t') => self.apply_query(Category::All, ""),
            KeyCode::Char('b') => {
                if let Some(article) = self.selected_article() {
                    self.bookmarks.toggle(&article);
                }
            }
            KeyCode::Char('B') => self.open_bookmarks(),
            KeyCode::Enter => {
                if let Some(article) = self.selected_article() {
                    self.open_detail(article, Screen::Home);
                }
            }
            KeyCode::Char(c) => {
                let term = history_slot(c)
                    .and_then(|i| self.history.get(i))
                    .map(str::to_string);
                if let Some(term) = term {
                    self.submit_search(&term);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.detail = None;
                self.screen = self.detail_from;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            KeyCode::Char('o') => {
                if let Some(article) = &self.detail {
                    open_in_browser(&article.url);
                }
            }
            KeyCode::Char('s') => {
                if let Some(article) = self.detail.clone() {
                    self.request_summary(&article, true);
                }
            }
            KeyCode::Char('b') => {
                if let Some(article) = self.detail.clone() {
                    self.bookmarks.toggle(&article);
                }
            }
            _ => {}
        }
    }

    fn handle_bookmarks_key(&mut self, key: KeyEvent) {
        let len = self.bookmarks.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.screen = Screen::Home,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.bookmark_selected + 1 < len {
                    self.bookmark_selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.bookmark_selected = self.bookmark_selected.saturating_sub(1);
            }
            KeyCode::Char('d') | KeyCode::Char('b') | KeyCode::Delete => {
                let url = self
                    .bookmarks
                    .list()
                    .get(self.bookmark_selected)
                    .map(|a| a.url.clone());
                if let Some(url) = url {
                    self.bookmarks.remove(&url);
                    let len = self.bookmarks.len();
                    if self.bookmark_selected >= len {
                        self.bookmark_selected = len.saturating_sub(1);
                    }
                }
            }
            KeyCode::Enter => {
                if let Some(article) = self.bookmarks.list().get(self.bookmark_selected).cloned() {
                    self.open_detail(article, Screen::Bookmarks);
                }
            }
            _ => {}
        }
    }
}

/// Maps the digit keys to history slots: `1`..`9` then `0` for the tenth.
fn history_slot(c: char) -> Option<usize> {
    match c {
        '1'..='9' => c.to_digit(10).map(|d| d as usize - 1),
        '0' => Some(9),
        _ => None,
    }
}

/// Runs the interactive browser until the user quits.
pub fn run_browser(mut app: BrowserApp) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut BrowserApp) -> io::Result<()> {
    loop {
        app.drain_events();
        terminal.draw(|f| ui(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &BrowserApp) {
    match app.screen {
        Screen::Home => render_home(f, app),
        Screen::Detail => render_detail(f, app),
        Screen::Bookmarks => render_bookmarks(f, app),
    }
}

fn render_home(f: &mut Frame, app: &BrowserApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Categories
            Constraint::Length(3), // Search + history
            Constraint::Min(6),    // Articles
            Constraint::Length(1), // Loader status
            Constraint::Length(3), // Footer
        ])
        .split(f.size());

    render_categories(f, chunks[0], app);
    render_search(f, chunks[1], app);
    render_articles(f, chunks[2], app);
    render_status(f, chunks[3], app);
    render_footer(
        f,
        chunks[4],
        &[
            ("q", "Quit"),
            ("/", "Search"),
            ("Tab", "Category"),
            ("b", "Bookmark"),
            ("B", "Bookmarks"),
            ("Enter", "Open"),
            ("t", "Top"),
        ],
    );
}

fn render_categories(f: &mut Frame, area: Rect, app: &BrowserApp) {
    let titles: Vec<Line> = Category::ALL.iter().map(|c| Line::from(c.label())).collect();
    let selected = Category::ALL
        .iter()
        .position(|c| *c == app.category)
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" newsdeck ")
                .title_alignment(Alignment::Center),
        )
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        );

    f.render_widget(tabs, area);
}

fn render_search(f: &mut Frame, area: Rect, app: &BrowserApp) {
    let mut spans = Vec::new();
    match &app.input {
        Some(input) => {
            spans.push(Span::styled("Search: ", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(input.clone()));
            spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
        }
        None if !app.search_term.is_empty() => {
            spans.push(Span::raw("Search: "));
            spans.push(Span::styled(
                app.search_term.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw("  "));
        }
        None => {}
    }

    if app.input.is_none() {
        for (i, term) in app.history.entries().iter().enumerate() {
            let key = if i == 9 { 0 } else { i + 1 };
            spans.push(Span::styled(
                format!(" {} ", key),
                Style::default().bg(Color::DarkGray).fg(Color::White),
            ));
            spans.push(Span::raw(format!(" {}  ", term)));
        }
    }

    let title = if app.pending_delete {
        " Delete which history entry? "
    } else {
        " Search history "
    };
    let search = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
            .title(title),
    );
    f.render_widget(search, area);
}

fn render_articles(f: &mut Frame, area: Rect, app: &BrowserApp) {
    let articles = app.feed.articles();
    let block = Block::default()
        .borders(Borders::LEFT | Borders::RIGHT)
        .border_style(Style::default().fg(Color::Gray));

    if articles.is_empty() && !app.feed.is_loading() {
        let empty = Paragraph::new("No results.")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = articles
        .iter()
        .map(|a| article_item(a, app.bookmarks.contains(&a.url), width))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
        .highlight_symbol("▌");
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn article_item(article: &Article, bookmarked: bool, width: usize) -> ListItem<'static> {
    let star = if bookmarked { "★ " } else { "☆ " };
    let mut lines = vec![
        Line::from(vec![
            Span::styled(star, Style::default().fg(Color::Yellow)),
            Span::styled(
                truncate(&article.title, width.saturating_sub(2)),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("  {} · {}", article.display_source(), article.display_date()),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let wrapped = textwrap::wrap(article.display_description(), width.max(10).saturating_sub(2));
    for line in wrapped.into_iter().take(2) {
        lines.push(Line::from(format!("  {}", line)));
    }
    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn render_status(f: &mut Frame, area: Rect, app: &BrowserApp) {
    let (text, color) = if app.feed.is_loading() {
        ("Loading news…", Color::Yellow)
    } else if app.feed.is_end() {
        ("You've seen all the news", Color::Green)
    } else {
        ("More news below", Color::Gray)
    };
    let status = Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center);
    f.render_widget(status, area);
}

fn render_detail(f: &mut Frame, app: &BrowserApp) {
    let Some(article) = &app.detail else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Header
            Constraint::Min(10),    // Content
            Constraint::Length(3),  // Footer
        ])
        .split(f.size());

    let star = if app.bookmarks.contains(&article.url) { "★" } else { "☆" };
    let header_text = vec![
        Line::from(vec![
            Span::styled(format!("{} ", star), Style::default().fg(Color::Yellow)),
            Span::styled(
                article.title.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("Source: "),
            Span::styled(
                format!("{} · {}", article.display_source(), published(article)),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];
    let header = Paragraph::new(header_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Article ")
            .title_alignment(Alignment::Center),
    );
    f.render_widget(header, chunks[0]);

    let width = chunks[1].width.saturating_sub(2).max(20) as usize;
    let mut lines: Vec<Line> = Vec::new();
    if let Some(image) = article.secure_image_url() {
        lines.push(Line::from(format!("Image: {}", image)));
    }
    lines.push(Line::from(format!("Link: {}", article.url)));
    lines.push(Line::from("────────────────────────────────────────"));

    match app.summaries.get(&article.url) {
        Some(SummaryState::Ready(summary)) => {
            lines.push(Line::from(Span::styled(
                "AI summary",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for line in summary.lines() {
                lines.push(Line::from(Span::styled(
                    line.to_string(),
                    Style::default().fg(Color::Green),
                )));
            }
            lines.push(Line::from(""));
        }
        Some(SummaryState::Pending) => {
            lines.push(Line::from(Span::styled(
                "Summarizing…",
                Style::default().fg(Color::DarkGray),
            )));
            lines.push(Line::from(""));
        }
        _ => {}
    }

    let body = html2text::from_read(article.display_description().as_bytes(), width);
    for line in body.lines() {
        lines.push(Line::from(line.to_string()));
    }

    let content = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::RIGHT | Borders::BOTTOM)
                .border_style(Style::default().fg(Color::Gray)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    f.render_widget(content, chunks[1]);

    render_footer(
        f,
        chunks[2],
        &[
            ("Esc", "Back"),
            ("o", "Open in Browser"),
            ("s", "Summarize"),
            ("b", "Bookmark"),
            ("j/k", "Scroll"),
        ],
    );
}

fn render_bookmarks(f: &mut Frame, app: &BrowserApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(3)])
        .split(f.size());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(format!(" Bookmarks ({}) ", app.bookmarks.len()))
        .title_alignment(Alignment::Center);

    if app.bookmarks.is_empty() {
        let empty = Paragraph::new("No bookmarked news yet.")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, chunks[0]);
    } else {
        let width = chunks[0].width.saturating_sub(4) as usize;
        let items: Vec<ListItem> = app
            .bookmarks
            .list()
            .iter()
            .map(|a| article_item(a, true, width))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::Rgb(40, 40, 60)))
            .highlight_symbol("▌");
        let mut state = ListState::default().with_selected(Some(app.bookmark_selected));
        f.render_stateful_widget(list, chunks[0], &mut state);
    }

    render_footer(
        f,
        chunks[1],
        &[("Esc", "Home"), ("d", "Remove"), ("Enter", "Open"), ("j/k", "Move")],
    );
}

fn render_footer(f: &mut Frame, area: Rect, keys: &[(&str, &str)]) {
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (key, label) in keys {
        spans.push(Span::styled(
            format!(" {} ", key),
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ));
        spans.push(Span::raw(format!(" {}  ", label)));
    }

    let footer = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

fn published(article: &Article) -> String {
    article
        .published_at
        .map(|d| d.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "date unknown".to_string())
}

/// Cuts `s` to at most `width` terminal columns, marking the cut with `…`.
fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn open_in_browser(url: &str) {
    let open_cmd = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "linux") {
        "xdg-open"
    } else {
        return;
    };

    if let Err(e) = std::process::Command::new(open_cmd)
        .arg(url)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
    {
        warn!(url, error = %e, "failed to open browser");
    }
}

#[cfg(test)]
#[path = "viewer_tests.rs"]
mod tests;
