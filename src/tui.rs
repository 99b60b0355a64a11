use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::JobApi;
use crate::draft::{DraftMode, Field};
use crate::models::{JobRecord, JobStatus, DEFAULT_LOCATION};
use crate::tracker::{self, Applied, Completion, Request, TrackerState};
use crate::truncate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Browse,
    Form,
    Search,
    Results,
    ResumePrompt,
}

#[derive(Debug)]
enum Action {
    Quit,
    Send(Request),
}

#[derive(Debug, Default)]
struct SearchInput {
    title: String,
    location: String,
    on_location: bool,
}

impl SearchInput {
    fn focused_mut(&mut self) -> &mut String {
        if self.on_location {
            &mut self.location
        } else {
            &mut self.title
        }
    }
}

struct AppState {
    tracker: TrackerState,
    mode: Mode,
    selected: usize,
    result_selected: usize,
    scroll_offset: u16,
    field: Field,
    search: SearchInput,
    resume_path: String,
    notice: Option<String>,
    in_flight: usize,
}

impl AppState {
    fn new() -> Self {
        Self {
            tracker: TrackerState::default(),
            mode: Mode::Browse,
            selected: 0,
            result_selected: 0,
            scroll_offset: 0,
            field: Field::Title,
            search: SearchInput::default(),
            resume_path: String::new(),
            notice: None,
            in_flight: 0,
        }
    }

    fn current_job(&self) -> Option<&JobRecord> {
        self.tracker.job_list().get(self.selected)
    }

    fn next(&mut self) {
        let len = self.tracker.job_list().len();
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn clamp_selection(&mut self) {
        let jobs = self.tracker.job_list().len();
        self.selected = self.selected.min(jobs.saturating_sub(1));
        let results = self.tracker.job_results().len();
        self.result_selected = self.result_selected.min(results.saturating_sub(1));
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    /// Sends a request or turns a local rejection into a notice.
    fn send_or_notify(&mut self, request: crate::error::Result<Request>) -> Vec<Action> {
        match request {
            Ok(request) => vec![Action::Send(request)],
            Err(e) => {
                self.notify(e.to_string());
                Vec::new()
            }
        }
    }

    fn resync(&mut self) -> Vec<Action> {
        vec![
            Action::Send(self.tracker.begin_list()),
            Action::Send(self.tracker.begin_stats()),
        ]
    }

    fn on_completion(&mut self, completion: Completion) -> Vec<Action> {
        self.in_flight = self.in_flight.saturating_sub(1);
        let was_save = matches!(completion, Completion::Saved { .. });
        let actions = match self.tracker.apply(completion) {
            Ok(Applied::Replaced) | Ok(Applied::Discarded) => Vec::new(),
            Ok(Applied::Written(ack)) => {
                if !ack.is_empty() {
                    self.notify(ack);
                }
                if was_save && self.mode == Mode::Form {
                    self.mode = Mode::Browse;
                    self.field = Field::Title;
                }
                self.resync()
            }
            Ok(Applied::Matched(id, score)) => {
                self.notify(format!("Job #{}: Resume Match Score: {}%", id, score.match_score));
                Vec::new()
            }
            Ok(Applied::Salary(estimate)) => {
                self.notify(estimate.to_string());
                Vec::new()
            }
            Err(e) => {
                self.notify(e.to_string());
                Vec::new()
            }
        };
        self.clamp_selection();
        actions
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if self.notice.is_some() {
            // Notices block until dismissed.
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.notice = None;
            }
            return Vec::new();
        }
        match self.mode {
            Mode::Browse => self.browse_key(key),
            Mode::Form => self.form_key(key),
            Mode::Search => self.search_key(key),
            Mode::Results => self.results_key(key),
            Mode::ResumePrompt => self.resume_key(key),
        }
    }

    fn browse_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.prev();
                Vec::new()
            }
            KeyCode::Char('J') | KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(3);
                Vec::new()
            }
            KeyCode::Char('K') | KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(3);
                Vec::new()
            }
            KeyCode::Char('g') => self.resync(),
            KeyCode::Char('a') => {
                self.mode = Mode::Form;
                Vec::new()
            }
            KeyCode::Char('e') => {
                let Some(job) = self.current_job().cloned() else {
                    return Vec::new();
                };
                match self.tracker.begin_edit(&job) {
                    Ok(()) => {
                        self.mode = Mode::Form;
                        self.field = Field::Title;
                    }
                    Err(e) => self.notify(e.to_string()),
                }
                Vec::new()
            }
            KeyCode::Char('d') => match self.current_job() {
                Some(job) => vec![Action::Send(self.tracker.begin_delete(job.id))],
                None => Vec::new(),
            },
            KeyCode::Char('f') => {
                self.mode = Mode::ResumePrompt;
                Vec::new()
            }
            KeyCode::Char('u') => match self.current_job().map(|j| j.id) {
                Some(id) => {
                    let request = self.tracker.begin_upload(id);
                    self.send_or_notify(request)
                }
                None => Vec::new(),
            },
            KeyCode::Char('m') => match self.current_job() {
                Some(job) => vec![Action::Send(self.tracker.begin_match(job.id))],
                None => Vec::new(),
            },
            KeyCode::Char('p') => match self.current_job() {
                Some(job) => {
                    let request = self.tracker.begin_salary(&job.title, &self.search.location);
                    vec![Action::Send(request)]
                }
                None => Vec::new(),
            },
            KeyCode::Char('s') | KeyCode::Char('/') => {
                self.mode = Mode::Search;
                Vec::new()
            }
            KeyCode::Char('r') => {
                self.mode = Mode::Results;
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn form_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('u') {
                if let Err(e) = self.tracker.clear_form() {
                    self.notify(e.to_string());
                }
                self.field = Field::Title;
            }
            return Vec::new();
        }
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                Vec::new()
            }
            KeyCode::Enter => {
                let request = self.tracker.begin_save();
                self.send_or_notify(request)
            }
            KeyCode::Tab | KeyCode::Down => {
                self.field = self.field.next();
                Vec::new()
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.field = self.field.prev();
                Vec::new()
            }
            code => {
                let field = self.field;
                match self.tracker.form_mut() {
                    Ok(form) => match code {
                        KeyCode::Backspace => field.backspace(form),
                        KeyCode::Left | KeyCode::Right if field.is_choice() => field.cycle(form),
                        KeyCode::Char(c) => field.input(form, c),
                        _ => {}
                    },
                    Err(e) => self.notify(e.to_string()),
                }
                Vec::new()
            }
        }
    }

    fn search_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Tab | KeyCode::BackTab => self.search.on_location = !self.search.on_location,
            KeyCode::Backspace => {
                self.search.focused_mut().pop();
            }
            KeyCode::Char(c) => self.search.focused_mut().push(c),
            KeyCode::Enter => {
                self.mode = Mode::Results;
                self.result_selected = 0;
                let request = self
                    .tracker
                    .begin_search(&self.search.title, &self.search.location);
                return vec![Action::Send(request)];
            }
            _ => {}
        }
        Vec::new()
    }

    fn results_key(&mut self, key: KeyEvent) -> Vec<Action> {
        let len = self.tracker.job_results().len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('r') | KeyCode::Char('q') => self.mode = Mode::Browse,
            KeyCode::Char('s') | KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Down | KeyCode::Char('j') => {
                if len > 0 && self.result_selected < len - 1 {
                    self.result_selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.result_selected = self.result_selected.saturating_sub(1);
            }
            KeyCode::Char('t') => {
                if let Some(hit) = self.tracker.job_results().get(self.result_selected).cloned() {
                    match self.tracker.begin_from_search(&hit) {
                        Ok(()) => {
                            self.mode = Mode::Form;
                            self.field = Field::ApplicationDate;
                        }
                        Err(e) => self.notify(e.to_string()),
                    }
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn resume_key(&mut self, key: KeyEvent) -> Vec<Action> {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Backspace => {
                self.resume_path.pop();
            }
            KeyCode::Char(c) => self.resume_path.push(c),
            KeyCode::Enter => {
                match tracker::load_resume(Path::new(self.resume_path.trim())) {
                    Ok(file) => {
                        self.notify(format!("Staged {} ({} bytes)", file.file_name, file.bytes.len()));
                        self.tracker.stage_resume(file);
                    }
                    Err(e) => self.notify(e.to_string()),
                }
                self.mode = Mode::Browse;
            }
            _ => {}
        }
        Vec::new()
    }
}

struct Dispatcher<A: JobApi> {
    api: Arc<A>,
    tx: UnboundedSender<Completion>,
}

impl<A: JobApi + 'static> Dispatcher<A> {
    /// Fires the request on its own task; overlapping requests are allowed.
    fn send(&self, request: Request) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let completion = tracker::execute(api.as_ref(), request).await;
            let _ = tx.send(completion);
        });
    }
}

pub async fn run<A: JobApi + 'static>(api: A) -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher {
        api: Arc::new(api),
        tx,
    };

    let mut state = AppState::new();
    let startup = state.resync();
    perform(&mut state, &dispatcher, startup);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tokio::task::block_in_place(|| run_loop(&mut terminal, &mut state, &dispatcher, rx));

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

/// Returns true when the UI should exit.
fn perform<A: JobApi + 'static>(state: &mut AppState, dispatcher: &Dispatcher<A>, actions: Vec<Action>) -> bool {
    let mut quit = false;
    for action in actions {
        match action {
            Action::Quit => quit = true,
            Action::Send(request) => {
                state.in_flight += 1;
                dispatcher.send(request);
            }
        }
    }
    quit
}

fn run_loop<A: JobApi + 'static>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    dispatcher: &Dispatcher<A>,
    mut rx: UnboundedReceiver<Completion>,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        while let Ok(completion) = rx.try_recv() {
            let follow_up = state.on_completion(completion);
            perform(state, dispatcher, follow_up);
        }

        list_state.select(Some(state.selected));
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let actions = state.handle_key(key);
            if perform(state, dispatcher, actions) {
                break;
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    // Left panel: job list or search results
    if matches!(state.mode, Mode::Results | Mode::Search) {
        draw_results(frame, state, chunks[0]);
    } else {
        draw_jobs(frame, state, list_state, chunks[0]);
    }

    // Right panel: form or detail + stats
    match state.mode {
        Mode::Form => draw_form(frame, state, chunks[1]),
        _ => {
            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(8), Constraint::Length(12)])
                .split(chunks[1]);
            let detail = Paragraph::new(build_detail(state))
                .block(Block::default().borders(Borders::ALL).title(" Detail "))
                .wrap(Wrap { trim: false })
                .scroll((state.scroll_offset, 0));
            frame.render_widget(detail, right[0]);
            draw_stats(frame, state, right[1]);
        }
    }

    // Footer
    let help = match state.mode {
        Mode::Browse => " j/k:nav a:add e:edit d:delete f:pick resume u:upload m:match p:salary s:search r:results g:refresh q:quit",
        Mode::Form => " tab/up/down:field  type:edit  left/right:cycle  enter:save  ctrl-u:clear  esc:back",
        Mode::Search => " tab:title/location  enter:search  esc:back",
        Mode::Results => " j/k:nav  t:track this job  s:new search  esc:back",
        Mode::ResumePrompt => " type a file path  enter:stage  esc:cancel",
    };
    let status = if state.in_flight > 0 {
        format!(" [{} pending]{}", state.in_flight, help)
    } else {
        help.to_string()
    };
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(Color::DarkGray)),
        rows[1],
    );

    match state.mode {
        Mode::Search => draw_search_input(frame, state),
        Mode::ResumePrompt => draw_prompt(frame, " Resume file ", &state.resume_path),
        _ => {}
    }

    if let Some(notice) = &state.notice {
        let area = centered(frame.area(), 60, 7);
        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(format!("{}\n\n[enter] ok", notice))
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(" Notice ")),
            area,
        );
    }
}

fn draw_jobs(frame: &mut Frame, state: &AppState, list_state: &mut ListState, area: Rect) {
    let editing = state.tracker.draft().target();
    let items: Vec<ListItem> = state
        .tracker
        .job_list()
        .iter()
        .map(|job| {
            let marker = if Some(job.id) == editing { "~" } else { " " };
            ListItem::new(format!(
                "{} #{:<4} {} | {} ({})",
                marker,
                job.id,
                truncate(&job.title, 28),
                truncate(&job.company, 18),
                job.status
            ))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " My Job Applications ({}) ",
            state.tracker.job_list().len()
        )))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, list_state);
}

fn draw_results(frame: &mut Frame, state: &AppState, area: Rect) {
    let items: Vec<ListItem> = state
        .tracker
        .job_results()
        .iter()
        .map(|hit| {
            ListItem::new(vec![
                Line::from(format!("{} at {}", hit.title, hit.company)),
                Line::from(Span::styled(
                    format!("  {} | Apply on {}", hit.location_label(), hit.source_label()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let title = if items.is_empty() {
        " Search Results: No jobs found. ".to_string()
    } else {
        format!(" Search Results ({}) ", items.len())
    };
    let mut results_state = ListState::default();
    results_state.select(Some(state.result_selected));
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, &mut results_state);
}

fn draw_form(frame: &mut Frame, state: &AppState, area: Rect) {
    let draft = state.tracker.draft();
    let title = match draft.mode {
        DraftMode::Create => " Add a Job ".to_string(),
        DraftMode::Editing(id) => format!(" Edit Job #{} ", id),
    };
    let mut lines: Vec<Line> = Vec::new();
    for field in Field::ALL {
        let focused = field == state.field;
        let mut value = field.value(&draft.fields);
        if focused && !field.is_choice() {
            value.push('_');
        }
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<24}", field.label()), label_style),
            Span::raw(if field.is_choice() { format!("< {} >", value) } else { value }),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(file) = state.tracker.pending_upload() {
        lines.push(Line::from(format!("Staged resume: {}", file.file_name)));
    }
    let action = match (state.tracker.is_saving(), draft.mode) {
        (true, _) => "Saving...",
        (false, DraftMode::Create) => "[enter] Add Job",
        (false, DraftMode::Editing(_)) => "[enter] Update Job",
    };
    lines.push(Line::from(Span::styled(action, Style::default().add_modifier(Modifier::BOLD))));

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn draw_stats(frame: &mut Frame, state: &AppState, area: Rect) {
    let stats = state.tracker.job_stats();
    let colors = [Color::Blue, Color::Rgb(255, 165, 0), Color::Red, Color::Green];
    let bars: Vec<Bar> = stats
        .bars()
        .iter()
        .zip(colors)
        .map(|((label, count), color)| {
            Bar::default()
                .value(*count)
                .label(Line::from(*label))
                .style(Style::default().fg(color))
        })
        .collect();

    let title = match stats.total_jobs {
        Some(total) => format!(" Job Application Stats ({} total) ", total),
        None => " Job Application Stats ".to_string(),
    };
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(2);
    frame.render_widget(chart, area);
}

fn draw_search_input(frame: &mut Frame, state: &AppState) {
    let area = centered(frame.area(), 60, 6);
    let cursor = |active: bool| if active { "_" } else { "" };
    let lines = vec![
        Line::from(format!("Title:    {}{}", state.search.title, cursor(!state.search.on_location))),
        Line::from(format!("Location: {}{}", state.search.location, cursor(state.search.on_location))),
        Line::from(Span::styled(
            format!("(empty location searches {})", DEFAULT_LOCATION),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Find Jobs ")),
        area,
    );
}

fn draw_prompt(frame: &mut Frame, title: &str, value: &str) {
    let area = centered(frame.area(), 60, 3);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(format!("{}_", value))
            .block(Block::default().borders(Borders::ALL).title(title.to_string())),
        area,
    );
}

fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let width = (u32::from(area.width) * u32::from(width_pct.min(100)) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn build_detail(state: &AppState) -> Text<'_> {
    if matches!(state.mode, Mode::Results | Mode::Search) {
        return build_result_detail(state);
    }
    let Some(job) = state.current_job() else {
        return Text::raw("No jobs added yet.");
    };

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        &job.title,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", job.company)));

    let status_style = match job.status {
        JobStatus::Applied => Style::default().fg(Color::Cyan),
        JobStatus::Interview => Style::default().fg(Color::Yellow),
        JobStatus::Rejected => Style::default().fg(Color::Red),
        JobStatus::Offer => Style::default().fg(Color::Green),
    };
    lines.push(Line::from(vec![
        Span::styled(format!("{}", job.status), status_style),
        Span::raw(format!(" | {} | {} priority", job.job_type, job.priority)),
    ]));

    let deadline = job.deadline.map(|d| d.to_string()).unwrap_or_default();
    lines.push(Line::from(format!(
        "Applied on: {} | Deadline: {}",
        job.application_date, deadline
    )));
    if let Some(date) = job.interview_date {
        lines.push(Line::from(format!("Interview Date: {}", date)));
    }
    let tags = job.display_tags();
    if !tags.is_empty() {
        lines.push(Line::from(format!("Tags: {}", tags.join(", "))));
    }
    if let Some(link) = &job.job_link {
        lines.push(Line::from(format!("Link: {}", link)));
    }
    lines.push(Line::from(match &job.resume_ref {
        Some(_) => Span::styled("Resume uploaded", Style::default().fg(Color::Green)),
        None => Span::styled("No resume uploaded", Style::default().fg(Color::DarkGray)),
    }));
    if let Some(file) = state.tracker.pending_upload() {
        lines.push(Line::from(Span::styled(
            format!("Staged: {} (press u to upload)", file.file_name),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if let Some(description) = job.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Description",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(description, 70).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    Text::from(lines)
}

fn build_result_detail(state: &AppState) -> Text<'_> {
    let Some(hit) = state.tracker.job_results().get(state.result_selected) else {
        return Text::raw("No jobs found.");
    };
    let mut lines = vec![
        Line::from(Span::styled(&hit.title, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(format!("at {}", hit.company)),
        Line::from(hit.location_label().to_string()),
    ];
    if let Some(link) = &hit.job_link {
        lines.push(Line::from(format!("Apply on {}: {}", hit.source_label(), link)));
    }
    if let Some(snippet) = &hit.snippet {
        lines.push(Line::from(""));
        for line in textwrap::fill(snippet, 70).lines() {
            lines.push(Line::from(line.to_string()));
        }
    }
    Text::from(lines)
}
