use crate::application::{App, AppMode};
use crate::domain::{ApplicationRecord, ApplicationStatus, KeyValueStore};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render_ui<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_statistics(f, app, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    render_application_list(f, app, body[0]);
    render_application_card(f, app.selected_record(), body[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

pub fn status_color(status: ApplicationStatus) -> Color {
    match status {
        ApplicationStatus::New => Color::Cyan,
        ApplicationStatus::Shortlisted => Color::Green,
        ApplicationStatus::Rejected => Color::Red,
    }
}

pub fn checkbox_label(status: ApplicationStatus, checked: bool) -> String {
    format!("[{}] {}", if checked { "x" } else { " " }, status)
}

fn render_statistics<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let stats = app.statistics();
    let line = Line::from(vec![
        Span::styled(format!(" Total: {} ", stats.total), Style::default().fg(Color::White)),
        Span::raw("│"),
        Span::styled(
            format!(" New: {} ", stats.new),
            Style::default().fg(status_color(ApplicationStatus::New)),
        ),
        Span::raw("│"),
        Span::styled(
            format!(" Shortlisted: {} ", stats.shortlisted),
            Style::default().fg(status_color(ApplicationStatus::Shortlisted)),
        ),
        Span::raw("│"),
        Span::styled(
            format!(" Rejected: {} ", stats.rejected),
            Style::default().fg(status_color(ApplicationStatus::Rejected)),
        ),
    ]);

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("shortlist - Application Review"),
    );
    f.render_widget(widget, area);
}

fn render_application_list<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let items: Vec<ListItem> = app
        .records()
        .iter()
        .map(|record| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<12}", record.status.as_str()),
                    Style::default().fg(status_color(record.status)),
                ),
                Span::raw(format!("{} ", record.name)),
                Span::styled(format!("({})", record.team), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Applications"))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.records().is_empty() {
        state.select(Some(app.selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn section(lines: &mut Vec<Line<'static>>, label: &str, text: &str) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        label.to_string(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(text.to_string()));
}

/// Card lines for a record; optional sections are left out when empty.
pub fn card_lines(record: &ApplicationRecord) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(record.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                record.status.to_string(),
                Style::default().fg(status_color(record.status)),
            ),
        ]),
        Line::from(format!("Roll: {}", record.roll_number)),
        Line::from(format!("Contact: {}", record.contact)),
        Line::from(format!("Team: {}", record.team)),
        Line::from(format!("Applied: {}", record.applied_date_display())),
    ];

    section(&mut lines, "Qualifications", &record.qualification);
    if !record.event_idea.is_empty() {
        section(&mut lines, "Event Idea", &record.event_idea);
    }
    if !record.portfolio.is_empty() {
        section(&mut lines, "Portfolio", &record.portfolio);
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            checkbox_label(
                ApplicationStatus::Shortlisted,
                record.status == ApplicationStatus::Shortlisted,
            ),
            Style::default().fg(status_color(ApplicationStatus::Shortlisted)),
        ),
        Span::raw("    "),
        Span::styled(
            checkbox_label(
                ApplicationStatus::Rejected,
                record.status == ApplicationStatus::Rejected,
            ),
            Style::default().fg(status_color(ApplicationStatus::Rejected)),
        ),
    ]));
    lines
}

fn render_application_card(f: &mut Frame, record: Option<&ApplicationRecord>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Applicant");
    let widget = match record {
        Some(record) => Paragraph::new(card_lines(record)),
        None => Paragraph::new("No applications"),
    };
    f.render_widget(widget.block(block).wrap(Wrap { trim: true }), area);
}

fn render_status_bar<S: KeyValueStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let text = match app.mode {
        AppMode::Normal => app.status_message.clone().unwrap_or_else(|| {
            format!(
                "Changes this session: {} | s: shortlist | r: reject | Ctrl+E: export CSV | F1/?: help | q: quit",
                app.session_changes()
            )
        }),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(widget, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let help_widget = Paragraph::new(help_lines[start_line..end_line].join("\n"))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("shortlist Help (Line {}/{})", start_line + 1, help_lines.len()))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"SHORTLIST - APPLICATION REVIEW

=== REVIEWING ===
↑↓ or j/k       Move between applications
Home/End        Jump to first/last application
s               Tick/untick the Shortlisted box
r               Tick/untick the Rejected box

Each application holds exactly one status. Ticking one box clears
the other; unticking a box returns the application to New.
Every change is saved immediately.

=== STATISTICS ===
The top bar counts all applications and how many are New,
Shortlisted and Rejected.

=== EXPORT ===
Ctrl+E          Export all applications to applications_<date>.csv
                in the configured export directory

Columns: ID, Name, Roll Number, Contact, Team Preference,
Qualifications, Event Idea, Portfolio, Status, Applied Date

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window

q               Quit application"#;
