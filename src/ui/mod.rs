mod popup;
mod pull_request;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::{App, Notice};
use crate::fetch::FetchState;
use crate::tabs::PrTab;

pub use pull_request::overview_line_count;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match app.fetch.state() {
        FetchState::Loading => render_loading(frame, app, chunks[1]),
        FetchState::Error(cause) => render_error(frame, cause, chunks[1]),
        FetchState::Success(Some(pr)) => pull_request::render(frame, app, pr, chunks[1]),
        FetchState::Success(None) => {}
    }

    render_status_bar(frame, app, chunks[2]);

    if app.confirm.is_open() {
        popup::render_confirm(frame, "Merge", "Merge this pull request?");
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let params = app.fetch.params();
    let title = match app.fetch.state().resource() {
        Some(pr) => format!("prview - {}: {}", params, pr.title),
        None => format!("prview - {}", params),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  [{}]", app.forge_name()),
            Style::default().fg(Color::Gray),
        ),
    ]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
    let line = Line::from(Span::styled(
        format!("{} Loading...", spinner),
        Style::default().fg(Color::Yellow),
    ));
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(line).alignment(Alignment::Center),
        vertical[1],
    );
}

fn render_error(frame: &mut Frame, cause: &str, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Something went wrong",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(cause, Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(vec![
            Span::styled("[r]", Style::default().fg(Color::Yellow)),
            Span::raw(" retry"),
        ]),
    ];

    let error = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(error, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = match &app.notice {
        Some(Notice::Error(msg)) => Line::from(Span::styled(
            format!("Error: {}", msg),
            Style::default().fg(Color::Red),
        )),
        Some(Notice::Info(msg)) => Line::from(Span::styled(
            msg.clone(),
            Style::default().fg(Color::Green),
        )),
        None => {
            let help = help_text(app);
            Line::from(Span::styled(help, Style::default().fg(Color::Gray)))
        }
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

fn help_text(app: &App) -> &'static str {
    if app.confirm.is_open() {
        return "y/Enter: merge | n/Esc: cancel";
    }
    match app.fetch.state() {
        FetchState::Loading => "q: quit",
        FetchState::Error(_) | FetchState::Success(None) => "r: retry | q: quit",
        FetchState::Success(Some(_)) => match app.tab {
            PrTab::Overview => "h/l: tabs | j/k/g/G: scroll | m: merge | r: refresh | q: quit",
            PrTab::Commits => "h/l: tabs | j/k/g/G: nav | Enter: open commit | r: refresh | q: quit",
        },
    }
}
