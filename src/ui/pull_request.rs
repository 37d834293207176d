use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs};
use ratatui::Frame;

use crate::app::App;
use crate::tabs::{active_title, derive_tabs, state_color, PrTab, TabTitle};
use crate::types::{CommitRef, PullRequest};

pub fn render(frame: &mut Frame, app: &App, pr: &PullRequest, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    render_tabs(frame, app, chunks[0]);

    let block = content_block(app, pr);
    match app.tab {
        PrTab::Overview => render_overview(frame, app, pr, block, chunks[1]),
        PrTab::Commits => render_commits(frame, app, pr, block, chunks[1]),
    }
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = derive_tabs(app.fetch.state())
        .into_iter()
        .map(|tab| tab.title)
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(app.tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Bordered block for the active tab, titled with its header representation.
fn content_block(app: &App, pr: &PullRequest) -> Block<'static> {
    let tabs = derive_tabs(app.fetch.state());
    let title = match active_title(&tabs[app.tab.index()], Some(pr)) {
        TabTitle::Plain(title) => Line::from(format!(" {} ", title)),
        TabTitle::Counted { label, count } => Line::from(vec![
            Span::styled(
                format!(" {} ", label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", count),
                Style::default().fg(Color::White).bg(Color::Blue),
            ),
            Span::raw(" "),
        ]),
    };

    Block::default().borders(Borders::ALL).title(title)
}

fn render_overview(frame: &mut Frame, app: &App, pr: &PullRequest, block: Block, area: Rect) {
    let lines = overview_lines(pr);

    // Calculate visible area (account for borders)
    let inner_height = area.height.saturating_sub(2) as usize;
    app.set_overview_viewport(inner_height);
    let max_scroll = lines.len().saturating_sub(inner_height);
    let scroll_offset = app.scroll_offset.min(max_scroll);

    let visible_lines: Vec<Line> = lines
        .into_iter()
        .skip(scroll_offset)
        .take(inner_height)
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(Text::from(visible_lines)).block(block), area);
}

pub fn overview_line_count(pr: &PullRequest) -> usize {
    overview_lines(pr).len()
}

/// Overview body, top to bottom: title, state badge, description, merge
/// button, reactions, comments, trailing blank.
fn overview_lines(pr: &PullRequest) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("#{} ", pr.number),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(pr.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
    ];

    match state_color(&pr.state) {
        Ok(color) => {
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {} ", pr.state.to_uppercase()),
                    Style::default()
                        .fg(Color::White)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(format!("@{}", pr.author), Style::default().fg(Color::Yellow)),
            ]));
            lines.push(Line::from(""));
        }
        Err(e) => {
            tracing::error!(number = pr.number, error = %e, "not rendering state badge");
        }
    }

    if pr.body.trim().is_empty() {
        lines.push(Line::from(Span::styled(
            "No description provided.",
            Style::default().fg(Color::Gray),
        )));
    } else {
        for l in pr.body.lines() {
            lines.push(Line::from(l.replace('\t', "    ")));
        }
    }
    lines.push(Line::from(""));

    lines.push(Line::from(vec![
        Span::styled(
            " [m] Merge PR ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(""));

    lines.push(reaction_line(pr));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        format!("Comments ({})", pr.comments.len()),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for comment in &pr.comments {
        lines.push(Line::from(vec![
            Span::styled(
                format!("@{}", comment.author),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format!("  {}", comment.created_at.format("%Y-%m-%d %H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        for l in comment.body.lines() {
            lines.push(Line::from(format!("  {}", l.replace('\t', "    "))));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(""));
    lines
}

fn reaction_line(pr: &PullRequest) -> Line<'static> {
    if pr.reactions.is_empty() {
        return Line::from(Span::styled("No reactions", Style::default().fg(Color::DarkGray)));
    }

    let mut spans = Vec::with_capacity(pr.reactions.len() * 2);
    for (kind, count) in &pr.reactions {
        if !spans.is_empty() {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::raw(format!("{} {}", kind, count)));
    }
    Line::from(spans)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CommitRow<'a> {
    Commit(&'a CommitRef),
    Separator,
}

/// Commits in upstream order with a separator between neighbours.
fn commit_rows(pr: &PullRequest) -> Vec<CommitRow<'_>> {
    let mut rows = Vec::with_capacity(pr.commits.len() * 2);
    for (i, commit) in pr.commits.iter().enumerate() {
        if i > 0 {
            rows.push(CommitRow::Separator);
        }
        rows.push(CommitRow::Commit(commit));
    }
    rows
}

fn render_commits(frame: &mut Frame, app: &App, pr: &PullRequest, block: Block, area: Rect) {
    if pr.commits.is_empty() {
        let empty = Paragraph::new("No commits")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let selected = app.commit_index.min(pr.commits.len() - 1);

    let mut commit_no = 0;
    let items: Vec<ListItem> = commit_rows(pr)
        .into_iter()
        .map(|row| match row {
            CommitRow::Separator => ListItem::new(Line::from(Span::styled(
                "─".repeat(width),
                Style::default().fg(Color::DarkGray),
            ))),
            CommitRow::Commit(commit) => {
                let is_selected = commit_no == selected;
                commit_no += 1;
                let style = if is_selected {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::styled(commit.short_oid().to_string(), Style::default().fg(Color::Cyan)),
                    Span::raw(" "),
                    Span::styled(commit.message.clone(), style),
                    Span::raw("  "),
                    Span::styled(format!("@{}", commit.author), Style::default().fg(Color::Gray)),
                ]))
            }
        })
        .collect();

    let list = List::new(items).block(block);

    // Separators sit between rows, so commit i is list item 2i.
    let mut state = ListState::default();
    state.select(Some(selected * 2));
    frame.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_pr;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn texts(pr: &PullRequest) -> Vec<String> {
        overview_lines(pr).iter().map(text).collect()
    }

    fn position(lines: &[String], needle: &str) -> usize {
        lines
            .iter()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("{:?} not found in {:#?}", needle, lines))
    }

    #[test]
    fn overview_sections_in_fixed_order() {
        let pr = sample_pr(3, 5);
        let lines = texts(&pr);

        let title = position(&lines, "Add widget frobnication");
        let badge = position(&lines, " OPEN ");
        let body = position(&lines, "Frobnicates widgets.");
        let button = position(&lines, "Merge PR");
        let reactions = position(&lines, "👍 3");
        let comments = position(&lines, "Comments (3)");

        assert!(title < badge);
        assert!(badge < body);
        assert!(body < button);
        assert!(button < reactions);
        assert!(reactions < comments);
        assert_eq!(lines.last().map(String::as_str), Some(""));
    }

    #[test]
    fn badge_uses_state_color() {
        let pr = sample_pr(0, 0);
        let lines = overview_lines(&pr);
        let badge = lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .find(|s| s.content == " OPEN ")
            .unwrap();
        assert_eq!(badge.style.bg, Some(Color::Green));
    }

    #[test]
    fn comments_keep_upstream_order() {
        let pr = sample_pr(3, 0);
        let lines = texts(&pr);
        let first = position(&lines, "@reviewer0");
        let second = position(&lines, "@reviewer1");
        let third = position(&lines, "@reviewer2");
        assert!(first < second && second < third);
        assert!(lines[first + 1].contains("comment number 0"));
    }

    #[test]
    fn unknown_state_skips_badge_only() {
        let mut pr = sample_pr(1, 0);
        pr.state = "frobnicated".to_string();
        let lines = texts(&pr);
        assert!(!lines.iter().any(|l| l.contains("FROBNICATED")));
        position(&lines, "Add widget frobnication");
        position(&lines, "Merge PR");
        position(&lines, "comment number 0");
    }

    #[test]
    fn empty_body_and_no_reactions() {
        let mut pr = sample_pr(0, 0);
        pr.body = String::new();
        pr.reactions.clear();
        let lines = texts(&pr);
        position(&lines, "No description provided.");
        position(&lines, "No reactions");
        position(&lines, "Comments (0)");
    }

    #[test]
    fn commit_rows_are_separated() {
        let pr = sample_pr(0, 5);
        let rows = commit_rows(&pr);
        assert_eq!(rows.len(), 9);
        for (i, row) in rows.iter().enumerate() {
            if i % 2 == 0 {
                assert_eq!(*row, CommitRow::Commit(&pr.commits[i / 2]));
            } else {
                assert_eq!(*row, CommitRow::Separator);
            }
        }
    }

    #[test]
    fn single_commit_has_no_separator() {
        let pr = sample_pr(0, 1);
        assert_eq!(commit_rows(&pr), vec![CommitRow::Commit(&pr.commits[0])]);
        assert!(commit_rows(&sample_pr(0, 0)).is_empty());
    }

    #[test]
    fn line_count_matches_lines() {
        let pr = sample_pr(2, 0);
        assert_eq!(overview_line_count(&pr), overview_lines(&pr).len());
    }
}
