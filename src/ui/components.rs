//! UI components for the form: editor, controls, error, summary, popup.

use super::App;
use crate::clipboard::Clipboard;
use crate::controller::MAX_CHARS;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn render<C: Clipboard>(frame: &mut Frame, app: &App<C>) {
    let form = &app.form;
    let has_error = !form.error().is_empty();
    let has_answer = !form.answer().is_empty();

    let screen = frame.area();
    let answer_height = if has_answer {
        // Borders take two rows and two columns.
        let body = wrapped_height(form.answer(), screen.width.saturating_sub(2));
        (body + 2).clamp(3, (screen.height / 2).max(3))
    } else {
        0
    };

    let [header, editor, controls, error_area, answer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(6),
        Constraint::Length(1),
        Constraint::Length(if has_error { 3 } else { 0 }),
        Constraint::Length(answer_height),
    ])
    .areas(screen);

    frame.render_widget(
        Paragraph::new(vec![
            Line::from(Span::styled(
                "Freelancer Q&A Summarizer",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Enter your question below to get a concise summary",
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        header,
    );

    render_editor(frame, app, editor);
    render_controls(frame, app, controls);

    if has_error {
        frame.render_widget(
            Paragraph::new(form.error())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::LEFT)
                        .border_style(Style::default().fg(Color::Red)),
                ),
            error_area,
        );
    }

    if has_answer {
        let overflow = wrapped_height(form.answer(), answer_area.width.saturating_sub(2))
            .saturating_sub(answer_area.height.saturating_sub(2));
        frame.render_widget(
            Paragraph::new(form.answer())
                .wrap(Wrap { trim: false })
                .scroll((app.answer_scroll.min(overflow), 0))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Summary ")
                        .title_bottom(" Ctrl+Y copy again  PgUp/PgDn scroll "),
                ),
            answer_area,
        );
    }

    if let Some(notice) = &app.popup {
        render_popup(frame, notice);
    }
}

fn render_editor<C: Clipboard>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let question = app.form.question();
    let count = question.chars().count();

    let (text, style) = if question.is_empty() {
        (
            "Paste your content or question here...",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (question, Style::default())
    };

    let counter_style = if app.form.will_truncate() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    // Keep the end of the text, where typing happens, in view.
    let offset = wrapped_height(text, area.width.saturating_sub(2))
        .saturating_sub(area.height.saturating_sub(2));

    frame.render_widget(
        Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: false })
            .scroll((offset, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue))
                    .title_bottom(Span::styled(format!(" {count}/{MAX_CHARS} "), counter_style)),
            ),
        area,
    );
}

/// Rows `text` takes when wrapped at `width` columns.
///
/// Counts characters, so word wrapping can only make the real figure larger
/// by the odd row.
pub fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = text
        .split('\n')
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_controls<C: Clipboard>(frame: &mut Frame, app: &App<C>, area: Rect) {
    let form = &app.form;
    let button = if form.is_loading() {
        Span::styled(" Processing... ", Style::default().fg(Color::DarkGray))
    } else if form.can_submit() {
        Span::styled(
            " Ctrl+S  Summarize & Copy to Clipboard ",
            Style::default().fg(Color::White).bg(Color::Blue),
        )
    } else {
        Span::styled(
            " Ctrl+S  Summarize & Copy to Clipboard ",
            Style::default().fg(Color::DarkGray),
        )
    };

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            button,
            Span::styled(
                "  Ctrl+U clear  Esc quit",
                Style::default().fg(Color::DarkGray),
            ),
        ])),
        area,
    );
}

fn render_popup(frame: &mut Frame, notice: &str) {
    let [row] = Layout::vertical([Constraint::Length(3)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::horizontal([Constraint::Length(notice.chars().count() as u16 + 8)])
        .flex(Flex::Center)
        .areas(row);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(notice)
            .style(Style::default().fg(Color::Green))
            .centered()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title_bottom(" any key "),
            ),
        area,
    );
}
