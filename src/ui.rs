use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, AppState, Submission};
use crate::config::TestMode;
use crate::transcript::CharOutcome;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
            AppState::Stats => render_stats(self, area, buf),
        }
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_bold() -> Style {
    bold().add_modifier(Modifier::DIM)
}

fn option_label(mode: TestMode, option: u32) -> String {
    match mode {
        TestMode::Time => format!("{option}s"),
        TestMode::Words => format!("{option} words"),
    }
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let engine = &app.engine;
    let transcript = engine.transcript();
    let passage = engine.passage();
    let window = transcript.visible_window(passage.len());
    let current = transcript.current_word_index();

    let green_bold = bold().fg(Color::Green);
    let red_bold = bold().fg(Color::Red);
    let cursor_style = dim_bold().add_modifier(Modifier::UNDERLINED);
    let done_style = Style::default().add_modifier(Modifier::DIM);

    let mut spans: Vec<Span> = Vec::new();
    for idx in window.clone() {
        if idx > window.start {
            spans.push(Span::raw(" "));
        }

        let word = &passage[idx];
        if idx == current {
            let outcomes = transcript.active_outcomes(word);
            for (pos, ch) in word.chars().enumerate() {
                let style = if pos == transcript.char_cursor() {
                    cursor_style
                } else {
                    match outcomes.get(pos) {
                        Some(CharOutcome::Correct) => green_bold,
                        Some(CharOutcome::Incorrect) => red_bold,
                        _ => dim_bold(),
                    }
                };
                spans.push(Span::styled(ch.to_string(), style));
            }
        } else if idx < current {
            spans.push(Span::styled(word.clone(), done_style));
        } else {
            spans.push(Span::styled(word.clone(), dim_bold()));
        }
    }

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let window_text: String = spans.iter().map(|s| s.content.as_ref()).collect();
    let occupied_lines =
        ((window_text.width() as f64 / max_chars_per_line as f64).ceil() as u16).max(1);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(
                    (area.height.saturating_sub(occupied_lines) as f64 / 2.0) as u16,
                ),
                Constraint::Length(2),
                Constraint::Length(occupied_lines),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    let progress = match engine.config().mode() {
        TestMode::Time => match engine.seconds_remaining() {
            Some(secs) => Span::styled(format!("{secs}s"), bold().fg(Color::Yellow)),
            None => Span::styled(format!("{}s", engine.config().limit()), dim_bold()),
        },
        TestMode::Words => Span::styled(
            format!("{current}/{}", engine.config().limit()),
            dim_bold(),
        ),
    };
    Paragraph::new(progress)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Line::from(spans))
        .alignment(if occupied_lines == 1 {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let mut lines = vec![Line::default(), Line::default()];

    if let Some(record) = app.engine.result() {
        lines.push(Line::from(Span::styled(
            format!("{} wpm", record.wpm),
            bold().fg(Color::Magenta),
        )));
        lines.push(Line::from(Span::styled(
            format!("{}% accuracy", record.accuracy),
            bold(),
        )));
        lines.push(Line::from(Span::styled(
            option_label(record.test_type, record.test_option),
            dim_bold(),
        )));
        lines.push(Line::default());

        let submission = match &app.submission {
            Submission::Saved => Span::styled(
                format!("result saved for {}", app.user.as_deref().unwrap_or("")),
                Style::default().fg(Color::Green),
            ),
            Submission::Unauthenticated => {
                Span::styled("sign in with --user to save results", italic)
            }
            Submission::Unavailable => Span::styled(
                "results database unavailable, result not saved",
                Style::default().fg(Color::Red),
            ),
            Submission::Failed(err) => Span::styled(
                format!("failed to save result: {err}"),
                Style::default().fg(Color::Red),
            ),
            Submission::Pending => Span::raw(""),
        };
        lines.push(Line::from(submission));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(r)etry / (s)tats / (q)uit",
        italic.add_modifier(Modifier::DIM),
    )));

    Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .render(margined(area), buf);
}

fn render_stats(app: &App, area: Rect, buf: &mut Buffer) {
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let config = app.engine.config();

    let mut lines = vec![Line::default()];

    match (&app.stats, app.user.as_deref()) {
        (Some(stats), Some(user)) => {
            lines.push(Line::from(Span::styled(
                format!(
                    "{user} - {}",
                    option_label(config.mode(), config.limit())
                ),
                bold(),
            )));
            lines.push(Line::default());
            lines.push(Line::from(format!(
                "tests completed: {}",
                stats.tests_completed
            )));
            lines.push(Line::from(format!("best: {} wpm", stats.best_wpm)));
            lines.push(Line::from(format!(
                "last 10: {} wpm / {}% accuracy",
                stats.average_wpm, stats.average_accuracy
            )));
            lines.push(Line::default());

            for entry in &stats.history {
                lines.push(Line::from(Span::styled(
                    format!(
                        "{}  {:>3} wpm  {:>3}%",
                        entry.date.format("%Y-%m-%d %H:%M"),
                        entry.wpm,
                        entry.accuracy
                    ),
                    Style::default().add_modifier(Modifier::DIM),
                )));
            }
        }
        _ => {
            lines.push(Line::from(Span::styled(
                "no history - sign in with --user to track results",
                italic,
            )));
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "(b)ack / (r)etry / (q)uit",
        italic.add_modifier(Modifier::DIM),
    )));

    Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .render(margined(area), buf);
}

fn margined(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1)].as_ref())
        .split(area);
    chunks[0]
}
