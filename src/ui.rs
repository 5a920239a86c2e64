pub mod charting;

use itertools::{EitherOrBoth, Itertools};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    countdown::Clock,
    session::{SessionDuration, SessionResult},
    time_series,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text_width = area
            .width
            .saturating_sub(HORIZONTAL_MARGIN * 2 + 2)
            .max(1);
        let reference_width = self.engine.reference().width() as u16;
        // wrapping on word boundaries can need one extra row
        let reference_rows = reference_width.div_ceil(text_width).max(1) + 1;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),                  // title
                Constraint::Length(1),                  // duration picker
                Constraint::Length(3),                  // live stats
                Constraint::Length(reference_rows + 2), // reference text
                Constraint::Min(4),                     // results summary
                Constraint::Length(1),                  // legend
            ])
            .split(area);

        render_title(chunks[0], buf);
        render_durations(self.engine.duration(), chunks[1], buf);
        render_stats(self, chunks[2], buf);
        render_reference(self, chunks[3], buf);
        render_results(self, chunks[4], buf);
        render_legend(self.engine.is_finished(), chunks[5], buf);
    }
}

fn render_title(area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    Paragraph::new(Line::from(vec![
        Span::styled("keyrush", bold.fg(Color::Green)),
        Span::styled(
            "  how fast can you type?",
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]))
    .render(area, buf);
}

fn render_durations(selected: SessionDuration, area: Rect, buf: &mut Buffer) {
    let mut spans = vec![Span::styled(
        "duration ",
        Style::default().add_modifier(Modifier::DIM),
    )];
    for d in SessionDuration::ALL {
        let style = if d == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        spans.push(Span::styled(format!(" {d} "), style));
        spans.push(Span::raw(" "));
    }
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Right)
        .render(area, buf);
}

fn render_stats<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let label = Style::default().add_modifier(Modifier::DIM);
    let value = Style::default().add_modifier(Modifier::BOLD);
    let live = &app.live;

    let line = Line::from(vec![
        Span::styled("Time Left ", label),
        Span::styled(format!("{}s", live.time_left), value.fg(Color::Green)),
        Span::styled("   WPM ", label),
        Span::styled(live.wpm.to_string(), value),
        Span::styled("   Accuracy ", label),
        Span::styled(format!("{}%", live.accuracy), value),
        Span::styled("   Chars ", label),
        Span::styled(
            format!("{}/{}", live.correct_chars, live.chars_typed),
            value,
        ),
    ]);

    let title = if app.engine.is_finished() {
        " Test finished "
    } else {
        " Typing Test "
    };
    Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title))
        .render(area, buf);
}

/// Reference text coloured by what has been typed so far, with a caret
/// on the next expected character while the session is open.
pub fn reference_spans(reference: &str, input: &str, finished: bool) -> Vec<Span<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let correct = bold.fg(Color::Green);
    let incorrect = bold.fg(Color::Red);
    let pending = bold.add_modifier(Modifier::DIM);
    let caret = pending.add_modifier(Modifier::UNDERLINED);

    let typed = input.chars().count();

    reference
        .chars()
        .zip_longest(input.chars())
        .enumerate()
        .filter_map(|(idx, pair)| match pair {
            EitherOrBoth::Both(expected, actual) if expected == actual => {
                Some(Span::styled(expected.to_string(), correct))
            }
            EitherOrBoth::Both(expected, _) => Some(Span::styled(
                match expected {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                incorrect,
            )),
            EitherOrBoth::Left(expected) => {
                let style = if idx == typed && !finished {
                    caret
                } else {
                    pending
                };
                Some(Span::styled(expected.to_string(), style))
            }
            EitherOrBoth::Right(_) => None,
        })
        .collect()
}

fn render_reference<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let spans = reference_spans(
        app.engine.reference(),
        app.engine.input(),
        app.engine.is_finished(),
    );
    Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL))
        .render(area, buf);
}

fn render_results<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let best = app.summary.best_wpm();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Results  ·  Best WPM: {best} "));
    let inner = block.inner(area);
    block.render(area, buf);

    let Some(result) = app.summary.last() else {
        Paragraph::new("Complete a test to see your results summary here.")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .render(inner, buf);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // chart
            Constraint::Length(1), // cards
            Constraint::Length(1), // details
        ])
        .split(inner);

    if !result.history.is_empty() {
        render_chart(result, chunks[0], buf);
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let label = Style::default().add_modifier(Modifier::DIM);
    let mut cards = vec![
        Span::styled("WPM ", label),
        Span::styled(result.wpm.to_string(), bold.fg(Color::Green)),
        Span::styled("   Accuracy ", label),
        Span::styled(format!("{}%", result.accuracy), bold.fg(Color::Cyan)),
        Span::styled("   Correct ", label),
        Span::styled(result.correct_chars.to_string(), bold.fg(Color::Yellow)),
        Span::styled("   Time ", label),
        Span::styled(result.duration.to_string(), bold.fg(Color::Magenta)),
        Span::styled(
            format!("   at {}", result.completed_at.format("%H:%M:%S")),
            label,
        ),
    ];
    if app.new_best && app.engine.is_finished() {
        cards.push(Span::styled("   new best!", bold.fg(Color::Yellow)));
    }
    Paragraph::new(Line::from(cards))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    if let Some(details) = app.summary.details() {
        Paragraph::new(Span::styled(
            details,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
    }
}

fn render_chart(result: &SessionResult, area: Rect, buf: &mut Buffer) {
    if area.height < 3 {
        return;
    }
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let points = time_series::to_points(&result.history);
    let (overall_duration, highest_wpm) =
        charting::compute_chart_params(&points, result.duration.secs());

    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&points)];

    Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([1.0, overall_duration])
                .labels(vec![
                    Span::styled("1", bold),
                    Span::styled(charting::format_label(overall_duration), bold),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("wpm")
                .bounds([0.0, highest_wpm])
                .labels(vec![
                    Span::styled("0", bold),
                    Span::styled(charting::format_label(highest_wpm), bold),
                ]),
        )
        .render(area, buf);
}

fn render_legend(finished: bool, area: Rect, buf: &mut Buffer) {
    let text = if finished {
        "(r)etry / (n)ew / ↑↓ duration / (esc)ape"
    } else {
        "type to start  ·  ← restart  ·  → new text  ·  ↑↓ F1-F3 duration  ·  esc quit"
    };
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}
