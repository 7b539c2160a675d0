//! TUI widget rendering: start menu, graph canvas, notes, command line, status bar.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::{MENU_ITEMS, Note};
use crate::layout::GlyphSet;
use crate::render::{self, Row};
use crate::session::Session;

fn reversed() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Render a single note as a styled Line.
pub fn note_to_line(note: &Note) -> Line<'static> {
    match note {
        Note::System(text) => Line::from(vec![Span::styled(
            text.clone(),
            Style::default().fg(Color::DarkGray),
        )]),
        Note::Error {
            code,
            message,
            help,
        } => {
            let mut spans = vec![
                Span::styled(
                    format!("[error:{code}] "),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw(message.clone()),
            ];
            if let Some(h) = help {
                spans.push(Span::styled(
                    format!(" (help: {h})"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        }
    }
}

/// Render one canvas row with a cursor column in front.
///
/// Cells that name a true atom are drawn in reverse video; the text is the
/// same as the static printer's.
pub fn row_to_line(row: &Row, cursor_line: Option<usize>) -> Line<'static> {
    let cursor = if row.variable.is_some() && cursor_line == Some(row.line) {
        "> "
    } else {
        "  "
    };
    let mut spans = Vec::with_capacity(row.cells.len() + 1);
    spans.push(Span::raw(cursor));
    for cell in &row.cells {
        if cell.highlight {
            spans.push(Span::styled(cell.text.clone(), reversed()));
        } else {
            spans.push(Span::raw(cell.text.clone()));
        }
    }
    Line::from(spans)
}

/// Start menu.
pub fn render_menu(frame: &mut Frame, selected: usize) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Select a mode: ENTER confirm, ↑/↓ move, q to quit",
            bold(),
        )),
        Line::default(),
    ];
    for (i, item) in MENU_ITEMS.iter().enumerate() {
        if i == selected {
            lines.push(Line::from(vec![
                Span::raw("> "),
                Span::styled(*item, reversed()),
            ]));
        } else {
            lines.push(Line::from(vec![Span::raw("  "), Span::raw(*item)]));
        }
    }
    frame.render_widget(Paragraph::new(lines), frame.area());
}

/// Graph screen.
pub fn render_graph(
    frame: &mut Frame,
    session: &Session,
    glyphs: &GlyphSet,
    cursor: usize,
    input: &str,
    notes: &[Note],
) {
    let [header_area, graph_area, notes_area, input_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(4),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    // Header.
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " regula ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ↑/↓ move  •  x toggle  •  / command  •  q menu", bold()),
    ]));
    frame.render_widget(header, header_area);

    // Graph canvas.
    let cursor_line = (session.input_count() > 0).then_some(2 * cursor);
    let lines: Vec<Line> = render::rows(session.layout(), Some(session.facts()), glyphs)
        .iter()
        .map(|row| row_to_line(row, cursor_line))
        .collect();
    let graph = if lines.is_empty() {
        Paragraph::new("(no inputs: add one with /add-input NAME)")
            .style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(lines)
    };
    frame.render_widget(graph, graph_area);

    // Notes, most recent last.
    let visible = usize::from(notes_area.height).max(1);
    let start = notes.len().saturating_sub(visible);
    let note_lines: Vec<Line> = notes[start..].iter().map(note_to_line).collect();
    frame.render_widget(
        Paragraph::new(note_lines).wrap(Wrap { trim: false }),
        notes_area,
    );

    // Command line.
    let input_widget = Paragraph::new(input)
        .block(Block::default().borders(Borders::ALL).title(" / "))
        .style(Style::default().fg(Color::White));
    frame.render_widget(input_widget, input_area);

    // Status bar.
    let report = session.report();
    let status = Paragraph::new(Line::from(vec![
        Span::styled(
            format!(" inputs: {} ", session.input_count()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("| "),
        Span::styled(
            format!("rules: {} ", session.kb().len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("| "),
        Span::styled(
            format!("facts: {} ", session.facts().len()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("| "),
        Span::styled(
            format!("passes: {} ", report.passes),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    frame.render_widget(status, status_area);
}
