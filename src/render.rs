//! Text rendering of a [`Layout`].
//!
//! Both the static printer and the interactive screen draw from the same row
//! model, so the two produce identical glyphs and spacing. A row is a list of
//! cells; a cell carries its text and whether it names a true atom. The
//! static printer ignores highlighting, the terminal UI draws highlighted
//! cells in reverse video.

use std::fmt::Write as _;

use crate::facts::FactStore;
use crate::layout::{GlyphSet, Layout};

/// A run of text on one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    /// Whether the cell names an atom that currently holds.
    pub highlight: bool,
}

impl Cell {
    fn plain(text: String) -> Self {
        Self {
            text,
            highlight: false,
        }
    }
}

/// One canvas line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// The canvas line index.
    pub line: usize,
    /// The variable on this line, if any.
    pub variable: Option<String>,
    pub cells: Vec<Cell>,
}

impl Row {
    /// The row's text without highlighting.
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }
}

/// Build the row model for `layout`, highlighting atoms that hold in `facts`.
pub fn rows(layout: &Layout, facts: Option<&FactStore>, glyphs: &GlyphSet) -> Vec<Row> {
    let holds = |name: &str| facts.is_some_and(|f| f.holds(name));
    let name_width = layout.name_width();

    (0..layout.lines)
        .map(|line| {
            let variable = layout.variable_at(line);
            let mut cells = Vec::with_capacity(1 + 2 * layout.rule_spans.len());
            cells.push(match variable {
                Some(name) => Cell {
                    text: format!("{name:<name_width$}"),
                    highlight: holds(name),
                },
                None => Cell::plain(" ".repeat(name_width)),
            });

            for span in &layout.rule_spans {
                let connector = match span.connector_at(line) {
                    Some(c) => {
                        let mark = if c.negated { '!' } else { ' ' };
                        format!("{mark}{}", glyphs.get(c.glyph))
                    }
                    None => "  ".to_string(),
                };
                cells.push(Cell::plain(format!(" {connector} ")));

                if line == span.label_line && !span.label.is_empty() {
                    cells.push(Cell {
                        text: span.label.clone(),
                        highlight: holds(&span.label),
                    });
                } else {
                    cells.push(Cell::plain(" ".repeat(span.label_width())));
                }
            }

            Row {
                line,
                variable: variable.map(str::to_string),
                cells,
            }
        })
        .collect()
}

/// Render `layout` as plain text, one canvas line per text line.
///
/// An empty layout renders as the empty string.
pub fn render_text(layout: &Layout, glyphs: &GlyphSet) -> String {
    let mut out = String::new();
    for row in rows(layout, None, glyphs) {
        out.push_str(&row.text());
        out.push('\n');
    }
    out
}

/// List facts in insertion order, one per line, negated facts marked with `¬`.
pub fn render_facts(facts: &FactStore) -> String {
    let mut out = String::from("Known facts:\n");
    for fact in facts.iter() {
        let _ = writeln!(out, " - {fact}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::kb::KnowledgeBase;
    use crate::layout::layout;
    use crate::rule::Rule;

    #[test]
    fn single_rule_renders_a_bracket() {
        let kb = KnowledgeBase::from_rules([Rule::parse("A & !B -> R").unwrap()]).unwrap();
        let text = render_text(&layout(&kb), &GlyphSet::UNICODE);
        assert_eq!(text, "A  ┐  \n   │ R\nB !┘  \n");
    }

    #[test]
    fn single_premise_label_sits_below_its_tee() {
        let kb = KnowledgeBase::from_rules([Rule::parse("A -> R").unwrap()]).unwrap();
        let text = render_text(&layout(&kb), &GlyphSet::UNICODE);
        assert_eq!(text, "A  ┤  \n     R\n");
    }

    #[test]
    fn ascii_glyphs_replace_box_drawing() {
        let kb = KnowledgeBase::from_rules([Rule::parse("A & B -> R").unwrap()]).unwrap();
        let text = render_text(&layout(&kb), &GlyphSet::ASCII);
        assert_eq!(text, "A  +  \n   | R\nB  +  \n");
    }

    #[test]
    fn names_are_padded_to_the_widest_variable() {
        let kb = KnowledgeBase::from_rules([Rule::parse("long & x -> R").unwrap()]).unwrap();
        let rows = rows(&layout(&kb), None, &GlyphSet::UNICODE);
        assert_eq!(rows[0].cells[0].text, "long");
        assert_eq!(rows[1].cells[0].text, "    ");
        assert_eq!(rows[2].cells[0].text, "x   ");
    }

    #[test]
    fn highlighting_follows_facts() {
        let kb = KnowledgeBase::from_rules([Rule::parse("A & B -> R").unwrap()]).unwrap();
        let facts: FactStore = ["A", "R"]
            .into_iter()
            .map(|n| Atom::positive(n).unwrap())
            .collect();
        let rows = rows(&layout(&kb), Some(&facts), &GlyphSet::UNICODE);
        assert!(rows[0].cells[0].highlight);
        assert!(!rows[2].cells[0].highlight);
        let label = rows[1].cells.last().unwrap();
        assert_eq!(label.text, "R");
        assert!(label.highlight);
        // Highlighting never changes the text.
        assert_eq!(
            rows.iter().map(Row::text).collect::<Vec<_>>(),
            super::rows(&layout(&kb), None, &GlyphSet::UNICODE)
                .iter()
                .map(Row::text)
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_layout_renders_nothing() {
        assert_eq!(render_text(&Layout::default(), &GlyphSet::UNICODE), "");
    }

    #[test]
    fn fact_listing_marks_negation() {
        let facts: FactStore = [Atom::positive("A").unwrap(), Atom::negative("B").unwrap()]
            .into_iter()
            .collect();
        assert_eq!(render_facts(&facts), "Known facts:\n - A\n - ¬B\n");
    }
}
