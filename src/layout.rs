//! Deterministic line/connector layout of a knowledge base.
//!
//! Inputs (variables) sit on even lines in lexicographic order. Each rule,
//! processed in declaration order, gets a vertical span joining the lines of
//! its premises and a label line where its conclusion is written. Later rules
//! can use that label line as a premise line, which is how chains are drawn.
//!
//! The layout is a pure function of the knowledge base (and of the extra
//! declared inputs passed to [`layout_with_inputs`]). Truth values never
//! influence placement; renderers use a [`FactStore`](crate::facts::FactStore)
//! only to decide highlighting.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::kb::KnowledgeBase;

// ---------------------------------------------------------------------------
// Glyphs
// ---------------------------------------------------------------------------

/// Connector shape drawn in a rule column on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    /// Opens the span on its top line.
    Top,
    /// Closes the span on its bottom line.
    Bottom,
    /// Junction with a premise, or a single-line span.
    Tee,
    /// Pass-through between premises.
    Vertical,
}

/// One connector cell: a glyph, plus the negation mark when the line holds a
/// negated premise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Connector {
    pub glyph: Glyph,
    pub negated: bool,
}

/// Which character set draws connectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphStyle {
    #[default]
    Unicode,
    Ascii,
}

/// Concrete strings for each [`Glyph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSet {
    pub vertical: &'static str,
    pub tee: &'static str,
    pub top: &'static str,
    pub bottom: &'static str,
}

impl GlyphSet {
    pub const UNICODE: GlyphSet = GlyphSet {
        vertical: "│",
        tee: "┤",
        top: "┐",
        bottom: "┘",
    };

    pub const ASCII: GlyphSet = GlyphSet {
        vertical: "|",
        tee: "+",
        top: "+",
        bottom: "+",
    };

    pub fn for_style(style: GlyphStyle) -> Self {
        match style {
            GlyphStyle::Unicode => Self::UNICODE,
            GlyphStyle::Ascii => Self::ASCII,
        }
    }

    pub fn get(&self, glyph: Glyph) -> &'static str {
        match glyph {
            Glyph::Top => self.top,
            Glyph::Bottom => self.bottom,
            Glyph::Tee => self.tee,
            Glyph::Vertical => self.vertical,
        }
    }
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self::UNICODE
    }
}

// ---------------------------------------------------------------------------
// Layout model
// ---------------------------------------------------------------------------

/// Placement of one rule column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSpan {
    /// Conclusion name, or empty for an inert rule.
    pub label: String,
    /// First line of the connector span. `None` when no premise resolved.
    pub top: Option<usize>,
    /// Last line of the connector span. `None` when no premise resolved.
    pub bottom: Option<usize>,
    /// Line on which the label is written.
    pub label_line: usize,
    /// Resolved premise lines mapped to whether that premise is negated.
    pub premise_lines: BTreeMap<usize, bool>,
}

impl RuleSpan {
    /// Width in characters of the label column.
    pub fn label_width(&self) -> usize {
        self.label.chars().count()
    }

    /// The connector drawn on `line`, or `None` outside the span.
    pub fn connector_at(&self, line: usize) -> Option<Connector> {
        let (top, bottom) = (self.top?, self.bottom?);
        if line < top || line > bottom {
            return None;
        }
        let premise = self.premise_lines.get(&line).copied();
        let glyph = if top == bottom {
            Glyph::Tee
        } else if line == top {
            Glyph::Top
        } else if line == bottom {
            Glyph::Bottom
        } else if premise.is_some() {
            Glyph::Tee
        } else {
            Glyph::Vertical
        };
        Some(Connector {
            glyph,
            negated: premise.unwrap_or(false),
        })
    }
}

/// The full line/connector model for a knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Layout {
    /// Total number of lines on the canvas.
    pub lines: usize,
    /// Variables in lexicographic order; variable `i` sits on line `2 * i`.
    pub variables: Vec<String>,
    /// Line of every variable.
    pub variable_line: BTreeMap<String, usize>,
    /// One span per rule, in declaration order.
    pub rule_spans: Vec<RuleSpan>,
}

impl Layout {
    /// The variable drawn on `line`, if any.
    pub fn variable_at(&self, line: usize) -> Option<&str> {
        if line % 2 != 0 {
            return None;
        }
        self.variables.get(line / 2).map(String::as_str)
    }

    /// Width of the variable name column: the longest name, at least one.
    pub fn name_width(&self) -> usize {
        self.variables
            .iter()
            .map(|v| v.chars().count())
            .max()
            .unwrap_or(0)
            .max(1)
    }

    /// The span drawn for the rule concluding `label`.
    pub fn span_for(&self, label: &str) -> Option<&RuleSpan> {
        self.rule_spans
            .iter()
            .find(|s| !s.label.is_empty() && s.label == label)
    }

    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }
}

// ---------------------------------------------------------------------------
// Layout engine
// ---------------------------------------------------------------------------

/// Lay out `kb` using only the variables its rules reference.
pub fn layout(kb: &KnowledgeBase) -> Layout {
    layout_with_inputs(kb, std::iter::empty::<&str>())
}

/// Lay out `kb`, adding `extra` inputs to the variable column even if no rule
/// references them yet. Names concluded by a rule are ignored.
///
/// With no variables at all the layout is empty: there is nothing to draw.
pub fn layout_with_inputs<'a>(
    kb: &'a KnowledgeBase,
    extra: impl IntoIterator<Item = &'a str>,
) -> Layout {
    let mut variable_set: BTreeSet<&str> = kb.variables();
    variable_set.extend(extra.into_iter().filter(|name| !kb.is_derived(name)));

    if variable_set.is_empty() {
        return Layout::default();
    }

    let variables: Vec<String> = variable_set.into_iter().map(str::to_string).collect();
    let variable_line: BTreeMap<String, usize> = variables
        .iter()
        .enumerate()
        .map(|(i, name)| (name.clone(), 2 * i))
        .collect();
    let mut lines = 2 * variables.len() - 1;

    // Name -> line lookup, extended with each processed rule's label line.
    let mut name_line: HashMap<&str, usize> = variable_line
        .iter()
        .map(|(name, line)| (name.as_str(), *line))
        .collect();

    let mut rule_spans = Vec::with_capacity(kb.len());
    for rule in kb.rules() {
        let mut premise_lines: BTreeMap<usize, bool> = BTreeMap::new();
        for premise in rule.premises() {
            match name_line.get(premise.name()) {
                Some(&line) => {
                    premise_lines.entry(line).or_insert(premise.is_negated());
                }
                None => tracing::warn!(
                    premise = premise.name(),
                    rule = %rule,
                    "premise not placed yet, dropped from layout"
                ),
            }
        }

        let span = premise_lines
            .keys()
            .next()
            .copied()
            .zip(premise_lines.keys().next_back().copied());

        let label_line = match span {
            None => {
                let line = lines;
                lines += 1;
                line
            }
            Some((top, bottom)) => {
                let line = choose_label_line(top, bottom);
                if line > bottom {
                    lines = lines.max(line + 1);
                }
                line
            }
        };

        if let Some(label) = rule.label() {
            name_line.insert(label, label_line);
        }

        rule_spans.push(RuleSpan {
            label: rule.label().unwrap_or_default().to_string(),
            top: span.map(|(t, _)| t),
            bottom: span.map(|(_, b)| b),
            label_line,
            premise_lines,
        });
    }

    tracing::debug!(lines, variables = variables.len(), rules = rule_spans.len(), "layout computed");

    Layout {
        lines,
        variables,
        variable_line,
        rule_spans,
    }
}

/// Pick the label line for a span covering `[top, bottom]`.
///
/// The midpoint is used if it is odd, then its odd neighbours inside the
/// span. A span with no odd line (a lone variable line) is labelled on the
/// line just below it, growing the canvas if needed.
fn choose_label_line(top: usize, bottom: usize) -> usize {
    let mid = (top + bottom) / 2;
    if mid % 2 == 1 {
        mid
    } else if mid < bottom {
        mid + 1
    } else if mid > top {
        mid - 1
    } else {
        bottom + 1
    }
}
