//! Export types for serializing engine state.
//!
//! These types flatten the layout model and inference results into
//! label-resolved, renderer-independent records suitable for JSON export.

use serde::{Deserialize, Serialize};

use crate::facts::FactStore;
use crate::infer::InferenceReport;
use crate::kb::KnowledgeBase;
use crate::layout::{Glyph, GlyphSet, Layout, RuleSpan};
use crate::render;

/// One variable and the line it is drawn on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableExport {
    pub name: String,
    pub line: usize,
}

/// One non-empty connector cell of a rule column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorExport {
    pub line: usize,
    /// `top`, `bottom`, `tee` or `vertical`.
    pub glyph: String,
    /// Whether the line holds a negated premise.
    pub negated: bool,
}

/// One rule column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleExport {
    /// Rule in text form, e.g. `A & !B -> R`.
    pub rule: String,
    /// Conclusion label (empty for inert rules).
    pub label: String,
    pub label_line: usize,
    /// Span bounds; absent when no premise could be placed.
    pub top: Option<usize>,
    pub bottom: Option<usize>,
    pub connectors: Vec<ConnectorExport>,
}

/// The full layout, plus its plain-text rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutExport {
    pub lines: usize,
    pub variables: Vec<VariableExport>,
    pub rules: Vec<RuleExport>,
    /// Rendered canvas, one string per line.
    pub text: Vec<String>,
}

/// Facts after inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactsExport {
    /// Every fact in insertion order, negated facts prefixed with `¬`.
    pub facts: Vec<String>,
    /// Facts added by inference, with the pass that derived them.
    pub derived: Vec<DerivedExport>,
    pub passes: usize,
    pub reached_fixpoint: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedExport {
    pub name: String,
    pub pass: usize,
}

fn glyph_name(glyph: Glyph) -> &'static str {
    match glyph {
        Glyph::Top => "top",
        Glyph::Bottom => "bottom",
        Glyph::Tee => "tee",
        Glyph::Vertical => "vertical",
    }
}

fn export_span(span: &RuleSpan, rule: String) -> RuleExport {
    let connectors = match (span.top, span.bottom) {
        (Some(top), Some(bottom)) => (top..=bottom)
            .filter_map(|line| {
                span.connector_at(line).map(|c| ConnectorExport {
                    line,
                    glyph: glyph_name(c.glyph).to_string(),
                    negated: c.negated,
                })
            })
            .collect(),
        _ => Vec::new(),
    };
    RuleExport {
        rule,
        label: span.label.clone(),
        label_line: span.label_line,
        top: span.top,
        bottom: span.bottom,
        connectors,
    }
}

impl LayoutExport {
    /// Flatten `layout` of `kb`. The rule spans and `kb.rules()` correspond
    /// one to one, in declaration order.
    pub fn new(kb: &KnowledgeBase, layout: &Layout, glyphs: &GlyphSet) -> Self {
        let variables = layout
            .variables
            .iter()
            .enumerate()
            .map(|(i, name)| VariableExport {
                name: name.clone(),
                line: 2 * i,
            })
            .collect();
        let rules = layout
            .rule_spans
            .iter()
            .zip(kb.rules())
            .map(|(span, rule)| export_span(span, rule.to_string()))
            .collect();
        let text = render::rows(layout, None, glyphs)
            .iter()
            .map(render::Row::text)
            .collect();
        Self {
            lines: layout.lines,
            variables,
            rules,
            text,
        }
    }
}

impl FactsExport {
    pub fn new(facts: &FactStore, report: &InferenceReport) -> Self {
        Self {
            facts: facts.iter().map(ToString::to_string).collect(),
            derived: report
                .derived
                .iter()
                .map(|d| DerivedExport {
                    name: d.conclusion.name().to_string(),
                    pass: d.pass,
                })
                .collect(),
            passes: report.passes,
            reached_fixpoint: report.reached_fixpoint,
        }
    }
}
