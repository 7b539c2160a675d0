//! Rules: ordered conjunctions of premises implying a labeled conclusion.
//!
//! Rules are plain data. They can be built programmatically or parsed from the
//! one-rule-per-line text format:
//!
//! ```text
//! # comments start with '#'
//! A & B & C -> R1
//! !C & D & E -> R2
//! ¬R3, B => R5
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::atom::Atom;
use crate::error::{RuleError, RuleResult};

/// `premises -> conclusion`, accepting `=>` as the arrow too.
static RE_RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<premises>.*?)\s*(?:->|=>)\s*(?P<conclusion>.*?)\s*$").unwrap()
});

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// A conjunction of premises plus an optional conclusion.
///
/// Premise order is preserved: it does not change what a rule means, but it
/// decides how the rule's connector is drawn. A rule without a conclusion is
/// inert: it never fires and is drawn without a label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    premises: Vec<Atom>,
    conclusion: Option<Atom>,
}

impl Rule {
    /// Create a rule deriving `conclusion` (always stored positive).
    ///
    /// Rejects an empty premise list and premises naming the conclusion itself.
    pub fn new(premises: Vec<Atom>, conclusion: Atom) -> RuleResult<Self> {
        let conclusion = conclusion.to_positive();
        if premises.is_empty() {
            return Err(RuleError::NoPremises {
                label: conclusion.name().to_string(),
            });
        }
        if premises.iter().any(|p| p.name() == conclusion.name()) {
            return Err(RuleError::SelfReference {
                label: conclusion.name().to_string(),
            });
        }
        Ok(Self {
            premises,
            conclusion: Some(conclusion),
        })
    }

    /// Create a rule without a conclusion.
    pub fn inert(premises: Vec<Atom>) -> RuleResult<Self> {
        if premises.is_empty() {
            return Err(RuleError::NoPremises {
                label: String::new(),
            });
        }
        Ok(Self {
            premises,
            conclusion: None,
        })
    }

    /// Parse a single rule from its text form, e.g. `A & !B -> R`.
    ///
    /// An empty conclusion (`A & B ->`) yields an inert rule.
    pub fn parse(line: &str) -> RuleResult<Self> {
        parse_line(line, 1)
    }

    pub fn premises(&self) -> &[Atom] {
        &self.premises
    }

    pub fn conclusion(&self) -> Option<&Atom> {
        self.conclusion.as_ref()
    }

    /// The conclusion's name, if the rule has one.
    pub fn label(&self) -> Option<&str> {
        self.conclusion.as_ref().map(Atom::name)
    }

    pub fn is_inert(&self) -> bool {
        self.conclusion.is_none()
    }

    /// A rule whose premise list has become empty can never fire.
    pub fn is_dead(&self) -> bool {
        self.premises.is_empty()
    }

    /// Whether any premise (of either polarity) names `name`.
    pub fn references(&self, name: &str) -> bool {
        self.premises.iter().any(|p| p.name() == name)
    }

    /// Remove every premise named `name`, whatever its polarity.
    /// Returns how many premises were removed.
    pub(crate) fn remove_premises_named(&mut self, name: &str) -> usize {
        let before = self.premises.len();
        self.premises.retain(|p| p.name() != name);
        before - self.premises.len()
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let premises: Vec<String> = self
            .premises
            .iter()
            .map(|p| {
                if p.is_negated() {
                    format!("!{}", p.name())
                } else {
                    p.name().to_string()
                }
            })
            .collect();
        write!(f, "{} ->", premises.join(" & "))?;
        if let Some(label) = self.label() {
            write!(f, " {label}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Text format
// ---------------------------------------------------------------------------

/// Parse a whole rule file's contents. Blank lines and `#` comments are skipped.
pub fn parse_rules(text: &str) -> RuleResult<Vec<Rule>> {
    let mut rules = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        rules.push(parse_line(line, idx + 1)?);
    }
    Ok(rules)
}

/// Read and parse a rule file.
pub fn load_rules(path: &Path) -> RuleResult<Vec<Rule>> {
    let text = std::fs::read_to_string(path).map_err(|source| RuleError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_rules(&text)
}

/// Parse one premise token: `A`, `!A` or `¬A`.
pub fn parse_premise(token: &str) -> Result<Atom, crate::error::AtomError> {
    let token = token.trim();
    match token.strip_prefix('!').or_else(|| token.strip_prefix('¬')) {
        Some(rest) => Atom::negative(rest),
        None => Atom::positive(token),
    }
}

fn parse_line(line: &str, line_no: usize) -> RuleResult<Rule> {
    let caps = RE_RULE.captures(line.trim()).ok_or_else(|| RuleError::Parse {
        line: line_no,
        message: format!("expected `premises -> conclusion`, got '{}'", line.trim()),
    })?;

    let premises_text = &caps["premises"];
    if premises_text.trim().is_empty() {
        return Err(RuleError::Parse {
            line: line_no,
            message: "rule has no premises".to_string(),
        });
    }

    let premises = premises_text
        .split(['&', ','])
        .map(|token| {
            parse_premise(token).map_err(|source| RuleError::ParseAtom {
                line: line_no,
                source,
            })
        })
        .collect::<RuleResult<Vec<Atom>>>()?;

    let conclusion_text = &caps["conclusion"];
    if conclusion_text.is_empty() {
        return Rule::inert(premises);
    }
    if conclusion_text.starts_with('!') || conclusion_text.starts_with('¬') {
        return Err(RuleError::Parse {
            line: line_no,
            message: format!("conclusion '{conclusion_text}' cannot be negated"),
        });
    }
    let conclusion = Atom::positive(conclusion_text).map_err(|source| RuleError::ParseAtom {
        line: line_no,
        source,
    })?;
    Rule::new(premises, conclusion)
}
