//! The knowledge base: an ordered sequence of rules.
//!
//! Declaration order matters twice: inference walks rules in this order within
//! a pass, and layout places each rule after everything it references. At most
//! one rule may conclude any given label; `append` enforces it.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::atom::Atom;
use crate::error::{KbError, KbResult, RegulaResult};
use crate::rule::Rule;

const EXAMPLE_RULES: &str = "\
A & B & C -> R1
!C & D & E -> R2
A & C -> R3
R1 & D & E -> R4
!R3 & B -> R5
";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KnowledgeBase {
    rules: Vec<Rule>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a knowledge base by appending `rules` in order.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> KbResult<Self> {
        let mut kb = Self::new();
        for rule in rules {
            kb.append(rule)?;
        }
        Ok(kb)
    }

    /// The five-rule example base over inputs `A`..`E`.
    ///
    /// ```text
    /// A & B & C  -> R1
    /// !C & D & E -> R2
    /// A & C      -> R3
    /// R1 & D & E -> R4
    /// !R3 & B    -> R5
    /// ```
    pub fn example() -> RegulaResult<Self> {
        let rules = crate::rule::parse_rules(EXAMPLE_RULES)?;
        Ok(Self::from_rules(rules)?)
    }

    /// Append a rule at the end of the sequence.
    ///
    /// Fails if another rule already concludes the same label.
    pub fn append(&mut self, rule: Rule) -> KbResult<()> {
        if let Some(label) = rule.label() {
            if self.find(label).is_some() {
                return Err(KbError::DuplicateConclusion {
                    label: label.to_string(),
                });
            }
        }
        tracing::debug!(rule = %rule, "appending rule");
        self.rules.push(rule);
        Ok(())
    }

    /// Remove the first rule whose conclusion is named `label`.
    ///
    /// Returns `false` when no rule matches or `label` is empty.
    pub fn remove_by_conclusion_name(&mut self, label: &str) -> bool {
        if label.is_empty() {
            return false;
        }
        match self.position(label) {
            Some(idx) => {
                self.rules.remove(idx);
                true
            }
            None => false,
        }
    }

    /// The rule concluding `label`, if any.
    pub fn find(&self, label: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.label() == Some(label))
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.label() == Some(label))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub(crate) fn rules_mut(&mut self) -> &mut Vec<Rule> {
        &mut self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names concluded by some rule, sorted.
    pub fn conclusions(&self) -> BTreeSet<&str> {
        self.rules.iter().filter_map(Rule::label).collect()
    }

    /// Whether some rule concludes `name`.
    pub fn is_derived(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Premise names never concluded by any rule, in lexicographic order.
    ///
    /// These are the inputs a user toggles.
    pub fn variables(&self) -> BTreeSet<&str> {
        let conclusions = self.conclusions();
        self.rules
            .iter()
            .flat_map(|r| r.premises().iter().map(Atom::name))
            .filter(|name| !conclusions.contains(name))
            .collect()
    }

    /// The first rule (in declaration order) with a premise named `name`.
    pub fn first_user_of(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.references(name))
    }
}
