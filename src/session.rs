//! An editing session over one knowledge base.
//!
//! The session owns the rules, the on/off state of every input, and the
//! current derived facts and layout. Every command (toggle, add or remove an
//! input, add or remove a rule) is followed by a full inference and layout
//! cycle, so [`Session::facts`] and [`Session::layout`] are always in sync
//! with the rules and inputs.

use std::collections::{BTreeMap, BTreeSet};

use crate::atom::{Atom, normalize_name};
use crate::closure::{self, ClosureReport};
use crate::config::InitialInputs;
use crate::error::{KbError, RegulaResult, SessionError, SessionResult};
use crate::facts::FactStore;
use crate::infer::{InferenceConfig, InferenceEngine, InferenceReport};
use crate::kb::KnowledgeBase;
use crate::layout::{Layout, layout_with_inputs};
use crate::rule::Rule;

pub struct Session {
    kb: KnowledgeBase,
    /// Truth value of every input, keyed by name (lexicographic = line order).
    inputs: BTreeMap<String, bool>,
    /// Inputs added explicitly; kept even while no rule references them.
    declared: BTreeSet<String>,
    engine: InferenceEngine,
    facts: FactStore,
    layout: Layout,
    report: InferenceReport,
}

impl Session {
    /// Start a session over `kb` with every input set according to `initial`.
    pub fn new(kb: KnowledgeBase, initial: InitialInputs, inference: InferenceConfig) -> Self {
        let mut session = Self {
            kb,
            inputs: BTreeMap::new(),
            declared: BTreeSet::new(),
            engine: InferenceEngine::new(inference),
            facts: FactStore::new(),
            layout: Layout::default(),
            report: InferenceReport {
                derived: Vec::new(),
                passes: 0,
                reached_fixpoint: true,
            },
        };
        session.sync_inputs();
        session.set_all(initial.is_on());
        session
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn kb(&self) -> &KnowledgeBase {
        &self.kb
    }

    pub fn facts(&self) -> &FactStore {
        &self.facts
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Report of the most recent inference run.
    pub fn report(&self) -> &InferenceReport {
        &self.report
    }

    /// Inputs and their states, in line order.
    pub fn inputs(&self) -> impl Iterator<Item = (&str, bool)> {
        self.inputs.iter().map(|(name, on)| (name.as_str(), *on))
    }

    /// State of input `name`, or `None` if it is not an input.
    pub fn input(&self, name: &str) -> Option<bool> {
        self.inputs.get(name).copied()
    }

    /// Name of the `index`-th input in line order.
    pub fn input_at(&self, index: usize) -> Option<&str> {
        self.inputs.keys().nth(index).map(String::as_str)
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the positive atom `name` currently holds.
    pub fn holds(&self, name: &str) -> bool {
        self.facts.holds(name)
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Flip input `name`. Returns its new state.
    pub fn toggle_input(&mut self, name: &str) -> SessionResult<bool> {
        let state = self
            .inputs
            .get_mut(name)
            .ok_or_else(|| SessionError::UnknownInput {
                name: name.to_string(),
            })?;
        *state = !*state;
        let now = *state;
        tracing::info!(input = name, on = now, "toggled input");
        self.refresh();
        Ok(now)
    }

    /// Set every input to `on`.
    pub fn set_all(&mut self, on: bool) {
        for state in self.inputs.values_mut() {
            *state = on;
        }
        self.refresh();
    }

    /// Declare a new input, initially off.
    pub fn add_input(&mut self, name: &str) -> RegulaResult<()> {
        let name = normalize_name(name)?;
        if self.kb.is_derived(&name) {
            return Err(SessionError::DerivedName { name }.into());
        }
        if self.inputs.contains_key(&name) {
            return Err(SessionError::DuplicateInput { name }.into());
        }
        tracing::info!(input = %name, "added input");
        self.declared.insert(name.clone());
        self.inputs.insert(name, false);
        self.refresh();
        Ok(())
    }

    /// Remove input `name` and every rule that depended on it.
    pub fn remove_input(&mut self, name: &str) -> SessionResult<ClosureReport> {
        if !self.inputs.contains_key(name) {
            return Err(SessionError::UnknownInput {
                name: name.to_string(),
            });
        }
        self.declared.remove(name);
        self.inputs.remove(name);
        let report = closure::remove_variable(&mut self.kb, name);
        tracing::info!(
            input = name,
            removed_rules = ?report.removed_rules,
            "removed input"
        );
        self.refresh();
        Ok(report)
    }

    /// Append `rule` to the knowledge base.
    ///
    /// Premises naming unknown atoms become new inputs, initially off. The
    /// rule's label may not already be used as a premise by another rule:
    /// layout places rules in declaration order, so that premise would never
    /// be drawn.
    pub fn add_rule(&mut self, rule: Rule) -> RegulaResult<()> {
        if let Some(label) = rule.label() {
            if let Some(user) = self.kb.first_user_of(label) {
                return Err(KbError::ForwardReference {
                    label: label.to_string(),
                    user: user.to_string(),
                }
                .into());
            }
            if self.kb.is_derived(label) {
                return Err(KbError::DuplicateConclusion {
                    label: label.to_string(),
                }
                .into());
            }
        }
        let label = rule.label().map(str::to_string);
        let text = rule.to_string();
        self.kb.append(rule)?;
        if let Some(label) = label {
            // A declared input that nothing used yet becomes derived.
            self.declared.remove(&label);
            self.inputs.remove(&label);
        }
        tracing::info!(rule = %text, "added rule");
        self.refresh();
        Ok(())
    }

    /// Parse `text` as a rule and append it.
    pub fn add_rule_text(&mut self, text: &str) -> RegulaResult<()> {
        self.add_rule(Rule::parse(text)?)
    }

    /// Build a rule from `(name, negated)` premises and a conclusion label,
    /// then append it.
    pub fn add_rule_parts(
        &mut self,
        premises: &[(&str, bool)],
        conclusion: &str,
    ) -> RegulaResult<()> {
        let premises = premises
            .iter()
            .map(|(name, negated)| Atom::new(name, *negated))
            .collect::<Result<Vec<_>, _>>()?;
        let rule = Rule::new(premises, Atom::positive(conclusion)?)?;
        self.add_rule(rule)
    }

    /// Remove the rule concluding `label` and everything that depended on it.
    ///
    /// Returns `None` when no rule concludes `label`.
    pub fn remove_rule(&mut self, label: &str) -> Option<ClosureReport> {
        if !self.kb.is_derived(label) {
            return None;
        }
        let report = closure::remove_rule(&mut self.kb, label);
        tracing::info!(
            label,
            removed_rules = ?report.removed_rules,
            "removed rule"
        );
        self.refresh();
        Some(report)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Recompute layout and facts from the current rules and inputs.
    fn refresh(&mut self) {
        self.sync_inputs();
        let seeds: Vec<Atom> = self
            .inputs
            .iter()
            .filter(|(_, on)| **on)
            .filter_map(|(name, _)| Atom::positive(name).ok())
            .collect();
        let (facts, report) = self.engine.infer(&self.kb, seeds);
        self.facts = facts;
        self.report = report;
    }

    /// Recompute the layout and make `inputs` track exactly its variables.
    /// New inputs start off; inputs that disappeared are forgotten.
    fn sync_inputs(&mut self) {
        self.layout = layout_with_inputs(&self.kb, self.declared.iter().map(String::as_str));
        let variables: BTreeSet<&str> = self.layout.variables.iter().map(String::as_str).collect();
        self.inputs.retain(|name, _| variables.contains(name.as_str()));
        for name in variables {
            self.inputs.entry(name.to_string()).or_insert(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegulaError;

    fn example(initial: InitialInputs) -> Session {
        Session::new(KnowledgeBase::example().unwrap(), initial, InferenceConfig::default())
    }

    fn true_names(session: &Session) -> Vec<String> {
        let mut v: Vec<String> = session.facts().iter().map(|a| a.to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn all_on_derives_the_example_conclusions() {
        let session = example(InitialInputs::AllOn);
        assert_eq!(
            true_names(&session),
            vec!["A", "B", "C", "D", "E", "R1", "R3", "R4"]
        );
        assert_eq!(session.input_count(), 5);
    }

    #[test]
    fn toggling_reruns_inference() {
        let mut session = example(InitialInputs::AllOn);
        assert!(!session.toggle_input("A").unwrap());
        assert!(!session.toggle_input("C").unwrap());
        assert_eq!(true_names(&session), vec!["B", "D", "E", "R2", "R5"]);
    }

    #[test]
    fn toggling_an_unknown_input_fails() {
        let mut session = example(InitialInputs::AllOff);
        assert!(matches!(
            session.toggle_input("R1"),
            Err(SessionError::UnknownInput { .. })
        ));
    }

    #[test]
    fn all_off_derives_nothing_for_the_example() {
        let session = example(InitialInputs::AllOff);
        // R5 needs B and R2 needs D and E, so nothing fires.
        assert!(session.facts().is_empty());
        assert_eq!(session.input_at(0), Some("A"));
    }

    #[test]
    fn added_input_is_laid_out_and_toggleable() {
        let mut session = example(InitialInputs::AllOff);
        session.add_input("F").unwrap();
        assert_eq!(session.layout().variable_line["F"], 10);
        assert!(session.toggle_input("F").unwrap());
        assert!(session.holds("F"));
    }

    #[test]
    fn add_input_rejects_derived_and_duplicate_names() {
        let mut session = example(InitialInputs::AllOff);
        assert!(matches!(
            session.add_input("R1"),
            Err(RegulaError::Session(SessionError::DerivedName { .. }))
        ));
        assert!(matches!(
            session.add_input("A"),
            Err(RegulaError::Session(SessionError::DuplicateInput { .. }))
        ));
        assert!(matches!(session.add_input("a b"), Err(RegulaError::Atom(_))));
    }

    #[test]
    fn removing_an_input_cascades_and_relayouts() {
        let mut session = example(InitialInputs::AllOn);
        let report = session.remove_input("D").unwrap();
        assert!(report.removed_rules.is_empty());
        assert_eq!(session.input("D"), None);
        assert_eq!(session.layout().variables, vec!["A", "B", "C", "E"]);
        assert!(session.holds("R4"));
    }

    #[test]
    fn add_rule_with_new_premise_creates_an_input() {
        let mut session = example(InitialInputs::AllOn);
        session.add_rule_text("R4 & !G -> R6").unwrap();
        assert_eq!(session.input("G"), Some(false));
        assert!(session.holds("R6"));
        session.toggle_input("G").unwrap();
        assert!(!session.holds("R6"));
    }

    #[test]
    fn add_rule_parts_builds_the_rule() {
        let mut session = example(InitialInputs::AllOff);
        session.add_rule_parts(&[("B", false), ("R1", true)], "R7").unwrap();
        assert_eq!(session.kb().find("R7").unwrap().to_string(), "B & !R1 -> R7");
    }

    #[test]
    fn add_rule_rejects_labels_already_consumed() {
        let mut session = example(InitialInputs::AllOn);
        let err = session.add_rule_text("A -> E").unwrap_err();
        assert!(matches!(err, RegulaError::Kb(KbError::ForwardReference { .. })));
        let err = session.add_rule_text("A -> R2").unwrap_err();
        assert!(matches!(err, RegulaError::Kb(KbError::DuplicateConclusion { .. })));
        assert_eq!(session.kb().len(), 5);
    }

    #[test]
    fn add_rule_can_derive_an_unused_declared_input() {
        let mut session = example(InitialInputs::AllOn);
        session.add_input("F").unwrap();
        session.add_rule_text("A -> F").unwrap();
        assert_eq!(session.input("F"), None);
        assert!(session.holds("F"));
    }

    #[test]
    fn remove_rule_cascades_and_reports_misses() {
        let mut session = example(InitialInputs::AllOn);
        assert!(session.remove_rule("nope").is_none());
        assert!(session.remove_rule("A").is_none());
        let report = session.remove_rule("R3").unwrap();
        assert_eq!(report.removed_rules, vec!["R3"]);
        // R5 lost !R3 but keeps B, so it now fires.
        assert!(session.holds("R5"));
        assert_eq!(session.input("A"), Some(true));
    }

    #[test]
    fn inputs_only_used_by_removed_rules_disappear() {
        let mut session = Session::new(
            KnowledgeBase::from_rules([Rule::parse("X & Y -> Z").unwrap()]).unwrap(),
            InitialInputs::AllOn,
            InferenceConfig::default(),
        );
        session.remove_rule("Z").unwrap();
        assert_eq!(session.input_count(), 0);
        assert!(session.layout().is_empty());
    }
}
