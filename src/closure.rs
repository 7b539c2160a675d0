//! Cascading deletion: keeping the rule set consistent after a removal.
//!
//! Removing an input strips it from every premise list. Any rule left with no
//! premises is dead, so it is removed too, its label is stripped from the
//! remaining rules, and the cascade continues until nothing else empties.
//!
//! The cascade is a worklist over conclusion labels with a processed set, so
//! every label is handled at most once and the closure always terminates.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::kb::KnowledgeBase;

/// Result of a deletion cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClosureReport {
    /// Labels of removed rules, in removal order.
    pub removed_rules: Vec<String>,
    /// Inert (conclusion-less) rules dropped because they lost all premises.
    pub removed_inert: usize,
    /// Premise occurrences stripped across all rules.
    pub stripped_premises: usize,
    /// Longest chain of removals triggered by the initial one.
    pub cascade_depth: usize,
}

impl ClosureReport {
    /// Whether the operation changed nothing.
    pub fn is_noop(&self) -> bool {
        self.removed_rules.is_empty() && self.removed_inert == 0 && self.stripped_premises == 0
    }
}

/// Remove the input `name` and every rule that transitively depended on it.
///
/// A name that no rule references is a no-op.
pub fn remove_variable(kb: &mut KnowledgeBase, name: &str) -> ClosureReport {
    let mut report = ClosureReport::default();
    let mut queue = VecDeque::new();
    strip(kb, name, 1, &mut queue, &mut report);
    cascade(kb, queue, &mut report);
    tracing::debug!(
        name,
        removed = report.removed_rules.len(),
        stripped = report.stripped_premises,
        "removed variable"
    );
    report
}

/// Remove the rule concluding `label` and every rule that transitively
/// depended on it.
pub fn remove_rule(kb: &mut KnowledgeBase, label: &str) -> ClosureReport {
    let mut report = ClosureReport::default();
    let queue = VecDeque::from([(label.to_string(), 0)]);
    cascade(kb, queue, &mut report);
    tracing::debug!(
        label,
        removed = report.removed_rules.len(),
        depth = report.cascade_depth,
        "removed rule"
    );
    report
}

/// Drain the worklist of labels whose rules must go.
fn cascade(
    kb: &mut KnowledgeBase,
    mut queue: VecDeque<(String, usize)>,
    report: &mut ClosureReport,
) {
    let mut processed: HashSet<String> = HashSet::new();

    while let Some((label, depth)) = queue.pop_front() {
        if !processed.insert(label.clone()) {
            continue;
        }
        if kb.remove_by_conclusion_name(&label) {
            tracing::trace!(%label, depth, "rule removed by closure");
            report.removed_rules.push(label.clone());
            report.cascade_depth = report.cascade_depth.max(depth);
        }
        strip(kb, &label, depth + 1, &mut queue, report);
    }
}

/// Strip `name` from every premise list and enqueue the labels of rules that
/// became empty because of it. Inert rules that empty out are dropped directly.
fn strip(
    kb: &mut KnowledgeBase,
    name: &str,
    depth: usize,
    queue: &mut VecDeque<(String, usize)>,
    report: &mut ClosureReport,
) {
    let mut emptied_inert = false;
    for rule in kb.rules_mut().iter_mut() {
        let removed = rule.remove_premises_named(name);
        if removed == 0 {
            continue;
        }
        report.stripped_premises += removed;
        if rule.is_dead() {
            match rule.label() {
                Some(label) => queue.push_back((label.to_string(), depth)),
                None => emptied_inert = true,
            }
        }
    }
    if emptied_inert {
        let rules = kb.rules_mut();
        let before = rules.len();
        rules.retain(|r| !(r.is_inert() && r.is_dead()));
        report.removed_inert += before - rules.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    fn kb(lines: &[&str]) -> KnowledgeBase {
        KnowledgeBase::from_rules(lines.iter().map(|l| Rule::parse(l).unwrap())).unwrap()
    }

    fn labels(kb: &KnowledgeBase) -> Vec<&str> {
        kb.rules().iter().filter_map(Rule::label).collect()
    }

    #[test]
    fn losing_one_premise_does_not_cascade() {
        let mut kb = KnowledgeBase::example().unwrap();
        let report = remove_variable(&mut kb, "D");
        assert!(report.removed_rules.is_empty());
        assert_eq!(report.stripped_premises, 2);
        assert_eq!(labels(&kb), vec!["R1", "R2", "R3", "R4", "R5"]);
        assert_eq!(kb.find("R2").unwrap().to_string(), "!C & E -> R2");
        assert_eq!(kb.find("R4").unwrap().to_string(), "R1 & E -> R4");
    }

    #[test]
    fn emptied_rule_is_removed_and_cascades() {
        let mut kb = kb(&["X -> Y", "Y -> Z", "W -> V"]);
        let report = remove_variable(&mut kb, "X");
        assert_eq!(report.removed_rules, vec!["Y", "Z"]);
        assert_eq!(report.cascade_depth, 2);
        assert_eq!(labels(&kb), vec!["V"]);
    }

    #[test]
    fn removed_variable_is_gone_from_every_premise() {
        let mut kb = KnowledgeBase::example().unwrap();
        remove_variable(&mut kb, "C");
        assert!(kb.rules().iter().all(|r| !r.references("C")));
        assert_eq!(labels(&kb).len(), 5);
    }

    #[test]
    fn remove_rule_strips_its_label_downstream() {
        let mut kb = KnowledgeBase::example().unwrap();
        let report = remove_rule(&mut kb, "R1");
        assert_eq!(report.removed_rules, vec!["R1"]);
        assert_eq!(kb.find("R4").unwrap().to_string(), "D & E -> R4");
        assert!(kb.rules().iter().all(|r| !r.references("R1")));
    }

    #[test]
    fn remove_rule_cascades_through_chains() {
        let mut kb = kb(&["A -> B", "B -> C", "!C -> D", "C & A -> E"]);
        let report = remove_rule(&mut kb, "B");
        assert_eq!(report.removed_rules, vec!["B", "C", "D"]);
        assert_eq!(kb.find("E").unwrap().to_string(), "A -> E");
        assert!(kb.rules().iter().all(|r| report
            .removed_rules
            .iter()
            .all(|gone| !r.references(gone))));
    }

    #[test]
    fn diamond_dependencies_are_processed_once() {
        let mut kb = kb(&["X -> L", "X -> M", "L & M -> N"]);
        let report = remove_variable(&mut kb, "X");
        assert_eq!(report.removed_rules, vec!["L", "M", "N"]);
        assert!(kb.is_empty());
    }

    #[test]
    fn inert_rules_that_empty_are_dropped() {
        let mut kb = kb(&["X ->", "X & Y ->", "Y -> Z"]);
        let report = remove_variable(&mut kb, "X");
        assert_eq!(report.removed_inert, 1);
        assert_eq!(kb.len(), 2);
    }

    #[test]
    fn unknown_names_are_noops() {
        let mut kb = KnowledgeBase::example().unwrap();
        assert!(remove_variable(&mut kb, "nope").is_noop());
        assert!(remove_rule(&mut kb, "nope").is_noop());
        assert_eq!(kb, KnowledgeBase::example().unwrap());
    }
}
