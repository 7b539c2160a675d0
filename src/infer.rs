//! Forward-chaining inference with negation-as-failure.
//!
//! Runs full passes over the knowledge base in declaration order until a pass
//! derives nothing new. A positive premise `p` holds iff `p` is a fact; a
//! negated premise `¬p` holds iff the positive `p` is *absent* at the moment it
//! is checked. Conclusions are inserted immediately, so a fact derived early in
//! a pass is visible to every rule after it in the same pass. Facts are never
//! retracted, even if a later fact falsifies the negated premise that let a
//! rule fire.

use serde::Serialize;

use crate::atom::Atom;
use crate::facts::FactStore;
use crate::kb::KnowledgeBase;
use crate::rule::Rule;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the inference engine.
#[derive(Debug, Clone, Default)]
pub struct InferenceConfig {
    /// Optional cap on the number of passes. `None` runs to fixpoint, which
    /// always terminates because facts only grow over a finite set of names.
    pub max_passes: Option<usize>,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One rule firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derivation {
    pub conclusion: Atom,
    /// 1-based pass in which the rule fired.
    pub pass: usize,
}

/// Summary of an inference run.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceReport {
    pub derived: Vec<Derivation>,
    /// Passes executed, including the final pass that derived nothing.
    pub passes: usize,
    pub reached_fixpoint: bool,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InferenceEngine {
    config: InferenceConfig,
}

impl InferenceEngine {
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Seed a fresh fact store with `initial` and run it to fixpoint.
    pub fn infer(
        &self,
        kb: &KnowledgeBase,
        initial: impl IntoIterator<Item = Atom>,
    ) -> (FactStore, InferenceReport) {
        let mut facts: FactStore = initial.into_iter().collect();
        let report = self.forward_chain(kb, &mut facts);
        (facts, report)
    }

    /// Run forward chaining over `facts` in place.
    pub fn forward_chain(&self, kb: &KnowledgeBase, facts: &mut FactStore) -> InferenceReport {
        let mut derived = Vec::new();
        let mut passes = 0;
        let mut reached_fixpoint = false;

        loop {
            if self.config.max_passes.is_some_and(|max| passes >= max) {
                tracing::warn!(passes, "inference stopped at pass cap before fixpoint");
                break;
            }
            passes += 1;

            let mut changed = false;
            for rule in kb.rules() {
                let Some(conclusion) = rule.conclusion() else {
                    continue;
                };
                if !premises_satisfied(rule, facts) {
                    continue;
                }
                if facts.insert(conclusion.to_positive()) {
                    tracing::trace!(pass = passes, %conclusion, "rule fired");
                    derived.push(Derivation {
                        conclusion: conclusion.to_positive(),
                        pass: passes,
                    });
                    changed = true;
                }
            }

            tracing::debug!(pass = passes, total_facts = facts.len(), changed, "inference pass");
            if !changed {
                reached_fixpoint = true;
                break;
            }
        }

        InferenceReport {
            derived,
            passes,
            reached_fixpoint,
        }
    }
}

/// Whether every premise of `rule` holds against `facts` right now.
///
/// Rules with no premises are dead and never satisfied.
pub fn premises_satisfied(rule: &Rule, facts: &FactStore) -> bool {
    if rule.is_dead() {
        return false;
    }
    rule.premises().iter().all(|p| {
        let present = facts.holds(p.name());
        if p.is_negated() { !present } else { present }
    })
}
