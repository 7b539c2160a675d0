//! The fact store: the set of atoms currently known to be true.
//!
//! Membership is exact `(name, polarity)` equality. An explicit `¬X` fact is a
//! different thing from the absence of `X`; only premise evaluation in the
//! inference engine reads absence as negation.

use std::collections::HashMap;

use serde::Serialize;

use crate::atom::Atom;

/// A set of atoms that remembers insertion order for display.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    order: Vec<Atom>,
    /// Name -> `[positive, negated]` presence.
    index: HashMap<String, [bool; 2]>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fact. Returns `false` if it was already present.
    pub fn insert(&mut self, atom: Atom) -> bool {
        let slots = self.index.entry(atom.name().to_string()).or_default();
        let slot = &mut slots[usize::from(atom.is_negated())];
        if *slot {
            return false;
        }
        *slot = true;
        self.order.push(atom);
        true
    }

    pub fn contains(&self, atom: &Atom) -> bool {
        self.contains_name(atom.name(), atom.is_negated())
    }

    /// Query by name and polarity without building an `Atom`.
    pub fn contains_name(&self, name: &str, negated: bool) -> bool {
        self.index
            .get(name)
            .is_some_and(|slots| slots[usize::from(negated)])
    }

    /// Whether the positive atom `name` is a known fact.
    ///
    /// This is the query renderers use for highlighting.
    pub fn holds(&self, name: &str) -> bool {
        self.contains_name(name, false)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Facts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Atom> {
        self.order.iter()
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.index.clear();
    }

    /// Whether every fact of `other` is also in `self`.
    pub fn is_superset(&self, other: &FactStore) -> bool {
        other.order.iter().all(|atom| self.contains(atom))
    }
}

impl PartialEq for FactStore {
    /// Set equality: insertion order is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.is_superset(other)
    }
}

impl Eq for FactStore {}

impl FromIterator<Atom> for FactStore {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        let mut store = Self::new();
        store.extend(iter);
        store
    }
}

impl Extend<Atom> for FactStore {
    fn extend<I: IntoIterator<Item = Atom>>(&mut self, iter: I) {
        for atom in iter {
            self.insert(atom);
        }
    }
}

impl Serialize for FactStore {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.order.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(name: &str) -> Atom {
        Atom::positive(name).unwrap()
    }

    #[test]
    fn insertion_is_idempotent() {
        let mut facts = FactStore::new();
        assert!(facts.insert(pos("A")));
        assert!(!facts.insert(pos("A")));
        assert_eq!(facts.len(), 1);
    }

    #[test]
    fn polarity_is_part_of_membership() {
        let mut facts = FactStore::new();
        facts.insert(Atom::negative("X").unwrap());
        assert!(facts.contains_name("X", true));
        assert!(!facts.holds("X"));
        assert!(!facts.contains(&pos("X")));
    }

    #[test]
    fn both_polarities_of_a_name_coexist() {
        let mut facts = FactStore::new();
        assert!(facts.insert(pos("X")));
        assert!(facts.insert(Atom::negative("X").unwrap()));
        assert!(!facts.insert(Atom::negative("X").unwrap()));
        assert!(facts.holds("X"));
        assert!(facts.contains_name("X", true));
        assert!(!facts.contains_name("Y", false));
        assert_eq!(facts.len(), 2);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let facts: FactStore = ["C", "A", "B", "A"].into_iter().map(pos).collect();
        let names: Vec<_> = facts.iter().map(Atom::name).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn equality_ignores_order() {
        let a: FactStore = ["A", "B"].into_iter().map(pos).collect();
        let b: FactStore = ["B", "A"].into_iter().map(pos).collect();
        assert_eq!(a, b);
        assert!(a.is_superset(&b));
    }

    #[test]
    fn clear_empties_the_store() {
        let mut facts: FactStore = ["A"].into_iter().map(pos).collect();
        facts.clear();
        assert!(facts.is_empty());
        assert!(!facts.holds("A"));
    }
}
