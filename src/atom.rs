//! Atoms: named propositions with a polarity.
//!
//! An `Atom` is the smallest unit of knowledge. Two atoms are equal iff their
//! names and polarities match exactly; `A` and `¬A` are distinct values.

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::error::{AtomError, AtomResult};

/// Characters that belong to the rule text syntax and may not appear in names.
const RESERVED: &[char] = &['&', ',', '!', '¬', '#'];

/// A named proposition, possibly negated.
///
/// Construction normalizes the name (trimmed, NFC) and rejects empty names and
/// reserved characters, so every `Atom` in the system is well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawAtom", into = "RawAtom")]
pub struct Atom {
    name: String,
    negated: bool,
}

impl Atom {
    /// Create an atom with an explicit polarity.
    pub fn new(name: &str, negated: bool) -> AtomResult<Self> {
        Ok(Self {
            name: normalize_name(name)?,
            negated,
        })
    }

    /// Create an asserted (positive) atom.
    pub fn positive(name: &str) -> AtomResult<Self> {
        Self::new(name, false)
    }

    /// Create a negated atom.
    pub fn negative(name: &str) -> AtomResult<Self> {
        Self::new(name, true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// The positive atom with the same name.
    pub fn to_positive(&self) -> Self {
        Self {
            name: self.name.clone(),
            negated: false,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "¬{}", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Validate and normalize an atom name.
///
/// Names are trimmed and NFC-normalized so that visually identical names
/// typed on different keyboards compare equal.
pub fn normalize_name(raw: &str) -> AtomResult<String> {
    let name: String = raw.trim().nfc().collect();
    if name.is_empty() {
        return Err(AtomError::EmptyName);
    }
    if let Some(found) = name
        .chars()
        .find(|c| c.is_whitespace() || RESERVED.contains(c))
    {
        return Err(AtomError::ReservedChar { name, found });
    }
    if name.contains("->") || name.contains("=>") {
        let found = if name.contains("->") { '-' } else { '=' };
        return Err(AtomError::ReservedChar { name, found });
    }
    Ok(name)
}

/// Unvalidated wire form used by serde.
#[derive(Serialize, Deserialize)]
struct RawAtom {
    name: String,
    #[serde(default)]
    negated: bool,
}

impl TryFrom<RawAtom> for Atom {
    type Error = AtomError;

    fn try_from(raw: RawAtom) -> AtomResult<Self> {
        Atom::new(&raw.name, raw.negated)
    }
}

impl From<Atom> for RawAtom {
    fn from(atom: Atom) -> Self {
        Self {
            name: atom.name,
            negated: atom.negated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_requires_name_and_polarity() {
        let a = Atom::positive("A").unwrap();
        let not_a = Atom::negative("A").unwrap();
        assert_ne!(a, not_a);
        assert_eq!(a, Atom::new("A", false).unwrap());
        assert_eq!(not_a.to_positive(), a);
    }

    #[test]
    fn empty_names_are_rejected() {
        assert!(matches!(Atom::positive(""), Err(AtomError::EmptyName)));
        assert!(matches!(Atom::positive("   "), Err(AtomError::EmptyName)));
    }

    #[test]
    fn reserved_characters_are_rejected() {
        assert!(matches!(
            Atom::positive("a&b"),
            Err(AtomError::ReservedChar { found: '&', .. })
        ));
        assert!(matches!(
            Atom::positive("two words"),
            Err(AtomError::ReservedChar { found: ' ', .. })
        ));
        assert!(Atom::positive("a->b").is_err());
        assert!(Atom::positive("door_open").is_ok());
        assert!(Atom::positive("x-ray").is_ok());
    }

    #[test]
    fn names_are_trimmed_and_nfc_normalized() {
        let composed = Atom::positive("caf\u{e9}").unwrap();
        let decomposed = Atom::positive(" cafe\u{301} ").unwrap();
        assert_eq!(composed, decomposed);
        assert_eq!(decomposed.name(), "caf\u{e9}");
    }

    #[test]
    fn display_marks_negation() {
        assert_eq!(Atom::negative("R3").unwrap().to_string(), "¬R3");
        assert_eq!(Atom::positive("R3").unwrap().to_string(), "R3");
    }

    #[test]
    fn deserialization_validates() {
        let ok: Atom = serde_json::from_str(r#"{"name":"C","negated":true}"#).unwrap();
        assert!(ok.is_negated());
        assert!(serde_json::from_str::<Atom>(r#"{"name":""}"#).is_err());
    }
}
