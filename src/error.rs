//! Rich diagnostic error types for the regula rule engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes and help text so users know what was rejected and why.
//! Lookups that simply miss (removing an absent rule or input) are not errors:
//! they report `false` or an empty result instead.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for regula.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum RegulaError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Atom(#[from] AtomError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Kb(#[from] KbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Atom errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum AtomError {
    #[error("atom name is empty")]
    #[diagnostic(
        code(regula::atom::empty_name),
        help("Every proposition needs a non-empty name, e.g. `A` or `door_open`.")
    )]
    EmptyName,

    #[error("atom name \"{name}\" contains reserved character {found:?}")]
    #[diagnostic(
        code(regula::atom::reserved_char),
        help(
            "Names may not contain whitespace or any of `&`, `,`, `!`, `¬`, `#`, \
             and may not contain the arrow `->` or `=>`. \
             These characters belong to the rule text syntax."
        )
    )]
    ReservedChar { name: String, found: char },
}

// ---------------------------------------------------------------------------
// Rule errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RuleError {
    #[error("rule concluding \"{label}\" has no premises")]
    #[diagnostic(
        code(regula::rule::no_premises),
        help(
            "A rule with an empty premise list is treated as dead and would never fire. \
             Give it at least one premise."
        )
    )]
    NoPremises { label: String },

    #[error("rule concluding \"{label}\" uses its own conclusion as a premise")]
    #[diagnostic(
        code(regula::rule::self_reference),
        help("A rule cannot depend on the atom it derives; remove `{label}` from its premises.")
    )]
    SelfReference { label: String },

    #[error("line {line}: {message}")]
    #[diagnostic(
        code(regula::rule::parse),
        help("Rules are written as `A & !B & C -> R`, one per line. `#` starts a comment.")
    )]
    Parse { line: usize, message: String },

    #[error("line {line}: {source}")]
    #[diagnostic(code(regula::rule::parse_atom))]
    ParseAtom {
        line: usize,
        #[source]
        source: AtomError,
    },

    #[error("failed to read rule file: {path}")]
    #[diagnostic(
        code(regula::rule::read),
        help("Ensure the rule file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Knowledge base errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum KbError {
    #[error("a rule concluding \"{label}\" already exists")]
    #[diagnostic(
        code(regula::kb::duplicate_conclusion),
        help(
            "Each conclusion label may be derived by exactly one rule. \
             Remove the existing rule first, or pick another label."
        )
    )]
    DuplicateConclusion { label: String },

    #[error("\"{label}\" is already used as a premise by rule \"{user}\"")]
    #[diagnostic(
        code(regula::kb::forward_reference),
        help(
            "Rules are laid out in declaration order, so a new rule cannot conclude an atom \
             that an earlier rule already consumes. Choose a fresh label."
        )
    )]
    ForwardReference { label: String, user: String },
}

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SessionError {
    #[error("\"{name}\" is not an input")]
    #[diagnostic(
        code(regula::session::unknown_input),
        help("Only declared inputs (atoms never concluded by a rule) can be toggled.")
    )]
    UnknownInput { name: String },

    #[error("\"{name}\" is derived by a rule and cannot be used as an input")]
    #[diagnostic(
        code(regula::session::derived_name),
        help("Remove the rule concluding `{name}` first, or pick another input name.")
    )]
    DerivedName { name: String },

    #[error("input \"{name}\" is already declared")]
    #[diagnostic(code(regula::session::duplicate_input))]
    DuplicateInput { name: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(regula::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}: {message}")]
    #[diagnostic(
        code(regula::config::parse),
        help("Check the TOML syntax and the allowed values (glyphs = \"unicode\" | \"ascii\").")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(regula::config::write),
        help("Ensure you have write permissions to the target directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type RegulaResult<T> = std::result::Result<T, RegulaError>;
pub type AtomResult<T> = std::result::Result<T, AtomError>;
pub type RuleResult<T> = std::result::Result<T, RuleError>;
pub type KbResult<T> = std::result::Result<T, KbError>;
pub type SessionResult<T> = std::result::Result<T, SessionError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
