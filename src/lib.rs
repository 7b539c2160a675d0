// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # regula
//!
//! A propositional forward-chaining rule engine with negation-as-failure,
//! cascading rule deletion, and a deterministic text layout of the rule graph.
//!
//! ## Architecture
//!
//! - **Knowledge** (`atom`, `rule`, `kb`, `facts`): atoms, rules, the ordered
//!   rule base, and the fact set
//! - **Inference** (`infer`): full passes in declaration order until fixpoint
//! - **Edit closure** (`closure`): removing an input or rule prunes everything
//!   that depended on it
//! - **Layout** (`layout`, `render`): line/connector model and its text form
//! - **Session** (`session`, `tui`): toggle inputs, edit rules, re-infer
//!
//! ## Library usage
//!
//! ```
//! use regula::infer::InferenceEngine;
//! use regula::kb::KnowledgeBase;
//! use regula::atom::Atom;
//!
//! let kb = KnowledgeBase::example().unwrap();
//! let seeds = ["B", "D", "E"].map(|n| Atom::positive(n).unwrap());
//! let (facts, _report) = InferenceEngine::default().infer(&kb, seeds);
//! assert!(facts.holds("R2"));
//! assert!(facts.holds("R5"));
//! ```

pub mod atom;
pub mod closure;
pub mod config;
pub mod error;
pub mod export;
pub mod facts;
pub mod infer;
pub mod kb;
pub mod layout;
pub mod render;
pub mod rule;
pub mod session;
pub mod tui;
