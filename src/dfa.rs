//! The automaton-builder pipeline.
//!
//! A lexer DFA is authored as a compact list of transition rules, one per
//! `(from, symbols, to)` group, where the symbol field may be a bracketed
//! character class such as `[a-zA-Z]`. [`Automaton::build`] expands the
//! rules into an explicit description: the full alphabet, the state set,
//! the start and accept states, and one transition per `(from, symbol,
//! to)` triple. The description renders to a line-oriented text format via
//! [`Automaton`]'s `Display` impl and is consumed by a table-driven lexer
//! at startup.
//!
//! Accept states are declared by the rule author, not computed;
//! [`Automaton::validate`] cross-checks the declaration against the
//! transition relation and reports inconsistencies as warnings.

mod automaton;
mod rules;

pub use automaton::{Automaton, Transition, Warning};
pub use rules::{BUILTIN_RULES, Rule, RuleSet};

/// Automaton state name. States are short labels like `0`, `4A` or `FG`.
pub type StateId = crate::Symbol;
