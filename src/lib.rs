//! Build-time table tools for a table-driven compiler front end.
//!
//! The crate hosts two independent pipelines:
//!
//! * [`dfa`] expands a hand-authored set of transition rules into an
//!   explicit DFA description in a line-oriented text format, ready to be
//!   loaded by a table-driven lexer.
//! * [`slr`] recovers the ACTION/GOTO tables of an SLR(1) parser from a
//!   fixed-width textual report and re-emits them as initialization code.
//!
//! Both pipelines are plain data transforms with no I/O of their own; the
//! binaries under `src/bin` add the file and stdin plumbing.

pub mod dfa;
pub mod error;
pub mod slr;

pub use crate::error::{ConfigError, ExtractError};

/// Short string type used for grammar symbols and automaton state names.
///
/// Symbols are almost always a handful of bytes (`ADD`, `Prog`, `;`),
/// which `smartstring` keeps inline.
pub type Symbol = smartstring::alias::String;
