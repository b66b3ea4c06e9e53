use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use super::StateId;
use crate::Symbol;
use crate::error::ConfigError;

/// The rule set shipped with the tool, matching the hand-drawn lexer
/// diagram the reference tables were derived from. It recognizes
/// identifiers, integer and floating-point literals (with optional
/// exponent), `;`, and the operators `+`, `-`, `+=`, `++`.
pub const BUILTIN_RULES: &str = "\
-- Transition rules for the lexer DFA, one per line:
--   <from> <symbol> <to>
-- A bracketed symbol field is an enumerated character class.
start: 0
accept: 2 5 6 8 AB CD FG

0 ; 2
0 - A
0 + 4A
0 . C
A . C
AB . CD
4A . C
0 [0-9] AB
0 [a-zA-Z] 8
AB [0-9] AB
AB e EF
AB E EF
A [0-9] AB
C [0-9] CD
CD [0-9] CD
CD e EF
CD E EF
EF [0-9] FG
EF + F
EF - F
F [0-9] FG
FG [0-9] FG
4A = 5
4A + 6
8 [a-zA-Z0-9] 8
";

static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z-]+)\s*:\s*(.*)$").unwrap());
static RULE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\S+)\s+(\S+)\s+(\S+)$").unwrap());

/// A hand-authored transition rule: one source state, one or more input
/// symbols, one target state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub from: StateId,
    pub symbols: Vec<Symbol>,
    pub to: StateId,
}

/// A complete rule set: start state, declared accept states, and the
/// rules in declaration order.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub start: StateId,
    pub accept: Vec<StateId>,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Parses a rule file.
    ///
    /// Blank lines and lines starting with `--` are skipped. `start:` and
    /// `accept:` directives set the start state and the (space-separated)
    /// accept states; any other line must be a `<from> <symbol> <to>`
    /// rule. A missing `start:` directive defaults to state `0`.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut start: Option<StateId> = None;
        let mut accept: Vec<StateId> = Vec::new();
        let mut rules: Vec<Rule> = Vec::new();

        for (i, raw_line) in input.lines().enumerate() {
            let line_no = i + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with("--") {
                continue;
            }
            if let Some(cap) = DIRECTIVE_RE.captures(line) {
                let value = cap[2].trim();
                match &cap[1] {
                    "start" => start = Some(Symbol::from(value)),
                    "accept" => accept.extend(value.split_whitespace().map(Symbol::from)),
                    name => {
                        return Err(ConfigError::Value {
                            line_no,
                            reason: format!("unknown directive {name:?}"),
                        });
                    }
                }
                continue;
            }
            if let Some(cap) = RULE_RE.captures(line) {
                rules.push(Rule {
                    from: Symbol::from(&cap[1]),
                    symbols: expand_symbols(&cap[2], line_no)?,
                    to: Symbol::from(&cap[3]),
                });
                continue;
            }
            return Err(ConfigError::Line {
                line_no,
                line: line.to_owned(),
            });
        }

        Ok(RuleSet {
            start: start.unwrap_or_else(|| Symbol::from("0")),
            accept,
            rules,
        })
    }

    /// Loads a rule file from disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::parse(&text)
    }

    /// The built-in rule set ([`BUILTIN_RULES`]).
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_RULES).expect("built-in rule set parses")
    }
}

/// Expands a rule's symbol field. A bare field is a single symbol; a
/// bracketed field is a character class whose members are enumerated in
/// the order written, ranges like `a-z` included endpoint to endpoint.
fn expand_symbols(field: &str, line_no: usize) -> Result<Vec<Symbol>, ConfigError> {
    let Some(class) = field
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        return Ok(vec![Symbol::from(field)]);
    };

    let cs: Vec<char> = class.chars().collect();
    let mut symbols = Vec::new();
    let mut i = 0;
    while i < cs.len() {
        if i + 2 < cs.len() && cs[i + 1] == '-' {
            let (lo, hi) = (cs[i], cs[i + 2]);
            if lo > hi {
                return Err(ConfigError::Value {
                    line_no,
                    reason: format!("bad range {lo}-{hi} in {field:?}"),
                });
            }
            for c in lo..=hi {
                symbols.push(sym(c));
            }
            i += 3;
        } else {
            symbols.push(sym(cs[i]));
            i += 1;
        }
    }
    if symbols.is_empty() {
        return Err(ConfigError::Value {
            line_no,
            reason: format!("empty character class {field:?}"),
        });
    }
    Ok(symbols)
}

fn sym(c: char) -> Symbol {
    let mut s = Symbol::new();
    s.push(c);
    s
}
