use std::collections::BTreeSet;
use std::fmt;

use super::{RuleSet, StateId};
use crate::Symbol;

/// A single deterministic edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub symbol: Symbol,
    pub to: StateId,
}

/// An explicit automaton, the expansion of a [`RuleSet`].
///
/// The alphabet and state set are sorted; the transitions keep rule
/// declaration order and are not deduplicated, so a `(from, symbol)` pair
/// named by two rules yields two entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton {
    pub alphabet: BTreeSet<Symbol>,
    pub states: BTreeSet<StateId>,
    pub start: StateId,
    pub accept: BTreeSet<StateId>,
    pub transitions: Vec<Transition>,
}

impl Automaton {
    /// Expands a rule set into the explicit transition relation.
    pub fn build(rules: &RuleSet) -> Self {
        let mut alphabet = BTreeSet::new();
        let mut states = BTreeSet::new();
        let mut transitions = Vec::new();

        for rule in &rules.rules {
            states.insert(rule.from.clone());
            states.insert(rule.to.clone());
            for symbol in &rule.symbols {
                alphabet.insert(symbol.clone());
                transitions.push(Transition {
                    from: rule.from.clone(),
                    symbol: symbol.clone(),
                    to: rule.to.clone(),
                });
            }
        }

        Automaton {
            alphabet,
            states,
            start: rules.start.clone(),
            accept: rules.accept.iter().cloned().collect(),
            transitions,
        }
    }

    /// Cross-checks the declared accept set against the transition
    /// relation. The declaration is hand-derived from a diagram, so
    /// inconsistencies are reported as warnings, never as errors.
    pub fn validate(&self) -> Vec<Warning> {
        let mut warnings = Vec::new();

        if !self.states.contains(&self.start) {
            warnings.push(Warning::UnknownStart(self.start.clone()));
        }
        if self.accept.is_empty() {
            warnings.push(Warning::EmptyAccept);
        }

        let mut reachable = BTreeSet::new();
        reachable.insert(self.start.clone());
        let mut changed = true;
        while changed {
            changed = false;
            for t in &self.transitions {
                if reachable.contains(&t.from) && !reachable.contains(&t.to) {
                    reachable.insert(t.to.clone());
                    changed = true;
                }
            }
        }

        let has_exit: BTreeSet<&StateId> = self.transitions.iter().map(|t| &t.from).collect();

        for state in &self.accept {
            if !reachable.contains(state) {
                warnings.push(Warning::UnreachableAccept(state.clone()));
            }
        }
        for state in &reachable {
            if self.states.contains(state)
                && !has_exit.contains(state)
                && !self.accept.contains(state)
            {
                warnings.push(Warning::UnacceptedSink(state.clone()));
            }
        }

        warnings
    }
}

/// Renders the line-oriented text form: `alphabet:`, `states:`, `start:`
/// and `accept:` lines followed by a `transition:` section with one
/// `<from> <symbol> <to>` triple per line. Ends with a newline.
impl fmt::Display for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "alphabet: {}", join(&self.alphabet))?;
        writeln!(f, "states: {}", join(&self.states))?;
        writeln!(f, "start: {}", self.start)?;
        writeln!(f, "accept: {}", join(&self.accept))?;
        writeln!(f, "transition:")?;
        for t in &self.transitions {
            writeln!(f, "{} {} {}", t.from, t.symbol, t.to)?;
        }
        Ok(())
    }
}

/// A structural inconsistency found by [`Automaton::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Accept state that cannot be reached from the start state.
    UnreachableAccept(StateId),
    /// Reachable state with no outgoing transitions that is not accepting.
    UnacceptedSink(StateId),
    /// The start state does not occur in any rule.
    UnknownStart(StateId),
    /// The accept set is empty.
    EmptyAccept,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnreachableAccept(s) => {
                write!(f, "accept state {s} is not reachable from start")
            }
            Warning::UnacceptedSink(s) => {
                write!(f, "reachable state {s} has no outgoing transitions and is not accepting")
            }
            Warning::UnknownStart(s) => write!(f, "start state {s} does not occur in any rule"),
            Warning::EmptyAccept => write!(f, "accept set is empty"),
        }
    }
}

fn join(set: &BTreeSet<Symbol>) -> String {
    set.iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> RuleSet {
        RuleSet::parse("start: S\naccept: B\nS x A\nA [ab] B\n").unwrap()
    }

    #[test]
    fn class_rule_expands_to_one_transition_per_symbol() {
        let automaton = Automaton::build(&small());
        assert_eq!(automaton.transitions.len(), 3);
        assert_eq!(automaton.alphabet.len(), 3);
        assert_eq!(automaton.states.len(), 3);
    }

    #[test]
    fn text_form_is_exact() {
        let automaton = Automaton::build(&small());
        assert_eq!(
            automaton.to_string(),
            "alphabet: a b x\n\
             states: A B S\n\
             start: S\n\
             accept: B\n\
             transition:\n\
             S x A\n\
             A a B\n\
             A b B\n"
        );
    }

    #[test]
    fn sections_are_sorted_transitions_are_not() {
        let rules = RuleSet::parse("accept: 2\n1 b 2\n1 a 2\n").unwrap();
        let automaton = Automaton::build(&rules);
        let text = automaton.to_string();
        assert!(text.contains("alphabet: a b\n"));
        assert!(text.ends_with("transition:\n1 b 2\n1 a 2\n"));
    }

    #[test]
    fn duplicate_rules_are_kept() {
        let rules = RuleSet::parse("accept: 1\n0 x 1\n0 x 1\n").unwrap();
        let automaton = Automaton::build(&rules);
        assert_eq!(automaton.transitions.len(), 2);
        assert_eq!(automaton.transitions[0], automaton.transitions[1]);
    }

    #[test]
    fn every_rule_symbol_and_state_is_registered() {
        let automaton = Automaton::build(&RuleSet::builtin());
        for t in &automaton.transitions {
            assert!(automaton.states.contains(&t.from));
            assert!(automaton.states.contains(&t.to));
            assert!(automaton.alphabet.contains(&t.symbol));
        }
    }

    #[test]
    fn builtin_expansion_counts() {
        let automaton = Automaton::build(&RuleSet::builtin());
        assert_eq!(automaton.alphabet.len(), 67);
        assert_eq!(automaton.states.len(), 13);
        assert_eq!(automaton.transitions.len(), 209);
        assert_eq!(automaton.accept.len(), 7);
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = Automaton::build(&RuleSet::builtin());
        let b = Automaton::build(&RuleSet::builtin());
        assert_eq!(a.to_string(), b.to_string());
        assert!(a.to_string().ends_with('\n'));
    }

    #[test]
    fn builtin_rules_validate_clean() {
        let automaton = Automaton::build(&RuleSet::builtin());
        assert!(automaton.validate().is_empty());
    }

    #[test]
    fn unreachable_accept_is_flagged() {
        let rules = RuleSet::parse("accept: 9\n0 x 1\n1 y 0\n").unwrap();
        let warnings = Automaton::build(&rules).validate();
        assert_eq!(
            warnings,
            vec![Warning::UnreachableAccept(Symbol::from("9"))]
        );
    }

    #[test]
    fn unaccepted_sink_is_flagged() {
        let rules = RuleSet::parse("accept: 1\n0 x 1\n0 y 2\n").unwrap();
        let warnings = Automaton::build(&rules).validate();
        assert_eq!(warnings, vec![Warning::UnacceptedSink(Symbol::from("2"))]);
    }

    #[test]
    fn empty_accept_is_flagged() {
        let rules = RuleSet::parse("0 x 1\n1 y 0\n").unwrap();
        let warnings = Automaton::build(&rules).validate();
        assert_eq!(warnings, vec![Warning::EmptyAccept]);
    }

    #[test]
    fn unknown_start_is_flagged() {
        let rules = RuleSet::parse("start: Q\naccept: 1\n0 x 1\n").unwrap();
        let warnings = Automaton::build(&rules).validate();
        assert_eq!(
            warnings,
            vec![
                Warning::UnknownStart(Symbol::from("Q")),
                Warning::UnreachableAccept(Symbol::from("1")),
            ]
        );
    }
}
