/*
    This module is for storing and inspecting context-free grammars
*/

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;
use std::rc::Rc;

use itertools::Itertools;
use thiserror::Error;

// The base unit in a grammar rule. Whether a symbol is a terminal or a
// nonterminal is decided by the grammar it belongs to, not by the symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Rc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(Rc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol(Rc::from(name))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// The symbols on the right-hand side of a single production. Empty means
// epsilon.
pub type Rhs = Vec<Symbol>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GrammarError {
    #[error("start symbol `{0}` is not a nonterminal")]
    StartNotNonterminal(Symbol),
    #[error("`{0}` is declared both as a terminal and as a nonterminal")]
    OverlappingSymbol(Symbol),
    #[error("productions are defined for `{0}`, which is not a nonterminal")]
    UndeclaredLhs(Symbol),
    #[error("production for `{lhs}` references undeclared symbol `{symbol}`")]
    UndeclaredSymbol { lhs: Symbol, symbol: Symbol },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub nonterminals: BTreeSet<Symbol>,
    pub terminals: BTreeSet<Symbol>,
    pub start: Symbol,
    pub productions: BTreeMap<Symbol, BTreeSet<Rhs>>,
}

impl Grammar {
    pub fn new(start: impl Into<Symbol>) -> Self {
        let start = start.into();
        Grammar {
            nonterminals: BTreeSet::from([start.clone()]),
            terminals: BTreeSet::new(),
            start,
            productions: BTreeMap::new(),
        }
    }

    pub fn add_nonterminal(&mut self, symbol: impl Into<Symbol>) {
        self.nonterminals.insert(symbol.into());
    }

    pub fn add_terminal(&mut self, symbol: impl Into<Symbol>) {
        self.terminals.insert(symbol.into());
    }

    // Adds `lhs -> rhs`. The symbols involved must already be declared (or
    // be declared before the grammar is used); `validate` checks this.
    // Returns false if the production was already present.
    pub fn add_production(&mut self, lhs: impl Into<Symbol>, rhs: Rhs) -> bool {
        self.productions.entry(lhs.into()).or_default().insert(rhs)
    }

    pub fn is_nonterminal(&self, symbol: &Symbol) -> bool {
        self.nonterminals.contains(symbol)
    }

    pub fn is_terminal(&self, symbol: &Symbol) -> bool {
        self.terminals.contains(symbol)
    }

    // Whether a name is taken by either kind of symbol
    pub fn contains_symbol(&self, symbol: &Symbol) -> bool {
        self.is_nonterminal(symbol) || self.is_terminal(symbol)
    }

    pub fn productions_of(&self, lhs: &Symbol) -> impl Iterator<Item = &Rhs> + '_ {
        self.productions.get(lhs).into_iter().flatten()
    }

    // Every production as a `(lhs, rhs)` pair, ordered by left-hand side.
    pub fn productions(&self) -> impl Iterator<Item = (&Symbol, &Rhs)> + '_ {
        self.productions
            .iter()
            .flat_map(|(lhs, rhss)| rhss.iter().map(move |rhs| (lhs, rhs)))
    }

    pub fn production_count(&self) -> usize {
        self.productions.values().map(BTreeSet::len).sum()
    }

    // A unit production is `A -> B` with B a nonterminal
    pub fn is_unit(&self, rhs: &Rhs) -> bool {
        rhs.len() == 1 && self.is_nonterminal(&rhs[0])
    }

    // Whether `lhs -> rhs` has one of the three shapes Chomsky Normal Form
    // allows: `S -> ε`, `A -> a` or `A -> B C`.
    pub fn is_cnf_production(&self, lhs: &Symbol, rhs: &Rhs) -> bool {
        match rhs.as_slice() {
            [] => *lhs == self.start,
            [a] => self.is_terminal(a),
            [b, c] => self.is_nonterminal(b) && self.is_nonterminal(c),
            _ => false,
        }
    }

    // Checks the structural invariants every grammar value must satisfy.
    pub fn validate(&self) -> Result<(), GrammarError> {
        if !self.is_nonterminal(&self.start) {
            return Err(GrammarError::StartNotNonterminal(self.start.clone()));
        }
        if let Some(symbol) = self.nonterminals.intersection(&self.terminals).next() {
            return Err(GrammarError::OverlappingSymbol(symbol.clone()));
        }
        for (lhs, rhs) in self.productions() {
            if !self.is_nonterminal(lhs) {
                return Err(GrammarError::UndeclaredLhs(lhs.clone()));
            }
            if let Some(symbol) = rhs.iter().find(|s| !self.contains_symbol(s)) {
                return Err(GrammarError::UndeclaredSymbol {
                    lhs: lhs.clone(),
                    symbol: symbol.clone(),
                });
            }
        }
        Ok(())
    }
}

// Whether every production of `grammar` is in Chomsky Normal Form.
pub fn is_cnf(grammar: &Grammar) -> bool {
    grammar
        .productions()
        .all(|(lhs, rhs)| grammar.is_cnf_production(lhs, rhs))
}

pub fn format_rhs(rhs: &Rhs) -> String {
    if rhs.is_empty() {
        "e".to_string()
    } else {
        rhs.iter().join(" ")
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Start symbol: {}", self.start)?;
        writeln!(f, "Nonterminals: {}", self.nonterminals.iter().join(", "))?;
        writeln!(f, "Terminals: {}", self.terminals.iter().join(", "))?;
        write!(f, "Productions:")?;
        for (lhs, rhss) in &self.productions {
            write!(f, "\n  {} -> {}", lhs, rhss.iter().map(format_rhs).join(" | "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use expect_test::expect;

    use super::*;

    fn rhs(text: &str) -> Rhs {
        text.split_whitespace().map(Symbol::from).collect()
    }

    // S -> A B, A -> a, B -> b
    fn simple_grammar() -> Grammar {
        let mut grammar = Grammar::new("S");
        grammar.add_nonterminal("A");
        grammar.add_nonterminal("B");
        grammar.add_terminal("a");
        grammar.add_terminal("b");
        grammar.add_production("S", rhs("A B"));
        grammar.add_production("A", rhs("a"));
        grammar.add_production("B", rhs("b"));
        grammar
    }

    #[test]
    fn cnf_grammar_is_accepted() {
        let mut grammar = simple_grammar();
        assert!(is_cnf(&grammar));

        grammar.add_production("S", rhs(""));
        assert!(is_cnf(&grammar));
    }

    #[test]
    fn non_cnf_shapes_are_rejected() {
        let shapes = vec![
            ("A", ""),      // epsilon off the start symbol
            ("S", "A"),     // unit production
            ("S", "a B"),   // terminal in a binary production
            ("S", "A B A"), // too long
        ];

        for (lhs, text) in shapes {
            let mut grammar = simple_grammar();
            grammar.add_production(lhs, rhs(text));
            assert!(!is_cnf(&grammar), "{} -> {} should not be CNF", lhs, text);
        }
    }

    #[test]
    fn duplicate_productions_are_merged() {
        let mut grammar = simple_grammar();
        assert!(!grammar.add_production("A", rhs("a")));
        assert_eq!(grammar.production_count(), 3);
    }

    #[test]
    fn validate_reports_broken_invariants() {
        assert_eq!(simple_grammar().validate(), Ok(()));

        let mut undeclared = simple_grammar();
        undeclared.add_production("S", rhs("A c"));
        assert_eq!(undeclared.validate(), Err(GrammarError::UndeclaredSymbol {
            lhs: Symbol::from("S"),
            symbol: Symbol::from("c"),
        }));

        let mut overlapping = simple_grammar();
        overlapping.add_terminal("A");
        assert_eq!(overlapping.validate(), Err(GrammarError::OverlappingSymbol(Symbol::from("A"))));

        let mut bad_lhs = simple_grammar();
        bad_lhs.add_production("C", rhs("a"));
        assert_eq!(bad_lhs.validate(), Err(GrammarError::UndeclaredLhs(Symbol::from("C"))));

        let mut bad_start = simple_grammar();
        bad_start.start = Symbol::from("a");
        assert_eq!(bad_start.validate(), Err(GrammarError::StartNotNonterminal(Symbol::from("a"))));
    }

    #[test]
    fn display_lists_productions() {
        let mut grammar = simple_grammar();
        grammar.add_production("S", rhs(""));

        expect![[r#"
            Start symbol: S
            Nonterminals: A, B, S
            Terminals: a, b
            Productions:
              A -> a
              B -> b
              S -> e | A B"#]]
        .assert_eq(&grammar.to_string());
    }
}
