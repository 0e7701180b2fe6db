/*
    This module rewrites grammars into Chomsky Normal Form
*/

mod binarize;
mod epsilon;
mod unit;

use crate::grammar::*;

pub use binarize::terminalize_and_binarize;
pub use epsilon::{nullable_set, remove_epsilon};
pub use unit::{remove_units, unit_closure};

// Mints nonterminal names that are not yet used by the grammar. One
// generator lives for the duration of a single normalization.
#[derive(Debug, Default)]
pub struct FreshNames {
    counter: usize,
}

impl FreshNames {
    pub fn new() -> Self {
        Self::default()
    }

    // Returns `{prefix}{n}` for the next n whose name is free and declares
    // it as a nonterminal of `grammar`
    pub fn mint(&mut self, prefix: &str, grammar: &mut Grammar) -> Symbol {
        loop {
            self.counter += 1;
            let candidate = Symbol::from(format!("{}{}", prefix, self.counter));
            if !grammar.contains_symbol(&candidate) {
                grammar.add_nonterminal(candidate.clone());
                return candidate;
            }
        }
    }
}

// Makes sure the start symbol never occurs on a right-hand side by adding
// `S0 -> S` when it does.
pub fn isolate_start(mut grammar: Grammar) -> Grammar {
    let start = grammar.start.clone();
    let appears_in_rhs = grammar.productions().any(|(_, rhs)| rhs.contains(&start));
    if !appears_in_rhs {
        return grammar;
    }

    let mut name = format!("{}0", start);
    while grammar.contains_symbol(&Symbol::from(name.as_str())) {
        name.push('_');
    }
    let new_start = Symbol::from(name);

    grammar.add_nonterminal(new_start.clone());
    grammar.add_production(new_start.clone(), vec![start]);
    grammar.start = new_start;
    grammar
}

// Converts `grammar` into an equivalent grammar in Chomsky Normal Form.
// Grammars that are already in CNF are returned untouched.
pub fn to_cnf(grammar: Grammar) -> Grammar {
    if is_cnf(&grammar) {
        tracing::info!(start = %grammar.start, "grammar is already in CNF, skipping normalization");
        return grammar;
    }

    let mut fresh = FreshNames::new();

    let grammar = isolate_start(grammar);
    tracing::debug!(start = %grammar.start, productions = grammar.production_count(), "isolated start symbol");

    let grammar = remove_epsilon(grammar);
    tracing::debug!(productions = grammar.production_count(), "removed epsilon productions");

    let grammar = remove_units(grammar);
    tracing::debug!(productions = grammar.production_count(), "removed unit productions");

    let grammar = terminalize_and_binarize(grammar, &mut fresh);
    tracing::debug!(
        productions = grammar.production_count(),
        nonterminals = grammar.nonterminals.len(),
        "terminalized and binarized"
    );

    grammar
}
