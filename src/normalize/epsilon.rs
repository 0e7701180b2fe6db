use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use crate::grammar::*;

// The nonterminals that can derive the empty string, by least fixpoint.
pub fn nullable_set(grammar: &Grammar) -> BTreeSet<Symbol> {
    let mut nullable = BTreeSet::new();

    let mut changed = true;
    while changed {
        changed = false;
        for (lhs, rhs) in grammar.productions() {
            if !nullable.contains(lhs) && rhs.iter().all(|s| nullable.contains(s)) {
                nullable.insert(lhs.clone());
                changed = true;
            }
        }
    }

    return nullable;
}

// Every non-empty variant of `rhs` obtained by deleting some subset of its
// nullable positions
fn rhs_variants(rhs: &Rhs, nullable: &BTreeSet<Symbol>) -> Vec<Rhs> {
    let positions = rhs.iter()
        .positions(|s| nullable.contains(s))
        .collect_vec();

    positions.into_iter()
        .powerset()
        .map(|deleted| rhs.iter()
            .enumerate()
            .filter(|(i, _)| !deleted.contains(i))
            .map(|(_, s)| s.clone())
            .collect_vec())
        .filter(|variant| !variant.is_empty())
        .collect()
}

// Removes all epsilon productions. If the start symbol was nullable it gets
// a single `S -> ε` back.
pub fn remove_epsilon(mut grammar: Grammar) -> Grammar {
    let nullable = nullable_set(&grammar);
    tracing::trace!(nullable = ?nullable, "computed nullable set");

    let mut productions = BTreeMap::<Symbol, BTreeSet<Rhs>>::new();
    for (lhs, rhs) in grammar.productions() {
        if rhs.is_empty() {
            continue;
        }
        productions.entry(lhs.clone())
            .or_default()
            .extend(rhs_variants(rhs, &nullable));
    }

    if nullable.contains(&grammar.start) {
        productions.entry(grammar.start.clone()).or_default().insert(Vec::new());
    }

    grammar.productions = productions;
    return grammar;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::tests::{grammar, rhs};

    fn symbols(names: &[&str]) -> BTreeSet<Symbol> {
        names.iter().map(|&name| Symbol::from(name)).collect()
    }

    #[test]
    fn nullable_needs_every_symbol_nullable() {
        let g = grammar("S -> A B | c\nA -> e | a\nB -> A A\nC -> A c");
        assert_eq!(nullable_set(&g), symbols(&["A", "B", "S"]));
    }

    #[test]
    fn nothing_is_nullable_without_epsilon() {
        let g = grammar("S -> a S | b");
        assert!(nullable_set(&g).is_empty());
    }

    #[test]
    fn variants_cover_every_subset() {
        let nullable = symbols(&["A", "B"]);
        let variants: BTreeSet<Rhs> = rhs_variants(&rhs("A x B"), &nullable).into_iter().collect();

        assert_eq!(variants, BTreeSet::from([
            rhs("A x B"),
            rhs("x B"),
            rhs("A x"),
            rhs("x"),
        ]));
    }

    #[test]
    fn fully_nullable_rhs_drops_empty_variant() {
        let nullable = symbols(&["A"]);
        let variants = rhs_variants(&rhs("A A"), &nullable);

        assert_eq!(variants.len(), 3);
        assert!(variants.iter().all(|v| !v.is_empty()));
    }

    #[test]
    fn remove_epsilon_keeps_start_epsilon() {
        let g = remove_epsilon(grammar("S -> A b A | A\nA -> a | e"));

        let s = Symbol::from("S");
        let a = Symbol::from("A");
        assert_eq!(g.productions.get(&s), Some(&BTreeSet::from([
            rhs(""),
            rhs("A"),
            rhs("A b"),
            rhs("A b A"),
            rhs("b"),
            rhs("b A"),
        ])));
        assert_eq!(g.productions.get(&a), Some(&BTreeSet::from([rhs("a")])));
    }
}
