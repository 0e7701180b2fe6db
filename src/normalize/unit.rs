use std::collections::{BTreeMap, BTreeSet};

use crate::grammar::*;

// For every nonterminal A, the nonterminals reachable from A through unit
// productions, A itself included.
pub fn unit_closure(grammar: &Grammar) -> BTreeMap<Symbol, BTreeSet<Symbol>> {
    let mut closure: BTreeMap<Symbol, BTreeSet<Symbol>> = grammar.nonterminals
        .iter()
        .map(|a| (a.clone(), BTreeSet::from([a.clone()])))
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for a in &grammar.nonterminals {
            let reached = closure[a].iter()
                .flat_map(|b| grammar.productions_of(b))
                .filter(|rhs| grammar.is_unit(rhs))
                .map(|rhs| rhs[0].clone())
                .collect::<Vec<_>>();

            let entry = closure.entry(a.clone()).or_default();
            for c in reached {
                changed |= entry.insert(c);
            }
        }
    }

    return closure;
}

// Replaces every chain `A -> B -> ...` by copying the non-unit productions
// of everything in A's unit closure up to A.
pub fn remove_units(mut grammar: Grammar) -> Grammar {
    let closure = unit_closure(&grammar);

    let mut productions = BTreeMap::<Symbol, BTreeSet<Rhs>>::new();
    for (a, reachable) in &closure {
        let rhss = reachable.iter()
            .flat_map(|b| grammar.productions_of(b))
            .filter(|rhs| !grammar.is_unit(rhs))
            .cloned()
            .collect::<BTreeSet<_>>();

        if !rhss.is_empty() {
            productions.insert(a.clone(), rhss);
        }
    }

    grammar.productions = productions;
    return grammar;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::tests::{grammar, rhs};

    #[test]
    fn closure_follows_chains() {
        let g = grammar("S -> A | s\nA -> B | a\nB -> b | C D\nC -> c\nD -> d");
        let closure = unit_closure(&g);

        let names = |a: &str| closure[&Symbol::from(a)]
            .iter()
            .map(Symbol::to_string)
            .collect::<Vec<_>>();
        assert_eq!(names("S"), vec!["A", "B", "S"]);
        assert_eq!(names("A"), vec!["A", "B"]);
        assert_eq!(names("B"), vec!["B"]);
    }

    #[test]
    fn closure_handles_cycles() {
        let g = grammar("S -> A\nA -> S | a");
        let closure = unit_closure(&g);

        assert_eq!(closure[&Symbol::from("S")], closure[&Symbol::from("A")]);
        assert_eq!(closure[&Symbol::from("S")].len(), 2);
    }

    #[test]
    fn units_are_replaced_by_reachable_productions() {
        let g = remove_units(grammar("S -> A | s\nA -> B | a\nB -> b | C D\nC -> c\nD -> d"));

        assert_eq!(g.productions.get(&Symbol::from("S")), Some(&BTreeSet::from([
            rhs("s"),
            rhs("a"),
            rhs("b"),
            rhs("C D"),
        ])));
        assert!(g.productions().all(|(_, rhs)| !g.is_unit(rhs)));
    }
}
