use std::collections::{BTreeMap, BTreeSet};

use super::FreshNames;
use crate::grammar::*;

// Replaces the terminals of every right-hand side of length two or more by
// proxy nonterminals `T -> terminal`, one proxy per terminal
fn terminalize(grammar: &mut Grammar, fresh: &mut FreshNames) {
    let old_productions = std::mem::take(&mut grammar.productions);
    let mut proxies = BTreeMap::<Symbol, Symbol>::new();
    let mut productions = BTreeMap::<Symbol, BTreeSet<Rhs>>::new();

    for (lhs, rhss) in old_productions {
        for rhs in rhss {
            let rhs = if rhs.len() >= 2 {
                rhs.into_iter()
                    .map(|s| {
                        if !grammar.is_terminal(&s) {
                            return s;
                        }
                        if let Some(proxy) = proxies.get(&s) {
                            return proxy.clone();
                        }
                        let proxy = fresh.mint("T", grammar);
                        productions.entry(proxy.clone()).or_default().insert(vec![s.clone()]);
                        proxies.insert(s, proxy.clone());
                        proxy
                    })
                    .collect()
            } else {
                rhs
            };
            productions.entry(lhs.clone()).or_default().insert(rhs);
        }
    }

    grammar.productions = productions;
}

// Splits every right-hand side longer than two into a chain of binary
// productions through fresh nonterminals
fn binarize(grammar: &mut Grammar, fresh: &mut FreshNames) {
    let old_productions = std::mem::take(&mut grammar.productions);
    let mut productions = BTreeMap::<Symbol, BTreeSet<Rhs>>::new();

    for (lhs, rhss) in old_productions {
        for rhs in rhss {
            if rhs.len() <= 2 {
                productions.entry(lhs.clone()).or_default().insert(rhs);
                continue;
            }

            // A -> s1 Y1, Y1 -> s2 Y2, ..., Y(k-2) -> s(k-1) sk
            let last = rhs.len() - 2;
            let mut head = lhs.clone();
            for (i, symbol) in rhs[..=last].iter().enumerate() {
                let tail = if i == last {
                    rhs[last + 1].clone()
                } else {
                    fresh.mint("X", grammar)
                };
                productions.entry(head).or_default().insert(vec![symbol.clone(), tail.clone()]);
                head = tail;
            }
        }
    }

    grammar.productions = productions;
}

// The last normalization stage: after it every production is `A -> a`,
// `A -> B C` or the start symbol's `S -> ε`.
pub fn terminalize_and_binarize(mut grammar: Grammar, fresh: &mut FreshNames) -> Grammar {
    terminalize(&mut grammar, fresh);
    binarize(&mut grammar, fresh);
    return grammar;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::tests::{grammar, rhs};

    #[test]
    fn terminals_share_one_proxy() {
        let mut g = grammar("S -> a S a | a b | a");
        terminalize(&mut g, &mut FreshNames::new());

        // `a` on its own is already in normal form
        assert_eq!(g.productions.get(&Symbol::from("S")), Some(&BTreeSet::from([
            rhs("a"),
            rhs("T1 S T1"),
            rhs("T1 T2"),
        ])));
        assert_eq!(g.productions.get(&Symbol::from("T1")), Some(&BTreeSet::from([rhs("a")])));
        assert_eq!(g.productions.get(&Symbol::from("T2")), Some(&BTreeSet::from([rhs("b")])));
    }

    #[test]
    fn long_rules_become_chains() {
        let mut g = grammar("S -> A B C D\nA -> a\nB -> b\nC -> c\nD -> d");
        binarize(&mut g, &mut FreshNames::new());

        assert_eq!(g.productions.get(&Symbol::from("S")), Some(&BTreeSet::from([rhs("A X1")])));
        assert_eq!(g.productions.get(&Symbol::from("X1")), Some(&BTreeSet::from([rhs("B X2")])));
        assert_eq!(g.productions.get(&Symbol::from("X2")), Some(&BTreeSet::from([rhs("C D")])));
        assert!(is_cnf(&g));
    }

    #[test]
    fn short_rules_pass_through() {
        let original = grammar("S -> A B | c\nA -> a\nB -> b");
        let mut g = original.clone();
        binarize(&mut g, &mut FreshNames::new());

        assert_eq!(g, original);
    }
}
