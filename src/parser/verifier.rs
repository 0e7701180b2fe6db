use crate::grammar::{Grammar, Symbol};
use super::LoadErrorType::UndefinedNonterminal;
use super::{LoadError, LoadErrors, Rule};

fn get_alternative_undefined_symbols<'a>(alternative: &'a [String], rule: &'a Rule, grammar: &'a Grammar) -> impl Iterator<Item = LoadError> + 'a {
    // Keep the nonterminals that never appear on a left-hand side
    alternative.iter()
        .filter(move |word| {
            let symbol = Symbol::from(word.as_str());
            grammar.is_nonterminal(&symbol) && grammar.productions_of(&symbol).next().is_none()
        })
        .map(move |word| LoadError {
            location: rule.location.clone(),
            error: UndefinedNonterminal(word.clone())
        })
}

fn get_rule_undefined_symbols<'a>(rule: &'a Rule, grammar: &'a Grammar) -> impl Iterator<Item = LoadError> + 'a {
    // Flatten the undefined nonterminals of each alternative into those of
    // the whole rule
    rule.alternatives.iter()
        .flat_map(move |alternative| get_alternative_undefined_symbols(alternative, rule, grammar))
}

// Nonterminals that are used but have no rules. They are legal, a grammar
// just never derives anything through them, so callers report these as
// warnings.
pub(super) fn undefined_nonterminals(grammar: &Grammar, rules: &[Rule]) -> LoadErrors {
    rules.iter()
        .flat_map(|rule| get_rule_undefined_symbols(rule, grammar))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::error_handling::Location;
    use crate::parser::*;

    fn word_list(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    // S -> A B | a
    // A -> a C
    fn rules() -> Vec<Rule> {
        vec![
            Rule {
                symbol: "S".to_string(),
                alternatives: vec![word_list(&["A", "B"]), word_list(&["a"])],
                location: Location::inline(1)
            },
            Rule {
                symbol: "A".to_string(),
                alternatives: vec![word_list(&["a", "C"])],
                location: Location::inline(2)
            },
        ]
    }

    #[test]
    fn undefined_nonterminals_are_located() {
        let grammar = grammar_from_rules(rules(), Path::new("")).unwrap();

        assert_eq!(undefined_nonterminals(&grammar, &rules()), vec![
            LoadError {
                location: Location::inline(1),
                error: LoadErrorType::UndefinedNonterminal("B".to_string())
            },
            LoadError {
                location: Location::inline(2),
                error: LoadErrorType::UndefinedNonterminal("C".to_string())
            },
        ]);
    }

    #[test]
    fn defined_grammar_has_no_warnings() {
        let grammar = parse_str("S -> A b\nA -> a").unwrap();
        let rules = vec![Rule {
            symbol: "S".to_string(),
            alternatives: vec![word_list(&["A", "b"])],
            location: Location::inline(1)
        }];

        assert!(undefined_nonterminals(&grammar, &rules).is_empty());
    }
}
