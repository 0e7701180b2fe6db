/*
    This module generates random sentences of a grammar
*/

use std::collections::BTreeMap;

use rand::prelude::*;
use thiserror::Error;

use crate::error_handling::ErrorType;
use crate::grammar::*;

#[derive(Debug, Error, PartialEq)]
pub enum GenerateErrorType {
    // The nonterminal derives no terminal string at all
    #[error("`{0}` does not derive any sentence")]
    Unproductive(String),
}

impl ErrorType for GenerateErrorType {}

pub type GenResult = Result<Vec<Symbol>, GenerateErrorType>;

// The smallest derivation tree height of every productive nonterminal
fn min_heights(grammar: &Grammar) -> BTreeMap<Symbol, usize> {
    let mut heights = BTreeMap::<Symbol, usize>::new();

    let mut changed = true;
    while changed {
        changed = false;
        for (lhs, rhs) in grammar.productions() {
            if let Some(height) = rhs_height(grammar, &heights, rhs) {
                if heights.get(lhs).map_or(true, |&known| height < known) {
                    heights.insert(lhs.clone(), height);
                    changed = true;
                }
            }
        }
    }

    return heights;
}

fn rhs_height(grammar: &Grammar, heights: &BTreeMap<Symbol, usize>, rhs: &Rhs) -> Option<usize> {
    rhs.iter()
        .map(|symbol| if grammar.is_nonterminal(symbol) {
            heights.get(symbol).copied()
        } else {
            Some(0)
        })
        .try_fold(0, |max, height| height.map(|h| max.max(h)))
        .map(|max| max + 1)
}

// Samples sentences by expanding nonterminals with uniformly chosen
// productions. Past `max_depth` only the productions leading to the
// shallowest derivations are used, so every expansion terminates.
pub struct Generator<'g> {
    grammar: &'g Grammar,
    heights: BTreeMap<Symbol, usize>,
    max_depth: usize,
}

impl<'g> Generator<'g> {
    pub fn new(grammar: &'g Grammar, max_depth: usize) -> Self {
        Generator {
            grammar,
            heights: min_heights(grammar),
            max_depth,
        }
    }

    pub fn generate(&self, rng: &mut impl Rng) -> GenResult {
        self.generate_with_override(&self.grammar.start, rng)
    }

    // Generates a sentence derived from the given symbol
    pub fn generate_with_override(&self, start: &Symbol, rng: &mut impl Rng) -> GenResult {
        let mut sentence = Vec::new();
        self.generate_nonterminal(start, 0, rng, &mut sentence)?;
        return Ok(sentence);
    }

    fn generate_nonterminal(&self, nonterminal: &Symbol, depth: usize, rng: &mut impl Rng, sentence: &mut Vec<Symbol>) -> Result<(), GenerateErrorType> {
        let height = *self.heights
            .get(nonterminal)
            .ok_or_else(|| GenerateErrorType::Unproductive(nonterminal.to_string()))?;

        let candidates = self.grammar.productions_of(nonterminal)
            .filter(|rhs| match rhs_height(self.grammar, &self.heights, rhs) {
                Some(h) if depth >= self.max_depth => h == height,
                Some(_) => true,
                None => false,
            })
            .collect::<Vec<_>>();

        // A productive nonterminal has at least one production of its height
        let Some(alternative) = candidates.choose(rng) else {
            return Err(GenerateErrorType::Unproductive(nonterminal.to_string()));
        };

        for symbol in alternative.iter() {
            self.generate_symbol(symbol, depth + 1, rng, sentence)?;
        }

        return Ok(());
    }

    fn generate_symbol(&self, symbol: &Symbol, depth: usize, rng: &mut impl Rng, sentence: &mut Vec<Symbol>) -> Result<(), GenerateErrorType> {
        if self.grammar.is_nonterminal(symbol) {
            self.generate_nonterminal(symbol, depth, rng, sentence)
        } else {
            sentence.push(symbol.clone());
            Ok(())
        }
    }
}

// Generates one random sentence of `grammar` from its start symbol.
pub fn generate(grammar: &Grammar, rng: &mut impl Rng, max_depth: usize) -> GenResult {
    Generator::new(grammar, max_depth).generate(rng)
}
