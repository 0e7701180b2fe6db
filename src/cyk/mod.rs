/*
    This module recognizes sentences of a CNF grammar with the CYK algorithm
*/

mod tree;

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::grammar::*;

pub use tree::{format_bracketed, reconstruct_all, reconstruct_one, Derivations, Tree};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CykError {
    // The grammar handed to the recognizer was not normalized first
    #[error("production `{} -> {}` is not in Chomsky Normal Form", .lhs, format_rhs(.rhs))]
    NotCnf { lhs: Symbol, rhs: Rhs },
    // A tree was requested for a symbol that does not derive the span
    #[error("`{symbol}` was never derived for span {start}..={end}")]
    MissingDerivation { start: usize, end: usize, symbol: Symbol },
}

// Reverse lookups from right-hand sides to the nonterminals producing them.
#[derive(Debug, Default)]
pub struct Indexes {
    by_terminal: HashMap<Symbol, BTreeSet<Symbol>>,
    by_pair: HashMap<(Symbol, Symbol), BTreeSet<Symbol>>,
}

impl Indexes {
    // Every A with `A -> terminal`
    pub fn producing_terminal(&self, terminal: &Symbol) -> impl Iterator<Item = &Symbol> + '_ {
        self.by_terminal.get(terminal).into_iter().flatten()
    }

    // Every A with `A -> left right`
    pub fn producing_pair(&self, left: &Symbol, right: &Symbol) -> impl Iterator<Item = &Symbol> + '_ {
        self.by_pair.get(&(left.clone(), right.clone())).into_iter().flatten()
    }
}

pub fn build_indexes(grammar: &Grammar) -> Result<Indexes, CykError> {
    let mut indexes = Indexes::default();

    for (lhs, rhs) in grammar.productions() {
        if !grammar.is_cnf_production(lhs, rhs) {
            return Err(CykError::NotCnf {
                lhs: lhs.clone(),
                rhs: rhs.clone(),
            });
        }
        match rhs.as_slice() {
            [terminal] => {
                indexes.by_terminal.entry(terminal.clone()).or_default().insert(lhs.clone());
            }
            [left, right] => {
                indexes.by_pair.entry((left.clone(), right.clone())).or_default().insert(lhs.clone());
            }
            // `S -> ε` only matters for the empty sentence
            _ => {}
        }
    }

    return Ok(indexes);
}

// The triangular CYK chart. Cell `(i, j)` holds every nonterminal deriving
// `tokens[i..=j]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    len: usize,
    cells: Vec<BTreeSet<Symbol>>,
}

impl Table {
    pub fn new(len: usize) -> Self {
        Table {
            len,
            cells: vec![BTreeSet::new(); len * (len + 1) / 2],
        }
    }

    // Number of tokens the table covers
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn index(&self, start: usize, end: usize) -> usize {
        debug_assert!(start <= end && end < self.len);
        // Row `start` begins after the rows for every earlier start offset
        start * (2 * self.len - start + 1) / 2 + (end - start)
    }

    pub fn cell(&self, start: usize, end: usize) -> &BTreeSet<Symbol> {
        &self.cells[self.index(start, end)]
    }

    fn cell_mut(&mut self, start: usize, end: usize) -> &mut BTreeSet<Symbol> {
        let index = self.index(start, end);
        &mut self.cells[index]
    }

    pub fn derives(&self, start: usize, end: usize, symbol: &Symbol) -> bool {
        end < self.len && start <= end && self.cell(start, end).contains(symbol)
    }
}

// One way a nonterminal was shown to derive a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    // `A -> terminal` over a single token
    Terminal(Symbol),
    // `A -> left right` with `left` covering `start..=at` and `right` covering
    // `at + 1..=end`
    Split { at: usize, left: Symbol, right: Symbol },
}

// Every derivation found for each `(start, end, nonterminal)`, in the order
// the recognizer found them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Backpointers {
    entries: HashMap<(usize, usize, Symbol), Vec<Derivation>>,
}

impl Backpointers {
    fn record(&mut self, start: usize, end: usize, symbol: &Symbol, derivation: Derivation) {
        self.entries.entry((start, end, symbol.clone())).or_default().push(derivation);
    }

    pub fn get(&self, start: usize, end: usize, symbol: &Symbol) -> &[Derivation] {
        self.entries
            .get(&(start, end, symbol.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognition {
    pub accepted: bool,
    pub table: Table,
    pub backpointers: Backpointers,
}

impl Recognition {
    // The symbol trees should be built from: the grammar's original start
    // symbol when it derives the whole sentence on its own, which avoids the
    // wrapper node added by start isolation, and the CNF start otherwise.
    pub fn root<'a>(&self, original_start: &'a Symbol, cnf_start: &'a Symbol) -> Option<&'a Symbol> {
        if !self.accepted || self.table.is_empty() {
            return None;
        }
        let last = self.table.len() - 1;
        if self.table.derives(0, last, original_start) {
            Some(original_start)
        } else {
            Some(cnf_start)
        }
    }

    // The first recorded tree for the whole sentence rooted at `root`.
    pub fn tree(&self, root: &Symbol) -> Result<Tree, CykError> {
        reconstruct_one(&self.backpointers, 0, self.table.len().saturating_sub(1), root)
    }

    // Every tree for the whole sentence rooted at `root`.
    pub fn trees<'a>(&'a self, root: &Symbol) -> Derivations<'a> {
        reconstruct_all(&self.backpointers, 0, self.table.len().saturating_sub(1), root)
    }
}

// Runs CYK over `tokens`. The grammar must be in Chomsky Normal Form.
pub fn recognize(tokens: &[Symbol], grammar: &Grammar) -> Result<Recognition, CykError> {
    let n = tokens.len();

    if n == 0 {
        let accepted = grammar.productions_of(&grammar.start).any(Vec::is_empty);
        return Ok(Recognition {
            accepted,
            table: Table::new(0),
            backpointers: Backpointers::default(),
        });
    }

    let indexes = build_indexes(grammar)?;
    let mut table = Table::new(n);
    let mut backpointers = Backpointers::default();

    for (i, token) in tokens.iter().enumerate() {
        for a in indexes.producing_terminal(token) {
            table.cell_mut(i, i).insert(a.clone());
            backpointers.record(i, i, a, Derivation::Terminal(token.clone()));
        }
    }

    for span in 2..=n {
        for i in 0..=(n - span) {
            let j = i + span - 1;
            let mut found = BTreeSet::new();
            for k in i..j {
                for b in table.cell(i, k) {
                    for c in table.cell(k + 1, j) {
                        for a in indexes.producing_pair(b, c) {
                            found.insert(a.clone());
                            backpointers.record(i, j, a, Derivation::Split {
                                at: k,
                                left: b.clone(),
                                right: c.clone(),
                            });
                        }
                    }
                }
            }
            *table.cell_mut(i, j) = found;
        }
    }

    let accepted = table.derives(0, n - 1, &grammar.start);
    tracing::debug!(tokens = n, accepted, backpointers = backpointers.len(), "ran CYK");

    return Ok(Recognition {
        accepted,
        table,
        backpointers,
    });
}
