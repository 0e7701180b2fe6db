use std::fmt::Display;
use std::iter;
use std::rc::Rc;

use super::{Backpointers, CykError, Derivation};
use crate::grammar::Symbol;

// A derivation tree of a CNF grammar. Subtrees are shared between the
// trees of one parse forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tree {
    Leaf { symbol: Symbol, terminal: Symbol },
    Node { symbol: Symbol, left: Rc<Tree>, right: Rc<Tree> },
}

impl Tree {
    pub fn symbol(&self) -> &Symbol {
        match self {
            Tree::Leaf { symbol, .. } | Tree::Node { symbol, .. } => symbol,
        }
    }

    // The terminals at the leaves, left to right
    pub fn yield_terminals(&self) -> Vec<Symbol> {
        match self {
            Tree::Leaf { terminal, .. } => vec![terminal.clone()],
            Tree::Node { left, right, .. } => {
                let mut terminals = left.yield_terminals();
                terminals.extend(right.yield_terminals());
                terminals
            }
        }
    }
}

// Renders `(A a)` for leaves and `(A <left> <right>)` for inner nodes.
pub fn format_bracketed(tree: &Tree) -> String {
    match tree {
        Tree::Leaf { symbol, terminal } => format!("({} {})", symbol, terminal),
        Tree::Node { symbol, left, right } => {
            format!("({} {} {})", symbol, format_bracketed(left), format_bracketed(right))
        }
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_bracketed(self))
    }
}

// Builds one tree for `symbol` over `start..=end`. Where several derivations
// were recorded the first one is followed; which one that is carries no
// meaning beyond the recognizer's iteration order.
pub fn reconstruct_one(backpointers: &Backpointers, start: usize, end: usize, symbol: &Symbol) -> Result<Tree, CykError> {
    let derivation = backpointers.get(start, end, symbol)
        .first()
        .ok_or_else(|| CykError::MissingDerivation {
            start,
            end,
            symbol: symbol.clone(),
        })?;

    match derivation {
        Derivation::Terminal(terminal) => Ok(Tree::Leaf {
            symbol: symbol.clone(),
            terminal: terminal.clone(),
        }),
        Derivation::Split { at, left, right } => Ok(Tree::Node {
            symbol: symbol.clone(),
            left: Rc::new(reconstruct_one(backpointers, start, *at, left)?),
            right: Rc::new(reconstruct_one(backpointers, at + 1, end, right)?),
        }),
    }
}

type TreeIter<'a> = Box<dyn Iterator<Item = Rc<Tree>> + 'a>;

// Lazily enumerates the trees for `symbol` over `start..=end`. The right
// subtrees are enumerated afresh for every left subtree.
fn derivations<'a>(backpointers: &'a Backpointers, start: usize, end: usize, symbol: Symbol) -> TreeIter<'a> {
    let options = backpointers.get(start, end, &symbol);

    Box::new(options.iter().flat_map(move |option| -> TreeIter<'a> {
        match option {
            Derivation::Terminal(terminal) => Box::new(iter::once(Rc::new(Tree::Leaf {
                symbol: symbol.clone(),
                terminal: terminal.clone(),
            }))),
            Derivation::Split { at, left, right } => {
                let (at, symbol) = (*at, symbol.clone());
                Box::new(derivations(backpointers, start, at, left.clone()).flat_map(move |left_tree| {
                    let symbol = symbol.clone();
                    derivations(backpointers, at + 1, end, right.clone()).map(move |right_tree| {
                        Rc::new(Tree::Node {
                            symbol: symbol.clone(),
                            left: Rc::clone(&left_tree),
                            right: right_tree,
                        })
                    })
                }))
            }
        }
    }))
}

// The parse forest for one `(span, symbol)`, produced on demand.
pub struct Derivations<'a> {
    backpointers: &'a Backpointers,
    start: usize,
    end: usize,
    symbol: Symbol,
    trees: TreeIter<'a>,
}

impl<'a> Derivations<'a> {
    // A fresh enumeration of the same forest, from the first tree.
    pub fn restart(&self) -> Derivations<'a> {
        reconstruct_all(self.backpointers, self.start, self.end, &self.symbol)
    }
}

impl Iterator for Derivations<'_> {
    type Item = Tree;

    fn next(&mut self) -> Option<Tree> {
        self.trees.next().map(Rc::unwrap_or_clone)
    }
}

// Every distinct tree for `symbol` over `start..=end`. Yields nothing when
// `symbol` does not derive the span.
pub fn reconstruct_all<'a>(backpointers: &'a Backpointers, start: usize, end: usize, symbol: &Symbol) -> Derivations<'a> {
    Derivations {
        backpointers,
        start,
        end,
        symbol: symbol.clone(),
        trees: derivations(backpointers, start, end, symbol.clone()),
    }
}
