/*
    Chomsky Normal Form conversion and CYK parsing for context-free grammars
*/

pub mod cyk;
pub mod error_handling;
pub mod generator;
pub mod grammar;
pub mod normalize;
pub mod parser;

pub use cyk::{format_bracketed, recognize, reconstruct_all, reconstruct_one, Recognition, Tree};
pub use grammar::{is_cnf, Grammar, Symbol};
pub use normalize::to_cnf;
