/*
    This module loads grammars from text files of the form

        S -> a S b | e

    The first rule's left-hand side is the start symbol, `e` alone is the
    empty alternative and symbols starting with an uppercase letter are
    nonterminals.
*/

mod lexer;
mod verifier;

use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use thiserror::Error;

use crate::error_handling::*;
use crate::grammar::*;
use lexer::*;
use verifier::undefined_nonterminals;

// The word standing for the empty alternative
pub const EPSILON: &str = "e";

#[derive(Debug, Error)]
pub enum LoadErrorType {
    // A line which should contain a rule does not
    #[error("Expected `->` after the left-hand side")]
    MissingArrow,
    // A rule has multiple arrows
    #[error("Unexpected `->` encountered")]
    UnexpectedArrow,
    // A rule line starts with the arrow
    #[error("Missing left-hand side before `->`")]
    MissingLhs,
    // The left-hand side is more than one symbol
    #[error("Unexpected `{0}` in left-hand side")]
    UnexpectedSymbol(String),
    // A nonterminal is used but has no rule. Reported as a warning only
    #[error("`{0}` has no rules and derives nothing")]
    UndefinedNonterminal(String),
    // Somehow a full rule body was parsed as a single alternative
    // This is a problem with cnf-cyk, not the grammar
    #[error("Alternatives were not fully split (this is a problem with cnf-cyk, not the grammar)")]
    UnsplitAlternatives,
    // The file has no rules, so there is no start symbol
    #[error("No rules found, cannot pick a start symbol")]
    NoRules,
    // There was an issue with reading a file
    #[error("File error: {0}")]
    FileError(std::io::Error),
}

impl ErrorType for LoadErrorType {}

impl PartialEq for LoadErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LoadErrorType::FileError(a), LoadErrorType::FileError(b)) => a.kind() == b.kind(),
            (LoadErrorType::UnexpectedSymbol(a), LoadErrorType::UnexpectedSymbol(b)) => a == b,
            (LoadErrorType::UndefinedNonterminal(a), LoadErrorType::UndefinedNonterminal(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

pub type LoadError = Error<LoadErrorType>;
pub type LoadErrors = Errors<LoadErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> LoadError {
    LoadError {
        location: Location {
            file,
            line: 0
        },
        error: LoadErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, LoadErrorType>;
pub type LineResult<T> = std::result::Result<T, LoadError>;
pub type FileResult<T> = std::result::Result<T, LoadErrors>;

// The symbols of one alternative, empty for epsilon
pub type Alternative = Vec<String>;

#[derive(PartialEq, Debug)]
struct Rule {
    symbol: String,
    alternatives: Vec<Alternative>,
    location: Location
}

fn parse_alternative(tokens: &[Token]) -> Result<Alternative> {
    tokens.iter()
        .map(|t| match t {
            Token::Arrow => Err(LoadErrorType::UnexpectedArrow),
            Token::Or => Err(LoadErrorType::UnsplitAlternatives),
            Token::Word(s) => Ok(s.clone())
        })
        // `e` next to other symbols is the identity
        .filter(|word| word.as_ref().map_or(true, |w| w != EPSILON))
        .collect()
}

fn parse_alternatives(tokens: &[Token]) -> Result<Vec<Alternative>> {
    tokens.split(|t| *t == Token::Or)
        // `A -> a |` has no second alternative
        .filter(|alternative| !alternative.is_empty())
        .map(parse_alternative)
        .collect()
}

fn parse_line(tokens: &[Token], location: Location) -> Result<Rule> {
    let arrow = tokens.iter()
        .position(|t| *t == Token::Arrow)
        .ok_or(LoadErrorType::MissingArrow)?;

    let symbol = match &tokens[..arrow] {
        [Token::Word(s)] => s.clone(),
        [] => return Err(LoadErrorType::MissingLhs),
        [_, Token::Word(extra), ..] => return Err(LoadErrorType::UnexpectedSymbol(extra.clone())),
        _ => return Err(LoadErrorType::UnexpectedSymbol("|".to_string())),
    };

    let alternatives = parse_alternatives(&tokens[arrow + 1..])?;

    return Ok(Rule {
        symbol,
        alternatives,
        location
    });
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Rule> {
    parse_line(&lexer::lex_line(line), location.clone())
        .map_err(|error| LoadError { location, error })
}

fn is_rule_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#') && !line.starts_with("//")
}

// Words starting with an uppercase letter name nonterminals
fn is_nonterminal_name(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn grammar_from_rules(rules: Vec<Rule>, file: &Path) -> FileResult<Grammar> {
    let Some(first) = rules.first() else {
        return Err(vec![LoadError {
            location: Location {
                file: file.to_path_buf(),
                line: 0
            },
            error: LoadErrorType::NoRules
        }]);
    };

    let mut grammar = Grammar::new(first.symbol.as_str());
    for rule in &rules {
        grammar.add_nonterminal(rule.symbol.as_str());
        for word in rule.alternatives.iter().flatten() {
            if is_nonterminal_name(word) {
                grammar.add_nonterminal(word.as_str());
            }
        }
    }
    for word in rules.iter().flat_map(|rule| rule.alternatives.iter().flatten()) {
        let symbol = Symbol::from(word.as_str());
        if !grammar.is_nonterminal(&symbol) {
            grammar.add_terminal(symbol);
        }
    }

    for rule in &rules {
        for alternative in &rule.alternatives {
            let rhs = alternative.iter().map(|word| Symbol::from(word.as_str())).collect();
            grammar.add_production(rule.symbol.as_str(), rhs);
        }
    }

    for warning in undefined_nonterminals(&grammar, &rules) {
        tracing::warn!("{}", warning);
    }

    return Ok(grammar);
}

// Parses numbered lines, collecting every line error
fn parse_lines(lines: impl Iterator<Item = (usize, LineResult<String>)>, file: &Path) -> FileResult<Grammar> {
    let parsed_lines = lines.map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location {
            file: file.to_path_buf(),
            line: num
        }))
    });

    let (rules, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if errors.len() > 0 {
        return Err(errors);
    }

    let grammar = grammar_from_rules(rules, file)?;
    tracing::debug!(
        file = %file.display(),
        start = %grammar.start,
        productions = grammar.production_count(),
        "loaded grammar"
    );
    return Ok(grammar);
}

// Returns an iterator over the rule lines of a file, with the io errors
// wrapped in LoadError and enumerated
fn file_line_nums<'a>(file: File, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    std::io::BufReader::new(file)
        .lines()
        .map(move |line| line.map_err(|e| io_error(e, path.to_path_buf())))
        .enumerate()
        .filter(|(_, line)| line.as_ref().is_ok_and(|l| is_rule_line(l)) || line.is_err())
        .map(|(num, line)| (num + 1, line))
}

pub fn parse_file(path: &Path) -> FileResult<Grammar> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.to_path_buf())])?;
    return parse_lines(file_line_nums(file, path), path);
}

// Loads a grammar from text. Error locations only carry line numbers.
pub fn parse_str(text: &str) -> FileResult<Grammar> {
    let lines = text.lines()
        .enumerate()
        .filter(|(_, line)| is_rule_line(line))
        .map(|(num, line)| (num + 1, Ok::<_, LoadError>(line.to_string())));

    return parse_lines(lines, Path::new(""));
}
