mod cli;

use std::io::BufRead;
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use rand::prelude::*;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use cnf_cyk::cyk::{recognize, CykError};
use cnf_cyk::error_handling::{Error, Location};
use cnf_cyk::generator::Generator;
use cnf_cyk::grammar::{Grammar, Symbol};
use cnf_cyk::normalize::to_cnf;
use cnf_cyk::parser;

fn sample(grammar: &Grammar, cli: &Cli, amount: u32) -> ExitCode {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let generator = Generator::new(grammar, cli.depth);

    for _ in 0..amount {
        match generator.generate(&mut rng) {
            Ok(sentence) => println!("{}", sentence.iter().join(" ")),
            Err(error) => {
                let error = Error {
                    location: Location {
                        file: cli.file.clone(),
                        line: 0
                    },
                    error
                };
                eprintln!("{}", error);
                return ExitCode::FAILURE;
            }
        }
    }

    return ExitCode::SUCCESS;
}

fn parse_sentence(text: &str, original: &Grammar, cnf: &Grammar, cli: &Cli) -> Result<(), CykError> {
    let tokens = text.split_whitespace().map(Symbol::from).collect_vec();
    let recognition = recognize(&tokens, cnf)?;
    println!("Accepted: {}", recognition.accepted);

    let Some(root) = recognition.root(&original.start, &cnf.start) else {
        return Ok(());
    };

    if cli.all {
        let limit = cli.limit.unwrap_or(usize::MAX);
        for tree in recognition.trees(root).take(limit) {
            println!("{}", tree);
        }
    } else {
        println!("{}", recognition.tree(root)?);
    }

    return Ok(());
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let grammar = match parser::parse_file(&cli.file) {
        Ok(grammar) => grammar,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", error);
            }
            return ExitCode::FAILURE;
        }
    };

    if let Some(amount) = cli.sample {
        return sample(&grammar, &cli, amount);
    }

    let cnf = to_cnf(grammar.clone());
    if cli.show_grammar {
        println!("{}", cnf);
    }

    let sentences: Box<dyn Iterator<Item = std::io::Result<String>>> = match &cli.sentence {
        Some(sentence) => Box::new(std::iter::once(Ok(sentence.clone()))),
        None => Box::new(std::io::stdin().lock().lines()),
    };

    for line in sentences {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                eprintln!("Error reading sentence: {}", error);
                return ExitCode::FAILURE;
            }
        };
        if let Err(error) = parse_sentence(&line, &grammar, &cnf, &cli) {
            eprintln!("{}", error);
            return ExitCode::FAILURE;
        }
    }

    return ExitCode::SUCCESS;
}
