use std::iter::Peekable;
use std::str::Chars;

use itertools::Itertools;

#[derive(PartialEq, Debug)]
pub enum Token {
    Arrow,
    Or,
    Word(String)
}

// Whether the iterator is positioned on `->`
fn at_arrow(line: &Peekable<Chars>) -> bool {
    let mut ahead = line.clone();
    ahead.next() == Some('-') && ahead.next() == Some('>')
}

pub fn lex_word(line: &mut Peekable<Chars>) -> Token {
    let mut text = String::new();
    loop {
        text.extend(line.peeking_take_while(|&c| !c.is_whitespace() && c != '|' && c != '-'));
        // A dash is part of the word unless it starts an arrow
        if line.peek() == Some(&'-') && !at_arrow(line) {
            text.push('-');
            line.next();
        } else {
            break;
        }
    }
    Token::Word(text)
}

pub fn lex_line(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(&c) = line_chars.peek() {
        if at_arrow(&line_chars) {
            line_chars.next();
            line_chars.next();
            tokens.push(Token::Arrow);
        } else if c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if !c.is_whitespace() {
            tokens.push(lex_word(&mut line_chars));
        } else {
            line_chars.next();
        }
    }

    return tokens;
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn word(text: &str) -> Token {
        Token::Word(text.to_string())
    }

    #[test]
    fn lex_normal_word() {
        let lines = vec![
            "alpha bravo charlie",
            "delta",
            "x-ray|yankee",
            "zulu->",
        ];
        // (result from the function, rest of the iterator)
        let answers = vec![
            (word("alpha"), " bravo charlie"),
            (word("delta"), ""),
            (word("x-ray"), "|yankee"),
            (word("zulu"), "->"),
        ];

        for (line, (answer_token, answer_rest)) in zip(lines, answers) {
            let mut chars = line.chars().peekable();
            assert_eq!(lex_word(&mut chars), answer_token);
            assert_eq!(chars.collect::<String>(), answer_rest);
        }
    }

    #[test]
    fn lex_normal_line() {
        let lines = vec![
            "S -> a S b | e",
            "Expr->Expr + Term|Term",
            "A -> -",
            "B->b|c",
        ];
        let answers = vec![
            vec![
                word("S"),
                Token::Arrow,
                word("a"),
                word("S"),
                word("b"),
                Token::Or,
                word("e"),
            ],
            vec![
                word("Expr"),
                Token::Arrow,
                word("Expr"),
                word("+"),
                word("Term"),
                Token::Or,
                word("Term"),
            ],
            vec![
                word("A"),
                Token::Arrow,
                word("-"),
            ],
            vec![
                word("B"),
                Token::Arrow,
                word("b"),
                Token::Or,
                word("c"),
            ],
        ];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(lex_line(line), answer)
        }
    }
}
