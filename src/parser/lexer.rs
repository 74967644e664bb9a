use itertools::{Itertools, PeekingNext};

use super::{CompileErrorType, Result};

#[derive(PartialEq, Debug)]
pub enum Token {
    Equals,
    Or,
    Directive(String),
    Text(String)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '=' || c == '|' || c == '\"'
}

// Quoted text is taken literally, so `=`, `|` and spaces can be symbols
pub fn lex_quoted(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    line.next(); // Consume open quote
    let token_text = line.peeking_take_while(|&c| c != '\"').collect();

    // Check if there is a close quote and consume it if there is
    if line.next() != Some('\"') {
        return Err(CompileErrorType::UnmatchedQuote);
    }

    Ok(Token::Text(token_text))
}

pub fn lex_text(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    Ok(Token::Text(line.peeking_take_while(|&c| !is_separator(c)).collect()))
}

pub fn lex_directive(line: &mut impl PeekingNext<Item = char>) -> Result<Token> {
    line.next(); // Consume percent sign
    Ok(Token::Directive(line.peeking_take_while(|&c| !is_separator(c)).collect()))
}

pub fn lex_line(line: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();

    let mut line_chars = line.chars().peekable();

    while let Some(c) = line_chars.peek() {
        if *c == '=' {
            line_chars.next();
            tokens.push(Token::Equals);
        } else if *c == '|' {
            line_chars.next();
            tokens.push(Token::Or);
        } else if *c == '\"' {
            tokens.push(lex_quoted(&mut line_chars)?);
        } else if *c == '%' && tokens.is_empty() {
            tokens.push(lex_directive(&mut line_chars)?);
        } else if !c.is_whitespace() {
            tokens.push(lex_text(&mut line_chars)?);
        } else {
            line_chars.next();
        }
    }

    Ok(tokens)
}
