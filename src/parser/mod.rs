/*
    This module parses grammar files
*/

mod lexer;

use std::fmt::Display;
use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::grammar::*;
use crate::error_handling::*;
use itertools::Itertools;
use lexer::*;
use log::debug;

#[derive(Debug)]
pub enum CompileErrorType {
    // A line which should contain a rule does not
    MissingEquals,
    // A rule has multiple equals signs
    UnexpectedEquals,
    // A directive appears inside a rule
    UnexpectedDirective,
    // A rule or `%start` names something other than a single character
    MissingNonterminal,
    // An alternative has no symbols
    EmptyAlternative,
    // Somehow a full rewrite was parsed as a single alternative
    // This is a problem with the parser, not the grammar
    UnsplitRewrite,
    // There is an unclosed quote
    UnmatchedQuote,
    // The directive is not one of `%start`, `%terminals`, `%nonterminals`
    UnknownDirective(String),
    // A directive was given nothing to work on
    MissingDirectiveArgument(String),
    // The rules do not make a valid grammar
    Grammar(GrammarErrorType),
    // There was an issue with reading a file
    FileError(std::io::Error),
}

impl ErrorType for CompileErrorType {}

impl PartialEq for CompileErrorType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CompileErrorType::FileError(a), CompileErrorType::FileError(b)) => a.kind() == b.kind(),
            (CompileErrorType::UnknownDirective(a), CompileErrorType::UnknownDirective(b)) => a == b,
            (CompileErrorType::MissingDirectiveArgument(a), CompileErrorType::MissingDirectiveArgument(b)) => a == b,
            (CompileErrorType::Grammar(a), CompileErrorType::Grammar(b)) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

impl Display for CompileErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileErrorType::MissingEquals => write!(f, "Expected `=` after nonterminal"),
            CompileErrorType::UnexpectedEquals => write!(f, "Unexpected `=` encountered"),
            CompileErrorType::UnexpectedDirective => write!(f, "Directives must start their own line"),
            CompileErrorType::MissingNonterminal => write!(f, "Expected a single character nonterminal"),
            CompileErrorType::EmptyAlternative => write!(f, "Alternatives must contain at least one symbol"),
            CompileErrorType::UnsplitRewrite => write!(f, "Rewrite was not fully split (this is a problem with the parser, not the grammar)"),
            CompileErrorType::UnmatchedQuote => write!(f, "Unmatched quotes"),
            CompileErrorType::UnknownDirective(name) => write!(f, "Unknown directive `%{}`", name),
            CompileErrorType::MissingDirectiveArgument(name) => write!(f, "Directive `%{}` needs an argument", name),
            CompileErrorType::Grammar(e) => write!(f, "{}", e),
            CompileErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type CompileError = Error<CompileErrorType>;
pub type CompileErrors = Errors<CompileErrorType>;

fn io_error(error: std::io::Error, file: PathBuf) -> CompileError {
    CompileError {
        location: Location {
            file,
            line: 0
        },
        error: CompileErrorType::FileError(error)
    }
}

pub type Result<T> = std::result::Result<T, CompileErrorType>;
pub type LineResult<T> = std::result::Result<T, CompileError>;
pub type FileResult<T> = std::result::Result<T, CompileErrors>;

// What a single meaningful line of a grammar file says
#[derive(PartialEq, Debug)]
enum Line {
    Rule { symbol: char, alternatives: Vec<String> },
    Start(char),
    Terminals(String),
    Nonterminals(String),
}

fn single_char(text: &str) -> Option<char> {
    text.chars().exactly_one().ok()
}

fn parse_alternative(tokens: &[Token]) -> Result<String> {
    let alternative: String = tokens.iter().map(|t| match t {
        Token::Equals => Err(CompileErrorType::UnexpectedEquals),
        Token::Directive(_) => Err(CompileErrorType::UnexpectedDirective),
        Token::Or => Err(CompileErrorType::UnsplitRewrite),
        Token::Text(s) => Ok(s.as_str())
    }).collect::<Result<Vec<_>>>()?.concat();

    if alternative.is_empty() {
        return Err(CompileErrorType::EmptyAlternative);
    }
    Ok(alternative)
}

fn parse_rewrite(tokens: &[Token]) -> Result<Vec<String>> {
    tokens.split(|t| *t == Token::Or).map(parse_alternative).collect()
}

fn parse_directive(name: &str, arguments: &[Token]) -> Result<Line> {
    let text = arguments.iter().map(|t| match t {
        Token::Text(s) => Ok(s.as_str()),
        Token::Equals => Err(CompileErrorType::UnexpectedEquals),
        Token::Or | Token::Directive(_) => Err(CompileErrorType::UnexpectedDirective),
    }).collect::<Result<Vec<_>>>()?.concat();

    if text.is_empty() {
        return Err(CompileErrorType::MissingDirectiveArgument(name.to_string()));
    }

    match name {
        "start" => single_char(&text).map(Line::Start).ok_or(CompileErrorType::MissingNonterminal),
        "terminals" => Ok(Line::Terminals(text)),
        "nonterminals" => Ok(Line::Nonterminals(text)),
        _ => Err(CompileErrorType::UnknownDirective(name.to_string())),
    }
}

fn parse_line(tokens: &[Token]) -> Result<Line> {
    let symbol = match tokens.first() {
        Some(Token::Directive(name)) => return parse_directive(name, &tokens[1..]),
        Some(Token::Text(s)) => single_char(s).ok_or(CompileErrorType::MissingNonterminal),
        Some(_) | None => Err(CompileErrorType::MissingNonterminal)
    }?;

    if tokens.get(1) != Some(&Token::Equals) {
        return Err(CompileErrorType::MissingEquals)
    }

    let alternatives = parse_rewrite(&tokens[2..])?;

    Ok(Line::Rule { symbol, alternatives })
}

fn parse_lex_line(line: &str, location: Location) -> LineResult<Line> {
    lexer::lex_line(line)
        .and_then(|lexed_line| parse_line(&lexed_line))
        .map_err(|error| CompileError { location, error })
}

fn is_content_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with(';')
}

// Returns an iterator over the lines of a file, with the io errors wrapped
// in CompileError and enumerated
fn file_line_nums<'a>(file: File, path: &'a Path) -> impl Iterator<Item = (usize, LineResult<String>)> + 'a {
    std::io::BufReader::new(file)
        .lines()
        .map(move |line| line.map_err(|e| io_error(e, path.to_path_buf())))
        .enumerate()
        .filter(|(_, line)| line.as_ref().map_or(true, |l| is_content_line(l)))
        .map(|(num, line)| (num + 1, line))
}

fn apply_line(builder: GrammarBuilder, line: Line) -> GrammarBuilder {
    match line {
        Line::Rule { symbol, alternatives } => builder.rules(symbol, alternatives.iter().map(String::as_str)),
        Line::Start(symbol) => builder.start(symbol),
        Line::Terminals(text) => text.chars().fold(builder, GrammarBuilder::terminal),
        Line::Nonterminals(text) => text.chars().fold(builder, GrammarBuilder::nonterminal),
    }
}

fn parse_lines(lines: impl Iterator<Item = (usize, LineResult<String>)>, path: &Path) -> FileResult<GrammarBuilder> {
    let parsed_lines = lines.map(|(num, line_res)| {
        line_res.and_then(|line| parse_lex_line(&line, Location::new(path.to_path_buf(), num)))
    });

    let (lines, errors): (Vec<_>, Vec<_>) = parsed_lines.partition_result();
    if !errors.is_empty() {
        return Err(errors);
    }

    debug!("Parsed {} lines from {}", lines.len(), path.display());
    let builder = GrammarBuilder::located(Location::new(path.to_path_buf(), 0));
    Ok(lines.into_iter().fold(builder, apply_line))
}

/// Parses grammar text, attributing errors to `path`.
pub fn parse_str(text: &str, path: &Path) -> FileResult<GrammarBuilder> {
    let lines = text.lines()
        .enumerate()
        .filter(|(_, line)| is_content_line(line))
        .map(|(num, line)| (num + 1, Ok(line.to_string())));
    parse_lines(lines, path)
}

pub fn parse_file(path: &Path) -> FileResult<GrammarBuilder> {
    let file = File::open(path).map_err(|e| vec![io_error(e, path.to_path_buf())])?;
    parse_lines(file_line_nums(file, path), path)
}

/// Parses a grammar file and validates it into a grammar.
pub fn load(path: &Path) -> FileResult<Grammar> {
    parse_file(path)?.build().map_err(|e| vec![CompileError {
        location: e.location,
        error: CompileErrorType::Grammar(e.error)
    }])
}

#[cfg(test)]
mod tests {
    use std::iter::zip;

    use super::*;

    fn rule(symbol: char, alternatives: &[&str]) -> Line {
        Line::Rule { symbol, alternatives: alternatives.iter().map(|s| s.to_string()).collect() }
    }

    #[test]
    fn parse_normal_alternative() {
        let lines = vec![
            lexer::lex_line("AŚ").unwrap(),
            lexer::lex_line("A B \"c\"").unwrap(),
        ];
        let answers = vec!["AŚ", "ABc"];

        for (line, answer) in zip(lines, answers) {
            assert_eq!(parse_alternative(&line[..]).unwrap(), answer);
        }
    }

    #[test]
    fn parse_malformed_alternative() {
        assert_eq!(parse_alternative(&[Token::Equals]), Err(CompileErrorType::UnexpectedEquals));
        assert_eq!(parse_alternative(&[Token::Or]), Err(CompileErrorType::UnsplitRewrite));
        assert_eq!(parse_alternative(&[]), Err(CompileErrorType::EmptyAlternative));
        assert_eq!(parse_alternative(&[Token::Text(String::new())]), Err(CompileErrorType::EmptyAlternative));
    }

    #[test]
    fn parse_normal_line() {
        let lexed = lexer::lex_line("B = AC | a | c").unwrap();
        assert_eq!(parse_line(&lexed[..]), Ok(rule('B', &["AC", "a", "c"])));

        let lexed = lexer::lex_line("%terminals a b c").unwrap();
        assert_eq!(parse_line(&lexed[..]), Ok(Line::Terminals("abc".to_string())));

        let lexed = lexer::lex_line("%start Ś").unwrap();
        assert_eq!(parse_line(&lexed[..]), Ok(Line::Start('Ś')));
    }

    #[test]
    fn parse_malformed_line() {
        let cases = vec![
            ("alpha = b", CompileErrorType::MissingNonterminal),
            ("S b c", CompileErrorType::MissingEquals),
            ("\"a\" b", CompileErrorType::MissingEquals),
            ("| = a", CompileErrorType::MissingNonterminal),
            ("= a", CompileErrorType::MissingNonterminal),
            ("S = a = b", CompileErrorType::UnexpectedEquals),
            ("S = a || b", CompileErrorType::EmptyAlternative),
            ("S =", CompileErrorType::EmptyAlternative),
            ("%start", CompileErrorType::MissingDirectiveArgument("start".to_string())),
            ("%start ST", CompileErrorType::MissingNonterminal),
            ("%axiom S", CompileErrorType::UnknownDirective("axiom".to_string())),
        ];

        for (line, answer) in cases {
            assert_eq!(parse_line(&lexer::lex_line(line).unwrap()[..]), Err(answer), "{}", line);
        }
    }

    #[test]
    fn parse_text_collects_rules() {
        let text = "; comment\nS = AT | AB\n\nS = c\n%terminals d\n";
        let builder = parse_str(text, Path::new("inline")).unwrap();
        let grammar = builder.build().unwrap();

        assert_eq!(grammar.rewrite('S').unwrap().len(), 3);
        assert!(grammar.terminals().contains(&'d'));
        assert_eq!(grammar.start(), 'S');
    }

    #[test]
    fn parse_normal_file() {
        let grammar = load(Path::new("example_data/small.grammar")).unwrap();
        let expected = GrammarBuilder::new()
            .rules('S', ["AT", "AB"])
            .rule('T', "SB")
            .rule('A', "a")
            .rules('B', ["AC", "a", "c"])
            .rule('C', "c")
            .build()
            .unwrap();

        assert_eq!(grammar, expected);
        assert!(grammar.accepts("aaaca").unwrap());
    }

    #[test]
    fn parse_file_with_directives() {
        let grammar = load(Path::new("example_data/accented.grammar")).unwrap();
        assert_eq!(grammar.start(), 'S');
        assert_eq!(grammar.productions().count(), 17);
        assert!(grammar.accepts("aababb").unwrap());
    }

    #[test]
    fn parse_malformed_file() {
        let example_path = PathBuf::from("example_data/malformed.grammar");
        let example_parsed = parse_file(&example_path).unwrap_err();

        assert_eq!(example_parsed, vec![
            CompileError {
                location: Location::new(example_path.clone(), 3),
                error: CompileErrorType::MissingNonterminal
            },
            CompileError {
                location: Location::new(example_path.clone(), 5),
                error: CompileErrorType::UnexpectedEquals
            },
            CompileError {
                location: Location::new(example_path, 7),
                error: CompileErrorType::UnknownDirective("begin".to_string())
            }
        ]);
    }

    #[test]
    fn invalid_grammar_reported_at_file() {
        let example_path = PathBuf::from("example_data/no_start.grammar");
        assert_eq!(load(&example_path).unwrap_err(), vec![CompileError {
            location: Location::new(example_path, 0),
            error: CompileErrorType::Grammar(GrammarErrorType::MissingStart)
        }]);
    }

    #[test]
    fn missing_file() {
        let errors = parse_file(Path::new("example_data/does_not_exist.grammar")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].error,
            CompileErrorType::FileError(std::io::Error::from(std::io::ErrorKind::NotFound))
        );
    }
}
