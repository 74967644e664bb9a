/*
    This module is for storing and querying grammars
*/

mod builder;
mod index;

pub use builder::{GrammarBuilder, GrammarError, GrammarErrorType};
pub use index::ProductionIndex;

use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use itertools::Itertools;

use crate::error_handling::ErrorType;

// The base unit in a grammar rule. Every character is tagged explicitly,
// its case means nothing.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum Symbol {
    Terminal(char),
    Nonterminal(char),
}

impl Symbol {
    pub fn character(&self) -> char {
        match self {
            Symbol::Terminal(c) | Symbol::Nonterminal(c) => *c,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.character())
    }
}

// A sentential form, also used for right hand sides
pub type Word = Vec<Symbol>;

// The alternatives of a rewrite rule, duplicates included
pub type Rewrite = Vec<Word>;

/// Renders a word as the concatenation of its characters.
pub fn spell(word: &[Symbol]) -> String {
    word.iter().map(Symbol::character).collect()
}

#[derive(Debug, PartialEq, Clone)]
pub enum InputErrorType {
    // A character of the input is not in the terminal alphabet
    NotATerminal { symbol: char, position: usize },
}

impl ErrorType for InputErrorType {}

impl Display for InputErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputErrorType::NotATerminal { symbol, position } =>
                write!(f, "`{}` at position {} is not a terminal of the grammar", symbol, position),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Grammar {
    nonterminals: BTreeSet<char>,
    terminals: BTreeSet<char>,
    rules: HashMap<char, Rewrite>,
    start: char,
    index: ProductionIndex,
}

impl Grammar {
    // Only the builder creates grammars, after validating the parts
    fn new(nonterminals: BTreeSet<char>, terminals: BTreeSet<char>, rules: HashMap<char, Rewrite>, start: char) -> Self {
        let index = ProductionIndex::new(&rules);
        Grammar { nonterminals, terminals, rules, start, index }
    }

    pub fn start(&self) -> char {
        self.start
    }

    pub fn nonterminals(&self) -> &BTreeSet<char> {
        &self.nonterminals
    }

    pub fn terminals(&self) -> &BTreeSet<char> {
        &self.terminals
    }

    pub fn index(&self) -> &ProductionIndex {
        &self.index
    }

    /// The alternatives listed for `lhs`, in the order they were added.
    pub fn rewrite(&self, lhs: char) -> Option<&Rewrite> {
        self.rules.get(&lhs)
    }

    /// Every production `lhs -> rhs` of the grammar.
    pub fn productions(&self) -> impl Iterator<Item = (char, &Word)> + '_ {
        self.rules
            .iter()
            .flat_map(|(lhs, rewrite)| rewrite.iter().map(move |rhs| (*lhs, rhs)))
    }

    pub fn classify(&self, c: char) -> Option<Symbol> {
        if self.nonterminals.contains(&c) {
            Some(Symbol::Nonterminal(c))
        } else if self.terminals.contains(&c) {
            Some(Symbol::Terminal(c))
        } else {
            None
        }
    }

    /// Converts a string of terminal characters into a word, failing on the
    /// first character outside the terminal alphabet.
    pub fn terminal_word(&self, text: &str) -> Result<Word, InputErrorType> {
        text.chars()
            .enumerate()
            .map(|(position, symbol)| {
                if self.terminals.contains(&symbol) {
                    Ok(Symbol::Terminal(symbol))
                } else {
                    Err(InputErrorType::NotATerminal { symbol, position })
                }
            })
            .collect()
    }

    /// Every nonterminal with a production whose right hand side spells
    /// exactly `rhs`. Undeclared characters match nothing.
    pub fn lookup(&self, rhs: &str) -> &[char] {
        match rhs.chars().map(|c| self.classify(c)).collect::<Option<Word>>() {
            Some(word) => self.index.lookup(&word),
            None => &[],
        }
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Start symbol first, the rest in alphabet order
        let order = std::iter::once(self.start)
            .chain(self.rules.keys().copied().filter(|lhs| *lhs != self.start).sorted());

        for lhs in order {
            if let Some(rewrite) = self.rules.get(&lhs) {
                writeln!(f, "{} = {}", lhs, rewrite.iter().map(|rhs| spell(rhs)).join(" | "))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    // S→AŚ|AY|BX|CS|c, Ś→BC, X→AS|BQ|a, Q→XX, Y→BS|AÝ|b, Ý→YY, A→a, B→b, C→c
    pub fn accented_grammar() -> Grammar {
        GrammarBuilder::new()
            .rules('S', ["AŚ", "AY", "BX", "CS", "c"])
            .rule('Ś', "BC")
            .rules('X', ["AS", "BQ", "a"])
            .rule('Q', "XX")
            .rules('Y', ["BS", "AÝ", "b"])
            .rule('Ý', "YY")
            .rule('A', "a")
            .rule('B', "b")
            .rule('C', "c")
            .build()
            .unwrap()
    }

    // S→AT|AB, T→SB, A→a, B→AC|a|c, C→c
    pub fn small_grammar() -> Grammar {
        GrammarBuilder::new()
            .rules('S', ["AT", "AB"])
            .rule('T', "SB")
            .rule('A', "a")
            .rules('B', ["AC", "a", "c"])
            .rule('C', "c")
            .build()
            .unwrap()
    }

    #[test]
    fn classify_symbols() {
        let grammar = accented_grammar();
        assert_eq!(grammar.classify('Ś'), Some(Symbol::Nonterminal('Ś')));
        assert_eq!(grammar.classify('b'), Some(Symbol::Terminal('b')));
        assert_eq!(grammar.classify('z'), None);
    }

    #[test]
    fn terminal_word_rejects_nonterminals() {
        let grammar = small_grammar();
        assert_eq!(
            grammar.terminal_word("ac").unwrap(),
            vec![Symbol::Terminal('a'), Symbol::Terminal('c')]
        );
        assert_eq!(
            grammar.terminal_word("aSa").unwrap_err(),
            InputErrorType::NotATerminal { symbol: 'S', position: 1 }
        );
        assert_eq!(
            grammar.terminal_word("ax").unwrap_err(),
            InputErrorType::NotATerminal { symbol: 'x', position: 1 }
        );
    }

    #[test]
    fn lookup_by_string() {
        let grammar = small_grammar();
        assert_eq!(grammar.lookup("a"), &['A', 'B']);
        assert_eq!(grammar.lookup("SB"), &['T']);
        assert_eq!(grammar.lookup("c"), &['B', 'C']);
        assert!(grammar.lookup("BA").is_empty());
        assert!(grammar.lookup("xy").is_empty());
        assert!(grammar.lookup("").is_empty());
    }

    #[test]
    fn productions_cover_every_alternative() {
        let grammar = accented_grammar();
        assert_eq!(grammar.productions().count(), 17);
        assert!(grammar.productions().all(|(lhs, rhs)| grammar.rewrite(lhs).unwrap().contains(rhs)));
    }

    #[test]
    fn display_lists_start_first() {
        let grammar = small_grammar();
        let text = grammar.to_string();
        assert_eq!(text.lines().next(), Some("S = AT | AB"));
        assert!(text.contains("B = AC | a | c\n"));
        assert_eq!(text.lines().count(), 5);
    }

    #[test]
    fn spell_word() {
        assert_eq!(spell(&[Symbol::Nonterminal('A'), Symbol::Terminal('c')]), "Ac");
        assert_eq!(spell(&[]), "");
    }
}
