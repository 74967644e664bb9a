use std::collections::{BTreeSet, HashMap};
use std::fmt::Display;

use log::debug;

use super::{Grammar, Rewrite, Symbol, Word};
use crate::error_handling::*;

#[derive(Debug, PartialEq, Clone)]
pub enum GrammarErrorType {
    // No nonterminal was declared or used as a left hand side
    NoNonterminals,
    // No terminal was declared or found in a right hand side
    NoTerminals,
    // No start symbol was set and `S` is not a nonterminal
    MissingStart,
    // The start symbol is not one of the nonterminals
    UndeclaredStart(char),
    // A rule for this nonterminal has an empty right hand side
    EmptyRightHandSide(char),
    // The character is used both as a terminal and a nonterminal
    SymbolClash(char),
}

impl ErrorType for GrammarErrorType {}

impl Display for GrammarErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrammarErrorType::NoNonterminals => write!(f, "The grammar has no nonterminals"),
            GrammarErrorType::NoTerminals => write!(f, "The grammar has no terminals"),
            GrammarErrorType::MissingStart => write!(f, "No start symbol was given and there is no `S` to default to"),
            GrammarErrorType::UndeclaredStart(c) => write!(f, "Start symbol `{}` is not a nonterminal", c),
            GrammarErrorType::EmptyRightHandSide(c) => write!(f, "Rule for `{}` has an empty right hand side", c),
            GrammarErrorType::SymbolClash(c) => write!(f, "`{}` is used both as a terminal and a nonterminal", c),
        }
    }
}

pub type GrammarError = Error<GrammarErrorType>;

/// Collects rules and alphabet declarations, then validates them into an
/// immutable [`Grammar`].
///
/// Symbols that are not declared are classified from the rules: every left
/// hand side is a nonterminal, every other character is a terminal.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GrammarBuilder {
    nonterminals: BTreeSet<char>,
    terminals: BTreeSet<char>,
    // Left hand sides in the order they were first seen
    rules: Vec<(char, Vec<String>)>,
    start: Option<char>,
    location: Location,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Errors from [`build`](Self::build) will point at `location`.
    pub fn located(location: Location) -> Self {
        GrammarBuilder { location, ..Self::default() }
    }

    pub fn rule(self, lhs: char, rhs: &str) -> Self {
        self.rules(lhs, [rhs])
    }

    pub fn rules<'a>(mut self, lhs: char, rhs: impl IntoIterator<Item = &'a str>) -> Self {
        let alternatives = rhs.into_iter().map(str::to_string);
        match self.rules.iter_mut().find(|(symbol, _)| *symbol == lhs) {
            Some((_, existing)) => existing.extend(alternatives),
            None => self.rules.push((lhs, alternatives.collect())),
        }
        self
    }

    pub fn nonterminal(mut self, symbol: char) -> Self {
        self.nonterminals.insert(symbol);
        self
    }

    pub fn terminal(mut self, symbol: char) -> Self {
        self.terminals.insert(symbol);
        self
    }

    pub fn start(mut self, symbol: char) -> Self {
        self.start = Some(symbol);
        self
    }

    fn error(&self, error: GrammarErrorType) -> GrammarError {
        GrammarError { location: self.location.clone(), error }
    }

    // Fills in the alphabets from the rules
    fn infer_alphabets(&self) -> Result<(BTreeSet<char>, BTreeSet<char>), GrammarErrorType> {
        let mut nonterminals = self.nonterminals.clone();
        nonterminals.extend(self.rules.iter().map(|(lhs, _)| *lhs));

        if let Some(clash) = nonterminals.intersection(&self.terminals).next() {
            return Err(GrammarErrorType::SymbolClash(*clash));
        }

        let mut terminals = self.terminals.clone();
        terminals.extend(
            self.rules.iter()
                .flat_map(|(_, alternatives)| alternatives.iter().flat_map(|rhs| rhs.chars()))
                .filter(|c| !nonterminals.contains(c))
        );

        Ok((nonterminals, terminals))
    }

    fn resolve_start(&self, nonterminals: &BTreeSet<char>) -> Result<char, GrammarErrorType> {
        match self.start {
            Some(start) if nonterminals.contains(&start) => Ok(start),
            Some(start) => Err(GrammarErrorType::UndeclaredStart(start)),
            None if nonterminals.contains(&'S') => Ok('S'),
            None => Err(GrammarErrorType::MissingStart),
        }
    }

    fn classify_rules(&self, nonterminals: &BTreeSet<char>) -> Result<HashMap<char, Rewrite>, GrammarErrorType> {
        let mut rules = HashMap::with_capacity(self.rules.len());
        for (lhs, alternatives) in &self.rules {
            let rewrite = alternatives.iter()
                .map(|rhs| {
                    if rhs.is_empty() {
                        return Err(GrammarErrorType::EmptyRightHandSide(*lhs));
                    }
                    Ok(rhs.chars()
                        .map(|c| if nonterminals.contains(&c) { Symbol::Nonterminal(c) } else { Symbol::Terminal(c) })
                        .collect::<Word>())
                })
                .collect::<Result<Rewrite, _>>()?;
            rules.insert(*lhs, rewrite);
        }
        Ok(rules)
    }

    fn validate(&self) -> Result<Grammar, GrammarErrorType> {
        let (nonterminals, terminals) = self.infer_alphabets()?;

        if nonterminals.is_empty() {
            return Err(GrammarErrorType::NoNonterminals);
        }
        if terminals.is_empty() {
            return Err(GrammarErrorType::NoTerminals);
        }

        let start = self.resolve_start(&nonterminals)?;
        let rules = self.classify_rules(&nonterminals)?;

        debug!(
            "Built grammar with {} nonterminals, {} terminals, start `{}`",
            nonterminals.len(), terminals.len(), start
        );
        Ok(Grammar::new(nonterminals, terminals, rules, start))
    }

    pub fn build(self) -> Result<Grammar, GrammarError> {
        self.validate().map_err(|error| self.error(error))
    }
}
