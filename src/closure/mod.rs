/*
    This module enumerates every word of bounded length derivable from the
    start symbol
*/

use std::collections::BTreeSet;
use std::fmt::Display;

use log::{debug, warn};
use rand::prelude::*;

use crate::error_handling::ErrorType;
use crate::grammar::*;

#[derive(Debug, PartialEq, Clone)]
pub enum ClosureErrorType {
    // The bound cannot even hold the start symbol
    BoundTooSmall(usize),
    // More rewrite rounds than allowed were needed
    RoundLimit(usize),
    // A generation grew past the allowed number of words
    WordLimit(usize),
    // The word to look for is not made of terminals
    Input(InputErrorType),
}

impl ErrorType for ClosureErrorType {}

impl Display for ClosureErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClosureErrorType::BoundTooSmall(bound) => write!(f, "Maximum length {} is shorter than the start symbol", bound),
            ClosureErrorType::RoundLimit(rounds) => write!(f, "No fixpoint after {} rounds", rounds),
            ClosureErrorType::WordLimit(words) => write!(f, "A generation grew past {} words", words),
            ClosureErrorType::Input(e) => write!(f, "{}", e),
        }
    }
}

impl From<InputErrorType> for ClosureErrorType {
    fn from(error: InputErrorType) -> Self {
        ClosureErrorType::Input(error)
    }
}

pub type ClosureResult<T> = Result<T, ClosureErrorType>;

/// Resource ceiling for closure generation. `None` means no limit.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Limits {
    pub max_rounds: Option<usize>,
    pub max_words: Option<usize>,
}

impl Limits {
    pub fn unbounded() -> Self {
        Limits { max_rounds: None, max_words: None }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_rounds: Some(10_000), max_words: Some(1_000_000) }
    }
}

// One snapshot of the closure
pub type Generation = BTreeSet<Word>;

/// The successive generations of a bounded closure. The first holds only the
/// start symbol, the last is the fixpoint.
#[derive(Debug, PartialEq, Clone)]
pub struct Generations {
    generations: Vec<Generation>,
}

impl Generations {
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    // Never true, there is always a first generation
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    pub fn get(&self, round: usize) -> Option<&Generation> {
        self.generations.get(round)
    }

    pub fn first(&self) -> &Generation {
        &self.generations[0]
    }

    /// The bounded closure itself.
    pub fn last(&self) -> &Generation {
        &self.generations[self.generations.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Generation> {
        self.generations.iter()
    }

    pub fn contains(&self, word: &[Symbol]) -> bool {
        self.last().contains(word)
    }

    /// Terminal-only words of the closure, spelled out and sorted.
    pub fn terminal_words(&self) -> Vec<String> {
        self.last()
            .iter()
            .filter(|word| word.iter().all(Symbol::is_terminal))
            .map(|word| spell(word))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Picks up to `amount` distinct terminal words at random.
    pub fn sample<R: Rng + ?Sized>(&self, amount: usize, rng: &mut R) -> Vec<String> {
        self.terminal_words()
            .choose_multiple(rng, amount)
            .cloned()
            .collect()
    }
}

/// Every word made by rewriting exactly one occurrence of `lhs` in `word`
/// with `rhs`, one word per occurrence.
fn replace_each_occurrence<'a>(word: &'a [Symbol], lhs: char, rhs: &'a [Symbol]) -> impl Iterator<Item = Word> + 'a {
    word.iter()
        .enumerate()
        .filter(move |(_, symbol)| **symbol == Symbol::Nonterminal(lhs))
        .map(move |(position, _)| {
            let mut rewritten = Word::with_capacity(word.len() + rhs.len() - 1);
            rewritten.extend_from_slice(&word[..position]);
            rewritten.extend_from_slice(rhs);
            rewritten.extend_from_slice(&word[position + 1..]);
            rewritten
        })
}

impl Grammar {
    // One rewrite round over `current`
    fn next_generation(&self, current: &Generation, max_length: usize) -> Generation {
        let mut next = current.clone();
        for (lhs, rhs) in self.productions() {
            for word in current {
                if word.len() + rhs.len() - 1 > max_length {
                    continue;
                }
                next.extend(replace_each_occurrence(word, lhs, rhs));
            }
        }
        next
    }

    /// Bounded closure with the default [`Limits`].
    pub fn enumerate(&self, max_length: usize) -> ClosureResult<Generations> {
        self.enumerate_with_limits(max_length, Limits::default())
    }

    /// Rewrites the start symbol round after round, keeping every word no
    /// longer than `max_length`, until a round adds nothing.
    pub fn enumerate_with_limits(&self, max_length: usize, limits: Limits) -> ClosureResult<Generations> {
        if max_length < 1 {
            return Err(ClosureErrorType::BoundTooSmall(max_length));
        }

        let mut generations = vec![Generation::from([vec![Symbol::Nonterminal(self.start())]])];
        loop {
            let round = generations.len();
            let current = &generations[round - 1];
            let next = self.next_generation(current, max_length);
            // Words are only ever added, so equal size means equal sets
            if next.len() == current.len() {
                debug!("Fixpoint after {} rounds with {} words", round, next.len());
                return Ok(Generations { generations });
            }

            if let Some(max) = limits.max_rounds.filter(|max| round > *max) {
                warn!("No fixpoint within {} rounds", max);
                return Err(ClosureErrorType::RoundLimit(max));
            }
            if let Some(max) = limits.max_words.filter(|max| next.len() > *max) {
                warn!("Generation {} has {} words, more than {}", round, next.len(), max);
                return Err(ClosureErrorType::WordLimit(max));
            }

            debug!("Generation {}: {} words", round, next.len());
            generations.push(next);
        }
    }

    /// Whether `word` is derivable without any intermediate word growing past
    /// `max_length`.
    pub fn derives(&self, word: &str, max_length: usize) -> ClosureResult<bool> {
        let target = self.terminal_word(word)?;
        if target.is_empty() || target.len() > max_length {
            return Ok(false);
        }
        Ok(self.enumerate(max_length)?.contains(&target))
    }
}
