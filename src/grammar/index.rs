use std::collections::HashMap;

use super::{Rewrite, Symbol, Word};

/// Reverse lookup from a right hand side to the nonterminals producing it.
///
/// Built once when the grammar is constructed and never modified after, so
/// the CYK inner loop only ever does a hash probe.
#[derive(Debug, PartialEq, Default)]
pub struct ProductionIndex {
    producers: HashMap<Word, Vec<char>>,
}

impl ProductionIndex {
    pub fn new(rules: &HashMap<char, Rewrite>) -> Self {
        let mut producers: HashMap<Word, Vec<char>> = HashMap::new();
        for (lhs, rewrite) in rules {
            for rhs in rewrite {
                producers.entry(rhs.clone()).or_default().push(*lhs);
            }
        }

        // A rule listed twice still names its nonterminal once
        for lhs in producers.values_mut() {
            lhs.sort_unstable();
            lhs.dedup();
        }

        ProductionIndex { producers }
    }

    /// Every nonterminal `A` with a production `A -> rhs`, compared exactly.
    pub fn lookup(&self, rhs: &[Symbol]) -> &[char] {
        self.producers.get(rhs).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct right hand sides.
    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}
