/*
    This module recognizes words with the CYK algorithm
*/

use std::collections::BTreeSet;
use std::fmt::Display;

use itertools::Itertools;
use log::{debug, trace};

use crate::grammar::*;

// The nonterminals deriving one span of the input
pub type Cell = BTreeSet<char>;

/// Triangular CYK table. Row `i` holds the spans of length `i + 1`, column `j`
/// the span starting at offset `j`.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct CykTable {
    rows: Vec<Vec<Cell>>,
}

impl CykTable {
    fn with_length(n: usize) -> Self {
        CykTable {
            rows: (0..n).map(|i| vec![Cell::new(); n - i]).collect(),
        }
    }

    /// Length of the recognized word.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, i: usize, j: usize) -> Option<&Cell> {
        self.rows.get(i).and_then(|row| row.get(j))
    }

    /// The cell covering the whole word, absent for the empty word.
    pub fn top(&self) -> Option<&Cell> {
        self.rows.last().and_then(|row| row.first())
    }

    pub fn accepts(&self, start: char) -> bool {
        self.top().is_some_and(|cell| cell.contains(&start))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

impl Display for CykTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            let cells = row.iter()
                .map(|cell| if cell.is_empty() { "-".to_string() } else { format!("{{{}}}", cell.iter().join(", ")) })
                .join("  ");
            writeln!(f, "{:>3}: {}", i + 1, cells)?;
        }
        Ok(())
    }
}

pub type RecognizeResult = Result<CykTable, InputErrorType>;

impl Grammar {
    /// Builds the full CYK table for `word`.
    ///
    /// Every character must be a terminal of the grammar. The empty word
    /// yields an empty table, which accepts nothing.
    pub fn recognize(&self, word: &str) -> RecognizeResult {
        let symbols = self.terminal_word(word)?;
        let n = symbols.len();
        let mut table = CykTable::with_length(n);

        for (j, symbol) in symbols.iter().enumerate() {
            table.rows[0][j].extend(self.index().lookup(std::slice::from_ref(symbol)));
        }

        for i in 1..n {
            for j in 0..n - i {
                let mut cell = Cell::new();
                for k in 0..i {
                    let left = &table.rows[k][j];
                    let right = &table.rows[i - k - 1][j + k + 1];
                    for (a, b) in left.iter().cartesian_product(right.iter()) {
                        cell.extend(self.index().lookup(&[Symbol::Nonterminal(*a), Symbol::Nonterminal(*b)]));
                    }
                }
                trace!("span ({}, {}) of `{}`: {:?}", i, j, word, cell);
                table.rows[i][j] = cell;
            }
        }

        debug!("Recognized `{}`: top cell {:?}", word, table.top());
        Ok(table)
    }

    /// Whether the start symbol derives `word`, by CYK.
    pub fn accepts(&self, word: &str) -> Result<bool, InputErrorType> {
        Ok(self.recognize(word)?.accepts(self.start()))
    }
}
