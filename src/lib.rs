//! Decision procedures for grammars over single-character symbols: CYK
//! recognition and bounded enumeration of derivable words.

pub mod error_handling;
pub mod grammar;
pub mod cyk;
pub mod closure;
pub mod parser;

pub use closure::{ClosureErrorType, Generations, Limits};
pub use cyk::CykTable;
pub use grammar::{Grammar, GrammarBuilder, InputErrorType, Symbol, Word};
