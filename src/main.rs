mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use log::info;

use cli::{Cli, Command};
use wordproblem::error_handling::{Error, ErrorType, Location};
use wordproblem::grammar::{spell, GrammarBuilder};
use wordproblem::{parser, Grammar, Limits};

type RunResult = Result<(), Vec<String>>;

// Errors that are not tied to a line are reported against the whole file
fn located<T: ErrorType>(file: &Path, error: T) -> Vec<String> {
    vec![Error { location: Location::new(file.to_path_buf(), 0), error }.to_string()]
}

fn load(file: &Path) -> Result<Grammar, Vec<String>> {
    parser::load(file).map_err(|errors| errors.iter().map(ToString::to_string).collect())
}

fn verdict(accepted: bool) -> &'static str {
    if accepted { "accepted" } else { "rejected" }
}

fn lookup(file: &Path, rhs: &str) -> RunResult {
    let grammar = load(file)?;
    let producers = grammar.lookup(rhs);
    if producers.is_empty() {
        println!("No rule produces `{}`", rhs);
    } else {
        println!("{}", producers.iter().join(", "));
    }
    Ok(())
}

fn recognize(file: &Path, word: &str, table: bool) -> RunResult {
    let grammar = load(file)?;
    let cyk = grammar.recognize(word).map_err(|e| located(file, e))?;
    if table {
        print!("{}", cyk);
    }
    println!("`{}` is {}", word, verdict(cyk.accepts(grammar.start())));
    Ok(())
}

fn enumerate(file: &Path, max_length: usize, word: Option<&str>, all: bool, limits: Limits) -> RunResult {
    let grammar = load(file)?;
    let generations = grammar
        .enumerate_with_limits(max_length, limits)
        .map_err(|e| located(file, e))?;
    info!("Closure of length {} reached after {} generations", max_length, generations.len());

    if let Some(word) = word {
        let target = grammar.terminal_word(word).map_err(|e| located(file, e))?;
        println!("`{}` is {}", word, verdict(generations.contains(&target)));
        return Ok(());
    }

    let shown = if all { generations.len() } else { 1 };
    for (round, generation) in generations.iter().enumerate().skip(generations.len() - shown) {
        let words = generation.iter().map(|w| spell(w)).sorted().join(", ");
        println!("T{}: {{{}}}", round, words);
    }
    Ok(())
}

fn sample(file: &Path, max_length: usize, amount: usize, limits: Limits) -> RunResult {
    let grammar = load(file)?;
    let generations = grammar
        .enumerate_with_limits(max_length, limits)
        .map_err(|e| located(file, e))?;

    let words = generations.sample(amount, &mut rand::thread_rng());
    if words.len() < amount {
        info!("Only {} words of length up to {} exist", words.len(), max_length);
    }
    for word in words {
        println!("{}", word);
    }
    Ok(())
}

fn check(file: &Path, word: &str, limits: Limits) -> RunResult {
    let grammar = load(file)?;
    let by_cyk = grammar.accepts(word).map_err(|e| located(file, e))?;

    let target = grammar.terminal_word(word).map_err(|e| located(file, e))?;
    let by_closure = if target.is_empty() {
        false
    } else {
        grammar
            .enumerate_with_limits(target.len(), limits)
            .map_err(|e| located(file, e))?
            .contains(&target)
    };

    println!("CYK: {}", verdict(by_cyk));
    println!("Closure: {}", verdict(by_closure));
    if by_cyk == by_closure {
        println!("Both procedures agree");
    } else {
        // Expected for grammars outside Chomsky normal form
        println!("The procedures disagree");
    }
    Ok(())
}

fn demo() -> RunResult {
    let to_strings = |e: wordproblem::grammar::GrammarError| vec![e.to_string()];

    println!("Example 1:");
    let first = GrammarBuilder::new()
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
        .map_err(to_strings)?;
    let table = first.recognize("aababb").map_err(|e| vec![e.to_string()])?;
    print!("{}", table);

    println!("\nExample 2:");
    let second = GrammarBuilder::new()
        .rules('S', ["AT", "AB"])
        .rule('T', "SB")
        .rule('A', "a")
        .rules('B', ["AC", "a", "c"])
        .rule('C', "c")
        .build()
        .map_err(to_strings)?;
    let table = second.recognize("aaaca").map_err(|e| vec![e.to_string()])?;
    print!("{}", table);

    println!("\nExample 3:");
    let derivable = second.derives("aaaca", "aaaca".len()).map_err(|e| vec![e.to_string()])?;
    println!("{}", derivable);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Command::Lookup { file, rhs } => lookup(file, rhs),
        Command::Recognize { file, word, table } => recognize(file, word, *table),
        Command::Enumerate { file, max_length, word, all, limits } =>
            enumerate(file, *max_length, word.as_deref(), *all, limits.limits()),
        Command::Sample { file, max_length, amount, limits } =>
            sample(file, *max_length, amount.unwrap_or(1), limits.limits()),
        Command::Check { file, word, limits } => check(file, word, limits.limits()),
        Command::Demo => demo(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(messages) => {
            for message in messages {
                eprintln!("{}", message);
            }
            ExitCode::FAILURE
        }
    }
}
