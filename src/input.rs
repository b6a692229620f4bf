//! Translation of typed text into calculator actions.
//!
//! Input is split on whitespace. Each word is either a keyword (`sqrt`, `ms`,
//! `hex`, ...) or a compact run of keypad characters such as `3+4*2=`, which is
//! broken into one action per character. Keywords are checked first, so `dec`
//! switches base rather than typing the hex digits D, E, C.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::calculator::{Base, Operator};
use crate::session::Action;
use crate::settings::CalculatorMode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown input '{0}'")]
    UnknownToken(String),
}

/// One step of input: a calculator action or a clipboard command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Action(Action),
    Copy,
    Cut,
    Paste,
}

impl From<Action> for Command {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

lazy_static! {
    /// A run of keypad characters: digits, hex letters, point, operators.
    static ref KEYPAD_RUN: Regex = Regex::new(r"^[0-9A-Fa-f.+\-*/%=]+$").unwrap();

    /// Recall of a specific memory slot, e.g. `mr2`.
    static ref MEMORY_SLOT: Regex = Regex::new(r"^mr(\d+)$").unwrap();
}

/// Parse one line of input into commands. Fails on the first unreadable word.
pub fn parse_line(line: &str) -> Result<Vec<Command>, InputError> {
    parse_words(line.split_whitespace())
}

/// Parse a sequence of words into commands.
pub fn parse_words<'a>(
    words: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<Command>, InputError> {
    let mut commands = Vec::new();
    for word in words {
        commands.extend(parse_word(word)?);
    }
    Ok(commands)
}

/// Parse a single whitespace-free word.
pub fn parse_word(word: &str) -> Result<Vec<Command>, InputError> {
    let lower = word.to_ascii_lowercase();
    if let Some(command) = keyword(&lower) {
        return Ok(vec![command]);
    }

    if let Some(caps) = MEMORY_SLOT.captures(&lower)
        && let Ok(slot) = caps[1].parse::<usize>()
    {
        return Ok(vec![Action::MemoryRecallAt(slot).into()]);
    }

    if KEYPAD_RUN.is_match(word) {
        return Ok(word.chars().filter_map(keypad_char).map(Command::from).collect());
    }

    Err(InputError::UnknownToken(word.to_string()))
}

fn keyword(word: &str) -> Option<Command> {
    let action = match word {
        "mod" => Action::Operator(Operator::Modulo),
        "1/x" | "recip" => Action::Reciprocal,
        "sqr" | "x^2" => Action::Square,
        "sqrt" => Action::SquareRoot,
        "neg" | "+/-" => Action::Negate,
        "clear" | "esc" => Action::Clear,
        "ce" => Action::ClearEntry,
        "back" | "bs" => Action::Backspace,
        "ms" => Action::MemoryStore,
        "mr" => Action::MemoryRecall,
        "mc" => Action::MemoryClear,
        "m+" => Action::MemoryAdd,
        "m-" => Action::MemorySubtract,
        "hex" => Action::SetBase(Base::Hexadecimal),
        "dec" => Action::SetBase(Base::Decimal),
        "oct" => Action::SetBase(Base::Octal),
        "bin" => Action::SetBase(Base::Binary),
        "standard" => Action::SetMode(CalculatorMode::Standard),
        "programmer" => Action::SetMode(CalculatorMode::Programmer),
        "prec" => Action::TogglePrecedence,
        "group" => Action::ToggleDigitGrouping,
        "copy" => return Some(Command::Copy),
        "cut" => return Some(Command::Cut),
        "paste" => return Some(Command::Paste),
        _ => return None,
    };
    Some(Command::Action(action))
}

fn keypad_char(c: char) -> Option<Action> {
    let action = match c {
        '.' => Action::DecimalPoint,
        '=' => Action::Evaluate,
        '%' => Action::Percentage,
        '+' => Action::Operator(Operator::Add),
        '-' => Action::Operator(Operator::Subtract),
        '*' => Action::Operator(Operator::Multiply),
        '/' => Action::Operator(Operator::Divide),
        c if c.is_ascii_hexdigit() => Action::Digit(c),
        _ => return None,
    };
    Some(action)
}
