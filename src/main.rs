use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use zcalc::calculator::{Base, copy_to_clipboard, paste_from_clipboard};
use zcalc::input::{self, Command};
use zcalc::{Action, CalculatorMode, Session, Settings};

#[derive(Parser, Debug)]
#[command(
    name = "zcalc",
    version,
    about = "A standard and programmer calculator",
    after_help = "Without TOKENS, reads one line of tokens at a time from stdin.\n\
                  Tokens: digits and A-F, '.', + - * / mod = %, 1/x sqr sqrt neg,\n\
                  clear ce back, ms mr mrN mc m+ m-, hex dec oct bin,\n\
                  standard programmer prec group, copy cut paste. Runs like 3+4*2= are split."
)]
struct Cli {
    /// Evaluate with operator precedence (saved)
    #[arg(long)]
    precedence: bool,

    /// Start in programmer mode (saved)
    #[arg(long)]
    programmer: bool,

    /// Number base for programmer mode: 2, 8, 10 or 16 (saved)
    #[arg(long, value_name = "RADIX")]
    base: Option<u32>,

    /// Group decimal digits in thousands (saved)
    #[arg(long)]
    grouping: bool,

    /// Settings file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Do not read or write any settings file
    #[arg(long, conflicts_with = "config")]
    no_save: bool,

    /// Keys to press, e.g. `3 + 4 * 2 =`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    tokens: Vec<String>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout carries the display, logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings = if cli.no_save {
        Settings::in_memory()
    } else if let Some(path) = &cli.config {
        Settings::load_from(path)
    } else {
        Settings::load()
    };

    let mut session = Session::new(settings);
    apply_flags(&mut session, &cli)?;

    if cli.tokens.is_empty() {
        run_repl(&mut session)
    } else {
        run_words(&mut session, cli.tokens.iter().map(String::as_str));
        print_state(&session);
        Ok(())
    }
}

fn apply_flags(session: &mut Session, cli: &Cli) -> Result<()> {
    if cli.precedence && !session.engine().precedence_enabled() {
        session.apply(Action::TogglePrecedence);
    }
    if cli.grouping && !session.settings().use_digit_grouping() {
        session.apply(Action::ToggleDigitGrouping);
    }
    if cli.programmer || cli.base.is_some() {
        session.apply(Action::SetMode(CalculatorMode::Programmer));
    }
    if let Some(radix) = cli.base {
        let base = Base::try_from(radix).context("invalid --base")?;
        session.apply(Action::SetBase(base));
    }
    Ok(())
}

fn run_repl(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut stdout = io::stdout();

    if interactive {
        print_state(session);
    }

    loop {
        if interactive {
            write!(stdout, "> ")?;
            stdout.flush()?;
        }

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if matches!(line, "quit" | "exit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        run_words(session, line.split_whitespace());
        print_state(session);
    }

    Ok(())
}

/// Apply each word in turn, reporting and skipping the ones that are not understood.
fn run_words<'a>(session: &mut Session, words: impl IntoIterator<Item = &'a str>) {
    for word in words {
        match input::parse_word(word) {
            Ok(commands) => {
                for command in commands {
                    execute(session, command);
                }
            }
            Err(err) => warn!(token = word, "Skipping input: {err}"),
        }
    }
}

fn execute(session: &mut Session, command: Command) {
    match command {
        Command::Action(action) => session.apply(action),
        Command::Copy => {
            if let Err(err) = copy_to_clipboard(&session.copy_text()) {
                eprintln!("zcalc: {err}");
            }
        }
        Command::Cut => match copy_to_clipboard(&session.copy_text()) {
            Ok(()) => {
                session.cut_text();
            }
            Err(err) => eprintln!("zcalc: {err}"),
        },
        Command::Paste => match paste_from_clipboard() {
            Ok(text) => {
                if !session.paste_text(&text) {
                    eprintln!("zcalc: clipboard does not hold a number");
                }
            }
            Err(err) => eprintln!("zcalc: {err}"),
        },
    }
}

fn print_state(session: &Session) {
    println!("{}", session.display());

    if session.mode() == CalculatorMode::Programmer {
        let views = session.base_views();
        for base in Base::ALL {
            let marker = if base == session.base() { '*' } else { ' ' };
            println!("{marker}{:<4}{}", base.label(), views.get(base));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_tokens_keep_hyphens() {
        let cli = Cli::try_parse_from(["zcalc", "--no-save", "5", "-", "3", "="]).unwrap();
        assert!(cli.no_save);
        assert_eq!(cli.tokens, ["5", "-", "3", "="]);
    }

    #[test]
    fn test_unknown_words_are_skipped() {
        let mut session = Session::new(Settings::in_memory());
        run_words(&mut session, ["3", "banana", "+", "4", "="]);
        assert_eq!(session.display(), "7");
    }

    #[test]
    fn test_flags_apply_to_session() {
        let cli = Cli::try_parse_from(["zcalc", "--no-save", "--precedence", "--base", "16"]).unwrap();
        let mut session = Session::new(Settings::in_memory());
        apply_flags(&mut session, &cli).unwrap();
        assert!(session.engine().precedence_enabled());
        assert_eq!(session.mode(), CalculatorMode::Programmer);
        assert_eq!(session.base(), Base::Hexadecimal);

        let cli = Cli::try_parse_from(["zcalc", "--no-save", "--base", "7"]).unwrap();
        assert!(apply_flags(&mut session, &cli).is_err());
    }
}
