use std::io::Read;

use anyhow::{Context as _, Result};
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use clap::{App, Arg, ArgMatches};
use ski::{
    iota,
    parser::{self, Syntax},
    prelude::*,
    reducer::DEFAULT_MAX_STEPS,
    session::{Session, Settings},
};
use util::repl;

fn build_report(e: Error) -> Report<Span> {
    use chumsky::error::SimpleReason;
    let report = Report::build(ReportKind::Error, (), e.span().start);
    match e.reason() {
        SimpleReason::Unexpected => {
            let found = e.found().map(String::as_str).unwrap_or("end of the input");
            let expected = e
                .expected()
                .map(|t| t.as_ref().map(String::as_str).unwrap_or("end of the input"))
                .collect::<Vec<_>>()
                .join(", ");
            let expected = if expected.is_empty() {
                "something else"
            } else {
                &expected
            };
            report
                .with_message(format!("Unexpected {found}, expected {expected}",))
                .with_label(
                    Label::new(e.span())
                        .with_message(format!("Unexpected {}", found.fg(Color::Red)))
                        .with_color(Color::Red),
                )
        }
        SimpleReason::Unclosed { span, delimiter } => report
            .with_message(format!("Unclosed delimiter {}", delimiter.fg(Color::Yellow)))
            .with_label(
                Label::new(span.clone())
                    .with_message(format!(
                        "Unclosed delimiter {}",
                        delimiter.fg(Color::Yellow)
                    ))
                    .with_color(Color::Yellow),
            )
            .with_label(
                Label::new(e.span())
                    .with_message(format!(
                        "Must be closed before this {}",
                        e.found()
                            .map(String::as_str)
                            .unwrap_or("end of the input")
                            .fg(Color::Red)
                    ))
                    .with_color(Color::Red),
            ),
        SimpleReason::Custom(msg) => report.with_message(msg).with_label(
            Label::new(e.span())
                .with_message(format!("{}", msg.fg(Color::Red)))
                .with_color(Color::Red),
        ),
    }
    .finish()
}

fn print_reports(input: &str, es: Vec<Error>) -> Result<()> {
    for e in es {
        build_report(e).eprint(Source::from(input))?;
    }
    Ok(())
}

/// Splits `:cmd args` into `("cmd", "args")`; anything else is `("", input)`.
fn split_command(input: &str) -> (&str, &str) {
    match input.strip_prefix(':') {
        Some(stripped) => {
            let stripped = stripped.trim();
            stripped.split_once(' ').unwrap_or((stripped, ""))
        }
        None => ("", input),
    }
}

type CommandResult<'a> = std::result::Result<(), (&'a str, Vec<Error>)>;

struct Repl {
    session: Session,
}
impl Repl {
    fn tokenize<'i>(&self, input: &'i str) -> CommandResult<'i> {
        let tokens = parser::tokenize(input, self.session.settings().syntax)
            .map_err(|es| (input, es))?
            .iter()
            .map(Spanned::value)
            .cloned()
            .collect::<Vec<_>>();
        println!("{tokens:?}");
        Ok(())
    }

    fn parse<'i>(&self, input: &'i str) -> CommandResult<'i> {
        let term = parser::parse_term(input, self.session.settings().syntax)
            .map_err(|es| (input, es))?;
        println!("{term}");
        Ok(())
    }

    fn encode<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let term = self.session.encode(input).map_err(|es| (input, es))?;
        println!("{term}");
        Ok(())
    }

    fn jot(&self, input: &str) {
        match iota::jot(input) {
            Ok(term) => {
                for line in self.session.reduce_term(term) {
                    println!("{line}");
                }
            }
            Err(e) => eprintln!("{e}"),
        }
    }

    fn trace<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let trace = self.session.settings().trace;
        self.session.settings_mut().trace = true;
        let result = self.evaluate(input);
        self.session.settings_mut().trace = trace;
        result
    }

    fn evaluate<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let lines = self.session.execute(input).map_err(|es| (input, es))?;
        for line in lines {
            println!("{line}");
        }
        Ok(())
    }

    fn set_steps(&mut self, input: &str) {
        let input = input.trim();
        if input.is_empty() {
            println!("{}", self.session.settings().max_steps);
            return;
        }
        match input.parse::<usize>() {
            Ok(max_steps) => self.session.settings_mut().max_steps = max_steps,
            Err(e) => eprintln!("Invalid step limit {input}: {e}"),
        }
    }

    fn show_definitions(&self) {
        for (name, term) in self.session.registry().aliases() {
            println!("{name} = {term}");
        }
        let mut variables = self
            .session
            .registry()
            .variables()
            .map(|name| name.as_str())
            .collect::<Vec<_>>();
        if !variables.is_empty() {
            variables.sort_unstable();
            println!("variables: {}", variables.join(" "));
        }
    }

    fn show_help() {
        println!(
            "{}",
            r#"
term                -- same as :evaluate term
Name = term         -- define Name; definitions and terms can be chained with ;
:tokenize   term    -- show tokenized term
:parse      term    -- show parsed term
:iota       term    -- show the term written with ι only
:jot        bits    -- evaluate a Jot program
:trace      term    -- show every reduction step
:evaluate   term    -- show the normal form
:steps      [n]     -- show or set the step limit
:defs               -- list definitions and variables
:help               -- show this message
        "#
            .trim()
        );
    }

    fn handle_repl_input<'i>(&mut self, input: &'i str) -> CommandResult<'i> {
        let (cmd, input) = split_command(input);
        match cmd {
            "to" | "tokenize" => {
                self.tokenize(input)?;
            }
            "p" | "parse" => {
                self.parse(input)?;
            }
            "i" | "iota" => {
                self.encode(input)?;
            }
            "j" | "jot" => {
                self.jot(input);
            }
            "tr" | "trace" => {
                self.trace(input)?;
            }
            "" | "r" | "run" | "e" | "eval" | "evaluate" => {
                self.evaluate(input)?;
            }
            "s" | "steps" => {
                self.set_steps(input);
            }
            "d" | "defs" => {
                self.show_definitions();
            }
            "h" | "he" | "hel" | "help" => {
                Self::show_help();
            }
            _ => {
                eprintln!("Unknown command {cmd}");
                Self::show_help();
            }
        }
        Ok(())
    }
}
impl repl::Repl for Repl {
    type Error = anyhow::Error;
    const HISTORY: Option<&'static str> = Some("/tmp/ski.history");
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error> {
        if input.trim().is_empty() {
            return Ok(());
        }
        if let Err((input, es)) = self.handle_repl_input(&input) {
            print_reports(input, es)?;
        }
        Ok(())
    }
}

fn settings(matches: &ArgMatches) -> Result<Settings> {
    let max_steps = match matches.value_of("max-steps") {
        Some(n) => n
            .parse::<usize>()
            .with_context(|| format!("invalid step limit `{n}`"))?,
        None => DEFAULT_MAX_STEPS,
    };
    Ok(Settings {
        max_steps,
        trace: matches.is_present("trace"),
        syntax: if matches.is_present("compact") {
            Syntax::Compact
        } else {
            Syntax::Words
        },
        encode_iota: matches.is_present("iota"),
    })
}

/// Evaluates `input` once. Returns whether it parsed and compiled.
fn run_once(session: &mut Session, input: &str) -> Result<bool> {
    match session.execute(input) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            Ok(true)
        }
        Err(es) => {
            print_reports(input, es)?;
            Ok(false)
        }
    }
}

fn main() -> Result<()> {
    util::logger::init();

    let matches = App::new("ski")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reduces SKI and Iota combinator terms to normal form")
        .arg(
            Arg::with_name("expression")
                .index(1)
                .help("Terms and definitions to evaluate, `-` to read stdin; starts a REPL when omitted"),
        )
        .arg(
            Arg::with_name("max-steps")
                .short("n")
                .long("max-steps")
                .takes_value(true)
                .help("Give up after this many reduction steps"),
        )
        .arg(
            Arg::with_name("trace")
                .short("t")
                .long("trace")
                .help("Print every intermediate term"),
        )
        .arg(
            Arg::with_name("compact")
                .short("c")
                .long("compact")
                .help("Read every letter as its own token, e.g. S(K(SI))K ab"),
        )
        .arg(
            Arg::with_name("iota")
                .long("iota")
                .help("Rewrite S, K and I into ι before reducing"),
        )
        .get_matches();

    let mut session = Session::new(settings(&matches)?);
    let input = match matches.value_of("expression") {
        Some("-") => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            input
        }
        Some(expression) => expression.to_string(),
        None => {
            println!("Hi, this is an SKI combinator REPL. :h to show help");
            println!();
            repl::start_repl(Repl { session })?;
            return Ok(());
        }
    };
    if !run_once(&mut session, &input)? {
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command(":defs"), ("defs", ""));
        assert_eq!(split_command(": defs"), ("defs", ""));
        assert_eq!(split_command(":steps 20"), ("steps", "20"));
        assert_eq!(split_command(":  trace S K K a"), ("trace", "S K K a"));
        assert_eq!(split_command("S K K a"), ("", "S K K a"));
    }

    #[test]
    fn test_run_once() {
        let mut session = Session::new(Settings {
            max_steps: 100,
            ..Settings::default()
        });
        assert!(run_once(&mut session, "S K K a").unwrap());
        // Running out of steps is still a successful run.
        assert!(run_once(&mut session, "M M").unwrap());
        assert!(!run_once(&mut session, "S (K").unwrap());
        assert!(!run_once(&mut session, "Q a").unwrap());
    }
}
