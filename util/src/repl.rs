use rustyline::{error::ReadlineError, Editor};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error<E> {
    #[error(transparent)]
    Readline(ReadlineError),
    #[error("Eval failed: {0:?}")]
    EvalError(E),
}

pub trait Repl {
    type Error: std::fmt::Debug;
    const PROMPT: &'static str = ">> ";
    const HISTORY: Option<&'static str> = None;
    fn evaluate(&mut self, input: String) -> Result<(), Self::Error>;
}

/// Joins lines ending with `\` into a single input.
#[derive(Default, Debug)]
pub struct Continuation {
    pending: Option<String>,
}
impl Continuation {
    /// Returns the complete input once a line without a trailing `\` arrives.
    pub fn feed(&mut self, mut line: String) -> Option<String> {
        if line.ends_with('\\') {
            line.pop();
            line.push('\n');
            if let Some(pending) = self.pending.as_mut() {
                pending.push_str(line.as_str());
            } else {
                self.pending = Some(line);
            }
            return None;
        }
        Some(if let Some(mut pending) = self.pending.take() {
            pending.push_str(line.as_str());
            pending
        } else {
            line
        })
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

pub fn start_repl<R: Repl>(mut repl: R) -> Result<(), Error<R::Error>> {
    let mut editor = Editor::<()>::new();
    if let Some(history) = R::HISTORY {
        if editor.load_history(history).is_err() {
            log::debug!("no history loaded from {history}");
        }
    }
    let mut continuation = Continuation::default();
    loop {
        let prompt = if continuation.is_pending() {
            ".. "
        } else {
            R::PROMPT
        };
        match editor.readline(prompt) {
            Ok(line) => {
                let input = match continuation.feed(line) {
                    Some(input) => input,
                    None => continue,
                };
                editor.add_history_entry(input.as_str());
                repl.evaluate(input).map_err(Error::EvalError)?;
                if let Some(history) = R::HISTORY {
                    editor.save_history(history).map_err(Error::Readline)?;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Bye!");
                break Ok(());
            }
            Err(e) => break Err(Error::Readline(e)),
        }
    }
}
