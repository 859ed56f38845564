use crate::{
    compiler, iota,
    lang::Command,
    parser::{self, Syntax},
    prelude::*,
    reducer::{Outcome, Reducer, DEFAULT_MAX_STEPS},
    registry::Registry,
    term::Term,
};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Settings {
    pub max_steps: usize,
    /// Print every intermediate term.
    pub trace: bool,
    pub syntax: Syntax,
    /// Rewrite S, K and I into ι before reducing.
    pub encode_iota: bool,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            trace: false,
            syntax: Syntax::default(),
            encode_iota: false,
        }
    }
}

#[derive(PartialEq, Eq, Clone, derive_more::Display, Debug)]
pub enum Line {
    #[display(fmt = "{_0} = {_1}")]
    Defined(Identifier, Term),
    #[display(fmt = "{_0}")]
    Step(String),
    #[display(fmt = "{_0}")]
    NormalForm(String),
    #[display(fmt = "did not terminate within {_0} steps")]
    Diverged(usize),
}

#[derive(Clone, Debug)]
pub struct Session {
    registry: Registry,
    settings: Settings,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            registry: Registry::with_prelude(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Compiles a single term without reducing it.
    pub fn compile(&mut self, input: &str) -> Result<Term, Vec<Error>> {
        let term = parser::parse_term(input, self.settings.syntax)?;
        compiler::compile_term(&mut self.registry, &term).map_err(|e| vec![e])
    }

    /// The pure-ι form of a term.
    pub fn encode(&mut self, input: &str) -> Result<Term, Vec<Error>> {
        Ok(iota::encode(&self.compile(input)?))
    }

    /// Runs every command of `input`, stopping at the first one that fails to compile.
    pub fn execute(&mut self, input: &str) -> Result<Vec<Line>, Vec<Error>> {
        let commands = parser::parse_commands(input, self.settings.syntax)?;
        let mut lines = vec![];
        for command in commands {
            match command {
                Command::Alias(name, body) => {
                    let term = compiler::compile_alias(&mut self.registry, &name, &body)
                        .map_err(|e| vec![e])?;
                    log::info!("defined {name}");
                    lines.push(Line::Defined(name.forget_span(), term));
                }
                Command::Term(term) => {
                    let term = compiler::compile_term(&mut self.registry, &term)
                        .map_err(|e| vec![e])?;
                    self.reduce(term, &mut lines);
                }
            }
        }
        Ok(lines)
    }

    pub fn reduce_term(&self, term: Term) -> Vec<Line> {
        let mut lines = vec![];
        self.reduce(term, &mut lines);
        lines
    }

    fn reduce(&self, term: Term, lines: &mut Vec<Line>) {
        let term = if self.settings.encode_iota {
            iota::encode(&term)
        } else {
            term
        };
        let reducer = Reducer::new(self.settings.max_steps);
        let mut trace = reducer.trace(term);
        let mut steps = vec![];
        if self.settings.trace {
            for step in trace.by_ref() {
                steps.push(Line::Step(self.registry.render(&step)));
            }
        }
        let evaluation = trace.finish();
        log::debug!("evaluated in {} steps", evaluation.steps);
        match evaluation.outcome {
            Outcome::Reduced(term) => {
                log::debug!("normal form has {} nodes", term.size());
                // The last traced step is the normal form itself.
                steps.pop();
                lines.extend(steps);
                lines.push(Line::NormalForm(self.registry.render(&term)));
            }
            Outcome::Diverged => {
                lines.extend(steps);
                lines.push(Line::Diverged(reducer.max_steps()));
            }
        }
    }
}
