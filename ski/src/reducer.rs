//! Normal-order (leftmost-outermost) reduction.

use std::rc::Rc;

use crate::term::{Combinator, Term};

pub const DEFAULT_MAX_STEPS: usize = 10_000;

#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Outcome {
    /// The term reached its normal form.
    Reduced(Term),
    /// The step cap ran out before a normal form was reached.
    Diverged,
}

impl Outcome {
    pub fn normal_form(&self) -> Option<&Term> {
        match self {
            Outcome::Reduced(term) => Some(term),
            Outcome::Diverged => None,
        }
    }
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub steps: usize,
}

fn contract(combinator: Combinator, args: &[Rc<Term>]) -> Term {
    match (combinator, args) {
        (Combinator::S, [x, y, z]) => Term::app(
            Term::App(x.clone(), z.clone()),
            Term::App(y.clone(), z.clone()),
        ),
        (Combinator::K, [x, _]) => x.as_ref().clone(),
        (Combinator::I, [x]) => x.as_ref().clone(),
        (Combinator::Iota, [x]) => Term::app(Term::App(x.clone(), Term::s().into()), Term::k()),
        _ => unreachable!("{combinator} applied to {} arguments", args.len()),
    }
}

/// Rewrites the leftmost-outermost redex, or returns `None` for a normal form.
pub fn step(term: &Term) -> Option<Term> {
    let (head, args) = term.unwind();
    if let Term::Atom(combinator) = head {
        let arity = combinator.arity();
        if args.len() >= arity {
            let (redex, rest) = args.split_at(arity);
            return Some(Term::rewind(
                contract(*combinator, redex),
                rest.iter().cloned(),
            ));
        }
    }
    // The head is stuck, so the next redex is inside the leftmost reducible argument.
    for (i, arg) in args.iter().enumerate() {
        if let Some(arg) = step(arg) {
            let mut args = args.clone();
            args[i] = arg.into();
            return Some(Term::rewind(head.clone(), args));
        }
    }
    None
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Reducer {
    max_steps: usize,
}
impl Default for Reducer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STEPS)
    }
}
impl Reducer {
    pub fn new(max_steps: usize) -> Self {
        Self { max_steps }
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn trace(&self, term: Term) -> Trace {
        Trace {
            current: term,
            steps: 0,
            max_steps: self.max_steps,
            halted: None,
        }
    }

    pub fn evaluate(&self, term: Term) -> Evaluation {
        self.trace(term).finish()
    }

    pub fn reduce(&self, term: Term) -> Outcome {
        self.evaluate(term).outcome
    }
}

pub fn reduce(term: Term, max_steps: usize) -> Outcome {
    Reducer::new(max_steps).reduce(term)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Halt {
    NormalForm,
    OutOfSteps,
}

/// Iterator over every intermediate term of a reduction, the input excluded.
#[derive(Clone, Debug)]
pub struct Trace {
    current: Term,
    steps: usize,
    max_steps: usize,
    halted: Option<Halt>,
}

impl Iterator for Trace {
    type Item = Term;

    fn next(&mut self) -> Option<Self::Item> {
        if self.halted.is_some() {
            return None;
        }
        match step(&self.current) {
            None => {
                log::debug!("normal form after {} steps", self.steps);
                self.halted = Some(Halt::NormalForm);
                None
            }
            Some(_) if self.steps == self.max_steps => {
                log::debug!("gave up after {} steps", self.steps);
                self.halted = Some(Halt::OutOfSteps);
                None
            }
            Some(next) => {
                self.steps += 1;
                log::trace!("step {}: {next}", self.steps);
                self.current = next.clone();
                Some(next)
            }
        }
    }
}

impl Trace {
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Runs the remaining steps and reports how the reduction ended.
    pub fn finish(mut self) -> Evaluation {
        while self.next().is_some() {}
        let outcome = match self.halted {
            Some(Halt::NormalForm) => Outcome::Reduced(self.current),
            _ => Outcome::Diverged,
        };
        Evaluation {
            outcome,
            steps: self.steps,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::app;

    fn var(name: &str) -> Term {
        Term::var(name).unwrap()
    }

    fn omega() -> Term {
        let w = app!(Term::s(), Term::i(), Term::i());
        app!(w.clone(), w)
    }

    fn samples() -> Vec<Term> {
        vec![
            var("a"),
            Term::k(),
            app!(Term::i(), var("a")),
            app!(Term::k(), var("a"), var("b")),
            app!(Term::s(), Term::k(), Term::k(), var("a")),
            app!(Term::s(), app!(Term::k(), app!(Term::s(), Term::i())), Term::k()),
            app!(var("a"), app!(Term::i(), var("b")), app!(Term::k(), var("c"))),
            app!(Term::iota(), Term::iota()),
            app!(Term::s(), var("a"), var("b"), var("c")),
        ]
    }

    #[test]
    fn test_rules() {
        let (a, b, c) = (var("a"), var("b"), var("c"));
        assert_eq!(
            reduce(app!(Term::i(), a.clone()), 10),
            Outcome::Reduced(a.clone())
        );
        assert_eq!(
            reduce(app!(Term::k(), a.clone(), b.clone()), 10),
            Outcome::Reduced(a.clone())
        );
        assert_eq!(
            reduce(app!(Term::s(), Term::k(), Term::k(), a.clone()), 10),
            Outcome::Reduced(a.clone())
        );
        assert_eq!(
            step(&app!(Term::s(), a.clone(), b.clone(), c.clone())),
            Some(app!(a.clone(), c.clone(), app!(b.clone(), c.clone())))
        );
        assert_eq!(
            step(&app!(Term::iota(), a.clone())),
            Some(app!(a, Term::s(), Term::k()))
        );
    }

    #[test]
    fn test_stuck_terms() {
        let a = var("a");
        assert_eq!(step(&a), None);
        assert_eq!(step(&Term::s()), None);
        assert_eq!(step(&app!(Term::s(), a.clone(), a.clone())), None);
        assert_eq!(step(&app!(Term::k(), a.clone())), None);
    }

    #[test]
    fn test_leftmost_outermost() {
        let (a, b) = (var("a"), var("b"));
        // The outer K redex wins over the inner I redexes.
        assert_eq!(
            step(&app!(
                Term::k(),
                app!(Term::i(), a.clone()),
                app!(Term::i(), b.clone())
            )),
            Some(app!(Term::i(), a.clone()))
        );
        // With a stuck head the leftmost argument goes first.
        assert_eq!(
            step(&app!(
                a.clone(),
                app!(Term::i(), b.clone()),
                app!(Term::i(), a.clone())
            )),
            Some(app!(a.clone(), b.clone(), app!(Term::i(), a.clone())))
        );
        // Extra arguments are kept after the contracted redex.
        assert_eq!(
            step(&app!(Term::i(), a.clone(), b.clone())),
            Some(app!(a, b))
        );
        // K discards a divergent argument without touching it.
        assert_eq!(
            reduce(app!(Term::k(), var("x"), omega()), 10),
            Outcome::Reduced(var("x"))
        );
    }

    #[test]
    fn test_reduces_under_stuck_head() {
        let a = var("a");
        assert_eq!(
            reduce(app!(Term::s(), app!(Term::i(), a.clone()), Term::k()), 10),
            Outcome::Reduced(app!(Term::s(), a, Term::k()))
        );
    }

    #[test]
    fn test_blog_examples() {
        let (a, b) = (var("a"), var("b"));
        let e2 = app!(Term::s(), app!(Term::k(), app!(Term::s(), Term::i())), Term::k());
        assert_eq!(
            reduce(app!(e2, a.clone(), b.clone()), 100),
            Outcome::Reduced(app!(b, a.clone()))
        );
        assert_eq!(reduce(Term::i(), 100), Outcome::Reduced(Term::i()));
        assert_eq!(
            reduce(app!(a.clone(), var("b")), 100),
            Outcome::Reduced(app!(a, var("b")))
        );
    }

    #[test]
    fn test_identity_is_left_unit() {
        for term in samples() {
            assert_eq!(
                reduce(app!(Term::i(), term.clone()), DEFAULT_MAX_STEPS),
                reduce(term, DEFAULT_MAX_STEPS)
            );
        }
    }

    #[test]
    fn test_normal_forms_are_fixed_points() {
        for term in samples() {
            let normal = reduce(term, DEFAULT_MAX_STEPS);
            let normal = normal.normal_form().unwrap();
            assert_eq!(step(normal), None);
            assert_eq!(
                reduce(normal.clone(), 0),
                Outcome::Reduced(normal.clone())
            );
        }
    }

    #[test]
    fn test_omega_diverges() {
        for max_steps in [0, 1, 2, 10, 100, 1000, DEFAULT_MAX_STEPS] {
            assert_eq!(reduce(omega(), max_steps), Outcome::Diverged);
        }
        let evaluation = Reducer::new(50).evaluate(omega());
        assert_eq!(evaluation.outcome, Outcome::Diverged);
        assert_eq!(evaluation.steps, 50);
    }

    #[test]
    fn test_step_cap() {
        let term = app!(Term::s(), Term::k(), Term::k(), var("a"));
        // S K K a -> K a (K a) -> a
        assert_eq!(Reducer::new(1).reduce(term.clone()), Outcome::Diverged);
        assert_eq!(
            Reducer::new(2).evaluate(term),
            Evaluation {
                outcome: Outcome::Reduced(var("a")),
                steps: 2
            }
        );
    }

    #[test]
    fn test_trace() {
        let a = var("a");
        let term = app!(Term::s(), Term::k(), Term::k(), a.clone());
        let mut trace = Reducer::default().trace(term);
        assert_eq!(
            trace.next(),
            Some(app!(Term::k(), a.clone(), app!(Term::k(), a.clone())))
        );
        assert_eq!(trace.next(), Some(a.clone()));
        assert_eq!(trace.next(), None);
        assert_eq!(trace.steps(), 2);
        assert_eq!(trace.finish().outcome, Outcome::Reduced(a));

        assert_eq!(Reducer::new(5).trace(omega()).count(), 5);
    }
}
