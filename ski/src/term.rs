use std::rc::Rc;

use thiserror::Error;

use crate::prelude::*;

/// The primitive combinators.
#[derive(PartialEq, Eq, Hash, Clone, Copy, derive_more::Display, Debug)]
pub enum Combinator {
    #[display(fmt = "S")]
    S,
    #[display(fmt = "K")]
    K,
    #[display(fmt = "I")]
    I,
    #[display(fmt = "ι")]
    Iota,
}
impl Combinator {
    /// Number of arguments the combinator consumes in one rewrite.
    pub fn arity(self) -> usize {
        match self {
            Combinator::S => 3,
            Combinator::K => 2,
            Combinator::I | Combinator::Iota => 1,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "S" => Some(Combinator::S),
            "K" => Some(Combinator::K),
            "I" => Some(Combinator::I),
            "ι" | "iota" => Some(Combinator::Iota),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TermError {
    #[error("A variable needs a non-empty name")]
    EmptyName,
}

#[derive(PartialEq, Eq, Hash, Clone, Debug)]
pub enum Term {
    Atom(Combinator),
    /// A free variable. Never reduced.
    Var(Identifier),
    /// `t t`
    App(Rc<Term>, Rc<Term>),
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Atom(c) => f.write_fmt(format_args!("{c}")),
            Term::Var(name) => f.write_str(name),
            Term::App(lhs, rhs) => f.write_fmt(format_args!("{lhs}({rhs})")),
        }
    }
}

impl From<Combinator> for Term {
    fn from(c: Combinator) -> Self {
        Term::Atom(c)
    }
}

impl Term {
    pub fn s() -> Self {
        Term::Atom(Combinator::S)
    }
    pub fn k() -> Self {
        Term::Atom(Combinator::K)
    }
    pub fn i() -> Self {
        Term::Atom(Combinator::I)
    }
    pub fn iota() -> Self {
        Term::Atom(Combinator::Iota)
    }

    pub fn var(name: impl Into<String>) -> Result<Self, TermError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TermError::EmptyName);
        }
        Ok(Term::Var(Identifier::new(name)))
    }

    pub fn app(lhs: impl Into<Rc<Term>>, rhs: impl Into<Rc<Term>>) -> Self {
        Term::App(lhs.into(), rhs.into())
    }

    /// `self arg`, for writing chains like `Term::s().apply(k).apply(k)`.
    pub fn apply(self, arg: impl Into<Rc<Term>>) -> Self {
        Term::app(self, arg)
    }

    /// Splits `h a1 a2 .. an` into its head `h` and arguments `[a1, .., an]`.
    pub fn unwind(&self) -> (&Term, Vec<Rc<Term>>) {
        let mut head = self;
        let mut args = vec![];
        while let Term::App(lhs, rhs) = head {
            args.push(rhs.clone());
            head = lhs;
        }
        args.reverse();
        (head, args)
    }

    /// Inverse of [`Term::unwind`].
    pub fn rewind(head: Term, args: impl IntoIterator<Item = Rc<Term>>) -> Term {
        args.into_iter().fold(head, |lhs, rhs| Term::App(lhs.into(), rhs))
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Term::Atom(_) | Term::Var(_) => 1,
            Term::App(lhs, rhs) => 1 + lhs.size() + rhs.size(),
        }
    }

    pub fn is_app(&self) -> bool {
        matches!(self, Term::App(..))
    }
}

/// Left-associated application: `app!(f, x, y)` is `f x y`.
#[macro_export]
macro_rules! app {
    ($head:expr $(, $arg:expr)* $(,)?) => {{
        let term: $crate::term::Term = $head.into();
        $(let term = $crate::term::Term::app(term, $crate::term::Term::from($arg));)*
        term
    }};
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(app!(Term::s(), Term::k(), Term::i()).to_string(), "S(K)(I)");
        assert_eq!(
            app!(Term::s(), app!(Term::k(), app!(Term::s(), Term::i())), Term::k()).to_string(),
            "S(K(S(I)))(K)"
        );
        assert_eq!(app!(Term::iota(), Term::iota()).to_string(), "ι(ι)");
    }

    #[test]
    fn test_app_is_left_associative() {
        let a = Term::var("a").unwrap();
        let b = Term::var("b").unwrap();
        assert_eq!(
            app!(Term::k(), a.clone(), b.clone()),
            Term::app(Term::app(Term::k(), a.clone()), b.clone())
        );
        assert_eq!(Term::k().apply(a.clone()).apply(b.clone()), app!(Term::k(), a, b));
    }

    #[test]
    fn test_var() {
        assert_eq!(Term::var(""), Err(TermError::EmptyName));
        assert_eq!(Term::var("a").unwrap(), Term::var("a").unwrap());
        assert_ne!(Term::var("a").unwrap(), Term::var("b").unwrap());
    }

    #[test]
    fn test_unwind() {
        let a = Term::var("a").unwrap();
        let term = app!(Term::s(), Term::k(), Term::k(), a.clone());
        let (head, args) = term.unwind();
        assert_eq!(head, &Term::s());
        assert_eq!(
            args.iter().map(|arg| arg.as_ref().clone()).collect::<Vec<_>>(),
            vec![Term::k(), Term::k(), a]
        );
        assert_eq!(Term::rewind(head.clone(), args), term);
        assert_eq!(term.size(), 7);
    }
}
