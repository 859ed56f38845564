use std::rc::Rc;

use crate::prelude::*;

#[derive(PartialEq, Eq, Hash, Clone, derive_more::Display, Debug)]
pub enum Token {
    #[display(fmt = "(")]
    LParen,
    #[display(fmt = ")")]
    RParen,
    #[display(fmt = "=")]
    Equal,
    #[display(fmt = ";")]
    Semicolon,
    #[display(fmt = "ι")]
    Iota,
    #[display(fmt = "{_0}")]
    UpperIdent(Identifier),
    #[display(fmt = "{_0}")]
    LowerIdent(Identifier),
}

/// Surface syntax, before names are resolved.
#[derive(Clone, derive_more::Display, Debug)]
pub enum Term {
    /// `S`, `K`, `I` or an alias
    #[display(fmt = "{_0}")]
    Combinator(Identifier),
    #[display(fmt = "{_0}")]
    Variable(Identifier),
    #[display(fmt = "ι")]
    Iota,
    #[display(fmt = "({_0} {_1})")]
    Apply(Rc<Spanned<Term>>, Rc<Spanned<Term>>),
}

#[derive(Clone, derive_more::Display, Debug)]
pub enum Command {
    #[display(fmt = "{_0}")]
    Term(Spanned<Term>),
    #[display(fmt = "{_0} = {_1}")]
    Alias(Spanned<Identifier>, Spanned<Term>),
}
