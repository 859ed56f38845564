//! The one-combinator basis `ι x = x S K`, and the Jot bit-string language built
//! on the same encoding.

use thiserror::Error;

use crate::{
    app,
    term::{Combinator, Term},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum JotError {
    #[error("Unexpected `{found}` at {position}, Jot programs only contain 0 and 1")]
    InvalidBit { position: usize, found: char },
}

/// Pure-ι term behaving like `combinator`.
///
/// `ι ι` reduces to `S K (K K)`, which acts as `I` once applied. The `K` and `S`
/// encodings normalise to exactly `K` and `S`.
pub fn encode_combinator(combinator: Combinator) -> Term {
    let iota = Term::iota;
    match combinator {
        Combinator::Iota => iota(),
        Combinator::I => app!(iota(), iota()),
        Combinator::K => app!(iota(), app!(iota(), app!(iota(), iota()))),
        Combinator::S => app!(
            iota(),
            app!(iota(), app!(iota(), app!(iota(), iota())))
        ),
    }
}

/// Replaces every `S`, `K` and `I` in `term` by its ι encoding. Variables stay.
pub fn encode(term: &Term) -> Term {
    match term {
        Term::Atom(combinator) => encode_combinator(*combinator),
        Term::Var(_) => term.clone(),
        Term::App(lhs, rhs) => Term::app(encode(lhs), encode(rhs)),
    }
}

pub fn is_pure_iota(term: &Term) -> bool {
    match term {
        Term::Atom(Combinator::Iota) => true,
        Term::Atom(_) | Term::Var(_) => false,
        Term::App(lhs, rhs) => is_pure_iota(lhs) && is_pure_iota(rhs),
    }
}

/// Decodes a Jot program: the empty program is `I`, a trailing `0` applies the
/// program so far to `S` and `K`, and a trailing `1` turns `F` into `S(K F)`.
/// Whitespace is ignored.
pub fn jot(bits: &str) -> Result<Term, JotError> {
    bits.chars()
        .enumerate()
        .filter(|(_, c)| !c.is_whitespace())
        .try_fold(Term::i(), |program, (position, bit)| match bit {
            '0' => Ok(app!(program, Term::s(), Term::k())),
            '1' => Ok(app!(Term::s(), app!(Term::k(), program))),
            found => Err(JotError::InvalidBit { position, found }),
        })
}
