use crate::{
    lang,
    prelude::*,
    registry::Registry,
    term::{Combinator, Term},
};

pub fn compile_term(registry: &mut Registry, term: &Spanned<lang::Term>) -> Result<Term> {
    Ok(match term.value() {
        lang::Term::Combinator(name) => {
            if let Some(combinator) = Combinator::from_name(name) {
                Term::Atom(combinator)
            } else if let Some(alias) = registry.lookup_alias(name) {
                alias.as_ref().clone()
            } else {
                return Err(Error::custom(
                    term.span(),
                    format!("Unknown combinator {name}"),
                ));
            }
        }
        lang::Term::Variable(name) => registry
            .var(name)
            .map_err(|e| Error::custom(term.span(), e.to_string()))?,
        lang::Term::Iota => Term::iota(),
        lang::Term::Apply(lhs, rhs) => {
            Term::app(compile_term(registry, lhs)?, compile_term(registry, rhs)?)
        }
    })
}

/// Compiles `body` and records it under `name`.
pub fn compile_alias(
    registry: &mut Registry,
    name: &Spanned<Identifier>,
    body: &Spanned<lang::Term>,
) -> Result<Term> {
    if Combinator::from_name(name.value()).is_some() {
        return Err(Error::custom(
            name.span(),
            format!("{} is a primitive combinator and cannot be redefined", name.value()),
        ));
    }
    let term = compile_term(registry, body)?;
    registry.define(name.value().clone(), term.clone());
    Ok(term)
}
