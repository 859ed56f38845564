use std::rc::Rc;

use rpds::HashTrieMap;

use crate::{
    app,
    prelude::*,
    term::{Term, TermError},
};

/// Free variables and named definitions known to a session.
///
/// Asking twice for the same variable name yields equal terms sharing one name
/// allocation. Definitions are stored by name and in reverse, so that results
/// can be printed with their names.
#[derive(Default, Clone, Debug)]
pub struct Registry {
    variables: HashTrieMap<Identifier, Term>,
    aliases: HashTrieMap<Identifier, Rc<Term>>,
    names: HashTrieMap<Term, Identifier>,
}

impl Registry {
    /// A registry with the classic derived combinators already defined.
    pub fn with_prelude() -> Self {
        let mut ret = Self::default();
        let (s, k, i) = (Term::s, Term::k, Term::i);
        let m = app!(s(), i(), i());
        let b = app!(s(), app!(k(), s()), k());
        let definitions = [
            ("B", b.clone()),
            ("C", app!(s(), app!(s(), app!(k(), b), s()), app!(k(), k()))),
            ("W", app!(s(), s(), app!(k(), i()))),
            ("M", m.clone()),
            (
                "Y",
                app!(
                    s(),
                    app!(k(), m.clone()),
                    app!(s(), app!(s(), app!(k(), s()), k()), app!(k(), m))
                ),
            ),
        ];
        for (name, term) in definitions {
            ret.define(Identifier::new(name.to_string()), term);
        }
        ret
    }

    pub fn var(&mut self, name: &str) -> Result<Term, TermError> {
        if name.is_empty() {
            return Err(TermError::EmptyName);
        }
        Ok(self.intern(name))
    }

    /// Mints several variables at once: `let [a, b, c] = registry.vars(["a", "b", "c"])?`.
    pub fn vars<const N: usize>(&mut self, names: [&str; N]) -> Result<[Term; N], TermError> {
        if names.iter().any(|name| name.is_empty()) {
            return Err(TermError::EmptyName);
        }
        Ok(names.map(|name| self.intern(name)))
    }

    fn intern(&mut self, name: &str) -> Term {
        let key = Identifier::new(name.to_string());
        if let Some(var) = self.variables.get(&key) {
            return var.clone();
        }
        let var = Term::Var(key.clone());
        self.variables = self.variables.insert(key, var.clone());
        var
    }

    pub fn variables(&self) -> impl Iterator<Item = &Identifier> {
        self.variables.keys()
    }

    pub fn define(&mut self, name: Identifier, term: Term) {
        log::debug!("define {name} = {term}");
        if let Some(previous) = self.aliases.get(&name) {
            if self.names.get(previous.as_ref()) == Some(&name) {
                self.names = self.names.remove(previous.as_ref());
            }
        }
        // Only compound bodies abbreviate; a bare atom or variable prints as itself.
        if term.is_app() {
            self.names = self.names.insert(term.clone(), name.clone());
        }
        self.aliases = self.aliases.insert(name, term.into());
    }

    pub fn lookup_alias(&self, name: &Identifier) -> Option<Rc<Term>> {
        self.aliases.get(name).cloned()
    }

    /// Definitions sorted by name.
    pub fn aliases(&self) -> Vec<(Identifier, Rc<Term>)> {
        let mut ret = self
            .aliases
            .iter()
            .map(|(name, term)| (name.clone(), term.clone()))
            .collect::<Vec<_>>();
        ret.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));
        ret
    }

    /// Prints `term`, writing the name of a definition in place of any subterm
    /// equal to its body.
    pub fn render(&self, term: &Term) -> String {
        struct Rendered<'a>(&'a Registry, &'a Term);
        impl std::fmt::Display for Rendered<'_> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let Rendered(registry, term) = self;
                if let Some(name) = registry.names.get(*term) {
                    return f.write_str(name);
                }
                match term {
                    Term::App(lhs, rhs) => f.write_fmt(format_args!(
                        "{}({})",
                        Rendered(registry, lhs),
                        Rendered(registry, rhs)
                    )),
                    _ => f.write_fmt(format_args!("{term}")),
                }
            }
        }
        Rendered(self, term).to_string()
    }
}
