use chumsky::prelude::*;

use crate::{
    lang::{Command, Term, Token},
    prelude::*,
};

pub trait SimpleParser<I: Clone + std::hash::Hash, O>:
    Parser<I, O, Error = Error<I>> + Clone
{
    #[allow(clippy::type_complexity)]
    fn spanned(self) -> chumsky::combinator::MapWithSpan<Self, fn(O, Span) -> Spanned<O>, O>
    where
        Self: Sized,
        I: std::cmp::Eq,
    {
        self.map_with_span(|value, span| Spanned { span, value })
    }
}
impl<I: Clone + std::hash::Hash, O, T> SimpleParser<I, O> for T where
    T: Parser<I, O, Error = Error<I>> + Clone
{
}

/// Which tokenizer to run on the source text.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub enum Syntax {
    /// Whitespace separated words: `S (K (S I)) K a b`.
    #[default]
    Words,
    /// One token per letter: `S(K(SI))K ab`.
    Compact,
}

fn ident_token(ident: Identifier) -> Token {
    if ident.starts_with(|c: char| c.is_uppercase()) {
        Token::UpperIdent(ident)
    } else {
        Token::LowerIdent(ident)
    }
}

fn symbols() -> impl SimpleParser<char, Token> {
    choice((
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('=').to(Token::Equal),
        just(';').to(Token::Semicolon),
        just('ι').to(Token::Iota),
    ))
}

pub fn lexer() -> impl SimpleParser<char, Vec<Spanned<Token>>> {
    let keywords = text::keyword("iota").to(Token::Iota);
    let ident = text::ident().map(Identifier::new).map(ident_token);
    let token = choice((symbols(), keywords, ident));
    token.spanned().padded().repeated().then_ignore(end())
}

pub fn compact_lexer() -> impl SimpleParser<char, Vec<Spanned<Token>>> {
    let letter = filter(|c: &char| c.is_ascii_alphabetic())
        .map(|c: char| ident_token(Identifier::new(c.to_string())));
    let token = choice((symbols(), letter));
    token.spanned().padded().repeated().then_ignore(end())
}

fn term_parser() -> impl SimpleParser<Token, Spanned<Term>> {
    recursive(|term: Recursive<_, Spanned<Term>, _>| {
        let combinator = select! { Token::UpperIdent(ident) => Term::Combinator(ident), }
            .labelled("combinator");
        let variable =
            select! { Token::LowerIdent(ident) => Term::Variable(ident), }.labelled("variable");
        let iota = just(Token::Iota).to(Term::Iota);

        let atom = choice((
            combinator,
            variable,
            iota,
            term.map(Spanned::forget_span)
                .delimited_by(just(Token::LParen), just(Token::RParen)),
        ))
        .spanned();

        // t t
        atom.clone().then(atom.repeated()).foldl(|lhs, rhs| {
            let span = merge_span(&lhs.span(), &rhs.span());
            Spanned {
                span,
                value: Term::Apply(lhs.into(), rhs.into()),
            }
        })
    })
    .labelled("term")
}

fn command_parser() -> impl SimpleParser<Token, Command> {
    let upper_ident = select! { Token::UpperIdent(ident) => ident }.spanned();
    let term = term_parser().map(Command::Term);
    let alias = upper_ident
        .then_ignore(just(Token::Equal))
        .then(term_parser())
        .map(|(name, term)| Command::Alias(name, term));
    choice((alias, term))
}

fn commands_parser() -> impl SimpleParser<Token, Vec<Command>> {
    command_parser()
        .separated_by(just(Token::Semicolon))
        .allow_trailing()
}

pub fn tokenize(s: &str, syntax: Syntax) -> Result<Vec<Spanned<Token>>, Vec<Error<String>>> {
    let tokens = match syntax {
        Syntax::Words => lexer().parse(s),
        Syntax::Compact => compact_lexer().parse(s),
    };
    tokens.map_err(|es| {
        es.into_iter()
            .map(|e| e.map(|e| e.to_string()))
            .collect::<Vec<_>>()
    })
}

fn parse_full<T>(
    s: &str,
    syntax: Syntax,
    parser: impl SimpleParser<Token, T>,
) -> Result<T, Vec<Error<String>>> {
    let len = s.chars().count();
    let eoi = Span {
        start: len,
        end: len + 1,
    };
    let tokens = tokenize(s, syntax)?;
    let value = parser
        .then_ignore(end())
        .parse(chumsky::Stream::from_iter(
            eoi,
            tokens
                .into_iter()
                .map(|Spanned { span, value }| (value, span)),
        ))
        .map_err(|es| {
            es.into_iter()
                .map(|e| e.map(|e| e.to_string()))
                .collect::<Vec<_>>()
        })?;
    Ok(value)
}

pub fn parse_term(s: &str, syntax: Syntax) -> Result<Spanned<Term>, Vec<Error<String>>> {
    parse_full(s, syntax, term_parser())
}

pub fn parse_commands(s: &str, syntax: Syntax) -> Result<Vec<Command>, Vec<Error<String>>> {
    parse_full(s, syntax, commands_parser())
}

#[cfg(test)]
mod test {
    use super::*;

    fn lex(s: &str, syntax: Syntax) -> Vec<Token> {
        tokenize(s, syntax)
            .unwrap()
            .iter()
            .map(Spanned::value)
            .cloned()
            .collect::<Vec<_>>()
    }

    fn upper(s: &str) -> Token {
        Token::UpperIdent(Identifier::new(s.into()))
    }
    fn lower(s: &str) -> Token {
        Token::LowerIdent(Identifier::new(s.into()))
    }

    #[test]
    fn test_lexer() {
        assert_eq!(
            lex("S (K) iota ι ab iotas", Syntax::Words),
            vec![
                upper("S"),
                Token::LParen,
                upper("K"),
                Token::RParen,
                Token::Iota,
                Token::Iota,
                lower("ab"),
                lower("iotas"),
            ]
        );
        assert_eq!(
            lex("Omega = M M;", Syntax::Words),
            vec![
                upper("Omega"),
                Token::Equal,
                upper("M"),
                upper("M"),
                Token::Semicolon
            ]
        );
    }

    #[test]
    fn test_compact_lexer() {
        assert_eq!(
            lex("S(KI) ab", Syntax::Compact),
            vec![
                upper("S"),
                Token::LParen,
                upper("K"),
                upper("I"),
                Token::RParen,
                lower("a"),
                lower("b"),
            ]
        );
    }

    #[test]
    fn test_term_parser() {
        fn parse(s: &str, syntax: Syntax) -> String {
            parse_term(s, syntax).unwrap().to_string()
        }
        assert_eq!(parse("S K I", Syntax::Words), "((S K) I)");
        assert_eq!(parse("S(K)(I)", Syntax::Words), "((S K) I)");
        assert_eq!(parse("S (K I) a", Syntax::Words), "((S (K I)) a)");
        assert_eq!(
            parse("S(K(SI))K ab", Syntax::Compact),
            "((((S (K (S I))) K) a) b)"
        );
        assert_eq!(parse("((ι))", Syntax::Words), "ι");
    }

    #[test]
    fn test_spans() {
        let term = parse_term("S (K a)", Syntax::Words).unwrap();
        assert_eq!(term.span(), 0..7);
        if let Term::Apply(lhs, rhs) = term.value() {
            assert_eq!(lhs.span(), 0..1);
            assert_eq!(rhs.span(), 2..7);
        } else {
            panic!("expected an application, got {term}");
        }
    }

    #[test]
    fn test_commands() {
        let commands = parse_commands("W = S S (K I); W a b;", Syntax::Words).unwrap();
        assert_eq!(commands.len(), 2);
        assert!(matches!(&commands[0], Command::Alias(name, _) if name.value().as_str() == "W"));
        assert_eq!(commands[0].to_string(), "W = ((S S) (K I))");
        assert_eq!(commands[1].to_string(), "((W a) b)");
    }

    #[test]
    fn test_errors() {
        assert!(!parse_term("S (K I", Syntax::Words).unwrap_err().is_empty());

        let errors = parse_term("S K)", Syntax::Words).unwrap_err();
        assert!(errors.iter().any(|e| e.span() == (3..4)));

        assert!(parse_term("", Syntax::Words).is_err());
        assert!(parse_term("()", Syntax::Words).is_err());
        assert!(parse_term("S + K", Syntax::Words).is_err());
    }
}
