//! Normal-order evaluator for the SKI combinator calculus and its one-combinator
//! relatives, Iota and Jot.
//!
//! ```
//! use ski::{app, reducer::{reduce, Outcome}, term::Term};
//!
//! let a = Term::var("a").unwrap();
//! let skk = app!(Term::s(), Term::k(), Term::k());
//! assert_eq!(reduce(app!(skk, a.clone()), 10), Outcome::Reduced(a));
//! ```

pub mod compiler;
pub mod iota;
pub mod lang;
pub mod parser;
pub mod prelude;
pub mod reducer;
pub mod registry;
pub mod session;
pub mod term;
