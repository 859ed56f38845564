pub mod logger;
pub mod repl;
