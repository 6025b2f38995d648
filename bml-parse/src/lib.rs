//! Parser for the S-expressions of the BML rule language
//!
//! Example usage:
//!
//! ~~~
//! use bml_parse::{Error, Sexp, Sexps};
//!
//! let rules = r#"((is-sub) (set-color red)) ; paint subroutines
//!                ((has-name main) (set-comment "entry point"))"#;
//! let rules: Result<Vec<_>, _> = Sexps::new(rules).collect();
//! let rules = rules?;
//! assert_eq!(rules.len(), 2);
//! assert_eq!(rules[1].to_string(), r#"((has-name main) (set-comment "entry point"))"#);
//! # Ok::<_, Error>(())
//! ~~~
#![no_std]

extern crate alloc;

pub mod lex;
mod parse;
pub mod sexp;

pub use lex::Token;
pub use parse::{Error, Sexps, MAX_DEPTH};
pub use sexp::Sexp;

use logos::Logos;

/// Lex a string, dropping whitespace and comments.
pub fn lex(s: &str) -> impl Iterator<Item = Token<'_>> {
    Token::lexer(s).filter(|token| *token != Token::Space)
}
