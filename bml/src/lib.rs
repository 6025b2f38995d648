#![no_std]
#![forbid(unsafe_code)]

//! Rewriting of program terms with rules.
//!
//! This is the library underlying the `bmlrw` rewriter.
//!
//! # Usage
//!
//! A *rule* pairs a conjunction of predicates with a sequence of actions.
//! Rules are written as S-expressions of the shape `(PREDICATES ACTIONS)`,
//! where each of `PREDICATES` and `ACTIONS` is either
//! a single expression `(NAME)` / `(NAME ARG)` or
//! an arbitrarily nested list of such expressions.
//!
//! Names of predicates and actions are resolved in a [`Registry`].
//! The registry knows for every name whether it takes an argument,
//! and how to parse the argument.
//! Compiling a sequence of rules yields a [`Ruleset`],
//! which can then be applied to a [`term::Term`].
//!
//! How is a term rewritten?
//! Every term of the tree is visited once, parents before children.
//! For each visited term, the rules are tried in order:
//! if all predicates of a rule hold for the term,
//! the actions of the rule are applied to it, one after the other.
//! Later rules see the changes made by earlier rules.
//!
//! ~~~
//! # use bml::{term::Term, Error, Registry, Ruleset};
//! let reg = Registry::builtin();
//! let rules = r#"
//!     ; mark all blocks
//!     ((is-blk) (set-color green))
//!     (((has-color green) (has-name entry)) ((set-comment "start here") (clear-color)))
//! "#;
//! let rules = Ruleset::parse_str(rules, &reg)?;
//!
//! let sub = Term::parse_str("(sub main (blk entry (jmp j goto_exit)) (blk exit))")?;
//! let sub = rules.rewrite(sub);
//! assert_eq!(
//!     sub.to_string(),
//!     r#"(sub main (blk entry (@ comment "start here") (jmp j goto_exit)) (blk exit (@ color green)))"#
//! );
//! # Ok::<_, Error>(())
//! ~~~
//!
//! # Organisation
//!
//! This library is divided into several modules:
//!
//! * [`term`] defines program terms, and [`read`] reads and prints them.
//! * [`registry`] maps names to predicates and actions;
//!   [`builtin`] provides a registry with common predicates and actions.
//! * [`exp`] compiles single predicate and action expressions.
//! * [`Rule`] and [`Ruleset`] compile whole rules.
//! * [`rewrite`] applies rulesets to terms.

extern crate alloc;

pub mod action;
pub mod builtin;
pub mod error;
pub mod exp;
pub mod predicate;
pub mod read;
pub mod registry;
pub mod rewrite;
mod rule;
mod ruleset;
pub mod term;

pub use action::Action;
pub use error::Error;
pub use predicate::Predicate;
pub use registry::Registry;
pub use rewrite::{Stats, Visit};
pub use rule::Rule;
pub use ruleset::Ruleset;
