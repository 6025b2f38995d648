//! S-expressions.

use crate::{Error, Sexps};
use alloc::{string::String, vec::Vec};
use core::fmt::{self, Display};

/// An atom or a list of S-expressions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Sexp {
    Atom(String),
    List(Vec<Sexp>),
}

impl Sexp {
    pub fn atom(s: impl Into<String>) -> Self {
        Self::Atom(s.into())
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(a) => Some(a),
            Self::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Self::Atom(_) => None,
            Self::List(l) => Some(l),
        }
    }

    /// Parse a string that contains exactly one S-expression.
    ///
    /// ~~~
    /// use bml_parse::{Error, Sexp};
    /// let sexp = Sexp::parse_str("(a (b \"c d\"))")?;
    /// assert_eq!(sexp.as_list().map(|l| l.len()), Some(2));
    /// assert_eq!(Sexp::parse_str("(a) (b)"), Err(Error::TrailingInput(4)));
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn parse_str(s: &str) -> Result<Self, Error> {
        let mut sexps = Sexps::new(s);
        let sexp = sexps.next().unwrap_or(Err(Error::ExpectedSexp))?;
        match sexps.next() {
            None => Ok(sexp),
            Some(Err(e)) => Err(e),
            Some(Ok(_)) => Err(Error::TrailingInput(sexps.start())),
        }
    }
}

/// Return true if the string can be printed without quotes.
fn is_bare(s: &str) -> bool {
    !s.is_empty()
        && !s
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | ';' | '"'))
}

fn write_quoted(s: &str, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "\"")?;
    for c in s.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\t' => write!(f, "\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    write!(f, "\"")
}

impl Display for Sexp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Atom(a) if is_bare(a) => a.fmt(f),
            Self::Atom(a) => write_quoted(a, f),
            Self::List(l) => {
                write!(f, "(")?;
                let mut iter = l.iter();
                if let Some(head) = iter.next() {
                    head.fmt(f)?;
                    iter.try_for_each(|x| write!(f, " {}", x))?;
                }
                write!(f, ")")
            }
        }
    }
}

#[test]
fn display() {
    use alloc::{string::ToString, vec};
    let sexp = Sexp::List(vec![
        Sexp::atom("set-comment"),
        Sexp::atom("two words"),
        Sexp::List(Vec::new()),
        Sexp::atom(""),
        Sexp::atom("a\"b\\c"),
    ]);
    let s = sexp.to_string();
    assert_eq!(s, r#"(set-comment "two words" () "" "a\"b\\c")"#);
    assert_eq!(Sexp::parse_str(&s), Ok(sexp));
}
