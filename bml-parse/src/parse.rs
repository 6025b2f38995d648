use crate::lex::{unquote, Token};
use crate::Sexp;
use alloc::vec::Vec;
use core::fmt::{self, Display};
use logos::{Lexer, Logos};

/// Maximal number of lists that may be open at the same time.
pub const MAX_DEPTH: usize = 256;

/// Reading error, carrying the byte offset where it was detected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// `)` without matching `(`
    UnexpectedRPar(usize),
    /// `(` without matching `)`
    UnclosedLPar(usize),
    /// `(` that opens more than [`MAX_DEPTH`] nested lists
    TooDeep(usize),
    /// character sequence that is not a token, such as an unterminated string
    InvalidToken(usize),
    /// unknown escape sequence in a quoted string
    InvalidEscape(usize),
    /// input without any S-expression
    ExpectedSexp,
    /// input with more than one S-expression where one was expected
    TrailingInput(usize),
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnexpectedRPar(pos) => write!(f, "unexpected `)` at offset {}", pos),
            Self::UnclosedLPar(pos) => write!(f, "unclosed `(` at offset {}", pos),
            Self::TooDeep(pos) => write!(f, "more than {} nested lists at offset {}", MAX_DEPTH, pos),
            Self::InvalidToken(pos) => write!(f, "invalid token at offset {}", pos),
            Self::InvalidEscape(pos) => write!(f, "invalid escape at offset {}", pos),
            Self::ExpectedSexp => write!(f, "expected an S-expression"),
            Self::TrailingInput(pos) => write!(f, "unexpected input at offset {}", pos),
        }
    }
}

/// Iterator over the top-level S-expressions of a string.
///
/// The iterator stops after the first error.
pub struct Sexps<'s> {
    lexer: Lexer<'s, Token<'s>>,
    start: usize,
    failed: bool,
}

impl<'s> Sexps<'s> {
    pub fn new(s: &'s str) -> Self {
        Self {
            lexer: Token::lexer(s),
            start: 0,
            failed: false,
        }
    }

    /// Byte offset where the last returned S-expression started.
    pub fn start(&self) -> usize {
        self.start
    }

    fn parse(&mut self) -> Option<Result<Sexp, Error>> {
        // open lists with the offsets of their `(`
        let mut stack: Vec<(usize, Vec<Sexp>)> = Vec::new();
        loop {
            let token = match self.lexer.next() {
                Some(token) => token,
                None => return stack.pop().map(|(pos, _)| Err(Error::UnclosedLPar(pos))),
            };
            let pos = self.lexer.span().start;
            if stack.is_empty() && token != Token::Space {
                self.start = pos;
            }
            let sexp = match token {
                Token::Space => continue,
                Token::LPar if stack.len() >= MAX_DEPTH => {
                    return Some(Err(Error::TooDeep(pos)))
                }
                Token::LPar => {
                    stack.push((pos, Vec::new()));
                    continue;
                }
                Token::RPar => match stack.pop() {
                    Some((_, list)) => Sexp::List(list),
                    None => return Some(Err(Error::UnexpectedRPar(pos))),
                },
                Token::Atom(a) => Sexp::atom(a),
                Token::Str(s) => match unquote(s) {
                    Ok(s) => Sexp::Atom(s),
                    Err(off) => return Some(Err(Error::InvalidEscape(pos + off))),
                },
                Token::Error => return Some(Err(Error::InvalidToken(pos))),
            };
            match stack.last_mut() {
                Some((_, list)) => list.push(sexp),
                None => return Some(Ok(sexp)),
            }
        }
    }
}

impl<'s> Iterator for Sexps<'s> {
    type Item = Result<Sexp, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let next = self.parse();
        self.failed = matches!(next, Some(Err(_)));
        next
    }
}

#[test]
fn positive() -> Result<(), Error> {
    let sexps: Vec<_> = Sexps::new("a (b) ((c d) \"e f\") ()").collect::<Result<_, _>>()?;
    assert_eq!(sexps.len(), 4);
    assert_eq!(sexps[0], Sexp::atom("a"));
    assert_eq!(sexps[3], Sexp::List(Vec::new()));
    let inner = sexps[2].as_list().unwrap();
    assert_eq!(inner[1].as_atom(), Some("e f"));
    assert_eq!(Sexps::new(" ; nothing but a comment\n").count(), 0);
    Ok(())
}

#[test]
fn negative() {
    use Error::*;
    let parse_err = |s: &str| Sexps::new(s).find_map(Result::err);
    assert_eq!(parse_err("(a))"), Some(UnexpectedRPar(3)));
    assert_eq!(parse_err("(a (b)"), Some(UnclosedLPar(0)));
    assert_eq!(parse_err("(a \"b)"), Some(InvalidToken(3)));
    assert_eq!(parse_err("(a \"b\\x\")"), Some(InvalidEscape(5)));
    assert_eq!(Sexp::parse_str("  "), Err(ExpectedSexp));
    assert_eq!(Sexp::parse_str("(a))"), Err(UnexpectedRPar(3)));
}

#[test]
fn depth() {
    use alloc::string::String;
    let nested = |n| {
        let mut s = String::new();
        (0..n).for_each(|_| s.push('('));
        s.push('a');
        (0..n).for_each(|_| s.push(')'));
        s
    };
    assert!(Sexp::parse_str(&nested(MAX_DEPTH)).is_ok());
    let err = Sexp::parse_str(&nested(MAX_DEPTH + 1));
    assert_eq!(err, Err(Error::TooDeep(MAX_DEPTH)));
    assert!(matches!(Sexp::parse_str(&nested(20_000)), Err(Error::TooDeep(_))));
}
