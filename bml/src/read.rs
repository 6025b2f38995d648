//! Conversion between terms and S-expressions.
//!
//! A term is written as `(CLASS NAME ITEM*)`, where an item is either
//! an attribute `(@ KEY)` or `(@ KEY VALUE)`,
//! a child term,
//! the intent of an argument (`in`, `out`, `both`), or
//! the code of an instruction.
//!
//! ~~~
//! # use bml::term::{Cls, Term};
//! let prog = r#"(program demo
//!     (sub main (@ visited)
//!         (arg argc in)
//!         (blk entry (def x "x := argc") (jmp ret "return x"))))"#;
//! let prog = Term::parse_str(prog)?;
//! assert_eq!(prog.cls(), Cls::Program);
//! assert_eq!(prog.size(), 6);
//! assert_eq!(Term::parse_str(&prog.to_string())?, prog);
//! # Ok::<_, bml::read::Error>(())
//! ~~~

use crate::term::{Arg, Attrs, Blk, Cls, Insn, Intent, Program, Sub, Term};
use alloc::{string::String, string::ToString, vec, vec::Vec};
use bml_parse::{Error as ParseError, Sexp, Sexps};
use core::fmt::{self, Display};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    Parse(ParseError),
    /// neither a list nor a list starting with an atom
    ExpectedTerm(String),
    UnknownClass(String),
    ExpectedName(Cls),
    UnexpectedChild(Cls, Cls),
    MalformedAttr(String),
    UnexpectedAtom(Cls, String),
    Intent(String),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Parse(e) => e.fmt(f),
            Self::ExpectedTerm(s) => write!(f, "expected a term, found `{}`", s),
            Self::UnknownClass(c) => write!(f, "unknown term class `{}`", c),
            Self::ExpectedName(cls) => write!(f, "expected a name for {}", cls),
            Self::UnexpectedChild(parent, child) => {
                write!(f, "{} cannot be a child of {}", child, parent)
            }
            Self::MalformedAttr(s) => write!(f, "malformed attribute `{}`", s),
            Self::UnexpectedAtom(cls, s) => write!(f, "unexpected `{}` in {}", s, cls),
            Self::Intent(msg) => msg.fmt(f),
        }
    }
}

const ATTR: &str = "@";

fn attr(list: &[Sexp]) -> Option<(String, Option<String>)> {
    match list {
        [_, Sexp::Atom(k)] => Some((k.clone(), None)),
        [_, Sexp::Atom(k), Sexp::Atom(v)] => Some((k.clone(), Some(v.clone()))),
        _ => None,
    }
}

/// Return true if terms of class `child` may occur directly in terms of class `parent`.
fn allowed(parent: Cls, child: Cls) -> bool {
    use Cls::*;
    matches!(
        (parent, child),
        (Program, Sub) | (Sub, Arg | Blk) | (Blk, Phi | Def | Jmp)
    )
}

/// Return the only payload atom of a term, if there is one.
fn payload(cls: Cls, atoms: Vec<&String>) -> Result<Option<String>, Error> {
    let allowed = matches!(cls, Cls::Arg) || cls.is_insn();
    match atoms.as_slice() {
        [] => Ok(None),
        [a] if allowed => Ok(Some((*a).clone())),
        [a] | [_, a, ..] => Err(Error::UnexpectedAtom(cls, (*a).clone())),
    }
}

impl Term {
    pub fn from_sexp(sexp: &Sexp) -> Result<Self, Error> {
        let expected = || Error::ExpectedTerm(sexp.to_string());
        let (cls, rest) = match sexp.as_list().ok_or_else(expected)? {
            [Sexp::Atom(c), rest @ ..] => {
                let cls: Cls = c.parse().map_err(|_| Error::UnknownClass(c.clone()))?;
                (cls, rest)
            }
            _ => return Err(expected()),
        };
        let (name, items) = match rest {
            [Sexp::Atom(name), items @ ..] => (name.clone(), items),
            _ => return Err(Error::ExpectedName(cls)),
        };

        let mut attrs = Attrs::new();
        let mut atoms = Vec::new();
        let mut children = Vec::new();
        for item in items {
            match item {
                Sexp::Atom(a) => atoms.push(a),
                Sexp::List(l) if l.first().and_then(Sexp::as_atom) == Some(ATTR) => {
                    let (k, v) = attr(l).ok_or_else(|| Error::MalformedAttr(item.to_string()))?;
                    attrs.insert(k, v);
                }
                Sexp::List(l) => {
                    // reject children of a wrong class before reading them
                    let child = l.first().and_then(Sexp::as_atom);
                    let child = child.and_then(|c| c.parse::<Cls>().ok());
                    match child {
                        Some(child) if !allowed(cls, child) => {
                            return Err(Error::UnexpectedChild(cls, child))
                        }
                        _ => children.push(Self::from_sexp(item)?),
                    }
                }
            }
        }
        let payload = payload(cls, atoms)?;
        let unexpected = |child: &Term| Error::UnexpectedChild(cls, child.cls());

        let term = match cls {
            Cls::Program => {
                let mut prog = Program { name, attrs, subs: Vec::new() };
                for child in children {
                    match child {
                        Term::Sub(s) => prog.subs.push(s),
                        other => return Err(unexpected(&other)),
                    }
                }
                Term::Program(prog)
            }
            Cls::Sub => {
                let mut sub = Sub { name, attrs, ..Default::default() };
                for child in children {
                    match child {
                        Term::Arg(a) => sub.args.push(a),
                        Term::Blk(b) => sub.blks.push(b),
                        other => return Err(unexpected(&other)),
                    }
                }
                Term::Sub(sub)
            }
            Cls::Blk => {
                let mut blk = Blk { name, attrs, ..Default::default() };
                for child in children {
                    match child {
                        Term::Phi(i) => blk.phis.push(i),
                        Term::Def(i) => blk.defs.push(i),
                        Term::Jmp(i) => blk.jmps.push(i),
                        other => return Err(unexpected(&other)),
                    }
                }
                Term::Blk(blk)
            }
            Cls::Arg | Cls::Phi | Cls::Def | Cls::Jmp => {
                if let Some(child) = children.first() {
                    return Err(unexpected(child));
                }
                match cls {
                    Cls::Arg => {
                        let intent = payload.map(|i| i.parse::<Intent>().map_err(Error::Intent));
                        let intent = intent.transpose()?;
                        Term::Arg(Arg { name, attrs, intent })
                    }
                    Cls::Phi => Term::Phi(Insn { name, attrs, code: payload }),
                    Cls::Def => Term::Def(Insn { name, attrs, code: payload }),
                    _ => Term::Jmp(Insn { name, attrs, code: payload }),
                }
            }
        };
        Ok(term)
    }

    /// Parse a string that contains exactly one term.
    pub fn parse_str(s: &str) -> Result<Self, Error> {
        Self::from_sexp(&Sexp::parse_str(s)?)
    }

    pub fn to_sexp(&self) -> Sexp {
        match self {
            Self::Program(p) => p.to_sexp(),
            Self::Sub(s) => s.to_sexp(),
            Self::Arg(a) => a.to_sexp(),
            Self::Blk(b) => b.to_sexp(),
            Self::Phi(i) => i.to_sexp(Cls::Phi),
            Self::Def(i) => i.to_sexp(Cls::Def),
            Self::Jmp(i) => i.to_sexp(Cls::Jmp),
        }
    }
}

/// Start the list of a term with its class, name, payload, and attributes.
fn header(cls: Cls, name: &str, payload: Option<String>, attrs: &Attrs) -> Vec<Sexp> {
    let mut list = vec![Sexp::atom(cls.name()), Sexp::atom(name)];
    list.extend(payload.map(Sexp::Atom));
    for (k, v) in attrs {
        let mut attr = vec![Sexp::atom(ATTR), Sexp::atom(k.clone())];
        attr.extend(v.clone().map(Sexp::Atom));
        list.push(Sexp::List(attr));
    }
    list
}

impl Program {
    pub fn to_sexp(&self) -> Sexp {
        let mut list = header(Cls::Program, &self.name, None, &self.attrs);
        list.extend(self.subs.iter().map(Sub::to_sexp));
        Sexp::List(list)
    }
}

impl Sub {
    pub fn to_sexp(&self) -> Sexp {
        let mut list = header(Cls::Sub, &self.name, None, &self.attrs);
        list.extend(self.args.iter().map(Arg::to_sexp));
        list.extend(self.blks.iter().map(Blk::to_sexp));
        Sexp::List(list)
    }
}

impl Arg {
    pub fn to_sexp(&self) -> Sexp {
        let intent = self.intent.map(|i| i.to_string());
        Sexp::List(header(Cls::Arg, &self.name, intent, &self.attrs))
    }
}

impl Blk {
    pub fn to_sexp(&self) -> Sexp {
        let mut list = header(Cls::Blk, &self.name, None, &self.attrs);
        list.extend(self.phis.iter().map(|i| i.to_sexp(Cls::Phi)));
        list.extend(self.defs.iter().map(|i| i.to_sexp(Cls::Def)));
        list.extend(self.jmps.iter().map(|i| i.to_sexp(Cls::Jmp)));
        Sexp::List(list)
    }
}

impl Insn {
    pub fn to_sexp(&self, cls: Cls) -> Sexp {
        Sexp::List(header(cls, &self.name, self.code.clone(), &self.attrs))
    }
}

/// Read all terms from a string.
pub fn terms(s: &str) -> impl Iterator<Item = Result<Term, Error>> + '_ {
    Sexps::new(s).map(|sexp| Term::from_sexp(&sexp?))
}

#[test]
fn positive() -> Result<(), Error> {
    let s = r#"(sub "f x" (@ color red) (@ visited) (arg a both) (blk b (jmp j "goto b")))"#;
    let term = Term::parse_str(s)?;
    assert_eq!(term.to_string(), s);
    match &term {
        Term::Sub(sub) => {
            assert_eq!(sub.name, "f x");
            assert_eq!(sub.args[0].intent, Some(Intent::Both));
            assert_eq!(sub.blks[0].jmps[0].code.as_deref(), Some("goto b"));
            assert_eq!(sub.attrs.get("visited"), Some(&None));
        }
        _ => panic!("subroutine expected"),
    }
    assert_eq!(terms("(arg x) (def y) ; two terms").count(), 2);
    Ok(())
}

#[test]
fn negative() {
    use Error::*;
    let err = |s: &str| Term::parse_str(s).unwrap_err();
    assert_eq!(err("x"), ExpectedTerm("x".into()));
    assert_eq!(err("((sub) f)"), ExpectedTerm("((sub) f)".into()));
    assert_eq!(err("(insn x)"), UnknownClass("insn".into()));
    assert_eq!(err("(sub)"), ExpectedName(Cls::Sub));
    assert_eq!(err("(program p (blk b))"), UnexpectedChild(Cls::Program, Cls::Blk));
    assert_eq!(err("(def d (def e))"), UnexpectedChild(Cls::Def, Cls::Def));
    assert_eq!(err("(sub f (@ a b c))"), MalformedAttr("(@ a b c)".into()));
    assert_eq!(err("(sub f x)"), UnexpectedAtom(Cls::Sub, "x".into()));
    assert_eq!(err("(def d x y)"), UnexpectedAtom(Cls::Def, "y".into()));
    assert!(matches!(err("(arg a sideways)"), Intent(_)));
    assert!(matches!(err("(sub f"), Parse(_)));
    assert_eq!(err("(blk b (def d (blk c (def e))))"), UnexpectedChild(Cls::Def, Cls::Blk));
}

#[test]
fn deep() {
    use alloc::string::String;
    let mut s = String::new();
    (0..20_000).for_each(|_| s.push_str("(sub f "));
    (0..20_000).for_each(|_| s.push(')'));
    let err = Term::parse_str(&s).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::TooDeep(_))));

    // wrong classes are rejected at the outermost offending term
    let mut s = String::from("(program p (sub f (blk b ");
    (0..100).for_each(|_| s.push_str("(blk c "));
    (0..103).for_each(|_| s.push(')'));
    assert_eq!(Term::parse_str(&s), Err(Error::UnexpectedChild(Cls::Blk, Cls::Blk)));
}
