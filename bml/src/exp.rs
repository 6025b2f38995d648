//! Expressions and their compilation to predicates and actions.
//!
//! An expression is either `(id)` or `(id arg)`.
//! Expressions may be grouped by lists, which are flattened:
//!
//! ~~~
//! # use bml::exp::{flatten, Exp};
//! # use bml_parse::Sexp;
//! let mut exps = Vec::new();
//! flatten(&Sexp::parse_str("((is-sub) ((has-attr x) (is-root)))")?, &mut exps)?;
//! let exps: Vec<_> = exps.iter().map(|e| e.to_string()).collect();
//! assert_eq!(exps, ["(is-sub)", "(has-attr x)", "(is-root)"]);
//! # Ok::<_, bml::Error>(())
//! ~~~

use crate::registry::{Arity, Namespace, Table};
use alloc::{string::String, string::ToString, vec, vec::Vec};
use bml_parse::{Error as ParseError, Sexp};
use core::fmt::{self, Display};

/// Name, possibly applied to an argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exp {
    pub name: String,
    pub arg: Option<String>,
}

/// Kind of a compilation error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    Syntax,
    Unbound,
    Arity,
    Argument,
}

/// Compilation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// text that is not a sequence of S-expressions
    Parse(ParseError),
    /// S-expression that does not have the expected shape
    Syntax { expected: &'static str, found: String },
    /// name that is neither nullary nor unary
    Unbound(String),
    /// name that exists only with the given arity
    Arity(String, Arity),
    /// argument rejected by the parser of a unary name
    Argument { name: String, arg: String, msg: String },
}

impl Error {
    pub fn syntax(expected: &'static str, found: &Sexp) -> Self {
        let found = found.to_string();
        Self::Syntax { expected, found }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Parse(_) | Self::Syntax { .. } => Kind::Syntax,
            Self::Unbound(_) => Kind::Unbound,
            Self::Arity(..) => Kind::Arity,
            Self::Argument { .. } => Kind::Argument,
        }
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "syntax error: {}", e),
            Self::Syntax { expected, found } => {
                write!(f, "syntax error: expected {}, found `{}`", expected, found)
            }
            Self::Unbound(name) => write!(f, "unbound name `{}`", name),
            Self::Arity(name, arity) => write!(f, "arity error: `{}` takes {}", name, arity),
            Self::Argument { name, arg, msg } => {
                write!(f, "malformed argument `{}` for `{}`: {}", arg, name, msg)
            }
        }
    }
}

impl Exp {
    pub fn new(name: impl Into<String>, arg: Option<String>) -> Self {
        let name = name.into();
        Self { name, arg }
    }

    pub fn arity(&self) -> Arity {
        match self.arg {
            None => Arity::Nullary,
            Some(_) => Arity::Unary,
        }
    }

    /// Convert a list that starts with an atom to an expression.
    fn from_list(sexp: &Sexp, list: &[Sexp]) -> Result<Self, Error> {
        match list {
            [Sexp::Atom(name)] => Ok(Self::new(name.clone(), None)),
            [Sexp::Atom(name), Sexp::Atom(arg)] => Ok(Self::new(name.clone(), Some(arg.clone()))),
            _ => Err(Error::syntax("`(id)` or `(id arg)`", sexp)),
        }
    }

    pub fn to_sexp(&self) -> Sexp {
        let mut list = vec![Sexp::atom(self.name.clone())];
        list.extend(self.arg.clone().map(Sexp::Atom));
        Sexp::List(list)
    }
}

impl Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.to_sexp().fmt(f)
    }
}

/// Append the expressions in an S-expression to a vector.
///
/// A list starting with an atom is a single expression;
/// any other list is a group of expressions, which is flattened.
pub fn flatten(sexp: &Sexp, exps: &mut Vec<Exp>) -> Result<(), Error> {
    // groups that are currently being flattened
    let mut groups = vec![core::slice::from_ref(sexp).iter()];
    while let Some(group) = groups.last_mut() {
        let sexp = match group.next() {
            Some(sexp) => sexp,
            None => {
                groups.pop();
                continue;
            }
        };
        match sexp {
            Sexp::Atom(_) => {
                return Err(Error::syntax("an expression or a list of expressions", sexp))
            }
            Sexp::List(list) => match list.first() {
                Some(Sexp::Atom(_)) => exps.push(Exp::from_list(sexp, list)?),
                _ => groups.push(list.iter()),
            },
        }
    }
    Ok(())
}

/// Find a name that is expected to take the given number of arguments.
///
/// Names are searched in the table for the expected arity.
/// The table for the other arity only serves to give a better error.
pub fn lookup<'t, A, B>(
    name: &str,
    expected: Arity,
    same: &'t Table<A>,
    other: &Table<B>,
) -> Result<&'t A, Error> {
    if let Some(entry) = same.get(name) {
        Ok(&entry.make)
    } else if other.contains(name) {
        Err(Error::Arity(name.to_string(), expected.other()))
    } else {
        Err(Error::Unbound(name.to_string()))
    }
}

/// Construct the predicate or action denoted by an expression.
pub fn resolve<F: Clone>(exp: &Exp, ns: &Namespace<F>) -> Result<F, Error> {
    match &exp.arg {
        None => lookup(&exp.name, Arity::Nullary, &ns.nullary, &ns.unary).cloned(),
        Some(arg) => {
            let make = lookup(&exp.name, Arity::Unary, &ns.unary, &ns.nullary)?;
            (**make)(arg).map_err(|msg| Error::Argument {
                name: exp.name.clone(),
                arg: arg.clone(),
                msg,
            })
        }
    }
}

/// Flatten an S-expression and resolve all its expressions.
///
/// Fail on the first expression that cannot be resolved.
pub fn compile<F: Clone>(sexp: &Sexp, ns: &Namespace<F>) -> Result<Vec<(Exp, F)>, Error> {
    let mut exps = Vec::new();
    flatten(sexp, &mut exps)?;
    log::debug!("Resolve {} expressions", exps.len());
    exps.into_iter()
        .map(|exp| resolve(&exp, ns).map(|f| (exp, f)))
        .collect()
}

#[cfg(test)]
fn namespace() -> Namespace<String> {
    let mut ns = Namespace::default();
    ns.nullary("foo", "nullary only", "foo".to_string());
    ns.unary("bar", "unary only", |arg| Ok(alloc::format!("bar {}", arg)));
    ns.nullary("both", "nullary variant", "both".to_string());
    ns.unary("both", "unary variant", |arg| Ok(alloc::format!("both {}", arg)));
    ns.unary("digit", "single digit", |arg| match arg {
        "0" | "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9" => Ok(arg.to_string()),
        _ => Err("expected a digit".to_string()),
    });
    ns
}

#[cfg(test)]
fn compile_str(s: &str) -> Result<Vec<String>, Error> {
    let exps = compile(&Sexp::parse_str(s)?, &namespace())?;
    Ok(exps.into_iter().map(|(_, f)| f).collect())
}

#[test]
fn flattening() -> Result<(), Error> {
    let flat = |s: &str| -> Result<Vec<Exp>, Error> {
        let mut exps = Vec::new();
        flatten(&Sexp::parse_str(s)?, &mut exps)?;
        Ok(exps)
    };
    let ab = flat("((a) (b))")?;
    assert_eq!(ab, [Exp::new("a", None), Exp::new("b", None)]);
    assert_eq!(flat("(((a)) ((b)))")?, ab);
    assert_eq!(flat("((a) ((((b)))))")?, ab);
    assert_eq!(flat("(((a) (b)))")?, ab);
    assert_eq!(flat("((a x))")?, [Exp::new("a", Some("x".into()))]);
    assert!(flat("()")?.is_empty());
    assert!(flat("(() (()))")?.is_empty());
    assert_eq!(flat("((a) (((b) (c))) (d))")?.len(), 4);
    Ok(())
}

#[test]
fn deep_groups() -> Result<(), Error> {
    use bml_parse::MAX_DEPTH;
    let nested = |n: usize| {
        let mut s = String::new();
        (0..n).for_each(|_| s.push('('));
        s.push_str("(foo)");
        (0..n).for_each(|_| s.push(')'));
        s
    };
    assert_eq!(compile_str(&nested(MAX_DEPTH - 1))?, ["foo"]);
    let err = compile_str(&nested(20_000)).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::TooDeep(_))));
    assert_eq!(err.kind(), Kind::Syntax);
    Ok(())
}

#[test]
fn syntax_errors() {
    let err = |s: &str| compile_str(s).unwrap_err();
    let shape = |e: Error| match e {
        Error::Syntax { found, .. } => found,
        _ => panic!("syntax error expected"),
    };
    assert_eq!(shape(err("foo")), "foo");
    assert_eq!(shape(err("((foo) bar)")), "bar");
    assert_eq!(shape(err("(bar x y)")), "(bar x y)");
    assert_eq!(shape(err("(bar (x))")), "(bar (x))");
    assert_eq!(err("((foo)").kind(), Kind::Syntax);
}

#[test]
fn lookup_nullary() {
    let ns = namespace();
    let find = |name| lookup(name, Arity::Nullary, &ns.nullary, &ns.unary).cloned();
    assert_eq!(find("foo"), Ok("foo".to_string()));
    assert_eq!(find("both"), Ok("both".to_string()));
    assert_eq!(find("bar"), Err(Error::Arity("bar".into(), Arity::Unary)));
    assert_eq!(find("baz"), Err(Error::Unbound("baz".into())));
}

#[test]
fn lookup_unary() {
    let ns = namespace();
    let find = |name| lookup(name, Arity::Unary, &ns.unary, &ns.nullary).is_ok();
    assert!(find("bar"));
    assert!(find("both"));
    let err = lookup("foo", Arity::Unary, &ns.unary, &ns.nullary).err();
    assert_eq!(err, Some(Error::Arity("foo".into(), Arity::Nullary)));
    let err = lookup("baz", Arity::Unary, &ns.unary, &ns.nullary).err();
    assert_eq!(err, Some(Error::Unbound("baz".into())));
}

#[test]
fn resolution() -> Result<(), Error> {
    assert_eq!(compile_str("(foo)")?, ["foo"]);
    assert_eq!(compile_str("((both) (both x) (bar \"y z\"))")?, ["both", "both x", "bar y z"]);
    assert_eq!(compile_str("(digit 7)")?, ["7"]);

    let err = |s: &str| compile_str(s).unwrap_err();
    assert_eq!(err("(foo bar)"), Error::Arity("foo".into(), Arity::Nullary));
    assert_eq!(err("(bar)"), Error::Arity("bar".into(), Arity::Unary));
    assert_eq!(err("(nonexistent)"), Error::Unbound("nonexistent".into()));
    assert_eq!(err("((foo) (nonexistent x) (baz))"), Error::Unbound("nonexistent".into()));
    let malformed = Error::Argument {
        name: "digit".into(),
        arg: "x".into(),
        msg: "expected a digit".into(),
    };
    assert_eq!(err("(digit x)"), malformed);
    assert_eq!(malformed.kind(), Kind::Argument);
    Ok(())
}

#[test]
fn unbound_in_empty_namespace() {
    let ns: Namespace<String> = Namespace::default();
    let sexp = Sexp::parse_str("(nonexistent)").unwrap();
    assert_eq!(compile(&sexp, &ns).unwrap_err(), Error::Unbound("nonexistent".into()));
}

#[test]
fn totality() {
    let ns = namespace();
    for name in ["foo", "bar", "both", "digit", "baz"] {
        for exp in [Exp::new(name, None), Exp::new(name, Some("1".into()))] {
            match resolve(&exp, &ns) {
                Ok(_) => assert!(name != "baz"),
                Err(e) => assert!(matches!(e.kind(), Kind::Arity | Kind::Unbound)),
            }
        }
    }
}
