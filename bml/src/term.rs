//! Program terms.
//!
//! A program is a tree of terms: a [`Program`] owns subroutines ([`Sub`]),
//! a subroutine owns arguments ([`Arg`]) and blocks ([`Blk`]), and
//! a block owns phi nodes, definitions, and jumps (all [`Insn`]).
//! Every term has a name and a map of attributes.
//!
//! A term of any class is represented by [`Term`].
//! Predicates see terms through [`Node`] and
//! actions modify terms through [`NodeMut`].
//! The latter allows to replace the contents of a term,
//! but not to change its class.

use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt::{self, Display};
use core::str::FromStr;

/// Attributes of a term, mapping keys to optional values.
pub type Attrs = BTreeMap<String, Option<String>>;

/// Class of a term.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Cls {
    Program,
    Sub,
    Arg,
    Blk,
    Phi,
    Def,
    Jmp,
}

impl Cls {
    pub const ALL: [Cls; 7] = [
        Cls::Program,
        Cls::Sub,
        Cls::Arg,
        Cls::Blk,
        Cls::Phi,
        Cls::Def,
        Cls::Jmp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Sub => "sub",
            Self::Arg => "arg",
            Self::Blk => "blk",
            Self::Phi => "phi",
            Self::Def => "def",
            Self::Jmp => "jmp",
        }
    }

    /// Return true for phi nodes, definitions, and jumps.
    pub fn is_insn(self) -> bool {
        matches!(self, Self::Phi | Self::Def | Self::Jmp)
    }
}

impl Display for Cls {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl FromStr for Cls {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|cls| cls.name() == s)
            .ok_or_else(|| alloc::format!("unknown term class `{}`", s))
    }
}

/// Direction in which an argument passes data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    In,
    Out,
    Both,
}

impl Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Both => "both",
        };
        s.fmt(f)
    }
}

impl FromStr for Intent {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            "both" => Ok(Self::Both),
            _ => Err(alloc::format!(
                "unknown intent `{}`, expected one of: in, out, both",
                s
            )),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    pub name: String,
    pub attrs: Attrs,
    pub subs: Vec<Sub>,
}

/// Subroutine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sub {
    pub name: String,
    pub attrs: Attrs,
    pub args: Vec<Arg>,
    pub blks: Vec<Blk>,
}

/// Subroutine argument.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Arg {
    pub name: String,
    pub attrs: Attrs,
    pub intent: Option<Intent>,
}

/// Basic block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blk {
    pub name: String,
    pub attrs: Attrs,
    pub phis: Vec<Insn>,
    pub defs: Vec<Insn>,
    pub jmps: Vec<Insn>,
}

/// Instruction, i.e. a phi node, a definition, or a jump.
///
/// The code of an instruction is opaque text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Insn {
    pub name: String,
    pub attrs: Attrs,
    pub code: Option<String>,
}

/// Term of any class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Program(Program),
    Sub(Sub),
    Arg(Arg),
    Blk(Blk),
    Phi(Insn),
    Def(Insn),
    Jmp(Insn),
}

/// Shared reference to a term of any class.
#[derive(Copy, Clone, Debug)]
pub enum Node<'a> {
    Program(&'a Program),
    Sub(&'a Sub),
    Arg(&'a Arg),
    Blk(&'a Blk),
    Phi(&'a Insn),
    Def(&'a Insn),
    Jmp(&'a Insn),
}

/// Mutable reference to a term of any class.
#[derive(Debug)]
pub enum NodeMut<'a> {
    Program(&'a mut Program),
    Sub(&'a mut Sub),
    Arg(&'a mut Arg),
    Blk(&'a mut Blk),
    Phi(&'a mut Insn),
    Def(&'a mut Insn),
    Jmp(&'a mut Insn),
}

impl Insn {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: Some(code.into()),
            ..Default::default()
        }
    }
}

impl Term {
    pub fn node(&self) -> Node<'_> {
        match self {
            Self::Program(p) => Node::Program(p),
            Self::Sub(s) => Node::Sub(s),
            Self::Arg(a) => Node::Arg(a),
            Self::Blk(b) => Node::Blk(b),
            Self::Phi(i) => Node::Phi(i),
            Self::Def(i) => Node::Def(i),
            Self::Jmp(i) => Node::Jmp(i),
        }
    }

    pub fn node_mut(&mut self) -> NodeMut<'_> {
        match self {
            Self::Program(p) => NodeMut::Program(p),
            Self::Sub(s) => NodeMut::Sub(s),
            Self::Arg(a) => NodeMut::Arg(a),
            Self::Blk(b) => NodeMut::Blk(b),
            Self::Phi(i) => NodeMut::Phi(i),
            Self::Def(i) => NodeMut::Def(i),
            Self::Jmp(i) => NodeMut::Jmp(i),
        }
    }

    pub fn cls(&self) -> Cls {
        self.node().cls()
    }

    pub fn name(&self) -> &str {
        self.node().name()
    }

    pub fn attrs(&self) -> &Attrs {
        self.node().attrs()
    }

    /// Call a function on every term in the tree rooted at this term.
    ///
    /// Terms are visited before their children.
    /// The children of a subroutine are its arguments, then its blocks;
    /// the children of a block are its phi nodes, then its definitions, then its jumps.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(Node<'a>)) {
        fn sub<'a>(s: &'a Sub, f: &mut impl FnMut(Node<'a>)) {
            f(Node::Sub(s));
            s.args.iter().for_each(|a| f(Node::Arg(a)));
            s.blks.iter().for_each(|b| blk(b, f));
        }
        fn blk<'a>(b: &'a Blk, f: &mut impl FnMut(Node<'a>)) {
            f(Node::Blk(b));
            b.phis.iter().for_each(|i| f(Node::Phi(i)));
            b.defs.iter().for_each(|i| f(Node::Def(i)));
            b.jmps.iter().for_each(|i| f(Node::Jmp(i)));
        }
        match self {
            Self::Program(p) => {
                f(Node::Program(p));
                p.subs.iter().for_each(|s| sub(s, f));
            }
            Self::Sub(s) => sub(s, f),
            Self::Blk(b) => blk(b, f),
            Self::Arg(_) | Self::Phi(_) | Self::Def(_) | Self::Jmp(_) => f(self.node()),
        }
    }

    /// Return the number of terms in the tree rooted at this term.
    ///
    /// ~~~
    /// # use bml::term::{Blk, Insn, Sub, Term};
    /// let blk = Blk {
    ///     defs: vec![Insn::new("x", "x := 1"), Insn::new("y", "y := x")],
    ///     ..Default::default()
    /// };
    /// let sub = Sub { blks: vec![blk], ..Default::default() };
    /// assert_eq!(Term::Sub(sub).size(), 4);
    /// ~~~
    pub fn size(&self) -> usize {
        let mut size = 0;
        self.walk(&mut |_| size += 1);
        size
    }
}

impl<'a> Node<'a> {
    pub fn cls(&self) -> Cls {
        match self {
            Self::Program(_) => Cls::Program,
            Self::Sub(_) => Cls::Sub,
            Self::Arg(_) => Cls::Arg,
            Self::Blk(_) => Cls::Blk,
            Self::Phi(_) => Cls::Phi,
            Self::Def(_) => Cls::Def,
            Self::Jmp(_) => Cls::Jmp,
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            Self::Program(Program { name, .. })
            | Self::Sub(Sub { name, .. })
            | Self::Arg(Arg { name, .. })
            | Self::Blk(Blk { name, .. })
            | Self::Phi(Insn { name, .. })
            | Self::Def(Insn { name, .. })
            | Self::Jmp(Insn { name, .. }) => name.as_str(),
        }
    }

    pub fn attrs(&self) -> &'a Attrs {
        match *self {
            Self::Program(Program { attrs, .. })
            | Self::Sub(Sub { attrs, .. })
            | Self::Arg(Arg { attrs, .. })
            | Self::Blk(Blk { attrs, .. })
            | Self::Phi(Insn { attrs, .. })
            | Self::Def(Insn { attrs, .. })
            | Self::Jmp(Insn { attrs, .. }) => attrs,
        }
    }

    /// Return the value of an attribute, if the attribute is set and has a value.
    pub fn attr(&self, key: &str) -> Option<&'a str> {
        self.attrs().get(key)?.as_deref()
    }

    /// Return the instruction if the term is a phi node, a definition, or a jump.
    pub fn insn(&self) -> Option<&'a Insn> {
        match *self {
            Self::Phi(i) | Self::Def(i) | Self::Jmp(i) => Some(i),
            _ => None,
        }
    }
}

impl<'a> NodeMut<'a> {
    /// Obtain a shared view of the term.
    pub fn as_node(&self) -> Node<'_> {
        match self {
            Self::Program(p) => Node::Program(p),
            Self::Sub(s) => Node::Sub(s),
            Self::Arg(a) => Node::Arg(a),
            Self::Blk(b) => Node::Blk(b),
            Self::Phi(i) => Node::Phi(i),
            Self::Def(i) => Node::Def(i),
            Self::Jmp(i) => Node::Jmp(i),
        }
    }

    /// Obtain a mutable view of the term with a shorter lifetime.
    pub fn reborrow(&mut self) -> NodeMut<'_> {
        match self {
            Self::Program(p) => NodeMut::Program(p),
            Self::Sub(s) => NodeMut::Sub(s),
            Self::Arg(a) => NodeMut::Arg(a),
            Self::Blk(b) => NodeMut::Blk(b),
            Self::Phi(i) => NodeMut::Phi(i),
            Self::Def(i) => NodeMut::Def(i),
            Self::Jmp(i) => NodeMut::Jmp(i),
        }
    }

    pub fn cls(&self) -> Cls {
        self.as_node().cls()
    }

    pub fn name_mut(&mut self) -> &mut String {
        match self {
            Self::Program(Program { name, .. })
            | Self::Sub(Sub { name, .. })
            | Self::Arg(Arg { name, .. })
            | Self::Blk(Blk { name, .. })
            | Self::Phi(Insn { name, .. })
            | Self::Def(Insn { name, .. })
            | Self::Jmp(Insn { name, .. }) => name,
        }
    }

    pub fn attrs_mut(&mut self) -> &mut Attrs {
        match self {
            Self::Program(Program { attrs, .. })
            | Self::Sub(Sub { attrs, .. })
            | Self::Arg(Arg { attrs, .. })
            | Self::Blk(Blk { attrs, .. })
            | Self::Phi(Insn { attrs, .. })
            | Self::Def(Insn { attrs, .. })
            | Self::Jmp(Insn { attrs, .. }) => attrs,
        }
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.to_sexp().fmt(f)
    }
}

#[test]
fn views() {
    let mut term = Term::Def(Insn::new("x", "x := 1"));
    assert_eq!(term.cls(), Cls::Def);
    assert_eq!(term.node().insn().and_then(|i| i.code.as_deref()), Some("x := 1"));

    let mut node = term.node_mut();
    node.name_mut().push('1');
    node.attrs_mut().insert("color".into(), Some("red".into()));
    assert_eq!(node.as_node().attr("color"), Some("red"));
    assert_eq!(node.cls(), Cls::Def);
    assert_eq!(term.name(), "x1");
}

#[test]
fn classes() {
    for cls in Cls::ALL {
        assert_eq!(cls.name().parse(), Ok(cls));
    }
    assert!("insn".parse::<Cls>().is_err());
    assert!(Cls::Jmp.is_insn() && !Cls::Blk.is_insn());
    assert_eq!("both".parse(), Ok(Intent::Both));
}
