//! Built-in predicates and actions.
//!
//! Colors and comments are stored as the `color` and `comment` attributes of a term.

use crate::term::{Cls, Intent, Node, NodeMut};
use crate::Registry;
use alloc::{format, string::String};
use core::fmt::{self, Display};
use core::str::FromStr;

const COLOR: &str = "color";
const COMMENT: &str = "comment";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
        Color::White,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::White => "white",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name().fmt(f)
    }
}

impl FromStr for Color {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|c| c.name() == s).ok_or_else(|| {
            let names: alloc::vec::Vec<_> = Self::ALL.iter().map(|c| c.name()).collect();
            format!("unknown color `{}`, expected one of: {}", s, names.join(", "))
        })
    }
}

fn code(node: Node<'_>) -> Option<&str> {
    node.insn()?.code.as_deref()
}

impl Registry {
    /// Construct a registry with the built-in predicates and actions.
    ///
    /// ~~~
    /// # use bml::{exp::Kind, Registry, Rule};
    /// let reg = Registry::builtin();
    /// assert!(Rule::parse_str("((has-color) (clear-color))", &reg).is_ok());
    /// assert!(Rule::parse_str("((has-color red) (set-color blue))", &reg).is_ok());
    /// let err = Rule::parse_str("((is-sub) (set-color))", &reg).unwrap_err();
    /// assert_eq!(err.kind(), Kind::Arity);
    /// ~~~
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        for cls in Cls::ALL {
            let doc = format!("the term is of class {}", cls);
            reg.pred0(&format!("is-{}", cls), &doc, move |node, _| node.cls() == cls);
        }
        reg.pred0("is-insn", "the term is a phi node, a definition, or a jump", |node, _| {
            node.cls().is_insn()
        })
        .pred0("is-root", "the term is the root of the traversal", |_, visit| {
            visit.is_root()
        })
        .pred0("has-color", "the term has a color", |node, _| {
            node.attr(COLOR).is_some()
        })
        .pred0("has-comment", "the term has a comment", |node, _| {
            node.attr(COMMENT).is_some()
        })
        .pred1("has-attr", "the term has the attribute KEY", |key: &String, node, _| {
            node.attrs().contains_key(key)
        })
        .pred1("has-name", "the term is named NAME", |name: &String, node, _| {
            node.name() == name.as_str()
        })
        .pred1("has-color", "the term has the color COLOR", |c: &Color, node, _| {
            node.attr(COLOR) == Some(c.name())
        })
        .pred1("has-intent", "the term is an argument with intent INTENT", |i: &Intent, node, _| {
            matches!(node, Node::Arg(arg) if arg.intent == Some(*i))
        })
        .pred1("code-contains", "the code of the instruction contains TEXT", |text: &String, node, _| {
            code(node).map_or(false, |code| code.contains(text.as_str()))
        });

        reg.act0("clear-color", "remove the color", |mut node, _| {
            node.attrs_mut().remove(COLOR);
        })
        .act0("clear-comment", "remove the comment", |mut node, _| {
            node.attrs_mut().remove(COMMENT);
        })
        .act0("clear-attrs", "remove all attributes", |mut node, _| {
            node.attrs_mut().clear()
        })
        .act1("set-attr", "set the attribute KEY", |key: &String, mut node, _| {
            node.attrs_mut().insert(key.clone(), None);
        })
        .act1("clear-attr", "remove the attribute KEY", |key: &String, mut node, _| {
            node.attrs_mut().remove(key);
        })
        .act1("set-color", "color the term with COLOR", |c: &Color, mut node, _| {
            node.attrs_mut().insert(COLOR.into(), Some(c.name().into()));
        })
        .act1("set-comment", "attach the comment TEXT", |text: &String, mut node, _| {
            node.attrs_mut().insert(COMMENT.into(), Some(text.clone()));
        })
        .act1("rename", "rename the term to NAME", |name: &String, mut node, _| {
            *node.name_mut() = name.clone()
        })
        .act1("set-intent", "set the intent of an argument to INTENT", |i: &Intent, node, _| {
            if let NodeMut::Arg(arg) = node {
                arg.intent = Some(*i)
            }
        });
        reg
    }
}

#[test]
fn colors() {
    use crate::exp::Error;
    use crate::Rule;
    let reg = Registry::builtin();
    for c in Color::ALL {
        assert_eq!(c.name().parse(), Ok(c));
        let rule = format!("((has-color {}) (set-color {}))", c, c);
        assert!(Rule::parse_str(&rule, &reg).is_ok());
    }
    match Rule::parse_str("((is-sub) (set-color pink))", &reg) {
        Err(Error::Argument { name, arg, msg }) => {
            assert_eq!((name.as_str(), arg.as_str()), ("set-color", "pink"));
            assert!(msg.starts_with("unknown color `pink`"));
        }
        _ => panic!("malformed argument expected"),
    }
}

#[test]
fn catalog() {
    use crate::term::Term;
    use alloc::string::ToString;
    use crate::Ruleset;
    let reg = Registry::builtin();
    let rules = r#"
        ((is-sub) (set-color red))
        ((has-color red) (set-comment "was red"))
        ((has-intent in) ((set-intent both) (rename input)))
        (((is-insn) (code-contains goto)) (set-attr branch))
        ((is-root) (clear-attrs))
        ((has-attr stale) (clear-attr stale))
        ((has-comment) (clear-color))
    "#;
    let rules = Ruleset::parse_str(rules, &reg).unwrap();
    let prog = r#"(program p (@ x)
        (sub f (@ stale) (arg a in) (blk b (def d "d := 1") (jmp j "goto b"))))"#;
    let prog = rules.rewrite(Term::parse_str(prog).unwrap());
    let expected = r#"(program p (sub f (@ comment "was red") (arg input both) (blk b (def d "d := 1") (jmp j "goto b" (@ branch)))))"#;
    assert_eq!(prog.to_string(), expected);
}
