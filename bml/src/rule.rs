//! Rules pairing predicates with actions.

use crate::exp::{self, Error};
use crate::rewrite::Visit;
use crate::term::{Node, NodeMut};
use crate::{Action, Predicate, Registry};
use alloc::{vec, vec::Vec};
use bml_parse::Sexp;
use core::fmt::{self, Display};

/// Conjunction of predicates, paired with a sequence of actions.
///
/// A rule without predicates applies to every term;
/// a rule without actions does not change any term.
#[derive(Clone, Debug, Default)]
pub struct Rule {
    pub preds: Vec<Predicate>,
    pub actions: Vec<Action>,
}

impl Rule {
    /// Compile a rule of the shape `(PREDICATES ACTIONS)`.
    ///
    /// Predicates are compiled before actions.
    pub fn compile(sexp: &Sexp, reg: &Registry) -> Result<Self, Error> {
        let (preds, actions) = match sexp.as_list() {
            Some([preds, actions]) => (preds, actions),
            _ => {
                let expected = "a pair of predicate-list and action-list";
                return Err(Error::syntax(expected, sexp));
            }
        };
        let preds = exp::compile(preds, &reg.predicates)?;
        let preds = preds.into_iter().map(|(e, t)| Predicate::new(e, t));
        let actions = exp::compile(actions, &reg.actions)?;
        let actions = actions.into_iter().map(|(e, m)| Action::new(e, m));
        Ok(Self {
            preds: preds.collect(),
            actions: actions.collect(),
        })
    }

    /// Parse and compile a string that contains exactly one rule.
    ///
    /// ~~~
    /// # use bml::{Error, Registry, Rule};
    /// let reg = Registry::builtin();
    /// let rule = Rule::parse_str("((is-sub) ((set-color red) (set-attr seen)))", &reg)?;
    /// assert_eq!(rule.preds.len(), 1);
    /// assert_eq!(rule.actions.len(), 2);
    /// assert_eq!(rule.to_string(), "(((is-sub)) ((set-color red) (set-attr seen)))");
    /// # Ok::<_, Error>(())
    /// ~~~
    pub fn parse_str(s: &str, reg: &Registry) -> Result<Self, Error> {
        Self::compile(&Sexp::parse_str(s)?, reg)
    }

    /// Return true if all predicates hold, evaluating them from left to right.
    pub fn matches(&self, node: Node<'_>, visit: &Visit) -> bool {
        self.preds.iter().all(|pred| pred.holds(node, visit))
    }

    /// Apply all actions in order, every action seeing the effects of the previous ones.
    pub fn apply(&self, mut node: NodeMut<'_>, visit: &Visit) {
        for action in &self.actions {
            action.apply(node.reborrow(), visit)
        }
    }

    pub fn to_sexp(&self) -> Sexp {
        let preds = self.preds.iter().map(|p| p.exp().to_sexp()).collect();
        let actions = self.actions.iter().map(|a| a.exp().to_sexp()).collect();
        Sexp::List(vec![Sexp::List(preds), Sexp::List(actions)])
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.to_sexp().fmt(f)
    }
}

#[test]
fn shapes() {
    use crate::exp::Kind;
    let reg = Registry::builtin();
    let err = |s: &str| Rule::parse_str(s, &reg).unwrap_err();
    let pair = |s: &str| match err(s) {
        Error::Syntax { expected, .. } => expected.starts_with("a pair"),
        _ => false,
    };
    assert!(pair("()"));
    assert!(pair("((is-sub))"));
    assert!(pair("((is-sub) (set-attr x) (set-attr y))"));
    assert!(pair("is-sub"));
    assert_eq!(err("(is-sub set-attr)").kind(), Kind::Syntax);
    assert_eq!(err("").kind(), Kind::Syntax);
    assert_eq!(err("((is-sub) (set-attr x)) ((is-blk) ())").kind(), Kind::Syntax);
}

#[test]
fn predicates_first() {
    let reg = Registry::builtin();
    let err = Rule::parse_str("((no-such-pred) (no-such-action))", &reg).unwrap_err();
    assert_eq!(err, Error::Unbound("no-such-pred".into()));
    let err = Rule::parse_str("((is-sub) (no-such-action))", &reg).unwrap_err();
    assert_eq!(err, Error::Unbound("no-such-action".into()));
}

#[test]
fn namespaces() {
    let reg = Registry::builtin();
    // predicates are not actions and vice versa
    let err = Rule::parse_str("((set-color red) ())", &reg).unwrap_err();
    assert_eq!(err, Error::Unbound("set-color".into()));
    let err = Rule::parse_str("(() (is-sub))", &reg).unwrap_err();
    assert_eq!(err, Error::Unbound("is-sub".into()));
}

#[test]
fn empty() -> Result<(), Error> {
    let rule = Rule::parse_str("(() ())", &Registry::new())?;
    assert!(rule.preds.is_empty() && rule.actions.is_empty());
    let sub = crate::term::Sub::default();
    assert!(rule.matches(Node::Sub(&sub), &Visit::default()));
    Ok(())
}
