//! Compiled actions.

use crate::exp::Exp;
use crate::rewrite::Visit;
use crate::term::NodeMut;
use alloc::sync::Arc;
use core::fmt::{self, Debug, Display};

/// Transformation of a term in place.
///
/// The transformation may replace the contents of the term,
/// but it cannot change the class of the term.
pub type Map = Arc<dyn Fn(NodeMut, &Visit) + Send + Sync>;

pub fn map<M>(map: M) -> Map
where
    M: Fn(NodeMut, &Visit) + Send + Sync + 'static,
{
    Arc::new(map)
}

/// Transformation together with the expression it was compiled from.
#[derive(Clone)]
pub struct Action {
    exp: Exp,
    map: Map,
}

impl Action {
    pub fn new(exp: Exp, map: Map) -> Self {
        Self { exp, map }
    }

    pub fn exp(&self) -> &Exp {
        &self.exp
    }

    pub fn apply(&self, node: NodeMut<'_>, visit: &Visit) {
        (self.map)(node, visit)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.exp, f)
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Action({})", self.exp)
    }
}

#[test]
fn display() {
    use crate::term::{Insn, Term};
    use alloc::{format, string::ToString};
    let act = Action::new(Exp::new("clear-attrs", None), map(|mut node, _| node.attrs_mut().clear()));
    assert_eq!(act.to_string(), "(clear-attrs)");
    assert_eq!(format!("{:?}", act), "Action((clear-attrs))");

    let mut term = Term::Def(Insn::default());
    term.node_mut().attrs_mut().insert("x".into(), None);
    act.apply(term.node_mut(), &Visit::default());
    assert!(term.attrs().is_empty());
}
