//! Compiled predicates.

use crate::exp::Exp;
use crate::rewrite::Visit;
use crate::term::Node;
use alloc::sync::Arc;
use core::fmt::{self, Debug, Display};

/// Boolean test over a term.
pub type Test = Arc<dyn Fn(Node, &Visit) -> bool + Send + Sync>;

pub fn test<T>(test: T) -> Test
where
    T: Fn(Node, &Visit) -> bool + Send + Sync + 'static,
{
    Arc::new(test)
}

/// Test together with the expression it was compiled from.
#[derive(Clone)]
pub struct Predicate {
    exp: Exp,
    test: Test,
}

impl Predicate {
    pub fn new(exp: Exp, test: Test) -> Self {
        Self { exp, test }
    }

    pub fn exp(&self) -> &Exp {
        &self.exp
    }

    pub fn holds(&self, node: Node<'_>, visit: &Visit) -> bool {
        (self.test)(node, visit)
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.exp, f)
    }
}

impl Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Predicate({})", self.exp)
    }
}

#[test]
fn display() {
    use crate::term::{Insn, Term};
    use alloc::{format, string::ToString};
    let pred = Predicate::new(Exp::new("has-name", Some("x y".into())), test(|_, _| true));
    assert_eq!(pred.to_string(), r#"(has-name "x y")"#);
    assert_eq!(format!("{:?}", pred), r#"Predicate((has-name "x y"))"#);
    assert!(pred.holds(Term::Def(Insn::default()).node(), &Visit::default()));
}
