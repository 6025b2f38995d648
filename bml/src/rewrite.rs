//! Application of rulesets to terms.
//!
//! A ruleset is applied to every term of a tree, parents before children.
//! At every term, the rules are tried in order:
//! if all predicates of a rule hold for the current term,
//! the actions of the rule are applied to it.
//! Later rules therefore see the effects of earlier rules on the same term.
//! Only then the ruleset is applied to the children of the (modified) term.

use crate::term::{Blk, NodeMut, Program, Sub, Term};
use crate::{Rule, Ruleset};

/// Position of a term in the traversal.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Visit {
    /// number of ancestors of the term
    pub depth: usize,
}

impl Visit {
    /// Return true if the term is the root of the traversal.
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    fn enter(self) -> Self {
        Self {
            depth: self.depth + 1,
        }
    }
}

/// Statistics about the application of a ruleset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// number of visited terms
    pub visited: usize,
    /// number of times that a rule applied to a term
    pub fired: usize,
}

impl core::ops::Add for Stats {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            visited: self.visited + rhs.visited,
            fired: self.fired + rhs.fired,
        }
    }
}

struct Rewriter<'r> {
    rules: &'r [Rule],
    stats: Stats,
}

impl<'r> Rewriter<'r> {
    fn visit(&mut self, mut node: NodeMut<'_>, visit: &Visit) {
        self.stats.visited += 1;
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.matches(node.as_node(), visit) {
                log::trace!("Rule {} fires on {} {}", i, node.cls(), node.as_node().name());
                self.stats.fired += 1;
                rule.apply(node.reborrow(), visit)
            }
        }
    }

    fn program(&mut self, p: &mut Program, visit: Visit) {
        self.visit(NodeMut::Program(p), &visit);
        let visit = visit.enter();
        p.subs.iter_mut().for_each(|s| self.sub(s, visit))
    }

    fn sub(&mut self, s: &mut Sub, visit: Visit) {
        self.visit(NodeMut::Sub(s), &visit);
        let visit = visit.enter();
        s.args.iter_mut().for_each(|a| self.visit(NodeMut::Arg(a), &visit));
        s.blks.iter_mut().for_each(|b| self.blk(b, visit))
    }

    fn blk(&mut self, b: &mut Blk, visit: Visit) {
        self.visit(NodeMut::Blk(b), &visit);
        let visit = visit.enter();
        b.phis.iter_mut().for_each(|i| self.visit(NodeMut::Phi(i), &visit));
        b.defs.iter_mut().for_each(|i| self.visit(NodeMut::Def(i), &visit));
        b.jmps.iter_mut().for_each(|i| self.visit(NodeMut::Jmp(i), &visit))
    }

    fn term(&mut self, term: &mut Term, visit: Visit) {
        match term {
            Term::Program(p) => self.program(p, visit),
            Term::Sub(s) => self.sub(s, visit),
            Term::Arg(a) => self.visit(NodeMut::Arg(a), &visit),
            Term::Blk(b) => self.blk(b, visit),
            Term::Phi(i) => self.visit(NodeMut::Phi(i), &visit),
            Term::Def(i) => self.visit(NodeMut::Def(i), &visit),
            Term::Jmp(i) => self.visit(NodeMut::Jmp(i), &visit),
        }
    }
}

impl Ruleset {
    /// Apply the ruleset to all terms of a tree.
    ///
    /// ~~~
    /// # use bml::{term::Term, Registry, Ruleset};
    /// let reg = Registry::builtin();
    /// let rules = Ruleset::parse_str("((is-def) (set-color red))", &reg)?;
    /// let blk = Term::parse_str("(blk b (def x) (jmp y))")?;
    /// let blk = rules.rewrite(blk);
    /// assert_eq!(blk.to_string(), "(blk b (def x (@ color red)) (jmp y))");
    /// # Ok::<_, bml::Error>(())
    /// ~~~
    pub fn rewrite(&self, term: Term) -> Term {
        self.rewrite_with_stats(term).0
    }

    /// Apply the ruleset to all terms of a tree and
    /// return statistics about the application.
    pub fn rewrite_with_stats(&self, mut term: Term) -> (Term, Stats) {
        let mut rewriter = Rewriter {
            rules: self.rules(),
            stats: Stats::default(),
        };
        rewriter.term(&mut term, Visit::default());
        let stats = rewriter.stats;
        log::debug!("Visited {} terms, fired {} rules", stats.visited, stats.fired);
        (term, stats)
    }
}

#[cfg(test)]
use crate::{term::Node, Registry};
#[cfg(test)]
use alloc::{string::String, string::ToString, vec::Vec};

#[cfg(test)]
const PROGRAM: &str = r#"(program p
    (sub f (arg x in) (arg y out)
        (blk a (phi z) (def u "u := x") (def v "v := u") (jmp j "goto b"))
        (blk b))
    (sub g (blk c (jmp r "return"))))"#;

#[cfg(test)]
fn program() -> Term {
    Term::parse_str(PROGRAM).unwrap()
}

#[cfg(test)]
fn registry() -> Registry {
    let mut reg = Registry::new();
    reg.pred0("any", "always true", |_, _| true)
        .pred0("root", "is the root", |_, visit| visit.is_root())
        .pred1("has", "has attribute", |k: &String, node, _| {
            node.attrs().contains_key(k)
        })
        .act1("set", "set attribute", |k: &String, mut node, _| {
            node.attrs_mut().insert(k.clone(), None);
        })
        .act1("append", "append to name", |s: &String, mut node, _| {
            node.name_mut().push_str(s)
        })
        .act0("count", "count visits", |mut node, _| {
            let n = node.as_node().attr("n").map_or(0usize, |n| n.parse().unwrap());
            node.attrs_mut().insert("n".into(), Some((n + 1).to_string()));
        })
        .act0("depth", "store depth", |mut node, visit| {
            node.attrs_mut().insert("depth".into(), Some(visit.depth.to_string()));
        });
    reg
}

#[cfg(test)]
fn rewrite(rules: &str, term: Term) -> Term {
    Ruleset::parse_str(rules, &registry()).unwrap().rewrite(term)
}

#[cfg(test)]
fn attrs(term: &Term, key: &str) -> Vec<Option<String>> {
    let mut vals = Vec::new();
    term.walk(&mut |node: Node<'_>| vals.push(node.attr(key).map(String::from)));
    vals
}

#[test]
fn coverage() {
    let term = program();
    let size = term.size();
    assert_eq!(size, 13);
    let rules = Ruleset::parse_str("((any) (count))", &registry()).unwrap();
    let (term, stats) = rules.rewrite_with_stats(term);
    assert_eq!(stats, Stats { visited: size, fired: size });
    assert!(attrs(&term, "n").iter().all(|n| n.as_deref() == Some("1")));
}

#[test]
fn leaves() {
    for s in ["(arg a)", "(phi p)", "(def d)", "(jmp j)", "(blk b)", "(sub s)", "(program p)"] {
        let term = rewrite("(() (count))", Term::parse_str(s).unwrap());
        assert_eq!(attrs(&term, "n"), [Some("1".to_string())]);
    }
}

#[test]
fn vacuous() {
    let term = program();
    let rules = Ruleset::parse_str("(() ())", &registry()).unwrap();
    let (rewritten, stats) = rules.rewrite_with_stats(term.clone());
    assert_eq!(rewritten, term);
    assert_eq!(rewritten.to_string(), term.to_string());
    assert_eq!(stats.fired, term.size());
    assert_eq!(Ruleset::new().rewrite(term.clone()), term);
}

#[test]
fn rule_order() {
    let set_then_test = rewrite("(() (set x)) ((has x) (set y))", program());
    let mut count = 0;
    set_then_test.walk(&mut |node| count += node.attrs().contains_key("y") as usize);
    assert_eq!(count, set_then_test.size());

    let test_then_set = rewrite("((has x) (set y)) (() (set x))", program());
    let mut count = 0;
    test_then_set.walk(&mut |node| count += node.attrs().contains_key("y") as usize);
    assert_eq!(count, 0);
}

#[test]
fn action_order() {
    let term = Term::parse_str("(def d)").unwrap();
    let term = rewrite("(() ((append 1) (append 2))) (() (append 3))", term);
    assert_eq!(term.name(), "d123");
}

#[test]
fn short_circuit() {
    let term = Term::parse_str("(def d (@ x))").unwrap();
    let term = rewrite("(((has x) (has y)) (set z)) (((has x) (any)) (set w))", term);
    assert!(!term.attrs().contains_key("z"));
    assert!(term.attrs().contains_key("w"));
}

#[test]
fn preorder() {
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicUsize, Ordering};
    let stamp = Arc::new(AtomicUsize::new(0));
    let mut reg = registry();
    let counter = stamp.clone();
    reg.act0("stamp", "stamp visit order", move |mut node, _| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        node.attrs_mut().insert("stamp".into(), Some(n.to_string()));
    });
    let rules = Ruleset::parse_str("(() (stamp))", &reg).unwrap();
    let term = rules.rewrite(program());
    let stamps = attrs(&term, "stamp");
    let expected: Vec<_> = (0..term.size()).map(|n| Some(n.to_string())).collect();
    assert_eq!(stamps, expected);
    assert_eq!(stamp.load(Ordering::SeqCst), term.size());
}

#[test]
fn same_term() {
    // the second rule matches on the name set by the first rule
    let mut reg = registry();
    reg.pred1("named", "has name", |name: &String, node, _| node.name() == name.as_str());
    let rules = "((root) (append 2)) ((named p2) (set renamed))";
    let term = Ruleset::parse_str(rules, &reg).unwrap().rewrite(program());
    assert_eq!(term.name(), "p2");
    assert!(term.attrs().contains_key("renamed"));
}

#[test]
fn depth() {
    use crate::term::Cls;
    let term = rewrite("(() (depth)) ((root) (set root))", program());
    let depths: Vec<_> = attrs(&term, "depth").into_iter().flatten().collect();
    let expected = ["0", "1", "2", "2", "2", "3", "3", "3", "3", "2", "1", "2", "3"];
    assert_eq!(depths, expected);
    let mut roots = 0;
    term.walk(&mut |node| roots += node.attrs().contains_key("root") as usize);
    assert_eq!(roots, 1);
    assert_eq!(term.cls(), Cls::Program);
}

#[test]
fn shared() {
    extern crate std;
    let rules = Ruleset::parse_str("((any) (count))", &registry()).unwrap();
    let outs: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| rules.rewrite(program())))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    for term in outs {
        assert!(attrs(&term, "n").iter().all(|n| n.as_deref() == Some("1")));
    }
}
