//! Maps from names to constructors of predicates and actions.
//!
//! A [`Registry`] holds two [`Namespace`]s, one for predicates and one for actions.
//! Every namespace consists of two [`Table`]s,
//! one for names taking no argument and one for names taking one argument.

use crate::action;
use crate::predicate;
use crate::rewrite::Visit;
use crate::term::{Node, NodeMut};
use alloc::{string::String, string::ToString, sync::Arc, vec::Vec};
use core::fmt::{self, Display};
use core::str::FromStr;
use fnv::FnvHashMap;

/// Number of arguments taken by a predicate or an action.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    Nullary,
    Unary,
}

impl Arity {
    pub fn other(self) -> Self {
        match self {
            Self::Nullary => Self::Unary,
            Self::Unary => Self::Nullary,
        }
    }
}

impl Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nullary => write!(f, "no argument"),
            Self::Unary => write!(f, "one argument"),
        }
    }
}

/// Constructor of a unary predicate or action from its argument.
pub type Unary<F> = Arc<dyn Fn(&str) -> Result<F, String> + Send + Sync>;

pub struct Entry<C> {
    pub doc: String,
    pub make: C,
}

/// Map from names to constructors.
pub struct Table<C>(FnvHashMap<String, Entry<C>>);

impl<C> Default for Table<C> {
    fn default() -> Self {
        Self(Default::default())
    }
}

impl<C> Table<C> {
    pub fn get(&self, name: &str) -> Option<&Entry<C>> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn insert(&mut self, name: String, entry: Entry<C>) {
        if self.0.insert(name.clone(), entry).is_some() {
            log::warn!("Redefine `{}`", name)
        }
    }

    /// Return names and documentation of all entries, sorted by name.
    pub fn docs(&self) -> Vec<(&str, &str)> {
        let mut docs: Vec<_> = self.0.iter().map(|(k, e)| (k.as_str(), e.doc.as_str())).collect();
        docs.sort_unstable();
        docs
    }
}

/// Constructors for names taking no argument and names taking one argument.
pub struct Namespace<F> {
    pub nullary: Table<F>,
    pub unary: Table<Unary<F>>,
}

impl<F> Default for Namespace<F> {
    fn default() -> Self {
        Self {
            nullary: Default::default(),
            unary: Default::default(),
        }
    }
}

impl<F> Namespace<F> {
    /// Register a name that takes no argument.
    pub fn nullary(&mut self, name: &str, doc: &str, make: F) -> &mut Self {
        let doc = doc.to_string();
        self.nullary.insert(name.to_string(), Entry { doc, make });
        self
    }

    /// Register a name that takes one argument,
    /// together with a function that parses the argument.
    pub fn unary<P>(&mut self, name: &str, doc: &str, parse: P) -> &mut Self
    where
        P: Fn(&str) -> Result<F, String> + Send + Sync + 'static,
    {
        let doc = doc.to_string();
        let make = Arc::new(parse);
        self.unary.insert(name.to_string(), Entry { doc, make });
        self
    }
}

/// Predicates and actions available to rules.
#[derive(Default)]
pub struct Registry {
    pub predicates: Namespace<predicate::Test>,
    pub actions: Namespace<action::Map>,
}

impl Registry {
    /// Construct a registry without any predicates and actions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate that takes no argument.
    pub fn pred0<T>(&mut self, name: &str, doc: &str, test: T) -> &mut Self
    where
        T: Fn(Node, &Visit) -> bool + Send + Sync + 'static,
    {
        self.predicates.nullary(name, doc, predicate::test(test));
        self
    }

    /// Register a predicate that takes one argument,
    /// which is parsed via [`FromStr`].
    pub fn pred1<A, T>(&mut self, name: &str, doc: &str, test: T) -> &mut Self
    where
        A: FromStr + Send + Sync + 'static,
        A::Err: Display,
        T: Fn(&A, Node, &Visit) -> bool + Send + Sync + 'static,
    {
        let test = Arc::new(test);
        self.predicates.unary(name, doc, move |arg| {
            let arg: A = arg.parse().map_err(|e: A::Err| e.to_string())?;
            let test = test.clone();
            Ok(predicate::test(move |node, visit| test(&arg, node, visit)))
        });
        self
    }

    /// Register an action that takes no argument.
    pub fn act0<M>(&mut self, name: &str, doc: &str, map: M) -> &mut Self
    where
        M: Fn(NodeMut, &Visit) + Send + Sync + 'static,
    {
        self.actions.nullary(name, doc, action::map(map));
        self
    }

    /// Register an action that takes one argument,
    /// which is parsed via [`FromStr`].
    pub fn act1<A, M>(&mut self, name: &str, doc: &str, map: M) -> &mut Self
    where
        A: FromStr + Send + Sync + 'static,
        A::Err: Display,
        M: Fn(&A, NodeMut, &Visit) + Send + Sync + 'static,
    {
        let map = Arc::new(map);
        self.actions.unary(name, doc, move |arg| {
            let arg: A = arg.parse().map_err(|e: A::Err| e.to_string())?;
            let map = map.clone();
            Ok(action::map(move |node, visit| map(&arg, node, visit)))
        });
        self
    }
}
