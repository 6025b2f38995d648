//! Ordered sequences of rules.

use crate::exp::Error;
use crate::{Registry, Rule};
use alloc::vec::Vec;
use bml_parse::Sexps;
use core::fmt::{self, Display};

/// Ordered sequence of rules.
///
/// A ruleset is compiled once and not modified afterwards.
/// It can be shared between threads to rewrite several terms at the same time.
#[derive(Clone, Debug, Default)]
pub struct Ruleset(Vec<Rule>);

impl Ruleset {
    /// Construct an empty ruleset, which does not change any term.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and compile all rules in a string.
    ///
    /// ~~~
    /// # use bml::{exp::Kind, Registry, Ruleset};
    /// let reg = Registry::builtin();
    /// let rules = "((is-sub) (set-color red))\n((is-blk) (set-attr seen))";
    /// assert_eq!(Ruleset::parse_str(rules, &reg)?.len(), 2);
    ///
    /// let rules = "((is-sub) (set-color red))\n((is-blk) (set-color pink))";
    /// let err = Ruleset::parse_str(rules, &reg).unwrap_err();
    /// assert_eq!(err.kind(), Kind::Argument);
    /// # Ok::<_, bml::Error>(())
    /// ~~~
    pub fn parse_str(s: &str, reg: &Registry) -> Result<Self, Error> {
        Self::parse_sources([s], reg)
    }

    /// Parse and compile all rules in a sequence of strings.
    ///
    /// Rules are ordered by the string they appear in,
    /// then by their position in the string.
    pub fn parse_sources<S, I>(sources: I, reg: &Registry) -> Result<Self, Error>
    where
        S: AsRef<str>,
        I: IntoIterator<Item = S>,
    {
        let mut rules = Vec::new();
        for source in sources {
            for sexp in Sexps::new(source.as_ref()) {
                let rule = Rule::compile(&sexp?, reg)?;
                log::debug!("Compiled rule {}: {}", rules.len(), rule);
                rules.push(rule);
            }
        }
        Ok(Self(rules))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Rule> for Ruleset {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Rule> for Ruleset {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl IntoIterator for Ruleset {
    type Item = Rule;
    type IntoIter = alloc::vec::IntoIter<Rule>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Print one rule per line.
impl Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.iter().try_for_each(|rule| writeln!(f, "{}", rule))
    }
}

#[test]
fn all_or_nothing() {
    let reg = Registry::builtin();
    let valid = "((is-sub) (set-attr x))";
    let invalid = "((is-sub) (set-attr))";
    assert!(Ruleset::parse_str(valid, &reg).is_ok());
    let rules = [valid, invalid].join("\n");
    assert!(Ruleset::parse_str(&rules, &reg).is_err());
    assert!(Ruleset::parse_sources([valid, invalid], &reg).is_err());
    assert!(Ruleset::parse_sources([valid, "(unbalanced"], &reg).is_err());
}

#[test]
fn order() -> Result<(), Error> {
    use alloc::string::ToString;
    let reg = Registry::builtin();
    let rules = Ruleset::parse_sources(
        ["((is-sub) (set-attr a)) ((is-sub) (set-attr b))", "", "((is-blk) (set-attr c))"],
        &reg,
    )?;
    let names: Vec<_> = rules
        .rules()
        .iter()
        .map(|r| r.actions[0].exp().arg.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
    assert_eq!(Ruleset::parse_str(&rules.to_string(), &reg)?.len(), 3);
    assert!(Ruleset::parse_str("; no rules\n", &reg)?.is_empty());
    Ok(())
}

#[test]
fn deep_grouping() {
    use crate::exp::Kind;
    use alloc::string::String;
    let reg = Registry::builtin();
    let group = |n: usize| {
        let mut s = String::new();
        (0..n).for_each(|_| s.push('('));
        s.push_str("(is-sub)");
        (0..n).for_each(|_| s.push(')'));
        s
    };
    let rule = alloc::format!("({} (set-attr x))", group(100));
    assert_eq!(Ruleset::parse_str(&rule, &reg).map(|r| r.len()), Ok(1));
    let rule = alloc::format!("({} (set-attr x))", group(20_000));
    let err = Ruleset::parse_str(&rule, &reg).unwrap_err();
    assert_eq!(err.kind(), Kind::Syntax);
}
