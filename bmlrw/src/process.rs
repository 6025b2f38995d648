//! Processing of rules & program files.

use crate::{Error, Opt, PathRead, Stage};
use bml::registry::{Namespace, Table};
use bml::term::Term;
use bml::{Registry, Rule, Ruleset, Stats};
use core::fmt::{self, Display};
use rayon::prelude::*;

/// Compile inline rules, followed by the rules in rule files.
///
/// Every inline rule text must contain exactly one rule.
pub fn rules(opt: &Opt, reg: &Registry) -> Result<Ruleset, Error> {
    let rules = opt.rules.iter().map(|rule| Rule::parse_str(rule, reg));
    let mut rules = rules.collect::<Result<Ruleset, _>>()?;
    for path in &opt.rule_files {
        let file = PathRead::try_from(path)?;
        let file_rules = Ruleset::parse_str(&file.read, reg);
        rules.extend(file_rules.map_err(|e| Error::from(e).in_file(path))?);
    }
    log::info!("Compiled {} rules", rules.len());
    Ok(rules)
}

/// Read all terms of a file.
fn read(file: &PathRead) -> Result<Vec<Term>, Error> {
    let terms = bml::read::terms(&file.read).collect::<Result<Vec<_>, _>>();
    terms.map_err(|e| Error::from(e).in_file(&file.path))
}

fn log_stats(file: &PathRead, stats: &Stats) {
    let path = file.path.display();
    log::info!("Visited {} terms in {}, fired {} rules", stats.visited, path, stats.fired)
}

/// Read and rewrite the terms of a file, one after the other.
fn seq(file: &PathRead, rules: &Ruleset, opt: &Opt) -> Result<Vec<Term>, Error> {
    let terms = read(file)?;
    if opt.omits(Stage::Rewrite) {
        return Ok(terms);
    }
    let mut stats = Stats::default();
    let terms = terms
        .into_iter()
        .map(|term| {
            let (term, s) = rules.rewrite_with_stats(term);
            stats = stats + s;
            term
        })
        .collect();
    log_stats(file, &stats);
    Ok(terms)
}

/// Read and rewrite the terms of a file in parallel.
fn par(file: &PathRead, rules: &Ruleset, opt: &Opt) -> Result<Vec<Term>, Error> {
    let terms = read(file)?;
    if opt.omits(Stage::Rewrite) {
        return Ok(terms);
    }
    let (terms, stats): (Vec<_>, Vec<_>) = terms
        .into_par_iter()
        .map(|term| rules.rewrite_with_stats(term))
        .unzip();
    log_stats(file, &stats.into_iter().fold(Stats::default(), |acc, s| acc + s));
    Ok(terms)
}

fn print(terms: &[Term], opt: &Opt) {
    if !opt.omits(Stage::Print) {
        terms.iter().for_each(|term| println!("{}", term))
    }
}

/// Rewrite and print all terms in all program files.
///
/// Files are printed in the order in which they were given,
/// even if they are rewritten in parallel.
pub fn run(opt: &Opt, rules: &Ruleset) -> Result<(), Error> {
    if opt.files.iter().filter(|p| PathRead::is_stdin(p)).count() > 1 {
        return Err(Error::Stdin);
    }

    if opt.jobs.is_none() {
        for path in &opt.files {
            print(&seq(&PathRead::try_from(path)?, rules, opt)?, opt)
        }
        return Ok(());
    }

    // standard input cannot be read from several threads
    let (stdin, files): (Vec<_>, Vec<_>) = opt.files.iter().partition(|p| PathRead::is_stdin(p));
    let stdin = stdin.into_iter().next().map(PathRead::try_from).transpose()?;
    let outputs = files
        .into_par_iter()
        .map(|path| par(&PathRead::try_from(path)?, rules, opt))
        .collect::<Vec<_>>();

    let mut outputs = outputs.into_iter();
    for path in &opt.files {
        let terms = match &stdin {
            Some(file) if PathRead::is_stdin(path) => par(file, rules, opt)?,
            _ => outputs.next().unwrap_or_else(|| Ok(Vec::new()))?,
        };
        print(&terms, opt)
    }
    Ok(())
}

/// Documentation of all predicates and actions in a registry.
pub struct Catalog<'a>(pub &'a Registry);

fn table<C>(f: &mut fmt::Formatter, table: &Table<C>, arg: &str) -> fmt::Result {
    for (name, doc) in table.docs() {
        let exp = format!("({}{})", name, arg);
        writeln!(f, "  {:<24} {}", exp, doc)?
    }
    Ok(())
}

fn namespace<F>(f: &mut fmt::Formatter, ns: &Namespace<F>, arg: &str) -> fmt::Result {
    table(f, &ns.nullary, "")?;
    table(f, &ns.unary, &format!(" {}", arg))
}

impl<'a> Display for Catalog<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Predicates:")?;
        namespace(f, &self.0.predicates, "ARG")?;
        writeln!(f, "Actions:")?;
        namespace(f, &self.0.actions, "ARG")
    }
}

#[test]
fn inline_rules() -> Result<(), Error> {
    use clap::Parser;
    let reg = Registry::builtin();
    let opt = Opt::parse_from(["bmlrw", "-r", "((is-sub) (set-attr a))", "-r", "((is-sub) (set-attr b))"]);
    let rules = rules(&opt, &reg)?;
    assert_eq!(rules.len(), 2);

    use bml::exp::Kind;
    let kind = |rule: &str| {
        let opt = Opt::parse_from(["bmlrw", "-r", rule]);
        match crate::process::rules(&opt, &reg) {
            Err(Error::Bml(bml::Error::Compile(e))) => Some(e.kind()),
            _ => None,
        }
    };
    assert_eq!(kind("((is-sub) (set-attr))"), Some(Kind::Arity));
    // an inline rule text holds exactly one rule
    assert_eq!(kind(""), Some(Kind::Syntax));
    assert_eq!(kind("((is-sub) (set-attr a)) ((is-blk) (set-attr b))"), Some(Kind::Syntax));
    Ok(())
}

#[test]
fn stdin_once() {
    use clap::Parser;
    let opt = Opt::parse_from(["bmlrw", "-", "x.bml", "-"]);
    assert!(matches!(run(&opt, &Ruleset::new()), Err(Error::Stdin)));
    let opt = Opt::parse_from(["bmlrw", "-j", "2", "-", "-"]);
    assert!(matches!(run(&opt, &Ruleset::new()), Err(Error::Stdin)));
}

#[test]
fn catalog() {
    let reg = Registry::builtin();
    let catalog = Catalog(&reg).to_string();
    assert!(catalog.starts_with("Predicates:\n"));
    assert!(catalog.contains("(is-sub)"));
    assert!(catalog.contains("(has-color)"));
    assert!(catalog.contains("(has-color ARG)"));
    assert!(catalog.contains("(set-color ARG)"));
    let (preds, actions) = catalog.split_once("Actions:\n").unwrap();
    assert!(preds.contains("(is-root)") && !preds.contains("(rename ARG)"));
    assert!(actions.contains("(rename ARG)") && !actions.contains("(is-root)"));
}

#[test]
fn files() -> Result<(), Error> {
    use clap::Parser;
    let dir = std::env::temp_dir().join(format!("bmlrw-{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let rules_path = dir.join("rules.bml");
    let prog_path = dir.join("prog.bml");
    std::fs::write(&rules_path, "((is-blk) (set-color blue))")?;
    std::fs::write(&prog_path, "(sub f (blk a)) (blk b)")?;

    let reg = Registry::builtin();
    let rules_arg = rules_path.to_str().unwrap();
    let opt = Opt::parse_from(["bmlrw", "-r", "((is-sub) (rename g))", "-f", rules_arg]);
    let rules = rules(&opt, &reg)?;
    assert_eq!(rules.len(), 2);

    let file = PathRead::try_from(&prog_path)?;
    let expected = ["(sub g (blk a (@ color blue)))", "(blk b (@ color blue))"];
    let terms = seq(&file, &rules, &opt)?;
    assert_eq!(terms.iter().map(|t| t.to_string()).collect::<Vec<_>>(), expected);
    let terms = par(&file, &rules, &opt)?;
    assert_eq!(terms.iter().map(|t| t.to_string()).collect::<Vec<_>>(), expected);

    let missing = dir.join("missing.bml");
    assert!(matches!(PathRead::try_from(&missing), Err(Error::File(..))));
    std::fs::remove_dir_all(&dir)?;
    Ok(())
}
