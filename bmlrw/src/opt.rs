use crate::Stage;
use clap::Parser;
use std::path::PathBuf;

/// Rewrite program terms with BML rules
///
/// Every FILE is read as a sequence of program terms.
/// Every term is rewritten with the given rules and printed on its own line.
#[derive(Clone, Debug, Parser)]
#[command(version)]
pub struct Opt {
    /// Rule given as text (repeatable)
    ///
    /// Rules given with this option are applied before rules from files.
    #[arg(short, long = "rule", value_name = "RULE")]
    pub rules: Vec<String>,

    /// File containing rules (repeatable)
    #[arg(short = 'f', long = "rules", value_name = "FILE")]
    pub rule_files: Vec<PathBuf>,

    /// Print the available predicates and actions, then exit
    #[arg(long)]
    pub list: bool,

    /// Perform only operations until (excluding) the given stage.
    ///
    /// Possible values are: rewrite, print.
    #[arg(long, value_name = "STAGE")]
    pub omit: Option<Stage>,

    /// Rewrite concurrently
    ///
    /// If this option is used, program files and their terms
    /// are rewritten in parallel.
    /// If this option is given with a number n, then
    /// maximally n rewriting tasks are concurrently executed.
    /// If this option is given without an extra argument, then
    /// the number of concurrently executed tasks is
    /// determined automatically from the number of CPUs.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<Option<usize>>,

    /// Files to process
    ///
    /// To read from standard input, use "-" as file name.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

impl Opt {
    pub fn omits(&self, stage: Stage) -> bool {
        self.omit.map_or(false, |omit| omit <= stage)
    }
}

#[test]
fn options() {
    let opt = Opt::parse_from(["bmlrw", "-r", "((is-sub) (clear-attrs))", "-f", "a.bml", "x.bml", "-"]);
    assert_eq!(opt.rules, ["((is-sub) (clear-attrs))"]);
    assert_eq!(opt.rule_files, [PathBuf::from("a.bml")]);
    assert_eq!(opt.files, [PathBuf::from("x.bml"), PathBuf::from("-")]);
    assert_eq!(opt.jobs, None);
    assert!(!opt.list && !opt.omits(Stage::Rewrite));

    let opt = Opt::parse_from(["bmlrw", "--omit", "rewrite", "-j"]);
    assert!(opt.omits(Stage::Rewrite) && opt.omits(Stage::Print));
    assert_eq!(opt.jobs, Some(None));

    let opt = Opt::parse_from(["bmlrw", "--omit", "print", "--jobs", "4", "--list"]);
    assert!(!opt.omits(Stage::Rewrite) && opt.omits(Stage::Print));
    assert_eq!(opt.jobs, Some(Some(4)));
    assert!(opt.list);

    assert!(Opt::try_parse_from(["bmlrw", "--omit", "read"]).is_err());
}
