use bml::term::{Arg, Blk, Insn, Intent, Program, Sub, Term};
use bml::{Registry, Ruleset};
use criterion::{criterion_group, criterion_main, Criterion};

const RULES: &str = r#"
    ((is-sub) (set-color red))
    ((has-intent in) ((set-intent both) (set-attr widened)))
    (((is-insn) (code-contains goto)) ((set-attr branch) (set-comment "jump")))
    ((has-comment) (clear-color))
    ((has-attr branch) ((clear-attr branch) (rename target)))
"#;

/// Construct a program with `n` subroutines, each with `n` blocks.
fn program(n: usize) -> Term {
    let blk = |i| Blk {
        name: format!("b{}", i),
        phis: vec![Insn::new("p", "p := phi(x, y)")],
        defs: (0..4).map(|j| Insn::new(format!("d{}", j), "x := y + 1")).collect(),
        jmps: vec![Insn::new("j", format!("goto b{}", i + 1))],
        ..Default::default()
    };
    let arg = |i| Arg {
        name: format!("a{}", i),
        intent: Some(Intent::In),
        ..Default::default()
    };
    let sub = |i| Sub {
        name: format!("f{}", i),
        args: (0..3).map(arg).collect(),
        blks: (0..n).map(blk).collect(),
        ..Default::default()
    };
    Term::Program(Program {
        name: "bench".into(),
        subs: (0..n).map(sub).collect(),
        ..Default::default()
    })
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let reg = Registry::builtin();
    let rules = Ruleset::parse_str(RULES, &reg).unwrap();
    let prog = program(32);
    let text = prog.to_string();

    c.bench_function("compile", |b| {
        b.iter(|| Ruleset::parse_str(RULES, &reg).unwrap())
    });
    c.bench_function("read", |b| b.iter(|| Term::parse_str(&text).unwrap()));
    c.bench_function("rewrite", |b| b.iter(|| rules.rewrite(prog.clone())));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
